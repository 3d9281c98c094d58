/// Masks a secret, keeping four characters at each end when the value is long
/// enough for that to hide something.
pub(crate) fn redact_value(value: &str) -> String {
    let value = value.trim();
    let count = value.chars().count();
    if count <= 8 {
        return "<redacted>".to_string();
    }

    let head: String = value.chars().take(4).collect();
    let tail: String = value.chars().skip(count - 4).collect();
    format!("{head}...{tail}")
}
