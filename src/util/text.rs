/// Cuts `body` to at most `max_len` bytes on a char boundary, marking the cut
/// with `...`.
pub(crate) fn truncate_snippet(body: &str, max_len: usize) -> String {
    if body.len() <= max_len {
        return body.to_string();
    }

    let mut cut = max_len;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }

    let mut out = String::with_capacity(cut + 3);
    out.push_str(&body[..cut]);
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_short_bodies() {
        assert_eq!(truncate_snippet("not xml", 64), "not xml");
    }

    #[test]
    fn cuts_multibyte_text_on_char_boundary() {
        let body = "gcs-ü".repeat(20);
        let out = truncate_snippet(&body, 5);
        assert_eq!(out, "gcs-...");
    }
}
