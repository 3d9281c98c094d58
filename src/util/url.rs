use url::Url;

use crate::error::Error;

/// Scheme used for every storage request.
pub(crate) const SCHEME: &str = "http";

/// Builds `http://{host}{path}?{query}` for a virtual-hosted target.
pub(crate) fn resolve_url(host: &str, path: &str, query: Option<&str>) -> Result<Url, Error> {
    let host = host.trim();
    if host.is_empty() {
        return Err(Error::invalid_config("request host must not be empty"));
    }
    if host.contains("://") || host.contains('/') {
        return Err(Error::invalid_config(
            "request host must not include a scheme or path",
        ));
    }

    let mut url = Url::parse(&format!("{SCHEME}://{host}/"))
        .map_err(|_| Error::invalid_config(format!("invalid request host: {host}")))?;

    // `set_path` leaves `%` alone, so a key like `100%41.txt` would reach the
    // service as `100A.txt`.
    let path = path.replace('%', "%25");
    if path.starts_with('/') {
        url.set_path(&path);
    } else {
        url.set_path(&format!("/{path}"));
    }

    match query {
        Some(q) if !q.is_empty() => url.set_query(Some(q)),
        _ => url.set_query(None),
    }

    Ok(url)
}
