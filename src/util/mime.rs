use std::path::Path;

/// Content type and encoding inferred from a file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ContentHints {
    pub(crate) content_type: String,
    pub(crate) content_encoding: Option<&'static str>,
}

/// Guesses the MIME type and transfer encoding of `path`.
///
/// A compression suffix such as `.gz` becomes the encoding and the type is
/// guessed from the remaining name, so `logs.tar.gz` is an `application/x-tar`
/// body with `gzip` encoding.
pub(crate) fn guess(path: &Path) -> ContentHints {
    let encoding = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(encoding_for_extension);

    let typed_path = match encoding {
        Some(_) => path.with_extension(""),
        None => path.to_path_buf(),
    };

    ContentHints {
        content_type: mime_guess::from_path(&typed_path)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
        content_encoding: encoding,
    }
}

fn encoding_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "gz" => Some("gzip"),
        "bz2" => Some("bzip2"),
        "xz" => Some("xz"),
        "br" => Some("br"),
        "z" => Some("compress"),
        _ => None,
    }
}
