pub(crate) mod headers;
pub(crate) mod mime;
pub(crate) mod redact;
pub(crate) mod text;
pub(crate) mod url;
pub(crate) mod xml;
