/// Extension of every stored document (without the leading dot).
pub const PDF_EXTENSION: &str = "pdf";

/// Media type served for stored documents.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";
