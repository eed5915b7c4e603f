use std::path::Path;

use tempfile::NamedTempFile;

/// Decoded image waiting on disk to be handed to a blob store.
///
/// The backing temp file is removed when this value is dropped.
#[derive(Debug)]
pub struct DecodedImage {
    file: NamedTempFile,
    original_name: String,
    extension: &'static str,
    content_type: &'static str,
}

impl DecodedImage {
    pub fn new(
        file: NamedTempFile,
        original_name: String,
        extension: &'static str,
        content_type: &'static str,
    ) -> Self {
        Self {
            file,
            original_name,
            extension,
            content_type,
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
    pub fn original_name(&self) -> &str {
        &self.original_name
    }
    pub fn extension(&self) -> &str {
        self.extension
    }
    pub fn content_type(&self) -> &str {
        self.content_type
    }
}
