/// Raw image received from a client, before compression
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub data: Vec<u8>,
    pub original_filename: String,
    /// Declared MIME type, e.g. `image/png`
    pub content_type: String,
}

impl ImageFile {
    pub fn new(
        data: Vec<u8>,
        original_filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            data,
            original_filename: original_filename.into(),
            content_type: content_type.into(),
        }
    }
}
