/// Encoded bytes plus the metadata a delivery target needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBlob {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    /// Without the leading dot.
    pub extension: &'static str,
}

impl EncodedBlob {
    pub fn new(bytes: Vec<u8>, mime: &'static str, extension: &'static str) -> Self {
        Self {
            bytes,
            mime,
            extension,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A blob paired with the file name it should be delivered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBlob {
    pub file_name: String,
    pub blob: EncodedBlob,
}
