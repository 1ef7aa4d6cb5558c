//! Append-only byte blob backing the single glTF buffer

use crate::utils::align_buffer;

/// Byte range of one appended block inside the blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub offset: usize,
    pub length: usize,
}

/// Byte accumulator that starts every appended block on a 4-byte boundary.
///
/// Padding is only inserted *before* an append, so the blob may end on an unaligned length.
/// Containers that need an aligned tail pad it themselves.
#[derive(Debug, Default, Clone)]
pub struct BinaryBuffer {
    data: Vec<u8>,
}

impl BinaryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-pad to alignment, then append `bytes`.
    pub fn append(&mut self, bytes: &[u8]) -> ByteRange {
        align_buffer(&mut self.data);
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);
        ByteRange {
            offset,
            length: bytes.len(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
