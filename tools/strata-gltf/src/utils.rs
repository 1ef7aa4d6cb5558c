//! Utility functions for glTF buffer construction

/// Running per-component minimum and maximum of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<const N: usize> {
    pub min: [f32; N],
    pub max: [f32; N],
}

impl<const N: usize> Bounds<N> {
    /// Empty bounds; the first [`Bounds::include`] replaces both corners.
    pub fn new() -> Self {
        Self {
            min: [f32::MAX; N],
            max: [f32::MIN; N],
        }
    }

    pub fn include(&mut self, value: &[f32; N]) {
        for i in 0..N {
            self.min[i] = self.min[i].min(value[i]);
            self.max[i] = self.max[i].max(value[i]);
        }
    }

    pub fn from_values(values: &[[f32; N]]) -> Self {
        let mut bounds = Self::new();
        for value in values {
            bounds.include(value);
        }
        bounds
    }
}

impl<const N: usize> Default for Bounds<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Align buffer to 4-byte boundary
pub fn align_buffer(buffer: &mut Vec<u8>) {
    align_buffer_with(buffer, 0);
}

/// Align buffer to 4-byte boundary using `fill` as padding byte
pub fn align_buffer_with(buffer: &mut Vec<u8>, fill: u8) {
    while buffer.len() % 4 != 0 {
        buffer.push(fill);
    }
}
