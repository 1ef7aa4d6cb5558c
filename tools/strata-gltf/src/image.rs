//! PNG encoding for embedded texture images

use crate::error::GltfError;

/// MIME type recorded on images produced by [`encode_png`].
pub const PNG_MIME_TYPE: &str = "image/png";

/// Encode RGBA8 pixels stored bottom row first as a PNG file.
///
/// Rows are reordered to PNG's top-to-bottom scan order and written unfiltered (filter byte 0
/// on every row) as 8-bit RGBA. The output holds exactly the IHDR, IDAT and IEND chunks.
///
/// # Arguments
/// * `name` - Image name, used in error messages
/// * `width`, `height` - Image size in pixels (both non-zero)
/// * `rgba_bottom_up` - `width * height * 4` bytes, last scanline first
pub fn encode_png(
    name: &str,
    width: u32,
    height: u32,
    rgba_bottom_up: &[u8],
) -> Result<Vec<u8>, GltfError> {
    let row_len = width as usize * 4;
    if width == 0 || height == 0 || rgba_bottom_up.len() != row_len * height as usize {
        return Err(GltfError::ImageSize {
            name: name.to_string(),
            width,
            height,
            len: rgba_bottom_up.len(),
        });
    }

    let mut top_down = Vec::with_capacity(rgba_bottom_up.len());
    for row in rgba_bottom_up.chunks_exact(row_len).rev() {
        top_down.extend_from_slice(row);
    }

    let mut png_bytes = Vec::new();
    let mut encoder = png::Encoder::new(&mut png_bytes, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Best);
    encoder.set_filter(png::FilterType::NoFilter);
    encoder.set_adaptive_filter(png::AdaptiveFilterType::NonAdaptive);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&top_down)?;
    writer.finish()?;

    tracing::debug!(name, width, height, bytes = png_bytes.len(), "encoded PNG");
    Ok(png_bytes)
}
