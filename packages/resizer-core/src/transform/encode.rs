use crate::constants::JPEG_QUALITY;
use crate::errors::TransformError;
use crate::transform::params::StillFormat;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// 静止画をエンコードする
///
/// JPEG は固定品質、PNG はロスレス
pub fn encode_image(img: &DynamicImage, format: StillFormat) -> Result<Vec<u8>, TransformError> {
    let mut buf = Cursor::new(Vec::new());

    match format {
        StillFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
            img.to_rgb8()
                .write_with_encoder(encoder)
                .map_err(|e| TransformError::Encode(format!("JPEG encode failed: {e}")))?;
        }
        StillFormat::Png => {
            img.write_to(&mut buf, ImageFormat::Png)
                .map_err(|e| TransformError::Encode(format!("PNG encode failed: {e}")))?;
        }
    }

    Ok(buf.into_inner())
}
