use crate::constants::{MAX_DECODE_ALLOC, MAX_PIXELS};
use crate::errors::TransformError;
use crate::transform::orientation::Orientation;
use crate::transform::params::{OutputFormat, StillFormat};
use image::{DynamicImage, ImageReader, Limits};
use std::io::Cursor;

/// マジックバイトからフォーマットを判定する
///
/// どのシグネチャにも一致しなければ Decode、
/// 判定できたが非対応のフォーマットなら UnsupportedFormat を返す
pub fn sniff_format(input: &[u8]) -> Result<OutputFormat, TransformError> {
    let detected = image::guess_format(input)
        .map_err(|e| TransformError::Decode(format!("unrecognized image data: {e}")))?;

    OutputFormat::from_image_format(detected)
        .ok_or_else(|| TransformError::UnsupportedFormat(format!("{detected:?}").to_lowercase()))
}

/// 静止画（JPEG / PNG）をデコードする
///
/// JPEG は EXIF Orientation を適用して正立させた状態で返す
pub fn decode_image(input: &[u8], format: StillFormat) -> Result<DynamicImage, TransformError> {
    let mut reader = ImageReader::with_format(Cursor::new(input), format.image_format());
    let mut limits = Limits::default();
    limits.max_alloc = Some(MAX_DECODE_ALLOC);
    reader.limits(limits);

    let img = reader
        .decode()
        .map_err(|e| {
            TransformError::Decode(format!("{} decode failed: {e}", OutputFormat::from(format)))
        })?;

    validate_source_dimensions(img.width(), img.height())?;

    let img = match format {
        StillFormat::Jpeg => Orientation::from_exif(input).apply(img),
        StillFormat::Png => img,
    };

    Ok(img)
}

/// ソース画像の総ピクセル数を検証し、メモリ枯渇を防ぐ
pub fn validate_source_dimensions(width: u32, height: u32) -> Result<(), TransformError> {
    if width == 0 || height == 0 {
        return Err(TransformError::Decode(format!(
            "image has empty dimensions ({width}x{height})"
        )));
    }

    let total_pixels = u64::from(width) * u64::from(height);
    if total_pixels > MAX_PIXELS {
        return Err(TransformError::ResolutionTooLarge { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(format: image::ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::new_rgb8(12, 8).write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_sniff_supported_formats() {
        assert_eq!(sniff_format(&encoded(image::ImageFormat::Png)).unwrap(), OutputFormat::Png);
        assert_eq!(sniff_format(&encoded(image::ImageFormat::Jpeg)).unwrap(), OutputFormat::Jpeg);
        assert_eq!(sniff_format(&encoded(image::ImageFormat::Gif)).unwrap(), OutputFormat::Gif);
    }

    #[test]
    fn test_sniff_garbage_is_decode_error() {
        let result = sniff_format(b"definitely not an image");
        assert!(matches!(result, Err(TransformError::Decode(_))));
    }

    #[test]
    fn test_sniff_known_but_unsupported_format() {
        // BMP のシグネチャ
        let result = sniff_format(b"BM\x00\x00\x00\x00\x00\x00\x00\x00\x36\x00\x00\x00");
        match result {
            Err(TransformError::UnsupportedFormat(name)) => assert_eq!(name, "bmp"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_png() {
        let img = decode_image(&encoded(image::ImageFormat::Png), StillFormat::Png).unwrap();
        assert_eq!((img.width(), img.height()), (12, 8));
    }

    #[test]
    fn test_decode_truncated_png() {
        let mut data = encoded(image::ImageFormat::Png);
        data.truncate(20);
        let result = decode_image(&data, StillFormat::Png);
        assert!(matches!(result, Err(TransformError::Decode(_))));
    }

    #[test]
    fn test_validate_source_dimensions() {
        assert!(validate_source_dimensions(4000, 3000).is_ok());
        assert!(matches!(
            validate_source_dimensions(100_000, 100_000),
            Err(TransformError::ResolutionTooLarge { .. })
        ));
        assert!(matches!(
            validate_source_dimensions(0, 10),
            Err(TransformError::Decode(_))
        ));
    }
}
