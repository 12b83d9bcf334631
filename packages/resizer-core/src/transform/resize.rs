use crate::constants::MAX_PIXELS;
use crate::errors::TransformError;
use fast_image_resize::images::{Image, ImageRef};
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, RgbImage, RgbaImage};

/// 画像をリサイズする
///
/// fast_image_resize の Lanczos3 畳み込みで高品質に縮小する。
/// アルファを持つ画像は RGBA のまま（アルファを考慮して）処理する。
pub fn resize_image(
    img: &DynamicImage,
    target_w: u32,
    target_h: u32,
) -> Result<DynamicImage, TransformError> {
    check_target(target_w, target_h)?;

    let mut resizer = Resizer::new();

    if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        let resized = resize_rgba(&mut resizer, &rgba, target_w, target_h)?;
        return Ok(DynamicImage::ImageRgba8(resized));
    }

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let raw = resize_pixels(
        &mut resizer,
        width,
        height,
        rgb.as_raw(),
        PixelType::U8x3,
        target_w,
        target_h,
    )?;

    let resized = RgbImage::from_raw(target_w, target_h, raw).ok_or_else(|| {
        TransformError::Encode("failed to convert resized image".to_string())
    })?;

    Ok(DynamicImage::ImageRgb8(resized))
}

/// RGBA バッファをリサイズする
///
/// GIF のフレームごとに同じ Resizer を使い回せるよう、呼び出し側が渡す。
/// ソースのバッファは借用するだけでコピーしない
pub fn resize_rgba(
    resizer: &mut Resizer,
    src: &RgbaImage,
    target_w: u32,
    target_h: u32,
) -> Result<RgbaImage, TransformError> {
    check_target(target_w, target_h)?;

    let (width, height) = src.dimensions();
    let raw = resize_pixels(
        resizer,
        width,
        height,
        src.as_raw(),
        PixelType::U8x4,
        target_w,
        target_h,
    )?;

    RgbaImage::from_raw(target_w, target_h, raw)
        .ok_or_else(|| TransformError::Encode("failed to convert resized frame".to_string()))
}

fn check_target(target_w: u32, target_h: u32) -> Result<(), TransformError> {
    let total_pixels = u64::from(target_w) * u64::from(target_h);
    if total_pixels > MAX_PIXELS {
        return Err(TransformError::ResolutionTooLarge {
            width: target_w,
            height: target_h,
        });
    }
    Ok(())
}

fn resize_pixels(
    resizer: &mut Resizer,
    width: u32,
    height: u32,
    buffer: &[u8],
    pixel_type: PixelType,
    target_w: u32,
    target_h: u32,
) -> Result<Vec<u8>, TransformError> {
    let src_image = ImageRef::new(width, height, buffer, pixel_type).map_err(|e| {
        TransformError::Decode(format!("failed to create source image: {e}"))
    })?;

    let mut dst_image = Image::new(target_w, target_h, pixel_type);

    resizer
        .resize(
            &src_image,
            &mut dst_image,
            &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3)),
        )
        .map_err(|e| TransformError::Encode(format!("resize failed: {e}")))?;

    Ok(dst_image.into_vec())
}
