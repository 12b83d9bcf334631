pub mod animation;
pub mod decode;
pub mod dimensions;
pub mod encode;
pub mod orientation;
pub mod palette;
pub mod params;
pub mod resize;

pub use animation::resize_gif;
pub use decode::{decode_image, sniff_format};
pub use dimensions::calculate_fit_dimensions;
pub use encode::encode_image;
pub use orientation::Orientation;
pub use params::{OutputFormat, StillFormat, TransformParams};
pub use resize::resize_image;

use bytes::Bytes;

use crate::errors::TransformError;
use crate::validation::validate_params;

/// 画像バイト列を枠に収まるようリサイズし、元と同じフォーマットで再エンコードする
///
/// (変換後バイト列, フォーマット) を返す。
pub fn transform(
    input: &[u8],
    params: &TransformParams,
) -> Result<(Bytes, OutputFormat), TransformError> {
    validate_params(params.width, params.height)?;

    let format = sniff_format(input)?;

    let output = match format {
        OutputFormat::Gif => resize_gif(input, params.width, params.height)?,
        OutputFormat::Jpeg => resize_still(input, StillFormat::Jpeg, params)?,
        OutputFormat::Png => resize_still(input, StillFormat::Png, params)?,
    };

    Ok((Bytes::from(output), format))
}

fn resize_still(
    input: &[u8],
    format: StillFormat,
    params: &TransformParams,
) -> Result<Vec<u8>, TransformError> {
    let img = decode_image(input, format)?;

    let (src_w, src_h) = (img.width(), img.height());
    let (dst_w, dst_h) = calculate_fit_dimensions(src_w, src_h, params.width, params.height);

    let resized = if (dst_w, dst_h) != (src_w, src_h) {
        resize_image(&img, dst_w, dst_h)?
    } else {
        img
    };

    encode_image(&resized, format)
}
