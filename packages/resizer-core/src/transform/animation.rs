use std::borrow::Cow;
use std::io::Cursor;

use fast_image_resize::Resizer;
use gif::{DisposalMethod, Repeat};
use image::{RgbaImage, imageops};

use crate::errors::TransformError;
use crate::transform::decode::validate_source_dimensions;
use crate::transform::dimensions::calculate_fit_dimensions;
use crate::transform::palette::{plan9, quantize_plan9};
use crate::transform::resize::resize_rgba;

/// 減色済みの出力フレーム
#[derive(Debug, Clone)]
pub struct GifFrame {
    /// Plan 9 パレットのインデックス列（キャンバス全面）
    pub indices: Vec<u8>,
    /// 1/100 秒単位
    pub delay: u16,
    pub dispose: DisposalMethod,
}

/// アニメーション GIF を枠に収まるようリサイズする
///
/// 全フレームを論理スクリーンサイズのキャンバスに順に重ね描きし（背景への
/// 復元は行わない）、合成結果を fit リサイズしたうえで Plan 9 パレットに
/// 減色する。フレーム数・ディレイ・disposal・ループ回数は元のまま保つ。
pub fn resize_gif(input: &[u8], box_w: u32, box_h: u32) -> Result<Vec<u8>, TransformError> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options
        .read_info(Cursor::new(input))
        .map_err(|e| TransformError::Decode(format!("GIF decode failed: {e}")))?;

    let src_w = u32::from(decoder.width());
    let src_h = u32::from(decoder.height());
    validate_source_dimensions(src_w, src_h)?;

    let (dst_w, dst_h) = calculate_fit_dimensions(src_w, src_h, box_w, box_h);
    let needs_resize = (dst_w, dst_h) != (src_w, src_h);

    let mut canvas = RgbaImage::new(src_w, src_h);
    let mut resizer = Resizer::new();
    let mut frames = Vec::new();

    while let Some(frame) = decoder
        .read_next_frame()
        .map_err(|e| TransformError::Decode(format!("GIF frame decode failed: {e}")))?
    {
        let layer = RgbaImage::from_raw(
            u32::from(frame.width),
            u32::from(frame.height),
            frame.buffer.to_vec(),
        )
        .ok_or_else(|| TransformError::Decode("GIF frame buffer size mismatch".to_string()))?;

        // 透過ピクセルはキャンバスを残し、不透明ピクセルは置き換える
        imageops::overlay(&mut canvas, &layer, i64::from(frame.left), i64::from(frame.top));

        let indices = if needs_resize {
            quantize_plan9(&resize_rgba(&mut resizer, &canvas, dst_w, dst_h)?)
        } else {
            quantize_plan9(&canvas)
        };

        frames.push(GifFrame {
            indices,
            delay: frame.delay,
            dispose: frame.dispose,
        });
    }

    if frames.is_empty() {
        return Err(TransformError::Decode("GIF contains no frames".to_string()));
    }

    encode_gif(dst_w, dst_h, decoder.repeat(), &frames)
}

/// Plan 9 パレットをグローバルカラーテーブルとして GIF を書き出す
///
/// 元画像にループ指定が無かった場合（Finite(0)）は NETSCAPE 拡張を書かず、
/// 1回再生のままにする
pub fn encode_gif(
    width: u32,
    height: u32,
    repeat: Repeat,
    frames: &[GifFrame],
) -> Result<Vec<u8>, TransformError> {
    let to_u16 = |value: u32| {
        u16::try_from(value)
            .map_err(|_| TransformError::Encode(format!("GIF dimension {value} exceeds 65535")))
    };
    let (w, h) = (to_u16(width)?, to_u16(height)?);
    let color_table = plan9().to_color_table();

    let mut out = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut out, w, h, &color_table)
            .map_err(|e| TransformError::Encode(format!("GIF encode failed: {e}")))?;

        if repeat != Repeat::Finite(0) {
            encoder
                .set_repeat(repeat)
                .map_err(|e| TransformError::Encode(format!("GIF encode failed: {e}")))?;
        }

        for frame in frames {
            let gif_frame = gif::Frame {
                width: w,
                height: h,
                delay: frame.delay,
                dispose: frame.dispose,
                buffer: Cow::Borrowed(frame.indices.as_slice()),
                ..gif::Frame::default()
            };
            encoder
                .write_frame(&gif_frame)
                .map_err(|e| TransformError::Encode(format!("GIF frame encode failed: {e}")))?;
        }
        // encoder の drop でトレーラが書き込まれる
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 単色フレームを並べたテスト用 GIF を作る
    fn animated_gif(width: u16, height: u16, frames: &[([u8; 3], u16)], repeat: Option<Repeat>) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = gif::Encoder::new(&mut out, width, height, &[]).unwrap();
            if let Some(repeat) = repeat {
                encoder.set_repeat(repeat).unwrap();
            }
            for &(rgb, delay) in frames {
                let mut pixels: Vec<u8> = (0..usize::from(width) * usize::from(height))
                    .flat_map(|_| [rgb[0], rgb[1], rgb[2], 255])
                    .collect();
                let mut frame = gif::Frame::from_rgba_speed(width, height, &mut pixels, 10);
                frame.delay = delay;
                frame.dispose = DisposalMethod::Keep;
                encoder.write_frame(&frame).unwrap();
            }
        }
        out
    }

    struct DecodedGif {
        width: u16,
        height: u16,
        repeat: Repeat,
        frames: Vec<(u16, DisposalMethod, usize)>,
    }

    fn inspect(data: &[u8]) -> DecodedGif {
        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::Indexed);
        let mut decoder = options.read_info(Cursor::new(data)).unwrap();
        let palette_len = decoder.global_palette().map(|p| p.len() / 3).unwrap_or(0);

        let mut frames = Vec::new();
        while let Some(frame) = decoder.read_next_frame().unwrap() {
            let colors = frame.palette.as_ref().map(|p| p.len() / 3).unwrap_or(palette_len);
            frames.push((frame.delay, frame.dispose, colors));
        }

        DecodedGif {
            width: decoder.width(),
            height: decoder.height(),
            repeat: decoder.repeat(),
            frames,
        }
    }

    #[test]
    fn test_resize_three_frame_gif() {
        let source = animated_gif(
            200,
            100,
            &[([255, 0, 0], 10), ([0, 255, 0], 20), ([0, 0, 255], 30)],
            Some(Repeat::Infinite),
        );

        let output = resize_gif(&source, 100, 100).unwrap();
        let decoded = inspect(&output);

        assert_eq!((decoded.width, decoded.height), (100, 50));
        assert_eq!(decoded.frames.len(), 3);
        let delays: Vec<u16> = decoded.frames.iter().map(|f| f.0).collect();
        assert_eq!(delays, vec![10, 20, 30]);
        assert!(decoded.frames.iter().all(|f| f.1 == DisposalMethod::Keep));
        assert!(decoded.frames.iter().all(|f| f.2 <= 256));
        assert_eq!(decoded.repeat, Repeat::Infinite);
    }

    #[test]
    fn test_play_once_gif_stays_play_once() {
        let source = animated_gif(40, 40, &[([255, 255, 255], 5), ([0, 0, 0], 5)], None);

        let output = resize_gif(&source, 20, 20).unwrap();
        let decoded = inspect(&output);

        assert_eq!(decoded.frames.len(), 2);
        assert_eq!(decoded.repeat, Repeat::Finite(0));
    }

    #[test]
    fn test_small_gif_is_not_enlarged() {
        let source = animated_gif(16, 8, &[([0, 0, 0], 7)], None);

        let output = resize_gif(&source, 100, 100).unwrap();
        let decoded = inspect(&output);

        assert_eq!((decoded.width, decoded.height), (16, 8));
        assert_eq!(decoded.frames[0].0, 7);
    }

    #[test]
    fn test_later_frames_draw_over_canvas() {
        // 2フレーム目は左半分だけの不透明パッチ
        let mut out = Vec::new();
        {
            let mut encoder = gif::Encoder::new(&mut out, 4, 2, &[]).unwrap();
            let mut white: Vec<u8> = [255u8, 255, 255, 255].repeat(8);
            encoder
                .write_frame(&gif::Frame::from_rgba_speed(4, 2, &mut white, 10))
                .unwrap();
            let mut black: Vec<u8> = [0u8, 0, 0, 255].repeat(4);
            encoder
                .write_frame(&gif::Frame::from_rgba_speed(2, 2, &mut black, 10))
                .unwrap();
        }

        let output = resize_gif(&out, 4, 2).unwrap();

        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::Indexed);
        let mut decoder = options.read_info(Cursor::new(&output)).unwrap();
        decoder.read_next_frame().unwrap().unwrap();
        let second = decoder.read_next_frame().unwrap().unwrap();

        // 左半分は黒（index 0）、右半分は1フレーム目の白（index 255）が残る
        assert_eq!(second.buffer.as_ref(), &[0, 0, 255, 255, 0, 0, 255, 255]);
    }

    #[test]
    fn test_corrupt_gif_is_decode_error() {
        let result = resize_gif(b"GIF89a\x10\x00", 10, 10);
        assert!(matches!(result, Err(TransformError::Decode(_))));
    }
}
