use std::sync::OnceLock;

use image::imageops::{self, ColorMap};
use image::{Rgb, RgbImage, RgbaImage};

/// Plan 9 の 256 色固定パレット
///
/// 4段階の R/G/B と明度成分 v の組み合わせで構成される（rgbv カラーマップ）。
pub struct Plan9Palette {
    colors: [[u8; 3]; 256],
}

static PLAN9: OnceLock<Plan9Palette> = OnceLock::new();

/// プロセス全体で共有するパレットを取得する
pub fn plan9() -> &'static Plan9Palette {
    PLAN9.get_or_init(Plan9Palette::build)
}

impl Plan9Palette {
    fn build() -> Self {
        let mut colors = [[0u8; 3]; 256];

        for r in 0i32..4 {
            for v in 0i32..4 {
                let base = (r * 64 + v * 16) as usize;
                let mut j = v - r;
                for g in 0i32..4 {
                    for b in 0i32..4 {
                        let den = r.max(g).max(b);
                        let color = if den == 0 {
                            let c = (0x11 * v) as u8;
                            [c, c, c]
                        } else {
                            let num = 17 * (4 * den + v);
                            [
                                (r * num / den) as u8,
                                (g * num / den) as u8,
                                (b * num / den) as u8,
                            ]
                        };
                        colors[base + (j & 0x0f) as usize] = color;
                        j += 1;
                    }
                }
            }
        }

        Self { colors }
    }

    pub fn colors(&self) -> &[[u8; 3]; 256] {
        &self.colors
    }

    /// GIF のカラーテーブル形式（RGBRGB...）に展開する
    pub fn to_color_table(&self) -> Vec<u8> {
        self.colors.iter().flatten().copied().collect()
    }

    fn nearest(&self, color: [u8; 3]) -> usize {
        let mut best = 0;
        let mut best_dist = u32::MAX;

        for (index, candidate) in self.colors.iter().enumerate() {
            let dist: u32 = color
                .iter()
                .zip(candidate)
                .map(|(&a, &b)| {
                    let d = i32::from(a) - i32::from(b);
                    (d * d) as u32
                })
                .sum();
            if dist < best_dist {
                best = index;
                best_dist = dist;
                if dist == 0 {
                    break;
                }
            }
        }

        best
    }
}

impl ColorMap for Plan9Palette {
    type Color = Rgb<u8>;

    fn index_of(&self, color: &Rgb<u8>) -> usize {
        self.nearest(color.0)
    }

    fn map_color(&self, color: &mut Rgb<u8>) {
        *color = Rgb(self.colors[self.nearest(color.0)]);
    }
}

/// RGBA フレームを Plan 9 パレットのインデックス列に変換する
///
/// 透過ピクセルは黒の上に合成してから Floyd–Steinberg ディザリングで減色する。
pub fn quantize_plan9(frame: &RgbaImage) -> Vec<u8> {
    let palette = plan9();

    let mut rgb = RgbImage::from_fn(frame.width(), frame.height(), |x, y| {
        let [r, g, b, a] = frame.get_pixel(x, y).0;
        let a = u16::from(a);
        Rgb([
            (u16::from(r) * a / 255) as u8,
            (u16::from(g) * a / 255) as u8,
            (u16::from(b) * a / 255) as u8,
        ])
    });

    imageops::dither(&mut rgb, palette);
    imageops::index_colors(&rgb, palette).into_raw()
}
