/// 縮小倍率を計算する（拡大はしない）
///
/// アスペクト比を維持しつつ枠に収まる最大の倍率を返す（最大1.0）
fn calculate_scale_factor(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> f64 {
    let scale_w = f64::from(box_w) / f64::from(src_w);
    let scale_h = f64::from(box_h) / f64::from(src_h);

    // 制約の厳しい軸の倍率を採用
    scale_w.min(scale_h).min(1.0)
}

/// 倍率を適用して新しい寸法を計算する
fn apply_scale(src_w: u32, src_h: u32, scale: f64) -> (u32, u32) {
    let new_w = (f64::from(src_w) * scale).round() as u32;
    let new_h = (f64::from(src_h) * scale).round() as u32;

    // 最小1pxを保証
    (new_w.max(1), new_h.max(1))
}

/// Fit モードの寸法を計算する
///
/// 結果は必ず `box_w × box_h` に収まり、元のアスペクト比を保つ。
/// 既に枠内に収まっている画像はそのままのサイズを返す。
pub fn calculate_fit_dimensions(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> (u32, u32) {
    if src_w <= box_w && src_h <= box_h {
        return (src_w, src_h);
    }

    let scale = calculate_scale_factor(src_w, src_h, box_w, box_h);
    let (w, h) = apply_scale(src_w, src_h, scale);

    // 丸めで枠をはみ出さないようにする
    (w.min(box_w), h.min(box_h))
}
