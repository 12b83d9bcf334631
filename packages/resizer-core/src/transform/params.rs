use std::fmt;

/// 対応フォーマット（出力は常に入力と同じフォーマット）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Gif,
}

impl OutputFormat {
    /// スニッフィング結果から OutputFormat を作成（非対応なら None）
    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Gif => Some(Self::Gif),
            _ => None,
        }
    }

    /// Content-Type を取得
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// フレーム単位で処理しない静止画フォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StillFormat {
    Jpeg,
    Png,
}

impl StillFormat {
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
        }
    }
}

impl From<StillFormat> for OutputFormat {
    fn from(format: StillFormat) -> Self {
        match format {
            StillFormat::Jpeg => Self::Jpeg,
            StillFormat::Png => Self::Png,
        }
    }
}

/// 変換パラメータ（fit する枠のサイズ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformParams {
    pub width: u32,
    pub height: u32,
}

impl TransformParams {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_image_format() {
        assert_eq!(
            OutputFormat::from_image_format(image::ImageFormat::Jpeg),
            Some(OutputFormat::Jpeg)
        );
        assert_eq!(
            OutputFormat::from_image_format(image::ImageFormat::Png),
            Some(OutputFormat::Png)
        );
        assert_eq!(
            OutputFormat::from_image_format(image::ImageFormat::Gif),
            Some(OutputFormat::Gif)
        );
        assert_eq!(OutputFormat::from_image_format(image::ImageFormat::WebP), None);
        assert_eq!(OutputFormat::from_image_format(image::ImageFormat::Bmp), None);
    }

    #[test]
    fn test_content_type() {
        assert_eq!(OutputFormat::Jpeg.content_type(), "image/jpeg");
        assert_eq!(OutputFormat::Png.content_type(), "image/png");
        assert_eq!(OutputFormat::Gif.content_type(), "image/gif");
    }

    #[test]
    fn test_still_format_mapping() {
        assert_eq!(StillFormat::Jpeg.image_format(), image::ImageFormat::Jpeg);
        assert_eq!(OutputFormat::from(StillFormat::Png), OutputFormat::Png);
    }

    #[test]
    fn test_display_tag() {
        assert_eq!(OutputFormat::Jpeg.to_string(), "jpeg");
        assert_eq!(OutputFormat::Gif.to_string(), "gif");
    }
}
