use crate::errors::{PipelineError, TransformError};

/// クエリ文字列の寸法を正の整数として解析する
///
/// エラーには実際に失敗したフィールド名（width / height）を載せる
pub fn parse_dimension(field: &'static str, raw: &str) -> Result<u32, PipelineError> {
    let value: u32 = raw
        .parse()
        .map_err(|e| PipelineError::invalid(field, format!("{raw:?} is not a positive integer ({e})")))?;

    if value == 0 {
        return Err(PipelineError::invalid(field, "must be greater than 0"));
    }

    Ok(value)
}

/// 変換パラメータを検証する
pub fn validate_params(width: u32, height: u32) -> Result<(), TransformError> {
    if width == 0 {
        return Err(TransformError::InvalidParams(format!(
            "width must be positive, got {width}"
        )));
    }

    if height == 0 {
        return Err(TransformError::InvalidParams(format!(
            "height must be positive, got {height}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing_field(result: Result<u32, PipelineError>) -> &'static str {
        match result {
            Err(PipelineError::InvalidParameter { field, .. }) => field,
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_dimensions() {
        assert_eq!(parse_dimension("width", "400").unwrap(), 400);
        assert_eq!(parse_dimension("height", "1").unwrap(), 1);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(failing_field(parse_dimension("width", "0")), "width");
        assert_eq!(failing_field(parse_dimension("width", "-5")), "width");
        assert_eq!(failing_field(parse_dimension("width", "abc")), "width");
        assert_eq!(failing_field(parse_dimension("width", "")), "width");
        assert_eq!(failing_field(parse_dimension("height", "1.5")), "height");
        assert_eq!(failing_field(parse_dimension("height", "99999999999")), "height");
    }

    #[test]
    fn test_validate_params() {
        assert!(validate_params(800, 600).is_ok());
        assert!(validate_params(0, 600).is_err());
        assert!(validate_params(800, 0).is_err());
    }
}
