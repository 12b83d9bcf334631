use crate::constants::MAX_CONTENT_ID_LEN;
use crate::errors::PipelineError;

/// コンテンツ ID を検証する
///
/// 素の CID と `/ipfs/<cid>/path` 形式の両方を許可し、
/// パストラバーサルや不正な文字を含むものは弾く
pub fn validate_content_id(content_id: &str) -> Result<(), PipelineError> {
    if content_id.is_empty() {
        return Err(PipelineError::invalid("cid", "content id is empty"));
    }

    if content_id.len() > MAX_CONTENT_ID_LEN {
        return Err(PipelineError::invalid(
            "cid",
            format!("content id is too long (max {MAX_CONTENT_ID_LEN})"),
        ));
    }

    if content_id.split('/').any(|segment| segment == "..") || content_id.contains('\\') {
        return Err(PipelineError::invalid("cid", "path traversal detected"));
    }

    // 許可された文字のみ（英数字、ハイフン、アンダースコア、ドット、スラッシュ）
    if !content_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
    {
        return Err(PipelineError::invalid("cid", "invalid characters in content id"));
    }

    Ok(())
}
