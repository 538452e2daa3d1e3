//! 协议错误定义

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// 无效的帧格式
    #[error("Invalid frame format: {0}")]
    InvalidFrameFormat(String),
    /// 长度错误
    #[error("Length error: {0}")]
    LengthError(String),
    /// 字段取值越界
    #[error("Field out of range: {0}")]
    FieldOutOfRange(String),
    /// 帧或记录宽度不一致
    #[error("Inconsistent {stage} width: expected {expected} bytes, found {found} bytes at index {index}")]
    InconsistentWidth {
        stage: &'static str,
        expected: usize,
        found: usize,
        index: usize,
    },
}
