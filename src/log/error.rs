use thiserror::Error;

/// 格式化错误
///
/// 都属于配置或调用方的编程错误，原样返回给调用方，不做重试或降级输出
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("unknown log level: {0}")]
    UnknownLevel(String),

    #[error("format template references missing field: {0}")]
    MissingField(String),

    #[error("invalid format template at byte {position}: {reason}")]
    Template { position: usize, reason: String },

    #[error("timestamp out of range: {0}")]
    InvalidTimestamp(f64),

    #[error("invalid date format: {0}")]
    DateFormat(String),
}

impl FormatError {
    pub(crate) fn template(position: usize, reason: impl Into<String>) -> Self {
        FormatError::Template {
            position,
            reason: reason.into(),
        }
    }
}
