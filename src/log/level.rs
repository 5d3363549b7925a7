use crate::log::color::Color;
use crate::log::error::FormatError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 日志级别
///
/// 只有这五个级别有短标签和颜色，其余名称在格式化时报 `UnknownLevel`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// 调试信息
    Debug = 10,
    /// 一般信息
    Info = 20,
    /// 警告信息
    Warning = 30,
    /// 错误信息
    Error = 40,
    /// 严重错误
    Critical = 50,
}

impl LogLevel {
    /// 所有级别，按严重程度升序
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    /// 数值级别（10/20/30/40/50）
    pub fn levelno(self) -> i64 {
        self as i64
    }

    /// 级别全名，同时也是 `levelname` 字段的取值
    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// 带方括号的 4 字母短标签
    pub fn short_tag(self) -> &'static str {
        match self {
            LogLevel::Debug => "[DEBU]",
            LogLevel::Info => "[INFO]",
            LogLevel::Warning => "[WARN]",
            LogLevel::Error => "[ERRO]",
            LogLevel::Critical => "[CRIT]",
        }
    }

    /// 级别对应的前景色
    pub fn color(self) -> Color {
        match self {
            LogLevel::Debug => Color::White,
            LogLevel::Info => Color::Blue,
            LogLevel::Warning => Color::Yellow,
            LogLevel::Error => Color::Red,
            LogLevel::Critical => Color::Yellow,
        }
    }
}

impl FromStr for LogLevel {
    type Err = FormatError;

    /// 严格匹配级别全名，不做大小写或别名转换
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .into_iter()
            .find(|level| level.name() == s)
            .ok_or_else(|| FormatError::UnknownLevel(s.to_string()))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<::log::Level> for LogLevel {
    /// `log` 门面多一个 Trace 级别，并入 Debug
    fn from(level: ::log::Level) -> Self {
        match level {
            ::log::Level::Error => LogLevel::Error,
            ::log::Level::Warn => LogLevel::Warning,
            ::log::Level::Info => LogLevel::Info,
            ::log::Level::Debug | ::log::Level::Trace => LogLevel::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("INFO").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARNING").unwrap(), LogLevel::Warning);
        assert_eq!(LogLevel::from_str("ERROR").unwrap(), LogLevel::Error);
        assert_eq!(LogLevel::from_str("CRITICAL").unwrap(), LogLevel::Critical);
    }

    #[test]
    fn test_log_level_from_str_unknown() {
        for name in ["TRACE", "WARN", "info", "FATAL", ""] {
            match LogLevel::from_str(name) {
                Err(FormatError::UnknownLevel(got)) => assert_eq!(got, name),
                other => panic!("expected UnknownLevel for {:?}, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_short_tags() {
        assert_eq!(LogLevel::Debug.short_tag(), "[DEBU]");
        assert_eq!(LogLevel::Info.short_tag(), "[INFO]");
        assert_eq!(LogLevel::Warning.short_tag(), "[WARN]");
        assert_eq!(LogLevel::Error.short_tag(), "[ERRO]");
        assert_eq!(LogLevel::Critical.short_tag(), "[CRIT]");
    }

    #[test]
    fn test_colors() {
        assert_eq!(LogLevel::Debug.color(), Color::White);
        assert_eq!(LogLevel::Info.color(), Color::Blue);
        assert_eq!(LogLevel::Warning.color(), Color::Yellow);
        assert_eq!(LogLevel::Error.color(), Color::Red);
        assert_eq!(LogLevel::Critical.color(), Color::Yellow);
    }

    #[test]
    fn test_levelno_and_ordering() {
        assert_eq!(LogLevel::Debug.levelno(), 10);
        assert_eq!(LogLevel::Critical.levelno(), 50);
        assert!(LogLevel::Critical > LogLevel::Error);
        assert!(LogLevel::Error > LogLevel::Warning);
        assert!(LogLevel::Warning > LogLevel::Info);
        assert!(LogLevel::Info > LogLevel::Debug);
    }

    #[test]
    fn test_display_roundtrip() {
        for level in LogLevel::ALL {
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
    }

    #[test]
    fn test_from_log_crate_level() {
        assert_eq!(LogLevel::from(::log::Level::Trace), LogLevel::Debug);
        assert_eq!(LogLevel::from(::log::Level::Debug), LogLevel::Debug);
        assert_eq!(LogLevel::from(::log::Level::Info), LogLevel::Info);
        assert_eq!(LogLevel::from(::log::Level::Warn), LogLevel::Warning);
        assert_eq!(LogLevel::from(::log::Level::Error), LogLevel::Error);
    }
}
