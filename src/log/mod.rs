//! 日志格式化模块
//!
//! 把结构化的日志记录渲染为 logrus 风格的单行文本，可选 ANSI 颜色。
//! 只负责格式化，记录的产生、过滤和输出由外部日志框架完成。
//!
//! # 输出示例
//!
//! ```text
//! [INFO] info message         thread_name=main process_name=app datetime=2017-03-21T11:58:48.132263
//! [WARN] warning message      thread_name=main process_name=app datetime=2017-03-21T11:58:48.132395
//! ```
//!
//! # 快速开始
//!
//! ```rust
//! use logrusx::cfg::TypeOptions;
//! use logrusx::log::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     register_formatters()?;
//!
//!     let options = TypeOptions::from_json(r#"
//!         {
//!             type: "LogrusFormatter",
//!             options: {
//!                 colorize: false,
//!                 format: "%(levelname)s %(message)-20s %(thread_name)s %(datetime)s",
//!             }
//!         }
//!     "#)?;
//!     let formatter = create_formatter_from_options(&options)?;
//!
//!     let line = formatter.format(&LogRecord::new(LogLevel::Info, "info message"))?;
//!     assert!(line.starts_with("[INFO] info message"));
//!     Ok(())
//! }
//! ```

pub mod color;
pub mod error;
pub mod formatter;
pub mod level;
pub mod log_record;

pub use color::{Color, BOLD_SEQ, RESET_SEQ};
pub use error::FormatError;
pub use formatter::{
    create_formatter_from_options, register_formatters, AttributeRenderer, FormatTemplate,
    LogFormatter, LogrusFormatter, LogrusFormatterConfig, TemplateStyle, Timezone,
};
pub use level::LogLevel;
pub use log_record::{FieldRef, FieldValue, LogRecord};
