use crate::cfg::{create_trait_from_type_options, register_trait, TypeOptions};
use crate::log::formatter::logrus_formatter::{LogrusFormatter, LogrusFormatterConfig};
use crate::log::formatter::LogFormatter;
use anyhow::Result;

/// 注册所有 Formatter 实现
pub fn register_formatters() -> Result<()> {
    register_trait::<LogrusFormatter, dyn LogFormatter, LogrusFormatterConfig>("LogrusFormatter")?;
    Ok(())
}

/// 从 TypeOptions 创建 Formatter
pub fn create_formatter_from_options(options: &TypeOptions) -> Result<Box<dyn LogFormatter>> {
    create_trait_from_type_options(options)
}
