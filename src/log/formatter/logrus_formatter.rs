use crate::log::color::{BOLD_SEQ, RESET_SEQ};
use crate::log::error::FormatError;
use crate::log::formatter::attributes::AttributeRenderer;
use crate::log::formatter::template::{FormatTemplate, TemplateStyle};
use crate::log::formatter::timestamp::{validate_datefmt, Timezone};
use crate::log::formatter::LogFormatter;
use crate::log::log_record::LogRecord;
use anyhow::Result;
use serde::Deserialize;
use smart_default::SmartDefault;

/// LogrusFormatter 配置
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct LogrusFormatterConfig {
    /// 是否输出 ANSI 颜色
    #[default = false]
    pub colorize: bool,

    /// 输出模板
    #[default = "%(message)s"]
    #[serde(alias = "fmt", alias = "template")]
    pub format: String,

    /// 模板占位符风格
    pub style: TemplateStyle,

    /// `asctime` 的 strftime 格式
    pub datefmt: Option<String>,

    /// `datetime`、`asctime` 使用的时区
    pub timezone: Timezone,

    /// `message` 是否也渲染为 `message=...` 属性
    #[default = false]
    pub include_message: bool,
}

/// Logrus 风格的文本格式化器
///
/// 级别渲染为 `[INFO]` 这样的短标签，其余标量字段渲染为 `key=value`，
/// 再按模板拼成一行。着色时行尾额外追加一个重置序列。
///
/// ```
/// use logrusx::log::{LogLevel, LogRecord, LogrusFormatter, LogrusFormatterConfig, Timezone};
///
/// let formatter = LogrusFormatter::new(LogrusFormatterConfig {
///     format: "%(levelname)s %(message)-10s %(user)s".to_string(),
///     timezone: Timezone::Utc,
///     ..Default::default()
/// })
/// .unwrap();
///
/// let record = LogRecord::new(LogLevel::Info, "login").with_extra("user", "alice");
/// assert_eq!(formatter.render(&record).unwrap(), "[INFO] login      user=alice");
/// ```
#[derive(Debug, Clone)]
pub struct LogrusFormatter {
    config: LogrusFormatterConfig,
    template: FormatTemplate,
    renderer: AttributeRenderer,
}

impl LogrusFormatter {
    pub fn new(config: LogrusFormatterConfig) -> Result<Self, FormatError> {
        let template = FormatTemplate::parse(&config.format, config.style)?;
        if let Some(datefmt) = &config.datefmt {
            validate_datefmt(datefmt)?;
        }

        let mut renderer =
            AttributeRenderer::new(config.colorize, config.include_message, config.timezone);
        if template.references("asctime") {
            renderer = renderer.with_asctime(config.datefmt.clone());
        }

        tracing::debug!(
            format = %config.format,
            colorize = config.colorize,
            include_message = config.include_message,
            "logrus formatter created"
        );

        Ok(Self {
            config,
            template,
            renderer,
        })
    }

    pub fn config(&self) -> &LogrusFormatterConfig {
        &self.config
    }

    /// 格式化一条记录，返回的文本不带换行
    pub fn render(&self, record: &LogRecord) -> Result<String, FormatError> {
        let rendered = self.renderer.render(record)?;
        let mut fields = rendered.fields;

        if self.config.colorize {
            fields.insert("color".to_string(), rendered.level.color().seq().to_string());
            fields.insert("color_reset".to_string(), RESET_SEQ.to_string());
            fields.insert("color_bold".to_string(), BOLD_SEQ.to_string());
        }

        let mut line = self.template.render(&fields)?;

        for block in [&record.exc_info, &record.stack_info].into_iter().flatten() {
            if !line.ends_with('\n') {
                line.push('\n');
            }
            line.push_str(block);
        }

        if self.config.colorize {
            line.push_str(RESET_SEQ);
        }

        Ok(line)
    }
}

impl LogFormatter for LogrusFormatter {
    fn format(&self, record: &LogRecord) -> Result<String> {
        Ok(self.render(record)?)
    }
}

crate::impl_try_from!(LogrusFormatterConfig => LogrusFormatter, error: FormatError);
crate::impl_box_from!(LogrusFormatter => dyn LogFormatter);
