use crate::log::color::{Color, RESET_SEQ};
use crate::log::error::FormatError;
use crate::log::formatter::timestamp::{self, Timezone};
use crate::log::level::LogLevel;
use crate::log::log_record::{FieldRef, LogRecord};
use std::collections::HashMap;
use std::fmt::{Display, Write};

/// 不参与属性渲染的字段：原始消息模板、位置参数、异常、调用栈，以及单独处理的级别
pub const PROTECTED_FIELDS: [&str; 5] = ["msg", "args", "exc_info", "stack_info", "levelname"];

/// `__name__` 形式的内部字段名
pub fn is_internal_name(name: &str) -> bool {
    name.len() >= 4 && name.starts_with("__") && name.ends_with("__")
}

/// 一次渲染的结果
#[derive(Debug, Clone)]
pub struct RenderedFields {
    /// 已解析的级别
    pub level: LogLevel,
    /// 字段名 → 模板代入文本
    pub fields: HashMap<String, String>,
}

/// 属性渲染器
///
/// 把记录的每个标量字段转成 `key=value`，着色时只给 key 上色。
/// 结果写入新的字段表，记录本身只读
#[derive(Debug, Clone)]
pub struct AttributeRenderer {
    colorize: bool,
    include_message: bool,
    timezone: Timezone,
    datefmt: Option<String>,
    with_asctime: bool,
}

impl AttributeRenderer {
    pub fn new(colorize: bool, include_message: bool, timezone: Timezone) -> Self {
        Self {
            colorize,
            include_message,
            timezone,
            datefmt: None,
            with_asctime: false,
        }
    }

    /// 额外计算 `asctime` 字段，以原文代入，不渲染为属性
    pub fn with_asctime(mut self, datefmt: Option<String>) -> Self {
        self.with_asctime = true;
        self.datefmt = datefmt;
        self
    }

    /// 字段名是否受保护
    pub fn is_protected(&self, name: &str) -> bool {
        PROTECTED_FIELDS.contains(&name) || (name == "message" && !self.include_message)
    }

    /// 字段是否渲染为属性
    pub fn is_attribute(&self, name: &str, value: &FieldRef<'_>) -> bool {
        !is_internal_name(name) && !self.is_protected(name) && value.is_scalar()
    }

    /// 渲染单个 `key=value`
    pub fn token(&self, name: &str, value: &dyn Display, color: Color) -> String {
        let mut token = String::with_capacity(name.len() + 16);
        // String 的 fmt::Write 不会失败
        if self.colorize {
            let _ = write!(token, "{}{}{}={}", color.seq(), name, RESET_SEQ, value);
        } else {
            let _ = write!(token, "{}={}", name, value);
        }
        token
    }

    /// 级别短标签，着色时整体上色
    pub fn level_tag(&self, level: LogLevel) -> String {
        if self.colorize {
            level.color().paint(level.short_tag())
        } else {
            level.short_tag().to_string()
        }
    }

    /// 渲染整条记录
    ///
    /// 未知级别直接报错；非标量字段不报错，只以原文代入模板
    pub fn render(&self, record: &LogRecord) -> Result<RenderedFields, FormatError> {
        let level: LogLevel = record.levelname.parse()?;
        let color = level.color();

        let record_fields = record.fields();
        let mut fields = HashMap::with_capacity(record_fields.len() + 6);

        for (name, value) in record_fields {
            let text = if self.is_attribute(name, &value) {
                self.token(name, &value, color)
            } else {
                if !value.is_scalar() && !self.is_protected(name) {
                    tracing::trace!(field = name, "skipping non-scalar attribute");
                }
                value.to_string()
            };
            // extra 中的同名字段覆盖固定字段
            fields.insert(name.to_string(), text);
        }

        let datetime = timestamp::format_datetime(record.created, self.timezone)?;
        fields.insert("datetime".to_string(), self.token("datetime", &datetime, color));

        if self.with_asctime {
            let asctime =
                timestamp::format_asctime(record.created, self.timezone, self.datefmt.as_deref())?;
            // 与 message 一样在属性之后计算，只代入原文
            fields.insert("asctime".to_string(), asctime);
        }

        fields.insert("levelname".to_string(), self.level_tag(level));

        Ok(RenderedFields { level, fields })
    }
}
