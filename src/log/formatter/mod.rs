mod attributes;
mod core;
mod logrus_formatter;
mod registry;
mod template;
mod timestamp;

pub use attributes::{is_internal_name, AttributeRenderer, RenderedFields, PROTECTED_FIELDS};
pub use self::core::LogFormatter;
pub use logrus_formatter::{LogrusFormatter, LogrusFormatterConfig};
pub use registry::{create_formatter_from_options, register_formatters};
pub use template::{FormatTemplate, TemplateStyle};
pub use timestamp::{format_asctime, format_datetime, Timezone, DATETIME_FORMAT};
