use crate::log::level::LogLevel;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// 进程内首次使用日志记录的时刻，`relative_created` 以它为起点
static START_TIME: Lazy<f64> = Lazy::new(unix_now);

/// 当前可执行文件名
static PROCESS_NAME: Lazy<String> = Lazy::new(|| {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "main".to_string())
});

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// 浮点数取最短表示，有限的整数值保留 `.0`
fn write_float(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 {
        write!(f, "{}.0", n)
    } else {
        write!(f, "{}", n)
    }
}

/// 字段值
///
/// 字符串、整数、浮点数、布尔是标量，会被渲染为 `key=value`；
/// `Opaque` 只能原样代入模板，永远不会成为属性
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    /// 任意结构化数据（异常对象、位置参数、自定义结构体等）
    Opaque(Value),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => f.write_str(s),
            FieldValue::I64(n) => write!(f, "{}", n),
            FieldValue::U64(n) => write!(f, "{}", n),
            FieldValue::F64(n) => write_float(f, *n),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Opaque(v) => write!(f, "{}", v),
        }
    }
}

impl FieldValue {
    /// 从任意实现了 Serialize 的结构体创建不透明字段值，序列化失败时返回错误
    pub fn from_struct<T: serde::Serialize>(value: T) -> serde_json::Result<Self> {
        serde_json::to_value(value).map(FieldValue::Opaque)
    }

    fn as_field_ref(&self) -> FieldRef<'_> {
        match self {
            FieldValue::String(s) => FieldRef::Str(s),
            FieldValue::I64(n) => FieldRef::I64(*n),
            FieldValue::U64(n) => FieldRef::U64(*n),
            FieldValue::F64(n) => FieldRef::F64(*n),
            FieldValue::Bool(b) => FieldRef::Bool(*b),
            FieldValue::Opaque(v) => FieldRef::Json(v),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::I64(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::I64(n as i64)
    }
}

impl From<u64> for FieldValue {
    fn from(n: u64) -> Self {
        FieldValue::U64(n)
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::U64(n as u64)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::F64(n)
    }
}

impl From<f32> for FieldValue {
    fn from(n: f32) -> Self {
        FieldValue::F64(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        FieldValue::Opaque(v)
    }
}

/// 记录字段的借用视图
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    Str(&'a str),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Json(&'a Value),
    List(&'a [FieldValue]),
}

impl FieldRef<'_> {
    /// 是否可以渲染为属性
    pub fn is_scalar(&self) -> bool {
        !matches!(self, FieldRef::Json(_) | FieldRef::List(_))
    }
}

impl fmt::Display for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Str(s) => f.write_str(s),
            FieldRef::I64(n) => write!(f, "{}", n),
            FieldRef::U64(n) => write!(f, "{}", n),
            FieldRef::F64(n) => write_float(f, *n),
            FieldRef::Bool(b) => write!(f, "{}", b),
            FieldRef::Json(v) => write!(f, "{}", v),
            FieldRef::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// 日志记录
///
/// 由外部日志框架构造并持有，格式化器只读取，从不修改
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// logger 名称
    pub name: String,
    /// 级别名称，可能是未知级别
    pub levelname: String,
    /// 数值级别
    pub levelno: i64,
    /// 原始消息模板
    pub msg: String,
    /// 消息模板的位置参数
    pub args: Vec<FieldValue>,
    /// 最终消息
    pub message: String,
    /// 创建时间（Unix 秒，带小数）
    pub created: f64,
    /// `created` 的毫秒部分
    pub msecs: f64,
    /// 相对首次记录的毫秒数
    pub relative_created: f64,
    /// 源文件路径
    pub pathname: Option<String>,
    /// 源文件名
    pub filename: Option<String>,
    /// 模块路径
    pub module: Option<String>,
    /// 行号
    pub lineno: Option<u32>,
    /// 函数名
    pub func_name: Option<String>,
    /// 线程 ID
    pub thread: String,
    /// 线程名
    pub thread_name: String,
    /// 进程 ID
    pub process: u32,
    /// 进程名
    pub process_name: String,
    /// 已格式化的异常信息
    pub exc_info: Option<String>,
    /// 已格式化的调用栈
    pub stack_info: Option<String>,
    /// 调用方附加的自定义字段，按插入顺序
    pub extra: Vec<(String, FieldValue)>,
}

impl LogRecord {
    /// 创建新的日志记录，填充时间、线程和进程信息
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        let message = message.into();
        let current = std::thread::current();
        let start = *START_TIME;
        let created = unix_now();

        Self {
            name: "root".to_string(),
            levelname: level.name().to_string(),
            levelno: level.levelno(),
            msg: message.clone(),
            args: Vec::new(),
            message,
            created,
            msecs: msecs_of(created),
            relative_created: (created - start) * 1000.0,
            pathname: None,
            filename: None,
            module: None,
            lineno: None,
            func_name: None,
            thread: format!("{:?}", current.id()),
            thread_name: current.name().unwrap_or("<unnamed>").to_string(),
            process: std::process::id(),
            process_name: PROCESS_NAME.clone(),
            exc_info: None,
            stack_info: None,
            extra: Vec::new(),
        }
    }

    /// 设置 logger 名称
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 直接设置级别名称，不校验是否为已知级别
    pub fn with_level_name(mut self, levelname: impl Into<String>) -> Self {
        self.levelname = levelname.into();
        if let Ok(level) = self.levelname.parse::<LogLevel>() {
            self.levelno = level.levelno();
        }
        self
    }

    /// 设置位置信息（文件和行号）
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        let file = file.into();
        self.filename = Path::new(&file)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        self.pathname = Some(file);
        self.lineno = Some(line);
        self
    }

    /// 设置模块路径
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// 设置函数名
    pub fn with_func_name(mut self, func_name: impl Into<String>) -> Self {
        self.func_name = Some(func_name.into());
        self
    }

    /// 覆盖创建时间，同时重算 msecs 和 relative_created
    pub fn with_created(mut self, created: f64) -> Self {
        self.created = created;
        self.msecs = msecs_of(created);
        self.relative_created = (created - *START_TIME) * 1000.0;
        self
    }

    /// 设置消息模板和位置参数
    pub fn with_args(
        mut self,
        msg: impl Into<String>,
        args: impl IntoIterator<Item = FieldValue>,
    ) -> Self {
        self.msg = msg.into();
        self.args = args.into_iter().collect();
        self
    }

    /// 设置异常信息
    pub fn with_exc_info(mut self, exc_info: impl Into<String>) -> Self {
        self.exc_info = Some(exc_info.into());
        self
    }

    /// 设置调用栈信息
    pub fn with_stack_info(mut self, stack_info: impl Into<String>) -> Self {
        self.stack_info = Some(stack_info.into());
        self
    }

    /// 添加自定义字段
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// 记录的全部字段：先是固定字段，再是 extra，值为 None 的可选字段不出现
    pub fn fields(&self) -> Vec<(&str, FieldRef<'_>)> {
        let mut fields: Vec<(&str, FieldRef<'_>)> = Vec::with_capacity(20 + self.extra.len());

        fields.push(("name", FieldRef::Str(&self.name)));
        fields.push(("levelname", FieldRef::Str(&self.levelname)));
        fields.push(("levelno", FieldRef::I64(self.levelno)));
        fields.push(("msg", FieldRef::Str(&self.msg)));
        fields.push(("args", FieldRef::List(&self.args)));
        fields.push(("message", FieldRef::Str(&self.message)));
        fields.push(("created", FieldRef::F64(self.created)));
        fields.push(("msecs", FieldRef::F64(self.msecs)));
        fields.push(("relative_created", FieldRef::F64(self.relative_created)));
        if let Some(pathname) = &self.pathname {
            fields.push(("pathname", FieldRef::Str(pathname)));
        }
        if let Some(filename) = &self.filename {
            fields.push(("filename", FieldRef::Str(filename)));
        }
        if let Some(module) = &self.module {
            fields.push(("module", FieldRef::Str(module)));
        }
        if let Some(lineno) = self.lineno {
            fields.push(("lineno", FieldRef::U64(lineno as u64)));
        }
        if let Some(func_name) = &self.func_name {
            fields.push(("func_name", FieldRef::Str(func_name)));
        }
        fields.push(("thread", FieldRef::Str(&self.thread)));
        fields.push(("thread_name", FieldRef::Str(&self.thread_name)));
        fields.push(("process", FieldRef::U64(self.process as u64)));
        fields.push(("process_name", FieldRef::Str(&self.process_name)));
        if let Some(exc_info) = &self.exc_info {
            fields.push(("exc_info", FieldRef::Str(exc_info)));
        }
        if let Some(stack_info) = &self.stack_info {
            fields.push(("stack_info", FieldRef::Str(stack_info)));
        }

        fields.extend(
            self.extra
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_field_ref())),
        );
        fields
    }
}

impl From<&::log::Record<'_>> for LogRecord {
    fn from(record: &::log::Record<'_>) -> Self {
        let message = record.args().to_string();
        let msg = record
            .args()
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| message.clone());

        let mut converted = LogRecord::new(record.level().into(), message)
            .with_name(record.target());
        converted.msg = msg;
        if let Some(module) = record.module_path() {
            converted = converted.with_module(module);
        }
        if let (Some(file), Some(line)) = (record.file(), record.line()) {
            converted = converted.with_location(file, line);
        }
        converted
    }
}

fn msecs_of(created: f64) -> f64 {
    (created - created.trunc()) * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_record_new() {
        let record = LogRecord::new(LogLevel::Info, "test message");

        assert_eq!(record.levelname, "INFO");
        assert_eq!(record.levelno, 20);
        assert_eq!(record.message, "test message");
        assert_eq!(record.msg, "test message");
        assert!(record.args.is_empty());
        assert!(record.module.is_none());
        assert!(record.lineno.is_none());
        assert!(record.created > 0.0);
        assert!(record.relative_created >= 0.0);
        assert!(!record.thread.is_empty());
        assert_eq!(record.process, std::process::id());
        assert!(!record.process_name.is_empty());
    }

    #[test]
    fn test_with_location_splits_filename() {
        let record =
            LogRecord::new(LogLevel::Debug, "message").with_location("src/log/level.rs", 42);

        assert_eq!(record.pathname.as_deref(), Some("src/log/level.rs"));
        assert_eq!(record.filename.as_deref(), Some("level.rs"));
        assert_eq!(record.lineno, Some(42));
    }

    #[test]
    fn test_with_created_recomputes_msecs() {
        let record = LogRecord::new(LogLevel::Info, "m").with_created(1.25);
        assert_eq!(record.created, 1.25);
        assert!((record.msecs - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_with_level_name() {
        let record = LogRecord::new(LogLevel::Info, "m").with_level_name("ERROR");
        assert_eq!(record.levelname, "ERROR");
        assert_eq!(record.levelno, 40);

        let record = LogRecord::new(LogLevel::Info, "m").with_level_name("TRACE");
        assert_eq!(record.levelname, "TRACE");
        assert_eq!(record.levelno, 20);
    }

    #[test]
    fn test_fields_order_and_optional_fields() {
        let record = LogRecord::new(LogLevel::Warning, "warn")
            .with_module("app::db")
            .with_extra("user_id", 7)
            .with_extra("payload", serde_json::json!({ "k": 1 }));

        let fields = record.fields();
        let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();

        assert_eq!(names[0], "name");
        assert_eq!(names[1], "levelname");
        assert!(names.contains(&"module"));
        assert!(!names.contains(&"lineno"));
        assert!(!names.contains(&"exc_info"));
        assert_eq!(&names[names.len() - 2..], &["user_id", "payload"]);

        let (_, user_id) = fields[fields.len() - 2];
        assert_eq!(user_id, FieldRef::I64(7));
        assert!(user_id.is_scalar());
        let (_, payload) = fields[fields.len() - 1];
        assert!(!payload.is_scalar());
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::from("hello").to_string(), "hello");
        assert_eq!(FieldValue::from(42).to_string(), "42");
        assert_eq!(FieldValue::from(100u64).to_string(), "100");
        assert_eq!(FieldValue::from(1.1).to_string(), "1.1");
        assert_eq!(FieldValue::from(true).to_string(), "true");
        assert_eq!(
            FieldValue::from(serde_json::json!({ "a": 1 })).to_string(),
            r#"{"a":1}"#
        );
    }

    #[test]
    fn test_from_struct_error() {
        // 非字符串 key 的 map 无法转成 JSON 对象
        let mut map = std::collections::BTreeMap::new();
        map.insert(vec![1u8], "v");
        assert!(FieldValue::from_struct(map).is_err());
    }

    #[test]
    fn test_whole_float_display() {
        assert_eq!(FieldValue::from(0.0).to_string(), "0.0");
        assert_eq!(FieldValue::from(1.0).to_string(), "1.0");
        assert_eq!(FieldValue::from(-3.0).to_string(), "-3.0");
        assert_eq!(FieldValue::from(1e20).to_string(), "100000000000000000000.0");
        assert_eq!(FieldValue::from(0.25).to_string(), "0.25");
        assert_eq!(FieldValue::from(f64::NAN).to_string(), "NaN");
        assert_eq!(FieldValue::from(f64::INFINITY).to_string(), "inf");
        assert_eq!(FieldRef::F64(12.0).to_string(), "12.0");
    }

    #[test]
    fn test_list_display() {
        let args = vec![FieldValue::from("alice"), FieldValue::from(3)];
        assert_eq!(FieldRef::List(&args).to_string(), "[alice, 3]");
        assert_eq!(FieldRef::List(&[]).to_string(), "[]");
    }

    #[test]
    fn test_from_struct() {
        #[derive(serde::Serialize)]
        struct Request {
            endpoint: String,
            duration_ms: u64,
        }

        let value = FieldValue::from_struct(Request {
            endpoint: "/api/users".to_string(),
            duration_ms: 123,
        })
        .unwrap();
        match value {
            FieldValue::Opaque(v) => {
                assert_eq!(v["endpoint"], "/api/users");
                assert_eq!(v["duration_ms"], 123);
            }
            other => panic!("expected opaque value, got {:?}", other),
        }
    }

    #[test]
    fn test_from_log_crate_record() {
        // format_args! 的临时值只在当前语句内有效
        let converted = LogRecord::from(
            &::log::Record::builder()
                .args(format_args!("connected to {}", "db"))
                .level(::log::Level::Warn)
                .target("app::net")
                .module_path(Some("app::net"))
                .file(Some("src/net.rs"))
                .line(Some(17))
                .build(),
        );
        assert_eq!(converted.levelname, "WARNING");
        assert_eq!(converted.name, "app::net");
        assert_eq!(converted.message, "connected to db");
        assert_eq!(converted.module.as_deref(), Some("app::net"));
        assert_eq!(converted.filename.as_deref(), Some("net.rs"));
        assert_eq!(converted.lineno, Some(17));
    }
}
