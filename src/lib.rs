//! logrusx - logrus 风格的日志格式化库
//!
//! 把日志记录渲染成 `[INFO] message key=value ...` 形式的单行文本，
//! 支持 ANSI 着色和基于模板的行布局。
//!
//! ## 模块
//!
//! - **log**: 日志记录、级别、颜色表和格式化器
//! - **cfg**: 基于 TypeOptions 的组件配置与注册
//!
//! ## 设计要点
//!
//! - 格式化只读记录，每次调用在独立的字段表上渲染，可跨线程共享同一个格式化器
//! - 未知级别、模板缺字段直接返回错误，不做降级输出
//! - 颜色表和级别表是编译期常量

pub mod cfg;
pub mod log;

// 重新导出主要的公共 API
pub use cfg::TypeOptions;

pub use self::log::{
    FieldValue, FormatError, LogFormatter, LogLevel, LogRecord, LogrusFormatter,
    LogrusFormatterConfig,
};
