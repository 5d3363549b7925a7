use crate::log::error::FormatError;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde::Deserialize;
use std::fmt::{Display, Write};

/// `datetime` 字段的格式，精确到微秒
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// 未配置 datefmt 时 `asctime` 的格式，毫秒部分单独追加
const DEFAULT_ASCTIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 渲染时间字段所用的时区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Timezone {
    /// 进程本地时区
    #[default]
    Local,
    Utc,
}

/// 检查 strftime 格式串是否合法
pub fn validate_datefmt(datefmt: &str) -> Result<(), FormatError> {
    if StrftimeItems::new(datefmt).any(|item| matches!(item, Item::Error)) {
        return Err(FormatError::DateFormat(datefmt.to_string()));
    }
    Ok(())
}

/// 把浮点秒数转换为 UTC 时间，四舍五入到微秒
fn to_utc(created: f64) -> Result<DateTime<Utc>, FormatError> {
    let micros = (created * 1_000_000.0).round();
    if !micros.is_finite() || micros < i64::MIN as f64 || micros > i64::MAX as f64 {
        return Err(FormatError::InvalidTimestamp(created));
    }
    DateTime::<Utc>::from_timestamp_micros(micros as i64)
        .ok_or(FormatError::InvalidTimestamp(created))
}

fn write_formatted<Tz>(
    output: &mut String,
    time: &DateTime<Tz>,
    format: &str,
) -> Result<(), FormatError>
where
    Tz: chrono::TimeZone,
    Tz::Offset: Display,
{
    write!(output, "{}", time.format(format)).map_err(|_| FormatError::DateFormat(format.to_string()))
}

fn format_in_zone(created: f64, zone: Timezone, format: &str) -> Result<String, FormatError> {
    let utc = to_utc(created)?;
    let mut output = String::with_capacity(32);
    match zone {
        Timezone::Utc => write_formatted(&mut output, &utc, format)?,
        Timezone::Local => write_formatted(&mut output, &utc.with_timezone(&Local), format)?,
    }
    Ok(output)
}

/// `YYYY-MM-DDTHH:MM:SS.ffffff`
pub fn format_datetime(created: f64, zone: Timezone) -> Result<String, FormatError> {
    format_in_zone(created, zone, DATETIME_FORMAT)
}

/// `asctime` 字段：指定了 datefmt 时按 datefmt，否则 `YYYY-MM-DD HH:MM:SS,mmm`
pub fn format_asctime(
    created: f64,
    zone: Timezone,
    datefmt: Option<&str>,
) -> Result<String, FormatError> {
    match datefmt {
        Some(datefmt) => format_in_zone(created, zone, datefmt),
        None => {
            let mut output = format_in_zone(created, zone, DEFAULT_ASCTIME_FORMAT)?;
            let millis = to_utc(created)?.timestamp_subsec_millis();
            let _ = write!(output, ",{:03}", millis);
            Ok(output)
        }
    }
}
