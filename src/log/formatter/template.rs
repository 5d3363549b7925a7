use crate::log::error::FormatError;
use serde::Deserialize;
use std::collections::HashMap;

/// 模板占位符风格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum TemplateStyle {
    /// `%(name)s`、`%(name)-20s`，`%%` 表示字面量 `%`
    #[default]
    #[serde(rename = "%")]
    Percent,
    /// `{name}`、`{name:<20}`，`{{` `}}` 表示字面量花括号
    #[serde(rename = "{")]
    Brace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldSpec {
    align: Align,
    width: Option<usize>,
    precision: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field { name: String, spec: FieldSpec },
}

/// 已解析的输出模板
///
/// 构造时一次性解析，之后只读；每个占位符在渲染时都必须能在字段表中找到
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTemplate {
    source: String,
    style: TemplateStyle,
    segments: Vec<Segment>,
}

impl FormatTemplate {
    pub fn parse(source: &str, style: TemplateStyle) -> Result<Self, FormatError> {
        let segments = match style {
            TemplateStyle::Percent => parse_percent(source)?,
            TemplateStyle::Brace => parse_brace(source)?,
        };
        Ok(Self {
            source: source.to_string(),
            style,
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn style(&self) -> TemplateStyle {
        self.style
    }

    /// 模板引用的字段名，按出现顺序，可能重复
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// 模板是否引用了某个字段
    pub fn references(&self, field: &str) -> bool {
        self.field_names().any(|name| name == field)
    }

    /// 用字段表替换全部占位符
    pub fn render(&self, fields: &HashMap<String, String>) -> Result<String, FormatError> {
        let capacity = self.source.len() + fields.values().map(String::len).sum::<usize>();
        let mut output = String::with_capacity(capacity);

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Field { name, spec } => {
                    let value = fields
                        .get(name)
                        .ok_or_else(|| FormatError::MissingField(name.clone()))?;
                    write_field(&mut output, value, spec);
                }
            }
        }

        Ok(output)
    }
}

fn write_field(output: &mut String, value: &str, spec: &FieldSpec) {
    let value = match spec.precision {
        Some(precision) => match value.char_indices().nth(precision) {
            Some((end, _)) => &value[..end],
            None => value,
        },
        None => value,
    };

    let len = value.chars().count();
    let padding = spec.width.map_or(0, |width| width.saturating_sub(len));
    let (before, after) = match spec.align {
        Align::Left => (0, padding),
        Align::Right => (padding, 0),
        Align::Center => (padding / 2, padding - padding / 2),
    };

    // 宽度不受 fmt 的 u16 上限约束，直接补空格
    output.extend(std::iter::repeat(' ').take(before));
    output.push_str(value);
    output.extend(std::iter::repeat(' ').take(after));
}

fn push_literal(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Segment::Literal(last)) = segments.last_mut() {
        last.push_str(text);
    } else {
        segments.push(Segment::Literal(text.to_string()));
    }
}

/// 读取一串十进制数字，返回数值和结束位置
fn parse_number(source: &str, start: usize) -> Result<(Option<usize>, usize), FormatError> {
    let digits_len = source[start..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits_len == 0 {
        return Ok((None, start));
    }
    let end = start + digits_len;
    let number = source[start..end]
        .parse::<usize>()
        .map_err(|_| FormatError::template(start, "number too large"))?;
    Ok((Some(number), end))
}

fn parse_percent(source: &str) -> Result<Vec<Segment>, FormatError> {
    let bytes = source.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'%' {
            pos += 1;
            continue;
        }
        push_literal(&mut segments, &source[literal_start..pos]);
        let start = pos;

        match bytes.get(pos + 1) {
            Some(b'%') => {
                push_literal(&mut segments, "%");
                pos += 2;
            }
            Some(b'(') => {
                let name_start = pos + 2;
                let name_end = source[name_start..]
                    .find(')')
                    .map(|offset| name_start + offset)
                    .ok_or_else(|| FormatError::template(start, "unclosed '(' in placeholder"))?;
                let name = &source[name_start..name_end];
                if name.is_empty() {
                    return Err(FormatError::template(start, "empty field name"));
                }
                pos = name_end + 1;

                let mut align = Align::Right;
                while let Some(flag) = bytes.get(pos) {
                    match flag {
                        b'-' => align = Align::Left,
                        b'0' | b' ' | b'+' | b'#' => {}
                        _ => break,
                    }
                    pos += 1;
                }

                let (width, next) = parse_number(source, pos)?;
                pos = next;

                let mut precision = None;
                if bytes.get(pos) == Some(&b'.') {
                    let (value, next) = parse_number(source, pos + 1)?;
                    precision = Some(value.unwrap_or(0));
                    pos = next;
                }

                match bytes.get(pos) {
                    Some(b's') => pos += 1,
                    Some(_) => {
                        return Err(FormatError::template(
                            pos,
                            "unsupported conversion, only 's' is allowed",
                        ))
                    }
                    None => return Err(FormatError::template(start, "incomplete placeholder")),
                }

                segments.push(Segment::Field {
                    name: name.to_string(),
                    spec: FieldSpec {
                        align,
                        width,
                        precision,
                    },
                });
            }
            Some(_) => {
                return Err(FormatError::template(
                    start,
                    "positional placeholders are not supported, use %(name)s",
                ))
            }
            None => return Err(FormatError::template(start, "incomplete placeholder")),
        }

        literal_start = pos;
    }

    push_literal(&mut segments, &source[literal_start..]);
    Ok(segments)
}

fn parse_brace(source: &str) -> Result<Vec<Segment>, FormatError> {
    let bytes = source.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => {
                push_literal(&mut segments, &source[literal_start..pos]);
                if bytes.get(pos + 1) == Some(&b'{') {
                    push_literal(&mut segments, "{");
                    pos += 2;
                    literal_start = pos;
                    continue;
                }

                let start = pos;
                let inner_end = source[start + 1..]
                    .find('}')
                    .map(|offset| start + 1 + offset)
                    .ok_or_else(|| FormatError::template(start, "unclosed '{'"))?;
                let inner = &source[start + 1..inner_end];
                let (name, spec) = match inner.split_once(':') {
                    Some((name, spec)) => (name, parse_brace_spec(spec, start)?),
                    None => (
                        inner,
                        FieldSpec {
                            align: Align::Left,
                            width: None,
                            precision: None,
                        },
                    ),
                };
                if name.is_empty() {
                    return Err(FormatError::template(start, "empty field name"));
                }
                if name.contains(['{', '!']) {
                    return Err(FormatError::template(start, "invalid field name"));
                }

                segments.push(Segment::Field {
                    name: name.to_string(),
                    spec,
                });
                pos = inner_end + 1;
                literal_start = pos;
            }
            b'}' => {
                push_literal(&mut segments, &source[literal_start..pos]);
                if bytes.get(pos + 1) != Some(&b'}') {
                    return Err(FormatError::template(pos, "single '}' encountered"));
                }
                push_literal(&mut segments, "}");
                pos += 2;
                literal_start = pos;
            }
            _ => pos += 1,
        }
    }

    push_literal(&mut segments, &source[literal_start..]);
    Ok(segments)
}

fn parse_brace_spec(spec: &str, position: usize) -> Result<FieldSpec, FormatError> {
    let mut align = Align::Left;
    let mut rest = spec;
    if let Some(first) = rest.chars().next() {
        let explicit = match first {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            _ => None,
        };
        if let Some(explicit) = explicit {
            align = explicit;
            rest = &rest[1..];
        }
    }

    let (width, consumed) = parse_number(rest, 0)?;
    rest = &rest[consumed..];

    let mut precision = None;
    if let Some(after_dot) = rest.strip_prefix('.') {
        let (value, consumed) = parse_number(after_dot, 0)?;
        precision = Some(value.unwrap_or(0));
        rest = &after_dot[consumed..];
    }

    // 可选的类型后缀 's'
    let rest = rest.strip_prefix('s').unwrap_or(rest);
    if !rest.is_empty() {
        return Err(FormatError::template(
            position,
            format!("unsupported format spec '{}'", spec),
        ));
    }

    Ok(FieldSpec {
        align,
        width,
        precision,
    })
}
