//! 终端颜色转义序列
//!
//! 8 种基础前景色，对应 `ESC[30m` ~ `ESC[37m`

/// 重置所有属性
pub const RESET_SEQ: &str = "\x1b[0m";

/// 粗体
pub const BOLD_SEQ: &str = "\x1b[1m";

// 下标与 Color 的取值一一对应
const FOREGROUND_SEQS: [&str; 8] = [
    "\x1b[30m", "\x1b[31m", "\x1b[32m", "\x1b[33m", "\x1b[34m", "\x1b[35m", "\x1b[36m", "\x1b[37m",
];

/// 终端前景色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
}

impl Color {
    /// 颜色下标（0-7）
    pub fn index(self) -> u8 {
        self as u8
    }

    /// 前景色转义序列 `ESC[{30+index}m`
    pub fn seq(self) -> &'static str {
        FOREGROUND_SEQS[self as usize]
    }

    /// 用该颜色包裹文本，末尾重置
    pub fn paint(self, text: &str) -> String {
        let mut painted = String::with_capacity(text.len() + 9);
        painted.push_str(self.seq());
        painted.push_str(text);
        painted.push_str(RESET_SEQ);
        painted
    }
}
