//! # 颜色模型模块
//!
//! ## 设计思路
//!
//! - `Rgb`：8 位三通道颜色，所有采样结果的基础值类型。
//! - `HexColor`：6 位大写十六进制表示，与 `Rgb` 一一对应、无损互转。
//! - `luma`：用于提示框文字对比度判断的加权亮度。
//!
//! ## 实现思路
//!
//! `HexColor` 内部直接保存 `Rgb`，字符串形式在输出时生成，
//! 这样 `PixelIndex` 中每个像素只占 3 字节，同时保证 `Display` 输出稳定。
//!
//! 亮度按 `0.299R + 0.587G + 0.114B` 计算，判断时使用千分位整数
//! （`299R + 587G + 114B` 对比 `150_000`），避免浮点误差让边界值 150 落到错误分支。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 深色背景判定阈值（亮度严格小于该值视为深色）。
pub const DARK_LUMA_THRESHOLD: u32 = 150;

const LUMA_WEIGHT_R: u32 = 299;
const LUMA_WEIGHT_G: u32 = 587;
const LUMA_WEIGHT_B: u32 = 114;
const LUMA_SCALE: u32 = 1000;

/// 8 位 RGB 颜色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// 亮度的千分位整数值：`299R + 587G + 114B`。
    pub fn luma_milli(self) -> u32 {
        LUMA_WEIGHT_R * self.r as u32 + LUMA_WEIGHT_G * self.g as u32 + LUMA_WEIGHT_B * self.b as u32
    }

    /// 加权亮度 `0.299R + 0.587G + 0.114B`，范围 0.0 ~ 255.0。
    pub fn luma(self) -> f64 {
        self.luma_milli() as f64 / LUMA_SCALE as f64
    }

    /// 背景是否为深色（`luma < 150`）。
    ///
    /// `luma == 150` 固定归为浅色，使用深色文字。
    pub fn is_dark(self) -> bool {
        self.luma_milli() < DARK_LUMA_THRESHOLD * LUMA_SCALE
    }

    pub fn to_hex(self) -> HexColor {
        HexColor::from(self)
    }

    /// `rgb(R, G, B)` 形式的文本，用于提示框副标题。
    pub fn label(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<image::Rgb<u8>> for Rgb {
    fn from(pixel: image::Rgb<u8>) -> Self {
        Self::from(pixel.0)
    }
}

/// 十六进制颜色解析错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexParseError {
    #[error("十六进制颜色长度应为 6 位，实际为 {0} 位")]
    Length(usize),

    #[error("包含非法十六进制字符：{0:?}")]
    Digit(String),
}

/// 6 位大写十六进制颜色（不含 `#`、不含 alpha）。
///
/// ```rust
/// use pixel_peek::color::{HexColor, Rgb};
///
/// let hex = Rgb::new(255, 0, 128).to_hex();
/// assert_eq!(hex.to_string(), "FF0080");
/// assert_eq!(hex.css(), "#FF0080");
/// assert_eq!("#ff0080".parse::<HexColor>().unwrap().rgb(), Rgb::new(255, 0, 128));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor(Rgb);

impl HexColor {
    pub fn rgb(self) -> Rgb {
        self.0
    }

    /// CSS 形式：`#RRGGBB`。
    pub fn css(self) -> String {
        format!("#{}", self)
    }

    pub fn is_dark(self) -> bool {
        self.0.is_dark()
    }
}

impl From<Rgb> for HexColor {
    fn from(rgb: Rgb) -> Self {
        Self(rgb)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.0.r, self.0.g, self.0.b)
    }
}

impl FromStr for HexColor {
    type Err = HexParseError;

    /// 接受 `RRGGBB` 与 `#RRGGBB`，大小写不敏感。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(HexParseError::Length(digits.len()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(HexParseError::Digit(s.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| HexParseError::Digit(s.to_string()))
        };

        Ok(Self(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?)))
    }
}

impl PartialEq<str> for HexColor {
    /// 仅与规范形式（6 位大写、无 `#`）相等。
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for HexColor {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for HexColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_uppercase_and_zero_padded() {
        assert_eq!(Rgb::new(0, 10, 255).to_hex().to_string(), "000AFF");
        assert_eq!(Rgb::new(171, 205, 239).to_hex().to_string(), "ABCDEF");
    }

    #[test]
    fn hex_compares_with_canonical_str_only() {
        let hex = Rgb::new(255, 0, 0).to_hex();
        assert_eq!(hex, "FF0000");
        assert_ne!(hex, "ff0000");
        assert_ne!(hex, "#FF0000");
        assert_ne!(hex, "00FF00");
    }

    #[test]
    fn parse_accepts_prefix_and_lowercase() {
        assert_eq!("#00ff7f".parse::<HexColor>().unwrap().rgb(), Rgb::new(0, 255, 127));
        assert_eq!("  0000FF ".parse::<HexColor>().unwrap().rgb(), Rgb::new(0, 0, 255));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!("FFF".parse::<HexColor>(), Err(HexParseError::Length(3)));
        assert!(matches!("GG0000".parse::<HexColor>(), Err(HexParseError::Digit(_))));
        assert!(matches!("+F0000".parse::<HexColor>(), Err(HexParseError::Digit(_))));
    }

    #[test]
    fn luma_matches_weighted_sum() {
        assert_eq!(Rgb::WHITE.luma(), 255.0);
        assert_eq!(Rgb::BLACK.luma(), 0.0);
        assert_eq!(Rgb::new(255, 0, 0).luma(), 76.245);
        assert_eq!(Rgb::new(0, 255, 0).luma_milli(), 149_685);
    }

    #[test]
    fn luma_boundary_is_not_dark() {
        // 299 + 587 + 114 = 1000，灰阶 150 恰好等于阈值
        let gray = Rgb::new(150, 150, 150);
        assert_eq!(gray.luma_milli(), 150_000);
        assert!(!gray.is_dark());
        assert!(Rgb::new(149, 150, 150).is_dark());
    }

    #[test]
    fn pure_green_is_dark_by_a_hair() {
        assert!(Rgb::new(0, 255, 2).is_dark());
        assert!(!Rgb::new(0, 255, 3).is_dark());
    }

    #[test]
    fn label_lists_channels() {
        assert_eq!(Rgb::new(1, 22, 255).label(), "rgb(1, 22, 255)");
    }

    #[test]
    fn hex_serializes_as_plain_string() {
        let json = serde_json::to_string(&Rgb::new(18, 52, 86).to_hex()).unwrap();
        assert_eq!(json, "\"123456\"");
        let back: HexColor = serde_json::from_str("\"#123456\"").unwrap();
        assert_eq!(back.rgb(), Rgb::new(18, 52, 86));
    }
}
