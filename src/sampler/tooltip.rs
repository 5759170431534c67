//! # 提示框视图逻辑
//!
//! ## 设计思路
//!
//! - 提示框锚定在光标附近并带固定偏移（默认右 15px、上 30px），避免遮挡被采样的像素。
//! - 背景色即采样色；文字与边框颜色按亮度规则二选一：
//!   `luma < 150` 视为深色背景 → 白色文字/边框，否则 → 黑色文字/边框。
//! - 输出纯数据 `TooltipView`，由宿主负责实际绘制。

use serde::{Deserialize, Serialize};

use crate::color::{HexColor, Rgb};

use super::cursor::{CursorSample, PointerPosition};

/// 提示框相对光标的默认水平偏移（像素）。
pub const DEFAULT_TOOLTIP_OFFSET_X: f64 = 15.0;
/// 提示框相对光标的默认垂直偏移（像素，负数为向上）。
pub const DEFAULT_TOOLTIP_OFFSET_Y: f64 = -30.0;

/// 提示框配置。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipConfig {
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            offset_x: DEFAULT_TOOLTIP_OFFSET_X,
            offset_y: DEFAULT_TOOLTIP_OFFSET_Y,
        }
    }
}

/// 文字/边框色调。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextTone {
    /// 浅色（白），用于深色背景。
    Light,
    /// 深色（黑），用于浅色背景。
    Dark,
}

impl TextTone {
    pub fn for_background(background: Rgb) -> Self {
        if background.is_dark() {
            Self::Light
        } else {
            Self::Dark
        }
    }

    pub fn rgb(self) -> Rgb {
        match self {
            Self::Light => Rgb::WHITE,
            Self::Dark => Rgb::BLACK,
        }
    }

    pub fn css(self) -> String {
        self.rgb().to_hex().css()
    }
}

/// 一帧提示框的完整渲染数据。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipView {
    /// 视口坐标系下提示框左上角。
    pub left: f64,
    pub top: f64,
    /// 采样像素坐标。
    pub x: u32,
    pub y: u32,
    /// 主文本：`#RRGGBB`。
    pub text: String,
    /// 副文本：`rgb(R, G, B)`。
    pub detail: String,
    pub background: HexColor,
    pub foreground: HexColor,
    pub border: HexColor,
    pub tone: TextTone,
}

impl TooltipView {
    pub fn render(sample: &CursorSample, pointer: PointerPosition, config: &TooltipConfig) -> Self {
        let tone = TextTone::for_background(sample.color.rgb());
        let ink = tone.rgb().to_hex();

        Self {
            left: pointer.x + config.offset_x,
            top: pointer.y + config.offset_y,
            x: sample.x,
            y: sample.y,
            text: sample.color.css(),
            detail: sample.color.rgb().label(),
            background: sample.color,
            foreground: ink,
            border: ink,
            tone,
        }
    }
}

/// 指针事件处理结果：显示（含新内容）或隐藏。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TooltipUpdate {
    Show(TooltipView),
    Hide,
}

impl TooltipUpdate {
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Show(_))
    }

    pub fn view(&self) -> Option<&TooltipView> {
        match self {
            Self::Show(view) => Some(view),
            Self::Hide => None,
        }
    }
}
