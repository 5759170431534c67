//! # 光标取色状态机
//!
//! ## 设计思路
//!
//! `CursorSampler` 只有两个状态：
//!
//! - `Idle`：未加载图片，或指针不在图片有效像素上；提示框隐藏
//! - `Tracking`：指针位于有效像素上；提示框显示当前采样
//!
//! 换图、指针离开、越界都会回到 `Idle`。
//!
//! ## 实现思路
//!
//! - 图片显示尺寸与栅格尺寸 1:1，因此像素坐标 = `floor(指针 - 图片左上角)`。
//! - 坐标先取整再转为 `i64`，负坐标与超界坐标交给 `PixelIndex` 统一返回 `None`。
//! - 换图时先丢弃旧索引再构建新索引，构建失败时保持未加载状态，杜绝旧图颜色泄漏。

use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::raster::Raster;

use super::tooltip::{TooltipConfig, TooltipUpdate, TooltipView};
use super::{PixelIndex, SamplerError};

/// 视口坐标系下的指针位置（CSS 像素，可为小数）。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 图片元素左上角在视口中的位置。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageOrigin {
    pub left: f64,
    pub top: f64,
}

impl ImageOrigin {
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// 视口坐标 → 图片像素坐标（向下取整，可能越界）。
    pub fn pixel_of(self, pointer: PointerPosition) -> (i64, i64) {
        (
            floor_to_i64(pointer.x - self.left),
            floor_to_i64(pointer.y - self.top),
        )
    }
}

/// 非有限值映射到 `i64::MIN`，保证落在任何图片之外。
fn floor_to_i64(value: f64) -> i64 {
    if value.is_finite() {
        value.floor() as i64
    } else {
        i64::MIN
    }
}

/// 单次指针事件的采样结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorSample {
    pub x: u32,
    pub y: u32,
    pub color: HexColor,
    pub is_dark: bool,
}

/// 取色器状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerState {
    #[default]
    Idle,
    Tracking(CursorSample),
}

/// 绑定到单张显示图片的取色控制器。
#[derive(Debug, Default)]
pub struct CursorSampler {
    index: Option<PixelIndex>,
    state: SamplerState,
    tooltip: TooltipConfig,
}

impl CursorSampler {
    pub fn new(tooltip: TooltipConfig) -> Self {
        Self {
            index: None,
            state: SamplerState::Idle,
            tooltip,
        }
    }

    /// 加载（或替换）图片栅格。
    ///
    /// 旧索引总是先被丢弃；构建失败时取色器保持未加载状态。
    pub fn load(&mut self, raster: Raster) -> Result<(), SamplerError> {
        self.unload();
        let index = PixelIndex::build(raster)?;
        log::info!("🎯 取色索引就绪：{}x{}", index.width(), index.height());
        self.index = Some(index);
        Ok(())
    }

    /// 卸载当前图片，回到 `Idle`。
    pub fn unload(&mut self) {
        if self.index.take().is_some() {
            log::debug!("🧹 已丢弃旧的取色索引");
        }
        self.state = SamplerState::Idle;
    }

    pub fn is_loaded(&self) -> bool {
        self.index.is_some()
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn index(&self) -> Option<&PixelIndex> {
        self.index.as_ref()
    }

    pub fn tooltip_config(&self) -> TooltipConfig {
        self.tooltip
    }

    pub fn set_tooltip_config(&mut self, tooltip: TooltipConfig) {
        self.tooltip = tooltip;
    }

    /// 按像素坐标直接查询颜色，不改变状态。
    pub fn color_at(&self, x: i64, y: i64) -> Option<HexColor> {
        self.index.as_ref()?.color_at(x, y)
    }

    /// 指针在图片上移动。
    pub fn pointer_move(&mut self, pointer: PointerPosition, origin: ImageOrigin) -> TooltipUpdate {
        let (x, y) = origin.pixel_of(pointer);

        let Some(color) = self.color_at(x, y) else {
            if matches!(self.state, SamplerState::Tracking(_)) {
                log::debug!("🫥 指针越界 ({}, {})，隐藏提示框", x, y);
            }
            self.state = SamplerState::Idle;
            return TooltipUpdate::Hide;
        };

        // color_at 命中意味着 0 <= x < width 且 0 <= y < height
        let sample = CursorSample {
            x: x as u32,
            y: y as u32,
            color,
            is_dark: color.is_dark(),
        };
        self.state = SamplerState::Tracking(sample);

        TooltipUpdate::Show(TooltipView::render(&sample, pointer, &self.tooltip))
    }

    /// 指针离开图片。
    pub fn pointer_leave(&mut self) -> TooltipUpdate {
        self.state = SamplerState::Idle;
        TooltipUpdate::Hide
    }
}
