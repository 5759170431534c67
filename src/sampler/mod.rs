//! # 取色交互模块（sampler）
//!
//! ## 设计思路
//!
//! 交互核心与任何显示框架解耦，只处理纯数据：
//!
//! - `pixel_index`：坐标 → 颜色的只读索引，每张图片构建一次
//! - `cursor`：`CursorSampler` 状态机（`Idle` / `Tracking`），负责坐标换算与事件分发
//! - `tooltip`：提示框位置、文字与对比色计算
//! - `error`：索引构建错误
//!
//! ## 调用链
//!
//! ```text
//! PreparedImage ──load──▶ CursorSampler ──build──▶ PixelIndex
//!                              │
//! pointer move / leave ───────▶│── color_at ──▶ CursorSample
//!                              │
//!                              └──▶ TooltipUpdate::{Show, Hide}
//! ```
//!
//! 所有指针事件处理都是同步、O(1)、不会失败的；
//! 越界只表示“此处无采样”，不是错误。

mod cursor;
mod error;
mod pixel_index;
mod tooltip;

pub use cursor::{CursorSample, CursorSampler, ImageOrigin, PointerPosition, SamplerState};
pub use error::SamplerError;
pub use pixel_index::PixelIndex;
pub use tooltip::{TextTone, TooltipConfig, TooltipUpdate, TooltipView};
