//! # 宿主命令层
//!
//! ## 设计思路
//!
//! 命令层仅做参数接收与结果返回，不承载业务逻辑。
//! 所有实际处理交由 `SamplerService`，保持命令函数薄、稳定、易测试。
//! 入参与出参全部是 serde 类型，宿主可直接通过 JSON 调用。

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::SamplerService;
use crate::error::AppError;
use crate::image_handler::{DisplayBitmap, ImageError, ImageSource};
use crate::palette::PaletteColor;
use crate::sampler::{ImageOrigin, PointerPosition, TooltipUpdate};

/// 结构化命令错误。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandError {
    pub code: &'static str,
    pub stage: &'static str,
    pub message: String,
}

impl From<ImageError> for CommandError {
    fn from(error: ImageError) -> Self {
        Self {
            code: error.code(),
            stage: error.stage(),
            message: error.to_string(),
        }
    }
}

/// 上传请求：Base64 或 Data URL。
#[derive(Debug, Clone, Deserialize)]
pub struct LoadImageRequest {
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoadImageFileRequest {
    pub path: PathBuf,
}

/// 宿主用于显示的图片表面：尺寸与取色栅格 1:1。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSurface {
    pub width: u32,
    pub height: u32,
    /// 可直接作为 `<img src>` 的 data URL。
    pub src: String,
}

impl From<DisplayBitmap> for ImageSurface {
    fn from(bitmap: DisplayBitmap) -> Self {
        Self {
            width: bitmap.width,
            height: bitmap.height,
            src: bitmap.data_url,
        }
    }
}

/// 宿主转发的指针事件。
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Move {
        client_x: f64,
        client_y: f64,
        image_left: f64,
        image_top: f64,
    },
    Leave,
}

/// 上传并加载图片。
pub async fn load_image(service: &SamplerService, request: LoadImageRequest) -> Result<ImageSurface, CommandError> {
    let bitmap = service.load(ImageSource::Base64(request.data)).await?;
    Ok(bitmap.into())
}

/// 从本地文件加载图片。
pub async fn load_image_file(
    service: &SamplerService,
    request: LoadImageFileRequest,
) -> Result<ImageSurface, CommandError> {
    let bitmap = service.load(ImageSource::FilePath(request.path)).await?;
    Ok(bitmap.into())
}

pub fn pointer_event(service: &SamplerService, event: PointerEvent) -> TooltipUpdate {
    match event {
        PointerEvent::Move {
            client_x,
            client_y,
            image_left,
            image_top,
        } => service.pointer_move(
            PointerPosition::new(client_x, client_y),
            ImageOrigin::new(image_left, image_top),
        ),
        PointerEvent::Leave => service.pointer_leave(),
    }
}

/// 按像素坐标取色，返回 `#RRGGBB`。
pub fn sample_color(service: &SamplerService, x: i64, y: i64) -> Option<String> {
    service.color_at(x, y).map(|color| color.css())
}

pub async fn dominant_palette(
    service: &SamplerService,
    n_colors: Option<usize>,
) -> Result<Vec<PaletteColor>, CommandError> {
    Ok(service.palette(n_colors).await?)
}

/// 切换预览档位（compact / balanced / detailed）。
pub fn set_preview_profile(service: &SamplerService, profile: String) -> Result<(), AppError> {
    service.set_preview_profile(&profile)?;
    Ok(())
}

/// 查询当前生效的预览档位。
pub fn get_preview_profile(service: &SamplerService) -> Result<String, AppError> {
    Ok(service.get_preview_profile()?)
}
