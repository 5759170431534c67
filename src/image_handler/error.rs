//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载图片准备链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//! `code()` / `stage()` 提供稳定的机器可读标识，供宿主展示与埋点使用。

use crate::sampler::SamplerError;

/// 图片处理统一错误类型。
///
/// 该类型会在命令层被转换为 `CommandError`，最终透传给宿主界面。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("不支持的图片类型：{0}（仅支持 PNG / JPEG）")]
    UnsupportedFormat(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("{0}")]
    InvalidRaster(#[from] SamplerError),

    #[error("加载已被更新的请求取代")]
    Superseded,
}

impl ImageError {
    /// 稳定错误码，供宿主分支处理。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_failed",
            Self::InvalidFormat(_) => "invalid_format",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::FileSystem(_) => "file_system",
            Self::ResourceLimit(_) => "resource_limit",
            Self::Encode(_) => "encode_failed",
            Self::InvalidRaster(_) => "invalid_raster",
            Self::Superseded => "superseded",
        }
    }

    /// 出错阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::FileSystem(_) | Self::InvalidFormat(_) | Self::UnsupportedFormat(_) => "load",
            Self::Decode(_) | Self::ResourceLimit(_) => "decode",
            Self::Encode(_) => "encode",
            Self::InvalidRaster(_) => "index",
            Self::Superseded => "session",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_raster_maps_to_index_stage() {
        let error = ImageError::from(SamplerError::InvalidRaster {
            width: 2,
            height: 2,
            expected: Some(4),
            actual: 3,
        });

        assert_eq!(error.code(), "invalid_raster");
        assert_eq!(error.stage(), "index");
        assert!(error.to_string().contains("2x2"));
    }

    #[test]
    fn unsupported_format_message_names_accepted_types() {
        let error = ImageError::UnsupportedFormat("image/gif".to_string());
        assert_eq!(error.stage(), "load");
        assert!(error.to_string().contains("PNG / JPEG"));
    }
}
