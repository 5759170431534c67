//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `ImageSource` 表示外部来源语义
//! - `RawImageData` 表示已加载但未解码的字节
//! - `PreparedImage` 表示可交给取色器的栅格 + 显示位图（二者总是成对出现）

use std::path::PathBuf;

use serde::Serialize;

use crate::raster::Raster;

/// 图片输入来源。
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// 上传请求体中的原始字节。
    Bytes(Vec<u8>),
    /// Base64（支持 Data URL 与纯 Base64 字符串）。
    Base64(String),
    /// 本地文件路径来源。
    FilePath(PathBuf),
}

impl ImageSource {
    pub(crate) fn hint(&self) -> &'static str {
        match self {
            Self::Bytes(_) => "bytes",
            Self::Base64(_) => "base64",
            Self::FilePath(_) => "file",
        }
    }
}

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}

/// 用于显示的无损 PNG 位图，尺寸与栅格完全一致。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayBitmap {
    pub width: u32,
    pub height: u32,
    /// PNG 编码字节。
    #[serde(skip)]
    pub png: Vec<u8>,
    /// `data:image/png;base64,...`，可直接作为 `<img src>`。
    pub data_url: String,
}

/// 准备完成的图片：取色栅格与显示位图。
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub raster: Raster,
    pub bitmap: DisplayBitmap,
    /// 解码后的原始尺寸（降采样前）。
    pub original_size: (u32, u32),
}

impl PreparedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.raster.dimensions()
    }

    pub fn was_downscaled(&self) -> bool {
        self.original_size != self.raster.dimensions()
    }
}
