//! # 图片准备模块（image_handler）
//!
//! ## 设计思路
//!
//! 该模块将“图片来源识别 → 加载校验 → 解码缩放 → 显示位图编码”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//! 输出的 `PreparedImage` 总是“栅格 + 位图”成对出现，交给取色会话一次性安装。
//!
//! - `handler`：编排整条处理流水线
//! - `loader`：负责字节/Base64/文件加载与签名校验（仅 PNG / JPEG）
//! - `pipeline`：负责解码、像素限制、最长边降采样
//! - `encoder`：负责无损 PNG 显示位图
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 调用链
//!
//! ```text
//! 宿主上传
//!    ↓
//! session（阻塞线程池中执行）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ loader.rs（来源加载 + 体积/签名校验）
//!    ├─ pipeline.rs（解码 + 像素限制 + 降采样）
//!    └─ encoder.rs（PNG + data URL）
//!    ↓
//! PreparedImage / ImageError
//! ```

mod config;
mod encoder;
mod error;
mod handler;
mod loader;
mod pipeline;
mod source;

pub use config::{DEFAULT_MAX_DIMENSION, ImageConfig, ImagePreviewProfile};
pub use error::ImageError;
pub use handler::ImageHandler;
pub use pipeline::capped_dimensions;
pub use source::{DisplayBitmap, ImageSource, PreparedImage};
