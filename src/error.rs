//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义 crate 级统一的 `AppError` 枚举，汇总图片准备、取色索引与配置错误，
//! 替代分散的 `.map_err(|e| e.to_string())` 与 `format!(...)` 模式。
//!
//! 宿主侧命令在需要“一条可读消息”时返回 `Result<T, AppError>`，
//! 需要结构化分支时使用 `session::commands::CommandError`。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ImageError` / `SamplerError` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，满足宿主 IPC 要求。

use serde::Serialize;

use crate::image_handler::ImageError;
use crate::sampler::SamplerError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 图片准备流水线错误（加载 / 解码 / 编码）
    #[error("{0}")]
    Image(#[from] ImageError),

    /// 取色索引构建失败
    #[error("{0}")]
    Sampler(#[from] SamplerError),

    /// 会话配置不合法
    #[error("配置错误: {0}")]
    Config(String),
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
