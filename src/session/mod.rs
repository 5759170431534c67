//! # 取色会话模块
//!
//! ## 设计思路
//!
//! 把“图片准备”和“光标取色”组装成宿主可直接持有的会话：
//!
//! - `service`：`SamplerService`，负责加载生命周期、代号校验与锁内替换
//! - `commands`：薄命令层，serde 入参/出参，供任意显示宿主调用
//!
//! ## 事件流
//!
//! ```text
//! 上传 ──► load_image ──► spawn_blocking(prepare) ──► 安装 PixelIndex
//!                                                        │
//! 指针 ──► pointer_event ──► CursorSampler ──► TooltipUpdate
//! ```

pub mod commands;
mod service;

pub use service::{LoadedImage, SamplerConfig, SamplerService};
