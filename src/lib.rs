//! # 像素取色工具 — 库入口
//!
//! 上传一张 PNG / JPEG，鼠标悬停即可读出光标下像素的十六进制颜色。
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 显示宿主（任意 GUI / Web）                 │
//! │                                                          │
//! │   上传  ──►  <img src=data_url>  ◄── 指针 move / leave   │
//! │                 ▲           │            │               │
//! └─────────────────┼───────────┼────────────┼───────────────┘
//!                   │  serde 类型（ImageSurface / PointerEvent / TooltipUpdate）
//! ┌─────────────────┼───────────┼────────────┼───────────────┐
//! │                 │        后端 (Rust)      ▼               │
//! │  ┌─ session ──── SamplerService + commands               │
//! │  │   ├─ 加载代号 + spawn_blocking                         │
//! │  │   └─ Mutex<CursorSampler>                             │
//! │  │                                                       │
//! │  ├─ image_handler  来源加载·签名校验·解码·降采样·PNG      │
//! │  ├─ sampler        PixelIndex / 状态机 / 提示框对比色     │
//! │  ├─ palette        k-means 主色提取                      │
//! │  ├─ color / raster 颜色与像素栅格基础类型                 │
//! │  └─ error ──────── AppError (统一错误类型)                │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，可序列化为字符串 |
//! | [`color`] | `Rgb` / `HexColor`，亮度与十六进制格式 |
//! | [`raster`] | 行优先 RGB 像素栅格 |
//! | [`image_handler`] | 从字节/Base64/文件准备图片：校验、解码、最长边降采样、显示位图 |
//! | [`sampler`] | 坐标取色索引、光标状态机、提示框视图 |
//! | [`palette`] | 主色提取 |
//! | [`session`] | 宿主持有的会话服务与命令层 |

pub mod color;
pub mod error;
pub mod image_handler;
pub mod palette;
pub mod raster;
pub mod sampler;
pub mod session;

/// 安装 `env_logger`，默认级别 `info`，可用 `RUST_LOG` 覆盖。
///
/// 重复调用是安全的：已有日志实现时直接忽略。
pub fn init_logging() {
    let initialized = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
    if initialized.is_ok() {
        log::info!("🚀 像素取色工具日志已初始化");
    }
}
