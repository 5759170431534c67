//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ImageHandler` 只负责流程编排与配置管理，不直接与任何宿主绑定。
//! 处理链路固定为：
//! 1. 读取配置快照
//! 2. 按来源加载原始字节
//! 3. 解码、降采样并准备 RGB 栅格
//! 4. 编码无损显示位图
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<ImageConfig>>` 支持运行时动态切档。
//! - 单次请求内使用“同一配置快照”，避免处理中途配置漂移。
//! - 记录 `load/decode/total` 阶段耗时，便于性能诊断。
//! - 整条链路是同步 CPU 计算，由会话层放到阻塞线程池执行。

use std::sync::{Arc, RwLock};
use std::time::Instant;

use super::source::PreparedImage;
use super::{ImageConfig, ImageError, ImagePreviewProfile, ImageSource};

/// 图片准备器。
///
/// 封装了配置状态，并编排各子模块实现完整流程。
#[derive(Clone)]
pub struct ImageHandler {
    pub(super) config: Arc<RwLock<ImageConfig>>,
}

impl ImageHandler {
    /// 根据初始配置创建处理器。
    ///
    /// # 示例
    /// ```rust
    /// use pixel_peek::image_handler::{ImageConfig, ImageHandler};
    ///
    /// let handler = ImageHandler::new(ImageConfig::default())?;
    /// # Ok::<(), pixel_peek::image_handler::ImageError>(())
    /// ```
    pub fn new(config: ImageConfig) -> Result<Self, ImageError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// 获取配置快照。
    ///
    /// 作用：保证单次请求链路使用一致参数。
    pub fn config_snapshot(&self) -> Result<ImageConfig, ImageError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| ImageError::ResourceLimit("配置读取锁已中毒".to_string()))
    }

    /// 设置预览档位。
    ///
    /// # 示例
    /// ```rust
    /// use pixel_peek::image_handler::{ImageConfig, ImageHandler, ImagePreviewProfile};
    ///
    /// let handler = ImageHandler::new(ImageConfig::default())?;
    /// handler.set_preview_profile(ImagePreviewProfile::Detailed)?;
    /// assert_eq!(handler.config_snapshot()?.max_dimension, 600);
    /// # Ok::<(), pixel_peek::image_handler::ImageError>(())
    /// ```
    pub fn set_preview_profile(&self, profile: ImagePreviewProfile) -> Result<(), ImageError> {
        let mut config = self
            .config
            .write()
            .map_err(|_| ImageError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        config.apply_preview_profile(profile);

        log::info!(
            "⚙️ 已切换预览档位：{:?}（max_dim={}, filter={:?}）",
            profile,
            config.max_dimension,
            config.resize_filter
        );

        Ok(())
    }

    /// 获取当前生效档位。
    pub fn get_preview_profile(&self) -> Result<ImagePreviewProfile, ImageError> {
        let config = self
            .config
            .read()
            .map_err(|_| ImageError::ResourceLimit("配置读取锁已中毒".to_string()))?;
        Ok(config.infer_preview_profile())
    }

    /// 设置最长边上限与解码资源限制等高级配置。
    pub fn set_advanced_config(
        &self,
        max_dimension: u32,
        max_file_size: u64,
        max_decoded_pixels: u64,
        max_decoded_bytes: u64,
    ) -> Result<(), ImageError> {
        let mut candidate = self.config_snapshot()?;
        candidate.max_dimension = max_dimension;
        candidate.max_file_size = max_file_size;
        candidate.max_decoded_pixels = max_decoded_pixels;
        candidate.max_decoded_bytes = max_decoded_bytes;
        candidate.validate()?;

        let mut config = self
            .config
            .write()
            .map_err(|_| ImageError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        *config = candidate;

        Ok(())
    }

    /// 处理主入口：从任意来源加载并准备图片（使用当前配置快照）。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use pixel_peek::image_handler::{ImageConfig, ImageHandler, ImageSource};
    ///
    /// let handler = ImageHandler::new(ImageConfig::default())?;
    /// let prepared = handler.prepare(ImageSource::FilePath("/tmp/photo.png".into()))?;
    /// println!("{}x{}", prepared.raster.width(), prepared.raster.height());
    /// # Ok::<(), pixel_peek::image_handler::ImageError>(())
    /// ```
    pub fn prepare(&self, source: ImageSource) -> Result<PreparedImage, ImageError> {
        let config = self.config_snapshot()?;
        self.prepare_with_config(source, &config)
    }

    /// 使用指定配置快照处理图片。
    pub fn prepare_with_config(
        &self,
        source: ImageSource,
        config: &ImageConfig,
    ) -> Result<PreparedImage, ImageError> {
        let total_start = Instant::now();
        let hint = source.hint();

        let load_start = Instant::now();
        let raw = match source {
            ImageSource::Bytes(bytes) => self.load_from_bytes(bytes, config)?,
            ImageSource::Base64(data) => self.load_from_base64(&data, config)?,
            ImageSource::FilePath(path) => self.load_from_file(&path, config)?,
        };
        let load_elapsed = load_start.elapsed();

        let decode_start = Instant::now();
        let prepared = self.decode_and_prepare(raw, config)?;
        let decode_elapsed = decode_start.elapsed();

        let total_elapsed = total_start.elapsed();
        log::info!(
            "✅ 图片准备完成 - 来源: {} load={}ms decode={}ms total={}ms",
            hint,
            load_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            total_elapsed.as_millis()
        );

        Ok(prepared)
    }
}
