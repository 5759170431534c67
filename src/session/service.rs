//! # 取色会话服务
//!
//! ## 设计思路
//!
//! `SamplerService` 是宿主持有的唯一状态对象，替代任何全局单例：
//! - 图片准备（O(W×H)）放到阻塞线程池，指针路径只做 O(1) 查表
//! - 开始加载时立即拆除旧索引，新索引就绪前指针事件一律 `Hide`
//! - 每次加载携带代号（generation），被更新请求取代的加载结果直接丢弃
//!
//! ## 实现思路
//!
//! ```text
//! load(source)
//!   ├─ generation += 1，拆除旧索引
//!   ├─ spawn_blocking(ImageHandler::prepare)
//!   └─ 加锁：代号仍是最新 → 安装索引与位图；否则 Superseded
//! ```
//!
//! 取色器与当前图片放在同一把锁内，替换是一次原子交换。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::error::AppError;
use crate::image_handler::{DisplayBitmap, ImageConfig, ImageError, ImageHandler, ImagePreviewProfile, ImageSource, PreparedImage};
use crate::palette::{self, DEFAULT_PALETTE_COLORS, PALETTE_COLOR_RANGE, PaletteColor};
use crate::sampler::{CursorSampler, ImageOrigin, PointerPosition, SamplerState, TooltipConfig, TooltipUpdate};

/// 会话级配置。
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    pub image: ImageConfig,
    pub tooltip: TooltipConfig,
    /// 未指定数量时的主色个数。
    pub palette_colors: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            image: ImageConfig::default(),
            tooltip: TooltipConfig::default(),
            palette_colors: DEFAULT_PALETTE_COLORS,
        }
    }
}

impl SamplerConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.image.validate()?;

        if !PALETTE_COLOR_RANGE.contains(&self.palette_colors) {
            return Err(AppError::Config(format!(
                "palette_colors 应在 {}~{} 之间，实际为 {}",
                PALETTE_COLOR_RANGE.start(),
                PALETTE_COLOR_RANGE.end(),
                self.palette_colors
            )));
        }

        let offsets_finite = self.tooltip.offset_x.is_finite() && self.tooltip.offset_y.is_finite();
        if !offsets_finite {
            return Err(AppError::Config("提示框偏移必须是有限数值".to_string()));
        }

        Ok(())
    }
}

/// 当前已加载图片的概要。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub original_width: u32,
    pub original_height: u32,
    pub generation: u64,
}

struct SessionState {
    sampler: CursorSampler,
    image: Option<Arc<PreparedImage>>,
    loaded: Option<LoadedImage>,
}

/// 取色会话服务。
pub struct SamplerService {
    handler: ImageHandler,
    state: Mutex<SessionState>,
    generation: AtomicU64,
    palette_colors: usize,
}

impl SamplerService {
    pub fn new(config: SamplerConfig) -> Result<Self, AppError> {
        config.validate()?;

        log::info!(
            "🚀 取色会话已创建（max_dim={}, palette={}）",
            config.image.max_dimension,
            config.palette_colors
        );
        let handler = ImageHandler::new(config.image)?;

        Ok(Self {
            handler,
            state: Mutex::new(SessionState {
                sampler: CursorSampler::new(config.tooltip),
                image: None,
                loaded: None,
            }),
            generation: AtomicU64::new(0),
            palette_colors: config.palette_colors,
        })
    }

    /// 锁中毒时直接取回内部状态：状态只包含可整体替换的数据，不存在半更新。
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn handler(&self) -> &ImageHandler {
        &self.handler
    }

    /// 加载（或替换）图片。
    ///
    /// 返回新图片的显示位图；若在准备期间又有新的加载开始，返回 `ImageError::Superseded`。
    pub async fn load(&self, source: ImageSource) -> Result<DisplayBitmap, ImageError> {
        let hint = source.hint();
        let generation = self.begin_generation();
        log::info!("📥 开始加载图片 #{}（来源: {}）", generation, hint);

        let handler = self.handler.clone();
        let prepared = tokio::task::spawn_blocking(move || handler.prepare(source))
            .await
            .map_err(|e| ImageError::ResourceLimit(format!("图片准备任务异常终止：{}", e)))
            .and_then(|result| result);

        let prepared = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                log::error!("❌ 图片 #{} 准备失败 [{}]：{}", generation, e.code(), e);
                return Err(e);
            }
        };

        self.install(generation, prepared)
    }

    /// 在锁内推进代号并拆除当前图片，返回新代号。
    ///
    /// 代号推进与拆除必须在同一临界区内：较旧的加载不可能在较新的加载安装之后再执行拆除。
    fn begin_generation(&self) -> u64 {
        let mut state = self.lock();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        state.sampler.unload();
        state.image = None;
        state.loaded = None;
        generation
    }

    fn install(&self, generation: u64, prepared: PreparedImage) -> Result<DisplayBitmap, ImageError> {
        let mut state = self.lock();

        let latest = self.generation.load(Ordering::SeqCst);
        if latest != generation {
            log::warn!("⏭️ 图片 #{} 已被 #{} 取代，丢弃结果", generation, latest);
            return Err(ImageError::Superseded);
        }

        if let Err(e) = state.sampler.load(prepared.raster.clone()) {
            log::error!("❌ 图片 #{} 索引构建失败：{}", generation, e);
            return Err(e.into());
        }

        let (width, height) = prepared.dimensions();
        let (original_width, original_height) = prepared.original_size;
        let bitmap = prepared.bitmap.clone();

        state.loaded = Some(LoadedImage {
            width,
            height,
            original_width,
            original_height,
            generation,
        });
        state.image = Some(Arc::new(prepared));

        log::info!(
            "✅ 图片 #{} 已安装：{}x{}（原始 {}x{}）",
            generation,
            width,
            height,
            original_width,
            original_height
        );

        Ok(bitmap)
    }

    /// 卸载当前图片。进行中的加载同样作废。
    pub fn unload(&self) {
        let generation = self.begin_generation();
        log::debug!("🧹 会话已卸载（代号 #{}）", generation);
    }

    pub fn pointer_move(&self, pointer: PointerPosition, origin: ImageOrigin) -> TooltipUpdate {
        self.lock().sampler.pointer_move(pointer, origin)
    }

    pub fn pointer_leave(&self) -> TooltipUpdate {
        self.lock().sampler.pointer_leave()
    }

    pub fn color_at(&self, x: i64, y: i64) -> Option<HexColor> {
        self.lock().sampler.color_at(x, y)
    }

    pub fn sampler_state(&self) -> SamplerState {
        self.lock().sampler.state()
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().sampler.is_loaded()
    }

    pub fn loaded_image(&self) -> Option<LoadedImage> {
        self.lock().loaded.clone()
    }

    pub fn current_bitmap(&self) -> Option<DisplayBitmap> {
        self.lock().image.as_ref().map(|image| image.bitmap.clone())
    }

    pub fn set_tooltip_config(&self, tooltip: TooltipConfig) -> Result<(), AppError> {
        if !(tooltip.offset_x.is_finite() && tooltip.offset_y.is_finite()) {
            return Err(AppError::Config("提示框偏移必须是有限数值".to_string()));
        }
        self.lock().sampler.set_tooltip_config(tooltip);
        Ok(())
    }

    /// 提取当前图片的主色。未加载图片时返回空列表。
    pub async fn palette(&self, n_colors: Option<usize>) -> Result<Vec<PaletteColor>, ImageError> {
        let n_colors = n_colors.unwrap_or(self.palette_colors);
        let current = self.lock().image.clone();
        let Some(image) = current else {
            log::debug!("🎨 尚未加载图片，主色为空");
            return Ok(Vec::new());
        };

        tokio::task::spawn_blocking(move || palette::extract_palette(&image.raster, n_colors))
            .await
            .map_err(|e| ImageError::ResourceLimit(format!("主色提取任务异常终止：{}", e)))?
    }

    /// 切换预览档位，下一次加载生效。
    pub fn set_preview_profile(&self, profile: &str) -> Result<(), ImageError> {
        let profile = ImagePreviewProfile::parse(profile)?;
        self.handler.set_preview_profile(profile)
    }

    pub fn get_preview_profile(&self) -> Result<String, ImageError> {
        Ok(self.handler.get_preview_profile()?.as_str().to_string())
    }
}
