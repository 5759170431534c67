//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `ImageConfig`，保证运行时行为可观测、可调整、可测试。
//! 其中预览档位（compact / balanced / detailed）作为高层语义，映射到底层参数组合。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的平衡配置（最长边上限 `DEFAULT_MAX_DIMENSION`）。
//! - `ImagePreviewProfile` 负责档位字符串解析与反向输出。
//! - `apply_preview_profile` 将档位转换为具体阈值。
//! - `infer_preview_profile` 用于从当前配置反推档位（给宿主展示状态）。
//!
//! 最长边上限决定了宿主需要持有的像素网格大小，直接影响传输与内存开销。

use image::imageops::FilterType;

use super::ImageError;

/// 显示与取色使用的最长边上限（像素）。
pub const DEFAULT_MAX_DIMENSION: u32 = 500;

const COMPACT_MAX_DIMENSION: u32 = 400;
const DETAILED_MAX_DIMENSION: u32 = 600;

/// 图片准备配置。
///
/// 字段覆盖了读取、解码、降采样三个阶段。
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// 读取原始字节时允许的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 降采样后宽/高单边最大值；两边都不超过时保持原始分辨率。
    pub max_dimension: u32,
    /// 降采样滤镜策略。
    pub resize_filter: FilterType,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_file_size: 20 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            max_dimension: DEFAULT_MAX_DIMENSION,
            resize_filter: FilterType::Triangle,
        }
    }
}

/// 图片预览档位（面向产品/用户语义）。
///
/// - `Compact`：最长边 400，传输最小
/// - `Balanced`：最长边 500
/// - `Detailed`：最长边 600，细节最多
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePreviewProfile {
    Compact,
    Balanced,
    Detailed,
}

impl ImagePreviewProfile {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust
    /// use pixel_peek::image_handler::ImagePreviewProfile;
    ///
    /// let p = ImagePreviewProfile::parse("balanced")?;
    /// assert_eq!(p.as_str(), "balanced");
    /// # Ok::<(), pixel_peek::image_handler::ImageError>(())
    /// ```
    pub fn parse(profile: &str) -> Result<Self, ImageError> {
        match profile.trim().to_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "balanced" => Ok(Self::Balanced),
            "detailed" => Ok(Self::Detailed),
            other => Err(ImageError::InvalidFormat(format!(
                "未知预览档位：{}（可选：compact / balanced / detailed）",
                other
            ))),
        }
    }

    /// 将档位输出为稳定字符串，供宿主展示。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Balanced => "balanced",
            Self::Detailed => "detailed",
        }
    }
}

impl ImageConfig {
    /// 基于当前参数反推预览档位。
    pub(crate) fn infer_preview_profile(&self) -> ImagePreviewProfile {
        if self.max_dimension <= COMPACT_MAX_DIMENSION {
            return ImagePreviewProfile::Compact;
        }

        if self.max_dimension >= DETAILED_MAX_DIMENSION {
            return ImagePreviewProfile::Detailed;
        }

        ImagePreviewProfile::Balanced
    }

    /// 应用指定预览档位到实际参数。
    pub(crate) fn apply_preview_profile(&mut self, profile: ImagePreviewProfile) {
        match profile {
            ImagePreviewProfile::Compact => {
                self.max_dimension = COMPACT_MAX_DIMENSION;
                self.resize_filter = FilterType::Nearest;
            }
            ImagePreviewProfile::Balanced => {
                self.max_dimension = DEFAULT_MAX_DIMENSION;
                self.resize_filter = FilterType::Triangle;
            }
            ImagePreviewProfile::Detailed => {
                self.max_dimension = DETAILED_MAX_DIMENSION;
                self.resize_filter = FilterType::CatmullRom;
            }
        }
    }

    /// 校验配置的取值范围。
    pub(crate) fn validate(&self) -> Result<(), ImageError> {
        if self.max_dimension == 0 {
            return Err(ImageError::InvalidFormat("max_dimension 必须大于 0".to_string()));
        }
        if self.max_file_size == 0 {
            return Err(ImageError::InvalidFormat("max_file_size 必须大于 0".to_string()));
        }
        if self.max_decoded_bytes < 8 * 1024 * 1024 {
            return Err(ImageError::InvalidFormat("max_decoded_bytes 不能小于 8MB".to_string()));
        }
        if self.max_decoded_pixels < self.max_dimension as u64 * self.max_dimension as u64 {
            return Err(ImageError::InvalidFormat(
                "max_decoded_pixels 不能小于 max_dimension 的平方".to_string(),
            ));
        }
        Ok(())
    }
}
