//! # 解码与变换流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → 图像 → RGB 栅格”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先做尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 读取 header 尺寸
//! 2. 按像素/内存上限快速拒绝
//! 3. 完整解码
//! 4. 转换为 RGB8（直接丢弃 alpha，不做合成）
//! 5. 最长边超过上限时按比例降采样
//! 6. 构建栅格并编码显示位图
//!
//! 降采样必须在建立取色索引之前完成：显示尺寸与栅格尺寸 1:1 对应。

use fast_image_resize as fr;
use image::{DynamicImage, GenericImageView, RgbImage};
use std::io::Cursor;

use super::source::{PreparedImage, RawImageData};
use super::{ImageConfig, ImageError, ImageHandler};
use crate::raster::Raster;

/// 按最长边上限计算目标尺寸（保持宽高比，只缩小不放大）。
///
/// ```rust
/// use pixel_peek::image_handler::capped_dimensions;
///
/// assert_eq!(capped_dimensions(1000, 500, 500), (500, 250));
/// assert_eq!(capped_dimensions(300, 200, 500), (300, 200));
/// ```
pub fn capped_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width == 0 || height == 0 || max_dimension == 0 {
        return (width, height);
    }
    if width <= max_dimension && height <= max_dimension {
        return (width, height);
    }

    // 长边直接取上限，短边按整数比例向下取整，避免浮点误差让长边少 1 像素
    let scale_side = |side: u32, longer: u32| {
        let scaled = side as u64 * max_dimension as u64 / longer as u64;
        (scaled as u32).max(1)
    };

    if width >= height {
        (max_dimension, scale_side(height, width))
    } else {
        (scale_side(width, height), max_dimension)
    }
}

impl ImageHandler {
    /// 将原始字节解码为可交给取色器的栅格与显示位图。
    pub(crate) fn decode_and_prepare(
        &self,
        raw: RawImageData,
        config: &ImageConfig,
    ) -> Result<PreparedImage, ImageError> {
        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        self.validate_pixel_limits(config, header_width, header_height)?;
        self.validate_decoded_memory_limits(config, header_width, header_height)?;

        let decoded = image::load_from_memory(&raw.bytes)
            .map_err(|e| ImageError::Decode(format!("图片解码失败：{}", e)))?;

        let (raw_width, raw_height) = decoded.dimensions();
        self.validate_pixel_limits(config, raw_width, raw_height)?;
        self.validate_decoded_memory_limits(config, raw_width, raw_height)?;

        // alpha 直接丢弃：按完全不透明处理
        let rgb = decoded.to_rgb8();
        let optimized = self.maybe_downscale(rgb, config);
        let (width, height) = optimized.dimensions();

        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or_else(|| ImageError::ResourceLimit("图片尺寸导致内存溢出风险".to_string()))?;

        if optimized.as_raw().len() != expected_len {
            return Err(ImageError::Decode("解码后像素数据长度异常".to_string()));
        }

        let bitmap = Self::encode_display_bitmap(&optimized)?;
        let raster = Raster::from_rgb_image(&optimized);

        log::info!(
            "✅ 图片解码成功 - 来源: {} 原始尺寸: {}x{} 输出尺寸: {}x{}",
            raw.source_hint,
            raw_width,
            raw_height,
            width,
            height
        );

        Ok(PreparedImage {
            raster,
            bitmap,
            original_size: (raw_width, raw_height),
        })
    }

    /// 仅通过内存中的图片头信息读取宽高。
    ///
    /// 用于在完整解码前做像素限制检查。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), ImageError> {
        let cursor = Cursor::new(bytes);
        let reader = image::ImageReader::new(cursor)
            .with_guessed_format()
            .map_err(|e| ImageError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| ImageError::Decode(format!("无法读取图片尺寸：{}", e)))
    }

    /// 校验像素数量是否超过配置上限。
    fn validate_pixel_limits(
        &self,
        config: &ImageConfig,
        width: u32,
        height: u32,
    ) -> Result<(), ImageError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| ImageError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > config.max_decoded_pixels {
            return Err(ImageError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    fn validate_decoded_memory_limits(
        &self,
        config: &ImageConfig,
        width: u32,
        height: u32,
    ) -> Result<(), ImageError> {
        let estimated = (width as u64)
            .checked_mul(height as u64)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| ImageError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > config.max_decoded_bytes {
            return Err(ImageError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                config.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }

    /// 最长边超过上限时按比例降采样，否则原样返回。
    fn maybe_downscale(&self, image: RgbImage, config: &ImageConfig) -> RgbImage {
        let (width, height) = image.dimensions();
        let (target_width, target_height) = capped_dimensions(width, height, config.max_dimension);

        if (target_width, target_height) == (width, height) {
            return image;
        }

        log::info!(
            "🧩 按最长边 {} 降采样：{}x{} -> {}x{}（filter={:?}）",
            config.max_dimension,
            width,
            height,
            target_width,
            target_height,
            config.resize_filter
        );

        match Self::resize_with_fast_image_resize(&image, target_width, target_height, config.resize_filter) {
            Ok(resized) => resized,
            Err(err) => {
                log::warn!(
                    "⚠️ fast_image_resize 降采样失败，回退 image::resize_exact：{}",
                    err
                );
                DynamicImage::ImageRgb8(image)
                    .resize_exact(target_width, target_height, config.resize_filter)
                    .to_rgb8()
            }
        }
    }

    fn resize_with_fast_image_resize(
        image: &RgbImage,
        target_width: u32,
        target_height: u32,
        filter: image::imageops::FilterType,
    ) -> Result<RgbImage, ImageError> {
        let (src_width, src_height) = image.dimensions();

        let src_image = fr::images::Image::from_vec_u8(
            src_width,
            src_height,
            image.as_raw().clone(),
            fr::PixelType::U8x3,
        )
        .map_err(|e| ImageError::Decode(format!("构建源图像缓冲失败：{}", e)))?;

        let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x3);

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(
            Self::to_fast_filter(filter),
        ));

        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| ImageError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

        RgbImage::from_raw(target_width, target_height, dst_image.into_vec())
            .ok_or_else(|| ImageError::Decode("fast_image_resize 输出缓冲长度异常".to_string()))
    }

    fn to_fast_filter(filter: image::imageops::FilterType) -> fr::FilterType {
        match filter {
            image::imageops::FilterType::Nearest => fr::FilterType::Box,
            image::imageops::FilterType::Triangle => fr::FilterType::Bilinear,
            image::imageops::FilterType::CatmullRom => fr::FilterType::CatmullRom,
            image::imageops::FilterType::Gaussian => fr::FilterType::Mitchell,
            image::imageops::FilterType::Lanczos3 => fr::FilterType::Lanczos3,
        }
    }
}
