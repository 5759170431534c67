//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理不同来源（上传字节 / Base64 / 本地文件）的原始字节加载，并在“尽可能早”的阶段执行输入校验。
//! 目标是尽快失败，减少不必要内存与 CPU 消耗。
//!
//! ## 实现思路
//!
//! - 字节：体积限制。
//! - Base64：格式解析 + 解码前体积估算 + 解码后体积限制。
//! - 文件：存在性 + metadata 体积限制 + 读取。
//! - 最后统一做文件签名（magic bytes）校验：只放行 PNG / JPEG。

use base64::{Engine as _, engine::general_purpose};
use std::path::Path;

use super::source::RawImageData;
use super::{ImageConfig, ImageError, ImageHandler};

/// 允许进入解码阶段的 MIME 类型。
const ACCEPTED_MIME_TYPES: [&str; 2] = ["image/png", "image/jpeg"];

impl ImageHandler {
    /// 从上传字节加载。
    pub(super) fn load_from_bytes(
        &self,
        bytes: Vec<u8>,
        config: &ImageConfig,
    ) -> Result<RawImageData, ImageError> {
        log::info!("📦 开始处理上传图片 - {} 字节", bytes.len());

        Self::validate_file_size(bytes.len() as u64, config, "上传内容")?;
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "bytes",
        })
    }

    /// 从 Base64 字符串加载图片原始字节。
    pub(super) fn load_from_base64(
        &self,
        data: &str,
        config: &ImageConfig,
    ) -> Result<RawImageData, ImageError> {
        log::info!("📝 开始处理 base64 图片");

        let bytes = Self::parse_base64_with_limit(data, config.max_file_size)?;

        Self::validate_file_size(bytes.len() as u64, config, "Base64 解码后体积")?;
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "base64",
        })
    }

    /// 从本地路径加载图片原始字节。
    pub(super) fn load_from_file(
        &self,
        path: &Path,
        config: &ImageConfig,
    ) -> Result<RawImageData, ImageError> {
        log::info!("📁 开始读取本地图片 - 路径: {}", path.display());

        if !path.exists() {
            return Err(ImageError::FileSystem(format!("文件不存在：{}", path.display())));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| ImageError::FileSystem(format!("无法读取文件信息：{}", e)))?;
        Self::validate_file_size(metadata.len(), config, "文件")?;

        let bytes = std::fs::read(path)
            .map_err(|e| ImageError::FileSystem(format!("无法读取图片文件：{}", e)))?;
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "file",
        })
    }

    fn validate_file_size(len: u64, config: &ImageConfig, what: &str) -> Result<(), ImageError> {
        if len > config.max_file_size {
            return Err(ImageError::ResourceLimit(format!(
                "{}过大：{:.2} MB（限制：{:.2} MB）",
                what,
                len as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }
        Ok(())
    }

    fn estimate_base64_decoded_upper_bound_len(base64_data: &str) -> Result<u64, ImageError> {
        let len = base64_data.trim().len() as u64;
        let groups = len
            .checked_add(3)
            .ok_or_else(|| ImageError::ResourceLimit("Base64 输入长度溢出".to_string()))?
            / 4;

        groups
            .checked_mul(3)
            .ok_or_else(|| ImageError::ResourceLimit("Base64 解码体积估算溢出".to_string()))
    }

    /// 解析 Base64 输入（支持 Data URL / 纯 Base64），解码前按上限估算体积。
    fn parse_base64_with_limit(data: &str, max_file_size: u64) -> Result<Vec<u8>, ImageError> {
        let normalized = data.trim();

        let base64_data = if normalized.starts_with("data:") {
            let base64_start = normalized
                .find(";base64,")
                .ok_or_else(|| ImageError::InvalidFormat("缺少 base64 标记".to_string()))?;
            &normalized[base64_start + 8..]
        } else {
            normalized
        };

        let estimated_len = Self::estimate_base64_decoded_upper_bound_len(base64_data)?;
        if estimated_len > max_file_size {
            return Err(ImageError::ResourceLimit(format!(
                "Base64 预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
                estimated_len as f64 / 1024.0 / 1024.0,
                max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        general_purpose::STANDARD
            .decode(base64_data)
            .map_err(|e| ImageError::Decode(format!("Base64 解码失败：{}", e)))
    }

    /// 通过文件签名（magic bytes）校验输入是否为受支持的图片。
    fn validate_image_signature(bytes: &[u8]) -> Result<(), ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::InvalidFormat("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| ImageError::InvalidFormat("无法识别图片类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(ImageError::InvalidFormat(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        if !ACCEPTED_MIME_TYPES.contains(&kind.mime_type()) {
            return Err(ImageError::UnsupportedFormat(kind.mime_type().to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn encode(format: ImageFormat) -> Vec<u8> {
        let rgb = RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
        let img = match format {
            ImageFormat::Gif => DynamicImage::ImageRgba8(DynamicImage::ImageRgb8(rgb).to_rgba8()),
            _ => DynamicImage::ImageRgb8(rgb),
        };
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, format).expect("failed to encode test image");
        cursor.into_inner()
    }

    #[test]
    fn signature_accepts_png_and_jpeg() {
        assert!(ImageHandler::validate_image_signature(&encode(ImageFormat::Png)).is_ok());
        assert!(ImageHandler::validate_image_signature(&encode(ImageFormat::Jpeg)).is_ok());
    }

    #[test]
    fn signature_rejects_gif_as_unsupported() {
        let result = ImageHandler::validate_image_signature(&encode(ImageFormat::Gif));
        assert!(matches!(result, Err(ImageError::UnsupportedFormat(mime)) if mime == "image/gif"));
    }

    #[test]
    fn signature_rejects_empty_and_unknown() {
        assert!(matches!(
            ImageHandler::validate_image_signature(&[]),
            Err(ImageError::InvalidFormat(_))
        ));
        assert!(matches!(
            ImageHandler::validate_image_signature(b"Hello, world"),
            Err(ImageError::InvalidFormat(_))
        ));
    }

    #[test]
    fn load_from_base64_rejects_non_image_payload() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let config = ImageConfig::default();

        let result = handler.load_from_base64("SGVsbG8=", &config);

        assert!(matches!(result, Err(ImageError::InvalidFormat(_))));
    }

    #[test]
    fn load_from_base64_accepts_data_url() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let png = encode(ImageFormat::Png);
        let data_url = format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(&png));

        let raw = handler
            .load_from_base64(&data_url, &ImageConfig::default())
            .expect("data url should load");

        assert_eq!(raw.bytes, png);
        assert_eq!(raw.source_hint, "base64");
    }

    #[test]
    fn data_url_without_base64_marker_is_invalid() {
        let result = ImageHandler::parse_base64_with_limit("data:image/png,abcd", u64::MAX);
        assert!(matches!(result, Err(ImageError::InvalidFormat(_))));
    }

    #[test]
    fn parse_base64_with_limit_rejects_large_payload_before_decode() {
        let huge = "A".repeat(1024 * 1024);
        let result = ImageHandler::parse_base64_with_limit(&huge, 32);

        assert!(matches!(result, Err(ImageError::ResourceLimit(_))));
    }

    #[test]
    fn load_from_bytes_enforces_file_size() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let config = ImageConfig {
            max_file_size: 16,
            ..ImageConfig::default()
        };

        let result = handler.load_from_bytes(encode(ImageFormat::Png), &config);

        assert!(matches!(result, Err(ImageError::ResourceLimit(_))));
    }

    #[test]
    fn load_from_missing_file_is_file_system_error() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let path = std::env::temp_dir().join("pixel-peek-definitely-missing.png");

        let result = handler.load_from_file(&path, &ImageConfig::default());

        assert!(matches!(result, Err(ImageError::FileSystem(_))));
    }

    #[test]
    fn load_from_file_reads_png() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let path = std::env::temp_dir().join(format!("pixel-peek-loader-{}.png", std::process::id()));
        std::fs::write(&path, encode(ImageFormat::Png)).expect("write temp file");

        let raw = handler.load_from_file(&path, &ImageConfig::default());
        let _ = std::fs::remove_file(&path);

        assert_eq!(raw.expect("file should load").source_hint, "file");
    }
}
