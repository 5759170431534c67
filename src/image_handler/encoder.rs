//! # 显示位图编码模块
//!
//! ## 设计思路
//!
//! 显示位图必须与取色栅格逐像素一致，因此只使用无损 PNG。
//! 有损编码会让“看到的颜色”和“报出的十六进制值”不一致。
//!
//! ## 实现思路
//!
//! - `image` 的 PNG 编码器写入内存缓冲
//! - 同时生成 `data:image/png;base64,...`，宿主可直接作为图片地址使用

use base64::{Engine as _, engine::general_purpose};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};

use super::source::DisplayBitmap;
use super::{ImageError, ImageHandler};

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

impl ImageHandler {
    /// 将 RGB 图像编码为无损 PNG 显示位图。
    pub(crate) fn encode_display_bitmap(image: &RgbImage) -> Result<DisplayBitmap, ImageError> {
        let (width, height) = image.dimensions();
        let mut png = Vec::new();

        PngEncoder::new(&mut png)
            .write_image(image.as_raw(), width, height, ExtendedColorType::Rgb8)
            .map_err(|e| ImageError::Encode(format!("PNG 编码失败：{}", e)))?;

        let data_url = format!("{}{}", PNG_DATA_URL_PREFIX, general_purpose::STANDARD.encode(&png));

        log::debug!(
            "🖼️ 显示位图已编码：{}x{} png={}KB",
            width,
            height,
            png.len() / 1024
        );

        Ok(DisplayBitmap {
            width,
            height,
            png,
            data_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_bitmap_decodes_back_to_identical_pixels() {
        let source = RgbImage::from_fn(17, 9, |x, y| image::Rgb([(x * 13) as u8, (y * 29) as u8, (x ^ y) as u8]));

        let bitmap = ImageHandler::encode_display_bitmap(&source).expect("encode should succeed");
        let decoded = image::load_from_memory(&bitmap.png).expect("png should decode").to_rgb8();

        assert_eq!((bitmap.width, bitmap.height), (17, 9));
        assert_eq!(decoded, source);
    }

    #[test]
    fn data_url_wraps_png_bytes() {
        let source = RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3]));

        let bitmap = ImageHandler::encode_display_bitmap(&source).expect("encode should succeed");

        assert!(bitmap.data_url.starts_with(PNG_DATA_URL_PREFIX));
        let payload = &bitmap.data_url[PNG_DATA_URL_PREFIX.len()..];
        assert_eq!(general_purpose::STANDARD.decode(payload).unwrap(), bitmap.png);
    }
}
