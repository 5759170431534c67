//! # 像素栅格
//!
//! 解码后的 RGB 像素网格：宽、高与按行优先排列的 `Rgb` 序列。
//!
//! `Raster` 本身不强制 `pixels.len() == width * height`，
//! 一致性由 `PixelIndex::build` 在建立索引时校验。

use crate::color::Rgb;

/// 按行优先存储的 RGB 栅格。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Raster {
    /// 直接由各部分组装，不做长度校验。
    pub fn from_parts(width: u32, height: u32, pixels: Vec<Rgb>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// 由 `image` 的 RGB8 缓冲构建（长度天然一致）。
    pub fn from_rgb_image(image: &image::RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let pixels = image.pixels().map(|p| Rgb::from(*p)).collect();
        Self::from_parts(width, height, pixels)
    }

    /// 转回 `image::RgbImage`，用于编码显示位图与缩略计算。
    ///
    /// 长度不一致时返回 `None`。
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        let bytes: Vec<u8> = self
            .pixels
            .iter()
            .flat_map(|p| [p.r, p.g, p.b])
            .collect();
        image::RgbImage::from_raw(self.width, self.height, bytes)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub(crate) fn into_pixels(self) -> Vec<Rgb> {
        self.pixels
    }

    /// `width * height`，溢出时返回 `None`。
    pub fn expected_len(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    pub fn is_consistent(&self) -> bool {
        self.expected_len() == Some(self.pixels.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgb_image_keeps_row_major_order() {
        let image = image::RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8, y as u8, 7]));
        let raster = Raster::from_rgb_image(&image);

        assert_eq!(raster.dimensions(), (3, 2));
        assert_eq!(raster.pixels()[1], Rgb::new(1, 0, 7));
        assert_eq!(raster.pixels()[3], Rgb::new(0, 1, 7));
        assert!(raster.is_consistent());
    }

    #[test]
    fn mismatched_parts_are_reported() {
        let raster = Raster::from_parts(2, 2, vec![Rgb::BLACK; 3]);
        assert!(!raster.is_consistent());
        assert!(raster.to_rgb_image().is_none());
    }

    #[test]
    fn rgb_image_round_trip() {
        let raster = Raster::from_parts(2, 1, vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)]);
        let image = raster.to_rgb_image().expect("consistent raster");
        assert_eq!(Raster::from_rgb_image(&image), raster);
    }
}
