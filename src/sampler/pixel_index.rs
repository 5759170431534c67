//! # 像素索引
//!
//! ## 设计思路
//!
//! 将栅格一次性转换为按行优先排列的 `HexColor` 平铺数组，
//! 查询时按 `y * width + x` 直接寻址，保证指针事件路径上是 O(1) 纯内存访问。
//!
//! ## 实现思路
//!
//! - 构建时校验像素数量与 `width * height` 一致，不一致返回 `InvalidRaster`。
//! - 查询坐标使用 `i64`，负数与超界坐标统一返回 `None`。
//! - 构建后不可变；换图时整体丢弃重建。

use crate::color::{HexColor, Rgb};
use crate::raster::Raster;

use super::SamplerError;

/// 单张图片的只读取色索引。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelIndex {
    width: u32,
    height: u32,
    colors: Vec<HexColor>,
}

impl PixelIndex {
    /// 基于栅格构建索引。
    ///
    /// # 示例
    /// ```rust
    /// use pixel_peek::color::Rgb;
    /// use pixel_peek::raster::Raster;
    /// use pixel_peek::sampler::PixelIndex;
    ///
    /// let raster = Raster::from_parts(2, 1, vec![Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)]);
    /// let index = PixelIndex::build(raster)?;
    /// assert_eq!(index.color_at(1, 0).unwrap(), "0000FF");
    /// assert!(index.color_at(2, 0).is_none());
    /// # Ok::<(), pixel_peek::sampler::SamplerError>(())
    /// ```
    pub fn build(raster: Raster) -> Result<Self, SamplerError> {
        let (width, height) = raster.dimensions();
        let expected = raster.expected_len();
        let actual = raster.pixels().len();

        if expected != Some(actual) {
            return Err(SamplerError::InvalidRaster {
                width,
                height,
                expected,
                actual,
            });
        }

        let colors = raster.into_pixels().into_iter().map(HexColor::from).collect();

        log::debug!("🗂️ 像素索引已构建：{}x{}（{} 像素）", width, height, actual);

        Ok(Self {
            width,
            height,
            colors,
        })
    }

    /// 查询坐标处的颜色；越界（含负坐标）返回 `None`。
    pub fn color_at(&self, x: i64, y: i64) -> Option<HexColor> {
        let offset = self.offset(x, y)?;
        self.colors.get(offset).copied()
    }

    pub fn rgb_at(&self, x: i64, y: i64) -> Option<Rgb> {
        self.color_at(x, y).map(HexColor::rgb)
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        self.offset(x, y).is_some()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}
