//! # 主色提取模块
//!
//! ## 设计思路
//!
//! 在已加载的栅格上提取若干主色，作为逐像素取色之外的整体配色参考。
//!
//! ## 实现思路
//!
//! 1. 按最近邻采样把栅格重采样为固定的 100x100 网格，占比与图片尺寸无关
//! 2. 在 sRGB 空间用 `kmeans_colors::get_kmeans` 聚类（k-means++ 初始化）
//! 3. 使用固定种子运行多次，取得分最低的一次，结果可复现
//! 4. 中心转换回 8 位颜色，按像素占比降序输出
//!
//! 不同颜色数少于请求数量时，聚类数收缩为实际颜色数。

use kmeans_colors::{Kmeans, get_kmeans};
use ::palette::Srgb;
use serde::Serialize;

use crate::color::{HexColor, Rgb};
use crate::image_handler::ImageError;
use crate::raster::Raster;

/// 默认主色数量。
pub const DEFAULT_PALETTE_COLORS: usize = 10;
/// 允许的主色数量范围。
pub const PALETTE_COLOR_RANGE: std::ops::RangeInclusive<usize> = 2..=20;

const SAMPLE_EDGE: u32 = 100;
const MAX_ITERATIONS: usize = 20;
const CONVERGE: f32 = 1e-4;
const RUNS: u64 = 10;
const SEED: u64 = 42;

/// 一个主色及其占比。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteColor {
    pub hex: HexColor,
    pub rgb: Rgb,
    /// 该簇覆盖的采样像素数。
    pub pixels: usize,
    /// 占全部采样像素的比例（0.0 ~ 1.0）。
    pub share: f64,
}

/// 提取主色。
///
/// ```rust
/// use pixel_peek::color::Rgb;
/// use pixel_peek::palette::extract_palette;
/// use pixel_peek::raster::Raster;
///
/// let mut pixels = vec![Rgb::new(255, 0, 0); 3];
/// pixels.push(Rgb::new(0, 0, 255));
/// let raster = Raster::from_parts(2, 2, pixels);
///
/// let palette = extract_palette(&raster, 2)?;
/// assert_eq!(palette[0].hex, "FF0000");
/// assert_eq!(palette[0].share, 0.75);
/// # Ok::<(), pixel_peek::image_handler::ImageError>(())
/// ```
pub fn extract_palette(raster: &Raster, n_colors: usize) -> Result<Vec<PaletteColor>, ImageError> {
    if !PALETTE_COLOR_RANGE.contains(&n_colors) {
        return Err(ImageError::InvalidFormat(format!(
            "主色数量应在 {}~{} 之间，实际为 {}",
            PALETTE_COLOR_RANGE.start(),
            PALETTE_COLOR_RANGE.end(),
            n_colors
        )));
    }
    if !raster.is_consistent() {
        return Err(ImageError::Decode("像素栅格长度与尺寸不一致".to_string()));
    }

    let samples = sample_pixels(raster);
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    // k-means++ 初始化要求 k 不超过不同颜色数
    let mut distinct = samples.clone();
    distinct.sort_by_key(|rgb| (rgb.r, rgb.g, rgb.b));
    distinct.dedup();
    let k = n_colors.min(distinct.len());

    let points: Vec<Srgb> = samples
        .iter()
        .map(|rgb| Srgb::new(rgb.r, rgb.g, rgb.b).into_format())
        .collect();

    let Some(best) = best_of_runs(k, &points) else {
        return Ok(Vec::new());
    };

    let mut counts = vec![0usize; best.centroids.len()];
    for &cluster in &best.indices {
        counts[cluster as usize] += 1;
    }

    let total = samples.len() as f64;
    let mut palette: Vec<PaletteColor> = best
        .centroids
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(centroid, count)| {
            let c: Srgb<u8> = centroid.into_format();
            let rgb = Rgb::new(c.red, c.green, c.blue);
            PaletteColor {
                hex: rgb.to_hex(),
                rgb,
                pixels: count,
                share: count as f64 / total,
            }
        })
        .collect();

    palette.sort_by(|a, b| b.pixels.cmp(&a.pixels).then_with(|| a.hex.to_string().cmp(&b.hex.to_string())));

    log::info!(
        "🎨 主色提取完成：请求 {} 个，得到 {} 个（采样 {} 像素，score={:.4}）",
        n_colors,
        palette.len(),
        samples.len(),
        best.score
    );

    Ok(palette)
}

/// 固定种子多次运行，保留得分最低的结果。
fn best_of_runs(k: usize, points: &[Srgb]) -> Option<Kmeans<Srgb>> {
    (0..RUNS)
        .map(|run| get_kmeans(k, MAX_ITERATIONS, CONVERGE, false, points, SEED + run))
        .min_by(|a, b| a.score.total_cmp(&b.score))
}

/// 最近邻重采样到 `SAMPLE_EDGE x SAMPLE_EDGE`（大图缩小、小图放大）。
fn sample_pixels(raster: &Raster) -> Vec<Rgb> {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let pixels = raster.pixels();
    let mut samples = Vec::with_capacity((SAMPLE_EDGE * SAMPLE_EDGE) as usize);
    for ty in 0..SAMPLE_EDGE {
        let sy = (ty as u64 * height as u64 / SAMPLE_EDGE as u64) as usize;
        for tx in 0..SAMPLE_EDGE {
            let sx = (tx as u64 * width as u64 / SAMPLE_EDGE as u64) as usize;
            samples.push(pixels[sy * width as usize + sx]);
        }
    }
    samples
}
