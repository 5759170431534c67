//! # 索引错误
//!
//! 仅覆盖内部一致性失败。越界坐标不属于错误，由 `Option::None` 表达。

/// 取色索引构建错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SamplerError {
    /// 像素数量与 `width * height` 不一致（或尺寸乘积溢出）。
    #[error("像素栅格不一致：{width}x{height} 需要 {expected:?} 个像素，实际 {actual} 个")]
    InvalidRaster {
        width: u32,
        height: u32,
        expected: Option<usize>,
        actual: usize,
    },
}
