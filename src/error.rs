// error.rs — Precondition failures for every transform entry point.
//
// All variants are raised before any grid or buffer is allocated. Once the
// checks pass, the transforms are total: there is no mid-sweep failure.

use thiserror::Error;

use crate::gpu::device::GpuError;

/// Errors returned by the SDF generators.
#[derive(Debug, Error)]
pub enum SdfError {
    /// Width or height is zero.
    #[error("invalid raster dimensions {width}×{height}: both must be at least 1")]
    InvalidDimensions { width: usize, height: usize },

    /// A flat raster whose length does not match the declared dimensions.
    #[error("raster holds {actual} pixels but {width}×{height} requires {expected}")]
    RasterSizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    /// The two-stage (row/column) transform has a hard dimension ceiling.
    #[error("raster {width}×{height} exceeds the {limit}×{limit} ceiling of the row/column transform")]
    SizeLimitExceeded {
        width: usize,
        height: usize,
        limit: usize,
    },

    /// `width² + height²` would reach the unresolved-distance sentinel.
    #[error("raster {width}×{height} is too large for 32-bit squared distances")]
    DistanceOverflow { width: usize, height: usize },

    #[error(transparent)]
    Gpu(#[from] GpuError),
}
