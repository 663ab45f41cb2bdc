// saito.rs — Two-stage row/column distance transform (CPU reference).
//
// The separable formulation of the Euclidean distance transform:
//
//   Stage A  per row:    horizontal distance to the nearest Object pixel and
//                        to the nearest Empty pixel in the same row.
//   Stage B  per pixel:  min over rows y' of (y − y')² + rowDist(x, y')²,
//                        for both components, then dual-field encoding.
//
// With the full column scanned (`column_radius: None`) Stage B is exact on
// exact row distances, so this variant is the exact EDT that the 8SSEDT
// sweep approximates. A finite radius bounds the cost per pixel and leaves
// pixels further than `radius` rows from every seed saturated.
//
// BUFFER CONTRACT
// ───────────────
// Stage A output is a flat `width × height` array of `RowDistance`
// (two f32 per pixel), row-major. The GPU kernels in gpu/sdf.rs read and
// write the same layout byte-for-byte, so this module is their validation
// oracle. Every Stage A value is an integer-valued f32 (or ROW_UNRESOLVED),
// so both backends produce identical intermediates.
//
// PARALLELISM
// ───────────
// Stage A: rows are independent; rayon splits the buffer by row.
// Stage B: every output pixel reads only Stage A results; rayon splits the
// output by row. No locking and no shared mutable state.

use rayon::prelude::*;

use crate::encode::{magnitude_of_distance, quantize, scale_for_height, signed_dual};
use crate::error::SdfError;
use crate::image::Image;

/// Hard width/height ceiling of the row/column transform.
pub const MAX_DIMENSION: usize = 2048;

/// Row distance stored when a row has no pixel of the requested class.
///
/// Squared, it dominates every in-range squared distance, and its root
/// saturates the encoder for any texture height.
pub const ROW_UNRESOLVED: f32 = 1.0e6;

/// Configuration for the row/column transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaitoConfig {
    /// Largest accepted width or height. Values above [`MAX_DIMENSION`]
    /// are treated as `MAX_DIMENSION`.
    pub max_dimension: usize,
    /// Rows scanned on each side of a pixel in Stage B. `None` scans the
    /// whole column.
    pub column_radius: Option<u32>,
}

impl Default for SaitoConfig {
    fn default() -> Self {
        SaitoConfig { max_dimension: MAX_DIMENSION, column_radius: None }
    }
}

impl SaitoConfig {
    /// Effective dimension ceiling.
    pub fn limit(&self) -> usize {
        self.max_dimension.min(MAX_DIMENSION)
    }

    /// Stage B window for a texture of the given height.
    pub fn radius_for(&self, height: usize) -> usize {
        self.column_radius.map_or(height, |r| r as usize)
    }
}

/// Stage A result for one pixel. Layout matches `vec2<f32>` in saito.wgsl.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RowDistance {
    /// Horizontal distance to the nearest Object pixel in the row.
    pub to_object: f32,
    /// Horizontal distance to the nearest Empty pixel in the row.
    pub to_empty: f32,
}

impl RowDistance {
    pub const UNRESOLVED: RowDistance =
        RowDistance { to_object: ROW_UNRESOLVED, to_empty: ROW_UNRESOLVED };
}

/// Squared Euclidean distances after Stage B.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnDistance {
    pub sqr_to_object: f32,
    pub sqr_to_empty: f32,
}

/// Precondition checks, run before anything is allocated.
pub fn validate_dimensions(width: usize, height: usize, config: &SaitoConfig) -> Result<(), SdfError> {
    crate::seed::validate_dimensions(width, height)?;
    let limit = config.limit();
    if width > limit || height > limit {
        log::warn!("rejecting {width}×{height} raster: row/column transform is limited to {limit}×{limit}");
        return Err(SdfError::SizeLimitExceeded { width, height, limit });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Stage A
// ---------------------------------------------------------------------------

/// Stage A over the whole mask.
pub fn row_distances(mask: &Image<bool>) -> Vec<RowDistance> {
    let w = mask.width();
    let mut rows = vec![RowDistance::UNRESOLVED; w * mask.height()];
    if w == 0 {
        return rows;
    }
    rows.par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, out)| scan_row(mask.row(y), out));
    rows
}

/// Forward then backward nearest-pixel scan over a single row.
fn scan_row(row: &[bool], out: &mut [RowDistance]) {
    let mut last_object: Option<usize> = None;
    let mut last_empty: Option<usize> = None;
    for (x, &is_object) in row.iter().enumerate() {
        if is_object {
            last_object = Some(x);
        } else {
            last_empty = Some(x);
        }
        out[x] = RowDistance {
            to_object: last_object.map_or(ROW_UNRESOLVED, |p| (x - p) as f32),
            to_empty: last_empty.map_or(ROW_UNRESOLVED, |p| (x - p) as f32),
        };
    }

    let mut next_object: Option<usize> = None;
    let mut next_empty: Option<usize> = None;
    for (x, &is_object) in row.iter().enumerate().rev() {
        if is_object {
            next_object = Some(x);
        } else {
            next_empty = Some(x);
        }
        if let Some(p) = next_object {
            out[x].to_object = out[x].to_object.min((p - x) as f32);
        }
        if let Some(p) = next_empty {
            out[x].to_empty = out[x].to_empty.min((p - x) as f32);
        }
    }
}

// ---------------------------------------------------------------------------
// Stage B
// ---------------------------------------------------------------------------

/// Minimum squared distance for pixel (x, y) over rows within `radius`.
#[inline]
pub fn column_minimum(
    rows: &[RowDistance],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    radius: usize,
) -> ColumnDistance {
    let lo = y.saturating_sub(radius);
    let hi = y.saturating_add(radius).min(height - 1);
    let mut best = ColumnDistance { sqr_to_object: f32::INFINITY, sqr_to_empty: f32::INFINITY };
    for yy in lo..=hi {
        let dy = yy.abs_diff(y) as f32;
        let r = rows[yy * width + x];
        best.sqr_to_object = best.sqr_to_object.min(dy * dy + r.to_object * r.to_object);
        best.sqr_to_empty = best.sqr_to_empty.min(dy * dy + r.to_empty * r.to_empty);
    }
    best
}

/// Stage B without encoding: squared distances for every pixel.
pub fn column_distances(
    rows: &[RowDistance],
    width: usize,
    height: usize,
    radius: usize,
) -> Vec<ColumnDistance> {
    (0..width * height)
        .into_par_iter()
        .map(|i| column_minimum(rows, width, height, i % width, i / width, radius))
        .collect()
}

/// Dual-field byte for a pair of squared distances.
#[inline]
pub fn encode_column(d: ColumnDistance, scale: f32) -> u8 {
    let outside = magnitude_of_distance(d.sqr_to_object.sqrt(), scale);
    let inside = magnitude_of_distance(d.sqr_to_empty.sqrt(), scale);
    quantize(signed_dual(outside, inside))
}

/// Stage B with inline encoding.
pub fn encode_columns(rows: &[RowDistance], width: usize, height: usize, radius: usize) -> Image<u8> {
    let scale = scale_for_height(height);
    let mut out = vec![0u8; width * height];
    out.par_chunks_mut(width).enumerate().for_each(|(y, line)| {
        for (x, px) in line.iter_mut().enumerate() {
            *px = encode_column(column_minimum(rows, width, height, x, y, radius), scale);
        }
    });
    Image::from_vec(width, height, out)
}

/// Full two-stage transform on CPU threads.
pub fn generate_sdf_saito(mask: &Image<bool>, config: &SaitoConfig) -> Result<Image<u8>, SdfError> {
    let (w, h) = (mask.width(), mask.height());
    validate_dimensions(w, h, config)?;
    let radius = config.radius_for(h);
    log::debug!("saito: {w}×{h} mask, column radius {radius}");

    let rows = row_distances(mask);
    Ok(encode_columns(&rows, w, h, radius))
}
