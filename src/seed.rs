// seed.rs — Mask classification and initial grid state.
//
// Single-field seeding marks every cell with its class and leaves it
// unresolved. No cell starts at distance zero: the sweep discovers the
// boundary lazily, when a cell compares against a neighbor of the other
// class (see `Propagation::CrossClass` in sweep.rs).
//
// Dual-field seeding writes both grids of a `FieldPair`. A pixel is a
// zero-distance seed in the grid that tracks its own class and unresolved
// in the other:
//
//   mask pixel   to_object   to_empty
//   ──────────   ─────────   ────────
//   object       0           ∞
//   empty        ∞           0

use crate::error::SdfError;
use crate::grid::{Cell, CellClass, FieldPair, Grid, UNRESOLVED};
use crate::image::Image;

/// Map a mask pixel to its cell class.
#[inline]
pub fn classify(is_object: bool) -> CellClass {
    if is_object { CellClass::Object } else { CellClass::Empty }
}

/// Reject dimensions the sweep cannot represent.
///
/// - Either side zero → [`SdfError::InvalidDimensions`].
/// - `width² + height²` at or above [`UNRESOLVED`] → [`SdfError::DistanceOverflow`].
///   Every offset the sweep can produce is bounded by the grid extent, so
///   this keeps all candidate squared distances strictly below the sentinel.
pub fn validate_dimensions(width: usize, height: usize) -> Result<(), SdfError> {
    if width == 0 || height == 0 {
        log::warn!("rejecting {width}×{height} raster: zero area");
        return Err(SdfError::InvalidDimensions { width, height });
    }
    let w = width as u64;
    let h = height as u64;
    if w * w + h * h >= UNRESOLVED as u64 {
        log::warn!("rejecting {width}×{height} raster: squared distances would reach the sentinel");
        return Err(SdfError::DistanceOverflow { width, height });
    }
    Ok(())
}

/// Initial grid for the single-field transform.
pub fn seed_single(mask: &Image<bool>) -> Result<Grid, SdfError> {
    validate_dimensions(mask.width(), mask.height())?;
    Ok(Grid::from_fn(mask.width(), mask.height(), |x, y| {
        Cell::unresolved(classify(mask.get(x, y)))
    }))
}

/// Initial field pair for the dual-field transform.
pub fn seed_dual(mask: &Image<bool>) -> Result<FieldPair, SdfError> {
    validate_dimensions(mask.width(), mask.height())?;

    let seed_for = |tracked: CellClass| {
        Grid::from_fn(mask.width(), mask.height(), |x, y| {
            let class = classify(mask.get(x, y));
            if class == tracked { Cell::seed(class) } else { Cell::unresolved(class) }
        })
    };

    Ok(FieldPair {
        to_object: seed_for(CellClass::Object),
        to_empty: seed_for(CellClass::Empty),
    })
}
