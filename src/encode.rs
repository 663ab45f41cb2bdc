// encode.rs — Quantization of converged distances into the output channel.
//
// Distances are normalized by a height-derived scale so that a texture of
// any size spans the same 8-bit range:
//
//   scale     = height / 256
//   magnitude = min(sqrt(sqr_distance) / scale, MAX_MAGNITUDE)
//
// Single-field (sign from the cell's class):
//   Object → 128 + magnitude        Empty → 128 − magnitude
//
// Dual-field (sign from the subtraction):
//   128 + magnitude(to_object) − magnitude(to_empty)
//   positive outside the shape, negative inside, 128 at the boundary.
//
// Unresolved cells (a uniform mask, or a single-field grid where no class
// change was ever seen) encode at MAX_MAGNITUDE, which saturates the
// output to 0 or 255 instead of overflowing the cast.
//
// The output pixel format is a strategy: `ByteEncoding` produces the R8
// byte, `UnormEncoding` the same value divided by 256 as an f32 in [0, 1].

use crate::grid::{Cell, CellClass, FieldPair, Grid};
use crate::image::{Image, Pixel};

/// Cap applied to every normalized magnitude. Anything at or beyond 128
/// already saturates; 256 leaves room for the dual-field subtraction.
pub const MAX_MAGNITUDE: f32 = 256.0;

/// Output value of a zero-distance boundary.
pub const MIDPOINT: f32 = 128.0;

/// Distance normalization factor for a texture of the given height.
#[inline]
pub fn scale_for_height(height: usize) -> f32 {
    height as f32 / 256.0
}

/// Normalized magnitude of a Euclidean distance in pixels.
#[inline]
pub fn magnitude_of_distance(distance: f32, scale: f32) -> f32 {
    (distance / scale).min(MAX_MAGNITUDE)
}

/// Normalized magnitude of a cell, saturating for unresolved cells.
#[inline]
pub fn magnitude(cell: &Cell, scale: f32) -> f32 {
    match cell.distance() {
        Some(d) => magnitude_of_distance(d, scale),
        None => MAX_MAGNITUDE,
    }
}

/// Signed single-field value: object side positive.
///
/// This is `lerp(m, -m, t)` with `t = 0` for Object and `t = 1` for Empty.
#[inline]
pub fn signed_single(class: CellClass, magnitude: f32) -> f32 {
    let t = if class == CellClass::Object { 0.0 } else { 1.0 };
    magnitude + (-magnitude - magnitude) * t
}

/// Signed dual-field value: outside positive.
#[inline]
pub fn signed_dual(to_object: f32, to_empty: f32) -> f32 {
    to_object - to_empty
}

/// Byte quantization of a signed value: clamp before the cast.
#[inline]
pub fn quantize(signed: f32) -> u8 {
    u8::from_f32(signed + MIDPOINT)
}

// ---------------------------------------------------------------------------
// Encoding strategies
// ---------------------------------------------------------------------------

/// Maps a signed, normalized distance to an output pixel.
pub trait Encoding {
    type Output: Pixel;

    fn encode(signed: f32) -> Self::Output;
}

/// R8 byte output, midpoint 128.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteEncoding;

impl Encoding for ByteEncoding {
    type Output = u8;

    #[inline]
    fn encode(signed: f32) -> u8 {
        quantize(signed)
    }
}

/// Normalized f32 output, `(signed + 128) / 256` clamped to [0, 1].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnormEncoding;

impl Encoding for UnormEncoding {
    type Output = f32;

    #[inline]
    fn encode(signed: f32) -> f32 {
        ((signed + MIDPOINT) / 256.0).clamp(0.0, 1.0)
    }
}

/// Encode a converged single-field grid.
pub fn encode_single<E: Encoding>(grid: &Grid) -> Image<E::Output> {
    let scale = scale_for_height(grid.height());
    Image::from_fn(grid.width(), grid.height(), |x, y| {
        let cell = grid.cell(x, y);
        E::encode(signed_single(cell.class(), magnitude(&cell, scale)))
    })
}

/// Encode a converged field pair.
pub fn encode_dual<E: Encoding>(pair: &FieldPair) -> Image<E::Output> {
    let scale = scale_for_height(pair.height());
    Image::from_fn(pair.width(), pair.height(), |x, y| {
        let outside = magnitude(&pair.to_object.cell(x, y), scale);
        let inside = magnitude(&pair.to_empty.cell(x, y), scale);
        E::encode(signed_dual(outside, inside))
    })
}
