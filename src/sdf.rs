// sdf.rs — Top-level 8SSEDT pipeline: mask in, distance field out.
//
// Ties the stages together for one invocation:
//
//   1. Validate dimensions (seed.rs)
//   2. Seed one grid (Single) or a field pair (Dual)
//   3. Run both sweeps (sweep.rs)
//   4. Encode (encode.rs) into bytes or normalized floats
//
// Every invocation allocates its own grids and drops them once encoded;
// nothing is shared between calls, so separate generators (or the same
// generator from several threads) can run concurrently on different masks.

use crate::encode::{
    encode_dual, encode_single, signed_dual, signed_single, ByteEncoding, Encoding,
};
use crate::error::SdfError;
use crate::grid::{CellClass, FieldPair, Grid};
use crate::image::Image;
use crate::seed::{seed_dual, seed_single};
use crate::sweep::{transform, transform_pair, Propagation};

/// Number of distance fields tracked by the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldMode {
    /// One grid; the boundary is inferred from class changes.
    Single,
    /// Two grids seeded from each class and subtracted. Reference mode.
    #[default]
    Dual,
}

impl FieldMode {
    pub fn field_count(self) -> usize {
        match self {
            FieldMode::Single => 1,
            FieldMode::Dual => 2,
        }
    }
}

/// Generator configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SdfConfig {
    /// Single- or dual-field transform.
    pub mode: FieldMode,
    /// Grayscale sources: pixels `>= threshold` are object pixels.
    pub threshold: u8,
}

impl Default for SdfConfig {
    fn default() -> Self {
        SdfConfig { mode: FieldMode::Dual, threshold: 128 }
    }
}

/// Converged distance state, before quantization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistanceFields {
    Single(Grid),
    Dual(FieldPair),
}

impl DistanceFields {
    pub fn mode(&self) -> FieldMode {
        match self {
            DistanceFields::Single(_) => FieldMode::Single,
            DistanceFields::Dual(_) => FieldMode::Dual,
        }
    }

    pub fn width(&self) -> usize {
        match self {
            DistanceFields::Single(g) => g.width(),
            DistanceFields::Dual(p) => p.width(),
        }
    }

    pub fn height(&self) -> usize {
        match self {
            DistanceFields::Single(g) => g.height(),
            DistanceFields::Dual(p) => p.height(),
        }
    }

    /// Signed Euclidean distance in pixels at (x, y), unscaled.
    ///
    /// Single-field: positive on the object side. Dual-field: positive
    /// outside. Unresolved components count as infinite.
    pub fn signed_distance(&self, x: usize, y: usize) -> f32 {
        match self {
            DistanceFields::Single(g) => {
                let c = g.cell(x, y);
                signed_single(c.class(), c.distance().unwrap_or(f32::INFINITY))
            }
            DistanceFields::Dual(p) => {
                let outside = p.to_object.cell(x, y).distance().unwrap_or(f32::INFINITY);
                let inside = p.to_empty.cell(x, y).distance().unwrap_or(f32::INFINITY);
                // Both infinite cannot happen: every pixel seeds one field.
                signed_dual(outside, inside)
            }
        }
    }

    /// Quantize with the given output strategy.
    pub fn encode<E: Encoding>(&self) -> Image<E::Output> {
        match self {
            DistanceFields::Single(g) => encode_single::<E>(g),
            DistanceFields::Dual(p) => encode_dual::<E>(p),
        }
    }
}

/// 8SSEDT distance field generator.
#[derive(Debug, Clone, Default)]
pub struct SdfGenerator {
    pub config: SdfConfig,
}

impl SdfGenerator {
    pub fn new(config: SdfConfig) -> Self {
        SdfGenerator { config }
    }

    /// Seed and sweep, returning the unquantized fields.
    pub fn fields(&self, mask: &Image<bool>) -> Result<DistanceFields, SdfError> {
        log::debug!(
            "8ssedt: {}×{} mask, {} field(s)",
            mask.width(),
            mask.height(),
            self.config.mode.field_count()
        );
        match self.config.mode {
            FieldMode::Single => {
                let mut grid = seed_single(mask)?;
                transform(&mut grid, Propagation::CrossClass);
                Ok(DistanceFields::Single(grid))
            }
            FieldMode::Dual => {
                let mut pair = seed_dual(mask)?;
                transform_pair(&mut pair);
                Ok(DistanceFields::Dual(pair))
            }
        }
    }

    /// Full transform with byte output.
    pub fn generate(&self, mask: &Image<bool>) -> Result<Image<u8>, SdfError> {
        self.generate_with::<ByteEncoding>(mask)
    }

    /// Full transform with a caller-chosen output encoding.
    pub fn generate_with<E: Encoding>(&self, mask: &Image<bool>) -> Result<Image<E::Output>, SdfError> {
        Ok(self.fields(mask)?.encode::<E>())
    }

    /// Threshold a grayscale image with `config.threshold`, then generate.
    pub fn generate_from_luma(&self, luma: &Image<u8>) -> Result<Image<u8>, SdfError> {
        let mask = crate::convert::threshold_mask(luma, self.config.threshold);
        self.generate(&mask)
    }

    /// Generate one field per mask. Each mask gets its own buffers; a
    /// failure affects only its own entry.
    pub fn generate_batch(&self, masks: &[Image<bool>]) -> Vec<Result<Image<u8>, SdfError>> {
        masks.iter().map(|m| self.generate(m)).collect()
    }
}

/// Flat-raster entry point: `raster[y * width + x]` is `true` for object
/// pixels. Uses the default (dual-field) configuration.
pub fn generate_sdf(raster: &[bool], width: usize, height: usize) -> Result<Image<u8>, SdfError> {
    let mask = mask_from_raster(raster, width, height)?;
    SdfGenerator::default().generate(&mask)
}

/// Wrap a flat raster as a mask, checking its length first.
pub fn mask_from_raster(raster: &[bool], width: usize, height: usize) -> Result<Image<bool>, SdfError> {
    crate::seed::validate_dimensions(width, height)?;
    let expected = width * height;
    if raster.len() != expected {
        return Err(SdfError::RasterSizeMismatch { width, height, expected, actual: raster.len() });
    }
    Ok(Image::from_vec(width, height, raster.to_vec()))
}

/// Class of a mask pixel, for callers inspecting `DistanceFields`.
pub fn pixel_class(mask: &Image<bool>, x: usize, y: usize) -> CellClass {
    crate::seed::classify(mask.get(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::UnormEncoding;

    fn square_mask(n: usize, lo: usize, hi: usize) -> Image<bool> {
        Image::from_fn(n, n, |x, y| (lo..hi).contains(&x) && (lo..hi).contains(&y))
    }

    #[test]
    fn test_default_config_is_dual() {
        let cfg = SdfConfig::default();
        assert_eq!(cfg.mode, FieldMode::Dual);
        assert_eq!(cfg.threshold, 128);
        assert_eq!(FieldMode::Single.field_count(), 1);
    }

    #[test]
    fn test_fields_mode_matches_config() {
        let mask = square_mask(8, 2, 6);
        let single = SdfGenerator::new(SdfConfig { mode: FieldMode::Single, ..Default::default() });
        assert_eq!(single.fields(&mask).unwrap().mode(), FieldMode::Single);
        assert_eq!(SdfGenerator::default().fields(&mask).unwrap().mode(), FieldMode::Dual);
    }

    #[test]
    fn test_signed_distance_dual() {
        let mask = square_mask(10, 3, 7);
        let fields = SdfGenerator::default().fields(&mask).unwrap();
        // Boundary-adjacent outside pixel: 1 px to the object.
        assert_eq!(fields.signed_distance(2, 5), 1.0);
        // Inside, one pixel from the empty column at x = 2.
        assert_eq!(fields.signed_distance(3, 5), -1.0);
        assert_eq!(fields.signed_distance(4, 5), -2.0);
    }

    #[test]
    fn test_unorm_matches_byte_over_256() {
        let mask = square_mask(16, 4, 12);
        let gen = SdfGenerator::default();
        let bytes = gen.generate(&mask).unwrap();
        let unorm = gen.generate_with::<UnormEncoding>(&mask).unwrap();
        for (x, y, b) in bytes.pixels() {
            // The byte channel tops out at 255, the unorm one at 256/256.
            let u = (unorm.get(x, y) * 256.0).min(255.0);
            assert!((u - b as f32).abs() <= 0.5 + 1e-3, "({x},{y}): {u} vs {b}");
        }
    }

    #[test]
    fn test_flat_raster_length_checked() {
        let err = generate_sdf(&[true; 5], 2, 3).unwrap_err();
        assert!(matches!(
            err,
            SdfError::RasterSizeMismatch { expected: 6, actual: 5, .. }
        ));
        assert!(matches!(
            generate_sdf(&[], 0, 0),
            Err(SdfError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_batch_isolates_failures() {
        let gen = SdfGenerator::default();
        let masks = vec![square_mask(4, 1, 3), Image::new(0, 3), square_mask(6, 2, 4)];
        let out = gen.generate_batch(&masks);
        assert!(out[0].is_ok());
        assert!(matches!(out[1], Err(SdfError::InvalidDimensions { .. })));
        assert_eq!(out[2].as_ref().unwrap().width(), 6);
    }

    #[test]
    fn test_pixel_class() {
        let mask = square_mask(4, 1, 3);
        assert_eq!(pixel_class(&mask, 1, 1), CellClass::Object);
        assert_eq!(pixel_class(&mask, 0, 0), CellClass::Empty);
    }
}
