// convert.rs — Conversions into masks and out of encoded fields.
//
//   u8  → bool  thresholding: `v >= threshold` is an object pixel
//   fn  → bool  procedural masks (tests, benches, demos)
//   u8  → f32   normalized ([0, 255] → [0, 1]) for shaders sampling R8_UNORM
//   bool → u8   0 / 255 preview of a mask
//
// The Pixel trait's to_f32/from_f32 are RAW conversions (u8 42 → 42.0).
// `sdf_to_normalized` is the NORMALIZED one a GPU sampler would return.

use crate::image::Image;

/// Binary mask from a grayscale image: pixels `>= threshold` are object.
pub fn threshold_mask(src: &Image<u8>, threshold: u8) -> Image<bool> {
    src.map(|v| v >= threshold)
}

/// Binary mask from a predicate over pixel coordinates.
pub fn mask_from_fn(
    width: usize,
    height: usize,
    f: impl FnMut(usize, usize) -> bool,
) -> Image<bool> {
    Image::from_fn(width, height, f)
}

/// Encoded field as an R8_UNORM sample: u8 0 → 0.0, u8 255 → 1.0.
pub fn sdf_to_normalized(src: &Image<u8>) -> Image<f32> {
    src.map(|v| v as f32 / 255.0)
}

/// Mask as a viewable grayscale image: object 255, empty 0.
pub fn mask_to_u8(src: &Image<bool>) -> Image<u8> {
    src.map(|v| if v { 255 } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_inclusive() {
        let src = Image::from_vec(4, 1, vec![0u8, 127, 128, 255]);
        let mask = threshold_mask(&src, 128);
        assert_eq!(mask.as_slice(), &[false, false, true, true]);
        // Threshold 0 classifies everything as object.
        assert!(threshold_mask(&src, 0).as_slice().iter().all(|&b| b));
    }

    #[test]
    fn test_mask_from_fn_coordinates() {
        let mask = mask_from_fn(3, 2, |x, y| x == 2 && y == 1);
        assert!(mask.get(2, 1));
        assert_eq!(mask.as_slice().iter().filter(|&&b| b).count(), 1);
    }

    #[test]
    fn test_sdf_to_normalized_endpoints() {
        let src = Image::from_vec(3, 1, vec![0u8, 128, 255]);
        let n = sdf_to_normalized(&src);
        assert_eq!(n.get(0, 0), 0.0);
        assert!((n.get(1, 0) - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(n.get(2, 0), 1.0);
    }

    #[test]
    fn test_mask_roundtrips_through_threshold() {
        let mask = mask_from_fn(5, 5, |x, y| (x + y) % 3 == 0);
        assert_eq!(threshold_mask(&mask_to_u8(&mask), 128), mask);
    }
}
