// tests/test_saito.rs — Integration tests for the row/column transform.
//
// With the full column window the two-stage transform is exact, so it is
// checked against brute force directly. Against the 8SSEDT sweep it is only
// required to agree visually.

use sdfgen::convert::mask_from_fn;
use sdfgen::saito::{column_distances, row_distances, validate_dimensions, ROW_UNRESOLVED};
use sdfgen::{generate_sdf_saito, Image, SaitoConfig, SdfError, SdfGenerator};

fn brute_force_sqr(mask: &Image<bool>, x: usize, y: usize, want: bool) -> Option<f32> {
    mask.pixels()
        .filter(|&(_, _, v)| v == want)
        .map(|(sx, sy, _)| {
            let dx = sx.abs_diff(x) as f32;
            let dy = sy.abs_diff(y) as f32;
            dx * dx + dy * dy
        })
        .reduce(f32::min)
}

fn blobs(w: usize, h: usize) -> Image<bool> {
    mask_from_fn(w, h, |x, y| {
        let a = (x as i32 - 7).pow(2) + (y as i32 - 6).pow(2) <= 16;
        let b = (11..19).contains(&x) && (12..15).contains(&y);
        a || b
    })
}

// ===== Exactness =====

#[test]
fn full_column_window_is_exact() {
    let mask = blobs(23, 19);
    let rows = row_distances(&mask);
    let cols = column_distances(&rows, 23, 19, 19);
    for (x, y, _) in mask.pixels() {
        let d = cols[y * 23 + x];
        assert_eq!(Some(d.sqr_to_object), brute_force_sqr(&mask, x, y, true), "to_object ({x},{y})");
        assert_eq!(Some(d.sqr_to_empty), brute_force_sqr(&mask, x, y, false), "to_empty ({x},{y})");
    }
}

#[test]
fn row_distances_are_integral() {
    let rows = row_distances(&blobs(23, 19));
    for r in rows {
        for v in [r.to_object, r.to_empty] {
            assert!(v == ROW_UNRESOLVED || v.fract() == 0.0, "{v}");
        }
    }
}

// ===== Agreement with the sweep =====

#[test]
fn agrees_with_dual_sweep_within_one_step() {
    let n = 256;
    let mask = mask_from_fn(n, n, |x, y| {
        let (dx, dy) = (x as f32 - 100.0, y as f32 - 140.0);
        let disc = dx * dx + dy * dy <= 60.0 * 60.0;
        let bar = (170..230).contains(&x) && (30..60).contains(&y);
        disc || bar
    });
    let saito = generate_sdf_saito(&mask, &SaitoConfig::default()).unwrap();
    let sweep = SdfGenerator::default().generate(&mask).unwrap();

    let diffs: Vec<u8> = saito
        .as_slice()
        .iter()
        .zip(sweep.as_slice())
        .map(|(&a, &b)| a.abs_diff(b))
        .collect();
    let worst = diffs.iter().copied().max().unwrap_or(0);
    let within_one = diffs.iter().filter(|&&d| d <= 1).count();
    assert!(worst <= 2, "worst difference {worst}");
    assert!(within_one * 100 >= diffs.len() * 99, "{within_one}/{} within one step", diffs.len());
}

#[test]
fn same_sign_as_sweep() {
    let mask = blobs(32, 32);
    let saito = generate_sdf_saito(&mask, &SaitoConfig::default()).unwrap();
    for (x, y, obj) in mask.pixels() {
        assert_eq!(saito.get(x, y) < 128, obj, "({x},{y})");
    }
}

// ===== Limits and configuration =====

#[test]
fn size_limit_enforced_before_allocation() {
    let big: Image<bool> = Image::new(2049, 2);
    assert!(matches!(
        generate_sdf_saito(&big, &SaitoConfig::default()),
        Err(SdfError::SizeLimitExceeded { width: 2049, limit: 2048, .. })
    ));
    assert!(validate_dimensions(2048, 1, &SaitoConfig::default()).is_ok());
    // The sweep has no such ceiling.
    assert!(SdfGenerator::default().generate(&big).is_ok());
}

#[test]
fn column_radius_saturates_distant_pixels() {
    // Object rows at the top only; rows further than the radius never see them.
    let mask = mask_from_fn(8, 64, |_, y| y < 2);
    let narrow = SaitoConfig { column_radius: Some(4), ..Default::default() };
    let out = generate_sdf_saito(&mask, &narrow).unwrap();
    assert_eq!(out.get(3, 63), 255);
    let full = generate_sdf_saito(&mask, &SaitoConfig::default()).unwrap();
    assert!(out.get(3, 4) == full.get(3, 4));
    assert!(full.get(3, 30) < 255);
}

#[test]
fn deterministic_across_runs() {
    let mask = blobs(40, 33);
    let cfg = SaitoConfig::default();
    assert_eq!(generate_sdf_saito(&mask, &cfg).unwrap(), generate_sdf_saito(&mask, &cfg).unwrap());
}
