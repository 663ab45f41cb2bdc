// demos/generate_sdf.rs — Mask PNG in, signed distance field PNG out.
//
// The input is converted to grayscale and thresholded at 128; pixels at or
// above the threshold are the shape. The output is an 8-bit grayscale PNG
// with the boundary at 128.
//
// USAGE
// ─────
//   cargo run --example generate_sdf                          # generated glyph
//   cargo run --example generate_sdf -- in.png out.png        # dual-field 8SSEDT
//   cargo run --example generate_sdf -- in.png out.png single
//   cargo run --example generate_sdf -- in.png out.png saito  # CPU row/column
//   cargo run --example generate_sdf -- in.png out.png gpu    # wgpu row/column

use std::time::Instant;

use sdfgen::convert::{mask_from_fn, threshold_mask};
use sdfgen::gpu::{GpuDevice, GpuSdfPipeline};
use sdfgen::{generate_sdf_saito, FieldMode, Image, SaitoConfig, SdfConfig, SdfGenerator};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let out_path = args.get(2).map(String::as_str).unwrap_or("sdf.png");
    let method = args.get(3).map(String::as_str).unwrap_or("dual");

    let mask: Image<bool> = if let Some(path) = args.get(1) {
        threshold_mask(&load_luma(path), 128)
    } else {
        eprintln!("[generate_sdf] no input given — using a generated ring");
        ring(256)
    };
    eprintln!("[generate_sdf] mask: {}×{}, method: {method}", mask.width(), mask.height());

    let start = Instant::now();
    let result = match method {
        "single" | "dual" => {
            let mode = if method == "single" { FieldMode::Single } else { FieldMode::Dual };
            SdfGenerator::new(SdfConfig { mode, ..Default::default() }).generate(&mask)
        }
        "saito" => generate_sdf_saito(&mask, &SaitoConfig::default()),
        "gpu" => {
            let gpu = GpuDevice::new().expect("failed to initialise a Vulkan GPU");
            eprintln!("[generate_sdf] GPU: {}", gpu.adapter_info);
            GpuSdfPipeline::new(&gpu).generate(&gpu, &mask, &SaitoConfig::default())
        }
        other => {
            eprintln!("[generate_sdf] unknown method {other:?}; expected single, dual, saito or gpu");
            std::process::exit(2);
        }
    };

    let sdf = match result {
        Ok(sdf) => sdf,
        Err(e) => {
            eprintln!("[generate_sdf] {e}");
            std::process::exit(1);
        }
    };
    eprintln!("[generate_sdf] generated in {:.2?}", start.elapsed());

    let (w, h) = (sdf.width() as u32, sdf.height() as u32);
    image::GrayImage::from_raw(w, h, sdf.into_vec())
        .expect("buffer length matches dimensions")
        .save(out_path)
        .unwrap_or_else(|e| panic!("failed to write {out_path}: {e}"));
    eprintln!("[generate_sdf] wrote {out_path}");
}

fn load_luma(path: &str) -> Image<u8> {
    let img = image::open(path)
        .unwrap_or_else(|e| panic!("failed to open {path}: {e}"))
        .to_luma8();
    let (w, h) = img.dimensions();
    Image::from_vec(w as usize, h as usize, img.into_raw())
}

/// A ring with a bar through it.
fn ring(n: usize) -> Image<bool> {
    let c = n as f32 / 2.0;
    mask_from_fn(n, n, |x, y| {
        let (dx, dy) = (x as f32 - c, y as f32 - c);
        let r = (dx * dx + dy * dy).sqrt();
        (0.3 * c..0.6 * c).contains(&r) || (dy.abs() < 0.08 * c && dx.abs() < 0.8 * c)
    })
}
