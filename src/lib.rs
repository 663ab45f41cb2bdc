// sdfgen: signed distance fields from binary masks
//
// CPU: 8SSEDT (eight-point sequential Euclidean distance transform), in a
// single-field and a dual-field variant. Parallel: the two-stage
// row/column transform (Saito & Toriwaki), on CPU threads or as wgpu
// compute kernels.
//
// Reference: Danielsson, "Euclidean Distance Mapping" (CGIP 1980);
// Saito & Toriwaki, "New algorithms for Euclidean distance transformation
// of an n-dimensional digitized picture" (Pattern Recognition 1994)

pub mod image;
pub mod convert;
pub mod error;
pub mod grid;
pub mod seed;
pub mod sweep;
pub mod encode;
pub mod sdf;
pub mod saito;
pub mod gpu;

pub use error::SdfError;
pub use image::Image;
pub use saito::{generate_sdf_saito, SaitoConfig};
pub use sdf::{generate_sdf, DistanceFields, FieldMode, SdfConfig, SdfGenerator};

/// Generate one field per mask with the given configuration. Every mask is
/// processed with its own buffers; one failure does not stop the batch.
pub fn generate_sdf_batch(masks: &[Image<bool>], config: SdfConfig) -> Vec<Result<Image<u8>, SdfError>> {
    SdfGenerator::new(config).generate_batch(masks)
}
