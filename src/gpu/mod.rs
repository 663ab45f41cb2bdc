// gpu/mod.rs — wgpu compute backend for the row/column transform.
//
// The kernels mirror saito.rs, which stays the authoritative reference:
// every GPU result is checked against it in the tests. The CPU 8SSEDT
// sweep has no GPU counterpart; its scan order is inherently sequential.

pub mod device;
pub mod sdf;

pub use device::{DeviceProfile, GpuDevice, GpuError, WorkgroupSize};
pub use sdf::GpuSdfPipeline;
