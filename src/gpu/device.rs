// gpu/device.rs — wgpu device setup for the compute kernels.
//
// Responsibilities:
//   - Enumerate Vulkan adapters and pick a hardware one when available.
//   - Expose a `DeviceProfile` that requests reduced limits, so kernels
//     tuned on a desktop GPU are validated against a low-end budget.
//   - Own the `WorkgroupSize` used for every 2D dispatch, and derive the
//     1D row-kernel size from it.
//
// ADAPTER SELECTION
// ─────────────────
// `request_adapter` can pick a software rasterizer (llvmpipe) over a real
// GPU on some drivers. Adapters are enumerated explicitly: hardware and
// virtual GPUs first, anything else as a last resort, and the choice is
// logged at info level.
//
// DEVICE LIMITS
// ─────────────
// Under `DeviceProfile::Mobile` the device is requested with lower limits
// than the hardware offers. wgpu validates every pipeline and dispatch
// against the requested limits, so an oversized workgroup fails on the
// development machine instead of on the target.

use std::fmt;

use thiserror::Error;

/// Hardware profile controlling requested limits and default tiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceProfile {
    /// The adapter's default limits.
    #[default]
    Native,
    /// 256 invocations per workgroup and a 128 MiB storage binding cap,
    /// typical of mobile and single-board Vulkan drivers.
    Mobile,
}

impl fmt::Display for DeviceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceProfile::Native => write!(f, "Native"),
            DeviceProfile::Mobile => write!(f, "Mobile (reduced limits)"),
        }
    }
}

/// Workgroup tiling for 2D compute dispatches.
///
/// The row kernel runs one invocation per row and uses a 1D workgroup of
/// `total()` invocations, so a single size covers both kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkgroupSize {
    pub x: u32,
    pub y: u32,
}

impl WorkgroupSize {
    /// Invocations per workgroup (x * y).
    pub fn total(&self) -> u32 {
        self.x * self.y
    }

    /// Default tiling for a profile.
    ///
    /// - `Native`: 16×8 = 128, four 32-wide warps or two 64-wide waves.
    /// - `Mobile`: 8×8 = 64, well inside the 256-invocation cap.
    pub fn for_profile(profile: DeviceProfile) -> Self {
        match profile {
            DeviceProfile::Native => WorkgroupSize { x: 16, y: 8 },
            DeviceProfile::Mobile => WorkgroupSize { x: 8, y: 8 },
        }
    }

    /// Workgroups needed to cover a `w × h` grid (ceiling division).
    pub fn dispatch_2d(&self, w: u32, h: u32) -> (u32, u32) {
        (w.div_ceil(self.x), h.div_ceil(self.y))
    }

    /// Workgroups needed to cover `n` rows with the 1D row kernel.
    pub fn dispatch_rows(&self, n: u32) -> u32 {
        n.div_ceil(self.total())
    }
}

impl fmt::Display for WorkgroupSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{} ({} invocations)", self.x, self.y, self.total())
    }
}

/// Adapter identity, kept for logging.
#[derive(Debug, Clone)]
pub struct AdapterInfo {
    pub name: String,
    pub device_type: wgpu::DeviceType,
    pub backend: wgpu::Backend,
}

impl fmt::Display for AdapterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?}, {:?})", self.name, self.backend, self.device_type)
    }
}

/// Adapter, device, queue and active profile.
///
/// Creating one is expensive; hold it for as long as SDFs are generated.
///
/// # Field drop order
/// Fields drop top to bottom. `_instance` is declared last so the
/// `wgpu::Instance` outlives `device` and `queue`; some Vulkan layers crash
/// when the instance is destroyed first.
pub struct GpuDevice {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub profile: DeviceProfile,
    pub adapter_info: AdapterInfo,
    pub workgroup_size: WorkgroupSize,
    _instance: wgpu::Instance,
}

impl GpuDevice {
    /// First suitable Vulkan adapter with `DeviceProfile::Native`.
    pub fn new() -> Result<Self, GpuError> {
        Self::new_with_profile(DeviceProfile::Native)
    }

    pub fn new_with_profile(profile: DeviceProfile) -> Result<Self, GpuError> {
        pollster::block_on(Self::init_async(profile))
    }

    async fn init_async(profile: DeviceProfile) -> Result<Self, GpuError> {
        // Validation layers in debug builds surface WGSL errors early.
        // Non-compliant adapters (dzn on WSL2) are enumerated too; the
        // kernels only need storage buffers and compute dispatch.
        let flags = if cfg!(debug_assertions) {
            wgpu::InstanceFlags::VALIDATION
                | wgpu::InstanceFlags::ALLOW_UNDERLYING_NONCOMPLIANT_ADAPTER
        } else {
            wgpu::InstanceFlags::ALLOW_UNDERLYING_NONCOMPLIANT_ADAPTER
        };

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::VULKAN,
            flags,
            ..Default::default()
        });

        let adapters = instance.enumerate_adapters(wgpu::Backends::VULKAN);
        for a in &adapters {
            let info = a.get_info();
            log::debug!("vulkan adapter: {} ({:?}, {:?})", info.name, info.backend, info.device_type);
        }

        let adapter = pick_adapter(adapters).ok_or(GpuError::NoSuitableAdapter)?;
        let raw = adapter.get_info();
        let adapter_info = AdapterInfo {
            name: raw.name.clone(),
            device_type: raw.device_type,
            backend: raw.backend,
        };
        log::info!("using {adapter_info} with profile {profile}");

        let (device, queue): (wgpu::Device, wgpu::Queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("sdfgen"),
                    required_features: wgpu::Features::empty(),
                    required_limits: limits_for_profile(profile),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        Ok(GpuDevice {
            device,
            queue,
            profile,
            adapter_info,
            workgroup_size: WorkgroupSize::for_profile(profile),
            _instance: instance,
        })
    }

    /// Override the default tiling, validated against the profile.
    pub fn set_workgroup_size(&mut self, x: u32, y: u32) -> Result<(), GpuError> {
        let total = x * y;
        let max = max_invocations_for_profile(self.profile);
        if total == 0 || total > max {
            return Err(GpuError::WorkgroupTooLarge { total, max });
        }
        self.workgroup_size = WorkgroupSize { x, y };
        Ok(())
    }

    /// Workgroups needed to cover an image with the active tiling.
    ///
    /// Shaders guard against the overhang:
    /// ```wgsl
    /// if gid.x >= width || gid.y >= height { return; }
    /// ```
    pub fn dispatch_size(&self, img_w: u32, img_h: u32) -> (u32, u32) {
        self.workgroup_size.dispatch_2d(img_w, img_h)
    }
}

impl fmt::Display for GpuDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GpuDevice {{ adapter: {}, profile: {}, workgroup: {} }}",
            self.adapter_info, self.profile, self.workgroup_size
        )
    }
}

/// Hardware and virtual GPUs first; a software adapter only if nothing
/// else exists.
fn pick_adapter(adapters: Vec<wgpu::Adapter>) -> Option<wgpu::Adapter> {
    let (preferred, fallback): (Vec<_>, Vec<_>) = adapters.into_iter().partition(|a| {
        matches!(
            a.get_info().device_type,
            wgpu::DeviceType::DiscreteGpu
                | wgpu::DeviceType::IntegratedGpu
                | wgpu::DeviceType::VirtualGpu
                | wgpu::DeviceType::Other
        )
    });
    preferred.into_iter().chain(fallback).next()
}

// ============================================================
// Limits
// ============================================================

fn limits_for_profile(profile: DeviceProfile) -> wgpu::Limits {
    match profile {
        DeviceProfile::Native => wgpu::Limits::default(),
        DeviceProfile::Mobile => wgpu::Limits {
            max_compute_invocations_per_workgroup: 256,
            max_compute_workgroup_size_x: 256,
            max_compute_workgroup_size_y: 256,
            max_compute_workgroup_size_z: 64,
            // A 2048² row buffer is 32 MiB; 128 MiB leaves headroom.
            max_storage_buffer_binding_size: 128 << 20,
            ..wgpu::Limits::default()
        },
    }
}

fn max_invocations_for_profile(profile: DeviceProfile) -> u32 {
    limits_for_profile(profile).max_compute_invocations_per_workgroup
}

// ============================================================
// Errors
// ============================================================

/// GPU initialization, configuration and readback failures.
#[derive(Debug, Error)]
pub enum GpuError {
    /// No Vulkan adapter is visible at all.
    #[error("no Vulkan adapter found; check that a Vulkan driver is installed and `vulkaninfo` lists a device")]
    NoSuitableAdapter,

    /// Device request rejected (driver issue, unsupported limits).
    #[error("device request failed: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    /// Workgroup size zero or above the profile's invocation limit.
    #[error("workgroup size {total} outside the profile limit of 1..={max} invocations")]
    WorkgroupTooLarge { total: u32, max: u32 },

    /// Mapping the readback buffer failed.
    #[error("readback buffer map failed: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    /// The map callback was dropped without reporting a result.
    #[error("readback callback never completed")]
    ReadbackLost,
}
