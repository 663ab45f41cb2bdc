// gpu/sdf.rs — Row/column signed distance transform as two compute kernels.
//
// Pipeline per mask (one command buffer, two compute passes):
//
//   mask (u32 per pixel) ──row_distances──▶ rows (vec2<f32> per pixel)
//   rows ──column_distances──▶ output (u32 per pixel, byte value) ──▶ readback
//
// wgpu orders the two passes: every Stage A write is visible to Stage B.
// All buffers are created per call and dropped on return, so nothing
// carries over between masks.
//
// The CPU reference for both kernels is saito.rs. Stage A is bit-identical;
// Stage B can differ by one quantization step where the GPU's sqrt rounds
// differently near a .5 boundary.

use wgpu::util::DeviceExt;

use crate::error::SdfError;
use crate::gpu::device::{GpuDevice, GpuError};
use crate::image::Image;
use crate::saito::{validate_dimensions, RowDistance, SaitoConfig};

// ---------------------------------------------------------------------------
// Uniform params (must match WGSL struct Params exactly)
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SdfParams {
    width:  u32,
    height: u32,
    radius: u32,
    scale:  f32,
}

// ---------------------------------------------------------------------------
// GpuSdfPipeline
// ---------------------------------------------------------------------------

/// Compiled row and column kernels. Create once per `GpuDevice`.
pub struct GpuSdfPipeline {
    rows_pipeline:    wgpu::ComputePipeline,
    columns_pipeline: wgpu::ComputePipeline,
    bgl:              wgpu::BindGroupLayout,
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl GpuSdfPipeline {
    pub fn new(gpu: &GpuDevice) -> Self {
        let ws = gpu.workgroup_size;
        let shader_src = include_str!("../shaders/saito.wgsl")
            .replace("{{WG_ROWS}}", &ws.total().to_string())
            .replace("{{WG_X}}", &ws.x.to_string())
            .replace("{{WG_Y}}", &ws.y.to_string());

        let shader = gpu.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label:  Some("saito.wgsl"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let bgl = gpu.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("GpuSdf BGL"),
            entries: &[
                // 0 — mask, 1 — row distances, 2 — encoded output
                storage_entry(0, true),
                storage_entry(1, false),
                storage_entry(2, false),
                // 3 — params uniform
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let layout = gpu.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("GpuSdf pipeline layout"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });

        let make = |entry_point: &str| {
            gpu.device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label:               Some(entry_point),
                layout:              Some(&layout),
                module:              &shader,
                entry_point,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache:               None,
            })
        };

        GpuSdfPipeline {
            rows_pipeline:    make("row_distances"),
            columns_pipeline: make("column_distances"),
            bgl,
        }
    }

    /// Run both stages on `mask` and read the encoded field back.
    pub fn generate(
        &self,
        gpu:    &GpuDevice,
        mask:   &Image<bool>,
        config: &SaitoConfig,
    ) -> Result<Image<u8>, SdfError> {
        let (w, h) = (mask.width(), mask.height());
        validate_dimensions(w, h, config)?;
        let radius = config.radius_for(h);
        log::debug!("gpu saito: {w}×{h} mask, column radius {radius}, workgroup {}", gpu.workgroup_size);

        let n_pixels = w * h;
        let mask_words: Vec<u32> = mask.as_slice().iter().map(|&b| b as u32).collect();
        let mask_buf = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label:    Some("GpuSdf mask"),
            contents: bytemuck::cast_slice(&mask_words),
            usage:    wgpu::BufferUsages::STORAGE,
        });

        let rows_buf = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label:              Some("GpuSdf rows"),
            size:               (n_pixels * std::mem::size_of::<RowDistance>()) as u64,
            usage:              wgpu::BufferUsages::STORAGE,
            mapped_at_creation: false,
        });

        let out_size = (n_pixels * std::mem::size_of::<u32>()) as u64;
        let out_buf = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label:              Some("GpuSdf output"),
            size:               out_size,
            usage:              wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let params = SdfParams {
            width:  w as u32,
            height: h as u32,
            radius: radius.min(u32::MAX as usize) as u32,
            scale:  crate::encode::scale_for_height(h),
        };
        let params_buf = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label:    Some("GpuSdf params"),
            contents: bytemuck::bytes_of(&params),
            usage:    wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label:  Some("GpuSdf BG"),
            layout: &self.bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: mask_buf.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: rows_buf.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 2, resource: out_buf.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 3, resource: params_buf.as_entire_binding() },
            ],
        });

        let mut encoder = gpu.device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor { label: Some("GpuSdf dispatch") },
        );
        {
            let mut pass = encoder.begin_compute_pass(
                &wgpu::ComputePassDescriptor { label: Some("row_distances"), timestamp_writes: None },
            );
            pass.set_pipeline(&self.rows_pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(gpu.workgroup_size.dispatch_rows(h as u32), 1, 1);
        }
        {
            let (wg_x, wg_y) = gpu.dispatch_size(w as u32, h as u32);
            let mut pass = encoder.begin_compute_pass(
                &wgpu::ComputePassDescriptor { label: Some("column_distances"), timestamp_writes: None },
            );
            pass.set_pipeline(&self.columns_pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(wg_x, wg_y, 1);
        }

        let rb = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label:              Some("GpuSdf readback"),
            size:               out_size,
            usage:              wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        encoder.copy_buffer_to_buffer(&out_buf, 0, &rb, 0, out_size);
        gpu.queue.submit(std::iter::once(encoder.finish()));

        let slice = rb.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |r| {
            // The receiver only disappears if this call already returned.
            let _ = tx.send(r);
        });
        gpu.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|_| GpuError::ReadbackLost)?
            .map_err(GpuError::from)?;

        let mapped = slice.get_mapped_range();
        let words: &[u32] = bytemuck::cast_slice(&mapped);
        // Values are clamped to 0..=255 in the shader.
        let bytes: Vec<u8> = words.iter().map(|&v| v.min(255) as u8).collect();
        drop(mapped);
        rb.unmap();

        Ok(Image::from_vec(w, h, bytes))
    }

    /// One field per mask; failures stay in their own entry.
    pub fn generate_batch(
        &self,
        gpu:    &GpuDevice,
        masks:  &[Image<bool>],
        config: &SaitoConfig,
    ) -> Vec<Result<Image<u8>, SdfError>> {
        masks.iter().map(|m| self.generate(gpu, m, config)).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
