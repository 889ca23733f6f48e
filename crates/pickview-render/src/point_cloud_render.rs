//! Point cloud GPU rendering resources.
//!
//! One instance mirrors one data generation of the point store. The visible
//! and picking color buffers are deliberately separate: same index space,
//! different semantics. A generation change rebuilds the whole instance
//! instead of patching buffers in place.

use glam::Vec3;
use wgpu::util::DeviceExt;

use pickview_core::{encode_index, Result};

/// Uniforms for point rendering (shared by the visible and pick passes).
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct PointUniforms {
    /// Viewport size in pixels.
    pub viewport: [f32; 2],
    /// Point diameter in pixels.
    pub point_size: f32,
    pub _padding: f32,
}

impl Default for PointUniforms {
    fn default() -> Self {
        Self {
            viewport: [1.0, 1.0],
            point_size: 10.0,
            _padding: 0.0,
        }
    }
}

/// Expands an RGB triple sequence to vec4-aligned RGBA data.
#[must_use]
pub fn pack_rgb(rgb: &[f32], alpha: f32) -> Vec<f32> {
    let mut out = Vec::with_capacity(rgb.len() / 3 * 4);
    for c in rgb.chunks_exact(3) {
        out.extend_from_slice(c);
        out.push(alpha);
    }
    out
}

/// Builds the picking color attribute: one encoded index per point,
/// normalized to `[0, 1]` channels, alpha 1 so every covered pixel is
/// distinguishable from the zero-alpha background.
pub fn build_pick_colors(point_count: usize) -> Result<Vec<f32>> {
    pickview_core::ensure_addressable(point_count)?;
    let mut out = Vec::with_capacity(point_count * 4);
    for index in 0..point_count {
        #[allow(clippy::cast_possible_truncation)]
        let [r, g, b] = encode_index(index as u32)?;
        out.push(f32::from(r) / 255.0);
        out.push(f32::from(g) / 255.0);
        out.push(f32::from(b) / 255.0);
        out.push(1.0);
    }
    Ok(out)
}

/// GPU resources for one generation of the point cloud.
pub struct PointCloudRenderData {
    /// Position buffer (storage buffer, vec4-aligned).
    pub position_buffer: wgpu::Buffer,
    /// Visible color buffer (storage buffer).
    pub color_buffer: wgpu::Buffer,
    /// Picking color buffer (storage buffer).
    pub pick_color_buffer: wgpu::Buffer,
    /// Uniform buffer for point size and viewport.
    pub uniform_buffer: wgpu::Buffer,
    /// Bind group for the visible pass.
    pub bind_group: wgpu::BindGroup,
    /// Bind group for the pick pass.
    pub pick_bind_group: wgpu::BindGroup,
    /// Number of points.
    pub num_points: u32,
    /// Data generation this instance was built from.
    pub generation: u64,
}

impl PointCloudRenderData {
    /// Creates render data for one generation of points.
    ///
    /// `visible_rgb` is the hover-managed color buffer (`3 * n` floats);
    /// picking colors are derived here through the codec.
    pub fn new(
        device: &wgpu::Device,
        bind_group_layout: &wgpu::BindGroupLayout,
        camera_buffer: &wgpu::Buffer,
        positions: &[Vec3],
        visible_rgb: &[f32],
        generation: u64,
    ) -> Result<Self> {
        #[allow(clippy::cast_possible_truncation)]
        let num_points = positions.len() as u32;

        let position_data: Vec<f32> = positions
            .iter()
            .flat_map(|p| [p.x, p.y, p.z, 0.0]) // pad to vec4 for alignment
            .collect();
        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("point positions"),
            contents: bytemuck::cast_slice(&position_data),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        let color_data = pack_rgb(visible_rgb, 1.0);
        let color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("point visible colors"),
            contents: bytemuck::cast_slice(&color_data),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        let pick_color_data = build_pick_colors(positions.len())?;
        let pick_color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("point picking colors"),
            contents: bytemuck::cast_slice(&pick_color_data),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("point uniforms"),
            contents: bytemuck::cast_slice(&[PointUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = Self::create_bind_group(
            device,
            bind_group_layout,
            camera_buffer,
            &uniform_buffer,
            &position_buffer,
            &color_buffer,
            "point cloud bind group",
        );
        let pick_bind_group = Self::create_bind_group(
            device,
            bind_group_layout,
            camera_buffer,
            &uniform_buffer,
            &position_buffer,
            &pick_color_buffer,
            "point cloud pick bind group",
        );

        Ok(Self {
            position_buffer,
            color_buffer,
            pick_color_buffer,
            uniform_buffer,
            bind_group,
            pick_bind_group,
            num_points,
            generation,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        camera_buffer: &wgpu::Buffer,
        uniform_buffer: &wgpu::Buffer,
        position_buffer: &wgpu::Buffer,
        color_buffer: &wgpu::Buffer,
        label: &str,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: position_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: color_buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// Uploads new visible colors (`3 * n` floats) to the live buffer.
    pub fn update_visible_colors(&self, queue: &wgpu::Queue, visible_rgb: &[f32]) {
        let color_data = pack_rgb(visible_rgb, 1.0);
        queue.write_buffer(&self.color_buffer, 0, bytemuck::cast_slice(&color_data));
    }

    /// Updates point size and viewport uniforms.
    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &PointUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_rgb() {
        let packed = pack_rgb(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6], 1.0);
        assert_eq!(packed, vec![0.1, 0.2, 0.3, 1.0, 0.4, 0.5, 0.6, 1.0]);
    }

    #[test]
    fn test_build_pick_colors_encodes_index_plus_one() {
        let colors = build_pick_colors(3).unwrap();
        assert_eq!(colors.len(), 12);
        // Point 0 encodes id 1 in the red channel.
        assert!((colors[0] - 1.0 / 255.0).abs() < 1e-6);
        assert_eq!(colors[1], 0.0);
        assert_eq!(colors[2], 0.0);
        assert_eq!(colors[3], 1.0);
        // Point 2 encodes id 3.
        assert!((colors[8] - 3.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_build_pick_colors_rejects_oversized_sets() {
        assert!(build_pick_colors(1 << 24).is_err());
    }

    #[test]
    fn test_pick_color_channels_roundtrip_as_bytes() {
        // Rgba8Unorm rounds to the nearest byte; every encoded channel must
        // land back on its exact byte value.
        let colors = build_pick_colors(300).unwrap();
        for (i, point) in colors.chunks_exact(4).enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let expected = pickview_core::encode_index(i as u32).unwrap();
            for (channel, &byte) in point[..3].iter().zip(&expected) {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let quantized = (channel * 255.0).round() as u8;
                assert_eq!(quantized, byte);
            }
        }
    }
}
