use glam::Mat4;
use wgpu::util::DeviceExt as _;

use crate::{model::AnimatedModel, MAX_JOINTS};

/// One skinning matrix as the vertex shader reads it: four columns.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BoneMatrix {
    pub mat: [[f32; 4]; 4],
}
impl Default for BoneMatrix {
    fn default() -> Self {
        Self::from(Mat4::IDENTITY)
    }
}
impl From<Mat4> for BoneMatrix {
    fn from(m: Mat4) -> Self {
        Self { mat: m.to_cols_array_2d() }
    }
}

/// At most `MAX_JOINTS` matrices, in slot order.
pub fn pack_bone_matrices(matrices: &[Mat4]) -> Vec<BoneMatrix> {
    matrices.iter().take(MAX_JOINTS).map(|m| BoneMatrix::from(*m)).collect()
}

/// Uniform buffer holding `MAX_JOINTS` skinning matrices for one model.
pub struct BonesBinding {
    pub bind_group: wgpu::BindGroup,
    buffer: wgpu::Buffer,
}
impl BonesBinding {
    pub fn desc() -> wgpu::BindGroupLayoutDescriptor<'static> {
        wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
            label: Some("Bones Bind Group Layout"),
        }
    }
    fn create_bind_group(buffer: &wgpu::Buffer, layout: &wgpu::BindGroupLayout, device: &wgpu::Device) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Bones Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }]
        })
    }
    pub fn new(layout: &wgpu::BindGroupLayout, device: &wgpu::Device) -> Self {
        let data: Vec<BoneMatrix> = vec![BoneMatrix::default(); MAX_JOINTS];
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Bones UBO"),
            contents: bytemuck::cast_slice(&data),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            bind_group: Self::create_bind_group(&buffer, layout, device),
            buffer,
        }
    }
    /// Writes the leading `min(MAX_JOINTS, matrices.len())` slots.
    pub fn update(&self, matrices: &[Mat4], queue: &wgpu::Queue) {
        let data = pack_bone_matrices(matrices);
        if data.is_empty() {
            return;
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&data));
    }
    /// Uploads the model's matrices if they changed since the last upload.
    pub fn sync(&self, model: &mut AnimatedModel, queue: &wgpu::Queue) -> bool {
        match model.take_upload() {
            Some(matrices) => {
                self.update(matrices, queue);
                true
            }
            None => false,
        }
    }
}
