use glam::Mat4;

use crate::camera::Camera;
use crate::environment::EnvironmentLighting;
use crate::material::{PointSpriteMaterial, StandardMaterial};
use crate::scene::node::{AmbientLight, DirectionalLight};

/// Per-viewport uniform data for the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub _pad0: f32,
    pub camera_right: [f32; 3],
    pub _pad1: f32,
    pub camera_up: [f32; 3],
    pub _pad2: f32,
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub light_dir: [f32; 3],
    pub light_intensity: f32,
    pub light_color: [f32; 3],
    pub _pad3: f32,
    pub env_sky: [f32; 3],
    pub env_reflection: f32,
    pub env_ground: [f32; 3],
    pub time: f32,
}

impl SceneUniform {
    pub fn new(
        camera: &Camera,
        aspect: f32,
        ambient: &AmbientLight,
        directional: &DirectionalLight,
        environment: &EnvironmentLighting,
        time: f32,
    ) -> Self {
        Self {
            view_proj: camera.view_projection(aspect).to_cols_array_2d(),
            camera_pos: camera.position.to_array(),
            _pad0: 0.0,
            camera_right: camera.right().to_array(),
            _pad1: 0.0,
            camera_up: camera.up().to_array(),
            _pad2: 0.0,
            ambient_color: ambient.color,
            ambient_intensity: ambient.intensity,
            light_dir: directional.direction_to_light().to_array(),
            light_intensity: directional.intensity,
            light_color: directional.color,
            _pad3: 0.0,
            env_sky: environment.sky,
            env_reflection: environment.reflection,
            env_ground: environment.ground,
            time,
        }
    }
}

/// Per-mesh uniform data: orientation plus surface material
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniform {
    pub model: [[f32; 4]; 4],
    pub base_color: [f32; 3],
    pub metalness: f32,
    pub emissive: [f32; 3],
    pub roughness: f32,
    pub emissive_intensity: f32,
    pub _pad: [f32; 3],
}

impl MeshUniform {
    pub fn new(model: Mat4, material: &StandardMaterial) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            base_color: material.base_color,
            metalness: material.metalness,
            emissive: material.emissive,
            roughness: material.roughness,
            emissive_intensity: material.emissive_intensity,
            _pad: [0.0; 3],
        }
    }
}

/// Per-point-cloud uniform data: orientation plus sprite material
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointsUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 3],
    pub size: f32,
    pub opacity: f32,
    pub _pad: [f32; 3],
}

impl PointsUniform {
    pub fn new(model: Mat4, material: &PointSpriteMaterial) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: material.color,
            size: material.size,
            opacity: material.opacity,
            _pad: [0.0; 3],
        }
    }
}

/// Mesh vertex: position and normal, interleaved
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-instance particle position for the sprite pipeline
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
}

impl ParticleInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
