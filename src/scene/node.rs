use glam::{EulerRot, Mat4, Vec3};

use crate::core::FrameTiming;
use crate::geometry::MeshData;
use crate::material::{PointSpriteMaterial, StandardMaterial};

/// Uniform ambient light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl AmbientLight {
    pub fn white(intensity: f32) -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity,
        }
    }
}

/// Directional light defined by a position shining toward the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn white(position: Vec3, intensity: f32) -> Self {
        Self {
            position,
            color: [1.0, 1.0, 1.0],
            intensity,
        }
    }

    /// Unit vector pointing from the lit surface toward the light
    pub fn direction_to_light(&self) -> Vec3 {
        self.position.normalize()
    }
}

/// Solid mesh with its surface material and orientation
#[derive(Debug, Clone)]
pub struct MeshVisual {
    pub geometry: MeshData,
    pub material: StandardMaterial,
    /// Euler angles in radians, applied in XYZ order
    pub rotation: Vec3,
}

impl MeshVisual {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }
}

/// Point cloud with its sprite material and orientation
#[derive(Debug, Clone)]
pub struct PointsVisual {
    /// Flat xyz buffer, length = 3 x point count, immutable after build
    pub positions: Vec<f32>,
    pub material: PointSpriteMaterial,
    /// Euler angles in radians, applied in XYZ order
    pub rotation: Vec3,
}

impl PointsVisual {
    pub fn point_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }
}

/// Borrowed view of a component's renderable payload
#[derive(Debug, Clone, Copy)]
pub enum VisualRef<'a> {
    Mesh(&'a MeshVisual),
    Points(&'a PointsVisual),
}

/// Per-frame animation hook
///
/// Invoked exactly once per rendered frame, from the single-threaded render
/// loop. Implementations own their mutable state; nothing else writes it.
pub trait FrameListener {
    fn on_frame(&mut self, timing: &FrameTiming);

    fn visual(&self) -> VisualRef<'_>;
}
