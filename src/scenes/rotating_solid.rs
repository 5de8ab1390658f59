use glam::Vec3;
use std::f32::consts::TAU;

use crate::core::FrameTiming;
use crate::geometry::icosphere;
use crate::material::{hex_color, StandardMaterial};
use crate::scene::node::{FrameListener, MeshVisual, VisualRef};

/// Spin rates in radians per second
const SPIN_RATE_Y: f32 = 0.35;
const SPIN_RATE_X: f32 = 0.15;

const RADIUS: f32 = 1.7;
const SUBDIVISIONS: u32 = 1;

/// The rotating metallic icosahedron
///
/// Rotation is accumulating: each frame integrates the frame delta, so the
/// spin speed is frame-rate independent. Angles are kept wrapped to [0, 2π)
/// which is observationally equivalent for a periodic rotation.
pub struct RotatingSolid {
    mesh: MeshVisual,
}

impl RotatingSolid {
    pub fn new() -> Self {
        Self {
            mesh: MeshVisual {
                geometry: icosphere(RADIUS, SUBDIVISIONS),
                material: StandardMaterial {
                    base_color: hex_color(0x4F46E5),
                    metalness: 0.9,
                    roughness: 0.2,
                    emissive: hex_color(0x3B82F6),
                    emissive_intensity: 0.4,
                },
                rotation: Vec3::ZERO,
            },
        }
    }

    pub fn rotation(&self) -> Vec3 {
        self.mesh.rotation
    }
}

impl Default for RotatingSolid {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameListener for RotatingSolid {
    fn on_frame(&mut self, timing: &FrameTiming) {
        let rotation = &mut self.mesh.rotation;
        rotation.y = (rotation.y + timing.delta * SPIN_RATE_Y).rem_euclid(TAU);
        rotation.x = (rotation.x + timing.delta * SPIN_RATE_X).rem_euclid(TAU);
    }

    fn visual(&self) -> VisualRef<'_> {
        VisualRef::Mesh(&self.mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(number: u64, delta: f32) -> FrameTiming {
        FrameTiming::new(number, delta * number as f32, delta)
    }

    #[test]
    fn rotation_accumulates_per_frame_delta() {
        let mut solid = RotatingSolid::new();

        solid.on_frame(&frame(1, 0.016));

        let rotation = solid.rotation();
        assert!((rotation.y - 0.016 * SPIN_RATE_Y).abs() < 1e-6);
        assert!((rotation.x - 0.016 * SPIN_RATE_X).abs() < 1e-6);
    }

    #[test]
    fn accumulation_is_independent_of_frame_splits() {
        // Same total time, chopped into different frame sequences
        let splits: [&[f32]; 3] = [&[1.2], &[0.4, 0.4, 0.4], &[0.1, 0.9, 0.05, 0.15]];

        let mut results = Vec::new();
        for deltas in splits {
            let mut solid = RotatingSolid::new();
            for (i, &delta) in deltas.iter().enumerate() {
                solid.on_frame(&FrameTiming::new(i as u64 + 1, 0.0, delta));
            }
            results.push(solid.rotation());
        }

        let expected_y = (1.2 * SPIN_RATE_Y).rem_euclid(TAU);
        let expected_x = (1.2 * SPIN_RATE_X).rem_euclid(TAU);
        for rotation in results {
            assert!(
                (rotation.y - expected_y).abs() < 1e-4,
                "rotation.y should be rate x total time, got {}",
                rotation.y
            );
            assert!((rotation.x - expected_x).abs() < 1e-4);
        }
    }

    #[test]
    fn zero_delta_leaves_rotation_unchanged() {
        let mut solid = RotatingSolid::new();
        solid.on_frame(&frame(1, 0.5));
        let before = solid.rotation();

        solid.on_frame(&FrameTiming::new(2, 0.5, 0.0));

        assert_eq!(solid.rotation(), before);
    }

    #[test]
    fn angles_stay_wrapped_over_long_runs() {
        let mut solid = RotatingSolid::new();

        // Half an hour of 60 Hz frames
        for i in 0..108_000u64 {
            solid.on_frame(&FrameTiming::new(i + 1, 0.0, 1.0 / 60.0));
        }

        let rotation = solid.rotation();
        assert!((0.0..TAU).contains(&rotation.y));
        assert!((0.0..TAU).contains(&rotation.x));
    }

    #[test]
    fn geometry_matches_the_configured_shape() {
        let solid = RotatingSolid::new();
        let VisualRef::Mesh(mesh) = solid.visual() else {
            panic!("rotating solid should expose a mesh");
        };

        assert_eq!(mesh.geometry.vertex_count(), 42);
        assert!((mesh.material.metalness - 0.9).abs() < 1e-6);
        assert!((mesh.material.roughness - 0.2).abs() < 1e-6);
        assert!((mesh.material.emissive_intensity - 0.4).abs() < 1e-6);
    }
}
