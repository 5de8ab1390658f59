use glam::Vec3;
use rand::Rng;

use crate::core::FrameTiming;
use crate::geometry::annulus_positions;
use crate::material::{hex_color, PointSpriteMaterial};
use crate::scene::node::{FrameListener, PointsVisual, VisualRef};

pub const PARTICLE_COUNT: usize = 1600;

/// Annulus the particles are scattered in
const INNER_RADIUS: f32 = 1.0;
const OUTER_RADIUS: f32 = 5.0;
const HALF_HEIGHT: f32 = 1.0;

/// Orbit rates in radians per second of total elapsed time
const ORBIT_RATE_Y: f32 = 0.08;
const ORBIT_RATE_X: f32 = 0.02;

/// The slowly revolving particle annulus
///
/// The position buffer is generated exactly once, at construction; the field
/// keeps one fixed look for its whole lifetime. Rotation is an absolute
/// function of total elapsed time, not an accumulation - re-running a frame
/// with the same timestamp must land on the same orientation.
pub struct OrbitingParticleField {
    points: PointsVisual,
}

impl OrbitingParticleField {
    /// Build the field from the system random source
    pub fn new() -> Self {
        Self::with_rng(&mut rand::thread_rng())
    }

    /// Build the field from a caller-supplied random source
    pub fn with_rng(rng: &mut impl Rng) -> Self {
        Self {
            points: PointsVisual {
                positions: annulus_positions(
                    PARTICLE_COUNT,
                    INNER_RADIUS,
                    OUTER_RADIUS,
                    HALF_HEIGHT,
                    rng,
                ),
                material: PointSpriteMaterial {
                    color: hex_color(0x5EEAD4),
                    size: 0.05,
                    opacity: 0.7,
                },
                rotation: Vec3::ZERO,
            },
        }
    }

    pub fn rotation(&self) -> Vec3 {
        self.points.rotation
    }

    /// The immutable position buffer, 3 floats per particle
    pub fn positions(&self) -> &[f32] {
        &self.points.positions
    }
}

impl Default for OrbitingParticleField {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameListener for OrbitingParticleField {
    fn on_frame(&mut self, timing: &FrameTiming) {
        // Absolute assignment from total elapsed time - not += like the
        // rotating solid. The two pacing disciplines are intentional.
        self.points.rotation.y = timing.elapsed * ORBIT_RATE_Y;
        self.points.rotation.x = timing.elapsed * ORBIT_RATE_X;
    }

    fn visual(&self) -> VisualRef<'_> {
        VisualRef::Points(&self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn buffer_has_three_floats_per_particle() {
        let field = OrbitingParticleField::with_rng(&mut StdRng::seed_from_u64(1));
        assert_eq!(field.positions().len(), PARTICLE_COUNT * 3);
    }

    #[test]
    fn rotation_is_absolute_in_elapsed_time() {
        let mut field = OrbitingParticleField::with_rng(&mut StdRng::seed_from_u64(1));

        field.on_frame(&FrameTiming::new(1, 2.0, 0.016));
        field.on_frame(&FrameTiming::new(2, 5.0, 3.0));

        let rotation = field.rotation();
        assert_eq!(rotation.y, 5.0 * ORBIT_RATE_Y);
        assert_eq!(rotation.x, 5.0 * ORBIT_RATE_X);
    }

    #[test]
    fn repeating_a_timestamp_is_idempotent() {
        let mut field = OrbitingParticleField::with_rng(&mut StdRng::seed_from_u64(1));

        field.on_frame(&FrameTiming::new(1, 3.5, 0.016));
        let first = field.rotation();
        field.on_frame(&FrameTiming::new(2, 3.5, 0.016));

        assert_eq!(field.rotation(), first);
    }

    #[test]
    fn frames_do_not_reshuffle_the_buffer() {
        let mut field = OrbitingParticleField::with_rng(&mut StdRng::seed_from_u64(9));
        let before = field.positions().to_vec();

        for i in 0..240 {
            field.on_frame(&FrameTiming::new(i + 1, i as f32 / 60.0, 1.0 / 60.0));
        }

        assert_eq!(field.positions(), before.as_slice());
    }

    #[test]
    fn particles_fill_the_annulus() {
        let field = OrbitingParticleField::with_rng(&mut StdRng::seed_from_u64(42));

        for chunk in field.positions().chunks_exact(3) {
            let radius = (chunk[0] * chunk[0] + chunk[2] * chunk[2]).sqrt();
            assert!(
                (INNER_RADIUS - 1e-4..OUTER_RADIUS).contains(&radius),
                "radius out of annulus: {}",
                radius
            );
            assert!((-HALF_HEIGHT..HALF_HEIGHT).contains(&chunk[1]));
        }
    }
}
