use glam::Vec3;

use crate::camera::{Camera, OrbitControls};
use crate::environment::EnvironmentPreset;
use crate::scene::container::SceneContainer;
use crate::scene::node::{AmbientLight, DirectionalLight};
use crate::scenes::particle_field::OrbitingParticleField;

/// Interactive hero scene: the particle annulus with drag-to-orbit camera
/// controls. Zoom and pan are deliberately disabled - the viewer may change
/// the viewing angle but not the framing.
pub fn create_hero_scene() -> SceneContainer {
    let camera = Camera::new(Vec3::new(0.0, 0.0, 7.0), 50.0);
    let controls = OrbitControls::from_camera(&camera)
        .with_zoom(false)
        .with_pan(false);

    SceneContainer::new(
        camera,
        AmbientLight::white(0.6),
        DirectionalLight::white(Vec3::new(6.0, 6.0, 6.0), 0.8),
        EnvironmentPreset::City,
    )
    .with_actor(Box::new(OrbitingParticleField::new()))
    .with_orbit(controls)
}
