use glam::Vec3;

use crate::camera::Camera;
use crate::environment::EnvironmentPreset;
use crate::scene::container::SceneContainer;
use crate::scene::node::{AmbientLight, DirectionalLight};
use crate::scenes::rotating_solid::RotatingSolid;

/// Non-interactive showcase scene: the rotating solid under a city backdrop
pub fn create_showcase_scene() -> SceneContainer {
    SceneContainer::new(
        Camera::new(Vec3::new(0.0, 0.0, 4.0), 45.0),
        AmbientLight::white(0.6),
        DirectionalLight::white(Vec3::new(3.0, 3.0, 3.0), 1.0),
        EnvironmentPreset::City,
    )
    .with_actor(Box::new(RotatingSolid::new()))
}
