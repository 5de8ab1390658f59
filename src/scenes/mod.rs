mod hero;
mod particle_field;
mod rotating_solid;
mod showcase;

pub use hero::create_hero_scene;
pub use particle_field::{OrbitingParticleField, PARTICLE_COUNT};
pub use rotating_solid::RotatingSolid;
pub use showcase::create_showcase_scene;
