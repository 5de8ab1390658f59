pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod environment;
pub mod geometry;
pub mod material;
pub mod renderer;
pub mod scene;
pub mod scenes;
pub mod types;

// Re-export the scene constructors for callers that only mount a scene
pub use scenes::{create_hero_scene, create_showcase_scene};
