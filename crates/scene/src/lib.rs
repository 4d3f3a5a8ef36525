//! Scene-level types: cameras and lights (renderer-agnostic).

pub mod camera;
pub mod light;

pub use camera::{Camera2D, Camera3D, CameraInput};
pub use light::{DirectionalLight, PointLight};
