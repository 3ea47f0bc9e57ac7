//! Terrain viewer scene: a random heightmap textured by height, a skybox that
//! follows the camera, and a first-person camera driven by mouse and WASD.

mod camera;
mod scene;
mod skybox;
mod textures;
mod world;

pub use camera::{CameraMode, FirstPersonCamera};
pub use scene::{SceneInput, TerrainScene};
pub use skybox::SkyboxBrush;
pub use textures::{TextureCache, TextureGenerator, TextureKey};
pub use world::{DeterministicRng, Heightmap, World, WorldConfig, CELL_SIZE, MAX_HEIGHT};
