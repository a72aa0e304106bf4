mod camera;
mod light;
mod material;
mod mesh;
mod transform;

pub use camera::{Camera, CameraControls, OrbitRig};
pub use light::Light;
pub use material::{Material, MaterialHandle, MaterialId, MaterialStore, TextureRef};
pub use mesh::{Geometry, MeshName, TeleportHelper};
pub use transform::Transform;
