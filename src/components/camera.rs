use std::f32::consts::PI;

use nalgebra as na;
use bevy_ecs::prelude::*;
use crate::math::{Mat4f, Vec3f};
use crate::components::Transform;

const DEFAULT_FOVY: f32 = 0.8;
const DEFAULT_ZNEAR: f32 = 0.1;
const DEFAULT_ZFAR: f32 = 1000.0;

#[derive(Debug,Component)]
pub struct Camera {
    pub name: String,
    perspective: na::Perspective3<f32>,
}

impl Camera {
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            perspective: na::Perspective3::new(
                aspect(width, height), DEFAULT_FOVY, DEFAULT_ZNEAR, DEFAULT_ZFAR)
        }
    }

    pub fn view_proj(&self, transform: &Transform) -> Mat4f {
        self.projection_matrix() * self.view_matrix(transform)
    }

    pub fn view_matrix(&self, transform: &Transform) -> Mat4f {
        // Camera transforms are rigid, so the inverse always exists
        transform.matrix().try_inverse().unwrap_or_else(Mat4f::identity)
    }

    pub fn projection_matrix(&self) -> Mat4f {
        *self.perspective.as_matrix()
    }

    pub fn aspect(&self) -> f32 {
        self.perspective.aspect()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.perspective.set_aspect(aspect(width, height));
    }
}

fn aspect(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

/// Marks the camera that receives pointer and keyboard input.
#[derive(Debug, Component)]
pub struct CameraControls;

/// Spherical placement around a target.
/// `alpha` is the longitude and `beta` the colatitude, both in radians.
#[derive(Debug, Clone, Component, PartialEq)]
pub struct OrbitRig {
    pub alpha: f32,
    pub beta: f32,
    pub radius: f32,
    pub target: Vec3f,
}

impl OrbitRig {
    pub const MIN_BETA: f32 = 0.01;
    pub const MAX_BETA: f32 = PI - 0.01;
    pub const MIN_RADIUS: f32 = 0.1;

    pub fn new(alpha: f32, beta: f32, radius: f32, target: Vec3f) -> Self {
        let mut rig = Self { alpha, beta, radius, target };
        rig.clamp();
        rig
    }

    pub fn position(&self) -> Vec3f {
        let (sin_a, cos_a) = self.alpha.sin_cos();
        let (sin_b, cos_b) = self.beta.sin_cos();
        self.target + Vec3f::new(
            self.radius * cos_a * sin_b,
            self.radius * cos_b,
            self.radius * sin_a * sin_b,
        )
    }

    pub fn clamp(&mut self) {
        self.beta = self.beta.clamp(Self::MIN_BETA, Self::MAX_BETA);
        self.radius = self.radius.max(Self::MIN_RADIUS);
    }

    pub fn transform(&self) -> Transform {
        let mut transform = Transform::from_position(self.position());
        transform.look_at(self.target);
        transform
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn orbit_rig_at_right_angles_sits_on_z_axis() {
        let rig = OrbitRig::new(FRAC_PI_2, FRAC_PI_2, 1.0, Vec3f::zeros());
        assert!((rig.position() - Vec3f::new(0., 0., 1.)).norm() < 1e-5);
        let t = rig.transform();
        assert!((t.forward() - Vec3f::new(0., 0., -1.)).norm() < 1e-5);
    }

    #[test]
    fn orbit_rig_clamps_pole_and_radius() {
        let rig = OrbitRig::new(0., 0., 0., Vec3f::zeros());
        assert_eq!(rig.beta, OrbitRig::MIN_BETA);
        assert_eq!(rig.radius, OrbitRig::MIN_RADIUS);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut camera = Camera::new("cam", 800, 600);
        camera.resize(1000, 500);
        assert!((camera.aspect() - 2.0).abs() < 1e-6);
        camera.resize(10, 0);
        assert!(camera.aspect().is_finite());
    }
}
