use nalgebra as na;

// Type defs for convenience
// Makes it easier to switch the maths library

// Float specializations
pub type Vec3f = na::Vector3<f32>;
pub type Mat4f = na::Matrix4<f32>;
pub type UnitQuatf = na::UnitQuaternion<f32>;
pub type UnitVec3f = na::UnitVector3<f32>;

// Generic
pub type Vec3<T> = na::Vector3<T>;
pub type Mat4<T> = na::Matrix4<T>;
pub type UnitQuat<T> = na::UnitQuaternion<T>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color3 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color3 {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn white() -> Self {
        Self::new(1., 1., 1.)
    }

    pub const fn black() -> Self {
        Self::new(0., 0., 0.)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color4 {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn transparent_black() -> Self {
        Self::new(0., 0., 0., 0.)
    }

    pub const fn opaque_black() -> Self {
        Self::new(0., 0., 0., 1.)
    }
}

// Clear color of a freshly created scene
impl Default for Color4 {
    fn default() -> Self {
        Self::new(0.2, 0.2, 0.3, 1.0)
    }
}
