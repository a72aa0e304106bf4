use nalgebra as na;
use bevy_ecs::prelude::*;
use crate::math::{Mat4, Mat4f, Vec3, Vec3f, UnitQuat, UnitQuatf, UnitVec3f};

#[derive(Component,Debug,Clone,PartialEq)]
pub struct Transform {
    pos: Vec3f,
    rot: UnitQuatf,
    scale: Vec3f,
    // Rebuilt on every change
    m: Mat4f,
}

impl Transform {
    pub fn new(pos: Vec3f, rot: UnitQuatf, scale: Vec3f) -> Self {
        let m = Mat4::identity();
        let mut res = Self { pos, rot, scale, m };
        res.rebuild_matrix();
        res
    }

    pub fn from_position(pos: Vec3f) -> Self {
        Transform::new(pos, UnitQuat::identity(), Vec3::from_element(1.0))
    }

    pub fn matrix(&self) -> Mat4f {
        self.m
    }

    pub fn forward(&self) -> Vec3f {
        -self.m.column(2).xyz()
    }

    pub fn right(&self) -> Vec3f {
        self.m.column(0).xyz()
    }

    pub fn position(&self) -> Vec3f {
        self.pos
    }

    pub fn rotation(&self) -> UnitQuatf {
        self.rot
    }

    pub fn scale(&self) -> Vec3f {
        self.scale
    }

    pub fn look_at(&mut self, target: Vec3f) {
        // face_towards points +z at the target, the camera looks down -z
        self.rot = UnitQuat::face_towards(&(self.pos - target), &Vec3::y_axis());
        self.rebuild_matrix();
    }

    pub fn translate(&mut self, v: Vec3f) {
        self.pos += v;
        self.rebuild_matrix();
    }

    /// World-space rotation.
    pub fn rotate(&mut self, rotation: UnitQuatf) {
        self.rot = rotation * self.rot;
        self.rebuild_matrix();
    }

    pub fn rotate_local(&mut self, rotation: UnitQuatf) {
        self.rot *= rotation;
        self.rebuild_matrix();
    }

    pub fn rotate_axis(&mut self, axis: &UnitVec3f, angle: f32) {
        self.rotate(UnitQuat::from_axis_angle(axis, angle));
    }

    /// `angle` in radians around a local axis.
    pub fn rotate_local_axis(&mut self, axis: &UnitVec3f, angle: f32) {
        self.rotate_local(UnitQuat::from_axis_angle(axis, angle));
    }

    /// Places `child` (expressed in this transform's space) in the parent space.
    /// Shear from non-uniform parent scale is dropped.
    pub fn compose(&self, child: &Transform) -> Transform {
        let pos = self.pos + self.rot * self.scale.component_mul(&child.pos);
        let rot = self.rot * child.rot;
        let scale = self.scale.component_mul(&child.scale);
        Transform::new(pos, rot, scale)
    }

    fn rebuild_matrix(&mut self) {
        let isometry = na::Isometry3::from_parts(na::Translation3::from(self.pos), self.rot);
        self.m = isometry.to_homogeneous().prepend_nonuniform_scaling(&self.scale);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::new(Vec3::new(0.0, 0.0, 0.0), UnitQuat::identity(), Vec3::from_element(1.0))
    }
}
