use glam::{Mat4, Vec3};

use crate::scene::Aabb;

/// World-space ray with a unit-length direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Target ray of a pose: starts at the pose origin and points down its -Z axis.
    pub fn from_pose(pose: Mat4) -> Self {
        let (_, rotation, translation) = pose.to_scale_rotation_translation();
        Self::new(translation, rotation * Vec3::NEG_Z)
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Slab test. Returns the entry distance, or 0 when the origin is inside the box.
#[inline]
pub fn ray_aabb(ray_origin: Vec3, ray_dir: Vec3, bounds: &Aabb) -> Option<f32> {
    let inv = ray_dir.recip();
    let t1 = (bounds.min - ray_origin) * inv;
    let t2 = (bounds.max - ray_origin) * inv;
    let t_near = t1.min(t2).max_element();
    let t_far = t1.max(t2).min_element();
    if t_far < t_near.max(0.0) {
        return None;
    }
    Some(t_near.max(0.0))
}

/// Intersection with the horizontal plane `y = height`, ahead of the origin only.
#[inline]
pub fn ray_plane_y(ray_origin: Vec3, ray_dir: Vec3, height: f32) -> Option<f32> {
    if ray_dir.y.abs() < 1e-6 {
        return None;
    }
    let t = (height - ray_origin.y) / ray_dir.y;
    (t >= 0.0).then_some(t)
}
