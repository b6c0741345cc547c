//! Camera description shared by the emulated view and the overlay projection.
//!
//! Native XR sessions supply their own per-eye view/projection matrices; this
//! camera only drives the canvas path and screen-space helpers.

use glam::{Mat4, Quat, Vec3, Vec4};

use crate::constants::{CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR};
use crate::ray::Ray;

/// Right-handed perspective camera placed by a pose (position + orientation).
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub orientation: Quat,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            aspect: 1.0,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }
}

impl Camera {
    /// Recompute the aspect ratio after a resize. Zero-sized targets are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn pose(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        self.pose().inverse()
    }

    /// World-space ray through a pixel of a `width` x `height` target.
    pub fn screen_ray(&self, sx: f32, sy: f32, width: f32, height: f32) -> Ray {
        let ndc_x = (2.0 * sx / width.max(1.0)) - 1.0;
        let ndc_y = 1.0 - (2.0 * sy / height.max(1.0));
        let inv = self.view_projection().inverse();
        let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let p1: Vec3 = p_far.truncate() / p_far.w;
        Ray::new(self.position, p1 - self.position)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn project(&self, world: Vec3, width: f32, height: f32) -> Option<[f32; 2]> {
        project_point(self.view_projection(), world, width, height)
    }
}

/// Project a world point to pixel coordinates. `None` when behind the viewer.
pub fn project_point(view_proj: Mat4, world: Vec3, width: f32, height: f32) -> Option<[f32; 2]> {
    let clip = view_proj * world.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some([(ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height])
}
