use ar_core::{Aabb, Light};
use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Lighting collapsed into the three terms the fragment shader reads.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LightTerms {
    pub ambient: Vec3,
    pub sky: Vec3,
    pub ground: Vec3,
}

impl LightTerms {
    pub fn from_lights(lights: &[Light]) -> Self {
        let mut terms = LightTerms::default();
        for light in lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    terms.ambient += Vec3::from(color) * intensity;
                }
                Light::Hemisphere {
                    sky,
                    ground,
                    intensity,
                } => {
                    terms.sky += Vec3::from(sky) * intensity;
                    terms.ground += Vec3::from(ground) * intensity;
                }
            }
        }
        terms
    }
}

/// Model matrix that stretches the unit cube over `bounds` in node space.
#[inline]
pub fn proxy_matrix(world: Mat4, bounds: &Aabb) -> Mat4 {
    let size = bounds.size().max(Vec3::splat(1e-4));
    world * Mat4::from_scale_rotation_translation(size, glam::Quat::IDENTITY, bounds.center())
}

/// Unit cube centred on the origin, 36 vertices with flat normals.
pub fn unit_cube() -> Vec<Vertex> {
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        // normal, u axis, v axis
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let mut out = Vec::with_capacity(36);
    for (n, u, v) in FACES {
        let (n, u, v) = (Vec3::from(n), Vec3::from(u), Vec3::from(v));
        let corner = |su: f32, sv: f32| Vertex {
            position: (n * 0.5 + u * 0.5 * su + v * 0.5 * sv).to_array(),
            normal: n.to_array(),
        };
        let quad = [
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, 1.0),
        ];
        out.extend_from_slice(&quad);
    }
    out
}
