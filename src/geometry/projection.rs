//! Map projections and the globe placement capability.
//!
//! `equirect_pixel` maps lon/lat into texture space. `globe_position`
//! reproduces the renderer's polar-to-cartesian convention so lattice
//! points and focal targets land where the renderer draws them.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};
use serde::{Deserialize, Serialize};

/// World-space radius of the rendered globe.
pub const GLOBE_RADIUS: f32 = 100.0;

/// Projects `(lng, lat)` to equirectangular pixel space.
///
/// `x = (lng + 180) * W / 360`, `y = (90 - lat) * H / 180`.
#[inline]
pub fn equirect_pixel(lng: f64, lat: f64, width: u32, height: u32) -> (f64, f64) {
    (
        (lng + 180.0) * (width as f64 / 360.0),
        (90.0 - lat) * (height as f64 / 180.0),
    )
}

/// World position of a geographic point at a relative altitude.
///
/// Altitude is a fraction of the globe radius; lng=0 faces +Z and the
/// north pole is +Y.
pub fn globe_position(lat: f64, lng: f64, altitude: f64) -> Vec3 {
    let phi = (90.0 - lat).to_radians();
    let theta = (90.0 - lng).to_radians();
    let r = GLOBE_RADIUS as f64 * (1.0 + altitude);
    Vec3::new(
        (r * phi.sin() * theta.cos()) as f32,
        (r * phi.cos()) as f32,
        (r * phi.sin() * theta.sin()) as f32,
    )
}

/// Placement queries answered by the rendering engine.
pub trait GlobeProjector {
    /// 3D world position for a point on (or above) the globe.
    fn world_position(&self, lat: f64, lng: f64, altitude: f64) -> Vec3 {
        globe_position(lat, lng, altitude)
    }

    /// Screen position in percent of the viewport (`0..100` on both axes,
    /// y pointing down), or `None` when the point is behind the camera.
    fn screen_position(&self, lat: f64, lng: f64, altitude: f64) -> Option<Vec2>;
}

/// Orbit camera looking at the globe center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitView {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for OrbitView {
    fn default() -> Self {
        Self {
            yaw: std::f32::consts::FRAC_PI_2,
            pitch: 0.0,
            distance: GLOBE_RADIUS * 3.5,
            fov_y: 50f32.to_radians(),
            aspect: 16.0 / 9.0,
            z_near: 0.1,
            z_far: GLOBE_RADIUS * 50.0,
        }
    }
}

impl OrbitView {
    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.distance * self.yaw.cos() * self.pitch.cos(),
            self.distance * self.pitch.sin(),
            self.distance * self.yaw.sin() * self.pitch.cos(),
        )
    }

    pub fn view_proj(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect.max(1e-3), self.z_near, self.z_far);
        proj * view
    }
}

impl GlobeProjector for OrbitView {
    fn screen_position(&self, lat: f64, lng: f64, altitude: f64) -> Option<Vec2> {
        let world = self.world_position(lat, lng, altitude);
        let clip = self.view_proj() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        Some(Vec2::new((ndc.x * 0.5 + 0.5) * 100.0, (-ndc.y * 0.5 + 0.5) * 100.0))
    }
}
