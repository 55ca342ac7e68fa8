//! Mouse-driven orbit camera around the grid centre.

use glam::{Mat4, Vec3};

use crate::params::OrbitParams;

/// Pitch stays just short of the poles so `look_at` never degenerates
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Orbit camera: input is queued as it arrives and applied in `update()`
pub struct OrbitCamera {
    params: OrbitParams,
    target: Vec3,
    distance: f32,
    yaw: f32,
    pitch: f32,
    pending_rotation: (f32, f32),
    pending_zoom: f32,
}

impl OrbitCamera {
    /// Create camera looking at the origin from `+Z`
    pub fn new(params: OrbitParams) -> Self {
        let distance = params.distance;
        Self {
            params,
            target: Vec3::ZERO,
            distance,
            yaw: 0.0,
            pitch: 0.0,
            pending_rotation: (0.0, 0.0),
            pending_zoom: 0.0,
        }
    }

    /// Queue an orbit by a mouse drag of `(dx, dy)` pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.pending_rotation.0 += dx;
        self.pending_rotation.1 += dy;
    }

    /// Queue a zoom by `lines` scroll steps (positive zooms in)
    pub fn zoom(&mut self, lines: f32) {
        self.pending_zoom += lines;
    }

    /// Apply queued input, once per tick before the simulation
    pub fn update(&mut self) {
        let (dx, dy) = std::mem::take(&mut self.pending_rotation);
        self.yaw -= dx * self.params.rotate_speed;
        self.pitch = (self.pitch + dy * self.params.rotate_speed).clamp(-MAX_PITCH, MAX_PITCH);

        let lines = std::mem::take(&mut self.pending_zoom);
        if lines != 0.0 {
            let scale = (1.0 - self.params.zoom_speed).powf(lines);
            self.distance = (self.distance * scale)
                .clamp(self.params.min_distance, self.params.max_distance);
        }
    }

    /// Current eye position
    pub fn eye(&self) -> Vec3 {
        let offset = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        self.target + offset * self.distance
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Create view-projection matrix for rendering
    pub fn view_proj(&self, aspect_ratio: f32) -> Mat4 {
        // Always keep Y as up vector (camera never rolls)
        let view = Mat4::look_at_rh(self.eye(), self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            self.params.fov_degrees.to_radians(),
            aspect_ratio,
            self.params.near_plane,
            self.params.far_plane,
        );
        proj * view
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(OrbitParams::default())
    }
}
