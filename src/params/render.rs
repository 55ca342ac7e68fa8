//! Rendering, camera, clock and recording configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Background colour (linear RGB)
    pub background: [f64; 3],

    /// Edge length of each mover box (world units)
    pub box_size: f32,

    /// Direction the key light shines from
    pub light_direction: [f32; 3],

    /// Ambient light intensity (0..1)
    pub ambient: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            // 0x474c4f slate grey
            background: [0x47 as f64 / 255.0, 0x4c as f64 / 255.0, 0x4f as f64 / 255.0],
            box_size: 0.5,
            light_direction: [-1.0, 2.0, 4.0],
            ambient: 0.5,
        }
    }
}

/// Orbit camera configuration
#[derive(Debug, Clone)]
pub struct OrbitParams {
    /// Starting distance from the orbit target (world units)
    pub distance: f32,

    /// Zoom limits (world units)
    pub min_distance: f32,
    pub max_distance: f32,

    /// Radians of orbit per pixel of mouse drag
    pub rotate_speed: f32,

    /// Fraction of distance zoomed per scroll line
    pub zoom_speed: f32,

    /// Field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            distance: 25.0,
            min_distance: 2.0,
            max_distance: 200.0,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            fov_degrees: 75.0,
            near_plane: 0.1,
            far_plane: 1000.0,
        }
    }
}

/// Frame clock configuration
#[derive(Debug, Clone)]
pub struct ClockParams {
    /// Rate-limit interval for time-gated work (seconds)
    /// 0.5 = 2 fps
    pub interval_s: f32,
}

impl Default for ClockParams {
    fn default() -> Self {
        Self { interval_s: 0.5 }
    }
}

/// Offline recording configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output WAV path
    pub output_path: String,

    /// Simulation frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32, output_path: impl Into<String>) -> Self {
        Self {
            duration_secs,
            output_path: output_path.into(),
            fps: 60,
        }
    }

    /// Total number of frames to simulate
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Frame duration (seconds)
    pub fn frame_time_s(&self) -> f32 {
        1.0 / self.fps as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_frame_count() {
        let config = RecordingConfig::new(2.5, "out.wav");
        assert_eq!(config.total_frames(), 150);
        assert!((config.frame_time_s() - 1.0 / 60.0).abs() < 1e-6);
    }
}
