//! Scene surface interface and a headless implementation.

use glam::Vec3;

use crate::camera::OrbitCamera;

/// Receives mover boxes and draws them once per tick
pub trait SceneSurface {
    /// Add a box at `position` and return its handle
    fn spawn_box(&mut self, position: Vec3, color: Vec3) -> usize;

    /// Move an existing box
    fn set_position(&mut self, id: usize, position: Vec3);

    /// Draw the scene as seen from `camera`
    fn render(&mut self, camera: &OrbitCamera) -> anyhow::Result<()>;
}

/// Scene that only records box state (offline recording, tests)
#[derive(Debug, Default, Clone)]
pub struct HeadlessScene {
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
    frames_rendered: usize,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn frames_rendered(&self) -> usize {
        self.frames_rendered
    }
}

impl SceneSurface for HeadlessScene {
    fn spawn_box(&mut self, position: Vec3, color: Vec3) -> usize {
        self.positions.push(position);
        self.colors.push(color);
        self.positions.len() - 1
    }

    fn set_position(&mut self, id: usize, position: Vec3) {
        if let Some(slot) = self.positions.get_mut(id) {
            *slot = position;
        }
    }

    fn render(&mut self, _camera: &OrbitCamera) -> anyhow::Result<()> {
        self.frames_rendered += 1;
        Ok(())
    }
}
