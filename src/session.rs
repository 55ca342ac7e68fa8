//! Session aggregate: everything one run of the simulation owns.

use anyhow::anyhow;

use crate::audio::{VoiceFactory, VoiceHandle};
use crate::camera::OrbitCamera;
use crate::noise::{NoiseSource, PerlinNoise};
use crate::params::SessionParams;
use crate::scene::SceneSurface;
use crate::scheduler::{FrameReport, FrameScheduler, SimulationClock};
use crate::sim::{MoverGrid, VoiceMapping};

/// One running simulation: grid, camera, scene and frame scheduler
pub struct Session<V, S, N = PerlinNoise> {
    grid: MoverGrid<V, N>,
    camera: OrbitCamera,
    scene: S,
    scheduler: FrameScheduler,
}

impl<V: VoiceHandle, S: SceneSurface, N: NoiseSource> Session<V, S, N> {
    /// Handle one host refresh: camera, simulation, display, render
    pub fn on_refresh(&mut self, dt_s: f32) -> FrameReport {
        let Self {
            grid,
            camera,
            scene,
            scheduler,
        } = self;

        scheduler.on_refresh(dt_s, || {
            camera.update();
            grid.update();
            grid.display(scene);
            if let Err(e) = scene.render(camera) {
                log::warn!("Render error: {:?}", e);
            }
        })
    }

    /// Stop the scheduler; later refreshes do nothing
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn grid(&self) -> &MoverGrid<V, N> {
        &self.grid
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }
}

/// Builds the session exactly once
#[derive(Debug, Default)]
pub struct Bootstrap {
    launched: bool,
}

impl Bootstrap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_launched(&self) -> bool {
        self.launched
    }

    /// Build and start a session with Perlin noise seeded per mover
    pub fn launch<F, S>(
        &mut self,
        params: &SessionParams,
        factory: &mut F,
        scene: S,
    ) -> anyhow::Result<Session<F::Voice, S>>
    where
        F: VoiceFactory,
        S: SceneSurface,
    {
        // Fold the high bits in so every bit of the seed reaches the noise
        let base_seed = (params.grid.seed ^ (params.grid.seed >> 32)) as u32;
        let cols = params.grid.cols;
        self.launch_with_noise(params, factory, scene, |row, col| {
            PerlinNoise::new(base_seed.wrapping_add((row * cols + col) as u32))
        })
    }

    /// Build and start a session with caller-provided noise per `(row, col)`
    pub fn launch_with_noise<F, S, N>(
        &mut self,
        params: &SessionParams,
        factory: &mut F,
        mut scene: S,
        noise_for: impl FnMut(usize, usize) -> N,
    ) -> anyhow::Result<Session<F::Voice, S, N>>
    where
        F: VoiceFactory,
        S: SceneSurface,
        N: NoiseSource,
    {
        if self.launched {
            return Err(anyhow!("Session already initialised"));
        }
        params
            .validate()
            .map_err(|e| anyhow!("Invalid session config: {}", e))?;

        let grid = MoverGrid::new(
            &params.grid,
            &params.mover,
            &params.synth.timbre,
            VoiceMapping::new(params.mapping.clone()),
            factory,
            &mut scene,
            noise_for,
        )
        .map_err(|e| anyhow!("Invalid grid config: {}", e))?;

        let mut scheduler = FrameScheduler::new(SimulationClock::new(params.clock.interval_s));
        scheduler.start().map_err(|e| anyhow!(e))?;
        self.launched = true;

        log::info!(
            "Session started: {} voices x {} movers",
            params.grid.rows,
            params.grid.cols
        );

        Ok(Session {
            grid,
            camera: OrbitCamera::new(params.orbit.clone()),
            scene,
            scheduler,
        })
    }
}
