//! Wavegrid - a grid of boxes bobbing on noise, each row singing along.
//!
//! The window opens on an intro screen. A click (or Space/Enter) starts the
//! audio and the simulation; Escape quits.

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use wavegrid::audio::{AudioOutput, SynthVoice};
use wavegrid::camera::OrbitCamera;
use wavegrid::cli::Args;
use wavegrid::params::SessionParams;
use wavegrid::recording::record_offline;
use wavegrid::rendering::RenderSystem;
use wavegrid::scene::SceneSurface;
use wavegrid::session::{Bootstrap, Session};

/// Pixels of trackpad scroll counted as one wheel line
const PIXELS_PER_LINE: f32 = 50.0;

/// Running session plus the audio stream it plays through
struct LiveSession {
    session: Session<SynthVoice, RenderSystem>,
    _audio: AudioOutput,
}

/// Where the application is in its single-session lifecycle
enum Stage {
    /// Window not created yet
    Waiting,
    /// Intro screen, waiting for the start trigger
    Intro(RenderSystem),
    Running(LiveSession),
    /// Session over (or failed to start)
    Finished,
}

/// Main application state
struct App {
    window: Option<Arc<Window>>,
    stage: Stage,
    params: SessionParams,
    bootstrap: Bootstrap,
    intro_camera: OrbitCamera,

    // Mouse orbit tracking
    dragging: bool,
    last_cursor: Option<PhysicalPosition<f64>>,

    // Time tracking
    last_frame: Instant,
}

impl App {
    fn new(params: SessionParams) -> Self {
        let intro_camera = OrbitCamera::new(params.orbit.clone());
        Self {
            window: None,
            stage: Stage::Waiting,
            params,
            bootstrap: Bootstrap::new(),
            intro_camera,
            dragging: false,
            last_cursor: None,
            last_frame: Instant::now(),
        }
    }

    /// Start audio and the session; runs at most once
    fn launch(&mut self, event_loop: &ActiveEventLoop) {
        if self.bootstrap.is_launched() || !matches!(self.stage, Stage::Intro(_)) {
            return;
        }

        let audio = match AudioOutput::start(&self.params.synth) {
            Ok(audio) => audio,
            Err(e) => {
                log::error!("Audio init failed: {:?}", e);
                event_loop.exit();
                return;
            }
        };

        let Stage::Intro(render_system) = std::mem::replace(&mut self.stage, Stage::Finished)
        else {
            return;
        };

        match self
            .bootstrap
            .launch(&self.params, &mut audio.voice_factory(), render_system)
        {
            Ok(session) => {
                if let Some(window) = &self.window {
                    window.set_title("Wavegrid");
                }
                self.last_frame = Instant::now();
                self.stage = Stage::Running(LiveSession {
                    session,
                    _audio: audio,
                });
            }
            Err(e) => {
                log::error!("Session init failed: {:?}", e);
                event_loop.exit();
            }
        }
    }

    /// Stop the session and leave the event loop
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Stage::Running(live) = &mut self.stage {
            live.session.stop();
        }
        event_loop.exit();
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        let now = Instant::now();
        let dt_s = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        match &mut self.stage {
            Stage::Intro(render_system) => {
                if let Err(e) = render_system.render(&self.intro_camera) {
                    log::warn!("Render error: {:?}", e);
                }
            }
            Stage::Running(live) => {
                live.session.on_refresh(dt_s);
            }
            Stage::Waiting | Stage::Finished => {}
        }
    }

    fn camera_mut(&mut self) -> Option<&mut OrbitCamera> {
        match &mut self.stage {
            Stage::Running(live) => Some(live.session.camera_mut()),
            _ => None,
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Wavegrid - click to start")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.params.render.window_width,
                self.params.render.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.params.render.clone(),
        )) {
            Ok(render_system) => self.stage = Stage::Intro(render_system),
            Err(e) => {
                log::error!("Renderer init failed: {:?}", e);
                event_loop.exit();
                return;
            }
        }

        log::info!("Click or press Space to start, ESC to quit");
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => self.shutdown(event_loop),
                KeyCode::Space | KeyCode::Enter => self.launch(event_loop),
                _ => {}
            },
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed if !self.bootstrap.is_launched() => self.launch(event_loop),
                ElementState::Pressed => self.dragging = true,
                ElementState::Released => self.dragging = false,
            },
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(last) = self.last_cursor.replace(position) {
                    if self.dragging {
                        let dx = (position.x - last.x) as f32;
                        let dy = (position.y - last.y) as f32;
                        if let Some(camera) = self.camera_mut() {
                            camera.rotate(dx, dy);
                        }
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                if let Some(camera) = self.camera_mut() {
                    camera.zoom(lines);
                }
            }
            WindowEvent::Resized(size) => match &mut self.stage {
                Stage::Intro(render_system) => render_system.resize(size.width, size.height),
                Stage::Running(live) => live.session.scene_mut().resize(size.width, size.height),
                Stage::Waiting | Stage::Finished => {}
            },
            WindowEvent::RedrawRequested => self.render_frame(),
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let params = args.session_params();
    params
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    if let Some(config) = args.recording_config() {
        let summary = record_offline(&params, &config)?;
        log::info!(
            "Wrote {} audio frames over {} simulation frames",
            summary.audio_frames_written,
            summary.frames_simulated
        );
        return Ok(());
    }

    log::info!(
        "Wavegrid: {} voices x {} movers",
        params.grid.rows,
        params.grid.cols
    );

    let mut app = App::new(params);
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
