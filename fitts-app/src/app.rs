use anyhow::{Context, Result};
use fitts_core::{Bounds, Point, SessionState};
use fitts_experiment::{CsvTrialRecorder, ExperimentConfig, SessionEvent, TrialSession};
use fitts_render::{Confetti, Scene, SkiaRenderer, continue_button};
use fitts_timing::{Clock, SystemClock, Timestamp};
use pixels::{Pixels, SurfaceTexture};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

type Session = TrialSession<StdRng, SystemClock, CsvTrialRecorder>;

const CONFETTI_PARTICLES: usize = 150;

/// States in which the start/continue button is live.
fn continuable(state: SessionState) -> bool {
    state == SessionState::Idle || state.awaiting_continue()
}

pub struct Settings {
    pub config: ExperimentConfig,
    pub log_path: PathBuf,
    pub seed: Option<u64>,
}

pub struct App {
    settings: Settings,
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    renderer: Option<SkiaRenderer>,
    session: Option<Session>,
    clock: SystemClock,
    confetti: Confetti,
    cursor: Point,
    last_frame: Option<Timestamp>,
    error: Option<anyhow::Error>,
    should_exit: bool,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            window: None,
            pixels: None,
            renderer: None,
            session: None,
            clock: SystemClock::new(),
            confetti: Confetti::new(),
            cursor: Point::default(),
            last_frame: None,
            error: None,
            should_exit: false,
        }
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        log::info!(
            "Fitts' Law experiment for participant {:?} on {}/{}",
            self.settings.config.participant,
            std::env::consts::OS,
            std::env::consts::ARCH
        );
        log::info!("Click the yellow button to start, ESC to exit");

        event_loop.run_app(&mut self)?;

        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn rng(&self) -> StdRng {
        match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .context("no monitor available")?;

        let attributes = Window::default_attributes()
            .with_title("Fitts' Law Experiment")
            .with_fullscreen(Some(Fullscreen::Borderless(Some(monitor))))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(attributes)?);
        let size = window.inner_size();
        log::info!(
            "Display {}x{} at scale {:.2}",
            size.width,
            size.height,
            window.scale_factor()
        );

        let surface = SurfaceTexture::new(size.width, size.height, window.clone());
        self.pixels = Some(Pixels::new(size.width, size.height, surface)?);
        self.renderer = Some(SkiaRenderer::new(size.width, size.height)?);

        let bounds = Bounds::new(size.width as f64, size.height as f64);
        let recorder = CsvTrialRecorder::open(&self.settings.log_path)
            .with_context(|| format!("opening trial log {}", self.settings.log_path.display()))?;
        let session = TrialSession::new(
            self.settings.config.clone(),
            bounds,
            self.rng(),
            self.clock.clone(),
            recorder,
        )
        .context("invalid experiment configuration")?;
        self.session = Some(session);

        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let (Some(pixels), Some(renderer), Some(session)) = (
            self.pixels.as_mut(),
            self.renderer.as_mut(),
            self.session.as_ref(),
        ) else {
            return Ok(());
        };

        let now = self.clock.now();
        if let Some(last) = self.last_frame {
            self.confetti.step(self.clock.elapsed(last));
        }
        self.last_frame = Some(now);

        let scene = Scene {
            state: session.state(),
            target: session.current_target().copied(),
            progress: session.progress(),
            confetti: Some(&self.confetti),
        };
        let stats = renderer.render_frame(&scene, pixels.frame_mut(), &self.clock)?;
        pixels.render()?;
        log::trace!(
            "frame: clear {:.3}ms, draw {:.3}ms, copy {:.3}ms, total {:.3}ms",
            stats.clear.as_secs_f64() * 1e3,
            stats.draw.as_secs_f64() * 1e3,
            stats.copy.as_secs_f64() * 1e3,
            stats.total.as_secs_f64() * 1e3,
        );
        Ok(())
    }

    /// Left button: the live target surface takes the click, otherwise only the
    /// start/continue button reacts.
    fn handle_click(&mut self, event_loop: &ActiveEventLoop) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let state = session.state();
        let event = if state.accepts_clicks() {
            Some(SessionEvent::Click(self.cursor))
        } else if continuable(state) && continue_button(session.bounds()).contains(self.cursor) {
            Some(SessionEvent::Continue)
        } else {
            None
        };
        if let Some(event) = event {
            self.dispatch(event, event_loop);
        }
    }

    fn handle_input(&mut self, key: PhysicalKey, event_loop: &ActiveEventLoop) {
        if let PhysicalKey::Code(k) = key {
            match k {
                KeyCode::Space | KeyCode::Enter => {
                    if self.session.as_ref().is_some_and(|s| continuable(s.state())) {
                        self.dispatch(SessionEvent::Continue, event_loop);
                    }
                }
                KeyCode::Escape => {
                    self.dispatch(SessionEvent::Abort, event_loop);
                    self.cleanup_and_exit(event_loop);
                }
                _ => {}
            }
        }
    }

    fn dispatch(&mut self, event: SessionEvent, event_loop: &ActiveEventLoop) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let before = session.current_target().copied();
        let was_terminal = session.state().is_terminal();

        if let Err(e) = session.handle_event(event) {
            log::error!("Session stopped: {e}");
            self.error = Some(e.into());
            self.cleanup_and_exit(event_loop);
            return;
        }

        let presented = session.current_target().copied();
        let finished = !was_terminal && session.state() == SessionState::Completed;
        let bounds = session.bounds();

        if presented.is_some() && presented != before {
            self.warp_cursor(bounds.center());
        }
        if finished {
            self.celebrate(bounds);
        }
    }

    /// Puts the pointer over the canvas point `to`, which is the canvas center.
    /// The canvas is centered in the window, so that is the window center.
    fn warp_cursor(&mut self, to: Point) {
        if let Some(window) = &self.window {
            let size = window.inner_size();
            let at = PhysicalPosition::new(size.width as f64 / 2.0, size.height as f64 / 2.0);
            match window.set_cursor_position(at) {
                Ok(()) => self.cursor = to,
                Err(e) => log::warn!("Cannot move cursor: {e}"),
            }
        }
    }

    fn celebrate(&mut self, bounds: Bounds) {
        if let Some(session) = &self.session {
            let s = session.summary();
            println!("\nExperiment complete for {}", s.participant);
            println!("  Trials completed: {}/{}", s.completed, s.total);
            println!("  Mean time:        {:.3} s", s.mean_time_secs);
            println!("  Mean errors:      {:.2}", s.mean_errors);
            println!("  Success rate:     {:.1}%", s.success_rate);
        }
        let mut rng = self.rng();
        self.confetti.start(
            bounds.width as f32,
            bounds.height as f32,
            CONFETTI_PARTICLES,
            &mut rng,
        );
    }

    /// Resizes the surface and, while nothing has been presented yet, the session
    /// canvas. The renderer and pixel buffer always follow the session bounds so
    /// drawing and hit testing agree.
    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                log::error!("Failed to resize surface: {e}");
            }
        }
        if let Some(session) = &mut self.session {
            let bounds = Bounds::new(new_size.width as f64, new_size.height as f64);
            match session.resize(bounds) {
                Ok(true) => {}
                Ok(false) => log::warn!(
                    "Window resized to {}x{} mid-session; keeping the {}x{} canvas",
                    new_size.width,
                    new_size.height,
                    session.bounds().width,
                    session.bounds().height
                ),
                Err(e) => log::error!("Cannot resize canvas: {e}"),
            }
        }
        self.sync_canvas();
    }

    fn sync_canvas(&mut self) {
        let (Some(pixels), Some(renderer), Some(session)) = (
            self.pixels.as_mut(),
            self.renderer.as_mut(),
            self.session.as_ref(),
        ) else {
            return;
        };
        let bounds = session.bounds();
        if renderer.bounds() == bounds {
            return;
        }
        let (width, height) = (bounds.width as u32, bounds.height as u32);
        if let Err(e) = pixels.resize_buffer(width, height) {
            log::error!("Failed to resize buffer: {e}");
        }
        if let Err(e) = renderer.resize(width, height) {
            log::error!("Failed to resize canvas: {e}");
        }
    }

    /// Maps a window position into canvas pixels. The canvas is centered in the
    /// surface, and positions outside it clamp to its edge.
    fn canvas_point(&self, position: PhysicalPosition<f64>) -> Point {
        match &self.pixels {
            Some(pixels) => {
                let (x, y) = pixels
                    .window_pos_to_pixel((position.x as f32, position.y as f32))
                    .unwrap_or_else(|pos| pixels.clamp_pixel_pos(pos));
                Point::new(x as f64, y as f64)
            }
            None => Point::new(position.x, position.y),
        }
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.confetti.cancel();
        if let Some(session) = &self.session {
            log::info!(
                "Exiting with {}/{} trials recorded to {}",
                session.completed(),
                session.total_trials(),
                session.recorder().path().display()
            );
        }
        self.should_exit = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                log::error!("Failed to start: {e:#}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.dispatch(SessionEvent::Abort, event_loop);
                self.cleanup_and_exit(event_loop);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    log::error!("Render failed: {e:#}");
                    self.error = Some(e);
                    self.cleanup_and_exit(event_loop);
                    return;
                }
                if let Some(win) = &self.window {
                    win.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = self.canvas_point(position);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.handle_click(event_loop),
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
                self.handle_input(event.physical_key, event_loop);
            }
            WindowEvent::Resized(size) => self.handle_resize(size),
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    self.handle_resize(window.inner_size());
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
        }
    }
}
