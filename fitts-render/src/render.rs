use crate::confetti::Confetti;
use anyhow::{Context, Result, ensure};
use fitts_core::{Bounds, Outcome, Point, SessionState, Target};
use fitts_timing::Clock;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::Duration;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Transform};

const BACKGROUND: [u8; 4] = [255, 255, 255, 255];
const TARGET: [u8; 4] = [0, 0, 255, 255];
const BUTTON: [u8; 4] = [255, 255, 0, 255];
const HIT: [u8; 4] = [0, 200, 0, 255];
const MISS: [u8; 4] = [220, 0, 0, 255];
const DIM: [u8; 4] = [0, 0, 0, 128];
const PROGRESS_TRACK: [u8; 4] = [220, 220, 220, 255];
const PROGRESS_FILL: [u8; 4] = [60, 60, 60, 255];

pub const BUTTON_RADIUS: f64 = 40.0;
const BANNER_HEIGHT: f32 = 48.0;
const PROGRESS_HEIGHT: f32 = 6.0;

/// The start/continue button, centered on the canvas.
pub fn continue_button(bounds: Bounds) -> Target {
    Target::new(BUTTON_RADIUS, bounds.center())
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub state: SessionState,
    pub target: Option<Target>,
    /// (trial shown, total)
    pub progress: (usize, usize),
    pub confetti: Option<&'a Confetti>,
}

pub struct FrameStats {
    pub clear: Duration,
    pub draw: Duration,
    pub copy: Duration,
    pub total: Duration,
}

fn color(rgba: [u8; 4]) -> Color {
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

fn paint(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color(rgba));
    paint.anti_alias = false;
    paint
}

fn render_disc(radius: f32, rgba: [u8; 4]) -> Result<Pixmap> {
    let size = (radius * 2.0).ceil().max(1.0) as u32;
    let mut pixmap = Pixmap::new(size, size).context("cannot allocate disc pixmap")?;
    let path = PathBuilder::from_circle(radius, radius, radius).context("invalid disc radius")?;
    pixmap.fill_path(
        &path,
        &paint(rgba),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
    Ok(pixmap)
}

fn cached_disc(
    cache: &mut HashMap<(u32, [u8; 4]), Pixmap>,
    radius: f32,
    rgba: [u8; 4],
) -> Result<&Pixmap> {
    let disc = match cache.entry((radius.to_bits(), rgba)) {
        Entry::Occupied(slot) => slot.into_mut(),
        Entry::Vacant(slot) => slot.insert(render_disc(radius, rgba)?),
    };
    Ok(&*disc)
}

pub struct SkiaRenderer {
    width: u32,
    height: u32,
    canvas: Pixmap,
    // disc pixmaps keyed by (radius bits, color)
    discs: HashMap<(u32, [u8; 4]), Pixmap>,
}

impl SkiaRenderer {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let canvas = Pixmap::new(width, height)
            .with_context(|| format!("cannot allocate {width}x{height} canvas"))?;
        Ok(Self {
            width,
            height,
            canvas,
            discs: HashMap::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.canvas = Pixmap::new(width, height)
            .with_context(|| format!("cannot allocate {width}x{height} canvas"))?;
        self.width = width;
        self.height = height;
        log::debug!("Renderer resized to {width}x{height}");
        Ok(())
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width as f64, self.height as f64)
    }

    pub fn canvas(&self) -> &Pixmap {
        &self.canvas
    }

    fn blit_disc(&mut self, center: Point, radius: f64, rgba: [u8; 4]) -> Result<()> {
        let radius = radius as f32;
        let x = (center.x as f32 - radius).round() as i32;
        let y = (center.y as f32 - radius).round() as i32;
        let disc = cached_disc(&mut self.discs, radius, rgba)?;
        self.canvas.draw_pixmap(
            x,
            y,
            disc.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(())
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, rgba: [u8; 4]) {
        if let Some(rect) = Rect::from_xywh(x, y, w, h) {
            self.canvas
                .fill_rect(rect, &paint(rgba), Transform::identity(), None);
        }
    }

    fn draw_progress(&mut self, (current, total): (usize, usize)) {
        if total == 0 {
            return;
        }
        let w = self.width as f32;
        let y = self.height as f32 - PROGRESS_HEIGHT;
        let fraction = (current.min(total) as f32) / total as f32;
        self.fill_rect(0.0, y, w, PROGRESS_HEIGHT, PROGRESS_TRACK);
        self.fill_rect(0.0, y, w * fraction, PROGRESS_HEIGHT, PROGRESS_FILL);
    }

    fn draw_scene(&mut self, scene: &Scene<'_>) -> Result<()> {
        let button = continue_button(self.bounds());
        match scene.state {
            SessionState::Idle => self.blit_disc(button.center, button.radius, BUTTON)?,
            SessionState::AwaitingClick => {
                if let Some(target) = scene.target {
                    self.blit_disc(target.center, target.radius, TARGET)?;
                }
            }
            _ => {}
        }
        if let Some(outcome) = scene.state.feedback() {
            let banner = match outcome {
                Outcome::Hit => HIT,
                Outcome::Miss => MISS,
            };
            self.fill_rect(0.0, 0.0, self.width as f32, BANNER_HEIGHT, banner);
            self.blit_disc(button.center, button.radius, BUTTON)?;
        }

        self.draw_progress(scene.progress);

        if scene.state.is_terminal() {
            self.fill_rect(0.0, 0.0, self.width as f32, self.height as f32, DIM);
        }
        if let Some(confetti) = scene.confetti.filter(|c| c.is_active()) {
            for p in confetti.particles() {
                self.fill_rect(p.x, p.y, p.size, p.size, p.color);
            }
        }
        Ok(())
    }

    /// Draws `scene` and copies the result into an RGBA `frame_buffer` of the canvas size.
    pub fn render_frame<C: Clock>(
        &mut self,
        scene: &Scene<'_>,
        frame_buffer: &mut [u8],
        clock: &C,
    ) -> Result<FrameStats> {
        ensure!(
            frame_buffer.len() == self.canvas.data().len(),
            "frame buffer holds {} bytes, canvas needs {}",
            frame_buffer.len(),
            self.canvas.data().len()
        );

        let start = clock.now();
        self.canvas.fill(color(BACKGROUND));
        let clear = clock.elapsed(start);

        let t = clock.now();
        self.draw_scene(scene)?;
        let draw = clock.elapsed(t);

        // the canvas is opaque, so premultiplied bytes equal straight RGBA
        let t = clock.now();
        frame_buffer.copy_from_slice(self.canvas.data());
        let copy = clock.elapsed(t);

        Ok(FrameStats {
            clear,
            draw,
            copy,
            total: clock.elapsed(start),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitts_timing::ManualClock;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const W: u32 = 200;
    const H: u32 = 150;

    fn render(scene: Scene<'_>) -> Vec<u8> {
        let mut r = SkiaRenderer::new(W, H).unwrap();
        let mut fb = vec![0u8; (W * H * 4) as usize];
        r.render_frame(&scene, &mut fb, &ManualClock::default())
            .unwrap();
        fb
    }

    fn pixel(fb: &[u8], x: u32, y: u32) -> [u8; 4] {
        let i = ((y * W + x) * 4) as usize;
        [fb[i], fb[i + 1], fb[i + 2], fb[i + 3]]
    }

    fn scene<'a>(state: SessionState) -> Scene<'a> {
        Scene {
            state,
            target: None,
            progress: (1, 2),
            confetti: None,
        }
    }

    #[test]
    fn test_target_drawn_on_white() {
        let mut s = scene(SessionState::AwaitingClick);
        s.target = Some(Target::new(10.0, Point::new(50.0, 50.0)));
        let fb = render(s);
        assert_eq!(pixel(&fb, 50, 50), TARGET);
        assert_eq!(pixel(&fb, 150, 60), BACKGROUND);
    }

    #[test]
    fn test_idle_shows_start_button() {
        let fb = render(scene(SessionState::Idle));
        assert_eq!(pixel(&fb, 100, 75), BUTTON);
        assert_eq!(pixel(&fb, 5, 5), BACKGROUND);
    }

    #[test]
    fn test_feedback_banner_colors() {
        let fb = render(scene(SessionState::AwaitingContinue(Outcome::Miss)));
        assert_eq!(pixel(&fb, 5, 5), MISS);
        assert_eq!(pixel(&fb, 100, 75), BUTTON);
        let fb = render(scene(SessionState::AwaitingContinue(Outcome::Hit)));
        assert_eq!(pixel(&fb, 5, 5), HIT);
    }

    #[test]
    fn test_progress_bar_fraction() {
        let fb = render(scene(SessionState::Idle));
        assert_eq!(pixel(&fb, 50, H - 2), PROGRESS_FILL);
        assert_eq!(pixel(&fb, 150, H - 2), PROGRESS_TRACK);
    }

    #[test]
    fn test_terminal_screen_is_dimmed() {
        let fb = render(scene(SessionState::Completed));
        let [r, g, b, a] = pixel(&fb, 100, 75);
        assert_eq!(a, 255);
        assert!(r == g && g == b);
        assert!((100..160).contains(&r), "dimmed value {r}");
    }

    #[test]
    fn test_confetti_drawn_on_end_screen() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut confetti = Confetti::new();
        confetti.start(W as f32, H as f32, 200, &mut rng);
        for _ in 0..120 {
            confetti.step(Duration::from_millis(16));
        }
        let mut s = scene(SessionState::Completed);
        s.confetti = Some(&confetti);
        let fb = render(s);
        let colored = fb
            .chunks_exact(4)
            .filter(|px| !(px[0] == px[1] && px[1] == px[2]))
            .count();
        assert!(colored > 0);
    }

    #[test]
    fn test_frame_buffer_size_mismatch() {
        let mut r = SkiaRenderer::new(W, H).unwrap();
        let mut fb = vec![0u8; 16];
        assert!(
            r.render_frame(&scene(SessionState::Idle), &mut fb, &ManualClock::default())
                .is_err()
        );
    }

    #[test]
    fn test_continue_button_at_center() {
        let b = continue_button(Bounds::new(800.0, 600.0));
        assert_eq!(b.center, Point::new(400.0, 300.0));
        assert_eq!(b.radius, BUTTON_RADIUS);
    }

    #[test]
    fn test_resize() {
        let mut r = SkiaRenderer::new(W, H).unwrap();
        r.resize(64, 32).unwrap();
        assert_eq!(r.bounds(), Bounds::new(64.0, 32.0));
        assert_eq!(r.canvas().width(), 64);
    }

    #[test]
    fn test_button_drawn_where_it_is_hit_tested_after_resize() {
        let mut r = SkiaRenderer::new(W, H).unwrap();
        r.resize(400, 300).unwrap();
        let mut fb = vec![0u8; 400 * 300 * 4];
        r.render_frame(&scene(SessionState::Idle), &mut fb, &ManualClock::default())
            .unwrap();
        let button = continue_button(r.bounds());
        assert_eq!(button.center, Point::new(200.0, 150.0));
        let at = |x: usize, y: usize| {
            let i = (y * 400 + x) * 4;
            [fb[i], fb[i + 1], fb[i + 2], fb[i + 3]]
        };
        assert_eq!(at(200, 150), BUTTON);
        assert_eq!(at(100, 75), BACKGROUND);
    }
}
