use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use fitts_core::{Point, SessionState, Target};
use fitts_render::{Confetti, Scene, SkiaRenderer};
use fitts_timing::SystemClock;
use rand::SeedableRng;
use rand::rngs::StdRng;

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

fn harness() -> (SkiaRenderer, Vec<u8>, SystemClock) {
    let r = SkiaRenderer::new(WIDTH, HEIGHT).unwrap();
    let fb = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
    (r, fb, SystemClock::new())
}

pub fn bench_frames(c: &mut Criterion) {
    let mut g = c.benchmark_group("render_frame");
    g.sample_size(40);

    g.bench_function("target_frame", |b| {
        b.iter_batched(
            harness,
            |(mut r, mut fb, clock)| {
                let scene = Scene {
                    state: SessionState::AwaitingClick,
                    target: Some(Target::new(30.0, Point::new(740.0, 360.0))),
                    progress: (10, 32),
                    confetti: None,
                };
                black_box(r.render_frame(&scene, &mut fb, &clock).ok());
            },
            BatchSize::SmallInput,
        )
    });

    g.bench_function("confetti_frame", |b| {
        let mut confetti = Confetti::new();
        confetti.start(
            WIDTH as f32,
            HEIGHT as f32,
            300,
            &mut StdRng::seed_from_u64(1),
        );
        b.iter_batched(
            harness,
            |(mut r, mut fb, clock)| {
                let scene = Scene {
                    state: SessionState::Completed,
                    target: None,
                    progress: (32, 32),
                    confetti: Some(&confetti),
                };
                black_box(r.render_frame(&scene, &mut fb, &clock).ok());
            },
            BatchSize::SmallInput,
        )
    });

    g.finish();
}

criterion_group!(benches, bench_frames);
criterion_main!(benches);
