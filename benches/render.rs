//! Benchmarks for frame rasterization and histograms.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use flare::{
    buffer::{ColorHistogram, ColorImage, DEFAULT_SCALE, GrayHistogram, GrayscaleImage, Rgba},
    compute::{Camera, Choreography, Rasterizer, Scene, Texture},
    schema::FlareConfig,
};

fn seeded_config() -> FlareConfig {
    let mut config = FlareConfig::default();
    config.seeds.rng_seed = Some(42);
    config
}

fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw");
    let texture = Texture::new(ColorImage::filled(256, 256, Rgba::rgb(40, 60, 90)));

    for (width, height) in [(320, 240), (800, 600), (1920, 1080)] {
        let mut choreography = Choreography::new(seeded_config());
        let mut state = choreography.initial_state();

        // Mid-burst, the busiest scene
        while !state.is_flared() {
            choreography.step(&mut state);
        }
        choreography.run(&mut state, 500);

        let scene = Scene::build(&state, choreography.config());
        let camera = Camera::new(width, height);
        let mut rasterizer = Rasterizer::new(width, height);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &(width, height),
            |b, _| {
                b.iter(|| {
                    rasterizer.draw(black_box(&scene), &camera, Some(&texture));
                });
            },
        );
    }

    group.finish();
}

fn bench_step(c: &mut Criterion) {
    let mut choreography = Choreography::new(seeded_config());
    let mut state = choreography.initial_state();

    c.bench_function("step_cycle", |b| {
        b.iter(|| {
            choreography.run(black_box(&mut state), 4000);
        });
    });
}

fn bench_histogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("histogram");

    for size in [256, 1024, 2048] {
        let pixels = (0..size * size)
            .map(|i| Rgba::rgb(i as u8, (i / 7) as u8, (i / 13) as u8))
            .collect();
        let Some(image) = ColorImage::from_pixels(size, size, pixels) else {
            continue;
        };
        let gray = GrayscaleImage::from(&image);

        group.bench_with_input(
            BenchmarkId::new("color", format!("{}x{}", size, size)),
            &size,
            |b, _| b.iter(|| ColorHistogram::tabulate(black_box(&image))),
        );
        group.bench_with_input(
            BenchmarkId::new("to_gray", format!("{}x{}", size, size)),
            &size,
            |b, _| b.iter(|| GrayscaleImage::from(black_box(&image))),
        );
        group.bench_with_input(
            BenchmarkId::new("gray_render", format!("{}x{}", size, size)),
            &size,
            |b, _| b.iter(|| GrayHistogram::tabulate(black_box(&gray)).render(DEFAULT_SCALE)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_draw, bench_step, bench_histogram);
criterion_main!(benches);
