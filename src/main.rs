//! Flare CLI - Render the firework animation and inspect images.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use flare::{
    animation::{FlareAnimation, FrameRecorder, HeadlessLoop, RecorderConfig},
    buffer::{self, ColorImage, DEFAULT_SCALE, GrayscaleImage},
    schema::FlareConfig,
};

const DEFAULT_FRAMES: u64 = 60;

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("--example") => print_example_config(),
        Some("render") if args.len() >= 3 => render(&args[2..]),
        Some("gray") if args.len() >= 4 => gray(&args[2], &args[3]),
        Some("histogram") if args.len() >= 4 => histogram(&args[2..]),
        _ => {
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [args]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  render <out_dir> [frames] [config.json]");
    eprintln!("      Run one rise-and-burst cycle, writing `frames` PNGs (default: {DEFAULT_FRAMES})");
    eprintln!("  gray <input> <output.png>");
    eprintln!("      Convert an image to grayscale");
    eprintln!("  histogram <input> <output.png> [scale] [--gray]");
    eprintln!("      Render the channel histogram of an image (default scale: {DEFAULT_SCALE})");
    eprintln!("  --example");
    eprintln!("      Print the default configuration as JSON");
}

fn render(args: &[String]) {
    let out_dir = PathBuf::from(&args[0]);
    let frames: u64 = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FRAMES)
        .max(1);
    let config = match args.get(2) {
        Some(path) => load_config(Path::new(path)),
        None => FlareConfig::default(),
    };

    let ticks = config.rise_ticks() + config.flare_ticks();
    let (width, height) = (config.view.width, config.view.height);

    println!("Flare Animation");
    println!("===============");
    println!("Viewport: {}x{}", width, height);
    println!(
        "Emitters: {} ({} points per burst)",
        config.emitters, config.flare_points
    );
    println!(
        "Ticks: {} ({} rising, {} flared)",
        ticks,
        config.rise_ticks(),
        config.flare_ticks()
    );
    println!("Frames: {} -> {}", frames, out_dir.display());
    println!();

    let mut animation = FlareAnimation::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    let recorder_config = RecorderConfig {
        frame_skip: (ticks / frames).clamp(1, u32::MAX as u64) as u32,
        max_frames: frames,
    };
    let mut recorder = FrameRecorder::new(&out_dir, recorder_config).unwrap_or_else(|e| fail(e));

    let start = Instant::now();
    let stats = HeadlessLoop::new(width, height, ticks)
        .run(&mut animation, &mut recorder)
        .unwrap_or_else(|e| fail(e));
    let elapsed = start.elapsed();

    println!("Done: {}", stats);
    println!("Recording: {}", recorder.finalize());
    println!(
        "Time: {:.2}s ({:.1} ticks/s)",
        elapsed.as_secs_f32(),
        stats.ticks as f32 / elapsed.as_secs_f32()
    );
}

fn gray(input: &str, output: &str) {
    let color = ColorImage::open(input).unwrap_or_else(|e| fail(e));
    let gray = GrayscaleImage::from(&color);
    gray.save(output).unwrap_or_else(|e| fail(e));

    println!(
        "Wrote {}x{} grayscale image to {}",
        gray.width(),
        gray.height(),
        output
    );
}

fn histogram(args: &[String]) {
    let (input, output) = (&args[0], &args[1]);
    let as_gray = args.iter().any(|a| a == "--gray");
    let scale = args[2..]
        .iter()
        .filter(|a| *a != "--gray")
        .find_map(|a| a.parse::<f32>().ok())
        .unwrap_or(DEFAULT_SCALE);

    let color = ColorImage::open(input).unwrap_or_else(|e| fail(e));
    let result = if as_gray {
        GrayscaleImage::from(&color).save_histogram(output, scale)
    } else {
        color.save_histogram(output, scale)
    };
    result.unwrap_or_else(|e| fail(e));

    println!(
        "Wrote {} histogram of {} (scale {}) to {}",
        if as_gray { "grayscale" } else { "color" },
        input,
        scale,
        output
    );
}

fn load_config(path: &Path) -> FlareConfig {
    let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    })
}

fn fail(e: buffer::BufferError) -> ! {
    log::error!("{}", e);
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

fn print_example_config() {
    let config = FlareConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            std::process::exit(1);
        }
    }
}
