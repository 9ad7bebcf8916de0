use clap::Parser;
use image::open;
use pixelmorph::animator::{AnimatorState, ParticleAnimator};
use pixelmorph::correspondence::build_particles;
use pixelmorph::photo::Photo;
use pixelmorph::pixel_features::extract_features;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments structure.
#[derive(Parser, Debug)]
#[command(author, version, about = "Rearranges the pixels of a source image into a target image and writes the animation frames.")]
struct Args {
    /// Source image filename (supplies the colors)
    #[arg()]
    source: String,

    /// Target image filename (supplies the final arrangement)
    #[arg()]
    target: String,

    /// Maximum processing width; larger images are scaled down to fit
    #[arg(long, default_value_t = 800)]
    max_width: usize,

    /// Maximum processing height; larger images are scaled down to fit
    #[arg(long, default_value_t = 800)]
    max_height: usize,

    /// Animation duration in milliseconds
    #[arg(long, default_value_t = 3000.0)]
    duration_ms: f64,

    /// Frames per second of the rendered sequence
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Base filename for frame outputs (e.g. "frame" -> "frame_0001.png", ...)
    #[arg(long, default_value = "frame")]
    base_filename: String,

    /// Directory to write the frames into
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if args.fps == 0 {
        eprintln!("Err: --fps must be greater than 0");
        std::process::exit(1);
    }

    // Load and scale both images to the same bounding box. The two grids do
    // not have to end up with identical dimensions; the matcher truncates to
    // the smaller side.
    let source = read_photo(&args.source).get_scaled_to_fit(args.max_width, args.max_height);
    let target = read_photo(&args.target).get_scaled_to_fit(args.max_width, args.max_height);
    info!(
        source = %format_args!("{}x{}", source.width, source.height),
        target = %format_args!("{}x{}", target.width, target.height),
        "images loaded"
    );

    let source_features = match extract_features(&source) {
        Ok(features) => features,
        Err(err) => {
            eprintln!("Err: {err}");
            std::process::exit(1);
        }
    };
    let target_features = match extract_features(&target) {
        Ok(features) => features,
        Err(err) => {
            eprintln!("Err: {err}");
            std::process::exit(1);
        }
    };

    let particles = build_particles(&source_features, &target_features);
    info!(particles = particles.len(), "correspondence built");

    // The canvas takes the target grid's dimensions so the final frame shows
    // the target arrangement at full size.
    let mut animator = ParticleAnimator::new(args.duration_ms);
    animator.set_particles(particles, target.width, target.height);
    animator.start(0.0, None);

    // Drive the animator with synthetic timestamps at the requested rate; a
    // real-time host would pass wall-clock milliseconds instead.
    let frame_interval = 1000.0 / args.fps as f64;
    let mut frame_number = 0u32;
    loop {
        let now_ms = frame_number as f64 * frame_interval;
        let state = animator.advance_frame(now_ms);
        frame_number += 1;

        let filename = args
            .output_dir
            .join(format!("{}_{:04}.png", args.base_filename, frame_number));
        save_frame(&animator, &filename);

        if state == AnimatorState::Completed {
            break;
        }
    }

    info!(frames = frame_number, "done");
}

fn save_frame(animator: &ParticleAnimator, filename: &Path) {
    let (width, height) = animator.frame_dimensions();
    let img = image::RgbaImage::from_raw(width as u32, height as u32, animator.frame().to_vec())
        .expect("frame buffer length matches its dimensions");
    if let Err(err) = img.save(filename) {
        eprintln!("Err: could not write {}: {err}", filename.display());
        std::process::exit(1);
    }
    info!(frame = %filename.display(), "frame written");
}

fn read_photo(filename: &str) -> Photo {
    info!(file = filename, "reading image");
    let img = match open(filename) {
        Ok(img) => img,
        Err(err) => {
            eprintln!("Err: could not load {filename}: {err}");
            std::process::exit(1);
        }
    };
    let width = img.width() as usize;
    let height = img.height() as usize;
    match Photo::from_raw(img.to_rgba8().into_raw(), width, height) {
        Ok(photo) => photo,
        Err(err) => {
            eprintln!("Err: {err}");
            std::process::exit(1);
        }
    }
}
