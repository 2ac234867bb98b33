use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use rayon::prelude::*;

use dominant::{summarize_path, ColorMatch, DEFAULT_K};

/// File extensions treated as images during directory traversal.
const EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

#[derive(Parser)]
#[command(name = "dominant")]
#[command(about = "Extract and name the dominant colors of images")]
struct Args {
    /// Image file, or directory of images to process
    input: PathBuf,

    /// Number of dominant colors per image
    #[arg(short, default_value_t = DEFAULT_K)]
    k: usize,

    /// Emit one JSON object per image instead of the console report
    #[arg(long)]
    json: bool,
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// All image files under `input`, in sorted filename order.
fn collect_images(input: &Path) -> std::io::Result<Vec<PathBuf>> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(input)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_image(path))
        .collect();
    files.sort();
    Ok(files)
}

fn print_report(path: &Path, matches: &[ColorMatch], json: bool) {
    if json {
        let record = serde_json::json!({
            "image": path.display().to_string(),
            "colors": matches,
        });
        println!("{}", record);
    } else {
        println!("{}", path.display());
        for m in matches {
            println!("  {}", m);
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let files = match collect_images(&args.input) {
        Ok(files) => files,
        Err(err) => {
            eprintln!("cannot read {}: {}", args.input.display(), err);
            return ExitCode::FAILURE;
        }
    };
    if files.is_empty() {
        eprintln!("no images found in {}", args.input.display());
        return ExitCode::FAILURE;
    }

    // Per-image work is independent and CPU-bound. Results stay keyed by
    // path, so completion order on the pool does not matter; unreadable
    // files come back as placeholder records and never abort the batch.
    let results: Vec<(PathBuf, Vec<ColorMatch>)> = files
        .par_iter()
        .map(|path| (path.clone(), summarize_path(path, args.k)))
        .collect();

    for (path, matches) in &results {
        print_report(path, matches, args.json);
    }
    ExitCode::SUCCESS
}
