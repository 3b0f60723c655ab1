use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chroma_flux::{Bitmap, Engine, SimulationParameters};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Animate an image by exchanging color flux between neighboring pixels
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source image. Without it the grid starts from random colors
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Grid size when starting from random colors
    #[arg(long, default_value_t = 256)]
    width: usize,

    #[arg(long, default_value_t = 256)]
    height: usize,

    /// Replace the source image with random colors before the first tick
    #[arg(long)]
    random: bool,

    /// JSON file with simulation parameters
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Number of host ticks to run
    #[arg(short, long, default_value_t = 64)]
    frames: usize,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(short, long, default_value = "out")]
    out: PathBuf,
}

fn load_params(cli: &Cli) -> anyhow::Result<SimulationParameters> {
    match &cli.params {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
        }
        None => Ok(SimulationParameters {
            steps_per_tick: 1.0,
            channel_to_channel: [[0.5, 0.0, 0.0], [0.0, 0.5, 0.0], [0.0, 0.0, 0.5]].into(),
            ..Default::default()
        }),
    }
}

/// Ticks `frames` times, handing each frame to `save`. Stops at the first failed save.
fn render<F>(engine: &mut Engine, frames: usize, mut save: F) -> anyhow::Result<()>
where
    F: FnMut(usize, &Bitmap) -> anyhow::Result<()>,
{
    for f in 1..=frames {
        let frame = engine.tick();
        save(f, frame).with_context(|| format!("saving frame {}", f))?;
        eprint!("\r {} / {}", f, frames);
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let params = load_params(&cli)?;

    let mut engine = match &cli.input {
        Some(path) => {
            let bitmap = image_util::load_bitmap(path)
                .with_context(|| format!("loading {}", path.display()))?;
            let mut engine = match cli.seed {
                Some(seed) => Engine::with_seed(&bitmap, params, seed),
                None => Engine::new(&bitmap, params),
            };
            if cli.random {
                engine.reset_random();
            }
            engine
        }
        None => Engine::random(cli.width, cli.height, params, cli.seed)?,
    };

    fs::create_dir_all(&cli.out)?;

    render(&mut engine, cli.frames, |index, frame| {
        image_util::save_frame(&cli.out, "texture", index, frame)
    })?;
    eprintln!();

    info!(frames = cli.frames, out = %cli.out.display(), "done");

    Ok(())
}
