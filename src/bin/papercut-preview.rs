use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use papercut::preview::PreviewSheet;
use papercut::types::generate_session_seed;
use papercut::ui::{PixelSurface, TextRenderer};

#[derive(Parser)]
#[command(name = "papercut-preview", version, about = "Render a sheet of paper style samples")]
struct Cli {
    /// Seed for the sample looks; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Apply the regenerate action this many times before rendering
    #[arg(long, default_value_t = 0)]
    regenerate: u32,
    #[arg(long, default_value = "preview.png")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    papercut::init_logging();
    let cli = Cli::parse();

    let seed = cli.seed.unwrap_or_else(generate_session_seed);
    let mut sheet = PreviewSheet::new(seed);
    for _ in 0..cli.regenerate {
        sheet.regenerate();
    }

    let (width, height) = PreviewSheet::size();
    let mut surface =
        PixelSurface::with_text(width.ceil() as usize, height.ceil() as usize, TextRenderer::new());
    sheet.render(&mut surface);
    surface
        .save_png(&cli.out)
        .with_context(|| format!("Failed to write {}", cli.out.display()))?;

    info!(
        "Wrote {} (seed {}, generation {})",
        cli.out.display(),
        seed,
        sheet.generation()
    );
    Ok(())
}
