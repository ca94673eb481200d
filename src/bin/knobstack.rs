use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "knobstack", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a knob style at one reading to a PNG.
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input style JSON.
    #[arg(long)]
    style: PathBuf,

    /// Percentage reading to render (nominally 0-100, unclamped).
    #[arg(long, default_value_t = 50.0)]
    percentage: f64,

    /// Output size in pixels (square surface).
    #[arg(long, default_value_t = 256)]
    size: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Preview(args) => cmd_preview(args),
    }
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let f = File::open(&args.style)
        .with_context(|| format!("open style '{}'", args.style.display()))?;
    let style: knobstack::KnobStyle =
        serde_json::from_reader(BufReader::new(f)).context("parse style JSON")?;

    let mut surface = knobstack::Surface::new(args.size, args.size)?;
    let renderer = knobstack::KnobRenderer::create(&surface, &style)?;
    renderer.draw(&mut surface, args.percentage)?;

    let rgba = unpremultiply_rgba8(surface.data());
    let img = image::RgbaImage::from_raw(args.size, args.size, rgba)
        .context("assemble output image")?;
    img.save(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    renderer.destroy();
    Ok(())
}

/// PNG expects straight alpha; the surface holds premultiplied pixels.
fn unpremultiply_rgba8(premul: &[u8]) -> Vec<u8> {
    let mut out = premul.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in px[..3].iter_mut() {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}
