use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use image::ImageFormat;

use retro_draw::canvas::{
    palette, select_rasterizer, AttributeBuffer, Pen, PreviewMode, TerminalCaps, PALETTE_COUNT,
    PALETTE_SIZE,
};
use retro_draw::config::{self, Config};
use retro_draw::state::{load_buffer, save_buffer};

#[derive(Debug, Parser)]
#[command(name = "retro-draw", version, about = "Draw on an 8-bit attribute-clash canvas")]
struct Cli {
    /// Log at INFO level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log at DEBUG level
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (overrides the default location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args, Clone, Copy)]
struct PenArgs {
    /// Ink color index (0-7)
    #[arg(long)]
    ink: Option<u8>,

    /// Paper color index (0-7)
    #[arg(long)]
    paper: Option<u8>,

    /// Use the bright palette
    #[arg(long)]
    bright: bool,

    /// Use the normal palette even if the config defaults to bright
    #[arg(long, conflicts_with = "bright")]
    normal: bool,
}

impl PenArgs {
    fn resolve(&self, config: &Config) -> Pen {
        let base = config.pen();
        let palette = if self.bright {
            1
        } else if self.normal {
            0
        } else {
            base.palette
        };
        Pen::new(self.ink.unwrap_or(base.ink), self.paper.unwrap_or(base.paper), palette)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new document cleared to the pen colors
    New {
        doc: PathBuf,
        #[command(flatten)]
        pen: PenArgs,
    },
    /// Clear an existing document
    Clear {
        doc: PathBuf,
        #[command(flatten)]
        pen: PenArgs,
    },
    /// Set one ink pixel
    Pixel {
        doc: PathBuf,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        #[command(flatten)]
        pen: PenArgs,
    },
    /// Erase one pixel back to paper
    Erase {
        doc: PathBuf,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        #[command(flatten)]
        pen: PenArgs,
    },
    /// Recolor the attribute cell covering a pixel
    Attr {
        doc: PathBuf,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        #[command(flatten)]
        pen: PenArgs,
    },
    /// Draw a line of ink pixels
    Line {
        doc: PathBuf,
        #[arg(allow_negative_numbers = true)]
        x1: i32,
        #[arg(allow_negative_numbers = true)]
        y1: i32,
        #[arg(allow_negative_numbers = true)]
        x2: i32,
        #[arg(allow_negative_numbers = true)]
        y2: i32,
        #[command(flatten)]
        pen: PenArgs,
    },
    /// Write the composite image
    Render {
        doc: PathBuf,
        out: PathBuf,
        /// Image format (png, bmp); defaults to the extension of OUT
        #[arg(long)]
        format: Option<String>,
    },
    /// Show the composite in the terminal
    Preview {
        doc: PathBuf,
        /// auto, halfblock, kitty or none
        #[arg(long)]
        mode: Option<PreviewMode>,
    },
    /// List both palettes
    Palette,
}

fn init_logging(cli: &Cli) {
    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn load_settings(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    config.context("Failed to load configuration")
}

/// Load a document, apply `edit`, save it back
fn edit_document(doc: &Path, edit: impl FnOnce(&mut AttributeBuffer) -> retro_draw::Result<()>) -> Result<()> {
    let mut buffer = load_buffer(doc).with_context(|| format!("Failed to load {}", doc.display()))?;
    edit(&mut buffer).context("Drawing operation rejected")?;
    save_buffer(doc, &buffer).with_context(|| format!("Failed to save {}", doc.display()))?;
    Ok(())
}

fn render(doc: &Path, out: &Path, format: Option<&str>, config: &Config) -> Result<()> {
    let mut buffer = load_buffer(doc).with_context(|| format!("Failed to load {}", doc.display()))?;

    let format = match format {
        Some(ext) => ImageFormat::from_extension(ext),
        None => ImageFormat::from_path(out)
            .ok()
            .or_else(|| ImageFormat::from_extension(&config.image_format)),
    }
    .context("Unknown image format")?;

    buffer
        .save_image_as(out, format)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    Ok(())
}

fn preview(doc: &Path, mode: Option<PreviewMode>, config: &Config) -> Result<()> {
    let mut buffer = load_buffer(doc).with_context(|| format!("Failed to load {}", doc.display()))?;

    let mut caps = TerminalCaps::detect();
    if let Some(width) = config.preview_width {
        caps.cols = caps.cols.min(width);
    }

    let mode = mode.unwrap_or(config.preview);
    let Some(rasterizer) = select_rasterizer(mode, &caps) else {
        tracing::warn!("No preview available for mode {:?} on this terminal", mode);
        return Ok(());
    };
    tracing::debug!("Previewing with {} rasterizer", rasterizer.name());

    let output = rasterizer.rasterize(buffer.composite(), &caps)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(output.to_ansi().as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn list_palette() -> Result<()> {
    let mut stdout = io::stdout().lock();
    for selector in 0..PALETTE_COUNT {
        let label = if selector == 0 { "normal" } else { "bright" };
        writeln!(stdout, "{label}:")?;
        for index in 0..PALETTE_SIZE {
            let color = palette::color_of(index, selector)?;
            let name = palette::name_of(index, selector)?;
            let swatch = nu_ansi_term::Style::new().on(color.into()).paint("    ");
            writeln!(stdout, "  {index} {swatch} {color} {name}")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    tracing::debug!("retro-draw version {}", env!("CARGO_PKG_VERSION"));

    let config = load_settings(&cli)?;

    match cli.command {
        Command::New { doc, pen } => {
            let buffer = AttributeBuffer::with_pen(pen.resolve(&config)).context("Invalid pen")?;
            save_buffer(&doc, &buffer).with_context(|| format!("Failed to save {}", doc.display()))?;
            tracing::info!("Created {}", doc.display());
        }
        Command::Clear { doc, pen } => {
            edit_document(&doc, |b| b.clear(pen.resolve(&config)))?;
        }
        Command::Pixel { doc, x, y, pen } => {
            edit_document(&doc, |b| b.set_pixel(x, y, pen.resolve(&config)))?;
        }
        Command::Erase { doc, x, y, pen } => {
            edit_document(&doc, |b| b.erase_pixel(x, y, pen.resolve(&config)))?;
        }
        Command::Attr { doc, x, y, pen } => {
            edit_document(&doc, |b| b.set_attr(x, y, pen.resolve(&config)))?;
        }
        Command::Line {
            doc,
            x1,
            y1,
            x2,
            y2,
            pen,
        } => {
            edit_document(&doc, |b| b.draw_line(x1, y1, x2, y2, pen.resolve(&config)))?;
        }
        Command::Render { doc, out, format } => render(&doc, &out, format.as_deref(), &config)?,
        Command::Preview { doc, mode } => preview(&doc, mode, &config)?,
        Command::Palette => list_palette()?,
    }

    Ok(())
}
