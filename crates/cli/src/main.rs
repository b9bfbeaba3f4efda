use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use snapcrop_core::{
    config::Config,
    geometry::{CropRect, Size},
    image_processing::ImageProcessor,
    init,
    preset::parse_ratio,
    session::{CropSession, SessionEvent, parse_script},
    ui,
};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open an image in the interactive cropper
    Open {
        image: PathBuf,

        /// Initial aspect ratio, e.g. 16:9 or free
        #[arg(short, long)]
        ratio: Option<String>,

        /// Where to save exports (default: timestamped JPEG in the working directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Feed a JSON event script through a crop session and print the result
    Replay {
        /// Script file, or - for stdin
        script: PathBuf,

        /// Image to crop; its size is loaded before the script runs
        #[arg(long, conflicts_with = "size")]
        image: Option<PathBuf>,

        /// Image size to load before the script runs, e.g. 800x600
        #[arg(long)]
        size: Option<Size>,

        /// Viewport size (defaults to the image size)
        #[arg(long)]
        viewport: Option<Size>,

        /// Print the output after every event, one JSON object per line
        #[arg(long, default_value_t = false)]
        trace: bool,

        /// Export the final crop of --image to this path
        #[arg(short, long, requires = "image")]
        output: Option<PathBuf>,
    },

    /// Crop an image without opening a window
    Crop {
        image: PathBuf,

        /// Crop rectangle in image pixels: x1,y1,x2,y2
        #[arg(long)]
        rect: CropRect,

        /// Aspect ratio applied to the rectangle around its center
        #[arg(short, long)]
        ratio: Option<String>,

        /// Preset size applied after the ratio, e.g. 1280x720
        #[arg(short, long)]
        preset: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Setup
    init();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = Config::load().context("Failed to load configuration")?;

    match args.command {
        Command::Open {
            image,
            ratio,
            output,
        } => open(&image, ratio.as_deref(), output, config),
        Command::Replay {
            script,
            image,
            size,
            viewport,
            trace,
            output,
        } => replay(&script, image.as_deref(), size, viewport, trace, output, &config),
        Command::Crop {
            image,
            rect,
            ratio,
            preset,
            output,
        } => crop(&image, rect, ratio.as_deref(), preset, output, &config),
    }
}

/// Applies a `--ratio` flag on top of the loaded configuration.
fn with_ratio(config: Config, ratio: Option<&str>) -> Result<Config> {
    let Some(raw) = ratio else {
        return Ok(config);
    };
    let ratio = parse_ratio(raw).with_context(|| format!("Invalid ratio '{raw}'"))?;
    Ok(Config { default_ratio: ratio, ..config })
}

fn open(path: &Path, ratio: Option<&str>, output: Option<PathBuf>, config: Config) -> Result<()> {
    let config = with_ratio(config, ratio)?;
    let image = ImageProcessor::open(path).context("Failed to load image")?;

    let result = ui::run_cropper(image, config, output)?;
    if result.exported.is_empty() {
        println!("Nothing exported");
    }
    for path in result.exported {
        println!("{}", path.display());
    }
    Ok(())
}

fn read_script(path: &Path) -> Result<Vec<SessionEvent>> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };
    parse_script(&text).context("Script must be a JSON array of events")
}

fn replay(
    script: &Path,
    image_path: Option<&Path>,
    size: Option<Size>,
    viewport: Option<Size>,
    trace: bool,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let events = read_script(script)?;

    let image = image_path
        .map(|p| ImageProcessor::open(p).context("Failed to load image"))
        .transpose()?;
    let bounds = image.as_ref().map(ImageProcessor::bounds).or(size);

    let mut session = CropSession::from_config(config);
    if let Some(bounds) = bounds {
        let view = viewport.unwrap_or(bounds);
        session.handle(SessionEvent::ImageChanged {
            width: bounds.width,
            height: bounds.height,
        });
        session.handle(SessionEvent::ViewportResized {
            width: view.width,
            height: view.height,
        });
    }

    log::debug!("replaying {} events", events.len());
    for event in events {
        let out = session.handle(event);
        if trace {
            println!("{}", serde_json::to_string(&out)?);
        }
    }

    let out = session.output();
    if !trace {
        println!("{}", serde_json::to_string(&out)?);
    }

    if let (Some(image), Some(path)) = (image, output) {
        let Some(rect) = out.rect.filter(|_| out.export_enabled) else {
            bail!("Final selection cannot be exported");
        };
        let written = ImageProcessor::export(&image, &rect, &path, config.jpeg_quality)?;
        eprintln!("Saved {}", written.display());
    }
    Ok(())
}

fn crop(
    path: &Path,
    rect: CropRect,
    ratio: Option<&str>,
    preset: Option<String>,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let image = ImageProcessor::open(path).context("Failed to load image")?;
    let bounds = ImageProcessor::bounds(&image);

    let mut session = CropSession::from_config(config);
    session.handle(SessionEvent::ImageChanged {
        width: bounds.width,
        height: bounds.height,
    });
    session.set_rect(rect);

    if let Some(raw) = ratio {
        session.select_ratio(raw)?;
    }
    let out = match preset {
        Some(preset) => session.select_preset(&preset)?,
        None => session.output(),
    };

    let Some(rect) = out.rect.filter(|_| out.export_enabled) else {
        bail!("Selection is too small to export (both sides must exceed 10 pixels)");
    };

    let output = output.unwrap_or_else(|| ImageProcessor::default_output_path(Path::new(".")));
    let written = ImageProcessor::export(&image, &rect, &output, config.jpeg_quality)
        .context("Failed to export crop")?;
    println!("{}", written.display());
    Ok(())
}
