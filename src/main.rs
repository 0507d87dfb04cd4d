use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::Parser;
use stylish::capture::{CapturedFrame, RawImage};
use stylish::config::{PipelineConfig, Settings};
use stylish::host::sim::{RecordingSurface, SimDesktop};
use stylish::host::{Dispatcher, WindowEvent, WindowHandle};
use stylish::inference::{ColorStatsModel, Provider, StyleInference, StyleTransfer};
use stylish::monitor::{MonitorDescriptor, ScreenRect};
use stylish::pipeline::{CapturePipeline, Collaborators};
use stylish::style::StyleImageCache;
use stylish::{QualityPreset, StylishResult};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Replay the style-transfer magnifier on a simulated desktop:
/// tick → capture → paint, with the colour-statistics model standing in for
/// the neural engine.
#[derive(Parser, Debug)]
#[command(name = "stylish")]
#[command(about = "Run the style-transfer capture pipeline over a screenshot")]
struct Args {
    /// PNG/JPEG used as the desktop; a test pattern if omitted
    #[arg(short, long)]
    screen: Option<PathBuf>,

    /// Folder of style images (overrides the config)
    #[arg(long)]
    styles: Option<PathBuf>,

    /// Style image to activate
    #[arg(long)]
    style_image: Option<PathBuf>,

    /// Number of tick/capture/paint iterations
    #[arg(short = 'n', long, default_value_t = 120)]
    frames: u64,

    /// Quality/performance preset
    #[arg(short, long, value_enum)]
    quality: Option<QualityPreset>,

    #[arg(short, long, value_enum)]
    provider: Option<Provider>,

    /// JSON pipeline configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where the last presented frame is written
    #[arg(short, long, default_value = "stylized.png")]
    output: PathBuf,

    /// Maximize the window before this iteration
    #[arg(long)]
    maximize_at: Option<u64>,

    /// Move the window's top-left corner to X,Y before iteration --move-at
    #[arg(long, value_parser = parse_point)]
    move_to: Option<(i32, i32)>,

    #[arg(long, default_value_t = 0)]
    move_at: u64,

    /// Show raw captures only
    #[arg(long)]
    disable_inference: bool,

    /// Sleep one timer interval between iterations
    #[arg(long)]
    realtime: bool,
}

fn parse_point(s: &str) -> Result<(i32, i32)> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("expected X,Y, got {}", s))?;
    Ok((x.trim().parse()?, y.trim().parse()?))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(folder) = &args.styles {
        config.style_folder = folder.clone();
    }
    config.validate()?;

    let mut inference = StyleTransfer::new(Box::new(ColorStatsModel::default()))
        .with_range(config.quality_range())
        .with_metrics();
    inference.set_quality_factor(config.quality);
    inference.set_provider(config.provider);

    let mut styles = StyleImageCache::new(config.style_size);
    if config.style_folder.is_dir() {
        styles.load(&config.style_folder)?;
    } else {
        warn!(
            folder = %config.style_folder.display(),
            "style folder not found, showing raw capture"
        );
    }

    Settings::load(&config.settings_path)?.apply(&mut inference, &mut styles);
    if let Some(preset) = args.quality {
        inference.set_quality_factor(preset.to_factor(inference.quality_range()));
    }
    if let Some(provider) = args.provider {
        inference.set_provider(provider);
    }
    if let Some(path) = &args.style_image {
        if !styles.set_active_image(path) {
            warn!(path = %path.display(), "style image not in the style folder");
        }
    }
    if args.disable_inference {
        inference.disable();
    }

    let desktop = match &args.screen {
        Some(path) => {
            let rgba = image::open(path)?.to_rgba8();
            let (width, height) = rgba.dimensions();
            SimDesktop::from_screenshot(
                swap_red_blue(rgba.into_raw()),
                width,
                height,
                config.initial_rect,
            )?
        }
        None => SimDesktop::new(
            vec![MonitorDescriptor::new(1, ScreenRect::new(0, 0, 1920, 1080), true)],
            config.initial_rect,
        ),
    };

    let mut surface = RecordingSurface::default();
    if let Err(e) = replay(&args, &config, &desktop, &mut inference, &styles, &mut surface) {
        error!(error = %e, "pipeline failed");
        return Err(e.into());
    }

    if let Some(perf) = inference.metrics() {
        let avg = perf.averages();
        info!(
            samples = perf.sample_count(),
            total_ms = avg.total,
            pre_ms = avg.pre,
            model_ms = avg.model,
            post_ms = avg.post,
            startup_ms = ?perf.startup_ms(),
            "inference timing"
        );
    }

    match &surface.last_frame {
        Some(frame) => {
            write_png(frame, &args.output)?;
            info!(path = %args.output.display(), "last frame written");
        }
        None => warn!(messages = surface.messages, "no frame was presented"),
    }

    Settings::capture(&inference, &styles).save(&config.settings_path)?;
    Ok(())
}

fn replay(
    args: &Args,
    config: &PipelineConfig,
    desktop: &SimDesktop,
    inference: &mut StyleTransfer,
    styles: &StyleImageCache,
    surface: &mut RecordingSurface,
) -> StylishResult<()> {
    let pipeline = CapturePipeline::new(
        config,
        Box::new(desktop.window()),
        Box::new(desktop.magnifier()),
        Box::new(desktop.topology()),
    )?;
    let window = WindowHandle(1);
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(window, pipeline);

    let mut ctx = Collaborators {
        inference,
        styles,
        surface,
    };
    dispatcher.dispatch(window, WindowEvent::Create, &mut ctx)?;

    for i in 0..args.frames {
        if args.maximize_at == Some(i) {
            desktop.set_maximized(true);
            dispatcher.dispatch(window, WindowEvent::Size { maximized: true }, &mut ctx)?;
        }
        if let Some((x, y)) = args.move_to.filter(|_| args.move_at == i) {
            desktop.move_window_to(x, y);
            dispatcher.dispatch(window, WindowEvent::Move, &mut ctx)?;
        }

        dispatcher.dispatch(window, WindowEvent::Tick, &mut ctx)?;
        if let Some((data, header)) = desktop.grab() {
            dispatcher.deliver_capture(window, RawImage::new(&data, header))?;
        }
        dispatcher.dispatch(window, WindowEvent::Paint, &mut ctx)?;

        if args.realtime {
            std::thread::sleep(config.timer_interval().max(Duration::from_millis(1)));
        }
    }

    if let Some(pipeline) = dispatcher.get(window) {
        info!(
            frames = pipeline.presented_frames(),
            fps = pipeline.fps(),
            state = ?pipeline.state(),
            "replay finished"
        );
    }
    dispatcher.dispatch(window, WindowEvent::Destroy, &mut ctx)?;
    Ok(())
}

/// RGBA ⇄ BGRA, in place.
fn swap_red_blue(mut pixels: Vec<u8>) -> Vec<u8> {
    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
    pixels
}

fn write_png(frame: &CapturedFrame, path: &Path) -> Result<()> {
    let rgba = swap_red_blue(frame.to_packed());
    let image = image::RgbaImage::from_raw(frame.width(), frame.height(), rgba)
        .ok_or_else(|| {
            anyhow!("frame buffer does not match {}x{}", frame.width(), frame.height())
        })?;
    image.save(path)?;
    Ok(())
}
