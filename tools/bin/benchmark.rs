//! Per-quality-factor timing of the inference chain on a synthetic frame:
//! area downscale, colour-statistics model, cubic upscale.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use stylish::capture::CapturedFrame;
use stylish::inference::{ColorStatsModel, StyleInference, StyleTransfer};
use stylish::metrics::PerfChannel;
use stylish::style::OwnedStyle;
use stylish_scale::{QualityRange, Resampler, Size, build_plan};

#[derive(Parser, Debug)]
#[command(name = "benchmark")]
#[command(about = "Time the resample and inference stages per quality factor")]
struct Args {
    #[arg(long, default_value_t = 1920)]
    width: u32,

    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Iterations per quality factor
    #[arg(short, long, default_value_t = 30)]
    frames: u32,
}

fn synthetic_frame(width: u32, height: u32) -> Result<CapturedFrame> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[x as u8, y as u8, (x ^ y) as u8, 255]);
        }
    }
    Ok(CapturedFrame::from_bgra(data, width, height)?)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let frame = synthetic_frame(args.width, args.height)?;
    let style = OwnedStyle::solid([0.8, 0.3, 0.1], 256, 256);
    let range = QualityRange::default();

    println!("Style Transfer Pipeline Benchmark");
    println!("═══════════════════════════════════");
    println!(
        "Benchmarking: {}x{} capture, {} frames per quality factor",
        args.width, args.height, args.frames
    );
    println!();

    for quality in range.min..=range.max {
        let plan = build_plan(frame.size(), range, quality);

        let mut resampler = Resampler::new();
        let start = Instant::now();
        for _ in 0..args.frames {
            resampler.scale_down(frame.data(), plan.input, None, plan.model)?;
        }
        let down_ms = ms_per_frame(start, args.frames);

        let small = resampler.scale_down(frame.data(), plan.input, None, plan.model)?;
        let start = Instant::now();
        for _ in 0..args.frames {
            resampler.scale_up(&small, plan.model, Size::new(args.width, args.height))?;
        }
        let up_ms = ms_per_frame(start, args.frames);

        let mut transfer = StyleTransfer::new(Box::new(ColorStatsModel::default())).with_metrics();
        transfer.set_quality_factor(quality);
        for _ in 0..args.frames {
            transfer.run(&frame, &style.descriptor())?;
        }

        println!(
            "quality {} (factor {:.3}, model {}x{}):",
            quality, plan.factor, plan.model.w, plan.model.h
        );
        println!("  downscale: {:.2} ms   upscale: {:.2} ms", down_ms, up_ms);
        if let Some(perf) = transfer.metrics() {
            println!(
                "  run total: {:.2} ms (pre {:.2}, model {:.2}, post {:.2})",
                perf.average(PerfChannel::Total),
                perf.average(PerfChannel::Pre),
                perf.average(PerfChannel::Model),
                perf.average(PerfChannel::Post)
            );
        }
    }
    Ok(())
}

fn ms_per_frame(start: Instant, frames: u32) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0 / frames.max(1) as f64
}
