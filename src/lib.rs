//! # Stylish
//!
//! Core of a real-time style-transfer magnifier: a window that shows a
//! neural-style-transferred view of the screen region behind it.
//!
//! ## Architecture
//!
//! - `monitor`: screen rectangles and the monitor-bounds tracker
//! - `capture`: frame buffers and the magnifier-driven capture source
//! - `inference`: the style inference adapter and its model backends
//! - `style`: style descriptors and the style image cache
//! - `pipeline`: the flag state machine and the capture-inference-render
//!   controller
//! - `metrics`: FPS and inference timing
//! - `host`: seams to the native window system, the event dispatcher and an
//!   in-memory simulated desktop
//! - `config`: startup configuration and persisted user settings
//!
//! Resampling and tensor conversion live in the `stylish_scale` crate.
//!
//! ## Example
//!
//! ```rust
//! use stylish::config::PipelineConfig;
//! use stylish::host::sim::{RecordingSurface, SimDesktop};
//! use stylish::host::{Dispatcher, WindowEvent, WindowHandle};
//! use stylish::inference::{ColorStatsModel, StyleTransfer};
//! use stylish::monitor::{MonitorDescriptor, ScreenRect};
//! use stylish::pipeline::{CapturePipeline, Collaborators};
//! use stylish::style::OwnedStyle;
//! use stylish::capture::RawImage;
//!
//! # fn main() -> Result<(), stylish::StylishError> {
//! let config = PipelineConfig::default();
//! let desktop = SimDesktop::new(
//!     vec![MonitorDescriptor::new(1, ScreenRect::new(0, 0, 1280, 720), true)],
//!     config.initial_rect,
//! );
//!
//! let mut inference = StyleTransfer::new(Box::new(ColorStatsModel::default()));
//! let styles = OwnedStyle::solid([0.8, 0.4, 0.1], 16, 16);
//! let mut surface = RecordingSurface::default();
//! let mut ctx = Collaborators {
//!     inference: &mut inference,
//!     styles: &styles,
//!     surface: &mut surface,
//! };
//!
//! let pipeline = CapturePipeline::new(
//!     &config,
//!     Box::new(desktop.window()),
//!     Box::new(desktop.magnifier()),
//!     Box::new(desktop.topology()),
//! )?;
//! let window = WindowHandle(1);
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register(window, pipeline);
//! dispatcher.dispatch(window, WindowEvent::Create, &mut ctx)?;
//!
//! dispatcher.dispatch(window, WindowEvent::Tick, &mut ctx)?;
//! if let Some((data, header)) = desktop.grab() {
//!     dispatcher.deliver_capture(window, RawImage::new(&data, header))?;
//! }
//! dispatcher.dispatch(window, WindowEvent::Paint, &mut ctx)?;
//! dispatcher.dispatch(window, WindowEvent::Destroy, &mut ctx)?;
//!
//! assert_eq!(surface.blits, 1);
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod host;
pub mod inference;
pub mod metrics;
pub mod monitor;
pub mod pipeline;
pub mod style;

/// Re-export error types for convenience
pub use error::{HasRecoverySuggestion, HasSeverity, StylishError, StylishResult};

pub use stylish_scale::{QualityPreset, QualityRange, Size};
