//! # Capture Pipeline
//!
//! Owns the most recent frame and the pipeline flags, and turns host events
//! into capture, inference and render actions:
//!
//! - **tick**: reposition the magnifier over the client area (skipped while
//!   beyond the startup monitor)
//! - **capture**: keep the frame, request a repaint
//! - **paint**: stylize when permitted, blit, count the frame; beyond the
//!   startup monitor only the informational message is drawn
//! - **move / size**: reclassify the window against the monitors, track
//!   maximize transitions and the resize bracket
//!
//! The inference adapter, the style source and the render surface are
//! borrowed per paint through [`Collaborators`].

use std::time::Instant;

use tracing::{debug, info};

use super::state::{Effect, PipelineEvent, PipelineFlags, PipelineState, transition};
use crate::capture::{CaptureSource, CapturedFrame, RawImage};
use crate::config::PipelineConfig;
use crate::error::{StylishError, StylishResult};
use crate::host::{DisplayTopology, HostWindow, Magnifier, RenderSurface, WindowHandler};
use crate::inference::{StyleInference, TimingSample};
use crate::metrics::FpsCounter;
use crate::monitor::{BoundaryState, MonitorId, classify, nearest_monitor};
use crate::style::StyleSource;

pub const BEYOND_MONITOR_MESSAGE: &str = concat!(
    "Please return the window \n",
    "within the bounds of the primary monitor.\n\n\n",
    "Sorry!\n\n ¯\\_(ツ)_/¯",
);

/// Services borrowed from the composition root for one paint.
pub struct Collaborators<'a> {
    pub inference: &'a mut dyn StyleInference,
    pub styles: &'a dyn StyleSource,
    pub surface: &'a mut dyn RenderSurface,
}

pub struct CapturePipeline {
    window: Box<dyn HostWindow>,
    topology: Box<dyn DisplayTopology>,
    capture: CaptureSource,
    flags: PipelineFlags,
    startup_monitor: Option<MonitorId>,
    frame: Option<CapturedFrame>,
    frame_stylized: bool,
    fps: FpsCounter,
    last_timing: Option<TimingSample>,
    presented: u64,
    destroyed: bool,
}

impl CapturePipeline {
    /// Initialize the magnifier over the window's client area and start the
    /// capture timer. Fails if either cannot be set up.
    pub fn new(
        config: &PipelineConfig,
        mut window: Box<dyn HostWindow>,
        magnifier: Box<dyn Magnifier>,
        topology: Box<dyn DisplayTopology>,
    ) -> StylishResult<Self> {
        config.validate()?;
        let capture = CaptureSource::new(magnifier, window.client_screen_rect())?;
        window
            .set_timer(config.timer_interval())
            .map_err(|e| e.with_operation("start capture timer"))?;

        Ok(Self {
            window,
            topology,
            capture,
            flags: PipelineFlags {
                inference_enabled: config.inference_enabled,
                ..PipelineFlags::default()
            },
            startup_monitor: None,
            frame: None,
            frame_stylized: false,
            fps: FpsCounter::new(),
            last_timing: None,
            presented: 0,
            destroyed: false,
        })
    }

    fn apply(&mut self, event: PipelineEvent) -> Option<Effect> {
        let step = transition(self.flags, event);
        self.flags = step.flags;
        match step.effect {
            Some(Effect::DisarmCapture) => self.capture.disarm(),
            Some(Effect::RearmCapture) => {
                self.capture.fit(self.window.client_screen_rect().size());
            }
            Some(Effect::ForceRedraw) => self.window.invalidate(),
            None => {}
        }
        step.effect
    }

    /// Live classification against the startup monitor.
    pub fn boundary(&self) -> BoundaryState {
        match self.startup_monitor {
            Some(startup) => classify(
                &self.window.client_screen_rect(),
                startup,
                &self.topology.monitors(),
            ),
            None => BoundaryState::SpansOrExceedsMonitors,
        }
    }

    /// The recorded flag, or a live check if the window moved since the last
    /// notification.
    pub fn is_beyond_monitor(&self) -> bool {
        self.flags.is_beyond_monitor || !self.boundary().is_safe()
    }

    /// Resize the magnifier to the client area, re-arming the capture
    /// callback if a fullscreen transition disarmed it.
    pub fn fit_capture(&mut self) {
        if self.apply(PipelineEvent::GeometrySettled).is_none() {
            self.capture.fit(self.window.client_screen_rect().size());
        }
    }

    /// Record a maximize state change. A real change disarms the capture
    /// callback until the next [`fit_capture`](Self::fit_capture).
    pub fn on_fullscreen_state(&mut self, maximized: bool) {
        self.apply(PipelineEvent::SizeChanged { maximized });
    }

    pub fn set_inference_enabled(&mut self, enabled: bool) {
        self.apply(PipelineEvent::InferenceToggled(enabled));
    }

    /// Paint at an explicit time; `on_paint` uses `Instant::now()`.
    pub fn on_paint_at(&mut self, ctx: &mut Collaborators<'_>, now: Instant) -> StylishResult<()> {
        if self.is_beyond_monitor() {
            ctx.surface.draw_message(BEYOND_MONITOR_MESSAGE);
            return Ok(());
        }
        let Some(frame) = self.frame.as_mut() else {
            return Ok(());
        };

        if self.flags.inference_permitted() && !self.frame_stylized {
            if let Some(style) = ctx.styles.active_image() {
                let stylized = ctx
                    .inference
                    .run(frame, &style)
                    .map_err(|e| e.with_operation("paint"))?;
                if let Some(stylized) = stylized {
                    *frame = stylized.frame;
                    self.frame_stylized = true;
                    self.last_timing = Some(stylized.timing);
                }
            }
        }

        ctx.surface.blit(frame);
        self.fps.frame_presented(now);
        self.presented += 1;
        Ok(())
    }

    pub fn flags(&self) -> PipelineFlags {
        self.flags
    }

    pub fn state(&self) -> PipelineState {
        self.flags.state()
    }

    pub fn startup_monitor(&self) -> Option<MonitorId> {
        self.startup_monitor
    }

    pub fn frame(&self) -> Option<&CapturedFrame> {
        self.frame.as_ref()
    }

    pub fn is_frame_stylized(&self) -> bool {
        self.frame_stylized
    }

    pub fn capture(&self) -> &CaptureSource {
        &self.capture
    }

    pub fn fps(&self) -> f64 {
        self.fps.fps()
    }

    pub fn last_timing(&self) -> Option<TimingSample> {
        self.last_timing
    }

    pub fn presented_frames(&self) -> u64 {
        self.presented
    }
}

impl WindowHandler for CapturePipeline {
    fn on_create(&mut self) -> StylishResult<()> {
        let rect = self.window.client_screen_rect();
        let startup = nearest_monitor(&rect, &self.topology.monitors()).ok_or_else(|| {
            StylishError::capture_init("display topology", "no monitors reported")
        })?;
        self.startup_monitor = Some(startup);
        info!(monitor = startup.0, "startup monitor recorded");
        Ok(())
    }

    fn on_bounds_changing(&mut self) {
        let boundary = self.boundary();
        self.apply(PipelineEvent::BoundaryChecked(boundary));
    }

    fn on_enter_size_move(&mut self) {
        self.apply(PipelineEvent::EnterSizeMove);
    }

    fn on_exit_size_move(&mut self) {
        self.apply(PipelineEvent::ExitSizeMove);
    }

    fn on_size_changed(&mut self, maximized: bool) {
        self.on_fullscreen_state(maximized);
        self.fit_capture();
    }

    fn on_tick(&mut self) {
        if self.is_beyond_monitor() {
            debug!("tick skipped beyond startup monitor");
            return;
        }
        self.capture.reposition(self.window.as_mut());
    }

    fn on_paint(&mut self, ctx: &mut Collaborators<'_>) -> StylishResult<()> {
        self.on_paint_at(ctx, Instant::now())
    }

    fn on_capture(&mut self, raw: RawImage<'_>) -> StylishResult<bool> {
        let beyond = self.is_beyond_monitor();
        let accepted = self.capture.accept(raw, beyond, &mut self.frame)?;
        if accepted {
            self.frame_stylized = false;
            self.window.invalidate();
        }
        Ok(accepted)
    }

    fn on_destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.window.kill_timer();
        self.capture.release();
        self.destroyed = true;
        info!(frames = self.presented, fps = self.fps.fps(), "pipeline destroyed");
    }
}

impl Drop for CapturePipeline {
    fn drop(&mut self) {
        self.on_destroy();
    }
}
