//! Shared helpers for the integration tests: a simulated two-monitor desktop
//! with a registered pipeline, and instrumented inference doubles.

#![allow(dead_code)]

use stylish::capture::{CapturedFrame, RawImage};
use stylish::config::PipelineConfig;
use stylish::host::sim::{RecordingSurface, SimDesktop};
use stylish::host::{Dispatch, Dispatcher, WindowEvent, WindowHandle};
use stylish::inference::{
    ColorStatsModel, Provider, StyleInference, StyleModel, StyleTransfer, Stylized, Tensor,
};
use stylish::monitor::{MonitorDescriptor, ScreenRect};
use stylish::pipeline::{CapturePipeline, Collaborators};
use stylish::style::{OwnedStyle, StyleDescriptor, StyleSource};
use stylish::{QualityRange, StylishError, StylishResult};

pub const WINDOW: WindowHandle = WindowHandle(1);

/// M1 at the origin, M2 directly to its right.
pub fn two_monitors() -> Vec<MonitorDescriptor> {
    vec![
        MonitorDescriptor::new(1, ScreenRect::new(0, 0, 1920, 1080), true),
        MonitorDescriptor::new(2, ScreenRect::new(1920, 0, 3840, 1080), false),
    ]
}

/// Client area of the test window, on M1.
pub fn window_rect() -> ScreenRect {
    ScreenRect::new(100, 100, 700, 634)
}

pub fn solid_style() -> OwnedStyle {
    OwnedStyle::solid([0.9, 0.2, 0.1], 16, 16)
}

/// A created pipeline on a simulated desktop.
pub struct Harness {
    pub desktop: SimDesktop,
    pub dispatcher: Dispatcher<CapturePipeline>,
    pub surface: RecordingSurface,
}

impl Harness {
    pub fn new(inference: &mut dyn StyleInference, styles: &dyn StyleSource) -> Self {
        Self::with_config(&PipelineConfig::default(), window_rect(), inference, styles)
    }

    pub fn with_config(
        config: &PipelineConfig,
        window: ScreenRect,
        inference: &mut dyn StyleInference,
        styles: &dyn StyleSource,
    ) -> Self {
        let desktop = SimDesktop::new(two_monitors(), window);
        let pipeline = CapturePipeline::new(
            config,
            Box::new(desktop.window()),
            Box::new(desktop.magnifier()),
            Box::new(desktop.topology()),
        )
        .expect("pipeline");
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(WINDOW, pipeline);
        let mut harness = Self {
            desktop,
            dispatcher,
            surface: RecordingSurface::default(),
        };
        harness
            .send(WindowEvent::Create, inference, styles)
            .expect("create");
        harness
    }

    pub fn send(
        &mut self,
        event: WindowEvent,
        inference: &mut dyn StyleInference,
        styles: &dyn StyleSource,
    ) -> StylishResult<Dispatch> {
        let mut ctx = Collaborators {
            inference,
            styles,
            surface: &mut self.surface,
        };
        self.dispatcher.dispatch(WINDOW, event, &mut ctx)
    }

    /// Deliver whatever the magnifier would produce now. False when the
    /// callback is not installed or the pipeline refused the frame.
    pub fn capture(&mut self) -> bool {
        match self.desktop.grab() {
            Some((data, header)) => self
                .dispatcher
                .deliver_capture(WINDOW, RawImage::new(&data, header))
                .expect("capture"),
            None => false,
        }
    }

    /// Tick, capture and paint once.
    pub fn frame(
        &mut self,
        inference: &mut dyn StyleInference,
        styles: &dyn StyleSource,
    ) -> StylishResult<bool> {
        self.send(WindowEvent::Tick, inference, styles)?;
        let captured = self.capture();
        self.send(WindowEvent::Paint, inference, styles)?;
        Ok(captured)
    }

    pub fn pipeline(&self) -> &CapturePipeline {
        self.dispatcher.get(WINDOW).expect("registered")
    }

    pub fn pipeline_mut(&mut self) -> &mut CapturePipeline {
        self.dispatcher.get_mut(WINDOW).expect("registered")
    }
}

pub fn color_transfer() -> StyleTransfer {
    StyleTransfer::new(Box::new(ColorStatsModel::default()))
}

/// Counts `run` calls and forwards to a colour-statistics `StyleTransfer`.
pub struct CountingInference {
    pub inner: StyleTransfer,
    pub runs: usize,
}

impl CountingInference {
    pub fn new() -> Self {
        Self {
            inner: color_transfer(),
            runs: 0,
        }
    }
}

impl StyleInference for CountingInference {
    fn run(
        &mut self,
        frame: &CapturedFrame,
        style: &StyleDescriptor<'_>,
    ) -> StylishResult<Option<Stylized>> {
        self.runs += 1;
        self.inner.run(frame, style)
    }
    fn enable(&mut self) {
        self.inner.enable()
    }
    fn disable(&mut self) {
        self.inner.disable()
    }
    fn is_enabled(&self) -> bool {
        self.inner.is_enabled()
    }
    fn set_quality_factor(&mut self, factor: i32) {
        self.inner.set_quality_factor(factor)
    }
    fn quality_factor(&self) -> i32 {
        self.inner.quality_factor()
    }
    fn quality_range(&self) -> QualityRange {
        self.inner.quality_range()
    }
    fn set_provider(&mut self, provider: Provider) {
        self.inner.set_provider(provider)
    }
    fn provider(&self) -> Provider {
        self.inner.provider()
    }
    fn is_gpu_ready(&self) -> bool {
        self.inner.is_gpu_ready()
    }
}

/// Model that always fails.
pub struct FailingModel;

impl StyleModel for FailingModel {
    fn name(&self) -> &str {
        "failing"
    }
    fn stylize(
        &mut self,
        _content: &Tensor,
        _style: &StyleDescriptor<'_>,
    ) -> StylishResult<Tensor> {
        Err(StylishError::inference("failing", "session lost"))
    }
}
