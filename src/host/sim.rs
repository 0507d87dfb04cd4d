//! # Simulated Host
//!
//! An in-memory desktop: a set of monitors over a virtual-screen BGRA image,
//! one top-level window and its magnifier. The driver (tests, the CLI, the
//! benchmark) holds a [`SimDesktop`] and hands the pipeline the trait objects
//! produced by [`SimDesktop::window`], [`SimDesktop::magnifier`] and
//! [`SimDesktop::topology`]; all of them share one state.
//!
//! Everything runs on one thread, so the shared state is an
//! `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use stylish_scale::Size;

use super::{DisplayTopology, HostWindow, Magnifier, RenderSurface};
use crate::capture::{BYTES_PER_PIXEL, CapturedFrame, ImageHeader};
use crate::error::{StylishError, StylishResult};
use crate::monitor::{MonitorDescriptor, ScreenRect, nearest_monitor};

/// Magnifier state as last set by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MagnifierStatus {
    pub initialized: bool,
    pub armed: bool,
    pub arm_count: u64,
    pub disarm_count: u64,
    pub source: Option<ScreenRect>,
    pub fitted: Option<Size>,
    pub invalidations: u64,
    pub released: bool,
}

#[derive(Debug)]
struct SimState {
    monitors: Vec<MonitorDescriptor>,
    screen: Vec<u8>,
    screen_rect: ScreenRect,
    window: ScreenRect,
    restored: ScreenRect,
    maximized: bool,
    topmost_raises: u64,
    window_invalidations: u64,
    timer: Option<Duration>,
    magnifier: MagnifierStatus,
    fail_magnifier_init: bool,
}

/// Bounding box of all monitors.
fn virtual_screen(monitors: &[MonitorDescriptor]) -> ScreenRect {
    monitors
        .iter()
        .map(|m| m.rect)
        .reduce(|a, b| {
            ScreenRect::new(
                a.left.min(b.left),
                a.top.min(b.top),
                a.right.max(b.right),
                a.bottom.max(b.bottom),
            )
        })
        .unwrap_or_default()
}

/// Deterministic test pattern over `rect`.
fn pattern(rect: ScreenRect) -> Vec<u8> {
    let mut data = Vec::with_capacity(rect.size().bgra_len());
    for y in rect.top..rect.bottom {
        for x in rect.left..rect.right {
            data.extend_from_slice(&[x as u8, y as u8, (x ^ y) as u8, 255]);
        }
    }
    data
}

#[derive(Debug, Clone)]
pub struct SimDesktop {
    state: Rc<RefCell<SimState>>,
}

impl SimDesktop {
    /// Desktop over `monitors` filled with a test pattern, with the window's
    /// client area at `window`.
    pub fn new(monitors: Vec<MonitorDescriptor>, window: ScreenRect) -> Self {
        let screen_rect = virtual_screen(&monitors);
        let screen = pattern(screen_rect);
        Self::with_screen(monitors, screen_rect, screen, window)
    }

    /// Single primary monitor showing `bgra` (tightly packed).
    pub fn from_screenshot(
        bgra: Vec<u8>,
        width: u32,
        height: u32,
        window: ScreenRect,
    ) -> StylishResult<Self> {
        let screen_rect = ScreenRect::from_origin_size(0, 0, width, height);
        if bgra.len() != screen_rect.size().bgra_len() {
            return Err(StylishError::frame_capture(format!(
                "screenshot holds {} bytes, {}x{} needs {}",
                bgra.len(),
                width,
                height,
                screen_rect.size().bgra_len()
            )));
        }
        let monitors = vec![MonitorDescriptor::new(1, screen_rect, true)];
        Ok(Self::with_screen(monitors, screen_rect, bgra, window))
    }

    fn with_screen(
        monitors: Vec<MonitorDescriptor>,
        screen_rect: ScreenRect,
        screen: Vec<u8>,
        window: ScreenRect,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(SimState {
                monitors,
                screen,
                screen_rect,
                window,
                restored: window,
                maximized: false,
                topmost_raises: 0,
                window_invalidations: 0,
                timer: None,
                magnifier: MagnifierStatus::default(),
                fail_magnifier_init: false,
            })),
        }
    }

    pub fn window(&self) -> SimWindow {
        SimWindow {
            state: self.state.clone(),
        }
    }

    pub fn magnifier(&self) -> SimMagnifier {
        SimMagnifier {
            state: self.state.clone(),
        }
    }

    pub fn topology(&self) -> SimTopology {
        SimTopology {
            state: self.state.clone(),
        }
    }

    /// Move the client area's top-left corner, keeping its size.
    pub fn move_window_to(&self, x: i32, y: i32) {
        let mut state = self.state.borrow_mut();
        let r = state.window;
        state.window = r.offset(x - r.left, y - r.top);
    }

    pub fn resize(&self, width: u32, height: u32) {
        let mut state = self.state.borrow_mut();
        let r = state.window;
        state.window = ScreenRect::from_origin_size(r.left, r.top, width, height);
    }

    /// Maximize onto the nearest monitor, or restore the previous rectangle.
    pub fn set_maximized(&self, maximized: bool) {
        let mut state = self.state.borrow_mut();
        if maximized == state.maximized {
            return;
        }
        if maximized {
            state.restored = state.window;
            let target = nearest_monitor(&state.window, &state.monitors)
                .and_then(|id| state.monitors.iter().find(|m| m.id == id))
                .map(|m| m.rect);
            if let Some(rect) = target {
                state.window = rect;
            }
        } else {
            state.window = state.restored;
        }
        state.maximized = maximized;
    }

    pub fn set_monitors(&self, monitors: Vec<MonitorDescriptor>) {
        self.state.borrow_mut().monitors = monitors;
    }

    pub fn fail_magnifier_init(&self, fail: bool) {
        self.state.borrow_mut().fail_magnifier_init = fail;
    }

    /// The buffer the magnifier callback would receive now: the source
    /// rectangle with padded rows, black where it leaves the virtual screen.
    /// `None` while the callback is not installed.
    pub fn grab(&self) -> Option<(Vec<u8>, ImageHeader)> {
        let state = self.state.borrow();
        let mag = &state.magnifier;
        if !mag.armed || mag.released {
            return None;
        }
        let rect = mag.source?;
        if rect.is_empty() {
            return None;
        }

        let row = rect.width() as usize * BYTES_PER_PIXEL;
        let stride = (row + 16 + 15) & !15;
        let header = ImageHeader::new(rect.width(), rect.height(), stride);
        let mut data = vec![0xCD; header.byte_len()];
        for (i, y) in (rect.top..rect.bottom).enumerate() {
            let line = &mut data[i * stride..i * stride + row];
            for px in line.chunks_exact_mut(BYTES_PER_PIXEL) {
                px.copy_from_slice(&[0, 0, 0, 255]);
            }
            let span = ScreenRect::new(rect.left, y, rect.right, y + 1);
            if let Some(visible) = span.intersection(&state.screen_rect) {
                let screen_row = state.screen_rect.width() as usize * BYTES_PER_PIXEL;
                let src_at = (y - state.screen_rect.top) as usize * screen_row
                    + (visible.left - state.screen_rect.left) as usize * BYTES_PER_PIXEL;
                let dst_at = (visible.left - rect.left) as usize * BYTES_PER_PIXEL;
                let len = visible.width() as usize * BYTES_PER_PIXEL;
                line[dst_at..dst_at + len].copy_from_slice(&state.screen[src_at..src_at + len]);
            }
        }
        Some((data, header))
    }

    pub fn window_rect(&self) -> ScreenRect {
        self.state.borrow().window
    }

    pub fn is_maximized(&self) -> bool {
        self.state.borrow().maximized
    }

    pub fn monitors(&self) -> Vec<MonitorDescriptor> {
        self.state.borrow().monitors.clone()
    }

    pub fn magnifier_status(&self) -> MagnifierStatus {
        self.state.borrow().magnifier.clone()
    }

    pub fn timer(&self) -> Option<Duration> {
        self.state.borrow().timer
    }

    pub fn topmost_raises(&self) -> u64 {
        self.state.borrow().topmost_raises
    }

    pub fn window_invalidations(&self) -> u64 {
        self.state.borrow().window_invalidations
    }
}

pub struct SimWindow {
    state: Rc<RefCell<SimState>>,
}

impl HostWindow for SimWindow {
    fn client_screen_rect(&self) -> ScreenRect {
        self.state.borrow().window
    }

    fn raise_topmost(&mut self) {
        self.state.borrow_mut().topmost_raises += 1;
    }

    fn invalidate(&mut self) {
        self.state.borrow_mut().window_invalidations += 1;
    }

    fn set_timer(&mut self, interval: Duration) -> StylishResult<()> {
        if interval.is_zero() {
            return Err(StylishError::capture_init("timer", "zero interval"));
        }
        self.state.borrow_mut().timer = Some(interval);
        Ok(())
    }

    fn kill_timer(&mut self) {
        self.state.borrow_mut().timer = None;
    }
}

pub struct SimMagnifier {
    state: Rc<RefCell<SimState>>,
}

impl Magnifier for SimMagnifier {
    fn initialize(&mut self, client: ScreenRect) -> StylishResult<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_magnifier_init {
            return Err(StylishError::capture_init(
                "magnifier",
                "magnification runtime unavailable",
            ));
        }
        state.magnifier.initialized = true;
        state.magnifier.source = Some(client);
        Ok(())
    }

    fn set_source(&mut self, rect: ScreenRect) {
        self.state.borrow_mut().magnifier.source = Some(rect);
    }

    fn fit(&mut self, size: Size) {
        self.state.borrow_mut().magnifier.fitted = Some(size);
    }

    fn arm_callback(&mut self) {
        let mut state = self.state.borrow_mut();
        state.magnifier.armed = true;
        state.magnifier.arm_count += 1;
    }

    fn disarm_callback(&mut self) {
        let mut state = self.state.borrow_mut();
        state.magnifier.armed = false;
        state.magnifier.disarm_count += 1;
    }

    fn invalidate(&mut self) {
        self.state.borrow_mut().magnifier.invalidations += 1;
    }

    fn release(&mut self) {
        let mut state = self.state.borrow_mut();
        state.magnifier.released = true;
        state.magnifier.armed = false;
    }
}

pub struct SimTopology {
    state: Rc<RefCell<SimState>>,
}

impl DisplayTopology for SimTopology {
    fn monitors(&self) -> Vec<MonitorDescriptor> {
        self.state.borrow().monitors.clone()
    }
}

/// Render surface that remembers what was presented.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub blits: u64,
    pub messages: u64,
    pub last_frame: Option<CapturedFrame>,
    pub last_message: Option<String>,
}

impl RenderSurface for RecordingSurface {
    fn blit(&mut self, frame: &CapturedFrame) {
        self.blits += 1;
        match &mut self.last_frame {
            Some(last) => last.clone_from(frame),
            None => self.last_frame = Some(frame.clone()),
        }
    }

    fn draw_message(&mut self, text: &str) {
        self.messages += 1;
        self.last_message = Some(text.to_string());
    }
}
