//! # Host Module
//!
//! Seams between the pipeline and the native windowing system: the host
//! window, the magnifier control that produces captures, the display topology
//! and the surface frames are painted to. The dispatcher routes host events to
//! the handler registered for a window handle.

use std::time::Duration;

use stylish_scale::Size;

use crate::capture::CapturedFrame;
use crate::error::StylishResult;
use crate::monitor::{MonitorDescriptor, ScreenRect};

pub mod dispatch;
pub mod sim;

pub use dispatch::{Dispatch, Dispatcher, WindowEvent, WindowHandle, WindowHandler};

/// The top-level window hosting the magnifier.
pub trait HostWindow {
    /// Client area in virtual-screen coordinates.
    fn client_screen_rect(&self) -> ScreenRect;
    /// Re-assert top-most z-order.
    fn raise_topmost(&mut self);
    /// Request a repaint.
    fn invalidate(&mut self);
    fn set_timer(&mut self, interval: Duration) -> StylishResult<()>;
    fn kill_timer(&mut self);
}

/// The child control that samples the screen behind the window.
pub trait Magnifier {
    fn initialize(&mut self, client: ScreenRect) -> StylishResult<()>;
    /// Screen region to sample.
    fn set_source(&mut self, rect: ScreenRect);
    /// Resize the control to the client area.
    fn fit(&mut self, size: Size);
    /// Install the scaling callback that delivers captures.
    fn arm_callback(&mut self);
    fn disarm_callback(&mut self);
    /// Ask the control to sample again.
    fn invalidate(&mut self);
    fn release(&mut self);
}

/// Live monitor enumeration.
pub trait DisplayTopology {
    fn monitors(&self) -> Vec<MonitorDescriptor>;
}

/// Where presented frames and messages end up.
pub trait RenderSurface {
    fn blit(&mut self, frame: &CapturedFrame);
    fn draw_message(&mut self, text: &str);
}
