//! Routes host window events to the handler registered for a window handle.

use std::collections::HashMap;

use tracing::debug;

use crate::capture::RawImage;
use crate::error::StylishResult;
use crate::pipeline::Collaborators;

/// Native window handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

/// Lifecycle and input notifications from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Create,
    Destroy,
    Move,
    Sizing,
    EnterSizeMove,
    ExitSizeMove,
    Size { maximized: bool },
    Paint,
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    /// The window was destroyed; the message loop should exit
    Quit,
    /// No handler registered for the handle
    Unhandled,
}

/// What a window needs to react to host events.
pub trait WindowHandler {
    fn on_create(&mut self) -> StylishResult<()>;
    fn on_bounds_changing(&mut self);
    fn on_enter_size_move(&mut self);
    fn on_exit_size_move(&mut self);
    fn on_size_changed(&mut self, maximized: bool);
    fn on_tick(&mut self);
    fn on_paint(&mut self, ctx: &mut Collaborators<'_>) -> StylishResult<()>;
    /// A capture arrived from the magnifier callback. Returns whether it was
    /// kept.
    fn on_capture(&mut self, raw: RawImage<'_>) -> StylishResult<bool>;
    fn on_destroy(&mut self);
}

pub struct Dispatcher<H> {
    handlers: HashMap<WindowHandle, H>,
}

impl<H> Default for Dispatcher<H> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<H: WindowHandler> Dispatcher<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `handle`, returning the one it replaces.
    pub fn register(&mut self, handle: WindowHandle, handler: H) -> Option<H> {
        self.handlers.insert(handle, handler)
    }

    pub fn get(&self, handle: WindowHandle) -> Option<&H> {
        self.handlers.get(&handle)
    }

    pub fn get_mut(&mut self, handle: WindowHandle) -> Option<&mut H> {
        self.handlers.get_mut(&handle)
    }

    pub fn remove(&mut self, handle: WindowHandle) -> Option<H> {
        self.handlers.remove(&handle)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn dispatch(
        &mut self,
        handle: WindowHandle,
        event: WindowEvent,
        ctx: &mut Collaborators<'_>,
    ) -> StylishResult<Dispatch> {
        let Some(handler) = self.handlers.get_mut(&handle) else {
            debug!(?handle, ?event, "no handler for window");
            return Ok(Dispatch::Unhandled);
        };
        match event {
            WindowEvent::Create => handler.on_create()?,
            WindowEvent::Destroy => {
                handler.on_destroy();
                self.handlers.remove(&handle);
                return Ok(Dispatch::Quit);
            }
            WindowEvent::Move | WindowEvent::Sizing => handler.on_bounds_changing(),
            WindowEvent::EnterSizeMove => handler.on_enter_size_move(),
            WindowEvent::ExitSizeMove => handler.on_exit_size_move(),
            WindowEvent::Size { maximized } => handler.on_size_changed(maximized),
            WindowEvent::Paint => handler.on_paint(ctx)?,
            WindowEvent::Tick => handler.on_tick(),
        }
        Ok(Dispatch::Handled)
    }

    /// Forward a magnifier capture to the handler for `handle`.
    pub fn deliver_capture(
        &mut self,
        handle: WindowHandle,
        raw: RawImage<'_>,
    ) -> StylishResult<bool> {
        match self.handlers.get_mut(&handle) {
            Some(handler) => handler.on_capture(raw),
            None => Ok(false),
        }
    }
}
