//! Capture source: keeps the magnifier sampling the screen region behind the
//! host window and filters the frames it delivers.

use stylish_scale::Size;
use tracing::{debug, info};

use super::frame::{CapturedFrame, RawImage};
use crate::error::StylishResult;
use crate::host::{HostWindow, Magnifier};
use crate::monitor::ScreenRect;

pub struct CaptureSource {
    magnifier: Box<dyn Magnifier>,
    armed: bool,
    released: bool,
    rearm_count: u64,
    accepted: u64,
    dropped: u64,
}

impl CaptureSource {
    /// Initialize the magnifier over `client` and install the capture callback.
    pub fn new(mut magnifier: Box<dyn Magnifier>, client: ScreenRect) -> StylishResult<Self> {
        magnifier.initialize(client)?;
        magnifier.fit(client.size());
        magnifier.arm_callback();
        info!(
            width = client.width(),
            height = client.height(),
            "magnifier initialized"
        );
        Ok(Self {
            magnifier,
            armed: true,
            released: false,
            rearm_count: 0,
            accepted: 0,
            dropped: 0,
        })
    }

    /// One timer tick: raise the window, point the magnifier at the client
    /// rectangle and ask for a new sample.
    pub fn reposition(&mut self, window: &mut dyn HostWindow) {
        window.raise_topmost();
        self.magnifier.set_source(window.client_screen_rect());
        self.magnifier.invalidate();
    }

    /// Remove the capture callback until the next [`fit`](Self::fit).
    pub fn disarm(&mut self) {
        if self.armed {
            self.magnifier.disarm_callback();
            self.armed = false;
            debug!("capture callback disarmed");
        }
    }

    /// Resize the magnifier to `size`. Returns true when this re-armed the
    /// callback.
    pub fn fit(&mut self, size: Size) -> bool {
        self.magnifier.fit(size);
        if self.armed {
            return false;
        }
        self.magnifier.arm_callback();
        self.armed = true;
        self.rearm_count += 1;
        debug!(rearm_count = self.rearm_count, "capture callback re-armed");
        true
    }

    /// Store `raw` into `slot` unless the window is beyond its monitor, the
    /// callback is disarmed or the capture has no area (a collapsed or
    /// minimized client). Returns whether the frame was accepted.
    pub fn accept(
        &mut self,
        raw: RawImage<'_>,
        beyond_monitor: bool,
        slot: &mut Option<CapturedFrame>,
    ) -> StylishResult<bool> {
        if beyond_monitor || !self.armed {
            self.dropped += 1;
            debug!(beyond_monitor, armed = self.armed, "capture dropped");
            return Ok(false);
        }
        if raw.header.size().is_empty() {
            self.dropped += 1;
            debug!(
                width = raw.header.width,
                height = raw.header.height,
                "empty capture dropped"
            );
            return Ok(false);
        }
        match slot {
            Some(frame) => frame.replace_from(raw)?,
            None => *slot = Some(CapturedFrame::from_raw(raw)?),
        }
        self.accepted += 1;
        Ok(true)
    }

    pub fn release(&mut self) {
        if !self.released {
            self.magnifier.release();
            self.released = true;
            self.armed = false;
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn rearm_count(&self) -> u64 {
        self.rearm_count
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Drop for CaptureSource {
    fn drop(&mut self) {
        self.release();
    }
}
