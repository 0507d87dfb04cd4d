//! # Monitor-Bounds Tracker
//!
//! Classifies a window rectangle against the live monitor topology. Capture is
//! only reliable on the monitor the window was created on, so the pipeline
//! compares against that *startup* monitor rather than testing raw containment.

use serde::{Deserialize, Serialize};

use super::rect::ScreenRect;

/// Opaque monitor identity as reported by the display topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonitorId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorDescriptor {
    pub id: MonitorId,
    pub rect: ScreenRect,
    pub primary: bool,
}

impl MonitorDescriptor {
    pub fn new(id: u64, rect: ScreenRect, primary: bool) -> Self {
        Self {
            id: MonitorId(id),
            rect,
            primary,
        }
    }
}

/// Where a window rectangle lies relative to the startup monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryState {
    WithinStartupMonitor,
    WithinOtherSingleMonitor(MonitorId),
    SpansOrExceedsMonitors,
}

impl BoundaryState {
    /// Only the startup monitor is safe for capture.
    pub fn is_safe(&self) -> bool {
        matches!(self, BoundaryState::WithinStartupMonitor)
    }
}

/// The monitor that fully contains `rect`, if exactly one does.
///
/// An empty enumeration or overlapping monitors that both contain the
/// rectangle yield `None`.
pub fn containing_monitor(rect: &ScreenRect, monitors: &[MonitorDescriptor]) -> Option<MonitorId> {
    let mut found = monitors.iter().filter(|m| m.rect.contains_rect(rect));
    match (found.next(), found.next()) {
        (Some(only), None) => Some(only.id),
        _ => None,
    }
}

pub fn classify(
    rect: &ScreenRect,
    startup: MonitorId,
    monitors: &[MonitorDescriptor],
) -> BoundaryState {
    match containing_monitor(rect, monitors) {
        Some(id) if id == startup => BoundaryState::WithinStartupMonitor,
        Some(id) => BoundaryState::WithinOtherSingleMonitor(id),
        None => BoundaryState::SpansOrExceedsMonitors,
    }
}

/// Monitor with the largest overlap with `rect`; ties go to the earlier
/// monitor, no overlap at all falls back to the first one.
pub fn nearest_monitor(rect: &ScreenRect, monitors: &[MonitorDescriptor]) -> Option<MonitorId> {
    let mut best: Option<(&MonitorDescriptor, u64)> = None;
    for monitor in monitors {
        let area = rect.intersection_area(&monitor.rect);
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((monitor, area)),
        }
    }
    best.map(|(m, _)| m.id)
}
