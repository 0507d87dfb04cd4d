//! # Monitor Module
//!
//! Screen geometry and the monitor-bounds tracker that decides whether the
//! window still lies on the monitor it was created on.

pub mod bounds;
pub mod rect;

pub use bounds::{
    BoundaryState, MonitorDescriptor, MonitorId, classify, containing_monitor, nearest_monitor,
};
pub use rect::ScreenRect;
