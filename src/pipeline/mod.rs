//! # Pipeline Module
//!
//! The capture-inference-render pipeline: a pure state machine for the
//! suspension flags and the controller that reacts to host events.

pub mod controller;
pub mod state;

pub use controller::{BEYOND_MONITOR_MESSAGE, CapturePipeline, Collaborators};
pub use state::{Effect, PipelineEvent, PipelineFlags, PipelineState, Step, transition};
