//! # Pipeline State Machine
//!
//! All flag changes go through [`transition`]. It is pure: it returns the new
//! flags plus the side effect the controller has to carry out, and never
//! touches the host itself.
//!
//! ```text
//!               enter size/move            exit size/move
//!   Active ─────────────────────► Resizing ─────────────► Active
//!     │  maximize state changed                                ▲
//!     ├──────────────► FullscreenTransition ── geometry settled ┤
//!     │  boundary check: unsafe                                 │
//!     └──────────────► BeyondMonitor ─── boundary check: safe ──┘
//! ```
//!
//! The suspensions are independent flags; [`PipelineState`] only reports the
//! most important one.

use tracing::info;

use crate::monitor::BoundaryState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineFlags {
    pub inference_enabled: bool,
    pub is_resizing: bool,
    pub is_fullscreen: bool,
    pub fullscreen_just_changed: bool,
    pub is_beyond_monitor: bool,
}

impl Default for PipelineFlags {
    fn default() -> Self {
        Self {
            inference_enabled: true,
            is_resizing: false,
            is_fullscreen: false,
            fullscreen_just_changed: false,
            is_beyond_monitor: false,
        }
    }
}

impl PipelineFlags {
    /// Inference may run on the next paint.
    pub fn inference_permitted(&self) -> bool {
        self.inference_enabled
            && !self.is_resizing
            && !self.fullscreen_just_changed
            && !self.is_beyond_monitor
    }

    pub fn state(&self) -> PipelineState {
        if self.is_beyond_monitor {
            PipelineState::SuspendedBeyondMonitor
        } else if self.fullscreen_just_changed {
            PipelineState::SuspendedFullscreenTransition
        } else if self.is_resizing {
            PipelineState::SuspendedResizing
        } else {
            PipelineState::Active
        }
    }
}

/// Reported pipeline state, by precedence
/// BeyondMonitor > FullscreenTransition > Resizing > Active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Active,
    SuspendedResizing,
    SuspendedFullscreenTransition,
    SuspendedBeyondMonitor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEvent {
    /// User toggled inference on or off
    InferenceToggled(bool),
    EnterSizeMove,
    ExitSizeMove,
    SizeChanged { maximized: bool },
    /// The magnifier was resized to the new client area
    GeometrySettled,
    BoundaryChecked(BoundaryState),
}

/// Host-side work a transition asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    DisarmCapture,
    RearmCapture,
    ForceRedraw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub flags: PipelineFlags,
    pub effect: Option<Effect>,
}

pub fn transition(flags: PipelineFlags, event: PipelineEvent) -> Step {
    let mut next = flags;
    let effect = match event {
        PipelineEvent::InferenceToggled(enabled) => {
            next.inference_enabled = enabled;
            None
        }
        PipelineEvent::EnterSizeMove => {
            next.is_resizing = true;
            None
        }
        PipelineEvent::ExitSizeMove => {
            next.is_resizing = false;
            None
        }
        PipelineEvent::SizeChanged { maximized } if maximized != flags.is_fullscreen => {
            next.is_fullscreen = maximized;
            next.fullscreen_just_changed = true;
            Some(Effect::DisarmCapture)
        }
        PipelineEvent::SizeChanged { .. } => None,
        PipelineEvent::GeometrySettled if flags.fullscreen_just_changed => {
            next.fullscreen_just_changed = false;
            Some(Effect::RearmCapture)
        }
        PipelineEvent::GeometrySettled => None,
        PipelineEvent::BoundaryChecked(boundary) => {
            next.is_beyond_monitor = !boundary.is_safe();
            next.is_beyond_monitor.then_some(Effect::ForceRedraw)
        }
    };

    if next.state() != flags.state() {
        info!(from = ?flags.state(), to = ?next.state(), "pipeline state changed");
    }
    Step {
        flags: next,
        effect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::MonitorId;

    fn apply(flags: PipelineFlags, events: &[PipelineEvent]) -> PipelineFlags {
        events.iter().fold(flags, |f, e| transition(f, *e).flags)
    }

    #[test]
    fn test_resize_bracket_gates_inference() {
        let flags = PipelineFlags::default();
        assert!(flags.inference_permitted());

        let resizing = transition(flags, PipelineEvent::EnterSizeMove).flags;
        assert!(!resizing.inference_permitted());
        assert_eq!(resizing.state(), PipelineState::SuspendedResizing);

        let done = transition(resizing, PipelineEvent::ExitSizeMove).flags;
        assert_eq!(done, flags);
    }

    #[test]
    fn test_maximize_disarms_then_settle_rearms_once() {
        let step = transition(
            PipelineFlags::default(),
            PipelineEvent::SizeChanged { maximized: true },
        );
        assert_eq!(step.effect, Some(Effect::DisarmCapture));
        assert!(step.flags.is_fullscreen && step.flags.fullscreen_just_changed);
        assert_eq!(step.flags.state(), PipelineState::SuspendedFullscreenTransition);

        let settled = transition(step.flags, PipelineEvent::GeometrySettled);
        assert_eq!(settled.effect, Some(Effect::RearmCapture));
        assert!(!settled.flags.fullscreen_just_changed);

        let again = transition(settled.flags, PipelineEvent::GeometrySettled);
        assert_eq!(again.effect, None);
    }

    #[test]
    fn test_size_change_without_maximize_change_is_noop() {
        let flags = PipelineFlags::default();
        let step = transition(flags, PipelineEvent::SizeChanged { maximized: false });
        assert_eq!(step, Step { flags, effect: None });
    }

    #[test]
    fn test_boundary_divergence_forces_redraw() {
        let beyond = transition(
            PipelineFlags::default(),
            PipelineEvent::BoundaryChecked(BoundaryState::WithinOtherSingleMonitor(MonitorId(2))),
        );
        assert_eq!(beyond.effect, Some(Effect::ForceRedraw));
        assert_eq!(beyond.flags.state(), PipelineState::SuspendedBeyondMonitor);

        let back = transition(
            beyond.flags,
            PipelineEvent::BoundaryChecked(BoundaryState::WithinStartupMonitor),
        );
        assert_eq!(back.effect, None);
        assert_eq!(back.flags.state(), PipelineState::Active);
    }

    #[test]
    fn test_beyond_monitor_takes_precedence() {
        let flags = apply(
            PipelineFlags::default(),
            &[
                PipelineEvent::EnterSizeMove,
                PipelineEvent::SizeChanged { maximized: true },
                PipelineEvent::BoundaryChecked(BoundaryState::SpansOrExceedsMonitors),
            ],
        );
        assert_eq!(flags.state(), PipelineState::SuspendedBeyondMonitor);
        let flags = apply(
            flags,
            &[PipelineEvent::BoundaryChecked(BoundaryState::WithinStartupMonitor)],
        );
        assert_eq!(flags.state(), PipelineState::SuspendedFullscreenTransition);
    }

    #[test]
    fn test_disabled_inference() {
        let flags =
            transition(PipelineFlags::default(), PipelineEvent::InferenceToggled(false)).flags;
        assert!(!flags.inference_permitted());
        assert_eq!(flags.state(), PipelineState::Active);
    }
}
