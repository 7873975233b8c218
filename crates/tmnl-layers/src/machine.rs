//! Per-layer interaction state machine.
//!
//! States are `Hidden`, `Visible` and `Locked`. Transitions are a pure
//! function of `(state, event)`; the live [`LayerMachine`] applies them and
//! broadcasts the current state on a watch channel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::trace;

/// Interaction state of a layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerState {
    /// Not rendered.
    Hidden,
    /// Rendered and interactive.
    #[default]
    Visible,
    /// Rendered, not interactive.
    Locked,
}

impl LayerState {
    /// Starting state for a layer with the given visibility.
    ///
    /// The `locked` flag does not influence the starting state.
    pub fn initial(visible: bool) -> Self {
        if visible {
            Self::Visible
        } else {
            Self::Hidden
        }
    }

    /// Next state for `event`, or `None` if the event is not accepted here.
    pub fn transition(self, event: LayerEvent) -> Option<Self> {
        use LayerEvent::*;
        use LayerState::*;

        match (self, event) {
            (Hidden, Show) => Some(Visible),
            (Visible, Hide) | (Locked, Hide) => Some(Hidden),
            (Visible, Lock) => Some(Locked),
            (Locked, Unlock) => Some(Visible),
            (Visible, BringToFront) | (Visible, SendToBack) => Some(Visible),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Visible => "visible",
            Self::Locked => "locked",
        }
    }
}

impl fmt::Display for LayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events accepted by the layer machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayerEvent {
    Show,
    Hide,
    Lock,
    Unlock,
    BringToFront,
    SendToBack,
}

impl LayerEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Show => "SHOW",
            Self::Hide => "HIDE",
            Self::Lock => "LOCK",
            Self::Unlock => "UNLOCK",
            Self::BringToFront => "BRING_TO_FRONT",
            Self::SendToBack => "SEND_TO_BACK",
        }
    }
}

impl fmt::Display for LayerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a machine still processes events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineStatus {
    Active,
    Stopped,
}

/// A running layer state machine.
///
/// Events that are not accepted in the current state are ignored, as is
/// every event once the machine has been stopped.
#[derive(Debug)]
pub struct LayerMachine {
    state: watch::Sender<LayerState>,
    running: AtomicBool,
}

impl LayerMachine {
    /// Start a machine in `initial`.
    pub fn start(initial: LayerState) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state,
            running: AtomicBool::new(true),
        }
    }

    /// Current state.
    pub fn state(&self) -> LayerState {
        *self.state.borrow()
    }

    pub fn status(&self) -> MachineStatus {
        if self.running.load(Ordering::Acquire) {
            MachineStatus::Active
        } else {
            MachineStatus::Stopped
        }
    }

    /// Whether `event` would be accepted right now.
    pub fn can(&self, event: LayerEvent) -> bool {
        self.status() == MachineStatus::Active && self.state().transition(event).is_some()
    }

    /// Deliver `event` and return the resulting state.
    pub fn send(&self, event: LayerEvent) -> LayerState {
        if self.status() == MachineStatus::Stopped {
            trace!(%event, "event sent to stopped machine");
            return self.state();
        }

        self.state.send_if_modified(|state| match state.transition(event) {
            Some(next) => {
                let changed = next != *state;
                *state = next;
                changed
            }
            None => {
                trace!(%event, state = %state, "event ignored");
                false
            }
        });

        self.state()
    }

    /// Stop processing events. The last state stays readable.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Watch state changes.
    pub fn subscribe(&self) -> watch::Receiver<LayerState> {
        self.state.subscribe()
    }
}
