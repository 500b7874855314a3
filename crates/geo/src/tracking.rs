//! Driver location tracking lifecycle.
//!
//! The platform pieces (permission prompts, the OS position watcher,
//! persistence of fixes) live with the caller; this module only owns
//! the lifecycle, as an explicit state machine:
//!
//! ```text
//! Idle -> RequestingPermission -> Tracking -> Stopped
//!                |                              |
//!                +---- denied ----> Idle        +-- begin --> RequestingPermission
//! ```
//!
//! A tracker is a plain value held by its caller; nothing here is
//! global or shared.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::identifiers::DriverIdentifier;
use crate::models::LatLng;

/// Externally visible tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    Idle,
    RequestingPermission,
    Tracking,
    Stopped,
}

impl fmt::Display for TrackingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::RequestingPermission => "requesting permission",
            Self::Tracking => "tracking",
            Self::Stopped => "stopped",
        })
    }
}

/// A position report for the tracked driver.
///
/// `recorded_at` comes from the caller; this module never reads a
/// clock.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFix {
    pub point: LatLng,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TrackingError {
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: TrackingState,
    },
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    RequestingPermission {
        driver: DriverIdentifier,
    },
    Tracking {
        driver: DriverIdentifier,
        last_fix: Option<LocationFix>,
    },
    Stopped {
        last_fix: Option<LocationFix>,
    },
}

/// The tracking lifecycle for one driver session.
#[derive(Debug, Clone)]
pub struct LocationTracker {
    state: State,
}

impl LocationTracker {
    pub fn new() -> Self {
        Self { state: State::Idle }
    }

    pub fn state(&self) -> TrackingState {
        match self.state {
            State::Idle => TrackingState::Idle,
            State::RequestingPermission { .. } => TrackingState::RequestingPermission,
            State::Tracking { .. } => TrackingState::Tracking,
            State::Stopped { .. } => TrackingState::Stopped,
        }
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, State::Tracking { .. })
    }

    /// Driver bound to the current session, if one is.
    pub fn driver(&self) -> Option<&DriverIdentifier> {
        match &self.state {
            State::RequestingPermission { driver } | State::Tracking { driver, .. } => Some(driver),
            State::Idle | State::Stopped { .. } => None,
        }
    }

    /// Latest recorded fix. Survives [`stop`](Self::stop) so the final
    /// position stays inspectable.
    pub fn last_fix(&self) -> Option<&LocationFix> {
        match &self.state {
            State::Tracking { last_fix, .. } | State::Stopped { last_fix } => last_fix.as_ref(),
            State::Idle | State::RequestingPermission { .. } => None,
        }
    }

    /// Start a session for `driver`. Valid from Idle or Stopped; the
    /// caller then reports the permission outcome.
    pub fn begin(&mut self, driver: DriverIdentifier) -> Result<(), TrackingError> {
        match self.state {
            State::Idle | State::Stopped { .. } => {
                debug!(%driver, "requesting location permission");
                self.state = State::RequestingPermission { driver };
                Ok(())
            }
            _ => Err(self.invalid("begin tracking")),
        }
    }

    /// The caller obtained location permission; tracking is live.
    pub fn permission_granted(&mut self) -> Result<(), TrackingError> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::RequestingPermission { driver } => {
                debug!(%driver, "location tracking started");
                self.state = State::Tracking {
                    driver,
                    last_fix: None,
                };
                Ok(())
            }
            other => {
                self.state = other;
                Err(self.invalid("grant permission"))
            }
        }
    }

    /// Permission was refused. The session unwinds to Idle with no
    /// driver bound, as if it never started.
    pub fn permission_denied(&mut self) -> Result<(), TrackingError> {
        match self.state {
            State::RequestingPermission { .. } => {
                debug!("location permission denied");
                self.state = State::Idle;
                Ok(())
            }
            _ => Err(self.invalid("deny permission")),
        }
    }

    /// Record the latest position while tracking.
    pub fn record_fix(&mut self, fix: LocationFix) -> Result<(), TrackingError> {
        match &mut self.state {
            State::Tracking { last_fix, .. } => {
                *last_fix = Some(fix);
                Ok(())
            }
            _ => Err(self.invalid("record a fix")),
        }
    }

    /// End the session, unbinding the driver and keeping the last fix.
    pub fn stop(&mut self) -> Result<(), TrackingError> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::RequestingPermission { driver } => {
                debug!(%driver, "tracking stopped before permission resolved");
                self.state = State::Stopped { last_fix: None };
                Ok(())
            }
            State::Tracking { driver, last_fix } => {
                debug!(%driver, "tracking stopped");
                self.state = State::Stopped { last_fix };
                Ok(())
            }
            other => {
                self.state = other;
                Err(self.invalid("stop"))
            }
        }
    }

    fn invalid(&self, action: &'static str) -> TrackingError {
        TrackingError::InvalidTransition {
            action,
            state: self.state(),
        }
    }
}

impl Default for LocationTracker {
    fn default() -> Self {
        Self::new()
    }
}
