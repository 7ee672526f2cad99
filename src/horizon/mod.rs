//! # Horizon crossings
//!
//! Meridian transit, rise and set times of a [`CoordinateSource`](crate::coords::CoordinateSource)
//! for an observer.
//!
//! ## Algorithm
//!
//! 1. **Hour angle at the horizon** ([`HorizonSolver::ha_set`]):
//!    `cos H₀ = (sin h − sin φ sin δ) / (cos φ cos δ)`. `|cos H₀| > 1` means the source never
//!    crosses `h` at this declination. For the Moon, whose declination and diameter change
//!    too fast for the formula near transit, a direct elevation search around the transit
//!    supplies a surrogate first. `H₀` is converted to civil seconds with the sidereal to
//!    solar day ratio, except for the Sun whose hour angle already runs on solar time.
//! 2. **Meridian transit** ([`HorizonSolver::meridian_time`]): fixed point on
//!    `α(t) = LST(t)`, stopping when the correction drops below a second. The next or
//!    previous transit is found by restarting the fixed point half a day (a quarter of a day
//!    for the Moon) further, in growing jumps.
//! 3. **Rise/set refinement**: starting from `transit ∓ H₀`, the instant is stepped towards
//!    the horizon, halving and reversing the step whenever the elevation gap grows. A result
//!    is accepted within the elevation tolerance, or once the step is below the floor after
//!    the horizon was seen from both sides.
//! 4. **Event selection**: crossings computed from the transits around the reference
//!    instant are compared with it to pick the next, previous or nearest one.
//!
//! ## Failure semantics
//!
//! A source that never rises and one that never sets are not told apart: both report
//! [`CrossingStatus::NeverCrosses`]. Failed refinements report
//! [`CrossingStatus::NotConverged`] without an instant. A meridian fixed point that runs out
//! of iterations logs a warning and still returns its last estimate, flagged
//! [`CrossingStatus::NotConverged`]. Such an estimate never anchors a rise or set: those
//! report [`CrossingStatus::NotConverged`] without an instant.
//!
//! Sources fixed on the observer's sky and calibrations have no events at all.
use std::fmt;

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

mod settings;
mod solver;

pub use settings::SolverSettings;
pub use solver::HorizonSolver;

/// Which occurrence of an event is wanted, relative to a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSelector {
    /// First occurrence strictly after the reference instant.
    #[default]
    Next,
    /// Last occurrence strictly before the reference instant.
    Previous,
    /// Whichever of the two is closer to the reference instant.
    Nearest,
}

/// Outcome of a crossing search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossingStatus {
    Converged,
    /// The iteration did not settle. Meridian searches still carry their best estimate.
    NotConverged,
    /// The source never reaches the requested horizon (circumpolar or never rising), or has
    /// no events at all.
    NeverCrosses,
}

/// Instant of an event together with how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossingResult {
    pub instant: Option<Epoch>,
    pub status: CrossingStatus,
}

impl CrossingResult {
    pub fn converged(instant: Epoch) -> Self {
        CrossingResult {
            instant: Some(instant),
            status: CrossingStatus::Converged,
        }
    }

    pub fn never() -> Self {
        CrossingResult {
            instant: None,
            status: CrossingStatus::NeverCrosses,
        }
    }

    pub fn not_converged(instant: Option<Epoch>) -> Self {
        CrossingResult {
            instant,
            status: CrossingStatus::NotConverged,
        }
    }

    pub fn is_converged(&self) -> bool {
        self.status == CrossingStatus::Converged
    }
}

impl fmt::Display for CrossingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.instant, self.status) {
            (Some(t), CrossingStatus::Converged) => write!(f, "{t}"),
            (Some(t), _) => write!(f, "{t} (not converged)"),
            (None, CrossingStatus::NeverCrosses) => f.write_str("never crosses"),
            (None, _) => f.write_str("not converged"),
        }
    }
}
