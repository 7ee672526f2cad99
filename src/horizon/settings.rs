use serde::{Deserialize, Serialize};

use crate::constants::{ArcSec, Second};
use crate::obsplan_errors::ObsPlanError;

/// Tuning constants of the [`HorizonSolver`](crate::horizon::HorizonSolver).
///
/// The defaults are empirical; the Moon gets coarser steps because it moves fast enough to
/// make 12 h meridian jumps overshoot and 60 s refinement steps crawl.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use obsplan::horizon::SolverSettings;
///
/// let settings = SolverSettings::from_json(r#"{ "elevation_tolerance": 1.0 }"#)?;
/// assert_eq!(settings.elevation_tolerance, 1.0);
/// assert_eq!(settings.refine_increment, 60.0);
/// # Ok::<(), obsplan::obsplan_errors::ObsPlanError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Meridian fixed point stops when a correction is at most this long.
    pub meridian_tolerance: Second,
    /// Iteration cap of the meridian fixed point, and of the search for the next or
    /// previous transit.
    pub meridian_max_iterations: usize,
    /// Jump used to look for the next or previous transit.
    pub meridian_step: Second,
    pub moon_meridian_step: Second,

    /// Rise/set refinement stops when the elevation is this close to the horizon.
    pub elevation_tolerance: ArcSec,
    /// First step of the rise/set refinement.
    pub refine_increment: Second,
    pub moon_refine_increment: Second,
    /// Refinement gives up (or accepts a bracketed instant) once the step is below this.
    pub increment_floor: Second,
    /// Hard cap on refinement steps.
    pub max_refine_iterations: usize,

    /// Step and span of the direct elevation search that replaces the hour-angle formula
    /// for the Moon when that formula finds no crossing.
    pub moon_search_step: Second,
    pub moon_search_span: Second,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            meridian_tolerance: 1.0,
            meridian_max_iterations: 10,
            meridian_step: 12.0 * 3600.0,
            moon_meridian_step: 6.0 * 3600.0,
            elevation_tolerance: 5.0,
            refine_increment: 60.0,
            moon_refine_increment: 600.0,
            increment_floor: 0.2,
            max_refine_iterations: 5000,
            moon_search_step: 600.0,
            moon_search_span: 12.0 * 3600.0,
        }
    }
}

impl SolverSettings {
    /// Load settings from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ObsPlanError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod settings_test {
    use super::*;

    #[test]
    fn test_partial_json() {
        let settings =
            SolverSettings::from_json(r#"{"moon_refine_increment": 300.0, "meridian_max_iterations": 20}"#)
                .unwrap();
        assert_eq!(settings.moon_refine_increment, 300.0);
        assert_eq!(settings.meridian_max_iterations, 20);
        assert_eq!(settings.increment_floor, 0.2);

        assert_eq!(SolverSettings::from_json("{}").unwrap(), SolverSettings::default());
        assert!(matches!(
            SolverSettings::from_json(r#"{"increment_floor": "small"}"#),
            Err(ObsPlanError::Json(_))
        ));
    }

    #[test]
    fn test_round_trip_through_json() {
        let settings = SolverSettings {
            elevation_tolerance: 2.5,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(SolverSettings::from_json(&json).unwrap(), settings);
    }
}
