//! # Orbital element sets
//!
//! Three element forms are accepted for bodies without a built-in ephemeris:
//!
//! | form | fields | gravitational parameter |
//! |------|--------|-------------------------|
//! | major planet | `i, Ω, ϖ, a, e, L, n` | `μ = n²a³` |
//! | minor planet | `i, Ω, ω, a, e, M` | `μ = k²` |
//! | comet | `T, i, Ω, ω, q, e` | `μ = k²` |
//!
//! The form is picked from the optional fields of an [`OrbitalElementsInput`]: a daily motion
//! selects the major-planet form, a mean anomaly without daily motion the minor-planet form,
//! and a perihelion epoch the comet form. All angles are in the mean ecliptic and equinox
//! J2000.
//!
//! Degenerate sets are accepted at construction; they simply never produce a position
//! ([`ElementSet::heliocentric_state`] returns `None`).
//!
//! ```rust
//! use obsplan::orbit_type::{ElementSet, OrbitalElementsInput};
//!
//! let input = OrbitalElementsInput {
//!     epoch: Some(60000.0),
//!     inclination: Some(10.59),
//!     ascending_node: Some(80.27),
//!     perihelion: Some(73.60),
//!     aorq: Some(2.7675),
//!     eccentricity: Some(0.0785),
//!     aorl: Some(291.4),
//!     ..Default::default()
//! };
//! let set = ElementSet::from_input(&input)?;
//! assert_eq!(set.form_name(), "minor planet");
//! # Ok::<(), obsplan::obsplan_errors::ObsPlanError>(())
//! ```
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::astrometry::apparent::apparent_from_geocentric;
use crate::constants::{Degree, GAUSS_GRAV_SQUARED, MJD, RADEG};
use crate::ephemeris::{geocentric_light_time, BodyPosition};
use crate::obsplan_errors::ObsPlanError;
use crate::orbit_type::{cometary_element::CometaryElements, keplerian_element::KeplerianElements};

/// Classical Keplerian elements structure and utilities.
pub mod keplerian_element;

/// Perihelion-based elements for comets.
pub mod cometary_element;

/// Raw orbital elements as supplied by a catalog or a user, before the form is known.
///
/// Angles are in degrees, distances in AU, epochs in MJD (TT).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitalElementsInput {
    /// Epoch of osculation (major and minor planet forms).
    pub epoch: Option<MJD>,
    /// Epoch of perihelion passage (comet form).
    pub perihelion_epoch: Option<MJD>,
    pub inclination: Option<Degree>,
    pub ascending_node: Option<Degree>,
    /// Longitude of perihelion ϖ (major planet form) or argument of perihelion ω.
    pub perihelion: Option<Degree>,
    /// Semi-major axis (planet forms) or perihelion distance (comet form).
    pub aorq: Option<f64>,
    pub eccentricity: Option<f64>,
    /// Mean longitude L (major planet form) or mean anomaly M (minor planet form).
    pub aorl: Option<Degree>,
    /// Daily motion in degrees per day (major planet form).
    pub daily_motion: Option<Degree>,
}

/// An orbital element set in one of the three supported forms.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementSet {
    /// Elements converted to `(a, e, i, Ω, ω, M)` plus the daily motion (rad/day) which fixes μ.
    MajorPlanet {
        elements: KeplerianElements,
        daily_motion: f64,
    },
    MinorPlanet(KeplerianElements),
    Comet(CometaryElements),
}

fn require(value: Option<f64>, form: &str, field: &str) -> Result<f64, ObsPlanError> {
    value.ok_or_else(|| ObsPlanError::IncompleteElements(format!("{form} form requires '{field}'")))
}

impl ElementSet {
    /// Select the element form from the fields present and build the set.
    ///
    /// Errors
    /// ------
    /// * [`ObsPlanError::IncompleteElements`] if no form matches, or the matching form misses
    ///   one of its fields.
    pub fn from_input(input: &OrbitalElementsInput) -> Result<Self, ObsPlanError> {
        if input.daily_motion.is_some() {
            let form = "major planet";
            let node = require(input.ascending_node, form, "ascending_node")?;
            let perihelion_lon = require(input.perihelion, form, "perihelion")?;
            let mean_lon = require(input.aorl, form, "aorl")?;
            let elements = KeplerianElements {
                reference_epoch: require(input.epoch, form, "epoch")?,
                semi_major_axis: require(input.aorq, form, "aorq")?,
                eccentricity: require(input.eccentricity, form, "eccentricity")?,
                inclination: require(input.inclination, form, "inclination")? * RADEG,
                ascending_node_longitude: node * RADEG,
                periapsis_argument: (perihelion_lon - node) * RADEG,
                mean_anomaly: (mean_lon - perihelion_lon) * RADEG,
            };
            return Ok(ElementSet::MajorPlanet {
                elements,
                daily_motion: require(input.daily_motion, form, "daily_motion")? * RADEG,
            });
        }

        if input.aorl.is_some() {
            let form = "minor planet";
            return Ok(ElementSet::MinorPlanet(KeplerianElements {
                reference_epoch: require(input.epoch, form, "epoch")?,
                semi_major_axis: require(input.aorq, form, "aorq")?,
                eccentricity: require(input.eccentricity, form, "eccentricity")?,
                inclination: require(input.inclination, form, "inclination")? * RADEG,
                ascending_node_longitude: require(input.ascending_node, form, "ascending_node")?
                    * RADEG,
                periapsis_argument: require(input.perihelion, form, "perihelion")? * RADEG,
                mean_anomaly: require(input.aorl, form, "aorl")? * RADEG,
            }));
        }

        if input.perihelion_epoch.is_some() {
            let form = "comet";
            return Ok(ElementSet::Comet(CometaryElements {
                perihelion_epoch: require(input.perihelion_epoch, form, "perihelion_epoch")?,
                perihelion_distance: require(input.aorq, form, "aorq")?,
                eccentricity: require(input.eccentricity, form, "eccentricity")?,
                inclination: require(input.inclination, form, "inclination")? * RADEG,
                ascending_node_longitude: require(input.ascending_node, form, "ascending_node")?
                    * RADEG,
                periapsis_argument: require(input.perihelion, form, "perihelion")? * RADEG,
            }));
        }

        Err(ObsPlanError::IncompleteElements(
            "need a daily motion, a mean anomaly or a perihelion epoch".into(),
        ))
    }

    pub fn form_name(&self) -> &'static str {
        match self {
            ElementSet::MajorPlanet { .. } => "major planet",
            ElementSet::MinorPlanet(_) => "minor planet",
            ElementSet::Comet(_) => "comet",
        }
    }

    /// Heliocentric state at `mjd_tt` in the mean ecliptic J2000 (AU, AU/day).
    ///
    /// Return
    /// ------
    /// * `None` for degenerate elements (`e < 0`, `a ≤ 0`, `q ≤ 0`, `e ≥ 1` in a planet form,
    ///   non-positive daily motion) or when the propagation fails to converge.
    pub fn heliocentric_state(&self, mjd_tt: MJD) -> Option<(Vector3<f64>, Vector3<f64>)> {
        match self {
            ElementSet::MajorPlanet {
                elements,
                daily_motion,
            } => {
                if !(*daily_motion > 0.0) {
                    return None;
                }
                let mu = daily_motion.powi(2) * elements.semi_major_axis.powi(3);
                elements.state_at(mjd_tt, mu)
            }
            ElementSet::MinorPlanet(elements) => elements.state_at(mjd_tt, GAUSS_GRAV_SQUARED),
            ElementSet::Comet(elements) => elements.state_at(mjd_tt, GAUSS_GRAV_SQUARED),
        }
    }

    /// Apparent geocentric place at `mjd_tt`, light-time corrected.
    ///
    /// The diameter of an element-set body is unknown and reported as zero.
    pub fn apparent_position(&self, mjd_tt: MJD) -> Option<BodyPosition> {
        let geocentric =
            geocentric_light_time(mjd_tt, |t| self.heliocentric_state(t).map(|(r, _)| r))?;
        let (ra, dec, distance) = apparent_from_geocentric(&geocentric, mjd_tt);
        Some(BodyPosition {
            ra,
            dec,
            distance,
            diameter: 0.0,
        })
    }
}
