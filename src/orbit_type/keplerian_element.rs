//! # Keplerian orbital elements
//!
//! Classical elliptic elements `(a, e, i, Ω, ω, M)` at an epoch, referred to the mean
//! ecliptic and equinox J2000. They back both the minor-planet form of an
//! [`ElementSet`](crate::orbit_type::ElementSet) and, after conversion from mean longitudes,
//! the major-planet form and the built-in planetary theory.
//!
//! ## See also
//!
//! - [`propagate`](crate::kepler::propagate) – universal-variable two-body propagation.
//! - [`solve_kepler`](crate::kepler::solve_kepler) – elliptic Kepler equation.

use nalgebra::{Matrix3, Vector3};
use std::fmt;

use crate::constants::{Radian, MJD};
use crate::kepler::{propagate, solve_kepler};
use crate::ref_system::rotmt;

/// Rotation from the orbital (perifocal) frame to the reference plane:
/// `Rz(Ω) · Rx(i) · Rz(ω)`.
pub(crate) fn perifocal_to_reference(
    inclination: Radian,
    ascending_node_longitude: Radian,
    periapsis_argument: Radian,
) -> Matrix3<f64> {
    rotmt(ascending_node_longitude, 2) * rotmt(inclination, 0) * rotmt(periapsis_argument, 2)
}

/// Keplerian orbital elements (osculating, two-body).
///
/// Units
/// -----
/// * `reference_epoch`: MJD (TT).
/// * `semi_major_axis`: AU.
/// * `eccentricity`: unitless, `0 ≤ e < 1`.
/// * `inclination`, `ascending_node_longitude` (Ω), `periapsis_argument` (ω),
///   `mean_anomaly` (M): radians.
#[derive(Debug, PartialEq, Clone)]
pub struct KeplerianElements {
    pub reference_epoch: MJD,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: Radian,
    pub ascending_node_longitude: Radian,
    pub periapsis_argument: Radian,
    pub mean_anomaly: Radian,
}

impl KeplerianElements {
    /// Whether the set describes a bound, non-degenerate ellipse.
    pub fn is_elliptic(&self) -> bool {
        let values = [
            self.semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.ascending_node_longitude,
            self.periapsis_argument,
            self.mean_anomaly,
        ];
        values.iter().all(|v| v.is_finite())
            && self.semi_major_axis > 0.0
            && (0.0..1.0).contains(&self.eccentricity)
    }

    /// Heliocentric state at the reference epoch.
    ///
    /// Arguments
    /// ---------
    /// * `mu`: gravitational parameter in AU³/day².
    ///
    /// Return
    /// ------
    /// * `Some((r, v))` in AU and AU/day, mean ecliptic J2000; `None` for a degenerate set.
    pub fn state_at_epoch(&self, mu: f64) -> Option<(Vector3<f64>, Vector3<f64>)> {
        if !self.is_elliptic() || mu <= 0.0 {
            return None;
        }

        let a = self.semi_major_axis;
        let e = self.eccentricity;
        let ecc_anomaly = solve_kepler(self.mean_anomaly, e)?;
        let (sin_e, cos_e) = ecc_anomaly.sin_cos();
        let root = (1.0 - e * e).sqrt();

        let r = a * (1.0 - e * cos_e);
        let position = Vector3::new(a * (cos_e - e), a * root * sin_e, 0.0);
        let velocity = Vector3::new(-sin_e, root * cos_e, 0.0) * ((mu * a).sqrt() / r);

        let rotation = perifocal_to_reference(
            self.inclination,
            self.ascending_node_longitude,
            self.periapsis_argument,
        );
        Some((rotation * position, rotation * velocity))
    }

    /// Heliocentric state at `mjd_tt`, propagated from the reference epoch.
    pub fn state_at(&self, mjd_tt: MJD, mu: f64) -> Option<(Vector3<f64>, Vector3<f64>)> {
        let (r0, v0) = self.state_at_epoch(mu)?;
        propagate(&r0, &v0, mjd_tt - self.reference_epoch, mu)
    }
}

impl fmt::Display for KeplerianElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Keplerian Elements @ epoch (MJD): {:.6}", self.reference_epoch)?;
        writeln!(f, "  a = {:.8} AU, e = {:.8}", self.semi_major_axis, self.eccentricity)?;
        write!(
            f,
            "  i = {:.6}°, Ω = {:.6}°, ω = {:.6}°, M = {:.6}°",
            self.inclination.to_degrees(),
            self.ascending_node_longitude.to_degrees(),
            self.periapsis_argument.to_degrees(),
            self.mean_anomaly.to_degrees()
        )
    }
}
