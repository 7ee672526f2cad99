use nalgebra::Vector3;

use crate::constants::{Radian, MJD};
use crate::kepler::propagate;
use crate::orbit_type::keplerian_element::perifocal_to_reference;

/// # Cometary orbital elements
///
/// Perihelion-based elements, convenient for **parabolic and hyperbolic** orbits where the
/// semi-major axis is infinite or negative. Elliptic comets (`e < 1`) are accepted too.
///
/// Units & conventions
/// --------------------
/// - Distances in **AU**, angles in **radians**, epochs in **MJD (TT)**.
/// - Angles refer to the mean ecliptic and equinox J2000.
#[derive(Debug, Clone, PartialEq)]
pub struct CometaryElements {
    /// Epoch of perihelion passage `T`.
    pub perihelion_epoch: MJD,

    /// Perihelion distance `q` (AU).
    pub perihelion_distance: f64,

    /// Eccentricity `e` (≥ 0).
    pub eccentricity: f64,

    /// Inclination `i`.
    pub inclination: Radian,

    /// Longitude of the ascending node `Ω`.
    pub ascending_node_longitude: Radian,

    /// Argument of perihelion `ω`.
    pub periapsis_argument: Radian,
}

impl CometaryElements {
    fn is_valid(&self) -> bool {
        let values = [
            self.perihelion_distance,
            self.eccentricity,
            self.inclination,
            self.ascending_node_longitude,
            self.periapsis_argument,
        ];
        values.iter().all(|v| v.is_finite())
            && self.perihelion_distance > 0.0
            && self.eccentricity >= 0.0
    }

    /// Heliocentric state at perihelion (mean ecliptic J2000, AU and AU/day).
    pub fn state_at_perihelion(&self, mu: f64) -> Option<(Vector3<f64>, Vector3<f64>)> {
        if !self.is_valid() || mu <= 0.0 {
            return None;
        }

        let q = self.perihelion_distance;
        let speed = (mu * (1.0 + self.eccentricity) / q).sqrt();
        let rotation = perifocal_to_reference(
            self.inclination,
            self.ascending_node_longitude,
            self.periapsis_argument,
        );

        Some((
            rotation * Vector3::new(q, 0.0, 0.0),
            rotation * Vector3::new(0.0, speed, 0.0),
        ))
    }

    /// Heliocentric state at `mjd_tt`, propagated from perihelion.
    ///
    /// Return
    /// ------
    /// * `None` for a degenerate set or when the universal Kepler equation does not converge.
    pub fn state_at(&self, mjd_tt: MJD, mu: f64) -> Option<(Vector3<f64>, Vector3<f64>)> {
        let (r0, v0) = self.state_at_perihelion(mu)?;
        propagate(&r0, &v0, mjd_tt - self.perihelion_epoch, mu)
    }
}

#[cfg(test)]
mod cometary_element_test {
    use super::*;
    use crate::constants::GAUSS_GRAV_SQUARED;
    use approx::assert_relative_eq;

    fn comet(e: f64) -> CometaryElements {
        CometaryElements {
            perihelion_epoch: 60000.0,
            perihelion_distance: 0.58,
            eccentricity: e,
            inclination: 1.2,
            ascending_node_longitude: 0.4,
            periapsis_argument: 2.1,
        }
    }

    #[test]
    fn test_parabolic_barker() {
        // parabola: t - T = sqrt(2 q³/μ) (D + D³/3) with D = tan(ν/2)
        let mu = GAUSS_GRAV_SQUARED;
        let c = comet(1.0);
        let (r, v) = c.state_at(60040.0, mu).unwrap();
        let nu_half = (r.norm() / c.perihelion_distance - 1.0).sqrt();
        let dt = (2.0 * c.perihelion_distance.powi(3) / mu).sqrt() * (nu_half + nu_half.powi(3) / 3.0);
        assert_relative_eq!(dt, 40.0, epsilon = 1e-6);
        // zero orbital energy
        assert_relative_eq!(v.norm_squared() / 2.0, mu / r.norm(), epsilon = 1e-14);
    }

    #[test]
    fn test_hyperbolic_outbound_and_inbound() {
        let mu = GAUSS_GRAV_SQUARED;
        let c = comet(1.3);
        let (r_out, v_out) = c.state_at(60100.0, mu).unwrap();
        let (r_in, v_in) = c.state_at(59900.0, mu).unwrap();
        assert_relative_eq!(r_out.norm(), r_in.norm(), epsilon = 1e-10);
        assert!(r_out.dot(&v_out) > 0.0);
        assert!(r_in.dot(&v_in) < 0.0);
    }

    #[test]
    fn test_invalid_perihelion_distance() {
        let mut c = comet(1.0);
        c.perihelion_distance = 0.0;
        assert!(c.state_at(60010.0, GAUSS_GRAV_SQUARED).is_none());
        c.perihelion_distance = -1.0;
        assert!(c.state_at_perihelion(GAUSS_GRAV_SQUARED).is_none());
    }
}
