//! Low-precision solar theory (Meeus, *Astronomical Algorithms*, ch. 25).
//!
//! Accurate to about 0.01°, which is a few seconds of time on sunrise/sunset. The same theory
//! provides the heliocentric state of the Earth used for annual parallax, aberration and the
//! orbital velocity correction.
use nalgebra::Vector3;

use crate::constants::{AU, KmPerSec, MJD, RADEG, SECONDS_PER_DAY, T2000};
use crate::ref_system::{radec_to_cartesian, transform, RefEpoch, RefSystem};

/// Geometric ecliptic longitude of the Sun (mean equinox of date, radians) and its distance
/// from the Earth (AU).
pub fn sun_geometric(mjd_tt: MJD) -> (f64, f64) {
    let t = (mjd_tt - T2000) / 36525.0;

    let l0 = 280.46646 + t * (36000.76983 + t * 0.0003032);
    let m = (357.52911 + t * (35999.05029 - t * 0.0001537)) * RADEG;
    let e = 0.016708634 - t * (0.000042037 + t * 0.0000001267);

    let c = (1.914602 - t * (0.004817 + t * 0.000014)) * m.sin()
        + (0.019993 - t * 0.000101) * (2.0 * m).sin()
        + 0.000289 * (3.0 * m).sin();

    let true_longitude = (l0 + c) * RADEG;
    let nu = m + c * RADEG;
    let radius = 1.000001018 * (1.0 - e * e) / (1.0 + e * nu.cos());

    (true_longitude, radius)
}

/// Heliocentric position of the Earth in AU, mean equator and equinox J2000.
pub fn earth_position(mjd_tt: MJD) -> Vector3<f64> {
    let (lon, radius) = sun_geometric(mjd_tt);
    let ecliptic_of_date = radec_to_cartesian(lon + std::f64::consts::PI, 0.0, radius);
    transform(
        &ecliptic_of_date,
        &RefSystem::Eclm(RefEpoch::Epoch(mjd_tt)),
        &RefSystem::Equm(RefEpoch::J2000),
    )
}

/// Heliocentric position (AU) and velocity (km/s) of the Earth, mean equator J2000.
///
/// The velocity is a central difference of [`earth_position`] over ±0.01 day.
pub fn earth_heliocentric(mjd_tt: MJD) -> (Vector3<f64>, Vector3<KmPerSec>) {
    const HALF_STEP: f64 = 0.01;

    let position = earth_position(mjd_tt);
    let velocity_au_day = (earth_position(mjd_tt + HALF_STEP)
        - earth_position(mjd_tt - HALF_STEP))
        / (2.0 * HALF_STEP);

    (position, velocity_au_day * (AU / SECONDS_PER_DAY))
}
