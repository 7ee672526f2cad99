//! Mean place ↔ apparent place.
//!
//! The forward reduction of a catalog position (mean equator J2000) to the true equator and
//! equinox of date applies, in order:
//!
//! 1. proper motion, as a linear space motion over the Julian years since J2000,
//! 2. annual parallax, from the heliocentric position of the Earth,
//! 3. annual aberration (relativistic form), from the heliocentric velocity of the Earth,
//! 4. precession (IAU 1976) and nutation (IAU 1980) through [`rotpn`](crate::ref_system::rotpn).
//!
//! Gravitational light deflection is not modelled (below 0.01″ away from the Sun's limb).
use nalgebra::Vector3;

use crate::astrometry::ProperMotion;
use crate::constants::{ArcSec, KmPerSec, Radian, DAYS_PER_JULIAN_YEAR, MJD, RADSEC, T2000, VLIGHT};
use crate::ephemeris::sun::earth_heliocentric;
use crate::ref_system::{cartesian_to_radec, radec_to_cartesian, transform, RefEpoch, RefSystem};

fn j2000() -> RefSystem {
    RefSystem::Equm(RefEpoch::J2000)
}

fn true_of_date(mjd_tt: MJD) -> RefSystem {
    RefSystem::Equt(RefEpoch::Epoch(mjd_tt))
}

/// Relativistic stellar aberration of a unit vector for an observer moving at `velocity`.
pub fn aberrate(direction: &Vector3<f64>, velocity: &Vector3<KmPerSec>) -> Vector3<f64> {
    let beta = velocity / VLIGHT;
    let inv_gamma = (1.0 - beta.norm_squared()).sqrt();
    let p_beta = direction.dot(&beta);
    ((inv_gamma * direction + (1.0 + p_beta / (1.0 + inv_gamma)) * beta) / (1.0 + p_beta))
        .normalize()
}

/// Remove the aberration applied by [`aberrate`] (fixed-point inversion).
pub fn unaberrate(apparent: &Vector3<f64>, velocity: &Vector3<KmPerSec>) -> Vector3<f64> {
    let mut direction = *apparent;
    for _ in 0..5 {
        let residual = apparent - aberrate(&direction, velocity);
        direction = (direction + residual).normalize();
    }
    direction
}

/// Apply aberration and precession-nutation to a geocentric vector given in mean J2000.
///
/// Used by the solar-system bodies, whose geometric position already includes light time.
///
/// Return
/// ------
/// * `(ra, dec, distance)` on the true equator of date, distance in the input unit.
pub fn apparent_from_geocentric(geocentric: &Vector3<f64>, mjd_tt: MJD) -> (Radian, Radian, f64) {
    let (_, earth_velocity) = earth_heliocentric(mjd_tt);
    let distance = geocentric.norm();
    let direction = aberrate(&geocentric.normalize(), &earth_velocity);
    let of_date = transform(&direction, &j2000(), &true_of_date(mjd_tt));
    let (ra, dec, _) = cartesian_to_radec(of_date);
    (ra, dec, distance)
}

/// Reduce a mean J2000 catalog place to the apparent place of date.
///
/// Arguments
/// ---------
/// * `ra`, `dec`: mean place, equator and equinox J2000 (radians).
/// * `pm`: proper motion (arcsec/yr, on-sky RA rate).
/// * `parallax`: annual parallax (arcsec).
/// * `mjd_tt`: date of observation (TT).
///
/// Return
/// ------
/// * `(ra_app, dec_app)` in radians, true equator and equinox of date.
pub fn mean_to_apparent(
    ra: Radian,
    dec: Radian,
    pm: &ProperMotion,
    parallax: ArcSec,
    mjd_tt: MJD,
) -> (Radian, Radian) {
    let (earth_position, earth_velocity) = earth_heliocentric(mjd_tt);

    let mut direction = radec_to_cartesian(ra, dec, 1.0);

    if !pm.is_zero() {
        let years = (mjd_tt - T2000) / DAYS_PER_JULIAN_YEAR;
        let (sa, ca) = ra.sin_cos();
        let (sd, cd) = dec.sin_cos();
        let east = Vector3::new(-sa, ca, 0.0);
        let north = Vector3::new(-sd * ca, -sd * sa, cd);
        direction += (east * pm.ra + north * pm.dec) * RADSEC * years;
    }

    if parallax != 0.0 {
        direction -= earth_position * parallax * RADSEC;
    }

    let direction = aberrate(&direction.normalize(), &earth_velocity);
    let of_date = transform(&direction, &j2000(), &true_of_date(mjd_tt));
    let (ra_app, dec_app, _) = cartesian_to_radec(of_date);
    (ra_app, dec_app)
}

/// Inverse of [`mean_to_apparent`] for a source without proper motion or parallax.
pub fn apparent_to_mean(ra_app: Radian, dec_app: Radian, mjd_tt: MJD) -> (Radian, Radian) {
    let (_, earth_velocity) = earth_heliocentric(mjd_tt);
    let of_date = radec_to_cartesian(ra_app, dec_app, 1.0);
    let aberrated = transform(&of_date, &true_of_date(mjd_tt), &j2000());
    let (ra, dec, _) = cartesian_to_radec(unaberrate(&aberrated, &earth_velocity));
    (ra, dec)
}
