//! # Spherical astrometry
//!
//! Pure functions shared by every coordinate source:
//!
//! - [`azel`] / [`hadec_from_azel`] – equatorial ↔ horizon transform at a given latitude.
//! - [`parallactic_angle`] and [`airmass`] – observing geometry.
//! - [`tangent_plane_offset`] – gnomonic projection around a reference point.
//! - [`apparent`] – mean place (J2000) → apparent place of date and back.
//! - [`fk4`] – FK4 B1950 ↔ FK5 J2000 without proper motion.
//! - [`frames`] – galactic, supergalactic and ecliptic conversions.
//!
//! Conventions: all angles in radians, azimuth measured from north through east, hour angle
//! positive to the west of the meridian.
pub mod apparent;
pub mod fk4;
pub mod frames;

use crate::constants::{Radian, DPI};

/// Proper motion of a catalog source in arcseconds per Julian year.
///
/// `ra` is the on-sky rate `μα·cos δ`.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ProperMotion {
    pub ra: f64,
    pub dec: f64,
}

impl ProperMotion {
    pub fn new(ra: f64, dec: f64) -> Self {
        ProperMotion { ra, dec }
    }

    pub fn is_zero(&self) -> bool {
        self.ra == 0.0 && self.dec == 0.0
    }
}

/// Convert hour angle / declination to azimuth / elevation.
///
/// Arguments
/// ---------
/// * `ha`: hour angle (radians, positive west).
/// * `dec`: declination (radians).
/// * `lat`: observer latitude (radians). Poles are allowed and give degenerate azimuths.
///
/// Return
/// ------
/// * `(az, el)` with `az` in `[0, 2π)` measured from north through east.
pub fn azel(ha: Radian, dec: Radian, lat: Radian) -> (Radian, Radian) {
    let (sh, ch) = ha.sin_cos();
    let (sd, cd) = dec.sin_cos();
    let (sp, cp) = lat.sin_cos();

    let x = -ch * cd * sp + sd * cp;
    let y = -sh * cd;
    let z = ch * cd * cp + sd * sp;

    let az = y.atan2(x).rem_euclid(DPI);
    let el = z.atan2(x.hypot(y));
    (az, el)
}

/// Inverse of [`azel`]: returns `(ha, dec)` with `ha` in `(-π, π]`.
pub fn hadec_from_azel(az: Radian, el: Radian, lat: Radian) -> (Radian, Radian) {
    let (sa, ca) = az.sin_cos();
    let (se, ce) = el.sin_cos();
    let (sp, cp) = lat.sin_cos();

    let x = -ca * ce * sp + se * cp;
    let y = -sa * ce;
    let z = ca * ce * cp + se * sp;

    let ha = y.atan2(x);
    let dec = z.atan2(x.hypot(y));
    (ha, dec)
}

/// Parallactic angle of a source: the position angle of the zenith measured at the source.
pub fn parallactic_angle(ha: Radian, dec: Radian, lat: Radian) -> Radian {
    let (sh, ch) = ha.sin_cos();
    let (sd, cd) = dec.sin_cos();
    let (sp, cp) = lat.sin_cos();
    (sh * cp).atan2(sp * cd - cp * sd * ch)
}

/// Air mass for a zenith distance, using Hardie's (1962) polynomial in `sec z - 1`.
///
/// The zenith distance is capped at 1.52 rad (about 87°), beyond which the polynomial is
/// meaningless.
pub fn airmass(zenith_distance: Radian) -> f64 {
    let seczm1 = 1.0 / zenith_distance.abs().min(1.52).cos() - 1.0;
    1.0 + seczm1 * (0.9981833 - seczm1 * (0.002875 + 0.0008083 * seczm1))
}

/// Gnomonic projection of `(ra, dec)` onto the plane tangent at `(ra0, dec0)`.
///
/// Return
/// ------
/// * `Some((ξ, η))` in radians of the tangent plane, or `None` when the point lies 90° or
///   more from the tangent point.
pub fn tangent_plane_offset(
    ra: Radian,
    dec: Radian,
    ra0: Radian,
    dec0: Radian,
) -> Option<(f64, f64)> {
    const TINY: f64 = 1e-6;

    let (sdz, cdz) = dec0.sin_cos();
    let (sd, cd) = dec.sin_cos();
    let (sr, cr) = (ra - ra0).sin_cos();

    let denom = sd * sdz + cd * cdz * cr;
    if denom <= TINY {
        return None;
    }

    Some((cd * sr / denom, (sd * cdz - cd * sdz * cr) / denom))
}
