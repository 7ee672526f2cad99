//! FK4 (B1950) ↔ FK5 (J2000) for sources with no proper motion in FK5.
//!
//! Follows the Standish/Aoki transformation: the E-terms of aberration are removed, the
//! position is rotated into the FK5 system and the fictitious FK4 proper motion accumulated
//! between the Besselian epoch and J2000 is applied.
use nalgebra::{Matrix3, Vector3};

use crate::constants::{Radian, DAYS_PER_BESSELIAN_YEAR, DAYS_PER_JULIAN_YEAR, DPI, T2000};
use crate::ref_system::{cartesian_to_radec, radec_to_cartesian};

/// Radians per year to arcsec per century.
const PMF: f64 = 100.0 * 60.0 * 60.0 * 360.0 / DPI;

/// E-terms of aberration and their rate of change (per tropical century).
const E_TERMS: [f64; 3] = [-1.62557e-6, -0.31919e-6, -0.13843e-6];
const E_TERMS_RATE: [f64; 3] = [1.245e-3, -1.580e-3, -0.659e-3];

/// Position part of the 6×3 FK4 → FK5 matrix.
#[rustfmt::skip]
const POSITION_ROTATION: [[f64; 3]; 3] = [
    [ 0.9999256782, -0.0111820611, -0.0048579477],
    [ 0.0111820610,  0.9999374784, -0.0000271765],
    [ 0.0048579479, -0.0000271474,  0.9999881997],
];

/// Velocity part of the 6×3 FK4 → FK5 matrix.
#[rustfmt::skip]
const VELOCITY_ROTATION: [[f64; 3]; 3] = [
    [-0.000551, -0.238565,  0.435739],
    [ 0.238514, -0.002667, -0.008541],
    [-0.435623,  0.012254,  0.002117],
];

fn matrix(rows: &[[f64; 3]; 3]) -> Matrix3<f64> {
    Matrix3::from_fn(|i, j| rows[i][j])
}

/// MJD of a Besselian epoch.
pub fn epb2d(besselian_epoch: f64) -> f64 {
    15019.81352 + (besselian_epoch - 1900.0) * DAYS_PER_BESSELIAN_YEAR
}

/// Julian epoch of an MJD.
pub fn epj(mjd: f64) -> f64 {
    2000.0 + (mjd - T2000) / DAYS_PER_JULIAN_YEAR
}

/// Convert an FK4 B1950 position, at the Besselian epoch `epoch`, to FK5 J2000 assuming zero
/// proper motion in FK5.
///
/// Arguments
/// ---------
/// * `ra1950`, `dec1950`: FK4 position (radians).
/// * `epoch`: Besselian epoch of the observation, usually 1950.0.
///
/// Return
/// ------
/// * `(ra2000, dec2000)`, radians, RA in `[0, 2π)`.
pub fn fk45z(ra1950: Radian, dec1950: Radian, epoch: f64) -> (Radian, Radian) {
    let r0 = radec_to_cartesian(ra1950, dec1950, 1.0);

    let w = (epoch - 1950.0) / PMF;
    let a1 = Vector3::from(E_TERMS) + Vector3::from(E_TERMS_RATE) * w;

    let v1 = r0 - a1 + r0 * r0.dot(&a1);

    let position = matrix(&POSITION_ROTATION) * v1;
    let velocity = matrix(&VELOCITY_ROTATION) * v1;

    let w = (epj(epb2d(epoch)) - 2000.0) / PMF;
    let (ra, dec, _) = cartesian_to_radec(position + velocity * w);
    (ra, dec)
}

/// Inverse of [`fk45z`], by fixed-point iteration on the forward transform.
pub fn fk54z(ra2000: Radian, dec2000: Radian, epoch: f64) -> (Radian, Radian) {
    let target = radec_to_cartesian(ra2000, dec2000, 1.0);
    let mut guess = target;

    for _ in 0..10 {
        let (ra_g, dec_g, _) = cartesian_to_radec(guess);
        let (ra_f, dec_f) = fk45z(ra_g, dec_g, epoch);
        let residual = target - radec_to_cartesian(ra_f, dec_f, 1.0);
        if residual.norm() < 1e-15 {
            break;
        }
        guess = (guess + residual).normalize();
    }

    let (ra, dec, _) = cartesian_to_radec(guess);
    (ra, dec)
}
