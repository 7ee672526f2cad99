//! Earth orientation: obliquity, nutation, precession and the equation of the equinoxes.
//!
//! The models are the classical IAU 1976 precession and IAU 1980 nutation. Nutation is
//! evaluated from the largest terms of the 1980 series; the truncation error stays well below
//! 0.01″, far under the arcsecond-level needs of rise/set and pointing computations.
use nalgebra::Matrix3;

use crate::{
    constants::{ArcSec, Radian, RADEG, RADSEC, T2000},
    ref_system::rotmt,
};

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in radians.
///
/// Formula
/// -------
/// ```text
/// ε(t) = ε₀ + ε₁·T + ε₂·T² + ε₃·T³,  T = (tjm - T2000) / 36525
/// ```
/// evaluated with Horner's scheme, coefficients in arcseconds.
pub fn obleq(tjm: f64) -> Radian {
    const OB0: f64 = 84381.448;
    const OB1: f64 = -46.815;
    const OB2: f64 = -0.0006;
    const OB3: f64 = 0.00181;

    let t = (tjm - T2000) / 36525.0;

    (((OB3 * t + OB2) * t + OB1) * t + OB0) * RADSEC
}

/// One periodic term of the IAU 1980 nutation series.
///
/// Multipliers of (l, l', F, D, Ω), then the longitude and obliquity amplitudes in units of
/// 0.0001″ with their secular rates per Julian century.
struct NutationTerm {
    args: [i8; 5],
    psi: f64,
    psi_t: f64,
    eps: f64,
    eps_t: f64,
}

const fn term(args: [i8; 5], psi: f64, psi_t: f64, eps: f64, eps_t: f64) -> NutationTerm {
    NutationTerm {
        args,
        psi,
        psi_t,
        eps,
        eps_t,
    }
}

#[rustfmt::skip]
const NUTATION_1980: [NutationTerm; 48] = [
    term([ 0,  0,  0,  0, 1], -171996.0, -174.2, 92025.0,  8.9),
    term([ 0,  0,  2, -2, 2],  -13187.0,   -1.6,  5736.0, -3.1),
    term([ 0,  0,  2,  0, 2],   -2274.0,   -0.2,   977.0, -0.5),
    term([ 0,  0,  0,  0, 2],    2062.0,    0.2,  -895.0,  0.5),
    term([ 0,  1,  0,  0, 0],    1426.0,   -3.4,    54.0, -0.1),
    term([ 1,  0,  0,  0, 0],     712.0,    0.1,    -7.0,  0.0),
    term([ 0,  1,  2, -2, 2],    -517.0,    1.2,   224.0, -0.6),
    term([ 0,  0,  2,  0, 1],    -386.0,   -0.4,   200.0,  0.0),
    term([ 1,  0,  2,  0, 2],    -301.0,    0.0,   129.0, -0.1),
    term([ 0, -1,  2, -2, 2],     217.0,   -0.5,   -95.0,  0.3),
    term([ 1,  0,  0, -2, 0],    -158.0,    0.0,     0.0,  0.0),
    term([ 0,  0,  2, -2, 1],     129.0,    0.1,   -70.0,  0.0),
    term([-1,  0,  2,  0, 2],     123.0,    0.0,   -53.0,  0.0),
    term([ 1,  0,  0,  0, 1],      63.0,    0.1,   -33.0,  0.0),
    term([ 0,  0,  0,  2, 0],      63.0,    0.0,     0.0,  0.0),
    term([-1,  0,  2,  2, 2],     -59.0,    0.0,    26.0,  0.0),
    term([-1,  0,  0,  0, 1],     -58.0,   -0.1,    32.0,  0.0),
    term([ 1,  0,  2,  0, 1],     -51.0,    0.0,    27.0,  0.0),
    term([ 2,  0,  0, -2, 0],      48.0,    0.0,     1.0,  0.0),
    term([-2,  0,  2,  0, 1],      46.0,    0.0,   -24.0,  0.0),
    term([ 0,  0,  2,  2, 2],     -38.0,    0.0,    16.0,  0.0),
    term([ 2,  0,  2,  0, 2],     -31.0,    0.0,    13.0,  0.0),
    term([ 2,  0,  0,  0, 0],      29.0,    0.0,    -1.0,  0.0),
    term([ 1,  0,  2, -2, 2],      29.0,    0.0,   -12.0,  0.0),
    term([ 0,  0,  2,  0, 0],      26.0,    0.0,    -1.0,  0.0),
    term([ 0,  0,  2, -2, 0],     -22.0,    0.0,     0.0,  0.0),
    term([-1,  0,  2,  0, 1],      21.0,    0.0,   -10.0,  0.0),
    term([ 0,  2,  0,  0, 0],      17.0,   -0.1,     0.0,  0.0),
    term([ 0,  2,  2, -2, 2],     -16.0,    0.1,     7.0,  0.0),
    term([-1,  0,  0,  2, 1],      16.0,    0.0,    -8.0,  0.0),
    term([ 0,  1,  0,  0, 1],     -15.0,    0.0,     9.0,  0.0),
    term([ 1,  0,  0, -2, 1],     -13.0,    0.0,     7.0,  0.0),
    term([ 0, -1,  0,  0, 1],     -12.0,    0.0,     6.0,  0.0),
    term([ 2,  0, -2,  0, 0],      11.0,    0.0,     0.0,  0.0),
    term([-1,  0,  2,  2, 1],     -10.0,    0.0,     5.0,  0.0),
    term([ 1,  0,  2,  2, 2],      -8.0,    0.0,     3.0,  0.0),
    term([ 0, -1,  2,  0, 2],      -7.0,    0.0,     3.0,  0.0),
    term([ 0,  0,  2,  2, 1],      -7.0,    0.0,     3.0,  0.0),
    term([ 1,  1,  0, -2, 0],      -7.0,    0.0,     0.0,  0.0),
    term([ 0,  1,  2,  0, 2],       7.0,    0.0,    -3.0,  0.0),
    term([-2,  0,  0,  2, 1],      -6.0,    0.0,     3.0,  0.0),
    term([ 0,  0,  0,  2, 1],      -6.0,    0.0,     3.0,  0.0),
    term([ 2,  0,  2, -2, 2],       6.0,    0.0,    -3.0,  0.0),
    term([ 1,  0,  0,  2, 0],       6.0,    0.0,     0.0,  0.0),
    term([ 1,  0,  2, -2, 1],       6.0,    0.0,    -3.0,  0.0),
    term([ 0,  0,  0, -2, 1],      -5.0,    0.0,     3.0,  0.0),
    term([ 0, -1,  2, -2, 1],      -5.0,    0.0,     3.0,  0.0),
    term([ 2,  0,  2,  0, 1],      -5.0,    0.0,     3.0,  0.0),
];

/// Fundamental lunisolar arguments (l, l', F, D, Ω) in radians, IAU 1980 expressions.
fn fundamental_arguments(t: f64) -> [f64; 5] {
    let poly = |c0: f64, c1: f64, c2: f64, c3: f64| (((c3 * t + c2) * t + c1) * t + c0) * RADSEC;
    [
        poly(485866.733, 1717915922.633, 31.310, 0.064),
        poly(1287099.804, 129596581.224, -0.577, -0.012),
        poly(335778.877, 1739527263.137, -13.257, 0.011),
        poly(1072261.307, 1602961601.328, -6.891, 0.019),
        poly(450160.280, -6962890.539, 7.455, 0.008),
    ]
}

/// Compute the nutation angles in longitude and obliquity using the IAU 1980 (Wahr) model.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (in TT time scale).
///
/// Returns
/// --------
/// * A tuple `(Δψ, Δε)` in **arcseconds**.
pub fn nutn80(tjm: f64) -> (ArcSec, ArcSec) {
    let t = (tjm - T2000) / 36525.0;
    let fa = fundamental_arguments(t);

    let (dpsi, deps) = NUTATION_1980.iter().fold((0.0, 0.0), |(dpsi, deps), row| {
        let arg: f64 = row
            .args
            .iter()
            .zip(fa.iter())
            .map(|(&k, &a)| f64::from(k) * a)
            .sum();
        (
            dpsi + (row.psi + row.psi_t * t) * arg.sin(),
            deps + (row.eps + row.eps_t * t) * arg.cos(),
        )
    });

    (dpsi * 1e-4, deps * 1e-4)
}

/// Nutation matrix between the mean and true equator of date.
///
/// Returns `N` such that `x_mean = N · x_true`, built as `Rx(ε) · Rz(-Δψ) · Rx(-ε-Δε)` with
/// active rotations.
pub fn rnut80(tjm: f64) -> Matrix3<f64> {
    let epsm = obleq(tjm);
    let (dpsi, deps) = nutn80(tjm);
    let epst = epsm + deps * RADSEC;

    rotmt(epsm, 0) * rotmt(-dpsi * RADSEC, 2) * rotmt(-epst, 0)
}

/// Equation of the equinoxes `Δψ·cos(ε)` in radians (apparent minus mean sidereal time).
///
/// # Arguments
/// * `tjm` - Modified Julian Date (TT)
pub fn equequ(tjm: f64) -> f64 {
    let (dpsi, _deps) = nutn80(tjm);
    RADSEC * dpsi * obleq(tjm).cos()
}

/// Precession matrix of the IAU 1976 theory.
///
/// Returns `P` such that `x_J2000 = P · x_mean(tjm)`, i.e. `Rz(-ζ) · Ry(θ) · Rz(-z)` with
/// active rotations and the angles
///
/// ```text
/// ζ(T) = (0.6406161 + 0.0000839·T + 0.0000050·T²) · T  [deg]
/// θ(T) = (0.5567530 - 0.0001185·T - 0.0000116·T²) · T  [deg]
/// z(T) = (0.6406161 + 0.0003041·T + 0.0000051·T²) · T  [deg]
/// ```
pub fn prec(tjm: f64) -> Matrix3<f64> {
    let t = (tjm - T2000) / 36525.0;

    let zeta = ((0.0000050 * t + 0.0000839) * t + 0.6406161) * t * RADEG;
    let z = ((0.0000051 * t + 0.0003041) * t + 0.6406161) * t * RADEG;
    let theta = ((-0.0000116 * t - 0.0001185) * t + 0.5567530) * t * RADEG;

    rotmt(-zeta, 2) * rotmt(theta, 1) * rotmt(-z, 2)
}
