//! Galactic, supergalactic and ecliptic coordinate frames.
//!
//! The galactic frame is the IAU 1958 system expressed against FK5 J2000, the supergalactic
//! frame follows de Vaucouleurs (1976) as defined from galactic coordinates.
use nalgebra::Matrix3;

use crate::constants::{Radian, MJD};
use crate::ref_system::{cartesian_to_radec, radec_to_cartesian, transform, RefEpoch, RefSystem};

/// Rotation FK5 J2000 → galactic (`x_gal = M · x_j2000`).
#[rustfmt::skip]
const EQUATORIAL_TO_GALACTIC: [[f64; 3]; 3] = [
    [-0.054875539726, -0.873437108010, -0.483834985808],
    [ 0.494109453312, -0.444829589425,  0.746982251810],
    [-0.867666135858, -0.198076386122,  0.455983795705],
];

/// Rotation galactic → supergalactic (`x_sgal = M · x_gal`).
#[rustfmt::skip]
const GALACTIC_TO_SUPERGALACTIC: [[f64; 3]; 3] = [
    [-0.735742574804,  0.677261296414, 0.000000000000],
    [-0.074553778365, -0.080991471307, 0.993922590400],
    [ 0.673145302109,  0.731271165817, 0.110081262225],
];

fn rotation(rows: &[[f64; 3]; 3]) -> Matrix3<f64> {
    Matrix3::from_fn(|i, j| rows[i][j])
}

fn rotate(matrix: &Matrix3<f64>, lon: Radian, lat: Radian) -> (Radian, Radian) {
    let (lon, lat, _) = cartesian_to_radec(matrix * radec_to_cartesian(lon, lat, 1.0));
    (lon, lat)
}

/// FK5 J2000 `(ra, dec)` → galactic `(l, b)`.
pub fn equatorial_to_galactic(ra: Radian, dec: Radian) -> (Radian, Radian) {
    rotate(&rotation(&EQUATORIAL_TO_GALACTIC), ra, dec)
}

/// Galactic `(l, b)` → FK5 J2000 `(ra, dec)`.
pub fn galactic_to_equatorial(l: Radian, b: Radian) -> (Radian, Radian) {
    rotate(&rotation(&EQUATORIAL_TO_GALACTIC).transpose(), l, b)
}

/// Galactic `(l, b)` → supergalactic `(sgl, sgb)`.
pub fn galactic_to_supergalactic(l: Radian, b: Radian) -> (Radian, Radian) {
    rotate(&rotation(&GALACTIC_TO_SUPERGALACTIC), l, b)
}

/// Supergalactic `(sgl, sgb)` → galactic `(l, b)`.
pub fn supergalactic_to_galactic(sgl: Radian, sgb: Radian) -> (Radian, Radian) {
    rotate(&rotation(&GALACTIC_TO_SUPERGALACTIC).transpose(), sgl, sgb)
}

/// Mean ecliptic of `epoch` `(λ, β)` → FK5 J2000 `(ra, dec)`.
pub fn ecliptic_to_equatorial(lon: Radian, lat: Radian, epoch: MJD) -> (Radian, Radian) {
    let v = transform(
        &radec_to_cartesian(lon, lat, 1.0),
        &RefSystem::Eclm(RefEpoch::Epoch(epoch)),
        &RefSystem::Equm(RefEpoch::J2000),
    );
    let (ra, dec, _) = cartesian_to_radec(v);
    (ra, dec)
}

/// FK5 J2000 `(ra, dec)` → mean ecliptic of `epoch` `(λ, β)`.
pub fn equatorial_to_ecliptic(ra: Radian, dec: Radian, epoch: MJD) -> (Radian, Radian) {
    let v = transform(
        &radec_to_cartesian(ra, dec, 1.0),
        &RefSystem::Equm(RefEpoch::J2000),
        &RefSystem::Eclm(RefEpoch::Epoch(epoch)),
    );
    let (lon, lat, _) = cartesian_to_radec(v);
    (lon, lat)
}
