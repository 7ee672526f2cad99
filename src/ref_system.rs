use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{Radian, DPI, MJD, T2000};
use crate::earth_orientation::{obleq, prec, rnut80};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefEpoch {
    J2000,
    Epoch(MJD),
}

impl RefEpoch {
    /// MJD (TT) of the epoch.
    pub fn date(&self) -> MJD {
        match *self {
            RefEpoch::J2000 => T2000,
            RefEpoch::Epoch(d) => d,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefSystem {
    // Equatorial mean: mean equator and equinox of the epoch
    // (corrected for precession but not for nutation)
    Equm(RefEpoch),
    // Equatorial true: true equator and equinox (precession + nutation)
    Equt(RefEpoch),
    // Ecliptic mean: mean ecliptic and equinox of the epoch
    Eclm(RefEpoch),
}

impl RefSystem {
    pub fn epoch(&self) -> RefEpoch {
        match *self {
            RefSystem::Equm(e) | RefSystem::Equt(e) | RefSystem::Eclm(e) => e,
        }
    }

    /// Matrix `H` with `x_self = H · x_hub`, the hub being the mean equator J2000.
    fn from_hub(&self) -> Matrix3<f64> {
        let date = self.epoch().date();
        let equm = prec(date).transpose();
        match self {
            RefSystem::Equm(_) => equm,
            RefSystem::Equt(_) => rnut80(date).transpose() * equm,
            RefSystem::Eclm(_) => rotmt(-obleq(date), 0) * equm,
        }
    }
}

/// Compute the rotation matrix between two celestial reference systems and epochs.
///
/// The supported systems are:
/// - `Equm`: equatorial mean (precession only)
/// - `Equt`: equatorial true (precession + nutation)
/// - `Eclm`: ecliptic mean (precession + obliquity)
///
/// Every system is related to the equatorial mean J2000 frame, and the result is the
/// composition of the two legs through it.
///
/// Arguments
/// ---------
/// * `ref_sys1`: source reference system and epoch.
/// * `ref_sys2`: target reference system and epoch.
///
/// Returns
/// -------
/// * `M` such that `x₁ = M · x₂`; use [`transform`] (or `M.transpose()`) to move a vector from
///   the source to the target system.
///
/// # See also
/// * [`prec`] – IAU 1976 precession matrix
/// * [`rnut80`] – IAU 1980 nutation model
/// * [`obleq`] – mean obliquity of the ecliptic
pub fn rotpn(ref_sys1: &RefSystem, ref_sys2: &RefSystem) -> Matrix3<f64> {
    if ref_sys1 == ref_sys2 {
        return Matrix3::identity();
    }
    ref_sys1.from_hub() * ref_sys2.from_hub().transpose()
}

/// Express the vector `v`, given in `from`, in the system `to`.
pub fn transform(v: &Vector3<f64>, from: &RefSystem, to: &RefSystem) -> Vector3<f64> {
    rotpn(from, to).transpose() * v
}

/// Active rotation matrix of angle `alpha` about the axis `k` (0 = X, 1 = Y, 2 = Z).
///
/// Any other axis index yields the identity.
pub fn rotmt(alpha: f64, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => return Matrix3::identity(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Convert a 3D Cartesian position vector to right ascension and declination.
///
/// Returns
/// --------
/// * Tuple `(α, δ, ρ)`:
///     - `α`: right ascension (or longitude) in radians, in the range [0, 2π).
///     - `δ`: declination (or latitude) in radians, in the range [−π/2, +π/2].
///     - `ρ`: Euclidean norm of the vector.
///
/// A zero vector yields `(0, 0, 0)`; a polar vector yields `α = 0`.
pub fn cartesian_to_radec(cartesian_position: Vector3<f64>) -> (Radian, Radian, f64) {
    let pos_norm = cartesian_position.norm();
    if pos_norm == 0. {
        return (0.0, 0.0, pos_norm);
    }

    let rxy = cartesian_position.x.hypot(cartesian_position.y);
    let delta = cartesian_position.z.atan2(rxy);
    if rxy == 0.0 {
        return (0.0, delta, pos_norm);
    }

    let alpha = cartesian_position.y.atan2(cartesian_position.x).rem_euclid(DPI);
    (alpha, delta, pos_norm)
}

/// Unit vector (scaled by `distance`) pointing at `(α, δ)`.
pub fn radec_to_cartesian(alpha: Radian, delta: Radian, distance: f64) -> Vector3<f64> {
    let (sa, ca) = alpha.sin_cos();
    let (sd, cd) = delta.sin_cos();
    Vector3::new(cd * ca, cd * sa, sd) * distance
}
