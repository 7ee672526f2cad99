//! Two-body propagation.
//!
//! The universal-variable formulation (Goodyear/Stumpff functions) handles elliptic,
//! parabolic and hyperbolic orbits with the same Newton iteration; [`propagate`] wraps it
//! into Lagrange `f` and `g` functions. [`solve_kepler`] is the classical elliptic solver used
//! by the planetary mean elements.
use nalgebra::Vector3;

use super::constants::DPI;
use std::f64::consts::PI;

/// Stumpff-like functions `s0..s3` of the universal anomaly `psi` for `alpha = 2E`.
fn s_funct(psi: f64, alpha: f64) -> (f64, f64, f64, f64) {
    const JMAX: usize = 70;
    const HALFMAX: usize = 30;
    const BETACONTR: f64 = 100.0;

    let epsilon = f64::EPSILON;
    let contr = 100.0 * epsilon;
    let overfl = 1.0 / epsilon;

    let beta = alpha * psi.powi(2);
    let mut s0: f64;
    let mut s1: f64;
    let mut s2: f64;
    let mut s3: f64;

    if beta.abs() < BETACONTR {
        // direct series for s2 and s3
        let mut term2 = psi.powi(2) / 2.0;
        let mut term3 = term2 * psi / 3.0;
        s2 = term2;
        s3 = term3;

        for j in 1..=JMAX {
            term2 *= beta / ((2.0 * j as f64 + 1.0) * (2.0 * j as f64 + 2.0));
            s2 += term2;
            if term2.abs() < contr || term2.abs() > overfl {
                break;
            }
        }

        for j in 1..=JMAX {
            term3 *= beta / ((2.0 * j as f64 + 2.0) * (2.0 * j as f64 + 3.0));
            s3 += term3;
            if term3.abs() < contr || term3.abs() > overfl {
                break;
            }
        }

        s1 = psi + alpha * s3;
        s0 = 1.0 + alpha * s2;
    } else {
        // halve psi until the series converges, then double back
        let mut psi2 = psi;
        let mut nhalf = 0;

        for _ in 0..HALFMAX {
            psi2 *= 0.5;
            nhalf += 1;
            let beta_half = alpha * psi2.powi(2);
            if beta_half.abs() < BETACONTR {
                break;
            }
        }

        let mut term0 = 1.0;
        let mut term1 = psi2;
        s0 = 1.0;
        s1 = psi2;

        for j in 1..=JMAX {
            term0 *= beta / ((2 * j - 1) as f64 * (2 * j) as f64);
            s0 += term0;
            if term0.abs() < contr || term0.abs() > overfl {
                break;
            }
        }

        for j in 1..=JMAX {
            term1 *= beta / ((2 * j) as f64 * (2 * j + 1) as f64);
            s1 += term1;
            if term1.abs() < contr || term1.abs() > overfl {
                break;
            }
        }

        for _ in 0..nhalf {
            let s02 = 2.0 * s0.powi(2) - 1.0;
            let s12 = 2.0 * s0 * s1;
            s0 = s02;
            s1 = s12;
        }

        s3 = (s1 - psi) / alpha;
        s2 = (s0 - 1.0) / alpha;
    }

    (s0, s1, s2, s3)
}

/// Principal value of an angle in `[0, 2π)`.
fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Difference `a - b` reduced to `[-π, π]`.
fn angle_diff(a: f64, b: f64) -> f64 {
    let a = principal_angle(a);
    let b = principal_angle(b);

    let mut diff = a - b;
    if diff > PI {
        diff -= DPI;
    } else if diff < -PI {
        diff += DPI;
    }

    diff
}

/// First guess of the universal anomaly.
///
/// The elliptic and hyperbolic branches start from the classical eccentric anomaly solution;
/// the parabolic branch (`alpha == 0`) starts from `dt / r0` and leaves the work to Newton.
fn prelim_kepuni(
    dt: f64,
    r0: f64,
    sig0: f64,
    mu: f64,
    alpha: f64,
    e0: f64,
    contr: f64,
) -> Option<(f64, f64)> {
    const ITX: usize = 20;

    let psi = if alpha < 0.0 {
        let a0 = -mu / alpha;
        let enne = (-alpha.powi(3)).sqrt() / mu;
        let (u0, u) = if e0 < contr {
            (0.0, enne * dt)
        } else {
            let cosu0 = (1.0 - r0 / a0) / e0;
            let mut u0 = if cosu0.abs() <= 1.0 {
                cosu0.acos()
            } else if cosu0 >= 1.0 {
                0.0
            } else {
                PI
            };

            if sig0 < 0.0 {
                u0 = -u0;
            }

            u0 = principal_angle(u0);
            let ell0 = principal_angle(u0 - e0 * u0.sin());
            let mut u = PI;
            let ell = principal_angle(ell0 + enne * dt);

            for _ in 0..ITX {
                let du = -(u - e0 * u.sin() - ell) / (1.0 - e0 * u.cos());
                u += du;
                if du.abs() < contr * 1e3 {
                    break;
                }
            }
            (u0, u)
        };

        angle_diff(u, u0) / (-alpha).sqrt()
    } else if alpha > 0.0 {
        let a0 = -mu / alpha;
        let enne = alpha.powi(3).sqrt() / mu;
        let coshf0 = (1.0 - r0 / a0) / e0;
        let mut f0 = if coshf0 > 1.0 {
            (coshf0 + (coshf0.powi(2) - 1.0).sqrt()).ln()
        } else {
            0.0
        };

        if sig0 < 0.0 {
            f0 = -f0;
        }

        let ell0 = e0 * f0.sinh() - f0;
        let mut f: f64 = 0.0;
        let ell = ell0 + enne * dt;

        for _ in 0..ITX {
            if f.abs() < 15.0 {
                let df = -(e0 * f.sinh() - f - ell) / (e0 * f.cosh() - 1.0);
                let ff = f + df;
                f = if f * ff < 0.0 { f / 2.0 } else { ff };
            } else {
                f /= 2.0;
            }
            if f.abs() < contr * 1e3 {
                break;
            }
        }

        (f - f0) / alpha.sqrt()
    } else {
        dt / r0
    };

    if psi.is_finite() {
        Some((psi, alpha))
    } else {
        None
    }
}

/// Solve the universal Kepler equation `r0·s1 + σ0·s2 + μ·s3 = dt` by Newton iteration.
///
/// Return
/// ------
/// * `Some((psi, s0, s1, s2, s3))`, or `None` if the iteration diverges or exhausts its budget.
fn solve_kepuni(
    dt: f64,
    r0: f64,
    sig0: f64,
    mu: f64,
    alpha: f64,
    e0: f64,
) -> Option<(f64, f64, f64, f64, f64)> {
    const JMAX: usize = 100;
    let epsilon = f64::EPSILON;
    let contr = 100.0 * epsilon;

    let (mut psi, alpha) = prelim_kepuni(dt, r0, sig0, mu, alpha, e0, contr)?;

    for _ in 0..JMAX {
        let (s0, s1, s2, s3) = s_funct(psi, alpha);

        let fun = r0 * s1 + sig0 * s2 + mu * s3 - dt;
        let funp = r0 * s0 + sig0 * s1 + mu * s2;

        let dpsi = -fun / funp;

        if s3.abs() > 1e-2 / epsilon || !dpsi.is_finite() {
            return None;
        }

        let psi1 = psi + dpsi;
        psi = if psi1 * psi < 0.0 { psi / 2.0 } else { psi1 };

        if dpsi.abs() < contr || dpsi.abs() < contr * 10.0 * psi.abs() {
            return Some((psi, s0, s1, s2, s3));
        }
    }

    None
}

/// Propagate a two-body state by `dt`.
///
/// Arguments
/// ---------
/// * `r0`, `v0`: initial position and velocity (any consistent length/time units).
/// * `dt`: propagation interval, same time unit as `v0`.
/// * `mu`: gravitational parameter in the same units.
///
/// Return
/// ------
/// * `Some((r, v))` at `t0 + dt`, or `None` when the universal Kepler equation cannot be
///   solved (degenerate state or non-convergence).
pub fn propagate(
    r0: &Vector3<f64>,
    v0: &Vector3<f64>,
    dt: f64,
    mu: f64,
) -> Option<(Vector3<f64>, Vector3<f64>)> {
    let r0n = r0.norm();
    if r0n == 0.0 || mu <= 0.0 {
        return None;
    }
    if dt == 0.0 {
        return Some((*r0, *v0));
    }

    let sig0 = r0.dot(v0);
    let alpha = v0.norm_squared() - 2.0 * mu / r0n;
    // rounding noise around a parabola
    let alpha = if alpha.abs() < 1e-12 * mu / r0n { 0.0 } else { alpha };
    let e_vec = ((v0.norm_squared() - mu / r0n) * r0 - sig0 * v0) / mu;

    // bound elliptic intervals to half a period either side
    let dt = if alpha < 0.0 {
        let period = DPI * mu / (-alpha).powf(1.5);
        dt - period * (dt / period).round()
    } else {
        dt
    };

    let (_, s0, s1, s2, s3) = solve_kepuni(dt, r0n, sig0, mu, alpha, e_vec.norm())?;

    let f = 1.0 - mu * s2 / r0n;
    let g = dt - mu * s3;
    let r = f * r0 + g * v0;

    let rn = r0n * s0 + sig0 * s1 + mu * s2;
    if rn <= 0.0 {
        return None;
    }
    let fdot = -mu * s1 / (rn * r0n);
    let gdot = 1.0 - mu * s2 / rn;

    Some((r, fdot * r0 + gdot * v0))
}

/// Solve the elliptic Kepler equation `E - e·sin E = M` for the eccentric anomaly.
///
/// Return
/// ------
/// * `Some(E)` in radians, or `None` when `e` is outside `[0, 1)` or Newton fails.
pub fn solve_kepler(mean_anomaly: f64, e: f64) -> Option<f64> {
    const ITX: usize = 50;
    const TOL: f64 = 1e-14;

    if !(0.0..1.0).contains(&e) {
        return None;
    }

    let m = angle_diff(mean_anomaly, 0.0);
    let mut ecc_anomaly = if e > 0.8 { PI.copysign(m) } else { m + e * m.sin() };

    for _ in 0..ITX {
        let delta =
            (ecc_anomaly - e * ecc_anomaly.sin() - m) / (1.0 - e * ecc_anomaly.cos());
        ecc_anomaly -= delta;
        if delta.abs() < TOL {
            return Some(ecc_anomaly);
        }
    }

    None
}
