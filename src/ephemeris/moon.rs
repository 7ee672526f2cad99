//! Low-precision lunar theory (*Astronomical Almanac*, section D).
//!
//! Six terms in longitude, four in latitude and in horizontal parallax: about 0.3° in position
//! and 0.2% in distance, valid for a few centuries around J2000.
use crate::constants::{MJD, RADEG, T2000};
use crate::constants::{AU, EARTH_MAJOR_AXIS};
use crate::ephemeris::BodyPosition;
use crate::ref_system::{cartesian_to_radec, radec_to_cartesian, transform, RefEpoch, RefSystem};

/// Ratio of the lunar radius to the Earth's equatorial radius.
const MOON_RADIUS_RATIO: f64 = 0.2724;

/// Periodic term `amplitude · sin(phase + rate·T)` with angles in degrees.
struct LunarTerm {
    amplitude: f64,
    phase: f64,
    rate: f64,
}

const fn term(amplitude: f64, phase: f64, rate: f64) -> LunarTerm {
    LunarTerm {
        amplitude,
        phase,
        rate,
    }
}

#[rustfmt::skip]
const LONGITUDE: [LunarTerm; 6] = [
    term( 6.29, 135.0,  477198.87),
    term(-1.27, 259.3, -413335.36),
    term( 0.66, 235.7,  890534.22),
    term( 0.21, 269.9,  954397.74),
    term(-0.19, 357.5,   35999.05),
    term(-0.11, 186.5,  966404.03),
];

#[rustfmt::skip]
const LATITUDE: [LunarTerm; 4] = [
    term( 5.13,  93.3,  483202.02),
    term( 0.28, 228.2,  960400.89),
    term(-0.28, 318.3,    6003.15),
    term(-0.17, 217.6, -407332.21),
];

/// Cosine terms of the horizontal parallax.
#[rustfmt::skip]
const PARALLAX: [LunarTerm; 4] = [
    term(0.0518, 134.9,  477198.85),
    term(0.0095, 259.2, -413335.38),
    term(0.0078, 235.7,  890534.23),
    term(0.0028, 269.9,  954397.70),
];

fn sum_sin(terms: &[LunarTerm], t: f64) -> f64 {
    terms
        .iter()
        .map(|k| k.amplitude * ((k.phase + k.rate * t) * RADEG).sin())
        .sum()
}

fn sum_cos(terms: &[LunarTerm], t: f64) -> f64 {
    terms
        .iter()
        .map(|k| k.amplitude * ((k.phase + k.rate * t) * RADEG).cos())
        .sum()
}

/// Geocentric ecliptic longitude, latitude (mean equinox of date) and horizontal parallax of
/// the Moon, all in radians.
pub fn moon_ecliptic(mjd_tt: MJD) -> (f64, f64, f64) {
    let t = (mjd_tt - T2000) / 36525.0;

    let lon = 218.32 + 481267.881 * t + sum_sin(&LONGITUDE, t);
    let lat = sum_sin(&LATITUDE, t);
    let parallax = 0.9508 + sum_cos(&PARALLAX, t);

    (lon * RADEG, lat * RADEG, parallax * RADEG)
}

/// Apparent geocentric place of the Moon.
///
/// The ecliptic place is rotated to the true equator of date; aberration is ignored, the
/// theory being far coarser.
pub fn moon_position(mjd_tt: MJD) -> BodyPosition {
    let (lon, lat, parallax) = moon_ecliptic(mjd_tt);

    let of_date = RefEpoch::Epoch(mjd_tt);
    let equatorial = transform(
        &radec_to_cartesian(lon, lat, 1.0),
        &RefSystem::Eclm(of_date),
        &RefSystem::Equt(of_date),
    );
    let (ra, dec, _) = cartesian_to_radec(equatorial);

    BodyPosition {
        ra,
        dec,
        distance: EARTH_MAJOR_AXIS / 1000.0 / parallax.sin() / AU,
        diameter: 2.0 * MOON_RADIUS_RATIO * parallax,
    }
}
