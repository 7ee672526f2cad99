//! Time-instant helpers and sidereal time.
//!
//! Instants are plain [`hifitime::Epoch`] values. The helpers below give the handful of views
//! the rest of the crate needs (UTC and TT modified Julian dates, Unix seconds, signed second
//! offsets) and the local sidereal time of an observer.
use hifitime::{Epoch, Unit};
use log::warn;

use crate::constants::{Radian, DPI, MJD, T2000};
use crate::earth_orientation::equequ;

/// Modified Julian Date of an instant, UTC scale.
pub fn mjd_utc(epoch: &Epoch) -> MJD {
    epoch.to_mjd_utc_days()
}

/// Modified Julian Date of an instant, TT scale.
pub fn mjd_tt(epoch: &Epoch) -> MJD {
    epoch.to_mjd_tt_days()
}

/// Seconds elapsed since 1970-01-01T00:00:00 UTC.
pub fn epoch_seconds(epoch: &Epoch) -> f64 {
    epoch.to_unix_seconds()
}

/// Build an instant from Unix seconds (UTC).
pub fn from_epoch_seconds(seconds: f64) -> Epoch {
    Epoch::from_unix_seconds(seconds)
}

/// Shift an instant by a signed (possibly fractional) number of seconds.
pub fn offset_seconds(epoch: &Epoch, seconds: f64) -> Epoch {
    *epoch + Unit::Second * seconds
}

/// Signed number of seconds from `from` to `to`.
pub fn seconds_between(from: &Epoch, to: &Epoch) -> f64 {
    (*to - *from).to_seconds()
}

/// Current wall-clock instant.
///
/// Falls back to J2000 (with a warning) when the system clock cannot be read.
pub fn now() -> Epoch {
    match Epoch::now() {
        Ok(epoch) => epoch,
        Err(err) => {
            warn!("system clock unavailable ({err}), falling back to J2000");
            Epoch::from_mjd_utc(T2000)
        }
    }
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982/2000 polynomial formula
/// for the mean sidereal time at 0h UT1, plus the fractional-day
/// correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # References
/// * IAU 1982, IERS Conventions 1996/2000.
/// * Explanatory Supplement to the Astronomical Almanac (1992).
pub fn gmst(tjm: f64) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    // GMST at 0h UT1, seconds → radians
    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / 86400.0;

    // rotation accumulated during the fraction of the day
    let h = (tjm - itjm) * DPI;

    (gmst0 + h * RAP).rem_euclid(DPI)
}

/// Local apparent sidereal time of an observer, in `[0, 2π)`.
///
/// GMST is evaluated on the UTC date (UT1 − UTC is neglected), the equation of the equinoxes
/// on the TT date, and the east-positive longitude is added.
///
/// Arguments
/// ---------
/// * `epoch`: instant of interest.
/// * `longitude`: geodetic longitude in radians, east positive (0 for Greenwich).
pub fn local_sidereal_time(epoch: &Epoch, longitude: Radian) -> Radian {
    (gmst(mjd_utc(epoch)) + equequ(mjd_tt(epoch)) + longitude).rem_euclid(DPI)
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gmst() {
        let tut = 57028.478514610404;
        assert_relative_eq!(gmst(tut), 4.851925725092499, epsilon = 1e-12);

        assert_relative_eq!(gmst(T2000), 4.894961212789145, epsilon = 1e-12);
    }

    #[test]
    fn test_epoch_views() {
        let epoch = Epoch::from_gregorian_utc_hms(2021, 1, 1, 0, 0, 0);
        assert_relative_eq!(mjd_utc(&epoch), 59215.0, epsilon = 1e-9);
        // TT - UTC = 37 + 32.184 s in 2021
        assert_relative_eq!(
            (mjd_tt(&epoch) - mjd_utc(&epoch)) * 86400.0,
            69.184,
            epsilon = 1e-3
        );
        assert_relative_eq!(epoch_seconds(&epoch), 1609459200.0, epsilon = 1e-6);
    }

    #[test]
    fn test_offsets() {
        let start = from_epoch_seconds(1000436215.0);
        let later = offset_seconds(&start, -1234.5);
        assert_relative_eq!(seconds_between(&start, &later), -1234.5, epsilon = 1e-6);
        assert_relative_eq!(epoch_seconds(&later), 1000436215.0 - 1234.5, epsilon = 1e-6);
    }

    #[test]
    fn test_lst_adds_longitude() {
        let epoch = from_epoch_seconds(1000436215.0);
        let greenwich = local_sidereal_time(&epoch, 0.0);
        let east = local_sidereal_time(&epoch, 1.0);
        assert!((0.0..DPI).contains(&greenwich));
        assert_relative_eq!((east - greenwich).rem_euclid(DPI), 1.0, epsilon = 1e-12);
    }
}
