//! Time sampling of a source's horizon coordinates.
//!
//! [`sweep`] steps a fixed increment through a window and records, at each instant, the
//! azimuth, elevation, parallactic angle and local sidereal time. It is the building block
//! for elevation plots and visibility windows.
use hifitime::Epoch;
use log::debug;

use crate::astrometry::{azel, parallactic_angle};
use crate::constants::{Radian, Second};
use crate::coords::{lst_of, site_of, CoordinateSource};
use crate::observers::ObserverLocation;
use crate::obsplan_errors::ObsPlanError;
use crate::time::{offset_seconds, seconds_between};

/// Position of a source at one step of a [`sweep`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub time: Epoch,
    /// Azimuth, north through east.
    pub az: Radian,
    pub el: Radian,
    /// Parallactic angle.
    pub pa: Radian,
    /// Local apparent sidereal time.
    pub lst: Radian,
}

/// Walk `source` from `start` to `end` every `increment` seconds.
///
/// `end` is included when it falls exactly on a step. Steps where the source has no apparent
/// position are skipped.
///
/// Errors
/// ------
/// * [`ObsPlanError::InvalidIncrement`] when `increment` is not strictly positive.
///
/// Return
/// ------
/// * An empty vector when `end` is before `start`.
pub fn sweep(
    source: &CoordinateSource,
    observer: Option<&ObserverLocation>,
    start: &Epoch,
    end: &Epoch,
    increment: Second,
) -> Result<Vec<SamplePoint>, ObsPlanError> {
    if !(increment > 0.0) {
        return Err(ObsPlanError::InvalidIncrement(increment));
    }

    let span = seconds_between(start, end);
    if span < 0.0 {
        return Ok(Vec::new());
    }

    let (_, lat) = site_of(observer);
    let steps = (span / increment).floor() as usize;

    let points: Vec<SamplePoint> = (0..=steps)
        .filter_map(|k| {
            let time = offset_seconds(start, increment * k as f64);
            let (ra, dec) = source.apparent(&time, observer)?;
            let lst = lst_of(&time, observer);
            let (az, el) = azel(lst - ra, dec, lat);
            Some(SamplePoint {
                time,
                az,
                el,
                pa: parallactic_angle(lst - ra, dec, lat),
                lst,
            })
        })
        .collect();

    debug!("sweep produced {} of {} points", points.len(), steps + 1);
    Ok(points)
}

#[cfg(test)]
mod sampler_test {
    use super::*;
    use crate::coords::{EquatorialSource, InputSystem};
    use approx::assert_abs_diff_eq;

    fn start() -> Epoch {
        Epoch::from_unix_seconds(1000436215.0)
    }

    fn star() -> CoordinateSource {
        CoordinateSource::Equatorial(EquatorialSource::new(4.0, 0.1, InputSystem::J2000))
    }

    #[test]
    fn test_inclusive_end() {
        let site = ObserverLocation::from_name("JCMT").unwrap();
        let end = offset_seconds(&start(), 3600.0);

        let points = sweep(&star(), Some(&site), &start(), &end, 600.0).unwrap();
        assert_eq!(points.len(), 7);
        assert_eq!(points[0].time, start());
        assert_eq!(points[6].time, end);

        let points = sweep(&star(), Some(&site), &start(), &end, 700.0).unwrap();
        assert_eq!(points.len(), 6);
        assert!(seconds_between(&points[5].time, &end) > 0.0);
    }

    #[test]
    fn test_points_match_direct_projection() {
        let site = ObserverLocation::from_name("JCMT").unwrap();
        let end = offset_seconds(&start(), 7200.0);
        let source = star();

        for point in sweep(&source, Some(&site), &start(), &end, 1800.0).unwrap() {
            let (ra, dec) = source.apparent(&point.time, Some(&site)).unwrap();
            let (az, el) = azel(point.lst - ra, dec, site.latitude());
            assert_abs_diff_eq!(point.az, az, epsilon = 1e-12);
            assert_abs_diff_eq!(point.el, el, epsilon = 1e-12);
            assert_abs_diff_eq!(point.lst, lst_of(&point.time, Some(&site)), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_degenerate_ranges() {
        let end = offset_seconds(&start(), -60.0);
        assert!(sweep(&star(), None, &start(), &end, 10.0).unwrap().is_empty());

        let single = sweep(&star(), None, &start(), &start(), 10.0).unwrap();
        assert_eq!(single.len(), 1);

        for increment in [0.0, -5.0] {
            assert_eq!(
                sweep(&star(), None, &start(), &start(), increment),
                Err(ObsPlanError::InvalidIncrement(increment))
            );
        }
        assert!(matches!(
            sweep(&star(), None, &start(), &start(), f64::NAN),
            Err(ObsPlanError::InvalidIncrement(_))
        ));
    }
}
