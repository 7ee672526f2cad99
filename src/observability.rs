//! Telescope observability check.
//!
//! Alt-azimuth mounts use strict elevation bounds: a source sitting exactly on `el_min` or
//! `el_max` is not observable. Equatorial mounts use inclusive hour-angle and declination
//! bounds. Hour angles are taken in `(-180°, 180°]` before comparison.
use hifitime::Epoch;
use log::debug;

use crate::angle::AngleRange;
use crate::astrometry::azel;
use crate::constants::{Degree, RADEG};
use crate::coords::{lst_of, CoordinateSource};
use crate::observers::observatories::TelescopeLimits;
use crate::observers::ObserverLocation;

fn within(value: Degree, min: Degree, max: Degree) -> bool {
    (min..=max).contains(&value)
}

fn strictly_within(value: Degree, min: Degree, max: Degree) -> bool {
    min < value && value < max
}

/// Whether `source` can be pointed at from `observer` at `instant`.
///
/// Return
/// ------
/// * `true` for calibrations, whatever the site.
/// * `false` without an observer, for a site with unknown limits, or when the source has no
///   apparent position.
pub fn is_observable(
    source: &CoordinateSource,
    observer: Option<&ObserverLocation>,
    instant: &Epoch,
) -> bool {
    if source.is_calibration() {
        return true;
    }
    let Some(site) = observer else {
        return false;
    };
    let Some((ra, dec)) = source.apparent(instant, observer) else {
        return false;
    };
    let ha = AngleRange::SignedPi.normalize(lst_of(instant, observer) - ra);

    match site.limits() {
        TelescopeLimits::AzEl { el_min, el_max } => {
            let (_, el) = azel(ha, dec, site.latitude());
            strictly_within(el / RADEG, el_min, el_max)
        }
        TelescopeLimits::HaDec {
            ha_min,
            ha_max,
            dec_min,
            dec_max,
        } => within(ha / RADEG, ha_min, ha_max) && within(dec / RADEG, dec_min, dec_max),
        TelescopeLimits::Unknown => {
            debug!("no telescope limits for {:?}", site.name());
            false
        }
    }
}
