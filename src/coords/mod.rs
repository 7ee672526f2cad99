//! # Coordinate sources
//!
//! A [`CoordinateSource`] is anything that can be given an apparent right ascension and
//! declination at an instant, for an observer:
//!
//! | variant | defining data | apparent place |
//! |---------|---------------|----------------|
//! | [`Equatorial`](CoordinateSource::Equatorial) | mean place, pm, parallax | [`mean_to_apparent`](crate::astrometry::apparent::mean_to_apparent) |
//! | [`Planet`](CoordinateSource::Planet) | body | built-in [`ephemeris`](crate::ephemeris), topocentric |
//! | [`Elements`](CoordinateSource::Elements) | orbital elements | two-body propagation, topocentric |
//! | [`FixedAzEl`](CoordinateSource::FixedAzEl) | azimuth, elevation | follows the sky rotation |
//! | [`FixedHaDec`](CoordinateSource::FixedHaDec) | hour angle, declination | follows the sky rotation |
//! | [`Interpolated`](CoordinateSource::Interpolated) | two dated positions | linear |
//! | [`Calibration`](CoordinateSource::Calibration) | nothing | zenith placeholder |
//!
//! The observer and the instant are always passed in; a source never stores them. Without an
//! observer the Greenwich meridian on the equator is used (longitude 0, latitude 0) and solar
//! system bodies stay geocentric.
//!
//! Sources are usually built from a [`CoordSpec`] with [`CoordinateSource::from_spec`].
use hifitime::Epoch;

use crate::astrometry::apparent::apparent_to_mean;
use crate::astrometry::hadec_from_azel;
use crate::constants::{Radian, DPI, RADEG};
use crate::ephemeris::{planet_position, topocentric, BodyPosition, Planet};
use crate::observers::ObserverLocation;
use crate::orbit_type::ElementSet;
use crate::time::{local_sidereal_time, mjd_tt, mjd_utc};

pub mod equatorial;
pub mod interpolated;
pub mod spec;

pub use equatorial::{EquatorialSource, InputSystem};
pub use interpolated::InterpolatedSource;
pub use spec::CoordSpec;

/// Standard altitude of the Sun's upper limb at rise and set (refraction plus semi-diameter).
const SUN_HORIZON: Radian = -50.0 / 60.0 * RADEG;

/// Horizontal refraction used for the Moon, to which its semi-diameter is added.
const MOON_REFRACTION: Radian = 34.0 / 60.0 * RADEG;

/// Closed set of coordinate kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateSource {
    Equatorial(EquatorialSource),
    Planet(Planet),
    Elements(ElementSet),
    FixedAzEl { az: Radian, el: Radian },
    FixedHaDec { ha: Radian, dec: Radian },
    Interpolated(InterpolatedSource),
    Calibration,
}

/// Longitude and latitude of an optional observer, Greenwich equator by default.
pub(crate) fn site_of(observer: Option<&ObserverLocation>) -> (Radian, Radian) {
    observer.map_or((0.0, 0.0), |o| (o.longitude(), o.latitude()))
}

/// Local apparent sidereal time of an optional observer.
pub(crate) fn lst_of(instant: &Epoch, observer: Option<&ObserverLocation>) -> Radian {
    local_sidereal_time(instant, site_of(observer).0)
}

impl CoordinateSource {
    /// Short tag of the kind, as used in catalogs: `RADEC`, `PLANET`, `ELEMENTS`, `FIXED`,
    /// `INTERP` or `CAL`.
    pub fn type_tag(&self) -> &'static str {
        match self {
            CoordinateSource::Equatorial(_) => "RADEC",
            CoordinateSource::Planet(_) => "PLANET",
            CoordinateSource::Elements(_) => "ELEMENTS",
            CoordinateSource::FixedAzEl { .. } | CoordinateSource::FixedHaDec { .. } => "FIXED",
            CoordinateSource::Interpolated(_) => "INTERP",
            CoordinateSource::Calibration => "CAL",
        }
    }

    /// Sources tied to the observer's sky rather than to the celestial sphere never rise,
    /// set or transit.
    pub fn is_fixed_on_sky(&self) -> bool {
        matches!(
            self,
            CoordinateSource::FixedAzEl { .. } | CoordinateSource::FixedHaDec { .. }
        )
    }

    pub fn is_calibration(&self) -> bool {
        matches!(self, CoordinateSource::Calibration)
    }

    /// The body of a planet source.
    pub fn planet(&self) -> Option<Planet> {
        match self {
            CoordinateSource::Planet(p) => Some(*p),
            _ => None,
        }
    }

    /// Whether hour angles of this source are measured in solar rather than sidereal time.
    pub fn is_sun(&self) -> bool {
        self.planet() == Some(Planet::Sun)
    }

    pub fn is_moon(&self) -> bool {
        self.planet() == Some(Planet::Moon)
    }

    /// The coordinates the source was defined with.
    ///
    /// Return
    /// ------
    /// * Equatorial: the input pair in its own system.
    /// * FixedAzEl: `(az, el)`; FixedHaDec: `(ha, dec)`.
    /// * Interpolated: the first anchor.
    /// * `None` for planets, orbital elements and calibrations.
    pub fn native(&self) -> Option<(Radian, Radian)> {
        match self {
            CoordinateSource::Equatorial(eq) => Some(eq.native()),
            CoordinateSource::FixedAzEl { az, el } => Some((*az, *el)),
            CoordinateSource::FixedHaDec { ha, dec } => Some((*ha, *dec)),
            CoordinateSource::Interpolated(track) => Some((track.ra1, track.dec1)),
            CoordinateSource::Planet(_)
            | CoordinateSource::Elements(_)
            | CoordinateSource::Calibration => None,
        }
    }

    fn body_position(
        &self,
        instant: &Epoch,
        observer: Option<&ObserverLocation>,
    ) -> Option<BodyPosition> {
        let mjd = mjd_tt(instant);
        let geocentric = match self {
            CoordinateSource::Planet(planet) => planet_position(*planet, mjd)?,
            CoordinateSource::Elements(set) => set.apparent_position(mjd)?,
            _ => return None,
        };

        Some(match observer {
            Some(site) => topocentric(&geocentric, site, lst_of(instant, observer)),
            None => geocentric,
        })
    }

    /// Apparent `(ra, dec)` at `instant`, true equator and equinox of date.
    ///
    /// Return
    /// ------
    /// * `None` when no position is available: degenerate orbital elements or a failed
    ///   propagation.
    pub fn apparent(
        &self,
        instant: &Epoch,
        observer: Option<&ObserverLocation>,
    ) -> Option<(Radian, Radian)> {
        match self {
            CoordinateSource::Equatorial(eq) => Some(eq.apparent(mjd_tt(instant))),
            CoordinateSource::Planet(_) | CoordinateSource::Elements(_) => self
                .body_position(instant, observer)
                .map(|body| (body.ra, body.dec)),
            CoordinateSource::FixedAzEl { az, el } => {
                let (_, lat) = site_of(observer);
                let (ha, dec) = hadec_from_azel(*az, *el, lat);
                Some(((lst_of(instant, observer) - ha).rem_euclid(DPI), dec))
            }
            CoordinateSource::FixedHaDec { ha, dec } => {
                Some(((lst_of(instant, observer) - ha).rem_euclid(DPI), *dec))
            }
            CoordinateSource::Interpolated(track) => Some(track.apparent(mjd_utc(instant))),
            CoordinateSource::Calibration => {
                let (_, lat) = site_of(observer);
                Some((lst_of(instant, observer), lat))
            }
        }
    }

    /// Mean place J2000 at `instant`.
    ///
    /// Catalog sources return their stored place; every other kind is reduced back from its
    /// apparent place, ignoring proper motion and parallax.
    pub fn j2000(
        &self,
        instant: &Epoch,
        observer: Option<&ObserverLocation>,
    ) -> Option<(Radian, Radian)> {
        match self {
            CoordinateSource::Equatorial(eq) => Some(eq.j2000()),
            _ => {
                let (ra, dec) = self.apparent(instant, observer)?;
                Some(apparent_to_mean(ra, dec, mjd_tt(instant)))
            }
        }
    }

    /// Apparent angular diameter (radians); zero for everything but planets.
    pub fn diameter(&self, instant: &Epoch, observer: Option<&ObserverLocation>) -> Radian {
        match self {
            CoordinateSource::Planet(_) => self
                .body_position(instant, observer)
                .map_or(0.0, |body| body.diameter),
            _ => 0.0,
        }
    }

    /// Elevation of the horizon used for rise and set when none is requested.
    ///
    /// −50′ for the Sun, −(34′ + semi-diameter) for the Moon, the geometric horizon
    /// otherwise.
    pub fn default_horizon(&self, instant: &Epoch, observer: Option<&ObserverLocation>) -> Radian {
        match self.planet() {
            Some(Planet::Sun) => SUN_HORIZON,
            Some(Planet::Moon) => -(MOON_REFRACTION + self.diameter(instant, observer) / 2.0),
            _ => 0.0,
        }
    }
}
