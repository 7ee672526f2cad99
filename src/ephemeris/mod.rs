//! # Solar-system ephemerides
//!
//! Low-precision apparent places for the Sun, the Moon and the major planets, good to a few
//! arcseconds for the Sun, about 0.3° for the Moon and about an arcminute for the planets
//! between 1800 and 2050. That is plenty for rise/set and visibility computations; it is not
//! an astrometric ephemeris.
//!
//! ## Frames
//!
//! Heliocentric vectors are produced in the mean ecliptic J2000, converted to the mean
//! equator J2000 and then reduced to the true equator of date by
//! [`apparent_from_geocentric`](crate::astrometry::apparent::apparent_from_geocentric).
//! The Moon is computed directly in the ecliptic of date.
//!
//! ## Topocentric places
//!
//! [`topocentric`] removes the diurnal parallax of an observer, which matters for the Moon
//! (up to a degree) and not much else.
pub mod moon;
pub mod planets;
pub mod sun;

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::astrometry::apparent::apparent_from_geocentric;
use crate::constants::{Kilometer, Radian, AU, ERAU, LIGHT_TIME_AU, MJD};
use crate::observers::ObserverLocation;
use crate::obsplan_errors::ObsPlanError;
use crate::ref_system::{cartesian_to_radec, radec_to_cartesian, transform, RefEpoch, RefSystem};

/// Bodies with a built-in ephemeris.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Planet {
    Sun,
    Mercury,
    Venus,
    Moon,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Planet {
    pub const ALL: [Planet; 10] = [
        Planet::Sun,
        Planet::Mercury,
        Planet::Venus,
        Planet::Moon,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Pluto,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Planet::Sun => "sun",
            Planet::Mercury => "mercury",
            Planet::Venus => "venus",
            Planet::Moon => "moon",
            Planet::Mars => "mars",
            Planet::Jupiter => "jupiter",
            Planet::Saturn => "saturn",
            Planet::Uranus => "uranus",
            Planet::Neptune => "neptune",
            Planet::Pluto => "pluto",
        }
    }

    /// Mean equatorial radius in kilometres.
    pub fn radius(&self) -> Kilometer {
        match self {
            Planet::Sun => 696_000.0,
            Planet::Mercury => 2_439.7,
            Planet::Venus => 6_051.8,
            Planet::Moon => 1_737.4,
            Planet::Mars => 3_396.2,
            Planet::Jupiter => 71_492.0,
            Planet::Saturn => 60_268.0,
            Planet::Uranus => 25_559.0,
            Planet::Neptune => 24_764.0,
            Planet::Pluto => 1_188.3,
        }
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Planet {
    type Err = ObsPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Planet::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| ObsPlanError::UnknownPlanet(s.to_string()))
    }
}

/// Apparent place of a solar-system body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPosition {
    /// Right ascension, true equator and equinox of date (radians).
    pub ra: Radian,
    /// Declination, true equator of date (radians).
    pub dec: Radian,
    /// Distance from the centre of the Earth (or from the observer once topocentric), AU.
    pub distance: f64,
    /// Apparent angular diameter (radians).
    pub diameter: Radian,
}

/// Angular diameter of a sphere of `radius` km seen from `distance` AU.
pub(crate) fn angular_diameter(radius: Kilometer, distance: f64) -> Radian {
    2.0 * (radius / (distance * AU)).atan()
}

/// Geocentric position (mean equator J2000, AU) of a body whose heliocentric mean ecliptic
/// J2000 position is given by `heliocentric`, corrected for one light-time iteration.
///
/// `None` is propagated from `heliocentric`.
pub(crate) fn geocentric_light_time<F>(mjd_tt: MJD, heliocentric: F) -> Option<Vector3<f64>>
where
    F: Fn(MJD) -> Option<Vector3<f64>>,
{
    let to_equatorial = |v: Vector3<f64>| {
        transform(
            &v,
            &RefSystem::Eclm(RefEpoch::J2000),
            &RefSystem::Equm(RefEpoch::J2000),
        )
    };

    let earth = sun::earth_position(mjd_tt);
    let geometric = to_equatorial(heliocentric(mjd_tt)?) - earth;
    let emitted = mjd_tt - geometric.norm() * LIGHT_TIME_AU;
    Some(to_equatorial(heliocentric(emitted)?) - earth)
}

/// Apparent geocentric place of a built-in body.
///
/// Arguments
/// ---------
/// * `planet`: the body.
/// * `mjd_tt`: date (TT).
///
/// Return
/// ------
/// * A [`BodyPosition`] on the true equator of date; diameters use the mean radius of the
///   body (the Moon's comes from its horizontal parallax).
/// * `None` if the orbital propagation of a planet fails, which only happens for dates so
///   far from J2000 that the mean elements become meaningless.
pub fn planet_position(planet: Planet, mjd_tt: MJD) -> Option<BodyPosition> {
    match planet {
        Planet::Moon => Some(moon::moon_position(mjd_tt)),
        Planet::Sun => {
            let geocentric = -sun::earth_position(mjd_tt);
            let (ra, dec, distance) = apparent_from_geocentric(&geocentric, mjd_tt);
            Some(BodyPosition {
                ra,
                dec,
                distance,
                diameter: angular_diameter(planet.radius(), distance),
            })
        }
        _ => planets::planet_apparent(planet, mjd_tt),
    }
}

/// Shift a geocentric apparent place to the observer's position on the Earth.
///
/// Arguments
/// ---------
/// * `position`: geocentric apparent place.
/// * `observer`: site, through its geocentric parallax coordinates (ρ·cosφ′, ρ·sinφ′).
/// * `lst`: local apparent sidereal time (radians).
pub fn topocentric(position: &BodyPosition, observer: &ObserverLocation, lst: Radian) -> BodyPosition {
    let (rho_cos_phi, rho_sin_phi) = observer.parallax_coords();
    let site = Vector3::new(
        rho_cos_phi * lst.cos(),
        rho_cos_phi * lst.sin(),
        rho_sin_phi,
    ) * ERAU;

    let body = radec_to_cartesian(position.ra, position.dec, position.distance);
    let (ra, dec, distance) = cartesian_to_radec(body - site);

    BodyPosition {
        ra,
        dec,
        distance,
        diameter: position.diameter * position.distance / distance,
    }
}
