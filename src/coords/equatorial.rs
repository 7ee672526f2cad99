//! Catalog sources with a fixed mean place.
//!
//! Input coordinates may be given in any of the systems of [`InputSystem`]; they are converted
//! once, at construction, to FK5 J2000 which is what the apparent-place reduction consumes.
//! The original pair is kept for [`EquatorialSource::native`].
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::astrometry::apparent::mean_to_apparent;
use crate::astrometry::fk4::fk45z;
use crate::astrometry::frames::{
    ecliptic_to_equatorial, galactic_to_equatorial, supergalactic_to_galactic,
};
use crate::astrometry::ProperMotion;
use crate::constants::{ArcSec, Radian, MJD, T2000};
use crate::obsplan_errors::ObsPlanError;

/// Coordinate system of a catalog position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InputSystem {
    /// FK5, mean equator and equinox J2000.
    #[default]
    J2000,
    /// FK4, mean equator and equinox B1950.
    B1950,
    Galactic,
    Supergalactic,
    /// Mean ecliptic and equinox J2000.
    Ecliptic,
}

impl InputSystem {
    pub fn name(&self) -> &'static str {
        match self {
            InputSystem::J2000 => "J2000",
            InputSystem::B1950 => "B1950",
            InputSystem::Galactic => "GALACTIC",
            InputSystem::Supergalactic => "SUPERGALACTIC",
            InputSystem::Ecliptic => "ECLIPTIC",
        }
    }

    /// Whether positions in this system are longitudes and latitudes rather than RA/Dec.
    pub fn is_spherical_lon_lat(&self) -> bool {
        !matches!(self, InputSystem::J2000 | InputSystem::B1950)
    }
}

impl fmt::Display for InputSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InputSystem {
    type Err = ObsPlanError;

    /// Accepts the usual spellings: `J2000`, `ICRS`, `FK5`, `B1950`, `FK4`, `GAL`,
    /// `GALACTIC`, `SUPERGAL`, `SUPERGALACTIC`, `ECL`, `ECLIPTIC`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "J2000" | "ICRS" | "FK5" | "RADEC" => Ok(InputSystem::J2000),
            "B1950" | "FK4" => Ok(InputSystem::B1950),
            "GAL" | "GALACTIC" => Ok(InputSystem::Galactic),
            "SUPERGAL" | "SUPERGALACTIC" => Ok(InputSystem::Supergalactic),
            "ECL" | "ECLIPTIC" => Ok(InputSystem::Ecliptic),
            _ => Err(ObsPlanError::UnknownCoordinateType(s.to_string())),
        }
    }
}

/// A catalog position with optional proper motion and parallax.
#[derive(Debug, Clone, PartialEq)]
pub struct EquatorialSource {
    ra2000: Radian,
    dec2000: Radian,
    pm: ProperMotion,
    parallax: ArcSec,
    system: InputSystem,
    native: (Radian, Radian),
}

impl EquatorialSource {
    /// Build a source from a position in `system`.
    ///
    /// Arguments
    /// ---------
    /// * `lon`, `lat`: RA/Dec for the equatorial systems, longitude/latitude otherwise
    ///   (radians).
    /// * `system`: input coordinate system.
    ///
    /// B1950 input is converted with [`fk45z`] at epoch B1950, i.e. assuming no proper motion
    /// in FK5.
    pub fn new(lon: Radian, lat: Radian, system: InputSystem) -> Self {
        let (ra2000, dec2000) = match system {
            InputSystem::J2000 => (lon, lat),
            InputSystem::B1950 => fk45z(lon, lat, 1950.0),
            InputSystem::Galactic => galactic_to_equatorial(lon, lat),
            InputSystem::Supergalactic => {
                let (l, b) = supergalactic_to_galactic(lon, lat);
                galactic_to_equatorial(l, b)
            }
            InputSystem::Ecliptic => ecliptic_to_equatorial(lon, lat, T2000),
        };

        EquatorialSource {
            ra2000,
            dec2000,
            pm: ProperMotion::default(),
            parallax: 0.0,
            system,
            native: (lon, lat),
        }
    }

    /// Attach a proper motion (arcsec/yr, RA component as `μα·cos δ`).
    pub fn with_proper_motion(mut self, pm: ProperMotion) -> Self {
        self.pm = pm;
        self
    }

    /// Attach an annual parallax (arcsec).
    pub fn with_parallax(mut self, parallax: ArcSec) -> Self {
        self.parallax = parallax;
        self
    }

    /// FK5 J2000 mean place.
    pub fn j2000(&self) -> (Radian, Radian) {
        (self.ra2000, self.dec2000)
    }

    pub fn system(&self) -> InputSystem {
        self.system
    }

    /// Position as it was supplied, in [`EquatorialSource::system`].
    pub fn native(&self) -> (Radian, Radian) {
        self.native
    }

    pub fn proper_motion(&self) -> ProperMotion {
        self.pm
    }

    pub fn parallax(&self) -> ArcSec {
        self.parallax
    }

    /// Apparent place at `mjd_tt` (geocentric, true equator and equinox of date).
    pub fn apparent(&self, mjd_tt: MJD) -> (Radian, Radian) {
        mean_to_apparent(self.ra2000, self.dec2000, &self.pm, self.parallax, mjd_tt)
    }
}

#[cfg(test)]
mod equatorial_test {
    use super::*;
    use crate::astrometry::apparent::apparent_to_mean;
    use crate::constants::{RADEG, RADH, RADSEC};
    use crate::conversion::parse_sexagesimal;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_system_names() {
        assert_eq!("fk4".parse::<InputSystem>(), Ok(InputSystem::B1950));
        assert_eq!(" Gal ".parse::<InputSystem>(), Ok(InputSystem::Galactic));
        assert_eq!(
            "AZEL".parse::<InputSystem>(),
            Err(ObsPlanError::UnknownCoordinateType("AZEL".into()))
        );
        assert!(InputSystem::Ecliptic.is_spherical_lon_lat());
    }

    #[test]
    fn test_b1950_input() {
        let ra = parse_sexagesimal("15:22:33.3").unwrap() * RADH;
        let dec = parse_sexagesimal("-0:13:04.5").unwrap() * RADEG;
        let source = EquatorialSource::new(ra, dec, InputSystem::B1950);

        let (ra2000, dec2000) = source.j2000();
        assert_abs_diff_eq!(ra2000, parse_sexagesimal("15:25:07.35").unwrap() * RADH, epsilon = 0.15 * RADSEC);
        assert_abs_diff_eq!(dec2000, parse_sexagesimal("-0:23:35.76").unwrap() * RADEG, epsilon = 0.01 * RADSEC);
        assert_eq!(source.native(), (ra, dec));
    }

    #[test]
    fn test_apparent_round_trip() {
        let source = EquatorialSource::new(3.2, -0.4, InputSystem::J2000);
        let mjd = 58849.0;
        let (ra_app, dec_app) = source.apparent(mjd);
        let (ra, dec) = apparent_to_mean(ra_app, dec_app, mjd);
        assert_abs_diff_eq!(ra, 3.2, epsilon = 1e-10);
        assert_abs_diff_eq!(dec, -0.4, epsilon = 1e-10);
    }

    #[test]
    fn test_galactic_centre_input() {
        let source = EquatorialSource::new(0.0, 0.0, InputSystem::Galactic);
        let (ra, dec) = source.j2000();
        assert_abs_diff_eq!(ra / RADEG, 266.40500, epsilon = 1e-4);
        assert_abs_diff_eq!(dec / RADEG, -28.93617, epsilon = 1e-4);
    }
}
