//! Building a [`CoordinateSource`] from loosely specified fields.
//!
//! A [`CoordSpec`] collects every field a caller (or a JSON catalog) may supply. Angles are
//! text: sexagesimal (`"15:22:33.3"`, `"-0 13 04.5"`) or decimal. Right ascensions and hour
//! angles are read in hours, every other angle in degrees.
//!
//! [`CoordinateSource::from_spec`] picks the first matching kind in this order:
//!
//! 1. `planet`
//! 2. `elements`
//! 3. interpolated (`mjd1`, `ra1`, `dec1`, `mjd2`, `ra2`, `dec2`)
//! 4. typed equatorial (`ra`/`dec` or `long`/`lat`, with an optional `type`)
//! 5. fixed (`az`/`el`, or `ha`/`dec` with `type = "HADEC"`)
//! 6. calibration, when nothing positional was given
//!
//! Overlapping field sets are legal and resolved by this order.
use serde::{Deserialize, Serialize};

use crate::astrometry::ProperMotion;
use crate::constants::{ArcSec, Radian, MJD, RADEG, RADH};
use crate::conversion::parse_sexagesimal;
use crate::coords::{CoordinateSource, EquatorialSource, InputSystem, InterpolatedSource};
use crate::ephemeris::Planet;
use crate::obsplan_errors::ObsPlanError;
use crate::orbit_type::{ElementSet, OrbitalElementsInput};

/// Optional-field description of a coordinate source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordSpec {
    pub name: Option<String>,

    pub planet: Option<String>,
    pub elements: Option<OrbitalElementsInput>,

    pub mjd1: Option<MJD>,
    pub ra1: Option<String>,
    pub dec1: Option<String>,
    pub mjd2: Option<MJD>,
    pub ra2: Option<String>,
    pub dec2: Option<String>,

    pub ra: Option<String>,
    pub dec: Option<String>,
    pub long: Option<String>,
    pub lat: Option<String>,
    /// Input system (`J2000`, `B1950`, `GALACTIC`, ...) or `HADEC` for a fixed hour angle.
    #[serde(rename = "type")]
    pub coord_type: Option<String>,
    /// Proper motion `[μα·cos δ, μδ]` in arcsec/yr.
    pub pm: Option<Vec<f64>>,
    pub parallax: Option<ArcSec>,

    pub az: Option<String>,
    pub el: Option<String>,
    pub ha: Option<String>,
}

fn hours(text: &str) -> Result<Radian, ObsPlanError> {
    Ok(parse_sexagesimal(text)? * RADH)
}

fn degrees(text: &str) -> Result<Radian, ObsPlanError> {
    Ok(parse_sexagesimal(text)? * RADEG)
}

impl CoordSpec {
    /// Spec of a catalog position in `system`, with RA in hours and Dec in degrees (or
    /// longitude and latitude in degrees for the non-equatorial systems).
    pub fn radec(ra: &str, dec: &str, system: &str) -> Self {
        CoordSpec {
            ra: Some(ra.to_string()),
            dec: Some(dec.to_string()),
            coord_type: Some(system.to_string()),
            ..Default::default()
        }
    }

    pub fn planet(name: &str) -> Self {
        CoordSpec {
            planet: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    fn has_hadec_type(&self) -> bool {
        self.coord_type
            .as_deref()
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("HADEC"))
    }

    fn is_interpolated(&self) -> bool {
        self.mjd1.is_some()
            && self.ra1.is_some()
            && self.dec1.is_some()
            && self.mjd2.is_some()
            && self.ra2.is_some()
            && self.dec2.is_some()
    }

    fn is_positional(&self) -> bool {
        [
            &self.ra, &self.dec, &self.long, &self.lat, &self.az, &self.el, &self.ha, &self.ra1,
            &self.dec1, &self.ra2, &self.dec2, &self.coord_type,
        ]
        .iter()
        .any(|field| field.is_some())
            || self.mjd1.is_some()
            || self.mjd2.is_some()
    }

    fn proper_motion(&self) -> Result<ProperMotion, ObsPlanError> {
        match self.pm.as_deref() {
            None => Ok(ProperMotion::default()),
            Some([ra, dec]) => Ok(ProperMotion::new(*ra, *dec)),
            Some(other) => Err(ObsPlanError::InvalidProperMotion(other.len())),
        }
    }

    fn equatorial(&self) -> Result<Option<EquatorialSource>, ObsPlanError> {
        if self.has_hadec_type() {
            return Ok(None);
        }

        let system = match self.coord_type.as_deref() {
            Some(text) => text.parse::<InputSystem>()?,
            None => InputSystem::J2000,
        };

        let (lon, lat) = match (&self.ra, &self.dec, &self.long, &self.lat) {
            (Some(ra), Some(dec), _, _) if !system.is_spherical_lon_lat() => {
                (hours(ra)?, degrees(dec)?)
            }
            (_, _, Some(long), Some(lat)) => (degrees(long)?, degrees(lat)?),
            // galactic and friends also accept their pair under ra/dec, in degrees
            (Some(ra), Some(dec), _, _) => (degrees(ra)?, degrees(dec)?),
            _ if self.coord_type.is_some() => {
                return Err(ObsPlanError::UnknownCoordinateType(format!(
                    "type {system} needs ra/dec or long/lat"
                )))
            }
            _ => return Ok(None),
        };

        Ok(Some(
            EquatorialSource::new(lon, lat, system)
                .with_proper_motion(self.proper_motion()?)
                .with_parallax(self.parallax.unwrap_or(0.0)),
        ))
    }

    fn fixed(&self) -> Result<Option<CoordinateSource>, ObsPlanError> {
        if let (Some(az), Some(el)) = (&self.az, &self.el) {
            return Ok(Some(CoordinateSource::FixedAzEl {
                az: degrees(az)?,
                el: degrees(el)?,
            }));
        }
        if let (Some(ha), Some(dec)) = (&self.ha, &self.dec) {
            return Ok(Some(CoordinateSource::FixedHaDec {
                ha: hours(ha)?,
                dec: degrees(dec)?,
            }));
        }
        Ok(None)
    }
}

impl CoordinateSource {
    /// Factory over a [`CoordSpec`].
    ///
    /// Errors
    /// ------
    /// * [`ObsPlanError::UnknownPlanet`] for an unknown `planet`.
    /// * [`ObsPlanError::IncompleteElements`] when `elements` match no element form.
    /// * [`ObsPlanError::Parse`] / [`ObsPlanError::InvalidAngleField`] for bad angle text.
    /// * [`ObsPlanError::InvalidProperMotion`] when `pm` does not have two components.
    /// * [`ObsPlanError::UnknownCoordinateType`] for an unknown `type`, or positional fields
    ///   that do not form any complete kind.
    pub fn from_spec(spec: &CoordSpec) -> Result<Self, ObsPlanError> {
        if let Some(name) = &spec.planet {
            return Ok(CoordinateSource::Planet(name.parse()?));
        }

        if let Some(elements) = &spec.elements {
            return Ok(CoordinateSource::Elements(ElementSet::from_input(elements)?));
        }

        if spec.is_interpolated() {
            let text = |field: &Option<String>| field.as_deref().unwrap_or_default().to_string();
            return Ok(CoordinateSource::Interpolated(InterpolatedSource::new(
                spec.mjd1.unwrap_or_default(),
                hours(&text(&spec.ra1))?,
                degrees(&text(&spec.dec1))?,
                spec.mjd2.unwrap_or_default(),
                hours(&text(&spec.ra2))?,
                degrees(&text(&spec.dec2))?,
            )));
        }

        if let Some(source) = spec.equatorial()? {
            return Ok(CoordinateSource::Equatorial(source));
        }

        if let Some(source) = spec.fixed()? {
            return Ok(source);
        }

        if spec.is_positional() {
            return Err(ObsPlanError::UnknownCoordinateType(
                "incomplete positional fields".into(),
            ));
        }

        Ok(CoordinateSource::Calibration)
    }
}

impl TryFrom<&CoordSpec> for CoordinateSource {
    type Error = ObsPlanError;

    fn try_from(spec: &CoordSpec) -> Result<Self, Self::Error> {
        CoordinateSource::from_spec(spec)
    }
}

/// Convenience for [`Planet`] sources.
impl From<Planet> for CoordinateSource {
    fn from(planet: Planet) -> Self {
        CoordinateSource::Planet(planet)
    }
}

#[cfg(test)]
mod spec_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_priority_order() {
        // planet wins over everything else
        let spec = CoordSpec {
            ra: Some("1:00:00".into()),
            dec: Some("10".into()),
            ..CoordSpec::planet("Mars")
        };
        assert_eq!(
            CoordinateSource::from_spec(&spec).unwrap(),
            CoordinateSource::Planet(Planet::Mars)
        );

        // interpolation beats ra/dec
        let spec = CoordSpec {
            mjd1: Some(60000.0),
            ra1: Some("1:00:00".into()),
            dec1: Some("10".into()),
            mjd2: Some(60001.0),
            ra2: Some("1:10:00".into()),
            dec2: Some("11".into()),
            ..CoordSpec::radec("1:00:00", "10", "J2000")
        };
        assert_eq!(CoordinateSource::from_spec(&spec).unwrap().type_tag(), "INTERP");

        // ra/dec beats az/el
        let spec = CoordSpec {
            az: Some("10".into()),
            el: Some("40".into()),
            ..CoordSpec::radec("1:00:00", "10", "J2000")
        };
        assert_eq!(CoordinateSource::from_spec(&spec).unwrap().type_tag(), "RADEC");

        let spec = CoordSpec {
            az: Some("10".into()),
            el: Some("40".into()),
            ..Default::default()
        };
        assert_eq!(
            CoordinateSource::from_spec(&spec).unwrap(),
            CoordinateSource::FixedAzEl {
                az: 10.0 * RADEG,
                el: 40.0 * RADEG
            }
        );

        assert_eq!(
            CoordinateSource::from_spec(&CoordSpec::default()).unwrap(),
            CoordinateSource::Calibration
        );
    }

    #[test]
    fn test_hadec_type() {
        let spec = CoordSpec {
            ha: Some("-1:30:00".into()),
            dec: Some("-20".into()),
            coord_type: Some("hadec".into()),
            ..Default::default()
        };
        match CoordinateSource::from_spec(&spec).unwrap() {
            CoordinateSource::FixedHaDec { ha, dec } => {
                assert_abs_diff_eq!(ha, -1.5 * RADH, epsilon = 1e-15);
                assert_abs_diff_eq!(dec, -20.0 * RADEG, epsilon = 1e-15);
            }
            other => panic!("unexpected source {other:?}"),
        }
    }

    #[test]
    fn test_galactic_long_lat() {
        let spec = CoordSpec {
            long: Some("0".into()),
            lat: Some("0".into()),
            coord_type: Some("GAL".into()),
            ..Default::default()
        };
        let source = CoordinateSource::from_spec(&spec).unwrap();
        let CoordinateSource::Equatorial(eq) = source else {
            panic!("expected an equatorial source");
        };
        assert_eq!(eq.system(), InputSystem::Galactic);
        assert_abs_diff_eq!(eq.j2000().0 / RADEG, 266.405, epsilon = 1e-3);
    }

    #[test]
    fn test_construction_errors() {
        assert_eq!(
            CoordinateSource::from_spec(&CoordSpec::planet("Vulcan")),
            Err(ObsPlanError::UnknownPlanet("Vulcan".into()))
        );
        assert_eq!(
            CoordinateSource::from_spec(&CoordSpec::radec("1 2 3", "4 5 6", "AZEL")),
            Err(ObsPlanError::UnknownCoordinateType("AZEL".into()))
        );
        assert!(matches!(
            CoordinateSource::from_spec(&CoordSpec::radec("25:61:00", "10", "J2000")),
            Err(ObsPlanError::InvalidAngleField { field: "minutes", .. })
        ));

        let spec = CoordSpec {
            pm: Some(vec![0.1, 0.2, 0.3]),
            ..CoordSpec::radec("1:00:00", "10", "J2000")
        };
        assert_eq!(
            CoordinateSource::from_spec(&spec),
            Err(ObsPlanError::InvalidProperMotion(3))
        );

        let spec = CoordSpec {
            ra: Some("1:00:00".into()),
            ..Default::default()
        };
        assert!(matches!(
            CoordinateSource::from_spec(&spec),
            Err(ObsPlanError::UnknownCoordinateType(_))
        ));

        let spec = CoordSpec {
            elements: Some(OrbitalElementsInput::default()),
            ..Default::default()
        };
        assert!(matches!(
            CoordinateSource::from_spec(&spec),
            Err(ObsPlanError::IncompleteElements(_))
        ));
    }

    #[test]
    fn test_spec_from_json() {
        let spec: CoordSpec = serde_json::from_str(
            r#"{"name": "3C 273", "ra": "12:29:06.7", "dec": "2:03:08.6", "type": "J2000",
                "pm": [-0.0001, 0.0001], "parallax": 0.0}"#,
        )
        .unwrap();
        let source = CoordinateSource::from_spec(&spec).unwrap();
        let (ra, dec) = source.native().unwrap();
        assert_abs_diff_eq!(ra / RADH, 12.0 + 29.0 / 60.0 + 6.7 / 3600.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dec / RADEG, 2.0 + 3.0 / 60.0 + 8.6 / 3600.0, epsilon = 1e-12);
    }
}
