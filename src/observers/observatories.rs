//! Built-in observatory catalog and telescope pointing limits.
//!
//! The catalog maps a site name (case-insensitive) to its geodetic position and to the
//! pointing limits of its main telescope. It can be extended or overridden from JSON:
//!
//! ```json
//! [
//!   { "name": "MYSITE", "longitude": -70.73, "latitude": -30.24, "altitude": 2200.0,
//!     "limits": { "type": "AZEL", "el_min": 15.0, "el_max": 87.0 } }
//! ]
//! ```
//!
//! Longitudes are east-positive degrees, latitudes geodetic degrees, altitudes metres above
//! the ellipsoid. Limits are in degrees.
use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Meter};
use crate::obsplan_errors::ObsPlanError;

/// Pointing limits of a telescope, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum TelescopeLimits {
    /// Alt-azimuth mount: the elevation must lie strictly between the two bounds.
    AzEl { el_min: Degree, el_max: Degree },
    /// Equatorial mount: hour angle and declination bounds, inclusive.
    HaDec {
        ha_min: Degree,
        ha_max: Degree,
        dec_min: Degree,
        dec_max: Degree,
    },
    /// No limits known: nothing is considered observable.
    #[default]
    Unknown,
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observatory {
    pub name: String,
    /// Geodetic longitude, degrees east.
    pub longitude: Degree,
    /// Geodetic latitude, degrees.
    pub latitude: Degree,
    /// Height above the ellipsoid, metres.
    #[serde(default)]
    pub altitude: Meter,
    #[serde(default)]
    pub limits: TelescopeLimits,
}

/// Sign, degrees, minutes, seconds to decimal degrees.
fn dms(negative: bool, d: f64, m: f64, s: f64) -> Degree {
    let value = d + m / 60.0 + s / 3600.0;
    if negative {
        -value
    } else {
        value
    }
}

fn site(name: &str, lon: Degree, lat: Degree, altitude: Meter, limits: TelescopeLimits) -> Observatory {
    Observatory {
        name: name.to_string(),
        longitude: lon,
        latitude: lat,
        altitude,
        limits,
    }
}

fn az_el(el_min: Degree, el_max: Degree) -> TelescopeLimits {
    TelescopeLimits::AzEl { el_min, el_max }
}

/// Name-indexed observatory catalog.
#[derive(Debug, Clone, Default)]
pub struct ObservatoryCatalog {
    sites: HashMap<String, Observatory>,
}

impl ObservatoryCatalog {
    /// The sites shipped with the crate.
    pub fn builtin() -> Self {
        use TelescopeLimits::{HaDec, Unknown};

        let sites = vec![
            site("JCMT", dms(true, 155.0, 28.0, 37.20), dms(false, 19.0, 49.0, 22.11), 4111.0, az_el(5.0, 88.0)),
            site(
                "UKIRT",
                dms(true, 155.0, 28.0, 13.18),
                dms(false, 19.0, 49.0, 20.75),
                4198.5,
                HaDec { ha_min: -67.5, ha_max: 67.5, dec_min: -42.0, dec_max: 60.0 },
            ),
            site("CSO", dms(true, 155.0, 28.0, 31.79), dms(false, 19.0, 49.0, 20.77), 4080.0, az_el(10.0, 89.0)),
            site("SMA", dms(true, 155.0, 28.0, 39.60), dms(false, 19.0, 49.0, 27.30), 4080.0, az_el(15.0, 87.0)),
            site("JAC", dms(true, 155.0, 5.0, 3.00), dms(false, 19.0, 42.0, 17.00), 60.0, Unknown),
            site(
                "AAT",
                dms(false, 149.0, 3.0, 57.91),
                dms(true, 31.0, 16.0, 37.34),
                1164.0,
                HaDec { ha_min: -90.0, ha_max: 90.0, dec_min: -89.0, dec_max: 60.0 },
            ),
            site("PALOMAR", dms(true, 116.0, 51.0, 46.80), dms(false, 33.0, 21.0, 21.60), 1706.0, Unknown),
            site("KITTPEAK", dms(true, 111.0, 36.0, 0.00), dms(false, 31.0, 57.0, 48.00), 2120.0, Unknown),
            site("VLA", dms(true, 107.0, 37.0, 3.82), dms(false, 34.0, 4.0, 43.50), 2124.0, az_el(8.0, 90.0)),
            site("GBT", dms(true, 79.0, 50.0, 23.41), dms(false, 38.0, 25.0, 59.24), 807.4, az_el(5.0, 90.0)),
            site("PARKES", dms(false, 148.0, 15.0, 48.64), dms(true, 32.0, 59.0, 54.26), 392.0, az_el(30.5, 90.0)),
            site("ARECIBO", dms(true, 66.0, 45.0, 10.00), dms(false, 18.0, 20.0, 36.60), 497.0, az_el(70.0, 90.0)),
            site("ALMA", dms(true, 67.0, 45.0, 18.00), dms(true, 23.0, 1.0, 9.40), 5058.7, az_el(2.0, 88.9)),
            site("GREENWICH", 0.0, dms(false, 51.0, 28.0, 38.00), 46.0, Unknown),
        ];

        let mut catalog = ObservatoryCatalog::default();
        catalog.extend(sites);
        catalog
    }

    /// Parse a JSON array of [`Observatory`] records into a new catalog.
    pub fn from_json_str(json: &str) -> Result<Self, ObsPlanError> {
        let mut catalog = ObservatoryCatalog::default();
        catalog.extend_from_json_str(json)?;
        Ok(catalog)
    }

    /// Add (or replace, by name) the sites of a JSON array.
    pub fn extend_from_json_str(&mut self, json: &str) -> Result<(), ObsPlanError> {
        let sites: Vec<Observatory> = serde_json::from_str(json)?;
        self.extend(sites);
        Ok(())
    }

    fn extend(&mut self, sites: impl IntoIterator<Item = Observatory>) {
        for site in sites {
            self.sites.insert(site.name.to_ascii_uppercase(), site);
        }
    }

    /// Look a site up by name, ignoring case and surrounding blanks.
    pub fn get(&self, name: &str) -> Option<&Observatory> {
        self.sites.get(&name.trim().to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Site names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sites.values().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// The built-in catalog, built on first use.
pub static OBSERVATORIES: Lazy<ObservatoryCatalog> = Lazy::new(ObservatoryCatalog::builtin);

#[cfg(test)]
mod observatories_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_builtin_lookup() {
        let jcmt = OBSERVATORIES.get(" jcmt ").unwrap();
        assert_abs_diff_eq!(jcmt.longitude, -155.4770, epsilon = 1e-4);
        assert_abs_diff_eq!(jcmt.latitude, 19.822808, epsilon = 1e-6);
        assert_eq!(jcmt.limits, az_el(5.0, 88.0));

        assert!(matches!(
            OBSERVATORIES.get("UKIRT").unwrap().limits,
            TelescopeLimits::HaDec { .. }
        ));
        assert!(OBSERVATORIES.get("atlantis").is_none());
        assert_eq!(OBSERVATORIES.len(), 14);
    }

    #[test]
    fn test_json_extension() {
        let mut catalog = ObservatoryCatalog::builtin();
        catalog
            .extend_from_json_str(
                r#"[
                {"name": "Blanco", "longitude": -70.8065, "latitude": -30.1697, "altitude": 2207.0,
                 "limits": {"type": "HADEC", "ha_min": -75.0, "ha_max": 75.0, "dec_min": -89.0, "dec_max": 37.0}},
                {"name": "JCMT", "longitude": -155.477, "latitude": 19.8228,
                 "limits": {"type": "AZEL", "el_min": 10.0, "el_max": 85.0}}
            ]"#,
            )
            .unwrap();

        assert_eq!(catalog.len(), 15);
        assert_eq!(catalog.get("blanco").unwrap().altitude, 2207.0);
        assert_eq!(catalog.get("JCMT").unwrap().limits, az_el(10.0, 85.0));
        assert_eq!(catalog.get("JCMT").unwrap().altitude, 0.0);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            ObservatoryCatalog::from_json_str(r#"[{"name": "X"}]"#),
            Err(ObsPlanError::Json(_))
        ));
        let empty = ObservatoryCatalog::from_json_str("[]").unwrap();
        assert!(empty.is_empty());
        assert!(empty.names().is_empty());
    }
}
