//! # Observer location
//!
//! An [`ObserverLocation`] is a geodetic site (longitude, latitude, altitude) with an optional
//! name and the pointing limits of its telescope. Sites are usually looked up in the
//! built-in [`observatories`] catalog, but any position can be built with
//! [`ObserverLocation::new`].
//!
//! ## Units
//!
//! - Longitude: **radians**, east positive.
//! - Latitude: geodetic **radians**.
//! - Altitude: **metres** above the reference ellipsoid.
//! - Geocentric parallax coordinates (ρ·cosφ′, ρ·sinφ′): **Earth equatorial radii**.
//!
//! ## Limits
//!
//! Limits follow the site name: renaming a location with [`ObserverLocation::set_name`]
//! reloads them from the catalog (and clears them for an unknown name). Explicit limits can
//! be attached with [`ObserverLocation::with_limits`].
//!
//! ```rust
//! use obsplan::observers::ObserverLocation;
//! use obsplan::observers::observatories::TelescopeLimits;
//!
//! let jcmt = ObserverLocation::from_name("JCMT")?;
//! assert!(matches!(jcmt.limits(), TelescopeLimits::AzEl { .. }));
//! # Ok::<(), obsplan::obsplan_errors::ObsPlanError>(())
//! ```
pub mod observatories;

use ordered_float::NotNan;

use crate::constants::{Meter, Radian, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS, RADEG};
use crate::obsplan_errors::ObsPlanError;
use observatories::{Observatory, ObservatoryCatalog, TelescopeLimits, OBSERVATORIES};

/// Geodetic site with a name and telescope limits.
///
/// Geometry is NaN-free (`NotNan`) and immutable once built; only the name (and the limits
/// that follow it) may change.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverLocation {
    longitude: NotNan<f64>,
    latitude: NotNan<f64>,
    altitude: NotNan<f64>,
    name: Option<String>,
    limits: TelescopeLimits,

    /// ρ·cosφ′ and ρ·sinφ′, precomputed from latitude and altitude.
    rho_cos_phi: NotNan<f64>,
    rho_sin_phi: NotNan<f64>,
}

impl ObserverLocation {
    /// Build a site from geodetic coordinates.
    ///
    /// Arguments
    /// ---------
    /// * `longitude`: radians, east positive.
    /// * `latitude`: geodetic radians.
    /// * `altitude`: metres above the ellipsoid.
    /// * `name`: optional site name; when it matches a catalog entry the telescope limits are
    ///   taken from there.
    ///
    /// Errors
    /// ------
    /// * [`ObsPlanError::NanValue`] if any coordinate is NaN.
    pub fn new(
        longitude: Radian,
        latitude: Radian,
        altitude: Meter,
        name: Option<String>,
    ) -> Result<Self, ObsPlanError> {
        let (rho_cos_phi, rho_sin_phi) = lat_alt_to_parallax(latitude, altitude);
        let limits = name
            .as_deref()
            .and_then(|n| OBSERVATORIES.get(n))
            .map(|site| site.limits)
            .unwrap_or_default();

        Ok(ObserverLocation {
            longitude: NotNan::new(longitude)?,
            latitude: NotNan::new(latitude)?,
            altitude: NotNan::new(altitude)?,
            name,
            limits,
            rho_cos_phi: NotNan::new(rho_cos_phi)?,
            rho_sin_phi: NotNan::new(rho_sin_phi)?,
        })
    }

    fn from_observatory(site: &Observatory) -> Result<Self, ObsPlanError> {
        let location = ObserverLocation::new(
            site.longitude * RADEG,
            site.latitude * RADEG,
            site.altitude,
            Some(site.name.clone()),
        )?;
        Ok(location.with_limits(site.limits))
    }

    /// Look a site up in the built-in catalog.
    pub fn from_name(name: &str) -> Result<Self, ObsPlanError> {
        ObserverLocation::from_catalog(name, &OBSERVATORIES)
    }

    /// Look a site up in a user-supplied catalog.
    pub fn from_catalog(name: &str, catalog: &ObservatoryCatalog) -> Result<Self, ObsPlanError> {
        let site = catalog
            .get(name)
            .ok_or_else(|| ObsPlanError::UnknownObservatory(name.to_string()))?;
        ObserverLocation::from_observatory(site)
    }

    /// Replace the telescope limits.
    pub fn with_limits(mut self, limits: TelescopeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Rename the site and reload its limits from the built-in catalog.
    pub fn set_name(&mut self, name: &str) {
        self.set_name_in(name, &OBSERVATORIES);
    }

    /// Rename the site and reload its limits from `catalog`; an unknown name leaves the site
    /// without limits.
    pub fn set_name_in(&mut self, name: &str, catalog: &ObservatoryCatalog) {
        self.limits = catalog.get(name).map(|site| site.limits).unwrap_or_default();
        self.name = Some(name.to_string());
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn limits(&self) -> TelescopeLimits {
        self.limits
    }

    /// Longitude in radians, east positive.
    pub fn longitude(&self) -> Radian {
        self.longitude.into_inner()
    }

    /// Geodetic latitude in radians.
    pub fn latitude(&self) -> Radian {
        self.latitude.into_inner()
    }

    /// Altitude in metres.
    pub fn altitude(&self) -> Meter {
        self.altitude.into_inner()
    }

    /// Geocentric parallax coordinates `(ρ·cosφ′, ρ·sinφ′)` in Earth equatorial radii.
    pub fn parallax_coords(&self) -> (f64, f64) {
        (self.rho_cos_phi.into_inner(), self.rho_sin_phi.into_inner())
    }
}

/// Convert geodetic latitude and height to normalized parallax coordinates.
///
/// Arguments
/// ---------
/// * `lat` - Geodetic latitude in **radians**.
/// * `height` - Altitude above the reference ellipsoid in **metres**.
///
/// Returns
/// -------
/// `(ρ·cosφ′, ρ·sinφ′)`, the geocentric distance of the site projected on the equator and
/// on the polar axis, in Earth equatorial radii:
///
/// ```text
/// u = atan( (sin φ * (b/a)) / cos φ )
/// ρ_sinφ = (b/a) * sin u + (h/a) * sin φ
/// ρ_cosφ = cos u + (h/a) * cos φ
/// ```
pub fn lat_alt_to_parallax(lat: Radian, height: Meter) -> (f64, f64) {
    let axis_ratio = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;

    // parametric latitude
    let u = (lat.sin() * axis_ratio).atan2(lat.cos());

    let rho_sin_phi = axis_ratio * u.sin() + (height / EARTH_MAJOR_AXIS) * lat.sin();
    let rho_cos_phi = u.cos() + (height / EARTH_MAJOR_AXIS) * lat.cos();

    (rho_cos_phi, rho_sin_phi)
}

/// Same as [`lat_alt_to_parallax`] with the latitude in **degrees**.
pub fn geodetic_to_parallax(lat: f64, height: Meter) -> (f64, f64) {
    lat_alt_to_parallax(lat.to_radians(), height)
}
