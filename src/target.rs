//! # Target: a source seen from a site at a chosen instant
//!
//! [`Target`] bundles a [`CoordinateSource`] with the context most accessors need:
//!
//! 1. an optional [`ObserverLocation`] (Greenwich equator when absent);
//! 2. an optional reference instant, or the `use_now` flag to follow the wall clock;
//! 3. the [`SolverSettings`] of the horizon solver;
//! 4. the catalog radial velocity with its definition and frame.
//!
//! Every accessor reads the context and leaves it untouched, so calling one twice in a row
//! gives the same answer (unless the target follows the wall clock).
//!
//! ## Typical usage
//!
//! ```rust
//! use hifitime::Epoch;
//! use obsplan::coords::CoordSpec;
//! use obsplan::horizon::EventSelector;
//! use obsplan::observers::ObserverLocation;
//! use obsplan::target::Target;
//!
//! let mut target = Target::from_spec(&CoordSpec::radec("15:22:33.3", "-0:13:04.5", "B1950"))?
//!     .with_observer(ObserverLocation::from_name("JCMT")?);
//! target.set_instant(Epoch::from_unix_seconds(1000436215.0));
//!
//! let el = target.el().unwrap();
//! assert_eq!(el.degrees().trunc(), 67.0);
//!
//! let set = target.set_time(EventSelector::Next, None);
//! assert!(set.is_converged());
//! # Ok::<(), obsplan::obsplan_errors::ObsPlanError>(())
//! ```
//!
//! ## Temporary instants
//!
//! [`Target::at_instant`] moves the target to another instant for the lifetime of the
//! returned [`InstantGuard`]; the previous instant and `use_now` flag are restored when the
//! guard is dropped.
use std::ops::{Deref, DerefMut};

use hifitime::Epoch;

use crate::angle::{AngleRange, AngleValue};
use crate::astrometry::{airmass, azel, parallactic_angle, tangent_plane_offset};
use crate::constants::{KmPerSec, Radian, Second, RADH};
use crate::coords::{lst_of, site_of, CoordSpec, CoordinateSource};
use crate::horizon::{CrossingResult, EventSelector, HorizonSolver, SolverSettings};
use crate::observability::is_observable;
use crate::observers::ObserverLocation;
use crate::obsplan_errors::ObsPlanError;
use crate::sampler::{sweep, SamplePoint};
use crate::time::now;
use crate::velocity::{LineOfSight, VelocityDefinition, VelocityFrame};

#[derive(Debug, Clone)]
pub struct Target {
    name: String,
    source: CoordinateSource,
    observer: Option<ObserverLocation>,
    instant: Option<Epoch>,
    use_now: bool,
    settings: SolverSettings,
    rv: KmPerSec,
    vdefn: VelocityDefinition,
    vframe: VelocityFrame,
}

/// Apparent place and hour angle at one instant.
struct Pointing {
    ra: Radian,
    dec: Radian,
    ha: Radian,
    lat: Radian,
}

/// Right ascensions, hour angles and sidereal times display in hours.
fn in_hours(radians: Radian, range: AngleRange) -> AngleValue {
    AngleValue::from_hours(radians / RADH, range)
}

impl Target {
    pub fn new(name: impl Into<String>, source: CoordinateSource) -> Self {
        Target {
            name: name.into(),
            source,
            observer: None,
            instant: None,
            use_now: false,
            settings: SolverSettings::default(),
            rv: 0.0,
            vdefn: VelocityDefinition::default(),
            vframe: VelocityFrame::default(),
        }
    }

    /// Build the source of `spec` and name the target after `spec.name`.
    pub fn from_spec(spec: &CoordSpec) -> Result<Self, ObsPlanError> {
        let source = CoordinateSource::from_spec(spec)?;
        let name = match (&spec.name, source.planet()) {
            (Some(name), _) => name.clone(),
            (None, Some(planet)) => planet.name().to_string(),
            (None, None) => String::new(),
        };
        Ok(Target::new(name, source))
    }

    pub fn with_observer(mut self, observer: ObserverLocation) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_settings(mut self, settings: SolverSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Attach a catalog radial velocity (km/s, `c·z` for a redshift) with its convention.
    pub fn with_velocity(
        mut self,
        rv: KmPerSec,
        vdefn: VelocityDefinition,
        vframe: VelocityFrame,
    ) -> Self {
        self.rv = rv;
        self.vdefn = vdefn;
        self.vframe = vframe;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn source(&self) -> &CoordinateSource {
        &self.source
    }

    pub fn observer(&self) -> Option<&ObserverLocation> {
        self.observer.as_ref()
    }

    pub fn set_observer(&mut self, observer: ObserverLocation) {
        self.observer = Some(observer);
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Fix the reference instant; this also stops following the wall clock.
    pub fn set_instant(&mut self, instant: Epoch) {
        self.instant = Some(instant);
        self.use_now = false;
    }

    pub fn clear_instant(&mut self) {
        self.instant = None;
    }

    pub fn set_use_now(&mut self, use_now: bool) {
        self.use_now = use_now;
    }

    pub fn use_now(&self) -> bool {
        self.use_now
    }

    /// Reference instant: the wall clock when `use_now` is set or no instant was given.
    pub fn instant(&self) -> Epoch {
        match self.instant {
            Some(instant) if !self.use_now => instant,
            _ => now(),
        }
    }

    /// Move the target to `instant` until the guard is dropped.
    pub fn at_instant(&mut self, instant: Epoch) -> InstantGuard<'_> {
        let saved_instant = self.instant;
        let saved_use_now = self.use_now;
        self.set_instant(instant);
        InstantGuard {
            target: self,
            saved_instant,
            saved_use_now,
        }
    }

    fn pointing(&self, instant: &Epoch) -> Option<Pointing> {
        let observer = self.observer();
        let (ra, dec) = self.source.apparent(instant, observer)?;
        Some(Pointing {
            ra,
            dec,
            ha: lst_of(instant, observer) - ra,
            lat: site_of(observer).1,
        })
    }

    fn solver(&self) -> HorizonSolver<'_> {
        HorizonSolver::new(&self.source, self.observer(), self.settings.clone())
    }

    /// Apparent right ascension, true equinox of date.
    pub fn ra_app(&self) -> Option<AngleValue> {
        let p = self.pointing(&self.instant())?;
        Some(in_hours(p.ra, AngleRange::Unsigned2Pi))
    }

    pub fn dec_app(&self) -> Option<AngleValue> {
        let p = self.pointing(&self.instant())?;
        Some(AngleValue::new(p.dec, AngleRange::SignedPi))
    }

    fn j2000(&self) -> Option<(Radian, Radian)> {
        self.source.j2000(&self.instant(), self.observer())
    }

    /// Mean right ascension J2000.
    pub fn ra2000(&self) -> Option<AngleValue> {
        let (ra, _) = self.j2000()?;
        Some(in_hours(ra, AngleRange::Unsigned2Pi))
    }

    pub fn dec2000(&self) -> Option<AngleValue> {
        let (_, dec) = self.j2000()?;
        Some(AngleValue::new(dec, AngleRange::SignedPi))
    }

    fn azel(&self) -> Option<(Radian, Radian)> {
        let p = self.pointing(&self.instant())?;
        Some(azel(p.ha, p.dec, p.lat))
    }

    /// Azimuth, north through east.
    pub fn az(&self) -> Option<AngleValue> {
        let (az, _) = self.azel()?;
        Some(AngleValue::new(az, AngleRange::Unsigned2Pi))
    }

    pub fn el(&self) -> Option<AngleValue> {
        let (_, el) = self.azel()?;
        Some(AngleValue::new(el, AngleRange::SignedPi))
    }

    pub fn airmass(&self) -> Option<f64> {
        let (_, el) = self.azel()?;
        Some(airmass(std::f64::consts::FRAC_PI_2 - el))
    }

    /// Parallactic angle.
    pub fn pa(&self) -> Option<AngleValue> {
        let p = self.pointing(&self.instant())?;
        Some(AngleValue::new(
            parallactic_angle(p.ha, p.dec, p.lat),
            AngleRange::SignedPi,
        ))
    }

    /// Hour angle, positive west.
    pub fn ha(&self) -> Option<AngleValue> {
        let p = self.pointing(&self.instant())?;
        Some(in_hours(p.ha, AngleRange::SignedPi))
    }

    /// Local apparent sidereal time.
    pub fn lst(&self) -> AngleValue {
        in_hours(lst_of(&self.instant(), self.observer()), AngleRange::Unsigned2Pi)
    }

    pub fn meridian_time(&self, event: EventSelector) -> CrossingResult {
        self.solver().meridian_time(&self.instant(), event)
    }

    /// Rise time for `horizon` (radians), or the source's default horizon.
    pub fn rise_time(&self, event: EventSelector, horizon: Option<Radian>) -> CrossingResult {
        self.solver().rise_time(&self.instant(), event, horizon)
    }

    /// Set time for `horizon` (radians), or the source's default horizon.
    pub fn set_time(&self, event: EventSelector, horizon: Option<Radian>) -> CrossingResult {
        self.solver().set_time(&self.instant(), event, horizon)
    }

    /// Elevation at the selected meridian transit.
    pub fn transit_el(&self, event: EventSelector) -> Option<AngleValue> {
        let el = self.solver().transit_elevation(&self.instant(), event)?;
        Some(AngleValue::new(el, AngleRange::SignedPi))
    }

    pub fn is_observable(&self) -> bool {
        is_observable(&self.source, self.observer(), &self.instant())
    }

    /// Positions between `start` and `end` every `increment` seconds.
    pub fn sweep(
        &self,
        start: &Epoch,
        end: &Epoch,
        increment: Second,
    ) -> Result<Vec<SamplePoint>, ObsPlanError> {
        sweep(&self.source, self.observer(), start, end, increment)
    }

    pub fn rv(&self) -> KmPerSec {
        self.rv
    }

    pub fn vdefn(&self) -> VelocityDefinition {
        self.vdefn
    }

    pub fn vframe(&self) -> VelocityFrame {
        self.vframe
    }

    /// Velocity components along the line of sight at the reference instant.
    pub fn line_of_sight(&self) -> Option<LineOfSight> {
        LineOfSight::new(&self.source, self.observer(), &self.instant())
    }

    /// Velocity of the observer relative to `frame`.
    pub fn frame_velocity(&self, frame: VelocityFrame) -> Option<KmPerSec> {
        Some(self.line_of_sight()?.frame_velocity(frame))
    }

    /// Observed velocity: catalog velocity plus observer motion in the catalog frame.
    pub fn obsvel(&self) -> Option<KmPerSec> {
        Some(self.line_of_sight()?.obsvel(self.rv, self.vframe))
    }

    /// Ratio of observed to rest frequency.
    pub fn doppler(&self) -> Option<f64> {
        Some(self.line_of_sight()?.doppler(self.rv, self.vdefn, self.vframe))
    }

    /// Tangent-plane distance from this target to `other`, both seen from this target's site
    /// at this target's instant.
    ///
    /// Return
    /// ------
    /// * `None` when either has no position, or when `other` is 90° or more away.
    pub fn distance(&self, other: &Target) -> Option<AngleValue> {
        let instant = self.instant();
        let (ra0, dec0) = self.source.apparent(&instant, self.observer())?;
        let (ra, dec) = other.source.apparent(&instant, self.observer())?;
        let (xi, eta) = tangent_plane_offset(ra, dec, ra0, dec0)?;
        Some(AngleValue::new(xi.hypot(eta), AngleRange::None))
    }
}

/// A [`Target`] temporarily moved to another instant; see [`Target::at_instant`].
pub struct InstantGuard<'a> {
    target: &'a mut Target,
    saved_instant: Option<Epoch>,
    saved_use_now: bool,
}

impl Deref for InstantGuard<'_> {
    type Target = crate::target::Target;

    fn deref(&self) -> &Self::Target {
        self.target
    }
}

impl DerefMut for InstantGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.target
    }
}

impl Drop for InstantGuard<'_> {
    fn drop(&mut self) {
        self.target.instant = self.saved_instant;
        self.target.use_now = self.saved_use_now;
    }
}
