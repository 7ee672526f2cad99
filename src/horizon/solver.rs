use std::fmt;

use hifitime::Epoch;
use log::{debug, trace, warn};

use crate::angle::AngleRange;
use crate::astrometry::azel;
use crate::constants::{Radian, Second, DPI, RADSEC, SECONDS_PER_DAY, SIDEREAL_RATIO};
use crate::coords::{lst_of, site_of, CoordinateSource};
use crate::horizon::{CrossingResult, CrossingStatus, EventSelector, SolverSettings};
use crate::observers::ObserverLocation;
use crate::time::{offset_seconds, seconds_between};

/// Direction of a horizon crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Crossing {
    Rise,
    Set,
}

impl Crossing {
    /// Sign of the elevation rate at the crossing.
    fn gradient(self) -> f64 {
        match self {
            Crossing::Rise => 1.0,
            Crossing::Set => -1.0,
        }
    }
}

impl fmt::Display for Crossing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Crossing::Rise => "rise",
            Crossing::Set => "set",
        })
    }
}

/// A transit instant and whether its fixed point converged.
type Transit = (Epoch, bool);

/// Pick whichever result lies closer to `reference`.
fn nearest(reference: &Epoch, a: CrossingResult, b: CrossingResult) -> CrossingResult {
    match (a.instant, b.instant) {
        (Some(ta), Some(tb)) => {
            if seconds_between(reference, &ta).abs() <= seconds_between(reference, &tb).abs() {
                a
            } else {
                b
            }
        }
        (Some(_), None) => a,
        (None, Some(_)) => b,
        (None, None) if a.status == CrossingStatus::NeverCrosses && b.status == a.status => a,
        (None, None) => CrossingResult::not_converged(None),
    }
}

fn from_transit(found: Option<Transit>) -> CrossingResult {
    match found {
        Some((t, true)) => CrossingResult::converged(t),
        Some((t, false)) => CrossingResult::not_converged(Some(t)),
        None => CrossingResult::not_converged(None),
    }
}

/// Rise, set and transit solver for one source seen from one site.
///
/// The solver never mutates the source: every probe instant is an argument.
///
/// ```rust
/// use hifitime::Epoch;
/// use obsplan::coords::{CoordinateSource, CoordSpec};
/// use obsplan::horizon::{EventSelector, HorizonSolver, SolverSettings};
/// use obsplan::observers::ObserverLocation;
///
/// let sirius = CoordinateSource::from_spec(&CoordSpec::radec("06:45:08.9", "-16:42:58", "J2000"))?;
/// let site = ObserverLocation::from_name("JCMT")?;
/// let solver = HorizonSolver::new(&sirius, Some(&site), SolverSettings::default());
///
/// let reference = Epoch::from_gregorian_utc_at_midnight(2024, 1, 1);
/// let rise = solver.rise_time(&reference, EventSelector::Next, None);
/// let set = solver.set_time(&reference, EventSelector::Next, None);
/// assert!(rise.is_converged() && set.is_converged());
/// # Ok::<(), obsplan::obsplan_errors::ObsPlanError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HorizonSolver<'a> {
    source: &'a CoordinateSource,
    observer: Option<&'a ObserverLocation>,
    settings: SolverSettings,
}

impl<'a> HorizonSolver<'a> {
    pub fn new(
        source: &'a CoordinateSource,
        observer: Option<&'a ObserverLocation>,
        settings: SolverSettings,
    ) -> Self {
        HorizonSolver {
            source,
            observer,
            settings,
        }
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    fn has_events(&self) -> bool {
        !(self.source.is_fixed_on_sky() || self.source.is_calibration())
    }

    fn latitude(&self) -> Radian {
        site_of(self.observer).1
    }

    /// Hour angle of the source at `t`, in `(-π, π]`.
    pub fn hour_angle_at(&self, t: &Epoch) -> Option<Radian> {
        let (ra, _) = self.source.apparent(t, self.observer)?;
        Some(AngleRange::SignedPi.normalize(lst_of(t, self.observer) - ra))
    }

    /// Topocentric elevation of the source at `t`.
    pub fn elevation_at(&self, t: &Epoch) -> Option<Radian> {
        let (ra, dec) = self.source.apparent(t, self.observer)?;
        let (_, el) = azel(lst_of(t, self.observer) - ra, dec, self.latitude());
        Some(el)
    }

    /// Hour-angle span in civil seconds.
    fn sidereal_to_seconds(&self, angle: Radian) -> Second {
        let seconds = angle / DPI * SECONDS_PER_DAY;
        if self.source.is_sun() {
            seconds
        } else {
            seconds * SIDEREAL_RATIO
        }
    }

    /// Time, in seconds, between transit and the crossing of `horizon`, from the declination
    /// at `t`.
    ///
    /// Return
    /// ------
    /// * `None` when the source stays above or below `horizon` all day. For the Moon this is
    ///   only decided after a direct elevation search around the transit.
    pub fn ha_set(&self, t: &Epoch, horizon: Radian) -> Option<Second> {
        let (_, dec) = self.source.apparent(t, self.observer)?;
        let lat = self.latitude();
        let cos_ha = (horizon.sin() - lat.sin() * dec.sin()) / (lat.cos() * dec.cos());

        if !(cos_ha.abs() <= 1.0) {
            if self.source.is_moon() {
                return self.moon_ha_set(t, horizon);
            }
            debug!("no crossing of {horizon:.6} rad at declination {dec:.6} rad (cos H0 = {cos_ha:.4})");
            return None;
        }

        Some(self.sidereal_to_seconds(cos_ha.acos()))
    }

    /// Surrogate of [`HorizonSolver::ha_set`] for the Moon: walk away from the transit until
    /// the elevation drops below `horizon`.
    fn moon_ha_set(&self, t: &Epoch, horizon: Radian) -> Option<Second> {
        let (transit, converged) = self.iterate_transit(t)?;
        if !converged {
            return None;
        }
        if self.elevation_at(&transit)? < horizon {
            return None;
        }

        let step = self.settings.moon_search_step;
        let mut offset = step;
        while offset <= self.settings.moon_search_span {
            let probe = offset_seconds(&transit, offset);
            let el = self.elevation_at(&probe)?;
            trace!("moon horizon search at {probe}: elevation {el:.6} rad");
            if el < horizon {
                return Some(offset - step / 2.0);
            }
            offset += step;
        }

        debug!("moon stays above {horizon:.6} rad for {} s after transit", self.settings.moon_search_span);
        None
    }

    /// Fixed point on `α(t) = LST(t)` starting at `start`; converges to the transit closest
    /// to `start`.
    fn iterate_transit(&self, start: &Epoch) -> Option<Transit> {
        let mut t = *start;

        for iteration in 0..self.settings.meridian_max_iterations {
            let (ra, _) = self.source.apparent(&t, self.observer)?;
            let offset = AngleRange::SignedPi.normalize(ra - lst_of(&t, self.observer));
            let dt = self.sidereal_to_seconds(offset);
            trace!("meridian iteration {iteration}: step {dt:.3} s from {t}");

            t = offset_seconds(&t, dt);
            if dt.abs() <= self.settings.meridian_tolerance {
                return Some((t, true));
            }
        }

        warn!(
            "meridian time did not converge in {} iterations, keeping {t}",
            self.settings.meridian_max_iterations
        );
        Some((t, false))
    }

    /// First transit strictly after (`direction > 0`) or before (`direction < 0`) `reference`.
    fn transit_beyond(&self, reference: &Epoch, direction: f64) -> Option<Transit> {
        let step = if self.source.is_moon() {
            self.settings.moon_meridian_step
        } else {
            self.settings.meridian_step
        };
        let beyond = |t: &Epoch| direction * seconds_between(reference, t) > 0.0;

        let (mut t, mut converged) = self.iterate_transit(reference)?;
        let mut jump = 0;
        while !beyond(&t) {
            jump += 1;
            if jump > self.settings.meridian_max_iterations {
                warn!("no transit found beyond {reference} after {} jumps", jump - 1);
                return Some((t, false));
            }
            let start = offset_seconds(reference, direction * step * jump as f64);
            trace!("transit search restarted from {start}");
            (t, converged) = self.iterate_transit(&start)?;
        }

        Some((t, converged))
    }

    fn transit_after(&self, reference: &Epoch) -> Option<Transit> {
        self.transit_beyond(reference, 1.0)
    }

    fn transit_before(&self, reference: &Epoch) -> Option<Transit> {
        self.transit_beyond(reference, -1.0)
    }

    /// Meridian transit time relative to `reference`.
    ///
    /// A fixed point that does not converge still yields its last estimate, with
    /// [`CrossingStatus::NotConverged`].
    pub fn meridian_time(&self, reference: &Epoch, event: EventSelector) -> CrossingResult {
        if !self.has_events() {
            return CrossingResult::never();
        }

        match event {
            EventSelector::Next => from_transit(self.transit_after(reference)),
            EventSelector::Previous => from_transit(self.transit_before(reference)),
            EventSelector::Nearest => nearest(
                reference,
                from_transit(self.transit_after(reference)),
                from_transit(self.transit_before(reference)),
            ),
        }
    }

    /// Elevation of the source at its meridian transit.
    pub fn transit_elevation(&self, reference: &Epoch, event: EventSelector) -> Option<Radian> {
        let transit = self.meridian_time(reference, event).instant?;
        self.elevation_at(&transit)
    }

    /// Rise time relative to `reference`, for `horizon` (default horizon of the source when
    /// `None`).
    pub fn rise_time(
        &self,
        reference: &Epoch,
        event: EventSelector,
        horizon: Option<Radian>,
    ) -> CrossingResult {
        self.crossing_time(reference, event, horizon, Crossing::Rise)
    }

    /// Set time relative to `reference`, for `horizon` (default horizon of the source when
    /// `None`).
    pub fn set_time(
        &self,
        reference: &Epoch,
        event: EventSelector,
        horizon: Option<Radian>,
    ) -> CrossingResult {
        self.crossing_time(reference, event, horizon, Crossing::Set)
    }

    fn crossing_time(
        &self,
        reference: &Epoch,
        event: EventSelector,
        horizon: Option<Radian>,
        kind: Crossing,
    ) -> CrossingResult {
        if !self.has_events() {
            return CrossingResult::never();
        }

        let horizon =
            horizon.unwrap_or_else(|| self.source.default_horizon(reference, self.observer));

        match event {
            EventSelector::Next => self.crossing_beyond(reference, horizon, kind, 1.0),
            EventSelector::Previous => self.crossing_beyond(reference, horizon, kind, -1.0),
            EventSelector::Nearest => nearest(
                reference,
                self.crossing_beyond(reference, horizon, kind, 1.0),
                self.crossing_beyond(reference, horizon, kind, -1.0),
            ),
        }
    }

    /// First crossing strictly after (`direction > 0`) or before (`direction < 0`)
    /// `reference`.
    ///
    /// Crossings are computed from the transit on the other side of `reference`, then from
    /// the following ones, so that a rise (or set) belonging to a transit on the far side is
    /// not missed. An anchoring transit that did not converge ends the search with no
    /// instant.
    fn crossing_beyond(
        &self,
        reference: &Epoch,
        horizon: Radian,
        kind: Crossing,
        direction: f64,
    ) -> CrossingResult {
        let Some((mut transit, true)) = self.transit_beyond(reference, -direction) else {
            return CrossingResult::not_converged(None);
        };

        let mut status = CrossingStatus::NeverCrosses;
        for attempt in 0..3 {
            match self.crossing_near_transit(&transit, horizon, kind) {
                Ok(t) if direction * seconds_between(reference, &t) > 0.0 => {
                    return CrossingResult::converged(t);
                }
                Ok(_) => {}
                Err(CrossingStatus::NotConverged) => status = CrossingStatus::NotConverged,
                Err(_) => {}
            }

            if attempt == 2 {
                break;
            }
            // one minute past the transit is enough to reach the following one
            let beyond = offset_seconds(&transit, direction * 60.0);
            match self.transit_beyond(&beyond, direction) {
                Some((t, true)) => transit = t,
                _ => {
                    status = CrossingStatus::NotConverged;
                    break;
                }
            }
        }

        CrossingResult {
            instant: None,
            status,
        }
    }

    /// Crossing of `horizon` on one side of `transit`.
    fn crossing_near_transit(
        &self,
        transit: &Epoch,
        horizon: Radian,
        kind: Crossing,
    ) -> Result<Epoch, CrossingStatus> {
        let ha = self
            .ha_set(transit, horizon)
            .ok_or(CrossingStatus::NeverCrosses)?;
        let estimate = offset_seconds(transit, -kind.gradient() * ha);
        debug!("{kind} estimate {estimate} from transit {transit}");

        self.refine(&estimate, horizon, kind)
            .ok_or(CrossingStatus::NotConverged)
    }

    /// Step from `estimate` until the elevation matches `horizon`.
    ///
    /// The step is halved and reversed whenever the gap to the horizon grows. Below the
    /// increment floor the current instant is accepted only if the horizon was seen from
    /// both sides.
    fn refine(&self, estimate: &Epoch, horizon: Radian, kind: Crossing) -> Option<Epoch> {
        let tolerance = self.settings.elevation_tolerance * RADSEC;
        let mut increment = if self.source.is_moon() {
            self.settings.moon_refine_increment
        } else {
            self.settings.refine_increment
        };

        let mut t = *estimate;
        let el = self.elevation_at(&t)?;
        let mut gap = el - horizon;
        trace!("refining {kind} from {t}: elevation {el:.6} rad, gap {gap:.3e}");
        if gap.abs() <= tolerance {
            return Some(t);
        }

        let mut direction = if gap < 0.0 {
            kind.gradient()
        } else {
            -kind.gradient()
        };
        let (mut seen_above, mut seen_below) = (gap > 0.0, gap < 0.0);
        let mut previous = gap.abs();

        for _ in 0..self.settings.max_refine_iterations {
            t = offset_seconds(&t, direction * increment);
            let el = self.elevation_at(&t)?;
            gap = el - horizon;
            trace!("{kind} step {:.3} s: candidate {t}, elevation {el:.6} rad", direction * increment);

            if gap.abs() <= tolerance {
                return Some(t);
            }
            seen_above |= gap > 0.0;
            seen_below |= gap < 0.0;

            if gap.abs() >= previous {
                direction = -direction;
                increment /= 2.0;
                if increment < self.settings.increment_floor {
                    if seen_above && seen_below {
                        return Some(t);
                    }
                    debug!("{kind} refinement diverged without bracketing the horizon");
                    return None;
                }
            }
            previous = gap.abs();
        }

        debug!(
            "{kind} refinement stopped after {} steps",
            self.settings.max_refine_iterations
        );
        None
    }
}

#[cfg(test)]
mod solver_test {
    use super::*;
    use crate::constants::RADEG;
    use crate::coords::{EquatorialSource, InputSystem};
    use crate::ephemeris::Planet;
    use approx::assert_abs_diff_eq;

    fn star(dec_deg: f64) -> CoordinateSource {
        CoordinateSource::Equatorial(EquatorialSource::new(
            2.0,
            dec_deg * RADEG,
            InputSystem::J2000,
        ))
    }

    fn jcmt() -> ObserverLocation {
        ObserverLocation::from_name("JCMT").unwrap()
    }

    fn reference() -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(2002, 7, 14)
    }

    #[test]
    fn test_ha_set_undefined_beyond_circumpolar_limit() {
        let site = jcmt();
        let t = reference();
        // at latitude 19.8°, declinations beyond ±70.2° never cross the geometric horizon
        for (dec, crosses) in [(75.0, false), (-75.0, false), (60.0, true), (-60.0, true), (0.0, true)] {
            let source = star(dec);
            let solver = HorizonSolver::new(&source, Some(&site), SolverSettings::default());
            assert_eq!(solver.ha_set(&t, 0.0).is_some(), crosses, "dec {dec}");
        }

        // equator: six sidereal hours
        let source = star(0.0);
        let equator = ObserverLocation::new(0.0, 0.0, 0.0, None).unwrap();
        let solver = HorizonSolver::new(&source, Some(&equator), SolverSettings::default());
        let ha = solver.ha_set(&t, 0.0).unwrap();
        assert_abs_diff_eq!(ha, 6.0 * 3600.0 * SIDEREAL_RATIO, epsilon = 30.0);
    }

    #[test]
    fn test_meridian_is_on_the_meridian() {
        let site = jcmt();
        let source = star(30.0);
        let solver = HorizonSolver::new(&source, Some(&site), SolverSettings::default());
        let t0 = reference();

        let next = solver.meridian_time(&t0, EventSelector::Next);
        assert!(next.is_converged());
        let transit = next.instant.unwrap();
        assert!(seconds_between(&t0, &transit) > 0.0);
        assert!(seconds_between(&t0, &transit) < SECONDS_PER_DAY);
        assert_abs_diff_eq!(solver.hour_angle_at(&transit).unwrap(), 0.0, epsilon = 1e-4);

        let previous = solver.meridian_time(&t0, EventSelector::Previous).instant.unwrap();
        assert_abs_diff_eq!(
            seconds_between(&previous, &transit),
            SECONDS_PER_DAY * SIDEREAL_RATIO,
            epsilon = 5.0
        );

        let nearest = solver.meridian_time(&t0, EventSelector::Nearest).instant.unwrap();
        let closest = if seconds_between(&t0, &transit).abs() < seconds_between(&t0, &previous).abs() {
            transit
        } else {
            previous
        };
        assert_eq!(nearest, closest);
    }

    #[test]
    fn test_rise_transit_set_ordering() {
        let site = jcmt();
        let t0 = reference();
        let tolerance = SolverSettings::default().elevation_tolerance * RADSEC;

        for dec in [-60.0, -30.0, 0.0, 20.0, 45.0, 65.0] {
            let source = star(dec);
            let solver = HorizonSolver::new(&source, Some(&site), SolverSettings::default());

            let transit = solver.meridian_time(&t0, EventSelector::Next).instant.unwrap();
            let rise = solver.rise_time(&transit, EventSelector::Previous, None);
            let set = solver.set_time(&transit, EventSelector::Next, None);
            assert!(rise.is_converged() && set.is_converged(), "dec {dec}");

            let (rise, set) = (rise.instant.unwrap(), set.instant.unwrap());
            assert!(seconds_between(&rise, &transit) > 0.0);
            assert!(seconds_between(&transit, &set) > 0.0);
            // symmetric around the transit for a fixed star
            assert_abs_diff_eq!(
                seconds_between(&rise, &transit),
                seconds_between(&transit, &set),
                epsilon = 5.0
            );
            assert_abs_diff_eq!(solver.elevation_at(&rise).unwrap(), 0.0, epsilon = tolerance);
            assert_abs_diff_eq!(solver.elevation_at(&set).unwrap(), 0.0, epsilon = tolerance);
        }
    }

    #[test]
    fn test_circumpolar_never_crosses() {
        let site = jcmt();
        let source = star(80.0);
        let solver = HorizonSolver::new(&source, Some(&site), SolverSettings::default());
        for event in [EventSelector::Next, EventSelector::Previous, EventSelector::Nearest] {
            let rise = solver.rise_time(&reference(), event, None);
            assert_eq!(rise, CrossingResult::never());
        }
        // yet it still transits
        assert!(solver.meridian_time(&reference(), EventSelector::Next).is_converged());
    }

    #[test]
    fn test_unconverged_transit_gives_no_crossing() {
        let site = jcmt();
        let settings = SolverSettings {
            meridian_max_iterations: 1,
            meridian_tolerance: 1e-9,
            ..SolverSettings::default()
        };

        for source in [star(0.0), CoordinateSource::Planet(Planet::Moon)] {
            let solver = HorizonSolver::new(&source, Some(&site), settings.clone());
            for event in [EventSelector::Next, EventSelector::Previous, EventSelector::Nearest] {
                assert_eq!(
                    solver.rise_time(&reference(), event, None),
                    CrossingResult::not_converged(None)
                );
                assert_eq!(
                    solver.set_time(&reference(), event, Some(0.0)),
                    CrossingResult::not_converged(None)
                );
            }

            // the meridian keeps its last estimate
            let transit = solver.meridian_time(&reference(), EventSelector::Next);
            assert_eq!(transit.status, CrossingStatus::NotConverged);
            assert!(transit.instant.is_some());
        }
    }

    #[test]
    fn test_fixed_sources_have_no_events() {
        let site = jcmt();
        for source in [
            CoordinateSource::FixedAzEl { az: 0.0, el: 0.5 },
            CoordinateSource::FixedHaDec { ha: 0.0, dec: 0.2 },
            CoordinateSource::Calibration,
        ] {
            let solver = HorizonSolver::new(&source, Some(&site), SolverSettings::default());
            assert_eq!(
                solver.meridian_time(&reference(), EventSelector::Next),
                CrossingResult::never()
            );
            assert_eq!(
                solver.set_time(&reference(), EventSelector::Nearest, Some(0.1)),
                CrossingResult::never()
            );
        }
    }

    #[test]
    fn test_moon_rises_and_sets() {
        let site = jcmt();
        let moon = CoordinateSource::Planet(Planet::Moon);
        let solver = HorizonSolver::new(&moon, Some(&site), SolverSettings::default());
        let t0 = reference();

        let transit = solver.meridian_time(&t0, EventSelector::Next).instant.unwrap();
        let rise = solver.rise_time(&transit, EventSelector::Previous, None).instant.unwrap();
        let set = solver.set_time(&transit, EventSelector::Next, None).instant.unwrap();

        // the Moon stays up for roughly half a day at low latitude
        let up = seconds_between(&rise, &set) / 3600.0;
        assert!((10.0..15.0).contains(&up), "{up} h");
        let horizon = moon.default_horizon(&rise, Some(&site));
        assert_abs_diff_eq!(solver.elevation_at(&rise).unwrap(), horizon, epsilon = 30.0 * RADSEC);
    }
}
