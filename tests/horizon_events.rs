mod common;

use approx::assert_abs_diff_eq;
use common::{assert_instant_close, hawaii_almanac_site, init_logger, jcmt, utc};
use obsplan::constants::{RADEG, RADSEC};
use obsplan::coords::{CoordSpec, CoordinateSource};
use obsplan::ephemeris::Planet;
use obsplan::horizon::{CrossingStatus, EventSelector, HorizonSolver, SolverSettings};
use obsplan::target::Target;
use obsplan::time::{offset_seconds, seconds_between};

const CIVIL_TWILIGHT: f64 = -6.0 * RADEG;

#[test]
fn sun_almanac_mauna_kea() {
    init_logger();
    let site = hawaii_almanac_site();
    let sun = CoordinateSource::Planet(Planet::Sun);
    let solver = HorizonSolver::new(&sun, Some(&site), SolverSettings::default());
    let reference = utc(2002, 7, 14, 12, 0, 0);
    let next = EventSelector::Next;

    let dawn = solver.rise_time(&reference, next, Some(CIVIL_TWILIGHT));
    assert_instant_close(dawn.instant, utc(2002, 7, 14, 15, 27, 0), 60.0);

    let rise = solver.rise_time(&reference, next, None);
    assert_instant_close(rise.instant, utc(2002, 7, 14, 15, 51, 0), 60.0);

    let transit = solver.meridian_time(&reference, next);
    assert!(transit.is_converged());
    assert_instant_close(transit.instant, utc(2002, 7, 14, 22, 27, 30), 60.0);

    let set = solver.set_time(&reference, next, None);
    assert_instant_close(set.instant, utc(2002, 7, 15, 5, 4, 0), 60.0);

    let dusk = solver.set_time(&reference, next, Some(CIVIL_TWILIGHT));
    assert_instant_close(dusk.instant, utc(2002, 7, 15, 5, 28, 30), 60.0);

    // the crossings sit on their horizons
    let tolerance = SolverSettings::default().elevation_tolerance * RADSEC;
    for (result, horizon) in [
        (rise, -50.0 / 60.0 * RADEG),
        (set, -50.0 / 60.0 * RADEG),
        (dawn, CIVIL_TWILIGHT),
        (dusk, CIVIL_TWILIGHT),
    ] {
        let el = solver.elevation_at(&result.instant.unwrap()).unwrap();
        assert_abs_diff_eq!(el, horizon, epsilon = tolerance);
    }
}

#[test]
fn sun_event_selection() {
    init_logger();
    let site = hawaii_almanac_site();
    let sun = CoordinateSource::Planet(Planet::Sun);
    let solver = HorizonSolver::new(&sun, Some(&site), SolverSettings::default());
    let reference = utc(2002, 7, 14, 12, 0, 0);

    // from midnight UTC the next sunset is the one of the local evening before
    let early_set = solver.set_time(&utc(2002, 7, 14, 0, 0, 0), EventSelector::Next, None);
    assert_instant_close(early_set.instant, utc(2002, 7, 14, 5, 4, 0), 90.0);

    let previous_set = solver.set_time(&reference, EventSelector::Previous, None);
    assert_instant_close(previous_set.instant, early_set.instant.unwrap(), 5.0);

    // 22:27 is 10.5 h after the reference, the previous transit 13.5 h before
    let nearest = solver.meridian_time(&reference, EventSelector::Nearest);
    let next = solver.meridian_time(&reference, EventSelector::Next);
    assert_instant_close(nearest.instant, next.instant.unwrap(), 1.0);

    let previous = solver.meridian_time(&reference, EventSelector::Previous);
    let day = seconds_between(&previous.instant.unwrap(), &next.instant.unwrap());
    assert_abs_diff_eq!(day, 86400.0, epsilon = 60.0);
}

#[test]
fn previous_and_next_agree() {
    init_logger();
    let site = jcmt();
    let vega = CoordinateSource::from_spec(&CoordSpec::radec("18:36:56.34", "+38:47:01.3", "J2000")).unwrap();
    let solver = HorizonSolver::new(&vega, Some(&site), SolverSettings::default());
    let reference = utc(2024, 3, 1, 0, 0, 0);

    let set = solver.set_time(&reference, EventSelector::Next, None).instant.unwrap();
    let just_after = offset_seconds(&set, 60.0);
    let again = solver.set_time(&just_after, EventSelector::Previous, None);
    assert_instant_close(again.instant, set, 5.0);

    let rise = solver.rise_time(&reference, EventSelector::Next, None).instant.unwrap();
    assert!(seconds_between(&reference, &rise) > 0.0);
    assert!(seconds_between(&reference, &rise) < 86400.0);
}

#[test]
fn never_rising_source() {
    init_logger();
    let site = jcmt();
    // δ = −80° never rises at latitude +19.8°
    let source = CoordinateSource::from_spec(&CoordSpec::radec("12:00:00", "-80:00:00", "J2000")).unwrap();
    let solver = HorizonSolver::new(&source, Some(&site), SolverSettings::default());
    let reference = utc(2024, 3, 1, 0, 0, 0);

    let rise = solver.rise_time(&reference, EventSelector::Nearest, None);
    let set = solver.set_time(&reference, EventSelector::Nearest, None);
    assert_eq!(rise.status, CrossingStatus::NeverCrosses);
    assert_eq!(set.status, CrossingStatus::NeverCrosses);
    assert!(rise.instant.is_none() && set.instant.is_none());

    // transiting below the horizon still counts as a transit
    let transit_el = solver.transit_elevation(&reference, EventSelector::Next).unwrap();
    assert_abs_diff_eq!(transit_el / RADEG, 90.0 - (19.8228 + 80.0), epsilon = 0.5);
}

#[test]
fn target_events_use_its_instant() {
    init_logger();
    let mut target = Target::from_spec(&CoordSpec::planet("jupiter"))
        .unwrap()
        .with_observer(jcmt());
    let reference = utc(2024, 3, 1, 0, 0, 0);
    target.set_instant(reference);

    let transit = target.meridian_time(EventSelector::Next);
    let rise = target.rise_time(EventSelector::Previous, None);
    assert!(transit.is_converged() && rise.is_converged());

    // the instant used by a guard only lives as long as the guard
    let later = {
        let moved = target.at_instant(offset_seconds(&reference, 86400.0));
        moved.meridian_time(EventSelector::Next)
    };
    assert_eq!(target.instant(), reference);
    let gap = seconds_between(&transit.instant.unwrap(), &later.instant.unwrap());
    // one sidereal day, stretched by Jupiter's eastward motion
    assert!((86000.0..86400.0).contains(&gap), "{gap}");

    let transit_el = target.transit_el(EventSelector::Next).unwrap();
    let el_at_transit = {
        let moved = target.at_instant(transit.instant.unwrap());
        moved.el().unwrap()
    };
    assert_abs_diff_eq!(transit_el.radians(), el_at_transit.radians(), epsilon = 1e-9);
}
