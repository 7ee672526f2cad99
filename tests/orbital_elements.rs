mod common;

use common::{init_logger, jcmt, utc};
use obsplan::coords::{CoordSpec, CoordinateSource};
use obsplan::horizon::{CrossingStatus, EventSelector};
use obsplan::obsplan_errors::ObsPlanError;
use obsplan::orbit_type::ElementSet;
use obsplan::target::Target;
use obsplan::time::{mjd_tt, offset_seconds};

const CERES: &str = r#"{
    "name": "Ceres",
    "elements": {
        "epoch": 60000.0, "inclination": 10.59, "ascending_node": 80.27, "perihelion": 73.60,
        "aorq": 2.7675, "eccentricity": 0.0785, "aorl": 291.4
    }
}"#;

const HYPERBOLIC_MINOR: &str = r#"{
    "name": "broken",
    "elements": {
        "epoch": 60000.0, "inclination": 10.0, "ascending_node": 80.0, "perihelion": 70.0,
        "aorq": 2.0, "eccentricity": 1.4, "aorl": 30.0
    }
}"#;

fn target(json: &str) -> Target {
    let spec: CoordSpec = serde_json::from_str(json).unwrap();
    let mut target = Target::from_spec(&spec).unwrap().with_observer(jcmt());
    target.set_instant(utc(2023, 6, 1, 10, 0, 0));
    target
}

#[test]
fn minor_planet_from_json() {
    init_logger();
    let ceres = target(CERES);
    assert_eq!(ceres.name(), "Ceres");
    assert_eq!(ceres.source().type_tag(), "ELEMENTS");

    let CoordinateSource::Elements(set) = ceres.source() else {
        panic!("expected an element set");
    };
    assert_eq!(set.form_name(), "minor planet");
    let body = set.apparent_position(mjd_tt(&ceres.instant())).unwrap();
    assert!((1.5..3.9).contains(&body.distance), "{}", body.distance);

    // within a few degrees of the ecliptic
    let dec = ceres.dec_app().unwrap().degrees();
    assert!(dec.abs() < 40.0, "{dec}");

    let transit = ceres.meridian_time(EventSelector::Next);
    assert!(transit.is_converged());
    assert!(ceres.rise_time(EventSelector::Next, None).is_converged());
}

#[test]
fn degenerate_elements_yield_no_position() {
    init_logger();
    let broken = target(HYPERBOLIC_MINOR);

    assert!(broken.ra_app().is_none());
    assert!(broken.az().is_none());
    assert!(broken.airmass().is_none());
    assert!(broken.line_of_sight().is_none());
    assert!(broken.doppler().is_none());
    assert!(!broken.is_observable());

    let transit = broken.meridian_time(EventSelector::Nearest);
    assert_eq!(transit.instant, None);
    assert_eq!(transit.status, CrossingStatus::NotConverged);
    assert_eq!(broken.set_time(EventSelector::Next, None).instant, None);

    let start = broken.instant();
    let points = broken.sweep(&start, &offset_seconds(&start, 3600.0), 600.0).unwrap();
    assert!(points.is_empty());
}

#[test]
fn incomplete_elements_are_rejected() {
    let spec: CoordSpec = serde_json::from_str(
        r#"{"elements": {"epoch": 60000.0, "inclination": 10.0, "aorq": 2.0, "eccentricity": 0.1}}"#,
    )
    .unwrap();
    assert!(matches!(
        CoordinateSource::from_spec(&spec),
        Err(ObsPlanError::IncompleteElements(_))
    ));
    assert!(matches!(
        ElementSet::from_input(&spec.elements.unwrap()),
        Err(ObsPlanError::IncompleteElements(_))
    ));
}

#[test]
fn parabolic_comet() {
    let spec: CoordSpec = serde_json::from_str(
        r#"{"elements": {"perihelion_epoch": 60100.0, "inclination": 120.0,
            "ascending_node": 30.0, "perihelion": 45.0, "aorq": 0.9, "eccentricity": 1.0}}"#,
    )
    .unwrap();
    let comet = CoordinateSource::from_spec(&spec).unwrap();
    let site = jcmt();
    for day in [0, 30, 120] {
        let t = offset_seconds(&utc(2023, 6, 1, 0, 0, 0), day as f64 * 86400.0);
        assert!(comet.apparent(&t, Some(&site)).is_some(), "day {day}");
    }
}
