#![allow(dead_code)]

use hifitime::Epoch;
use obsplan::constants::RADEG;
use obsplan::observers::ObserverLocation;
use obsplan::time::seconds_between;

/// Route `log` output through the test harness; `RUST_LOG=trace` shows the solver iterations.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn jcmt() -> ObserverLocation {
    ObserverLocation::from_name("JCMT").unwrap()
}

/// Almanac site at longitude −155°29′, latitude +19°49′.
pub fn hawaii_almanac_site() -> ObserverLocation {
    ObserverLocation::new(
        -(155.0 + 29.0 / 60.0) * RADEG,
        (19.0 + 49.0 / 60.0) * RADEG,
        0.0,
        Some("almanac".into()),
    )
    .unwrap()
}

pub fn utc(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Epoch {
    Epoch::from_gregorian_utc(year, month, day, hour, minute, second, 0)
}

pub fn assert_instant_close(actual: Option<Epoch>, expected: Epoch, tolerance_s: f64) {
    let actual = actual.unwrap_or_else(|| panic!("no instant, expected {expected}"));
    let gap = seconds_between(&expected, &actual);
    assert!(
        gap.abs() <= tolerance_s,
        "{actual} is {gap:.1} s away from {expected}"
    );
}
