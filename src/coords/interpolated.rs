use crate::angle::AngleRange;
use crate::constants::{Radian, DPI, MJD};

/// Apparent place interpolated linearly between two dated anchors.
///
/// Before the first anchor and after the second the position is held at the nearest anchor;
/// this flat extrapolation is an approximation meant for short tracks of moving targets
/// supplied by an external ephemeris.
///
/// Right ascension is interpolated along the short arc, so anchors on either side of 0h do
/// not sweep round the sky.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolatedSource {
    pub mjd1: MJD,
    pub ra1: Radian,
    pub dec1: Radian,
    pub mjd2: MJD,
    pub ra2: Radian,
    pub dec2: Radian,
}

impl InterpolatedSource {
    pub fn new(mjd1: MJD, ra1: Radian, dec1: Radian, mjd2: MJD, ra2: Radian, dec2: Radian) -> Self {
        InterpolatedSource {
            mjd1,
            ra1,
            dec1,
            mjd2,
            ra2,
            dec2,
        }
    }

    /// Apparent `(ra, dec)` at `mjd` (UTC).
    pub fn apparent(&self, mjd: MJD) -> (Radian, Radian) {
        let span = self.mjd2 - self.mjd1;
        let fraction = if span == 0.0 {
            0.0
        } else {
            ((mjd - self.mjd1) / span).clamp(0.0, 1.0)
        };

        let dra = AngleRange::SignedPi.normalize(self.ra2 - self.ra1);
        let ra = (self.ra1 + fraction * dra).rem_euclid(DPI);
        let dec = self.dec1 + fraction * (self.dec2 - self.dec1);
        (ra, dec)
    }
}

#[cfg(test)]
mod interpolated_test {
    use super::*;
    use crate::constants::RADEG;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_linear_and_flat() {
        let track = InterpolatedSource::new(60000.0, 1.0, 0.1, 60002.0, 1.2, 0.3);
        let (ra, dec) = track.apparent(60001.0);
        assert_abs_diff_eq!(ra, 1.1, epsilon = 1e-12);
        assert_abs_diff_eq!(dec, 0.2, epsilon = 1e-12);

        assert_eq!(track.apparent(59000.0), (1.0, 0.1));
        let (ra, dec) = track.apparent(61000.0);
        assert_abs_diff_eq!(ra, 1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(dec, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_wraps_through_zero_hours() {
        let track = InterpolatedSource::new(60000.0, 359.0 * RADEG, 0.0, 60001.0, 3.0 * RADEG, 0.0);
        let (ra, _) = track.apparent(60000.5);
        assert_abs_diff_eq!(ra / RADEG, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_single_instant_track() {
        let track = InterpolatedSource::new(60000.0, 1.0, 0.1, 60000.0, 2.0, 0.5);
        assert_eq!(track.apparent(60010.0), (1.0, 0.1));
    }
}
