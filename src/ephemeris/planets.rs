//! Approximate planetary positions from mean Keplerian elements (Standish, *Keplerian
//! Elements for Approximate Positions of the Major Planets*, table 1, valid 1800–2050).
//!
//! Each element is `base + rate · T` with `T` in Julian centuries from J2000 (TT). The set is
//! converted to a classical [`KeplerianElements`] at the date and evaluated directly, without
//! propagation.
use nalgebra::Vector3;

use crate::astrometry::apparent::apparent_from_geocentric;
use crate::constants::{GAUSS_GRAV_SQUARED, MJD, RADEG, T2000};
use crate::ephemeris::{angular_diameter, geocentric_light_time, BodyPosition, Planet};
use crate::orbit_type::keplerian_element::KeplerianElements;

/// Mean elements `(a [AU], e, I [°], L [°], ϖ [°], Ω [°])` and their rates per Julian century.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanElements {
    pub base: [f64; 6],
    pub rate: [f64; 6],
}

impl MeanElements {
    /// Osculating-like elements at `mjd_tt`, as a Keplerian set with epoch `mjd_tt`.
    pub fn at(&self, mjd_tt: MJD) -> KeplerianElements {
        let t = (mjd_tt - T2000) / 36525.0;
        let [a, e, inc, mean_lon, peri_lon, node] =
            std::array::from_fn(|k| self.base[k] + self.rate[k] * t);

        KeplerianElements {
            reference_epoch: mjd_tt,
            semi_major_axis: a,
            eccentricity: e,
            inclination: inc * RADEG,
            ascending_node_longitude: node * RADEG,
            periapsis_argument: (peri_lon - node) * RADEG,
            mean_anomaly: (mean_lon - peri_lon) * RADEG,
        }
    }
}

#[rustfmt::skip]
const MERCURY: MeanElements = MeanElements {
    base: [0.38709927, 0.20563593, 7.00497902, 252.25032350, 77.45779628, 48.33076593],
    rate: [0.00000037, 0.00001906, -0.00594749, 149472.67411175, 0.16047689, -0.12534081],
};

#[rustfmt::skip]
const VENUS: MeanElements = MeanElements {
    base: [0.72333566, 0.00677672, 3.39467605, 181.97909950, 131.60246718, 76.67984255],
    rate: [0.00000390, -0.00004107, -0.00078890, 58517.81538729, 0.00268329, -0.27769418],
};

#[rustfmt::skip]
const MARS: MeanElements = MeanElements {
    base: [1.52371034, 0.09339410, 1.84969142, -4.55343205, -23.94362959, 49.55953891],
    rate: [0.00001847, 0.00007882, -0.00813131, 19140.30268499, 0.44441088, -0.29257343],
};

#[rustfmt::skip]
const JUPITER: MeanElements = MeanElements {
    base: [5.20288700, 0.04838624, 1.30439695, 34.39644051, 14.72847983, 100.47390909],
    rate: [-0.00011607, -0.00013253, -0.00183714, 3034.74612775, 0.21252668, 0.20469106],
};

#[rustfmt::skip]
const SATURN: MeanElements = MeanElements {
    base: [9.53667594, 0.05386179, 2.48599187, 49.95424423, 92.59887831, 113.66242448],
    rate: [-0.00125060, -0.00050991, 0.00193609, 1222.49362201, -0.41897216, -0.28867794],
};

#[rustfmt::skip]
const URANUS: MeanElements = MeanElements {
    base: [19.18916464, 0.04725744, 0.77263783, 313.23810451, 170.95427630, 74.01692503],
    rate: [-0.00196176, -0.00004397, -0.00242939, 428.48202785, 0.40805281, 0.04240589],
};

#[rustfmt::skip]
const NEPTUNE: MeanElements = MeanElements {
    base: [30.06992276, 0.00859048, 1.77004347, -55.12002969, 44.96476227, 131.78422574],
    rate: [0.00026291, 0.00005105, 0.00035372, 218.45945325, -0.32241464, -0.00508664],
};

#[rustfmt::skip]
const PLUTO: MeanElements = MeanElements {
    base: [39.48211675, 0.24882730, 17.14001206, 238.92903833, 224.06891629, 110.30393684],
    rate: [-0.00031596, 0.00005170, 0.00004818, 145.20780515, -0.04062942, -0.01183482],
};

/// Mean element table of a planet; `None` for the Sun and the Moon.
pub fn mean_elements(planet: Planet) -> Option<&'static MeanElements> {
    match planet {
        Planet::Mercury => Some(&MERCURY),
        Planet::Venus => Some(&VENUS),
        Planet::Mars => Some(&MARS),
        Planet::Jupiter => Some(&JUPITER),
        Planet::Saturn => Some(&SATURN),
        Planet::Uranus => Some(&URANUS),
        Planet::Neptune => Some(&NEPTUNE),
        Planet::Pluto => Some(&PLUTO),
        Planet::Sun | Planet::Moon => None,
    }
}

/// Heliocentric position in AU, mean ecliptic and equinox J2000.
pub fn heliocentric_ecliptic(planet: Planet, mjd_tt: MJD) -> Option<Vector3<f64>> {
    let elements = mean_elements(planet)?.at(mjd_tt);
    elements
        .state_at_epoch(GAUSS_GRAV_SQUARED)
        .map(|(position, _)| position)
}

/// Apparent geocentric place of a planet, light-time corrected.
pub(crate) fn planet_apparent(planet: Planet, mjd_tt: MJD) -> Option<BodyPosition> {
    let geocentric = geocentric_light_time(mjd_tt, |t| heliocentric_ecliptic(planet, t))?;
    let (ra, dec, distance) = apparent_from_geocentric(&geocentric, mjd_tt);

    Some(BodyPosition {
        ra,
        dec,
        distance,
        diameter: angular_diameter(planet.radius(), distance),
    })
}
