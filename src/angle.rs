//! # Angles with a declared normalization range
//!
//! [`AngleValue`] stores a single angular quantity in **radians** together with:
//!
//! * an [`AngleRange`] that every read goes through, so the value is always reported in the
//!   declared interval (`[0, 2π)` for right ascensions and azimuths, `(-π, π]` for hour angles,
//!   untouched for declinations and elevations);
//! * display preferences (field delimiter, decimal places, degree or hour base) used by the
//!   sexagesimal views.
//!
//! The angular value itself is immutable. Changing the range re-normalizes on the next read
//! without losing precision, because the raw radians are kept as supplied.
//!
//! Output representations are selected with the closed [`AngleFormat`] enum; the default is
//! [`AngleFormat::Radians`].
use std::f64::consts::PI;
use std::fmt;

use crate::constants::{Degree, Radian, DPI, RADEG, RADH};
use crate::conversion::{format_sexagesimal, parse_sexagesimal, split_sexagesimal};
use crate::obsplan_errors::ObsPlanError;

/// Interval an [`AngleValue`] is normalized into when read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleRange {
    /// `[0, 2π)`
    Unsigned2Pi,
    /// `(-π, π]`
    SignedPi,
    /// No normalization (declinations, elevations, offsets).
    #[default]
    None,
}

impl AngleRange {
    pub fn normalize(&self, radians: Radian) -> Radian {
        match self {
            AngleRange::Unsigned2Pi => radians.rem_euclid(DPI),
            AngleRange::SignedPi => {
                let wrapped = radians.rem_euclid(DPI);
                if wrapped > PI {
                    wrapped - DPI
                } else {
                    wrapped
                }
            }
            AngleRange::None => radians,
        }
    }
}

/// Base unit of the sexagesimal views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SexagesimalUnit {
    #[default]
    Degrees,
    Hours,
}

/// Requested output representation of an angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleFormat {
    #[default]
    Radians,
    Degrees,
    Sexagesimal,
    /// Decimal hours, truncated to three decimals.
    Hours,
    /// Signed sexagesimal fields.
    Array,
}

/// Sign and fields of a sexagesimal representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SexagesimalParts {
    pub negative: bool,
    pub whole: u64,
    pub minutes: u64,
    pub seconds: f64,
}

/// Value returned by [`AngleValue::in_format`].
#[derive(Debug, Clone, PartialEq)]
pub enum AngleRepr {
    Radians(f64),
    Degrees(f64),
    Sexagesimal(String),
    Hours(f64),
    Array(SexagesimalParts),
}

/// An angular quantity in radians with a normalization range and display preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleValue {
    radians: Radian,
    range: AngleRange,
    unit: SexagesimalUnit,
    delimiter: String,
    ndp: usize,
}

impl AngleValue {
    pub fn new(radians: Radian, range: AngleRange) -> Self {
        AngleValue {
            radians,
            range,
            unit: SexagesimalUnit::Degrees,
            delimiter: ":".to_string(),
            ndp: 2,
        }
    }

    pub fn from_degrees(degrees: Degree, range: AngleRange) -> Self {
        Self::new(degrees * RADEG, range)
    }

    /// Build an hour-based angle (right ascension, hour angle). Sexagesimal views use hours.
    pub fn from_hours(hours: f64, range: AngleRange) -> Self {
        let mut angle = Self::new(hours * RADH, range);
        angle.unit = SexagesimalUnit::Hours;
        angle
    }

    /// Parse a `±D:M:S` (or decimal) degree string.
    pub fn parse_degrees(text: &str, range: AngleRange) -> Result<Self, ObsPlanError> {
        Ok(Self::from_degrees(parse_sexagesimal(text)?, range))
    }

    /// Parse a `H:M:S` (or decimal) hour string.
    pub fn parse_hours(text: &str, range: AngleRange) -> Result<Self, ObsPlanError> {
        Ok(Self::from_hours(parse_sexagesimal(text)?, range))
    }

    /// Radians, normalized into the active range.
    pub fn radians(&self) -> Radian {
        self.range.normalize(self.radians)
    }

    pub fn degrees(&self) -> Degree {
        self.radians() / RADEG
    }

    pub fn hours(&self) -> f64 {
        self.radians() / RADH
    }

    pub fn range(&self) -> AngleRange {
        self.range
    }

    pub fn set_range(&mut self, range: AngleRange) {
        self.range = range;
    }

    pub fn with_range(mut self, range: AngleRange) -> Self {
        self.range = range;
        self
    }

    pub fn unit(&self) -> SexagesimalUnit {
        self.unit
    }

    pub fn set_unit(&mut self, unit: SexagesimalUnit) {
        self.unit = unit;
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn set_delimiter(&mut self, delimiter: impl Into<String>) {
        self.delimiter = delimiter.into();
    }

    pub fn ndp(&self) -> usize {
        self.ndp
    }

    pub fn set_ndp(&mut self, ndp: usize) {
        self.ndp = ndp;
    }

    fn natural_amount(&self) -> f64 {
        match self.unit {
            SexagesimalUnit::Degrees => self.degrees(),
            SexagesimalUnit::Hours => self.hours(),
        }
    }

    /// Sexagesimal string in the display unit, using the stored delimiter and decimals.
    pub fn to_sexagesimal(&self) -> String {
        format_sexagesimal(self.natural_amount(), self.ndp, &self.delimiter)
    }

    /// Decimal hours truncated to three decimal places.
    pub fn truncated_hours(&self) -> f64 {
        (self.hours() * 1000.0).trunc() / 1000.0
    }

    pub fn parts(&self) -> SexagesimalParts {
        let (negative, whole, minutes, seconds) = split_sexagesimal(self.natural_amount(), self.ndp);
        SexagesimalParts {
            negative,
            whole,
            minutes,
            seconds,
        }
    }

    pub fn in_format(&self, format: AngleFormat) -> AngleRepr {
        match format {
            AngleFormat::Radians => AngleRepr::Radians(self.radians()),
            AngleFormat::Degrees => AngleRepr::Degrees(self.degrees()),
            AngleFormat::Sexagesimal => AngleRepr::Sexagesimal(self.to_sexagesimal()),
            AngleFormat::Hours => AngleRepr::Hours(self.truncated_hours()),
            AngleFormat::Array => AngleRepr::Array(self.parts()),
        }
    }
}

impl fmt::Display for AngleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sexagesimal())
    }
}
