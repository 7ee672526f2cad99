use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObsPlanError {
    #[error("Unable to parse angle: {0}")]
    Parse(String),

    #[error("Angle field {field} out of range [0, 60): {value}")]
    InvalidAngleField { field: &'static str, value: f64 },

    #[error("Incomplete orbital element set: {0}")]
    IncompleteElements(String),

    #[error("Unknown coordinate type: {0}")]
    UnknownCoordinateType(String),

    #[error("Unknown planet: {0}")]
    UnknownPlanet(String),

    #[error("Unsupported velocity definition: {0}")]
    UnsupportedVelocityDefinition(String),

    #[error("Unsupported velocity frame: {0}")]
    UnsupportedVelocityFrame(String),

    #[error("Proper motion must contain exactly two components, got {0}")]
    InvalidProperMotion(usize),

    #[error("Sampling increment must be strictly positive, got {0} s")]
    InvalidIncrement(f64),

    #[error("Unknown observatory: {0}")]
    UnknownObservatory(String),

    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Time conversion error: {0}")]
    Time(#[from] hifitime::HifitimeError),

    #[error("NaN value rejected: {0}")]
    NanValue(#[from] ordered_float::FloatIsNan),
}

impl PartialEq for ObsPlanError {
    fn eq(&self, other: &Self) -> bool {
        use ObsPlanError::*;
        match (self, other) {
            (Parse(a), Parse(b)) => a == b,
            (
                InvalidAngleField { field: f1, value: v1 },
                InvalidAngleField { field: f2, value: v2 },
            ) => f1 == f2 && v1 == v2,
            (IncompleteElements(a), IncompleteElements(b)) => a == b,
            (UnknownCoordinateType(a), UnknownCoordinateType(b)) => a == b,
            (UnknownPlanet(a), UnknownPlanet(b)) => a == b,
            (UnsupportedVelocityDefinition(a), UnsupportedVelocityDefinition(b)) => a == b,
            (UnsupportedVelocityFrame(a), UnsupportedVelocityFrame(b)) => a == b,
            (InvalidProperMotion(a), InvalidProperMotion(b)) => a == b,
            (InvalidIncrement(a), InvalidIncrement(b)) => a == b,
            (UnknownObservatory(a), UnknownObservatory(b)) => a == b,

            // not comparable: same variant is enough
            (Json(_), Json(_)) => true,
            (Time(_), Time(_)) => true,
            (NanValue(_), NanValue(_)) => true,

            _ => false,
        }
    }
}
