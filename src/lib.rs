//! Observation planning: apparent places, horizon coordinates, rise/set/transit times,
//! telescope observability and radial-velocity frames for a source seen from a site.
//!
//! The entry points are [`coords::CoordinateSource`] (what is observed),
//! [`observers::ObserverLocation`] (from where), [`horizon::HorizonSolver`] (when it rises,
//! transits and sets) and [`target::Target`], which keeps the three together with a reference
//! instant.
pub mod angle;
pub mod astrometry;
pub mod constants;
pub mod conversion;
pub mod coords;
pub mod earth_orientation;
pub mod ephemeris;
pub mod horizon;
pub mod kepler;
pub mod observability;
pub mod observers;
pub mod obsplan_errors;
pub mod orbit_type;
pub mod ref_system;
pub mod sampler;
pub mod target;
pub mod time;
pub mod velocity;
