//! Charts module - map rendering

mod basemap;
mod map;

pub use basemap::{visible_segments, Extent};
pub use map::{MapError, MapOutcome, MapStyle, StateMapPlotter};
