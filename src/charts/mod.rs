//! Charts module - State accident maps

mod geo;
mod map;
mod outline;
mod renderer;

pub use geo::{
    clean_latitude, clean_longitude, Coordinates, GeoBounds, GeoPoint, LATITUDE_SENTINEL,
    LONGITUDE_SENTINEL,
};
pub use map::{
    distinct_states, map_state, map_state_frame, MapError, MapOptions, MapOutcome,
    LATITUDE_COLUMN, LONGITUDE_COLUMN, STATE_COLUMN,
};
pub use outline::{Outline, OutlineError};
pub use renderer::{ImageKind, MapScene, RenderError, StaticMapRenderer};
