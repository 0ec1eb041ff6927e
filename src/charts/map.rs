//! State Mapper Module
//! Filters one year's accidents to a state and plots their locations.

use super::geo::Coordinates;
use super::outline::{Outline, OutlineError};
use super::renderer::{MapScene, RenderError, StaticMapRenderer};
use crate::data::{fars_read, require_columns, ArgError, IntegerArg, LoaderError, Year};
use polars::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const STATE_COLUMN: &str = "STATE";
pub const LATITUDE_COLUMN: &str = "LATITUDE";
pub const LONGITUDE_COLUMN: &str = "LONGITUD";

/// Fraction of each axis span added around the points.
const BOUNDS_PADDING: f64 = 0.02;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("invalid year: {0}")]
    Year(ArgError),
    #[error("invalid STATE number: {0}")]
    StateArg(ArgError),
    #[error("invalid STATE number: {0}")]
    InvalidState(i64),
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error(transparent)]
    Outline(#[from] OutlineError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Where and how to draw a state map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub point_radius: u32,
    pub outline: Option<PathBuf>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from("fars_map.svg"),
            width: 800,
            height: 600,
            point_radius: 2,
            outline: None,
        }
    }
}

/// Result of a map request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapOutcome {
    /// The map was written to `path` with `points` accident locations on it.
    Rendered { path: PathBuf, points: usize },
    /// The state had no accidents that year; nothing was drawn.
    NoAccidents { state: i64, year: Year },
}

/// Load `year` from `data_dir` and map the accidents of `state`.
pub fn map_state<S, Y>(
    data_dir: &Path,
    state: &S,
    year: &Y,
    options: &MapOptions,
) -> Result<MapOutcome, MapError>
where
    S: IntegerArg + ?Sized,
    Y: IntegerArg + ?Sized,
{
    let state = state.to_integer().map_err(MapError::StateArg)?;
    let year = Year::parse(year).map_err(MapError::Year)?;
    let path = data_dir.join(year.filename());
    let df = fars_read(&path)?;
    require_columns(&df, &path, &[STATE_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN])?;
    map_state_frame(&df, state, year, options)
}

/// Map the accidents of `state` from an already loaded year.
pub fn map_state_frame(
    df: &DataFrame,
    state: i64,
    year: Year,
    options: &MapOptions,
) -> Result<MapOutcome, MapError> {
    if !distinct_states(df)?.contains(&state) {
        return Err(MapError::InvalidState(state));
    }

    let rows = filter_state(df, state)?;
    if rows.height() == 0 {
        info!(state, year = %year, "no accidents to plot");
        return Ok(MapOutcome::NoAccidents { state, year });
    }

    let coords = coordinates(&rows)?;
    let points = coords.points();
    let bounds = coords.bounds().padded(BOUNDS_PADDING);
    debug!(
        state,
        year = %year,
        rows = rows.height(),
        points = points.len(),
        "plotting state accidents"
    );

    let outline = match &options.outline {
        Some(path) => Outline::from_file(path)?,
        None => Outline::frame(&bounds),
    };
    let scene = MapScene {
        bounds,
        outline: &outline,
        points: &points,
        size: (options.width, options.height),
        point_radius: options.point_radius,
    };
    StaticMapRenderer::render_to_file(&options.output, &scene)?;

    info!(path = %options.output.display(), points = points.len(), "map written");
    Ok(MapOutcome::Rendered {
        path: options.output.clone(),
        points: points.len(),
    })
}

/// Distinct state codes present in a year's records.
pub fn distinct_states(df: &DataFrame) -> PolarsResult<BTreeSet<i64>> {
    let states = df.column(STATE_COLUMN)?.cast(&DataType::Int64)?;
    Ok(states.i64()?.into_iter().flatten().collect())
}

fn filter_state(df: &DataFrame, state: i64) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .filter(col(STATE_COLUMN).cast(DataType::Int64).eq(lit(state)))
        .collect()
}

fn coordinates(df: &DataFrame) -> PolarsResult<Coordinates> {
    let lons = df.column(LONGITUDE_COLUMN)?.cast(&DataType::Float64)?;
    let lats = df.column(LATITUDE_COLUMN)?.cast(&DataType::Float64)?;
    Ok(Coordinates::from_raw(
        lons.f64()?.into_iter(),
        lats.f64()?.into_iter(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn accidents() -> DataFrame {
        df!(
            "STATE" => [1i64, 1, 1, 6, 6],
            "MONTH" => [1i64, 2, 3, 4, 5],
            "LATITUDE" => [32.5, 99.9999, 33.0, 99.9999, 77.7777],
            "LONGITUD" => [-86.5, -87.0, 999.9999, 999.9999, 888.8888]
        )
        .unwrap()
    }

    fn options_in(dir: &Path) -> MapOptions {
        MapOptions {
            output: dir.join("map.svg"),
            ..MapOptions::default()
        }
    }

    #[test]
    fn test_unknown_state_is_error() {
        let tmp = tempdir().unwrap();
        let err = map_state_frame(&accidents(), 56, Year::new(2013), &options_in(tmp.path()))
            .unwrap_err();
        assert!(matches!(err, MapError::InvalidState(56)));
        assert_eq!(err.to_string(), "invalid STATE number: 56");
        assert!(!tmp.path().join("map.svg").exists());
    }

    #[test]
    fn test_only_clean_points_are_plotted() {
        let tmp = tempdir().unwrap();
        let outcome =
            map_state_frame(&accidents(), 1, Year::new(2013), &options_in(tmp.path())).unwrap();
        assert_eq!(
            outcome,
            MapOutcome::Rendered {
                path: tmp.path().join("map.svg"),
                points: 1,
            }
        );
    }

    #[test]
    fn test_all_sentinel_state_renders_nothing() {
        let df = df!(
            "STATE" => [6i64, 6],
            "LATITUDE" => [99.9999, 99.9999],
            "LONGITUD" => [999.9999, 999.9999]
        )
        .unwrap();
        let tmp = tempdir().unwrap();
        let outcome = map_state_frame(&df, 6, Year::new(2014), &options_in(tmp.path())).unwrap();
        assert!(matches!(outcome, MapOutcome::Rendered { points: 0, .. }));
        assert!(tmp.path().join("map.svg").exists());
    }

    #[test]
    fn test_distinct_states() {
        let states: Vec<i64> = distinct_states(&accidents()).unwrap().into_iter().collect();
        assert_eq!(states, vec![1, 6]);
    }

    #[test]
    fn test_state_argument_conversion() {
        let tmp = tempdir().unwrap();
        let err = map_state(tmp.path(), "north", &2013, &options_in(tmp.path())).unwrap_err();
        assert!(matches!(err, MapError::StateArg(_)));

        let err = map_state(tmp.path(), "1", &2013, &options_in(tmp.path())).unwrap_err();
        assert!(matches!(err, MapError::Load(LoaderError::FileNotFound(_))));
    }
}
