//! Base map outline: polylines drawn beneath the accident points.

use super::geo::{GeoBounds, GeoPoint};
use crate::data::{fars_read, require_columns, LoaderError};
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const GROUP_COLUMN: &str = "group";
const LONG_COLUMN: &str = "long";
const LAT_COLUMN: &str = "lat";

#[derive(Error, Debug)]
pub enum OutlineError {
    #[error("Failed to load outline: {0}")]
    Load(#[from] LoaderError),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    pub rings: Vec<Vec<GeoPoint>>,
}

impl Outline {
    /// The rectangle around `bounds`, used when no outline file is given.
    pub fn frame(bounds: &GeoBounds) -> Self {
        let (x0, x1) = bounds.lon;
        let (y0, y1) = bounds.lat;
        let ring = [(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]
            .into_iter()
            .map(|(lon, lat)| GeoPoint { lon, lat })
            .collect();
        Self { rings: vec![ring] }
    }

    /// Load polylines from a `group,long,lat` table, one polyline per group in file order.
    pub fn from_file(path: &Path) -> Result<Self, OutlineError> {
        let df = fars_read(path)?;
        require_columns(&df, path, &[GROUP_COLUMN, LONG_COLUMN, LAT_COLUMN])?;
        let outline = Self::from_dataframe(&df)?;
        debug!(path = %path.display(), rings = outline.rings.len(), "loaded outline");
        Ok(outline)
    }

    pub fn from_dataframe(df: &DataFrame) -> Result<Self, OutlineError> {
        let groups = df.column(GROUP_COLUMN)?.cast(&DataType::String)?;
        let lons = df.column(LONG_COLUMN)?.cast(&DataType::Float64)?;
        let lats = df.column(LAT_COLUMN)?.cast(&DataType::Float64)?;

        let mut rings: Vec<Vec<GeoPoint>> = Vec::new();
        let mut current: Option<String> = None;
        for ((group, lon), lat) in groups
            .str()?
            .into_iter()
            .zip(lons.f64()?.into_iter())
            .zip(lats.f64()?.into_iter())
        {
            // A null coordinate breaks the polyline, as in R map exports
            let (Some(lon), Some(lat)) = (lon, lat) else {
                current = None;
                continue;
            };
            let group = group.unwrap_or_default();
            if current.as_deref() != Some(group) {
                rings.push(Vec::new());
                current = Some(group.to_string());
            }
            if let Some(ring) = rings.last_mut() {
                ring.push(GeoPoint { lon, lat });
            }
        }
        rings.retain(|r| !r.is_empty());
        Ok(Self { rings })
    }

    /// Polylines whose extent overlaps `bounds`.
    pub fn visible_in<'a>(
        &'a self,
        bounds: &'a GeoBounds,
    ) -> impl Iterator<Item = &'a Vec<GeoPoint>> {
        self.rings.iter().filter(move |ring| {
            GeoBounds::around(ring).is_some_and(|extent| extent.intersects(bounds))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_frame_is_closed_rectangle() {
        let bounds = GeoBounds {
            lon: (-90.0, -80.0),
            lat: (30.0, 35.0),
        };
        let outline = Outline::frame(&bounds);
        assert_eq!(outline.rings.len(), 1);
        let ring = &outline.rings[0];
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_from_file_groups_polylines() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("outline.csv");
        std::fs::write(
            &path,
            "group,long,lat\n1,-88.0,30.0\n1,-85.0,30.0\n1,-85.0,35.0\n2,-70.0,40.0\n2,-71.0,41.0\n",
        )
        .unwrap();

        let outline = Outline::from_file(&path).unwrap();
        assert_eq!(outline.rings.len(), 2);
        assert_eq!(outline.rings[0].len(), 3);
        assert_eq!(outline.rings[1][0], GeoPoint { lon: -70.0, lat: 40.0 });
    }

    #[test]
    fn test_missing_columns_rejected() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("outline.csv");
        std::fs::write(&path, "x,y\n1,2\n").unwrap();

        assert!(matches!(
            Outline::from_file(&path),
            Err(OutlineError::Load(LoaderError::MissingColumn { .. }))
        ));
    }

    #[test]
    fn test_visible_in_skips_far_rings() {
        let outline = Outline {
            rings: vec![
                vec![GeoPoint { lon: -86.0, lat: 32.0 }],
                vec![GeoPoint { lon: 10.0, lat: 50.0 }],
            ],
        };
        let bounds = GeoBounds {
            lon: (-88.0, -84.0),
            lat: (30.0, 35.0),
        };
        assert_eq!(outline.visible_in(&bounds).count(), 1);
    }

    #[test]
    fn test_visible_in_keeps_surrounding_ring() {
        let outline = Outline::frame(&GeoBounds {
            lon: (-100.0, -70.0),
            lat: (20.0, 50.0),
        });
        let bounds = GeoBounds {
            lon: (-88.0, -84.0),
            lat: (30.0, 35.0),
        };
        assert_eq!(outline.visible_in(&bounds).count(), 1);
    }
}
