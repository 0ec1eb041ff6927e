//! Coordinates, sentinel cleanup and map bounds.

/// Longitudes above this are the data provider's "unknown" marker.
pub const LONGITUDE_SENTINEL: f64 = 900.0;
/// Latitudes above this are the data provider's "unknown" marker.
pub const LATITUDE_SENTINEL: f64 = 90.0;

// Continental US, used when no coordinate survives cleanup.
const FALLBACK_LON: (f64, f64) = (-125.0, -66.0);
const FALLBACK_LAT: (f64, f64) = (24.0, 50.0);

/// Half-width given to an axis whose observed range is a single value.
const MIN_HALF_SPAN: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

/// Drop sentinel or non-finite longitudes.
pub fn clean_longitude(lon: Option<f64>) -> Option<f64> {
    lon.filter(|v| v.is_finite() && *v <= LONGITUDE_SENTINEL)
}

/// Drop sentinel or non-finite latitudes.
pub fn clean_latitude(lat: Option<f64>) -> Option<f64> {
    lat.filter(|v| v.is_finite() && *v <= LATITUDE_SENTINEL)
}

/// Cleaned coordinate columns of one state's accidents.
#[derive(Debug, Clone, Default)]
pub struct Coordinates {
    pub lons: Vec<Option<f64>>,
    pub lats: Vec<Option<f64>>,
}

impl Coordinates {
    pub fn from_raw<L, T>(lons: L, lats: T) -> Self
    where
        L: IntoIterator<Item = Option<f64>>,
        T: IntoIterator<Item = Option<f64>>,
    {
        Self {
            lons: lons.into_iter().map(clean_longitude).collect(),
            lats: lats.into_iter().map(clean_latitude).collect(),
        }
    }

    /// Rows where both coordinates survived cleanup.
    pub fn points(&self) -> Vec<GeoPoint> {
        self.lons
            .iter()
            .zip(self.lats.iter())
            .filter_map(|(lon, lat)| match (lon, lat) {
                (Some(lon), Some(lat)) => Some(GeoPoint { lon: *lon, lat: *lat }),
                _ => None,
            })
            .collect()
    }

    /// Per-axis observed range of the cleaned values.
    pub fn bounds(&self) -> GeoBounds {
        GeoBounds {
            lon: axis_range(&self.lons).unwrap_or(FALLBACK_LON),
            lat: axis_range(&self.lats).unwrap_or(FALLBACK_LAT),
        }
    }
}

fn axis_range(values: &[Option<f64>]) -> Option<(f64, f64)> {
    values.iter().flatten().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub lon: (f64, f64),
    pub lat: (f64, f64),
}

impl GeoBounds {
    /// Widen each axis by `fraction` of its span, giving flat axes a minimum span.
    pub fn padded(self, fraction: f64) -> Self {
        Self {
            lon: pad_axis(self.lon, fraction),
            lat: pad_axis(self.lat, fraction),
        }
    }

    pub fn contains(&self, p: GeoPoint) -> bool {
        (self.lon.0..=self.lon.1).contains(&p.lon) && (self.lat.0..=self.lat.1).contains(&p.lat)
    }

    /// Smallest box around `points`, or `None` when there are none.
    pub fn around(points: &[GeoPoint]) -> Option<Self> {
        let lons: Vec<Option<f64>> = points.iter().map(|p| Some(p.lon)).collect();
        let lats: Vec<Option<f64>> = points.iter().map(|p| Some(p.lat)).collect();
        Some(Self {
            lon: axis_range(&lons)?,
            lat: axis_range(&lats)?,
        })
    }

    pub fn intersects(&self, other: &GeoBounds) -> bool {
        self.lon.0 <= other.lon.1
            && other.lon.0 <= self.lon.1
            && self.lat.0 <= other.lat.1
            && other.lat.0 <= self.lat.1
    }
}

fn pad_axis((lo, hi): (f64, f64), fraction: f64) -> (f64, f64) {
    let span = hi - lo;
    if span <= 0.0 {
        return (lo - MIN_HALF_SPAN, hi + MIN_HALF_SPAN);
    }
    (lo - span * fraction, hi + span * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_missing() {
        assert_eq!(clean_longitude(Some(999.9999)), None);
        assert_eq!(clean_longitude(Some(-86.5)), Some(-86.5));
        assert_eq!(clean_longitude(Some(900.0)), Some(900.0));
        assert_eq!(clean_latitude(Some(99.9999)), None);
        assert_eq!(clean_latitude(Some(77.7777)), Some(77.7777));
        assert_eq!(clean_latitude(None), None);
        assert_eq!(clean_latitude(Some(f64::NAN)), None);
    }

    #[test]
    fn test_points_need_both_coordinates() {
        let coords = Coordinates::from_raw(
            vec![Some(-86.0), Some(999.9999), Some(-87.0)],
            vec![Some(32.0), Some(33.0), Some(99.9999)],
        );
        assert_eq!(coords.points(), vec![GeoPoint { lon: -86.0, lat: 32.0 }]);
    }

    #[test]
    fn test_bounds_use_cleaned_axes_independently() {
        let coords = Coordinates::from_raw(
            vec![Some(-86.0), Some(999.9999), Some(-88.0)],
            vec![Some(32.0), Some(35.0), Some(99.9999)],
        );
        let b = coords.bounds();
        assert_eq!(b.lon, (-88.0, -86.0));
        assert_eq!(b.lat, (32.0, 35.0));
    }

    #[test]
    fn test_all_sentinel_bounds_fall_back() {
        let coords = Coordinates::from_raw(vec![Some(999.9999)], vec![Some(99.9999)]);
        assert!(coords.points().is_empty());
        assert_eq!(coords.bounds().lon, FALLBACK_LON);
        assert_eq!(coords.bounds().lat, FALLBACK_LAT);
    }

    #[test]
    fn test_padding_flat_axis() {
        let b = GeoBounds {
            lon: (-86.0, -86.0),
            lat: (30.0, 40.0),
        }
        .padded(0.1);
        assert_eq!(b.lon, (-86.5, -85.5));
        assert_eq!(b.lat, (29.0, 41.0));
        assert!(b.contains(GeoPoint { lon: -86.0, lat: 35.0 }));
        assert!(!b.contains(GeoPoint { lon: -80.0, lat: 35.0 }));
    }

    #[test]
    fn test_around_and_intersects() {
        let ring = [
            GeoPoint { lon: -90.0, lat: 30.0 },
            GeoPoint { lon: -80.0, lat: 36.0 },
        ];
        let outer = GeoBounds::around(&ring).unwrap();
        assert_eq!(outer.lon, (-90.0, -80.0));
        assert_eq!(outer.lat, (30.0, 36.0));
        assert!(GeoBounds::around(&[]).is_none());

        let inner = GeoBounds {
            lon: (-86.0, -85.0),
            lat: (32.0, 33.0),
        };
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
        let far = GeoBounds {
            lon: (10.0, 11.0),
            lat: (50.0, 51.0),
        };
        assert!(!far.intersects(&inner));
    }
}
