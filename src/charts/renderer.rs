//! Static Map Renderer
//! Draws accident points over an outline with plotters.
//!
//! Layout:
//! 1. White background
//! 2. Outline polylines (black)
//! 3. Accident points (filled red dots)
//!
//! No text is drawn, so rendering needs no system fonts.

use super::geo::{GeoBounds, GeoPoint};
use super::outline::Outline;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const POINT_COLOR: RGBColor = RGBColor(200, 30, 30);
const OUTLINE_COLOR: RGBColor = RGBColor(0, 0, 0);
const MARGIN: u32 = 10;

#[derive(Error, Debug)]
#[error("Failed to render map: {0}")]
pub struct RenderError(String);

/// Output format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Svg,
    Png,
}

impl ImageKind {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => ImageKind::Svg,
            _ => ImageKind::Png,
        }
    }
}

/// What to draw and how big.
pub struct MapScene<'a> {
    pub bounds: GeoBounds,
    pub outline: &'a Outline,
    pub points: &'a [GeoPoint],
    pub size: (u32, u32),
    pub point_radius: u32,
}

pub struct StaticMapRenderer;

impl StaticMapRenderer {
    /// Render the scene to `path` as SVG or PNG.
    pub fn render_to_file(path: &Path, scene: &MapScene<'_>) -> Result<(), RenderError> {
        match ImageKind::from_path(path) {
            ImageKind::Svg => {
                let root = SVGBackend::new(path, scene.size).into_drawing_area();
                Self::draw(root, scene)
            }
            ImageKind::Png => {
                let root = BitMapBackend::new(path, scene.size).into_drawing_area();
                Self::draw(root, scene)
            }
        }
    }

    fn draw<DB>(root: DrawingArea<DB, Shift>, scene: &MapScene<'_>) -> Result<(), RenderError>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let err = |e: DrawingAreaErrorKind<DB::ErrorType>| RenderError(e.to_string());

        root.fill(&WHITE).map_err(err)?;

        let (x0, x1) = scene.bounds.lon;
        let (y0, y1) = scene.bounds.lat;
        let mut chart = ChartBuilder::on(&root)
            .margin(MARGIN)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(err)?;

        chart
            .draw_series(
                scene
                    .outline
                    .visible_in(&scene.bounds)
                    .map(|ring| PathElement::new(to_xy(ring), OUTLINE_COLOR)),
            )
            .map_err(err)?;

        chart
            .draw_series(scene.points.iter().map(|p| {
                Circle::new((p.lon, p.lat), scene.point_radius, POINT_COLOR.filled())
            }))
            .map_err(err)?;

        root.present().map_err(err)?;
        Ok(())
    }
}

fn to_xy(ring: &[GeoPoint]) -> Vec<(f64, f64)> {
    ring.iter().map(|p| (p.lon, p.lat)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn scene_bounds() -> GeoBounds {
        GeoBounds {
            lon: (-88.0, -85.0),
            lat: (30.0, 35.0),
        }
    }

    #[test]
    fn test_image_kind_from_extension() {
        assert_eq!(ImageKind::from_path(Path::new("map.svg")), ImageKind::Svg);
        assert_eq!(ImageKind::from_path(Path::new("map.SVG")), ImageKind::Svg);
        assert_eq!(ImageKind::from_path(Path::new("map.png")), ImageKind::Png);
        assert_eq!(ImageKind::from_path(Path::new("map")), ImageKind::Png);
    }

    #[test]
    fn test_svg_contains_one_circle_per_point() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("map.svg");
        let bounds = scene_bounds();
        let outline = Outline::frame(&bounds);
        let points = vec![
            GeoPoint { lon: -86.0, lat: 32.0 },
            GeoPoint { lon: -87.0, lat: 33.0 },
        ];
        let scene = MapScene {
            bounds,
            outline: &outline,
            points: &points,
            size: (400, 300),
            point_radius: 2,
        };

        StaticMapRenderer::render_to_file(&path, &scene).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn test_png_with_no_points() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("map.png");
        let bounds = scene_bounds();
        let outline = Outline::frame(&bounds);
        let scene = MapScene {
            bounds,
            outline: &outline,
            points: &[],
            size: (200, 150),
            point_radius: 2,
        };

        StaticMapRenderer::render_to_file(&path, &scene).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
