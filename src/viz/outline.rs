//! Bundled low-resolution world outline: land masses and a few large lakes.
//!
//! The asset is a GeoJSON `FeatureCollection` of `Polygon` features, each
//! tagged with a `name` and a `kind` (`land` or `lake`). Only exterior rings
//! are used; lakes are drawn over land instead of as holes.

use anyhow::{Context, Result};
use serde::Deserialize;

const WORLD_OUTLINE: &str = include_str!("../../assets/world_outline.geojson");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Land,
    Lake,
}

/// One closed ring of `(lon, lat)` vertices in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub name: String,
    pub kind: ShapeKind,
    pub ring: Vec<(f64, f64)>,
}

#[derive(Deserialize)]
struct Collection {
    features: Vec<FeatureDoc>,
}

#[derive(Deserialize)]
struct FeatureDoc {
    properties: Properties,
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Properties {
    name: String,
    kind: ShapeKind,
}

#[derive(Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum Geometry {
    Polygon(Vec<Vec<[f64; 2]>>),
}

/// Parse the bundled outline. Land comes before lakes so drawing in order
/// leaves lakes on top.
pub fn world_outline() -> Result<Vec<Shape>> {
    parse_outline(WORLD_OUTLINE).context("parse bundled world outline")
}

fn parse_outline(text: &str) -> Result<Vec<Shape>> {
    let doc: Collection = serde_json::from_str(text)?;
    let mut shapes: Vec<Shape> = doc
        .features
        .into_iter()
        .filter_map(|f| {
            let Geometry::Polygon(rings) = f.geometry;
            let exterior = rings.into_iter().next()?;
            Some(Shape {
                name: f.properties.name,
                kind: f.properties.kind,
                ring: exterior.into_iter().map(|[lon, lat]| (lon, lat)).collect(),
            })
        })
        .filter(|s| s.ring.len() >= 3)
        .collect();
    shapes.sort_by_key(|s| s.kind != ShapeKind::Land);
    Ok(shapes)
}
