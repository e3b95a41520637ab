//! World map panel: land outline plus one square marker per record, colored by
//! confirmed count.
//!
//! Markers are drawn with plotters onto an in-memory SVG. Hover text cannot be
//! expressed through plotters, so the renderer also returns each marker's
//! pixel box; the page template lays an invisible `<title>` layer over them.

use super::outline::{ShapeKind, world_outline};
use super::types::Projection;
use super::util::{
    BACKGROUND, COAST_COLOR, FONT_COLOR, GRID_COLOR, LAKE_COLOR, LAND_COLOR, MARKER_LINE,
    OCEAN_COLOR, compact_count, confirmed_color, scale_at,
};
use crate::models::CaseRecord;
use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_svg::SVGBackend;
use serde::Serialize;

/// Half edge of a square marker (10px markers).
const MARKER_HALF: i32 = 5;
/// Space reserved on the left for the colorbar.
const COLORBAR_GUTTER: i32 = 90;
const MARGIN: i32 = 12;

/// Pixel rectangle the projection maps into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Hover target for one drawn marker, in panel pixel coordinates.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapMarker {
    pub x: i32,
    pub y: i32,
    pub size: i32,
    pub hover: String,
}

/// Rendered map panel.
#[derive(Debug, Clone)]
pub struct MapPanel {
    pub svg: String,
    pub width: u32,
    pub height: u32,
    pub markers: Vec<MapMarker>,
}

impl Projection {
    /// Project `(lon, lat)` in degrees into `frame`. `None` when the point is
    /// out of range or on the hidden side of an orthographic globe.
    pub fn project(&self, lon: f64, lat: f64, frame: Frame) -> Option<(i32, i32)> {
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        match *self {
            Projection::Equirectangular => {
                let x = frame.x as f64 + (lon + 180.0) / 360.0 * frame.w as f64;
                let y = frame.y as f64 + (90.0 - lat) / 180.0 * frame.h as f64;
                Some((x.round() as i32, y.round() as i32))
            }
            Projection::Orthographic { lon0, lat0 } => {
                let (ux, uy, cos_c) = orthographic_unit(lon, lat, lon0, lat0);
                if cos_c < 0.0 {
                    return None;
                }
                Some(disc_point(ux, uy, frame))
            }
        }
    }

    /// Like [`project`](Self::project), but a far-side point of the globe is
    /// pulled onto the horizon instead of dropped, so clipped outlines stay
    /// closed. Returns the point and whether it was actually visible.
    pub fn project_clamped(&self, lon: f64, lat: f64, frame: Frame) -> Option<((i32, i32), bool)> {
        match *self {
            Projection::Equirectangular => self.project(lon, lat, frame).map(|p| (p, true)),
            Projection::Orthographic { lon0, lat0 } => {
                if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
                    return None;
                }
                let (ux, uy, cos_c) = orthographic_unit(lon, lat, lon0, lat0);
                if cos_c >= 0.0 {
                    return Some((disc_point(ux, uy, frame), true));
                }
                let len = ux.hypot(uy);
                // antipode of the center has no horizon direction
                if len < 1e-9 {
                    return None;
                }
                Some((disc_point(ux / len, uy / len, frame), false))
            }
        }
    }

    /// Largest frame with the projection's aspect ratio inside `area`, centered.
    pub fn fit(&self, area: Frame) -> Frame {
        let (w, h) = match self {
            Projection::Equirectangular => {
                let w = area.w.min(area.h * 2);
                (w, w / 2)
            }
            Projection::Orthographic { .. } => {
                let d = area.w.min(area.h);
                (d, d)
            }
        };
        Frame {
            x: area.x + (area.w - w) / 2,
            y: area.y + (area.h - h) / 2,
            w,
            h,
        }
    }
}

/// Offset on the unit disc plus the cosine of the angular distance from the center.
fn orthographic_unit(lon: f64, lat: f64, lon0: f64, lat0: f64) -> (f64, f64, f64) {
    let (lam, phi) = (lon.to_radians(), lat.to_radians());
    let (lam0, phi0) = (lon0.to_radians(), lat0.to_radians());
    let cos_c = phi0.sin() * phi.sin() + phi0.cos() * phi.cos() * (lam - lam0).cos();
    let x = phi.cos() * (lam - lam0).sin();
    let y = phi0.cos() * phi.sin() - phi0.sin() * phi.cos() * (lam - lam0).cos();
    (x, y, cos_c)
}

fn disc_point(ux: f64, uy: f64, frame: Frame) -> (i32, i32) {
    let r = frame.w.min(frame.h) as f64 / 2.0;
    let cx = frame.x as f64 + frame.w as f64 / 2.0;
    let cy = frame.y as f64 + frame.h as f64 / 2.0;
    ((cx + r * ux).round() as i32, (cy - r * uy).round() as i32)
}

/// Hover text for a record, one field per line.
pub fn hover_text(r: &CaseRecord) -> String {
    format!(
        "{} {}\nConfirmed: {}\nDeaths: {}\nRecovered: {}\nLast updated: {}",
        r.country, r.region, r.confirmed, r.deaths, r.recovered, r.last_update
    )
}

/// Draw the map panel for `records` at `size` pixels.
pub fn render_map(records: &[CaseRecord], projection: Projection, size: (u32, u32)) -> Result<MapPanel> {
    let (width, height) = size;
    let max_confirmed = records.iter().map(|r| r.confirmed).max().unwrap_or(0).max(0);
    let area = Frame {
        x: COLORBAR_GUTTER,
        y: MARGIN,
        w: (width as i32 - COLORBAR_GUTTER - MARGIN).max(20),
        h: (height as i32 - 2 * MARGIN).max(20),
    };
    let frame = projection.fit(area);

    let mut svg = String::new();
    let mut markers = Vec::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&BACKGROUND).map_err(|e| anyhow!("{:?}", e))?;

        draw_ocean(&root, projection, frame)?;
        draw_graticule(&root, projection, frame)?;
        draw_outline(&root, projection, frame)?;

        for r in records {
            let Some((lon, lat)) = r.position() else {
                continue;
            };
            let Some((x, y)) = projection.project(lon, lat, frame) else {
                continue;
            };
            let corners = [
                (x - MARKER_HALF, y - MARKER_HALF),
                (x + MARKER_HALF, y + MARKER_HALF),
            ];
            let fill = confirmed_color(r.confirmed, max_confirmed).mix(0.8).filled();
            root.draw(&Rectangle::new(corners, fill))
                .map_err(|e| anyhow!("{:?}", e))?;
            root.draw(&Rectangle::new(corners, MARKER_LINE.stroke_width(1)))
                .map_err(|e| anyhow!("{:?}", e))?;
            markers.push(MapMarker {
                x: x - MARKER_HALF,
                y: y - MARKER_HALF,
                size: 2 * MARKER_HALF,
                hover: hover_text(r),
            });
        }

        draw_colorbar(&root, max_confirmed, height as i32)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }

    log::debug!("map: {} of {} records drawn", markers.len(), records.len());
    Ok(MapPanel {
        svg,
        width,
        height,
        markers,
    })
}

fn draw_ocean<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    projection: Projection,
    frame: Frame,
) -> Result<()> {
    let style = OCEAN_COLOR.filled();
    match projection {
        Projection::Equirectangular => root.draw(&Rectangle::new(
            [(frame.x, frame.y), (frame.x + frame.w, frame.y + frame.h)],
            style,
        )),
        Projection::Orthographic { .. } => root.draw(&Circle::new(
            (frame.x + frame.w / 2, frame.y + frame.h / 2),
            frame.w.min(frame.h) / 2,
            style,
        )),
    }
    .map_err(|e| anyhow!("{:?}", e))
}

/// Land in white with a coastline stroke, then lakes on top. Shapes with no
/// visible vertex are skipped.
fn draw_outline<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    projection: Projection,
    frame: Frame,
) -> Result<()> {
    let coast = COAST_COLOR.stroke_width(1);
    let mut drawn = 0;
    for shape in world_outline()? {
        let mut any_visible = false;
        let points: Vec<(i32, i32)> = shape
            .ring
            .iter()
            .filter_map(|&(lon, lat)| projection.project_clamped(lon, lat, frame))
            .map(|(p, visible)| {
                any_visible |= visible;
                p
            })
            .collect();
        if !any_visible || points.len() < 3 {
            continue;
        }
        let fill = match shape.kind {
            ShapeKind::Land => LAND_COLOR.filled(),
            ShapeKind::Lake => LAKE_COLOR.filled(),
        };
        root.draw(&Polygon::new(points.clone(), fill))
            .map_err(|e| anyhow!("{:?}", e))?;
        let mut closed = points;
        closed.push(closed[0]);
        root.draw(&PathElement::new(closed, coast.clone()))
            .map_err(|e| anyhow!("{:?}", e))?;
        drawn += 1;
    }
    log::debug!("map: {drawn} outline shapes drawn");
    Ok(())
}

/// Meridians and parallels every 30°, split wherever the projection hides a point.
fn draw_graticule<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    projection: Projection,
    frame: Frame,
) -> Result<()> {
    let style = GRID_COLOR.mix(0.9).stroke_width(1);
    let mut lines: Vec<Vec<(f64, f64)>> = Vec::new();
    for lon in (-180..=180).step_by(30) {
        lines.push((-90..=90).step_by(5).map(|lat| (lon as f64, lat as f64)).collect());
    }
    for lat in (-60..=60).step_by(30) {
        lines.push((-180..=180).step_by(5).map(|lon| (lon as f64, lat as f64)).collect());
    }

    for line in lines {
        let mut run: Vec<(i32, i32)> = Vec::new();
        for (lon, lat) in line {
            match projection.project(lon, lat, frame) {
                Some(p) => run.push(p),
                None => {
                    if run.len() > 1 {
                        root.draw(&PathElement::new(std::mem::take(&mut run), style.clone()))
                            .map_err(|e| anyhow!("{:?}", e))?;
                    }
                    run.clear();
                }
            }
        }
        if run.len() > 1 {
            root.draw(&PathElement::new(run, style.clone()))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }
    Ok(())
}

fn draw_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    max_confirmed: i64,
    height: i32,
) -> Result<()> {
    const BAR_X: i32 = 14;
    const BAR_W: i32 = 16;
    const STEPS: i32 = 50;
    let top = MARGIN + 48;
    let bottom = (height - MARGIN - 12).max(top + STEPS);
    let step_h = ((bottom - top) as f64 / STEPS as f64).max(1.0);

    let title = ("sans-serif", 12).into_font().color(&FONT_COLOR);
    root.draw(&Text::new("Confirmed Cases", (BAR_X - 6, MARGIN), title.clone()))
        .map_err(|e| anyhow!("{:?}", e))?;
    root.draw(&Text::new("Latest Update", (BAR_X - 6, MARGIN + 16), title))
        .map_err(|e| anyhow!("{:?}", e))?;

    // Top of the bar is the maximum.
    for i in 0..STEPS {
        let t = 1.0 - (i as f64 + 0.5) / STEPS as f64;
        let y0 = top + (i as f64 * step_h).round() as i32;
        let y1 = top + ((i + 1) as f64 * step_h).round() as i32;
        root.draw(&Rectangle::new([(BAR_X, y0), (BAR_X + BAR_W, y1)], scale_at(t).filled()))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    let tick = ("sans-serif", 11)
        .into_font()
        .color(&FONT_COLOR)
        .pos(Pos::new(HPos::Left, VPos::Center));
    root.draw(&Text::new(
        compact_count(max_confirmed as f64),
        (BAR_X + BAR_W + 4, top),
        tick.clone(),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    root.draw(&Text::new("0", (BAR_X + BAR_W + 4, bottom), tick))
        .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
