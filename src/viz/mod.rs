//! Dashboard renderer: a fixed 4×6 grid rendered to one self-contained **HTML** page.
//!
//! - Map panel (rows 1–4, cols 1–3): one marker per record, colored by confirmed count
//! - Indicator panels (row 1, cols 4–6): global confirmed / recovered / deaths
//! - Bar panels (rows 2–4, cols 4–6): top-N countries per metric
//!
//! Charts are drawn with plotters onto in-memory SVG; the page around them is a
//! tera template with a dark theme.

pub mod bars;
pub mod map;
pub mod outline;
pub mod text;
pub mod types;
pub mod util;

// Re-export types for public API
pub use map::{Frame, MapMarker, MapPanel};
pub use types::{DASHBOARD_LAYOUT, DashboardOptions, GridCell, PanelKind, Projection};

use crate::models::{CaseRecord, Metric, Summary, TopNRanking};
use anyhow::{Context as _, Result};
use serde::Serialize;
use std::path::Path;
use tera::{Context, Tera};

use util::{hex, map_locale};

/// Attribution shown under the map.
pub const SOURCE_NOTE: &str = "Source: https://bit.ly/2WUrgoh";

const TEMPLATE_NAME: &str = "dashboard.html";

#[derive(Debug, Serialize)]
struct PanelView {
    kind: &'static str,
    row: u8,
    col: u8,
    row_span: u8,
    col_span: u8,
    title: String,
    value: String,
    svg: String,
    color: String,
}

#[derive(Debug, Serialize)]
struct LegendItem {
    label: &'static str,
    color: String,
}

/// Dashboard title; the date comes from the first record, not the newest one.
pub fn dashboard_title(records: &[CaseRecord]) -> String {
    let date = records
        .first()
        .map(|r| r.last_update.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!("Global COVID-19 Cases (Last Updated: {date})")
}

fn ranking_for(summary: &Summary, metric: Metric) -> &TopNRanking {
    match metric {
        Metric::Confirmed => &summary.top_confirmed,
        Metric::Recovered => &summary.top_recovered,
        Metric::Deaths => &summary.top_deaths,
    }
}

/// Render the full dashboard page as an HTML string.
pub fn render_dashboard(
    records: &[CaseRecord],
    summary: &Summary,
    opts: &DashboardOptions,
) -> Result<String> {
    let num_locale = map_locale(&opts.locale);
    let map = map::render_map(records, opts.projection, opts.map_size).context("render map")?;

    let mut panels = Vec::with_capacity(DASHBOARD_LAYOUT.len());
    for cell in DASHBOARD_LAYOUT.iter() {
        let (kind, title, value, svg, color) = match cell.kind {
            PanelKind::Map => ("map", String::new(), String::new(), String::new(), String::new()),
            PanelKind::Indicator(metric) => (
                "indicator",
                metric.label().to_string(),
                util::format_count(summary.global.metric(metric), num_locale),
                String::new(),
                String::new(),
            ),
            PanelKind::Bar(metric) => (
                "bar",
                metric.label().to_string(),
                String::new(),
                bars::render_bars(ranking_for(summary, metric), opts.bar_size)
                    .with_context(|| format!("render {} bars", metric.label()))?,
                hex(metric.color()),
            ),
        };
        panels.push(PanelView {
            kind,
            row: cell.row,
            col: cell.col,
            row_span: cell.row_span,
            col_span: cell.col_span,
            title,
            value,
            svg,
            color,
        });
    }

    let legend: Vec<LegendItem> = Metric::ALL
        .iter()
        .map(|m| LegendItem {
            label: m.label(),
            color: hex(m.color()),
        })
        .collect();

    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, DASHBOARD_TEMPLATE)
        .context("load dashboard template")?;

    let mut ctx = Context::new();
    ctx.insert("title", &dashboard_title(records));
    ctx.insert("source_note", SOURCE_NOTE);
    ctx.insert("grid_rows", &types::GRID_ROWS);
    ctx.insert("grid_cols", &types::GRID_COLS);
    ctx.insert("panels", &panels);
    ctx.insert("legend", &legend);
    ctx.insert("map_svg", &map.svg);
    ctx.insert("map_width", &map.width);
    ctx.insert("map_height", &map.height);
    ctx.insert("markers", &map.markers);

    tera.render(TEMPLATE_NAME, &ctx)
        .context("render dashboard template")
}

/// Render and write the dashboard to `out_path`, replacing any existing file.
pub fn write_dashboard<P: AsRef<Path>>(
    records: &[CaseRecord],
    summary: &Summary,
    opts: &DashboardOptions,
    out_path: P,
) -> Result<()> {
    let out_path = out_path.as_ref();
    let html = render_dashboard(records, summary, opts)?;
    std::fs::write(out_path, html).with_context(|| format!("write {}", out_path.display()))?;
    log::info!("wrote dashboard to {}", out_path.display());
    Ok(())
}

const DASHBOARD_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<style>
  body { margin: 0; padding: 16px; background: #111111; color: #f2f5fa;
         font-family: "Open Sans", verdana, arial, sans-serif; }
  h1 { font-size: 17px; font-weight: normal; margin: 0 0 8px 0; }
  .legend { display: flex; gap: 18px; margin: 0 0 8px 55%; font-size: 12px; }
  .legend .swatch { display: inline-block; width: 12px; height: 12px; margin-right: 6px;
                    vertical-align: middle; }
  .grid { display: grid; gap: 8px;
          grid-template-columns: repeat({{ grid_cols }}, minmax(0, 1fr));
          grid-template-rows: repeat({{ grid_rows }}, auto); }
  .panel { background: #111111; min-width: 0; }
  .panel svg { max-width: 100%; height: auto; display: block; }
  .indicator { text-align: center; align-self: center; }
  .indicator .title { font-size: 14px; }
  .indicator .value { font-size: 34px; margin-top: 6px; }
  .map { position: relative; }
  .map .hit { position: absolute; left: 0; top: 0; width: 100%; height: auto; }
  .map .hit rect { fill: transparent; pointer-events: all; }
  .note { font-size: 12px; margin-top: 4px; }
</style>
</head>
<body>
<h1>{{ title }}</h1>
<div class="legend">
{% for item in legend %}  <span><span class="swatch" style="background: {{ item.color }}"></span>{{ item.label }}</span>
{% endfor %}</div>
<div class="grid">
{% for p in panels %}  <div class="panel {{ p.kind }}" style="grid-row: {{ p.row }} / span {{ p.row_span }}; grid-column: {{ p.col }} / span {{ p.col_span }};">
{% if p.kind == "map" %}    {{ map_svg | safe }}
    <svg class="hit" viewBox="0 0 {{ map_width }} {{ map_height }}" xmlns="http://www.w3.org/2000/svg">
{% for m in markers %}      <rect x="{{ m.x }}" y="{{ m.y }}" width="{{ m.size }}" height="{{ m.size }}"><title>{{ m.hover }}</title></rect>
{% endfor %}    </svg>
    <div class="note">{{ source_note | safe }}</div>
{% elif p.kind == "indicator" %}    <div class="title">{{ p.title }}</div>
    <div class="value">{{ p.value }}</div>
{% else %}    <div class="title" style="color: {{ p.color }}">{{ p.title }}</div>
    {{ p.svg | safe }}
{% endif %}  </div>
{% endfor %}</div>
</body>
</html>
"##;
