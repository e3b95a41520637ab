//! Utility functions for the renderer: theme colors, color scale, number formatting, locale mapping.

use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;

/// Dark theme palette (paper/plot background, text, grid lines).
pub const BACKGROUND: RGBColor = RGBColor(17, 17, 17);
pub const FONT_COLOR: RGBColor = RGBColor(242, 245, 250);
pub const GRID_COLOR: RGBColor = RGBColor(40, 52, 66);
pub const OCEAN_COLOR: RGBColor = RGBColor(51, 153, 255);
pub const MARKER_LINE: RGBColor = RGBColor(102, 102, 102);
/// Map fills: white land, light blue lakes, dark coastline.
pub const LAND_COLOR: RGBColor = RGBColor(255, 255, 255);
pub const LAKE_COLOR: RGBColor = RGBColor(173, 216, 230);
pub const COAST_COLOR: RGBColor = RGBColor(68, 68, 68);

/// Sequential red scale, reversed: 0 is deep red, the maximum is light grey.
const CONFIRMED_SCALE: [(f64, (u8, u8, u8)); 4] = [
    (0.0, (178, 10, 28)),
    (0.6, (245, 160, 105)),
    (0.8, (245, 195, 157)),
    (1.0, (220, 220, 220)),
];

/// Color for `value` on the `0..=max` confirmed scale. Values are clamped.
pub fn confirmed_color(value: i64, max: i64) -> RGBColor {
    let t = if max <= 0 {
        0.0
    } else {
        (value as f64 / max as f64).clamp(0.0, 1.0)
    };
    scale_at(t)
}

/// Linear interpolation inside the confirmed scale, `t` in `0..=1`.
pub fn scale_at(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    for pair in CONFIRMED_SCALE.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
            return RGBColor(lerp(c0.0, c1.0), lerp(c0.1, c1.1), lerp(c0.2, c1.2));
        }
    }
    let (r, g, b) = CONFIRMED_SCALE[CONFIRMED_SCALE.len() - 1].1;
    RGBColor(r, g, b)
}

/// Pick a single scale and its human label based on the overall magnitude.
/// Returns (scale, suffix), e.g. (1e6, "M").
pub fn choose_axis_scale(max_abs: f64) -> (f64, &'static str) {
    if max_abs >= 1.0e12 {
        (1.0e12, "T")
    } else if max_abs >= 1.0e9 {
        (1.0e9, "B")
    } else if max_abs >= 1.0e6 {
        (1.0e6, "M")
    } else if max_abs >= 1.0e3 {
        (1.0e3, "k")
    } else {
        (1.0, "")
    }
}

/// Short label for bars and ticks: `950`, `12.3k`, `1.2M`.
pub fn compact_count(v: f64) -> String {
    let (scale, suffix) = choose_axis_scale(v.abs());
    if suffix.is_empty() {
        return format!("{}", v.round() as i64);
    }
    let scaled = v / scale;
    let prec = if scaled.abs() >= 100.0 { 0 } else { 1 };
    let s = format!("{:.*}", prec, scaled);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    };
    format!("{s}{suffix}")
}

/// Whole number with locale thousands separators, e.g. `1,234,567` or `1.234.567`.
pub fn format_count(v: i64, locale: &Locale) -> String {
    v.to_formatted_string(locale)
}

/// Map a user-provided locale tag to a `num_format::Locale`.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en, // default
    }
}

/// `#rrggbb` for use in the HTML template.
pub fn hex(c: (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", c.0, c.1, c.2)
}
