//! Top-N bar chart panel: one bar per country, value labels above the bars.

use super::text::fit_label;
use super::util::{BACKGROUND, FONT_COLOR, GRID_COLOR, compact_count};
use crate::models::TopNRanking;
use anyhow::{Result, anyhow};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_svg::SVGBackend;

const MARGIN_LEFT: u32 = 48;
const MARGIN_RIGHT: u32 = 12;
const MARGIN_TOP: u32 = 20;
const MARGIN_BOTTOM: u32 = 30;
const LABEL_FONT_PX: u32 = 10;
const Y_TICKS: usize = 4;

/// Render `ranking` as an SVG bar chart of `size` pixels.
pub fn render_bars(ranking: &TopNRanking, size: (u32, u32)) -> Result<String> {
    let (r, g, b) = ranking.metric.color();
    let bar_color = RGBColor(r, g, b);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&BACKGROUND).map_err(|e| anyhow!("{:?}", e))?;

        if ranking.is_empty() {
            let style = ("sans-serif", 14)
                .into_font()
                .color(&FONT_COLOR)
                .pos(Pos::new(HPos::Center, VPos::Center));
            root.draw(&Text::new(
                "no data",
                (size.0 as i32 / 2, size.1 as i32 / 2),
                style,
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
            root.present().map_err(|e| anyhow!("{:?}", e))?;
            drop(root);
            return Ok(svg);
        }

        let n = ranking.len() as f64;
        let max_val = ranking.values().into_iter().max().unwrap_or(0).max(0) as f64;
        let y_max = if max_val > 0.0 { max_val * 1.12 } else { 1.0 };

        let mut chart = ChartBuilder::on(&root)
            .margin_left(MARGIN_LEFT)
            .margin_right(MARGIN_RIGHT)
            .margin_top(MARGIN_TOP)
            .margin_bottom(MARGIN_BOTTOM)
            .build_cartesian_2d(0f64..n, 0f64..y_max)
            .map_err(|e| anyhow!("{:?}", e))?;

        // Horizontal grid with compact tick labels on the left.
        let tick_style = ("sans-serif", LABEL_FONT_PX)
            .into_font()
            .color(&FONT_COLOR)
            .pos(Pos::new(HPos::Right, VPos::Center));
        for i in 0..=Y_TICKS {
            let v = y_max * i as f64 / Y_TICKS as f64;
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(0.0, v), (n, v)],
                    GRID_COLOR.stroke_width(1),
                )))
                .map_err(|e| anyhow!("{:?}", e))?;
            let (px, py) = chart.backend_coord(&(0.0, v));
            root.draw(&Text::new(compact_count(v), (px - 4, py), tick_style.clone()))
                .map_err(|e| anyhow!("{:?}", e))?;
        }

        chart
            .draw_series(ranking.entries.iter().enumerate().map(|(i, (_, v))| {
                let x0 = i as f64 + 0.1;
                let x1 = i as f64 + 0.9;
                Rectangle::new([(x0, 0.0), (x1, *v as f64)], bar_color.filled())
            }))
            .map_err(|e| anyhow!("{:?}", e))?;

        // Country names under, values over each bar.
        let slot_px = (size.0.saturating_sub(MARGIN_LEFT + MARGIN_RIGHT) as f64 / n).max(1.0) as u32;
        let name_style = ("sans-serif", LABEL_FONT_PX)
            .into_font()
            .color(&FONT_COLOR)
            .pos(Pos::new(HPos::Center, VPos::Top));
        let value_style = ("sans-serif", LABEL_FONT_PX)
            .into_font()
            .color(&FONT_COLOR)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        for (i, (country, v)) in ranking.entries.iter().enumerate() {
            let (bx, by) = chart.backend_coord(&(i as f64 + 0.5, 0.0));
            let label = fit_label(country, LABEL_FONT_PX, slot_px.saturating_sub(4));
            root.draw(&Text::new(label, (bx, by + 4), name_style.clone()))
                .map_err(|e| anyhow!("{:?}", e))?;
            let (tx, ty) = chart.backend_coord(&(i as f64 + 0.5, *v as f64));
            root.draw(&Text::new(compact_count(*v as f64), (tx, ty - 2), value_style.clone()))
                .map_err(|e| anyhow!("{:?}", e))?;
        }

        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metric;

    #[test]
    fn bars_carry_metric_color_and_labels() {
        let ranking = TopNRanking {
            metric: Metric::Deaths,
            entries: vec![("Italy".into(), 12_000), ("Spain".into(), 9_000)],
        };
        let svg = render_bars(&ranking, (400, 160)).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Italy"));
        assert!(svg.contains("12k"));
        // crimson
        assert!(svg.to_uppercase().contains("#DC143C"));
    }

    #[test]
    fn empty_ranking_renders_placeholder() {
        let ranking = TopNRanking {
            metric: Metric::Confirmed,
            entries: vec![],
        };
        let svg = render_bars(&ranking, (400, 160)).unwrap();
        assert!(svg.contains("no data"));
    }
}
