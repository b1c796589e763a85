use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, FontTransform, IntoFont, TextStyle};

use super::annotate::tick_precision;
use super::compose::Figure;
use crate::error::RenderError;
use crate::export::Render;

// Margins around the plotting area, in points.
const MARGIN_TOP: f64 = 55.0;
const MARGIN_BOTTOM: f64 = 45.0;
const MARGIN_LEFT: f64 = 65.0;
const MARGIN_RIGHT: f64 = 15.0;
const TICK_LENGTH: f64 = 3.5;
const TICK_PAD: f64 = 3.0;
const TITLE_PAD: f64 = 15.0;

impl Render for Figure {
    /// Draw the figure. All text is positioned explicitly in backend pixels,
    /// so vector output never needs font metrics.
    fn render<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, scale: f64) -> Result<(), RenderError> {
        let s = &self.style;
        let px = |pt: f64| (pt * scale).round() as i32;
        let line = px(s.line_width).max(1) as u32;
        let edge = BLACK.stroke_width(line);

        let font = |size: f64, style: FontStyle, pos: Pos| {
            TextStyle::from((s.font_family.as_str(), f64::from(px(size)), style).into_font())
                .color(&BLACK)
                .pos(pos)
        };

        root.fill(&WHITE)?;

        let plot_area = root.margin(px(MARGIN_TOP), px(MARGIN_BOTTOM), px(MARGIN_LEFT), px(MARGIN_RIGHT));
        let (x0, x1) = self.x_range();
        let (y0, y1) = self.y_range;
        let mut chart = ChartBuilder::on(&plot_area).build_cartesian_2d(x0..x1, y0..y1)?;

        // ---- Data layers: box, observations, mean ----
        for g in &self.groups {
            let sm = &g.summary;
            let half = s.box_width / 2.0;
            let cap = half / 2.0;
            let (left, right) = (g.position - half, g.position + half);

            chart.draw_series([
                Rectangle::new([(left, sm.q1), (right, sm.q3)], g.color.mix(s.box_alpha).filled()),
                Rectangle::new([(left, sm.q1), (right, sm.q3)], edge),
            ])?;
            chart.draw_series([
                PathElement::new(vec![(left, sm.median), (right, sm.median)], edge),
                PathElement::new(vec![(g.position, sm.q3), (g.position, sm.upper_whisker)], edge),
                PathElement::new(vec![(g.position, sm.q1), (g.position, sm.lower_whisker)], edge),
                PathElement::new(
                    vec![(g.position - cap, sm.upper_whisker), (g.position + cap, sm.upper_whisker)],
                    edge,
                ),
                PathElement::new(
                    vec![(g.position - cap, sm.lower_whisker), (g.position + cap, sm.lower_whisker)],
                    edge,
                ),
            ])?;

            let radius = px(s.point_size / 2.0).max(1);
            let point_fill = g.color.mix(s.point_alpha).filled();
            let point_edge = BLACK.mix(s.point_alpha).stroke_width(line);
            chart.draw_series(g.points.iter().map(|&p| Circle::new(p, radius, point_fill)))?;
            chart.draw_series(g.points.iter().map(|&p| Circle::new(p, radius, point_edge)))?;

            let (cx, cy) = chart.backend_coord(&(g.position, sm.mean));
            let r = px(s.mean_marker_size / 2.0).max(2);
            let diamond = vec![(cx, cy - r), (cx + r, cy), (cx, cy + r), (cx - r, cy), (cx, cy - r)];
            root.draw(&Polygon::new(diamond.clone(), g.color.mix(s.mean_alpha).filled()))?;
            root.draw(&PathElement::new(diamond, BLACK.mix(s.mean_alpha).stroke_width(line * 2)))?;
        }

        // ---- Axes (left and bottom spines only) ----
        let (left_px, top_px) = chart.backend_coord(&(x0, y1));
        let (right_px, bottom_px) = chart.backend_coord(&(x1, y0));
        root.draw(&PathElement::new(
            vec![(left_px, top_px), (left_px, bottom_px), (right_px, bottom_px)],
            edge,
        ))?;

        let tick = px(TICK_LENGTH);
        let step = match self.y_ticks.as_slice() {
            [a, b, ..] => b - a,
            _ => 1.0,
        };
        let precision = tick_precision(step).max(self.y_ticks.first().map_or(0, |t| tick_precision(t.fract().abs())));
        let y_tick_font = font(s.tick_font_size, FontStyle::Normal, Pos::new(HPos::Right, VPos::Center));
        for &t in &self.y_ticks {
            let (_, y) = chart.backend_coord(&(x0, t));
            root.draw(&PathElement::new(vec![(left_px - tick, y), (left_px, y)], edge))?;
            root.draw(&Text::new(
                format!("{t:.precision$}"),
                (left_px - tick - px(TICK_PAD), y),
                y_tick_font.clone(),
            ))?;
        }

        let x_tick_font = font(s.tick_font_size, FontStyle::Normal, Pos::new(HPos::Center, VPos::Top));
        for g in &self.groups {
            let (x, _) = chart.backend_coord(&(g.position, y0));
            root.draw(&PathElement::new(vec![(x, bottom_px), (x, bottom_px + tick)], edge))?;
            root.draw(&Text::new(
                g.summary.label.clone(),
                (x, bottom_px + tick + px(TICK_PAD)),
                x_tick_font.clone(),
            ))?;
        }

        // ---- Labels and title ----
        let mid_x = (left_px + right_px) / 2;
        let mid_y = (top_px + bottom_px) / 2;
        if !s.y_label.is_empty() {
            let y_label_font = font(s.label_font_size, FontStyle::Normal, Pos::new(HPos::Center, VPos::Center))
                .transform(FontTransform::Rotate270);
            root.draw(&Text::new(s.y_label.clone(), (px(s.label_font_size), mid_y), y_label_font))?;
        }

        let title_font = font(s.title_font_size, FontStyle::Normal, Pos::new(HPos::Center, VPos::Bottom));
        let line_height = px(s.title_font_size * 1.2);
        for (k, text) in s.title.lines().rev().enumerate() {
            let y = top_px - px(TITLE_PAD) - k as i32 * line_height;
            root.draw(&Text::new(text.to_string(), (mid_x, y), title_font.clone()))?;
        }

        // ---- Annotations ----
        let letter_font = font(s.letter_font_size, FontStyle::Bold, Pos::new(HPos::Center, VPos::Bottom));
        for g in &self.groups {
            if let Some((text, y)) = &g.letter {
                root.draw(&Text::new(
                    text.clone(),
                    chart.backend_coord(&(g.position, *y)),
                    letter_font.clone(),
                ))?;
            }
        }

        let (fx, fy) = s.p_value_position;
        let p_x = left_px + (fx * f64::from(right_px - left_px)).round() as i32;
        let p_y = bottom_px - (fy * f64::from(bottom_px - top_px)).round() as i32;
        root.draw(&Text::new(
            self.p_value_text.clone(),
            (p_x, p_y),
            font(s.p_value_font_size, FontStyle::Italic, Pos::new(HPos::Right, VPos::Top)),
        ))?;

        Ok(())
    }
}
