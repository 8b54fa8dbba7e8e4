//! Shared widgets for task screens

use glam::Vec2;

use super::{Color, DrawSurface, FontRole, RenderContext, palette};

/// Fill the whole viewport
pub fn background(surface: &mut dyn DrawSurface, ctx: &RenderContext, color: Color) {
    surface.fill_rect(Vec2::ZERO, ctx.viewport, color);
}

/// Screen title plus the task prompt beneath it
pub fn header(surface: &mut dyn DrawSurface, ctx: &RenderContext, title: &str, prompt: &str, y: f32) {
    let cx = ctx.center_x();
    surface.centered_text(title, cx, y, ctx.font(FontRole::Title), palette::GREEN);
    surface.centered_text(prompt, cx, y + 40.0, ctx.font(FontRole::Small), palette::GREEN_DARK);
}

/// Control hint along the bottom edge
pub fn hint(surface: &mut dyn DrawSurface, ctx: &RenderContext, text: &str) {
    surface.centered_text(
        text,
        ctx.center_x(),
        ctx.viewport.y - 30.0,
        ctx.font(FontRole::Small),
        palette::GREEN_DARKER,
    );
}

/// Outcome banner shown once a task is completed
pub fn result_banner(surface: &mut dyn DrawSurface, ctx: &RenderContext, correct: bool) {
    let y = ctx.viewport.y - 150.0;
    let cx = ctx.center_x();
    let (fill, color, headline, follow_up) = if correct {
        (
            palette::SUCCESS_BANNER,
            palette::GREEN,
            "CORRECT! Module repaired!",
            "Press ENTER to continue",
        )
    } else {
        (
            palette::FAILURE_BANNER,
            palette::ERROR,
            "INCORRECT!",
            "Press ENTER to try again",
        )
    };

    surface.fill_rect(Vec2::new(0.0, y - 20.0), Vec2::new(ctx.viewport.x, 120.0), fill);
    surface.centered_text(headline, cx, y + 30.0, ctx.font(FontRole::Title), color);
    surface.centered_text(follow_up, cx, y + 70.0, ctx.font(FontRole::Body), color);
}

/// Labelled horizontal slider with a fill bar and handle
#[allow(clippy::too_many_arguments)]
pub fn slider(
    surface: &mut dyn DrawSurface,
    ctx: &RenderContext,
    label: &str,
    value: f64,
    min: f64,
    max: f64,
    y: f32,
    selected: bool,
) {
    let label_x = 100.0;
    let slider_x = 280.0;
    let width = 500.0;
    let height = 25.0;

    let label_color = if selected { palette::GREEN } else { palette::GREEN_DARK };
    let bar_color = if selected { palette::GREEN } else { palette::GREEN_DARKER };

    if selected {
        surface.stroke_rect(
            Vec2::new(label_x - 10.0, y - 10.0),
            Vec2::new(slider_x + width - label_x + 100.0, height + 20.0),
            palette::GREEN,
        );
    }
    surface.text(label, Vec2::new(label_x, y + 18.0), ctx.font(FontRole::Body), label_color);

    let t = if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0) as f32
    } else {
        0.0
    };
    let fill = t * width;
    surface.fill_rect(Vec2::new(slider_x, y), Vec2::new(width, height), palette::PANEL);
    surface.fill_rect(Vec2::new(slider_x, y), Vec2::new(fill, height), palette::GREEN_DARKER);
    surface.stroke_rect(Vec2::new(slider_x, y), Vec2::new(width, height), bar_color);
    surface.fill_rect(
        Vec2::new(slider_x + fill - 4.0, y - 4.0),
        Vec2::new(8.0, height + 8.0),
        bar_color,
    );
    surface.text(
        &format!("{value:.2}"),
        Vec2::new(slider_x + width + 20.0, y + 18.0),
        ctx.font(FontRole::Body),
        label_color,
    );
}

/// Connected line segments through `points`
pub fn polyline(surface: &mut dyn DrawSurface, points: &[Vec2], color: Color, width: f32) {
    for pair in points.windows(2) {
        surface.line(pair[0], pair[1], color, width);
    }
}

/// Bar chart of `values` normalized to their own peak, bottom-aligned in the box
pub fn bars(surface: &mut dyn DrawSurface, origin: Vec2, size: Vec2, values: &[f64], color: Color) {
    if values.is_empty() {
        return;
    }
    let peak = values.iter().copied().fold(0.0, f64::max);
    let peak = if peak > 0.0 { peak } else { 1.0 };
    let bar_width = size.x / values.len() as f32;

    for (i, &v) in values.iter().enumerate() {
        let h = (v / peak) as f32 * size.y;
        if h <= 0.0 {
            continue;
        }
        let x = origin.x + i as f32 * bar_width;
        surface.fill_rect(
            Vec2::new(x, origin.y + size.y - h),
            Vec2::new(bar_width.max(1.0), h),
            color,
        );
    }
}
