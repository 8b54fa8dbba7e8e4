//! Spectrum matching: tune a waveform until its spectrum matches a target

use glam::Vec2;

use super::{TaskStatus, TaskView};
use crate::consts::{AMPLITUDE_DIFFICULTY_CUTOFF, SLIDER_STEP_FRACTION};
use crate::error::{TaskError, TaskResult};
use crate::input::TaskInput;
use crate::render::{DrawSurface, FontRole, RenderContext, palette, widgets};
use crate::spectral::{Spectrum, SpectrumAnalyzer, WaveParams, WaveformKind};
use crate::phase_distance;

/// Inclusive slider bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
}

impl ParamRange {
    pub fn new(name: &'static str, min: f64, max: f64) -> TaskResult<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(TaskError::InvalidRange { name, min, max });
        }
        Ok(Self { min, max })
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Bounds for every numeric parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumRanges {
    pub amplitude: ParamRange,
    pub frequency: ParamRange,
    pub phase: ParamRange,
}

/// Adjustable row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectrumParam {
    Waveform,
    Frequency,
    Phase,
    Amplitude,
}

static PARAM_ROWS: [SpectrumParam; 4] = [
    SpectrumParam::Waveform,
    SpectrumParam::Frequency,
    SpectrumParam::Phase,
    SpectrumParam::Amplitude,
];

impl SpectrumParam {
    pub fn label(&self) -> &'static str {
        match self {
            SpectrumParam::Waveform => "Waveform",
            SpectrumParam::Frequency => "Frequency",
            SpectrumParam::Phase => "Phase",
            SpectrumParam::Amplitude => "Amplitude",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumMatch {
    target: WaveParams,
    current: WaveParams,
    ranges: SpectrumRanges,
    tolerance: f64,
    difficulty: u8,
    selected: SpectrumParam,
    analyzer: SpectrumAnalyzer,
}

impl SpectrumMatch {
    pub fn new(target: WaveParams, ranges: SpectrumRanges, tolerance: f64, difficulty: u8) -> TaskResult<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(TaskError::Tolerance(tolerance));
        }
        Ok(Self {
            target,
            current: Self::initial_params(&ranges),
            ranges,
            tolerance,
            difficulty,
            selected: SpectrumParam::Waveform,
            analyzer: SpectrumAnalyzer::STANDARD,
        })
    }

    fn initial_params(ranges: &SpectrumRanges) -> WaveParams {
        WaveParams::new(
            ranges.amplitude.midpoint(),
            ranges.frequency.midpoint(),
            ranges.phase.midpoint(),
            WaveformKind::Sine,
        )
    }

    pub fn target(&self) -> &WaveParams {
        &self.target
    }

    pub fn current(&self) -> &WaveParams {
        &self.current
    }

    pub fn ranges(&self) -> &SpectrumRanges {
        &self.ranges
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn selected(&self) -> SpectrumParam {
        self.selected
    }

    /// Amplitude is only exposed on the easier tiers
    pub fn amplitude_adjustable(&self) -> bool {
        self.difficulty < AMPLITUDE_DIFFICULTY_CUTOFF
    }

    /// Rows shown to the player, top to bottom
    pub fn rows(&self) -> &'static [SpectrumParam] {
        if self.amplitude_adjustable() {
            &PARAM_ROWS
        } else {
            &PARAM_ROWS[..3]
        }
    }

    /// Replace the player's parameters, clamped into range
    pub fn set_current(&mut self, params: WaveParams) {
        self.current = WaveParams {
            amplitude: self.ranges.amplitude.clamp(params.amplitude),
            frequency: self.ranges.frequency.clamp(params.frequency),
            phase: self.ranges.phase.clamp(params.phase),
            kind: params.kind,
        };
    }

    pub fn target_spectrum(&self) -> Spectrum {
        self.analyzer.spectrum_of(&self.target)
    }

    pub fn current_spectrum(&self) -> Spectrum {
        self.analyzer.spectrum_of(&self.current)
    }

    fn step(&mut self, param: SpectrumParam, direction: f64) {
        let range = match param {
            SpectrumParam::Waveform => return,
            SpectrumParam::Frequency => self.ranges.frequency,
            SpectrumParam::Phase => self.ranges.phase,
            SpectrumParam::Amplitude => self.ranges.amplitude,
        };
        let step = self.step_size(&range);
        let value = match param {
            SpectrumParam::Waveform => return,
            SpectrumParam::Frequency => &mut self.current.frequency,
            SpectrumParam::Phase => &mut self.current.phase,
            SpectrumParam::Amplitude => &mut self.current.amplitude,
        };
        *value = range.clamp(*value + direction * step);
    }

    /// Slider increment for `range`; capped at the tolerance so every
    /// in-range target lies within tolerance of some reachable value
    pub fn step_size(&self, range: &ParamRange) -> f64 {
        let coarse = SLIDER_STEP_FRACTION * range.span();
        if self.tolerance > 0.0 {
            coarse.min(self.tolerance)
        } else {
            coarse
        }
    }

    pub(super) fn update(&mut self, input: &TaskInput) {
        let rows = self.rows();
        let len = rows.len();
        let index = rows.iter().position(|p| *p == self.selected).unwrap_or(0);
        if input.navigate_down {
            self.selected = rows[(index + 1) % len];
        } else if input.navigate_up {
            self.selected = rows[(index + len - 1) % len];
        }

        if self.selected == SpectrumParam::Waveform {
            if input.select_left {
                self.current.kind = self.current.kind.cycle(-1);
            }
            if input.select_right {
                self.current.kind = self.current.kind.cycle(1);
            }
        } else {
            let direction = (input.move_right || input.select_right) as i32
                - (input.move_left || input.select_left) as i32;
            if direction != 0 {
                self.step(self.selected, direction as f64);
            }
        }
    }

    pub(super) fn check(&self) -> bool {
        let tol = self.tolerance;
        let kind_ok = self.current.kind == self.target.kind;
        let freq_ok = (self.current.frequency - self.target.frequency).abs() <= tol;
        let phase_ok = phase_distance(self.current.phase, self.target.phase) <= tol;
        let amp_ok = !self.amplitude_adjustable()
            || (self.current.amplitude - self.target.amplitude).abs() <= tol;

        log::debug!(
            "spectrum check: kind={} freq={} phase={} amp={}",
            kind_ok,
            freq_ok,
            phase_ok,
            amp_ok
        );
        kind_ok && freq_ok && phase_ok && amp_ok
    }

    pub(super) fn reset(&mut self) {
        self.current = Self::initial_params(&self.ranges);
        self.selected = SpectrumParam::Waveform;
    }

    pub(super) fn render(&self, surface: &mut dyn DrawSurface, ctx: &RenderContext, view: &TaskView) {
        widgets::background(surface, ctx, palette::BACKGROUND);
        widgets::header(
            surface,
            ctx,
            "REPAIR MODULE - MATCH FREQUENCY SPECTRUM",
            view.prompt,
            50.0,
        );

        let mut y = 120.0;
        if self.amplitude_adjustable() {
            self.render_waveforms(surface, ctx, y);
            y += 150.0;
        }
        self.render_spectra(surface, ctx, y);
        self.render_controls(surface, ctx, y + 200.0);

        match view.status {
            TaskStatus::Completed { correct } => widgets::result_banner(surface, ctx, correct),
            TaskStatus::Active => widgets::hint(
                surface,
                ctx,
                "UP/DOWN to pick a row, Q/E or LEFT/RIGHT to adjust, ENTER to submit",
            ),
        }
    }

    fn render_waveforms(&self, surface: &mut dyn DrawSurface, ctx: &RenderContext, top: f32) {
        let origin = Vec2::new(100.0, top);
        let size = Vec2::new(ctx.viewport.x - 200.0, 130.0);
        surface.fill_rect(origin, size, palette::PANEL);
        surface.stroke_rect(origin, size, palette::GREEN_DARKER);

        let mid = origin.y + size.y / 2.0;
        surface.line(
            Vec2::new(origin.x, mid),
            Vec2::new(origin.x + size.x, mid),
            palette::GREEN_DARKER,
            1.0,
        );

        let scale = self.target.amplitude.abs().max(self.current.amplitude.abs()).max(1e-9);
        let trace = |params: &WaveParams| -> Vec<Vec2> {
            let samples = self.analyzer.sample_buffer(params.amplitude, params.frequency, params.phase, params.kind);
            let dx = size.x / (samples.len().max(2) - 1) as f32;
            samples
                .iter()
                .enumerate()
                .map(|(i, s)| Vec2::new(origin.x + i as f32 * dx, mid - (s / scale) as f32 * size.y * 0.45))
                .collect()
        };

        widgets::polyline(surface, &trace(&self.target), palette::TARGET, 2.0);
        widgets::polyline(surface, &trace(&self.current), palette::GREEN, 2.0);
    }

    fn render_spectra(&self, surface: &mut dyn DrawSurface, ctx: &RenderContext, top: f32) {
        let small = ctx.font(FontRole::Small);
        let gap = 40.0;
        let width = (ctx.viewport.x - 200.0 - gap) / 2.0;
        let size = Vec2::new(width, 140.0);

        let panels = [
            ("Target", self.target_spectrum(), palette::TARGET, 100.0),
            ("Current", self.current_spectrum(), palette::GREEN, 100.0 + width + gap),
        ];
        for (label, spectrum, color, x) in panels {
            let origin = Vec2::new(x, top);
            surface.fill_rect(origin, size, palette::PANEL);
            surface.stroke_rect(origin, size, palette::GREEN_DARKER);
            widgets::bars(surface, origin, size, &spectrum.magnitudes, color);
            surface.text(
                &format!(
                    "{label}: {:.1} Hz, {} harmonics",
                    spectrum.dominant_frequency(),
                    spectrum.significant_harmonics()
                ),
                Vec2::new(x, top + size.y + 20.0),
                small,
                palette::GREEN_DARK,
            );
        }
    }

    fn render_controls(&self, surface: &mut dyn DrawSurface, ctx: &RenderContext, top: f32) {
        let body = ctx.font(FontRole::Body);
        for (i, &param) in self.rows().iter().enumerate() {
            let y = top + i as f32 * 45.0;
            let selected = param == self.selected;
            match param {
                SpectrumParam::Waveform => {
                    let color = if selected { palette::GREEN } else { palette::GREEN_DARK };
                    if selected {
                        surface.stroke_rect(Vec2::new(90.0, y - 10.0), Vec2::new(700.0, 45.0), palette::GREEN);
                    }
                    surface.text(param.label(), Vec2::new(100.0, y + 18.0), body, color);
                    surface.text(
                        &format!("< {} >", self.current.kind.display_name()),
                        Vec2::new(280.0, y + 18.0),
                        body,
                        color,
                    );
                }
                SpectrumParam::Frequency => widgets::slider(
                    surface,
                    ctx,
                    param.label(),
                    self.current.frequency,
                    self.ranges.frequency.min,
                    self.ranges.frequency.max,
                    y,
                    selected,
                ),
                SpectrumParam::Phase => widgets::slider(
                    surface,
                    ctx,
                    param.label(),
                    self.current.phase,
                    self.ranges.phase.min,
                    self.ranges.phase.max,
                    y,
                    selected,
                ),
                SpectrumParam::Amplitude => widgets::slider(
                    surface,
                    ctx,
                    param.label(),
                    self.current.amplitude,
                    self.ranges.amplitude.min,
                    self.ranges.amplitude.max,
                    y,
                    selected,
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::CommandList;
    use proptest::prelude::*;

    fn ranges() -> SpectrumRanges {
        SpectrumRanges {
            amplitude: ParamRange::new("amplitude", 0.0, 10.0).unwrap(),
            frequency: ParamRange::new("frequency", 0.0, 100.0).unwrap(),
            phase: ParamRange::new("phase", 0.0, 6.28).unwrap(),
        }
    }

    fn puzzle(kind: WaveformKind, difficulty: u8) -> SpectrumMatch {
        SpectrumMatch::new(WaveParams::new(5.0, 50.0, 0.0, kind), ranges(), 0.5, difficulty).unwrap()
    }

    fn press(f: impl FnOnce(&mut TaskInput)) -> TaskInput {
        let mut input = TaskInput::default();
        f(&mut input);
        input
    }

    #[test]
    fn test_range_validation() {
        assert!(ParamRange::new("x", 1.0, 0.0).is_err());
        assert!(ParamRange::new("x", f64::NAN, 1.0).is_err());
        let r = ParamRange::new("x", 2.0, 4.0).unwrap();
        assert_eq!(r.midpoint(), 3.0);
        assert_eq!(r.clamp(9.0), 4.0);
    }

    #[test]
    fn test_tolerance_validation() {
        let target = WaveParams::new(1.0, 10.0, 0.0, WaveformKind::Sine);
        assert!(matches!(
            SpectrumMatch::new(target, ranges(), -0.1, 1),
            Err(TaskError::Tolerance(_))
        ));
    }

    #[test]
    fn test_starts_at_midpoints() {
        let p = puzzle(WaveformKind::Sine, 1);
        assert_eq!(p.current().kind, WaveformKind::Sine);
        assert_eq!(p.current().frequency, 50.0);
        assert_eq!(p.current().amplitude, 5.0);
        assert_eq!(p.selected(), SpectrumParam::Waveform);
    }

    #[test]
    fn test_rows_depend_on_difficulty() {
        assert_eq!(puzzle(WaveformKind::Sine, 2).rows().len(), 4);
        assert_eq!(puzzle(WaveformKind::Sine, 3).rows().len(), 3);

        let mut hard = puzzle(WaveformKind::Sine, 3);
        hard.update(&press(|i| i.navigate_up = true));
        assert_eq!(hard.selected(), SpectrumParam::Phase);
        let mut easy = puzzle(WaveformKind::Sine, 1);
        easy.update(&press(|i| i.navigate_up = true));
        assert_eq!(easy.selected(), SpectrumParam::Amplitude);
    }

    #[test]
    fn test_waveform_cycles() {
        let mut p = puzzle(WaveformKind::Sine, 1);
        p.update(&press(|i| i.select_left = true));
        assert_eq!(p.current().kind, WaveformKind::Pulse);
        p.update(&press(|i| i.select_right = true));
        p.update(&press(|i| i.select_right = true));
        assert_eq!(p.current().kind, WaveformKind::Square);
    }

    #[test]
    fn test_slider_steps_and_clamps() {
        let mut p = puzzle(WaveformKind::Sine, 1);
        p.update(&press(|i| i.navigate_down = true));
        assert_eq!(p.selected(), SpectrumParam::Frequency);
        // 2% of the range is 2 Hz, capped at the 0.5 tolerance
        assert!((p.step_size(&p.ranges().frequency) - 0.5).abs() < 1e-12);
        p.update(&press(|i| i.move_right = true));
        assert!((p.current().frequency - 50.5).abs() < 1e-9);
        p.update(&press(|i| i.select_left = true));
        assert!((p.current().frequency - 50.0).abs() < 1e-9);
        for _ in 0..200 {
            p.update(&press(|i| i.move_right = true));
        }
        assert_eq!(p.current().frequency, 100.0);
    }

    #[test]
    fn test_wrong_waveform_fails() {
        // Square target, player left on sine with matching numbers
        let mut p = puzzle(WaveformKind::Square, 1);
        p.set_current(WaveParams::new(5.0, 50.0, 0.0, WaveformKind::Sine));
        assert!(!p.check());
        p.set_current(WaveParams::new(5.0, 50.0, 0.0, WaveformKind::Square));
        assert!(p.check());
    }

    #[test]
    fn test_tolerances() {
        let mut p = puzzle(WaveformKind::Sine, 1);
        p.set_current(WaveParams::new(5.0, 50.4, 0.4, WaveformKind::Sine));
        assert!(p.check());
        p.set_current(WaveParams::new(5.0, 50.6, 0.0, WaveformKind::Sine));
        assert!(!p.check());
        p.set_current(WaveParams::new(3.0, 50.0, 0.0, WaveformKind::Sine));
        assert!(!p.check());
    }

    fn wide_phase_puzzle(target_phase: f64, min: f64, max: f64) -> SpectrumMatch {
        let ranges = SpectrumRanges {
            phase: ParamRange::new("phase", min, max).unwrap(),
            ..ranges()
        };
        SpectrumMatch::new(WaveParams::new(5.0, 50.0, target_phase, WaveformKind::Sine), ranges, 0.5, 1).unwrap()
    }

    #[test]
    fn test_phase_matches_across_zero() {
        let mut p = wide_phase_puzzle(0.0, -3.14, 3.14);
        p.set_current(WaveParams::new(5.0, 50.0, -0.05, WaveformKind::Sine));
        assert!(p.check());
        p.set_current(WaveParams::new(5.0, 50.0, -0.6, WaveformKind::Sine));
        assert!(!p.check());
    }

    #[test]
    fn test_phase_matches_across_full_turn() {
        let mut p = wide_phase_puzzle(0.01, 0.0, 6.28);
        p.set_current(WaveParams::new(5.0, 50.0, 6.25, WaveformKind::Sine));
        assert!(p.check());
        p.set_current(WaveParams::new(5.0, 50.0, 3.0, WaveformKind::Sine));
        assert!(!p.check());
    }

    #[test]
    fn test_off_grid_frequency_reachable() {
        let mut p = SpectrumMatch::new(WaveParams::new(5.0, 51.0, 3.14, WaveformKind::Sine), ranges(), 0.5, 1).unwrap();
        p.update(&press(|i| i.navigate_down = true));
        let mut presses = 0;
        while !p.check() && presses < 60 {
            p.update(&press(|i| i.move_right = true));
            presses += 1;
        }
        assert!(p.check(), "stuck at {} Hz", p.current().frequency);
    }

    proptest! {
        #[test]
        fn prop_every_frequency_target_reachable(
            min in -50.0f64..50.0,
            span in 1.0f64..500.0,
            t in 0.0f64..=1.0,
            tolerance in 0.01f64..2.0,
        ) {
            let max = min + span;
            let target = min + t * span;
            let ranges = SpectrumRanges {
                frequency: ParamRange::new("frequency", min, max).unwrap(),
                ..ranges()
            };
            let mut p = SpectrumMatch::new(
                WaveParams::new(5.0, target, ranges.phase.midpoint(), WaveformKind::Sine),
                ranges,
                tolerance,
                3,
            )
            .unwrap();
            p.update(&press(|i| i.navigate_down = true));
            prop_assert_eq!(p.selected(), SpectrumParam::Frequency);

            let limit = (span / p.step_size(&ranges.frequency)).ceil() as usize + 2;
            for _ in 0..limit {
                if p.check() {
                    break;
                }
                let up = p.current().frequency < target;
                p.update(&press(|i| if up { i.move_right = true } else { i.move_left = true }));
            }
            prop_assert!(p.check(), "target {} stuck at {}", target, p.current().frequency);
        }
    }

    #[test]
    fn test_amplitude_ignored_when_hidden() {
        let mut p = puzzle(WaveformKind::Sine, 3);
        p.set_current(WaveParams::new(1.0, 50.0, 0.0, WaveformKind::Sine));
        assert!(p.check());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut p = puzzle(WaveformKind::Sine, 1);
        p.update(&press(|i| i.select_right = true));
        p.update(&press(|i| i.navigate_down = true));
        p.update(&press(|i| i.move_left = true));
        p.reset();
        assert_eq!(p.current(), &WaveParams::new(5.0, 50.0, 3.14, WaveformKind::Sine));
        assert_eq!(p.selected(), SpectrumParam::Waveform);
    }

    #[test]
    fn test_render_plot_only_on_easy_tiers() {
        let ctx = RenderContext::default();
        let view = |difficulty| TaskView {
            prompt: "Match it",
            difficulty,
            status: TaskStatus::Active,
            elapsed: 0.0,
        };

        let mut easy = CommandList::new();
        puzzle(WaveformKind::Square, 1).render(&mut easy, &ctx, &view(1));
        let mut hard = CommandList::new();
        puzzle(WaveformKind::Square, 4).render(&mut hard, &ctx, &view(4));

        assert!(easy.count_lines() > 100);
        assert_eq!(hard.count_lines(), 0);
        assert!(easy.contains_text("Amplitude"));
        assert!(!hard.contains_text("Amplitude"));
        assert!(hard.contains_text("Target:"));
        assert!(hard.contains_text("< Sine >"));
    }
}
