//! Circuit building: wire gates so the grid reproduces a truth table

use glam::Vec2;

use super::{TaskStatus, TaskView};
use crate::circuit::{CellKind, CircuitGrid, GateKind, GridPos, TruthTable};
use crate::consts::{GRID_COLS, GRID_ROWS};
use crate::error::{TaskError, TaskResult};
use crate::input::TaskInput;
use crate::render::{DrawSurface, FontRole, RenderContext, palette, widgets};

const CELL_SIZE: f32 = 36.0;
const GRID_TOP: f32 = 110.0;
/// Truth table rows drawn before truncating
const MAX_TABLE_ROWS: usize = 12;

const fn grid_center() -> GridPos {
    GridPos::new(GRID_COLS / 2, GRID_ROWS / 2)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircuitBuild {
    table: TruthTable,
    palette: Vec<GateKind>,
    grid: CircuitGrid,
    cursor: GridPos,
    selected_gate: usize,
    wire_anchor: Option<GridPos>,
}

impl CircuitBuild {
    /// Duplicate gate kinds collapse, keeping first-seen order
    pub fn new(table: TruthTable, gates: Vec<GateKind>) -> TaskResult<Self> {
        let mut palette = Vec::with_capacity(gates.len());
        for kind in gates {
            if !palette.contains(&kind) {
                palette.push(kind);
            }
        }
        if palette.is_empty() {
            return Err(TaskError::NoGatesAvailable);
        }

        let grid = CircuitGrid::new(table.num_inputs())?;
        Ok(Self {
            table,
            palette,
            grid,
            cursor: grid_center(),
            selected_gate: 0,
            wire_anchor: None,
        })
    }

    pub fn table(&self) -> &TruthTable {
        &self.table
    }

    pub fn palette(&self) -> &[GateKind] {
        &self.palette
    }

    pub fn grid(&self) -> &CircuitGrid {
        &self.grid
    }

    /// Direct grid access for hosts that edit outside the key bindings
    pub fn grid_mut(&mut self) -> &mut CircuitGrid {
        &mut self.grid
    }

    pub fn cursor(&self) -> GridPos {
        self.cursor
    }

    pub fn selected_gate(&self) -> GateKind {
        self.palette[self.selected_gate]
    }

    pub fn wire_anchor(&self) -> Option<GridPos> {
        self.wire_anchor
    }

    pub(super) fn update(&mut self, input: &TaskInput) {
        if input.navigate_up {
            self.cursor.y = self.cursor.y.saturating_sub(1);
        }
        if input.navigate_down {
            self.cursor.y = (self.cursor.y + 1).min(GRID_ROWS - 1);
        }
        if input.move_left {
            self.cursor.x = self.cursor.x.saturating_sub(1);
        }
        if input.move_right {
            self.cursor.x = (self.cursor.x + 1).min(GRID_COLS - 1);
        }

        let n = self.palette.len();
        if input.select_left {
            self.selected_gate = (self.selected_gate + n - 1) % n;
        }
        if input.select_right {
            self.selected_gate = (self.selected_gate + 1) % n;
        }

        let GridPos { x, y } = self.cursor;
        if input.place {
            self.grid.place_gate(self.selected_gate(), x, y);
        }
        if input.toggle_wire {
            match self.wire_anchor.take() {
                None => self.wire_anchor = Some(self.cursor),
                Some(from) => {
                    let laid = self.grid.draw_wire(from.x, from.y, x, y);
                    log::debug!("Wire ({}, {}) -> ({}, {}): {} cells", from.x, from.y, x, y, laid);
                }
            }
        }
        if input.delete {
            self.grid.delete_at(x, y);
        }
    }

    pub(super) fn check(&self) -> bool {
        self.grid.satisfies(&self.table)
    }

    pub(super) fn reset(&mut self) {
        self.grid.clear();
        self.cursor = grid_center();
        self.selected_gate = 0;
        self.wire_anchor = None;
    }

    pub(super) fn render(&self, surface: &mut dyn DrawSurface, ctx: &RenderContext, view: &TaskView) {
        widgets::background(surface, ctx, palette::CIRCUIT_BACKGROUND);
        widgets::header(surface, ctx, "REPAIR MODULE - BUILD LOGIC CIRCUIT", view.prompt, 40.0);

        let origin = Vec2::new(40.0, GRID_TOP);
        self.render_grid(surface, ctx, origin, view.elapsed);
        self.render_palette(surface, ctx, Vec2::new(origin.x, origin.y + GRID_ROWS as f32 * CELL_SIZE + 30.0));
        self.render_table(
            surface,
            ctx,
            Vec2::new(origin.x + GRID_COLS as f32 * CELL_SIZE + 40.0, GRID_TOP),
            view.status,
        );

        match view.status {
            TaskStatus::Completed { correct } => widgets::result_banner(surface, ctx, correct),
            TaskStatus::Active => widgets::hint(
                surface,
                ctx,
                "ARROWS move, Q/E gate, SPACE place, F wire, BACKSPACE delete, ENTER test",
            ),
        }
    }

    fn render_grid(&self, surface: &mut dyn DrawSurface, ctx: &RenderContext, origin: Vec2, elapsed: f32) {
        let small = ctx.font(FontRole::Small);
        let cell = Vec2::splat(CELL_SIZE - 2.0);
        let at = |x: usize, y: usize| origin + Vec2::new(x as f32, y as f32) * CELL_SIZE;

        for y in 0..GRID_ROWS {
            for x in 0..GRID_COLS {
                let pos = at(x, y);
                let fill = match self.grid.cell(x, y) {
                    Some(CellKind::Wire) => palette::GREEN_DARK,
                    Some(CellKind::Gate(_)) => palette::GATE_BODY,
                    Some(CellKind::Input(_)) | Some(CellKind::Output) => palette::GREEN_DARKER,
                    _ => palette::CELL,
                };
                surface.fill_rect(pos, cell, fill);
                match self.grid.cell(x, y) {
                    Some(CellKind::Input(i)) => {
                        let label = char::from(b'A' + i as u8).to_string();
                        surface.centered_text(&label, pos.x + CELL_SIZE / 2.0, pos.y + 24.0, small, palette::GREEN);
                    }
                    Some(CellKind::Output) => {
                        surface.centered_text("OUT", pos.x + CELL_SIZE / 2.0, pos.y + 24.0, small, palette::GREEN);
                    }
                    _ => {}
                }
            }
        }

        for gate in self.grid.gates() {
            let corner = at(gate.center.x - 1, gate.center.y - 1);
            let size = Vec2::splat(CELL_SIZE * 3.0 - 2.0);
            surface.stroke_rect(corner, size, palette::GREEN);
            surface.centered_text(
                gate.kind.as_str(),
                corner.x + size.x / 2.0,
                corner.y + size.y / 2.0 + 6.0,
                small,
                palette::GREEN,
            );
            for pos in gate.footprint() {
                if gate.port_at(pos).is_some() {
                    surface.fill_rect(at(pos.x, pos.y) + Vec2::splat(12.0), Vec2::splat(10.0), palette::GREEN);
                }
            }
            let out = gate.output_port();
            surface.fill_rect(at(out.x, out.y) + Vec2::splat(12.0), Vec2::splat(10.0), palette::HIGHLIGHT);
        }

        if let Some(anchor) = self.wire_anchor {
            surface.stroke_rect(at(anchor.x, anchor.y), cell, palette::HIGHLIGHT);
        }

        // Cursor blinks at 2 Hz
        if (elapsed * 4.0) as u32 % 2 == 0 {
            let pos = at(self.cursor.x, self.cursor.y);
            surface.fill_rect(pos, cell, palette::CELL_CURSOR);
            surface.stroke_rect(pos, cell, palette::GREEN);
        }
    }

    fn render_palette(&self, surface: &mut dyn DrawSurface, ctx: &RenderContext, origin: Vec2) {
        let body = ctx.font(FontRole::Body);
        surface.text("Gates:", origin + Vec2::new(0.0, 24.0), body, palette::GREEN_DARK);
        for (i, kind) in self.palette.iter().enumerate() {
            let pos = origin + Vec2::new(120.0 + i as f32 * 110.0, 0.0);
            let size = Vec2::new(100.0, 34.0);
            let selected = i == self.selected_gate;
            surface.fill_rect(pos, size, if selected { palette::GREEN_DARKER } else { palette::PANEL });
            surface.stroke_rect(pos, size, if selected { palette::GREEN } else { palette::GREEN_DARKER });
            surface.centered_text(kind.as_str(), pos.x + size.x / 2.0, pos.y + 25.0, body, palette::GREEN);
        }
    }

    fn render_table(&self, surface: &mut dyn DrawSurface, ctx: &RenderContext, origin: Vec2, status: TaskStatus) {
        let small = ctx.font(FontRole::Small);
        let n = self.table.num_inputs();
        let header: String = (0..n)
            .map(|i| format!("{} ", char::from(b'A' + i as u8)))
            .chain(std::iter::once("| OUT".to_string()))
            .collect();
        surface.text("Truth table", origin, small, palette::GREEN);
        surface.text(&header, origin + Vec2::new(0.0, 24.0), small, palette::GREEN_DARK);

        // Actual outputs only once the attempt is submitted
        let actual = match status {
            TaskStatus::Completed { .. } => Some(self.grid.evaluate_table(&self.table)),
            TaskStatus::Active => None,
        };

        for (i, row) in self.table.rows().take(MAX_TABLE_ROWS).enumerate() {
            let mut line: String = row.inputs.iter().map(|&b| if b { "1 " } else { "0 " }).collect();
            line.push_str(if row.expected { "| 1" } else { "| 0" });
            let color = match actual.as_ref().map(|a| a[i] == row.expected) {
                Some(true) => palette::GREEN,
                Some(false) => palette::ERROR,
                None => palette::GREEN_DARK,
            };
            surface.text(&line, origin + Vec2::new(0.0, 48.0 + i as f32 * 22.0), small, color);
        }
        if self.table.len() > MAX_TABLE_ROWS {
            surface.text(
                "...",
                origin + Vec2::new(0.0, 48.0 + MAX_TABLE_ROWS as f32 * 22.0),
                small,
                palette::GREEN_DARKER,
            );
        }
    }
}
