//! Circuit grid editing: gates, wires, inputs and the output cell
//!
//! The grid is a fixed-size row-major array of cells. Gate cells carry the
//! id of the gate that owns them; a gate's nine cells are always owned
//! together.

use serde::{Deserialize, Serialize};

use super::gate::{Gate, GateId, GateKind, GridPos};
use crate::consts::*;
use crate::error::{TaskError, TaskResult};

/// What occupies a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    /// Circuit input with its index (A = 0)
    Input(usize),
    Output,
    /// Part of a gate's 3x3 footprint
    Gate(GateId),
    Wire,
}

/// Fixed-size circuit board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitGrid {
    cells: Vec<CellKind>,
    /// Placed gates (sorted by id)
    gates: Vec<Gate>,
    num_inputs: usize,
    next_gate_id: u32,
}

impl CircuitGrid {
    /// Create an empty board with `num_inputs` inputs and the output placed
    pub fn new(num_inputs: usize) -> TaskResult<Self> {
        if num_inputs > MAX_INPUTS {
            return Err(TaskError::TooManyInputs {
                found: num_inputs,
                max: MAX_INPUTS,
            });
        }

        let mut grid = Self {
            cells: vec![CellKind::Empty; GRID_CELLS],
            gates: Vec::new(),
            num_inputs,
            next_gate_id: 1,
        };
        for i in 0..num_inputs {
            let pos = Self::input_position(i);
            grid.cells[index(pos)] = CellKind::Input(i);
        }
        grid.cells[index(Self::output_position())] = CellKind::Output;
        Ok(grid)
    }

    /// Cell of input `i` (column 1, every third row from row 2)
    pub fn input_position(i: usize) -> GridPos {
        GridPos::new(INPUT_COLUMN, FIRST_INPUT_ROW + i * INPUT_ROW_SPACING)
    }

    pub fn output_position() -> GridPos {
        GridPos::new(OUTPUT_COLUMN, OUTPUT_ROW)
    }

    pub fn in_bounds(x: usize, y: usize) -> bool {
        x < GRID_COLS && y < GRID_ROWS
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<CellKind> {
        Self::in_bounds(x, y).then(|| self.cells[index(GridPos::new(x, y))])
    }

    pub(super) fn cell_at(&self, pos: GridPos) -> CellKind {
        self.cells[index(pos)]
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.iter().find(|g| g.id == id)
    }

    pub(super) fn gate_index(&self, id: GateId) -> Option<usize> {
        self.gates.iter().position(|g| g.id == id)
    }

    /// Place a gate centered on (cx, cy)
    ///
    /// Rejected when the footprint leaves the grid or covers anything other
    /// than empty cells and wires. Wires under the footprint are absorbed.
    pub fn place_gate(&mut self, kind: GateKind, cx: usize, cy: usize) -> Option<GateId> {
        if cx < 1 || cy < 1 || cx + 1 >= GRID_COLS || cy + 1 >= GRID_ROWS {
            log::debug!("Gate {} at ({}, {}) out of bounds", kind.as_str(), cx, cy);
            return None;
        }

        let id = GateId(self.next_gate_id);
        let gate = Gate::new(id, kind, GridPos::new(cx, cy));

        let blocked = gate
            .footprint()
            .any(|pos| !matches!(self.cell_at(pos), CellKind::Empty | CellKind::Wire));
        if blocked {
            log::debug!("Gate {} at ({}, {}) blocked", kind.as_str(), cx, cy);
            return None;
        }

        for pos in gate.footprint() {
            self.cells[index(pos)] = CellKind::Gate(id);
        }
        self.next_gate_id += 1;
        self.gates.push(gate);

        log::debug!("Placed {} gate at ({}, {})", kind.as_str(), cx, cy);
        Some(id)
    }

    /// Lay wire from (x1, y1) to (x2, y2)
    ///
    /// Straight runs fill the segment; otherwise an L is drawn: horizontal
    /// along y1, then vertical along x2. Only empty cells become wire.
    /// Returns the number of cells converted.
    pub fn draw_wire(&mut self, x1: usize, y1: usize, x2: usize, y2: usize) -> usize {
        if !Self::in_bounds(x1, y1) || !Self::in_bounds(x2, y2) {
            return 0;
        }

        let mut laid = 0;
        for x in x1.min(x2)..=x1.max(x2) {
            laid += self.lay_wire(GridPos::new(x, y1));
        }
        for y in y1.min(y2)..=y1.max(y2) {
            laid += self.lay_wire(GridPos::new(x2, y));
        }
        laid
    }

    fn lay_wire(&mut self, pos: GridPos) -> usize {
        let cell = &mut self.cells[index(pos)];
        if *cell == CellKind::Empty {
            *cell = CellKind::Wire;
            1
        } else {
            0
        }
    }

    /// Delete whatever the player can delete at (x, y)
    ///
    /// A gate cell removes the whole gate; a wire cell clears just that
    /// cell. Inputs and the output cannot be deleted.
    pub fn delete_at(&mut self, x: usize, y: usize) -> bool {
        match self.cell(x, y) {
            Some(CellKind::Gate(id)) => self.remove_gate(id),
            Some(CellKind::Wire) => {
                self.cells[index(GridPos::new(x, y))] = CellKind::Empty;
                true
            }
            _ => false,
        }
    }

    fn remove_gate(&mut self, id: GateId) -> bool {
        let Some(i) = self.gate_index(id) else {
            return false;
        };
        let gate = self.gates.remove(i);
        for pos in gate.footprint() {
            self.cells[index(pos)] = CellKind::Empty;
        }
        log::debug!(
            "Deleted {} gate at ({}, {})",
            gate.kind.as_str(),
            gate.center.x,
            gate.center.y
        );
        true
    }

    /// Remove every gate and wire; inputs and output stay
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            if matches!(cell, CellKind::Gate(_) | CellKind::Wire) {
                *cell = CellKind::Empty;
            }
        }
        self.gates.clear();
    }

    /// Count of wire cells
    pub fn wire_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == CellKind::Wire).count()
    }
}

/// Row-major cell index
#[inline]
pub(super) fn index(pos: GridPos) -> usize {
    pos.y * GRID_COLS + pos.x
}
