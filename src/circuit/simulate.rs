//! Signal propagation
//!
//! Fixed-point iteration over the grid:
//! 1. Seed every input cell with its value.
//! 2. Each pass, every signal-carrying cell pushes its value into adjacent
//!    wires and the output (if they have no signal yet), and into any
//!    adjacent gate input port whose slot is still empty.
//! 3. Gates with all required inputs and no output yet evaluate and inject
//!    the result at their output port.
//! 4. A pass with no change ends the loop; `MAX_PROPAGATION_PASSES` bounds it
//!    regardless.
//!
//! Signals are never overwritten, so the process is monotone.

use super::gate::{GateSignals, GridPos};
use super::grid::{CellKind, CircuitGrid, index};
use super::truth_table::TruthTable;
use crate::consts::*;

/// Outcome of one propagation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Propagation {
    signals: Vec<Option<bool>>,
    /// Slots of each gate, parallel to `CircuitGrid::gates()`
    gate_signals: Vec<GateSignals>,
    passes: usize,
    converged: bool,
}

impl Propagation {
    pub fn signal_at(&self, x: usize, y: usize) -> Option<bool> {
        if !CircuitGrid::in_bounds(x, y) {
            return None;
        }
        self.signals[index(GridPos::new(x, y))]
    }

    /// Value at the output cell; unreached counts as false
    pub fn output(&self) -> bool {
        let pos = CircuitGrid::output_position();
        self.signals[index(pos)].unwrap_or(false)
    }

    /// Whether the output cell received any signal
    pub fn output_reached(&self) -> bool {
        let pos = CircuitGrid::output_position();
        self.signals[index(pos)].is_some()
    }

    pub fn gate_signals(&self) -> &[GateSignals] {
        &self.gate_signals
    }

    /// Passes executed, including the final unchanged one
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn converged(&self) -> bool {
        self.converged
    }
}

const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

fn neighbor(pos: GridPos, (dx, dy): (isize, isize)) -> Option<GridPos> {
    let x = pos.x.checked_add_signed(dx)?;
    let y = pos.y.checked_add_signed(dy)?;
    CircuitGrid::in_bounds(x, y).then_some(GridPos::new(x, y))
}

impl CircuitGrid {
    /// Run propagation for one input vector
    ///
    /// Missing input values are treated as false.
    pub fn propagate(&self, inputs: &[bool]) -> Propagation {
        let gates = self.gates();
        let mut signals = vec![None; GRID_CELLS];
        let mut gate_signals = vec![GateSignals::default(); gates.len()];

        for i in 0..self.num_inputs() {
            let value = inputs.get(i).copied().unwrap_or(false);
            signals[index(Self::input_position(i))] = Some(value);
        }

        let mut passes = 0;
        let mut converged = false;

        while passes < MAX_PROPAGATION_PASSES {
            passes += 1;
            let mut changed = false;

            // Row-major sweep; values written this pass are visible later in it
            for y in 0..GRID_ROWS {
                for x in 0..GRID_COLS {
                    let pos = GridPos::new(x, y);
                    let Some(signal) = signals[index(pos)] else {
                        continue;
                    };

                    for dir in DIRECTIONS {
                        let Some(next) = neighbor(pos, dir) else {
                            continue;
                        };
                        match self.cell_at(next) {
                            CellKind::Wire | CellKind::Output => {
                                let slot = &mut signals[index(next)];
                                if slot.is_none() {
                                    *slot = Some(signal);
                                    changed = true;
                                }
                            }
                            CellKind::Gate(id) => {
                                let Some(gi) = self.gate_index(id) else {
                                    continue;
                                };
                                if let Some(port) = gates[gi].port_at(next) {
                                    let slot = gate_signals[gi].slot_mut(port);
                                    if slot.is_none() {
                                        *slot = Some(signal);
                                        changed = true;
                                    }
                                }
                            }
                            CellKind::Empty | CellKind::Input(_) => {}
                        }
                    }
                }
            }

            for (gate, slots) in gates.iter().zip(gate_signals.iter_mut()) {
                if slots.output.is_some() {
                    continue;
                }
                if let Some(value) = slots.try_evaluate(gate.kind) {
                    slots.output = Some(value);
                    signals[index(gate.output_port())] = Some(value);
                    changed = true;
                    log::trace!(
                        "{} at ({}, {}): A={:?} B={:?} -> {}",
                        gate.kind.as_str(),
                        gate.center.x,
                        gate.center.y,
                        slots.input_a,
                        slots.input_b,
                        value
                    );
                }
            }

            if !changed {
                converged = true;
                break;
            }
        }

        if converged {
            log::trace!("Propagation converged after {} passes", passes);
        } else {
            log::warn!("Propagation hit the {} pass cap", MAX_PROPAGATION_PASSES);
        }

        Propagation {
            signals,
            gate_signals,
            passes,
            converged,
        }
    }

    /// Output value for one input vector (unreached output is false)
    pub fn simulate(&self, inputs: &[bool]) -> bool {
        self.propagate(inputs).output()
    }

    /// Actual output for each truth table row, in order
    pub fn evaluate_table(&self, table: &TruthTable) -> Vec<bool> {
        table.rows().map(|row| self.simulate(row.inputs)).collect()
    }

    /// True iff every truth table row produces its expected output
    pub fn satisfies(&self, table: &TruthTable) -> bool {
        for (i, row) in table.rows().enumerate() {
            let actual = self.simulate(row.inputs);
            log::debug!(
                "Row {}: inputs={:?} expected={} actual={}",
                i,
                row.inputs,
                row.expected,
                actual
            );
            if actual != row.expected {
                return false;
            }
        }
        true
    }
}
