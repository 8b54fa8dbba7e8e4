//! Logic circuit simulation module
//!
//! A fixed grid holding inputs, one output, wires, and 3x3 gates. Editing
//! lives in `grid`, evaluation in `simulate`. Nothing here depends on
//! rendering or input handling.

pub mod gate;
pub mod grid;
pub mod simulate;
pub mod truth_table;

pub use gate::{Gate, GateId, GateKind, GateSignals, GridPos, Port};
pub use grid::{CellKind, CircuitGrid};
pub use simulate::Propagation;
pub use truth_table::{TruthRow, TruthTable};
