//! Logic gates and their 3x3 footprints

use serde::{Deserialize, Serialize};

/// A grid coordinate (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: usize,
    pub y: usize,
}

impl GridPos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Gate types available to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    Not,
    Nand,
    Xor,
}

impl GateKind {
    pub const ALL: [GateKind; 3] = [GateKind::Not, GateKind::Nand, GateKind::Xor];

    pub fn as_str(&self) -> &'static str {
        match self {
            GateKind::Not => "NOT",
            GateKind::Nand => "NAND",
            GateKind::Xor => "XOR",
        }
    }

    /// Parse a task-file gate name (case-insensitive)
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
    }

    pub fn is_single_input(&self) -> bool {
        matches!(self, GateKind::Not)
    }

    /// Boolean function of the gate (`b` ignored for single-input gates)
    pub fn evaluate(&self, a: bool, b: bool) -> bool {
        match self {
            GateKind::Not => !a,
            GateKind::Nand => !(a && b),
            GateKind::Xor => a != b,
        }
    }
}

/// Stable handle to a placed gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GateId(pub u32);

/// Input port on a gate's left edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    A,
    B,
}

/// A gate placed on the grid, occupying the 3x3 block around `center`
///
/// `center` is never on the grid border; the grid rejects such placements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub id: GateId,
    pub kind: GateKind,
    pub center: GridPos,
}

impl Gate {
    pub fn new(id: GateId, kind: GateKind, center: GridPos) -> Self {
        Self { id, kind, center }
    }

    /// The nine cells this gate covers, row by row
    pub fn footprint(&self) -> impl Iterator<Item = GridPos> + '_ {
        (0..3).flat_map(move |dy| {
            (0..3).map(move |dx| GridPos::new(self.center.x + dx - 1, self.center.y + dy - 1))
        })
    }

    /// Which input port (if any) sits at `pos`
    ///
    /// Ports live on the left column: a single-input gate takes A at the
    /// middle row, a two-input gate takes A at the bottom row and B at the top.
    pub fn port_at(&self, pos: GridPos) -> Option<Port> {
        if pos.x + 1 != self.center.x {
            return None;
        }
        let rel_y = pos.y as isize - self.center.y as isize;
        match (self.kind.is_single_input(), rel_y) {
            (true, 0) => Some(Port::A),
            (false, 1) => Some(Port::A),
            (false, -1) => Some(Port::B),
            _ => None,
        }
    }

    /// Cell where the evaluated output is injected (middle of the right column)
    pub fn output_port(&self) -> GridPos {
        GridPos::new(self.center.x + 1, self.center.y)
    }
}

/// Per-simulation transient signal slots of one gate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateSignals {
    pub input_a: Option<bool>,
    pub input_b: Option<bool>,
    pub output: Option<bool>,
}

impl GateSignals {
    pub fn slot_mut(&mut self, port: Port) -> &mut Option<bool> {
        match port {
            Port::A => &mut self.input_a,
            Port::B => &mut self.input_b,
        }
    }

    /// Evaluate once every required input slot is filled
    pub fn try_evaluate(&self, kind: GateKind) -> Option<bool> {
        let a = self.input_a?;
        if kind.is_single_input() {
            Some(kind.evaluate(a, false))
        } else {
            Some(kind.evaluate(a, self.input_b?))
        }
    }
}
