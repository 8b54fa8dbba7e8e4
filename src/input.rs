//! Per-frame input snapshot consumed by tasks
//!
//! Every field is an edge: true only on the frame the key went down. The
//! host input layer computes the snapshot once per frame; tasks never see
//! held-key state.

/// Input commands for a single frame (edge-triggered)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInput {
    /// Up / W
    pub navigate_up: bool,
    /// Down / S
    pub navigate_down: bool,
    /// Left / A
    pub move_left: bool,
    /// Right / D
    pub move_right: bool,
    /// Q
    pub select_left: bool,
    /// E
    pub select_right: bool,
    /// Enter
    pub confirm: bool,
    /// Space: place the selected gate
    pub place: bool,
    /// F: start / finish a wire
    pub toggle_wire: bool,
    /// Backspace: delete under cursor
    pub delete: bool,
    /// Answer hot key (0 = A .. 3 = D)
    pub quick_select: Option<u8>,
}

impl TaskInput {
    /// Snapshot with only `confirm` pressed
    pub fn confirm() -> Self {
        Self {
            confirm: true,
            ..Default::default()
        }
    }

    /// True when no edge fired this frame
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}
