//! Task engine
//!
//! A `Task` is one puzzle attempt: it receives per-frame input while active,
//! records a pass/fail outcome exactly once on submission, and can be reset
//! for another attempt. The puzzle itself is one of the `TaskKind` variants.

pub mod circuit;
pub mod loader;
pub mod multiple_choice;
pub mod spectrum;

pub use circuit::CircuitBuild;
pub use loader::{fallback_task, load_task, parse_task, task_filename};
pub use multiple_choice::MultipleChoice;
pub use spectrum::{ParamRange, SpectrumMatch, SpectrumParam, SpectrumRanges};

use crate::circuit::{GateKind, TruthTable};
use crate::consts::{MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::error::{TaskError, TaskResult};
use crate::input::TaskInput;
use crate::render::{DrawSurface, RenderContext};
use crate::spectral::WaveParams;

/// Task kind codes used on line 1 of task files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKindCode {
    MultipleChoice,
    Spectrum,
    Circuit,
}

impl TaskKindCode {
    pub const ALL: [TaskKindCode; 3] = [
        TaskKindCode::MultipleChoice,
        TaskKindCode::Spectrum,
        TaskKindCode::Circuit,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            TaskKindCode::MultipleChoice => "ABCD",
            TaskKindCode::Spectrum => "FREQ",
            TaskKindCode::Circuit => "LOGIC",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TaskKindCode::MultipleChoice => "Multiple choice question",
            TaskKindCode::Spectrum => "Match frequency spectrum",
            TaskKindCode::Circuit => "Logic gates puzzle",
        }
    }

    /// Parse a kind code (case-insensitive)
    pub fn from_code(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|k| k.code().eq_ignore_ascii_case(s))
    }
}

/// Attempt state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    Active,
    Completed { correct: bool },
}

/// The puzzle behind a task
#[derive(Debug, Clone)]
pub enum TaskKind {
    MultipleChoice(MultipleChoice),
    Spectrum(SpectrumMatch),
    Circuit(CircuitBuild),
}

impl TaskKind {
    pub fn code(&self) -> TaskKindCode {
        match self {
            TaskKind::MultipleChoice(_) => TaskKindCode::MultipleChoice,
            TaskKind::Spectrum(_) => TaskKindCode::Spectrum,
            TaskKind::Circuit(_) => TaskKindCode::Circuit,
        }
    }
}

/// Read-only task facts handed to puzzle renderers
#[derive(Debug, Clone, Copy)]
pub struct TaskView<'a> {
    pub prompt: &'a str,
    pub difficulty: u8,
    pub status: TaskStatus,
    /// Seconds spent in the current attempt
    pub elapsed: f32,
}

/// One puzzle attempt with a pass/fail outcome
#[derive(Debug, Clone)]
pub struct Task {
    prompt: String,
    difficulty: u8,
    status: TaskStatus,
    elapsed: f32,
    kind: TaskKind,
}

fn check_difficulty(difficulty: u8) -> TaskResult<u8> {
    if (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
        Ok(difficulty)
    } else {
        Err(TaskError::Difficulty(difficulty as i64))
    }
}

impl Task {
    fn new(prompt: impl Into<String>, difficulty: u8, kind: TaskKind) -> Self {
        Self {
            prompt: prompt.into(),
            difficulty,
            status: TaskStatus::Active,
            elapsed: 0.0,
            kind,
        }
    }

    /// Four-answer question; `correct` is the letter A-D
    pub fn multiple_choice(
        prompt: impl Into<String>,
        answers: Vec<String>,
        correct: char,
        difficulty: u8,
    ) -> TaskResult<Self> {
        let difficulty = check_difficulty(difficulty)?;
        let puzzle = MultipleChoice::new(answers, correct)?;
        Ok(Self::new(prompt, difficulty, TaskKind::MultipleChoice(puzzle)))
    }

    /// Waveform parameter matching against a target spectrum
    pub fn spectrum_match(
        prompt: impl Into<String>,
        target: WaveParams,
        ranges: SpectrumRanges,
        tolerance: f64,
        difficulty: u8,
    ) -> TaskResult<Self> {
        let difficulty = check_difficulty(difficulty)?;
        let puzzle = SpectrumMatch::new(target, ranges, tolerance, difficulty)?;
        Ok(Self::new(prompt, difficulty, TaskKind::Spectrum(puzzle)))
    }

    /// Circuit construction against a truth table
    pub fn circuit_build(
        prompt: impl Into<String>,
        table: TruthTable,
        gates: Vec<GateKind>,
        difficulty: u8,
    ) -> TaskResult<Self> {
        let difficulty = check_difficulty(difficulty)?;
        let puzzle = CircuitBuild::new(table, gates)?;
        Ok(Self::new(prompt, difficulty, TaskKind::Circuit(puzzle)))
    }

    /// Substitute used whenever a task cannot be loaded
    pub fn fallback() -> Self {
        let answers = ["3", "4", "5", "6"].map(String::from);
        Self::new(
            "Fallback question: What is 2 + 2?",
            MIN_DIFFICULTY,
            TaskKind::MultipleChoice(MultipleChoice::from_answers(answers, 1)),
        )
    }

    /// Advance one frame; ignored once completed
    pub fn update(&mut self, dt: f32, input: &TaskInput) {
        if self.is_completed() {
            return;
        }
        self.elapsed += dt;

        match &mut self.kind {
            TaskKind::MultipleChoice(p) => p.update(input),
            TaskKind::Spectrum(p) => p.update(input),
            TaskKind::Circuit(p) => p.update(input),
        }

        if input.confirm {
            self.submit_answer();
        }
    }

    /// Evaluate and record the outcome; a no-op after completion
    pub fn submit_answer(&mut self) {
        if self.is_completed() {
            return;
        }
        let correct = self.check_answer();
        self.status = TaskStatus::Completed { correct };
        log::info!(
            "{} task submitted after {:.1}s: {}",
            self.code().code(),
            self.elapsed,
            if correct { "correct" } else { "incorrect" }
        );
    }

    /// Whether the current state matches the target
    pub fn check_answer(&self) -> bool {
        match &self.kind {
            TaskKind::MultipleChoice(p) => p.check(),
            TaskKind::Spectrum(p) => p.check(),
            TaskKind::Circuit(p) => p.check(),
        }
    }

    /// Start a fresh attempt with construction-time defaults
    pub fn reset(&mut self) {
        self.status = TaskStatus::Active;
        self.elapsed = 0.0;
        match &mut self.kind {
            TaskKind::MultipleChoice(p) => p.reset(),
            TaskKind::Spectrum(p) => p.reset(),
            TaskKind::Circuit(p) => p.reset(),
        }
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, ctx: &RenderContext) {
        let view = TaskView {
            prompt: &self.prompt,
            difficulty: self.difficulty,
            status: self.status,
            elapsed: self.elapsed,
        };
        match &self.kind {
            TaskKind::MultipleChoice(p) => p.render(surface, ctx, &view),
            TaskKind::Spectrum(p) => p.render(surface, ctx, &view),
            TaskKind::Circuit(p) => p.render(surface, ctx, &view),
        }
    }

    pub fn code(&self) -> TaskKindCode {
        self.kind.code()
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut TaskKind {
        &mut self.kind
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, TaskStatus::Completed { .. })
    }

    /// Meaningful only once completed
    pub fn is_correct(&self) -> bool {
        matches!(self.status, TaskStatus::Completed { correct: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::CommandList;
    use proptest::prelude::*;

    fn question(correct: char) -> Task {
        Task::multiple_choice(
            "2+2?",
            vec!["3".into(), "4".into(), "5".into(), "6".into()],
            correct,
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(TaskKindCode::from_code("abcd"), Some(TaskKindCode::MultipleChoice));
        assert_eq!(TaskKindCode::from_code("FREQ"), Some(TaskKindCode::Spectrum));
        assert_eq!(TaskKindCode::from_code(" Logic "), Some(TaskKindCode::Circuit));
        assert_eq!(TaskKindCode::from_code("CIRCUIT"), None);
    }

    #[test]
    fn test_difficulty_validated() {
        let answers = || vec!["a".into(), "b".into(), "c".into(), "d".into()];
        assert!(matches!(
            Task::multiple_choice("q", answers(), 'A', 0),
            Err(TaskError::Difficulty(0))
        ));
        assert!(matches!(
            Task::multiple_choice("q", answers(), 'A', 6),
            Err(TaskError::Difficulty(6))
        ));
        assert!(Task::multiple_choice("q", answers(), 'A', 5).is_ok());
    }

    #[test]
    fn test_submit_sets_outcome() {
        let mut task = question('A');
        assert!(!task.is_completed());
        task.submit_answer();
        assert_eq!(task.status(), TaskStatus::Completed { correct: true });
        assert!(task.is_correct());
    }

    #[test]
    fn test_update_ignored_after_completion() {
        let mut task = question('B');
        task.update(0.1, &TaskInput::confirm());
        assert!(task.is_completed());
        assert!(!task.is_correct());

        // Moving the selection to B now changes nothing
        let input = TaskInput {
            navigate_down: true,
            ..Default::default()
        };
        task.update(0.1, &input);
        task.update(0.1, &TaskInput::confirm());
        assert!(!task.is_correct());
        assert!((task.elapsed() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_reset_starts_new_attempt() {
        let mut task = question('B');
        let down = TaskInput {
            navigate_down: true,
            ..Default::default()
        };
        task.update(0.5, &down);
        task.submit_answer();
        assert!(task.is_correct());

        task.reset();
        assert_eq!(task.status(), TaskStatus::Active);
        assert_eq!(task.elapsed(), 0.0);
        // Selection back on A
        assert!(!task.check_answer());
    }

    #[test]
    fn test_fallback_task() {
        let mut task = Task::fallback();
        assert_eq!(task.code(), TaskKindCode::MultipleChoice);
        assert!(task.prompt().contains("2 + 2"));
        assert_eq!(task.difficulty(), 1);
        task.update(
            0.016,
            &TaskInput {
                quick_select: Some(1),
                confirm: true,
                ..Default::default()
            },
        );
        assert!(task.is_correct());
    }

    #[test]
    fn test_render_is_pure() {
        let task = question('C');
        let ctx = RenderContext::default();
        let mut a = CommandList::new();
        let mut b = CommandList::new();
        task.render(&mut a, &ctx);
        task.render(&mut b, &ctx);
        assert_eq!(a, b);
        assert!(a.contains_text("2+2?"));
        assert_eq!(task.status(), TaskStatus::Active);
    }

    fn arbitrary_input() -> impl Strategy<Value = TaskInput> {
        (any::<[bool; 10]>(), proptest::option::of(0u8..6)).prop_map(|(b, quick)| TaskInput {
            navigate_up: b[0],
            navigate_down: b[1],
            move_left: b[2],
            move_right: b[3],
            select_left: b[4],
            select_right: b[5],
            confirm: b[6],
            place: b[7],
            toggle_wire: b[8],
            delete: b[9],
            quick_select: quick,
        })
    }

    proptest! {
        #[test]
        fn prop_submit_is_idempotent(
            correct in prop::sample::select(vec!['A', 'B', 'C', 'D']),
            before in proptest::collection::vec(arbitrary_input(), 0..10),
            after in proptest::collection::vec(arbitrary_input(), 0..10),
            extra_submits in 1usize..5,
        ) {
            let mut task = question(correct);
            for input in &before {
                task.update(0.016, input);
            }
            task.submit_answer();
            let status = task.status();
            prop_assert!(task.is_completed());

            for _ in 0..extra_submits {
                task.submit_answer();
            }
            for input in &after {
                task.update(0.016, input);
            }
            prop_assert_eq!(task.status(), status);
        }
    }
}
