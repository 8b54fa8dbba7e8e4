//! Task description files
//!
//! Line-oriented text. Blank lines and lines starting with `#` are skipped;
//! the first remaining line is the kind code (`ABCD`, `FREQ`, `LOGIC`) and
//! the rest are kind-specific directives. Loading never fails: any problem
//! is logged and the fallback question is used instead.

use std::path::{Path, PathBuf};

use super::{ParamRange, SpectrumRanges, Task, TaskKindCode};
use crate::circuit::{GateKind, TruthTable};
use crate::error::{TaskError, TaskResult};
use crate::spectral::{WaveParams, WaveformKind};

/// `level<N>_module<M>.txt`, with `M` one-based
pub fn task_filename(level: u32, module_index: usize) -> String {
    format!("level{}_module{}.txt", level, module_index + 1)
}

pub fn task_path(dir: &Path, level: u32, module_index: usize) -> PathBuf {
    dir.join(task_filename(level, module_index))
}

/// Load a module's task, substituting the fallback on any error
pub fn load_task(dir: &Path, level: u32, module_index: usize) -> Task {
    let path = task_path(dir, level, module_index);
    match read_task_file(&path) {
        Ok(task) => {
            log::info!("Loaded {} task from {}", task.code().code(), path.display());
            task
        }
        Err(e) => {
            log::warn!("Failed to load task {}: {}; using fallback", path.display(), e);
            fallback_task()
        }
    }
}

pub fn read_task_file(path: &Path) -> TaskResult<Task> {
    let text = std::fs::read_to_string(path)?;
    parse_task(&text)
}

pub fn fallback_task() -> Task {
    Task::fallback()
}

/// Cursor over the significant lines of a task file
struct Directives<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Directives<'a> {
    fn new(text: &'a str) -> Self {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .collect();
        Self { lines, pos: 0 }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn next(&mut self, what: &'static str) -> TaskResult<&'a str> {
        let line = self.peek().ok_or(TaskError::MissingLine {
            what,
            line: self.pos + 1,
        })?;
        self.pos += 1;
        Ok(line)
    }
}

fn parse_f64(what: &'static str, value: &str) -> TaskResult<f64> {
    value.trim().parse().map_err(|_| TaskError::BadNumber {
        what,
        value: value.trim().to_string(),
    })
}

fn parse_difficulty(value: &str) -> TaskResult<u8> {
    let n: i64 = value.trim().parse().map_err(|_| TaskError::BadNumber {
        what: "difficulty",
        value: value.trim().to_string(),
    })?;
    // Range checked again by the task constructors
    u8::try_from(n).map_err(|_| TaskError::Difficulty(n))
}

fn parse_range(what: &'static str, line: &str) -> TaskResult<ParamRange> {
    let (min, max) = line.split_once(',').ok_or_else(|| TaskError::BadField {
        what,
        value: line.to_string(),
    })?;
    ParamRange::new(what, parse_f64(what, min)?, parse_f64(what, max)?)
}

/// Parse task file contents
pub fn parse_task(text: &str) -> TaskResult<Task> {
    let mut lines = Directives::new(text);
    let code = lines.peek().ok_or(TaskError::EmptyFile)?;
    lines.pos += 1;

    match TaskKindCode::from_code(code) {
        Some(TaskKindCode::MultipleChoice) => parse_multiple_choice(&mut lines),
        Some(TaskKindCode::Spectrum) => parse_spectrum(&mut lines),
        Some(TaskKindCode::Circuit) => parse_circuit(&mut lines),
        None => Err(TaskError::UnknownKind(code.to_string())),
    }
}

fn parse_multiple_choice(lines: &mut Directives) -> TaskResult<Task> {
    let prompt = lines.next("question")?;
    let answers = (0..4)
        .map(|_| lines.next("answer").map(str::to_string))
        .collect::<TaskResult<Vec<_>>>()?;
    let letter_line = lines.next("correct answer")?;
    let letter = letter_line
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .ok_or(TaskError::MissingLine {
            what: "correct answer",
            line: lines.pos,
        })?;
    let difficulty = parse_difficulty(lines.next("difficulty")?)?;
    Task::multiple_choice(prompt, answers, letter, difficulty)
}

fn parse_target(line: &str) -> TaskResult<WaveParams> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if !(3..=4).contains(&fields.len()) {
        return Err(TaskError::BadField {
            what: "target",
            value: line.to_string(),
        });
    }
    let kind = match fields.get(3) {
        None => WaveformKind::Sine,
        Some(name) => WaveformKind::from_name(name).unwrap_or_else(|| {
            log::warn!("Unknown waveform '{}', using SINE", name);
            WaveformKind::Sine
        }),
    };
    Ok(WaveParams::new(
        parse_f64("target amplitude", fields[0])?,
        parse_f64("target frequency", fields[1])?,
        parse_f64("target phase", fields[2])?,
        kind,
    ))
}

fn parse_spectrum(lines: &mut Directives) -> TaskResult<Task> {
    let prompt = lines.next("prompt")?;
    let target = parse_target(lines.next("target")?)?;
    let ranges = SpectrumRanges {
        amplitude: parse_range("amplitude range", lines.next("amplitude range")?)?,
        frequency: parse_range("frequency range", lines.next("frequency range")?)?,
        phase: parse_range("phase range", lines.next("phase range")?)?,
    };
    let tolerance = parse_f64("tolerance", lines.next("tolerance")?)?;
    let difficulty = parse_difficulty(lines.next("difficulty")?)?;
    Task::spectrum_match(prompt, target, ranges, tolerance, difficulty)
}

/// Gate lists are the first lines with letters in them
fn is_gate_list(line: &str) -> bool {
    line.chars().any(|c| c.is_ascii_alphabetic())
}

fn parse_circuit(lines: &mut Directives) -> TaskResult<Task> {
    let prompt = lines.next("prompt")?;

    let mut rows = Vec::new();
    while let Some(line) = lines.peek() {
        if is_gate_list(line) {
            break;
        }
        rows.push(TruthTable::parse_row(line)?);
        lines.pos += 1;
    }
    let table = TruthTable::new(rows)?;

    let mut gates = Vec::new();
    for name in lines.next("gate list")?.split(',').map(str::trim) {
        match GateKind::from_name(name) {
            Some(kind) => gates.push(kind),
            None => log::warn!("Unknown gate '{}' skipped", name),
        }
    }
    let difficulty = parse_difficulty(lines.next("difficulty")?)?;
    Task::circuit_build(prompt, table, gates, difficulty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::TaskInput;
    use crate::task::TaskKind;

    const ABCD: &str = "\
# quick arithmetic
ABCD
2+2?

3
4
5
6
b
1
";

    const FREQ: &str = "\
FREQ
Match the square wave
5.0, 50.0, 0.0, SQUARE
0.0, 10.0
0.0, 100.0
0.0, 6.28
0.5
2
";

    const LOGIC: &str = "\
LOGIC
Build a NAND gate
0,0,1
0,1,1
1,0,1
1,1,0
nand, NOT, Nand, AND
3
";

    #[test]
    fn test_task_filename() {
        assert_eq!(task_filename(1, 0), "level1_module1.txt");
        assert_eq!(task_filename(3, 4), "level3_module5.txt");
    }

    #[test]
    fn test_parse_multiple_choice() {
        let mut task = parse_task(ABCD).unwrap();
        assert_eq!(task.code(), TaskKindCode::MultipleChoice);
        assert_eq!(task.prompt(), "2+2?");
        assert_eq!(task.difficulty(), 1);

        // Answer B after one step down
        task.update(
            0.016,
            &TaskInput {
                navigate_down: true,
                ..Default::default()
            },
        );
        task.update(0.016, &TaskInput::confirm());
        assert!(task.is_completed());
        assert!(task.is_correct());
    }

    #[test]
    fn test_multiple_choice_needs_all_lines() {
        let short = "ABCD\nq\na\nb\nc\nd\nA\n";
        assert!(matches!(
            parse_task(short),
            Err(TaskError::MissingLine { what: "difficulty", .. })
        ));
    }

    #[test]
    fn test_parse_spectrum() {
        let mut task = parse_task(FREQ).unwrap();
        let TaskKind::Spectrum(puzzle) = task.kind_mut() else {
            panic!("expected spectrum task");
        };
        assert_eq!(puzzle.target().kind, WaveformKind::Square);
        assert_eq!(puzzle.ranges().frequency.max, 100.0);
        assert_eq!(puzzle.tolerance(), 0.5);
        assert!(puzzle.amplitude_adjustable());

        // Numbers match but the waveform does not
        puzzle.set_current(WaveParams::new(5.0, 50.0, 0.0, WaveformKind::Sine));
        task.submit_answer();
        assert!(task.is_completed());
        assert!(!task.is_correct());
    }

    #[test]
    fn test_target_waveform_defaults() {
        let three = FREQ.replace("5.0, 50.0, 0.0, SQUARE", "5.0, 50.0, 0.0");
        let unknown = FREQ.replace("SQUARE", "WOBBLE");
        for text in [three, unknown] {
            let task = parse_task(&text).unwrap();
            let TaskKind::Spectrum(puzzle) = task.kind() else {
                panic!("expected spectrum task");
            };
            assert_eq!(puzzle.target().kind, WaveformKind::Sine);
        }

        let two = FREQ.replace("5.0, 50.0, 0.0, SQUARE", "5.0, 50.0");
        assert!(matches!(parse_task(&two), Err(TaskError::BadField { what: "target", .. })));
    }

    #[test]
    fn test_spectrum_bad_number() {
        let text = FREQ.replace("0.5\n", "half\n");
        assert!(matches!(
            parse_task(&text),
            Err(TaskError::BadNumber { what: "tolerance", .. })
        ));
    }

    #[test]
    fn test_parse_circuit() {
        let task = parse_task(LOGIC).unwrap();
        let TaskKind::Circuit(puzzle) = task.kind() else {
            panic!("expected circuit task");
        };
        assert_eq!(puzzle.table().len(), 4);
        assert_eq!(puzzle.table().num_inputs(), 2);
        // AND unknown, NAND deduplicated
        assert_eq!(puzzle.palette(), &[GateKind::Nand, GateKind::Not]);
        assert_eq!(task.difficulty(), 3);
    }

    #[test]
    fn test_circuit_passes_only_with_nand() {
        let mut task = parse_task(LOGIC).unwrap();
        let TaskKind::Circuit(puzzle) = task.kind_mut() else {
            panic!("expected circuit task");
        };
        let grid = puzzle.grid_mut();
        grid.place_gate(GateKind::Nand, 3, 4).unwrap();
        grid.draw_wire(2, 2, 2, 2);
        grid.draw_wire(5, 4, 22, 5);
        assert!(task.check_answer());

        let mut task = parse_task(LOGIC).unwrap();
        let TaskKind::Circuit(puzzle) = task.kind_mut() else {
            panic!("expected circuit task");
        };
        let grid = puzzle.grid_mut();
        grid.place_gate(GateKind::Not, 3, 2).unwrap();
        grid.draw_wire(5, 2, 22, 5);
        task.submit_answer();
        assert!(!task.is_correct());
    }

    #[test]
    fn test_circuit_errors() {
        let ragged = LOGIC.replace("1,0,1", "1,0");
        assert!(matches!(
            parse_task(&ragged),
            Err(TaskError::RaggedTruthTable { row: 2, .. })
        ));

        let no_gates = LOGIC.replace("nand, NOT, Nand, AND", "AND, OR");
        assert!(matches!(parse_task(&no_gates), Err(TaskError::NoGatesAvailable)));

        let no_rows = "LOGIC\nprompt\nNAND\n1\n";
        assert!(matches!(parse_task(no_rows), Err(TaskError::EmptyTruthTable)));

        let bad_cell = LOGIC.replace("0,1,1", "0,2,1");
        assert!(matches!(parse_task(&bad_cell), Err(TaskError::BadField { .. })));
    }

    #[test]
    fn test_difficulty_out_of_range() {
        let text = ABCD.replace("b\n1\n", "b\n9\n");
        assert!(matches!(parse_task(&text), Err(TaskError::Difficulty(9))));
        let text = ABCD.replace("b\n1\n", "b\n-1\n");
        assert!(matches!(parse_task(&text), Err(TaskError::Difficulty(-1))));
    }

    #[test]
    fn test_unknown_and_empty() {
        assert!(matches!(parse_task("QUIZ\nx\n"), Err(TaskError::UnknownKind(code)) if code == "QUIZ"));
        assert!(matches!(parse_task("# nothing\n\n"), Err(TaskError::EmptyFile)));
    }

    #[test]
    fn test_load_task_falls_back() {
        let dir = std::env::temp_dir().join(format!("repair-bay-missing-{}", std::process::id()));
        let task = load_task(&dir, 1, 0);
        assert_eq!(task.prompt(), fallback_task().prompt());
    }

    #[test]
    fn test_load_task_from_disk() {
        let dir = std::env::temp_dir().join(format!("repair-bay-load-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("level2_module3.txt"), LOGIC).unwrap();
        std::fs::write(dir.join("level2_module1.txt"), "ABCD\nbroken\n").unwrap();

        let task = load_task(&dir, 2, 2);
        assert_eq!(task.code(), TaskKindCode::Circuit);
        let broken = load_task(&dir, 2, 0);
        assert_eq!(broken.code(), TaskKindCode::MultipleChoice);
        assert!(broken.prompt().contains("2 + 2"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
