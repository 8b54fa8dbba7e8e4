//! Four-answer question

use glam::Vec2;

use super::{TaskStatus, TaskView};
use crate::consts::ANSWER_COUNT;
use crate::error::{TaskError, TaskResult};
use crate::input::TaskInput;
use crate::render::{DrawSurface, FontRole, RenderContext, palette, widgets};

const LETTERS: [char; ANSWER_COUNT] = ['A', 'B', 'C', 'D'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleChoice {
    answers: [String; ANSWER_COUNT],
    correct_index: usize,
    selected: usize,
}

impl MultipleChoice {
    /// `correct` must be one of A-D
    pub fn new(answers: Vec<String>, correct: char) -> TaskResult<Self> {
        let answers: [String; ANSWER_COUNT] =
            answers.try_into().map_err(|v: Vec<String>| TaskError::AnswerCount {
                expected: ANSWER_COUNT,
                found: v.len(),
            })?;
        let correct_index = LETTERS
            .iter()
            .position(|&l| l == correct)
            .ok_or(TaskError::AnswerLetter(correct))?;
        Ok(Self::from_answers(answers, correct_index))
    }

    pub(super) fn from_answers(answers: [String; ANSWER_COUNT], correct_index: usize) -> Self {
        debug_assert!(correct_index < ANSWER_COUNT);
        Self {
            answers,
            correct_index,
            selected: 0,
        }
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn correct_letter(&self) -> char {
        LETTERS[self.correct_index]
    }

    /// Move the highlight; indices past D are ignored
    pub fn select(&mut self, index: usize) {
        if index < ANSWER_COUNT {
            self.selected = index;
        }
    }

    pub(super) fn update(&mut self, input: &TaskInput) {
        if input.navigate_down {
            self.selected = (self.selected + 1) % ANSWER_COUNT;
        }
        if input.navigate_up {
            self.selected = (self.selected + ANSWER_COUNT - 1) % ANSWER_COUNT;
        }
        if let Some(i) = input.quick_select {
            self.select(i as usize);
        }
    }

    pub(super) fn check(&self) -> bool {
        self.selected == self.correct_index
    }

    pub(super) fn reset(&mut self) {
        self.selected = 0;
    }

    pub(super) fn render(&self, surface: &mut dyn DrawSurface, ctx: &RenderContext, view: &TaskView) {
        widgets::background(surface, ctx, palette::BACKGROUND);
        let cx = ctx.center_x();
        surface.centered_text(
            "REPAIR MODULE - ANSWER QUESTION",
            cx,
            80.0,
            ctx.font(FontRole::Title),
            palette::GREEN,
        );

        let body = ctx.font(FontRole::Body);
        let max_chars = ((ctx.viewport.x - 200.0) / (body.size * 0.6)).max(10.0) as usize;
        let mut y = 160.0;
        for line in wrap_text(view.prompt, max_chars) {
            surface.centered_text(&line, cx, y, body, palette::GREEN);
            y += body.size + 8.0;
        }

        let box_size = Vec2::new(600.0, 50.0);
        let left = cx - box_size.x / 2.0;
        let top = y + 40.0;
        for (i, answer) in self.answers.iter().enumerate() {
            let pos = Vec2::new(left, top + i as f32 * (box_size.y + 20.0));
            let selected = i == self.selected;
            let revealed = !matches!(view.status, TaskStatus::Active) && i == self.correct_index;

            let (fill, edge, text_color) = if selected {
                (palette::GREEN_DARKER, palette::GREEN, palette::GREEN)
            } else {
                (palette::PANEL, palette::GREEN_DARKER, palette::GREEN_DARK)
            };
            surface.fill_rect(pos, box_size, fill);
            surface.stroke_rect(pos, box_size, if revealed { palette::HIGHLIGHT } else { edge });

            surface.fill_rect(pos, Vec2::splat(box_size.y), edge);
            surface.centered_text(
                &LETTERS[i].to_string(),
                pos.x + box_size.y / 2.0,
                pos.y + 34.0,
                body,
                palette::BLACK,
            );
            surface.text(
                answer,
                Vec2::new(pos.x + box_size.y + 20.0, pos.y + 34.0),
                body,
                text_color,
            );
        }

        match view.status {
            TaskStatus::Completed { correct } => widgets::result_banner(surface, ctx, correct),
            TaskStatus::Active => widgets::hint(
                surface,
                ctx,
                "UP/DOWN to select, A-D to jump, ENTER to confirm",
            ),
        }
    }
}

/// Greedy word wrap
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::CommandList;

    fn answers() -> Vec<String> {
        vec!["3".into(), "4".into(), "5".into(), "6".into()]
    }

    fn down() -> TaskInput {
        TaskInput {
            navigate_down: true,
            ..Default::default()
        }
    }

    fn up() -> TaskInput {
        TaskInput {
            navigate_up: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_bad_answer_count() {
        let err = MultipleChoice::new(vec!["a".into(), "b".into()], 'A').unwrap_err();
        assert!(matches!(err, TaskError::AnswerCount { expected: 4, found: 2 }));
    }

    #[test]
    fn test_rejects_bad_letter() {
        assert!(matches!(
            MultipleChoice::new(answers(), 'E'),
            Err(TaskError::AnswerLetter('E'))
        ));
        assert!(MultipleChoice::new(answers(), 'd').is_err());
    }

    #[test]
    fn test_selection_wraps() {
        let mut mc = MultipleChoice::new(answers(), 'A').unwrap();
        mc.update(&up());
        assert_eq!(mc.selected(), 3);
        mc.update(&down());
        assert_eq!(mc.selected(), 0);
        for _ in 0..5 {
            mc.update(&down());
        }
        assert_eq!(mc.selected(), 1);
    }

    #[test]
    fn test_quick_select() {
        let mut mc = MultipleChoice::new(answers(), 'C').unwrap();
        mc.update(&TaskInput {
            quick_select: Some(2),
            ..Default::default()
        });
        assert!(mc.check());
        mc.update(&TaskInput {
            quick_select: Some(7),
            ..Default::default()
        });
        assert_eq!(mc.selected(), 2);
    }

    #[test]
    fn test_check_and_reset() {
        let mut mc = MultipleChoice::new(answers(), 'B').unwrap();
        assert!(!mc.check());
        mc.update(&down());
        assert!(mc.check());
        assert_eq!(mc.correct_letter(), 'B');
        mc.reset();
        assert_eq!(mc.selected(), 0);
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
        assert!(wrap_text("   ", 10).is_empty());
    }

    #[test]
    fn test_render_shows_answers() {
        let mc = MultipleChoice::new(answers(), 'B').unwrap();
        let view = TaskView {
            prompt: "What is 2 + 2?",
            difficulty: 1,
            status: TaskStatus::Active,
            elapsed: 0.0,
        };
        let mut list = CommandList::new();
        mc.render(&mut list, &RenderContext::default(), &view);
        assert!(list.contains_text("What is 2 + 2?"));
        for text in ["A", "B", "C", "D", "3", "4", "5", "6"] {
            assert!(list.texts().any(|t| t == text), "missing {text}");
        }
        assert!(list.contains_text("ENTER"));
    }
}
