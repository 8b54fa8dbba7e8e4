//! Recording surface: stores draw calls for later replay or inspection

use glam::Vec2;

use super::{Color, DrawSurface, Font};

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { pos: Vec2, size: Vec2, color: Color },
    StrokeRect { pos: Vec2, size: Vec2, color: Color },
    Line { from: Vec2, to: Vec2, color: Color, width: f32 },
    Text { text: String, pos: Vec2, size: f32, color: Color },
    CenteredText { text: String, center_x: f32, y: f32, size: f32, color: Color },
}

/// Draw calls in submission order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandList {
    pub commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// All text drawn, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, .. } | DrawCommand::CenteredText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// True if any drawn text contains `needle`
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    pub fn count_lines(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Line { .. }))
            .count()
    }
}

impl DrawSurface for CommandList {
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::FillRect { pos, size, color });
    }

    fn stroke_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::StrokeRect { pos, size, color });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn text(&mut self, text: &str, pos: Vec2, font: &Font, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            size: font.size,
            color,
        });
    }

    fn centered_text(&mut self, text: &str, center_x: f32, y: f32, font: &Font, color: Color) {
        self.commands.push(DrawCommand::CenteredText {
            text: text.to_string(),
            center_x,
            y,
            size: font.size,
            color,
        });
    }
}
