//! Abstract 2D drawing surface for task screens
//!
//! Tasks describe what to draw through `DrawSurface`; the host decides how.
//! Fonts come from an explicitly passed `RenderContext`.

pub mod commands;
pub mod widgets;

pub use commands::{CommandList, DrawCommand};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{LOGICAL_HEIGHT, LOGICAL_WIDTH};

/// RGBA color, components in 0-1
pub type Color = [f32; 4];

/// Color from 0-255 channels
pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Color {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
}

/// Retro terminal palette
pub mod palette {
    use super::{Color, rgb, rgba};

    pub const GREEN: Color = rgb(0, 255, 0);
    pub const GREEN_DARK: Color = rgb(0, 180, 0);
    pub const GREEN_DARKER: Color = rgb(0, 100, 0);
    pub const BACKGROUND: Color = rgb(0, 20, 0);
    pub const CIRCUIT_BACKGROUND: Color = rgb(0, 10, 0);
    pub const PANEL: Color = rgb(0, 30, 0);
    pub const CELL: Color = rgb(0, 20, 0);
    pub const CELL_CURSOR: Color = rgb(0, 50, 0);
    pub const GATE_BODY: Color = rgb(0, 40, 0);
    /// Faded trace for the target side of comparisons
    pub const TARGET: Color = rgba(0, 255, 0, 0.4);
    pub const HIGHLIGHT: Color = rgb(255, 255, 0);
    pub const ERROR: Color = rgb(255, 0, 0);
    pub const BLACK: Color = rgb(0, 0, 0);
    pub const SUCCESS_BANNER: Color = rgba(0, 100, 0, 0.8);
    pub const FAILURE_BANNER: Color = rgba(100, 0, 0, 0.8);
}

/// Text size classes used by task screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    Title,
    Body,
    Small,
}

/// A font the host knows how to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub size: f32,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

/// Font per role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontTable {
    pub title: Font,
    pub body: Font,
    pub small: Font,
}

impl Default for FontTable {
    fn default() -> Self {
        Self {
            title: Font::new("Monospaced", 48.0),
            body: Font::new("Monospaced", 24.0),
            small: Font::new("Monospaced", 16.0),
        }
    }
}

impl FontTable {
    pub fn get(&self, role: FontRole) -> &Font {
        match role {
            FontRole::Title => &self.title,
            FontRole::Body => &self.body,
            FontRole::Small => &self.small,
        }
    }
}

/// Everything a task needs from the host to render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub fonts: FontTable,
    /// Logical canvas size
    pub viewport: Vec2,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            fonts: FontTable::default(),
            viewport: Vec2::new(LOGICAL_WIDTH, LOGICAL_HEIGHT),
        }
    }
}

impl RenderContext {
    pub fn font(&self, role: FontRole) -> &Font {
        self.fonts.get(role)
    }

    pub fn center_x(&self) -> f32 {
        self.viewport.x / 2.0
    }
}

/// Drawing primitives a host surface provides
pub trait DrawSurface {
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color);
    fn stroke_rect(&mut self, pos: Vec2, size: Vec2, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);
    /// Text with its baseline starting at `pos`
    fn text(&mut self, text: &str, pos: Vec2, font: &Font, color: Color);
    /// Text horizontally centered on `center_x`
    fn centered_text(&mut self, text: &str, center_x: f32, y: f32, font: &Font, color: Color);
}
