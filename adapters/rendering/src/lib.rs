#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for lifegrid adapters.
//!
//! Frames are plain text: every cell becomes its glyph and every row ends with
//! a newline. Backends decide where the text goes.

use anyhow::Result as AnyResult;
use lifegrid_core::GridView;
use thiserror::Error;

/// Default glyph drawn for live cells.
pub const DEFAULT_ALIVE_GLYPH: &str = "o ";
/// Default glyph drawn for dead cells.
pub const DEFAULT_DEAD_GLYPH: &str = ". ";

/// Text drawn for each cell state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyphs {
    alive: String,
    dead: String,
}

impl Glyphs {
    /// Validates and stores the glyph pair.
    pub fn new<A, D>(alive: A, dead: D) -> Result<Self, RenderingError>
    where
        A: Into<String>,
        D: Into<String>,
    {
        let alive = alive.into();
        let dead = dead.into();
        if alive.is_empty() {
            return Err(RenderingError::EmptyGlyph {
                state: GlyphState::Alive,
            });
        }
        if dead.is_empty() {
            return Err(RenderingError::EmptyGlyph {
                state: GlyphState::Dead,
            });
        }
        Ok(Self { alive, dead })
    }

    /// Glyph drawn for live cells.
    #[must_use]
    pub fn alive(&self) -> &str {
        &self.alive
    }

    /// Glyph drawn for dead cells.
    #[must_use]
    pub fn dead(&self) -> &str {
        &self.dead
    }
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            alive: DEFAULT_ALIVE_GLYPH.to_owned(),
            dead: DEFAULT_DEAD_GLYPH.to_owned(),
        }
    }
}

/// Cell state a glyph belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphState {
    /// Glyph for live cells.
    Alive,
    /// Glyph for dead cells.
    Dead,
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// Glyphs must draw at least one character.
    #[error("{state:?} glyph must not be empty")]
    EmptyGlyph {
        /// State whose glyph was empty.
        state: GlyphState,
    },
}

/// Renders one generation as text, one line per row.
#[must_use]
pub fn compose_text(view: GridView<'_>, glyphs: &Glyphs) -> String {
    let dimensions = view.dimensions();
    let widest = glyphs.alive.len().max(glyphs.dead.len());
    let mut text = String::with_capacity(
        dimensions.cell_count() * widest + dimensions.rows() as usize,
    );
    for row in view.rows() {
        for cell in row {
            text.push_str(if cell.is_alive() {
                &glyphs.alive
            } else {
                &glyphs.dead
            });
        }
        text.push('\n');
    }
    text
}

/// Presentable rendering of a single generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Generation the frame depicts.
    pub generation: u64,
    /// Live cells in that generation.
    pub population: usize,
    /// Composed grid text.
    pub text: String,
}

impl Frame {
    /// Composes a frame from the provided view.
    #[must_use]
    pub fn compose(generation: u64, view: GridView<'_>, glyphs: &Glyphs) -> Self {
        Self {
            generation,
            population: view.population(),
            text: compose_text(view, glyphs),
        }
    }
}

/// Rendering backend capable of presenting lifegrid frames.
pub trait RenderingBackend {
    /// Presents a single frame, replacing whatever was shown before.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifegrid_core::{CellCoord, GridDimensions, GridSnapshot};

    fn blinker() -> GridSnapshot {
        let dimensions = GridDimensions::new(3, 3).expect("dimensions");
        GridSnapshot::from_live_cells(
            dimensions,
            [
                CellCoord::new(1, 0),
                CellCoord::new(1, 1),
                CellCoord::new(1, 2),
            ],
        )
    }

    #[test]
    fn glyphs_reject_empty_strings() {
        assert_eq!(
            Glyphs::new("", " "),
            Err(RenderingError::EmptyGlyph {
                state: GlyphState::Alive
            })
        );
        assert_eq!(
            Glyphs::new("X", String::new()),
            Err(RenderingError::EmptyGlyph {
                state: GlyphState::Dead
            })
        );
    }

    #[test]
    fn default_glyphs_are_two_columns_wide() {
        let glyphs = Glyphs::default();
        assert_eq!(glyphs.alive(), "o ");
        assert_eq!(glyphs.dead(), ". ");
    }

    #[test]
    fn compose_text_terminates_every_row() {
        let snapshot = blinker();
        let text = compose_text(snapshot.view(), &Glyphs::default());
        assert_eq!(text, ". . . \no o o \n. . . \n");
    }

    #[test]
    fn compose_text_uses_custom_glyphs() {
        let snapshot = blinker();
        let glyphs = Glyphs::new("X", " ").expect("glyphs");
        assert_eq!(compose_text(snapshot.view(), &glyphs), "   \nXXX\n   \n");
    }

    #[test]
    fn frame_carries_generation_and_population() {
        let snapshot = blinker();
        let frame = Frame::compose(7, snapshot.view(), &Glyphs::default());
        assert_eq!(frame.generation, 7);
        assert_eq!(frame.population, 3);
        assert!(frame.text.ends_with('\n'));
    }
}
