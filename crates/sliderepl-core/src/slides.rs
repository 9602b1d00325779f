//! Slide deck parsing.
//!
//! A deck is a single text file (usually a `.go` file, so editors highlight
//! it) where each slide starts with `//!`. A slide may end with speaker
//! notes inside a `/*-- ... */` comment:
//!
//! ```text
//! //!
//! fmt.Println("first slide")
//! /*-- say hello */
//! //!
//! fmt.Println("second slide")
//! ```

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::navigation::{Neighbors, neighbors};

/// Separates slides.
pub const SLIDE_DELIMITER: &str = "//!";

/// Opens the speaker notes of a slide.
pub const NOTES_OPEN: &str = "/*--";

/// Closes the speaker notes of a slide.
pub const NOTES_CLOSE: &str = "*/";

/// One slide: editor contents plus optional speaker notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slide {
    /// Text placed in the editor.
    pub contents: String,
    /// Speaker notes; empty when the slide has none.
    pub notes: String,
}

impl Slide {
    /// Parse a single trimmed section.
    fn from_section(section: &str) -> Self {
        let Some((contents, rest)) = section.split_once(NOTES_OPEN) else {
            return Self {
                contents: section.to_string(),
                notes: String::new(),
            };
        };

        let notes = rest.split_once(NOTES_CLOSE).map_or(rest, |(notes, _)| notes);

        Self {
            contents: contents.to_string(),
            notes: notes.to_string(),
        }
    }
}

/// Ordered, immutable sequence of slides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideDeck {
    slides: Vec<Slide>,
}

impl SlideDeck {
    /// Parse a deck from document text.
    ///
    /// Sections that are blank after trimming produce no slide.
    pub fn parse(document: &str) -> Self {
        let slides = document
            .split(SLIDE_DELIMITER)
            .map(str::trim)
            .filter(|section| !section.is_empty())
            .map(Slide::from_section)
            .collect();

        Self { slides }
    }

    /// Read and parse a deck file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = fs::read_to_string(path).map_err(|e| Error::SlideSource {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let deck = Self::parse(&document);
        tracing::info!("Loaded {} slides from {}", deck.len(), path.display());
        Ok(deck)
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the deck has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Slide at `index`, if in range.
    pub fn get(&self, index: i64) -> Option<&Slide> {
        usize::try_from(index).ok().and_then(|i| self.slides.get(i))
    }

    /// Iterate over slides in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Slide> {
        self.slides.iter()
    }

    /// Previous/next indices around `index` within this deck.
    pub fn neighbors(&self, index: i64) -> Neighbors {
        let total = i64::try_from(self.slides.len()).unwrap_or(i64::MAX);
        neighbors(index, total)
    }
}

impl<'a> IntoIterator for &'a SlideDeck {
    type Item = &'a Slide;
    type IntoIter = std::slice::Iter<'a, Slide>;

    fn into_iter(self) -> Self::IntoIter {
        self.slides.iter()
    }
}
