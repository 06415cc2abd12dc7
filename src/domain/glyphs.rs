/// Glyph pool: the characters kitten and the bogus items are drawn with.
///
/// Defaults to printable ASCII `!`..=`~` without the robot's `#`, so kitten
/// is indistinguishable from the junk around it. Glyphs are handed out by
/// uniform random draw; duplicates between items are expected.

use rand::seq::SliceRandom;
use rand::Rng;
use unicode_width::UnicodeWidthStr;

use super::entity::ROBOT_GLYPH;

#[derive(Clone, Debug)]
pub struct GlyphPool {
    glyphs: Vec<String>,
}

impl GlyphPool {
    pub fn printable() -> Self {
        let glyphs = ('!'..='~')
            .map(|c| c.to_string())
            .filter(|g| g != ROBOT_GLYPH)
            .collect();
        GlyphPool { glyphs }
    }

    /// Pool from custom glyphs. Blank entries, the robot glyph and
    /// anything not exactly one column wide are dropped; falls back to `printable()` if nothing usable remains.
    pub fn from_glyphs<I, S>(glyphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let glyphs: Vec<String> = glyphs
            .into_iter()
            .map(Into::into)
            .filter(|g| !g.trim().is_empty() && g != ROBOT_GLYPH)
            .filter(|g| UnicodeWidthStr::width(g.as_str()) == 1)
            .collect();
        if glyphs.is_empty() {
            return Self::printable();
        }
        GlyphPool { glyphs }
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.glyphs.shuffle(rng);
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        let i = rng.gen_range(0..self.glyphs.len());
        &self.glyphs[i]
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[cfg(test)]
    pub fn contains(&self, glyph: &str) -> bool {
        self.glyphs.iter().any(|g| g == glyph)
    }
}
