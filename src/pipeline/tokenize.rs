use std::collections::HashSet;
use std::ops::RangeInclusive;

use unicode_segmentation::UnicodeSegmentation;

use crate::models::Post;

const SPANISH_STOPWORDS: &str = include_str!("../../resources/stopwords/es.txt");

/// ASCII punctuation, same set as Python's `string.punctuation`.
const ASCII_PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

const EXTRA_PUNCTUATION: [&str; 9] = ["¿", "?", "…", "“", "«", "»", "•", "¡", "”"];

const EXTRA_EMOJI: [&str; 4] = ["🗳️", "🗣️", "🗳", "➡️"];

/// Code points that are emoji, emoji components or pictographic symbols.
const EMOJI_RANGES: [RangeInclusive<u32>; 17] = [
    0x1F000..=0x1FAFF,
    0x2600..=0x27BF,
    0x2194..=0x2199,
    0x21A9..=0x21AA,
    0x231A..=0x231B,
    0x23E9..=0x23FA,
    0x2B05..=0x2B07,
    0x2B1B..=0x2B1C,
    0x2B50..=0x2B50,
    0x2B55..=0x2B55,
    0x3030..=0x3030,
    0x303D..=0x303D,
    0x3297..=0x3299,
    0x200D..=0x200D,
    0x20E3..=0x20E3,
    0xFE0E..=0xFE0F,
    0xE0020..=0xE007F,
];

const EMOJI_SINGLES: [char; 9] = ['‼', '⁉', '™', 'ℹ', 'Ⓜ', '⌨', '⏏', '©', '®'];

/// Characters that never belong to a word.
#[derive(Debug, Clone, Default)]
pub struct GlyphSet {
    chars: HashSet<char>,
    ranges: Vec<RangeInclusive<u32>>,
}

impl GlyphSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every character of every glyph. A multi-code-point emoji such as
    /// `🗳️` contributes both the pictograph and its variation selector.
    pub fn with_glyphs<'a>(mut self, glyphs: impl IntoIterator<Item = &'a str>) -> Self {
        for glyph in glyphs {
            self.chars.extend(glyph.chars());
        }
        self
    }

    pub fn with_chars(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.chars.extend(chars);
        self
    }

    pub fn with_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.ranges.push(range);
        self
    }

    /// Punctuation, digits and emoji as found in Spanish-language posts.
    pub fn social_media() -> Self {
        let mut set = Self::new()
            .with_chars(ASCII_PUNCTUATION.chars())
            .with_glyphs(EXTRA_PUNCTUATION)
            .with_chars('0'..='9')
            .with_chars(EMOJI_SINGLES)
            .with_glyphs(EXTRA_EMOJI);
        for range in EMOJI_RANGES {
            set = set.with_range(range);
        }
        set
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c) || self.ranges.iter().any(|r| r.contains(&(c as u32)))
    }

    /// Removes every glyph from `word`.
    pub fn strip(&self, word: &str) -> String {
        word.chars().filter(|&c| !self.contains(c)).collect()
    }
}

/// Immutable tokenizer configuration: which words and glyphs to discard.
#[derive(Debug, Clone)]
pub struct TextFilter {
    stopwords: HashSet<String>,
    glyphs: GlyphSet,
}

impl TextFilter {
    pub fn new(stopwords: impl IntoIterator<Item = String>, glyphs: GlyphSet) -> Self {
        Self {
            stopwords: stopwords.into_iter().collect(),
            glyphs,
        }
    }

    /// NLTK Spanish stopwords with the social media glyph set.
    pub fn spanish() -> Self {
        let stopwords = SPANISH_STOPWORDS
            .lines()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string);
        Self::new(stopwords, GlyphSet::social_media())
    }

    #[cfg(test)]
    pub fn stopwords(&self) -> &HashSet<String> {
        &self.stopwords
    }

    #[cfg(test)]
    pub fn glyphs(&self) -> &GlyphSet {
        &self.glyphs
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Splits `text` on Unicode word boundaries, strips glyphs, lowercases
    /// and drops stopwords. Tokens left empty after stripping are discarded.
    pub fn tokenize_and_filter(&self, text: &str) -> Vec<String> {
        text.split_word_bounds()
            .filter(|segment| !segment.trim().is_empty())
            .filter_map(|segment| {
                let stripped = self.glyphs.strip(segment);
                let stripped = stripped.trim();
                if stripped.is_empty() {
                    None
                } else {
                    Some(stripped.to_lowercase())
                }
            })
            .filter(|token| !self.is_stopword(token))
            .collect()
    }

    /// Flattened token sequence over all posts, in post order.
    pub fn corpus(&self, posts: &[Post]) -> Vec<String> {
        let tokens: Vec<String> = posts
            .iter()
            .flat_map(|post| self.tokenize_and_filter(&post.text))
            .collect();
        tracing::debug!(posts = posts.len(), tokens = tokens.len(), "Tokenized corpus");
        tokens
    }
}

impl Default for TextFilter {
    fn default() -> Self {
        Self::spanish()
    }
}
