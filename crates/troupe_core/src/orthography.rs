//! Writing-system detection.

use serde::{Deserialize, Serialize};

/// Dominant writing system of a script.
///
/// # Examples
///
/// ```
/// use troupe_core::Orthography;
///
/// assert_eq!(Orthography::detect("민지: 안녕, 오늘 어때?"), Orthography::Hangul);
/// assert_eq!(Orthography::detect("Mina: How are you today?"), Orthography::Latin);
/// assert_eq!(Orthography::detect("... 123"), Orthography::Unknown);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Orthography {
    /// Korean
    Hangul,
    /// Latin alphabet
    Latin,
    /// No letters to judge by
    #[default]
    Unknown,
}

impl Orthography {
    /// Majority writing system among the letters of `text`.
    pub fn detect(text: &str) -> Self {
        let (mut hangul, mut latin) = (0usize, 0usize);
        for c in text.chars() {
            if is_hangul(c) {
                hangul += 1;
            } else if c.is_alphabetic() {
                latin += 1;
            }
        }
        match (hangul, latin) {
            (0, 0) => Orthography::Unknown,
            (h, l) if h >= l => Orthography::Hangul,
            _ => Orthography::Latin,
        }
    }

    /// True if `token` carries content in this writing system.
    ///
    /// A single Hangul syllable is a word; Latin needs two letters.
    pub fn is_content_token(&self, token: &str) -> bool {
        let hangul = token.chars().filter(|c| is_hangul_syllable(*c)).count();
        let letters = token
            .chars()
            .filter(|c| c.is_alphabetic() && !is_hangul(*c))
            .count();
        match self {
            Orthography::Hangul => hangul >= 1,
            Orthography::Latin => letters >= 2,
            Orthography::Unknown => hangul >= 1 || letters >= 2,
        }
    }
}

/// Hangul syllables and jamo.
pub fn is_hangul(c: char) -> bool {
    is_hangul_syllable(c) || matches!(c, '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}')
}

fn is_hangul_syllable(c: char) -> bool {
    matches!(c, '\u{AC00}'..='\u{D7A3}')
}
