//! Target-script detection.
//!
//! The target script is Hangul: a display name or snippet "has script" when it
//! contains at least one precomposed Hangul syllable.

const HANGUL_SYLLABLES_START: char = '\u{AC00}';
const HANGUL_SYLLABLES_END: char = '\u{D7A3}';

/// Returns `true` if `c` is a precomposed Hangul syllable (`가`..=`힣`).
#[must_use]
pub fn is_target_script_char(c: char) -> bool {
    (HANGUL_SYLLABLES_START..=HANGUL_SYLLABLES_END).contains(&c)
}

/// Returns `true` if `text` contains at least one target-script character.
#[must_use]
pub fn contains_target_script(text: &str) -> bool {
    text.chars().any(is_target_script_char)
}
