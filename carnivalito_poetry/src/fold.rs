// Lowercasing and diacritic folding.
//
// Every analyzer compares text in a folded form: lowercase, NFD-decomposed,
// combining marks dropped (`á` → `a`, `ñ` → `n`, `ü` → `u`). The acute
// accent is the one mark that carries meaning for stress, so `fold_chars`
// remembers it on the base letter instead of discarding it silently.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

const COMBINING_ACUTE: char = '\u{0301}';

/// A folded base character plus whether it carried an acute accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldedChar {
    pub base: char,
    pub acute: bool,
}

/// Lowercase, decompose and strip combining marks, keeping acute flags.
pub fn fold_chars(text: &str) -> Vec<FoldedChar> {
    let mut out: Vec<FoldedChar> = Vec::with_capacity(text.len());
    for c in text.to_lowercase().nfd() {
        if is_combining_mark(c) {
            if c == COMBINING_ACUTE {
                if let Some(last) = out.last_mut() {
                    last.acute = true;
                }
            }
            continue;
        }
        out.push(FoldedChar {
            base: c,
            acute: false,
        });
    }
    out
}

/// Folded text with all accent information dropped.
pub fn fold(text: &str) -> String {
    fold_chars(text).into_iter().map(|f| f.base).collect()
}

/// Spanish vowel nuclei. `y` is deliberately not one.
pub fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Folded `a-z` words; any other character separates words.
pub fn word_tokens(text: &str) -> Vec<String> {
    fold(text)
        .split(|c: char| !c.is_ascii_lowercase())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
