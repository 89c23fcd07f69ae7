//! Text normalizer shared by dictionary entries and user input.
//!
//! Handles:
//! - Case folding
//! - Arabic letter variants (أ/إ/آ→ا, ؤ→و, ئ→ي, ة→ه)
//! - Arabic diacritics (harakat, U+064B..U+065F)
//! - Punctuation and foreign symbols (replaced by a space)
//! - Whitespace runs (collapsed, trimmed)

/// Normalize text for keyword matching.
///
/// The output only contains Arabic letters, Arabic-Indic digits, ASCII
/// lowercase letters, ASCII digits and single spaces between words, so
/// `normalize_text(normalize_text(x)) == normalize_text(x)`.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.trim().chars().flat_map(char::to_lowercase) {
        if is_diacritic(c) {
            continue;
        }

        let c = fold_variant(c);
        if is_word_char(c) {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }

    out
}

/// Count whitespace-separated words in raw text.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Collapse a letter variant to its canonical form.
fn fold_variant(c: char) -> char {
    match c {
        'أ' | 'إ' | 'آ' => 'ا',
        'ؤ' => 'و',
        'ئ' => 'ي',
        'ة' => 'ه',
        other => other,
    }
}

fn is_diacritic(c: char) -> bool {
    ('\u{064B}'..='\u{065F}').contains(&c)
}

fn is_word_char(c: char) -> bool {
    matches!(c,
        '\u{0621}'..='\u{064A}'
        | '\u{0660}'..='\u{0669}'
        | 'a'..='z'
        | '0'..='9')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_trim() {
        assert_eq!(normalize_text("  Avoids EYE Contact  "), "avoids eye contact");
        assert_eq!(normalize_text("A"), normalize_text("a"));
    }

    #[test]
    fn test_punctuation_becomes_space() {
        assert_eq!(normalize_text("self-harm"), "self harm");
        assert_eq!(normalize_text("10-20 words only!"), "10 20 words only");
        assert_eq!(normalize_text("almond-shaped eyes."), "almond shaped eyes");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(normalize_text("no \t\n  speech"), "no speech");
        assert_eq!(normalize_text("!!hello??"), "hello");
    }

    #[test]
    fn test_arabic_variants_fold() {
        // alef with hamza above / below / madda
        assert_eq!(normalize_text("أحمد"), normalize_text("احمد"));
        assert_eq!(normalize_text("إسلام"), "اسلام");
        assert_eq!(normalize_text("آمن"), "امن");
        // waw and yeh with hamza
        assert_eq!(normalize_text("مؤمن"), "مومن");
        assert_eq!(normalize_text("بيئة"), "بييه");
        // teh marbuta
        assert_eq!(normalize_text("مدرسة"), "مدرسه");
    }

    #[test]
    fn test_diacritics_stripped() {
        assert_eq!(normalize_text("كَتَبَ"), "كتب");
        assert_eq!(normalize_text("مُحَمَّد"), "محمد");
    }

    #[test]
    fn test_non_latin_letters_removed() {
        assert_eq!(normalize_text("café"), "caf");
        assert_eq!(normalize_text("٣ كلمات"), "٣ كلمات");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   "), "");
        assert_eq!(normalize_text("?!."), "");
    }

    #[test]
    fn test_idempotent() {
        for text in ["Flaps HIS hands!!", "  أَحْمَد  يَلْعَبُ ", "a--b  c", "x\u{0651}"] {
            let once = normalize_text(text);
            assert_eq!(normalize_text(&once), once, "not idempotent for {:?}", text);
        }
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  one two\tthree\n"), 3);
    }
}
