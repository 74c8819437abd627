//! Title normalization for cache keys.
//!
//! A normalized term is lowercase, has `® ™ : -` removed, has whitespace
//! collapsed to single spaces, and has whole-token Roman numerals I–X
//! replaced by Arabic digits ("civilization vi" -> "civilization 6", while
//! "drive" stays "drive").

/// Characters dropped from titles before tokenizing.
const STRIPPED_CHARS: &[char] = &['®', '™', ':', '-'];

/// Whole-token Roman numeral replacements.
const ROMAN_NUMERALS: &[(&str, &str)] = &[
    ("i", "1"),
    ("ii", "2"),
    ("iii", "3"),
    ("iv", "4"),
    ("v", "5"),
    ("vi", "6"),
    ("vii", "7"),
    ("viii", "8"),
    ("ix", "9"),
    ("x", "10"),
];

/// Canonicalize a raw title into the key used to partition the offer cache.
///
/// Symbols are stripped before tokens are compared, so `"Civilization VI:"`
/// and `"Civilization VI"` produce the same key and the function is
/// idempotent.
pub fn normalize(raw: &str) -> String {
    let cleaned: String = raw.to_lowercase().chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect();

    cleaned.split_whitespace().map(roman_to_arabic).collect::<Vec<_>>().join(" ")
}

fn roman_to_arabic(token: &str) -> &str {
    ROMAN_NUMERALS
        .iter()
        .find(|(roman, _)| *roman == token)
        .map(|(_, arabic)| *arabic)
        .unwrap_or(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roman_numeral_tokens() {
        assert_eq!(normalize("Civilization VI"), "civilization 6");
        assert_eq!(normalize("Final Fantasy X"), "final fantasy 10");
        assert_eq!(normalize("Grand Theft Auto IV"), "grand theft auto 4");
        assert_eq!(normalize("Rocky I"), "rocky 1");
    }

    #[test]
    fn test_no_substring_replacement() {
        assert_eq!(normalize("Drive"), "drive");
        assert_eq!(normalize("Divinity: Original Sin II"), "divinity original sin 2");
        assert_eq!(normalize("Vivid Xenon"), "vivid xenon");
    }

    #[test]
    fn test_strips_symbols_and_collapses_whitespace() {
        assert_eq!(normalize("  The Witcher® 3:  Wild   Hunt™ "), "the witcher 3 wild hunt");
        assert_eq!(normalize("Spider-Man"), "spiderman");
        assert_eq!(normalize("Half-Life - Episode II"), "halflife episode 2");
    }

    #[test]
    fn test_numeral_followed_by_symbol() {
        assert_eq!(normalize("Civilization VI:"), "civilization 6");
        assert_eq!(normalize("Civilization VI™"), "civilization 6");
    }

    #[test]
    fn test_empty_and_symbol_only_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("®™:-"), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "The Witcher 3",
            "Civilization VI:",
            "Half-Life - Episode II",
            "  X-Men  Legends ",
            "DRIVE",
            "Ⅻ Ünïcödé Títle",
            "i ii iii iv v vi vii viii ix x",
            "",
        ];
        for raw in samples {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "normalize is not idempotent for {raw:?}");
        }
    }
}
