//! Alphabetical ordering for course names.
//!
//! Course names are mostly Persian, with the occasional Latin word or digit.
//! Code point order puts پ چ ژ گ after every Arabic letter and separates
//! Arabic and Persian forms of the same letter, so names are compared by
//! Persian (`fa`) collation weights instead. Levels are compared over the
//! whole string: base letters first, then letter variants and vowel marks,
//! then case. Arabic script sorts before Latin, and names that differ only
//! in digit script or joiners compare equal.

use std::cmp::Ordering;

/// Persian alphabet in dictionary order. آ is a letter of its own and ء
/// stands for every hamza form.
const PERSIAN_ALPHABET: &str = "آاءبپتثجچحخدذرزژسشصضطظعغفقکگلمنوهی";

/// Punctuation and symbols in collation order; anything else follows by
/// code point.
const PUNCTUATION: &str = "_-,،٫؛:!?.۔'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Vowel marks carry no base letter, only a secondary weight.
const MARKS: [char; 10] = [
    '\u{064E}', '\u{0650}', '\u{064F}', '\u{064B}', '\u{064D}', '\u{064C}', '\u{0651}', '\u{0652}',
    '\u{0654}', '\u{0670}',
];

/// Accented Latin letters: base letter and accent rank.
const LATIN_ACCENTS: [(char, char, u8); 27] = [
    ('á', 'a', 1),
    ('à', 'a', 2),
    ('â', 'a', 3),
    ('å', 'a', 4),
    ('ä', 'a', 5),
    ('ã', 'a', 6),
    ('ā', 'a', 7),
    ('ç', 'c', 8),
    ('é', 'e', 1),
    ('è', 'e', 2),
    ('ê', 'e', 3),
    ('ë', 'e', 5),
    ('í', 'i', 1),
    ('ì', 'i', 2),
    ('î', 'i', 3),
    ('ï', 'i', 5),
    ('ñ', 'n', 6),
    ('ó', 'o', 1),
    ('ò', 'o', 2),
    ('ô', 'o', 3),
    ('ö', 'o', 5),
    ('õ', 'o', 6),
    ('ú', 'u', 1),
    ('ù', 'u', 2),
    ('û', 'u', 3),
    ('ü', 'u', 5),
    ('ý', 'y', 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Group {
    Space,
    Punctuation,
    Symbol,
    Digit,
    Persian,
    Latin,
    Other,
}

#[derive(Debug, Clone, Copy)]
struct Weight {
    primary: Option<(Group, u32)>,
    secondary: u8,
    tertiary: u8,
}

/// Orders two names the way a Persian reader expects. Returns `Equal` for
/// names that differ only in ignorable characters or digit script.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let left = weights(a);
    let right = weights(b);

    let primary = left
        .iter()
        .filter_map(|w| w.primary)
        .cmp(right.iter().filter_map(|w| w.primary));
    primary
        .then_with(|| {
            left.iter()
                .map(|w| w.secondary)
                .cmp(right.iter().map(|w| w.secondary))
        })
        .then_with(|| {
            left.iter()
                .map(|w| w.tertiary)
                .cmp(right.iter().map(|w| w.tertiary))
        })
}

fn weights(value: &str) -> Vec<Weight> {
    value.chars().filter_map(weight).collect()
}

fn weight(ch: char) -> Option<Weight> {
    if is_ignorable(ch) {
        return None;
    }
    if let Some(rank) = MARKS.iter().position(|&mark| mark == ch) {
        return Some(Weight {
            primary: None,
            secondary: 10 + rank as u8,
            tertiary: 0,
        });
    }
    if ch.is_whitespace() {
        return Some(plain(Group::Space, ch as u32));
    }
    if let Some(digit) = digit_value(ch) {
        return Some(plain(Group::Digit, digit));
    }
    if let Some((position, variant)) = persian_letter(ch) {
        return Some(Weight {
            primary: Some((Group::Persian, position)),
            secondary: variant,
            tertiary: 0,
        });
    }
    if let Some((base, accent, upper)) = latin_letter(ch) {
        return Some(Weight {
            primary: Some((Group::Latin, base as u32)),
            secondary: accent,
            tertiary: u8::from(upper),
        });
    }
    if ch.is_alphabetic() {
        let lower = ch.to_lowercase().next().unwrap_or(ch);
        return Some(Weight {
            primary: Some((Group::Other, lower as u32)),
            secondary: 0,
            tertiary: u8::from(ch.is_uppercase()),
        });
    }
    if let Some(position) = PUNCTUATION.chars().position(|mark| mark == ch) {
        return Some(plain(Group::Punctuation, position as u32));
    }
    Some(plain(Group::Symbol, ch as u32))
}

fn plain(group: Group, value: u32) -> Weight {
    Weight {
        primary: Some((group, value)),
        secondary: 0,
        tertiary: 0,
    }
}

/// Joiners, direction marks and tatweel do not affect order.
fn is_ignorable(ch: char) -> bool {
    matches!(ch, '\u{200B}'..='\u{200F}' | '\u{0640}' | '\u{FEFF}')
}

fn digit_value(ch: char) -> Option<u32> {
    match ch {
        '0'..='9' => Some(ch as u32 - '0' as u32),
        '\u{06F0}'..='\u{06F9}' => Some(ch as u32 - 0x06F0),
        '\u{0660}'..='\u{0669}' => Some(ch as u32 - 0x0660),
        _ => None,
    }
}

/// Alphabet position plus variant rank of a Persian or Arabic letter.
fn persian_letter(ch: char) -> Option<(u32, u8)> {
    let (base, variant) = match ch {
        'ٱ' => ('ا', 1),
        'أ' => ('ء', 1),
        'إ' => ('ء', 2),
        'ؤ' => ('ء', 3),
        'ئ' => ('ء', 4),
        'ك' => ('ک', 1),
        'ة' => ('ه', 1),
        'ۀ' => ('ه', 2),
        'ى' => ('ی', 1),
        'ي' => ('ی', 2),
        other => (other, 0),
    };
    PERSIAN_ALPHABET
        .chars()
        .position(|letter| letter == base)
        .map(|position| (position as u32, variant))
}

/// Base letter, accent rank and case of a Latin letter.
fn latin_letter(ch: char) -> Option<(char, u8, bool)> {
    if ch.is_ascii_alphabetic() {
        return Some((ch.to_ascii_lowercase(), 0, ch.is_ascii_uppercase()));
    }
    let lower = ch.to_lowercase().next().unwrap_or(ch);
    LATIN_ACCENTS
        .iter()
        .find(|(accented, _, _)| *accented == lower)
        .map(|&(_, base, accent)| (base, accent, lower != ch))
}
