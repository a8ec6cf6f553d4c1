//! # Locale
//!
//! Turkish case mapping and collation.
//!
//! Turkish has a dotted (`i`/`İ`) and a dotless (`ı`/`I`) letter i. Case mapping
//! between them is not the ASCII one: `"I".to_lowercase()` is `"i"` in Rust, but
//! `"ı"` under Turkish rules. Listing data is mostly Turkish, so search and sorting
//! both go through these rules.

use std::cmp::Ordering;

/// Locale identifier used for collation by document stores.
pub const TURKISH_LOCALE: &str = "tr";

/// Turkish alphabet in collation order, including the letters only found in
/// loanwords (`q`, `w`, `x`).
const ALPHABET: [char; 32] = [
    'a', 'b', 'c', 'ç', 'd', 'e', 'f', 'g', 'ğ', 'h', 'ı', 'i', 'j', 'k', 'l', 'm', 'n', 'o',
    'ö', 'p', 'q', 'r', 's', 'ş', 't', 'u', 'ü', 'v', 'w', 'x', 'y', 'z',
];

/// Upper-cases a string using Turkish rules.
///
/// ```
/// use realty_common::locale::to_upper;
///
/// assert_eq!(to_upper("izmir"), "İZMİR");
/// assert_eq!(to_upper("ılık"), "ILIK");
/// ```
pub fn to_upper(s: &str) -> String {
    let mut upper = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'i' => upper.push('İ'),
            'ı' => upper.push('I'),
            _ => upper.extend(c.to_uppercase()),
        }
    }
    upper
}

/// Lower-cases a string using Turkish rules.
///
/// ```
/// use realty_common::locale::to_lower;
///
/// assert_eq!(to_lower("İZMİR"), "izmir");
/// assert_eq!(to_lower("ISPARTA"), "ısparta");
/// ```
pub fn to_lower(s: &str) -> String {
    let mut lower = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'İ' => lower.push('i'),
            'I' => lower.push('ı'),
            _ => lower.extend(c.to_lowercase()),
        }
    }
    lower
}

/// Upper-cases the first character and lower-cases the rest, using Turkish rules.
///
/// ```
/// use realty_common::locale::to_title;
///
/// assert_eq!(to_title("iSTANBUL"), "İstanbul");
/// assert_eq!(to_title(""), "");
/// ```
pub fn to_title(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => {
            let mut title = to_upper(first.encode_utf8(&mut [0u8; 4]));
            title.push_str(&to_lower(chars.as_str()));
            title
        }
        None => String::new(),
    }
}

/// Checks whether `s` contains a letter whose case mapping differs between
/// Turkish and the default rules (`i` or `İ`).
pub fn has_dotted_i(s: &str) -> bool {
    s.contains('i') || s.contains('İ')
}

/// Compares two strings with Turkish collation rules and case level enabled.
///
/// Letters are ordered by the Turkish alphabet first. Accent differences
/// (`â`, `î`, `û`) break ties next, and letter case breaks ties last,
/// lower case before upper case.
///
/// ```
/// use std::cmp::Ordering;
/// use realty_common::locale::collate;
///
/// assert_eq!(collate("çam", "dere"), Ordering::Less);
/// assert_eq!(collate("ılgaz", "irmak"), Ordering::Less);
/// assert_eq!(collate("Zeytin", "çınar"), Ordering::Greater);
/// ```
pub fn collate(lhs: &str, rhs: &str) -> Ordering {
    let primary = |s: &str| s.chars().map(|c| weight(c).primary).collect::<Vec<_>>();
    let secondary = |s: &str| s.chars().map(|c| weight(c).secondary).collect::<Vec<_>>();
    let case = |s: &str| s.chars().map(|c| weight(c).upper).collect::<Vec<_>>();

    primary(lhs)
        .cmp(&primary(rhs))
        .then_with(|| secondary(lhs).cmp(&secondary(rhs)))
        .then_with(|| case(lhs).cmp(&case(rhs)))
        .then_with(|| lhs.cmp(rhs))
}

#[derive(Debug, Clone, Copy)]
struct Weight {
    primary: (u8, u32),
    secondary: u8,
    upper: bool,
}

fn weight(c: char) -> Weight {
    let lower = to_lower(c.encode_utf8(&mut [0u8; 4]));
    let mut lower_chars = lower.chars();
    let base = lower_chars.next().unwrap_or(c);
    let upper = lower_chars.next().is_none() && base != c;

    let (base, secondary) = match base {
        'â' => ('a', 1),
        'î' => ('i', 1),
        'û' => ('u', 1),
        _ => (base, 0),
    };

    let primary = if let Some(index) = ALPHABET.iter().position(|letter| *letter == base) {
        (2, index as u32)
    } else if base.is_ascii_digit() {
        (1, base as u32)
    } else if base.is_alphabetic() {
        (3, base as u32)
    } else {
        (0, base as u32)
    };

    Weight {
        primary,
        secondary,
        upper,
    }
}
