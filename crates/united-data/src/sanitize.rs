//! Field cleanup for devices with limited character sets.

use crate::record::Record;

/// German umlauts get their conventional two-letter spelling instead of the plain vowel.
const GERMAN: [(char, &str); 7] = [
    ('ä', "ae"),
    ('ö', "oe"),
    ('ü', "ue"),
    ('Ä', "Ae"),
    ('Ö', "Oe"),
    ('Ü', "Ue"),
    ('ß', "ss"),
];

/// Transliterate `value` to ASCII.
pub fn sanitize(value: &str) -> String {
    let mut expanded = String::with_capacity(value.len());
    for c in value.chars() {
        match GERMAN.iter().find(|(umlaut, _)| *umlaut == c) {
            Some((_, spelled)) => expanded.push_str(spelled),
            None => expanded.push(c),
        }
    }
    deunicode::deunicode(&expanded)
}

/// LX devices only handle ASCII.
pub fn for_lx(value: &str) -> String {
    sanitize(value)
}

/// XCSoar reads Latin-1, so only values outside it are transliterated.
pub fn for_xcsoar(value: &str) -> String {
    if encoding_rs::mem::is_str_latin1(value) {
        value.to_string()
    } else {
        sanitize(value)
    }
}

pub fn record_for_lx(record: &Record) -> Record {
    record.map_fields(for_lx)
}

pub fn record_for_xcsoar(record: &Record) -> Record {
    record.map_fields(for_xcsoar)
}
