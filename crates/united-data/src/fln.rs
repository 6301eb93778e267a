//! FlarmNet `.fln` files.
//!
//! Both flavours start with the database version as six hex digits on its own line, followed by
//! one line per record. A record is 86 bytes of fixed-width, space-padded Latin-1 fields:
//!
//! | field        | width |
//! |--------------|-------|
//! | FLARM ID     | 6     |
//! | pilot name   | 21    |
//! | airfield     | 21    |
//! | plane type   | 21    |
//! | registration | 7     |
//! | call sign    | 3     |
//! | frequency    | 7     |
//!
//! XCSoar reads each record hex encoded. LX devices read the record bytes as plain ASCII.

use std::borrow::Cow;

use crate::record::{File, Record};

const FIELD_OFFSETS: [usize; 8] = [0, 6, 27, 48, 69, 76, 79, 86];
const RECORD_LEN: usize = 86;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("file has no version line")]
    MissingVersion,

    #[error("invalid version line {0:?}")]
    InvalidVersion(String),

    #[error("record has {0} characters, expected {expected}", expected = RECORD_LEN * 2)]
    InvalidLength(usize),

    #[error("record is not hex encoded")]
    InvalidHex,
}

/// A decoded XCSoar file. Broken records are kept as errors so callers can skip them.
#[derive(Debug)]
pub struct DecodedFile {
    pub version: u32,
    pub records: Vec<Result<Record, DecodeError>>,
}

impl DecodedFile {
    /// Drop undecodable records.
    pub fn into_file(self) -> File {
        let total = self.records.len();
        let records: Vec<Record> = self.records.into_iter().filter_map(Result::ok).collect();

        if records.len() < total {
            tracing::warn!("Skipped {} undecodable records", total - records.len());
        }

        File {
            version: self.version,
            records,
        }
    }
}

/// Decode an XCSoar FlarmNet file.
pub fn decode_xcsoar(content: &str) -> Result<DecodedFile, DecodeError> {
    let mut lines = content.lines().map(str::trim).filter(|line| !line.is_empty());

    let version_line = lines.next().ok_or(DecodeError::MissingVersion)?;
    let version = u32::from_str_radix(version_line, 16)
        .map_err(|_| DecodeError::InvalidVersion(version_line.to_string()))?;

    let records = lines.map(decode_xcsoar_record).collect();

    Ok(DecodedFile { version, records })
}

/// Decode a single hex encoded record line.
pub fn decode_xcsoar_record(line: &str) -> Result<Record, DecodeError> {
    if !line.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidHex);
    }
    if line.len() != RECORD_LEN * 2 {
        return Err(DecodeError::InvalidLength(line.len()));
    }

    let bytes = (0..RECORD_LEN)
        .map(|i| u8::from_str_radix(&line[i * 2..i * 2 + 2], 16))
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| DecodeError::InvalidHex)?;

    let field = |index: usize| {
        let raw = &bytes[FIELD_OFFSETS[index]..FIELD_OFFSETS[index + 1]];
        encoding_rs::mem::decode_latin1(raw).trim().to_string()
    };

    Ok(Record {
        flarm_id: field(0),
        pilot_name: field(1),
        airfield: field(2),
        plane_type: field(3),
        registration: field(4),
        call_sign: field(5),
        frequency: field(6),
    })
}

/// Encode `file` in the XCSoar flavour.
pub fn encode_xcsoar(file: &File) -> String {
    let mut out = version_line(file.version);
    for record in &file.records {
        for byte in record_bytes(record) {
            out.push_str(&format!("{:02x}", byte));
        }
        out.push('\n');
    }
    out
}

/// Encode `file` in the LX flavour. Non-ASCII bytes become `?`.
pub fn encode_lx(file: &File) -> String {
    let mut out = version_line(file.version);
    for record in &file.records {
        out.extend(
            record_bytes(record)
                .into_iter()
                .map(|b| if b.is_ascii() { char::from(b) } else { '?' }),
        );
        out.push('\n');
    }
    out
}

fn version_line(version: u32) -> String {
    format!("{:06x}\n", version)
}

fn record_bytes(record: &Record) -> Vec<u8> {
    let fields = [
        &record.flarm_id,
        &record.pilot_name,
        &record.airfield,
        &record.plane_type,
        &record.registration,
        &record.call_sign,
        &record.frequency,
    ];

    let mut bytes = Vec::with_capacity(RECORD_LEN);
    for (index, value) in fields.into_iter().enumerate() {
        let width = FIELD_OFFSETS[index + 1] - FIELD_OFFSETS[index];
        let encoded = to_latin1(value);
        bytes.extend(
            encoded
                .iter()
                .copied()
                .chain(std::iter::repeat(b' '))
                .take(width),
        );
    }
    bytes
}

/// Latin-1 bytes of `value`, with `?` for characters outside Latin-1.
fn to_latin1(value: &str) -> Cow<'_, [u8]> {
    if value.is_ascii() {
        return Cow::Borrowed(value.as_bytes());
    }
    Cow::Owned(
        value
            .chars()
            .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> Record {
        Record {
            flarm_id: "3EE3C7".to_string(),
            pilot_name: "Jörg Müller".to_string(),
            airfield: "Aachen Merzbrueck".to_string(),
            plane_type: "LS-8".to_string(),
            registration: "D-1234".to_string(),
            call_sign: "JM".to_string(),
            frequency: "123.500".to_string(),
        }
    }

    #[test]
    fn encodes_version_as_six_hex_digits() {
        let file = File {
            version: 0x1f2,
            records: vec![],
        };

        assert_eq!(encode_xcsoar(&file), "0001f2\n");
        assert_eq!(encode_lx(&file), "0001f2\n");
    }

    #[test]
    fn xcsoar_record_is_hex_of_padded_fields() {
        let file = File {
            version: 1,
            records: vec![Record {
                flarm_id: "DD1234".to_string(),
                call_sign: "AB".to_string(),
                ..Default::default()
            }],
        };

        let encoded = encode_xcsoar(&file);
        let line = encoded.lines().nth(1).unwrap();

        assert_eq!(line.len(), 172);
        assert!(line.starts_with("444431323334"));
        // call sign starts at byte 76
        assert_eq!(&line[152..158], "414220");
    }

    #[test]
    fn xcsoar_keeps_latin1_characters() {
        let file = File {
            version: 1,
            records: vec![record()],
        };

        let decoded = decode_xcsoar(&encode_xcsoar(&file)).unwrap().into_file();

        assert_eq!(decoded, file);
    }

    #[test]
    fn truncates_long_fields() {
        let file = File {
            version: 1,
            records: vec![Record {
                flarm_id: "ABCDEF".to_string(),
                registration: "D-KXYZ-LONG".to_string(),
                ..Default::default()
            }],
        };

        let decoded = decode_xcsoar(&encode_xcsoar(&file)).unwrap().into_file();

        assert_eq!(decoded.records[0].registration, "D-KXYZ-");
    }

    #[test]
    fn lx_lines_are_plain_fixed_width() {
        let file = File {
            version: 3,
            records: vec![Record {
                flarm_id: "DD1234".to_string(),
                pilot_name: "Müller".to_string(),
                call_sign: "JM".to_string(),
                ..Default::default()
            }],
        };

        let encoded = encode_lx(&file);
        let line = encoded.lines().nth(1).unwrap();

        assert_eq!(line.len(), 86);
        assert!(line.starts_with("DD1234M?ller"));
        assert_eq!(&line[76..79], "JM ");
    }

    #[test]
    fn skips_broken_records() {
        let good = encode_xcsoar(&File {
            version: 2,
            records: vec![record()],
        });
        let content = format!("{good}zz\n\n{}\n", "4".repeat(10));

        let decoded = decode_xcsoar(&content).unwrap();

        assert_eq!(decoded.version, 2);
        assert_eq!(decoded.records.len(), 3);
        assert_eq!(decoded.records[1], Err(DecodeError::InvalidHex));
        assert_eq!(decoded.records[2], Err(DecodeError::InvalidLength(10)));
        assert_eq!(decoded.into_file().records, vec![record()]);
    }

    #[test]
    fn rejects_missing_or_bad_version() {
        assert_eq!(decode_xcsoar("\n\n").unwrap_err(), DecodeError::MissingVersion);
        assert_eq!(
            decode_xcsoar("version\n").unwrap_err(),
            DecodeError::InvalidVersion("version".to_string())
        );
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let content = encode_xcsoar(&File {
            version: 1,
            records: vec![record()],
        })
        .replace('\n', "\r\n");

        let decoded = decode_xcsoar(&content).unwrap().into_file();

        assert_eq!(decoded.records, vec![record()]);
    }
}
