//! Device records and their JSON form.

use serde::Serialize;

/// One device entry in the FlarmNet layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub flarm_id: String,
    pub pilot_name: String,
    pub airfield: String,
    pub plane_type: String,
    pub registration: String,
    pub call_sign: String,
    pub frequency: String,
}

impl Record {
    /// Apply `f` to every field.
    pub fn map_fields(&self, f: impl Fn(&str) -> String) -> Record {
        Record {
            flarm_id: f(&self.flarm_id),
            pilot_name: f(&self.pilot_name),
            airfield: f(&self.airfield),
            plane_type: f(&self.plane_type),
            registration: f(&self.registration),
            call_sign: f(&self.call_sign),
            frequency: f(&self.frequency),
        }
    }
}

/// A versioned set of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    pub version: u32,
    pub records: Vec<Record>,
}

/// JSON view of a [`Record`]. Empty fields are left out.
#[derive(Debug, Serialize)]
pub struct SerializableRecord<'a> {
    flarm_id: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pilot_name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    airfield: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    plane_type: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    registration: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    call_sign: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    frequency: &'a str,
}

impl<'a> From<&'a Record> for SerializableRecord<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            flarm_id: &record.flarm_id,
            pilot_name: &record.pilot_name,
            airfield: &record.airfield,
            plane_type: &record.plane_type,
            registration: &record.registration,
            call_sign: &record.call_sign,
            frequency: &record.frequency,
        }
    }
}

#[derive(Debug, Serialize)]
struct SerializableFile<'a> {
    version: u32,
    records: Vec<SerializableRecord<'a>>,
}

/// Serialize `file` as pretty-printed JSON.
pub fn to_json(file: &File) -> serde_json::Result<String> {
    let file = SerializableFile {
        version: file.version,
        records: file.records.iter().map(SerializableRecord::from).collect(),
    };
    serde_json::to_string_pretty(&file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record() -> Record {
        Record {
            flarm_id: "ABCDEF".to_string(),
            pilot_name: "John Dö".to_string(),
            airfield: "EDKA".to_string(),
            plane_type: "ASW 28".to_string(),
            registration: "D-1234".to_string(),
            call_sign: "XY".to_string(),
            frequency: "123.456".to_string(),
        }
    }

    #[test]
    fn serializes_all_fields() {
        let value = serde_json::to_value(SerializableRecord::from(&record())).unwrap();

        assert_eq!(
            value,
            json!({
                "flarm_id": "ABCDEF",
                "pilot_name": "John Dö",
                "airfield": "EDKA",
                "plane_type": "ASW 28",
                "registration": "D-1234",
                "call_sign": "XY",
                "frequency": "123.456",
            })
        );
    }

    #[test]
    fn skips_empty_fields() {
        let record = Record {
            pilot_name: String::new(),
            airfield: String::new(),
            call_sign: String::new(),
            frequency: String::new(),
            ..record()
        };

        let value = serde_json::to_value(SerializableRecord::from(&record)).unwrap();

        assert_eq!(
            value,
            json!({
                "flarm_id": "ABCDEF",
                "plane_type": "ASW 28",
                "registration": "D-1234",
            })
        );
    }

    #[test]
    fn file_json_carries_version() {
        let file = File {
            version: 7,
            records: vec![record()],
        };

        let value: serde_json::Value = serde_json::from_str(&to_json(&file).unwrap()).unwrap();

        assert_eq!(value["version"], 7);
        assert_eq!(value["records"][0]["flarm_id"], "ABCDEF");
    }

    #[test]
    fn maps_every_field() {
        let upper = record().map_fields(|s| s.to_uppercase());

        assert_eq!(upper.pilot_name, "JOHN DÖ");
        assert_eq!(upper.frequency, "123.456");
        assert_eq!(upper.flarm_id, "ABCDEF");
    }
}
