//! Combines the upstream databases into one record per device.
//!
//! The OGN database is the base. FlarmNet and then WeGlide add to a device only when they agree
//! on its call sign, and contribute devices the earlier sources do not know about.

use std::collections::HashMap;

use crate::record::Record;
use crate::sources::{OgnDevice, User};

/// Merge the three sources, sorted by FLARM ID.
pub fn merge(ogn: Vec<OgnDevice>, flarmnet: Vec<Record>, weglide: Vec<User>) -> Vec<Record> {
    let mut merged: HashMap<String, Record> = ogn
        .into_iter()
        .map(Record::from)
        .map(|record| (key(&record), record))
        .collect();

    for record in flarmnet {
        match merged.get_mut(&key(&record)) {
            Some(existing) => apply_flarmnet(existing, record),
            None => {
                merged.insert(key(&record), record);
            }
        }
    }

    for record in weglide.into_iter().filter_map(User::into_record) {
        match merged.get_mut(&key(&record)) {
            Some(existing) => apply_weglide(existing, record),
            None => {
                merged.insert(key(&record), record);
            }
        }
    }

    let mut records: Vec<Record> = merged.into_values().collect();
    records.sort_unstable_by(|a, b| a.flarm_id.cmp(&b.flarm_id));

    for record in &mut records {
        if record.airfield == record.registration {
            record.airfield.clear();
        }
    }

    tracing::debug!(merged = records.len());
    records
}

fn key(record: &Record) -> String {
    record.flarm_id.to_lowercase()
}

fn apply_flarmnet(existing: &mut Record, record: Record) {
    if existing.call_sign != record.call_sign {
        return;
    }

    existing.pilot_name = record.pilot_name;
    existing.airfield = record.airfield;
    existing.frequency = record.frequency;

    if existing.registration.is_empty() {
        existing.registration = record.registration;
    }
    if existing.plane_type.is_empty() {
        existing.plane_type = record.plane_type;
    }
}

fn apply_weglide(existing: &mut Record, record: Record) {
    if existing.call_sign != record.call_sign {
        return;
    }

    existing.pilot_name = record.pilot_name;

    if existing.registration.is_empty() {
        existing.registration = record.registration;
    }
    // FlarmNet users often put the registration into the airfield field
    if existing.airfield.is_empty() || existing.airfield == existing.registration {
        existing.airfield = record.airfield;
    }
    if existing.plane_type.is_empty() {
        existing.plane_type = record.plane_type;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::weglide::{Aircraft, Airport, Device};
    use pretty_assertions::assert_eq;

    fn ogn(id: &str, model: &str, registration: &str, cn: &str) -> OgnDevice {
        OgnDevice {
            device_id: id.to_string(),
            aircraft_model: model.to_string(),
            registration: registration.to_string(),
            cn: cn.to_string(),
        }
    }

    fn flarmnet(id: &str, pilot: &str, airfield: &str, call_sign: &str) -> Record {
        Record {
            flarm_id: id.to_string(),
            pilot_name: pilot.to_string(),
            airfield: airfield.to_string(),
            plane_type: "ASW 20".to_string(),
            registration: "D-FNET".to_string(),
            call_sign: call_sign.to_string(),
            frequency: "123.450".to_string(),
        }
    }

    fn weglide(id: &str, name: &str, competition_id: &str) -> User {
        User {
            id: 1,
            name: name.to_string(),
            home_airport: Some(Airport {
                id: 1,
                name: "Dahlemer Binz".to_string(),
            }),
            device: Some(Device {
                id: id.to_string(),
                name: Some("D-WGLD".to_string()),
                competition_id: Some(competition_id.to_string()),
                aircraft: Some(Aircraft {
                    id: 1,
                    name: "Discus 2".to_string(),
                }),
            }),
        }
    }

    #[test]
    fn flarmnet_fills_matching_ogn_device() {
        let merged = merge(
            vec![ogn("DD1234", "", "D-1234", "AB")],
            vec![flarmnet("dd1234", "Jane", "EDKA", "AB")],
            vec![],
        );

        assert_eq!(
            merged,
            vec![Record {
                flarm_id: "DD1234".to_string(),
                pilot_name: "Jane".to_string(),
                airfield: "EDKA".to_string(),
                plane_type: "ASW 20".to_string(),
                registration: "D-1234".to_string(),
                call_sign: "AB".to_string(),
                frequency: "123.450".to_string(),
            }]
        );
    }

    #[test]
    fn conflicting_call_sign_keeps_ogn_data() {
        let merged = merge(
            vec![ogn("DD1234", "LS 4", "D-1234", "AB")],
            vec![flarmnet("DD1234", "Jane", "EDKA", "XY")],
            vec![weglide("DD1234", "Joe", "ZZ")],
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].pilot_name, "");
        assert_eq!(merged[0].plane_type, "LS 4");
    }

    #[test]
    fn weglide_adds_pilot_and_replaces_registration_airfield() {
        let merged = merge(
            vec![ogn("DD1234", "", "", "AB")],
            vec![flarmnet("DD1234", "Jane", "D-FNET", "AB")],
            vec![weglide("DD1234", "Jane Doe", "AB")],
        );

        let record = &merged[0];
        assert_eq!(record.pilot_name, "Jane Doe");
        assert_eq!(record.registration, "D-FNET");
        assert_eq!(record.airfield, "Dahlemer Binz");
        assert_eq!(record.plane_type, "ASW 20");
    }

    #[test]
    fn unknown_devices_are_added_and_sorted() {
        let merged = merge(
            vec![ogn("DDC000", "", "", "")],
            vec![flarmnet("DDB000", "Jane", "EDKA", "")],
            vec![weglide("DDA000", "Joe", "J")],
        );

        let ids: Vec<&str> = merged.iter().map(|r| r.flarm_id.as_str()).collect();
        assert_eq!(ids, vec!["DDA000", "DDB000", "DDC000"]);
    }

    #[test]
    fn clears_airfield_equal_to_registration() {
        let merged = merge(
            vec![],
            vec![flarmnet("DD1234", "Jane", "D-FNET", "AB")],
            vec![],
        );

        assert_eq!(merged[0].airfield, "");
        assert_eq!(merged[0].registration, "D-FNET");
    }

    #[test]
    fn users_without_device_are_ignored() {
        let mut user = weglide("DD1234", "Joe", "J");
        user.device = None;

        assert!(merge(vec![], vec![], vec![user]).is_empty());
    }
}
