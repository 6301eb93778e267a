//! WeGlide user download.
//!
//! The user endpoint has no listing, so ids are requested in pages of [`PAGE_SIZE`] until a page
//! comes back empty. Only users with a registered FLARM device are cached.

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::record::Record;

use super::Client;

pub const PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub home_airport: Option<Airport>,
    pub device: Option<Device>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Device {
    pub id: String,
    pub name: Option<String>,
    pub competition_id: Option<String>,
    pub aircraft: Option<Aircraft>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Aircraft {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Airport {
    pub id: u32,
    pub name: String,
}

impl User {
    /// The user's device as a record, if they registered one.
    pub fn into_record(self) -> Option<Record> {
        let User {
            name,
            home_airport,
            device,
            ..
        } = self;

        device.map(|device| Record {
            flarm_id: device.id,
            pilot_name: name,
            airfield: home_airport.map(|it| it.name).unwrap_or_default(),
            plane_type: device.aircraft.map(|it| it.name).unwrap_or_default(),
            registration: device.name.unwrap_or_default(),
            call_sign: device.competition_id.unwrap_or_default(),
            frequency: String::new(),
        })
    }
}

impl Client {
    /// WeGlide users with a FLARM device, refreshed when the cached copy is stale.
    #[tracing::instrument(skip(self))]
    pub async fn weglide_users(&self) -> Result<Vec<User>, DataError> {
        let cache = self.cache("weglide-users.json");
        if cache.needs_update().await {
            let all_users = self.download_all_users().await?;
            let users: Vec<&User> = all_users.iter().filter(|it| it.device.is_some()).collect();
            tracing::debug!(all = all_users.len(), with_device = users.len());

            let content = serde_json::to_string_pretty(&users).map_err(|source| {
                DataError::Json {
                    what: "WeGlide users",
                    source,
                }
            })?;
            cache.save(&content).await?;
        }

        tracing::info!("Reading WeGlide user data...");
        serde_json::from_str(&cache.read().await?).map_err(|source| DataError::Json {
            what: "WeGlide users",
            source,
        })
    }

    async fn download_all_users(&self) -> Result<Vec<User>, DataError> {
        tracing::info!("Downloading WeGlide user data...");

        let mut all = Vec::new();
        let mut start = 1u32;
        loop {
            let page = self.download_users(start..start + PAGE_SIZE).await?;
            tracing::debug!(start, page_len = page.len());

            if page.is_empty() {
                return Ok(all);
            }

            all.extend(page);
            start += PAGE_SIZE;
        }
    }

    async fn download_users(&self, ids: std::ops::Range<u32>) -> Result<Vec<User>, DataError> {
        let ids = ids.map(|id| id.to_string()).collect::<Vec<_>>().join(",");
        let limit = PAGE_SIZE.to_string();

        self.get_json(
            &self.urls.weglide_users,
            &[("id_in", ids.as_str()), ("limit", limit.as_str())],
            "WeGlide users",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn user_with_device_becomes_record() {
        let user: User = serde_json::from_str(
            r#"{
                "id": 42,
                "name": "Jane Pilot",
                "home_airport": {"id": 1, "name": "Aachen Merzbrueck"},
                "device": {
                    "id": "DD1234",
                    "name": "D-1234",
                    "competition_id": "JP",
                    "aircraft": {"id": 7, "name": "LS 8"}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(
            user.into_record(),
            Some(Record {
                flarm_id: "DD1234".to_string(),
                pilot_name: "Jane Pilot".to_string(),
                airfield: "Aachen Merzbrueck".to_string(),
                plane_type: "LS 8".to_string(),
                registration: "D-1234".to_string(),
                call_sign: "JP".to_string(),
                frequency: String::new(),
            })
        );
    }

    #[test]
    fn user_without_device_has_no_record() {
        let user: User =
            serde_json::from_str(r#"{"id": 1, "name": "x", "home_airport": null, "device": null}"#)
                .unwrap();

        assert_eq!(user.into_record(), None);
    }
}
