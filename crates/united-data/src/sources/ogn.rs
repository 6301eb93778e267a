//! OGN device database download.

use serde::Deserialize;

use crate::error::DataError;
use crate::record::Record;

use super::Client;

#[derive(Debug, Deserialize)]
struct OgnDdb {
    devices: Vec<OgnDevice>,
}

/// ```json
/// {
///     "device_type": "F",
///     "device_id": "000000",
///     "aircraft_model": "HPH 304CZ-17",
///     "registration": "OK-7777",
///     "cn": "KN",
///     "tracked": "Y",
///     "identified": "Y",
///     "aircraft_type": "1"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct OgnDevice {
    pub device_id: String,
    pub aircraft_model: String,
    pub registration: String,
    pub cn: String,
}

impl From<OgnDevice> for Record {
    fn from(device: OgnDevice) -> Self {
        Record {
            flarm_id: device.device_id,
            plane_type: device.aircraft_model,
            registration: device.registration,
            call_sign: device.cn,
            ..Default::default()
        }
    }
}

pub(crate) fn parse_ddb(content: &str) -> Result<Vec<OgnDevice>, DataError> {
    let ddb: OgnDdb = serde_json::from_str(content).map_err(|source| DataError::Json {
        what: "OGN device database",
        source,
    })?;
    Ok(ddb.devices)
}

impl Client {
    /// The OGN device database, refreshed when the cached copy is stale.
    #[tracing::instrument(skip(self))]
    pub async fn ogn_devices(&self) -> Result<Vec<OgnDevice>, DataError> {
        let cache = self.cache("ogn-ddb.json");
        if cache.needs_update().await {
            tracing::info!("Downloading OGN DDB...");
            let content = self.get_text(&self.urls.ogn_ddb).await?;
            cache.save(&content).await?;
        }

        tracing::info!("Reading OGN DDB...");
        parse_ddb(&cache.read().await?)
    }
}
