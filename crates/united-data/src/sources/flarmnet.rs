//! FlarmNet download.

use crate::error::DataError;
use crate::fln;
use crate::record::File;

use super::Client;

impl Client {
    /// The FlarmNet database, refreshed when the cached copy is stale.
    #[tracing::instrument(skip(self))]
    pub async fn flarmnet(&self) -> Result<File, DataError> {
        let cache = self.cache("flarmnet.fln");
        if cache.needs_update().await {
            tracing::info!("Downloading FlarmNet file...");
            let content = self.get_text(&self.urls.flarmnet).await?;
            cache.save(&content).await?;
        }

        tracing::info!("Reading FlarmNet file...");
        let content = cache.read().await?;
        Ok(fln::decode_xcsoar(&content)?.into_file())
    }
}
