//! Upstream device databases.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::cache::Cache;
use crate::error::DataError;

pub mod flarmnet;
pub mod ogn;
pub mod weglide;

pub use ogn::OgnDevice;
pub use weglide::User;

/// Where each source is downloaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrls {
    pub flarmnet: String,
    pub ogn_ddb: String,
    pub weglide_users: String,
}

impl Default for SourceUrls {
    fn default() -> Self {
        Self {
            flarmnet: "https://www.flarmnet.org/static/files/wfn/data.fln".to_string(),
            ogn_ddb: "http://ddb.glidernet.org/download/?j=1&t=1".to_string(),
            weglide_users: "https://api.weglide.org/v1/user".to_string(),
        }
    }
}

impl SourceUrls {
    /// Point every source at `base`, keeping the upstream paths.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            flarmnet: format!("{base}/static/files/wfn/data.fln"),
            ogn_ddb: format!("{base}/download/?j=1&t=1"),
            weglide_users: format!("{base}/v1/user"),
        }
    }
}

/// HTTP client for the upstream sources, backed by a download cache.
pub struct Client {
    http: reqwest::Client,
    urls: SourceUrls,
    cache_dir: PathBuf,
    max_age: Duration,
}

impl Client {
    pub fn new(urls: SourceUrls, cache_dir: &Path, max_age: Duration) -> Result<Self, DataError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("united-data/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| DataError::Http {
                url: String::new(),
                source,
            })?;

        Ok(Self {
            http,
            urls,
            cache_dir: cache_dir.to_path_buf(),
            max_age,
        })
    }

    fn cache(&self, name: &str) -> Cache {
        Cache::new(&self.cache_dir, name, self.max_age)
    }

    async fn get(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, DataError> {
        let http_error = |source| DataError::Http {
            url: url.to_string(),
            source,
        };

        request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(http_error)
    }

    async fn get_text(&self, url: &str) -> Result<String, DataError> {
        let response = self.get(self.http.get(url), url).await?;
        response.text().await.map_err(|source| DataError::Http {
            url: url.to_string(),
            source,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        what: &'static str,
    ) -> Result<T, DataError> {
        let text = {
            let response = self.get(self.http.get(url).query(query), url).await?;
            response.text().await.map_err(|source| DataError::Http {
                url: url.to_string(),
                source,
            })?
        };
        serde_json::from_str(&text).map_err(|source| DataError::Json { what, source })
    }
}
