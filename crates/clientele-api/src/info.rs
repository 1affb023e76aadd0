// Runtime info endpoints

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{DatabaseCounts, FtlInfo};

impl ApiClient {
    /// Database row counts reported by the resolver.
    ///
    /// `GET /api/info/ftl`
    pub async fn database_counts(&self) -> Result<DatabaseCounts, Error> {
        let url = self.endpoint(&["info", "ftl"])?;
        let info: FtlInfo = self.get(url).await?;
        Ok(info.ftl.database)
    }
}
