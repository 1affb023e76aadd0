// Group endpoints

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{GroupEntry, GroupList};

impl ApiClient {
    /// List every group, including disabled ones.
    ///
    /// `GET /api/groups`
    pub async fn list_groups(&self) -> Result<Vec<GroupEntry>, Error> {
        let url = self.endpoint(&["groups"])?;
        let list: GroupList = self.get(url).await?;
        Ok(list.groups)
    }
}
