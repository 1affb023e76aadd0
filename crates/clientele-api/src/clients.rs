// Client endpoints
//
// CRUD on configured clients plus the discovery suggestions list.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{ClientEntry, ClientList, ClientUpdate, NewClient, SuggestionEntry, SuggestionList};

impl ApiClient {
    /// List every configured client.
    ///
    /// `GET /api/clients`
    pub async fn list_clients(&self) -> Result<Vec<ClientEntry>, Error> {
        let url = self.endpoint(&["clients"])?;
        let list: ClientList = self.get(url).await?;
        debug!(count = list.clients.len(), "fetched clients");
        Ok(list.clients)
    }

    /// Devices seen on the network that are not yet configured.
    ///
    /// `GET /api/clients/_suggestions`
    pub async fn client_suggestions(&self) -> Result<Vec<SuggestionEntry>, Error> {
        let url = self.endpoint(&["clients", "_suggestions"])?;
        let list: SuggestionList = self.get(url).await?;
        Ok(list.clients)
    }

    /// Create a client.
    ///
    /// `POST /api/clients`
    pub async fn add_client(&self, new: &NewClient) -> Result<(), Error> {
        let url = self.endpoint(&["clients"])?;
        self.post_form(url, &new.to_form()).await
    }

    /// Replace groups, comment and enabled flag of an existing client.
    ///
    /// `client` is the raw stored value; it is encoded as one path segment.
    ///
    /// `PUT /api/clients/{client}`
    pub async fn update_client(&self, client: &str, update: &ClientUpdate) -> Result<(), Error> {
        let url = self.endpoint(&["clients", client])?;
        self.put_form(url, &update.to_form()).await
    }

    /// Remove a client.
    ///
    /// `DELETE /api/clients/{client}`
    pub async fn delete_client(&self, client: &str) -> Result<(), Error> {
        let url = self.endpoint(&["clients", client])?;
        self.delete(url).await
    }
}
