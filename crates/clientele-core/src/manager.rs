// ── Client manager ──
//
// Runs the add, edit and delete flows against the appliance and reloads
// whatever each flow invalidated. Mutations share one lock: a second
// mutation while one is in flight fails fast with `CoreError::Busy`.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use clientele_api::{ApiClient, ClientUpdate, NewClient};

use crate::config::ManagerConfig;
use crate::error::CoreError;
use crate::model::{ClientRecord, Group, IdentityKey};
use crate::notice::Notice;
use crate::suggestion::{SuggestionOption, build_options};
use crate::text::escape_html;
use crate::validate::validate_client_input;

// ── Flow types ───────────────────────────────────────────────────────

/// Groups and clients fetched together; groups first so rows can resolve
/// their membership names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub groups: Vec<Group>,
    pub clients: Vec<ClientRecord>,
}

/// Data refreshed after a successful mutation. Each part is best-effort:
/// `None` means that fetch failed and the caller keeps what it has.
#[derive(Debug, Clone, Default)]
pub struct Reload {
    pub snapshot: Option<Snapshot>,
    /// Sidebar client counter.
    pub client_count: Option<u64>,
}

/// Which field of a row the operator changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditIntent {
    /// New comment, as typed (unescaped).
    Comment(String),
    /// Full group membership after the picker was applied.
    Groups(Vec<i64>),
}

impl EditIntent {
    fn subject(&self) -> &'static str {
        match self {
            Self::Comment(_) => "comment",
            Self::Groups(_) => "groups",
        }
    }

    pub fn success_notice(&self, client: &str) -> Notice {
        Notice::success(format!("Successfully edited {} of client", self.subject()))
            .with_detail(client)
    }

    pub fn failure_notice(&self, client: &str, error: &CoreError) -> Notice {
        Notice::error(
            format!("Error while editing {} of client {client}", self.subject()),
            error.detail(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct AddOutcome {
    /// Value actually submitted (escaped, case-normalized).
    pub client: String,
    pub notice: Notice,
    /// Fresh selector options; the previous choice is gone.
    pub suggestions: Vec<SuggestionOption>,
    pub reload: Reload,
}

#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub notice: Notice,
    pub reload: Reload,
}

/// Progress of a batch delete, reported as it happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteEvent {
    Deleting { client: String },
    /// The row can be removed from the view right away.
    Deleted { key: IdentityKey, client: String },
}

impl DeleteEvent {
    pub fn notice(&self) -> Notice {
        match self {
            Self::Deleting { client } => Notice::info("Deleting client...").with_detail(client),
            Self::Deleted { client, .. } => {
                Notice::success("Successfully deleted client:").with_detail(client)
            }
        }
    }
}

/// The item a batch stopped at, plus the ones never attempted.
#[derive(Debug)]
pub struct DeleteFailure {
    pub client: String,
    pub not_attempted: Vec<String>,
    pub error: CoreError,
}

impl DeleteFailure {
    pub fn notice(&self) -> Notice {
        let clients: Vec<&str> = std::iter::once(self.client.as_str())
            .chain(self.not_attempted.iter().map(String::as_str))
            .collect();
        Notice::error(
            format!("Error while deleting client(s): {}", clients.join(", ")),
            self.error.detail(),
        )
    }
}

#[derive(Debug)]
pub struct DeleteReport {
    /// Clients deleted, in request order.
    pub deleted: Vec<String>,
    pub failure: Option<DeleteFailure>,
    pub reload: Reload,
}

impl DeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

// ── ClientManager ────────────────────────────────────────────────────

/// Facade over the client-management endpoints.
///
/// Cheaply cloneable via `Arc<ManagerInner>`; the TUI hands clones to
/// spawned tasks.
#[derive(Clone)]
pub struct ClientManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    api: ApiClient,
    mutation: Mutex<()>,
}

impl ClientManager {
    pub fn new(config: &ManagerConfig) -> Result<Self, CoreError> {
        let api = ApiClient::new(config.url.as_str(), &config.transport())?;
        Ok(Self::from_api(api))
    }

    pub fn from_api(api: ApiClient) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                api,
                mutation: Mutex::new(()),
            }),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Whether a mutation is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.inner.mutation.try_lock().is_err()
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub async fn groups(&self) -> Result<Vec<Group>, CoreError> {
        let groups = self.inner.api.list_groups().await?;
        Ok(groups.into_iter().map(Group::from).collect())
    }

    pub async fn clients(&self) -> Result<Vec<ClientRecord>, CoreError> {
        let clients = self.inner.api.list_clients().await?;
        Ok(clients.into_iter().map(ClientRecord::from).collect())
    }

    /// Groups, then clients.
    pub async fn load(&self) -> Result<Snapshot, CoreError> {
        let groups = self.groups().await?;
        let clients = self.clients().await?;
        debug!(groups = groups.len(), clients = clients.len(), "loaded snapshot");
        Ok(Snapshot { groups, clients })
    }

    /// Selector options for the add form. A failed fetch degrades to the
    /// blank option only.
    pub async fn suggestions(&self) -> Vec<SuggestionOption> {
        match self.inner.api.client_suggestions().await {
            Ok(entries) => build_options(&entries),
            Err(e) => {
                warn!(error = %e, "client suggestions unavailable");
                build_options(&[])
            }
        }
    }

    pub async fn client_count(&self) -> Result<u64, CoreError> {
        Ok(self.inner.api.database_counts().await?.clients)
    }

    /// Look a client up by its raw identifier.
    pub async fn find(&self, client: &str) -> Result<ClientRecord, CoreError> {
        self.clients()
            .await?
            .into_iter()
            .find(|c| c.client == client)
            .ok_or_else(|| CoreError::ClientNotFound {
                identifier: client.to_owned(),
            })
    }

    /// Refresh after a mutation: grid data, then the counter.
    pub async fn reload(&self) -> Reload {
        let snapshot = match self.load().await {
            Ok(s) => Some(s),
            Err(e) => {
                warn!(error = %e, "reload after change failed");
                None
            }
        };
        let client_count = match self.client_count().await {
            Ok(n) => Some(n),
            Err(e) => {
                warn!(error = %e, "client counter refresh failed");
                None
            }
        };
        Reload {
            snapshot,
            client_count,
        }
    }

    fn lock(&self) -> Result<tokio::sync::MutexGuard<'_, ()>, CoreError> {
        self.inner.mutation.try_lock().map_err(|_| CoreError::Busy)
    }

    // ── Add ──────────────────────────────────────────────────────────

    /// Validate and create a client. Validation failures never reach the
    /// network.
    pub async fn add(&self, input: &str, comment: &str) -> Result<AddOutcome, CoreError> {
        let validated = validate_client_input(input)?;
        let _guard = self.lock()?;

        let new = NewClient {
            client: validated.value.clone(),
            comment: escape_html(comment),
        };
        self.inner.api.add_client(&new).await?;
        info!(client = %validated.value, kind = %validated.kind, "added client");

        let suggestions = self.suggestions().await;
        let reload = self.reload().await;
        Ok(AddOutcome {
            notice: Notice::success("Successfully added client").with_detail(&validated.value),
            client: validated.value,
            suggestions,
            reload,
        })
    }

    // ── Edit ─────────────────────────────────────────────────────────

    /// Submit one edit. The full record travels with it: the untouched
    /// field keeps the row's current value.
    pub async fn edit(
        &self,
        record: &ClientRecord,
        intent: &EditIntent,
    ) -> Result<EditOutcome, CoreError> {
        let _guard = self.lock()?;

        let (groups, comment) = match intent {
            EditIntent::Comment(text) => (record.groups.clone(), text.clone()),
            EditIntent::Groups(ids) => (ids.clone(), record.display_comment()),
        };
        let update = ClientUpdate {
            key: record.key().to_string(),
            groups,
            comment: escape_html(&comment),
            enabled: false,
        };
        self.inner.api.update_client(&record.client, &update).await?;
        info!(client = %record.client, field = intent.subject(), "edited client");

        let snapshot = match self.load().await {
            Ok(s) => Some(s),
            Err(e) => {
                warn!(error = %e, "reload after edit failed");
                None
            }
        };
        Ok(EditOutcome {
            notice: intent.success_notice(&record.client),
            reload: Reload {
                snapshot,
                client_count: None,
            },
        })
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Delete clients one at a time, in order, stopping at the first
    /// failure. Nothing already deleted is restored. The data is reloaded
    /// once the batch ends, whether or not it completed.
    ///
    /// Only fails outright with [`CoreError::Busy`]; per-item failures are
    /// in the report.
    pub async fn delete_batch<F>(
        &self,
        keys: &[IdentityKey],
        mut on_event: F,
    ) -> Result<DeleteReport, CoreError>
    where
        F: FnMut(DeleteEvent) + Send,
    {
        let _guard = self.lock()?;

        let mut deleted = Vec::new();
        let mut failure = None;

        for (i, key) in keys.iter().enumerate() {
            let result = match key.decode() {
                Ok(client) => {
                    on_event(DeleteEvent::Deleting {
                        client: client.clone(),
                    });
                    match self.inner.api.delete_client(&client).await {
                        Ok(()) => Ok(client),
                        Err(e) => Err((client, CoreError::from(e))),
                    }
                }
                Err(e) => Err((key.to_string(), e)),
            };

            match result {
                Ok(client) => {
                    debug!(%client, "deleted client");
                    on_event(DeleteEvent::Deleted {
                        key: key.clone(),
                        client: client.clone(),
                    });
                    deleted.push(client);
                }
                Err((client, error)) => {
                    warn!(%client, %error, "delete failed; stopping batch");
                    let not_attempted = keys
                        .iter()
                        .skip(i + 1)
                        .map(|k| k.decode().unwrap_or_else(|_| k.to_string()))
                        .collect();
                    failure = Some(DeleteFailure {
                        client,
                        not_attempted,
                        error,
                    });
                    break;
                }
            }
        }

        info!(deleted = deleted.len(), complete = failure.is_none(), "delete batch finished");
        let reload = self.reload().await;
        Ok(DeleteReport {
            deleted,
            failure,
            reload,
        })
    }
}
