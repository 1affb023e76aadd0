//! Client command handlers.

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Tabled;

use clientele_core::{
    ClientGrid, ClientManager, ClientRecord, ColumnId, CoreError, DeleteEvent, EditIntent,
    GridPreferences, GroupPicker, IdentityKey, Notice, PageSize, SortDirection, SortOrder,
    SuggestionOption,
};

use crate::cli::{ClientsArgs, ClientsCommand, GlobalOpts, SortColumn};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Comment")]
    comment: String,
    #[tabled(rename = "Groups")]
    groups: String,
}

impl ClientRow {
    fn new(grid: &ClientGrid, c: &ClientRecord) -> Self {
        Self {
            id: c.id,
            client: c.client.clone(),
            name: c.resolved_name().unwrap_or("-").to_owned(),
            comment: c.display_comment(),
            groups: grid.group_names(c),
        }
    }
}

#[derive(Tabled)]
struct SuggestionRow {
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Seen as")]
    label: String,
}

impl From<&SuggestionOption> for SuggestionRow {
    fn from(s: &SuggestionOption) -> Self {
        Self {
            client: s.value.clone(),
            label: s.label.clone(),
        }
    }
}

fn sort_order(column: SortColumn, desc: bool) -> SortOrder {
    let column = match column {
        SortColumn::Id => ColumnId::Id,
        SortColumn::Client => ColumnId::Client,
        SortColumn::Comment => ColumnId::Comment,
        SortColumn::Groups => ColumnId::Groups,
    };
    let direction = if desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    SortOrder::new(column, direction)
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    manager: &ClientManager,
    args: ClientsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ClientsCommand::List { search, sort, desc } => {
            let snapshot = manager.load().await?;
            let mut grid = ClientGrid::new(GridPreferences {
                page_size: PageSize::All,
                order: sort_order(sort, desc),
                search: search.unwrap_or_default(),
                ..GridPreferences::default()
            });
            grid.set_data(snapshot.groups, snapshot.clients);

            let rows = grid.displayed();
            let out = output::render_list(
                &global.output,
                &rows,
                |c| ClientRow::new(&grid, c),
                |c| c.client.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClientsCommand::Suggestions => {
            let options: Vec<SuggestionOption> = manager
                .suggestions()
                .await
                .into_iter()
                .filter(|o| !o.is_blank())
                .collect();
            let out = output::render_list(&global.output, &options, |o| SuggestionRow::from(o), |o| {
                o.value.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClientsCommand::Add { client, comment } => {
            util::notice(global, &Notice::info("Adding client...").with_detail(&client));
            match manager.add(&client, comment.as_deref().unwrap_or_default()).await {
                Ok(outcome) => {
                    util::notice(global, &outcome.notice);
                    Ok(())
                }
                Err(CoreError::Validation { message }) => {
                    util::notice(global, &Notice::warning(message.clone()));
                    Err(CoreError::Validation { message }.into())
                }
                Err(e) => {
                    let failure = Notice::error("Error while adding new client", e.detail());
                    Err(util::flow_error(&failure, e))
                }
            }
        }

        ClientsCommand::Comment { client, text } => {
            let record = manager.find(&client).await?;
            edit(manager, global, &record, EditIntent::Comment(text)).await
        }

        ClientsCommand::Groups { client, groups } => {
            let record = manager.find(&client).await?;
            let wanted = util::resolve_groups(&manager.groups().await?, &groups)?;

            let mut picker = GroupPicker::new(&record.groups);
            for id in record.groups.iter().chain(&wanted) {
                if picker.is_selected(*id) != wanted.contains(id) {
                    picker.toggle(*id);
                }
            }
            match picker.apply() {
                Some(ids) => edit(manager, global, &record, EditIntent::Groups(ids)).await,
                None => {
                    util::notice(
                        global,
                        &Notice::info("Group assignment unchanged for client").with_detail(&client),
                    );
                    Ok(())
                }
            }
        }

        ClientsCommand::Delete { clients } => delete(manager, global, &clients).await,
    }
}

async fn edit(
    manager: &ClientManager,
    global: &GlobalOpts,
    record: &ClientRecord,
    intent: EditIntent,
) -> Result<(), CliError> {
    util::notice(global, &Notice::info("Editing client...").with_detail(&record.client));
    match manager.edit(record, &intent).await {
        Ok(outcome) => {
            util::notice(global, &outcome.notice);
            Ok(())
        }
        Err(e) => {
            let failure = intent.failure_notice(&record.client, &e);
            Err(util::flow_error(&failure, e))
        }
    }
}

async fn delete(
    manager: &ClientManager,
    global: &GlobalOpts,
    clients: &[String],
) -> Result<(), CliError> {
    // Every argument must name a listed client before anything is deleted.
    let rows = manager.clients().await?;
    let keys = clients
        .iter()
        .map(|c| {
            rows.iter()
                .find(|r| r.client == *c)
                .map(ClientRecord::key)
                .ok_or_else(|| CliError::from(CoreError::ClientNotFound { identifier: c.clone() }))
        })
        .collect::<Result<Vec<IdentityKey>, CliError>>()?;

    let prompt = format!("Delete {} client(s): {}?", keys.len(), clients.join(", "));
    if !util::confirm(&prompt, "clients delete", global.yes)? {
        return Ok(());
    }

    let bar = if global.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(u64::try_from(keys.len()).unwrap_or(u64::MAX))
    };
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{pos}/{len}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let color = output::should_color(&global.color);
    let quiet = global.quiet;
    let report = manager
        .delete_batch(&keys, |event| {
            match &event {
                DeleteEvent::Deleting { client } => bar.set_message(client.clone()),
                DeleteEvent::Deleted { .. } => bar.inc(1),
            }
            bar.suspend(|| output::print_notice(&event.notice(), color, quiet));
        })
        .await?;
    bar.finish_and_clear();

    match report.failure {
        Some(failure) => {
            let notice = failure.notice();
            Err(util::flow_error(&notice, failure.error))
        }
        None => Ok(()),
    }
}
