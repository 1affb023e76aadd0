//! Group command handlers.

use tabled::Tabled;

use clientele_core::{ClientManager, Group};

use crate::cli::{GlobalOpts, GroupsArgs, GroupsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

impl From<&Group> for GroupRow {
    fn from(g: &Group) -> Self {
        Self {
            id: g.id,
            name: g.name.clone(),
            enabled: if g.enabled { "yes" } else { "no" }.into(),
            comment: g.comment.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(
    manager: &ClientManager,
    args: GroupsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        GroupsCommand::List => {
            let groups = manager.groups().await?;
            let out = output::render_list(&global.output, &groups, |g| GroupRow::from(g), |g| {
                g.name.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
