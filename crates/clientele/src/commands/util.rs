//! Shared helpers for command handlers.

use std::io::IsTerminal;

use clientele_core::{CoreError, Group, Notice};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

pub fn notice(global: &GlobalOpts, notice: &Notice) {
    output::print_notice(notice, output::should_color(&global.color), global.quiet);
}

/// Turn a failed flow into the error the operator sees. Server rejections
/// carry the notice title with the response text; transport failures keep
/// their own diagnostics and exit codes.
pub fn flow_error(failure: &Notice, err: CoreError) -> CliError {
    match err {
        CoreError::Api { status, .. } if !matches!(status, Some(401 | 403)) => {
            CliError::rejected(failure.title.clone(), failure.detail.clone().unwrap_or_default())
        }
        other => other.into(),
    }
}

/// Resolve group arguments (id or case-insensitive name) to ids.
pub fn resolve_groups(groups: &[Group], args: &[String]) -> Result<Vec<i64>, CliError> {
    args.iter()
        .map(|arg| {
            let by_id = arg.parse::<i64>().ok().and_then(|id| groups.iter().find(|g| g.id == id));
            by_id
                .or_else(|| groups.iter().find(|g| g.name.eq_ignore_ascii_case(arg)))
                .map(|g| g.id)
                .ok_or_else(|| {
                    CliError::from(CoreError::GroupNotFound {
                        identifier: arg.clone(),
                    })
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: i64, name: &str) -> Group {
        Group {
            id,
            name: name.into(),
            enabled: true,
            comment: None,
        }
    }

    #[test]
    fn groups_resolve_by_id_or_name() {
        let groups = vec![group(0, "Default"), group(3, "Kids")];
        let ids = resolve_groups(&groups, &["kids".into(), "0".into()]).unwrap_or_default();
        assert_eq!(ids, vec![3, 0]);
    }

    #[test]
    fn unknown_group_is_not_found() {
        let groups = vec![group(0, "Default")];
        let err = resolve_groups(&groups, &["guests".into()]);
        assert!(matches!(err, Err(CliError::NotFound { .. })));
    }

    #[test]
    fn api_rejection_becomes_titled_failure() {
        let err = CoreError::Api {
            message: "database is locked".into(),
            status: Some(400),
        };
        let failure = Notice::error("Error while adding new client", err.detail());
        match flow_error(&failure, err) {
            CliError::Rejected { title, detail } => {
                assert_eq!(title, "Error while adding new client");
                assert_eq!(detail, "database is locked");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
