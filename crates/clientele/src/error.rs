//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use clientele_config::ConfigError;
use clientele_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the appliance at {url}")]
    #[diagnostic(
        code(clientele::connection_failed),
        help(
            "Check that the appliance is running and reachable.\n\
             Reason: {reason}\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(clientele::timeout),
        help("Increase the timeout with --timeout or check appliance responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("The appliance rejected the session ({status})")]
    #[diagnostic(
        code(clientele::auth_failed),
        help(
            "Pass a valid session id with --sid or CLIENTELE_SID,\n\
             or store one with: clientele config init"
        )
    )]
    AuthFailed { status: u16, body: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(clientele::not_found),
        help("Run: clientele {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Server / flow failures ───────────────────────────────────────
    /// A notice-style failure: title plus the server's response text.
    #[error("{title}")]
    #[diagnostic(code(clientele::rejected), help("{detail}"))]
    Rejected { title: String, detail: String },

    #[error("Another change is still in progress")]
    #[diagnostic(code(clientele::busy))]
    Busy,

    #[error("{message}")]
    #[diagnostic(code(clientele::internal))]
    Internal { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("{reason}")]
    #[diagnostic(code(clientele::validation))]
    Validation { field: String, reason: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(clientele::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(clientele::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: clientele config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No appliance configured")]
    #[diagnostic(
        code(clientele::no_config),
        help(
            "Create a profile with: clientele config init\n\
             or pass --url (CLIENTELE_URL).\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(clientele::config))]
    Config(ConfigError),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Wrap a failed flow with the title the operator sees for it.
    pub fn rejected(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Rejected {
            title: title.into(),
            detail: detail.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { message } => CliError::Validation {
                field: "client".into(),
                reason: message,
            },
            CoreError::InvalidIdentityKey { key } => CliError::Validation {
                field: "key".into(),
                reason: format!("malformed identity key: {key}"),
            },
            CoreError::ClientNotFound { identifier } => CliError::NotFound {
                resource_type: "client".into(),
                identifier,
                list_command: "clients list".into(),
            },
            CoreError::GroupNotFound { identifier } => CliError::NotFound {
                resource_type: "group".into(),
                identifier,
                list_command: "groups list".into(),
            },
            CoreError::Busy => CliError::Busy,
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::Api {
                message,
                status: Some(status @ (401 | 403)),
            } => CliError::AuthFailed {
                status,
                body: message,
            },
            CoreError::Api {
                message,
                status: Some(404),
            } => CliError::NotFound {
                resource_type: "resource".into(),
                identifier: message,
                list_command: "clients list".into(),
            },
            CoreError::Api { message, status } => CliError::rejected(
                format!(
                    "The appliance rejected the request ({})",
                    status.map_or_else(|| "no status".into(), |s| s.to_string())
                ),
                message,
            ),
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_usage_exit_code() {
        let err = CliError::from(CoreError::Validation {
            message: "Please specify a client IP or MAC address".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert_eq!(err.to_string(), "Please specify a client IP or MAC address");
    }

    #[test]
    fn unauthorized_maps_to_auth() {
        let err = CliError::from(CoreError::Api {
            message: "unauthorized".into(),
            status: Some(401),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn server_rejection_keeps_body_as_help() {
        let err = CliError::from(CoreError::Api {
            message: "UNIQUE constraint failed".into(),
            status: Some(400),
        });
        assert_eq!(err.exit_code(), exit_code::GENERAL);
        match err {
            CliError::Rejected { detail, .. } => assert_eq!(detail, "UNIQUE constraint failed"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_client_maps_to_not_found() {
        let err = CliError::from(CoreError::ClientNotFound {
            identifier: "10.0.0.9".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }
}
