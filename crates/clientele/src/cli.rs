//! Clap derive structures for the `clientele` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// clientele -- manage the clients of a Pi-hole style DNS appliance
#[derive(Debug, Parser)]
#[command(
    name = "clientele",
    version,
    about = "Manage DNS appliance clients and their group assignments",
    long_about = "Add, annotate, regroup and remove the clients of a Pi-hole style\n\
        DNS appliance through its /api/clients REST interface.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Appliance profile to use
    #[arg(long, short = 'p', env = "CLIENTELE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Appliance URL (overrides profile)
    #[arg(long, short = 'u', env = "CLIENTELE_URL", global = true)]
    pub url: Option<String>,

    /// Session id sent as X-FTL-SID
    #[arg(long, env = "CLIENTELE_SID", global = true, hide_env_values = true)]
    pub sid: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CLIENTELE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "CLIENTELE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (default: profile, then 30)
    #[arg(long, env = "CLIENTELE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configured clients
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// View groups
    #[command(alias = "gr")]
    Groups(GroupsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Clients ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// List configured clients
    #[command(alias = "ls")]
    List {
        /// Only show clients whose address, name or comment contains this
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Column to order by
        #[arg(long, default_value = "id")]
        sort: SortColumn,

        /// Descending order
        #[arg(long)]
        desc: bool,
    },

    /// List devices seen on the network that could be added
    Suggestions,

    /// Add a client by IP, CIDR, MAC address or host name
    Add {
        /// IPv4/IPv6 address (optionally with /prefix), MAC or host name
        client: String,

        /// Free-text comment
        #[arg(long, short = 'c')]
        comment: Option<String>,
    },

    /// Replace the comment of a client
    Comment {
        /// Client as listed by `clients list`
        client: String,

        /// New comment (empty string clears it)
        text: String,
    },

    /// Set the group assignment of a client
    Groups {
        /// Client as listed by `clients list`
        client: String,

        /// Group ids or names; none removes every assignment
        groups: Vec<String>,
    },

    /// Delete clients, one after another, stopping at the first failure
    #[command(alias = "rm")]
    Delete {
        /// Clients as listed by `clients list`
        #[arg(required = true)]
        clients: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortColumn {
    Id,
    Client,
    Comment,
    Groups,
}

// ── Groups ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// List groups
    #[command(alias = "ls")]
    List,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or extend the config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Print the config file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
