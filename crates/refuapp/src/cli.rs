//! Clap derive structures for the `refuapp` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// refuapp -- administer the RefuApp refuge registry
#[derive(Debug, Parser)]
#[command(
    name = "refuapp",
    version,
    about = "Administer the RefuApp refuge registry from the command line",
    long_about = "List, create, edit and delete mountain refuges, upload their photos,\n\
        and follow the registry live. Write operations need an administrator login.",
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
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "REFUAPP_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Registry API base URL (overrides profile)
    #[arg(long, env = "REFUAPP_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "REFUAPP_OUTPUT",
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

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "REFUAPP_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "REFUAPP_TIMEOUT", global = true)]
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
    /// Browse and edit refuges
    #[command(alias = "r")]
    Refuges(RefugesArgs),

    /// Upload refuge photos
    #[command(alias = "img")]
    Images(ImagesArgs),

    /// Log in as an administrator and keep the session token
    Login(LoginArgs),

    /// Forget the stored session token
    Logout,

    /// Show the API endpoint and session state
    Status,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Refuges ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RefugesArgs {
    #[command(subcommand)]
    pub command: RefugesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RefugesCommand {
    /// List every refuge
    #[command(alias = "ls")]
    List,

    /// Show one refuge
    Get {
        /// Refuge id (24 hex characters)
        id: String,
    },

    /// Create a refuge from flags or a JSON file
    Create {
        /// Read the refuge from a JSON file instead of flags
        #[arg(long, short = 'F', conflicts_with_all = ["name", "region"])]
        from_file: Option<PathBuf>,

        #[command(flatten)]
        fields: RefugeFields,
    },

    /// Change fields of an existing refuge
    Update {
        /// Refuge id (24 hex characters)
        id: String,

        /// Read the full replacement from a JSON file
        #[arg(long, short = 'F')]
        from_file: Option<PathBuf>,

        #[command(flatten)]
        fields: RefugeFields,
    },

    /// Delete a refuge
    #[command(alias = "rm")]
    Delete {
        /// Refuge id (24 hex characters)
        id: String,
    },

    /// Follow the refuge list live, printing each change
    Watch,

    /// Print the URL of a refuge's photo
    ImageUrl {
        /// Refuge id (24 hex characters)
        id: String,
    },
}

/// Refuge fields settable from flags. On update, unset flags keep the
/// current value.
#[derive(Debug, Default, Args)]
pub struct RefugeFields {
    /// Refuge name
    #[arg(long)]
    pub name: Option<String>,

    /// Mountain region
    #[arg(long)]
    pub region: Option<String>,

    /// Stored image filename
    #[arg(long)]
    pub image: Option<String>,

    /// Altitude in meters
    #[arg(long)]
    pub altitude: Option<u32>,

    /// Latitude in degrees (-90..90)
    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    /// Longitude in degrees (-180..180)
    #[arg(long, allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    /// Sleeping places in winter
    #[arg(long)]
    pub winter: Option<u32>,

    /// Sleeping places in summer
    #[arg(long)]
    pub summer: Option<u32>,
}

// ── Images ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ImagesArgs {
    #[command(subcommand)]
    pub command: ImagesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ImagesCommand {
    /// Upload a photo; prints the filename the server stored it under
    Upload {
        /// Image file (jpeg, png, ...)
        path: PathBuf,

        /// Image format, when the file extension does not tell
        #[arg(long)]
        format: Option<String>,
    },
}

// ── Login ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Administrator username (defaults to the profile's)
    #[arg(long, short = 'u', env = "REFUAPP_USERNAME")]
    pub username: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (api_url, username, password_env, ca_cert, insecure,
        /// timeout, poll_interval_secs, max_retries)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
