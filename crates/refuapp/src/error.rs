//! CLI error types with miette diagnostics.
//!
//! Maps core setup errors and every operation's error taxonomy into
//! user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use refuapp_config::ConfigError;
use refuapp_core::{
    AuthenticationError, CoreError, CreateRefugeError, DeleteRefugeError, GetAllRefugesError,
    GetRefugeError, PostImageError, Unreachable, UpdateRefugeError,
};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the registry at {url}")]
    #[diagnostic(
        code(refuapp::connection_failed),
        help(
            "You are offline or the server is down.\n\
             URL: {url}\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(refuapp::tls_error),
        help(
            "Check the ca_cert path in your profile,\n\
             or use --insecure (-k) to accept any certificate."
        )
    )]
    TlsError { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login rejected for profile '{profile}'")]
    #[diagnostic(
        code(refuapp::auth_failed),
        help(
            "Verify the username and password.\n\
             Run: refuapp config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("Authentication required")]
    #[diagnostic(
        code(refuapp::auth_required),
        help("Log in first with: refuapp login")
    )]
    AuthRequired,

    #[error("Access forbidden")]
    #[diagnostic(
        code(refuapp::forbidden),
        help("This account may not administer refuges.")
    )]
    Forbidden,

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(refuapp::no_credentials),
        help(
            "Configure credentials with: refuapp config init\n\
             Or set REFUAPP_USERNAME and REFUAPP_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(refuapp::not_found),
        help("Run: refuapp {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(code(refuapp::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    #[error("Invalid data: {message}")]
    #[diagnostic(
        code(refuapp::invalid_data),
        help("Correct the value and try again.")
    )]
    InvalidData { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(refuapp::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(refuapp::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(refuapp::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: refuapp config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(refuapp::no_config),
        help(
            "Create one with: refuapp config init\n\
             Or pass --api-url. Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("{message}")]
    #[diagnostic(code(refuapp::config))]
    Config { message: String },

    #[error("Session storage failed: {message}")]
    #[diagnostic(
        code(refuapp::session),
        help("Check permissions on the session file, or run: refuapp logout")
    )]
    Session { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(refuapp::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(
        code(refuapp::json),
        help("Check the JSON file contents and try again.")
    )]
    Json(#[from] serde_json::Error),

    #[error("Failed to render output: {message}")]
    #[diagnostic(code(refuapp::render))]
    Render { message: String },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::AuthRequired | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::Forbidden => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::InvalidData { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// The registry could not be reached at `url`.
    pub fn unreachable(url: &url::Url, err: Unreachable) -> Self {
        Self::ConnectionFailed {
            url: url.to_string(),
            reason: err.reason,
        }
    }

    fn api(code: &str, message: impl ToString) -> Self {
        Self::ApiError {
            code: code.to_owned(),
            message: message.to_string(),
        }
    }

    fn refuge_not_found(id: &str) -> Self {
        Self::NotFound {
            resource_type: "refuge".into(),
            identifier: id.into(),
            list_command: "refuges list".into(),
        }
    }

    fn refuge_conflict(name: &str) -> Self {
        Self::Conflict {
            resource_type: "refuge".into(),
            identifier: name.into(),
        }
    }
}

// ── Setup errors → CliError ─────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config { message } => Self::Config { message },
            CoreError::Api(refuapp_core::ApiError::Tls(message)) => Self::TlsError { message },
            CoreError::Api(api) => Self::Config {
                message: api.to_string(),
            },
            CoreError::Storage { message } => Self::Session { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

// ── Operation errors → CliError ─────────────────────────────────────
//
// One exhaustive match per taxonomy, so a new member surfaces here.

pub fn list_refuges(err: GetAllRefugesError) -> CliError {
    let code = err.code();
    match err {
        GetAllRefugesError::Unauthorized => CliError::AuthRequired,
        GetAllRefugesError::Forbidden => CliError::Forbidden,
        GetAllRefugesError::ProgrammerSentInvalidData
        | GetAllRefugesError::ServerSentMalformedData
        | GetAllRefugesError::Unknown => CliError::api(code, err),
    }
}

pub fn get_refuge(id: &str, err: GetRefugeError) -> CliError {
    let code = err.code();
    match err {
        GetRefugeError::NotFound => CliError::refuge_not_found(id),
        GetRefugeError::ClientSentInvalidData { message } => CliError::InvalidData { message },
        GetRefugeError::ProgrammerSentInvalidData
        | GetRefugeError::ServerSentMalformedData
        | GetRefugeError::Unknown => CliError::api(code, err),
    }
}

pub fn create_refuge(name: &str, err: CreateRefugeError) -> CliError {
    let code = err.code();
    match err {
        CreateRefugeError::Unauthorized => CliError::AuthRequired,
        CreateRefugeError::Forbidden => CliError::Forbidden,
        CreateRefugeError::Conflict => CliError::refuge_conflict(name),
        CreateRefugeError::ClientSentInvalidData { message } => CliError::InvalidData { message },
        CreateRefugeError::ProgrammerSentInvalidData
        | CreateRefugeError::ServerSentMalformedData
        | CreateRefugeError::Unknown => CliError::api(code, err),
    }
}

pub fn update_refuge(id: &str, name: &str, err: UpdateRefugeError) -> CliError {
    let code = err.code();
    match err {
        UpdateRefugeError::Unauthorized => CliError::AuthRequired,
        UpdateRefugeError::Forbidden => CliError::Forbidden,
        UpdateRefugeError::NotFound => CliError::refuge_not_found(id),
        UpdateRefugeError::Conflict => CliError::refuge_conflict(name),
        UpdateRefugeError::ClientSentInvalidData { message } => CliError::InvalidData { message },
        UpdateRefugeError::ProgrammerSentInvalidData
        | UpdateRefugeError::ServerSentMalformedData
        | UpdateRefugeError::Unknown => CliError::api(code, err),
    }
}

pub fn delete_refuge(id: &str, err: DeleteRefugeError) -> CliError {
    let code = err.code();
    match err {
        DeleteRefugeError::Unauthorized => CliError::AuthRequired,
        DeleteRefugeError::Forbidden => CliError::Forbidden,
        DeleteRefugeError::NotFound => CliError::refuge_not_found(id),
        DeleteRefugeError::ClientSentInvalidData { message } => CliError::InvalidData { message },
        DeleteRefugeError::ProgrammerSentInvalidData
        | DeleteRefugeError::ServerSentMalformedData
        | DeleteRefugeError::Unknown => CliError::api(code, err),
    }
}

pub fn post_image(err: PostImageError) -> CliError {
    let code = err.code();
    match err {
        PostImageError::Unauthorized => CliError::AuthRequired,
        PostImageError::Forbidden => CliError::Forbidden,
        PostImageError::ClientSentInvalidData { message } => CliError::InvalidData { message },
        PostImageError::InvalidRequest => CliError::InvalidData {
            message: err.to_string(),
        },
        PostImageError::ProgrammerSentInvalidData
        | PostImageError::ServerSentMalformedData
        | PostImageError::Unknown => CliError::api(code, err),
    }
}

pub fn authentication(profile: &str, err: AuthenticationError) -> CliError {
    let code = err.code();
    match err {
        AuthenticationError::Unauthorized => CliError::AuthFailed {
            profile: profile.into(),
        },
        AuthenticationError::Forbidden => CliError::Forbidden,
        AuthenticationError::ClientSentInvalidData { message } => CliError::InvalidData { message },
        AuthenticationError::ProgrammerSentInvalidData
        | AuthenticationError::ServerSentMalformedData
        | AuthenticationError::Unknown => CliError::api(code, err),
    }
}
