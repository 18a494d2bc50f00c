// ── Operation results ──
//
// One closed result type per operation, each with exactly two arms,
// and one closed error taxonomy per operation. Error enums are
// deliberately not `#[non_exhaustive]`: a consumer that forgets a
// member does not compile.

use serde::Serialize;
use strum::IntoStaticStr;
use thiserror::Error;

use crate::classify::HttpFailure;
use crate::model::{Refuge, Token};

// ── Error taxonomies ────────────────────────────────────────────────

/// Errors of `GET /refuges/`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, IntoStaticStr)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GetAllRefugesError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Access forbidden")]
    Forbidden,
    #[error("The client sent a request the server could not process")]
    ProgrammerSentInvalidData,
    #[error("The server sent data in an unexpected format")]
    ServerSentMalformedData,
    #[error("Unknown server error")]
    Unknown,
}

/// Errors of `GET /refuges/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, IntoStaticStr)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GetRefugeError {
    #[error("Refuge not found")]
    NotFound,
    #[error("Invalid data: {message}")]
    ClientSentInvalidData { message: String },
    #[error("The client sent a request the server could not process")]
    ProgrammerSentInvalidData,
    #[error("The server sent data in an unexpected format")]
    ServerSentMalformedData,
    #[error("Unknown server error")]
    Unknown,
}

/// Errors of `POST /refuges/`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, IntoStaticStr)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CreateRefugeError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Access forbidden")]
    Forbidden,
    #[error("A refuge with that name already exists")]
    Conflict,
    #[error("Invalid data: {message}")]
    ClientSentInvalidData { message: String },
    #[error("The client sent a request the server could not process")]
    ProgrammerSentInvalidData,
    #[error("The server sent data in an unexpected format")]
    ServerSentMalformedData,
    #[error("Unknown server error")]
    Unknown,
}

/// Errors of `PUT /refuges/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, IntoStaticStr)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateRefugeError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Access forbidden")]
    Forbidden,
    #[error("Refuge not found")]
    NotFound,
    #[error("A refuge with that name already exists")]
    Conflict,
    #[error("Invalid data: {message}")]
    ClientSentInvalidData { message: String },
    #[error("The client sent a request the server could not process")]
    ProgrammerSentInvalidData,
    #[error("The server sent data in an unexpected format")]
    ServerSentMalformedData,
    #[error("Unknown server error")]
    Unknown,
}

/// Errors of `DELETE /refuges/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, IntoStaticStr)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DeleteRefugeError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Access forbidden")]
    Forbidden,
    #[error("Refuge not found")]
    NotFound,
    #[error("Invalid data: {message}")]
    ClientSentInvalidData { message: String },
    #[error("The client sent a request the server could not process")]
    ProgrammerSentInvalidData,
    #[error("The server sent data in an unexpected format")]
    ServerSentMalformedData,
    #[error("Unknown server error")]
    Unknown,
}

/// Errors of `POST /images/`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, IntoStaticStr)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PostImageError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Access forbidden")]
    Forbidden,
    /// 400: the server rejected the upload itself (wrong type, too large).
    #[error("The server rejected the image")]
    InvalidRequest,
    #[error("Invalid data: {message}")]
    ClientSentInvalidData { message: String },
    #[error("The client sent a request the server could not process")]
    ProgrammerSentInvalidData,
    #[error("The server sent data in an unexpected format")]
    ServerSentMalformedData,
    #[error("Unknown server error")]
    Unknown,
}

/// Errors of `POST /login/`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, IntoStaticStr)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthenticationError {
    #[error("Incorrect username or password")]
    Unauthorized,
    #[error("This account may not administer refuges")]
    Forbidden,
    #[error("Invalid data: {message}")]
    ClientSentInvalidData { message: String },
    #[error("The client sent a request the server could not process")]
    ProgrammerSentInvalidData,
    #[error("The server sent data in an unexpected format")]
    ServerSentMalformedData,
    #[error("Unknown server error")]
    Unknown,
}

// ── HttpFailure → taxonomy ──────────────────────────────────────────
//
// No wildcard arms: a new `HttpFailure` variant must be placed in
// every taxonomy before the crate compiles again.

impl From<HttpFailure> for GetAllRefugesError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Unauthorized => Self::Unauthorized,
            HttpFailure::Forbidden => Self::Forbidden,
            // No user data is sent on a list; any 422 is a client bug.
            HttpFailure::InvalidData { .. } | HttpFailure::MalformedRequest => {
                Self::ProgrammerSentInvalidData
            }
            HttpFailure::BadRequest
            | HttpFailure::NotFound
            | HttpFailure::Conflict
            | HttpFailure::Unknown { .. } => Self::Unknown,
        }
    }
}

impl From<HttpFailure> for GetRefugeError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::NotFound => Self::NotFound,
            HttpFailure::InvalidData { message } => Self::ClientSentInvalidData { message },
            HttpFailure::MalformedRequest => Self::ProgrammerSentInvalidData,
            HttpFailure::BadRequest
            | HttpFailure::Unauthorized
            | HttpFailure::Forbidden
            | HttpFailure::Conflict
            | HttpFailure::Unknown { .. } => Self::Unknown,
        }
    }
}

impl From<HttpFailure> for CreateRefugeError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Unauthorized => Self::Unauthorized,
            HttpFailure::Forbidden => Self::Forbidden,
            HttpFailure::Conflict => Self::Conflict,
            HttpFailure::InvalidData { message } => Self::ClientSentInvalidData { message },
            HttpFailure::MalformedRequest => Self::ProgrammerSentInvalidData,
            HttpFailure::BadRequest | HttpFailure::NotFound | HttpFailure::Unknown { .. } => {
                Self::Unknown
            }
        }
    }
}

impl From<HttpFailure> for UpdateRefugeError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Unauthorized => Self::Unauthorized,
            HttpFailure::Forbidden => Self::Forbidden,
            HttpFailure::NotFound => Self::NotFound,
            HttpFailure::Conflict => Self::Conflict,
            HttpFailure::InvalidData { message } => Self::ClientSentInvalidData { message },
            HttpFailure::MalformedRequest => Self::ProgrammerSentInvalidData,
            HttpFailure::BadRequest | HttpFailure::Unknown { .. } => Self::Unknown,
        }
    }
}

impl From<HttpFailure> for DeleteRefugeError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Unauthorized => Self::Unauthorized,
            HttpFailure::Forbidden => Self::Forbidden,
            HttpFailure::NotFound => Self::NotFound,
            HttpFailure::InvalidData { message } => Self::ClientSentInvalidData { message },
            HttpFailure::MalformedRequest => Self::ProgrammerSentInvalidData,
            HttpFailure::BadRequest | HttpFailure::Conflict | HttpFailure::Unknown { .. } => {
                Self::Unknown
            }
        }
    }
}

impl From<HttpFailure> for PostImageError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Unauthorized => Self::Unauthorized,
            HttpFailure::Forbidden => Self::Forbidden,
            HttpFailure::BadRequest => Self::InvalidRequest,
            HttpFailure::InvalidData { message } => Self::ClientSentInvalidData { message },
            HttpFailure::MalformedRequest => Self::ProgrammerSentInvalidData,
            HttpFailure::NotFound | HttpFailure::Conflict | HttpFailure::Unknown { .. } => {
                Self::Unknown
            }
        }
    }
}

impl From<HttpFailure> for AuthenticationError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Unauthorized => Self::Unauthorized,
            HttpFailure::Forbidden => Self::Forbidden,
            HttpFailure::InvalidData { message } => Self::ClientSentInvalidData { message },
            HttpFailure::MalformedRequest => Self::ProgrammerSentInvalidData,
            HttpFailure::BadRequest
            | HttpFailure::NotFound
            | HttpFailure::Conflict
            | HttpFailure::Unknown { .. } => Self::Unknown,
        }
    }
}

// ── Stable codes ────────────────────────────────────────────────────

macro_rules! error_codes {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                /// Stable SCREAMING_SNAKE_CASE code of this member.
                pub fn code(&self) -> &'static str {
                    self.into()
                }
            }
        )*
    };
}

error_codes!(
    GetAllRefugesError,
    GetRefugeError,
    CreateRefugeError,
    UpdateRefugeError,
    DeleteRefugeError,
    PostImageError,
    AuthenticationError,
);

// ── Two-arm results ─────────────────────────────────────────────────

/// Success data and error taxonomy of one operation.
///
/// Implemented by every operation result; the generic normalizer is
/// written once against this trait.
pub trait OperationResponse: Sized {
    type Data;
    type Error: From<HttpFailure>;

    fn success(data: Self::Data) -> Self;
    fn error(error: Self::Error) -> Self;
    /// The taxonomy member for a 2xx payload that failed validation.
    fn server_sent_malformed_data() -> Self::Error;
}

macro_rules! operation_response {
    (
        $(#[$outer:meta])*
        $name:ident { $success:ident($data:ty), $error:ident }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Serialize)]
        #[serde(tag = "status", rename_all = "lowercase")]
        pub enum $name {
            $success { data: $data },
            Error { error: $error },
        }

        impl OperationResponse for $name {
            type Data = $data;
            type Error = $error;

            fn success(data: $data) -> Self {
                Self::$success { data }
            }

            fn error(error: $error) -> Self {
                Self::Error { error }
            }

            fn server_sent_malformed_data() -> $error {
                $error::ServerSentMalformedData
            }
        }

        impl $name {
            pub fn is_success(&self) -> bool {
                matches!(self, Self::$success { .. })
            }

            /// Collapse into a `Result`, e.g. to use `?` on it.
            pub fn into_result(self) -> Result<$data, $error> {
                match self {
                    Self::$success { data } => Ok(data),
                    Self::Error { error } => Err(error),
                }
            }
        }
    };
}

operation_response!(
    /// Result of listing every refuge.
    #[derive(PartialEq)]
    GetAllRefugesResponse { Correct(Vec<Refuge>), GetAllRefugesError }
);

operation_response!(
    /// Result of fetching one refuge.
    #[derive(PartialEq)]
    GetRefugeResponse { Correct(Refuge), GetRefugeError }
);

operation_response!(
    #[derive(PartialEq)]
    CreateRefugeResponse { Created(Refuge), CreateRefugeError }
);

operation_response!(
    #[derive(PartialEq)]
    UpdateRefugeResponse { Updated(Refuge), UpdateRefugeError }
);

operation_response!(
    /// Carries the deleted record on success.
    #[derive(PartialEq)]
    DeleteRefugeResponse { Correct(Refuge), DeleteRefugeError }
);

operation_response!(
    /// Carries the filename the server stored the image under.
    #[derive(PartialEq)]
    PostImageResponse { Correct(String), PostImageError }
);

/// Result of a login attempt.
///
/// Not serializable: the token never leaves the process in clear.
#[derive(Debug, Clone)]
pub enum AuthenticationResponse {
    Authenticated { data: Token },
    Error { error: AuthenticationError },
}

impl OperationResponse for AuthenticationResponse {
    type Data = Token;
    type Error = AuthenticationError;

    fn success(data: Token) -> Self {
        Self::Authenticated { data }
    }

    fn error(error: AuthenticationError) -> Self {
        Self::Error { error }
    }

    fn server_sent_malformed_data() -> AuthenticationError {
        AuthenticationError::ServerSentMalformedData
    }
}

impl AuthenticationResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn into_result(self) -> Result<Token, AuthenticationError> {
        match self {
            Self::Authenticated { data } => Ok(data),
            Self::Error { error } => Err(error),
        }
    }
}
