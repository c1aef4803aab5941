use std::error::Error as StdError;
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use mongodb::bson;
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    ConfigReadError,
    ConfigParseError,
    NotFound,
    InternalServer,
    BodyParsing,
    PathParsing,
    QueryParsing,
    UnAuthorized,
    Forbidden,
    BadRequest,
    Conflict,
    ParseError,
    MongoDbOperateError,
    MongoDbBsonSerError,
    MongoDbBsonDeError,
    IOError,
    AccountOrPassword,
}

impl ErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::BodyParsing
            | ErrorKind::PathParsing
            | ErrorKind::QueryParsing
            | ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::UnAuthorized | ErrorKind::AccountOrPassword => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::ConfigReadError
            | ErrorKind::ConfigParseError
            | ErrorKind::InternalServer
            | ErrorKind::ParseError
            | ErrorKind::MongoDbOperateError
            | ErrorKind::MongoDbBsonSerError
            | ErrorKind::MongoDbBsonDeError
            | ErrorKind::IOError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// message used when an error carries no details
    fn default_message(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "Not Found",
            ErrorKind::UnAuthorized => "Authentication failed",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::AccountOrPassword => "Invalid email or password",
            ErrorKind::BadRequest
            | ErrorKind::BodyParsing
            | ErrorKind::PathParsing
            | ErrorKind::QueryParsing => "Bad Request",
            ErrorKind::Conflict => "Conflict",
            _ => "Internal Server Error",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Error {
    kind: ErrorKind,
    details: Option<String>,
    #[serde(skip)]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    #[inline]
    pub fn new(
        kind: ErrorKind,
        details: impl Into<String>,
        source: impl StdError + 'static + Send + Sync,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            details: Some(details.into()),
        }
    }

    #[inline]
    pub fn with_kind(kind: ErrorKind) -> Self {
        Self {
            kind,
            source: None,
            details: None,
        }
    }

    #[inline]
    pub fn with_details(kind: ErrorKind, details: impl Into<String>) -> Self {
        Self {
            kind,
            source: None,
            details: Some(details.into()),
        }
    }

    #[inline]
    pub fn internal_with_details(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::InternalServer, details)
    }

    #[inline]
    pub fn unauthorized_with_details(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::UnAuthorized, details)
    }

    #[inline]
    pub fn forbidden(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::Forbidden, details)
    }

    #[inline]
    pub fn bad_request(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::BadRequest, details)
    }

    #[inline]
    pub fn conflict(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::Conflict, details)
    }

    #[inline]
    pub fn not_found_with_details(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::NotFound, details)
    }

    #[inline]
    pub fn account_or_pwd() -> Self {
        Self::with_kind(ErrorKind::AccountOrPassword)
    }

    #[inline]
    pub fn body_parsing(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::BodyParsing, details)
    }

    #[inline]
    pub fn path_parsing(err: impl StdError + 'static + Send + Sync) -> Self {
        Self::new(ErrorKind::PathParsing, err.to_string(), err)
    }

    #[inline]
    pub fn query_parsing(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::QueryParsing, details)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// the text shown to api clients
    pub fn message(&self) -> &str {
        self.details
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{:?}: {}", self.kind, details),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.kind.status_code();
        if status_code.is_server_error() {
            error!("custom error to http error: {:?}", self);
        } else {
            warn!("request rejected: {}", self);
        }

        // never leak driver details to clients
        let message = if status_code.is_server_error() {
            self.kind.default_message()
        } else {
            self.message()
        };
        (
            status_code,
            Json(json!({"success": false, "message": message})),
        )
            .into_response()
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::new(ErrorKind::IOError, value.to_string(), value)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(value: serde_yaml::Error) -> Self {
        Self::new(ErrorKind::ConfigParseError, value.to_string(), value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::new(ErrorKind::ParseError, value.to_string(), value)
    }
}

impl From<mongodb::error::Error> for Error {
    fn from(value: mongodb::error::Error) -> Self {
        Self::new(ErrorKind::MongoDbOperateError, value.to_string(), value)
    }
}

impl From<bson::ser::Error> for Error {
    fn from(value: bson::ser::Error) -> Self {
        Self::new(ErrorKind::MongoDbBsonSerError, value.to_string(), value)
    }
}

impl From<bson::de::Error> for Error {
    fn from(value: bson::de::Error) -> Self {
        Self::new(ErrorKind::MongoDbBsonDeError, value.to_string(), value)
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        Self::new(ErrorKind::InternalServer, value.to_string(), value)
    }
}
