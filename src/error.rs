use std::fmt::{Debug, Display};

use actix_web::body::BoxBody;
use actix_web::error::{PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derivative::Derivative;
use serde::{Serialize, Serializer};
use sqlx::Error as DatabaseError;

use crate::campaign::CampaignId;

#[derive(Debug, Serialize, Derivative)]
#[derivative(PartialEq)]
#[serde(untagged)]
pub enum Error {
    // 400
    #[serde(serialize_with = "display")]
    InvalidPath(#[derivative(PartialEq = "ignore")] PathError),
    #[serde(serialize_with = "display")]
    InvalidQuery(#[derivative(PartialEq = "ignore")] QueryPayloadError),

    // 404
    PathDoesNotExist,
    CampaignNotFound {
        campaign_id: CampaignId,
    },

    // 500
    DatabaseConnectionFailed(String),
    #[serde(serialize_with = "display")]
    QueryFailed(#[derivative(PartialEq = "ignore")] DatabaseError),
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidPath(_) => "E4001000",
            Error::InvalidQuery(_) => "E4001001",
            Error::PathDoesNotExist => "E4041000",
            Error::CampaignNotFound { .. } => "E4041001",
            Error::DatabaseConnectionFailed(_) => "E5001000",
            Error::QueryFailed(_) => "E5001001",
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            Error::InvalidPath(_) => "The given path could not be parsed",
            Error::InvalidQuery(_) => "The given query could not be parsed",
            Error::PathDoesNotExist => "The requested path does not exist",
            Error::CampaignNotFound { .. } => "The requested campaign does not exist",
            Error::DatabaseConnectionFailed(_) => "The server could not connect to the database",
            Error::QueryFailed(_) => "An error occurred when querying the database",
        }
    }

    /// The raw text of the underlying failure, or the generic message when
    /// there is nothing underneath.
    pub fn detail(&self) -> String {
        match self {
            Error::InvalidPath(err) => err.to_string(),
            Error::InvalidQuery(err) => err.to_string(),
            Error::DatabaseConnectionFailed(reason) => reason.clone(),
            Error::QueryFailed(err) => err.to_string(),
            _ => self.error_message().to_owned(),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::PathDoesNotExist => StatusCode::NOT_FOUND,
            Error::CampaignNotFound { .. } => StatusCode::NOT_FOUND,
            Error::DatabaseConnectionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::QueryFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        #[derive(Serialize)]
        struct Dummy<'a> {
            error_code: &'static str,
            error_message: &'static str,
            error_meta: &'a Error,
        }

        HttpResponse::build(self.status_code()).json(&Dummy {
            error_code: self.error_code(),
            error_message: self.error_message(),
            error_meta: self,
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}

impl From<DatabaseError> for Error {
    fn from(error: DatabaseError) -> Error {
        Error::QueryFailed(error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidPath(err) => Some(err),
            Error::InvalidQuery(err) => Some(err),
            Error::QueryFailed(err) => Some(err),
            _ => None,
        }
    }
}

fn display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
