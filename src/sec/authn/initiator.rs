use std::pin::Pin;
use std::future::Future;

use axum::http::header::HeaderMap;
use axum::http::request::Parts;
use axum::extract::FromRequestParts;
use deadpool_postgres::GenericClient;

use groupdesk_api::users::Role;

use crate::net::error::{self, AuthKind};
use crate::state::ArcShared;
use crate::user;

use super::session;

pub struct Initiator {
    pub user: user::User,
    pub session: session::Session,
}

impl Initiator {
    pub fn require_manager(&self) -> Result<(), error::Error> {
        if self.user.role != Role::Manager {
            return Err(error::Error::api((
                AuthKind::PermissionDenied,
                "manager role required"
            )));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("session was not found")]
    SessionNotFound,

    #[error("session has expired")]
    SessionExpired(session::Session),

    #[error("user was not found")]
    UserNotFound(session::Session),

    #[error("user account is inactive")]
    UserInactive(session::Session),

    #[error("no authentication mechanism was found")]
    MechanismNotFound,

    #[error(transparent)]
    SessionDecode(#[from] session::DecodeError),

    #[error(transparent)]
    Database(#[from] tokio_postgres::Error),

    #[error(transparent)]
    HeaderToStr(#[from] axum::http::header::ToStrError),
}

impl From<LookupError> for error::Error {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::SessionNotFound => error::Error::api(AuthKind::SessionNotFound),
            LookupError::SessionExpired(_session) => error::Error::api(AuthKind::SessionExpired),
            LookupError::UserNotFound(_session) => error::Error::api(AuthKind::Unauthenticated),
            LookupError::UserInactive(_session) => error::Error::api((
                AuthKind::PermissionDenied,
                "user account is inactive"
            )),
            LookupError::MechanismNotFound => error::Error::api(AuthKind::MechanismNotFound),

            LookupError::Database(e) => e.into(),
            LookupError::HeaderToStr(e) => e.into(),

            LookupError::SessionDecode(err) => match err {
                session::DecodeError::InvalidString |
                session::DecodeError::InvalidLength |
                session::DecodeError::InvalidHash => error::Error::api(AuthKind::InvalidSession),
            }
        }
    }
}

pub async fn lookup_session_id<S>(
    conn: &impl GenericClient,
    session_id: S
) -> Result<Initiator, LookupError>
where
    S: AsRef<[u8]>
{
    let (token, _hash) = session::decode_base64(session_id)?;

    if let Some(session) = session::Session::retrieve_token(conn, &token).await? {
        let now = chrono::Utc::now();

        if session.dropped || session.expires < now {
            return Err(LookupError::SessionExpired(session));
        }

        if let Some(user) = user::User::query_with_id(conn, &session.user_id).await? {
            if !user.is_active {
                return Err(LookupError::UserInactive(session));
            }

            Ok(Initiator {
                user,
                session,
            })
        } else {
            Err(LookupError::UserNotFound(session))
        }
    } else {
        Err(LookupError::SessionNotFound)
    }
}

pub async fn lookup_header_map(
    conn: &impl GenericClient,
    headers: &HeaderMap
) -> Result<Initiator, LookupError> {
    if let Some(authorization) = headers.get("authorization") {
        let value_str = authorization.to_str()?;

        if let Some(token) = value_str.strip_prefix("Bearer ") {
            return lookup_session_id(conn, token.trim().as_bytes()).await;
        }
    }

    Err(LookupError::MechanismNotFound)
}

impl FromRequestParts<ArcShared> for Initiator {
    type Rejection = error::Error;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 ArcShared,
    ) -> Pin<Box<dyn Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>>
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait
    {
        Box::pin(async move {
            let conn = state.pool().get().await
                .map_err(error::Error::from)?;

            Ok(lookup_header_map(&conn, &parts.headers).await?)
        })
    }
}
