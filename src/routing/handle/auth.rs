use axum::extract::State;
use axum::response::IntoResponse;

use groupdesk_api::Payload;
use groupdesk_api::auth::{ChangePassword, LoginRequest, LoginResponse};

use crate::activity;
use crate::net::error::{self, AuthKind, GeneralKind};
use crate::sec::authn::{password, session, Initiator};
use crate::state::ArcShared;
use crate::user;

pub async fn login(
    State(state): State<ArcShared>,
    axum::Json(json): axum::Json<LoginRequest>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let Some(found) = user::User::query_with_username(&conn, &json.username).await? else {
        return Err(error::Error::api((
            AuthKind::Unauthenticated,
            "invalid username or password"
        )));
    };

    if !found.is_active {
        return Err(error::Error::api((
            AuthKind::PermissionDenied,
            "user account is inactive"
        )));
    }

    let Some(stored) = password::Password::retrieve(&conn, &found.id).await? else {
        return Err(error::Error::api((
            AuthKind::Unauthenticated,
            "invalid username or password"
        )));
    };

    if !stored.verify(&json.password)? {
        return Err(error::Error::api((
            AuthKind::Unauthenticated,
            "invalid username or password"
        )));
    }

    let mut builder = session::Session::builder(found.id);
    builder.duration(state.session_duration());

    let created = builder.build(&conn).await?;

    let hash = session::create_hash(&created.token);
    let token = session::encode_base64(&created.token, hash);

    found.record_login(&conn).await?;

    activity::record(&conn, Some(found.id), "login", &found.username).await;

    Ok(Payload::new(LoginResponse {
        token,
        user: found.into(),
    }))
}

pub async fn logout(
    State(state): State<ArcShared>,
    initiator: Initiator,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    initiator.session.delete(&conn).await?;

    activity::record(
        &conn,
        Some(initiator.user.id),
        "logout",
        &initiator.user.username
    ).await;

    Ok(Payload::new(()))
}

pub async fn me(
    initiator: Initiator,
) -> error::Result<impl IntoResponse> {
    let user: groupdesk_api::users::User = initiator.user.into();

    Ok(Payload::new(user))
}

pub async fn change_password(
    State(state): State<ArcShared>,
    initiator: Initiator,
    axum::Json(json): axum::Json<ChangePassword>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    if json.updated.is_empty() {
        return Err(error::Error::api((
            GeneralKind::ValidationFailed,
            "password cannot be empty"
        )));
    }

    let Some(mut stored) = password::Password::retrieve(&conn, &initiator.user.id).await? else {
        return Err(error::Error::api(AuthKind::Unauthenticated));
    };

    if !stored.verify(&json.current)? {
        return Err(error::Error::api((
            AuthKind::InvalidPassword,
            "current password does not match"
        )));
    }

    stored.update(&conn, &json.updated).await?;

    activity::record(
        &conn,
        Some(initiator.user.id),
        "password_changed",
        &initiator.user.username
    ).await;

    Ok(Payload::new(()))
}
