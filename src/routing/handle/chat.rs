use axum::http::StatusCode;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use groupdesk_api::Payload;
use groupdesk_api::chat::{Message, SendMessage};

use crate::net::error::{self, GeneralKind, UserKind};
use crate::sec::authn::Initiator;
use crate::state::ArcShared;
use crate::user;

pub const DEFAULT_MESSAGE_LIMIT: i64 = 50;
pub const MAX_MESSAGE_LIMIT: i64 = 200;

const MESSAGE_COLUMNS: &str = "\
    chat_message.id, \
    chat_message.sender_id, \
    users.username, \
    chat_message.recipient_id, \
    chat_message.body, \
    chat_message.sent";

#[derive(Debug, Deserialize)]
pub struct MessageParams {
    limit: Option<i64>,
}

impl MessageParams {
    fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_MESSAGE_LIMIT)
            .clamp(1, MAX_MESSAGE_LIMIT)
    }
}

fn message_from_row(row: &tokio_postgres::Row) -> Message {
    Message {
        id: row.get(0),
        sender_id: row.get(1),
        sender_username: row.get(2),
        recipient_id: row.get(3),
        body: row.get(4),
        sent: row.get(5),
    }
}

fn check_body(body: &str) -> error::Result<&str> {
    let trimmed = body.trim();

    if trimmed.is_empty() {
        return Err(error::Error::api((
            GeneralKind::MissingData,
            "message body cannot be empty"
        )));
    }

    Ok(trimmed)
}

pub async fn group_get(
    State(state): State<ArcShared>,
    _initiator: Initiator,
    Query(params): Query<MessageParams>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let limit = params.limit();

    let query = format!(
        "\
        select {MESSAGE_COLUMNS} \
        from chat_message \
        join users on users.id = chat_message.sender_id \
        where chat_message.recipient_id is null \
        order by chat_message.sent desc \
        limit $1"
    );

    let rows = conn.query(query.as_str(), &[&limit]).await?;

    let list: Vec<Message> = rows.iter()
        .map(message_from_row)
        .collect();

    Ok(Payload::new(list))
}

pub async fn group_post(
    State(state): State<ArcShared>,
    initiator: Initiator,
    axum::Json(json): axum::Json<SendMessage>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let body = check_body(&json.body)?;

    let row = conn.query_one(
        "\
        insert into chat_message (sender_id, recipient_id, body) values \
        ($1, null, $2) \
        returning id, sent",
        &[&initiator.user.id, &body]
    ).await?;

    Ok((
        StatusCode::CREATED,
        Payload::new(Message {
            id: row.get(0),
            sender_id: initiator.user.id,
            sender_username: initiator.user.username,
            recipient_id: None,
            body: body.to_owned(),
            sent: row.get(1),
        })
    ))
}

pub async fn private_get(
    State(state): State<ArcShared>,
    initiator: Initiator,
    Path(peer_id): Path<i64>,
    Query(params): Query<MessageParams>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    if user::User::query_with_id(&conn, &peer_id).await?.is_none() {
        return Err(error::Error::api(UserKind::NotFound));
    }

    let limit = params.limit();

    let query = format!(
        "\
        select {MESSAGE_COLUMNS} \
        from chat_message \
        join users on users.id = chat_message.sender_id \
        where (chat_message.sender_id = $1 and chat_message.recipient_id = $2) or \
              (chat_message.sender_id = $2 and chat_message.recipient_id = $1) \
        order by chat_message.sent desc \
        limit $3"
    );

    let rows = conn.query(
        query.as_str(),
        &[&initiator.user.id, &peer_id, &limit]
    ).await?;

    let list: Vec<Message> = rows.iter()
        .map(message_from_row)
        .collect();

    Ok(Payload::new(list))
}

pub async fn private_post(
    State(state): State<ArcShared>,
    initiator: Initiator,
    Path(peer_id): Path<i64>,
    axum::Json(json): axum::Json<SendMessage>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    if user::User::query_with_id(&conn, &peer_id).await?.is_none() {
        return Err(error::Error::api(UserKind::NotFound));
    }

    let body = check_body(&json.body)?;

    let row = conn.query_one(
        "\
        insert into chat_message (sender_id, recipient_id, body) values \
        ($1, $2, $3) \
        returning id, sent",
        &[&initiator.user.id, &peer_id, &body]
    ).await?;

    Ok((
        StatusCode::CREATED,
        Payload::new(Message {
            id: row.get(0),
            sender_id: initiator.user.id,
            sender_username: initiator.user.username,
            recipient_id: Some(peer_id),
            body: body.to_owned(),
            sent: row.get(1),
        })
    ))
}
