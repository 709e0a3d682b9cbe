use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::net::error::handle_error;
use crate::state::ArcShared;

mod layer;
mod handle;

async fn ping() -> (StatusCode, &'static str) {
    (StatusCode::OK, "pong")
}

pub fn routes(state: &ArcShared) -> Router {
    Router::new()
        .route(
            "/api/auth/login",
            post(handle::auth::login)
        )
        .route(
            "/api/auth/logout",
            post(handle::auth::logout)
        )
        .route(
            "/api/auth/me",
            get(handle::auth::me)
        )
        .route(
            "/api/auth/password",
            post(handle::auth::change_password)
        )
        .route(
            "/api/users",
            get(handle::users::get)
                .post(handle::users::post)
        )
        .route(
            "/api/users/:user_id",
            get(handle::users::user_id::get)
                .patch(handle::users::user_id::patch)
                .delete(handle::users::user_id::delete)
        )
        .route(
            "/api/files",
            get(handle::files::get)
        )
        .route(
            "/api/files/status",
            get(handle::files::status)
        )
        .route(
            "/api/files/search",
            get(handle::files::search)
        )
        .route(
            "/api/files/folder",
            post(handle::files::create_folder)
        )
        .route(
            "/api/files/upload",
            post(handle::files::upload)
                .layer(DefaultBodyLimit::disable())
        )
        .route(
            "/api/files/move",
            post(handle::files::move_entry)
        )
        .route(
            "/api/files/:file_id",
            axum::routing::patch(handle::files::file_id::rename)
                .delete(handle::files::file_id::delete)
        )
        .route(
            "/api/files/:file_id/dl",
            get(handle::files::file_id::download)
        )
        .route(
            "/api/files/:file_id/preview",
            get(handle::files::file_id::preview)
        )
        .route(
            "/api/tasks",
            get(handle::tasks::get)
                .post(handle::tasks::post)
        )
        .route(
            "/api/tasks/:task_id",
            get(handle::tasks::task_id::get)
                .patch(handle::tasks::task_id::patch)
                .delete(handle::tasks::task_id::delete)
        )
        .route(
            "/api/projects",
            get(handle::projects::get)
                .post(handle::projects::post)
        )
        .route(
            "/api/projects/:project_id",
            get(handle::projects::project_id::get)
                .patch(handle::projects::project_id::patch)
                .delete(handle::projects::project_id::delete)
        )
        .route(
            "/api/chat/group",
            get(handle::chat::group_get)
                .post(handle::chat::group_post)
        )
        .route(
            "/api/chat/private/:peer_id",
            get(handle::chat::private_get)
                .post(handle::chat::private_post)
        )
        .route(
            "/api/stats",
            get(handle::stats::get)
        )
        .route(
            "/api/stats/activity",
            get(handle::stats::activity)
        )
        .route(
            "/api/vault",
            get(handle::vault::get)
                .post(handle::vault::post)
        )
        .route(
            "/api/vault/stats",
            get(handle::vault::stats)
        )
        .route(
            "/api/vault/export",
            get(handle::vault::export)
        )
        .route(
            "/api/vault/:item_id",
            get(handle::vault::item_id::get)
                .patch(handle::vault::item_id::patch)
                .delete(handle::vault::item_id::delete)
        )
        .route(
            "/api/vault/:item_id/favorite",
            post(handle::vault::item_id::favorite)
        )
        .route("/ping", get(ping))
        .layer(ServiceBuilder::new()
            .layer(layer::RIDLayer::new())
            .layer(TraceLayer::new_for_http()
                .make_span_with(layer::make_span_with)
                .on_request(layer::on_request)
                .on_response(layer::on_response)
                .on_failure(layer::on_failure))
            .layer(HandleErrorLayer::new(handle_error))
            .layer(TimeoutLayer::new(Duration::new(90, 0))))
        .with_state(state.clone())
}
