use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use groupdesk_api::Payload;
use groupdesk_api::stats::{ActivityEntry, TeamStats};

use crate::net::error;
use crate::sec::authn::Initiator;
use crate::state::ArcShared;

pub const DEFAULT_ACTIVITY_LIMIT: i64 = 50;
pub const MAX_ACTIVITY_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct ActivityParams {
    limit: Option<i64>,
}

impl ActivityParams {
    fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
            .clamp(1, MAX_ACTIVITY_LIMIT)
    }
}

pub async fn get(
    State(state): State<ArcShared>,
    _initiator: Initiator,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    // a member counts as active when they logged in within the last day
    let row = conn.query_one(
        "\
        select count(*), \
               count(*) filter (where last_login > now() - interval '1 day'), \
               count(*) filter (where role = 'manager'), \
               count(*) filter (where role = 'member') \
        from users",
        &[]
    ).await?;

    Ok(Payload::new(TeamStats {
        total_members: row.get(0),
        active_members: row.get(1),
        managers: row.get(2),
        members: row.get(3),
    }))
}

pub async fn activity(
    State(state): State<ArcShared>,
    _initiator: Initiator,
    Query(params): Query<ActivityParams>,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    let limit = params.limit();

    let rows = conn.query(
        "\
        select activity_log.id, \
               activity_log.user_id, \
               users.username, \
               activity_log.action, \
               activity_log.detail, \
               activity_log.logged \
        from activity_log \
        left join users on users.id = activity_log.user_id \
        order by activity_log.logged desc \
        limit $1",
        &[&limit]
    ).await?;

    let list: Vec<ActivityEntry> = rows.iter()
        .map(|row| ActivityEntry {
            id: row.get(0),
            user_id: row.get(1),
            username: row.get(2),
            action: row.get(3),
            detail: row.get(4),
            logged: row.get(5),
        })
        .collect();

    Ok(Payload::new(list))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn activity_limit_is_clamped() {
        let unset = ActivityParams { limit: None };
        let low = ActivityParams { limit: Some(0) };
        let high = ActivityParams { limit: Some(10_000) };

        assert_eq!(unset.limit(), DEFAULT_ACTIVITY_LIMIT);
        assert_eq!(low.limit(), 1);
        assert_eq!(high.limit(), MAX_ACTIVITY_LIMIT);
    }
}
