use deadpool_postgres::GenericClient;

/// best effort activity log write. failures are traced and swallowed so a
/// logging problem never fails the request that triggered it
pub async fn record<A, D>(
    conn: &impl GenericClient,
    user_id: Option<i64>,
    action: A,
    detail: D,
)
where
    A: AsRef<str>,
    D: AsRef<str>,
{
    let result = conn.execute(
        "\
        insert into activity_log (user_id, action, detail) values \
        ($1, $2, $3)",
        &[&user_id, &action.as_ref(), &detail.as_ref()]
    ).await;

    if let Err(err) = result {
        tracing::warn!("failed to record activity: {err}");
    }
}
