//! Integration tests for the job lifecycle engine.
//!
//! Exercises the repository layer against a real database: submission,
//! the atomic claim, result merging, conditional state transitions, and
//! queue position.

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use benchline_db::models::job::NewJob;
use benchline_db::models::state::JobState;
use benchline_db::repositories::JobRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_job(queue: &str) -> NewJob {
    NewJob {
        job_id: Uuid::new_v4(),
        queue: queue.to_string(),
        job_data: json!({
            "job_queue": queue,
            "provision_data": { "image": "core22" },
        }),
    }
}

async fn submit(pool: &PgPool, queue: &str) -> Uuid {
    JobRepo::insert(pool, &new_job(queue)).await.unwrap().job_id
}

// ---------------------------------------------------------------------------
// Test: insert and fetch round trip
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn insert_and_find_round_trip(pool: PgPool) {
    let input = new_job("devices");
    let created = JobRepo::insert(&pool, &input).await.unwrap();

    assert_eq!(created.job_id, input.job_id);
    assert_eq!(created.job_state, JobState::Waiting.as_str());
    assert_eq!(created.result_data, json!({}));

    let found = JobRepo::find_by_id(&pool, input.job_id).await.unwrap().unwrap();
    assert_eq!(found.job_data, input.job_data);

    let flattened = found.flattened();
    assert_eq!(flattened["job_id"], input.job_id.to_string());
    assert_eq!(flattened["provision_data"]["image"], "core22");
}

#[sqlx::test]
async fn find_unknown_job_returns_none(pool: PgPool) {
    assert!(JobRepo::find_by_id(&pool, Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test]
async fn duplicate_job_id_is_rejected(pool: PgPool) {
    let input = new_job("devices");
    JobRepo::insert(&pool, &input).await.unwrap();

    let err = JobRepo::insert(&pool, &input).await.unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => assert!(db_err.is_unique_violation()),
        other => panic!("expected unique violation, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: claim transitions exactly one waiting job to running
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn claim_transitions_waiting_to_running(pool: PgPool) {
    let job_id = submit(&pool, "devices").await;

    let claimed = JobRepo::claim(&pool, &["devices".to_string()])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(claimed.job_id, job_id);
    assert_eq!(claimed.job_state, JobState::Running.as_str());

    // A repeat claim never returns the same job again.
    assert!(JobRepo::claim(&pool, &["devices".to_string()])
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test]
async fn claim_matches_queue_membership_only(pool: PgPool) {
    submit(&pool, "devices").await;

    assert!(JobRepo::claim(&pool, &["vms".to_string()])
        .await
        .unwrap()
        .is_none());

    // A multi-queue agent still picks it up.
    let claimed = JobRepo::claim(&pool, &["vms".to_string(), "devices".to_string()])
        .await
        .unwrap();
    assert!(claimed.is_some());
}

#[sqlx::test]
async fn claim_is_fifo_within_queue(pool: PgPool) {
    let first = submit(&pool, "devices").await;
    let second = submit(&pool, "devices").await;

    let queues = vec!["devices".to_string()];
    assert_eq!(JobRepo::claim(&pool, &queues).await.unwrap().unwrap().job_id, first);
    assert_eq!(JobRepo::claim(&pool, &queues).await.unwrap().unwrap().job_id, second);
    assert!(JobRepo::claim(&pool, &queues).await.unwrap().is_none());
}

#[sqlx::test]
async fn concurrent_claims_assign_a_job_exactly_once(pool: PgPool) {
    let job_id = submit(&pool, "devices").await;

    let queues = vec!["devices".to_string()];
    let (a, b, c, d, e) = tokio::join!(
        JobRepo::claim(&pool, &queues),
        JobRepo::claim(&pool, &queues),
        JobRepo::claim(&pool, &queues),
        JobRepo::claim(&pool, &queues),
        JobRepo::claim(&pool, &queues),
    );

    let winners: Vec<_> = [a, b, c, d, e]
        .into_iter()
        .map(Result::unwrap)
        .flatten()
        .collect();

    assert_eq!(winners.len(), 1, "exactly one concurrent claim must win");
    assert_eq!(winners[0].job_id, job_id);
}

// ---------------------------------------------------------------------------
// Test: result namespace merge
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn result_fields_merge_last_writer_wins(pool: PgPool) {
    let job_id = submit(&pool, "devices").await;

    let updated = JobRepo::set_result_fields(
        &pool,
        job_id,
        &json!({ "provision_status": 0, "test_status": 1 }),
    )
    .await
    .unwrap();
    assert!(updated);

    JobRepo::set_result_fields(&pool, job_id, &json!({ "test_status": 0 }))
        .await
        .unwrap();

    let fields = JobRepo::get_result_fields(&pool, job_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fields["provision_status"], 0);
    assert_eq!(fields["test_status"], 0);
    // The protected state is merged back into the read under its key.
    assert_eq!(fields["job_state"], JobState::Waiting.as_str());
}

#[sqlx::test]
async fn result_merge_cannot_reach_the_state_column(pool: PgPool) {
    let job_id = submit(&pool, "devices").await;

    // Even a merge that smuggles the reserved key into result_data leaves
    // the state machine untouched; the read reports the column's value.
    JobRepo::set_result_fields(&pool, job_id, &json!({ "job_state": "completed" }))
        .await
        .unwrap();

    let job = JobRepo::find_by_id(&pool, job_id).await.unwrap().unwrap();
    assert_eq!(job.job_state, JobState::Waiting.as_str());

    let fields = JobRepo::get_result_fields(&pool, job_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fields["job_state"], JobState::Waiting.as_str());
}

#[sqlx::test]
async fn result_fields_for_unknown_job(pool: PgPool) {
    assert!(!JobRepo::set_result_fields(&pool, Uuid::new_v4(), &json!({ "x": 1 }))
        .await
        .unwrap());
    assert!(JobRepo::get_result_fields(&pool, Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: conditional state transitions (cancellation)
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn cancel_waiting_job_then_conflict(pool: PgPool) {
    let job_id = submit(&pool, "devices").await;

    let cancelled = JobRepo::update_state(&pool, job_id, &JobState::TERMINAL, JobState::Cancelled)
        .await
        .unwrap();
    assert!(cancelled);

    // Terminal states accept no further transition.
    let again = JobRepo::update_state(&pool, job_id, &JobState::TERMINAL, JobState::Cancelled)
        .await
        .unwrap();
    assert!(!again);
}

#[sqlx::test]
async fn cancel_running_job_succeeds(pool: PgPool) {
    let job_id = submit(&pool, "devices").await;
    JobRepo::claim(&pool, &["devices".to_string()]).await.unwrap();

    let cancelled = JobRepo::update_state(&pool, job_id, &JobState::TERMINAL, JobState::Cancelled)
        .await
        .unwrap();
    assert!(cancelled);

    let job = JobRepo::find_by_id(&pool, job_id).await.unwrap().unwrap();
    assert_eq!(job.job_state, JobState::Cancelled.as_str());
}

#[sqlx::test]
async fn cancelled_job_is_not_claimable(pool: PgPool) {
    let job_id = submit(&pool, "devices").await;
    JobRepo::update_state(&pool, job_id, &JobState::TERMINAL, JobState::Cancelled)
        .await
        .unwrap();

    assert!(JobRepo::claim(&pool, &["devices".to_string()])
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: queue position
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn position_tracks_the_waiting_set_in_order(pool: PgPool) {
    let a = submit(&pool, "devices").await;
    let b = submit(&pool, "devices").await;
    // A job on another queue never shifts the count.
    submit(&pool, "vms").await;

    assert_eq!(JobRepo::waiting_position(&pool, "devices", a).await.unwrap(), Some(0));
    assert_eq!(JobRepo::waiting_position(&pool, "devices", b).await.unwrap(), Some(1));

    let claimed = JobRepo::claim(&pool, &["devices".to_string()])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(claimed.job_id, a);

    // The claimed job leaves the waiting set; the one behind it moves up.
    assert_eq!(JobRepo::waiting_position(&pool, "devices", a).await.unwrap(), None);
    assert_eq!(JobRepo::waiting_position(&pool, "devices", b).await.unwrap(), Some(0));
}

#[sqlx::test]
async fn position_for_unknown_job_is_none(pool: PgPool) {
    submit(&pool, "devices").await;
    assert_eq!(
        JobRepo::waiting_position(&pool, "devices", Uuid::new_v4())
            .await
            .unwrap(),
        None
    );
}
