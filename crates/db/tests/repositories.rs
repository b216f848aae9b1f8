//! Integration tests for the repository layer.
//!
//! Exercises the repositories against a real database:
//! - Job creation defaults and org-scoped lookups
//! - Listing with status filter and pagination
//! - API key resolution by hash (active flag, last_used_at stamping)
//! - Unique constraint behaviour

use sqlx::PgPool;

use scrybe_core::JobType;
use scrybe_db::models::job::{CreateJob, JobListQuery, SubmitJob};
use scrybe_db::repositories::{ApiKeyRepo, JobRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_org_and_user(pool: &PgPool, tag: &str) -> (String, String) {
    let org_id = format!("org_{tag}");
    let user_id = format!("usr_{tag}");

    sqlx::query("INSERT INTO organizations (id, name) VALUES ($1, $2)")
        .bind(&org_id)
        .bind(format!("Org {tag}"))
        .execute(pool)
        .await
        .unwrap();

    sqlx::query("INSERT INTO users (id, organization_id, email) VALUES ($1, $2, $3)")
        .bind(&user_id)
        .bind(&org_id)
        .bind(format!("{tag}@example.com"))
        .execute(pool)
        .await
        .unwrap();

    (org_id, user_id)
}

fn submit(job_type: JobType, file_name: &str) -> SubmitJob {
    SubmitJob {
        job_type,
        file_name: Some(file_name.to_string()),
        file_size: Some(2048),
        mime_type: Some("application/pdf".to_string()),
        source_url: None,
        schema_id: None,
        extraction_hints: None,
    }
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn created_jobs_start_pending_with_a_prefixed_id(pool: PgPool) {
    let (org_id, user_id) = seed_org_and_user(&pool, "j1").await;

    let input = submit(JobType::Parse, "doc.pdf");
    let job = JobRepo::create(
        &pool,
        &CreateJob {
            organization_id: &org_id,
            user_id: &user_id,
            api_key_id: None,
            input: &input,
        },
    )
    .await
    .unwrap();

    assert!(job.id.starts_with("job_"));
    assert_eq!(job.status, "pending");
    assert_eq!(job.job_type, "parse");
    assert_eq!(job.retry_count, 0);
    assert!(job.started_at.is_none());
    assert_eq!(job.file_name.as_deref(), Some("doc.pdf"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_for_org_filters_by_status_and_paginates(pool: PgPool) {
    let (org_id, user_id) = seed_org_and_user(&pool, "j2").await;

    for i in 0..3 {
        let input = submit(JobType::Parse, &format!("doc-{i}.pdf"));
        JobRepo::create(
            &pool,
            &CreateJob {
                organization_id: &org_id,
                user_id: &user_id,
                api_key_id: None,
                input: &input,
            },
        )
        .await
        .unwrap();
    }

    let all = JobRepo::list_for_org(&pool, &org_id, &JobListQuery::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let pending = JobRepo::list_for_org(
        &pool,
        &org_id,
        &JobListQuery {
            status: Some("pending".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(pending.len(), 3);

    let completed = JobRepo::list_for_org(
        &pool,
        &org_id,
        &JobListQuery {
            status: Some("completed".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(completed.is_empty());

    let page = JobRepo::list_for_org(
        &pool,
        &org_id,
        &JobListQuery {
            status: None,
            limit: Some(2),
            offset: Some(2),
        },
    )
    .await
    .unwrap();
    assert_eq!(page.len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn listing_is_scoped_to_the_organization(pool: PgPool) {
    let (org_a, user_a) = seed_org_and_user(&pool, "j3a").await;
    let (org_b, _user_b) = seed_org_and_user(&pool, "j3b").await;

    let input = submit(JobType::Extract, "invoice.pdf");
    JobRepo::create(
        &pool,
        &CreateJob {
            organization_id: &org_a,
            user_id: &user_a,
            api_key_id: None,
            input: &input,
        },
    )
    .await
    .unwrap();

    let foreign = JobRepo::list_for_org(&pool, &org_b, &JobListQuery::default())
        .await
        .unwrap();
    assert!(foreign.is_empty());
}

// ---------------------------------------------------------------------------
// API keys
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn active_key_resolves_by_hash_and_stamps_last_used(pool: PgPool) {
    let (org_id, user_id) = seed_org_and_user(&pool, "k1").await;

    let created = ApiKeyRepo::create(&pool, &org_id, &user_id, "ci key", "hash-k1", "sk_live")
        .await
        .unwrap();
    assert!(created.last_used_at.is_none());

    let found = ApiKeyRepo::find_active_by_hash(&pool, "hash-k1")
        .await
        .unwrap()
        .expect("key should resolve");
    assert_eq!(found.id, created.id);
    assert!(found.last_used_at.is_some());

    assert!(ApiKeyRepo::find_active_by_hash(&pool, "hash-unknown")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn revoked_keys_do_not_resolve(pool: PgPool) {
    let (org_id, user_id) = seed_org_and_user(&pool, "k2").await;

    let key = ApiKeyRepo::create(&pool, &org_id, &user_id, "old key", "hash-k2", "sk_live")
        .await
        .unwrap();

    sqlx::query("UPDATE api_keys SET is_active = FALSE WHERE id = $1")
        .bind(&key.id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(ApiKeyRepo::find_active_by_hash(&pool, "hash-k2")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_user_email_violates_unique_constraint(pool: PgPool) {
    let (org_id, _user_id) = seed_org_and_user(&pool, "c1").await;

    let err = sqlx::query("INSERT INTO users (id, organization_id, email) VALUES ($1, $2, $3)")
        .bind("usr_c1_dup")
        .bind(&org_id)
        .bind("c1@example.com")
        .execute(&pool)
        .await
        .unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_users_email"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_key_hash_violates_unique_constraint(pool: PgPool) {
    let (org_id, user_id) = seed_org_and_user(&pool, "c2").await;

    ApiKeyRepo::create(&pool, &org_id, &user_id, "first", "hash-c2", "sk_live")
        .await
        .unwrap();
    let err = ApiKeyRepo::create(&pool, &org_id, &user_id, "second", "hash-c2", "sk_live")
        .await
        .unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("uq_api_keys_key_hash"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}
