//! Quota-gated recipe generation.
//!
//! No database connection is held while the model runs. The quota is checked
//! up front, then debited after the model returned a usable draft with a
//! conditional write that only lands if nobody else debited in between.

use crate::db::DbPool;
use crate::error::ApiError;
use crate::store::users;
use chrono::{DateTime, Utc};
use diesel::PgConnection;
use sazon_core::generation::{build_request, parse_draft};
use sazon_core::quota::DAILY_GENERATION_LIMIT;
use sazon_core::{evaluate_quota, LlmProvider, QuotaDecision, QuotaState, RecipeDraft};
use uuid::Uuid;

pub const GENERATION_FAILED: &str = "There was an error generating the recipe";

/// Each lost write means another request spent a generation, so this bounds
/// the retries well above what one window allows.
const DEBIT_ATTEMPTS: i32 = DAILY_GENERATION_LIMIT + 2;

pub fn limit_reached_message() -> String {
    format!("Daily limit of {DAILY_GENERATION_LIMIT} recipe generations reached")
}

pub async fn generate(
    pool: &DbPool,
    provider: &dyn LlmProvider,
    user_id: Uuid,
    prompt: &str,
) -> Result<RecipeDraft, ApiError> {
    generate_at(pool, provider, user_id, prompt, Utc::now()).await
}

/// Same as [`generate`] with the clock supplied by the caller.
pub async fn generate_at(
    pool: &DbPool,
    provider: &dyn LlmProvider,
    user_id: Uuid,
    prompt: &str,
    now: DateTime<Utc>,
) -> Result<RecipeDraft, ApiError> {
    let observed = {
        let mut conn = pool.get()?;
        check_quota(&mut conn, user_id, now)?
    };

    let draft = request_draft(provider, prompt).await?;

    let mut conn = pool.get()?;
    let decision = debit_quota(&mut conn, user_id, observed, now)?;

    tracing::info!(
        user_id = %user_id,
        generation_count = decision.next_state().map(|s| s.generation_count),
        window_reset = matches!(decision, QuotaDecision::Reset(_)),
        "generated recipe draft"
    );

    Ok(draft)
}

/// Refuse early when the quota is already spent, so no model call is made.
pub fn check_quota(
    conn: &mut PgConnection,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<QuotaState, ApiError> {
    let quota = users::get_quota(conn, user_id)?;
    if evaluate_quota(&quota, now).next_state().is_none() {
        tracing::info!(user_id = %user_id, "generation quota exhausted");
        return Err(ApiError::TooManyRequests(limit_reached_message()));
    }
    Ok(quota)
}

/// Spend one generation starting from `observed`. When another request wrote
/// the quota first, re-read it and decide again.
pub fn debit_quota(
    conn: &mut PgConnection,
    user_id: Uuid,
    mut observed: QuotaState,
    now: DateTime<Utc>,
) -> Result<QuotaDecision, ApiError> {
    for _ in 0..DEBIT_ATTEMPTS {
        let decision = evaluate_quota(&observed, now);
        let Some(next) = decision.next_state() else {
            tracing::info!(user_id = %user_id, "generation quota spent by a concurrent request");
            return Err(ApiError::TooManyRequests(limit_reached_message()));
        };

        if users::update_generation_quota(conn, user_id, &observed, &next)? {
            return Ok(decision);
        }
        observed = users::get_quota(conn, user_id)?;
    }

    tracing::warn!(user_id = %user_id, "gave up debiting generation quota");
    Err(ApiError::TooManyRequests(limit_reached_message()))
}

async fn request_draft(provider: &dyn LlmProvider, prompt: &str) -> Result<RecipeDraft, ApiError> {
    let text = provider.complete(&build_request(prompt)).await.map_err(|e| {
        tracing::error!(
            error = %e,
            provider = provider.provider_name(),
            model = provider.model_name(),
            "recipe generation request failed"
        );
        ApiError::Upstream(GENERATION_FAILED.to_string())
    })?;

    parse_draft(&text).map_err(|e| {
        tracing::error!(error = %e, "model returned an unusable recipe");
        ApiError::Upstream(GENERATION_FAILED.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_connection, test_pool};
    use crate::store::users::tests::insert_user;
    use async_trait::async_trait;
    use chrono::TimeDelta;
    use sazon_core::llm::{FakeProvider, SAMPLE_RECIPE_JSON};
    use sazon_core::{CompletionRequest, LlmError};
    use std::time::Duration;

    /// Answers like the default fake, after a pause.
    #[derive(Debug)]
    struct SlowProvider(Duration);

    #[async_trait]
    impl LlmProvider for SlowProvider {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
            tokio::time::sleep(self.0).await;
            Ok(SAMPLE_RECIPE_JSON.to_string())
        }

        fn provider_name(&self) -> &'static str {
            "slow"
        }

        fn model_name(&self) -> &str {
            "slow-model"
        }
    }

    fn user_in_pool(pool: &DbPool, email: &str) -> Uuid {
        insert_user(&mut pool.get().unwrap(), email)
    }

    fn quota(pool: &DbPool, user: Uuid) -> QuotaState {
        users::get_quota(&mut pool.get().unwrap(), user).unwrap()
    }

    fn set_quota(conn: &mut PgConnection, user: Uuid, next: QuotaState) {
        let current = users::get_quota(conn, user).unwrap();
        assert!(users::update_generation_quota(conn, user, &current, &next).unwrap());
    }

    #[tokio::test]
    async fn test_fourth_generation_in_window_is_rejected() {
        let Some(pool) = test_pool() else {
            return;
        };
        let user = user_in_pool(&pool, "gen@example.com");
        let provider = FakeProvider::default();
        let start = Utc::now();

        for expected in 1..=3 {
            let draft = generate_at(&pool, &provider, user, "tomato rice", start)
                .await
                .unwrap();
            assert_eq!(draft.name, "Tomato Rice");
            assert_eq!(quota(&pool, user).generation_count, expected);
        }

        let err = generate_at(&pool, &provider, user, "tomato rice", start)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::TooManyRequests(ref m) if *m == limit_reached_message()));
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_window_expiry_resets_count() {
        let Some(pool) = test_pool() else {
            return;
        };
        let user = user_in_pool(&pool, "reset@example.com");
        let now = Utc::now();
        set_quota(
            &mut pool.get().unwrap(),
            user,
            QuotaState {
                generation_count: 3,
                last_generation_at: now - TimeDelta::hours(25),
            },
        );

        generate_at(&pool, &FakeProvider::default(), user, "soup", now)
            .await
            .unwrap();

        let after = quota(&pool, user);
        assert_eq!(after.generation_count, 1);
        assert_eq!(
            after.last_generation_at.timestamp_micros(),
            now.timestamp_micros()
        );
    }

    #[tokio::test]
    async fn test_provider_failure_leaves_quota_untouched() {
        let Some(pool) = test_pool() else {
            return;
        };
        let user = user_in_pool(&pool, "fail@example.com");
        let before = quota(&pool, user);

        let err = generate_at(&pool, &FakeProvider::new(), user, "anything", Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Upstream(ref m) if m == GENERATION_FAILED));
        assert_eq!(quota(&pool, user), before);
    }

    #[tokio::test]
    async fn test_unparseable_draft_leaves_quota_untouched() {
        let Some(pool) = test_pool() else {
            return;
        };
        let user = user_in_pool(&pool, "garbled@example.com");
        let provider = FakeProvider::new().with_default_response("Sure! Here is a recipe:");

        let err = generate_at(&pool, &provider, user, "anything", Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Upstream(_)));
        assert_eq!(quota(&pool, user).generation_count, 0);
    }

    #[tokio::test]
    async fn test_concurrent_generations_cannot_share_last_slot() {
        let Some(pool) = test_pool() else {
            return;
        };
        let user = user_in_pool(&pool, "race@example.com");
        let now = Utc::now();
        set_quota(
            &mut pool.get().unwrap(),
            user,
            QuotaState {
                generation_count: 2,
                last_generation_at: now - TimeDelta::hours(1),
            },
        );

        // The pool has one connection, so both calls can only be in flight
        // together if neither keeps it while the model runs.
        let provider = SlowProvider(Duration::from_millis(200));
        let (first, second) = tokio::join!(
            generate_at(&pool, &provider, user, "stew", now),
            generate_at(&pool, &provider, user, "stew", now),
        );

        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(ApiError::TooManyRequests(_)))));
        assert_eq!(quota(&pool, user).generation_count, 3);
    }

    #[tokio::test]
    async fn test_connection_is_free_while_model_runs() {
        let Some(pool) = test_pool() else {
            return;
        };
        let user = user_in_pool(&pool, "idle@example.com");
        let provider = SlowProvider(Duration::from_millis(200));

        let generation = generate_at(&pool, &provider, user, "stew", Utc::now());
        let other_request = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            users::get_profile(&mut pool.get().unwrap(), user).map(|p| p.id)
        };
        let (draft, profile) = tokio::join!(generation, other_request);

        assert!(draft.is_ok());
        assert_eq!(profile.unwrap(), user);
    }

    #[test]
    fn test_lost_write_retries_from_fresh_quota() {
        let Some(mut conn) = test_connection() else {
            return;
        };
        let user = insert_user(&mut conn, "retry@example.com");
        let now = Utc::now();
        set_quota(
            &mut conn,
            user,
            QuotaState {
                generation_count: 1,
                last_generation_at: now - TimeDelta::hours(2),
            },
        );

        let first = check_quota(&mut conn, user, now).unwrap();
        let second = check_quota(&mut conn, user, now).unwrap();

        debit_quota(&mut conn, user, first, now).unwrap();
        // `second` is stale but a slot is still left, so it is spent too.
        debit_quota(&mut conn, user, second, now).unwrap();
        assert_eq!(users::get_quota(&mut conn, user).unwrap().generation_count, 3);

        let stale = QuotaState {
            generation_count: 2,
            last_generation_at: now - TimeDelta::hours(2),
        };
        assert!(matches!(
            debit_quota(&mut conn, user, stale, now),
            Err(ApiError::TooManyRequests(_))
        ));
        assert_eq!(users::get_quota(&mut conn, user).unwrap().generation_count, 3);
    }
}
