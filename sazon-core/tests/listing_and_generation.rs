//! Contract tests for keyset pagination and the quota-gated generation flow,
//! driven through the public API only.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use sazon_core::generation::{build_request, parse_draft};
use sazon_core::llm::{FakeProvider, LlmProvider};
use sazon_core::{evaluate_quota, split_page, Cursor, Keyed, QuotaDecision, QuotaState};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
struct Listed {
    id: Uuid,
    created_at: DateTime<Utc>,
}

impl Keyed for Listed {
    fn cursor(&self) -> Cursor {
        Cursor {
            created_at: self.created_at,
            id: self.id,
        }
    }
}

/// Stand-in for the SQL query: filter by cursor, order DESC, take `limit + 1`.
fn fetch(table: &[Listed], cursor: Option<&Cursor>, limit: usize) -> Vec<Listed> {
    let mut rows: Vec<Listed> = table
        .iter()
        .filter(|r| cursor.map_or(true, |c| (r.created_at, r.id) < (c.created_at, c.id)))
        .cloned()
        .collect();
    rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
    rows.truncate(limit + 1);
    rows
}

fn table_with_ties(n: u128) -> Vec<Listed> {
    let base = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
    (0..n)
        .map(|i| Listed {
            id: Uuid::from_u128(1000 + i * 7919 % 97),
            // groups of three rows share a timestamp
            created_at: base + TimeDelta::seconds((i / 3) as i64),
        })
        .collect()
}

#[test]
fn paging_visits_every_row_once_in_order() {
    for (n, k) in [(0u128, 3usize), (1, 3), (7, 3), (9, 3), (10, 1), (25, 10), (12, 50)] {
        let table = table_with_ties(n);

        let mut expected = table.clone();
        expected.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        let mut seen = Vec::new();
        let mut pages = 0;
        let mut cursor: Option<Cursor> = None;

        loop {
            let page = split_page(fetch(&table, cursor.as_ref(), k), k);
            pages += 1;
            seen.extend(page.data);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        assert_eq!(seen, expected, "n={n} k={k}");
        let expected_pages = std::cmp::max(1, (n as usize).div_ceil(k));
        assert_eq!(pages, expected_pages, "n={n} k={k}");
    }
}

#[tokio::test]
async fn quota_gates_provider_calls() {
    let provider = FakeProvider::default();
    let start = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();
    let mut stored = QuotaState {
        generation_count: 0,
        last_generation_at: DateTime::<Utc>::UNIX_EPOCH,
    };

    for hour in 0..4 {
        let now = start + TimeDelta::hours(hour);
        match evaluate_quota(&stored, now) {
            QuotaDecision::Exceeded => break,
            decision => {
                let text = provider
                    .complete(&build_request("arroz con tomate"))
                    .await
                    .unwrap();
                parse_draft(&text).unwrap();
                stored = decision.next_state().unwrap();
            }
        }
    }

    assert_eq!(provider.call_count(), 3);
    assert_eq!(stored.generation_count, 3);
    assert_eq!(stored.last_generation_at, start);

    let next_day = start + TimeDelta::hours(24);
    assert_eq!(
        evaluate_quota(&stored, next_day).next_state(),
        Some(QuotaState {
            generation_count: 1,
            last_generation_at: next_day,
        })
    );
}
