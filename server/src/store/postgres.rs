use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};

use crate::models::{NewTicket, Ticket, TicketStatus};

use super::{DirectoryFilter, StatusCounts, StoreError, StoreResult, TicketStore};

const TICKET_COLUMNS: &str = "id, name, external_id, code, status, expires_at, created_at";

#[derive(Clone)]
pub struct PgTicketStore {
    pool: PgPool,
}

impl PgTicketStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        tracing::info!("Successfully connected to database");

        sqlx::migrate!().run(&pool).await?;

        tracing::info!("Migrations run successfully");

        Ok(Self::new(pool))
    }
}

fn map_insert_error(error: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            return StoreError::DuplicateCode;
        }
    }
    StoreError::Database(error)
}

/// Escape LIKE metacharacters so the search term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl TicketStore for PgTicketStore {
    async fn insert(&self, ticket: NewTicket) -> StoreResult<Ticket> {
        let sql = format!(
            "INSERT INTO tickets (name, external_id, code, status, expires_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {TICKET_COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&sql)
            .bind(ticket.name)
            .bind(ticket.external_id)
            .bind(ticket.code)
            .bind(TicketStatus::Valid.as_str())
            .bind(ticket.expires_at)
            .bind(ticket.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_insert_error)
    }

    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Ticket>> {
        let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE code = $1");
        let ticket = sqlx::query_as::<_, Ticket>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ticket)
    }

    async fn mark_used(&self, code: &str, now: DateTime<Utc>) -> StoreResult<Option<Ticket>> {
        let sql = format!(
            "UPDATE tickets SET status = $1 \
             WHERE code = $2 AND status = $3 AND expires_at >= $4 \
             RETURNING {TICKET_COLUMNS}"
        );
        let ticket = sqlx::query_as::<_, Ticket>(&sql)
            .bind(TicketStatus::Used.as_str())
            .bind(code)
            .bind(TicketStatus::Valid.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ticket)
    }

    async fn count_by_status(&self) -> StoreResult<StatusCounts> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM tickets GROUP BY status")
                .fetch_all(&self.pool)
                .await?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            counts.add(&status, count);
        }
        Ok(counts)
    }

    async fn search(&self, filter: &DirectoryFilter) -> StoreResult<Vec<Ticket>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE TRUE"));

        if let Some(search) = &filter.search {
            let pattern = like_pattern(search);
            query
                .push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR external_id ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        if let Some(status) = &filter.status {
            query.push(" AND status = ").push_bind(status.clone());
        }

        query.push(" ORDER BY created_at DESC, id DESC");

        let tickets = query
            .build_query_as::<Ticket>()
            .fetch_all(&self.pool)
            .await?;
        Ok(tickets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ticket_validity;
    use crate::services::{generate_code, verify, VerificationOutcome};
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ali"), "%ali%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    // The tests below share one database, so every ticket gets a fresh code
    // and searches are scoped to a per-test name prefix.

    async fn store() -> PgTicketStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at PostgreSQL");
        PgTicketStore::connect(&url, 20)
            .await
            .expect("Failed to connect to database")
    }

    /// Whole seconds, so the value survives the microsecond column unchanged.
    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()
    }

    fn tag() -> String {
        Uuid::new_v4().simple().to_string()
    }

    async fn insert(store: &PgTicketStore, name: &str, created_at: DateTime<Utc>) -> Ticket {
        store
            .insert(NewTicket {
                name: name.to_string(),
                external_id: "E1".to_string(),
                code: generate_code(),
                expires_at: created_at + ticket_validity(),
                created_at,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    #[ignore] // Requires PostgreSQL running (DATABASE_URL)
    async fn test_mark_used_respects_expiry_boundary() {
        let store = store().await;

        let late = insert(&store, &tag(), t0()).await;
        let after = late.expires_at + Duration::seconds(1);
        assert_eq!(store.mark_used(&late.code, after).await.unwrap(), None);
        let unchanged = store.find_by_code(&late.code).await.unwrap().unwrap();
        assert_eq!(unchanged.status, TicketStatus::Valid);

        let on_time = insert(&store, &tag(), t0()).await;
        let used = store
            .mark_used(&on_time.code, on_time.expires_at)
            .await
            .unwrap()
            .expect("the expiry instant is still valid");
        assert_eq!(used.status, TicketStatus::Used);
        assert_eq!(store.mark_used(&on_time.code, t0()).await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore] // Requires PostgreSQL running (DATABASE_URL)
    async fn test_concurrent_checks_admit_a_ticket_once() {
        let store = store().await;
        let ticket = insert(&store, &tag(), t0()).await;

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                let code = ticket.code.clone();
                tokio::spawn(async move { verify(&store, &code, t0()).await.unwrap() })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                VerificationOutcome::Valid(_) => admitted += 1,
                VerificationOutcome::AlreadyUsed => {}
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert_eq!(admitted, 1);
    }

    #[tokio::test]
    #[ignore] // Requires PostgreSQL running (DATABASE_URL)
    async fn test_duplicate_code_is_reported() {
        let store = store().await;
        let ticket = insert(&store, &tag(), t0()).await;

        let err = store
            .insert(NewTicket {
                name: "Bob".to_string(),
                external_id: "E2".to_string(),
                code: ticket.code.clone(),
                expires_at: ticket.expires_at,
                created_at: t0(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateCode), "got {err:?}");
    }

    #[tokio::test]
    #[ignore] // Requires PostgreSQL running (DATABASE_URL)
    async fn test_search_treats_percent_literally() {
        let store = store().await;
        let tag = tag();
        let discount = insert(&store, &format!("{tag} 50% off"), t0()).await;
        insert(&store, &format!("{tag} 50 off"), t0()).await;

        let found = store
            .search(&DirectoryFilter::from_params(Some(&format!("{tag} 50%")), None))
            .await
            .unwrap();
        assert_eq!(found, vec![discount]);
    }

    #[tokio::test]
    #[ignore] // Requires PostgreSQL running (DATABASE_URL)
    async fn test_search_and_status_filters_intersect() {
        let store = store().await;
        let tag = tag();
        let alice = insert(&store, &format!("{tag}-alice"), t0()).await;
        let alicia = insert(&store, &format!("{tag}-alicia"), t0() + Duration::minutes(1)).await;
        insert(&store, &format!("{tag}-bob"), t0() + Duration::minutes(2)).await;
        let alicia = store.mark_used(&alicia.code, t0()).await.unwrap().unwrap();

        let prefix = format!("{tag}-ALI");
        let both = store
            .search(&DirectoryFilter::from_params(Some(&prefix), None))
            .await
            .unwrap();
        assert_eq!(both, vec![alicia.clone(), alice]);

        let used = store
            .search(&DirectoryFilter::from_params(Some(&prefix), Some("utilise")))
            .await
            .unwrap();
        assert_eq!(used, vec![alicia]);
    }
}
