// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! PostgreSQL repository backed by `sqlx`.
//!
//! Ranked queries are executed server-side as a single pass: the filter
//! predicate, the order-by expression (a computed haversine distance for
//! geo ranking) and limit/offset all live in one statement, with the count
//! taken over the same predicate. Units of work map to database
//! transactions; `…_for_update` reads use `SELECT … FOR UPDATE` so a losing
//! concurrent writer blocks and then re-reads committed state.
//!
//! Schema: `migrations/0001_init.sql`.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{Postgres, QueryBuilder, Row, Transaction};

use crate::domain::geo::GeoPoint;
use crate::infrastructure::db::Database;
use crate::domain::gig::{Gig, GigId, GigStatus, Milestone, MilestoneId, MilestoneStatus};
use crate::domain::gig_application::{Application, ApplicationId, ApplicationStatus};
use crate::domain::identity::UserId;
use crate::domain::repository::{GigRepository, GigUnitOfWork, RepositoryError};
use crate::domain::search::{GigFilter, GigOrdering, RankedGigQuery};

pub struct PostgresGigRepository {
    pool: PgPool,
}

impl PostgresGigRepository {
    pub fn new(db: &Database) -> Self {
        Self { pool: db.get_pool().clone() }
    }
}

const GIG_COLUMNS: &str = "id, title, description, pay, deadline, status, categories, \
                           latitude, longitude, employer_id, created_at, updated_at";

fn gig_from_row(row: &PgRow) -> Result<Gig, RepositoryError> {
    let status_str: String = row.try_get("status")?;
    let status = GigStatus::parse(&status_str)
        .ok_or_else(|| RepositoryError::Serialization(format!("unknown gig status {status_str}")))?;
    let latitude: f64 = row.try_get("latitude")?;
    let longitude: f64 = row.try_get("longitude")?;
    let location = GeoPoint::new(latitude, longitude)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

    Ok(Gig {
        id: GigId(row.try_get("id")?),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        pay: row.try_get("pay")?,
        deadline: row.try_get("deadline")?,
        status,
        categories: row.try_get("categories")?,
        location,
        employer_id: UserId(row.try_get("employer_id")?),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn application_from_row(row: &PgRow) -> Result<Application, RepositoryError> {
    let status_str: String = row.try_get("status")?;
    let status = ApplicationStatus::parse(&status_str).ok_or_else(|| {
        RepositoryError::Serialization(format!("unknown application status {status_str}"))
    })?;
    Ok(Application {
        id: ApplicationId(row.try_get("id")?),
        gig_id: GigId(row.try_get("gig_id")?),
        worker_id: UserId(row.try_get("worker_id")?),
        message: row.try_get("message")?,
        status,
        created_at: row.try_get("created_at")?,
    })
}

fn milestone_from_row(row: &PgRow) -> Result<Milestone, RepositoryError> {
    let status_str: String = row.try_get("status")?;
    let status = MilestoneStatus::parse(&status_str).ok_or_else(|| {
        RepositoryError::Serialization(format!("unknown milestone status {status_str}"))
    })?;
    Ok(Milestone {
        id: MilestoneId(row.try_get("id")?),
        gig_id: GigId(row.try_get("gig_id")?),
        title: row.try_get("title")?,
        status,
        completed_by_worker: row.try_get("completed_by_worker")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Append the filter predicate; the same fragment backs both the page query
/// and the count so they can never diverge.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &GigFilter) {
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(category) = &filter.category {
        builder
            .push(" AND ")
            .push_bind(category.clone())
            .push(" = ANY(categories)");
    }
    if let Some(min) = filter.min_pay {
        builder.push(" AND pay >= ").push_bind(min);
    }
    if let Some(max) = filter.max_pay {
        builder.push(" AND pay <= ").push_bind(max);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        builder
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// The haversine `a` term against the gig's stored coordinates.
fn push_haversine_a(builder: &mut QueryBuilder<'_, Postgres>, origin: GeoPoint) {
    builder
        .push("pow(sin(radians((latitude - ")
        .push_bind(origin.latitude)
        .push(") / 2)), 2) + cos(radians(")
        .push_bind(origin.latitude)
        .push(")) * cos(radians(latitude)) * pow(sin(radians((longitude - ")
        .push_bind(origin.longitude)
        .push(") / 2)), 2)");
}

fn push_ordering(builder: &mut QueryBuilder<'_, Postgres>, ordering: &GigOrdering) {
    match ordering {
        GigOrdering::Pay(order) => {
            builder.push(" ORDER BY pay ").push(order.as_sql());
        }
        GigOrdering::Deadline(order) => {
            builder.push(" ORDER BY deadline ").push(order.as_sql());
        }
        GigOrdering::Distance { origin, order } => {
            // d = 2 * R * atan2(sqrt(a), sqrt(1 - a)), computed server-side
            // so ordering happens before limit/offset.
            builder.push(" ORDER BY (2 * 6371 * atan2(sqrt(");
            push_haversine_a(builder, *origin);
            builder.push("), sqrt(1 - (");
            push_haversine_a(builder, *origin);
            builder.push(")))) ").push(order.as_sql());
        }
    }
    // Deterministic pages under ties.
    builder.push(", id ASC");
}

#[async_trait]
impl GigRepository for PostgresGigRepository {
    async fn find_gig(&self, id: GigId) -> Result<Option<Gig>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {GIG_COLUMNS} FROM gigs WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(gig_from_row).transpose()
    }

    async fn find_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, gig_id, worker_id, message, status, created_at \
             FROM applications WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(application_from_row).transpose()
    }

    async fn applications_for_gig(
        &self,
        gig_id: GigId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, gig_id, worker_id, message, status, created_at \
             FROM applications WHERE gig_id = $1 ORDER BY created_at, id",
        )
        .bind(gig_id.0)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(application_from_row).collect()
    }

    async fn milestones_for_gig(&self, gig_id: GigId) -> Result<Vec<Milestone>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, gig_id, title, status, completed_by_worker, created_at \
             FROM milestones WHERE gig_id = $1 ORDER BY created_at, id",
        )
        .bind(gig_id.0)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(milestone_from_row).collect()
    }

    async fn search(&self, query: &RankedGigQuery) -> Result<(Vec<Gig>, u64), RepositoryError> {
        let mut count_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM gigs WHERE TRUE");
        push_filter(&mut count_builder, &query.filter);
        let total: i64 = count_builder
            .build()
            .fetch_one(&self.pool)
            .await?
            .try_get(0)?;

        let mut page_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {GIG_COLUMNS} FROM gigs WHERE TRUE"));
        push_filter(&mut page_builder, &query.filter);
        push_ordering(&mut page_builder, &query.ordering);
        page_builder
            .push(" LIMIT ")
            .push_bind(query.limit() as i64)
            .push(" OFFSET ")
            .push_bind(query.offset() as i64);

        let rows = page_builder.build().fetch_all(&self.pool).await?;
        let gigs = rows.iter().map(gig_from_row).collect::<Result<Vec<_>, _>>()?;
        Ok((gigs, total as u64))
    }

    async fn begin(&self) -> Result<Box<dyn GigUnitOfWork>, RepositoryError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl GigUnitOfWork for PgUnitOfWork {
    async fn gig_for_update(&mut self, id: GigId) -> Result<Option<Gig>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {GIG_COLUMNS} FROM gigs WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.0)
        .fetch_optional(&mut *self.tx)
        .await?;
        row.as_ref().map(gig_from_row).transpose()
    }

    async fn application_for_update(
        &mut self,
        id: ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, gig_id, worker_id, message, status, created_at \
             FROM applications WHERE id = $1 FOR UPDATE",
        )
        .bind(id.0)
        .fetch_optional(&mut *self.tx)
        .await?;
        row.as_ref().map(application_from_row).transpose()
    }

    async fn milestone_for_update(
        &mut self,
        id: MilestoneId,
    ) -> Result<Option<Milestone>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, gig_id, title, status, completed_by_worker, created_at \
             FROM milestones WHERE id = $1 FOR UPDATE",
        )
        .bind(id.0)
        .fetch_optional(&mut *self.tx)
        .await?;
        row.as_ref().map(milestone_from_row).transpose()
    }

    async fn applications_for_gig(
        &mut self,
        gig_id: GigId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, gig_id, worker_id, message, status, created_at \
             FROM applications WHERE gig_id = $1 ORDER BY created_at, id FOR UPDATE",
        )
        .bind(gig_id.0)
        .fetch_all(&mut *self.tx)
        .await?;
        rows.iter().map(application_from_row).collect()
    }

    async fn milestones_for_gig(
        &mut self,
        gig_id: GigId,
    ) -> Result<Vec<Milestone>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, gig_id, title, status, completed_by_worker, created_at \
             FROM milestones WHERE gig_id = $1 ORDER BY created_at, id",
        )
        .bind(gig_id.0)
        .fetch_all(&mut *self.tx)
        .await?;
        rows.iter().map(milestone_from_row).collect()
    }

    async fn insert_gig(&mut self, gig: &Gig) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO gigs (id, title, description, pay, deadline, status, categories, \
             latitude, longitude, employer_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(gig.id.0)
        .bind(&gig.title)
        .bind(&gig.description)
        .bind(gig.pay)
        .bind(gig.deadline)
        .bind(gig.status.as_str())
        .bind(&gig.categories)
        .bind(gig.location.latitude)
        .bind(gig.location.longitude)
        .bind(gig.employer_id.0)
        .bind(gig.created_at)
        .bind(gig.updated_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn insert_milestones(
        &mut self,
        milestones: &[Milestone],
    ) -> Result<(), RepositoryError> {
        for milestone in milestones {
            sqlx::query(
                "INSERT INTO milestones (id, gig_id, title, status, completed_by_worker, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(milestone.id.0)
            .bind(milestone.gig_id.0)
            .bind(&milestone.title)
            .bind(milestone.status.as_str())
            .bind(milestone.completed_by_worker)
            .bind(milestone.created_at)
            .execute(&mut *self.tx)
            .await?;
        }
        Ok(())
    }

    async fn insert_application(
        &mut self,
        application: &Application,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO applications (id, gig_id, worker_id, message, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(application.id.0)
        .bind(application.gig_id.0)
        .bind(application.worker_id.0)
        .bind(&application.message)
        .bind(application.status.as_str())
        .bind(application.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn set_gig_status(
        &mut self,
        id: GigId,
        status: GigStatus,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE gigs SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id.0)
            .bind(status.as_str())
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn set_application_status(
        &mut self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE applications SET status = $2 WHERE id = $1")
            .bind(id.0)
            .bind(status.as_str())
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn reject_pending_siblings(
        &mut self,
        gig_id: GigId,
        keep: ApplicationId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE applications SET status = 'REJECTED' \
             WHERE gig_id = $1 AND id <> $2 AND status = 'PENDING'",
        )
        .bind(gig_id.0)
        .bind(keep.0)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn set_milestone_worker_done(
        &mut self,
        id: MilestoneId,
        done: bool,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE milestones SET completed_by_worker = $2 WHERE id = $1")
            .bind(id.0)
            .bind(done)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn set_milestone_status(
        &mut self,
        id: MilestoneId,
        status: MilestoneStatus,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE milestones SET status = $2 WHERE id = $1")
            .bind(id.0)
            .bind(status.as_str())
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.commit().await?;
        Ok(())
    }
}
