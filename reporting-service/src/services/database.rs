//! Database service for reporting-service.

use async_trait::async_trait;
use chrono::Utc;
use engine_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{
    AdvancePayment, CreditNote, Invoice, InvoiceQuery, Payment, PaymentMethod, PaymentQuery,
    ReportPeriod, ReportSnapshot,
};
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::store::{DocumentKind, DocumentRef, DocumentStore, ReportStore};

const INVOICE_COLUMNS: &str = "invoice_id, profile_id, vendor_id, vendor_name, invoice_number, \
     description, gross_amount, currency, issue_date, due_date, tds_applicable, tds_percentage, \
     round_up_tds, status, recurring, archived, archived_reason, rejected_reason, created_utc";

const PERIOD_COLUMNS: &str = "period_id, month, year, status, snapshot, finalized_utc, \
     submitted_utc, submitted_to, notes, created_utc";

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "reporting-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    async fn document_exists(&self, doc: DocumentRef) -> Result<bool, AppError> {
        let (table, id_column) = doc_table(doc.kind);
        let sql = format!("SELECT 1 FROM {} WHERE {} = $1", table, id_column);
        let row: Option<i32> = sqlx::query_scalar(&sql)
            .bind(doc.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to check {}: {}", table, e))
            })?;
        Ok(row.is_some())
    }

    /// Map a zero-row conditional update to NotFound or StateConflict.
    async fn transition_conflict(
        &self,
        doc: DocumentRef,
        detail: &str,
    ) -> Result<(), AppError> {
        if self.document_exists(doc).await? {
            Err(AppError::StateConflict(anyhow::anyhow!(
                "{} {} is {}",
                doc.kind.as_str(),
                doc.id,
                detail
            )))
        } else {
            Err(AppError::NotFound(anyhow::anyhow!(
                "{} {} does not exist",
                doc.kind.as_str(),
                doc.id
            )))
        }
    }
}

fn doc_table(kind: DocumentKind) -> (&'static str, &'static str) {
    match kind {
        DocumentKind::Invoice => ("invoices", "invoice_id"),
        DocumentKind::CreditNote => ("credit_notes", "credit_note_id"),
        DocumentKind::AdvancePayment => ("advance_payments", "advance_id"),
    }
}

#[async_trait]
impl DocumentStore for Database {
    #[instrument(skip(self, query))]
    async fn list_invoices(&self, query: &InvoiceQuery) -> Result<Vec<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_invoices"])
            .start_timer();

        let status_str = query.status.map(|s| s.as_str().to_string());
        let sql = format!(
            r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
            WHERE ($1::uuid IS NULL OR profile_id = $1)
              AND ($2::uuid IS NULL OR vendor_id = $2)
              AND ($3::varchar IS NULL OR status = $3)
              AND ($4::date IS NULL OR issue_date >= $4)
              AND ($5::date IS NULL OR issue_date <= $5)
              AND (archived = false OR $6)
            ORDER BY issue_date, created_utc
            "#
        );
        let invoices = sqlx::query_as::<_, Invoice>(&sql)
            .bind(query.profile_id)
            .bind(query.vendor_id)
            .bind(&status_str)
            .bind(query.issued_from)
            .bind(query.issued_to)
            .bind(query.include_archived)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list invoices: {}", e))
            })?;

        timer.observe_duration();
        Ok(invoices)
    }

    #[instrument(skip(self, query))]
    async fn list_payments(&self, query: &PaymentQuery) -> Result<Vec<Payment>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_payments"])
            .start_timer();

        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT payment_id, invoice_id, amount, payment_date, payment_method_id,
                   transaction_ref, tds_applied, round_up_tds, created_utc
            FROM payments
            WHERE ($1::uuid[] IS NULL OR invoice_id = ANY($1))
              AND ($2::date IS NULL OR payment_date >= $2)
              AND ($3::date IS NULL OR payment_date <= $3)
            ORDER BY payment_date, created_utc
            "#,
        )
        .bind(&query.invoice_ids)
        .bind(query.paid_from)
        .bind(query.paid_to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list payments: {}", e)))?;

        timer.observe_duration();
        Ok(payments)
    }

    #[instrument(skip(self))]
    async fn list_credit_notes(
        &self,
        include_archived: bool,
    ) -> Result<Vec<CreditNote>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_credit_notes"])
            .start_timer();

        let notes = sqlx::query_as::<_, CreditNote>(
            r#"
            SELECT credit_note_id, invoice_id, amount, tds_reversal, note_date, status,
                   reason, archived, archived_reason, rejected_reason, created_utc
            FROM credit_notes
            WHERE (archived = false OR $1)
            ORDER BY note_date, created_utc
            "#,
        )
        .bind(include_archived)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list credit notes: {}", e))
        })?;

        timer.observe_duration();
        Ok(notes)
    }

    #[instrument(skip(self))]
    async fn list_advance_payments(
        &self,
        include_archived: bool,
    ) -> Result<Vec<AdvancePayment>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_advance_payments"])
            .start_timer();

        let advances = sqlx::query_as::<_, AdvancePayment>(
            r#"
            SELECT advance_id, invoice_id, amount, payment_method_id, advance_date, status,
                   archived, archived_reason, rejected_reason, created_utc
            FROM advance_payments
            WHERE (archived = false OR $1)
            ORDER BY advance_date, created_utc
            "#,
        )
        .bind(include_archived)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list advances: {}", e))
        })?;

        timer.observe_duration();
        Ok(advances)
    }

    #[instrument(skip(self))]
    async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_payment_methods"])
            .start_timer();

        let methods = sqlx::query_as::<_, PaymentMethod>(
            "SELECT payment_method_id, name, sort_order FROM payment_methods ORDER BY sort_order, name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list payment methods: {}", e))
        })?;

        timer.observe_duration();
        Ok(methods)
    }

    /// Approve a pending document. The conditional update is the
    /// single-writer guard: a raced second approve/reject matches zero
    /// rows and surfaces "no longer pending".
    #[instrument(skip(self), fields(kind = doc.kind.as_str(), id = %doc.id))]
    async fn approve(&self, doc: DocumentRef) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION.with_label_values(&["approve"]).start_timer();

        let (table, id_column) = doc_table(doc.kind);
        let target = match doc.kind {
            DocumentKind::Invoice => "unpaid",
            DocumentKind::CreditNote | DocumentKind::AdvancePayment => "approved",
        };
        let sql = format!(
            "UPDATE {table} SET status = $2 WHERE {id_column} = $1 AND status = 'pending_approval' RETURNING {id_column}"
        );
        let updated: Option<Uuid> = sqlx::query_scalar(&sql)
            .bind(doc.id)
            .bind(target)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to approve: {}", e)))?;

        timer.observe_duration();
        match updated {
            Some(_) => Ok(()),
            None => self.transition_conflict(doc, "no longer pending").await,
        }
    }

    #[instrument(skip(self, reason), fields(kind = doc.kind.as_str(), id = %doc.id))]
    async fn reject(&self, doc: DocumentRef, reason: &str) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION.with_label_values(&["reject"]).start_timer();

        let (table, id_column) = doc_table(doc.kind);
        let sql = format!(
            "UPDATE {table} SET status = 'rejected', rejected_reason = $2 \
             WHERE {id_column} = $1 AND status = 'pending_approval' RETURNING {id_column}"
        );
        let updated: Option<Uuid> = sqlx::query_scalar(&sql)
            .bind(doc.id)
            .bind(reason)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to reject: {}", e)))?;

        timer.observe_duration();
        match updated {
            Some(_) => Ok(()),
            None => self.transition_conflict(doc, "no longer pending").await,
        }
    }

    #[instrument(skip(self, reason), fields(kind = doc.kind.as_str(), id = %doc.id))]
    async fn archive(&self, doc: DocumentRef, reason: &str) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION.with_label_values(&["archive"]).start_timer();

        let (table, id_column) = doc_table(doc.kind);
        let sql = format!(
            "UPDATE {table} SET archived = true, archived_reason = $2 \
             WHERE {id_column} = $1 AND archived = false RETURNING {id_column}"
        );
        let updated: Option<Uuid> = sqlx::query_scalar(&sql)
            .bind(doc.id)
            .bind(reason)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to archive: {}", e)))?;

        timer.observe_duration();
        match updated {
            Some(_) => Ok(()),
            None => self.transition_conflict(doc, "already archived").await,
        }
    }
}

#[async_trait]
impl ReportStore for Database {
    #[instrument(skip(self))]
    async fn get_or_create_period(
        &self,
        month: i32,
        year: i32,
    ) -> Result<ReportPeriod, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_or_create_period"])
            .start_timer();

        sqlx::query(
            r#"
            INSERT INTO report_periods (period_id, month, year, status)
            VALUES ($1, $2, $3, 'draft')
            ON CONFLICT (month, year) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(month)
        .bind(year)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create report period: {}", e))
        })?;

        let sql = format!("SELECT {PERIOD_COLUMNS} FROM report_periods WHERE month = $1 AND year = $2");
        let period = sqlx::query_as::<_, ReportPeriod>(&sql)
            .bind(month)
            .bind(year)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to fetch report period: {}", e))
            })?;

        timer.observe_duration();
        Ok(period)
    }

    #[instrument(skip(self, snapshot, notes))]
    async fn save_snapshot(
        &self,
        month: i32,
        year: i32,
        snapshot: &ReportSnapshot,
        notes: Option<&str>,
    ) -> Result<ReportPeriod, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["save_snapshot"])
            .start_timer();

        // Make sure the row exists so the guard below only ever means
        // "wrong status", not "missing period".
        self.get_or_create_period(month, year).await?;

        let snapshot_json = serde_json::to_value(snapshot).map_err(|e| {
            AppError::InvalidInput(anyhow::anyhow!("Snapshot not serializable: {}", e))
        })?;

        let sql = format!(
            r#"
            UPDATE report_periods
            SET status = 'finalized', snapshot = $3, notes = $4, finalized_utc = $5
            WHERE month = $1 AND year = $2 AND status = 'draft'
            RETURNING {PERIOD_COLUMNS}
            "#
        );
        let period = sqlx::query_as::<_, ReportPeriod>(&sql)
            .bind(month)
            .bind(year)
            .bind(snapshot_json)
            .bind(notes)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to finalize period: {}", e))
            })?;

        timer.observe_duration();
        period.ok_or_else(|| {
            AppError::StateConflict(anyhow::anyhow!(
                "report period {}/{} is no longer draft",
                month,
                year
            ))
        })
    }

    #[instrument(skip(self))]
    async fn mark_submitted(
        &self,
        month: i32,
        year: i32,
        submitted_to: &str,
    ) -> Result<ReportPeriod, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["mark_submitted"])
            .start_timer();

        let sql = format!(
            r#"
            UPDATE report_periods
            SET status = 'submitted', submitted_to = $3, submitted_utc = $4
            WHERE month = $1 AND year = $2 AND status = 'finalized'
            RETURNING {PERIOD_COLUMNS}
            "#
        );
        let period = sqlx::query_as::<_, ReportPeriod>(&sql)
            .bind(month)
            .bind(year)
            .bind(submitted_to)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to submit period: {}", e))
            })?;

        timer.observe_duration();
        period.ok_or_else(|| {
            AppError::StateConflict(anyhow::anyhow!(
                "report period {}/{} is not finalized",
                month,
                year
            ))
        })
    }

    #[instrument(skip(self))]
    async fn clear_snapshot(&self, month: i32, year: i32) -> Result<ReportPeriod, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["clear_snapshot"])
            .start_timer();

        let sql = format!(
            r#"
            UPDATE report_periods
            SET status = 'draft', snapshot = NULL, notes = NULL, finalized_utc = NULL
            WHERE month = $1 AND year = $2 AND status = 'finalized'
            RETURNING {PERIOD_COLUMNS}
            "#
        );
        let period = sqlx::query_as::<_, ReportPeriod>(&sql)
            .bind(month)
            .bind(year)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to reopen period: {}", e))
            })?;

        timer.observe_duration();
        period.ok_or_else(|| {
            AppError::StateConflict(anyhow::anyhow!(
                "report period {}/{} is not finalized",
                month,
                year
            ))
        })
    }
}
