//! SQL implementation of the appointment repository

use crate::error::DbError;
use crate::repositories::appointment::{AppointmentPage, AppointmentRepository};
use crate::DbClient;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use slotbook_common::models::{Appointment, AppointmentChanges, AppointmentStatus, NewAppointment};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};

const DATE_FORMAT: &str = "%Y-%m-%d";

const COLUMNS: &str = "booking_id, customer_name, customer_email, appointment_date, \
     appointment_time, duration, status, notes, created_at, updated_at";

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS appointments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        booking_id TEXT NOT NULL UNIQUE,
        customer_name TEXT NOT NULL,
        customer_email TEXT NOT NULL,
        appointment_date TEXT NOT NULL,
        appointment_time TEXT NOT NULL,
        duration INTEGER NOT NULL DEFAULT 30 CHECK (duration > 0),
        status TEXT NOT NULL DEFAULT 'confirmed'
            CHECK (status IN ('confirmed', 'pending', 'cancelled')),
        notes TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_appointments_date_time \
     ON appointments (appointment_date, appointment_time)",
    "CREATE INDEX IF NOT EXISTS idx_appointments_email ON appointments (customer_email)",
    // One live booking per slot; cancelled rows keep their history.
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_active_slot \
     ON appointments (appointment_date, appointment_time) WHERE status <> 'cancelled'",
];

/// SQL implementation of the appointment repository
#[derive(Debug, Clone)]
pub struct SqlAppointmentRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlAppointmentRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    /// The underlying client, for health probes and shutdown.
    pub fn client(&self) -> &DbClient {
        &self.db_client
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn corrupt(err: impl std::fmt::Display) -> DbError {
    DbError::CorruptRow(err.to_string())
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| corrupt(format!("bad timestamp '{}': {}", raw, e)))
}

fn row_to_appointment(row: &AnyRow) -> Result<Appointment, DbError> {
    let date: String = row.try_get("appointment_date").map_err(corrupt)?;
    let status: String = row.try_get("status").map_err(corrupt)?;
    let notes: String = row.try_get("notes").map_err(corrupt)?;
    let created_at: String = row.try_get("created_at").map_err(corrupt)?;
    let updated_at: String = row.try_get("updated_at").map_err(corrupt)?;

    Ok(Appointment {
        booking_id: row.try_get("booking_id").map_err(corrupt)?,
        customer_name: row.try_get("customer_name").map_err(corrupt)?,
        customer_email: row.try_get("customer_email").map_err(corrupt)?,
        appointment_date: NaiveDate::parse_from_str(&date, DATE_FORMAT)
            .map_err(|e| corrupt(format!("bad date '{}': {}", date, e)))?,
        appointment_time: row.try_get("appointment_time").map_err(corrupt)?,
        duration: row.try_get("duration").map_err(corrupt)?,
        status: status.parse::<AppointmentStatus>().map_err(corrupt)?,
        // Empty notes are stored as '' rather than NULL
        notes: if notes.is_empty() { None } else { Some(notes) },
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn rows_to_appointments(rows: &[AnyRow]) -> Result<Vec<Appointment>, DbError> {
    rows.iter().map(row_to_appointment).collect()
}

impl AppointmentRepository for SqlAppointmentRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing appointment schema");

        for statement in SCHEMA {
            self.db_client.execute(statement).await?;
        }

        info!("Appointment schema initialized successfully");
        Ok(())
    }

    async fn insert(&self, appointment: &NewAppointment) -> Result<Appointment, DbError> {
        debug!(
            "Inserting appointment {} on {} at {}",
            appointment.booking_id, appointment.appointment_date, appointment.appointment_time
        );

        let query = format!(
            "INSERT INTO appointments ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        let now = now_timestamp();

        let row = sqlx::query(&query)
            .bind(appointment.booking_id.as_str())
            .bind(appointment.customer_name.as_str())
            .bind(appointment.customer_email.as_str())
            .bind(format_date(appointment.appointment_date))
            .bind(appointment.appointment_time.as_str())
            .bind(appointment.duration)
            .bind(appointment.status.as_str())
            .bind(appointment.notes.clone().unwrap_or_default())
            .bind(now.as_str())
            .bind(now.as_str())
            .fetch_one(self.db_client.pool())
            .await
            .map_err(|e| {
                let err = DbError::from_write(e);
                match err {
                    DbError::SlotTaken | DbError::DuplicateBookingId => {
                        debug!("Insert rejected by unique index: {}", err)
                    }
                    _ => error!("Failed to insert appointment: {}", err),
                }
                err
            })?;

        let inserted = row_to_appointment(&row)?;
        info!("Appointment {} created", inserted.booking_id);
        Ok(inserted)
    }

    async fn find_by_booking_id(&self, booking_id: &str) -> Result<Option<Appointment>, DbError> {
        debug!("Finding appointment by booking id: {}", booking_id);

        let query = format!("SELECT {COLUMNS} FROM appointments WHERE booking_id = $1");

        let row = sqlx::query(&query)
            .bind(booking_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find appointment: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        row.as_ref().map(row_to_appointment).transpose()
    }

    async fn find_active_on_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, DbError> {
        debug!("Finding active appointments on {}", date);

        let query = format!(
            "SELECT {COLUMNS} FROM appointments \
             WHERE appointment_date = $1 AND status <> 'cancelled' \
             ORDER BY appointment_time ASC"
        );

        let rows = sqlx::query(&query)
            .bind(format_date(date))
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find appointments on {}: {}", date, e);
                DbError::QueryError(e.to_string())
            })?;

        rows_to_appointments(&rows)
    }

    async fn find_active_at(
        &self,
        date: NaiveDate,
        time: &str,
        exclude_booking_id: Option<&str>,
    ) -> Result<Option<Appointment>, DbError> {
        debug!(
            "Checking slot {} {} (excluding {:?})",
            date, time, exclude_booking_id
        );

        let base = format!(
            "SELECT {COLUMNS} FROM appointments \
             WHERE appointment_date = $1 AND appointment_time = $2 AND status <> 'cancelled'"
        );

        let result = match exclude_booking_id {
            Some(excluded) => {
                let query = format!("{base} AND booking_id <> $3 LIMIT 1");
                sqlx::query(&query)
                    .bind(format_date(date))
                    .bind(time)
                    .bind(excluded)
                    .fetch_optional(self.db_client.pool())
                    .await
            }
            None => {
                let query = format!("{base} LIMIT 1");
                sqlx::query(&query)
                    .bind(format_date(date))
                    .bind(time)
                    .fetch_optional(self.db_client.pool())
                    .await
            }
        };

        let row = result.map_err(|e| {
            error!("Failed to check slot: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        row.as_ref().map(row_to_appointment).transpose()
    }

    async fn list(
        &self,
        page: u32,
        limit: u32,
        status: Option<AppointmentStatus>,
    ) -> Result<AppointmentPage, DbError> {
        debug!(
            "Listing appointments: page {}, limit {}, status {:?}",
            page, limit, status
        );

        let limit = i64::from(limit.max(1));
        let offset = i64::from(page.max(1) - 1).saturating_mul(limit);

        let (rows, total) = match status {
            Some(status) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM appointments WHERE status = $1 \
                     ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
                );
                let rows = sqlx::query(&query)
                    .bind(status.as_str())
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(self.db_client.pool())
                    .await;
                let total = sqlx::query("SELECT COUNT(*) AS total FROM appointments WHERE status = $1")
                    .bind(status.as_str())
                    .fetch_one(self.db_client.pool())
                    .await;
                (rows, total)
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM appointments \
                     ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
                );
                let rows = sqlx::query(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(self.db_client.pool())
                    .await;
                let total = sqlx::query("SELECT COUNT(*) AS total FROM appointments")
                    .fetch_one(self.db_client.pool())
                    .await;
                (rows, total)
            }
        };

        let rows = rows.map_err(|e| {
            error!("Failed to list appointments: {}", e);
            DbError::QueryError(e.to_string())
        })?;
        let total: i64 = total
            .and_then(|row| row.try_get("total"))
            .map_err(|e| {
                error!("Failed to count appointments: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        Ok(AppointmentPage {
            appointments: rows_to_appointments(&rows)?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn update(
        &self,
        booking_id: &str,
        changes: &AppointmentChanges,
    ) -> Result<Option<Appointment>, DbError> {
        debug!("Updating appointment {}: {:?}", booking_id, changes);

        // Each column pairs a "supplied" flag with its new value.
        let query = format!(
            "UPDATE appointments SET \
                customer_name = CASE WHEN $1 THEN $2 ELSE customer_name END, \
                customer_email = CASE WHEN $3 THEN $4 ELSE customer_email END, \
                duration = CASE WHEN $5 THEN $6 ELSE duration END, \
                notes = CASE WHEN $7 THEN $8 ELSE notes END, \
                appointment_date = CASE WHEN $9 THEN $10 ELSE appointment_date END, \
                appointment_time = CASE WHEN $11 THEN $12 ELSE appointment_time END, \
                updated_at = $13 \
             WHERE booking_id = $14 AND status <> 'cancelled' \
             RETURNING {COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(changes.customer_name.is_some())
            .bind(changes.customer_name.clone().unwrap_or_default())
            .bind(changes.customer_email.is_some())
            .bind(changes.customer_email.clone().unwrap_or_default())
            .bind(changes.duration.is_some())
            .bind(changes.duration.unwrap_or_default())
            .bind(changes.notes.is_some())
            .bind(changes.notes.clone().flatten().unwrap_or_default())
            .bind(changes.appointment_date.is_some())
            .bind(changes.appointment_date.map(format_date).unwrap_or_default())
            .bind(changes.appointment_time.is_some())
            .bind(changes.appointment_time.clone().unwrap_or_default())
            .bind(now_timestamp())
            .bind(booking_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                let err = DbError::from_write(e);
                if !matches!(err, DbError::SlotTaken) {
                    error!("Failed to update appointment {}: {}", booking_id, err);
                }
                err
            })?;

        match row {
            Some(row) => {
                let updated = row_to_appointment(&row)?;
                info!("Appointment {} updated", booking_id);
                Ok(Some(updated))
            }
            None => {
                debug!("No active appointment {} to update", booking_id);
                Ok(None)
            }
        }
    }

    async fn cancel(&self, booking_id: &str, notes: &str) -> Result<Option<Appointment>, DbError> {
        debug!("Cancelling appointment {}", booking_id);

        let query = format!(
            "UPDATE appointments SET status = 'cancelled', notes = $1, updated_at = $2 \
             WHERE booking_id = $3 AND status <> 'cancelled' \
             RETURNING {COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(notes)
            .bind(now_timestamp())
            .bind(booking_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to cancel appointment {}: {}", booking_id, e);
                DbError::QueryError(e.to_string())
            })?;

        match row {
            Some(row) => {
                let cancelled = row_to_appointment(&row)?;
                info!("Appointment {} cancelled", booking_id);
                Ok(Some(cancelled))
            }
            None => Ok(None),
        }
    }
}
