//! PostgreSQL implementation of DonationRepository.
//!
//! Prime and periodic donations live in `prime_donations` and
//! `periodic_donations`; both tables share one column layout.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::donation::{
    Amount, CardInfo, Cardholder, ChargeStatus, Currency, Donation, DonationKind, DonationPatch,
    Frequency, OrderNumber, PayMethod, PeriodicStatus, SendReceipt,
};
use crate::domain::foundation::{DomainError, DonationId, ErrorCode, Timestamp, UserId};
use crate::ports::{DonationPage, DonationQuery, DonationRepository};

const COLUMNS: &str = "id, order_number, amount, currency, details, pay_method, frequency, \
    periodic_status, cardholder_email, cardholder_name, cardholder_phone_number, \
    cardholder_address, cardholder_national_id, cardholder_zip_code, card_bin_code, \
    card_last_four, card_funding, card_issuer, card_type, card_country, notes, send_receipt, \
    to_feedback, status, transaction_id, owner_id, created_at, updated_at";

fn table_for(kind: DonationKind) -> &'static str {
    match kind {
        DonationKind::Prime => "prime_donations",
        DonationKind::Periodic => "periodic_donations",
    }
}

/// PostgreSQL implementation of the DonationRepository port.
pub struct PostgresDonationRepository {
    pool: PgPool,
}

impl PostgresDonationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a donation.
#[derive(Debug, sqlx::FromRow)]
struct DonationRow {
    id: Uuid,
    order_number: String,
    amount: i64,
    currency: String,
    details: String,
    pay_method: String,
    frequency: Option<String>,
    periodic_status: Option<String>,
    cardholder_email: String,
    cardholder_name: Option<String>,
    cardholder_phone_number: Option<String>,
    cardholder_address: Option<String>,
    cardholder_national_id: Option<String>,
    cardholder_zip_code: Option<String>,
    card_bin_code: String,
    card_last_four: String,
    card_funding: i64,
    card_issuer: Option<String>,
    card_type: Option<i64>,
    card_country: Option<String>,
    notes: Option<String>,
    send_receipt: String,
    to_feedback: bool,
    status: String,
    transaction_id: String,
    owner_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn corrupt(column: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} value: {}", column, err),
    )
}

impl DonationRow {
    fn into_donation(self, kind: DonationKind) -> Result<Donation, DomainError> {
        let frequency = self
            .frequency
            .as_deref()
            .filter(|f| !f.is_empty())
            .map(|f| f.parse::<Frequency>())
            .transpose()
            .map_err(|e| corrupt("frequency", e))?;
        let periodic_status = self
            .periodic_status
            .as_deref()
            .map(PeriodicStatus::parse)
            .transpose()
            .map_err(|e| corrupt("periodic_status", e))?;

        Ok(Donation {
            id: DonationId::from_uuid(self.id),
            kind,
            order_number: OrderNumber::from_stored(self.order_number),
            amount: Amount::new(self.amount).map_err(|e| corrupt("amount", e))?,
            currency: Currency::new(self.currency).map_err(|e| corrupt("currency", e))?,
            details: self.details,
            pay_method: self
                .pay_method
                .parse::<PayMethod>()
                .map_err(|e| corrupt("pay_method", e))?,
            frequency,
            periodic_status,
            cardholder: Cardholder {
                email: self.cardholder_email,
                name: self.cardholder_name,
                phone_number: self.cardholder_phone_number,
                address: self.cardholder_address,
                national_id: self.cardholder_national_id,
                zip_code: self.cardholder_zip_code,
            },
            card_info: CardInfo {
                bin_code: self.card_bin_code,
                last_four: self.card_last_four,
                funding: self.card_funding,
                issuer: self.card_issuer,
                card_type: self.card_type,
                country: self.card_country,
            },
            notes: self.notes,
            send_receipt: self
                .send_receipt
                .parse::<SendReceipt>()
                .map_err(|e| corrupt("send_receipt", e))?,
            to_feedback: self.to_feedback,
            status: ChargeStatus::parse(&self.status).map_err(|e| corrupt("status", e))?,
            transaction_id: self.transaction_id,
            owner_id: UserId::new(self.owner_id).map_err(|e| corrupt("owner_id", e))?,
            created_at: Timestamp::from_datetime(self.created_at),
            updated_at: Timestamp::from_datetime(self.updated_at),
        })
    }
}

fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to {}: {}", action, e),
    )
}

async fn lock_row(
    tx: &mut Transaction<'_, Postgres>,
    kind: DonationKind,
    id: &DonationId,
) -> Result<Option<Donation>, DomainError> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = $1 FOR UPDATE",
        COLUMNS,
        table_for(kind)
    );
    let row: Option<DonationRow> = sqlx::query_as(&sql)
        .bind(id.as_uuid())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| db_error("lock donation", e))?;
    row.map(|r| r.into_donation(kind)).transpose()
}

#[async_trait]
impl DonationRepository for PostgresDonationRepository {
    async fn insert(&self, donation: &Donation) -> Result<(), DomainError> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, \
             $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28)",
            table_for(donation.kind),
            COLUMNS
        );
        let holder = &donation.cardholder;
        let card = &donation.card_info;

        sqlx::query(&sql)
            .bind(donation.id.as_uuid())
            .bind(donation.order_number.as_str())
            .bind(donation.amount.value())
            .bind(donation.currency.as_str())
            .bind(&donation.details)
            .bind(donation.pay_method.as_str())
            .bind(donation.frequency.map(|f| f.as_str()))
            .bind(donation.periodic_status.map(|s| s.as_str()))
            .bind(&holder.email)
            .bind(&holder.name)
            .bind(&holder.phone_number)
            .bind(&holder.address)
            .bind(&holder.national_id)
            .bind(&holder.zip_code)
            .bind(&card.bin_code)
            .bind(&card.last_four)
            .bind(card.funding)
            .bind(&card.issuer)
            .bind(card.card_type)
            .bind(&card.country)
            .bind(&donation.notes)
            .bind(donation.send_receipt.as_str())
            .bind(donation.to_feedback)
            .bind(donation.status.as_str())
            .bind(&donation.transaction_id)
            .bind(donation.owner_id.as_str())
            .bind(donation.created_at.as_datetime())
            .bind(donation.updated_at.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return DomainError::new(
                            ErrorCode::DatabaseError,
                            "duplicate order number",
                        )
                        .with_detail("order_number", donation.order_number.to_string());
                    }
                }
                db_error("insert donation", e)
            })?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        kind: DonationKind,
        id: &DonationId,
    ) -> Result<Option<Donation>, DomainError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, table_for(kind));
        let row: Option<DonationRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find donation", e))?;

        row.map(|r| r.into_donation(kind)).transpose()
    }

    async fn find_by_owner(
        &self,
        kind: DonationKind,
        owner: &UserId,
        query: &DonationQuery,
    ) -> Result<DonationPage, DomainError> {
        let methods: Vec<&str> = query.pay_methods.iter().map(|m| m.as_str()).collect();
        let table = table_for(kind);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE owner_id = $1 \
             AND (cardinality($2::text[]) = 0 OR pay_method = ANY($2))",
            table
        ))
        .bind(owner.as_str())
        .bind(&methods)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("count donations", e))?;

        let rows: Vec<DonationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM {} WHERE owner_id = $1 \
             AND (cardinality($2::text[]) = 0 OR pay_method = ANY($2)) \
             ORDER BY created_at DESC OFFSET $3 LIMIT $4",
            COLUMNS, table
        ))
        .bind(owner.as_str())
        .bind(&methods)
        .bind(i64::from(query.offset))
        .bind(i64::from(query.limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list donations", e))?;

        let records = rows
            .into_iter()
            .map(|r| r.into_donation(kind))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DonationPage {
            records,
            total: total.max(0) as u64,
        })
    }

    async fn update_fields(
        &self,
        kind: DonationKind,
        id: &DonationId,
        patch: &DonationPatch,
    ) -> Result<Option<Donation>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        let mut donation = match lock_row(&mut tx, kind, id).await? {
            Some(d) => d,
            None => return Ok(None),
        };
        if !patch.apply(&mut donation) {
            tx.commit()
                .await
                .map_err(|e| db_error("commit donation update", e))?;
            return Ok(Some(donation));
        }

        let sql = format!(
            "UPDATE {} SET cardholder_email = $2, cardholder_name = $3, \
             cardholder_phone_number = $4, cardholder_address = $5, \
             cardholder_national_id = $6, cardholder_zip_code = $7, send_receipt = $8, \
             to_feedback = $9, notes = $10, updated_at = $11 WHERE id = $1",
            table_for(kind)
        );
        let holder = &donation.cardholder;
        sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(&holder.email)
            .bind(&holder.name)
            .bind(&holder.phone_number)
            .bind(&holder.address)
            .bind(&holder.national_id)
            .bind(&holder.zip_code)
            .bind(donation.send_receipt.as_str())
            .bind(donation.to_feedback)
            .bind(&donation.notes)
            .bind(donation.updated_at.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("update donation", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("commit donation update", e))?;

        Ok(Some(donation))
    }
}
