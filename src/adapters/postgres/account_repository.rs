//! PostgreSQL implementation of AccountRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::account::Account;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::AccountRepository;

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: String,
    email: String,
    active: bool,
    activation_hash: Option<String>,
    activation_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = DomainError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: UserId::new(row.id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid account id: {}", e))
            })?,
            email: row.email,
            active: row.active,
            activation_hash: row.activation_hash,
            activation_expires_at: row.activation_expires_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn not_found(id: &UserId) -> DomainError {
    DomainError::new(ErrorCode::AccountNotFound, "Account not found")
        .with_detail("account_id", id.to_string())
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, email, active, activation_hash, activation_expires_at, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find account: {}", e)))?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, DomainError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, email, active, activation_hash, activation_expires_at, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find account: {}", e)))?;

        row.map(Account::try_from).transpose()
    }

    async fn insert(&self, account: &Account) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, active, activation_hash, activation_expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(account.id.as_str())
        .bind(&account.email)
        .bind(account.active)
        .bind(&account.activation_hash)
        .bind(account.activation_expires_at.map(|t| *t.as_datetime()))
        .bind(account.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return DomainError::new(ErrorCode::Conflict, "Email already registered");
                }
            }
            DomainError::database(format!("Failed to insert account: {}", e))
        })?;

        Ok(())
    }

    async fn set_activation(
        &self,
        id: &UserId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE accounts SET activation_hash = $2, activation_expires_at = $3 WHERE id = $1",
        )
        .bind(id.as_str())
        .bind(token_hash)
        .bind(expires_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to store activation token: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn activate(&self, id: &UserId) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET active = TRUE, activation_hash = NULL, activation_expires_at = NULL
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to activate account: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}
