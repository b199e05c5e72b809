//! Bank persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `banks` table. Ids are
//! assigned by the in-memory store and inserted explicitly.

use bnk_core::{Bank, BankId};
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
struct BankRow {
    id: i64,
    name: String,
    location: String,
    branch_code: String,
}

impl BankRow {
    fn into_bank(self) -> Bank {
        Bank {
            id: BankId::new(self.id),
            name: self.name,
            location: self.location,
            branch_code: self.branch_code,
        }
    }
}

/// Insert a new bank.
pub async fn insert(pool: &PgPool, bank: &Bank) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO banks (id, name, location, branch_code) VALUES ($1, $2, $3, $4)")
        .bind(bank.id.get())
        .bind(&bank.name)
        .bind(&bank.location)
        .bind(&bank.branch_code)
        .execute(pool)
        .await?;
    Ok(())
}

/// Overwrite a bank's fields. Returns whether a row was updated.
pub async fn update(pool: &PgPool, bank: &Bank) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE banks SET name = $1, location = $2, branch_code = $3 WHERE id = $4")
            .bind(&bank.name)
            .bind(&bank.location)
            .bind(&bank.branch_code)
            .bind(bank.id.get())
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a bank. Returns whether a row was removed.
pub async fn delete(pool: &PgPool, id: BankId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM banks WHERE id = $1")
        .bind(id.get())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Load every bank, in id order.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Bank>, sqlx::Error> {
    let rows = sqlx::query_as::<_, BankRow>(
        "SELECT id, name, location, branch_code FROM banks ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(BankRow::into_bank).collect())
}
