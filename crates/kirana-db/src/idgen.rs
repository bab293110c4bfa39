//! # Identifier Generator
//!
//! Mints the two human-facing business identifiers:
//!
//! - invoice numbers: `INV-{YYYYMMDD}-{6 random digits}`
//! - product barcodes: `GRO{10 random digits}`
//!
//! Candidates are random, so minting checks the store for collisions and
//! regenerates, up to [`MAX_MINT_ATTEMPTS`] times. The random space makes
//! exhaustion practically unreachable, but it is still a handled error
//! ([`CoreError::IdentifierExhausted`]), never an ignored one.
//!
//! Invoice numbers are checked inside the caller's open transaction so
//! the uniqueness check and the insert commit together; barcodes are
//! checked against the pool at catalog-edit time.

use chrono::{NaiveDate, Utc};
use rand::Rng;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::warn;

use crate::error::{DbError, EngineResult};
use kirana_core::CoreError;

/// Bounded retries before declaring the identifier space exhausted.
pub const MAX_MINT_ATTEMPTS: u32 = 5;

/// Prefix for invoice numbers.
pub const INVOICE_NUMBER_PREFIX: &str = "INV";

/// Prefix for generated barcodes.
pub const BARCODE_PREFIX: &str = "GRO";

fn random_digits(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Builds an invoice number candidate for the given creation date.
pub fn invoice_number_candidate(date: NaiveDate) -> String {
    format!(
        "{}-{}-{}",
        INVOICE_NUMBER_PREFIX,
        date.format("%Y%m%d"),
        random_digits(6)
    )
}

/// Builds a barcode candidate.
pub fn barcode_candidate() -> String {
    format!("{}{}", BARCODE_PREFIX, random_digits(10))
}

/// Mints an invoice number unique among persisted invoices.
///
/// Runs on the caller's open transaction: the UNIQUE index on
/// `invoices.invoice_number` backs this check if two transactions ever
/// race to the same candidate.
pub async fn mint_invoice_number(conn: &mut SqliteConnection) -> EngineResult<String> {
    for _ in 0..MAX_MINT_ATTEMPTS {
        let candidate = invoice_number_candidate(Utc::now().date_naive());

        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM invoices WHERE invoice_number = ?1)")
                .bind(&candidate)
                .fetch_one(&mut *conn)
                .await
                .map_err(DbError::from)?;

        if exists == 0 {
            return Ok(candidate);
        }

        warn!(candidate = %candidate, "Invoice number collision, regenerating");
    }

    Err(CoreError::IdentifierExhausted {
        kind: "invoice number",
        attempts: MAX_MINT_ATTEMPTS,
    }
    .into())
}

/// Mints a barcode unique among products.
pub async fn mint_barcode(pool: &SqlitePool) -> EngineResult<String> {
    for _ in 0..MAX_MINT_ATTEMPTS {
        let candidate = barcode_candidate();

        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE barcode = ?1)")
                .bind(&candidate)
                .fetch_one(pool)
                .await
                .map_err(DbError::from)?;

        if exists == 0 {
            return Ok(candidate);
        }

        warn!(candidate = %candidate, "Barcode collision, regenerating");
    }

    Err(CoreError::IdentifierExhausted {
        kind: "barcode",
        attempts: MAX_MINT_ATTEMPTS,
    }
    .into())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_number_format() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let number = invoice_number_candidate(date);

        assert!(number.starts_with("INV-20260806-"));
        assert_eq!(number.len(), "INV-20260806-".len() + 6);
        assert!(number["INV-20260806-".len()..]
            .chars()
            .all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_barcode_format() {
        let barcode = barcode_candidate();

        assert!(barcode.starts_with("GRO"));
        assert_eq!(barcode.len(), 13);
        assert!(barcode[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_candidates_vary() {
        // 6 random digits: 100 draws colliding would point at a broken RNG
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let numbers: std::collections::HashSet<_> =
            (0..100).map(|_| invoice_number_candidate(date)).collect();
        assert!(numbers.len() > 90);
    }
}
