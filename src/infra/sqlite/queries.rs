use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Transaction};

use crate::domain::entities::price::{PriceField, PricePair, PriceTable};
use crate::infra::sqlite::schema::open_connection;
use crate::usecase::ports::gateway::FieldWrite;

fn to_sql_price(value: u64) -> Result<i64> {
    i64::try_from(value).with_context(|| format!("price {value} is out of range"))
}

fn from_sql_price(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn upsert_in_tx(tx: &Transaction<'_>, name: &str, prices: PricePair) -> Result<()> {
    tx.execute(
        "INSERT INTO region_price(name, home, desk)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(name) DO UPDATE SET
             home = excluded.home,
             desk = excluded.desk,
             updated_at = CURRENT_TIMESTAMP",
        params![name, to_sql_price(prices.home)?, to_sql_price(prices.desk)?],
    )
    .with_context(|| format!("failed to upsert region {name}"))?;
    Ok(())
}

pub fn load_prices(db_path: &Path) -> Result<PriceTable> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare("SELECT name, home, desk FROM region_price ORDER BY name ASC")
        .context("failed to prepare price query")?;

    let price_iter = stmt
        .query_map([], |row| {
            let name: String = row.get(0)?;
            let home: i64 = row.get(1)?;
            let desk: i64 = row.get(2)?;
            Ok((name, home, desk))
        })
        .context("failed to query prices")?;

    let mut table = PriceTable::new();
    for item in price_iter {
        let (name, home, desk) = item.context("failed to read price row")?;
        table.insert(
            name,
            PricePair::new(from_sql_price(home), from_sql_price(desk)),
        );
    }

    Ok(table)
}

pub fn upsert_region(db_path: &Path, name: &str, prices: PricePair) -> Result<()> {
    let mut conn = open_connection(db_path)?;
    let tx = conn.transaction().context("failed to start transaction")?;
    upsert_in_tx(&tx, name, prices)?;
    tx.commit().context("failed to commit region update")?;
    Ok(())
}

pub fn delete_region(db_path: &Path, name: &str) -> Result<()> {
    let conn = open_connection(db_path)?;
    conn.execute("DELETE FROM region_price WHERE name = ?1", params![name])
        .with_context(|| format!("failed to delete region {name}"))?;
    Ok(())
}

/// Replaces the whole table in one transaction.
pub fn replace_all(db_path: &Path, table: &PriceTable) -> Result<()> {
    let mut conn = open_connection(db_path)?;
    let tx = conn.transaction().context("failed to start transaction")?;
    tx.execute("DELETE FROM region_price", [])
        .context("failed to clear prices")?;
    for (name, prices) in table {
        upsert_in_tx(&tx, name, *prices)?;
    }
    tx.commit().context("failed to commit price import")?;
    Ok(())
}

/// Applies field writes all-or-nothing; a region missing locally starts at 0/0.
pub fn apply_field_writes(db_path: &Path, writes: &[FieldWrite]) -> Result<()> {
    let mut conn = open_connection(db_path)?;
    let tx = conn.transaction().context("failed to start transaction")?;

    for write in writes {
        tx.execute(
            "INSERT INTO region_price(name, home, desk) VALUES (?1, 0, 0)
             ON CONFLICT(name) DO NOTHING",
            params![write.region],
        )
        .with_context(|| format!("failed to create region {}", write.region))?;

        let statement = match write.field {
            PriceField::Home => {
                "UPDATE region_price SET home = ?2, updated_at = CURRENT_TIMESTAMP WHERE name = ?1"
            }
            PriceField::Desk => {
                "UPDATE region_price SET desk = ?2, updated_at = CURRENT_TIMESTAMP WHERE name = ?1"
            }
        };
        tx.execute(statement, params![write.region, to_sql_price(write.value)?])
            .with_context(|| format!("failed to update {}/{}", write.region, write.field))?;
    }

    tx.commit().context("failed to commit field writes")?;
    Ok(())
}
