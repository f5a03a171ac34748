use std::io::{Read, Write};

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;

use crate::domain::entities::price::{PricePair, PriceTable};

const HEADERS: [&str; 3] = ["region", "home", "desk"];

pub fn write_price_csv<W: Write>(writer: W, table: &PriceTable) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record(HEADERS)
        .context("failed to write csv header")?;
    for (region, prices) in table {
        let home = prices.home.to_string();
        let desk = prices.desk.to_string();
        writer
            .write_record([region.as_str(), home.as_str(), desk.as_str()])
            .with_context(|| format!("failed to write csv row for {region}"))?;
    }
    writer.flush().context("failed to flush csv")?;
    Ok(())
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow!("csv column \"{name}\" is required"))
}

fn parse_cell(record: &StringRecord, idx: usize, line: usize, name: &str) -> Result<u64> {
    let raw = record.get(idx).unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<u64>()
        .with_context(|| format!("invalid {name} price \"{raw}\" on line {line}"))
}

/// Reads a `region,home,desk` table; columns are matched by header name.
pub fn read_price_csv<R: Read>(reader: R) -> Result<PriceTable> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader
        .headers()
        .context("failed to read headers from csv")?
        .clone();

    if headers.is_empty() {
        anyhow::bail!("csv header is required")
    }

    let region_idx = column_index(&headers, HEADERS[0])?;
    let home_idx = column_index(&headers, HEADERS[1])?;
    let desk_idx = column_index(&headers, HEADERS[2])?;

    let mut table = PriceTable::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.context("failed to parse csv record")?;
        let line = row_idx + 2;
        let region = record.get(region_idx).unwrap_or("").trim();
        if region.is_empty() {
            continue;
        }
        let home = parse_cell(&record, home_idx, line, HEADERS[1])?;
        let desk = parse_cell(&record, desk_idx, line, HEADERS[2])?;
        table.insert(region.to_string(), PricePair::new(home, desk));
    }

    Ok(table)
}
