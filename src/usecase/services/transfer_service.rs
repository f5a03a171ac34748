use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::domain::entities::document::ExportDocument;
use crate::domain::entities::price::PriceTable;
use crate::infra::document::csv::{read_price_csv, write_price_csv};
use crate::infra::document::json::{parse_document, render_document};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferFormat {
    Json,
    Csv,
}

impl TransferFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();
        if ext == "csv" {
            TransferFormat::Csv
        } else {
            TransferFormat::Json
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            TransferFormat::Json => "json",
            TransferFormat::Csv => "csv",
        }
    }
}

/// What an import file contained, before validation and confirmation.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportSource {
    Document(Value),
    Table(PriceTable),
}

pub struct TransferService;

impl TransferService {
    pub fn read_import(&self, path: &Path) -> Result<ImportSource> {
        match TransferFormat::from_path(path) {
            TransferFormat::Csv => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open csv: {}", path.display()))?;
                let table = read_price_csv(file)
                    .with_context(|| format!("failed to read csv: {}", path.display()))?;
                Ok(ImportSource::Table(table))
            }
            TransferFormat::Json => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read file: {}", path.display()))?;
                let document = parse_document(&text)?;
                Ok(ImportSource::Document(document))
            }
        }
    }

    pub fn write_export(&self, path: &Path, document: &ExportDocument) -> Result<()> {
        match TransferFormat::from_path(path) {
            TransferFormat::Csv => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create file: {}", path.display()))?;
                write_price_csv(BufWriter::new(file), &document.price_table)
            }
            TransferFormat::Json => {
                let text = render_document(document).context("failed to serialize export")?;
                std::fs::write(path, text)
                    .with_context(|| format!("failed to write file: {}", path.display()))
            }
        }
    }
}
