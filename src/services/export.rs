//! Export writers: flat table dumps (json/csv/yaml/xml) and the nested
//! booking view (json/yaml/xml).

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{
    error::{AppError, AppResult},
    models::booking::BookingDetails,
    repository::{ExportTable, Repository},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Yaml,
    Xml,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Yaml => "yaml",
            ExportFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            "xml" => Ok(ExportFormat::Xml),
            _ => Err(()),
        }
    }
}

#[derive(Clone)]
pub struct ExportService {
    repository: Repository,
    dir: PathBuf,
}

impl ExportService {
    pub fn new(repository: Repository, dir: impl Into<PathBuf>) -> Self {
        Self {
            repository,
            dir: dir.into(),
        }
    }

    /// Flat dump of one table to `<dir>/<table>.<ext>`. Raw column values,
    /// passwords included. An empty table is `NotFound`: nothing is
    /// written.
    pub async fn export_table(
        &self,
        table: ExportTable,
        format: ExportFormat,
    ) -> AppResult<PathBuf> {
        let records = self.repository.dump_table(table).await?;
        if records.is_empty() {
            return Err(AppError::NotFound(format!(
                "table {} is empty, nothing to export",
                table
            )));
        }

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.{}", table, format.extension()));
        match format {
            ExportFormat::Json => fs::write(&path, serde_json::to_string_pretty(&records)?)?,
            ExportFormat::Yaml => fs::write(&path, serde_yaml::to_string(&records)?)?,
            ExportFormat::Csv => write_csv(&path, &records)?,
            ExportFormat::Xml => fs::write(&path, flat_xml(table, &records))?,
        }

        tracing::info!(table = %table, format = %format, path = %path.display(), "table exported");
        Ok(path)
    }

    /// Nested booking export to `<dir>/bookings_nested.<ext>`. Csv cannot
    /// carry the nested item list and is rejected up front.
    pub async fn export_bookings_nested(&self, format: ExportFormat) -> AppResult<PathBuf> {
        if format == ExportFormat::Csv {
            return Err(AppError::Validation(
                "csv cannot represent nested bookings; use json, yaml or xml".to_string(),
            ));
        }

        let bookings = self.repository.bookings.get_all_details().await?;
        if bookings.is_empty() {
            return Err(AppError::NotFound(
                "no bookings to export".to_string(),
            ));
        }

        fs::create_dir_all(&self.dir)?;
        let path = self
            .dir
            .join(format!("bookings_nested.{}", format.extension()));
        match format {
            ExportFormat::Json => fs::write(&path, serde_json::to_string_pretty(&bookings)?)?,
            ExportFormat::Yaml => fs::write(&path, serde_yaml::to_string(&bookings)?)?,
            ExportFormat::Xml => fs::write(&path, nested_xml(&bookings))?,
            ExportFormat::Csv => unreachable!(),
        }

        tracing::info!(format = %format, path = %path.display(), "nested bookings exported");
        Ok(path)
    }
}

fn write_csv(path: &Path, records: &[IndexMap<String, Value>]) -> AppResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(records[0].keys())?;
    for record in records {
        writer.write_record(record.values().map(csv_cell))?;
    }
    writer.flush()?;
    Ok(())
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn xml_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => xml_escape(s),
        other => xml_escape(&other.to_string()),
    }
}

/// No pack crate covers XML writing; the format is small enough for a
/// direct writer with escaping and 2-space indentation.
fn flat_xml(table: ExportTable, records: &[IndexMap<String, Value>]) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!("<{}>\n", table.table_name()));
    for record in records {
        out.push_str(&format!("  <{}>\n", table.record_element()));
        for (key, value) in record {
            out.push_str(&format!("    <{}>{}</{}>\n", key, xml_text(value), key));
        }
        out.push_str(&format!("  </{}>\n", table.record_element()));
    }
    out.push_str(&format!("</{}>\n", table.table_name()));
    out
}

fn nested_xml(bookings: &[BookingDetails]) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<bookings>\n");
    for booking in bookings {
        out.push_str("  <booking>\n");
        out.push_str(&format!("    <id>{}</id>\n", booking.id));
        out.push_str(&format!(
            "    <number_booking>{}</number_booking>\n",
            booking.number_booking
        ));
        out.push_str(&format!(
            "    <time_start>{}</time_start>\n",
            xml_escape(&booking.time_start)
        ));
        out.push_str(&format!(
            "    <time_end>{}</time_end>\n",
            xml_escape(&booking.time_end)
        ));
        out.push_str(&format!("    <coach>{}</coach>\n", xml_escape(&booking.coach)));
        out.push_str(&format!("    <user>{}</user>\n", xml_escape(&booking.user)));
        out.push_str("    <items>\n");
        for item in &booking.items {
            out.push_str("      <item>\n");
            out.push_str(&format!("        <name>{}</name>\n", xml_escape(&item.name)));
            out.push_str(&format!(
                "        <status>{}</status>\n",
                xml_escape(&item.status)
            ));
            out.push_str("      </item>\n");
        }
        out.push_str("    </items>\n");
        out.push_str("  </booking>\n");
    }
    out.push_str("</bookings>\n");
    out
}
