//! CSV export of the product list.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::error::Result;
use crate::models::Product;

pub const CSV_HEADERS: [&str; 6] = ["ID", "Name", "Stock", "Version", "Created", "Updated"];

/// `products-YYYY-MM-DD.csv`
pub fn default_export_filename(date: NaiveDate) -> String {
    format!("products-{}.csv", date.format("%Y-%m-%d"))
}

/// Writes the header row and one row per product. Fields with commas,
/// quotes or newlines are quoted with doubled inner quotes.
pub fn write_products_csv<W: Write>(products: &[Product], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADERS)?;

    for product in products {
        wtr.write_record([
            product.id.to_string(),
            product.name.clone(),
            product.stock.to_string(),
            product.version.to_string(),
            format_timestamp(product.created_at),
            format_timestamp(product.updated_at),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn products_to_csv_string(products: &[Product]) -> Result<String> {
    let mut buf = Vec::new();
    write_products_csv(products, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn export_products_to_file(products: &[Product], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    write_products_csv(products, file)?;
    log::info!("Exported {} products to {}", products.len(), path.display());
    Ok(())
}

fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;

    fn product(id: i64, name: &str, stock: i64, version: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            stock,
            version,
            created_at: parse_timestamp("2024-05-01T10:00:00Z"),
            updated_at: parse_timestamp("2024-05-02T12:30:00Z"),
        }
    }

    #[test]
    fn filename_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(default_export_filename(date), "products-2024-03-07.csv");
    }

    #[test]
    fn writes_header_and_rows() {
        let csv = products_to_csv_string(&[product(1, "A", 5, 1)]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "ID,Name,Stock,Version,Created,Updated");
        assert_eq!(
            lines[1],
            "1,A,5,1,2024-05-01T10:00:00Z,2024-05-02T12:30:00Z"
        );
    }

    #[test]
    fn escapes_commas_and_quotes_in_name() {
        let products = [product(1, "A", 5, 1), product(2, "B,\"weird\"", 2, 1)];
        let csv = products_to_csv_string(&products).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with(r#"2,"B,""weird""",2,1,"#));

        // Reading it back yields the original name
        let mut rdr = csv::Reader::from_reader(csv.as_bytes());
        let names: Vec<String> = rdr
            .records()
            .map(|r| r.unwrap().get(1).unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["A", "B,\"weird\""]);
    }

    #[test]
    fn missing_timestamps_are_empty_fields() {
        let mut p = product(3, "C", 0, 2);
        p.created_at = None;
        p.updated_at = None;
        let csv = products_to_csv_string(&[p]).unwrap();
        assert_eq!(csv.lines().nth(1), Some("3,C,0,2,,"));
    }

    #[test]
    fn empty_list_writes_only_header() {
        let csv = products_to_csv_string(&[]).unwrap();
        assert_eq!(csv.trim_end(), "ID,Name,Stock,Version,Created,Updated");
    }

    #[test]
    fn exports_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out").join("products.csv");
        export_products_to_file(&[product(1, "A", 5, 1)], &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("ID,Name,Stock,Version,Created,Updated"));
    }
}
