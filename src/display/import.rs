//! Product CSV import with per-row error aggregation.
//!
//! Expected columns are `sku,name,price,stock`; a header on the first
//! non-blank line is optional and may carry a byte-order mark.
//! Row numbers are file line numbers, so the first data row after a header
//! is row 2.

use std::collections::HashMap;
use std::fmt;

use crate::portal::Product;

const COLUMNS: [&str; 4] = ["sku", "name", "price", "stock"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub row: usize,
    pub messages: Vec<String>,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row, self.messages.join("; "))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub accepted: Vec<Product>,
    pub errors: Vec<RowError>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_lines(&self) -> Vec<String> {
        self.errors.iter().map(RowError::to_string).collect()
    }

    pub fn summary(&self) -> String {
        let noun = if self.accepted.len() == 1 {
            "product"
        } else {
            "products"
        };
        if self.errors.is_empty() {
            format!("Imported {} {}", self.accepted.len(), noun)
        } else {
            format!(
                "Imported {} {}, {} rows rejected",
                self.accepted.len(),
                noun,
                self.errors.len()
            )
        }
    }
}

pub fn import_products(csv: &str) -> ImportReport {
    let mut report = ImportReport::default();
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    let mut header_checked = false;

    for (index, line) in csv.lines().enumerate() {
        let row = index + 1;
        let line = if header_checked {
            line
        } else {
            line.trim_start_matches('\u{feff}')
        };
        if line.trim().is_empty() {
            continue;
        }
        let cells = split_row(line);
        if !header_checked {
            header_checked = true;
            if is_header(&cells) {
                continue;
            }
        }
        match parse_row(&cells) {
            Ok(product) => {
                if let Some(previous) = first_seen.get(&product.sku) {
                    report.errors.push(RowError {
                        row,
                        messages: vec![format!(
                            "duplicate SKU {} (first seen on row {})",
                            product.sku, previous
                        )],
                    });
                    continue;
                }
                first_seen.insert(product.sku.clone(), row);
                report.accepted.push(product);
            }
            Err(messages) => report.errors.push(RowError { row, messages }),
        }
    }
    report
}

fn is_header(cells: &[String]) -> bool {
    cells.len() == COLUMNS.len()
        && cells
            .iter()
            .zip(COLUMNS)
            .all(|(cell, column)| cell.eq_ignore_ascii_case(column))
}

fn parse_row(cells: &[String]) -> Result<Product, Vec<String>> {
    if cells.len() != COLUMNS.len() {
        return Err(vec![format!(
            "expected {} columns, found {}",
            COLUMNS.len(),
            cells.len()
        )]);
    }
    let mut messages = Vec::new();
    let sku = cells[0].to_ascii_uppercase();
    if sku.is_empty() {
        messages.push("SKU is required".to_string());
    }
    let name = cells[1].clone();
    if name.is_empty() {
        messages.push("name is required".to_string());
    }
    let price = parse_cents(&cells[2]);
    if price.is_none() {
        messages.push(format!("price `{}` is not a valid amount", cells[2]));
    }
    let stock = cells[3].parse::<u32>().ok();
    if stock.is_none() {
        messages.push(format!("stock `{}` must be a whole number", cells[3]));
    }
    match (price, stock) {
        (Some(unit_price_cents), Some(stock)) if messages.is_empty() => Ok(Product {
            sku,
            name,
            unit_price_cents,
            stock,
        }),
        _ => Err(messages),
    }
}

/// "12", "12.5" and "12.50" are accepted; more than two decimals are not.
pub fn parse_cents(raw: &str) -> Option<u64> {
    let raw = raw.trim().trim_start_matches('$');
    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
    if whole.is_empty() || fraction.len() > 2 {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let whole: u64 = whole.parse().ok()?;
    let cents: u64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<u64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };
    whole.checked_mul(100)?.checked_add(cents)
}

/// Splits one line, honouring double quotes and `""` escapes.
fn split_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(ch),
        }
    }
    cells.push(current.trim().to_string());
    cells
}
