//! Competition result aggregation and ranking.
//!
//! Rows of the competition sheet are folded into one entry per competitor
//! per category, then every category is ranked by total. Numeric cells are
//! parsed leniently: anything unreadable counts as `0.0`.

use crate::models::{AggregateStats, Cell, CompetitorEntry, Row, ScoreSet, Standings};
use indexmap::IndexMap;
use tracing::debug;

/// Leading rows of the competition sheet that are headers, not results.
pub const HEADER_ROWS: usize = 2;

/// 0-based column index of every field the aggregator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: usize,
    pub club: usize,
    pub category: usize,
    pub exercise: usize,
    pub d_a_score: usize,
    pub d_b_score: usize,
    pub a_score: usize,
    pub e_score: usize,
    pub aftrek: usize,
    pub subtotal: usize,
    pub total: usize,
}

impl Default for ColumnMap {
    /// The layout of the competition sheet.
    fn default() -> Self {
        Self {
            name: 1,
            club: 2,
            category: 3,
            exercise: 4,
            d_a_score: 5,
            d_b_score: 6,
            a_score: 12,
            e_score: 17,
            aftrek: 20,
            subtotal: 22,
            total: 23,
        }
    }
}

/// The identifying and numeric fields of one accepted data row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRecord {
    pub name: String,
    pub club: String,
    pub category: String,
    /// Lowercased exercise name.
    pub exercise: String,
    pub total: f64,
    pub scores: ScoreSet,
}

/// Rounds to 3 decimals, halves rounding up.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0 + 0.5).floor() / 1000.0
}

/// Parses a spreadsheet number, accepting a decimal comma.
///
/// Only the first comma is treated as the decimal separator and the longest
/// leading numeric prefix is used, so `"9,5 pt"` reads as `9.5`. Text with
/// no numeric prefix, and non-finite results, give `0.0`.
pub fn parse_decimal(text: &str) -> f64 {
    let normalized = text.replacen(',', ".", 1);
    let prefix = numeric_prefix(normalized.trim_start());

    match prefix.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Longest prefix of `s` shaped like `[+-]digits[.digits][e[+-]digits]`.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return "";
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &s[..end]
}

/// Numeric value of a cell, rounded to 3 decimals. Never fails.
///
/// Values too large to scale for rounding count as `0.0` like any other
/// unreadable number.
pub fn cell_score(cell: &Cell) -> f64 {
    let value = match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => parse_decimal(s),
        _ => 0.0,
    };

    let rounded = round3(value);
    if rounded.is_finite() {
        rounded
    } else {
        0.0
    }
}

/// Text of an identifying cell, or `None` if it is empty or a `-` placeholder.
fn identity_field(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.is_empty() && t.trim() != "-")
}

/// Extracts one data row, or `None` if the row must be skipped.
///
/// A row is skipped when its name, exercise or category is missing, empty,
/// or just `-`.
pub fn extract_row(row: &Row, columns: &ColumnMap) -> Option<RowRecord> {
    let name = identity_field(row.cell(columns.name).text())?;
    let exercise = identity_field(row.cell(columns.exercise).text().map(|e| e.to_lowercase()))?;
    let category = identity_field(row.cell(columns.category).text())?;

    Some(RowRecord {
        name,
        club: row.cell(columns.club).text().unwrap_or_default(),
        category,
        exercise,
        total: cell_score(row.cell(columns.total)),
        scores: ScoreSet {
            d_a_score: cell_score(row.cell(columns.d_a_score)),
            d_b_score: cell_score(row.cell(columns.d_b_score)),
            a_score: cell_score(row.cell(columns.a_score)),
            e_score: cell_score(row.cell(columns.e_score)),
            aftrek: cell_score(row.cell(columns.aftrek)),
            subtotal: cell_score(row.cell(columns.subtotal)),
        },
    })
}

/// Competitors of every category, keyed by `(name, club)` while aggregating.
#[derive(Debug, Default)]
struct CategoryTable {
    categories: IndexMap<String, IndexMap<(String, String), CompetitorEntry>>,
}

impl CategoryTable {
    /// Looks up the competitor for `record`, creating it if this is the first row.
    ///
    /// The total is taken from the creating row only; later rows for the same
    /// competitor never change it.
    fn entry_for(&mut self, record: &RowRecord) -> &mut CompetitorEntry {
        let competitors = self.categories.entry(record.category.clone()).or_default();
        let key = (record.name.clone(), record.club.clone());

        competitors.entry(key).or_insert_with(|| {
            CompetitorEntry::new(record.name.clone(), record.club.clone(), record.total)
        })
    }

    fn insert(&mut self, record: RowRecord) {
        let entry = self.entry_for(&record);
        entry.exercises.insert(record.exercise, record.scores);
    }

    fn into_standings(self) -> Standings {
        let categories = self
            .categories
            .into_iter()
            .map(|(category, competitors)| {
                let mut ranked: Vec<CompetitorEntry> = competitors.into_values().collect();
                rank_competitors(&mut ranked);
                debug!("Ranked {} competitors in '{}'", ranked.len(), category);
                (category, ranked)
            })
            .collect::<IndexMap<_, _>>();

        Standings::from(categories)
    }
}

/// Sorts by total, highest first, and numbers the competitors 1, 2, 3, ...
///
/// The sort is stable: equal totals keep their first-seen order and still
/// get distinct consecutive ranks.
pub fn rank_competitors(competitors: &mut [CompetitorEntry]) {
    competitors.sort_by(|a, b| b.total.total_cmp(&a.total));

    for (index, competitor) in competitors.iter_mut().enumerate() {
        competitor.rank = index + 1;
    }
}

/// Aggregates sheet rows into ranked standings.
///
/// The first [`HEADER_ROWS`] rows are dropped unconditionally.
pub fn aggregate(rows: &[Row], columns: &ColumnMap) -> Standings {
    let mut table = CategoryTable::default();

    for record in rows
        .iter()
        .skip(HEADER_ROWS)
        .filter_map(|row| extract_row(row, columns))
    {
        table.insert(record);
    }

    table.into_standings()
}

/// Counts the data rows that [`aggregate`] uses and skips.
pub fn row_stats(rows: &[Row], columns: &ColumnMap) -> AggregateStats {
    let mut stats = AggregateStats::default();

    for row in rows.iter().skip(HEADER_ROWS) {
        stats.rows_scanned += 1;
        if extract_row(row, columns).is_some() {
            stats.rows_aggregated += 1;
        } else {
            stats.rows_skipped += 1;
        }
    }

    debug!(
        "Scanned {} rows: {} aggregated, {} skipped",
        stats.rows_scanned, stats.rows_aggregated, stats.rows_skipped
    );

    stats
}
