//! Data models for the competition report.
//!
//! This module contains the core data structures used throughout the
//! application: raw spreadsheet cells and rows, per-exercise score sets,
//! competitor entries and the ranked standings handed to the renderer.

use indexmap::IndexMap;

/// A single spreadsheet cell value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    /// Blank or error cell.
    #[default]
    Empty,
    /// Text cell.
    Text(String),
    /// Numeric cell (integers and date serials included).
    Number(f64),
    /// Boolean cell.
    Bool(bool),
}

impl Cell {
    /// Returns the textual form of the cell, or `None` for an empty cell.
    pub fn text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// One spreadsheet row, addressed by absolute 0-based column index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    /// Creates a row from its cells.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Returns the cell at `index`, or [`Cell::Empty`] past the end of the row.
    pub fn cell(&self, index: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.cells.get(index).unwrap_or(&EMPTY)
    }

    /// Number of cells physically present in the row.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }
}

/// Scores for one exercise of one competitor, each rounded to 3 decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreSet {
    /// Difficulty score, part A.
    pub d_a_score: f64,
    /// Difficulty score, part B.
    pub d_b_score: f64,
    /// A-score.
    pub a_score: f64,
    /// Execution score.
    pub e_score: f64,
    /// Deduction.
    pub aftrek: f64,
    /// Net exercise score after deductions.
    pub subtotal: f64,
}

/// A competitor within one category, identified by `(name, club)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitorEntry {
    pub name: String,
    pub club: String,
    /// Overall total, fixed from the first row seen for this competitor.
    pub total: f64,
    /// Exercise name (lowercase) to scores, in first-seen order.
    pub exercises: IndexMap<String, ScoreSet>,
    /// 1-based position in the category; 0 until ranked.
    pub rank: usize,
}

impl CompetitorEntry {
    /// Creates an unranked competitor with no exercises.
    pub fn new(name: String, club: String, total: f64) -> Self {
        Self {
            name,
            club,
            total,
            exercises: IndexMap::new(),
            rank: 0,
        }
    }

    /// Returns the scores for `exercise`, if the competitor performed it.
    pub fn exercise(&self, exercise: &str) -> Option<&ScoreSet> {
        self.exercises.get(exercise)
    }
}

/// Ranked competitors per category, in the order categories first appeared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Standings {
    categories: IndexMap<String, Vec<CompetitorEntry>>,
}

impl Standings {
    /// Iterates over `(category, competitors)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<CompetitorEntry>)> {
        self.categories.iter()
    }

    /// Returns the ranked competitors of `category`.
    #[cfg(test)]
    pub fn get(&self, category: &str) -> Option<&Vec<CompetitorEntry>> {
        self.categories.get(category)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of competitors across all categories.
    pub fn competitor_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

impl From<IndexMap<String, Vec<CompetitorEntry>>> for Standings {
    fn from(categories: IndexMap<String, Vec<CompetitorEntry>>) -> Self {
        Self { categories }
    }
}

/// Counters collected while aggregating a sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    /// Data rows scanned (header rows excluded).
    pub rows_scanned: usize,
    /// Rows dropped by the exclusion rule.
    pub rows_skipped: usize,
    /// Rows that contributed scores to a competitor.
    pub rows_aggregated: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text() {
        assert_eq!(Cell::Empty.text(), None);
        assert_eq!(Cell::from("Jane").text(), Some("Jane".to_string()));
        assert_eq!(Cell::Number(12.0).text(), Some("12".to_string()));
        assert_eq!(Cell::Number(9.5).text(), Some("9.5".to_string()));
        assert_eq!(Cell::Bool(true).text(), Some("true".to_string()));
    }

    #[test]
    fn test_row_cell_past_end_is_empty() {
        let row = Row::new(vec![Cell::from("a"), Cell::Number(1.0)]);
        assert_eq!(row.cell(1), &Cell::Number(1.0));
        assert_eq!(row.cell(40), &Cell::Empty);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_standings_counts() {
        let mut categories = IndexMap::new();
        categories.insert(
            "Senior".to_string(),
            vec![
                CompetitorEntry::new("Jane".to_string(), "X".to_string(), 9.5),
                CompetitorEntry::new("Anna".to_string(), "Y".to_string(), 9.0),
            ],
        );
        categories.insert("Junior".to_string(), Vec::new());

        let standings = Standings::from(categories);
        assert_eq!(standings.len(), 2);
        assert_eq!(standings.competitor_count(), 2);
        assert!(!standings.is_empty());
        assert_eq!(standings.get("Junior"), Some(&Vec::new()));
        assert!(standings.get("Pupil").is_none());
        let order: Vec<_> = standings.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(order, vec!["Senior", "Junior"]);
    }
}
