//! HTML report generation.
//!
//! The HTML report is one heading and one table per category, in the order
//! categories first appeared in the sheet. Styling is inline so the file
//! can be opened or mailed on its own.

use crate::config::ReportConfig;
use crate::models::{CompetitorEntry, ScoreSet, Standings};
use anyhow::{Context, Result};
use indexmap::IndexSet;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::path::Path;

const STYLESHEET: &str = "
    table { border-collapse: collapse; margin-bottom: 20px; width: 100%; }
    th, td { border: 1px solid #ccc; padding: 8px; text-align: center; }
    th { background-color: #f0f0f0; }
";

/// Generate the complete HTML report.
pub fn generate_html_report(standings: &Standings, options: &ReportConfig) -> String {
    render_report(standings, options).into_string()
}

/// Render the report document.
pub fn render_report(standings: &Standings, options: &ReportConfig) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                title { (options.title) }
                style { (PreEscaped(STYLESHEET)) }
            }
            body {
                @for (category, competitors) in standings.iter() {
                    (render_category(category, competitors, options))
                }
            }
        }
    }
}

/// Exercise names across `competitors`, in first-seen order.
pub fn exercise_columns(competitors: &[CompetitorEntry]) -> Vec<&str> {
    let columns: IndexSet<&str> = competitors
        .iter()
        .flat_map(|c| c.exercises.keys().map(String::as_str))
        .collect();

    columns.into_iter().collect()
}

fn render_category(
    category: &str,
    competitors: &[CompetitorEntry],
    options: &ReportConfig,
) -> Markup {
    let exercises = exercise_columns(competitors);

    html! {
        h2 { (category) }
        table {
            tr {
                th {}
                th { (options.competitor_heading) }
                @for exercise in &exercises {
                    th { (exercise) }
                }
                th { (options.total_heading) }
            }
            @for competitor in competitors {
                tr {
                    td { (competitor.rank) }
                    td {
                        (competitor.name)
                        br;
                        small { (competitor.club) }
                    }
                    @for exercise in &exercises {
                        @if let Some(scores) = competitor.exercise(exercise) {
                            td style="white-space: pre-line;" { (score_lines(scores)) }
                        } @else {
                            td { "-" }
                        }
                    }
                    td { (format!("{:.3}", competitor.total)) }
                }
            }
        }
    }
}

/// The text of one score cell, one value per line.
fn score_lines(scores: &ScoreSet) -> String {
    format!(
        "D: {:.3}/{:.3}\nA: {:.3}\nE: {:.3}\nP: {:.3}\n{:.3}",
        scores.d_a_score,
        scores.d_b_score,
        scores.a_score,
        scores.e_score,
        scores.aftrek,
        scores.subtotal
    )
}

/// Write a generated report to `path`.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn scores(subtotal: f64) -> ScoreSet {
        ScoreSet {
            d_a_score: 1.0,
            d_b_score: 0.0,
            a_score: 1.2,
            e_score: 8.3,
            aftrek: 0.0,
            subtotal,
        }
    }

    fn competitor(name: &str, club: &str, rank: usize, exercises: &[(&str, f64)]) -> CompetitorEntry {
        let mut entry = CompetitorEntry::new(name.to_string(), club.to_string(), 9.5);
        entry.rank = rank;
        for (exercise, subtotal) in exercises {
            entry.exercises.insert(exercise.to_string(), scores(*subtotal));
        }
        entry
    }

    fn standings(categories: Vec<(&str, Vec<CompetitorEntry>)>) -> Standings {
        categories
            .into_iter()
            .map(|(c, entries)| (c.to_string(), entries))
            .collect::<IndexMap<_, _>>()
            .into()
    }

    #[test]
    fn test_single_competitor_report() {
        let standings = standings(vec![(
            "Senior",
            vec![competitor("Jane", "X", 1, &[("vault", 9.5), ("bars", 9.5)])],
        )]);

        let html = generate_html_report(&standings, &ReportConfig::default());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h2>Senior</h2>"));
        assert_eq!(html.matches("<table>").count(), 1);
        assert!(html.contains("<th>vault</th><th>bars</th><th>Total</th>"));
        assert!(html.contains("<th>Deelnemer</th>"));
        // header row plus one competitor row
        assert_eq!(html.matches("<tr>").count(), 2);
        assert!(html.contains("<td>1</td><td>Jane<br><small>X</small></td>"));
        assert!(html.contains("D: 1.000/0.000\nA: 1.200\nE: 8.300\nP: 0.000\n9.500"));
        assert!(html.contains("<td>9.500</td>"));
        assert!(html.contains("border-collapse: collapse"));
    }

    #[test]
    fn test_missing_exercise_renders_dash() {
        let standings = standings(vec![(
            "Senior",
            vec![
                competitor("Jane", "X", 1, &[("vault", 9.5), ("bars", 9.0)]),
                competitor("Anna", "Y", 2, &[("vault", 9.0)]),
            ],
        )]);

        let html = generate_html_report(&standings, &ReportConfig::default());
        assert_eq!(html.matches("<td>-</td>").count(), 1);
    }

    #[test]
    fn test_exercise_columns_first_seen_order() {
        let competitors = vec![
            competitor("A", "X", 1, &[("floor", 1.0), ("vault", 1.0)]),
            competitor("B", "X", 2, &[("bars", 1.0), ("floor", 1.0)]),
        ];

        assert_eq!(exercise_columns(&competitors), vec!["floor", "vault", "bars"]);
    }

    #[test]
    fn test_empty_category_renders_header_only() {
        let standings = standings(vec![("Pupil", Vec::new())]);

        let html = generate_html_report(&standings, &ReportConfig::default());
        assert!(html.contains("<h2>Pupil</h2>"));
        assert!(html.contains("<tr><th></th><th>Deelnemer</th><th>Total</th></tr>"));
        assert_eq!(html.matches("<td>").count(), 0);
    }

    #[test]
    fn test_categories_rendered_in_order() {
        let standings = standings(vec![
            ("Senior", vec![competitor("A", "X", 1, &[("vault", 1.0)])]),
            ("Junior", vec![competitor("B", "X", 1, &[("vault", 1.0)])]),
        ]);

        let html = generate_html_report(&standings, &ReportConfig::default());
        let senior = html.find("<h2>Senior</h2>").unwrap();
        let junior = html.find("<h2>Junior</h2>").unwrap();
        assert!(senior < junior);
    }

    #[test]
    fn test_spreadsheet_text_is_escaped() {
        let standings = standings(vec![(
            "<Senior>",
            vec![competitor("Jane & Co", "<b>X</b>", 1, &[("vault", 1.0)])],
        )]);

        let html = generate_html_report(&standings, &ReportConfig::default());
        assert!(html.contains("&lt;Senior&gt;"));
        assert!(html.contains("Jane &amp; Co"));
        assert!(!html.contains("<b>X</b>"));
    }

    #[test]
    fn test_custom_headings() {
        let options = ReportConfig {
            title: "Finale".to_string(),
            competitor_heading: "Turner".to_string(),
            total_heading: "Totaal".to_string(),
        };
        let standings = standings(vec![("Senior", vec![competitor("A", "X", 1, &[])])]);

        let html = generate_html_report(&standings, &options);
        assert!(html.contains("<title>Finale</title>"));
        assert!(html.contains("<th>Turner</th>"));
        assert!(html.contains("<th>Totaal</th>"));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wedstrijd_results.html");

        write_report("<html></html>", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");

        let missing_dir = dir.path().join("missing").join("out.html");
        assert!(write_report("x", &missing_dir).is_err());
    }
}
