use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::catalog::Candidate;
use crate::scoring::{RankedCandidate, Ranking, WeightConfig};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Scores are all in (0, 1]; four decimals tell candidates apart
pub fn format_score(score: f64) -> String {
    format!("{:.4}", score)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Fit a name into whatever the terminal leaves after `fixed_width`
fn fit_name(name: &str, fixed_width: usize) -> String {
    match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => truncate_name(name, width - fixed_width),
        // Very narrow terminal, show truncated
        Some(_) => truncate_name(name, 20),
        // No terminal (pipe), don't truncate
        None => name.to_string(),
    }
}

/// Format ranked rows as a table: index, WP, WP rank, MAUT, MAUT rank, name.
/// Rows are printed in the order given.
pub fn format_ranking_table(rows: &[&RankedCandidate], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No laptops to rank.".to_string();
    }

    let separator = "  ";
    let header = format!(
        "{:>3} {:>6}{sep}{:>4}{sep}{:>6}{sep}{:>4}{sep}{}",
        "#",
        "WP",
        "Rank",
        "MAUT",
        "Rank",
        "Name",
        sep = separator
    );
    // Index, scores, ranks and the separators between them
    let fixed_width = 3 + 1 + 6 + 4 + 6 + 4 + separator.len() * 4;

    let lines = rows.iter().enumerate().map(|(idx, row)| {
        let index_str = format!("{:>2}.", idx + 1);
        let wp = format!("{:>6}", format_score(row.wp));
        let wp_rank = format!("{:>4}", row.wp_rank);
        let maut = format!("{:>6}", format_score(row.maut));
        let maut_rank = format!("{:>4}", row.maut_rank);
        let name = fit_name(&row.name, fixed_width);

        if use_colors {
            format!(
                "{} {}{sep}{}{sep}{}{sep}{}{sep}{}",
                index_str.dimmed(),
                wp.bold(),
                wp_rank.cyan(),
                maut.bold(),
                maut_rank.cyan(),
                name,
                sep = separator
            )
        } else {
            format!(
                "{} {}{sep}{}{sep}{}{sep}{}{sep}{}",
                index_str,
                wp,
                wp_rank,
                maut,
                maut_rank,
                name,
                sep = separator
            )
        }
    });

    let header = if use_colors {
        header.dimmed().to_string()
    } else {
        header
    };
    std::iter::once(header)
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format ranked rows as tab-separated values for scripting
/// Columns: name, wp, wp_rank, maut, maut_rank (no headers, no colors)
pub fn format_tsv(rows: &[&RankedCandidate]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                row.name,
                format_score(row.wp),
                row.wp_rank,
                format_score(row.maut),
                row.maut_rank
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full ranking, including normalized values and exclusions, as JSON
pub fn format_json(ranking: &Ranking) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(ranking)?)
}

/// Format an owner's laptops, one block per laptop
pub fn format_catalog(candidates: &[Candidate], use_colors: bool) -> String {
    if candidates.is_empty() {
        return "No laptops stored.".to_string();
    }

    candidates
        .iter()
        .map(|c| {
            let title = format!("[{}] {}", c.id, c.name);
            let title = if use_colors {
                title.bold().to_string()
            } else {
                title
            };
            format!(
                "{}\n  Price: {}\n  Memory: {} GB  Storage: {} GB\n  Processor: {} (score {})\n  Graphics: {} (score {})\n  Screen: {}\"  Rating: {}",
                title,
                c.price,
                c.memory,
                c.storage,
                c.processor(),
                c.processor_score(),
                c.graphics(),
                c.graphics_score(),
                c.screen_size,
                c.rating
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format weights as "criterion  percent  direction" lines
pub fn format_weights(weights: &WeightConfig, use_colors: bool) -> String {
    let lines = weights.entries().map(|(criterion, weight, direction)| {
        let label = format!("{:<10}", criterion.label());
        let percent = format!("{:>6.2}%", weight * 100.0);
        if use_colors {
            format!("{} {}  {}", label.bold(), percent, direction.dimmed())
        } else {
            format!("{} {}  {}", label, percent, direction)
        }
    });
    let total = format!("{:<10} {:>6.2}%", "Total", weights.total() * 100.0);
    lines.chain(std::iter::once(total)).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::sample_input;
    use crate::catalog::{Catalog, RawValue};
    use crate::scoring::Criterion;
    use std::collections::BTreeMap;

    fn sample_row(name: &str, wp: f64, wp_rank: u32, maut: f64, maut_rank: u32) -> RankedCandidate {
        RankedCandidate {
            id: 1,
            name: name.to_string(),
            wp,
            wp_rank,
            maut,
            maut_rank,
            normalized: BTreeMap::new(),
        }
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(1.0), "1.0000");
        assert_eq!(format_score(0.83216), "0.8322");
    }

    #[test]
    fn test_truncate_name_short() {
        assert_eq!(truncate_name("Zenbook 14", 20), "Zenbook 14");
    }

    #[test]
    fn test_truncate_name_long() {
        assert_eq!(truncate_name("ThinkPad X1 Carbon Gen 11", 15), "ThinkPad X1 ...");
    }

    #[test]
    fn test_truncate_name_unicode() {
        assert_eq!(truncate_name("Café Book Pro", 8), "Café ...");
    }

    #[test]
    fn test_truncate_name_very_narrow() {
        assert_eq!(truncate_name("Zenbook", 3), "Zen");
    }

    #[test]
    fn test_format_ranking_table_empty() {
        assert_eq!(format_ranking_table(&[], false), "No laptops to rank.");
    }

    #[test]
    fn test_format_ranking_table_rows() {
        let a = sample_row("Zenbook 14", 0.91234, 1, 0.9, 1);
        let b = sample_row("Aspire 5", 0.7, 2, 0.65, 2);
        let result = format_ranking_table(&[&a, &b], false);
        let lines: Vec<&str> = result.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("WP"));
        assert!(lines[0].contains("MAUT"));
        assert!(lines[1].starts_with(" 1."));
        assert!(lines[1].contains("0.9123"));
        assert!(lines[1].contains("Zenbook 14"));
        assert!(lines[2].starts_with(" 2."));
        assert!(lines[2].contains("Aspire 5"));
    }

    #[test]
    fn test_format_tsv() {
        let a = sample_row("Zenbook 14", 0.9, 1, 0.8, 2);
        let b = sample_row("Aspire 5", 0.7, 2, 0.85, 1);
        let result = format_tsv(&[&a, &b]);
        let lines: Vec<&str> = result.lines().collect();

        assert_eq!(lines[0], "Zenbook 14\t0.9000\t1\t0.8000\t2");
        assert_eq!(lines[1].split('\t').count(), 5);
    }

    #[test]
    fn test_format_tsv_empty() {
        assert_eq!(format_tsv(&[]), "");
    }

    #[test]
    fn test_format_json_has_normalized_and_exclusions() {
        let mut row = sample_row("Zenbook 14", 1.0, 1, 1.0, 1);
        row.normalized.insert(Criterion::Price, 1.0);
        let ranking = Ranking {
            rows: vec![row],
            excluded: vec![],
        };
        let json = format_json(&ranking).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["rows"][0]["name"], "Zenbook 14");
        assert_eq!(value["rows"][0]["wp_rank"], 1);
        assert_eq!(value["rows"][0]["normalized"]["price"], 1.0);
        assert!(value["excluded"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_format_catalog() {
        let mut catalog = Catalog::new();
        let mut input = sample_input("Zenbook 14", 1200.0);
        input.rating = RawValue::Text("tbd".to_string());
        catalog.add("alice", input);

        let result = format_catalog(&catalog.list("alice"), false);
        assert!(result.contains("[1] Zenbook 14"));
        assert!(result.contains("Price: 1200"));
        assert!(result.contains("Processor: Intel Core i7 (score 8)"));
        assert!(result.contains("Graphics: RTX 3050 (score 9)"));
        assert!(result.contains("Rating: \"tbd\""));
    }

    #[test]
    fn test_format_catalog_empty() {
        assert_eq!(format_catalog(&[], false), "No laptops stored.");
    }

    #[test]
    fn test_format_weights() {
        let result = format_weights(&WeightConfig::default(), false);
        let lines: Vec<&str> = result.lines().collect();

        assert_eq!(lines.len(), 8);
        assert!(lines[0].starts_with("Price"));
        assert!(lines[0].contains("25.00%"));
        assert!(lines[0].ends_with("cost"));
        assert!(lines[1].ends_with("benefit"));
        assert!(lines[7].contains("100.00%"));
    }
}
