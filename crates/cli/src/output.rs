use clap::ValueEnum;
use courserec_core::{ScoredCourse, Strength};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct Row<'a> {
    course: &'a str,
    score: f64,
    strength: Strength,
}

const LEGEND: &str = "\
Note:
  A score near +1 means the course is strongly recommended.
  A score near 0 means the course is moderately recommended.
  A score near -1 means the course is not recommended.";

pub fn write_recommendations<W: Write>(
    mut out: W,
    anchor: &str,
    ranked: &[ScoredCourse],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<Row<'_>> = ranked
                .iter()
                .map(|s| Row {
                    course: &s.course,
                    score: s.score,
                    strength: s.strength(),
                })
                .collect();
            serde_json::to_writer_pretty(&mut out, &rows)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            if ranked.is_empty() {
                writeln!(out, "No course has enough shared ratings with '{}'.", anchor)?;
                return Ok(());
            }
            writeln!(out, "Recommendations for students who like '{}':", anchor)?;
            let width = ranked.iter().map(|s| s.course.len()).max().unwrap_or(0);
            for (i, scored) in ranked.iter().enumerate() {
                writeln!(
                    out,
                    "{:>3}. {:<width$}  {:>7.4}  {}",
                    i + 1,
                    scored.course,
                    scored.score,
                    scored.strength(),
                    width = width
                )?;
            }
            writeln!(out)?;
            writeln!(out, "{}", LEGEND)?;
        }
    }
    Ok(())
}
