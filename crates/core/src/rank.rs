use crate::error::{RecError, Result};
use crate::matrix::RatingMatrix;
use crate::pearson::correlate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum_macros::{Display, EnumString};
use tracing::debug;

/// Whether the anchor course may appear in its own ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display, Serialize, Deserialize)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SelfComparison {
    /// The anchor is scored like any other course (it scores 1.0 when defined).
    #[default]
    Include,
    Exclude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankOptions {
    pub top_n: usize,
    pub self_comparison: SelfComparison,
}

impl RankOptions {
    pub fn top(top_n: usize) -> Self {
        Self {
            top_n,
            self_comparison: SelfComparison::default(),
        }
    }

    pub fn excluding_anchor(mut self) -> Self {
        self.self_comparison = SelfComparison::Exclude;
        self
    }
}

/// How strongly a score recommends its course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    #[strum(to_string = "strongly recommended")]
    Strong,
    #[strum(to_string = "moderately recommended")]
    Moderate,
    #[strum(to_string = "not recommended")]
    NotRecommended,
}

impl Strength {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.5 {
            Strength::Strong
        } else if score <= -0.5 {
            Strength::NotRecommended
        } else {
            Strength::Moderate
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCourse {
    pub course: String,
    pub score: f64,
}

impl ScoredCourse {
    pub fn strength(&self) -> Strength {
        Strength::from_score(self.score)
    }
}

/// Descending by score, then ascending by course label.
fn by_score_then_label(a: &ScoredCourse, b: &ScoredCourse) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.course.cmp(&b.course))
}

/// Ranks every course in `matrix` by its correlation with `anchor`.
///
/// Courses whose correlation is undefined are left out. At most `options.top_n` entries are
/// returned, sorted by descending score with ties broken by course label. The anchor is trimmed
/// the same way course labels are when loaded.
pub fn rank(anchor: &str, matrix: &RatingMatrix, options: &RankOptions) -> Result<Vec<ScoredCourse>> {
    let anchor = anchor.trim();
    let anchor_vector = matrix
        .get(anchor)
        .ok_or_else(|| RecError::UnknownCourse(anchor.to_string()))?;

    let candidates: Vec<_> = matrix
        .columns()
        .filter(|(course, _)| {
            options.self_comparison == SelfComparison::Include || *course != anchor
        })
        .collect();

    let mut scored: Vec<ScoredCourse> = candidates
        .into_par_iter()
        .filter_map(|(course, vector)| {
            correlate(anchor_vector, vector).map(|score| ScoredCourse {
                course: course.to_string(),
                score,
            })
        })
        .collect();

    debug!(
        anchor,
        defined = scored.len(),
        course_count = matrix.course_count(),
        "Candidates scored"
    );

    scored.sort_by(by_score_then_label);
    scored.truncate(options.top_n);
    Ok(scored)
}
