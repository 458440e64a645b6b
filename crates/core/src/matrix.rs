use crate::error::{RecError, Result};
use crate::loader::RatingRecord;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Ratings given to a single course, keyed by student id.
///
/// Students who did not rate the course have no entry; a stored `0.0` is a real rating.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseVector {
    ratings: BTreeMap<String, f64>,
}

impl CourseVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a rating, returning the one it replaced.
    pub fn insert(&mut self, student_id: impl Into<String>, rating: f64) -> Option<f64> {
        self.ratings.insert(student_id.into(), rating)
    }

    pub fn get(&self, student_id: &str) -> Option<f64> {
        self.ratings.get(student_id).copied()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Iterates `(student_id, rating)` in student id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.ratings.iter().map(|(s, &r)| (s.as_str(), r))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for CourseVector {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut vector = CourseVector::new();
        for (student, rating) in iter {
            vector.insert(student, rating);
        }
        vector
    }
}

/// Student × course table of ratings, stored column-wise as partial mappings.
#[derive(Debug, Clone, Default)]
pub struct RatingMatrix {
    columns: BTreeMap<String, CourseVector>,
    student_count: usize,
    duplicates: usize,
}

impl RatingMatrix {
    /// Pivots records into per-course columns. A repeated (student, course) pair keeps the
    /// last rating seen.
    pub fn from_records(records: &[RatingRecord]) -> Result<Self> {
        let mut columns: BTreeMap<String, CourseVector> = BTreeMap::new();
        let mut students = BTreeSet::new();
        let mut duplicates = 0;

        for record in records {
            if !record.rating.is_finite() {
                return Err(RecError::InvalidRating(format!(
                    "non-finite rating {} for student '{}' in course '{}'",
                    record.rating, record.student_id, record.course
                )));
            }

            let column = columns.entry(record.course.clone()).or_default();
            if let Some(previous) = column.insert(record.student_id.clone(), record.rating) {
                duplicates += 1;
                warn!(
                    student_id = %record.student_id,
                    course = %record.course,
                    previous,
                    rating = record.rating,
                    "Duplicate rating, keeping the later value"
                );
            }
            students.insert(record.student_id.as_str());
        }

        info!(
            student_count = students.len(),
            course_count = columns.len(),
            duplicates,
            "Rating matrix built"
        );

        Ok(Self {
            student_count: students.len(),
            columns,
            duplicates,
        })
    }

    pub fn get(&self, course: &str) -> Option<&CourseVector> {
        self.columns.get(course)
    }

    pub fn contains(&self, course: &str) -> bool {
        self.columns.contains_key(course)
    }

    /// All distinct course labels. The order is stable but carries no meaning.
    pub fn courses(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &CourseVector)> {
        self.columns.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn course_count(&self) -> usize {
        self.columns.len()
    }

    pub fn student_count(&self) -> usize {
        self.student_count
    }

    /// Number of records that overwrote an earlier rating for the same pair.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
