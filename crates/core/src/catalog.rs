use crate::error::Result;
use crate::loader::{column_index, open_source, row_error, LoadOptions, COURSE_FIELD};
use crate::matrix::RatingMatrix;
use csv::ReaderBuilder;
use std::{collections::BTreeSet, io::Read, path::Path};
use tracing::info;

/// The set of courses offered in a domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    courses: BTreeSet<String>,
}

impl Catalog {
    pub fn contains(&self, course: &str) -> bool {
        self.courses.contains(course)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn courses(&self) -> impl Iterator<Item = &str> {
        self.courses.iter().map(String::as_str)
    }

    /// Catalogued courses nobody has rated.
    pub fn unrated_courses<'a>(&'a self, matrix: &'a RatingMatrix) -> Vec<&'a str> {
        self.courses()
            .filter(|course| !matrix.contains(course))
            .collect()
    }

    /// Rated courses missing from the catalog.
    pub fn uncatalogued_courses<'a>(&self, matrix: &'a RatingMatrix) -> Vec<&'a str> {
        matrix
            .courses()
            .filter(|course| !self.contains(course))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Catalog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            courses: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Reads a catalog table; only its `course` column is used. Blank labels are skipped.
pub fn load_catalog<R: Read>(reader: R, options: &LoadOptions) -> Result<Catalog> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let course_idx = column_index(rdr.headers().map_err(row_error)?, COURSE_FIELD)?;

    let mut courses = BTreeSet::new();
    for row in rdr.records() {
        let row = row.map_err(row_error)?;
        if let Some(course) = row.get(course_idx).map(str::trim).filter(|c| !c.is_empty()) {
            courses.insert(course.to_string());
        }
    }
    Ok(Catalog { courses })
}

pub fn load_catalog_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Catalog> {
    let path = path.as_ref();
    let catalog = load_catalog(open_source(path)?, options)?;
    info!(path = %path.display(), course_count = catalog.len(), "Catalog loaded");
    Ok(catalog)
}
