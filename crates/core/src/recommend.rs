use crate::catalog::Catalog;
use crate::error::Result;
use crate::loader::{load_ratings_path, LoadOptions, RatingRecord};
use crate::matrix::RatingMatrix;
use crate::rank::{rank, RankOptions, ScoredCourse};
use std::path::Path;
use tracing::{info, warn};

/// A rating matrix ready to answer recommendation requests, optionally checked against a catalog.
#[derive(Debug, Clone)]
pub struct Recommender {
    matrix: RatingMatrix,
    catalog: Option<Catalog>,
}

impl Recommender {
    pub fn new(matrix: RatingMatrix) -> Self {
        Self {
            matrix,
            catalog: None,
        }
    }

    pub fn from_records(records: &[RatingRecord]) -> Result<Self> {
        Ok(Self::new(RatingMatrix::from_records(records)?))
    }

    pub fn from_ratings_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        let records = load_ratings_path(path, options)?;
        Self::from_records(&records)
    }

    /// Attaches a catalog and logs courses that appear on only one side.
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        let unrated = catalog.unrated_courses(&self.matrix);
        if !unrated.is_empty() {
            warn!(count = unrated.len(), courses = ?unrated, "Catalogued courses without ratings");
        }
        let uncatalogued = catalog.uncatalogued_courses(&self.matrix);
        if !uncatalogued.is_empty() {
            warn!(
                count = uncatalogued.len(),
                courses = ?uncatalogued,
                "Rated courses missing from catalog"
            );
        }
        self.catalog = Some(catalog);
        self
    }

    pub fn matrix(&self) -> &RatingMatrix {
        &self.matrix
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn recommend(&self, anchor: &str, options: &RankOptions) -> Result<Vec<ScoredCourse>> {
        let ranked = rank(anchor, &self.matrix, options)?;
        info!(
            anchor,
            requested = options.top_n,
            returned = ranked.len(),
            self_comparison = %options.self_comparison,
            "Recommendations ranked"
        );
        Ok(ranked)
    }
}
