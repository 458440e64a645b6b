pub mod catalog;
pub mod error;
pub mod loader;
pub mod matrix;
pub mod pearson;
pub mod presets;
pub mod rank;
pub mod recommend;
pub mod table;

pub use catalog::{load_catalog, load_catalog_path, Catalog};
pub use error::{RecError, Result};
pub use loader::{load_ratings, load_ratings_path, LoadOptions, RatingRecord};
pub use matrix::{CourseVector, RatingMatrix};
pub use pearson::correlate;
pub use rank::{rank, RankOptions, ScoredCourse, SelfComparison, Strength};
pub use recommend::Recommender;
pub use table::CorrelationTable;
