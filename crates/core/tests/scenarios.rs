use courserec_core::{
    correlate, load_catalog, load_ratings, load_ratings_path, rank, LoadOptions, RankOptions,
    RatingMatrix, RecError, Recommender, Strength,
};
use flate2::{write::GzEncoder, Compression};
use std::io::{Cursor, Write};

const RATINGS: &str = "\
studentID,course,rating,semester
S1,A,5,fall
S2,A,4,fall
S3,A,3,fall
S1,B,5,fall
S2,B,4,spring
S3,B,3,spring
S1,C,3,fall
S2,C,4,fall
S3,C,5,fall
S1,D,2,spring
";

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

fn sample_matrix() -> RatingMatrix {
    let records = load_ratings(Cursor::new(RATINGS), &LoadOptions::default()).expect("valid csv");
    RatingMatrix::from_records(&records).expect("finite ratings")
}

#[test]
fn identical_courses_correlate_to_one() {
    let matrix = sample_matrix();
    let a = matrix.get("A").expect("A");
    let b = matrix.get("B").expect("B");
    assert!(approx_eq(correlate(a, b).expect("defined"), 1.0, 1e-12));
}

#[test]
fn inverse_courses_correlate_to_minus_one() {
    let matrix = sample_matrix();
    let a = matrix.get("A").expect("A");
    let c = matrix.get("C").expect("C");
    assert!(approx_eq(correlate(a, c).expect("defined"), -1.0, 1e-12));
}

#[test]
fn single_rater_course_is_undefined_and_unranked() {
    let matrix = sample_matrix();
    let a = matrix.get("A").expect("A");
    let d = matrix.get("D").expect("D");
    assert_eq!(correlate(a, d), None);

    for top_n in 1..=6 {
        let ranked = rank("A", &matrix, &RankOptions::top(top_n)).expect("known anchor");
        assert!(ranked.len() <= top_n);
        assert!(ranked.iter().all(|s| s.course != "D"));
    }
}

#[test]
fn unknown_anchor_fails_without_partial_results() {
    let matrix = sample_matrix();
    let err = rank("Physics", &matrix, &RankOptions::top(4)).unwrap_err();
    assert!(matches!(err, RecError::UnknownCourse(ref c) if c == "Physics"));
    assert_eq!(err.to_string(), "Unknown course: 'Physics'");
}

#[test]
fn recommender_end_to_end() {
    let records = load_ratings(Cursor::new(RATINGS), &LoadOptions::default()).expect("valid csv");
    let catalog = load_catalog(Cursor::new("course\nA\nB\nC\nD\nE\n"), &LoadOptions::default())
        .expect("valid catalog");
    let recommender = Recommender::from_records(&records)
        .expect("finite ratings")
        .with_catalog(catalog);

    let ranked = recommender
        .recommend("A", &RankOptions::top(4))
        .expect("known anchor");
    let labels: Vec<&str> = ranked.iter().map(|s| s.course.as_str()).collect();
    assert_eq!(labels, vec!["A", "B", "C"]);
    assert_eq!(ranked[0].strength(), Strength::Strong);
    assert_eq!(ranked[2].strength(), Strength::NotRecommended);

    let excluded = recommender
        .recommend("A", &RankOptions::top(4).excluding_anchor())
        .expect("known anchor");
    assert_eq!(excluded[0].course, "B");

    assert_eq!(recommender.catalog().map(|c| c.len()), Some(5));
}

#[test]
fn non_finite_rating_is_rejected_by_builder() {
    let records = load_ratings(
        Cursor::new("studentID,course,rating\n1,A,inf\n"),
        &LoadOptions::default(),
    )
    .expect("parses as a number");
    let err = RatingMatrix::from_records(&records).unwrap_err();
    assert!(matches!(err, RecError::InvalidRating(_)));
}

#[test]
fn loads_gzip_compressed_ratings() {
    let dir = std::env::temp_dir().join(format!("courserec-gz-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("ratings.csv.gz");

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(RATINGS.as_bytes()).expect("compress");
    std::fs::write(&path, encoder.finish().expect("finish gzip")).expect("write gz");

    let records = load_ratings_path(&path, &LoadOptions::default()).expect("gzip input");
    assert_eq!(records.len(), 10);

    let recommender =
        Recommender::from_ratings_path(&path, &LoadOptions::default()).expect("gzip input");
    assert_eq!(recommender.matrix().course_count(), 4);
    assert_eq!(recommender.matrix().student_count(), 3);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_file_is_io_error() {
    let err = load_ratings_path("/definitely/not/here.csv", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, RecError::Io(_)));
}
