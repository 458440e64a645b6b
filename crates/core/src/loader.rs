use crate::error::{RecError, Result};
use csv::{ReaderBuilder, StringRecord};
use flate2::read::MultiGzDecoder;
use std::{fs::File, io::Read, path::Path};
use tracing::info;

pub const STUDENT_FIELD: &str = "studentID";
pub const COURSE_FIELD: &str = "course";
pub const RATING_FIELD: &str = "rating";

/// One row of the ratings table.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRecord {
    pub student_id: String,
    pub course: String,
    pub rating: f64,
}

impl RatingRecord {
    pub fn new(student_id: impl Into<String>, course: impl Into<String>, rating: f64) -> Self {
        Self {
            student_id: student_id.into(),
            course: course.into(),
            rating,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Opens `path` for reading, decompressing `.gz` files on the fly.
pub(crate) fn open_source(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)?;
    let is_gz = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    if is_gz {
        Ok(Box::new(MultiGzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Finds the index of a named header field, ignoring surrounding whitespace and ASCII case.
pub(crate) fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            RecError::MalformedInput(format!("Missing required column '{}' in header", name))
        })
}

/// Maps a per-row parse failure (such as invalid UTF-8) to `MalformedInput`; read failures
/// of the underlying source stay `Csv`.
pub(crate) fn row_error(err: csv::Error) -> RecError {
    if err.is_io_error() {
        return RecError::Csv(err);
    }
    let line = err
        .position()
        .map(|p| p.line().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    RecError::MalformedInput(format!("Unreadable row on line {}: {}", line, err))
}

pub(crate) fn required_field<'a>(
    record: &'a StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<&'a str> {
    let value = record.get(index).map(str::trim).ok_or_else(|| {
        RecError::MalformedInput(format!("Missing '{}' field on line {}", name, line))
    })?;
    if value.is_empty() {
        return Err(RecError::MalformedInput(format!(
            "Empty '{}' field on line {}",
            name, line
        )));
    }
    Ok(value)
}

pub fn load_ratings<R: Read>(reader: R, options: &LoadOptions) -> Result<Vec<RatingRecord>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().map_err(row_error)?.clone();
    let student_idx = column_index(&headers, STUDENT_FIELD)?;
    let course_idx = column_index(&headers, COURSE_FIELD)?;
    let rating_idx = column_index(&headers, RATING_FIELD)?;

    let mut records = Vec::new();
    for (idx, row) in rdr.records().enumerate() {
        let row = row.map_err(row_error)?;
        // Quoted fields may span lines, so prefer the reader's own position.
        let line = row.position().map_or(idx as u64 + 2, |p| p.line());

        let student_id = required_field(&row, student_idx, STUDENT_FIELD, line)?;
        let course = required_field(&row, course_idx, COURSE_FIELD, line)?;
        let raw_rating = required_field(&row, rating_idx, RATING_FIELD, line)?;
        let rating: f64 = raw_rating.parse().map_err(|_| {
            RecError::InvalidRating(format!(
                "'{}' is not numeric on line {}",
                raw_rating, line
            ))
        })?;

        records.push(RatingRecord::new(student_id, course, rating));
    }

    Ok(records)
}

pub fn load_ratings_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Vec<RatingRecord>> {
    let path = path.as_ref();
    let records = load_ratings(open_source(path)?, options)?;
    info!(
        path = %path.display(),
        record_count = records.len(),
        "Ratings loaded"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load(text: &str) -> Result<Vec<RatingRecord>> {
        load_ratings(Cursor::new(text), &LoadOptions::default())
    }

    #[test]
    fn parses_required_columns_and_ignores_extras() {
        let records = load("timestamp,studentID,course,rating\n2020,1,Algebra,4.5\n2021,2,Algebra,3\n")
            .expect("valid input");
        assert_eq!(
            records,
            vec![
                RatingRecord::new("1", "Algebra", 4.5),
                RatingRecord::new("2", "Algebra", 3.0),
            ]
        );
    }

    #[test]
    fn header_match_ignores_case_and_padding() {
        let records = load(" StudentId , COURSE ,Rating\n7,  The Chinese Economy ,2\n").expect("valid");
        assert_eq!(records[0].student_id, "7");
        assert_eq!(records[0].course, "The Chinese Economy");
    }

    #[test]
    fn missing_column_is_malformed() {
        let err = load("studentID,course\n1,Algebra\n").unwrap_err();
        assert!(matches!(err, RecError::MalformedInput(msg) if msg.contains("rating")));
    }

    #[test]
    fn short_row_is_malformed() {
        let err = load("studentID,course,rating\n1,Algebra\n").unwrap_err();
        assert!(matches!(err, RecError::MalformedInput(msg) if msg.contains("line 2")));
    }

    #[test]
    fn empty_course_is_malformed() {
        let err = load("studentID,course,rating\n1,,3\n").unwrap_err();
        assert!(matches!(err, RecError::MalformedInput(_)));
    }

    #[test]
    fn non_numeric_rating_is_invalid() {
        let err = load("studentID,course,rating\n1,Algebra,3\n2,Algebra,great\n").unwrap_err();
        assert!(matches!(err, RecError::InvalidRating(msg) if msg.contains("line 3")));
    }

    #[test]
    fn non_finite_rating_passes_through_loader() {
        let records = load("studentID,course,rating\n1,Algebra,NaN\n").expect("parses");
        assert!(records[0].rating.is_nan());
    }

    #[test]
    fn invalid_utf8_row_is_malformed() {
        let bytes: &[u8] = b"studentID,course,rating\n1,\xff\xfe,3\n";
        let err = load_ratings(Cursor::new(bytes), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, RecError::MalformedInput(msg) if msg.contains("line 2")));
    }

    #[test]
    fn line_numbers_follow_multiline_fields() {
        let err = load("studentID,course,rating\n1,\"Film\nStudies\",4\n2,Algebra,x\n").unwrap_err();
        assert!(matches!(err, RecError::InvalidRating(msg) if msg.contains("line 4")));
    }

    #[test]
    fn custom_delimiter() {
        let options = LoadOptions { delimiter: b'\t' };
        let records = load_ratings(Cursor::new("studentID\tcourse\trating\n1\tA, B\t5\n"), &options)
            .expect("valid");
        assert_eq!(records[0].course, "A, B");
    }
}
