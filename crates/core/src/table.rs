use crate::error::Result;
use crate::matrix::{CourseVector, RatingMatrix};
use crate::pearson::correlate;
use csv::WriterBuilder;
use ndarray::Array2;
use rayon::prelude::*;
use std::{collections::HashMap, io::Write};

/// Course × course Pearson correlations; `None` marks an undefined pair.
#[derive(Debug, Clone)]
pub struct CorrelationTable {
    courses: Vec<String>,
    index: HashMap<String, usize>,
    values: Array2<Option<f64>>,
}

impl CorrelationTable {
    pub fn compute(matrix: &RatingMatrix) -> Self {
        let columns: Vec<(&str, &CourseVector)> = matrix.columns().collect();
        let n = columns.len();

        // Upper triangle including the diagonal, one row per task.
        let row_results: Vec<Vec<Option<f64>>> = (0..n)
            .into_par_iter()
            .map(|i| {
                (i..n)
                    .map(|j| correlate(columns[i].1, columns[j].1))
                    .collect()
            })
            .collect();

        let mut values = Array2::<Option<f64>>::from_elem((n, n), None);
        for (i, row) in row_results.into_iter().enumerate() {
            for (offset, value) in row.into_iter().enumerate() {
                let j = i + offset;
                values[[i, j]] = value;
                values[[j, i]] = value;
            }
        }

        let courses: Vec<String> = columns.iter().map(|(c, _)| c.to_string()).collect();
        let index = courses
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();

        Self {
            courses,
            index,
            values,
        }
    }

    pub fn courses(&self) -> &[String] {
        &self.courses
    }

    /// Correlation between two courses, `None` if either is unknown or the pair is undefined.
    pub fn get(&self, lhs: &str, rhs: &str) -> Option<f64> {
        let i = *self.index.get(lhs)?;
        let j = *self.index.get(rhs)?;
        self.values[[i, j]]
    }

    /// Writes the table as TSV with a header row of course labels; undefined cells are blank.
    pub fn write_tsv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(writer);

        wtr.write_record(std::iter::once("").chain(self.courses.iter().map(String::as_str)))?;

        for (i, course) in self.courses.iter().enumerate() {
            let row_vals: Vec<String> = self
                .values
                .row(i)
                .iter()
                .map(|r| r.map(|v| v.to_string()).unwrap_or_default())
                .collect();
            wtr.write_record(
                std::iter::once(course.as_str()).chain(row_vals.iter().map(String::as_str)),
            )?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::RatingRecord;

    fn sample() -> RatingMatrix {
        let rows = [
            ("S1", "A", 1.0),
            ("S2", "A", 2.0),
            ("S3", "A", 3.0),
            ("S1", "B", 3.0),
            ("S2", "B", 2.0),
            ("S3", "B", 1.0),
            ("S1", "C", 4.0),
        ];
        let records: Vec<RatingRecord> = rows
            .iter()
            .map(|&(s, c, r)| RatingRecord::new(s, c, r))
            .collect();
        RatingMatrix::from_records(&records).expect("finite ratings")
    }

    #[test]
    fn table_is_symmetric_with_undefined_cells() {
        let table = CorrelationTable::compute(&sample());
        assert_eq!(table.courses(), ["A", "B", "C"]);
        assert!((table.get("A", "B").expect("defined") + 1.0).abs() < 1e-12);
        assert_eq!(table.get("A", "B"), table.get("B", "A"));
        assert!((table.get("A", "A").expect("defined") - 1.0).abs() < 1e-12);
        assert_eq!(table.get("A", "C"), None);
        assert_eq!(table.get("C", "C"), None);
        assert_eq!(table.get("A", "Missing"), None);
    }

    #[test]
    fn tsv_has_blank_undefined_cells() {
        let table = CorrelationTable::compute(&sample());
        let mut buf = Vec::new();
        table.write_tsv(&mut buf).expect("in-memory write");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "\tA\tB\tC");
        assert_eq!(lines[1], "A\t1\t-1\t");
        assert_eq!(lines[3], "C\t\t\t");
    }
}
