use crate::matrix::CourseVector;
use ndarray::{Array1, ArrayBase, Data, Ix1};

/// Ratings of the students present in both vectors, in student id order.
pub fn paired_ratings(lhs: &CourseVector, rhs: &CourseVector) -> (Array1<f64>, Array1<f64>) {
    let (small, large, swapped) = if lhs.len() <= rhs.len() {
        (lhs, rhs, false)
    } else {
        (rhs, lhs, true)
    };

    let mut xs = Vec::with_capacity(small.len());
    let mut ys = Vec::with_capacity(small.len());
    for (student, rating) in small.iter() {
        if let Some(other) = large.get(student) {
            xs.push(rating);
            ys.push(other);
        }
    }

    if swapped {
        (Array1::from(ys), Array1::from(xs))
    } else {
        (Array1::from(xs), Array1::from(ys))
    }
}

fn is_constant<S>(values: &ArrayBase<S, Ix1>) -> bool
where
    S: Data<Elem = f64>,
{
    match values.iter().next() {
        Some(&first) => values.iter().all(|&v| v == first),
        None => true,
    }
}

/// Divides by the largest magnitude so means and sums of squares stay finite and nonzero
/// for ratings near the ends of the f64 range. Leaves r unchanged.
fn normalized<S>(values: &ArrayBase<S, Ix1>) -> Array1<f64>
where
    S: Data<Elem = f64>,
{
    let peak = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    values.mapv(|v| v / peak)
}

/// Pearson's r between two equally long samples.
///
/// Returns `None` for fewer than two pairs or when either side has zero variance.
pub fn pearson_pair<S1, S2>(x: &ArrayBase<S1, Ix1>, y: &ArrayBase<S2, Ix1>) -> Option<f64>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    assert_eq!(
        x.len(),
        y.len(),
        "Pearson correlation requires equal sample count on both sides"
    );
    if x.len() < 2 || is_constant(x) || is_constant(y) {
        return None;
    }

    let x = normalized(x);
    let y = normalized(y);
    let centered_x = &x - x.mean()?;
    let centered_y = &y - y.mean()?;

    let cov = centered_x.dot(&centered_y);
    let scale = centered_x.dot(&centered_x).sqrt() * centered_y.dot(&centered_y).sqrt();
    if !scale.is_finite() || scale == 0.0 {
        return None;
    }

    Some((cov / scale).clamp(-1.0, 1.0))
}

/// Correlates two courses over the students who rated both, centring each side on its mean
/// over that shared sample only.
pub fn correlate(lhs: &CourseVector, rhs: &CourseVector) -> Option<f64> {
    let (x, y) = paired_ratings(lhs, rhs);
    pearson_pair(&x, &y)
}
