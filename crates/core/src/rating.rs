//! Title rating aggregation.
//!
//! A title's rating is never stored. It is the arithmetic mean of its review
//! scores, exposed as an integer truncated toward zero, and absent when the
//! title has no reviews.

/// Convert a database `AVG(score)` into the exposed integer rating.
pub fn rating_from_average(average: Option<f64>) -> Option<i32> {
    average.map(|avg| avg.trunc() as i32)
}
