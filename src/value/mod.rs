//! Scalar values and rows
//!
//! There is exactly one coercion and comparison policy in livequery and it
//! lives here: [`to_numeric`], [`compare`] and [`like_match`]. Every other
//! subsystem (WHERE evaluation, aggregation, sorting) goes through these.

mod compare;
mod like;
mod row;
mod value;

pub use compare::{compare, to_numeric};
pub use like::{like_match, LikePattern};
pub use row::Row;
pub use value::Value;
