//! Table → table stages.
//!
//! Row-wise stages (`AddField`, `Convert`, `Cutout`, `RowSlice`) stay lazy and
//! pull one upstream row per emitted row. `Sort` and `ValueCounts` buffer
//! their input when scanned and emit from memory.

mod add_field;
mod convert;
mod cutout;
mod slice;
mod sort;
mod value_counts;

pub use add_field::AddField;
pub use convert::Convert;
pub use cutout::Cutout;
pub use slice::RowSlice;
pub use sort::{Sort, SortOrder};
pub use value_counts::{ValueCounts, COUNT_FIELD, FREQUENCY_FIELD};
