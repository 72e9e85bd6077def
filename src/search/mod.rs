//! Search and filtering over a loaded course dataset.

mod filter;
mod ranges;
mod totals;

pub use filter::{find_by_name, CourseFilter, CourseMatch};
pub use ranges::{parse_hole_input, YardageRange, MAX_HOLE_NUMBER};
pub use totals::{
    distinct_tees, find_tee, flatten_courses, hole_rows, tee_course_counts, tee_totals,
    tee_totals_for_holes, TeeRow,
};
