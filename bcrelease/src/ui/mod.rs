//! Terminal rendering for `bcrelease`.

pub mod diff_viewer;
pub mod output_format;
pub mod summary;
