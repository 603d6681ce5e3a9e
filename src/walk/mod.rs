//! File tree walking: name patterns, descriptors and the walker itself.

mod descriptor;
mod pattern;
mod walker;

pub use descriptor::{FileDescriptor, SearchCondition};
pub use pattern::{NameMatcher, glob_to_regex};
pub use walker::{WALK_TITLE, describe_file, walk};
