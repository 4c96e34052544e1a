mod comment;
mod sloc;
mod tree;

pub use comment::{CommentPolicy, GENERIC_PREFIXES, LineKind, classify};
pub use sloc::{FileClassification, SlocCounter};
pub use tree::{RepositoryCount, TreeCounter};
