pub mod repository;
pub mod types;

pub use repository::{DiffTreeSource, GitCli, parse_diff_tree};
pub use types::*;
