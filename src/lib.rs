pub mod error;
pub mod utils;

pub use error::*;
pub use utils::changelog_checker::ChangelogGateChecker;
pub use utils::config::GateConfig;
pub use utils::context::{PipelineSource, TriggerContext};
pub use utils::git_ops::{
    ChangeType, DiffOutput, DiffTreeSource, FileStatus, GitCli, RevisionRange, parse_diff_tree,
};
pub use utils::report::{GateOutcome, GateReport};
