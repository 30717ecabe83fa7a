pub mod changelog_checker;
pub mod config;
pub mod context;
pub mod git_ops;
pub mod report;
