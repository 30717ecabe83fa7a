// ci trigger context, read once from the environment

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;

pub const COMMIT_MESSAGE_VAR: &str = "CI_COMMIT_MESSAGE";
pub const PIPELINE_SOURCE_VAR: &str = "CI_PIPELINE_SOURCE";
pub const REF_NAME_VAR: &str = "CI_COMMIT_REF_NAME";
pub const BEFORE_SHA_VAR: &str = "CI_COMMIT_BEFORE_SHA";
pub const MERGE_REQUEST_DIFF_BASE_SHA_VAR: &str = "CI_MERGE_REQUEST_DIFF_BASE_SHA";

/// what triggered the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineSource {
    Push,
    MergeRequestEvent,
    Other(String),
}

impl PipelineSource {
    pub fn from_string(s: &str) -> Self {
        match s {
            "push" => PipelineSource::Push,
            "merge_request_event" => PipelineSource::MergeRequestEvent,
            other => PipelineSource::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PipelineSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineSource::Push => write!(f, "push"),
            PipelineSource::MergeRequestEvent => write!(f, "merge_request_event"),
            PipelineSource::Other(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerContext {
    pub commit_message: String,
    pub pipeline_source: PipelineSource,
    pub ref_name: String,
    pub before_sha: String,
    pub merge_request_diff_base_sha: String,
}

impl TriggerContext {
    /// load the context from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    /// read only the commit message, enough to decide whether to skip
    pub fn commit_message_from_env() -> Result<String> {
        Self::commit_message_from_lookup(env_lookup)
    }

    pub fn commit_message_from_lookup<F>(lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(COMMIT_MESSAGE_VAR).ok_or_else(|| Error::MissingEnvVar {
            name: COMMIT_MESSAGE_VAR.to_string(),
        })
    }

    /// load the context through an arbitrary variable lookup
    ///
    /// every variable is required; the first missing one is reported
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| {
            lookup(name).ok_or_else(|| Error::MissingEnvVar {
                name: name.to_string(),
            })
        };

        Ok(Self {
            commit_message: Self::commit_message_from_lookup(&lookup)?,
            pipeline_source: PipelineSource::from_string(&require(PIPELINE_SOURCE_VAR)?),
            ref_name: require(REF_NAME_VAR)?,
            before_sha: require(BEFORE_SHA_VAR)?,
            merge_request_diff_base_sha: require(MERGE_REQUEST_DIFF_BASE_SHA_VAR)?,
        })
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var_os(name).map(lossy_value)
}

// a set variable that is not valid UTF-8 still counts as set
fn lossy_value(value: OsString) -> String {
    value.to_string_lossy().into_owned()
}
