//! Invite and candidate search configuration.

use serde::{Deserialize, Serialize};

/// Limits applied when creating invites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteConfig {
    /// Maximum number of pending invites a sender may have outstanding
    /// across all of their projects.
    #[serde(default = "default_max_pending")]
    pub max_pending_per_sender: u32,
    /// Number of random bytes in a link invite token.
    #[serde(default = "default_token_bytes")]
    pub link_token_bytes: usize,
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            max_pending_per_sender: default_max_pending(),
            link_token_bytes: default_token_bytes(),
        }
    }
}

/// Bounds for the interactive candidate search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Queries shorter than this return an empty result.
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    /// Queries longer than this are rejected.
    #[serde(default = "default_max_query_len")]
    pub max_query_len: usize,
    /// Maximum number of candidates returned.
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: default_min_query_len(),
            max_query_len: default_max_query_len(),
            result_limit: default_result_limit(),
        }
    }
}

fn default_max_pending() -> u32 {
    5
}

fn default_token_bytes() -> usize {
    32
}

fn default_min_query_len() -> usize {
    2
}

fn default_max_query_len() -> usize {
    64
}

fn default_result_limit() -> u32 {
    5
}
