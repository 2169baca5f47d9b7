//! Probe requests and the factory that stamps them out.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{Endpoint, ProbeConfig};

/// JSON body of a synthetic comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPayload {
    pub post_id: i64,
    pub user_id: i64,
    pub text: String,
}

/// One probe, immutable once built.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    /// 1-based issuance index.
    pub sequence: u32,
    pub payload: CommentPayload,
    pub target: Arc<Endpoint>,
}

/// Builds the probe for each sequence index of a run.
#[derive(Debug, Clone)]
pub struct ProbeFactory {
    target: Arc<Endpoint>,
    post_id: i64,
    user_id: i64,
    text_prefix: String,
}

impl ProbeFactory {
    pub fn new(target: Endpoint, probe: &ProbeConfig) -> Self {
        Self {
            target: Arc::new(target),
            post_id: probe.post_id,
            user_id: probe.user_id,
            text_prefix: probe.text_prefix.clone(),
        }
    }

    pub fn target(&self) -> &Endpoint {
        &self.target
    }

    /// Build probe `sequence` (starting at 1).
    pub fn build(&self, sequence: u32) -> ProbeRequest {
        debug_assert!(sequence >= 1, "sequence indices start at 1");
        ProbeRequest {
            sequence,
            payload: CommentPayload {
                post_id: self.post_id,
                user_id: self.user_id,
                text: format!("{} {}", self.text_prefix, sequence),
            },
            target: Arc::clone(&self.target),
        }
    }
}
