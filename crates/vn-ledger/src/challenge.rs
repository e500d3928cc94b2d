//! Voice challenges.
//!
//! A challenge is a prompt a voice agent must read back. The caller
//! registers the prompt, obtains a transcript of the agent's reading by
//! whatever means it has, and asks the book how closely the transcript
//! matches. Challenges live only in memory; they are not part of the
//! persisted ledger.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;
use similar::TextDiff;
use vn_types::{ChallengeId, Timestamp};

/// Score at or above which a transcript passes when the caller does not
/// supply a threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChallengeError {
    #[error("challenge text must not be empty")]
    EmptyText,

    #[error("challenge not found: {0}")]
    NotFound(ChallengeId),

    #[error("threshold {0} outside [0, 1]")]
    InvalidThreshold(String),

    #[error("challenge book lock poisoned")]
    LockPoisoned,
}

pub type ChallengeResult<T> = Result<T, ChallengeError>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: ChallengeId,
    pub text: String,
    pub created_at: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeOutcome {
    pub challenge_id: ChallengeId,
    /// Similarity in `[0, 1]`; 1 means identical after normalization.
    pub score: f64,
    pub threshold: f64,
    pub passed: bool,
}

/// In-memory registry of open challenges.
#[derive(Debug, Default)]
pub struct ChallengeBook {
    challenges: RwLock<HashMap<ChallengeId, Challenge>>,
}

impl ChallengeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prompt.
    pub fn create(&self, text: &str) -> ChallengeResult<Challenge> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChallengeError::EmptyText);
        }
        let challenge = Challenge {
            id: ChallengeId::new(),
            text: text.to_string(),
            created_at: Timestamp::now(),
        };
        self.challenges
            .write()
            .map_err(|_| ChallengeError::LockPoisoned)?
            .insert(challenge.id, challenge.clone());
        tracing::debug!(challenge = %challenge.id, "challenge created");
        Ok(challenge)
    }

    pub fn get(&self, id: ChallengeId) -> ChallengeResult<Option<Challenge>> {
        let challenges = self
            .challenges
            .read()
            .map_err(|_| ChallengeError::LockPoisoned)?;
        Ok(challenges.get(&id).cloned())
    }

    /// Score `transcript` against the registered prompt.
    pub fn validate(
        &self,
        id: ChallengeId,
        transcript: &str,
        threshold: f64,
    ) -> ChallengeResult<ChallengeOutcome> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ChallengeError::InvalidThreshold(threshold.to_string()));
        }
        let challenge = self.get(id)?.ok_or(ChallengeError::NotFound(id))?;
        let score = similarity(&challenge.text, transcript);
        let passed = score >= threshold;
        tracing::debug!(challenge = %id, score, threshold, passed, "challenge validated");
        Ok(ChallengeOutcome {
            challenge_id: id,
            score,
            threshold,
            passed,
        })
    }

    pub fn len(&self) -> usize {
        self.challenges.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Character-level similarity of two texts after lowercasing and
/// collapsing whitespace.
pub fn similarity(expected: &str, actual: &str) -> f64 {
    let expected = normalize(expected);
    let actual = normalize(actual);
    f64::from(TextDiff::from_chars(expected.as_str(), actual.as_str()).ratio())
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
