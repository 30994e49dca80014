//! Anchor policies.
//!
//! How anchor players influence pairing is a league rule rather than part of
//! the pairing algorithm, so it is a strategy the engine consults. A policy
//! only says whether two players may meet; the engine treats a refusal as a
//! soft constraint that gives way when no alternative exists.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};

use crate::roster::Player;

/// Rule deciding whether two players may be paired
pub trait AnchorPolicy: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn allows(&self, a: &Player, b: &Player) -> bool;
}

/// Anchors each hold their own table, so two anchors should not meet
#[derive(Debug, Clone, Copy, Default)]
pub struct SeparateAnchors;

impl AnchorPolicy for SeparateAnchors {
    fn name(&self) -> &'static str {
        "separate"
    }

    fn allows(&self, a: &Player, b: &Player) -> bool {
        !(a.is_anchor() && b.is_anchor())
    }
}

/// The anchor flag has no effect on pairing
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreAnchors;

impl AnchorPolicy for IgnoreAnchors {
    fn name(&self) -> &'static str {
        "ignore"
    }

    fn allows(&self, _a: &Player, _b: &Player) -> bool {
        true
    }
}

/// Built-in policies, selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorPolicyKind {
    #[default]
    Separate,
    Ignore,
}

impl AnchorPolicyKind {
    pub fn policy(self) -> Arc<dyn AnchorPolicy> {
        match self {
            AnchorPolicyKind::Separate => Arc::new(SeparateAnchors),
            AnchorPolicyKind::Ignore => Arc::new(IgnoreAnchors),
        }
    }
}

impl fmt::Display for AnchorPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorPolicyKind::Separate => write!(f, "separate"),
            AnchorPolicyKind::Ignore => write!(f, "ignore"),
        }
    }
}

impl FromStr for AnchorPolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "separate" => Ok(AnchorPolicyKind::Separate),
            "ignore" => Ok(AnchorPolicyKind::Ignore),
            other => Err(format!("unknown anchor policy: {other}")),
        }
    }
}
