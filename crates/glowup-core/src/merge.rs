//! Merge decision for a newly extracted contact against the stored record
//! with the same email.
//!
//! The decision is pure; applying it (and the row locking around it) is the
//! record store's job. Keeping it here lets the ratchet be tested without a
//! database.

use serde::Serialize;

use crate::contact::ExtractedContact;
use crate::script::contains_target_script;

/// The parts of a stored creator record the merge rules look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredIdentity {
    pub display_name: String,
}

/// What the store should do with a contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergePlan {
    /// No record with this email exists; insert a new `pending` record.
    Insert,
    /// A record exists and must not be touched.
    Skip,
    /// A record exists and its name (and description) should be replaced.
    UpdateName {
        display_name: String,
        description: String,
    },
}

/// Result of a merge as reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOutcome {
    Inserted,
    SkippedDuplicate,
    UpdatedName,
}

impl MergePlan {
    /// Outcome reported once the plan has been applied.
    #[must_use]
    pub fn outcome(&self) -> MergeOutcome {
        match self {
            MergePlan::Insert => MergeOutcome::Inserted,
            MergePlan::Skip => MergeOutcome::SkippedDuplicate,
            MergePlan::UpdateName { .. } => MergeOutcome::UpdatedName,
        }
    }
}

/// Decide how `contact` merges into the record currently stored for its email.
///
/// Names only ever move from script-less to script-bearing: a stored name
/// that already contains the target script is never replaced, and a
/// script-less stored name is never replaced by another script-less name.
#[must_use]
pub fn plan_merge(existing: Option<&StoredIdentity>, contact: &ExtractedContact) -> MergePlan {
    let Some(stored) = existing else {
        return MergePlan::Insert;
    };

    if stored.display_name == contact.display_name {
        return MergePlan::Skip;
    }

    if contains_target_script(&contact.display_name)
        && !contains_target_script(&stored.display_name)
    {
        return MergePlan::UpdateName {
            display_name: contact.display_name.clone(),
            description: contact.raw_snippet.clone(),
        };
    }

    MergePlan::Skip
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
