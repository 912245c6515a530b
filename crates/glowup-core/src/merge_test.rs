use std::collections::HashMap;

use super::*;
use crate::contact::normalize_email;
use crate::platform::Platform;

fn contact(email: &str, name: &str) -> ExtractedContact {
    ExtractedContact {
        email: normalize_email(email),
        display_name: name.to_string(),
        source_url: "https://instagram.com/jamie.beauty/".to_string(),
        source_platform: Platform::Instagram,
        category: "뷰티".to_string(),
        raw_snippet: format!("snippet for {name}"),
        subscriber_count: 0,
    }
}

/// Minimal keyed store that applies plans the same way the database does.
#[derive(Default)]
struct MapStore {
    names: HashMap<String, (String, String)>,
}

impl MapStore {
    fn merge(&mut self, c: &ExtractedContact) -> MergeOutcome {
        let existing = self.names.get(&c.email).map(|(name, _)| StoredIdentity {
            display_name: name.clone(),
        });
        let plan = plan_merge(existing.as_ref(), c);
        match &plan {
            MergePlan::Insert => {
                self.names.insert(
                    c.email.clone(),
                    (c.display_name.clone(), c.raw_snippet.clone()),
                );
            }
            MergePlan::UpdateName {
                display_name,
                description,
            } => {
                let entry = self.names.get_mut(&c.email).expect("planned update without row");
                *entry = (display_name.clone(), description.clone());
            }
            MergePlan::Skip => {}
        }
        plan.outcome()
    }

    fn name(&self, email: &str) -> &str {
        &self.names[email].0
    }
}

#[test]
fn missing_record_is_inserted() {
    assert_eq!(plan_merge(None, &contact("a@b.co", "jamie")), MergePlan::Insert);
}

#[test]
fn equal_names_skip() {
    let stored = StoredIdentity {
        display_name: "제이미".to_string(),
    };
    assert_eq!(
        plan_merge(Some(&stored), &contact("a@b.co", "제이미")),
        MergePlan::Skip
    );
}

#[test]
fn script_name_upgrades_romanized_name() {
    let stored = StoredIdentity {
        display_name: "jamie_b".to_string(),
    };
    let plan = plan_merge(Some(&stored), &contact("a@b.co", "제이미"));
    assert_eq!(
        plan,
        MergePlan::UpdateName {
            display_name: "제이미".to_string(),
            description: "snippet for 제이미".to_string(),
        }
    );
    assert_eq!(plan.outcome(), MergeOutcome::UpdatedName);
}

#[test]
fn romanized_name_never_replaces_romanized_name() {
    let stored = StoredIdentity {
        display_name: "jamie_b".to_string(),
    };
    assert_eq!(
        plan_merge(Some(&stored), &contact("a@b.co", "Jamie Beauty")),
        MergePlan::Skip
    );
}

#[test]
fn script_name_never_replaces_script_name() {
    let stored = StoredIdentity {
        display_name: "제이미".to_string(),
    };
    assert_eq!(
        plan_merge(Some(&stored), &contact("a@b.co", "제이미 뷰티")),
        MergePlan::Skip
    );
}

#[test]
fn scenario_romanized_then_script_updates_name() {
    let mut store = MapStore::default();
    assert_eq!(
        store.merge(&contact("jamie.b@gmail.com", "jamie_b")),
        MergeOutcome::Inserted
    );
    assert_eq!(store.name("jamie.b@gmail.com"), "jamie_b");

    assert_eq!(
        store.merge(&contact("jamie.b@gmail.com", "제이미")),
        MergeOutcome::UpdatedName
    );
    assert_eq!(store.name("jamie.b@gmail.com"), "제이미");
}

#[test]
fn scenario_script_then_romanized_keeps_script() {
    let mut store = MapStore::default();
    store.merge(&contact("jamie.b@gmail.com", "제이미"));
    assert_eq!(
        store.merge(&contact("jamie.b@gmail.com", "Jamie")),
        MergeOutcome::SkippedDuplicate
    );
    assert_eq!(store.name("jamie.b@gmail.com"), "제이미");
}

#[test]
fn merging_twice_is_idempotent() {
    let mut store = MapStore::default();
    let c = contact("jamie.b@gmail.com", "jamie_b");
    assert_eq!(store.merge(&c), MergeOutcome::Inserted);
    let snapshot = store.names.clone();
    assert_eq!(store.merge(&c), MergeOutcome::SkippedDuplicate);
    assert_eq!(store.names, snapshot);
}

#[test]
fn emails_differing_only_in_case_share_one_record() {
    let mut store = MapStore::default();
    store.merge(&contact("Jamie.B@Gmail.com", "jamie_b"));
    store.merge(&contact("jamie.b@gmail.com", "제이미"));
    store.merge(&contact("JAMIE.B@GMAIL.COM", "jb"));
    assert_eq!(store.names.len(), 1);
    assert_eq!(store.name("jamie.b@gmail.com"), "제이미");
}

#[test]
fn ratchet_holds_over_a_mixed_sequence() {
    let names = ["jb", "제이미", "Jamie", "jamie_b", "제이미 뷰티", "", "J"];
    let mut store = MapStore::default();
    let mut has_script = false;
    for name in names {
        store.merge(&contact("jamie.b@gmail.com", name));
        let current = store.name("jamie.b@gmail.com");
        if has_script {
            assert!(
                crate::script::contains_target_script(current),
                "script name regressed to {current:?}"
            );
        }
        has_script = crate::script::contains_target_script(current);
    }
    assert_eq!(store.name("jamie.b@gmail.com"), "제이미");
}
