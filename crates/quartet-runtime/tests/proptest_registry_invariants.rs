//! Property-based invariant tests for the timeout registry.
//!
//! A naive model (a plain list of live entries) is driven alongside
//! [`TimeoutRegistry`] with arbitrary schedule/cancel/clear/pop sequences:
//!
//! 1. Popped entries come out in `(due, schedule order)` order.
//! 2. Canceled and cleared entries never fire.
//! 3. Every entry fires at most once.
//! 4. `len()`, `pending()`, and `next_deadline()` agree with the model.

use std::collections::BTreeSet;
use std::time::Duration;

use proptest::prelude::*;
use quartet_runtime::{TimeoutId, TimeoutRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Hop,
    Settle,
    Reveal,
}

const GROUPS: [Group; 3] = [Group::Hop, Group::Settle, Group::Reveal];

#[derive(Debug, Clone)]
enum Op {
    Schedule(usize, u64),
    Cancel(usize),
    Clear(usize),
    Pop(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..3, 0u64..2_000).prop_map(|(g, due)| Op::Schedule(g, due)),
        1 => (0usize..64).prop_map(Op::Cancel),
        1 => (0usize..3).prop_map(Op::Clear),
        3 => (0u64..2_500).prop_map(Op::Pop),
    ]
}

#[derive(Debug, Clone)]
struct ModelEntry {
    id: TimeoutId,
    group: Group,
    due: Duration,
    payload: u32,
}

proptest! {
    #[test]
    fn registry_matches_model(ops in proptest::collection::vec(op(), 1..120)) {
        let mut registry: TimeoutRegistry<Group, u32> = TimeoutRegistry::new();
        let mut model: Vec<ModelEntry> = Vec::new();
        let mut issued: Vec<TimeoutId> = Vec::new();
        let mut fired: BTreeSet<u32> = BTreeSet::new();
        let mut removed: BTreeSet<u32> = BTreeSet::new();
        let mut next_payload = 0u32;

        for op in ops {
            match op {
                Op::Schedule(g, due) => {
                    let due = Duration::from_millis(due);
                    let id = registry.schedule(GROUPS[g], due, next_payload);
                    issued.push(id);
                    model.push(ModelEntry { id, group: GROUPS[g], due, payload: next_payload });
                    next_payload += 1;
                }
                Op::Cancel(k) => {
                    if let Some(&id) = issued.get(k % issued.len().max(1)) {
                        let got = registry.cancel(id);
                        let position = model.iter().position(|entry| entry.id == id);
                        match position {
                            Some(index) => {
                                let entry = model.remove(index);
                                prop_assert_eq!(got, Some(entry.payload));
                                removed.insert(entry.payload);
                            }
                            None => prop_assert_eq!(got, None),
                        }
                    }
                }
                Op::Clear(g) => {
                    let group = GROUPS[g];
                    let expected = model.iter().filter(|entry| entry.group == group).count();
                    let cleared = registry.clear_group(group);
                    prop_assert_eq!(cleared, expected);
                    for entry in model.iter().filter(|entry| entry.group == group) {
                        removed.insert(entry.payload);
                    }
                    model.retain(|entry| entry.group != group);
                }
                Op::Pop(now) => {
                    let now = Duration::from_millis(now);
                    let expected = model
                        .iter()
                        .enumerate()
                        .filter(|(_, entry)| entry.due <= now)
                        .min_by_key(|(_, entry)| (entry.due, entry.id))
                        .map(|(index, _)| index);
                    let got = registry.pop_due(now);
                    match expected {
                        Some(index) => {
                            let entry = model.remove(index);
                            let got = got.expect("model has a due entry");
                            prop_assert_eq!(got.id, entry.id);
                            prop_assert_eq!(got.due, entry.due);
                            prop_assert_eq!(got.event, entry.payload);
                            prop_assert!(!removed.contains(&got.event), "canceled entry fired");
                            prop_assert!(fired.insert(got.event), "entry fired twice");
                        }
                        None => prop_assert!(got.is_none()),
                    }
                }
            }

            prop_assert_eq!(registry.len(), model.len());
            prop_assert_eq!(registry.is_empty(), model.is_empty());
            prop_assert_eq!(
                registry.next_deadline(),
                model.iter().map(|entry| entry.due).min()
            );
            for group in GROUPS {
                let expected = model.iter().filter(|entry| entry.group == group).count();
                prop_assert_eq!(registry.pending(group), expected);
            }
        }
    }

    #[test]
    fn draining_yields_nondecreasing_deadlines(dues in proptest::collection::vec(0u64..1_000, 0..40)) {
        let mut registry: TimeoutRegistry<Group, usize> = TimeoutRegistry::new();
        for (index, due) in dues.iter().enumerate() {
            registry.schedule(Group::Hop, Duration::from_millis(*due), index);
        }
        let mut last: Option<(Duration, TimeoutId)> = None;
        let mut count = 0;
        while let Some(fired) = registry.pop_due(Duration::from_millis(1_000)) {
            if let Some(previous) = last {
                prop_assert!(previous < (fired.due, fired.id));
            }
            last = Some((fired.due, fired.id));
            count += 1;
        }
        prop_assert_eq!(count, dues.len());
        prop_assert!(registry.is_empty());
    }
}
