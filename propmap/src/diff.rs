use std::collections::BTreeMap;

use crate::value::{PropertyMap, PropertyValue};

/// Per-property change classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Add,
    AddReplace,
    Delete,
    DeleteReplace,
    Update,
    UpdateReplace,
}

impl DiffKind {
    /// The replace-flavored version of this kind.
    pub fn as_replace(self) -> DiffKind {
        match self {
            DiffKind::Add | DiffKind::AddReplace => DiffKind::AddReplace,
            DiffKind::Delete | DiffKind::DeleteReplace => DiffKind::DeleteReplace,
            DiffKind::Update | DiffKind::UpdateReplace => DiffKind::UpdateReplace,
        }
    }

    pub fn is_replace(self) -> bool {
        matches!(
            self,
            DiffKind::AddReplace | DiffKind::DeleteReplace | DiffKind::UpdateReplace
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDiff {
    pub kind: DiffKind,
    pub input_diff: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffChanges {
    None,
    Some,
}

/// Result of comparing two property snapshots, shaped for the provider's
/// diff response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResponse {
    pub changes: DiffChanges,
    pub detailed_diff: BTreeMap<String, PropertyDiff>,
    pub has_detailed_diff: bool,
    pub delete_before_replace: bool,
}

impl DiffResponse {
    fn unchanged() -> DiffResponse {
        DiffResponse {
            changes: DiffChanges::None,
            detailed_diff: BTreeMap::new(),
            has_detailed_diff: false,
            delete_before_replace: false,
        }
    }
}

/// Compare two property bags. Changed keys in `replace_properties` (or all
/// of them, when `any_diff_as_replace` is set) are upgraded to their
/// replace-flavored kind. Nested object changes surface under dotted keys.
pub fn standard_diff(
    olds: &PropertyMap,
    news: &PropertyMap,
    replace_properties: &[&str],
    any_diff_as_replace: bool,
) -> DiffResponse {
    let mut detailed = BTreeMap::new();
    collect_diffs(olds, news, "", &mut detailed);
    if detailed.is_empty() {
        return DiffResponse::unchanged();
    }

    let detailed_diff = detailed
        .into_iter()
        .map(|(key, kind)| {
            let top_level = key.split('.').next().unwrap_or(&key);
            let kind = if any_diff_as_replace
                || replace_properties.contains(&key.as_str())
                || replace_properties.contains(&top_level)
            {
                kind.as_replace()
            } else {
                kind
            };
            (
                key,
                PropertyDiff {
                    kind,
                    input_diff: false,
                },
            )
        })
        .collect();

    DiffResponse {
        changes: DiffChanges::Some,
        detailed_diff,
        has_detailed_diff: true,
        delete_before_replace: true,
    }
}

/// Top-level keys whose value differs between the two bags, sorted.
pub fn diff_olds_and_news(olds: &PropertyMap, news: &PropertyMap) -> Vec<String> {
    let mut changed = Vec::new();
    for (key, old_value) in olds {
        match news.get(key) {
            Some(new_value) if new_value == old_value => {}
            _ => changed.push(key.clone()),
        }
    }
    for key in news.keys() {
        if !olds.contains_key(key) {
            changed.push(key.clone());
        }
    }
    changed.sort();
    changed
}

fn collect_diffs(
    olds: &PropertyMap,
    news: &PropertyMap,
    prefix: &str,
    out: &mut BTreeMap<String, DiffKind>,
) {
    let qualify = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        }
    };

    for (key, old_value) in olds {
        match news.get(key) {
            None => {
                out.insert(qualify(key), DiffKind::Delete);
            }
            Some(new_value) if new_value == old_value => {}
            Some(PropertyValue::Object(new_obj)) => {
                if let PropertyValue::Object(old_obj) = old_value {
                    collect_diffs(old_obj, new_obj, &qualify(key), out);
                } else {
                    out.insert(qualify(key), DiffKind::Update);
                }
            }
            Some(_) => {
                out.insert(qualify(key), DiffKind::Update);
            }
        }
    }
    for key in news.keys() {
        if !olds.contains_key(key) {
            out.insert(qualify(key), DiffKind::Add);
        }
    }
}
