use std::collections::BTreeMap;

use tracing::debug;

use crate::columns::ColumnDef;

/// Column id to visible flag. A missing key means visible.
pub type ColumnVisibility = BTreeMap<String, bool>;

pub fn is_visible(visibility: &ColumnVisibility, id: &str) -> bool {
    visibility.get(id).copied().unwrap_or(true)
}

pub fn all_visible<S: AsRef<str>>(visibility: &ColumnVisibility, all_ids: &[S]) -> bool {
    all_ids.iter().all(|id| is_visible(visibility, id.as_ref()))
}

pub fn toggle_one(visibility: &ColumnVisibility, id: &str) -> ColumnVisibility {
    let mut toggled = visibility.clone();
    toggled.insert(id.to_string(), !is_visible(visibility, id));
    toggled
}

/// Hides everything when all columns are visible, otherwise shows everything.
pub fn toggle_all<S: AsRef<str>>(visibility: &ColumnVisibility, all_ids: &[S]) -> ColumnVisibility {
    let show = !all_visible(visibility, all_ids);
    debug!("Toggle all columns, visible={show}");
    all_ids
        .iter()
        .map(|id| (id.as_ref().to_string(), show))
        .collect()
}

/// Drops keys that do not name a registered column.
pub fn normalize_visibility(visibility: &ColumnVisibility, registry: &[ColumnDef]) -> ColumnVisibility {
    visibility
        .iter()
        .filter(|(id, _)| registry.iter().any(|c| c.id == id.as_str()))
        .map(|(id, visible)| (id.clone(), *visible))
        .collect()
}
