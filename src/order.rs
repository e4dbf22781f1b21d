use std::collections::HashSet;

use tracing::debug;

use crate::columns::ColumnDef;

pub type ColumnOrder = Vec<String>;

pub fn default_order(registry: &[ColumnDef]) -> ColumnOrder {
    registry.iter().map(|c| c.id.to_string()).collect()
}

/// Moves `source_id` to the position currently held by `target_id`.
///
/// Elements in between shift by one, everything else keeps its relative
/// order. Dropping onto itself, or an id that is not part of `order`,
/// leaves the order untouched.
pub fn reorder(order: &[String], source_id: &str, target_id: &str) -> ColumnOrder {
    if source_id == target_id {
        return order.to_vec();
    }
    let (Some(from), Some(to)) = (
        order.iter().position(|id| id == source_id),
        order.iter().position(|id| id == target_id),
    ) else {
        debug!("Ignoring reorder {source_id} -> {target_id}, id not in order");
        return order.to_vec();
    };

    let mut reordered = order.to_vec();
    let moved = reordered.remove(from);
    reordered.insert(to, moved);
    reordered
}

/// Repairs a persisted order so it is a permutation of the registry ids.
/// Unknown and repeated ids are dropped, missing ones are appended in
/// registry order.
pub fn normalize_order(order: &[String], registry: &[ColumnDef]) -> ColumnOrder {
    let known: HashSet<&str> = registry.iter().map(|c| c.id).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut normalized: ColumnOrder = order
        .iter()
        .filter(|id| known.contains(id.as_str()) && seen.insert(id.as_str()))
        .cloned()
        .collect();

    for column in registry {
        if !seen.contains(column.id) {
            normalized.push(column.id.to_string());
        }
    }
    if normalized.as_slice() != order {
        debug!("Normalized column order {order:?} -> {normalized:?}");
    }
    normalized
}
