//! Two-level permission tree assembly.
//!
//! UIs render the catalog as containers (`Group`/`Menu`) carrying their
//! leaf permissions (`Api`/`Dot`). The builder works on a node list that is
//! already ordered by `(parent_id, sort)` and never re-sorts: top-level
//! containers and their leaves appear in input order.

use std::collections::HashMap;

use access_control_sdk::{PermissionNode, PermissionTreeLeaf, PermissionTreeNode};
use uuid::Uuid;

/// Assemble the two-level tree out of an ordered catalog node list.
///
/// Every container node becomes a top-level entry. Leaf nodes attach to
/// the container their `parent_id` references; leaves whose parent is not
/// part of the input are dropped.
#[must_use]
pub fn build_permission_tree(nodes: &[PermissionNode]) -> Vec<PermissionTreeNode> {
    let mut tops = Vec::new();
    let mut top_index: HashMap<Uuid, usize> = HashMap::new();

    for node in nodes {
        if node.kind.is_container() {
            top_index.insert(node.id, tops.len());
            tops.push(PermissionTreeNode {
                id: node.id,
                label: node.label.clone(),
                kind: node.kind,
                leaves: Vec::new(),
            });
        }
    }

    for node in nodes {
        if node.kind.is_container() {
            continue;
        }
        let Some(parent_id) = node.parent_id else {
            continue;
        };
        if let Some(&at) = top_index.get(&parent_id) {
            tops[at].leaves.push(PermissionTreeLeaf {
                id: node.id,
                label: node.label.clone(),
                kind: node.kind,
            });
        }
    }

    tops
}
