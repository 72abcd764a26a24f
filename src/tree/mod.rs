//! Tree reconstruction from flat, path-keyed row lists.
//!
//! Content queries return rows as a flat list ordered by path. The
//! converter reassembles the hierarchy: each row becomes a child of the
//! row owning its parent path. Rows whose ancestry is incomplete are
//! either dropped with their whole subtree or promoted to roots,
//! depending on [`MissingParentPolicy`].

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::core::ContentPath;

/// Anything that knows its position in the content tree.
pub trait HasPath {
    fn path(&self) -> &ContentPath;
}

/// What to do with a record whose immediate parent is not in the input.
///
/// `Drop` keeps only subtrees fully anchored at the root record; `PromoteToRoot`
/// turns every orphan into its own root. Which one is appropriate depends on
/// the caller: paginated queries promote, full-tree queries drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingParentPolicy {
    #[default]
    Drop,
    PromoteToRoot,
}

/// A record plus its reassembled children.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TreeNode<R> {
    #[serde(flatten)]
    pub record: R,
    pub children: Vec<TreeNode<R>>,
}

impl<R> TreeNode<R> {
    pub fn leaf(record: R) -> Self {
        Self {
            record,
            children: Vec::new(),
        }
    }

    /// Pre-order traversal over the subtree.
    pub fn walk(&self, visit: &mut impl FnMut(&R)) {
        visit(&self.record);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Reassembles hierarchy from flat path-keyed records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListToTreeConverter {
    policy: MissingParentPolicy,
}

impl ListToTreeConverter {
    pub fn new(policy: MissingParentPolicy) -> Self {
        Self { policy }
    }

    /// Convert an ordered record list into an ordered list of root nodes.
    ///
    /// - Children keep the relative order of their input appearance;
    ///   siblings are never re-sorted.
    /// - A record with path `/` is always a root. Under `PromoteToRoot`
    ///   any record whose immediate parent path is absent from the input
    ///   also becomes a root; under `Drop` such records (and everything
    ///   below them) are omitted from the result.
    /// - Never fails; empty input yields empty output.
    pub fn convert<R: HasPath>(&self, items: Vec<R>) -> Vec<TreeNode<R>> {
        if items.is_empty() {
            return Vec::new();
        }

        let index: FxHashMap<ContentPath, usize> = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.path().clone(), i))
            .collect();

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); items.len()];
        let mut roots: Vec<usize> = Vec::new();

        for (i, item) in items.iter().enumerate() {
            let Some(parent) = item.path().parent() else {
                // The root record itself
                roots.push(i);
                continue;
            };

            match index.get(parent.as_str()) {
                Some(&parent_index) => children[parent_index].push(i),
                None => {
                    if self.policy == MissingParentPolicy::PromoteToRoot {
                        roots.push(i);
                    }
                    // Drop: unreachable records never make it into a root's
                    // subtree and silently disappear
                }
            }
        }

        let mut slots: Vec<Option<R>> = items.into_iter().map(Some).collect();
        roots
            .into_iter()
            .filter_map(|root| build_node(root, &children, &mut slots))
            .collect()
    }
}

fn build_node<R>(
    index: usize,
    children: &[Vec<usize>],
    slots: &mut [Option<R>],
) -> Option<TreeNode<R>> {
    let record = slots[index].take()?;
    let child_nodes = children[index]
        .iter()
        .filter_map(|&child| build_node(child, children, slots))
        .collect();
    Some(TreeNode {
        record,
        children: child_nodes,
    })
}

// ============================================================================
// tests
// ============================================================================
