//! Forest reconstruction from flat closure rows.
//!
//! The row set is the arena: parent/child links are recorded as indices into
//! it, so a shared ancestor reached from several matched rows is still one
//! node. Nodes are only materialised once every matched key has been merged.

use std::collections::HashMap;

use serde::Serialize;

use super::errors::RecursiveQueryError;

/// Parent key value that means "no parent" in addition to `None`
pub const ROOT_PARENT_SENTINEL: i64 = 0;

/// One row of an executed closure query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosureRow<P> {
    pub key: i64,
    pub parent_key: Option<i64>,
    pub payload: P,
}

impl<P> ClosureRow<P> {
    pub fn new(key: i64, parent_key: Option<i64>, payload: P) -> Self {
        ClosureRow {
            key,
            parent_key,
            payload,
        }
    }

    /// The parent key, or `None` for a root row
    pub fn parent(&self) -> Option<i64> {
        self.parent_key.filter(|&k| k != ROOT_PARENT_SENTINEL)
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForestNode<P> {
    pub row: ClosureRow<P>,
    pub children: Vec<ForestNode<P>>,
}

impl<P> ForestNode<P> {
    pub fn key(&self) -> i64 {
        self.row.key
    }

    /// Depth-first iterator over this node and all of its descendants
    pub fn iter(&self) -> impl Iterator<Item = &ForestNode<P>> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Rebuild the deduplicated forest containing every matched row.
///
/// Returns the root rows (parent `None` or [`ROOT_PARENT_SENTINEL`]) in row
/// order, each carrying the children merged from all matched keys.
pub fn reconstruct<P>(
    rows: Vec<ClosureRow<P>>,
    matched_keys: &[i64],
) -> Result<Vec<ForestNode<P>>, RecursiveQueryError> {
    let mut index = HashMap::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        if index.insert(row.key, i).is_some() {
            return Err(RecursiveQueryError::DuplicateRow(row.key));
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); rows.len()];
    for &key in matched_keys {
        let mut current = *index.get(&key).ok_or(RecursiveQueryError::MissingRow {
            key,
            referenced_by: None,
        })?;
        let mut steps = 0;

        while let Some(parent_key) = rows[current].parent() {
            let parent = *index
                .get(&parent_key)
                .ok_or(RecursiveQueryError::MissingRow {
                    key: parent_key,
                    referenced_by: Some(rows[current].key),
                })?;
            if !children[parent].contains(&current) {
                children[parent].push(current);
            }
            current = parent;

            steps += 1;
            if steps > rows.len() {
                return Err(RecursiveQueryError::CyclicHierarchy(key));
            }
        }
    }

    let roots: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.is_root())
        .map(|(i, _)| i)
        .collect();
    let mut slots: Vec<Option<ClosureRow<P>>> = rows.into_iter().map(Some).collect();

    Ok(roots
        .into_iter()
        .filter_map(|i| materialise(i, &mut slots, &children))
        .collect())
}

fn materialise<P>(
    index: usize,
    slots: &mut [Option<ClosureRow<P>>],
    children: &[Vec<usize>],
) -> Option<ForestNode<P>> {
    let row = slots[index].take()?;
    let children = children[index]
        .iter()
        .filter_map(|&child| materialise(child, slots, children))
        .collect();
    Some(ForestNode { row, children })
}
