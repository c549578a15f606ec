//! Copy-on-write tree edits.
//!
//! Every edit returns a fresh forest. Inputs are only borrowed, and nodes handed
//! in for insertion are cloned, so callers never observe a later mutation of the
//! result through their own values.

use super::navigator::{find_node, find_node_mut, subtree_ids};
use crate::error::{XlsFormError, XlsFormResult};
use crate::types::SurveyNode;
use tracing::debug;

/// Remove every node with `id`, at any depth, together with its subtree.
///
/// An unknown id yields an independent copy of the input.
pub fn remove_node(tree: &[SurveyNode], id: &str) -> Vec<SurveyNode> {
    tree.iter()
        .filter(|node| node.id != id)
        .map(|node| {
            let mut copy = clone_without_children(node);
            if let Some(children) = &node.children {
                copy.children = Some(remove_node(children, id));
            }
            copy
        })
        .collect()
}

/// Insert a copy of `node` under `parent_id` (the root when `None`).
///
/// `index` is clamped to the sibling count. A container without children
/// gets an empty children list first. Fails when the parent does not exist.
pub fn insert_node(
    tree: &[SurveyNode],
    parent_id: Option<&str>,
    index: usize,
    node: &SurveyNode,
) -> XlsFormResult<Vec<SurveyNode>> {
    let mut result = tree.to_vec();

    let siblings = match parent_id {
        None => &mut result,
        Some(parent_id) => {
            let parent = find_node_mut(&mut result, parent_id)
                .ok_or_else(|| XlsFormError::NoSuchParent(parent_id.to_string()))?;
            parent.children.get_or_insert_with(Vec::new)
        }
    };

    let at = index.min(siblings.len());
    siblings.insert(at, node.clone());
    debug!(node = %node.id, parent = ?parent_id, index = at, "inserted node");

    Ok(result)
}

/// Detach `id` and re-insert it under `new_parent` at `index`.
///
/// `index` refers to the target sibling list after the node was detached.
pub fn move_node(
    tree: &[SurveyNode],
    id: &str,
    new_parent: Option<&str>,
    index: usize,
) -> XlsFormResult<Vec<SurveyNode>> {
    let node = find_node(tree, id)
        .ok_or_else(|| XlsFormError::InvalidMove(format!("node '{}' not found", id)))?;

    if let Some(parent_id) = new_parent {
        if subtree_ids(node).contains(&parent_id) {
            return Err(XlsFormError::InvalidMove(format!(
                "cannot move '{}' into itself or its descendant '{}'",
                id, parent_id
            )));
        }
    }

    let detached = remove_node(tree, id);
    insert_node(&detached, new_parent, index, node)
}

fn clone_without_children(node: &SurveyNode) -> SurveyNode {
    SurveyNode {
        id: node.id.clone(),
        node_type: node.node_type,
        name: node.name.clone(),
        label: node.label.clone(),
        hint: node.hint.clone(),
        required: node.required.clone(),
        relevant: node.relevant.clone(),
        constraint: node.constraint.clone(),
        constraint_message: node.constraint_message.clone(),
        appearance: node.appearance.clone(),
        default_value: node.default_value.clone(),
        readonly: node.readonly.clone(),
        calculation: node.calculation.clone(),
        choice_filter: node.choice_filter.clone(),
        repeat_count: node.repeat_count.clone(),
        list_name: node.list_name.clone(),
        media_image: node.media_image.clone(),
        media_audio: node.media_audio.clone(),
        parameters: node.parameters.clone(),
        extra: node.extra.clone(),
        children: None,
    }
}
