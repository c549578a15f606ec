//! Node lookup by identity within the survey forest

use crate::types::SurveyNode;

/// Owner of a sibling list: the forest root or a container node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParentRef<'a> {
    Root,
    Node(&'a SurveyNode),
}

impl<'a> ParentRef<'a> {
    pub fn is_root(&self) -> bool {
        matches!(self, ParentRef::Root)
    }

    /// Identity of the owning node, `None` at the root
    pub fn id(&self) -> Option<&'a str> {
        match self {
            ParentRef::Root => None,
            ParentRef::Node(node) => Some(node.id.as_str()),
        }
    }
}

/// Where a node sits: its parent, the sibling list holding it, and its position
#[derive(Debug, Clone, Copy)]
pub struct ParentLocation<'a> {
    pub parent: ParentRef<'a>,
    pub siblings: &'a [SurveyNode],
    pub index: usize,
}

/// Depth-first pre-order search for the first node with `id`
pub fn find_node<'a>(tree: &'a [SurveyNode], id: &str) -> Option<&'a SurveyNode> {
    for node in tree {
        if node.id == id {
            return Some(node);
        }
        if let Some(children) = &node.children {
            if let Some(found) = find_node(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Mutable variant of [`find_node`], same search order
pub fn find_node_mut<'a>(tree: &'a mut [SurveyNode], id: &str) -> Option<&'a mut SurveyNode> {
    for node in tree.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(children) = node.children.as_mut() {
            if let Some(found) = find_node_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Locate the sibling list and position holding `id`.
///
/// The current level is checked first, then each container's direct children,
/// and only then the search descends further.
pub fn find_parent<'a>(tree: &'a [SurveyNode], id: &str) -> Option<ParentLocation<'a>> {
    if let Some(index) = tree.iter().position(|n| n.id == id) {
        return Some(ParentLocation {
            parent: ParentRef::Root,
            siblings: tree,
            index,
        });
    }
    find_parent_below(tree, id)
}

fn find_parent_below<'a>(tree: &'a [SurveyNode], id: &str) -> Option<ParentLocation<'a>> {
    for node in tree {
        let Some(children) = &node.children else {
            continue;
        };
        if let Some(index) = children.iter().position(|c| c.id == id) {
            return Some(ParentLocation {
                parent: ParentRef::Node(node),
                siblings: children,
                index,
            });
        }
        if let Some(found) = find_parent_below(children, id) {
            return Some(found);
        }
    }
    None
}

/// Ids of `node` and all of its descendants, pre-order
pub fn subtree_ids(node: &SurveyNode) -> Vec<&str> {
    let mut ids = vec![node.id.as_str()];
    for child in node.child_nodes() {
        ids.extend(subtree_ids(child));
    }
    ids
}
