//! Survey tree engine: navigation, copy-on-write editing, and validation

pub mod editor;
pub mod navigator;
pub mod validator;

pub use editor::{insert_node, move_node, remove_node};
pub use navigator::{find_node, find_node_mut, find_parent, ParentLocation, ParentRef};
pub use validator::{validate_document, Diagnostic, Severity};
