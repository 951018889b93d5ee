use serde::{Deserialize, Serialize};

use crate::domain::ProcessDefinition;

/// One entry of the saved-commands tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandNode {
    Group {
        name: String,
        #[serde(default)]
        children: Vec<CommandNode>,
    },
    Command {
        name: String,
        definition: ProcessDefinition,
    },
}

impl CommandNode {
    pub fn group(name: impl Into<String>) -> Self {
        CommandNode::Group {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn command(name: impl Into<String>, definition: ProcessDefinition) -> Self {
        CommandNode::Command {
            name: name.into(),
            definition,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CommandNode::Group { name, .. } | CommandNode::Command { name, .. } => name,
        }
    }

    pub fn set_name(&mut self, new_name: impl Into<String>) {
        match self {
            CommandNode::Group { name, .. } | CommandNode::Command { name, .. } => {
                *name = new_name.into()
            }
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, CommandNode::Group { .. })
    }

    pub fn definition(&self) -> Option<&ProcessDefinition> {
        match self {
            CommandNode::Command { definition, .. } => Some(definition),
            CommandNode::Group { .. } => None,
        }
    }

    pub fn children(&self) -> &[CommandNode] {
        match self {
            CommandNode::Group { children, .. } => children,
            CommandNode::Command { .. } => &[],
        }
    }
}

/// Position of a node in the tree: child indices from the root down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root_child(index: usize) -> Self {
        Self(vec![index])
    }

    pub fn from_indices(indices: impl Into<Vec<usize>>) -> Self {
        Self(indices.into())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path of the enclosing group; `None` for top-level nodes.
    pub fn parent(&self) -> Option<Self> {
        match self.0.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Self(rest.to_vec())),
            _ => None,
        }
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Whether `self` equals `other` or lies inside it.
    pub fn starts_with(&self, other: &NodePath) -> bool {
        self.0.starts_with(&other.0)
    }

    /// Where this path points after the node at `removed` is deleted.
    ///
    /// `None` if this node was `removed` or inside it.
    pub fn after_removal(&self, removed: &NodePath) -> Option<NodePath> {
        if removed.is_empty() || self.starts_with(removed) {
            return None;
        }
        let depth = removed.depth() - 1;
        let mut indices = self.0.clone();
        let shifts = self.0.len() > depth
            && self.0[..depth] == removed.0[..depth]
            && self.0[depth] > removed.0[depth];
        if shifts {
            indices[depth] -= 1;
        }
        Some(Self(indices))
    }

    /// Where this path points after the node at `wrapped` is moved into a new group.
    pub fn after_wrap(&self, wrapped: &NodePath) -> NodePath {
        if wrapped.is_empty() || !self.starts_with(wrapped) {
            return self.clone();
        }
        let mut indices = wrapped.0.clone();
        indices.push(0);
        indices.extend_from_slice(&self.0[wrapped.depth()..]);
        Self(indices)
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "/{}", parts.join("/"))
    }
}
