//! Saved command catalogue
//!
//! A tree of groups and commands that the panel shows next to the run form.
//! Nodes are addressed by [`NodePath`]; paths are positional, so any
//! structural edit may invalidate paths held elsewhere.

mod io;
mod node;

pub use node::{CommandNode, NodePath};
pub(crate) use io::write_locked_atomic;

use serde::{Deserialize, Serialize};

use crate::domain::ProcessDefinition;
use crate::error::ProcRunError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandStore {
    #[serde(default)]
    commands: Vec<CommandNode>,
}

impl CommandStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level nodes
    pub fn nodes(&self) -> &[CommandNode] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn get(&self, path: &NodePath) -> Option<&CommandNode> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.commands.get(*first)?;
        for index in rest {
            node = node.children().get(*index)?;
        }
        Some(node)
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut CommandNode> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.commands.get_mut(*first)?;
        for index in rest {
            node = match node {
                CommandNode::Group { children, .. } => children.get_mut(*index)?,
                CommandNode::Command { .. } => return None,
            };
        }
        Some(node)
    }

    /// Group new entries should go into when `selected` is highlighted:
    /// the group itself, or the group containing the selected command.
    pub fn insertion_parent(&self, selected: Option<&NodePath>) -> Option<NodePath> {
        let selected = selected?;
        match self.get(selected)? {
            CommandNode::Group { .. } => Some(selected.clone()),
            CommandNode::Command { .. } => selected.parent(),
        }
    }

    fn children_mut(
        &mut self,
        parent: Option<&NodePath>,
    ) -> Result<&mut Vec<CommandNode>, ProcRunError> {
        let Some(parent) = parent else {
            return Ok(&mut self.commands);
        };
        match self.get_mut(parent) {
            Some(CommandNode::Group { children, .. }) => Ok(children),
            Some(CommandNode::Command { .. }) => Err(ProcRunError::NotAGroup(parent.to_string())),
            None => Err(ProcRunError::NoSuchEntry(parent.to_string())),
        }
    }

    fn push_node(
        &mut self,
        parent: Option<&NodePath>,
        node: CommandNode,
    ) -> Result<NodePath, ProcRunError> {
        let children = self.children_mut(parent)?;
        children.push(node);
        let index = children.len() - 1;
        Ok(match parent {
            Some(parent) => parent.child(index),
            None => NodePath::root_child(index),
        })
    }

    pub fn add_command(
        &mut self,
        parent: Option<&NodePath>,
        name: impl Into<String>,
        definition: ProcessDefinition,
    ) -> Result<NodePath, ProcRunError> {
        self.push_node(parent, CommandNode::command(name, definition))
    }

    pub fn add_group(
        &mut self,
        parent: Option<&NodePath>,
        name: impl Into<String>,
    ) -> Result<NodePath, ProcRunError> {
        self.push_node(parent, CommandNode::group(name))
    }

    /// Replace the node at `path` with a new group containing it.
    ///
    /// The group takes the node's place; the node moves to `path/0`.
    pub fn wrap_in_group(
        &mut self,
        path: &NodePath,
        name: impl Into<String>,
    ) -> Result<NodePath, ProcRunError> {
        let index = path
            .last()
            .ok_or_else(|| ProcRunError::NoSuchEntry(path.to_string()))?;
        let siblings = self.children_mut(path.parent().as_ref())?;
        if index >= siblings.len() {
            return Err(ProcRunError::NoSuchEntry(path.to_string()));
        }
        let node = siblings.remove(index);
        siblings.insert(
            index,
            CommandNode::Group {
                name: name.into(),
                children: vec![node],
            },
        );
        Ok(path.clone())
    }

    pub fn remove(&mut self, path: &NodePath) -> Result<CommandNode, ProcRunError> {
        let index = path
            .last()
            .ok_or_else(|| ProcRunError::NoSuchEntry(path.to_string()))?;
        let siblings = self.children_mut(path.parent().as_ref())?;
        if index >= siblings.len() {
            return Err(ProcRunError::NoSuchEntry(path.to_string()));
        }
        Ok(siblings.remove(index))
    }

    pub fn update_definition(
        &mut self,
        path: &NodePath,
        new_definition: ProcessDefinition,
    ) -> Result<(), ProcRunError> {
        match self.get_mut(path) {
            Some(CommandNode::Command { definition, .. }) => {
                *definition = new_definition;
                Ok(())
            }
            Some(CommandNode::Group { .. }) => Err(ProcRunError::NotACommand(path.to_string())),
            None => Err(ProcRunError::NoSuchEntry(path.to_string())),
        }
    }

    pub fn rename(&mut self, path: &NodePath, name: impl Into<String>) -> Result<(), ProcRunError> {
        let node = self
            .get_mut(path)
            .ok_or_else(|| ProcRunError::NoSuchEntry(path.to_string()))?;
        node.set_name(name);
        Ok(())
    }

    /// Every node depth-first (pre-order) with its path.
    pub fn walk(&self) -> Vec<(NodePath, &CommandNode)> {
        fn visit<'a>(
            nodes: &'a [CommandNode],
            prefix: Option<&NodePath>,
            out: &mut Vec<(NodePath, &'a CommandNode)>,
        ) {
            for (index, node) in nodes.iter().enumerate() {
                let path = match prefix {
                    Some(prefix) => prefix.child(index),
                    None => NodePath::root_child(index),
                };
                out.push((path.clone(), node));
                visit(node.children(), Some(&path), out);
            }
        }

        let mut out = Vec::new();
        visit(&self.commands, None, &mut out);
        out
    }

    /// First command called `name`, depth-first.
    pub fn find_command(&self, name: &str) -> Option<(NodePath, &ProcessDefinition)> {
        self.walk().into_iter().find_map(|(path, node)| match node {
            CommandNode::Command {
                name: node_name,
                definition,
            } if node_name == name => Some((path, definition)),
            _ => None,
        })
    }

    /// First node (group or command) called `name`, depth-first.
    pub fn find_node(&self, name: &str) -> Option<NodePath> {
        self.walk()
            .into_iter()
            .find(|(_, node)| node.name() == name)
            .map(|(path, _)| path)
    }

    pub fn command_count(&self) -> usize {
        self.walk()
            .iter()
            .filter(|(_, node)| !node.is_group())
            .count()
    }
}
