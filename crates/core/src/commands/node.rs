use super::argument::ArgumentDescriptor;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::ops::Index;

/// Identity of a node inside one [`CommandTree`]. Only meaningful for the
/// tree that handed it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(super) usize);

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root,
    Literal {
        name: String,
    },
    Argument {
        name: String,
        descriptor: ArgumentDescriptor,
    },
}

impl NodeKind {
    pub fn name(&self) -> Option<&str> {
        match self {
            NodeKind::Root => None,
            NodeKind::Literal { name } | NodeKind::Argument { name, .. } => Some(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandNode {
    pub(super) kind: NodeKind,
    pub(super) children: IndexMap<String, NodeId>,
    pub(super) executable: bool,
    pub(super) redirect: Option<NodeId>,
    pub(super) custom_suggestions: bool,
}

impl CommandNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: IndexMap::new(),
            executable: false,
            redirect: None,
            custom_suggestions: false,
        }
    }

    pub fn root() -> Self {
        Self::new(NodeKind::Root)
    }

    pub fn literal(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Literal { name: name.into() })
    }

    pub fn argument(name: impl Into<String>, descriptor: ArgumentDescriptor) -> Self {
        Self::new(NodeKind::Argument {
            name: name.into(),
            descriptor,
        })
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.kind.name()
    }

    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_executable(&self) -> bool {
        self.executable
    }

    pub fn redirect(&self) -> Option<NodeId> {
        self.redirect
    }

    pub fn has_custom_suggestions(&self) -> bool {
        self.custom_suggestions
    }
}

/// Arena holding one synthesized (or in-construction) command tree.
///
/// Nodes are never removed. A node that was written but never attached
/// under the root, for example the partial output of a registrar that
/// failed halfway, is unreachable and is ignored by the encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandTree {
    nodes: Vec<CommandNode>,
    root: NodeId,
}

impl Default for CommandTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![CommandNode::root()],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&CommandNode> {
        self.nodes.get(id.0)
    }

    pub(super) fn get_mut(&mut self, id: NodeId) -> &mut CommandNode {
        &mut self.nodes[id.0]
    }

    /// Number of nodes in the arena, attached or not.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Adds a detached node to the arena.
    pub(super) fn push(&mut self, node: CommandNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Attaches `child` under `parent`, keyed by the child's name. Returns
    /// the node that previously had that name, if any.
    pub(super) fn attach(&mut self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        let name = self.nodes[child.0].name().unwrap_or_default().to_string();
        self.nodes[parent.0].children.insert(name, child)
    }

    pub fn add_child(&mut self, parent: NodeId, node: CommandNode) -> NodeId {
        let id = self.push(node);
        self.attach(parent, id);
        id
    }

    pub fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.get(parent)?.children.get(name).copied()
    }

    pub fn set_executable(&mut self, id: NodeId, executable: bool) {
        self.get_mut(id).executable = executable;
    }

    pub fn set_redirect(&mut self, id: NodeId, target: Option<NodeId>) {
        self.get_mut(id).redirect = target;
    }

    pub(super) fn rename(&mut self, id: NodeId, new_name: &str) {
        match &mut self.get_mut(id).kind {
            NodeKind::Root => {}
            NodeKind::Literal { name } | NodeKind::Argument { name, .. } => {
                *name = new_name.to_string();
            }
        }
    }

    /// Follows child names from the root, e.g. `["tp", "target"]`.
    pub fn find(&self, path: &[&str]) -> Option<NodeId> {
        path.iter()
            .try_fold(self.root, |node, name| self.child(node, name))
    }

    /// Copies `children` of `src` and attaches them under `parent` in one
    /// pass, so redirects between them survive. `mapping` may be seeded
    /// with source nodes that already have a counterpart in this tree;
    /// redirects to anything else outside the copied set are dropped.
    pub(super) fn copy_children(
        &mut self,
        src: &CommandTree,
        children: &[NodeId],
        parent: NodeId,
        mut mapping: FxHashMap<NodeId, NodeId>,
    ) {
        let mut pending = Vec::new();
        for &child in children {
            let copy = self.copy_node(src, child, &mut mapping, &mut pending);
            self.attach(parent, copy);
        }
        self.resolve_redirects(&mapping, pending);
    }

    fn resolve_redirects(
        &mut self,
        mapping: &FxHashMap<NodeId, NodeId>,
        pending: Vec<(NodeId, NodeId)>,
    ) {
        for (copy, target) in pending {
            self.get_mut(copy).redirect = mapping.get(&target).copied();
        }
    }

    fn copy_node(
        &mut self,
        src: &CommandTree,
        node: NodeId,
        mapping: &mut FxHashMap<NodeId, NodeId>,
        pending: &mut Vec<(NodeId, NodeId)>,
    ) -> NodeId {
        let source = &src[node];
        let copy = self.push(CommandNode {
            kind: source.kind.clone(),
            children: IndexMap::new(),
            executable: source.executable,
            redirect: None,
            custom_suggestions: source.custom_suggestions,
        });
        mapping.insert(node, copy);
        if let Some(target) = source.redirect {
            pending.push((copy, target));
        }
        for child in source.children() {
            if mapping.contains_key(&child) {
                continue;
            }
            let child_copy = self.copy_node(src, child, mapping, pending);
            self.attach(copy, child_copy);
        }
        copy
    }
}

impl Index<NodeId> for CommandTree {
    type Output = CommandNode;

    fn index(&self, id: NodeId) -> &CommandNode {
        &self.nodes[id.0]
    }
}
