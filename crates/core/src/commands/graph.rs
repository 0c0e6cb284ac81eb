use super::argument::ArgumentDescriptor;
use super::error::GraphError;
use super::node::{CommandNode, CommandTree, NodeId, NodeKind};
use crate::permissions::Requester;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::ops::Index;
use tracing::debug;

pub type Requirement = fn(&Requester) -> bool;

/// Owned builder for the command graph of a graph-native registrar.
#[derive(Clone)]
pub struct NodeBuilder {
    kind: NodeKind,
    children: Vec<NodeBuilder>,
    executable: bool,
    redirect: Option<Vec<String>>,
    custom_suggestions: bool,
    permissions: Vec<String>,
    requirement: Option<Requirement>,
}

impl NodeBuilder {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            executable: false,
            redirect: None,
            custom_suggestions: false,
            permissions: Vec::new(),
            requirement: None,
        }
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

    pub fn then(mut self, child: NodeBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }

    /// Redirects to the node at `path`, given as child names starting below
    /// the graph's root literal. An empty path is the root itself.
    pub fn redirect(mut self, path: &[&str]) -> Self {
        self.redirect = Some(path.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn custom_suggestions(mut self) -> Self {
        self.custom_suggestions = true;
        self
    }

    pub fn require_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    pub fn requires(mut self, requirement: Requirement) -> Self {
        self.requirement = Some(requirement);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphNodeId(usize);

pub struct GraphNode {
    kind: NodeKind,
    children: Vec<GraphNodeId>,
    executable: bool,
    redirect: Option<GraphNodeId>,
    custom_suggestions: bool,
    permissions: Vec<String>,
    requirement: Option<Requirement>,
}

impl GraphNode {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.kind.name()
    }

    pub fn children(&self) -> &[GraphNodeId] {
        &self.children
    }

    /// The node's own requirement: every permission granted and the
    /// requirement predicate, if any, satisfied.
    pub fn can_use(&self, requester: &Requester) -> bool {
        self.permissions
            .iter()
            .all(|permission| requester.has_permission(permission))
            && self.requirement.is_none_or(|requirement| requirement(requester))
    }
}

/// A registrar's authoritative command graph, flattened into an arena so
/// redirects can refer to nodes by identity.
pub struct CommandGraph {
    nodes: Vec<GraphNode>,
}

impl CommandGraph {
    pub fn build(root: NodeBuilder) -> Result<CommandGraph, GraphError> {
        if !matches!(root.kind, NodeKind::Literal { .. }) {
            return Err(GraphError::RootNotLiteral);
        }

        let mut graph = CommandGraph { nodes: Vec::new() };
        let mut paths = FxHashMap::default();
        let mut redirects = Vec::new();
        graph.flatten(root, Vec::new(), &mut paths, &mut redirects);

        for (id, path) in redirects {
            let Some(&target) = paths.get(&path) else {
                return Err(GraphError::UnknownRedirectTarget {
                    path: path.iter().join(" "),
                });
            };
            graph.nodes[id.0].redirect = Some(target);
        }
        Ok(graph)
    }

    fn flatten(
        &mut self,
        builder: NodeBuilder,
        path: Vec<String>,
        paths: &mut FxHashMap<Vec<String>, GraphNodeId>,
        redirects: &mut Vec<(GraphNodeId, Vec<String>)>,
    ) -> GraphNodeId {
        let id = GraphNodeId(self.nodes.len());
        self.nodes.push(GraphNode {
            kind: builder.kind,
            children: Vec::new(),
            executable: builder.executable,
            redirect: None,
            custom_suggestions: builder.custom_suggestions,
            permissions: builder.permissions,
            requirement: builder.requirement,
        });
        if let Some(target) = builder.redirect {
            redirects.push((id, target));
        }

        for child in builder.children {
            let mut child_path = path.clone();
            child_path.push(child.kind.name().unwrap_or_default().to_string());
            let child_id = self.flatten(child, child_path, paths, redirects);
            self.nodes[id.0].children.push(child_id);
        }
        paths.entry(path).or_insert(id);
        id
    }

    pub fn root(&self) -> GraphNodeId {
        GraphNodeId(0)
    }

    pub fn name(&self) -> &str {
        self.nodes[0].name().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Copies every node passing `can_use`, together with all its ancestors,
    /// into `tree` and returns the copy of the root (detached). Returns
    /// `None` if the root itself is not usable.
    ///
    /// Redirect targets may be visited after their source, or pruned, so
    /// redirects are collected while copying and resolved once the whole
    /// graph has been walked. A redirect to a pruned node is dropped.
    pub fn filter<F>(&self, tree: &mut CommandTree, mut can_use: F) -> Option<NodeId>
    where
        F: FnMut(&GraphNode) -> bool,
    {
        let root = self.root();
        if !can_use(&self[root]) {
            return None;
        }

        let mut mapping = FxHashMap::default();
        let mut pending = Vec::new();
        let copied = self.copy_visible(root, tree, &mut can_use, &mut mapping, &mut pending);

        for (node, target) in pending {
            match mapping.get(&target) {
                Some(&resolved) => tree.set_redirect(node, Some(resolved)),
                None => debug!(
                    "Dropping redirect of '{}' in '{}', its target is not visible",
                    tree[node].name().unwrap_or_default(),
                    self.name()
                ),
            }
        }
        Some(copied)
    }

    fn copy_visible<F>(
        &self,
        id: GraphNodeId,
        tree: &mut CommandTree,
        can_use: &mut F,
        mapping: &mut FxHashMap<GraphNodeId, NodeId>,
        pending: &mut Vec<(NodeId, GraphNodeId)>,
    ) -> NodeId
    where
        F: FnMut(&GraphNode) -> bool,
    {
        let node = &self[id];
        let mut copy = match &node.kind {
            NodeKind::Root => CommandNode::root(),
            NodeKind::Literal { name } => CommandNode::literal(name.clone()),
            NodeKind::Argument { name, descriptor } => {
                CommandNode::argument(name.clone(), descriptor.clone())
            }
        };
        copy.executable = node.executable;
        copy.custom_suggestions = node.custom_suggestions;

        let copy = tree.push(copy);
        mapping.insert(id, copy);
        if let Some(target) = node.redirect {
            pending.push((copy, target));
        }

        for &child in &node.children {
            if can_use(&self[child]) {
                let child_copy = self.copy_visible(child, tree, can_use, mapping, pending);
                tree.attach(copy, child_copy);
            }
        }
        copy
    }
}

impl Index<GraphNodeId> for CommandGraph {
    type Output = GraphNode;

    fn index(&self, id: GraphNodeId) -> &GraphNode {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::argument_registry::ArgumentRegistry;
    use crate::permissions::PermissionsCache;

    fn teleport_graph() -> CommandGraph {
        let arguments = ArgumentRegistry::with_defaults();
        CommandGraph::build(
            NodeBuilder::literal("teleport")
                .then(
                    NodeBuilder::argument(
                        "target",
                        arguments.create("minecraft:entity").single_target(),
                    )
                    .executable(),
                )
                .then(
                    NodeBuilder::literal("here")
                        .require_permission("cmdtree.teleport.here")
                        .then(NodeBuilder::literal("player").executable()),
                )
                .then(NodeBuilder::literal("back").redirect(&["here", "player"])),
        )
        .unwrap()
    }

    #[test]
    fn build_resolves_redirect_paths() {
        let graph = teleport_graph();
        assert_eq!(graph.len(), 5);
        assert_eq!(graph.name(), "teleport");
        let back = graph[graph.root()].children()[2];
        let here = graph[graph.root()].children()[1];
        let player = graph[here].children()[0];
        assert_eq!(graph[back].redirect, Some(player));
    }

    #[test]
    fn build_rejects_unknown_redirect() {
        let result = CommandGraph::build(
            NodeBuilder::literal("a").then(NodeBuilder::literal("b").redirect(&["c"])),
        );
        assert!(matches!(
            result,
            Err(GraphError::UnknownRedirectTarget { path }) if path == "c"
        ));
    }

    #[test]
    fn build_rejects_argument_root() {
        let arguments = ArgumentRegistry::with_defaults();
        let result = CommandGraph::build(NodeBuilder::argument(
            "x",
            arguments.create("brigadier:string"),
        ));
        assert!(matches!(result, Err(GraphError::RootNotLiteral)));
    }

    #[test]
    fn filter_prunes_subtrees_and_drops_dangling_redirects() {
        let graph = teleport_graph();
        let requester = Requester::player("Steve", PermissionsCache::new());
        let mut tree = CommandTree::new();

        let copied = graph
            .filter(&mut tree, |node| node.can_use(&requester))
            .unwrap();

        let names: Vec<_> = tree[copied]
            .children()
            .map(|id| tree[id].name().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["target", "back"]);
        let back = tree.child(copied, "back").unwrap();
        assert_eq!(tree[back].redirect(), None);
    }

    #[test]
    fn filter_keeps_redirects_to_visible_nodes() {
        let graph = teleport_graph();
        let requester = Requester::player(
            "Alex",
            PermissionsCache::new().grant("cmdtree.teleport.*"),
        );
        let mut tree = CommandTree::new();

        let copied = graph
            .filter(&mut tree, |node| node.can_use(&requester))
            .unwrap();

        let player = tree.child(tree.child(copied, "here").unwrap(), "player").unwrap();
        let back = tree.child(copied, "back").unwrap();
        assert_eq!(tree[back].redirect(), Some(player));
        assert!(tree[player].is_executable());
    }

    #[test]
    fn filter_resolves_redirects_to_later_siblings() {
        let graph = CommandGraph::build(
            NodeBuilder::literal("warp")
                .then(NodeBuilder::literal("home").redirect(&["set", "name"]))
                .then(
                    NodeBuilder::literal("set")
                        .require_permission("warps.set")
                        .then(NodeBuilder::literal("name").executable()),
                ),
        )
        .unwrap();

        let mut tree = CommandTree::new();
        let granted = Requester::player("Alex", PermissionsCache::new().grant("warps.set"));
        let copied = graph
            .filter(&mut tree, |node| node.can_use(&granted))
            .unwrap();
        let home = tree.child(copied, "home").unwrap();
        let name = tree.child(tree.child(copied, "set").unwrap(), "name").unwrap();
        assert!(home < name);
        assert_eq!(tree[home].redirect(), Some(name));

        let mut tree = CommandTree::new();
        let denied = Requester::player("Steve", PermissionsCache::new());
        let copied = graph
            .filter(&mut tree, |node| node.can_use(&denied))
            .unwrap();
        let home = tree.child(copied, "home").unwrap();
        assert!(tree.child(copied, "set").is_none());
        assert_eq!(tree[home].redirect(), None);
    }

    #[test]
    fn filter_returns_none_for_unusable_root() {
        let graph = CommandGraph::build(
            NodeBuilder::literal("stop")
                .require_permission("cmdtree.stop")
                .executable(),
        )
        .unwrap();
        let mut tree = CommandTree::new();
        let requester = Requester::player("Steve", PermissionsCache::new());
        assert!(graph.filter(&mut tree, |node| node.can_use(&requester)).is_none());
        assert!(graph.filter(&mut tree, |node| node.can_use(&Requester::console())).is_some());
    }

    #[test]
    fn requirement_predicate_is_checked() {
        fn console_only(requester: &Requester) -> bool {
            requester.is_console()
        }
        let graph = CommandGraph::build(NodeBuilder::literal("op").requires(console_only)).unwrap();
        let player = Requester::player("Steve", PermissionsCache::new().grant("*"));
        assert!(!graph[graph.root()].can_use(&player));
        assert!(graph[graph.root()].can_use(&Requester::console()));
    }
}
