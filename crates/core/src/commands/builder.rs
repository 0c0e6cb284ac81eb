use super::argument::ArgumentDescriptor;
use super::argument_registry::ArgumentRegistry;
use super::node::{CommandNode, CommandTree, NodeId, NodeKind};
use tracing::warn;

/// Handle for populating one node of a tree under construction.
///
/// Declarative registrars receive one of these rooted at a fresh literal
/// named after their primary command. Child builders borrow the tree, so
/// siblings are built one after another:
///
/// ```ignore
/// builder.literal("pos1").executable();
/// builder.argument_of("radius", "brigadier:integer").executable();
/// ```
pub struct TreeBuilder<'a> {
    tree: &'a mut CommandTree,
    arguments: &'a ArgumentRegistry,
    node: NodeId,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(tree: &'a mut CommandTree, arguments: &'a ArgumentRegistry, node: NodeId) -> Self {
        Self {
            tree,
            arguments,
            node,
        }
    }

    pub fn id(&self) -> NodeId {
        self.node
    }

    pub fn arguments(&self) -> &ArgumentRegistry {
        self.arguments
    }

    fn child(&mut self, node: CommandNode) -> TreeBuilder<'_> {
        let name = node.name().unwrap_or_default();
        let id = match self.tree.child(self.node, name) {
            Some(existing) => existing,
            None => self.tree.add_child(self.node, node),
        };
        TreeBuilder {
            tree: &mut *self.tree,
            arguments: self.arguments,
            node: id,
        }
    }

    /// Adds (or reopens) the literal child `name`.
    pub fn literal(&mut self, name: &str) -> TreeBuilder<'_> {
        self.child(CommandNode::literal(name))
    }

    /// Adds (or reopens) the argument child `name`. Reopening keeps the
    /// descriptor the child was created with.
    pub fn argument(&mut self, name: &str, descriptor: ArgumentDescriptor) -> TreeBuilder<'_> {
        self.child(CommandNode::argument(name, descriptor))
    }

    /// Like [`TreeBuilder::argument`] with the descriptor built by the
    /// factory registered for `kind`.
    pub fn argument_of(&mut self, name: &str, kind: &str) -> TreeBuilder<'_> {
        let descriptor = self.arguments.create(kind);
        self.argument(name, descriptor)
    }

    pub fn executable(&mut self) -> &mut Self {
        self.tree.set_executable(self.node, true);
        self
    }

    /// Asks the client to request suggestions for this argument from the server.
    pub fn custom_suggestions(&mut self) -> &mut Self {
        if matches!(self.tree[self.node].kind(), NodeKind::Argument { .. }) {
            self.tree.get_mut(self.node).custom_suggestions = true;
        } else {
            warn!("Custom suggestions are only supported on argument nodes");
        }
        self
    }

    pub fn redirect(&mut self, target: NodeId) -> &mut Self {
        self.tree.set_redirect(self.node, Some(target));
        self
    }
}
