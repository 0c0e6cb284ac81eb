use super::argument_registry::ArgumentRegistry;
use super::builder::TreeBuilder;
use super::error::ContributeError;
use super::graph::{CommandGraph, GraphNode};
use super::node::{CommandNode, CommandTree, NodeId};
use crate::permissions::Requester;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// A registrar that owns an authoritative, permission aware command graph.
pub trait GraphNativeRegistrar: Send + Sync {
    fn root_node(&self) -> &CommandGraph;

    fn can_use(&self, requester: &Requester, node: &GraphNode) -> bool {
        node.can_use(requester)
    }
}

/// A registrar that only knows how to describe its commands for a given
/// requester. It is trusted to add only what the requester may use.
pub trait DeclarativeRegistrar: Send + Sync {
    /// Whether the requester sees the command at all. When this is false
    /// `contribute` is not called.
    fn can_use(&self, _requester: &Requester) -> bool {
        true
    }

    fn contribute(&self, requester: &Requester, builder: &mut TreeBuilder<'_>) -> anyhow::Result<()>;
}

pub enum Registrar {
    GraphNative(Box<dyn GraphNativeRegistrar>),
    Declarative(Box<dyn DeclarativeRegistrar>),
}

impl Registrar {
    pub fn graph_native(registrar: impl GraphNativeRegistrar + 'static) -> Self {
        Registrar::GraphNative(Box::new(registrar))
    }

    pub fn declarative(registrar: impl DeclarativeRegistrar + 'static) -> Self {
        Registrar::Declarative(Box::new(registrar))
    }

    /// A declarative registrar backed by a closure.
    pub fn from_fn<F>(contribute: F) -> Self
    where
        F: Fn(&Requester, &mut TreeBuilder<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Registrar::Declarative(Box::new(FnRegistrar(contribute)))
    }

    /// Writes this registrar's subtree for `requester` into `tree` and
    /// returns its (detached) top node, or `None` if the requester can see
    /// nothing of it.
    pub fn contribute(
        &self,
        requester: &Requester,
        tree: &mut CommandTree,
        arguments: &ArgumentRegistry,
        primary: &str,
    ) -> Result<Option<NodeId>, ContributeError> {
        match self {
            Registrar::GraphNative(registrar) => {
                let graph = registrar.root_node();
                Ok(graph.filter(tree, |node| registrar.can_use(requester, node)))
            }
            Registrar::Declarative(registrar) => {
                if !registrar.can_use(requester) {
                    return Ok(None);
                }
                let top = tree.push(CommandNode::literal(primary));
                let mut builder = TreeBuilder::new(tree, arguments, top);
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    registrar.contribute(requester, &mut builder)
                }));
                match result {
                    Ok(Ok(())) => Ok(Some(top)),
                    Ok(Err(err)) => Err(ContributeError::Failed(err)),
                    Err(payload) => Err(ContributeError::Panicked(panic_message(&*payload))),
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// One registered command family.
pub struct RegistrarRecord {
    owner: String,
    primary: String,
    aliases: Vec<String>,
    registrar: Registrar,
}

impl RegistrarRecord {
    pub fn new(owner: impl Into<String>, primary: impl Into<String>, registrar: Registrar) -> Self {
        Self {
            owner: owner.into(),
            primary: primary.into(),
            aliases: Vec::new(),
            registrar,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        if !self.aliases.contains(&alias) {
            self.aliases.push(alias);
        }
        self
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn registrar(&self) -> &Registrar {
        &self.registrar
    }
}

/// Serves a prebuilt graph with the default per-node permission check.
pub struct StaticGraphRegistrar {
    graph: CommandGraph,
}

impl StaticGraphRegistrar {
    pub fn new(graph: CommandGraph) -> Self {
        Self { graph }
    }
}

impl GraphNativeRegistrar for StaticGraphRegistrar {
    fn root_node(&self) -> &CommandGraph {
        &self.graph
    }
}

struct FnRegistrar<F>(F);

impl<F> DeclarativeRegistrar for FnRegistrar<F>
where
    F: Fn(&Requester, &mut TreeBuilder<'_>) -> anyhow::Result<()> + Send + Sync,
{
    fn contribute(&self, requester: &Requester, builder: &mut TreeBuilder<'_>) -> anyhow::Result<()> {
        (self.0)(requester, builder)
    }
}
