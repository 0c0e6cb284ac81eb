use super::encoder::{self, EncodeOptions};
use super::error::SynthesisError;
use super::manager::CommandManager;
use super::node::CommandTree;
use crate::permissions::Requester;
use rustc_hash::FxHashMap;
use cmdtree_network::packets::clientbound::ClientBoundPacket;
use cmdtree_network::PacketEncoder;
use tracing::warn;

/// Builds the declare commands packet for one requester.
///
/// Collaborators that are not registrars (for example a chat plugin that
/// only wants a client side hint) can add root level fragments first.
/// Synthesized commands always win over a fragment of the same name.
#[derive(Debug, Default)]
pub struct DeclareCommands {
    pending: CommandTree,
}

impl DeclareCommands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies every root child of `fragment`. A later fragment replaces an
    /// earlier child of the same name.
    pub fn add_root_fragment(&mut self, fragment: &CommandTree) {
        let root = self.pending.root();
        let children: Vec<_> = fragment[fragment.root()].children().collect();
        self.pending
            .copy_children(fragment, &children, root, FxHashMap::default());
    }

    pub fn pending(&self) -> &CommandTree {
        &self.pending
    }

    /// The synthesized tree for `requester` with the pending fragments
    /// grafted in.
    pub fn build_tree(
        &self,
        manager: &CommandManager,
        requester: &Requester,
    ) -> Result<CommandTree, SynthesisError> {
        let mut tree = manager.synthesize(requester)?;
        let root = tree.root();
        // a redirect to a shadowed fragment lands on the registered command
        let mut shadowed = FxHashMap::default();
        let mut fragments = Vec::new();
        for child in self.pending[self.pending.root()].children() {
            let name = self.pending[child].name().unwrap_or_default();
            match tree.child(root, name) {
                Some(registered) => {
                    warn!(
                        "Dropping command fragment '{}', a registered command of that name exists",
                        name
                    );
                    shadowed.insert(child, registered);
                }
                None => fragments.push(child),
            }
        }
        tree.copy_children(&self.pending, &fragments, root, shadowed);
        Ok(tree)
    }

    pub fn finish(
        &self,
        manager: &CommandManager,
        requester: &Requester,
        options: &EncodeOptions,
    ) -> Result<PacketEncoder, SynthesisError> {
        let tree = self.build_tree(manager, requester)?;
        let packet = encoder::build_packet(&tree, options)?;
        Ok(packet.encode())
    }
}
