use super::argument_registry::ArgumentRegistry;
use super::error::{RegistrationError, SynthesisError};
use super::node::{CommandNode, CommandTree};
use super::registrar::RegistrarRecord;
use crate::permissions::Requester;
use rustc_hash::FxHashMap;
use tracing::{debug, error, warn};

/// Every registered command family plus the argument kinds they use.
///
/// Registration happens during startup. After [`CommandManager::freeze`]
/// the manager is read only and can be shared between threads that
/// synthesize trees for different requesters concurrently.
#[derive(Default)]
pub struct CommandManager {
    arguments: ArgumentRegistry,
    records: Vec<RegistrarRecord>,
    frozen: bool,
}

impl CommandManager {
    pub fn new(arguments: ArgumentRegistry) -> Self {
        Self {
            arguments,
            records: Vec::new(),
            frozen: false,
        }
    }

    pub fn arguments(&self) -> &ArgumentRegistry {
        &self.arguments
    }

    pub fn arguments_mut(&mut self) -> &mut ArgumentRegistry {
        &mut self.arguments
    }

    pub fn records(&self) -> &[RegistrarRecord] {
        &self.records
    }

    pub fn register(&mut self, record: RegistrarRecord) -> Result<(), RegistrationError> {
        if self.frozen {
            return Err(RegistrationError::Frozen {
                what: format!("command '{}' from '{}'", record.primary(), record.owner()),
            });
        }
        debug!(
            "Registered command '{}' from '{}'",
            record.primary(),
            record.owner()
        );
        self.records.push(record);
        Ok(())
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
        self.arguments.freeze();
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn check_primary_names(&self) -> Result<(), SynthesisError> {
        let mut owners: FxHashMap<&str, &str> = FxHashMap::default();
        for record in &self.records {
            if let Some(first) = owners.insert(record.primary(), record.owner()) {
                return Err(SynthesisError::DuplicatePrimary {
                    name: record.primary().to_string(),
                    first: first.to_string(),
                    second: record.owner().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Builds the command tree `requester` is allowed to see.
    ///
    /// Registrars are asked in registration order. A registrar that fails
    /// is left out of this tree and everything else is still delivered.
    /// Aliases become literal root children redirecting to their primary.
    pub fn synthesize(&self, requester: &Requester) -> Result<CommandTree, SynthesisError> {
        if !self.frozen {
            return Err(SynthesisError::RegistrationOpen);
        }
        self.check_primary_names()?;

        let mut tree = CommandTree::new();
        let root = tree.root();
        let mut grafted = Vec::with_capacity(self.records.len());

        for record in &self.records {
            let contributed = record.registrar().contribute(
                requester,
                &mut tree,
                &self.arguments,
                record.primary(),
            );
            match contributed {
                Ok(Some(node)) => {
                    tree.rename(node, record.primary());
                    tree.attach(root, node);
                    grafted.push((record, node));
                }
                Ok(None) => {}
                Err(err) => error!(
                    "Command '{}' from '{}' failed to build its tree for {}: {}",
                    record.primary(),
                    record.owner(),
                    requester.name(),
                    err
                ),
            }
        }

        for (record, target) in grafted {
            for alias in record.aliases() {
                if alias == record.primary() {
                    continue;
                }
                if tree.child(root, alias).is_some() {
                    warn!(
                        "Alias '{}' of '{}' collides with an existing command, skipping it",
                        alias,
                        record.primary()
                    );
                    continue;
                }
                let alias_node = tree.add_child(root, CommandNode::literal(alias.as_str()));
                tree.set_redirect(alias_node, Some(target));
            }
        }

        Ok(tree)
    }
}
