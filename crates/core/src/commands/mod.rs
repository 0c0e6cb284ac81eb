pub mod argument;
pub mod argument_registry;
pub mod builder;
pub mod builtin;
pub mod encoder;
pub mod error;
pub mod graph;
pub mod manager;
pub mod node;
pub mod packet;
pub mod registrar;
pub mod usage;

pub use argument::{
    ArgumentDescriptor, ArgumentProperties, ClientCompletionKey, EntityFlags, NumericRange,
    StringMode,
};
pub use argument_registry::{ArgumentFactory, ArgumentRegistry};
pub use builder::TreeBuilder;
pub use encoder::{build_packet, encode, EncodeOptions};
pub use error::{ContributeError, EncodeError, GraphError, RegistrationError, SynthesisError};
pub use graph::{CommandGraph, GraphNode, NodeBuilder};
pub use manager::CommandManager;
pub use node::{CommandNode, CommandTree, NodeId, NodeKind};
pub use packet::DeclareCommands;
pub use registrar::{
    DeclarativeRegistrar, GraphNativeRegistrar, Registrar, RegistrarRecord, StaticGraphRegistrar,
};

use once_cell::sync::OnceCell;
use tracing::info;

static COMMAND_MANAGER: OnceCell<CommandManager> = OnceCell::new();

/// Freezes `manager` and makes it the process wide command manager.
pub fn install(mut manager: CommandManager) -> Result<&'static CommandManager, RegistrationError> {
    manager.freeze();
    let installed = COMMAND_MANAGER
        .try_insert(manager)
        .map_err(|_| RegistrationError::AlreadyInstalled)?;
    info!(
        "Installed command manager with {} commands",
        installed.records().len()
    );
    Ok(installed)
}

/// The installed command manager, if [`install`] has been called.
pub fn manager() -> Option<&'static CommandManager> {
    COMMAND_MANAGER.get()
}
