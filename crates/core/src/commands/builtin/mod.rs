mod core;
mod worldedit;

use crate::commands::manager::CommandManager;

/// Registers the commands that ship with the server. Must be called before
/// the manager is frozen.
pub fn register_commands(manager: &mut CommandManager) -> anyhow::Result<()> {
    core::register_commands(manager)?;
    worldedit::register_commands(manager)?;
    Ok(())
}
