use crate::commands::argument::StringMode;
use crate::commands::builder::TreeBuilder;
use crate::commands::manager::CommandManager;
use crate::commands::registrar::{DeclarativeRegistrar, Registrar, RegistrarRecord};
use crate::permissions::Requester;

const OWNER: &str = "worldedit";

/// A WorldEdit command gated by a single permission node. The tree is
/// the same for everyone allowed to use it.
struct WorldEditCommand {
    permission: &'static str,
    tree: fn(&mut TreeBuilder<'_>),
}

impl DeclarativeRegistrar for WorldEditCommand {
    fn can_use(&self, requester: &Requester) -> bool {
        requester.has_permission(self.permission)
    }

    fn contribute(&self, _requester: &Requester, builder: &mut TreeBuilder<'_>) -> anyhow::Result<()> {
        (self.tree)(builder);
        Ok(())
    }
}

fn register(
    manager: &mut CommandManager,
    name: &str,
    aliases: &[&str],
    permission: &'static str,
    tree: fn(&mut TreeBuilder<'_>),
) -> anyhow::Result<()> {
    let mut record = RegistrarRecord::new(
        OWNER,
        name,
        Registrar::declarative(WorldEditCommand { permission, tree }),
    );
    for alias in aliases {
        record = record.alias(*alias);
    }
    manager.register(record)?;
    Ok(())
}

fn pos(builder: &mut TreeBuilder<'_>) {
    builder.executable();
    builder.argument_of("pos", "minecraft:block_pos").executable();
}

fn set(builder: &mut TreeBuilder<'_>) {
    let pattern = builder
        .arguments()
        .create("brigadier:string")
        .mode(StringMode::Greedy);
    builder
        .argument("pattern", pattern)
        .custom_suggestions()
        .executable();
}

fn expand(builder: &mut TreeBuilder<'_>) {
    builder.literal("vert").executable();
    let amount = builder
        .arguments()
        .create("brigadier:integer")
        .int_range(Some(1), None);
    let mut amount = builder.argument("amount", amount);
    amount.executable();
    amount
        .argument_of("direction", "brigadier:string")
        .custom_suggestions()
        .executable();
}

fn copy(builder: &mut TreeBuilder<'_>) {
    builder.executable();
}

fn paste(builder: &mut TreeBuilder<'_>) {
    builder.executable();
    builder.literal("-a").executable();
}

fn undo(builder: &mut TreeBuilder<'_>) {
    builder.executable();
    let times = builder
        .arguments()
        .create("brigadier:integer")
        .int_range(Some(1), None);
    builder.argument("times", times).executable();
}

pub(super) fn register_commands(manager: &mut CommandManager) -> anyhow::Result<()> {
    register(manager, "/pos1", &["/1"], "worldedit.selection.pos", pos)?;
    register(manager, "/pos2", &["/2"], "worldedit.selection.pos", pos)?;
    register(manager, "/set", &[], "worldedit.region.set", set)?;
    register(manager, "/expand", &["/e"], "worldedit.selection.expand", expand)?;
    register(manager, "/copy", &["/c"], "worldedit.clipboard.copy", copy)?;
    register(manager, "/paste", &["/v"], "worldedit.clipboard.paste", paste)?;
    register(manager, "/undo", &["undo"], "worldedit.history.undo", undo)?;
    Ok(())
}
