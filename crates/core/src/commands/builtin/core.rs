use crate::commands::argument::StringMode;
use crate::commands::graph::{CommandGraph, NodeBuilder};
use crate::commands::manager::CommandManager;
use crate::commands::registrar::{Registrar, RegistrarRecord, StaticGraphRegistrar};
use crate::permissions::Requester;

const OWNER: &str = "cmdtree";

fn register(manager: &mut CommandManager, root: NodeBuilder, aliases: &[&str]) -> anyhow::Result<()> {
    let graph = CommandGraph::build(root)?;
    let mut record = RegistrarRecord::new(
        OWNER,
        graph.name().to_string(),
        Registrar::graph_native(StaticGraphRegistrar::new(graph)),
    );
    for alias in aliases {
        record = record.alias(*alias);
    }
    manager.register(record)?;
    Ok(())
}

fn console_only(requester: &Requester) -> bool {
    requester.is_console()
}

pub(super) fn register_commands(manager: &mut CommandManager) -> anyhow::Result<()> {
    let arguments = manager.arguments().clone();

    register(
        manager,
        NodeBuilder::literal("speed").then(
            NodeBuilder::argument(
                "speed",
                arguments.create("brigadier:float").float_range(Some(0.0), Some(10.0)),
            )
            .executable(),
        ),
        &[],
    )?;

    register(
        manager,
        NodeBuilder::literal("give")
            .require_permission("cmdtree.give")
            .then(
                NodeBuilder::argument("target", arguments.create("minecraft:entity").players_only())
                    .then(
                        NodeBuilder::argument("item", arguments.create("minecraft:item_stack"))
                            .executable()
                            .then(
                                NodeBuilder::argument(
                                    "count",
                                    arguments
                                        .create("brigadier:integer")
                                        .int_range(Some(1), Some(64)),
                                )
                                .executable(),
                            ),
                    ),
            ),
        &["g"],
    )?;

    register(
        manager,
        NodeBuilder::literal("teleport")
            .require_permission("cmdtree.teleport")
            .then(NodeBuilder::argument("position", arguments.create("minecraft:vec3")).executable())
            .then(
                NodeBuilder::argument(
                    "player",
                    arguments
                        .create("minecraft:entity")
                        .single_target()
                        .players_only(),
                )
                .executable(),
            ),
        &["tp"],
    )?;

    let mut gamemode = NodeBuilder::literal("gamemode").require_permission("cmdtree.gamemode");
    for mode in ["creative", "survival", "adventure", "spectator"] {
        gamemode = gamemode.then(NodeBuilder::literal(mode).executable());
    }
    register(manager, gamemode, &["gm"])?;

    register(
        manager,
        NodeBuilder::literal("stop")
            .require_permission("cmdtree.stop")
            .executable(),
        &[],
    )?;

    register(
        manager,
        NodeBuilder::literal("reload")
            .requires(console_only)
            .executable(),
        &[],
    )?;

    register(
        manager,
        NodeBuilder::literal("plot")
            .then(
                NodeBuilder::literal("info")
                    .require_permission("plots.info")
                    .executable(),
            )
            .then(
                NodeBuilder::literal("claim")
                    .require_permission("plots.claim")
                    .executable(),
            )
            .then(
                NodeBuilder::literal("visit")
                    .require_permission("plots.visit")
                    .then(
                        NodeBuilder::argument(
                            "player",
                            arguments.create("brigadier:string"),
                        )
                        .custom_suggestions()
                        .executable(),
                    ),
            )
            .then(
                NodeBuilder::literal("teleport")
                    .require_permission("plots.teleport")
                    .redirect(&["visit"]),
            ),
        &["p"],
    )?;

    register(
        manager,
        NodeBuilder::literal("help").executable().then(
            NodeBuilder::argument(
                "command",
                arguments.create("brigadier:string").mode(StringMode::Greedy),
            )
            .custom_suggestions()
            .executable(),
        ),
        &[],
    )?;

    Ok(())
}
