mod common;

use cmdtree_core::commands::{
    builtin, encode, ArgumentRegistry, CommandManager, CommandNode, CommandTree, DeclareCommands,
    EncodeError, EncodeOptions, NodeBuilder, RegistrarRecord, Registrar,
};
use cmdtree_core::permissions::{PermissionsCache, Requester};
use cmdtree_network::packets::clientbound::{CCommands, CCommandsNode, CCommandsNodeProperties};
use common::*;

fn builtin_manager() -> CommandManager {
    let mut manager = CommandManager::new(ArgumentRegistry::with_defaults());
    builtin::register_commands(&mut manager).unwrap();
    manager.freeze();
    manager
}

fn requesters() -> Vec<Requester> {
    vec![
        steve(),
        Requester::player(
            "Alex",
            PermissionsCache::new()
                .grant("plots.*")
                .grant("worldedit.selection.*")
                .grant("cmdtree.teleport"),
        ),
        Requester::console(),
    ]
}

#[test]
fn ids_are_a_bijection() {
    let manager = builtin_manager();
    for requester in requesters() {
        let tree = manager.synthesize(&requester).unwrap();
        let packet = encode_and_decode(&tree);

        let count = packet.nodes.len();
        let mut referenced = vec![0usize; count];
        for node in &packet.nodes {
            for &child in node.children.iter().chain(&node.redirect_node) {
                assert!((child as usize) < count);
                referenced[child as usize] += 1;
            }
        }
        assert_eq!(packet.root_index, 0);
        assert_eq!(referenced[0], 0);
        // every non root id is reachable from somewhere
        assert!(referenced[1..].iter().all(|&refs| refs > 0));
    }
}

#[test]
fn round_trip_reproduces_structure() {
    let manager = builtin_manager();
    for requester in requesters() {
        let tree = manager.synthesize(&requester).unwrap();
        let packet = encode_and_decode(&tree);
        assert_same_structure(&tree, &packet);
    }
}

#[test]
fn aliases_point_at_primary_id() {
    let tree = builtin_manager().synthesize(&Requester::console()).unwrap();
    let packet = encode_and_decode(&tree);
    let id_of = |name: &str| {
        packet.nodes[0]
            .children
            .iter()
            .copied()
            .find(|&id| packet.nodes[id as usize].name.as_deref() == Some(name))
            .unwrap()
    };

    for (alias, primary) in [("tp", "teleport"), ("gm", "gamemode"), ("/c", "/copy"), ("undo", "/undo")] {
        let alias = &packet.nodes[id_of(alias) as usize];
        assert_ne!(alias.flags & CCommandsNode::REDIRECT, 0);
        assert_eq!(alias.redirect_node, Some(id_of(primary)));
    }
}

#[test]
fn entity_and_range_properties_on_the_wire() {
    let tree = builtin_manager().synthesize(&Requester::console()).unwrap();
    let packet = encode_and_decode(&tree);
    let properties = |name: &str| {
        packet
            .nodes
            .iter()
            .filter(|node| node.name.as_deref() == Some(name))
            .find_map(|node| node.parser.as_ref())
            .map(|parser| parser.properties.clone())
            .unwrap()
    };

    assert_eq!(properties("player"), CCommandsNodeProperties::Entity(0x03));
    assert_eq!(
        properties("count"),
        CCommandsNodeProperties::Integer {
            min: Some(1),
            max: Some(64)
        }
    );
    assert_eq!(
        properties("speed"),
        CCommandsNodeProperties::Float {
            min: Some(0.0),
            max: Some(10.0)
        }
    );
    assert_eq!(properties("position"), CCommandsNodeProperties::None);
}

#[test]
fn pruned_redirect_target_is_dropped() {
    let tree = builtin_manager()
        .synthesize(&Requester::player(
            "Steve",
            PermissionsCache::new().grant("plots.teleport"),
        ))
        .unwrap();
    let packet = encode_and_decode(&tree);
    let teleport = packet
        .nodes
        .iter()
        .find(|node| node.name.as_deref() == Some("teleport"))
        .unwrap();
    assert_eq!(teleport.flags, CCommandsNode::KIND_LITERAL);
    assert_eq!(teleport.redirect_node, None);
}

#[test]
fn dangling_redirect_fails_whole_packet() {
    let mut other = CommandTree::new();
    let mut far = other.root();
    for name in ["a", "b", "c", "d"] {
        far = other.add_child(far, CommandNode::literal(name));
    }

    let mut tree = CommandTree::new();
    let root = tree.root();
    let ok = tree.add_child(root, CommandNode::literal("ok"));
    tree.set_executable(ok, true);
    let broken = tree.add_child(root, CommandNode::literal("broken"));
    tree.set_redirect(broken, Some(far));

    match encode(&tree, &EncodeOptions::default()) {
        Err(EncodeError::UnassignedNode { node }) => assert_eq!(node, far),
        other => panic!("expected unassigned node error, got {:?}", other),
    }
}

#[test]
fn declare_commands_carrier_merges_fragments() {
    let arguments = ArgumentRegistry::with_defaults();
    let manager = common::frozen_manager(vec![
        predicate_record(give_graph(&arguments), &["g"], |_| true),
        RegistrarRecord::new(
            "chat",
            "msg",
            Registrar::from_fn(|_, builder| {
                builder.argument_of("target", "minecraft:entity").executable();
                Ok(())
            }),
        ),
    ]);

    let mut fragment = CommandTree::new();
    let root = fragment.root();
    let give = fragment.add_child(root, CommandNode::literal("give"));
    fragment.add_child(give, CommandNode::literal("shadowed"));
    let me = fragment.add_child(root, CommandNode::literal("me"));
    fragment.set_executable(me, true);

    let mut carrier = DeclareCommands::new();
    carrier.add_root_fragment(&fragment);
    let encoder = carrier
        .finish(&manager, &steve(), &EncodeOptions::default())
        .unwrap();
    assert_eq!(encoder.packet_id(), CCommands::PACKET_ID);

    let packet = CCommands::decode(&mut encoder.body()).unwrap();
    let root_children: Vec<_> = packet.nodes[0]
        .children
        .iter()
        .map(|&id| packet.nodes[id as usize].name.clone().unwrap())
        .collect();
    assert_eq!(root_children, vec!["give", "msg", "g", "me"]);
    assert!(
        packet
            .nodes
            .iter()
            .all(|node| node.name.as_deref() != Some("shadowed"))
    );
}

#[test]
fn graph_with_internal_redirect_loop_encodes() {
    let manager = common::frozen_manager(vec![predicate_record(
        NodeBuilder::literal("execute")
            .then(NodeBuilder::literal("as").then(NodeBuilder::literal("run").redirect(&[])))
            .then(NodeBuilder::literal("say").executable()),
        &[],
        |_| true,
    )]);
    let tree = manager.synthesize(&Requester::console()).unwrap();
    let packet = encode_and_decode(&tree);
    assert_same_structure(&tree, &packet);

    let run = packet
        .nodes
        .iter()
        .find(|node| node.name.as_deref() == Some("run"))
        .unwrap();
    assert_eq!(run.redirect_node, Some(1));
}
