#![allow(dead_code)]

use cmdtree_core::commands::{
    encoder, ArgumentRegistry, CommandGraph, CommandManager, CommandTree, EncodeOptions,
    GraphNativeRegistrar, GraphNode, NodeBuilder, NodeId, NodeKind, Registrar, RegistrarRecord,
};
use cmdtree_core::permissions::{PermissionsCache, Requester};
use cmdtree_network::packets::clientbound::{CCommands, CCommandsNode};
use rustc_hash::FxHashMap;

/// Graph-native registrar whose visibility is decided by a plain predicate.
pub struct PredicateRegistrar {
    graph: CommandGraph,
    predicate: fn(&GraphNode) -> bool,
}

impl GraphNativeRegistrar for PredicateRegistrar {
    fn root_node(&self) -> &CommandGraph {
        &self.graph
    }

    fn can_use(&self, _requester: &Requester, node: &GraphNode) -> bool {
        (self.predicate)(node)
    }
}

pub fn predicate_record(
    root: NodeBuilder,
    aliases: &[&str],
    predicate: fn(&GraphNode) -> bool,
) -> RegistrarRecord {
    let graph = CommandGraph::build(root).unwrap();
    let mut record = RegistrarRecord::new(
        "test",
        graph.name().to_string(),
        Registrar::graph_native(PredicateRegistrar { graph, predicate }),
    );
    for alias in aliases {
        record = record.alias(*alias);
    }
    record
}

/// `give` (executable) with a single `item` word argument (executable).
pub fn give_graph(arguments: &ArgumentRegistry) -> NodeBuilder {
    NodeBuilder::literal("give").executable().then(
        NodeBuilder::argument("item", arguments.create("brigadier:string")).executable(),
    )
}

pub fn frozen_manager(records: Vec<RegistrarRecord>) -> CommandManager {
    let mut manager = CommandManager::new(ArgumentRegistry::with_defaults());
    for record in records {
        manager.register(record).unwrap();
    }
    manager.freeze();
    manager
}

pub fn steve() -> Requester {
    Requester::player("Steve", PermissionsCache::new())
}

pub fn encode_and_decode(tree: &CommandTree) -> CCommands {
    let bytes = encoder::encode(tree, &EncodeOptions::default()).unwrap();
    let mut reader = bytes.as_slice();
    let packet = CCommands::decode(&mut reader).unwrap();
    assert!(reader.is_empty(), "trailing bytes after packet");
    packet
}

/// Walks `tree` and the decoded `packet` side by side and checks that they
/// describe the same structure.
pub fn assert_same_structure(tree: &CommandTree, packet: &CCommands) {
    let mut seen = FxHashMap::default();
    compare(tree, tree.root(), packet, packet.root_index, &mut seen);
}

fn compare(
    tree: &CommandTree,
    node: NodeId,
    packet: &CCommands,
    index: i32,
    seen: &mut FxHashMap<NodeId, i32>,
) {
    if let Some(&previous) = seen.get(&node) {
        assert_eq!(previous, index, "node encoded under two ids");
        return;
    }
    seen.insert(node, index);

    let encoded = &packet.nodes[index as usize];
    let source = &tree[node];
    let expected_kind = match source.kind() {
        NodeKind::Root => CCommandsNode::KIND_ROOT,
        NodeKind::Literal { .. } => CCommandsNode::KIND_LITERAL,
        NodeKind::Argument { .. } => CCommandsNode::KIND_ARGUMENT,
    };
    assert_eq!(encoded.kind(), expected_kind);
    assert_eq!(encoded.name.as_deref(), source.name());
    assert_eq!(
        encoded.flags & CCommandsNode::EXECUTABLE != 0,
        source.is_executable()
    );
    if let NodeKind::Argument { descriptor, .. } = source.kind() {
        let parser = encoded.parser.as_ref().unwrap();
        assert_eq!(parser.identifier, descriptor.key().as_str());
    }

    let children: Vec<_> = source.children().collect();
    assert_eq!(encoded.children.len(), children.len());
    for (child, &child_index) in children.into_iter().zip(&encoded.children) {
        compare(tree, child, packet, child_index, seen);
    }

    match (source.redirect(), encoded.redirect_node) {
        (Some(target), Some(target_index)) => {
            assert!(encoded.flags & CCommandsNode::REDIRECT != 0);
            compare(tree, target, packet, target_index, seen);
        }
        (None, None) => assert_eq!(encoded.flags & CCommandsNode::REDIRECT, 0),
        (expected, actual) => panic!("redirect mismatch: {:?} vs {:?}", expected, actual),
    }
}
