use super::argument::{ArgumentDescriptor, ArgumentProperties, NumericRange};
use super::error::EncodeError;
use super::node::{CommandTree, NodeId, NodeKind};
use bitflags::bitflags;
use cmdtree_network::packets::clientbound::{
    CCommands, CCommandsNode, CCommandsNodeParser, CCommandsNodeProperties,
};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use tracing::trace;

bitflags! {
    #[derive(Copy, Clone)]
    struct CommandFlags: u8 {
        const ROOT = 0x0;
        const LITERAL = 0x1;
        const ARGUMENT = 0x2;
        const EXECUTABLE = 0x4;
        const REDIRECT = 0x8;
        const HAS_SUGGESTIONS_TYPE = 0x10;
    }
}

pub const DEFAULT_SUGGESTIONS_PROVIDER: &str = "minecraft:ask_server";
pub const DEFAULT_MAX_STRING_LENGTH: usize = 32767;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Sent for every argument node that asks for custom suggestions.
    pub suggestions_provider: String,
    pub max_string_length: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            suggestions_provider: DEFAULT_SUGGESTIONS_PROVIDER.to_string(),
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
        }
    }
}

/// Wire ids for every node reachable from the root, in assignment order.
struct Assignment {
    order: Vec<NodeId>,
    ids: FxHashMap<NodeId, i32>,
}

impl Assignment {
    fn id_of(&self, node: NodeId) -> Result<i32, EncodeError> {
        self.ids
            .get(&node)
            .copied()
            .ok_or(EncodeError::UnassignedNode { node })
    }
}

/// Breadth first from the root: children in order, then the redirect.
/// Each identity is numbered once, so redirect cycles terminate. A
/// reference to a node outside the arena is left unassigned and reported
/// when the referencing node is built.
fn assign_ids(tree: &CommandTree) -> Result<Assignment, EncodeError> {
    let mut order = Vec::new();
    let mut ids = FxHashMap::default();
    let mut queue = VecDeque::new();

    let mut visit = |node: NodeId,
                     order: &mut Vec<NodeId>,
                     queue: &mut VecDeque<NodeId>|
     -> Result<(), EncodeError> {
        if ids.contains_key(&node) || tree.get(node).is_none() {
            return Ok(());
        }
        let id = i32::try_from(order.len())
            .map_err(|_| EncodeError::TooManyNodes { count: order.len() + 1 })?;
        ids.insert(node, id);
        order.push(node);
        queue.push_back(node);
        Ok(())
    };

    visit(tree.root(), &mut order, &mut queue)?;
    while let Some(node) = queue.pop_front() {
        let node = &tree[node];
        for child in node.children() {
            visit(child, &mut order, &mut queue)?;
        }
        if let Some(target) = node.redirect() {
            visit(target, &mut order, &mut queue)?;
        }
    }

    Ok(Assignment { order, ids })
}

fn checked_string(value: &str, options: &EncodeOptions) -> Result<String, EncodeError> {
    if value.len() > options.max_string_length {
        return Err(EncodeError::StringTooLong {
            value: value.to_string(),
            len: value.len(),
            max: options.max_string_length,
        });
    }
    Ok(value.to_string())
}

fn build_properties(properties: &ArgumentProperties) -> CCommandsNodeProperties {
    match *properties {
        ArgumentProperties::String(mode) => CCommandsNodeProperties::String(mode.wire_id()),
        ArgumentProperties::Range(NumericRange::Int { min, max }) => {
            CCommandsNodeProperties::Integer { min, max }
        }
        ArgumentProperties::Range(NumericRange::Long { min, max }) => {
            CCommandsNodeProperties::Long { min, max }
        }
        ArgumentProperties::Range(NumericRange::Float { min, max }) => {
            CCommandsNodeProperties::Float { min, max }
        }
        ArgumentProperties::Range(NumericRange::Double { min, max }) => {
            CCommandsNodeProperties::Double { min, max }
        }
        ArgumentProperties::Entity(flags) => CCommandsNodeProperties::Entity(flags.bits()),
        ArgumentProperties::Opaque => CCommandsNodeProperties::None,
    }
}

fn build_parser(
    descriptor: &ArgumentDescriptor,
    options: &EncodeOptions,
) -> Result<CCommandsNodeParser, EncodeError> {
    Ok(CCommandsNodeParser {
        identifier: checked_string(descriptor.key().as_str(), options)?,
        properties: build_properties(descriptor.properties()),
    })
}

fn build_node(
    tree: &CommandTree,
    assignment: &Assignment,
    node: NodeId,
    options: &EncodeOptions,
) -> Result<CCommandsNode, EncodeError> {
    let node = &tree[node];
    let mut flags = CommandFlags::empty();
    if node.is_executable() {
        flags |= CommandFlags::EXECUTABLE;
    }

    let children = node
        .children()
        .map(|child| assignment.id_of(child))
        .collect::<Result<Vec<_>, _>>()?;

    let redirect_node = match node.redirect() {
        Some(target) => {
            flags |= CommandFlags::REDIRECT;
            Some(assignment.id_of(target)?)
        }
        None => None,
    };

    let mut name = None;
    let mut parser = None;
    let mut suggestions_type = None;
    match node.kind() {
        NodeKind::Root => flags |= CommandFlags::ROOT,
        NodeKind::Literal { name: literal } => {
            flags |= CommandFlags::LITERAL;
            name = Some(checked_string(literal, options)?);
        }
        NodeKind::Argument {
            name: argument,
            descriptor,
        } => {
            flags |= CommandFlags::ARGUMENT;
            name = Some(checked_string(argument, options)?);
            parser = Some(build_parser(descriptor, options)?);
            if node.has_custom_suggestions() {
                flags |= CommandFlags::HAS_SUGGESTIONS_TYPE;
                suggestions_type = Some(checked_string(&options.suggestions_provider, options)?);
            }
        }
    }

    Ok(CCommandsNode {
        flags: flags.bits(),
        children,
        redirect_node,
        name,
        parser,
        suggestions_type,
    })
}

/// Flattens `tree` into the declare commands node list, root first.
pub fn build_packet(tree: &CommandTree, options: &EncodeOptions) -> Result<CCommands, EncodeError> {
    let assignment = assign_ids(tree)?;
    trace!("Assigned {} command node ids", assignment.order.len());

    let nodes = assignment
        .order
        .iter()
        .map(|&node| build_node(tree, &assignment, node, options))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CCommands {
        nodes,
        root_index: assignment.id_of(tree.root())?,
    })
}

/// Packet body: node count, nodes, root index. Nothing is returned if
/// any node fails to encode.
pub fn encode(tree: &CommandTree, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    let packet = build_packet(tree, options)?;
    let mut buf = Vec::new();
    packet.write(&mut buf);
    Ok(buf)
}
