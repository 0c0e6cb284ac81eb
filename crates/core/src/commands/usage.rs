use super::argument::{ArgumentProperties, StringMode};
use super::node::{CommandTree, NodeId, NodeKind};
use itertools::Itertools;
use std::collections::BTreeSet;

/// Usage line for the node at the end of `path`, e.g.
/// `/give <target> <item> [<count>]`. `path` starts at the root.
pub fn generate_usage(tree: &CommandTree, path: &[NodeId]) -> String {
    let mut parts = path
        .iter()
        .skip(1)
        .map(|&node| get_display_name(tree, node))
        .collect_vec();

    if let Some(&current) = path.last() {
        let suffix = build_usage_suffix(tree, current);
        if !suffix.is_empty() {
            parts.push(suffix);
        }
    }

    format!("/{}", parts.join(" "))
}

/// One usage line per root command. Aliases are shown as the command they
/// redirect to.
pub fn list_commands(tree: &CommandTree) -> Vec<String> {
    let root = tree.root();
    tree[root]
        .children()
        .map(|child| match tree[child].redirect() {
            Some(target) if target == root => {
                format!("/{} -> /", get_display_name(tree, child))
            }
            Some(target) => format!(
                "/{} -> {}",
                get_display_name(tree, child),
                generate_base_name(tree, target)
            ),
            None => generate_usage(tree, &[root, child]),
        })
        .collect()
}

struct UsageStructure {
    content: String,
    trailing_optionals: BTreeSet<String>,
}

fn build_usage_suffix(tree: &CommandTree, node: NodeId) -> String {
    let structure = analyze_structure(tree, node);

    let mut parts = Vec::new();
    if !structure.content.is_empty() {
        parts.push(structure.content);
    }
    for opt in structure.trailing_optionals {
        parts.push(format!("[{}]", opt));
    }
    parts.join(" ")
}

fn analyze_structure(tree: &CommandTree, node: NodeId) -> UsageStructure {
    let (optional_children, regular_children): (Vec<_>, Vec<_>) =
        tree[node].children().partition(|&child| is_greedy(tree, child));

    let mut trailing_optionals = optional_children
        .iter()
        .map(|&child| get_display_name(tree, child))
        .collect::<BTreeSet<_>>();

    let children_optional = tree[node].is_executable() || !optional_children.is_empty();
    let content = format_regular_children(
        tree,
        &regular_children,
        children_optional,
        &mut trailing_optionals,
    );

    UsageStructure {
        content,
        trailing_optionals,
    }
}

fn format_regular_children(
    tree: &CommandTree,
    children: &[NodeId],
    make_optional: bool,
    all_optionals: &mut BTreeSet<String>,
) -> String {
    if children.is_empty() {
        return String::new();
    }

    let alternatives = children
        .iter()
        .map(|&child| {
            let child_structure = analyze_structure(tree, child);
            all_optionals.extend(child_structure.trailing_optionals);

            let child_name = get_display_name(tree, child);
            if child_structure.content.is_empty() {
                child_name
            } else {
                format!("{} {}", child_name, child_structure.content)
            }
        })
        .join(" | ");

    if make_optional {
        format!("[{}]", alternatives)
    } else if children.len() > 1 {
        format!("({})", alternatives)
    } else {
        alternatives
    }
}

fn is_greedy(tree: &CommandTree, node: NodeId) -> bool {
    matches!(tree[node].kind(), NodeKind::Argument { descriptor, .. }
        if matches!(descriptor.properties(), ArgumentProperties::String(StringMode::Greedy)))
}

fn get_display_name(tree: &CommandTree, node: NodeId) -> String {
    match tree[node].kind() {
        NodeKind::Root => String::new(),
        NodeKind::Literal { name } => name.clone(),
        NodeKind::Argument { name, .. } => format!("<{}>", name),
    }
}

/// `/` followed by the literal path from the root down to `node`.
pub fn generate_base_name(tree: &CommandTree, node: NodeId) -> String {
    let Some(path) = path_to(tree, tree.root(), node) else {
        return "/".to_string();
    };
    let literals = path
        .into_iter()
        .map_while(|id| match tree[id].kind() {
            NodeKind::Root => Some(None),
            NodeKind::Literal { name } => Some(Some(name.as_str())),
            NodeKind::Argument { .. } => None,
        })
        .flatten()
        .join(" ");
    format!("/{}", literals)
}

fn path_to(tree: &CommandTree, from: NodeId, node: NodeId) -> Option<Vec<NodeId>> {
    if from == node {
        return Some(vec![from]);
    }
    tree[from].children().find_map(|child| {
        let mut path = path_to(tree, child, node)?;
        path.insert(0, from);
        Some(path)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::argument_registry::ArgumentRegistry;
    use crate::commands::node::CommandNode;

    fn give_tree() -> CommandTree {
        let arguments = ArgumentRegistry::with_defaults();
        let mut tree = CommandTree::new();
        let root = tree.root();
        let give = tree.add_child(root, CommandNode::literal("give"));
        let target = tree.add_child(
            give,
            CommandNode::argument("target", arguments.create("minecraft:entity")),
        );
        let item = tree.add_child(
            target,
            CommandNode::argument("item", arguments.create("minecraft:item_stack")),
        );
        tree.set_executable(item, true);
        let count = tree.add_child(
            item,
            CommandNode::argument("count", arguments.create("brigadier:integer")),
        );
        tree.set_executable(count, true);
        let g = tree.add_child(root, CommandNode::literal("g"));
        tree.set_redirect(g, Some(give));
        tree
    }

    #[test]
    fn usage_marks_optional_tail() {
        let tree = give_tree();
        let give = tree.find(&["give"]).unwrap();
        assert_eq!(
            generate_usage(&tree, &[tree.root(), give]),
            "/give <target> <item> [<count>]"
        );
    }

    #[test]
    fn alternatives_and_greedy_arguments() {
        let arguments = ArgumentRegistry::with_defaults();
        let mut tree = CommandTree::new();
        let root = tree.root();
        let gamemode = tree.add_child(root, CommandNode::literal("gamemode"));
        for mode in ["creative", "survival"] {
            let node = tree.add_child(gamemode, CommandNode::literal(mode));
            tree.set_executable(node, true);
        }
        let say = tree.add_child(root, CommandNode::literal("say"));
        tree.add_child(
            say,
            CommandNode::argument(
                "message",
                arguments
                    .create("brigadier:string")
                    .mode(StringMode::Greedy),
            ),
        );

        assert_eq!(
            list_commands(&tree),
            vec!["/gamemode (creative | survival)", "/say [<message>]"]
        );
    }

    #[test]
    fn aliases_point_at_their_target() {
        let tree = give_tree();
        assert_eq!(
            list_commands(&tree),
            vec!["/give <target> <item> [<count>]", "/g -> /give"]
        );
    }
}
