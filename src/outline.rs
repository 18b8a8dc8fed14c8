//! ASCII outline rendering for a sheet.

use crate::models::{Actor, Row, Status};
use crate::sheet::Sheet;

const MANDATORY: char = '●';
const OPTIONAL: char = '○';
const ACTOR: char = '•';

/// Get the status symbol for a row.
fn status_symbol(status: Status) -> char {
    match status {
        Status::Mandatory => MANDATORY,
        Status::Optional => OPTIONAL,
    }
}

/// A node of the rendered outline.
struct Node {
    symbol: Option<char>,
    label: String,
    children: Vec<Node>,
}

fn row_node(row: &Row) -> Node {
    Node {
        symbol: Some(status_symbol(row.status)),
        label: format!(
            "{} [{}/5] {} €",
            row.feature,
            row.criticality,
            row.total_cost()
        ),
        children: row.actors().iter().map(actor_node).collect(),
    }
}

fn actor_node(actor: &Actor) -> Node {
    let label = if actor.name.is_empty() {
        format!("{} ({} €)", actor.role, actor.cost)
    } else {
        format!("{}: {} ({} €)", actor.role, actor.name, actor.cost)
    };
    Node {
        symbol: Some(ACTOR),
        label,
        children: Vec::new(),
    }
}

/// Render a sheet as an ASCII tree, one root per category.
///
/// Example output:
/// ```text
/// 1. Product Management
/// ├── ● Create, Edit, Delete [5/5] 250 €
/// │   ├── • Dev: Developer (100 €)
/// │   └── • Design: Designer (150 €)
/// └── ○ Export [2/5] 0 €
/// ```
pub fn render_outline(sheet: &Sheet) -> String {
    let mut output = String::new();
    for category in sheet.categories() {
        let node = Node {
            symbol: None,
            label: category.title.clone(),
            children: category.rows.iter().map(row_node).collect(),
        };
        render_node(&mut output, &node, "", true, true);
    }
    output
}

/// Recursively render a node and its children.
fn render_node(output: &mut String, node: &Node, prefix: &str, is_last: bool, is_root: bool) {
    if is_root {
        output.push_str(&node.label);
        output.push('\n');
    } else {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
        if let Some(symbol) = node.symbol {
            output.push(symbol);
            output.push(' ');
        }
        output.push_str(&node.label);
        output.push('\n');
    }

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    for (i, child) in node.children.iter().enumerate() {
        let child_is_last = i == node.children.len() - 1;
        render_node(output, child, &child_prefix, child_is_last, false);
    }
}
