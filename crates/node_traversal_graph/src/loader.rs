// SPDX-License-Identifier: MIT OR Apache-2.0
//! Loader for the line-oriented adjacency format.
//!
//! Each line declares a source node and its outgoing edges:
//!
//! ```text
//! 1 - > 2, 3
//! 2 - > -1
//! 3 - > nothing
//! ```
//!
//! An empty target list or the literal `nothing` declares no edges. Targets
//! may be referenced before their own declaration line.

use crate::graph::Graph;
use std::path::{Path, PathBuf};

/// Target list literal meaning "no outgoing edges"
pub const NO_TARGETS: &str = "nothing";

const TRIM_CHARS: &[char] = &[' ', '\t', '\r', '\n'];

/// Strip leading and trailing spaces, tabs, CR and LF
pub fn trim(s: &str) -> &str {
    s.trim_matches(TRIM_CHARS)
}

/// One parsed declaration line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDecl<'a> {
    /// Source node id
    pub source: &'a str,
    /// Target ids in declaration order
    pub targets: Vec<&'a str>,
}

/// Byte offset of the arrow: the first `-` followed by optional whitespace and `>`.
/// Returns the offsets of the `-` and of the `>`.
fn find_arrow(line: &str) -> Option<(usize, usize)> {
    line.match_indices('-').find_map(|(dash, _)| {
        let rest = &line[dash + 1..];
        let skipped = rest.len() - rest.trim_start_matches(TRIM_CHARS).len();
        rest[skipped..]
            .starts_with('>')
            .then_some((dash, dash + 1 + skipped))
    })
}

/// Parse a single declaration line.
///
/// Returns `None` for blank lines. A line without an arrow is treated as a
/// bare source id with no targets.
pub fn parse_line(line: &str) -> Option<LineDecl<'_>> {
    let (source, target_list) = match find_arrow(line) {
        Some((dash, gt)) => (trim(&line[..dash]), trim(&line[gt + 1..])),
        None => (trim(line), ""),
    };

    if source.is_empty() {
        return None;
    }

    let targets = if target_list.is_empty() || target_list == NO_TARGETS {
        Vec::new()
    } else {
        target_list
            .split(',')
            .map(trim)
            .filter(|t| !t.is_empty())
            .collect()
    };

    Some(LineDecl { source, targets })
}

/// Build a graph from declaration lines.
///
/// Nodes are created as ids are first seen; edges are applied only after
/// every line has been read.
pub fn load_from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Graph {
    let mut graph = Graph::new();
    let mut edges = Vec::new();

    for (line_no, line) in lines.into_iter().enumerate() {
        let Some(decl) = parse_line(line) else {
            continue;
        };
        tracing::debug!(
            line = line_no + 1,
            source = decl.source,
            targets = decl.targets.len(),
            "Parsed declaration"
        );

        let from = graph.get_or_insert(decl.source);
        for target in decl.targets {
            let to = graph.get_or_insert(target);
            edges.push((from, to));
        }
    }

    for (from, to) in edges {
        // Both handles were issued by this graph above
        if let Err(e) = graph.add_edge(from, to) {
            tracing::warn!("Dropping edge: {e}");
        }
    }

    graph
}

/// Build a graph from the full text of an adjacency file
pub fn load_from_str(text: &str) -> Graph {
    load_from_lines(text.lines())
}

/// Read and parse an adjacency file
pub fn try_load_from_path(path: &Path) -> Result<Graph, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = load_from_str(&text);
    tracing::info!(
        "Loaded graph from {:?}: {} nodes, {} edges",
        path,
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Read and parse an adjacency file, yielding an empty graph if it cannot be read
pub fn load_from_path(path: &Path) -> Graph {
    try_load_from_path(path).unwrap_or_else(|e| {
        tracing::warn!("{e}; continuing with an empty graph");
        Graph::new()
    })
}

/// Error when reading an adjacency file
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// File could not be opened or read
    #[error("Failed to read graph file {path:?}: {source}")]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbor_ids(graph: &Graph, id: &str) -> Vec<String> {
        let node = graph.find(id).unwrap();
        graph
            .neighbors(node)
            .iter()
            .map(|n| graph.id_of(*n).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_trim_is_idempotent() {
        for s in ["", "  ", " a ", "\t\r\nb c\n", "x", " -1\r"] {
            assert_eq!(trim(trim(s)), trim(s));
        }
        assert_eq!(trim("\t 2 \r\n"), "2");
        assert_eq!(trim(" \n"), "");
    }

    #[test]
    fn test_parse_line_with_targets() {
        let decl = parse_line("1 - > 2, 3").unwrap();
        assert_eq!(decl.source, "1");
        assert_eq!(decl.targets, vec!["2", "3"]);
    }

    #[test]
    fn test_parse_line_negative_source_id() {
        let decl = parse_line("-1 - > nothing").unwrap();
        assert_eq!(decl.source, "-1");
        assert!(decl.targets.is_empty());

        let decl = parse_line("2 -> -1").unwrap();
        assert_eq!(decl.source, "2");
        assert_eq!(decl.targets, vec!["-1"]);
    }

    #[test]
    fn test_parse_line_without_arrow() {
        let decl = parse_line("  lonely node \r").unwrap();
        assert_eq!(decl.source, "lonely node");
        assert!(decl.targets.is_empty());

        let decl = parse_line("4 - >").unwrap();
        assert_eq!(decl.source, "4");
        assert!(decl.targets.is_empty());
    }

    #[test]
    fn test_parse_line_skips_blank_lines_and_empty_tokens() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line(" \t\r"), None);
        let decl = parse_line("5 - > 6,, 7 ,").unwrap();
        assert_eq!(decl.targets, vec!["6", "7"]);
    }

    #[test]
    fn test_forward_references_resolve() {
        let graph = load_from_str("1 - > 2\n2 - > 3\n3 - > nothing\n");
        assert_eq!(graph.node_count(), 3);
        assert_eq!(neighbor_ids(&graph, "1"), vec!["2"]);
        assert_eq!(neighbor_ids(&graph, "2"), vec!["3"]);
        assert!(neighbor_ids(&graph, "3").is_empty());
    }

    #[test]
    fn test_targets_only_nodes_exist() {
        let graph = load_from_str("1 - > 2, 3\n2 - > -1");
        for (_, node) in graph.iter() {
            for neighbor in node.neighbors() {
                assert!(graph.node(*neighbor).is_some());
            }
        }
        assert!(graph.find("3").is_some());
        assert!(graph.find("-1").is_some());
    }

    #[test]
    fn test_repeated_source_lines_append_in_order() {
        let graph = load_from_str("1 - > 2\n1 - > 3, 2\n1 - > 1");
        assert_eq!(neighbor_ids(&graph, "1"), vec!["2", "3", "2", "1"]);
    }

    #[test]
    fn test_nothing_token_inside_list_is_an_id() {
        let graph = load_from_str("1 - > nothing, 2");
        assert_eq!(neighbor_ids(&graph, "1"), vec!["nothing", "2"]);
    }

    #[test]
    fn test_missing_file_yields_empty_graph() {
        let path = std::env::temp_dir().join("node_traversal_missing_input.txt");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(try_load_from_path(&path), Err(LoadError::Io { .. })));
        assert!(load_from_path(&path).is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("node_traversal_loader_test.txt");
        std::fs::write(&path, "1 - > 2, 3\r\n2 - > -1\r\n3 - > nothing\r\n-1 - > nothing\r\n").unwrap();
        let graph = load_from_path(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(neighbor_ids(&graph, "1"), vec!["2", "3"]);
        assert_eq!(neighbor_ids(&graph, "2"), vec!["-1"]);
    }
}
