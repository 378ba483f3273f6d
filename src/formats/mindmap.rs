//! Filepath: src/formats/mindmap.rs
//! Mind-map format strategy (§4.4.1 item 6): content-detected `[N]`
//! node markers, split into one section per node plus a preamble.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::load_config;
use crate::dom::Node;
use crate::formats::registry::FormatStrategy;

const MIN_MARKER_LINES: usize = 3;

fn marker_regex() -> &'static Regex
{
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[(\d+)\]").expect("static mindmap marker pattern is valid"))
}

pub struct MindMapStrategy;

impl FormatStrategy for MindMapStrategy
{
    fn name(&self) -> &'static str
    {
        "mindmap"
    }

    fn detect(
        &self,
        content: &str,
    ) -> bool
    {
        content.split('\n').filter(|line| marker_regex().is_match(line)).count() >= MIN_MARKER_LINES
    }

    fn parse(
        &self,
        content: &str,
    ) -> Node
    {
        let mut root = Node::new("", "document").with_name("document");
        let lines: Vec<&str> = content.split('\n').collect();
        let re = marker_regex();

        let marker_indices: Vec<usize> = (0..lines.len()).filter(|&i| re.is_match(lines[i])).collect();

        let first_marker = marker_indices.first().copied().unwrap_or(lines.len());

        if first_marker > 0
        {
            let preamble_lines = &lines[0..first_marker];
            if preamble_lines.iter().any(|l| !l.trim().is_empty())
            {
                root.add_child(build_section(preamble_lines, "section", "preamble", 0));
            }
        }

        for (pos, &start) in marker_indices.iter().enumerate()
        {
            let end = marker_indices.get(pos + 1).copied().unwrap_or(lines.len());
            let id = re.captures(lines[start]).and_then(|c| c.get(1)).map(|m| m.as_str()).unwrap_or("?");
            let name = format!("[{id}]");
            root.add_child(build_section(&lines[start..end], "mindmap_node", &name, start));
        }

        root
    }

    fn rank(
        &self,
        node: &Node,
    ) -> f64
    {
        let cfg = load_config();
        match node.node_type.as_str()
        {
            "mindmap_node" => cfg.text.section_score * 1.5,
            "section" => cfg.text.section_score,
            "line" => cfg.text.line_score,
            _ => 0.5,
        }
    }
}

fn build_section(
    lines: &[&str],
    node_type: &str,
    name: &str,
    first_line_no: usize,
) -> Node
{
    let mut section = Node::new("", node_type).with_name(name);

    for (offset, line) in lines.iter().enumerate()
    {
        let n = first_line_no + offset + 1;
        section.add_child(Node::new(*line, "line").with_name(format!("L{n}")).with_source_line(n));
    }

    section
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn detects_three_or_more_markers()
    {
        let strategy = MindMapStrategy;
        assert!(strategy.detect("[1] a\n[2] b\n[3] c\n"));
        assert!(!strategy.detect("[1] a\n[2] b\n"));
    }

    #[test]
    fn preamble_collects_text_before_first_marker()
    {
        let strategy = MindMapStrategy;
        let root = strategy.parse("intro line\n[1] root\n  child text\n[2] second\n");

        assert_eq!(root.children[0].node_type, "section");
        assert_eq!(root.children[0].name.as_deref(), Some("preamble"));
        assert_eq!(root.children[1].node_type, "mindmap_node");
        assert_eq!(root.children[1].name.as_deref(), Some("[1]"));
        assert_eq!(root.children[1].children.len(), 2);
        assert_eq!(root.children[2].name.as_deref(), Some("[2]"));
    }

    #[test]
    fn no_preamble_when_content_starts_with_a_marker()
    {
        let strategy = MindMapStrategy;
        let root = strategy.parse("[1] root\n[2] second\n");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].node_type, "mindmap_node");
    }
}
