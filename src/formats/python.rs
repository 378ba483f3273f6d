//! Filepath: src/formats/python.rs
//! Python AST format strategy (§4.4.1 item 3), backed by tree-sitter
//! since there is no stdlib Python AST module to lean on from Rust.

use tree_sitter::{Language, Node as TsNode, Parser};

use crate::dom::Node;
use crate::formats::registry::FormatStrategy;
use crate::infra::pydoc::PyDocUtils;

const DOCSTRING_LIMIT: usize = 200;

pub struct PythonStrategy
{
    language: Language,
}

impl PythonStrategy
{
    pub fn new() -> anyhow::Result<Self>
    {
        Ok(Self { language: tree_sitter_python::LANGUAGE.into() })
    }
}

impl FormatStrategy for PythonStrategy
{
    fn name(&self) -> &'static str
    {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str]
    {
        &[".py", ".pyw"]
    }

    fn parse(
        &self,
        content: &str,
    ) -> Node
    {
        let mut root = Node::new("", "module").with_name("module");

        if content.trim().is_empty()
        {
            return root;
        }

        let mut parser = Parser::new();
        let parsed_tree = parser.set_language(&self.language).ok().and_then(|()| parser.parse(content, None));

        let Some(tree) = parsed_tree
        else
        {
            root.add_child(Node::new(content, "text").with_name("unparseable"));
            return root;
        };

        let bytes = content.as_bytes();
        let mut children: Vec<Node> = Vec::new();
        let mut import_count = 0usize;
        let mut first_import_line: Option<usize> = None;
        let mut last_import_line: Option<usize> = None;

        let mut cursor = tree.root_node().walk();
        for child in tree.root_node().named_children(&mut cursor)
        {
            match child.kind()
            {
                "import_statement" | "import_from_statement" =>
                {
                    import_count += 1;
                    let start = child.start_position().row + 1;
                    let end = child.end_position().row + 1;
                    first_import_line.get_or_insert(start);
                    last_import_line = Some(end);
                }
                "class_definition" =>
                {
                    children.push(convert_class(child, bytes));
                }
                "function_definition" | "decorated_definition" =>
                {
                    if let Some(def) = innermost_definition(child)
                    {
                        match def.kind()
                        {
                            "class_definition" => children.push(convert_class(child, bytes)),
                            "function_definition" => children.push(convert_function(child, def, bytes, false)),
                            _ => {}
                        }
                    }
                }
                "expression_statement" =>
                {
                    if let Some(node) = convert_assignment(child, bytes)
                    {
                        children.push(node);
                    }
                }
                _ => {}
            }
        }

        if import_count > 0
        {
            let summary = match (first_import_line, last_import_line)
            {
                (Some(f), Some(l)) => format!("[{import_count} imports, lines {f}-{l}]"),
                _ => format!("[{import_count} imports]"),
            };
            children.insert(0, Node::new(summary, "import_summary").with_name("imports"));
        }

        for child in children
        {
            root.add_child(child);
        }

        root
    }

    fn rank(
        &self,
        node: &Node,
    ) -> f64
    {
        match node.node_type.as_str()
        {
            "class" => 0.9,
            "function" => 0.8,
            "method" => 0.7,
            "constant" => 0.6,
            "import" => 0.5,
            "import_summary" => 0.4,
            "annotation" => 0.5,
            "body" => 0.4,
            "text" => 0.3,
            _ => 0.5,
        }
    }

    fn render(
        &self,
        node: &Node,
        budget: i64,
    ) -> Option<String>
    {
        if budget <= 0
        {
            return None;
        }

        let budget = budget as usize;
        let content_len = node.content.chars().count();
        if content_len <= budget
        {
            return Some(node.content.clone());
        }

        if matches!(node.node_type.as_str(), "function" | "method" | "class" | "constant" | "annotation")
        {
            if let Some(name) = &node.name
            {
                let name_len = name.chars().count();
                if name_len <= budget
                {
                    return Some(name.clone());
                }
                if budget >= 4
                {
                    let head: String = name.chars().take(budget - 3).collect();
                    return Some(format!("{head}..."));
                }
                return None;
            }
        }

        if node.node_type == "import_summary"
        {
            if budget >= 10
            {
                let head: String = node.content.chars().take(budget - 3).collect();
                return Some(format!("{head}..."));
            }
            return None;
        }

        if budget >= 10
        {
            let head: String = node.content.chars().take(budget - 3).collect();
            return Some(format!("{head}..."));
        }

        None
    }
}

fn innermost_definition(node: TsNode) -> Option<TsNode>
{
    if node.kind() != "decorated_definition"
    {
        return Some(node);
    }

    let mut cursor = node.walk();
    node.named_children(&mut cursor).find(|c| c.kind() == "class_definition" || c.kind() == "function_definition")
}

fn text_of<'a>(
    node: TsNode,
    bytes: &'a [u8],
) -> &'a str
{
    node.utf8_text(bytes).unwrap_or("")
}

fn decorators_of(
    node: TsNode,
    bytes: &[u8],
) -> Vec<String>
{
    let mut out = Vec::new();

    if node.kind() != "decorated_definition"
    {
        return out;
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor)
    {
        if child.kind() == "decorator"
        {
            out.push(text_of(child, bytes).to_string());
        }
    }

    out
}

fn has_async_keyword(node: TsNode) -> bool
{
    let mut cursor = node.walk();
    for child in node.children(&mut cursor)
    {
        match child.kind()
        {
            "async" => return true,
            "def" => return false,
            _ => {}
        }
    }
    false
}

fn convert_class(
    outer: TsNode,
    bytes: &[u8],
) -> Node
{
    let Some(class_node) = innermost_definition(outer)
    else
    {
        return Node::new("", "class");
    };

    let mut parts = decorators_of(outer, bytes);

    let name = class_node.child_by_field_name("name").map(|n| text_of(n, bytes).to_string()).unwrap_or_default();
    let bases = class_node.child_by_field_name("superclasses").map(|n| text_of(n, bytes).to_string());

    parts.push(match &bases
    {
        Some(b) => format!("class {name}{b}:"),
        None => format!("class {name}:"),
    });

    if let Some(doc) = PyDocUtils::docstring_for(class_node, bytes)
    {
        let doc = if doc.chars().count() > DOCSTRING_LIMIT
        {
            format!("{}...", doc.chars().take(DOCSTRING_LIMIT).collect::<String>())
        }
        else
        {
            doc
        };
        parts.push(format!("    \"\"\"{doc}\"\"\""));
    }

    let content = parts.join("\n");
    let start_line = outer.start_position().row + 1;
    let mut node = Node::new(content, "class").with_name(name).with_source_line(start_line);

    if let Some(body) = class_node.child_by_field_name("body")
    {
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor)
        {
            match child.kind()
            {
                "function_definition" => node.add_child(convert_function(child, child, bytes, true)),
                "decorated_definition" =>
                {
                    if let Some(inner) = innermost_definition(child)
                    {
                        if inner.kind() == "function_definition"
                        {
                            node.add_child(convert_function(child, inner, bytes, true));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    node
}

fn convert_function(
    outer: TsNode,
    def: TsNode,
    bytes: &[u8],
    is_method: bool,
) -> Node
{
    let mut parts = decorators_of(outer, bytes);

    let async_prefix = if has_async_keyword(def) { "async " } else { "" };
    let name = def.child_by_field_name("name").map(|n| text_of(n, bytes).to_string()).unwrap_or_default();
    let params = def.child_by_field_name("parameters").map(|n| text_of(n, bytes).to_string()).unwrap_or_else(|| "()".to_string());
    let returns = def.child_by_field_name("return_type").map(|n| format!(" -> {}", text_of(n, bytes))).unwrap_or_default();

    parts.push(format!("{async_prefix}def {name}{params}{returns}:"));

    let content = parts.join("\n");
    let start_line = outer.start_position().row + 1;
    let node_type = if is_method { "method" } else { "function" };
    Node::new(content, node_type).with_name(name).with_source_line(start_line)
}

fn convert_assignment(
    stmt: TsNode,
    bytes: &[u8],
) -> Option<Node>
{
    let inner = stmt.named_child(0)?;
    if inner.kind() != "assignment"
    {
        return None;
    }

    let left = inner.child_by_field_name("left")?;
    if left.kind() != "identifier"
    {
        return None;
    }

    let name = text_of(left, bytes).to_string();
    let content = text_of(stmt, bytes).to_string();
    let start_line = stmt.start_position().row + 1;

    if inner.child_by_field_name("type").is_some()
    {
        return Some(Node::new(content, "annotation").with_name(name).with_source_line(start_line));
    }

    let is_constant_name = !name.is_empty() && name.chars().any(char::is_alphabetic) && name.chars().all(|c| c.is_uppercase() || c == '_' || c.is_numeric());

    if is_constant_name
    {
        return Some(Node::new(content, "constant").with_name(name).with_source_line(start_line));
    }

    None
}
