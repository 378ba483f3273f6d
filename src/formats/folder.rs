//! Filepath: src/formats/folder.rs
//! Folder walker (§4.4.1 item 1). Invoked directly against the
//! filesystem by path when the CLI input is a directory, rather than
//! through the registry's content-based resolution.

use std::path::Path;

use crate::dom::Node;
use crate::formats::registry::FormatStrategy;

const SKIP_DIRS: &[&str] = &[
    ".git", ".hg", ".svn", "node_modules", "__pycache__", ".venv", "venv", "env", "target", "build", "dist",
    ".tox", ".mypy_cache", ".pytest_cache", ".idea", ".vscode", "site-packages", ".cargo", ".next", ".cache",
];

const BINARY_EXTS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".ico", ".svg", ".webp", ".zip", ".tar", ".gz", ".bz2", ".xz",
    ".7z", ".so", ".dylib", ".dll", ".exe", ".bin", ".pyc", ".class", ".o", ".a", ".woff", ".woff2", ".ttf",
    ".eot", ".pdf", ".mp3", ".mp4", ".mov", ".avi", ".wasm", ".lock", ".db", ".sqlite",
];

const PREVIEW_MAX_BYTES: usize = 10 * 1024;
const PREVIEW_MAX_CHARS: usize = 200;

pub struct FolderStrategy;

impl FolderStrategy
{
    /// Walk `path` (a directory) into a DOM tree. Directories are listed
    /// before files, both alphabetically; symlinks are skipped.
    pub fn parse_directory(path: &Path) -> std::io::Result<Node>
    {
        build_dir_node(path, 0)
    }
}

fn build_dir_node(
    path: &Path,
    depth: usize,
) -> std::io::Result<Node>
{
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| path.to_string_lossy().into_owned());

    let indent = "  ".repeat(depth);
    let mut node = Node::new(format!("{indent}{name}/"), "directory").with_name(qualify(path));

    let mut entries: Vec<std::fs::DirEntry> = std::fs::read_dir(path)?.filter_map(Result::ok).collect();

    entries.sort_by(|a, b| {
        let a_dir = a.path().is_dir();
        let b_dir = b.path().is_dir();
        match (a_dir, b_dir)
        {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.file_name().cmp(&b.file_name()),
        }
    });

    for entry in entries
    {
        let entry_path = entry.path();

        let Ok(meta) = std::fs::symlink_metadata(&entry_path)
        else
        {
            continue;
        };

        if meta.file_type().is_symlink()
        {
            continue;
        }

        if meta.is_dir()
        {
            let dir_name = entry.file_name().to_string_lossy().into_owned();
            if SKIP_DIRS.contains(&dir_name.as_str())
            {
                continue;
            }
            node.add_child(build_dir_node(&entry_path, depth + 1)?);
        }
        else if meta.is_file()
        {
            node.add_child(build_file_node(&entry_path, &entry.file_name().to_string_lossy(), meta.len()));
        }
    }

    Ok(node)
}

fn build_file_node(
    path: &Path,
    name: &str,
    size: u64,
) -> Node
{
    let qualified = qualify(path);
    let size_label = format_size(size);

    if is_binary_ext(name) || size == 0
    {
        return Node::new(format!("{name} [{size_label}]"), "file").with_name(qualified).atomic();
    }

    let content = match read_preview(path)
    {
        Some(preview) if !preview.is_empty() => format!("{name} - {preview} [{size_label}]"),
        _ => format!("{name} [{size_label}]"),
    };

    Node::new(content, "file").with_name(qualified).atomic()
}

fn read_preview(path: &Path) -> Option<String>
{
    use std::io::Read;

    let mut file = std::fs::File::open(path).ok()?;
    let mut buf = vec![0u8; PREVIEW_MAX_BYTES];
    let n = file.read(&mut buf).ok()?;
    buf.truncate(n);

    let text = match String::from_utf8(buf.clone())
    {
        Ok(s) => s,
        Err(_) => buf.iter().map(|&b| b as char).collect(),
    };

    let collapsed: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    Some(collapsed.chars().take(PREVIEW_MAX_CHARS).collect())
}

fn is_binary_ext(name: &str) -> bool
{
    let lower = name.to_lowercase();
    BINARY_EXTS.iter().any(|ext| lower.ends_with(ext))
}

fn format_size(bytes: u64) -> String
{
    if bytes < 1024
    {
        format!("{bytes}B")
    }
    else if bytes < 1024 * 1024
    {
        format!("{:.1}KB", bytes as f64 / 1024.0)
    }
    else
    {
        format!("{:.1}MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn qualify(path: &Path) -> String
{
    path.to_string_lossy().into_owned()
}

impl FormatStrategy for FolderStrategy
{
    fn name(&self) -> &'static str
    {
        "folder"
    }

    /// Folders are parsed by path via [`FolderStrategy::parse_directory`];
    /// this degrades stray content-based calls to a single text child.
    fn parse(
        &self,
        content: &str,
    ) -> Node
    {
        let mut root = Node::new("", "directory").with_name("directory");
        root.add_child(Node::new(content, "text").with_name("unexpected_content"));
        root
    }

    fn rank(
        &self,
        node: &Node,
    ) -> f64
    {
        match node.node_type.as_str()
        {
            "directory" => 0.8,
            "file" => 0.5,
            _ => 0.5,
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use std::io::Write;

    #[test]
    fn binary_extension_skips_preview()
    {
        let dir = std::env::temp_dir().join(format!("folder-test-bin-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file_path = dir.join("image.png");
        std::fs::write(&file_path, b"not really png bytes").unwrap();

        let node = build_file_node(&file_path, "image.png", 21);
        assert!(!node.content.contains(" - "));
        assert!(node.atomic);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn text_file_gets_collapsed_preview()
    {
        let dir = std::env::temp_dir().join(format!("folder-test-txt-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file_path = dir.join("notes.txt");
        let mut f = std::fs::File::create(&file_path).unwrap();
        writeln!(f, "hello\n\n   world").unwrap();
        drop(f);

        let node = build_file_node(&file_path, "notes.txt", 15);
        assert!(node.content.contains("hello world"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn directory_walk_lists_dirs_before_files_alphabetically()
    {
        let dir = std::env::temp_dir().join(format!("folder-test-walk-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("zeta")).unwrap();
        std::fs::write(dir.join("alpha.txt"), b"x").unwrap();
        std::fs::create_dir_all(dir.join(".git")).unwrap();

        let node = FolderStrategy::parse_directory(&dir).unwrap();
        let types: Vec<&str> = node.children.iter().map(|c| c.node_type.as_str()).collect();
        assert_eq!(types, vec!["directory", "file"]);
        assert_eq!(node.children.len(), 2);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn empty_file_gets_no_preview()
    {
        let dir = std::env::temp_dir().join(format!("folder-test-empty-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file_path = dir.join("empty.txt");
        std::fs::write(&file_path, b"").unwrap();

        let node = build_file_node(&file_path, "empty.txt", 0);
        assert_eq!(node.content, "empty.txt [0B]");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
