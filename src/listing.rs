//! `ls -l` style rendering of nodes.

use std::time::SystemTime;

use chrono::{DateTime, Local, SecondsFormat};
use nodetree_core::Node;

/// How payload sizes are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SizeStyle {
    /// `13 bytes`
    #[default]
    Bytes,
    /// `13 B`, `1.5 KiB`, ...
    Human,
}

/// Render one info line for a node.
///
/// Directories: `d <name> <created> <modified>`.
/// Files: `- <name> <created> <modified> <size>`.
pub fn format_info(node: &Node, style: SizeStyle) -> String {
    let stamps = node.timestamps();
    let mut line = format!(
        "{} {} {} {}",
        node.kind().marker(),
        node.name(),
        format_time(stamps.created),
        format_time(stamps.modified)
    );
    if let Some(len) = node.payload_len() {
        line.push(' ');
        line.push_str(&format_size(len, style));
    }
    line
}

/// RFC 3339 in local time, whole seconds.
pub fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time).to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Format a payload length.
pub fn format_size(bytes: u64, style: SizeStyle) -> String {
    match style {
        SizeStyle::Bytes => format!("{bytes} bytes"),
        SizeStyle::Human => humansize::format_size(bytes, humansize::BINARY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodetree_core::{ManualClock, NodeTree, TreeConfig};

    fn sample() -> NodeTree<ManualClock> {
        let clock = ManualClock::at_unix(1_700_000_000);
        let mut tree = NodeTree::with_clock(TreeConfig::default(), clock);
        let root = tree.root();
        let dir1 = tree.create_directory("dir1", root).unwrap();
        tree.create_file("file1.txt", dir1, "Hello, World!").unwrap();
        tree
    }

    #[test]
    fn test_format_directory() {
        let tree = sample();
        let line = format_info(tree.get(tree.root()).unwrap(), SizeStyle::Bytes);
        let parts: Vec<_> = line.split(' ').collect();

        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "d");
        assert_eq!(parts[1], "/");
        assert_eq!(parts[2], parts[3]);
    }

    #[test]
    fn test_format_file() {
        let tree = sample();
        let file = tree.find(tree.root(), "dir1/file1.txt").unwrap();
        let line = format_info(tree.get(file).unwrap(), SizeStyle::Bytes);

        assert!(line.starts_with("- file1.txt "));
        assert!(line.ends_with(" 13 bytes"));

        let human = format_info(tree.get(file).unwrap(), SizeStyle::Human);
        assert!(human.ends_with(" 13 B"));
    }

    #[test]
    fn test_format_time_is_rfc3339() {
        let time = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000);
        let text = format_time(time);
        let parsed = DateTime::parse_from_rfc3339(&text).unwrap();
        assert_eq!(parsed.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(21, SizeStyle::Bytes), "21 bytes");
        assert_eq!(format_size(2048, SizeStyle::Human), "2 KiB");
    }
}
