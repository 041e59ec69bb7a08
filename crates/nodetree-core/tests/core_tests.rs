use nodetree_core::{
    DeleteMode, ManualClock, NodeId, NodeKind, NodeTree, TreeConfig, TreeError, TreeSnapshot,
    TreeStats,
};
use std::time::{Duration, UNIX_EPOCH};

struct Sample {
    tree: NodeTree<ManualClock>,
    root: NodeId,
    dir1: NodeId,
    file1: NodeId,
    dir2: NodeId,
    file2: NodeId,
}

/// root -> dir1 -> file1.txt, root -> dir2 -> file2.txt
fn sample() -> Sample {
    let mut tree = NodeTree::with_clock(TreeConfig::default(), ManualClock::at_unix(1_000));
    let root = tree.root();
    let dir1 = tree.create_directory("dir1", root).unwrap();
    let file1 = tree
        .create_file("file1.txt", dir1, b"Hello, World!".to_vec())
        .unwrap();
    let dir2 = tree.create_directory("dir2", root).unwrap();
    let file2 = tree
        .create_file("file2.txt", dir2, b"Another file content.".to_vec())
        .unwrap();

    Sample {
        tree,
        root,
        dir1,
        file1,
        dir2,
        file2,
    }
}

#[test]
fn test_root_invariants() {
    let mut tree = NodeTree::new();
    let root = tree.root();

    let node = tree.get(root).unwrap();
    assert!(node.is_dir());
    assert!(matches!(node.kind(), NodeKind::Directory { children } if children.is_empty()));
    assert_eq!(node.parent(), None);

    for options in [vec![], vec!["-f"], vec!["--force"]] {
        assert!(matches!(
            tree.delete(root, options),
            Err(TreeError::ActionNotAllowed { .. })
        ));
    }
    assert!(!tree.get(root).unwrap().is_deleted());
}

#[test]
fn test_creation_attaches() {
    let mut tree = NodeTree::new();
    let root = tree.root();
    let d = tree.create_directory("d", root).unwrap();

    assert_eq!(tree.children(root).unwrap(), &[d]);
    assert_eq!(tree.parent(d).unwrap(), Some(root));
}

#[test]
fn test_timestamps_come_from_clock() {
    let s = sample();
    let stamp = s.tree.get(s.file1).unwrap().timestamps();
    assert_eq!(stamp.created, UNIX_EPOCH + Duration::from_secs(1_000));
    assert_eq!(stamp.created, stamp.modified);
}

#[test]
fn test_soft_delete_is_non_destructive() {
    let mut s = sample();
    let before = s.tree.get(s.file1).unwrap().timestamps();
    s.tree.clock().advance(Duration::from_secs(1));

    assert_eq!(
        s.tree.delete(s.file1, ["--recursive"]).unwrap(),
        DeleteMode::Soft
    );

    let node = s.tree.get(s.file1).unwrap();
    assert!(node.is_deleted());
    assert!(node.timestamps().modified >= before.modified);
    assert_eq!(node.timestamps().created, before.created);
    assert!(s.tree.children(s.dir1).unwrap().contains(&s.file1));
    assert_eq!(s.tree.find(s.root, "dir1/file1.txt").unwrap(), s.file1);

    let mut seen = Vec::new();
    s.tree.walk(s.root, |n| seen.push(n.id())).unwrap();
    assert!(seen.contains(&s.file1));
}

#[test]
fn test_hard_delete_removes_from_tree() {
    let mut s = sample();

    assert_eq!(s.tree.delete(s.file2, ["--force"]).unwrap(), DeleteMode::Hard);

    assert!(!s.tree.children(s.dir2).unwrap().contains(&s.file2));
    assert!(matches!(
        s.tree.find(s.dir2, "file2.txt"),
        Err(TreeError::NotFound { .. })
    ));
    assert_eq!(s.tree.parent(s.file2).unwrap(), None);
}

#[test]
fn test_either_force_flag_hard_deletes() {
    // Hard delete needs only one of the force tokens.
    let mut s = sample();
    assert_eq!(s.tree.delete(s.file1, ["-f"]).unwrap(), DeleteMode::Hard);
    assert_eq!(s.tree.delete(s.file2, ["--force"]).unwrap(), DeleteMode::Hard);
    assert!(s.tree.children(s.dir1).unwrap().is_empty());
    assert!(s.tree.children(s.dir2).unwrap().is_empty());
}

#[test]
fn test_path_resolution_example() {
    let s = sample();

    let file1 = s.tree.find(s.root, "dir1/file1.txt").unwrap();
    assert_eq!(file1, s.file1);
    assert_eq!(s.tree.get(file1).unwrap().payload_len(), Some(13));

    let file2 = s.tree.find(s.dir2, "file2.txt").unwrap();
    assert_eq!(file2, s.file2);
    assert_eq!(s.tree.get(file2).unwrap().payload_len(), Some(21));

    assert!(matches!(
        s.tree.find(s.root, "dir1/nope.txt"),
        Err(TreeError::NotFound { .. })
    ));
    assert_eq!(s.tree.find(s.root, "").unwrap(), s.root);
    assert_eq!(s.tree.find(s.root, "/").unwrap(), s.root);
}

#[test]
fn test_double_slash_reaches_empty_named_directory() {
    let mut s = sample();
    let unnamed = s.tree.create_directory("", s.dir1).unwrap();
    let x = s.tree.create_file("x", unnamed, b"x".to_vec()).unwrap();

    assert_eq!(s.tree.find(s.root, "dir1//x").unwrap(), x);
    assert!(s.tree.find(s.root, "dir2//x").is_err());
}

#[test]
fn test_names_have_no_length_limit() {
    let mut s = sample();
    let long = "n".repeat(300);
    let file = s.tree.create_file(&long, s.root, b"p".to_vec()).unwrap();

    assert_eq!(s.tree.find(s.root, &long).unwrap(), file);
    assert!(matches!(
        s.tree.create_directory("a/b", s.root),
        Err(TreeError::InvalidName { .. })
    ));
}

#[test]
fn test_walk_order() {
    let mut s = sample();
    let sub = s.tree.create_directory("sub", s.dir1).unwrap();

    let mut order = Vec::new();
    s.tree.walk(s.root, |n| order.push(n.id())).unwrap();

    assert_eq!(order, vec![s.root, s.dir1, s.file1, sub, s.dir2, s.file2]);
}

#[test]
fn test_lookup_is_idempotent() {
    let s = sample();
    let before = TreeStats::collect(&s.tree, s.root).unwrap();

    let results: Vec<_> = (0..3)
        .map(|_| s.tree.find(s.root, "dir2/file2.txt").unwrap())
        .collect();

    assert!(results.iter().all(|&id| id == s.file2));
    assert_eq!(TreeStats::collect(&s.tree, s.root).unwrap(), before);
}

#[test]
fn test_detached_subtree_and_reclaim() {
    let mut s = sample();
    s.tree.delete_with(s.dir1, DeleteMode::Hard).unwrap();

    // Detached, not destroyed.
    assert_eq!(s.tree.find(s.dir1, "file1.txt").unwrap(), s.file1);
    assert!(!s.tree.is_attached(s.file1).unwrap());

    assert_eq!(s.tree.reclaim(), 2);
    assert!(matches!(
        s.tree.get(s.dir1),
        Err(TreeError::InvalidHandle { .. })
    ));
    assert!(matches!(
        s.tree.delete(s.dir1, ["-f"]),
        Err(TreeError::InvalidHandle { .. })
    ));
}

#[test]
fn test_snapshot_export() {
    let mut s = sample();
    s.tree.delete_with(s.file1, DeleteMode::Soft).unwrap();

    let snapshot = TreeSnapshot::capture(&s.tree, s.root).unwrap();
    let json = serde_json::to_string_pretty(&snapshot).unwrap();

    assert!(json.contains("\"file1.txt\""));
    assert_eq!(snapshot.stats.total_deleted, 1);
    assert!(snapshot.root.children[0].children[0].deleted);
}
