use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::*;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn count(root: &Path, rules: &ExclusionRules) -> RepositoryCount {
    TreeCounter::new(CommentPolicy::Generic)
        .count_tree(root, rules)
        .unwrap()
}

fn assert_extension_sum(result: &RepositoryCount) {
    assert_eq!(result.by_extension.values().sum::<u64>(), result.total_code);
}

#[test]
fn empty_tree_is_zero() {
    let dir = TempDir::new().unwrap();
    let result = count(dir.path(), &ExclusionRules::defaults());
    assert_eq!(result, RepositoryCount::default());
}

#[test]
fn single_python_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "main.py", "# comment\n\ncode_line\n");

    let result = count(dir.path(), &ExclusionRules::defaults());
    assert_eq!(result.total_code, 1);
    assert_eq!(result.total_comments, 1);
    assert_eq!(result.total_blanks, 1);
    assert_eq!(result.by_extension.len(), 1);
    assert_eq!(result.by_extension[".py"], 1);
    assert_eq!(result.files, 1);
}

#[test]
fn files_under_excluded_directory_are_ignored() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "node_modules/lib/index.js", "a\nb\nc\n");

    let result = count(dir.path(), &ExclusionRules::defaults());
    assert_eq!(result.total_code, 0);
    assert_eq!(result.total_comments, 0);
    assert_eq!(result.total_blanks, 0);
    assert!(result.by_extension.is_empty());
}

#[test]
fn lines_are_grouped_by_extension() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "app.js", "let a;\nlet b;\nlet c;\n");
    write(dir.path(), "style.css", "body {}\np {}\n");

    let result = count(dir.path(), &ExclusionRules::defaults());
    assert_eq!(result.by_extension[".js"], 3);
    assert_eq!(result.by_extension[".css"], 2);
    assert_eq!(result.by_extension.len(), 2);
    assert_eq!(result.total_code, 5);
}

#[test]
fn extensionless_files_keep_the_sum_invariant() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "Makefile", "all:\n\tcc main.c\n");
    write(dir.path(), "main.c", "int main() { return 0; }\n");

    let result = count(dir.path(), &ExclusionRules::defaults());
    assert_eq!(result.by_extension[""], 2);
    assert_extension_sum(&result);
}

#[test]
fn counting_is_idempotent() {
    let dir = TempDir::new().unwrap();
    for i in 0..40 {
        write(
            dir.path(),
            &format!("pkg{}/mod{i}.rs", i % 4),
            &"// doc\nfn f() {}\n\n".repeat(i + 1),
        );
    }
    let rules = ExclusionRules::defaults();

    let first = count(dir.path(), &rules);
    let second = count(dir.path(), &rules);
    assert_eq!(first, second);
    assert_extension_sum(&first);
    assert_eq!(first.files, 40);
}

#[test]
fn dedicated_pool_matches_global_pool() {
    let dir = TempDir::new().unwrap();
    for i in 0..25 {
        write(dir.path(), &format!("f{i}.go"), "package x\n// c\n\n");
    }
    let rules = ExclusionRules::defaults();

    let global = count(dir.path(), &rules);
    let pooled = TreeCounter::new(CommentPolicy::Generic)
        .with_workers(2)
        .unwrap()
        .count_tree(dir.path(), &rules)
        .unwrap();
    assert_eq!(global, pooled);
}

#[test]
fn zero_workers_is_rejected() {
    let err = TreeCounter::new(CommentPolicy::Generic)
        .with_workers(0)
        .err()
        .unwrap();
    assert!(matches!(err, RepoLocError::Config(_)));
}

#[test]
fn unreadable_file_contributes_zero() {
    let counter = TreeCounter::new(CommentPolicy::Generic);
    let item = WorkItem {
        path: PathBuf::from("/nonexistent/repo-loc/missing.rs"),
        extension: ".rs".to_string(),
    };
    assert_eq!(
        counter.classify(&item),
        FileClassification::empty(".rs".to_string())
    );
}

#[test]
fn unreadable_file_does_not_abort_batch() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "ok.rs", "fn ok() {}\n");
    let items = vec![
        WorkItem {
            path: dir.path().join("ok.rs"),
            extension: ".rs".to_string(),
        },
        WorkItem {
            path: dir.path().join("gone.rs"),
            extension: ".rs".to_string(),
        },
    ];

    let result = TreeCounter::new(CommentPolicy::Generic).count_files(&items);
    assert_eq!(result.total_code, 1);
    assert_eq!(result.files, 2);
}

#[test]
fn cancelled_count_fails() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "main.rs", "fn main() {}\n");
    let cancel = CancelFlag::new();
    cancel.cancel();

    let err = TreeCounter::new(CommentPolicy::Generic)
        .with_cancel(cancel)
        .count_tree(dir.path(), &ExclusionRules::defaults())
        .unwrap_err();
    assert!(matches!(err, RepoLocError::Cancelled));
}

#[test]
fn merge_is_order_independent() {
    let a = RepositoryCount::default().absorb(FileClassification {
        code: 3,
        comment: 1,
        blank: 0,
        extension: ".js".to_string(),
    });
    let b = RepositoryCount::default().absorb(FileClassification {
        code: 2,
        comment: 0,
        blank: 4,
        extension: ".css".to_string(),
    });

    assert_eq!(a.clone().merge(b.clone()), b.merge(a));
}

#[test]
fn directory_census_is_reported() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/a.rs", "a\n");
    write(dir.path(), "tests/src/b.rs", "b\n");

    let result = count(dir.path(), &ExclusionRules::defaults());
    assert_eq!(result.directories.get("src"), Some(&2));
    assert_eq!(result.directories.get("tests"), Some(&1));
}
