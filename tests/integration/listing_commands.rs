use offcat::error::ApiError;
use offcat::render::OutputFormat;
use offcat::tooling::cli::Commands;
use tempfile::TempDir;

use crate::integration::support::{context, index, ls, sample_source};

fn indexed() -> (TempDir, offcat::tooling::cli::CliContext) {
    let dir = TempDir::new().unwrap();
    let source = sample_source(&dir);
    let ctx = context(&dir);
    index(&ctx, &source);
    (dir, ctx)
}

#[test]
fn ls_without_path_lists_storages() {
    let (_dir, ctx) = indexed();
    assert_eq!(ctx.execute(&ls(None, false, false)).unwrap(), "storage src");
}

#[test]
fn ls_recursive_indents_by_depth() {
    let (_dir, ctx) = indexed();
    let output = ctx.execute(&ls(None, true, false)).unwrap();
    assert_eq!(
        output,
        "storage src\n  docs\n    notes.md\n    readme.txt\n  photos\n    img.jpg"
    );
}

#[test]
fn ls_path_without_storage_prefix() {
    let (_dir, ctx) = indexed();
    let output = ctx.execute(&ls(Some("docs"), false, false)).unwrap();
    assert_eq!(output, "docs\n  notes.md\n  readme.txt");
    let prefixed = ctx.execute(&ls(Some("src/docs"), false, false)).unwrap();
    assert_eq!(prefixed, output);
}

#[test]
fn ls_hidden_only_with_all() {
    let (_dir, ctx) = indexed();
    let hidden = ctx.execute(&ls(Some("src"), false, true)).unwrap();
    assert!(hidden.contains(".secret"));
    let visible = ctx.execute(&ls(Some("src"), false, false)).unwrap();
    assert!(!visible.contains(".secret"));
}

#[test]
fn ls_depth_limits_recursion() {
    let (_dir, ctx) = indexed();
    let output = ctx
        .execute(&Commands::Ls {
            path: None,
            recursive: true,
            all: false,
            format: OutputFormat::Native,
            raw_size: false,
            long: false,
            depth: 0,
        })
        .unwrap();
    assert_eq!(output, "storage src\n  docs\n  photos");
}

#[test]
fn ls_wildcard_path() {
    let (_dir, ctx) = indexed();
    let output = ctx.execute(&ls(Some("src/docs/*.md"), false, false)).unwrap();
    assert_eq!(output, "notes.md");
}

#[test]
fn ls_unknown_storage_is_not_found() {
    let (dir, ctx) = indexed();
    let other = dir.path().join("other");
    std::fs::create_dir_all(&other).unwrap();
    index(&ctx, &other);

    let err = ctx.execute(&ls(Some("nosuch/x"), false, false)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(err.to_string(), "no such start path: \"nosuch/x\"");
}

#[test]
fn ls_csv_with_header() {
    let (_dir, ctx) = indexed();
    let output = ctx
        .execute(&Commands::Ls {
            path: Some("docs".to_string()),
            recursive: false,
            all: false,
            format: OutputFormat::CsvWithHeader,
            raw_size: true,
            long: false,
            depth: -1,
        })
        .unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("name,type,path,size,"));
    assert!(lines[1].starts_with("docs,dir,docs,8,"));
    assert!(lines[3].starts_with("readme.txt,file,docs/readme.txt,5,"));
    assert!(lines[3].ends_with(",src"));
}

#[test]
fn ls_script_format() {
    let (_dir, ctx) = indexed();
    let output = ctx
        .execute(&Commands::Ls {
            path: Some("docs".to_string()),
            recursive: false,
            all: false,
            format: OutputFormat::Script,
            raw_size: false,
            long: false,
            depth: -1,
        })
        .unwrap();
    assert_eq!(
        output,
        "op=file; source=/media/mnt; ${op} \"${source}/docs\" \"${source}/docs/notes.md\" \"${source}/docs/readme.txt\""
    );
}

#[test]
fn ls_long_shows_attributes() {
    let (_dir, ctx) = indexed();
    let output = ctx
        .execute(&Commands::Ls {
            path: Some("docs/readme.txt".to_string()),
            recursive: false,
            all: false,
            format: OutputFormat::Native,
            raw_size: true,
            long: true,
            depth: -1,
        })
        .unwrap();
    assert!(output.starts_with("readme.txt"));
    assert!(output.contains(" file "));
    assert!(output.contains("     5"));
}

#[test]
fn tree_draws_connectors() {
    let (_dir, ctx) = indexed();
    let output = ctx
        .execute(&Commands::Tree {
            path: None,
            all: false,
            raw_size: false,
            long: false,
            depth: -1,
        })
        .unwrap();
    assert_eq!(
        output,
        "src\n├── docs\n│   ├── notes.md\n│   └── readme.txt\n└── photos\n    └── img.jpg"
    );
}

#[test]
fn find_substring_and_glob() {
    let (_dir, ctx) = indexed();
    let find = |patterns: &[&str]| Commands::Find {
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
        path: None,
        format: OutputFormat::Native,
        depth: -1,
    };

    let output = ctx.execute(&find(&["README"])).unwrap();
    assert_eq!(output.lines().count(), 1);
    assert!(output.starts_with("src/docs/readme.txt"));

    let output = ctx.execute(&find(&["*.MD"])).unwrap();
    assert!(output.starts_with("src/docs/notes.md"));

    let output = ctx.execute(&find(&["secret"])).unwrap();
    assert!(output.starts_with("src/.secret"));

    let output = ctx.execute(&find(&["nothing-like-this"])).unwrap();
    assert!(output.is_empty());
}

#[test]
fn find_rejects_tree_format() {
    let (_dir, ctx) = indexed();
    let err = ctx
        .execute(&Commands::Find {
            patterns: vec!["a".to_string()],
            path: None,
            format: OutputFormat::Tree,
            depth: -1,
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}

#[test]
fn du_lists_directories_then_start() {
    let (_dir, ctx) = indexed();
    let output = ctx
        .execute(&Commands::Du {
            path: None,
            raw_size: true,
            depth: -1,
            sort: false,
        })
        .unwrap();
    let rows: Vec<Vec<&str>> = output
        .lines()
        .map(|l| l.split_whitespace().collect())
        .collect();
    assert_eq!(
        rows,
        vec![
            vec!["8", "src/docs"],
            vec!["10", "src/photos"],
            vec!["19", "src"],
        ]
    );
}

#[test]
fn du_sorted_ascending() {
    let (dir, ctx) = indexed();
    std::fs::write(dir.path().join("src/docs/big.bin"), vec![0u8; 100]).unwrap();
    index(&ctx, &dir.path().join("src"));
    let output = ctx
        .execute(&Commands::Du {
            path: None,
            raw_size: true,
            depth: -1,
            sort: true,
        })
        .unwrap();
    let paths: Vec<&str> = output
        .lines()
        .filter_map(|l| l.split_whitespace().nth(1))
        .collect();
    assert_eq!(paths, vec!["src/photos", "src/docs", "src"]);
}
