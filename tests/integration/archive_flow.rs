use offcat::render::OutputFormat;
use offcat::tooling::cli::Commands;
use offcat::tree::node::FileKind;
use tempfile::TempDir;

use crate::integration::support::{context, index_command, ls, sample_source, write_zip};

fn indexed_with_archive(archive: bool) -> (TempDir, offcat::tooling::cli::CliContext) {
    let dir = TempDir::new().unwrap();
    let source = sample_source(&dir);
    write_zip(
        &source.join("bundle.zip"),
        &[("a.txt", b"abc"), ("sub/b.txt", b"bb")],
    );
    let ctx = context(&dir);
    let output = ctx.execute(&index_command(&source, archive)).unwrap();
    if archive {
        assert!(output.contains("  Archived: 2"));
    }
    (dir, ctx)
}

#[test]
fn archive_members_are_listed_flat() {
    let (_dir, ctx) = indexed_with_archive(true);
    let output = ctx.execute(&ls(Some("bundle.zip"), false, false)).unwrap();
    assert_eq!(output, "bundle.zip\n  a.txt\n  sub/b.txt");

    let tree = ctx.catalog().load().unwrap();
    let bundle = tree.storages[0].child("bundle.zip").unwrap();
    assert_eq!(bundle.kind, FileKind::Archive);
    assert_eq!(bundle.size, 5);
    assert!(bundle.children.iter().all(|c| c.kind == FileKind::Archived));
}

#[test]
fn archived_entry_resolves_by_in_archive_path() {
    let (_dir, ctx) = indexed_with_archive(true);
    let output = ctx
        .execute(&ls(Some("src/bundle.zip/sub/b.txt"), false, false))
        .unwrap();
    assert_eq!(output, "sub/b.txt");

    let found = ctx
        .execute(&Commands::Find {
            patterns: vec!["b.txt".to_string()],
            path: None,
            format: OutputFormat::Native,
            depth: -1,
        })
        .unwrap();
    assert!(found.starts_with("src/bundle.zip/sub/b.txt"));
}

#[test]
fn archive_stays_file_without_expansion() {
    let (_dir, ctx) = indexed_with_archive(false);
    let tree = ctx.catalog().load().unwrap();
    let bundle = tree.storages[0].child("bundle.zip").unwrap();
    assert_eq!(bundle.kind, FileKind::File);
    assert!(bundle.children.is_empty());
}

#[test]
fn reindex_without_archives_reverts_container() {
    let (dir, ctx) = indexed_with_archive(true);
    let output = ctx
        .execute(&index_command(&dir.path().join("src"), false))
        .unwrap();
    assert!(output.contains("  Pruned: 2"));

    let tree = ctx.catalog().load().unwrap();
    let bundle = tree.storages[0].child("bundle.zip").unwrap();
    assert_eq!(bundle.kind, FileKind::File);
    assert!(bundle.children.is_empty());
}

#[test]
fn create_projects_archive_as_directory() {
    let (dir, ctx) = indexed_with_archive(true);
    let dest = dir.path().join("out");
    let output = ctx
        .execute(&Commands::Create {
            local_path: dest.clone(),
            path: None,
        })
        .unwrap();
    assert!(output.starts_with("Created "));
    let root = dest.join("src");
    assert!(root.join("docs/readme.txt").is_file());
    assert_eq!(std::fs::metadata(root.join("docs/readme.txt")).unwrap().len(), 0);
    assert!(root.join("bundle.zip").is_dir());
    assert!(root.join("bundle.zip/sub/b.txt").is_file());
    assert!(root.join(".secret").is_file());
}

#[test]
fn create_keeps_hostile_members_inside_destination() {
    let dir = TempDir::new().unwrap();
    let source = sample_source(&dir);
    let absolute = dir.path().join("absolute_target.txt");
    let absolute_name = absolute.to_string_lossy().into_owned();
    write_zip(
        &source.join("evil.zip"),
        &[("../../../escaped.txt", b"e"), (absolute_name.as_str(), b"a")],
    );
    let ctx = context(&dir);
    ctx.execute(&index_command(&source, true)).unwrap();

    let dest = dir.path().join("out").join("dest");
    ctx.execute(&Commands::Create {
        local_path: dest.clone(),
        path: None,
    })
    .unwrap();

    assert!(!dir.path().join("out/escaped.txt").exists());
    assert!(!dir.path().join("escaped.txt").exists());
    assert!(!absolute.exists());
    let evil = dest.join("src/evil.zip");
    assert!(evil.join("escaped.txt").is_file());
    let relative = absolute_name.trim_start_matches('/');
    assert!(evil.join(relative).is_file());
}

#[test]
fn dot_prefixed_tar_members_resolve() {
    let dir = TempDir::new().unwrap();
    let source = sample_source(&dir);
    let mut builder = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_gnu();
    header.as_old_mut().name[..7].copy_from_slice(b"./x.txt");
    header.set_size(3);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append(&header, &b"xyz"[..]).unwrap();
    std::fs::write(source.join("a.tar"), builder.into_inner().unwrap()).unwrap();

    let ctx = context(&dir);
    ctx.execute(&index_command(&source, true)).unwrap();
    let output = ctx.execute(&ls(Some("src/a.tar/x.txt"), false, false)).unwrap();
    assert_eq!(output, "x.txt");
}
