use offcat::config::OffcatConfig;
use offcat::tooling::cli::{CliContext, Commands};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Context writing its catalog inside `dir`, colors off
pub fn context(dir: &TempDir) -> CliContext {
    let mut config = OffcatConfig::default();
    config.catalog.path = dir.path().join("test.catalog");
    config.output.color = false;
    CliContext::from_config(config)
}

/// `src/` with two directories, four regular files (19 bytes) and a hidden file
pub fn sample_source(dir: &TempDir) -> PathBuf {
    let root = dir.path().join("src");
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::create_dir_all(root.join("photos")).unwrap();
    fs::write(root.join("docs/readme.txt"), "hello").unwrap();
    fs::write(root.join("docs/notes.md"), "# n").unwrap();
    fs::write(root.join("photos/img.jpg"), "0123456789").unwrap();
    fs::write(root.join(".secret"), "s").unwrap();
    root
}

pub fn write_zip(path: &Path, members: &[(&str, &[u8])]) {
    let file = fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in members {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

pub fn index_command(path: &Path, archive: bool) -> Commands {
    Commands::Index {
        path: path.to_path_buf(),
        name: None,
        tags: Vec::new(),
        meta: None,
        checksum: false,
        archive,
        ignore: Vec::new(),
        no_mime: false,
        force: true,
    }
}

/// Index `path` as a forced update and return the command output
pub fn index(ctx: &CliContext, path: &Path) -> String {
    ctx.execute(&index_command(path, false)).unwrap()
}

pub fn ls(path: Option<&str>, recursive: bool, all: bool) -> Commands {
    Commands::Ls {
        path: path.map(str::to_string),
        recursive,
        all,
        format: offcat::render::OutputFormat::Native,
        raw_size: false,
        long: false,
        depth: -1,
    }
}
