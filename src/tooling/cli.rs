//! CLI Tooling
//!
//! Command-line interface for every catalog operation. Each command loads the
//! catalog file, works on that `CatalogTree` value and saves it back when it
//! changed something.

use crate::config::{ConfigLoader, OffcatConfig};
use crate::error::ApiError;
use crate::render::{self, du, table, OutputFormat, PrintMode};
use crate::store::Catalog;
use crate::tooling::listing::{self, NameMatcher};
use crate::tree::catalog::CatalogTree;
use crate::tree::storage::StorageNode;
use crate::tree::traverse::max_depth_from_flag;
use crate::tree::walker::{Walker, WalkerConfig};
use crate::units;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Offcat CLI - catalog of offline storages
#[derive(Parser, Debug)]
#[command(name = "offcat")]
#[command(version)]
#[command(about = "Index filesystem hierarchies and archive contents into a browsable catalog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Catalog file (overrides the configured path)
    #[arg(short, long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Configuration file path (layered over the global config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Force debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index a directory as a storage
    Index {
        /// Directory to index
        path: PathBuf,
        /// Storage name (defaults to the directory name)
        name: Option<String>,
        /// Tag to attach (repeatable)
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,
        /// Free-text storage description
        #[arg(short, long)]
        meta: Option<String>,
        /// Compute file checksums
        #[arg(short = 'C', long)]
        checksum: bool,
        /// List archive contents
        #[arg(short, long)]
        archive: bool,
        /// Glob of paths to skip (repeatable)
        #[arg(short, long)]
        ignore: Vec<String>,
        /// Skip MIME detection
        #[arg(short = 'M', long)]
        no_mime: bool,
        /// Update an existing storage without asking
        #[arg(short, long)]
        force: bool,
    },
    /// List the catalog
    Ls {
        /// Start path (`storage/dir/...`, wildcards allowed)
        path: Option<String>,
        #[arg(short, long)]
        recursive: bool,
        /// Include hidden entries
        #[arg(short, long)]
        all: bool,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Native)]
        format: OutputFormat,
        /// Print sizes in bytes
        #[arg(short = 'S', long)]
        raw_size: bool,
        /// Show attributes
        #[arg(short, long)]
        long: bool,
        /// Maximum depth when recursive (negative for unlimited)
        #[arg(short = 'D', long, default_value_t = -1, allow_negative_numbers = true)]
        depth: i64,
    },
    /// Find entries by name
    Find {
        /// Substring, or glob when it holds `*`, `?` or `[`
        patterns: Vec<String>,
        /// Start path
        #[arg(short, long)]
        path: Option<String>,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Native)]
        format: OutputFormat,
        #[arg(short = 'D', long, default_value_t = -1, allow_negative_numbers = true)]
        depth: i64,
    },
    /// Print the catalog as a tree
    Tree {
        path: Option<String>,
        #[arg(short, long)]
        all: bool,
        #[arg(short = 'S', long)]
        raw_size: bool,
        #[arg(short, long)]
        long: bool,
        #[arg(short = 'D', long, default_value_t = -1, allow_negative_numbers = true)]
        depth: i64,
    },
    /// Disk usage of directories
    Du {
        path: Option<String>,
        #[arg(short = 'S', long)]
        raw_size: bool,
        #[arg(short = 'D', long, default_value_t = -1, allow_negative_numbers = true)]
        depth: i64,
        /// Sort by ascending size
        #[arg(short, long)]
        sort: bool,
    },
    /// Manage storages
    Storage {
        #[command(subcommand)]
        command: StorageCommands,
    },
    /// Recreate the hierarchy locally with empty files
    Create {
        /// Destination directory
        local_path: PathBuf,
        /// Start path inside the catalog
        #[arg(short, long)]
        path: Option<String>,
    },
    /// Show catalog information
    Info {
        /// Set the catalog note
        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum StorageCommands {
    /// List storages
    List {
        #[arg(short = 'S', long)]
        raw_size: bool,
    },
    /// Remove a storage and everything under it
    Rm {
        name: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Set the storage description
    Meta { name: String, meta: String },
    /// Add a tag
    Tag { name: String, tag: String },
    /// Remove a tag
    Untag { name: String, tag: String },
}

/// Options of an `ls`-style listing
struct ListRequest<'a> {
    path: Option<&'a str>,
    recursive: bool,
    all: bool,
    format: OutputFormat,
    raw_size: bool,
    long: bool,
    depth: i64,
}

/// CLI context for executing commands
pub struct CliContext {
    config: OffcatConfig,
    catalog: Catalog,
}

impl CliContext {
    /// Create a new CLI context from layered configuration plus flag overrides
    pub fn new(
        catalog: Option<PathBuf>,
        config_path: Option<PathBuf>,
        no_color: bool,
    ) -> Result<Self, ApiError> {
        let mut config = ConfigLoader::load(config_path.as_deref())?;
        if let Some(path) = catalog {
            config.catalog.path = path;
        }
        if no_color || std::env::var_os("NO_COLOR").is_some() {
            config.output.color = false;
        }
        Ok(Self::from_config(config))
    }

    /// Create a context from an already resolved configuration
    pub fn from_config(config: OffcatConfig) -> Self {
        let catalog = Catalog::new(&config.catalog.path, config.catalog.pretty);
        Self { config, catalog }
    }

    pub fn config(&self) -> &OffcatConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Execute a command and return its printable output
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        debug!(command = command_name(command), catalog = %self.catalog.path().display(), "Executing command");
        let result = self.execute_inner(command);
        debug!(
            command = command_name(command),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result.map(|out| out.trim_end_matches('\n').to_string())
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Index {
                path,
                name,
                tags,
                meta,
                checksum,
                archive,
                ignore,
                no_mime,
                force,
            } => {
                let walker_config = WalkerConfig {
                    checksum: *checksum || self.config.index.checksum,
                    mime: !*no_mime && self.config.index.mime,
                    archives: *archive || self.config.index.archives,
                    ignore_patterns: self
                        .config
                        .index
                        .ignore
                        .iter()
                        .chain(ignore.iter())
                        .cloned()
                        .collect(),
                    follow_symlinks: self.config.index.follow_symlinks,
                };
                self.handle_index(path, name.as_deref(), tags, meta.as_deref(), walker_config, *force)
            }
            Commands::Ls {
                path,
                recursive,
                all,
                format,
                raw_size,
                long,
                depth,
            } => self.handle_ls(ListRequest {
                path: path.as_deref(),
                recursive: *recursive,
                all: *all,
                format: *format,
                raw_size: *raw_size,
                long: *long,
                depth: *depth,
            }),
            Commands::Find {
                patterns,
                path,
                format,
                depth,
            } => self.handle_find(patterns, path.as_deref(), *format, *depth),
            Commands::Tree {
                path,
                all,
                raw_size,
                long,
                depth,
            } => self.handle_ls(ListRequest {
                path: path.as_deref(),
                recursive: true,
                all: *all,
                format: OutputFormat::Tree,
                raw_size: *raw_size,
                long: *long,
                depth: *depth,
            }),
            Commands::Du {
                path,
                raw_size,
                depth,
                sort,
            } => self.handle_du(path.as_deref(), *raw_size, *depth, *sort),
            Commands::Storage { command } => self.handle_storage(command),
            Commands::Create { local_path, path } => self.handle_create(local_path, path.as_deref()),
            Commands::Info { note } => self.handle_info(note.as_deref()),
        }
    }

    fn load_existing(&self) -> Result<CatalogTree, ApiError> {
        if !self.catalog.exists() {
            return Err(ApiError::NotFound(format!(
                "no catalog at {}",
                self.catalog.path().display()
            )));
        }
        Ok(self.catalog.load()?)
    }

    fn print_mode(&self, long: bool, raw_size: bool, full_path: bool) -> PrintMode {
        PrintMode {
            full_path,
            long,
            raw_size: raw_size || self.config.output.raw_size,
            color: self.config.output.color,
            separator: self.config.output.separator.clone(),
        }
    }

    /// Handle index command
    fn handle_index(
        &self,
        path: &Path,
        name: Option<&str>,
        tags: &[String],
        meta: Option<&str>,
        walker_config: WalkerConfig,
        force: bool,
    ) -> Result<String, ApiError> {
        let source = dunce::canonicalize(path)
            .map_err(|_| crate::error::IndexError::InvalidSource(path.to_path_buf()))?;
        let name = match name {
            Some(name) => name.to_string(),
            None => source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    ApiError::InvalidArgument(format!(
                        "cannot derive a storage name from {}",
                        source.display()
                    ))
                })?,
        };
        if name.contains('/') {
            return Err(ApiError::InvalidArgument(format!(
                "storage name \"{}\" must not contain '/'",
                name
            )));
        }
        let walker = Walker::new(walker_config)?;

        let mut tree = self.catalog.load_or_new()?;
        if tree.storage_by_name(&name).is_some() {
            if !force && !confirm(&format!("Storage \"{}\" exists, update it?", name))? {
                return Err(ApiError::Interrupted);
            }
        } else {
            tree.add_storage(StorageNode::new(
                name.as_str(),
                source.clone(),
                meta.unwrap_or_default(),
                Vec::new(),
            ));
        }
        let storage = tree
            .storage_by_name_mut(&name)
            .ok_or_else(|| no_such_storage(&name))?;
        storage.update_source(&source, meta, tags.iter().cloned());

        let started = Instant::now();
        let report = walker.index(storage, &source)?;
        info!(
            storage = %name,
            files = report.files,
            duration_ms = started.elapsed().as_millis() as u64,
            "Storage indexed"
        );
        self.catalog.save(&mut tree)?;

        Ok(format!(
            "Indexed storage \"{}\" from {}\n  Entries: {}\n  Archived: {}\n  Pruned: {}\n  Files: {}\n  Size: {}\n  Catalog: {}",
            name,
            source.display(),
            report.entries,
            report.archived,
            report.pruned,
            report.files,
            units::size_to_human(report.size),
            self.catalog.path().display()
        ))
    }

    /// Handle ls and tree commands
    fn handle_ls(&self, request: ListRequest<'_>) -> Result<String, ApiError> {
        let tree = self.load_existing()?;
        let mode = self.print_mode(request.long, request.raw_size, false);
        let max_depth = if request.recursive {
            max_depth_from_flag(request.depth)
        } else {
            Some(0)
        };
        let starts = listing::start_nodes(&tree, request.path)?;
        let with_children = request.recursive || request.path.is_some_and(|p| !p.is_empty());

        let mut renderer = render::renderer_for(request.format, &mode);
        let mut out = String::new();
        renderer.prefix(&mut out);
        for start in starts {
            listing::list_print(
                &tree,
                start,
                renderer.as_mut(),
                &mut out,
                request.all,
                max_depth,
                with_children,
            );
        }
        renderer.suffix(&mut out);
        Ok(out)
    }

    /// Handle find command
    fn handle_find(
        &self,
        patterns: &[String],
        path: Option<&str>,
        format: OutputFormat,
        depth: i64,
    ) -> Result<String, ApiError> {
        if format == OutputFormat::Tree {
            return Err(ApiError::InvalidArgument(
                "format \"tree\" is not available for find".to_string(),
            ));
        }
        if patterns.is_empty() {
            return self.handle_ls(ListRequest {
                path,
                recursive: true,
                all: true,
                format,
                raw_size: false,
                long: true,
                depth,
            });
        }
        let matchers = patterns
            .iter()
            .map(|p| NameMatcher::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let tree = self.load_existing()?;
        let mode = self.print_mode(true, false, true);
        let starts = listing::start_nodes(&tree, path)?;
        let max_depth = max_depth_from_flag(depth);

        let mut renderer = render::renderer_for(format, &mode);
        let mut out = String::new();
        let mut hits = 0;
        renderer.prefix(&mut out);
        for matcher in &matchers {
            for start in &starts {
                for node in listing::find_matches(*start, matcher, max_depth) {
                    renderer.render(&tree, node, 0, &mut out);
                    hits += 1;
                }
            }
        }
        renderer.suffix(&mut out);
        debug!(patterns = patterns.len(), hits, "Find complete");
        Ok(out)
    }

    /// Handle du command
    fn handle_du(
        &self,
        path: Option<&str>,
        raw_size: bool,
        depth: i64,
        sort: bool,
    ) -> Result<String, ApiError> {
        let tree = self.load_existing()?;
        let raw = raw_size || self.config.output.raw_size;
        let starts = listing::start_nodes(&tree, path)?;
        let max_depth = max_depth_from_flag(depth);

        let mut out = String::new();
        for start in starts {
            for node in listing::du_nodes(start, max_depth, sort) {
                out.push_str(&du::du_line(&tree, node, raw));
                out.push('\n');
            }
            out.push_str(&du::du_line(&tree, start, raw));
            out.push('\n');
        }
        Ok(out)
    }

    /// Handle storage subcommands
    fn handle_storage(&self, command: &StorageCommands) -> Result<String, ApiError> {
        match command {
            StorageCommands::List { raw_size } => {
                let tree = self.load_existing()?;
                Ok(table::format_storage_table(
                    &tree,
                    *raw_size || self.config.output.raw_size,
                    self.config.output.color,
                ))
            }
            StorageCommands::Rm { name, force } => {
                let mut tree = self.load_existing()?;
                if tree.storage_by_name(name).is_none() {
                    return Err(no_such_storage(name));
                }
                if !force && !confirm(&format!("Remove storage \"{}\"?", name))? {
                    return Ok("Removal cancelled".to_string());
                }
                let removed = tree.remove_storage(name).ok_or_else(|| no_such_storage(name))?;
                self.catalog.save(&mut tree)?;
                info!(storage = %removed.name, files = removed.total_files, "Storage removed");
                Ok(format!(
                    "Removed storage \"{}\" ({} files)",
                    removed.name, removed.total_files
                ))
            }
            StorageCommands::Meta { name, meta } => {
                self.edit_storage(name, |storage| {
                    storage.set_meta(meta.as_str());
                    format!("Storage \"{}\" meta set to \"{}\"", storage.name, meta)
                })
            }
            StorageCommands::Tag { name, tag } => self.edit_storage(name, |storage| {
                storage.tag(tag);
                format!("Storage \"{}\" tagged \"{}\"", storage.name, tag)
            }),
            StorageCommands::Untag { name, tag } => self.edit_storage(name, |storage| {
                if storage.untag(tag) {
                    format!("Storage \"{}\" untagged \"{}\"", storage.name, tag)
                } else {
                    format!("Storage \"{}\" has no tag \"{}\"", storage.name, tag)
                }
            }),
        }
    }

    fn edit_storage<F>(&self, name: &str, edit: F) -> Result<String, ApiError>
    where
        F: FnOnce(&mut StorageNode) -> String,
    {
        let mut tree = self.load_existing()?;
        let storage = tree
            .storage_by_name_mut(name)
            .ok_or_else(|| no_such_storage(name))?;
        let message = edit(storage);
        self.catalog.save(&mut tree)?;
        Ok(message)
    }

    /// Handle create command
    fn handle_create(&self, local_path: &Path, path: Option<&str>) -> Result<String, ApiError> {
        let tree = self.load_existing()?;
        let starts = listing::start_nodes(&tree, path)?;
        let mut created = 0;
        for start in starts {
            created += listing::materialize(start, local_path)
                .map_err(|e| ApiError::StorageError(crate::error::StorageError::IoError(e)))?;
        }
        info!(dest = %local_path.display(), created, "Hierarchy materialized");
        Ok(format!(
            "Created {} entries under {}",
            created,
            local_path.display()
        ))
    }

    /// Handle info command
    fn handle_info(&self, note: Option<&str>) -> Result<String, ApiError> {
        let mut tree = self.load_existing()?;
        if let Some(note) = note {
            tree.note = note.to_string();
            self.catalog.save(&mut tree)?;
        }
        Ok(table::format_catalog_info(
            &tree,
            self.catalog.path(),
            self.config.output.color,
        ))
    }
}

fn no_such_storage(name: &str) -> ApiError {
    ApiError::NotFound(format!("no such storage {}", name))
}

/// Ask a yes/no question; refuses without a terminal
fn confirm(prompt: &str) -> Result<bool, ApiError> {
    if !std::io::stdin().is_terminal() {
        return Err(ApiError::InvalidArgument(format!(
            "{} (no terminal to confirm, use --force)",
            prompt
        )));
    }
    use dialoguer::Confirm;
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Index { .. } => "index",
        Commands::Ls { .. } => "ls",
        Commands::Find { .. } => "find",
        Commands::Tree { .. } => "tree",
        Commands::Du { .. } => "du",
        Commands::Storage { command } => match command {
            StorageCommands::List { .. } => "storage.list",
            StorageCommands::Rm { .. } => "storage.rm",
            StorageCommands::Meta { .. } => "storage.meta",
            StorageCommands::Tag { .. } => "storage.tag",
            StorageCommands::Untag { .. } => "storage.untag",
        },
        Commands::Create { .. } => "create",
        Commands::Info { .. } => "info",
    }
}
