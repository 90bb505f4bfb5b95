use std::{
    cell::OnceCell,
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context as _, Result, anyhow};
use rayon::prelude::*;

use crate::{
    cli::args::CommonArgs,
    config::{Config, load_config},
    core::{
        error::SnapshotError,
        file_scanner::scan_files,
        harvest::harvest,
        parsers::{ParsedModule, parse_ts_source},
        registry::TypeRegistry,
        symbols::SymbolTable,
        walk::discover,
    },
};

/// A source file that could not be read or parsed. Reported as a warning;
/// extraction proceeds over the files that did parse.
pub struct ParseIssue {
    pub file_path: String,
    pub error: String,
}

/// Result of one extraction run, ready to be written out.
#[derive(Debug)]
pub struct Snapshot {
    pub text: String,
    pub type_count: usize,
    pub const_count: usize,
}

/// Orchestrator for the extraction pipeline.
///
/// `SnapshotContext` owns configuration, the scanned file set, and the
/// lazily-built analysis data. The pipeline has four stages, run by
/// [`SnapshotContext::snapshot`]:
///
/// 1. Locate the root declaration in its module
/// 2. Walk the reference closure, admitting reachable types
/// 3. Harvest constants annotated with the extracted types
/// 4. Rewrite and emit, verifying the output re-parses
///
/// Parsing and symbol table construction are lazy (`OnceCell`) so the
/// context can be created cheaply and the heavy work happens on first use.
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. CLI arguments (e.g. `--source-root`)
/// 2. `.tysnaprc.json` config file
/// 3. Built-in defaults
pub struct SnapshotContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Project root directory (module paths are keyed relative to this).
    pub root_dir: PathBuf,

    /// All source files to analyze, sorted.
    pub files: Vec<String>,

    /// Whether to print verbose diagnostic messages.
    pub verbose: bool,

    /// Parsed AST per module, keyed by root-relative path.
    /// Initialized on first call to `parsed_files()`.
    parsed_files: OnceCell<BTreeMap<String, ParsedModule>>,

    /// Parse errors encountered while parsing source files.
    /// Populated alongside `parsed_files` initialization.
    parse_errors: OnceCell<Vec<ParseIssue>>,

    /// Symbol table over all parsed modules.
    /// Initialized on first call to `symbol_table()`.
    symbol_table: OnceCell<SymbolTable>,
}

impl SnapshotContext {
    /// Create a new context from command line arguments: load configuration
    /// and scan the source tree. Parsing is deferred.
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let verbose = common_args.verbose;

        // Priority: CLI --source-root arg > current directory
        let source_root = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let root_dir = source_root.clone();
        let path = source_root
            .to_str()
            .with_context(|| anyhow!("Invalid path: {:?}", source_root))?;

        let config_result = load_config(Path::new(path))?;

        if verbose && !config_result.from_file {
            eprintln!("Note: No .tysnaprc.json found, using default configuration");
        }

        let config = config_result.config;

        let scan_result = scan_files(
            path,
            &config.includes,
            &config.ignores,
            config.ignore_test_files,
            verbose,
        );

        if scan_result.skipped_count > 0 {
            eprintln!(
                "Warning: {} path(s) skipped due to access errors{}",
                scan_result.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        Ok(Self {
            config,
            root_dir,
            files: scan_result.files,
            verbose,
            parsed_files: OnceCell::new(),
            parse_errors: OnceCell::new(),
            symbol_table: OnceCell::new(),
        })
    }

    /// Get parsed AST for all source files (lazy initialization).
    ///
    /// File reading and parsing both run on rayon workers; each file gets
    /// its own `Arc<SourceMap>` so there is no shared mutable state. The
    /// merge into a `BTreeMap` is sequential, which also fixes module order.
    pub fn parsed_files(&self) -> &BTreeMap<String, ParsedModule> {
        self.parsed_files.get_or_init(|| {
            let parse_results: Vec<_> = self
                .files
                .par_iter()
                .map(|file_path| {
                    let parse_result = std::fs::read_to_string(file_path)
                        .map_err(|e| anyhow!("Failed to read file: {}", e))
                        .and_then(|code| {
                            let source_map = Arc::new(swc_common::SourceMap::default());
                            parse_ts_source(code, file_path, source_map)
                        });

                    (file_path.clone(), parse_result)
                })
                .collect();

            let mut parsed = BTreeMap::new();
            let mut errors = Vec::new();

            for (file_path, result) in parse_results {
                match result {
                    Ok(p) => {
                        parsed.insert(self.module_key(&file_path), p);
                    }
                    Err(e) => {
                        if self.verbose {
                            eprintln!("Warning: {} - {}", file_path, e);
                        }
                        errors.push(ParseIssue {
                            file_path,
                            error: e.to_string(),
                        });
                    }
                }
            }

            let _ = self.parse_errors.set(errors);
            parsed
        })
    }

    /// Get parse errors from source files.
    /// Populated when `parsed_files()` is first called.
    pub fn parse_errors(&self) -> &Vec<ParseIssue> {
        self.parse_errors.get_or_init(Vec::new)
    }

    /// Get the symbol table (lazy initialization). Triggers parsing.
    pub fn symbol_table(&self) -> &SymbolTable {
        self.symbol_table
            .get_or_init(|| SymbolTable::build(self.parsed_files()))
    }

    /// Map a scanned file path to its module key: the path relative to the
    /// root directory, with no leading `./`.
    fn module_key(&self, file_path: &str) -> String {
        let path = Path::new(file_path);
        let rel = path.strip_prefix(&self.root_dir).unwrap_or(path);
        rel.to_string_lossy()
            .trim_start_matches("./")
            .to_string()
    }

    /// Find the module the user's locator names. Tries an exact key match
    /// first, then a unique path-suffix match so `palette.ts` works when
    /// the module lives at `src/palette.ts`.
    pub fn find_scope(&self, requested: &str) -> Option<String> {
        let requested = requested.trim_start_matches("./");
        let parsed = self.parsed_files();
        if parsed.contains_key(requested) {
            return Some(requested.to_string());
        }
        parsed
            .keys()
            .find(|key| key.ends_with(&format!("/{requested}")))
            .cloned()
    }

    /// Run the full pipeline for one root declaration.
    pub fn snapshot(&self, scope: &str, type_name: &str, namespace: &str) -> Result<Snapshot> {
        let table = self.symbol_table();

        let root = table.resolve_root(scope, type_name).ok_or_else(|| {
            SnapshotError::RootNotFound {
                scope: scope.to_string(),
                name: type_name.to_string(),
            }
        })?;

        let mut types = TypeRegistry::new();
        discover(table, root, &mut types);

        let consts = harvest(table, &types);

        let locator = format!("{scope}:{type_name}");
        let text = crate::core::emit::emit(table, &types, &consts, namespace, &locator)?;

        Ok(Snapshot {
            type_count: types.len(),
            const_count: consts.len(),
            text,
        })
    }
}
