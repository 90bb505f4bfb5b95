use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context as _, Result, anyhow, bail};
use swc_common::SourceMap;
use swc_ecma_ast::{Decl, Module, ModuleDecl, ModuleItem, Stmt, TsModuleName};

use super::args::Arguments;
use crate::core::{SnapshotContext, parsers::parse_ts_source};

/// What a successful run produced, for reporting.
pub struct RunSummary {
    pub output_path: PathBuf,
    pub namespace: String,
    pub type_count: usize,
    pub const_count: usize,
    pub parse_error_count: usize,
}

pub fn run(args: &Arguments) -> Result<RunSummary> {
    let (module, type_name) = parse_source_arg(&args.source)?;

    let ctx = SnapshotContext::new(&args.common)?;

    let scope = ctx.find_scope(module).ok_or_else(|| {
        anyhow!(
            "no module matching `{}` under {}",
            module,
            ctx.root_dir.display()
        )
    })?;

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.ts", type_name.to_lowercase())));

    let namespace = match &args.namespace {
        Some(ns) => ns.clone(),
        None => infer_namespace(&output_path)
            .unwrap_or_else(|| fallback_namespace(&output_path, type_name)),
    };

    let snapshot = ctx.snapshot(&scope, type_name, &namespace)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&output_path, &snapshot.text)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    Ok(RunSummary {
        output_path,
        namespace,
        type_count: snapshot.type_count,
        const_count: snapshot.const_count,
        parse_error_count: ctx.parse_errors().len(),
    })
}

/// Split a `path/to/module.ts:TypeName` locator. Exactly one `:` must
/// separate the module path from the type name.
fn parse_source_arg(source: &str) -> Result<(&str, &str)> {
    let mut parts = source.split(':');
    let (Some(module), Some(type_name), None) = (parts.next(), parts.next(), parts.next()) else {
        bail!("Invalid source `{source}`: expected path/to/module.ts:TypeName");
    };
    if module.is_empty() || type_name.is_empty() {
        bail!("Invalid source `{source}`: expected path/to/module.ts:TypeName");
    }
    Ok((module, type_name))
}

/// Infer the namespace from the files the output will sit next to: when
/// every sibling `.ts`/`.tsx` file that declares a top-level namespace
/// agrees on one name, the generated file joins it.
fn infer_namespace(output_path: &Path) -> Option<String> {
    let dir = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut names = BTreeSet::new();
    for entry in fs::read_dir(&dir).ok()?.flatten() {
        let path = entry.path();
        if !matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("ts" | "tsx")
        ) {
            continue;
        }
        // A stale copy of our own output must not vote.
        if path.file_name() == output_path.file_name() {
            continue;
        }
        let Ok(code) = fs::read_to_string(&path) else {
            continue;
        };
        let source_map = Arc::new(SourceMap::default());
        let Ok(parsed) = parse_ts_source(code, &path.to_string_lossy(), source_map) else {
            continue;
        };
        names.extend(namespace_decl_names(&parsed.module));
    }

    if names.len() == 1 {
        names.into_iter().next()
    } else {
        None
    }
}

fn namespace_decl_names(module: &Module) -> Vec<String> {
    module
        .body
        .iter()
        .filter_map(|item| {
            let decl = match item {
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => &export.decl,
                ModuleItem::Stmt(Stmt::Decl(decl)) => decl,
                _ => return None,
            };
            let Decl::TsModule(ts_module) = decl else {
                return None;
            };
            match &ts_module.id {
                TsModuleName::Ident(ident) => Some(ident.sym.to_string()),
                TsModuleName::Str(_) => None,
            }
        })
        .collect()
}

/// Last resort: the output directory's name, made identifier-safe.
fn fallback_namespace(output_path: &Path, type_name: &str) -> String {
    let dir_name = output_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            std::env::current_dir()
                .ok()
                .and_then(|d| d.file_name().map(|n| n.to_string_lossy().into_owned()))
        });

    match dir_name.and_then(|n| sanitize_identifier(&n)) {
        Some(name) => name,
        None => type_name.to_string(),
    }
}

fn sanitize_identifier(raw: &str) -> Option<String> {
    let mut name: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if name.chars().all(|c| c == '_') {
        return None;
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    Some(name)
}
