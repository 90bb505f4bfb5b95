//! Symbol resolution over a set of parsed modules.
//!
//! ## Module Structure
//!
//! - `collector` - one-pass gathering of top-level declarations and imports
//! - `lower` - swc type nodes -> structural [`DeclBody`] with occurrence records
//!
//! `SymbolTable` is the single authority the pipeline consults for names:
//! it owns every module-level type and constant declaration, every reference
//! occurrence allocated during lowering, and the import graph needed to
//! answer "what does this written name mean here". Resolution is positional:
//! the same written name in two modules can resolve to two different symbols,
//! and a name that resolves to nothing is treated as a built-in by callers.

pub mod collector;
pub mod lower;

use std::collections::{BTreeMap, HashMap};

pub use collector::ImportInfo;

use crate::core::decl::{DeclBody, RefId};
use crate::core::parsers::ParsedModule;
use collector::ModuleCollector;
use lower::LowerCtx;
use swc_ecma_visit::VisitWith;

/// Stable identity of one module-level declaration.
///
/// Two symbols are the same declaration if and only if their ids are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(u32);

impl SymbolId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One written reference position inside a declaration body, recorded at
/// lowering time and resolved on demand.
#[derive(Debug, Clone)]
pub struct Occurrence {
    /// Module path the reference was written in.
    pub scope: String,
    /// Namespace qualifier, if written qualified (`pal.Palette` -> `pal`).
    pub qualifier: Option<String>,
    /// Final name segment.
    pub name: String,
    /// True when the name is a generic parameter in scope at this position.
    pub shadowed: bool,
}

pub struct TypeDeclData {
    pub name: String,
    pub scope: String,
    pub body: DeclBody,
}

pub struct ConstDeclData {
    pub name: String,
    pub scope: String,
    /// Occurrence for the declared type annotation, when the annotation is
    /// a plain type reference. `const X: Color = 0` records `Color` here.
    pub type_ref: Option<RefId>,
    /// Initializer expression, verbatim.
    pub value: String,
}

pub enum SymbolData {
    Type(TypeDeclData),
    Const(ConstDeclData),
}

/// A constant visible in one module, with its annotation already resolved.
pub struct ConstantView {
    pub symbol: SymbolId,
    pub name: String,
    pub declared_type: Option<SymbolId>,
    pub value: String,
}

pub struct SymbolTable {
    symbols: Vec<SymbolData>,
    occurrences: Vec<Occurrence>,
    /// (module path, declared name) -> symbol. First declaration wins when a
    /// module declares the same name twice.
    types_by_name: HashMap<(String, String), SymbolId>,
    consts_by_scope: HashMap<String, Vec<SymbolId>>,
    imports: HashMap<String, Vec<ImportInfo>>,
    /// Normalized paths of every parsed module, for import resolution.
    module_paths: Vec<String>,
}

impl SymbolTable {
    /// Build the table from all parsed modules.
    ///
    /// Modules are processed in path order and declarations within a module
    /// in source order, so symbol ids (and everything derived from them) are
    /// deterministic across runs.
    ///
    /// A name declared twice in one module keeps its first body; later
    /// declarations (TypeScript interface merging) are dropped rather than
    /// merged.
    pub fn build(modules: &BTreeMap<String, ParsedModule>) -> Self {
        let mut table = SymbolTable {
            symbols: Vec::new(),
            occurrences: Vec::new(),
            types_by_name: HashMap::new(),
            consts_by_scope: HashMap::new(),
            imports: HashMap::new(),
            module_paths: modules.keys().cloned().collect(),
        };

        for (path, parsed) in modules {
            let mut collector = ModuleCollector::new(parsed.source_map.clone());
            parsed.module.visit_with(&mut collector);

            for node in &collector.types {
                let name = node.name();
                let key = (path.clone(), name.clone());
                if table.types_by_name.contains_key(&key) {
                    continue;
                }
                let body = LowerCtx::new(path, &parsed.source_map, &mut table.occurrences)
                    .lower_decl(node);
                let id = SymbolId(table.symbols.len() as u32);
                table.symbols.push(SymbolData::Type(TypeDeclData {
                    name,
                    scope: path.clone(),
                    body,
                }));
                table.types_by_name.insert(key, id);
            }

            for raw in &collector.consts {
                let type_ref = raw.type_ann.as_ref().and_then(|ann| {
                    LowerCtx::new(path, &parsed.source_map, &mut table.occurrences)
                        .lower_const_ann(ann)
                });
                let id = SymbolId(table.symbols.len() as u32);
                table.symbols.push(SymbolData::Const(ConstDeclData {
                    name: raw.name.clone(),
                    scope: path.clone(),
                    type_ref,
                    value: raw.value.clone(),
                }));
                table
                    .consts_by_scope
                    .entry(path.clone())
                    .or_default()
                    .push(id);
            }

            table.imports.insert(path.clone(), collector.imports);
        }

        table
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve a type name written unqualified at module level in `scope`.
    /// This is how the extraction root is located.
    pub fn resolve_root(&self, scope: &str, name: &str) -> Option<SymbolId> {
        self.types_by_name
            .get(&(scope.to_string(), name.to_string()))
            .copied()
    }

    /// Resolve one reference occurrence to the declaration it names, or
    /// `None` when it names nothing the table knows (a built-in, a value-only
    /// import, or a shadowing generic parameter).
    pub fn resolve_use(&self, occ: RefId) -> Option<SymbolId> {
        let occ = &self.occurrences[occ.index()];
        if occ.shadowed {
            return None;
        }

        match &occ.qualifier {
            Some(qualifier) => {
                // Only a single-segment qualifier can be a namespace import.
                if qualifier.contains('.') {
                    return None;
                }
                let import = self
                    .imports_of(&occ.scope)
                    .iter()
                    .find(|i| i.imported_name == "*" && i.local_name == *qualifier)?;
                let target = self.resolve_module_path(&occ.scope, &import.module_path)?;
                self.resolve_root(&target, &occ.name)
            }
            None => {
                if let Some(id) = self.resolve_root(&occ.scope, &occ.name) {
                    return Some(id);
                }
                let import = self
                    .imports_of(&occ.scope)
                    .iter()
                    .find(|i| i.local_name == occ.name)?;
                if import.imported_name == "default" || import.imported_name == "*" {
                    return None;
                }
                let target = self.resolve_module_path(&occ.scope, &import.module_path)?;
                self.resolve_root(&target, &import.imported_name)
            }
        }
    }

    fn imports_of(&self, scope: &str) -> &[ImportInfo] {
        self.imports.get(scope).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve an import specifier written in `importer` to the path of a
    /// parsed module. Bare (package) specifiers resolve to nothing.
    fn resolve_module_path(&self, importer: &str, spec: &str) -> Option<String> {
        if !spec.starts_with("./") && !spec.starts_with("../") {
            return None;
        }
        let dir = match importer.rfind('/') {
            Some(idx) => &importer[..idx],
            None => "",
        };
        let joined = if dir.is_empty() {
            spec.to_string()
        } else {
            format!("{dir}/{spec}")
        };
        let base = normalize_path(&joined);

        let candidates = [
            base.clone(),
            format!("{base}.ts"),
            format!("{base}.tsx"),
            format!("{base}.js"),
            format!("{base}.jsx"),
            format!("{base}/index.ts"),
            format!("{base}/index.tsx"),
            format!("{base}/index.js"),
            format!("{base}/index.jsx"),
        ];
        candidates
            .into_iter()
            .find(|c| self.module_paths.iter().any(|m| m == c))
    }

    // ========================================================================
    // Symbol accessors
    // ========================================================================

    pub fn symbol_name(&self, id: SymbolId) -> &str {
        match &self.symbols[id.index()] {
            SymbolData::Type(t) => &t.name,
            SymbolData::Const(c) => &c.name,
        }
    }

    pub fn defining_scope(&self, id: SymbolId) -> &str {
        match &self.symbols[id.index()] {
            SymbolData::Type(t) => &t.scope,
            SymbolData::Const(c) => &c.scope,
        }
    }

    pub fn is_type(&self, id: SymbolId) -> bool {
        matches!(&self.symbols[id.index()], SymbolData::Type(_))
    }

    pub fn declaration_body(&self, id: SymbolId) -> Option<&DeclBody> {
        match &self.symbols[id.index()] {
            SymbolData::Type(t) => Some(&t.body),
            SymbolData::Const(_) => None,
        }
    }

    /// Every module-level constant declared in `scope`, in source order,
    /// with the type annotation resolved to a symbol where possible.
    pub fn scan_constants(&self, scope: &str) -> Vec<ConstantView> {
        self.consts_by_scope
            .get(scope)
            .map(|ids| {
                ids.iter()
                    .map(|&id| {
                        let SymbolData::Const(c) = &self.symbols[id.index()] else {
                            unreachable!("consts_by_scope holds only const symbols");
                        };
                        ConstantView {
                            symbol: id,
                            name: c.name.clone(),
                            declared_type: c.type_ref.and_then(|r| self.resolve_use(r)),
                            value: c.value.clone(),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The reference text as written in the source: `Color`, `pal.Palette`.
    pub fn occurrence_text(&self, occ: RefId) -> String {
        let occ = &self.occurrences[occ.index()];
        match &occ.qualifier {
            Some(q) => format!("{}.{}", q, occ.name),
            None => occ.name.clone(),
        }
    }
}

/// Resolve `.` and `..` segments lexically, without touching the filesystem.
fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}
