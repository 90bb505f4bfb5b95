//! Per-module declaration collection.
//!
//! `ModuleCollector` makes one AST pass over a parsed module and gathers the
//! raw material the symbol table is built from: top-level type declarations,
//! top-level `const` declarations, and import statements. Only module-level
//! declarations are collected; anything nested inside a function, class, or
//! TS namespace body is out of scope for extraction.

use std::sync::Arc;

use swc_common::{SourceMap, SourceMapper, Spanned};
use swc_ecma_ast::{
    ImportDecl, ImportSpecifier, ModuleExportName, Pat, TsEnumDecl, TsInterfaceDecl,
    TsTypeAliasDecl, VarDecl, VarDeclKind,
};
use swc_ecma_visit::{Visit, VisitWith};

/// Import statement information for cross-module resolution.
///
/// `imported_name` is the name in the source module, `"default"` for default
/// imports, or `"*"` for namespace imports (`import * as ns from "./m"`).
#[derive(Debug, Clone)]
pub struct ImportInfo {
    pub local_name: String,
    pub imported_name: String,
    pub module_path: String,
}

/// A top-level type declaration, kept as its swc node until lowering.
pub(crate) enum TypeDeclNode {
    Interface(TsInterfaceDecl),
    Alias(TsTypeAliasDecl),
    Enum(TsEnumDecl),
}

impl TypeDeclNode {
    pub(crate) fn name(&self) -> String {
        match self {
            TypeDeclNode::Interface(n) => n.id.sym.to_string(),
            TypeDeclNode::Alias(n) => n.id.sym.to_string(),
            TypeDeclNode::Enum(n) => n.id.sym.to_string(),
        }
    }
}

/// A top-level `const` with its initializer text kept verbatim.
pub(crate) struct RawConst {
    pub name: String,
    pub type_ann: Option<swc_ecma_ast::TsType>,
    pub value: String,
}

pub(crate) struct ModuleCollector {
    source_map: Arc<SourceMap>,
    /// Tracks nesting depth: 0 = module level, >0 = inside function/class/namespace.
    scope_depth: usize,

    pub types: Vec<TypeDeclNode>,
    pub consts: Vec<RawConst>,
    pub imports: Vec<ImportInfo>,
}

impl ModuleCollector {
    pub(crate) fn new(source_map: Arc<SourceMap>) -> Self {
        Self {
            source_map,
            scope_depth: 0,
            types: Vec::new(),
            consts: Vec::new(),
            imports: Vec::new(),
        }
    }

    fn snippet(&self, span: swc_common::Span) -> String {
        self.source_map
            .span_to_snippet(span)
            .unwrap_or_default()
    }
}

impl Visit for ModuleCollector {
    fn visit_import_decl(&mut self, node: &ImportDecl) {
        let module_path = node.src.value.to_string_lossy().into_owned();
        for spec in &node.specifiers {
            match spec {
                ImportSpecifier::Named(named) => {
                    let imported_name = match &named.imported {
                        Some(ModuleExportName::Ident(ident)) => ident.sym.to_string(),
                        Some(ModuleExportName::Str(s)) => s.value.to_string_lossy().into_owned(),
                        None => named.local.sym.to_string(),
                    };
                    self.imports.push(ImportInfo {
                        local_name: named.local.sym.to_string(),
                        imported_name,
                        module_path: module_path.clone(),
                    });
                }
                ImportSpecifier::Default(default) => {
                    self.imports.push(ImportInfo {
                        local_name: default.local.sym.to_string(),
                        imported_name: "default".to_string(),
                        module_path: module_path.clone(),
                    });
                }
                ImportSpecifier::Namespace(ns) => {
                    self.imports.push(ImportInfo {
                        local_name: ns.local.sym.to_string(),
                        imported_name: "*".to_string(),
                        module_path: module_path.clone(),
                    });
                }
            }
        }
    }

    fn visit_ts_interface_decl(&mut self, node: &TsInterfaceDecl) {
        if self.scope_depth == 0 {
            self.types.push(TypeDeclNode::Interface(node.clone()));
        }
    }

    fn visit_ts_type_alias_decl(&mut self, node: &TsTypeAliasDecl) {
        if self.scope_depth == 0 {
            self.types.push(TypeDeclNode::Alias(node.clone()));
        }
    }

    fn visit_ts_enum_decl(&mut self, node: &TsEnumDecl) {
        if self.scope_depth == 0 {
            self.types.push(TypeDeclNode::Enum(node.clone()));
        }
    }

    fn visit_var_decl(&mut self, node: &VarDecl) {
        if self.scope_depth == 0 && node.kind == VarDeclKind::Const {
            for decl in &node.decls {
                let Pat::Ident(binding) = &decl.name else {
                    continue;
                };
                let Some(init) = &decl.init else {
                    continue;
                };
                self.consts.push(RawConst {
                    name: binding.id.sym.to_string(),
                    type_ann: binding.type_ann.as_ref().map(|ann| (*ann.type_ann).clone()),
                    value: self.snippet(init.span()),
                });
            }
        }
        node.visit_children_with(self);
    }

    fn visit_function(&mut self, node: &swc_ecma_ast::Function) {
        self.scope_depth += 1;
        node.visit_children_with(self);
        self.scope_depth -= 1;
    }

    fn visit_arrow_expr(&mut self, node: &swc_ecma_ast::ArrowExpr) {
        self.scope_depth += 1;
        node.visit_children_with(self);
        self.scope_depth -= 1;
    }

    fn visit_class(&mut self, node: &swc_ecma_ast::Class) {
        self.scope_depth += 1;
        node.visit_children_with(self);
        self.scope_depth -= 1;
    }

    fn visit_ts_module_decl(&mut self, node: &swc_ecma_ast::TsModuleDecl) {
        self.scope_depth += 1;
        node.visit_children_with(self);
        self.scope_depth -= 1;
    }
}
