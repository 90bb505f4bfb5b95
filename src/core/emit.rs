//! Rendering the registries back out as a self-contained TypeScript module.
//!
//! Declarations are printed in output-name order inside a single
//! `export namespace` wrapper, each extracted type followed by its harvested
//! constants. Every reference position is rewritten through the registries:
//! a reference that resolves to a registered type prints its assigned name
//! (qualifiers dropped, since the target now lives alongside it), and
//! everything else prints exactly as written in the source.
//!
//! Before returning, the emitted text is re-parsed. A parse failure means
//! the printer produced malformed output and surfaces as
//! [`SnapshotError::EmissionFormat`] rather than landing in a file.

use std::sync::Arc;

use anyhow::Result;
use swc_common::SourceMap;

use crate::core::decl::{DeclBody, FnParam, Member, RefId, TypeExpr};
use crate::core::error::SnapshotError;
use crate::core::parsers::parse_ts_source;
use crate::core::registry::{ConstRegistry, TypeRegistry};
use crate::core::symbols::SymbolTable;

const INDENT: &str = "  ";

/// Render the extracted closure under `namespace`. `locator` is the
/// `path:Type` argument the run started from, recorded in the header.
pub fn emit(
    table: &SymbolTable,
    types: &TypeRegistry,
    consts: &ConstRegistry,
    namespace: &str,
    locator: &str,
) -> Result<String> {
    let printer = Printer { table, types };
    let const_groups = consts.grouped_by_owner();

    let mut out = String::new();
    out.push_str(&format!(
        "// Code generated by tysnap from {locator}. DO NOT EDIT.\n\n"
    ));
    out.push_str(&format!("export namespace {namespace} {{\n"));

    let records = types.records_sorted();
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&printer.decl_text(&record.new_name, &record.body));
        if let Some(group) = const_groups.get(&record.symbol) {
            out.push('\n');
            for constant in group {
                out.push_str(&format!(
                    "{INDENT}export const {}: {} = {};\n",
                    constant.new_name, record.new_name, constant.value
                ));
            }
        }
    }
    out.push_str("}\n");

    verify(&out)?;
    Ok(out)
}

/// Re-parse the generated text as a final format check.
fn verify(text: &str) -> Result<()> {
    parse_ts_source(
        text.to_string(),
        "generated.ts",
        Arc::new(SourceMap::default()),
    )
    .map_err(|e| SnapshotError::EmissionFormat(e.to_string()))?;
    Ok(())
}

struct Printer<'a> {
    table: &'a SymbolTable,
    types: &'a TypeRegistry,
}

impl Printer<'_> {
    /// The text a reference occurrence prints as: the assigned name when it
    /// resolves to a registered type, otherwise the source text unchanged.
    fn ref_name(&self, occ: RefId) -> String {
        if let Some(symbol) = self.table.resolve_use(occ) {
            if let Some(new_name) = self.types.new_name_of(symbol) {
                return new_name.to_string();
            }
        }
        self.table.occurrence_text(occ)
    }

    fn decl_text(&self, name: &str, body: &DeclBody) -> String {
        match body {
            DeclBody::Alias {
                type_params,
                target,
            } => {
                format!(
                    "{INDENT}export type {name}{} = {};\n",
                    params_text(type_params),
                    self.type_text(target)
                )
            }
            DeclBody::Interface {
                type_params,
                extends,
                members,
            } => {
                let mut text = format!("{INDENT}export interface {name}{}", params_text(type_params));
                if !extends.is_empty() {
                    let clauses: Vec<String> =
                        extends.iter().map(|e| self.type_text(e)).collect();
                    text.push_str(&format!(" extends {}", clauses.join(", ")));
                }
                if members.is_empty() {
                    text.push_str(" {}\n");
                    return text;
                }
                text.push_str(" {\n");
                for member in members {
                    text.push_str(&format!("{INDENT}{INDENT}{};\n", self.member_text(member)));
                }
                text.push_str(&format!("{INDENT}}}\n"));
                text
            }
            DeclBody::Enum { members } => {
                if members.is_empty() {
                    return format!("{INDENT}export enum {name} {{}}\n");
                }
                let mut text = format!("{INDENT}export enum {name} {{\n");
                for member in members {
                    match &member.init {
                        Some(init) => text.push_str(&format!(
                            "{INDENT}{INDENT}{} = {},\n",
                            member.name, init
                        )),
                        None => text.push_str(&format!("{INDENT}{INDENT}{},\n", member.name)),
                    }
                }
                text.push_str(&format!("{INDENT}}}\n"));
                text
            }
        }
    }

    fn member_text(&self, member: &Member) -> String {
        match member {
            Member::Property {
                name,
                optional,
                readonly,
                ty,
            } => {
                let mut text = String::new();
                if *readonly {
                    text.push_str("readonly ");
                }
                text.push_str(name);
                if *optional {
                    text.push('?');
                }
                if let Some(ty) = ty {
                    text.push_str(": ");
                    text.push_str(&self.type_text(ty));
                }
                text
            }
            Member::Method {
                name,
                optional,
                params,
                ret,
            } => {
                let mut text = name.clone();
                if *optional {
                    text.push('?');
                }
                text.push_str(&format!("({})", self.param_list(params)));
                if let Some(ret) = ret {
                    text.push_str(": ");
                    text.push_str(&self.type_text(ret));
                }
                text
            }
            Member::Index {
                param,
                readonly,
                ty,
            } => {
                let mut text = String::new();
                if *readonly {
                    text.push_str("readonly ");
                }
                let key_ty = param
                    .ty
                    .as_ref()
                    .map(|t| self.type_text(t))
                    .unwrap_or_else(|| "string".to_string());
                text.push_str(&format!("[{}: {}]", param.name, key_ty));
                if let Some(ty) = ty {
                    text.push_str(": ");
                    text.push_str(&self.type_text(ty));
                }
                text
            }
            Member::Verbatim { text, .. } => text.trim_end_matches(';').to_string(),
        }
    }

    fn param_list(&self, params: &[FnParam]) -> String {
        let rendered: Vec<String> = params
            .iter()
            .map(|p| {
                let mut text = p.name.clone();
                if p.optional {
                    text.push('?');
                }
                if let Some(ty) = &p.ty {
                    text.push_str(": ");
                    text.push_str(&self.type_text(ty));
                }
                text
            })
            .collect();
        rendered.join(", ")
    }

    fn type_text(&self, ty: &TypeExpr) -> String {
        match ty {
            TypeExpr::Ref { occ, args } => {
                let name = self.ref_name(*occ);
                if args.is_empty() {
                    name
                } else {
                    let rendered: Vec<String> =
                        args.iter().map(|a| self.type_text(a)).collect();
                    format!("{}<{}>", name, rendered.join(", "))
                }
            }
            TypeExpr::Array(inner) => {
                let text = self.type_text(inner);
                if needs_parens_as_operand(inner) {
                    format!("({text})[]")
                } else {
                    format!("{text}[]")
                }
            }
            TypeExpr::Tuple(items) => {
                let rendered: Vec<String> = items.iter().map(|t| self.type_text(t)).collect();
                format!("[{}]", rendered.join(", "))
            }
            TypeExpr::Union(items) => {
                let rendered: Vec<String> = items.iter().map(|t| self.type_text(t)).collect();
                rendered.join(" | ")
            }
            TypeExpr::Intersection(items) => {
                let rendered: Vec<String> = items.iter().map(|t| self.type_text(t)).collect();
                rendered.join(" & ")
            }
            TypeExpr::Paren(inner) => format!("({})", self.type_text(inner)),
            TypeExpr::Fn { params, ret } => {
                format!("({}) => {}", self.param_list(params), self.type_text(ret))
            }
            TypeExpr::Object(members) => {
                if members.is_empty() {
                    return "{}".to_string();
                }
                let rendered: Vec<String> =
                    members.iter().map(|m| self.member_text(m)).collect();
                format!("{{ {} }}", rendered.join("; "))
            }
            TypeExpr::Operator { op, inner } => format!("{op} {}", self.type_text(inner)),
            TypeExpr::IndexedAccess { obj, index } => {
                let obj_text = self.type_text(obj);
                let obj_text = if needs_parens_as_operand(obj) {
                    format!("({obj_text})")
                } else {
                    obj_text
                };
                format!("{}[{}]", obj_text, self.type_text(index))
            }
            TypeExpr::Verbatim { text, .. } => text.clone(),
            TypeExpr::Keyword(text) | TypeExpr::Lit(text) => text.clone(),
        }
    }
}

fn params_text(params: &[String]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!("<{}>", params.join(", "))
    }
}

/// Whether `ty` must be parenthesized when used as the operand of a postfix
/// construct (`T[]`, `T[K]`).
fn needs_parens_as_operand(ty: &TypeExpr) -> bool {
    matches!(
        ty,
        TypeExpr::Union(_)
            | TypeExpr::Intersection(_)
            | TypeExpr::Fn { .. }
            | TypeExpr::Operator { .. }
    )
}
