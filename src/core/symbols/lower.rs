//! Lowering swc type nodes into structural declaration bodies.
//!
//! This is the boundary between the swc AST and the pipeline's own closed
//! [`DeclBody`]/[`TypeExpr`] representation. Every named-type reference
//! position produces an occurrence record (addressable via [`RefId`]) so the
//! walker and rewriter can ask the symbol table what each written name
//! resolves to. Constructs outside the supported shape set degrade to
//! verbatim source text; the type references inside them are still scanned
//! and recorded, so closure discovery sees through verbatim text even though
//! printing leaves it unchanged.

use swc_common::{SourceMap, SourceMapper, Span, Spanned};
use swc_ecma_ast::{
    Expr, TsEntityName, TsEnumMemberId, TsExprWithTypeArgs, TsFnOrConstructorType, TsFnParam,
    TsKeywordTypeKind, TsLit, TsType, TsTypeElement, TsTypeOperatorOp, TsTypeParamDecl, TsTypeRef,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::Occurrence;
use super::collector::TypeDeclNode;
use crate::core::decl::{DeclBody, EnumMember, FnParam, Member, RefId, TypeExpr};

pub(crate) struct LowerCtx<'a> {
    scope: &'a str,
    source_map: &'a SourceMap,
    /// Generic parameter names currently in scope; occurrences of these are
    /// marked shadowed so they never resolve to module-level declarations.
    type_params: Vec<String>,
    occurrences: &'a mut Vec<Occurrence>,
}

impl<'a> LowerCtx<'a> {
    pub(crate) fn new(
        scope: &'a str,
        source_map: &'a SourceMap,
        occurrences: &'a mut Vec<Occurrence>,
    ) -> Self {
        Self {
            scope,
            source_map,
            type_params: Vec::new(),
            occurrences,
        }
    }

    fn snippet(&self, span: Span) -> String {
        self.source_map
            .span_to_snippet(span)
            .unwrap_or_else(|_| "unknown".to_string())
    }

    /// Verbatim snippet plus the reference occurrences found inside it.
    fn verbatim_type(&mut self, ty: &TsType) -> TypeExpr {
        TypeExpr::Verbatim {
            text: self.snippet(ty.span()),
            refs: self.scan_refs(ty),
        }
    }

    fn verbatim_member(&mut self, element: &TsTypeElement) -> Member {
        Member::Verbatim {
            text: self.snippet(element.span()),
            refs: self.scan_refs(element),
        }
    }

    fn scan_refs<N: VisitWith<RefScan>>(&mut self, node: &N) -> Vec<RefId> {
        let mut scan = RefScan { names: Vec::new() };
        node.visit_with(&mut scan);
        scan.names
            .into_iter()
            .map(|(qualifier, name)| self.add_ref(qualifier, name))
            .collect()
    }

    fn add_ref(&mut self, qualifier: Option<String>, name: String) -> RefId {
        let shadowed = qualifier.is_none() && self.type_params.iter().any(|p| *p == name);
        let id = RefId(self.occurrences.len() as u32);
        self.occurrences.push(Occurrence {
            scope: self.scope.to_string(),
            qualifier,
            name,
            shadowed,
        });
        id
    }

    /// Lower a collected top-level declaration into its structural body.
    pub(crate) fn lower_decl(&mut self, node: &TypeDeclNode) -> DeclBody {
        match node {
            TypeDeclNode::Interface(decl) => {
                let type_params = param_names(decl.type_params.as_deref());
                self.type_params = type_params.clone();
                let extends = decl
                    .extends
                    .iter()
                    .map(|e| self.lower_extends(e))
                    .collect();
                let members = decl
                    .body
                    .body
                    .iter()
                    .map(|el| self.lower_member(el))
                    .collect();
                self.type_params.clear();
                DeclBody::Interface {
                    type_params,
                    extends,
                    members,
                }
            }
            TypeDeclNode::Alias(decl) => {
                let type_params = param_names(decl.type_params.as_deref());
                self.type_params = type_params.clone();
                let target = self.lower_type(&decl.type_ann);
                self.type_params.clear();
                DeclBody::Alias {
                    type_params,
                    target,
                }
            }
            TypeDeclNode::Enum(decl) => {
                let members = decl
                    .members
                    .iter()
                    .map(|m| EnumMember {
                        name: match &m.id {
                            TsEnumMemberId::Ident(ident) => ident.sym.to_string(),
                            TsEnumMemberId::Str(s) => format!("\"{}\"", s.value.to_string_lossy()),
                        },
                        init: m.init.as_ref().map(|init| self.snippet(init.span())),
                    })
                    .collect();
                DeclBody::Enum { members }
            }
        }
    }

    /// Lower a `const` type annotation. Only a plain (possibly qualified)
    /// type reference without arguments can name a harvestable constant
    /// type; anything else never matches by identity.
    pub(crate) fn lower_const_ann(&mut self, ty: &TsType) -> Option<RefId> {
        let TsType::TsTypeRef(type_ref) = ty else {
            return None;
        };
        if type_ref.type_params.is_some() {
            return None;
        }
        let (qualifier, name) = entity_name(&type_ref.type_name);
        Some(self.add_ref(qualifier, name))
    }

    pub(crate) fn lower_type(&mut self, ty: &TsType) -> TypeExpr {
        match ty {
            TsType::TsKeywordType(keyword) => {
                TypeExpr::Keyword(keyword_text(keyword.kind).to_string())
            }
            TsType::TsThisType(_) => TypeExpr::Keyword("this".to_string()),
            TsType::TsTypeRef(type_ref) => {
                let (qualifier, name) = entity_name(&type_ref.type_name);
                let occ = self.add_ref(qualifier, name);
                let args = type_ref
                    .type_params
                    .as_ref()
                    .map(|params| params.params.iter().map(|p| self.lower_type(p)).collect())
                    .unwrap_or_default();
                TypeExpr::Ref { occ, args }
            }
            TsType::TsArrayType(array) => {
                TypeExpr::Array(Box::new(self.lower_type(&array.elem_type)))
            }
            TsType::TsTupleType(tuple) => TypeExpr::Tuple(
                tuple
                    .elem_types
                    .iter()
                    .map(|el| self.lower_type(&el.ty))
                    .collect(),
            ),
            TsType::TsUnionOrIntersectionType(u) => {
                use swc_ecma_ast::TsUnionOrIntersectionType::*;
                match u {
                    TsUnionType(union) => TypeExpr::Union(
                        union.types.iter().map(|t| self.lower_type(t)).collect(),
                    ),
                    TsIntersectionType(isect) => TypeExpr::Intersection(
                        isect.types.iter().map(|t| self.lower_type(t)).collect(),
                    ),
                }
            }
            TsType::TsParenthesizedType(paren) => {
                TypeExpr::Paren(Box::new(self.lower_type(&paren.type_ann)))
            }
            TsType::TsFnOrConstructorType(TsFnOrConstructorType::TsFnType(fn_type)) => {
                let added = param_names(fn_type.type_params.as_deref());
                let restore_at = self.type_params.len();
                self.type_params.extend(added);
                let params = fn_type
                    .params
                    .iter()
                    .map(|p| self.lower_fn_param(p))
                    .collect();
                let ret = Box::new(self.lower_type(&fn_type.type_ann.type_ann));
                self.type_params.truncate(restore_at);
                TypeExpr::Fn { params, ret }
            }
            TsType::TsTypeLit(lit) => TypeExpr::Object(
                lit.members.iter().map(|el| self.lower_member(el)).collect(),
            ),
            TsType::TsTypeOperator(op) => TypeExpr::Operator {
                op: match op.op {
                    TsTypeOperatorOp::KeyOf => "keyof".to_string(),
                    TsTypeOperatorOp::Unique => "unique".to_string(),
                    TsTypeOperatorOp::ReadOnly => "readonly".to_string(),
                },
                inner: Box::new(self.lower_type(&op.type_ann)),
            },
            TsType::TsIndexedAccessType(access) => TypeExpr::IndexedAccess {
                obj: Box::new(self.lower_type(&access.obj_type)),
                index: Box::new(self.lower_type(&access.index_type)),
            },
            TsType::TsLitType(lit) => match &lit.lit {
                // Template literal types can interpolate named types.
                TsLit::Tpl(_) => self.verbatim_type(ty),
                _ => TypeExpr::Lit(self.snippet(lit.span())),
            },
            // Conditional, mapped, infer, typeof, import types and the rest
            // carry through as written.
            other => self.verbatim_type(other),
        }
    }

    fn lower_extends(&mut self, clause: &TsExprWithTypeArgs) -> TypeExpr {
        let args: Vec<TypeExpr> = clause
            .type_args
            .as_ref()
            .map(|params| params.params.iter().map(|p| self.lower_type(p)).collect())
            .unwrap_or_default();
        match entity_from_expr(&clause.expr) {
            Some((qualifier, name)) => TypeExpr::Ref {
                occ: self.add_ref(qualifier, name),
                args,
            },
            None => {
                let mut refs = Vec::new();
                for arg in &args {
                    arg.for_each_ref(&mut |r| refs.push(r));
                }
                TypeExpr::Verbatim {
                    text: self.snippet(clause.span()),
                    refs,
                }
            }
        }
    }

    fn lower_member(&mut self, element: &TsTypeElement) -> Member {
        match element {
            TsTypeElement::TsPropertySignature(prop) => {
                if prop.computed {
                    return self.verbatim_member(element);
                }
                Member::Property {
                    name: self.snippet(prop.key.span()),
                    optional: prop.optional,
                    readonly: prop.readonly,
                    ty: prop
                        .type_ann
                        .as_ref()
                        .map(|ann| self.lower_type(&ann.type_ann)),
                }
            }
            TsTypeElement::TsMethodSignature(method) => {
                if method.computed {
                    return self.verbatim_member(element);
                }
                let added = param_names(method.type_params.as_deref());
                let restore_at = self.type_params.len();
                self.type_params.extend(added);
                let params = method
                    .params
                    .iter()
                    .map(|p| self.lower_fn_param(p))
                    .collect();
                let ret = method
                    .type_ann
                    .as_ref()
                    .map(|ann| self.lower_type(&ann.type_ann));
                self.type_params.truncate(restore_at);
                Member::Method {
                    name: self.snippet(method.key.span()),
                    optional: method.optional,
                    params,
                    ret,
                }
            }
            TsTypeElement::TsIndexSignature(index) => {
                let param = index
                    .params
                    .first()
                    .map(|p| self.lower_fn_param(p))
                    .unwrap_or(FnParam {
                        name: "key".to_string(),
                        optional: false,
                        ty: None,
                    });
                Member::Index {
                    param,
                    readonly: index.readonly,
                    ty: index
                        .type_ann
                        .as_ref()
                        .map(|ann| self.lower_type(&ann.type_ann)),
                }
            }
            // Getters, setters, call and construct signatures.
            other => self.verbatim_member(other),
        }
    }

    fn lower_fn_param(&mut self, param: &TsFnParam) -> FnParam {
        match param {
            TsFnParam::Ident(binding) => FnParam {
                name: binding.id.sym.to_string(),
                optional: binding.id.optional,
                ty: binding
                    .type_ann
                    .as_ref()
                    .map(|ann| self.lower_type(&ann.type_ann)),
            },
            TsFnParam::Rest(rest) => {
                let name = match rest.arg.as_ref() {
                    swc_ecma_ast::Pat::Ident(binding) => format!("...{}", binding.id.sym),
                    _ => "...args".to_string(),
                };
                FnParam {
                    name,
                    optional: false,
                    ty: rest
                        .type_ann
                        .as_ref()
                        .map(|ann| self.lower_type(&ann.type_ann)),
                }
            }
            _ => FnParam {
                name: "arg".to_string(),
                optional: false,
                ty: None,
            },
        }
    }
}

/// Collects every type-reference name in a subtree, in source order.
pub(crate) struct RefScan {
    names: Vec<(Option<String>, String)>,
}

impl Visit for RefScan {
    fn visit_ts_type_ref(&mut self, node: &TsTypeRef) {
        self.names.push(entity_name(&node.type_name));
        node.visit_children_with(self);
    }
}

fn param_names(decl: Option<&TsTypeParamDecl>) -> Vec<String> {
    decl.map(|d| d.params.iter().map(|p| p.name.sym.to_string()).collect())
        .unwrap_or_default()
}

fn keyword_text(kind: TsKeywordTypeKind) -> &'static str {
    match kind {
        TsKeywordTypeKind::TsAnyKeyword => "any",
        TsKeywordTypeKind::TsUnknownKeyword => "unknown",
        TsKeywordTypeKind::TsNumberKeyword => "number",
        TsKeywordTypeKind::TsObjectKeyword => "object",
        TsKeywordTypeKind::TsBooleanKeyword => "boolean",
        TsKeywordTypeKind::TsBigIntKeyword => "bigint",
        TsKeywordTypeKind::TsStringKeyword => "string",
        TsKeywordTypeKind::TsSymbolKeyword => "symbol",
        TsKeywordTypeKind::TsVoidKeyword => "void",
        TsKeywordTypeKind::TsUndefinedKeyword => "undefined",
        TsKeywordTypeKind::TsNullKeyword => "null",
        TsKeywordTypeKind::TsNeverKeyword => "never",
        TsKeywordTypeKind::TsIntrinsicKeyword => "intrinsic",
    }
}

/// Split a (possibly qualified) entity name into qualifier and final name:
/// `Color` -> (None, "Color"), `pal.colors.Shade` -> (Some("pal.colors"), "Shade").
fn entity_name(name: &TsEntityName) -> (Option<String>, String) {
    match name {
        TsEntityName::Ident(ident) => (None, ident.sym.to_string()),
        TsEntityName::TsQualifiedName(qualified) => (
            Some(entity_text(&qualified.left)),
            qualified.right.sym.to_string(),
        ),
    }
}

fn entity_text(name: &TsEntityName) -> String {
    match name {
        TsEntityName::Ident(ident) => ident.sym.to_string(),
        TsEntityName::TsQualifiedName(qualified) => {
            format!("{}.{}", entity_text(&qualified.left), qualified.right.sym)
        }
    }
}

fn entity_from_expr(expr: &Expr) -> Option<(Option<String>, String)> {
    match expr {
        Expr::Ident(ident) => Some((None, ident.sym.to_string())),
        Expr::Member(member) => {
            let name = member.prop.as_ident()?.sym.to_string();
            Some((Some(member_text(&member.obj)?), name))
        }
        _ => None,
    }
}

fn member_text(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Member(member) => Some(format!(
            "{}.{}",
            member_text(&member.obj)?,
            member.prop.as_ident()?.sym
        )),
        _ => None,
    }
}
