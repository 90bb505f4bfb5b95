//! Structural declaration bodies.
//!
//! These types are the closed, tagged representation of "the shape of a
//! declaration" that the pipeline operates on: the closure walker scans them
//! for named references, and the emitter prints them back out as TypeScript
//! source. They deliberately carry no behavior (no method bodies, no
//! initializers other than verbatim text) - only shape.
//!
//! Every position where a named type can appear holds a [`RefId`], which
//! addresses an occurrence record in the symbol table. Resolution is asked
//! per occurrence, so the same written name in two different modules can
//! resolve to two different symbols.

/// Identifies one written reference occurrence inside a declaration body.
///
/// Allocated by the symbol table while lowering swc types; stable for the
/// lifetime of one extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefId(pub(crate) u32);

impl RefId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A parameter of a function type or interface method.
#[derive(Debug, Clone)]
pub struct FnParam {
    pub name: String,
    pub optional: bool,
    pub ty: Option<TypeExpr>,
}

/// One member of an interface or inline object type.
#[derive(Debug, Clone)]
pub enum Member {
    Property {
        name: String,
        optional: bool,
        readonly: bool,
        ty: Option<TypeExpr>,
    },
    Method {
        name: String,
        optional: bool,
        params: Vec<FnParam>,
        ret: Option<TypeExpr>,
    },
    /// Index signature: `[key: string]: T`.
    Index {
        param: FnParam,
        readonly: bool,
        ty: Option<TypeExpr>,
    },
    /// Member kinds the printer reproduces verbatim (getters, setters,
    /// call/construct signatures, computed keys). References found inside
    /// still join the closure, but the text is printed as written, so a
    /// renamed target keeps its source name here.
    Verbatim { text: String, refs: Vec<RefId> },
}

/// An enum member with its initializer kept as written.
#[derive(Debug, Clone)]
pub struct EnumMember {
    pub name: String,
    pub init: Option<String>,
}

/// A type expression, covering every syntactic position a named type can
/// occupy. Unsupported constructs degrade to [`TypeExpr::Verbatim`] and are
/// emitted unchanged.
#[derive(Debug, Clone)]
pub enum TypeExpr {
    /// A (possibly qualified) reference to a named type, with type
    /// arguments: `Color`, `pal.Palette`, `Map<Color, string>`.
    Ref { occ: RefId, args: Vec<TypeExpr> },
    /// `T[]`
    Array(Box<TypeExpr>),
    /// `[A, B]`
    Tuple(Vec<TypeExpr>),
    /// `A | B`
    Union(Vec<TypeExpr>),
    /// `A & B`
    Intersection(Vec<TypeExpr>),
    /// `(T)`
    Paren(Box<TypeExpr>),
    /// `(a: A, b?: B) => R`
    Fn {
        params: Vec<FnParam>,
        ret: Box<TypeExpr>,
    },
    /// Inline object literal type: `{ a: A; b?: B }`
    Object(Vec<Member>),
    /// `keyof T`, `readonly T`, `unique T`
    Operator { op: String, inner: Box<TypeExpr> },
    /// `T[K]`
    IndexedAccess {
        obj: Box<TypeExpr>,
        index: Box<TypeExpr>,
    },
    /// Keyword type: `string`, `number`, ...
    Keyword(String),
    /// Literal type, kept exactly as written: `"red"`, `0`, `true`.
    Lit(String),
    /// Source text carried through unchanged (conditional, mapped, typeof,
    /// import types, ...). References found inside still join the closure,
    /// but the text is printed as written, so a renamed target keeps its
    /// source name here.
    Verbatim { text: String, refs: Vec<RefId> },
}

/// The structural body of a named type declaration.
#[derive(Debug, Clone)]
pub enum DeclBody {
    /// `type X<T> = ...`
    Alias {
        type_params: Vec<String>,
        target: TypeExpr,
    },
    /// `interface X<T> extends A, B { ... }`
    Interface {
        type_params: Vec<String>,
        extends: Vec<TypeExpr>,
        members: Vec<Member>,
    },
    /// `enum X { A = 0, ... }` - a leaf; enum members reference no types.
    Enum { members: Vec<EnumMember> },
}

impl DeclBody {
    /// Visit every reference occurrence in this body, in source order.
    ///
    /// Source order matters: the closure walker registers newly discovered
    /// symbols in the order this produces, which fixes collision suffixes
    /// deterministically.
    pub fn for_each_ref(&self, f: &mut impl FnMut(RefId)) {
        match self {
            DeclBody::Alias { target, .. } => target.for_each_ref(f),
            DeclBody::Interface {
                extends, members, ..
            } => {
                for e in extends {
                    e.for_each_ref(f);
                }
                for m in members {
                    m.for_each_ref(f);
                }
            }
            DeclBody::Enum { .. } => {}
        }
    }
}

impl Member {
    fn for_each_ref(&self, f: &mut impl FnMut(RefId)) {
        match self {
            Member::Property { ty, .. } => {
                if let Some(ty) = ty {
                    ty.for_each_ref(f);
                }
            }
            Member::Method { params, ret, .. } => {
                for p in params {
                    if let Some(ty) = &p.ty {
                        ty.for_each_ref(f);
                    }
                }
                if let Some(ret) = ret {
                    ret.for_each_ref(f);
                }
            }
            Member::Index { param, ty, .. } => {
                if let Some(key) = &param.ty {
                    key.for_each_ref(f);
                }
                if let Some(ty) = ty {
                    ty.for_each_ref(f);
                }
            }
            Member::Verbatim { refs, .. } => {
                for r in refs {
                    f(*r);
                }
            }
        }
    }
}

impl TypeExpr {
    pub fn for_each_ref(&self, f: &mut impl FnMut(RefId)) {
        match self {
            TypeExpr::Ref { occ, args } => {
                f(*occ);
                for a in args {
                    a.for_each_ref(f);
                }
            }
            TypeExpr::Array(inner) | TypeExpr::Paren(inner) => inner.for_each_ref(f),
            TypeExpr::Tuple(items) | TypeExpr::Union(items) | TypeExpr::Intersection(items) => {
                for item in items {
                    item.for_each_ref(f);
                }
            }
            TypeExpr::Fn { params, ret } => {
                for p in params {
                    if let Some(ty) = &p.ty {
                        ty.for_each_ref(f);
                    }
                }
                ret.for_each_ref(f);
            }
            TypeExpr::Object(members) => {
                for m in members {
                    m.for_each_ref(f);
                }
            }
            TypeExpr::Operator { inner, .. } => inner.for_each_ref(f),
            TypeExpr::IndexedAccess { obj, index } => {
                obj.for_each_ref(f);
                index.for_each_ref(f);
            }
            TypeExpr::Verbatim { refs, .. } => {
                for r in refs {
                    f(*r);
                }
            }
            TypeExpr::Keyword(_) | TypeExpr::Lit(_) => {}
        }
    }
}
