//! Nominal, generics-capable type model over an explicit declaration catalog.
//!
//! The crate models Java-style type expressions (raw classes, parameterized
//! types, arrays, wildcards, type variables) as a closed tagged union and
//! implements the resolution machinery on top of it: structural equality,
//! erasure, inheritance-graph walking, and substitution of type variables
//! against a context type (see [`generics`]).
//!
//! Declarations live in a read-only catalog behind the [`TypeEnv`] trait;
//! [`TypeStore`] is the in-memory implementation. The algorithms never mutate
//! the catalog and allocate only fresh values, so concurrent queries need no
//! coordination.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod error;
pub mod format;
pub mod generics;

pub use error::{Result, TypeError};
pub use format::TypeDisplay;
pub use generics::cascade::cascade_declarations;
pub use generics::hierarchy::{
    generic_supertypes, inheritance_tree, inheritance_tree_filtered, is_assignable,
};
pub use generics::resolve::{resolve_type, type_parameter_for_super};
pub use generics::synth::{parameterize_and_resolve, parameterize_raw_type, parameterized_type_of};

/// Identifier of a declaration in a [`TypeEnv`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclId(pub(crate) u32);

impl DeclId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclKind {
    Class,
    Interface,
}

/// A nominal type declaration: a class- or interface-like definition owning
/// zero or more type parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclDef {
    /// Binary name, e.g. `java.util.List` or `com.example.Outer$Inner`.
    pub name: String,
    pub kind: DeclKind,
    /// Names of the declaration's own type parameters, in declared order.
    pub type_params: Vec<String>,
    /// Generic superclass expression; `None` for interfaces and the top type.
    pub super_class: Option<Type>,
    /// Generic interface expressions, in declared order.
    pub interfaces: Vec<Type>,
    /// Enclosing declaration, for nested types.
    pub enclosing: Option<DeclId>,
}

/// Declarations the algorithms need to be able to name.
#[derive(Clone, Copy, Debug)]
pub struct WellKnownDecls {
    /// The universal top type, `java.lang.Object`.
    pub object: DeclId,
}

/// Read-only declaration catalog.
///
/// The algorithms in this crate only ever read the catalog; implementations
/// are expected to be cheap to query repeatedly. Missing entries are treated
/// as leaves, never as errors.
pub trait TypeEnv {
    fn decl(&self, id: DeclId) -> Option<&DeclDef>;
    fn lookup_decl(&self, name: &str) -> Option<DeclId>;
    fn well_known(&self) -> &WellKnownDecls;
}

/// A (possibly generic) type expression.
///
/// Equality is structural and closed-world: expressions of distinct variants
/// are never equal. In particular a [`Type::Raw`] is never equal to a
/// [`Type::Parameterized`] over the same declaration even though [`erasure`]
/// unifies the two; callers wanting the raw-only view must erase first.
/// Variables compare by declaring declaration and name (see
/// [`TypeVariable`]).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    /// A nominal type with no type arguments.
    Raw(DeclId),
    Parameterized(ParameterizedType),
    /// An array over a component type, which may itself be generic.
    Array(Box<Type>),
    Wildcard(WildcardType),
    Variable(TypeVariable),
}

/// A generic type applied to arguments, e.g. `Map<String, Integer>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterizedType {
    /// Enclosing type expression for nested declarations.
    pub owner: Option<Box<Type>>,
    pub raw: DeclId,
    /// Type arguments, in declared order. Never reordered.
    pub args: Vec<Type>,
}

/// A wildcard, e.g. `?`, `? extends Number` or `? super Integer`.
///
/// The language admits at most one lower bound, but the model keeps both
/// bound lists general.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildcardType {
    pub upper_bounds: Vec<Type>,
    pub lower_bounds: Vec<Type>,
}

/// A type variable, bound to a parameter position of a specific declaration.
#[derive(Clone, Debug, Eq, Serialize, Deserialize)]
pub struct TypeVariable {
    pub declared_by: DeclId,
    /// Position within the declaring declaration's type-parameter list.
    pub index: usize,
    pub name: String,
}

impl PartialEq for TypeVariable {
    fn eq(&self, other: &Self) -> bool {
        // Position is deliberately not compared: cascaded resolution can
        // re-derive the same variable from different argument positions
        // along different supertypes.
        self.declared_by == other.declared_by && self.name == other.name
    }
}

impl Type {
    /// A bare nominal reference to `decl`.
    pub fn raw(decl: DeclId) -> Type {
        Type::Raw(decl)
    }

    /// A parameterized reference with no owner.
    pub fn parameterized(raw: DeclId, args: Vec<Type>) -> Type {
        Type::Parameterized(ParameterizedType {
            owner: None,
            raw,
            args,
        })
    }

    /// An array over `component`.
    pub fn array(component: Type) -> Type {
        Type::Array(Box::new(component))
    }

    /// The type variable at `index` of `declared_by`.
    pub fn variable(declared_by: DeclId, index: usize, name: impl Into<String>) -> Type {
        Type::Variable(TypeVariable {
            declared_by,
            index,
            name: name.into(),
        })
    }

    /// `? extends bound`.
    pub fn wildcard_extends(bound: Type) -> Type {
        Type::Wildcard(WildcardType {
            upper_bounds: vec![bound],
            lower_bounds: Vec::new(),
        })
    }

    /// The type argument at `index`, if this is a parameterized expression
    /// with at least `index + 1` arguments.
    pub fn type_argument(&self, index: usize) -> Option<&Type> {
        match self {
            Type::Parameterized(parameterized) => parameterized.args.get(index),
            _ => None,
        }
    }

    /// Java-like rendering of this expression against `env`.
    pub fn display<'a>(&'a self, env: &'a dyn TypeEnv) -> TypeDisplay<'a> {
        TypeDisplay { env, ty: self }
    }
}

/// Type erasure (JLS 4.6): reduce `ty` to its raw form.
///
/// Arrays erase to an array over the erased component; a wildcard erases to
/// the erasure of its first upper bound. Forms with no reachable declaration
/// erase to the top type.
pub fn erasure(env: &dyn TypeEnv, ty: &Type) -> Type {
    match ty {
        Type::Raw(id) => Type::Raw(*id),
        Type::Parameterized(parameterized) => Type::Raw(parameterized.raw),
        Type::Array(component) => Type::Array(Box::new(erasure(env, component))),
        Type::Wildcard(wildcard) => match wildcard.upper_bounds.first() {
            Some(upper) => erasure(env, upper),
            None => Type::Raw(env.well_known().object),
        },
        Type::Variable(_) => Type::Raw(env.well_known().object),
    }
}

/// The declaration underlying the erasure of `ty`.
///
/// Arrays yield the top type's declaration: the catalog holds no array
/// declarations, and an array's supertype chain starts at the top type.
pub fn erased_decl(env: &dyn TypeEnv, ty: &Type) -> DeclId {
    match ty {
        Type::Raw(id) => *id,
        Type::Parameterized(parameterized) => parameterized.raw,
        Type::Array(_) => env.well_known().object,
        Type::Wildcard(wildcard) => match wildcard.upper_bounds.first() {
            Some(upper) => erased_decl(env, upper),
            None => env.well_known().object,
        },
        Type::Variable(_) => env.well_known().object,
    }
}

/// In-memory [`TypeEnv`] implementation.
#[derive(Clone, Debug)]
pub struct TypeStore {
    decls: Vec<DeclDef>,
    by_name: HashMap<String, DeclId>,
    well_known: WellKnownDecls,
}

impl TypeStore {
    /// A store containing only the top type, `java.lang.Object`.
    pub fn new() -> Self {
        let mut store = TypeStore {
            decls: Vec::new(),
            by_name: HashMap::new(),
            well_known: WellKnownDecls { object: DeclId(0) },
        };
        let object = store.add_decl(DeclDef {
            name: "java.lang.Object".to_string(),
            kind: DeclKind::Class,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            enclosing: None,
        });
        store.well_known = WellKnownDecls { object };
        store
    }

    /// A store pre-populated with a small JDK core, for tests and examples.
    pub fn with_minimal_jdk() -> Self {
        let mut store = TypeStore::new();
        let object = store.well_known.object;

        let serializable = store.add_decl(DeclDef {
            name: "java.io.Serializable".to_string(),
            kind: DeclKind::Interface,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            enclosing: None,
        });

        let comparable = store.add_decl(DeclDef {
            name: "java.lang.Comparable".to_string(),
            kind: DeclKind::Interface,
            type_params: vec!["T".to_string()],
            super_class: None,
            interfaces: Vec::new(),
            enclosing: None,
        });

        let number = store.add_decl(DeclDef {
            name: "java.lang.Number".to_string(),
            kind: DeclKind::Class,
            type_params: Vec::new(),
            super_class: Some(Type::raw(object)),
            interfaces: vec![Type::raw(serializable)],
            enclosing: None,
        });

        let string = store.intern_decl_id("java.lang.String");
        store.define_decl(
            string,
            DeclDef {
                name: "java.lang.String".to_string(),
                kind: DeclKind::Class,
                type_params: Vec::new(),
                super_class: Some(Type::raw(object)),
                interfaces: vec![
                    Type::raw(serializable),
                    Type::parameterized(comparable, vec![Type::raw(string)]),
                ],
                enclosing: None,
            },
        );

        let integer = store.intern_decl_id("java.lang.Integer");
        store.define_decl(
            integer,
            DeclDef {
                name: "java.lang.Integer".to_string(),
                kind: DeclKind::Class,
                type_params: Vec::new(),
                super_class: Some(Type::raw(number)),
                interfaces: vec![Type::parameterized(comparable, vec![Type::raw(integer)])],
                enclosing: None,
            },
        );

        let iterable = store.add_decl(DeclDef {
            name: "java.lang.Iterable".to_string(),
            kind: DeclKind::Interface,
            type_params: vec!["T".to_string()],
            super_class: None,
            interfaces: Vec::new(),
            enclosing: None,
        });

        let collection = store.intern_decl_id("java.util.Collection");
        store.define_decl(
            collection,
            DeclDef {
                name: "java.util.Collection".to_string(),
                kind: DeclKind::Interface,
                type_params: vec!["E".to_string()],
                super_class: None,
                interfaces: vec![Type::parameterized(
                    iterable,
                    vec![Type::variable(collection, 0, "E")],
                )],
                enclosing: None,
            },
        );

        let list = store.intern_decl_id("java.util.List");
        store.define_decl(
            list,
            DeclDef {
                name: "java.util.List".to_string(),
                kind: DeclKind::Interface,
                type_params: vec!["E".to_string()],
                super_class: None,
                interfaces: vec![Type::parameterized(
                    collection,
                    vec![Type::variable(list, 0, "E")],
                )],
                enclosing: None,
            },
        );

        store
    }

    /// Registers `def`, returning its id.
    pub fn add_decl(&mut self, def: DeclDef) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.by_name.insert(def.name.clone(), id);
        self.decls.push(def);
        id
    }

    /// Allocates (or returns) the id for `name` without defining it.
    ///
    /// Pair with [`TypeStore::define_decl`] so self- and mutually-referential
    /// declarations can be constructed.
    pub fn intern_decl_id(&mut self, name: &str) -> DeclId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        self.add_decl(DeclDef {
            name: name.to_string(),
            kind: DeclKind::Class,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            enclosing: None,
        })
    }

    /// Replaces the definition behind a previously interned id.
    pub fn define_decl(&mut self, id: DeclId, def: DeclDef) {
        self.by_name.insert(def.name.clone(), id);
        if let Some(slot) = self.decls.get_mut(id.index()) {
            *slot = def;
        }
    }

    pub fn decl_mut(&mut self, id: DeclId) -> Option<&mut DeclDef> {
        self.decls.get_mut(id.index())
    }
}

impl Default for TypeStore {
    fn default() -> Self {
        TypeStore::new()
    }
}

impl TypeEnv for TypeStore {
    fn decl(&self, id: DeclId) -> Option<&DeclDef> {
        self.decls.get(id.index())
    }

    fn lookup_decl(&self, name: &str) -> Option<DeclId> {
        self.by_name.get(name).copied()
    }

    fn well_known(&self) -> &WellKnownDecls {
        &self.well_known
    }
}
