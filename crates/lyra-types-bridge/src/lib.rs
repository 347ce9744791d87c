#![forbid(unsafe_code)]

//! Materializes external declaration stubs into a [`TypeStore`].
//!
//! A [`DeclProvider`] hands out [`DeclStub`]s by binary name; [`DeclLoader`]
//! converts them into catalog definitions on demand, following references
//! transitively. Loading is cycle-safe: the id for a declaration is interned
//! before its definition is built, so self- and mutually-referential
//! hierarchies (`Node implements Ord<Node>`) resolve to the in-progress id.
//!
//! Names that fail to resolve are dropped rather than reported; the drops
//! are visible on the `tracing` `debug` level.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use lyra_types::{
    DeclDef, DeclId, DeclKind, ParameterizedType, Type, TypeEnv, TypeStore, TypeVariable,
    WildcardType,
};

/// Structured type reference carried by declaration stubs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeRef {
    /// A nominal reference by binary name.
    Named(String),
    /// A parameterized reference.
    Generic { name: String, args: Vec<TypeRef> },
    /// A type variable of the declaration under construction.
    Variable(String),
    Array(Box<TypeRef>),
    /// `? extends T`.
    Extends(Box<TypeRef>),
    /// `? super T`.
    Super(Box<TypeRef>),
    /// `?`.
    Any,
}

/// External shape of a declaration, as produced by a [`DeclProvider`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclStub {
    pub name: String,
    pub kind: DeclKind,
    pub type_params: Vec<String>,
    pub super_class: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub enclosing: Option<String>,
}

/// Source of declaration stubs, keyed by binary name.
pub trait DeclProvider {
    fn lookup_decl(&self, binary_name: &str) -> Option<DeclStub>;
}

/// Loads provider stubs into a [`TypeStore`] on demand.
pub struct DeclLoader<'a> {
    pub store: &'a mut TypeStore,
    pub provider: &'a dyn DeclProvider,
    in_progress: HashSet<String>,
    loaded: HashSet<String>,
}

impl<'a> DeclLoader<'a> {
    pub fn new(store: &'a mut TypeStore, provider: &'a dyn DeclProvider) -> Self {
        Self {
            store,
            provider,
            in_progress: HashSet::new(),
            loaded: HashSet::new(),
        }
    }

    /// Ensure `binary_name` is present in the store; returns its id if
    /// found or loaded.
    pub fn ensure_decl(&mut self, binary_name: &str) -> Option<DeclId> {
        if self.loaded.contains(binary_name) || self.in_progress.contains(binary_name) {
            return self.store.lookup_decl(binary_name);
        }

        let existing = self.store.lookup_decl(binary_name);
        let Some(stub) = self.provider.lookup_decl(binary_name) else {
            return existing;
        };

        let id = self.store.intern_decl_id(binary_name);
        self.in_progress.insert(binary_name.to_string());

        let def = self.build_decl_def(id, &stub);
        self.store.define_decl(id, def);

        self.in_progress.remove(binary_name);
        self.loaded.insert(binary_name.to_string());

        Some(id)
    }

    fn build_decl_def(&mut self, id: DeclId, stub: &DeclStub) -> DeclDef {
        let super_class = match stub.kind {
            DeclKind::Interface => None,
            DeclKind::Class => stub
                .super_class
                .as_ref()
                .map(|reference| self.type_ref(reference, id, &stub.type_params)),
        };
        let interfaces = stub
            .interfaces
            .iter()
            .map(|reference| self.type_ref(reference, id, &stub.type_params))
            .collect();
        let enclosing = stub
            .enclosing
            .as_deref()
            .and_then(|name| self.ensure_decl(name));

        DeclDef {
            name: stub.name.clone(),
            kind: stub.kind,
            type_params: stub.type_params.clone(),
            super_class,
            interfaces,
            enclosing,
        }
    }

    fn type_ref(&mut self, reference: &TypeRef, declared_by: DeclId, type_params: &[String]) -> Type {
        match reference {
            TypeRef::Named(name) => self.named(name),
            TypeRef::Generic { name, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.type_ref(arg, declared_by, type_params))
                    .collect();
                match self.ensure_decl(name) {
                    Some(raw) => Type::Parameterized(ParameterizedType {
                        owner: None,
                        raw,
                        args,
                    }),
                    None => {
                        debug!(name = %name, "degrading unresolved generic reference to the top type");
                        Type::Raw(self.store.well_known().object)
                    }
                }
            }
            TypeRef::Variable(name) => match type_params.iter().position(|param| param == name) {
                Some(index) => Type::Variable(TypeVariable {
                    declared_by,
                    index,
                    name: name.clone(),
                }),
                None => {
                    debug!(name = %name, "degrading unknown type variable to the top type");
                    Type::Raw(self.store.well_known().object)
                }
            },
            TypeRef::Array(component) => Type::Array(Box::new(self.type_ref(
                component,
                declared_by,
                type_params,
            ))),
            TypeRef::Extends(bound) => Type::Wildcard(WildcardType {
                upper_bounds: vec![self.type_ref(bound, declared_by, type_params)],
                lower_bounds: Vec::new(),
            }),
            TypeRef::Super(bound) => Type::Wildcard(WildcardType {
                upper_bounds: vec![Type::Raw(self.store.well_known().object)],
                lower_bounds: vec![self.type_ref(bound, declared_by, type_params)],
            }),
            TypeRef::Any => Type::Wildcard(WildcardType {
                upper_bounds: vec![Type::Raw(self.store.well_known().object)],
                lower_bounds: Vec::new(),
            }),
        }
    }

    fn named(&mut self, name: &str) -> Type {
        match self.ensure_decl(name) {
            Some(id) => Type::Raw(id),
            None => {
                debug!(name = %name, "degrading unresolved reference to the top type");
                Type::Raw(self.store.well_known().object)
            }
        }
    }
}

/// Bulk form of [`DeclLoader::ensure_decl`]: resolves every name in `names`
/// into a set of declarations, dropping the ones that fail to resolve.
///
/// Lookups are independent and the aggregation is order-insensitive, so the
/// contract permits a parallel implementation.
pub fn load_declarations<I, S>(
    store: &mut TypeStore,
    provider: &dyn DeclProvider,
    names: I,
) -> HashSet<DeclId>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut loader = DeclLoader::new(store, provider);
    let mut out = HashSet::new();
    for name in names {
        let name = name.as_ref();
        match loader.ensure_decl(name) {
            Some(id) => {
                out.insert(id);
            }
            None => debug!(name = %name, "dropping declaration that failed to resolve"),
        }
    }
    out
}
