//! Constructors for type expressions not backed by a source declaration.

use crate::error::Result;
use crate::{DeclId, ParameterizedType, Type, TypeEnv};

use super::resolve::resolve_type;

/// A `Parameterized` expression over `raw`.
///
/// An absent owner is derived from the raw declaration's enclosing
/// declaration, so synthesized nested types stay addressable.
pub fn parameterized_type_of(
    env: &dyn TypeEnv,
    owner: Option<Type>,
    args: Vec<Type>,
    raw: DeclId,
) -> Type {
    let owner = owner.or_else(|| env.decl(raw).and_then(|def| def.enclosing).map(Type::Raw));
    Type::Parameterized(ParameterizedType {
        owner: owner.map(Box::new),
        raw,
        args,
    })
}

/// A parameterized view of `raw` whose arguments are the declaration's own
/// type variables, with the enclosing declaration recursively parameterized
/// as the owner. A declaration without type parameters is returned as its
/// raw form unchanged.
pub fn parameterize_raw_type(env: &dyn TypeEnv, raw: DeclId) -> Type {
    let Some(def) = env.decl(raw) else {
        return Type::Raw(raw);
    };
    if def.type_params.is_empty() {
        return Type::Raw(raw);
    }

    let args = def
        .type_params
        .iter()
        .enumerate()
        .map(|(index, name)| Type::variable(raw, index, name.clone()))
        .collect();
    let owner = def
        .enclosing
        .map(|enclosing| parameterize_raw_type(env, enclosing));

    Type::Parameterized(ParameterizedType {
        owner: owner.map(Box::new),
        raw,
        args,
    })
}

/// [`parameterize_raw_type`] composed with the substitution engine: `raw`
/// viewed from `context`, e.g. `List<String>` for the `List` declaration
/// when the context binds `E = String`.
pub fn parameterize_and_resolve(env: &dyn TypeEnv, context: &Type, raw: DeclId) -> Result<Type> {
    let parameterized = parameterize_raw_type(env, raw);
    Ok(resolve_type(env, context, &parameterized)?.into_owned())
}
