//! Cascading a type variable's declaration across the inheritance hierarchy.

use crate::error::{Result, TypeError};
use crate::{DeclId, Type, TypeEnv, TypeVariable};

use super::hierarchy::generic_supertypes;
use super::MAX_SUPERTYPE_DEPTH;

/// Every `(declaration, position)` pair through which `variable`'s binding
/// flows across the inheritance hierarchy.
///
/// The declaring declaration and its own position come first. For each
/// direct generic supertype (superclass, then interfaces) whose argument
/// list forwards the variable at some position, the recursion on that
/// supertype is spliced in. A variable forwarded unchanged, renamed, or
/// fixed to a concrete type by an intermediate ancestor is all captured by
/// where the pairs stop.
pub fn cascade_declarations(
    env: &dyn TypeEnv,
    variable: &TypeVariable,
) -> Result<Vec<(DeclId, usize)>> {
    let mut out = Vec::new();
    cascade(env, variable.declared_by, variable.index, 0, &mut out)?;
    Ok(out)
}

fn cascade(
    env: &dyn TypeEnv,
    decl: DeclId,
    index: usize,
    depth: usize,
    out: &mut Vec<(DeclId, usize)>,
) -> Result<()> {
    if depth > MAX_SUPERTYPE_DEPTH {
        return Err(TypeError::DepthLimitExceeded {
            limit: MAX_SUPERTYPE_DEPTH,
        });
    }

    out.push((decl, index));

    let Some(def) = env.decl(decl) else {
        return Ok(());
    };
    // Re-derive the variable from the catalog at this level; the position
    // alone identifies it within its declaring declaration.
    let Some(name) = def.type_params.get(index) else {
        return Ok(());
    };
    let variable = Type::variable(decl, index, name.clone());

    for supertype in generic_supertypes(def) {
        let Type::Parameterized(supertype) = supertype else {
            continue;
        };
        let Some(position) = supertype.args.iter().position(|arg| *arg == variable) else {
            continue;
        };
        cascade(env, supertype.raw, position, depth + 1, out)?;
    }

    Ok(())
}
