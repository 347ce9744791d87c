//! Resolution of type variables against a context type.

use std::borrow::Cow;

use crate::error::{Result, TypeError};
use crate::format::decl_name;
use crate::{erased_decl, DeclId, DeclKind, Type, TypeEnv, TypeVariable, WildcardType};

use super::cascade::cascade_declarations;
use super::hierarchy::is_assignable;
use super::synth::parameterized_type_of;
use super::MAX_SUPERTYPE_DEPTH;

/// The concrete type argument bound to parameter `index` of `ancestor`, as
/// seen from `target`.
///
/// `ancestor` must be an ancestor-or-self of `target`'s erasure; anything
/// else is a contract violation and fails with
/// [`TypeError::NotASupertype`]. `Ok(None)` means the ancestor is reached
/// through a raw usage somewhere along the path, which erases the parameter
/// entirely.
pub fn type_parameter_for_super(
    env: &dyn TypeEnv,
    target: &Type,
    ancestor: DeclId,
    index: usize,
) -> Result<Option<Type>> {
    for_super(env, target, ancestor, index, 0)
}

fn for_super(
    env: &dyn TypeEnv,
    target: &Type,
    ancestor: DeclId,
    index: usize,
    depth: usize,
) -> Result<Option<Type>> {
    let target_decl = erased_decl(env, target);
    if !is_assignable(env, ancestor, target_decl) {
        return Err(TypeError::NotASupertype {
            ancestor: decl_name(env, ancestor),
            target: decl_name(env, target_decl),
        });
    }

    match env.decl(ancestor).map(|def| def.kind) {
        Some(DeclKind::Interface) => for_super_interface(env, target, ancestor, index, depth),
        _ => for_super_class(env, target, ancestor, index, depth),
    }
}

/// Walk the superclass chain, re-resolving each generic superclass
/// expression against the current target, until the erasure matches.
fn for_super_class(
    env: &dyn TypeEnv,
    target: &Type,
    ancestor: DeclId,
    index: usize,
    mut depth: usize,
) -> Result<Option<Type>> {
    let object = env.well_known().object;
    let mut target = Cow::Borrowed(target);
    let mut target_decl = erased_decl(env, &target);

    while target_decl != object {
        if depth > MAX_SUPERTYPE_DEPTH {
            return Err(TypeError::DepthLimitExceeded {
                limit: MAX_SUPERTYPE_DEPTH,
            });
        }
        depth += 1;

        if target_decl == ancestor {
            return Ok(target.type_argument(index).cloned());
        }

        let Some(super_class) = env.decl(target_decl).and_then(|def| def.super_class.as_ref())
        else {
            break;
        };
        let resolved = resolve_type_at(env, &target, super_class, depth)?.into_owned();
        target = Cow::Owned(resolved);
        target_decl = erased_decl(env, &target);
    }

    Ok(None)
}

/// Depth-first search through the supertype graph: the resolved superclass
/// first (unless it is the top type), then each resolved interface in
/// declared order; the first bound argument wins.
fn for_super_interface(
    env: &dyn TypeEnv,
    target: &Type,
    ancestor: DeclId,
    index: usize,
    depth: usize,
) -> Result<Option<Type>> {
    if depth > MAX_SUPERTYPE_DEPTH {
        return Err(TypeError::DepthLimitExceeded {
            limit: MAX_SUPERTYPE_DEPTH,
        });
    }

    let object = env.well_known().object;
    let target_decl = erased_decl(env, target);

    if target_decl == object {
        return Ok(None);
    }
    if target_decl == ancestor {
        return Ok(target.type_argument(index).cloned());
    }

    let Some(def) = env.decl(target_decl) else {
        return Ok(None);
    };

    if let Some(super_class) = &def.super_class {
        let resolved = resolve_type_at(env, target, super_class, depth + 1)?;
        if *resolved != Type::Raw(object) {
            if let Some(found) =
                for_super_interface(env, resolved.as_ref(), ancestor, index, depth + 1)?
            {
                return Ok(Some(found));
            }
        }
    }

    for interface in &def.interfaces {
        let resolved = resolve_type_at(env, target, interface, depth + 1)?;
        if let Some(found) =
            for_super_interface(env, resolved.as_ref(), ancestor, index, depth + 1)?
        {
            return Ok(Some(found));
        }
    }

    Ok(None)
}

/// Rewrites `ty`, replacing every type variable with its binding under
/// `context`. Variables with no binding reachable from the context resolve
/// to the top type.
///
/// When nothing in `ty` needed resolution the input is returned borrowed,
/// not rebuilt: callers compare against the original to detect whether any
/// contextual resolution happened at all, and rely on the unchanged result
/// being the same instance.
pub fn resolve_type<'a>(env: &dyn TypeEnv, context: &Type, ty: &'a Type) -> Result<Cow<'a, Type>> {
    resolve_type_at(env, context, ty, 0)
}

fn resolve_type_at<'a>(
    env: &dyn TypeEnv,
    context: &Type,
    ty: &'a Type,
    depth: usize,
) -> Result<Cow<'a, Type>> {
    if depth > MAX_SUPERTYPE_DEPTH {
        return Err(TypeError::DepthLimitExceeded {
            limit: MAX_SUPERTYPE_DEPTH,
        });
    }

    match ty {
        Type::Variable(variable) => {
            let Some(resolved) = resolve_type_variable(env, context, variable, depth)? else {
                // The variable surfaces through a raw usage; it is erased.
                return Ok(Cow::Owned(Type::Raw(env.well_known().object)));
            };
            if matches!(&resolved, Type::Variable(v) if v == variable) {
                return Ok(Cow::Borrowed(ty));
            }
            // The located argument may itself be a variable one level
            // removed; resolve it in turn.
            let resolved = resolve_type_at(env, context, &resolved, depth + 1)?.into_owned();
            Ok(Cow::Owned(resolved))
        }
        Type::Parameterized(parameterized) => {
            let owner = match &parameterized.owner {
                Some(owner) => Some(resolve_type_at(env, context, owner, depth + 1)?),
                None => None,
            };
            let args = parameterized
                .args
                .iter()
                .map(|arg| resolve_type_at(env, context, arg, depth + 1))
                .collect::<Result<Vec<_>>>()?;

            let owner_changed = match (&owner, &parameterized.owner) {
                (Some(resolved), Some(original)) => resolved.as_ref() != original.as_ref(),
                _ => false,
            };
            let changed = owner_changed
                || args
                    .iter()
                    .zip(&parameterized.args)
                    .any(|(resolved, arg)| resolved.as_ref() != arg);
            if !changed {
                return Ok(Cow::Borrowed(ty));
            }

            Ok(Cow::Owned(parameterized_type_of(
                env,
                owner.map(Cow::into_owned),
                args.into_iter().map(Cow::into_owned).collect(),
                parameterized.raw,
            )))
        }
        Type::Array(component) => {
            let resolved = resolve_type_at(env, context, component, depth + 1)?;
            if resolved.as_ref() == component.as_ref() {
                return Ok(Cow::Borrowed(ty));
            }
            Ok(Cow::Owned(Type::Array(Box::new(resolved.into_owned()))))
        }
        Type::Wildcard(wildcard) => {
            let upper_bounds = wildcard
                .upper_bounds
                .iter()
                .map(|bound| resolve_type_at(env, context, bound, depth + 1))
                .collect::<Result<Vec<_>>>()?;
            let lower_bounds = wildcard
                .lower_bounds
                .iter()
                .map(|bound| resolve_type_at(env, context, bound, depth + 1))
                .collect::<Result<Vec<_>>>()?;

            let changed = upper_bounds
                .iter()
                .zip(&wildcard.upper_bounds)
                .any(|(resolved, bound)| resolved.as_ref() != bound)
                || lower_bounds
                    .iter()
                    .zip(&wildcard.lower_bounds)
                    .any(|(resolved, bound)| resolved.as_ref() != bound);
            if !changed {
                return Ok(Cow::Borrowed(ty));
            }

            Ok(Cow::Owned(Type::Wildcard(WildcardType {
                upper_bounds: upper_bounds.into_iter().map(Cow::into_owned).collect(),
                lower_bounds: lower_bounds.into_iter().map(Cow::into_owned).collect(),
            })))
        }
        Type::Raw(_) => Ok(Cow::Borrowed(ty)),
    }
}

/// The binding of `variable` under `context`: the first cascaded
/// declaration assignable from the context's erasure, queried for its
/// super-parameter.
///
/// `Ok(None)` means the binding is erased by a raw usage. A variable whose
/// cascaded declarations are all unreachable from the context resolves to
/// the top type outright.
fn resolve_type_variable(
    env: &dyn TypeEnv,
    context: &Type,
    variable: &TypeVariable,
    depth: usize,
) -> Result<Option<Type>> {
    let context_decl = erased_decl(env, context);

    let cascaded = cascade_declarations(env, variable)?;
    let Some((declaration, index)) = cascaded
        .into_iter()
        .find(|(declaration, _)| is_assignable(env, *declaration, context_decl))
    else {
        return Ok(Some(Type::Raw(env.well_known().object)));
    };

    for_super(env, context, declaration, index, depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeclDef, DeclKind, TypeStore};
    use pretty_assertions::assert_eq;

    fn class_def(
        name: &str,
        type_params: &[&str],
        super_class: Option<Type>,
        interfaces: Vec<Type>,
    ) -> DeclDef {
        DeclDef {
            name: name.to_string(),
            kind: DeclKind::Class,
            type_params: type_params.iter().map(|s| s.to_string()).collect(),
            super_class,
            interfaces,
            enclosing: None,
        }
    }

    #[test]
    fn variable_resolves_through_the_class_chain() {
        let mut store = TypeStore::with_minimal_jdk();
        let object = store.well_known().object;
        let string = store.lookup_decl("java.lang.String").unwrap();

        let boxed = store.add_decl(class_def(
            "com.example.Box",
            &["T"],
            Some(Type::raw(object)),
            Vec::new(),
        ));
        let string_box = store.add_decl(class_def(
            "com.example.StringBox",
            &[],
            Some(Type::parameterized(boxed, vec![Type::raw(string)])),
            Vec::new(),
        ));

        let t = Type::variable(boxed, 0, "T");
        let resolved = resolve_type(&store, &Type::raw(string_box), &t).unwrap();
        assert_eq!(resolved.into_owned(), Type::raw(string));
    }

    #[test]
    fn unrelated_context_erases_the_variable() {
        let mut store = TypeStore::with_minimal_jdk();
        let object = store.well_known().object;
        let string = store.lookup_decl("java.lang.String").unwrap();

        let boxed = store.add_decl(class_def(
            "com.example.Box",
            &["T"],
            Some(Type::raw(object)),
            Vec::new(),
        ));

        let t = Type::variable(boxed, 0, "T");
        let resolved = resolve_type(&store, &Type::raw(string), &t).unwrap();
        assert_eq!(resolved.into_owned(), Type::raw(object));
    }

    #[test]
    fn contract_violation_fails_fast() {
        let store = TypeStore::with_minimal_jdk();
        let string = store.lookup_decl("java.lang.String").unwrap();
        let list = store.lookup_decl("java.util.List").unwrap();

        let result = type_parameter_for_super(&store, &Type::raw(string), list, 0);
        assert!(matches!(result, Err(TypeError::NotASupertype { .. })));
    }

    #[test]
    fn raw_superclass_usage_erases_the_parameter() {
        let mut store = TypeStore::with_minimal_jdk();
        let object = store.well_known().object;

        let boxed = store.add_decl(class_def(
            "com.example.Box",
            &["T"],
            Some(Type::raw(object)),
            Vec::new(),
        ));
        // RawBox extends Box  (a raw usage: no type argument supplied).
        let raw_box = store.add_decl(class_def(
            "com.example.RawBox",
            &[],
            Some(Type::raw(boxed)),
            Vec::new(),
        ));

        assert_eq!(
            type_parameter_for_super(&store, &Type::raw(raw_box), boxed, 0).unwrap(),
            None
        );
    }

    #[test]
    fn self_referential_variable_is_returned_unchanged() {
        let mut store = TypeStore::new();
        let object = store.well_known().object;

        let node = store.add_decl(class_def(
            "com.example.Node",
            &["T"],
            Some(Type::raw(object)),
            Vec::new(),
        ));

        // Resolving T against Node<T> itself yields T again; the engine must
        // hand back the input rather than recurse forever.
        let t = Type::variable(node, 0, "T");
        let context = Type::parameterized(node, vec![t.clone()]);
        let resolved = resolve_type(&store, &context, &t).unwrap();
        assert!(matches!(resolved, Cow::Borrowed(_)));
        assert_eq!(*resolved, t);
    }

    #[test]
    fn concrete_expressions_are_returned_borrowed() {
        let store = TypeStore::with_minimal_jdk();
        let list = store.lookup_decl("java.util.List").unwrap();
        let string = store.lookup_decl("java.lang.String").unwrap();
        let integer = store.lookup_decl("java.lang.Integer").unwrap();

        let concrete = Type::array(Type::parameterized(
            list,
            vec![Type::wildcard_extends(Type::raw(string))],
        ));
        let resolved = resolve_type(&store, &Type::raw(integer), &concrete).unwrap();
        assert!(matches!(resolved, Cow::Borrowed(_)));
        assert!(std::ptr::eq(resolved.as_ref(), &concrete));
    }
}
