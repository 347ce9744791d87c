//! Java-like rendering of type expressions.
//!
//! The formatters are stable and intended for diagnostics and tests; they do
//! not consult imports or any other presentation context.

use std::fmt;

use crate::{DeclId, Type, TypeEnv};

/// Borrowed display adapter returned by [`Type::display`].
pub struct TypeDisplay<'a> {
    pub(crate) env: &'a dyn TypeEnv,
    pub(crate) ty: &'a Type,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type(f, self.env, self.ty)
    }
}

pub(crate) fn decl_name(env: &dyn TypeEnv, id: DeclId) -> String {
    match env.decl(id) {
        Some(def) => def.name.clone(),
        None => format!("<unknown:{}>", id.0),
    }
}

fn write_type(f: &mut fmt::Formatter<'_>, env: &dyn TypeEnv, ty: &Type) -> fmt::Result {
    match ty {
        Type::Raw(id) => f.write_str(&decl_name(env, *id)),
        Type::Variable(variable) => f.write_str(&variable.name),
        Type::Array(component) => {
            write_type(f, env, component)?;
            f.write_str("[]")
        }
        Type::Wildcard(wildcard) => {
            let object = env.well_known().object;
            if !wildcard.lower_bounds.is_empty() {
                f.write_str("? super ")?;
                write_bounds(f, env, &wildcard.lower_bounds)
            } else if wildcard.upper_bounds.is_empty()
                || wildcard.upper_bounds[0] == Type::Raw(object)
            {
                f.write_str("?")
            } else {
                f.write_str("? extends ")?;
                write_bounds(f, env, &wildcard.upper_bounds)
            }
        }
        Type::Parameterized(parameterized) => {
            let raw_name = decl_name(env, parameterized.raw);
            match &parameterized.owner {
                Some(owner) => {
                    write_type(f, env, owner)?;
                    f.write_str("$")?;
                    // Inside an owner, only the member's own segment is shown.
                    let segment = match owner.as_ref() {
                        Type::Parameterized(owner) => {
                            let owner_raw = decl_name(env, owner.raw);
                            raw_name.replace(&format!("{owner_raw}$"), "")
                        }
                        _ => simple_name(&raw_name).to_string(),
                    };
                    f.write_str(&segment)?;
                }
                None => f.write_str(&raw_name)?,
            }
            if !parameterized.args.is_empty() {
                f.write_str("<")?;
                for (i, arg) in parameterized.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_type(f, env, arg)?;
                }
                f.write_str(">")?;
            }
            Ok(())
        }
    }
}

fn write_bounds(f: &mut fmt::Formatter<'_>, env: &dyn TypeEnv, bounds: &[Type]) -> fmt::Result {
    for (i, bound) in bounds.iter().enumerate() {
        if i > 0 {
            f.write_str(" & ")?;
        }
        write_type(f, env, bound)?;
    }
    Ok(())
}

fn simple_name(name: &str) -> &str {
    name.rsplit(['$', '.']).next().unwrap_or(name)
}
