//! Erasure-level walking of the declaration inheritance graph.

use std::collections::{HashSet, VecDeque};

use crate::error::{Result, TypeError};
use crate::{erased_decl, DeclDef, DeclId, Type, TypeEnv};

use super::MAX_SUPERTYPE_DEPTH;

/// Returns true if `ancestor` is `decl` itself or a transitive supertype of
/// it, comparing erasures only.
///
/// Every declaration is assignable to the top type. Missing catalog entries
/// are treated as leaves.
pub fn is_assignable(env: &dyn TypeEnv, ancestor: DeclId, decl: DeclId) -> bool {
    if ancestor == env.well_known().object {
        return true;
    }

    let mut queue: VecDeque<DeclId> = VecDeque::new();
    let mut seen: HashSet<DeclId> = HashSet::new();
    queue.push_back(decl);

    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        if current == ancestor {
            return true;
        }
        let Some(def) = env.decl(current) else {
            continue;
        };
        if let Some(super_class) = &def.super_class {
            queue.push_back(erased_decl(env, super_class));
        }
        for interface in &def.interfaces {
            queue.push_back(erased_decl(env, interface));
        }
    }

    false
}

/// The declaration's direct generic supertype expressions: the superclass
/// (when present) followed by the interfaces in declared order.
pub fn generic_supertypes(def: &DeclDef) -> impl Iterator<Item = &Type> {
    def.super_class.iter().chain(def.interfaces.iter())
}

/// Ordered ancestors of `decl` that share the `base` declaration, with the
/// deepest interfaces first, then superclasses, ending with `decl` itself.
///
/// Diamond revisits are no-ops; the first visit keeps its position. Parent
/// interfaces are recursed into when they are assignable to `base`; use
/// [`inheritance_tree_filtered`] to inject a different predicate.
pub fn inheritance_tree(env: &dyn TypeEnv, decl: DeclId, base: DeclId) -> Result<Vec<DeclId>> {
    inheritance_tree_filtered(env, decl, base, |interface| {
        is_assignable(env, base, interface)
    })
}

/// [`inheritance_tree`] with a caller-supplied predicate deciding which
/// parent interfaces the walk recurses into.
pub fn inheritance_tree_filtered<F>(
    env: &dyn TypeEnv,
    decl: DeclId,
    base: DeclId,
    recurse_interface: F,
) -> Result<Vec<DeclId>>
where
    F: Fn(DeclId) -> bool,
{
    let mut tree = TreeBuilder {
        env,
        base,
        recurse_interface,
        order: Vec::new(),
        seen: HashSet::new(),
    };
    tree.add_class(decl, 0)?;
    Ok(tree.order)
}

struct TreeBuilder<'e, F> {
    env: &'e dyn TypeEnv,
    base: DeclId,
    recurse_interface: F,
    order: Vec<DeclId>,
    seen: HashSet<DeclId>,
}

impl<F: Fn(DeclId) -> bool> TreeBuilder<'_, F> {
    fn add_class(&mut self, element: DeclId, depth: usize) -> Result<()> {
        if depth > MAX_SUPERTYPE_DEPTH {
            return Err(TypeError::DepthLimitExceeded {
                limit: MAX_SUPERTYPE_DEPTH,
            });
        }

        if let Some(def) = self.env.decl(element) {
            for interface in &def.interfaces {
                let interface = erased_decl(self.env, interface);
                if is_assignable(self.env, self.base, interface) {
                    self.add_interface(interface, depth + 1)?;
                }
            }
            if let Some(super_class) = &def.super_class {
                let super_class = erased_decl(self.env, super_class);
                if is_assignable(self.env, self.base, super_class) {
                    self.add_class(super_class, depth + 1)?;
                }
            }
        }

        self.insert(element);
        Ok(())
    }

    fn add_interface(&mut self, interface: DeclId, depth: usize) -> Result<()> {
        if depth > MAX_SUPERTYPE_DEPTH {
            return Err(TypeError::DepthLimitExceeded {
                limit: MAX_SUPERTYPE_DEPTH,
            });
        }

        if let Some(def) = self.env.decl(interface) {
            for parent in &def.interfaces {
                let parent = erased_decl(self.env, parent);
                if (self.recurse_interface)(parent) {
                    self.add_interface(parent, depth + 1)?;
                }
            }
        }

        self.insert(interface);
        Ok(())
    }

    fn insert(&mut self, id: DeclId) {
        if self.seen.insert(id) {
            self.order.push(id);
        }
    }
}
