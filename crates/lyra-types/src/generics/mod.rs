//! Generic-type resolution over the declaration catalog.
//!
//! The entry point is [`resolve::resolve_type`], which rewrites a type
//! expression against a context type. Variable bindings are located by
//! [`resolve::type_parameter_for_super`], which walks the class chain or
//! searches the interface graph; the (declaration, position) pairs a
//! variable's value flows through come from
//! [`cascade::cascade_declarations`]; the ancestor graph itself is walked by
//! [`hierarchy`].

pub mod cascade;
pub mod hierarchy;
pub mod resolve;
pub mod synth;

/// Upper bound on supertype-graph recursion. A well-formed hierarchy is
/// nowhere near this deep; exceeding it means the catalog has a cycle.
pub(crate) const MAX_SUPERTYPE_DEPTH: usize = 128;
