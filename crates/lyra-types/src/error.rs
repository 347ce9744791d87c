pub type Result<T> = std::result::Result<T, TypeError>;

/// Errors produced by the generics algorithms.
///
/// Unresolvable type variables are not errors; they erase to the top type.
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    /// Contract violation: a super-parameter query named a declaration that
    /// is not an ancestor of the target.
    #[error("`{ancestor}` is not a supertype of `{target}`")]
    NotASupertype { ancestor: String, target: String },

    /// The supertype graph is deeper than any well-formed hierarchy, which
    /// indicates a cyclic catalog.
    #[error("supertype graph exceeds the depth limit of {limit}; cyclic inheritance suspected")]
    DepthLimitExceeded { limit: usize },
}
