//! 2D transform helpers: vector primitives, renderer matrices and the bone hierarchy.

/// Affine matrix construction for renderers.
pub mod affine;
/// Parent/child pose composition.
pub mod hierarchy;
/// Componentwise vector helpers.
pub mod linear;
