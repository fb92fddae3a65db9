//! Implicit integrators for small, stiff systems of ordinary differential equations.
//!
//! The system is described by a [`bdf::Model`], which supplies the vector field and
//! its Jacobian. State sizes are fixed at compile time.

pub mod bdf;
