//! CPU implementation of the hierarchical clustering engines.
//!
//! Implements the trace traits for `CpuClient` by delegating to the generic
//! implementations in `impl_generic/`.

mod hierarchy;
