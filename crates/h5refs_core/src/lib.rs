//! Public library API for resolving HDF5 reference tokens into readable descriptions.

/// Reference registry, classification pass, region describers, and formatting.
pub mod reference;
