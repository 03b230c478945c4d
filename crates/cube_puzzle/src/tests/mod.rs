//! Crate-level tests exercising the puzzle on a full scene

mod properties;
