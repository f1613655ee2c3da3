// marksync shared type definitions
// Each submodule defines types used across the engine and the stores.

pub mod bookmark;
pub mod errors;
pub mod metadata;
pub mod report;
pub mod settings;
