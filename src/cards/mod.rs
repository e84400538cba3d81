//! Card content: definitions, the set registry, and the loader.
//!
//! ## Key Types
//!
//! - `CardDefinition`: static card data (precondition, effect, type tag)
//! - `CardRegistry`: set name + card id → definition lookup
//! - `load_set_str` / `load_dir`: authoring-format JSON loaders
//!
//! Definitions are loaded once at startup and shared read-only; games
//! hold the registry behind an `Arc` and never mutate it.

pub mod definition;
pub mod loader;
pub mod registry;

pub use definition::CardDefinition;
pub use loader::{load_dir, load_set_str, LoadError};
pub use registry::CardRegistry;
