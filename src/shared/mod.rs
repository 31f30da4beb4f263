//! Cross-cutting helpers shared by all layers

pub mod locks;

pub use locks::KeyedLocks;
