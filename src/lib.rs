//! helene: markdown documentation for a compiled library.
//!
//! The engine turns library metadata ([`metadata`]) and XML doc comments
//! ([`docs::xml`]) into one page per public type plus a namespace index
//! ([`generate::Generator`]).

pub mod docs;
pub mod error;
pub mod generate;
pub mod links;
pub mod markdown;
pub mod metadata;
pub mod model;
pub mod options;
pub mod render;
