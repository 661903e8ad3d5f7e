// Crate root library declaration and module exports.
pub mod cli;
pub mod config;
pub mod context;
pub mod converter;
pub mod dates;
pub mod errors;
pub mod facets;
pub mod filter;
pub mod loader;
pub mod model;
pub mod source;
pub mod stats;
pub mod store;
