pub mod archive;
pub mod args;
pub mod date;
pub mod engine;
pub mod error;
pub mod es;
pub mod index;
pub mod naming;
pub mod snapshot;
