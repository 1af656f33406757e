//! Reading trees from disk or stdin and writing them back.
//!
//! [`loader`] turns JSON documents and export-record files (optionally
//! gzipped) into `JsonTree`s; [`saver`] pretty-prints values and writes them
//! atomically, with an optional `.bak` copy and gzip output.

pub mod loader;
pub mod saver;
