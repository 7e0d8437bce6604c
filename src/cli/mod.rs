//! # CLI Module
//!
//! ## Commands
//!
//! ### `serve`
//!
//! ```bash
//! yarukoto serve --addr 127.0.0.1:8080 --store memory
//! yarukoto serve --store rest --store-url https://xyzcompany.supabase.co --store-key $KEY
//! ```
//!
//! ### `list`
//!
//! Prints the loader output (`{"todos": [...]}`) for the configured store.
//!
//! Every flag falls back to its `YARUKOTO_*` environment variable, then to
//! the defaults in [`crate::runtime_config`].

mod commands;


pub use commands::{run_cli, Cli, Commands, StoreArgs};
