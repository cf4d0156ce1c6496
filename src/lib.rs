//! Dotseal - incremental encryption for `.env` files.
//!
//! Keeps a plaintext `.env` and its encrypted `.env.vault` counterpart in
//! sync one key at a time, rewriting only the lines that changed.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── reconcile     # encrypt / decrypt commands
//! │   ├── diff          # Read-only comparison
//! │   ├── prompt        # Interactive selection and confirmation
//! │   ├── reporter      # Console rendering of run events
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── snapshot      # .env parsing
//!     ├── diff          # Key-level comparison
//!     ├── selection     # Operator selection filter
//!     ├── cipher/       # Backend contract and implementations
//!     │   ├── process   # External program (dotenvx)
//!     │   └── memory    # In-memory transforms for tests
//!     ├── credential    # Private key resolution
//!     ├── merge         # Line-preserving rewrite
//!     ├── backup        # Timestamped copies
//!     ├── reconcile     # Run orchestration
//!     ├── report        # Run events
//!     └── config        # .dotseal.toml management
//! ```

pub mod cli;
pub mod core;
pub mod error;
