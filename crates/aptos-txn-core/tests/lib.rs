//! Integration tests for the transaction core.
//!
//! ## Test Categories
//!
//! - **behavioral**: known-answer transactions, codec properties and
//!   verification rules, exercised through the public API only
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p aptos-txn-core
//! ```

mod behavioral;
