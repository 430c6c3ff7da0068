//! Unit test suite for extdep's public parsing APIs.
//!
//! ```bash
//! cargo test --test unit
//! ```

mod coordinates;
mod descriptor_parsing;
mod platform_rules;
