//! Runner Test Suite
//!
//! Drives every stage kind through the runner against recording test
//! doubles, then checks the exact sequence of store and stage calls.
//!
//! ## Key Verification Points
//!
//! 1. The store is closed exactly once on every path
//! 2. No findings means the stage is never invoked and nothing is persisted
//! 3. Store, stage and panic failures surface as the run's single error and
//!    keep their cause reachable
//! 4. Cancellation inside a stage does not make the runner skip later calls
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all runner tests
//! cargo test --test runner
//!
//! # Run enricher tests only
//! cargo test --test runner enricher::
//! ```


mod logging;
mod reporter;
mod scanner;
