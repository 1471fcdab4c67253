//! Integration tests for authflow CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! None of them reach a remote platform.

mod cli_tests;
