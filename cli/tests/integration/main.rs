//! Integration tests for the rollout CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! None of them reach a cloud endpoint: each fails before the first remote call.
