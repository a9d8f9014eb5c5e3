//! Integration tests for course-grader.
//!
//! These tests grade submissions written into temporary curriculum trees.

pub mod cli_tests;
pub mod determinism_tests;
pub mod full_run_tests;
pub mod interactive_tests;
pub mod output_tests;
