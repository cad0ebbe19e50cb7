//! Property-based tests for the patch path.

mod patch_tests;
