#[path = "../common/mod.rs"]
mod common;

mod verification_tests;
