pub mod project_harness;
