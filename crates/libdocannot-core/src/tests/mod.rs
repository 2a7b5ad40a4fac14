mod annotation_engine_tests;
mod utils;
