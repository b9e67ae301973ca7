mod import_pipeline_tests;
mod store_tests;
