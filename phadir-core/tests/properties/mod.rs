mod batch_tests;
mod catalog_tests;
mod sanitize_tests;
mod tokenizer_tests;
