mod render_pipeline_tests;
mod sanitizer_tests;
