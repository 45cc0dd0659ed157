mod api_tests;
mod queue_api_tests;
