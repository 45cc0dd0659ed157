mod job_tests;
mod url_tests;
