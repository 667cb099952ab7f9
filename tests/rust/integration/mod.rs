//! Integration tests - compiled recursive statements executed against SQLite
//!
//! Every test builds its own in-memory database, so they are independent of
//! each other and of any local database file.

mod common;

mod attribute_closure_tests;
mod category_closure_tests;
mod category_search_tests;
mod http_api_tests;
mod parameter_alignment_tests;
