#[path = "../test_utils.rs"]
mod test_utils;

mod availability_test;
mod cache_consistency_test;
mod middleware_test;
mod slots_test;
