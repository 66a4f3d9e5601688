//! Test helpers shared by the API module tests.

pub fn create_test_client(url: &str) -> crate::Client {
    crate::Client::new("abc123", Some(url)).unwrap()
}
