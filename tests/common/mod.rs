#[allow(dead_code)]
pub mod database;
#[allow(dead_code)]
pub mod helpers;
#[allow(dead_code)]
pub mod test_app;

#[allow(unused_imports)]
pub use database::TestDb;
#[allow(unused_imports)]
pub use helpers::{create_assignment, create_course, register};
#[allow(unused_imports)]
pub use test_app::TestApp;
