pub mod assignments;
pub mod courses;
pub mod users;
