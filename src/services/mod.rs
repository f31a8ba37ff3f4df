pub mod assignments;
pub mod courses;
pub mod due_status;
pub mod identity;
pub mod ownership;
pub mod users;
