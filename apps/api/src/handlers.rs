pub mod configurations;
pub mod health;
pub mod layout;
pub mod organizations;
pub mod users;
