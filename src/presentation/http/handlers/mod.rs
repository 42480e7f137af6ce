pub mod admin_actions;
pub mod admin_appeals;
pub mod health;
pub mod me;
