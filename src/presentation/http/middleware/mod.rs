pub mod admin;
pub mod enforcement;
pub mod request_id;
pub mod user;
