pub mod entity;
pub mod repository;
pub mod status;
pub mod value_objects;
