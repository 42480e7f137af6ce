pub mod clock;
pub mod errors;
pub mod pagination;
pub mod timestamp;
