pub mod appeal;
pub mod moderation;
pub mod shared;
