pub mod memory_action_repository;
pub mod memory_appeal_repository;
mod recency_table;
