pub mod coordinator;
pub mod markers;
