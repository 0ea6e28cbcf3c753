pub mod events;
pub mod starters;
