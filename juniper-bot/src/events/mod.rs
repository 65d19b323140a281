pub mod member_join;
pub mod message;
pub mod reactions;
