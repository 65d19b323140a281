pub mod cases;
pub mod disabled;
pub mod reaction_roles;
pub mod settings;
pub mod tags;
