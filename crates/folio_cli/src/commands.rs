pub mod about;
pub mod config;
pub mod experience;
pub mod hero;
pub mod projects;
