pub mod commands;
pub mod view;
