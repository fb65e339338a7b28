pub mod bot;
pub mod cli;
pub mod dashboard;
