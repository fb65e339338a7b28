pub mod alerts;
pub mod bot;
pub mod check;
pub mod daemon;
pub mod status;
