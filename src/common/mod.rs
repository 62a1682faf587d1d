pub mod auth;
pub mod errors;
pub mod models;
pub mod state;
pub mod upload;
pub mod views;

#[cfg(test)]
mod tests;
