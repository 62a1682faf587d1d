//! Device-facing CSV renderings of a batch: the echo dispense protocol, the
//! shifter harvest template and the pin tracking sheet.

pub mod models;
pub mod services;
#[cfg(test)]
mod tests;
pub mod views;
