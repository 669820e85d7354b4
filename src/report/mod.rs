#[cfg(feature = "plotting")]
pub mod plot;
pub mod stats;
