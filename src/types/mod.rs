pub mod config;
pub mod flight_category;
pub mod observation;
pub mod period;
pub mod sky_cover;
