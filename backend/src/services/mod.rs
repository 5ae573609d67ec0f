//! Business logic services for the Digital Farmer platform

pub mod farm;
pub mod store;
pub mod weather;

pub use farm::FarmService;
pub use store::FarmStore;
pub use weather::WeatherService;
