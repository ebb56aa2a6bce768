//! Controladores
//!
//! Validan la entrada, aplican la autorización del `Caller` y coordinan
//! repositorios y servicios.

pub mod auth_controller;
pub mod booking_controller;
pub mod commercial_controller;
pub mod dispute_controller;
pub mod parking_spot_controller;
pub mod private_listing_controller;
