//! Services module
//!
//! Lógica de negocio: ranking por proximidad, ciclo de vida de reservas,
//! resolución de disputas, análisis de precios y resolución de plazas.

pub mod booking_lifecycle;
pub mod dispute_service;
pub mod geo;
pub mod pricing;
pub mod spot_resolver;
