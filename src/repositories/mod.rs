//! Repositorios
//!
//! Acceso a PostgreSQL con `sqlx`; un repositorio por agregado.

pub mod booking_repository;
pub mod commercial_repository;
pub mod dispute_repository;
pub mod ordering;
pub mod parking_spot_repository;
pub mod private_listing_repository;
pub mod user_repository;
