//! DTOs de la API

pub mod auth_dto;
pub mod booking_dto;
pub mod common_dto;
pub mod dispute_dto;
pub mod parking_dto;
