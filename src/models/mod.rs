//! Modelos de datos
//!
//! Entidades que mapean a las tablas de PostgreSQL.

pub mod booking;
pub mod dispute;
pub mod parking;
pub mod user;

pub use booking::*;
pub use dispute::*;
pub use parking::*;
pub use user::*;
