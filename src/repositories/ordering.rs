//! Ordenación de listados de inventario
//!
//! El cliente pide `campo` o `-campo`; solo se aceptan columnas de una lista
//! blanca por recurso, así que el nombre nunca llega a SQL sin validar.

use sqlx::{Postgres, QueryBuilder};

use crate::utils::errors::{validation_error, AppError};

pub const SPOT_ORDER_FIELDS: &[&str] = &["price_per_hour", "rating", "created_at"];
pub const FACILITY_ORDER_FIELDS: &[&str] = &["default_hourly_rate", "rating", "created_at"];
pub const LISTING_ORDER_FIELDS: &[&str] = &["hourly_rate", "daily_rate", "rating", "created_at"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOrder {
    column: &'static str,
    descending: bool,
}

impl Default for ListOrder {
    /// Más recientes primero
    fn default() -> Self {
        Self {
            column: "created_at",
            descending: true,
        }
    }
}

impl ListOrder {
    pub fn parse(raw: &str, allowed: &[&'static str]) -> Option<Self> {
        let raw = raw.trim();
        let (descending, name) = match raw.strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, raw),
        };
        allowed
            .iter()
            .copied()
            .find(|column| *column == name)
            .map(|column| Self { column, descending })
    }

    /// `None` o vacío conserva el orden por defecto
    pub fn from_query(raw: Option<&str>, allowed: &[&'static str]) -> Result<Self, AppError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(Self::default()),
            Some(raw) => {
                Self::parse(raw, allowed).ok_or_else(|| validation_error("ordering", "Unsupported ordering field"))
            }
        }
    }

    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }

    /// Añadir `ORDER BY`, con `id` como desempate estable
    pub fn push_to(&self, builder: &mut QueryBuilder<'_, Postgres>, alias: &str) {
        let direction = if self.descending { "DESC" } else { "ASC" };
        builder.push(format!(
            " ORDER BY {alias}{column} {direction}, {alias}id ASC",
            alias = alias,
            column = self.column,
            direction = direction
        ));
    }
}
