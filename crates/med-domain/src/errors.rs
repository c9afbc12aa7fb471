// errors.rs
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
  #[error("Error de validación: {0}")]
  ValidationError(String),
  #[error("Error externo: {0}")]
  ExternalError(String),
  #[error("Error de serialización: {0}")]
  SerializationError(String),
}

impl From<serde_json::Error> for DomainError {
  fn from(e: serde_json::Error) -> Self {
    Self::SerializationError(e.to_string())
  }
}

impl From<rust_decimal::Error> for DomainError {
  fn from(e: rust_decimal::Error) -> Self {
    Self::SerializationError(format!("decimal: {}", e))
  }
}
