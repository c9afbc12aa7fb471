// Archivo: errors.rs
// Propósito: errores de las consultas de precios y el alias Result<T> usado
// por las APIs del crate.
use med_domain::DomainError;
use thiserror::Error;
use uuid::Uuid;

/// Errores de las consultas de precios.
///
/// - `NotFound`: el id de medicamento no existe en el catálogo.
/// - `Domain`: fallo del repositorio subyacente.
///
/// "Sin precios" no es un error: se representa en `PriceComparison`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
  /// Medicamento no encontrado.
  #[error("Medicamento no encontrado: {0}")]
  NotFound(Uuid),
  /// Error del catálogo (almacenamiento, datos corruptos).
  #[error("Error de catálogo: {0}")]
  Domain(#[from] DomainError),
}

impl PricingError {
  pub fn is_not_found(&self) -> bool {
    matches!(self, PricingError::NotFound(_))
  }
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, PricingError>;
