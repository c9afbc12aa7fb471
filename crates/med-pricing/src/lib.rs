//! Crate `med-pricing`: consultas de precios sobre el catálogo
//!
//! Tres componentes sin estado, todos sobre `med_domain::CatalogReader`:
//! - `MedicineSearchService`: búsqueda por nombre comercial (máx. 50).
//! - `PriceComparisonService`: precios de un medicamento, mínimo, máximo y
//!   porcentaje de ahorro.
//! - `AlternativeFinderService`: medicamentos con la misma composición,
//!   con ahorro respecto al original; los genéricos primero.
//!
//! `LookupService` los agrupa para la capa de presentación.
//!
//! Ejemplo rápido:
//! ```rust
//! use med_domain::CatalogStubs;
//! use med_pricing::LookupService;
//! use std::sync::Arc;
//! let repo = Arc::new(CatalogStubs::sample_repo().unwrap());
//! let lookup = LookupService::new(repo);
//! let found = lookup.search("croc").unwrap();
//! assert_eq!(found[0].brand_name(), "Crocin");
//! ```
pub mod alternatives;
pub mod comparison;
pub mod errors;
pub mod savings;
pub mod search;
pub mod service;

pub use alternatives::{cheapest_first, generic_first, Alternative, AlternativeFinderService, AlternativeOrdering};
pub use comparison::{compare_prices, PriceComparison, PriceComparisonService};
pub use errors::{PricingError, Result};
pub use search::{MedicineSearchService, SEARCH_LIMIT};
pub use service::{LookupService, MedicineResults};

use med_domain::{CatalogReader, Medicine};
use uuid::Uuid;

pub(crate) fn require_medicine<R>(repo: &R, medicine_id: &Uuid) -> Result<Medicine>
  where R: CatalogReader + ?Sized
{
  match repo.get_medicine(medicine_id)? {
    Some(medicine) => Ok(medicine),
    None => {
      log::info!("medicine {} not found", medicine_id);
      Err(PricingError::NotFound(*medicine_id))
    }
  }
}
