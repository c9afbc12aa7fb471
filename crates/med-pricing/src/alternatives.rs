// Archivo: alternatives.rs
// Propósito: búsqueda y ranking de alternativas (misma composición) para un
// medicamento, con el ahorro respecto a su precio más bajo.
use crate::errors::Result;
use crate::require_medicine;
use crate::savings::{savings_amount, savings_percentage};
use med_domain::{CatalogReader, Decimal, Medicine};
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;
use uuid::Uuid;

/// Alternativa a un medicamento con su mejor precio.
///
/// `savings_amount` y `savings_percentage` se calculan contra el precio más
/// bajo del medicamento original y son negativos si la alternativa es más
/// cara. Si el original no tiene precios, ambos son cero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alternative {
  pub medicine: Medicine,
  pub lowest_price: Decimal,
  pub pharmacy_name: String,
  pub is_generic: bool,
  pub savings_amount: Decimal,
  pub savings_percentage: Decimal,
}

/// Criterio de orden de las alternativas.
pub type AlternativeOrdering = fn(&Alternative, &Alternative) -> Ordering;

/// Política de merchandising: los genéricos van primero sin importar su
/// precio; dentro de cada grupo, de menor a mayor precio.
pub fn generic_first(a: &Alternative, b: &Alternative) -> Ordering {
  b.is_generic.cmp(&a.is_generic).then_with(|| cheapest_first(a, b))
}

/// Orden puramente por precio.
pub fn cheapest_first(a: &Alternative, b: &Alternative) -> Ordering {
  a.lowest_price
   .cmp(&b.lowest_price)
   .then_with(|| a.medicine.brand_name().cmp(b.medicine.brand_name()))
   .then_with(|| a.medicine.id().cmp(&b.medicine.id()))
}

pub struct AlternativeFinderService<R: ?Sized> {
  repo: Arc<R>,
  ordering: AlternativeOrdering,
}

impl<R> AlternativeFinderService<R> where R: CatalogReader + ?Sized
{
  /// Crea el servicio con el orden `generic_first`.
  pub fn new(repo: Arc<R>) -> Self {
    Self { repo, ordering: generic_first }
  }

  pub fn with_ordering(mut self, ordering: AlternativeOrdering) -> Self {
    self.ordering = ordering;
    self
  }

  /// Otros medicamentos con la misma composición exacta que tengan al
  /// menos un precio, ordenados según el criterio configurado.
  pub fn find_alternatives(&self, medicine_id: &Uuid) -> Result<Vec<Alternative>> {
    let medicine = require_medicine(self.repo.as_ref(), medicine_id)?;
    let reference = self.repo.list_prices_for_medicine(medicine_id)?.first().map(|p| p.amount());

    let mut results = Vec::new();
    for candidate in self.repo.find_by_composition(medicine.composition())? {
      if !candidate.is_alternative_to(&medicine) {
        continue;
      }
      let prices = self.repo.list_prices_for_medicine(&candidate.id())?;
      let Some(cheapest) = prices.first() else {
        log::debug!("alternative {} skipped: no prices", candidate.id());
        continue;
      };
      let lowest = cheapest.amount();
      let (amount, percentage) = match reference {
        Some(original) => (savings_amount(original, lowest), savings_percentage(original, lowest)),
        None => (Decimal::ZERO, Decimal::ZERO),
      };
      results.push(Alternative { is_generic: candidate.is_generic(),
                                 pharmacy_name: cheapest.pharmacy_name().to_string(),
                                 medicine: candidate,
                                 lowest_price: lowest,
                                 savings_amount: amount,
                                 savings_percentage: percentage });
    }
    results.sort_by(self.ordering);
    log::debug!("alternatives for {}: {}", medicine_id, results.len());
    Ok(results)
  }
}
