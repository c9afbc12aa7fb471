// Archivo: comparison.rs
// Propósito: comparación de precios de un medicamento entre farmacias.
use crate::errors::Result;
use crate::require_medicine;
use crate::savings::savings_percentage;
use med_domain::{CatalogReader, Decimal, Medicine, PriceEntry};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Resultado de comparar los precios de un medicamento.
///
/// Sin precios, `lowest_price` y `highest_price` quedan en `None` y
/// `savings_percentage` es cero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceComparison {
  pub medicine: Medicine,
  pub prices: Vec<PriceEntry>,
  pub lowest_price: Option<Decimal>,
  pub highest_price: Option<Decimal>,
  pub savings_percentage: Decimal,
}

impl PriceComparison {
  pub fn has_prices(&self) -> bool {
    !self.prices.is_empty()
  }

  /// Farmacia con el precio más bajo, si la hay.
  pub fn cheapest(&self) -> Option<&PriceEntry> {
    self.prices.first()
  }
}

pub struct PriceComparisonService<R: ?Sized> {
  repo: Arc<R>,
}

impl<R> PriceComparisonService<R> where R: CatalogReader + ?Sized
{
  pub fn new(repo: Arc<R>) -> Self {
    Self { repo }
  }

  pub fn get_price_comparison(&self, medicine_id: &Uuid) -> Result<PriceComparison> {
    let medicine = require_medicine(self.repo.as_ref(), medicine_id)?;
    let prices = self.repo.list_prices_for_medicine(medicine_id)?;
    Ok(compare_prices(medicine, prices))
  }
}

/// Calcula la comparación sobre precios ya ordenados de menor a mayor.
pub fn compare_prices(medicine: Medicine, prices: Vec<PriceEntry>) -> PriceComparison {
  let (lowest, highest) = match (prices.first(), prices.last()) {
    (Some(first), Some(last)) => (first.amount(), last.amount()),
    _ => {
      return PriceComparison { medicine,
                               prices,
                               lowest_price: None,
                               highest_price: None,
                               savings_percentage: Decimal::ZERO }
    }
  };
  let savings = savings_percentage(highest, lowest);
  PriceComparison { medicine,
                    prices,
                    lowest_price: Some(lowest),
                    highest_price: Some(highest),
                    savings_percentage: savings }
}
