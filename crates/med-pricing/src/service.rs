// Archivo: service.rs
// Propósito: `LookupService`, fachada que agrupa búsqueda, comparación y
// alternativas sobre un mismo repositorio. Es lo que invoca la capa de
// presentación.
use crate::alternatives::{Alternative, AlternativeFinderService, AlternativeOrdering};
use crate::comparison::{PriceComparison, PriceComparisonService};
use crate::errors::Result;
use crate::search::MedicineSearchService;
use med_domain::{CatalogReader, GenericBenefit, Medicine};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Todo lo que la página de resultados necesita de un medicamento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MedicineResults {
    pub comparison: PriceComparison,
    pub alternatives: Vec<Alternative>,
}

pub struct LookupService<R: ?Sized> {
    repo: Arc<R>,
    search: MedicineSearchService<R>,
    comparison: PriceComparisonService<R>,
    alternatives: AlternativeFinderService<R>,
}

impl<R> LookupService<R> where R: CatalogReader + ?Sized
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { search: MedicineSearchService::new(repo.clone()),
               comparison: PriceComparisonService::new(repo.clone()),
               alternatives: AlternativeFinderService::new(repo.clone()),
               repo }
    }

    /// Reemplaza el criterio de orden de las alternativas.
    pub fn with_alternative_ordering(mut self, ordering: AlternativeOrdering) -> Self {
        self.alternatives = self.alternatives.with_ordering(ordering);
        self
    }

    pub fn search(&self, query: &str) -> Result<Vec<Medicine>> {
        self.search.search(query)
    }

    pub fn get_price_comparison(&self, medicine_id: &Uuid) -> Result<PriceComparison> {
        self.comparison.get_price_comparison(medicine_id)
    }

    pub fn find_alternatives(&self, medicine_id: &Uuid) -> Result<Vec<Alternative>> {
        self.alternatives.find_alternatives(medicine_id)
    }

    /// Comparación y alternativas de un medicamento. Falla con `NotFound`
    /// si el id no existe.
    pub fn results(&self, medicine_id: &Uuid) -> Result<MedicineResults> {
        let comparison = self.get_price_comparison(medicine_id)?;
        let alternatives = self.find_alternatives(medicine_id)?;
        Ok(MedicineResults { comparison, alternatives })
    }

    pub fn generic_benefits(&self) -> Result<Vec<GenericBenefit>> {
        Ok(self.repo.list_generic_benefits()?)
    }
}
