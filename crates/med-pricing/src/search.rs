// Archivo: search.rs
// Propósito: búsqueda de medicamentos por nombre comercial.
use crate::errors::Result;
use med_domain::{CatalogReader, Medicine};
use std::sync::Arc;

/// Máximo de resultados devueltos por una búsqueda.
pub const SEARCH_LIMIT: usize = 50;

pub struct MedicineSearchService<R: ?Sized> {
  repo: Arc<R>,
}

impl<R> MedicineSearchService<R> where R: CatalogReader + ?Sized
{
  pub fn new(repo: Arc<R>) -> Self {
    Self { repo }
  }

  /// Medicamentos cuyo nombre comercial contiene `query` (sin distinguir
  /// mayúsculas), en orden alfabético y como mucho `SEARCH_LIMIT`. Una
  /// consulta vacía o sólo con espacios devuelve una lista vacía.
  pub fn search(&self, query: &str) -> Result<Vec<Medicine>> {
    let query = query.trim();
    if query.is_empty() {
      return Ok(Vec::new());
    }
    let found = self.repo.find_by_name_contains(query, SEARCH_LIMIT)?;
    log::debug!("search '{}' -> {} results", query, found.len());
    Ok(found)
  }
}
