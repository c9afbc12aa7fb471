//! Persistencia Diesel del catálogo de medicamentos.
//! Expone el módulo `schema`, el repositorio `DieselCatalogRepository` (que
//! implementa `CatalogReader` y `CatalogRepository` de `med-domain`) y la
//! siembra de datos de ejemplo en `seed`.

mod catalog_persistence;
pub mod schema;
pub mod seed;

pub use catalog_persistence::{new_from_env, DieselCatalogRepository, DEFAULT_SQLITE_URL, MIGRATIONS};
pub use seed::{seed_catalog, seed_with_seed, SeedReport};
