mod catalog_repository;
mod catalog_stubs;
mod errors;
mod generic_benefit;
mod medicine;
mod pharmacy;
mod price;

pub use catalog_repository::{CatalogReader, CatalogRepository, InMemoryCatalogRepository};
pub use errors::DomainError;
pub use generic_benefit::{sort_generic_benefits, GenericBenefit};
pub use medicine::{Medicine, MedicineType, BRAND_NAME_MAX_LEN, COMPOSITION_MAX_LEN, MANUFACTURER_MAX_LEN, STRENGTH_MAX_LEN};
pub use pharmacy::{Pharmacy, PHARMACY_NAME_MAX_LEN, WEBSITE_URL_MAX_LEN};
pub use price::{sort_price_entries, Price, PriceEntry, PriceType, PRICE_MAX_DIGITS, PRICE_SCALE};
// Re-export the decimal type so dependants agree on a single version
pub use rust_decimal::Decimal;
pub use catalog_stubs::CatalogStubs;
