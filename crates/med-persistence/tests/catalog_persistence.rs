#![cfg(not(feature = "pg"))]
use med_domain::{CatalogReader, CatalogRepository, Decimal, DomainError, GenericBenefit, InMemoryCatalogRepository, Medicine,
                 MedicineType, Pharmacy, Price, PriceType};
use med_persistence::DieselCatalogRepository;
use uuid::Uuid;

// Temporary file-backed SQLite DB, one per test
fn temp_repo() -> DieselCatalogRepository {
  let tmp_path = std::env::temp_dir().join(format!("medprice_test_{}.db", Uuid::new_v4()));
  let db_url = tmp_path.to_str().unwrap().to_string();
  DieselCatalogRepository::new(&db_url).expect("failed to create repo")
}

fn medicine(brand: &str, composition: &str, medicine_type: MedicineType) -> Medicine {
  Medicine::new(brand, composition, "500mg", "Acme", medicine_type).unwrap()
}

#[test]
fn medicine_round_trips_with_optional_info() -> Result<(), DomainError> {
  let repo = temp_repo();
  let m = medicine("Crocin", "Paracetamol 500mg", MedicineType::Branded).with_info(Some("Analgésico".into()),
                                                                                    Some("Fiebre".into()),
                                                                                    None);
  let id = repo.save_medicine(m.clone())?;
  let loaded = repo.get_medicine(&id)?.expect("saved medicine");
  assert_eq!(loaded.id(), m.id());
  assert_eq!(loaded.brand_name(), "Crocin");
  assert_eq!(loaded.medicine_type(), MedicineType::Branded);
  assert_eq!(loaded.description(), Some("Analgésico"));
  assert_eq!(loaded.uses(), Some("Fiebre"));
  assert_eq!(loaded.side_effects(), None);
  assert_eq!(loaded.created_at().timestamp_millis(), m.created_at().timestamp_millis());

  // Saving again replaces the record; clearing an optional field sticks
  let updated = Medicine::from_parts(m.id(),
                                     "Crocin Advance",
                                     "Paracetamol 500mg",
                                     "500mg",
                                     "GSK",
                                     MedicineType::Branded,
                                     m.created_at())?;
  repo.save_medicine(updated)?;
  let loaded = repo.get_medicine(&id)?.expect("updated medicine");
  assert_eq!(loaded.brand_name(), "Crocin Advance");
  assert_eq!(loaded.description(), None);
  assert!(repo.get_medicine(&Uuid::new_v4())?.is_none());
  Ok(())
}

#[test]
fn search_is_case_insensitive_sorted_and_limited() -> Result<(), DomainError> {
  let repo = temp_repo();
  for brand in ["Dolo 650", "Crocin", "crocin cold", "Calpol", "Brufen"] {
    repo.save_medicine(medicine(brand, "Paracetamol 500mg", MedicineType::Branded))?;
  }
  let found: Vec<String> =
    repo.find_by_name_contains("CROC", 50)?.iter().map(|m| m.brand_name().to_string()).collect();
  assert_eq!(found, vec!["Crocin", "crocin cold"]);
  assert_eq!(repo.find_by_name_contains("o", 2)?.len(), 2);
  assert!(repo.find_by_name_contains("xyz", 50)?.is_empty());
  // LIKE wildcards are matched literally
  assert!(repo.find_by_name_contains("%", 50)?.is_empty());
  Ok(())
}

#[test]
fn search_folds_non_ascii_case_like_the_in_memory_store() -> Result<(), DomainError> {
  let repo = temp_repo();
  let memory = InMemoryCatalogRepository::new();
  for brand in ["Éxito Forte", "ÉXITO Plus", "Exito"] {
    let m = medicine(brand, "Paracetamol 500mg", MedicineType::Branded);
    repo.save_medicine(m.clone())?;
    memory.save_medicine(m)?;
  }
  for query in ["éxito", "ÉXITO", "xito f"] {
    let diesel: Vec<Uuid> = repo.find_by_name_contains(query, 50)?.iter().map(|m| m.id()).collect();
    let in_memory: Vec<Uuid> = memory.find_by_name_contains(query, 50)?.iter().map(|m| m.id()).collect();
    assert_eq!(diesel, in_memory, "query {:?}", query);
  }
  let brands: Vec<String> =
    repo.find_by_name_contains("éxito", 50)?.iter().map(|m| m.brand_name().to_string()).collect();
  assert_eq!(brands, vec!["ÉXITO Plus", "Éxito Forte"]);
  Ok(())
}

#[test]
fn composition_match_is_exact() -> Result<(), DomainError> {
  let repo = temp_repo();
  repo.save_medicine(medicine("Crocin", "Paracetamol 500mg", MedicineType::Branded))?;
  repo.save_medicine(medicine("Paracetamol", "Paracetamol 500mg", MedicineType::Generic))?;
  repo.save_medicine(medicine("Odd", "paracetamol 500mg", MedicineType::Branded))?;
  let brands: Vec<String> =
    repo.find_by_composition("Paracetamol 500mg")?.iter().map(|m| m.brand_name().to_string()).collect();
  assert_eq!(brands, vec!["Crocin", "Paracetamol"]);
  Ok(())
}

#[test]
fn prices_are_listed_ascending_with_pharmacy() -> Result<(), DomainError> {
  let repo = temp_repo();
  let m = repo.save_medicine(medicine("Crocin", "Paracetamol 500mg", MedicineType::Branded))?;
  let apollo = repo.save_pharmacy(Pharmacy::new("Apollo Pharmacy", Some("https://www.apollopharmacy.in"))?)?;
  let medplus = repo.save_pharmacy(Pharmacy::new("MedPlus", None)?)?;
  let netmeds = repo.save_pharmacy(Pharmacy::new("Netmeds", None)?)?;
  // 100.00 would sort before 35.00 as text
  repo.save_price(Price::new(m, apollo, Decimal::new(10000, 2), PriceType::Mrp)?)?;
  repo.save_price(Price::new(m, medplus, Decimal::new(35, 0), PriceType::Average)?)?;
  repo.save_price(Price::new(m, netmeds, Decimal::new(45, 1), PriceType::Online)?)?;

  let entries = repo.list_prices_for_medicine(&m)?;
  let listed: Vec<(String, String)> =
    entries.iter().map(|e| (e.pharmacy_name().to_string(), e.amount().to_string())).collect();
  assert_eq!(listed,
             vec![("Netmeds".to_string(), "4.50".to_string()),
                  ("MedPlus".to_string(), "35.00".to_string()),
                  ("Apollo Pharmacy".to_string(), "100.00".to_string())]);
  assert_eq!(entries[2].price.price_type(), PriceType::Mrp);
  assert_eq!(entries[2].pharmacy.website_url(), Some("https://www.apollopharmacy.in"));
  Ok(())
}

#[test]
fn price_is_replaced_per_medicine_and_pharmacy() -> Result<(), DomainError> {
  let repo = temp_repo();
  let m = repo.save_medicine(medicine("Crocin", "Paracetamol 500mg", MedicineType::Branded))?;
  let p = repo.save_pharmacy(Pharmacy::new("MedPlus", None)?)?;
  let first = repo.save_price(Price::new(m, p, Decimal::new(3000, 2), PriceType::Average)?)?;
  let second = repo.save_price(Price::new(m, p, Decimal::new(2500, 2), PriceType::Online)?)?;
  assert_eq!(first, second);
  let entries = repo.list_prices_for_medicine(&m)?;
  assert_eq!(entries.len(), 1);
  assert_eq!(entries[0].amount(), Decimal::new(2500, 2));
  assert_eq!(entries[0].price.price_type(), PriceType::Online);
  Ok(())
}

#[test]
fn price_requires_existing_references() -> Result<(), DomainError> {
  let repo = temp_repo();
  let m = repo.save_medicine(medicine("Crocin", "Paracetamol 500mg", MedicineType::Branded))?;
  let p = repo.save_pharmacy(Pharmacy::new("MedPlus", None)?)?;
  let orphan_medicine = Price::new(Uuid::new_v4(), p, Decimal::new(10, 0), PriceType::Average)?;
  assert!(matches!(repo.save_price(orphan_medicine), Err(DomainError::ValidationError(_))));
  let orphan_pharmacy = Price::new(m, Uuid::new_v4(), Decimal::new(10, 0), PriceType::Average)?;
  assert!(matches!(repo.save_price(orphan_pharmacy), Err(DomainError::ValidationError(_))));
  assert!(repo.list_prices_for_medicine(&m)?.is_empty());
  Ok(())
}

#[test]
fn pharmacy_names_are_unique() -> Result<(), DomainError> {
  let repo = temp_repo();
  let apollo = Pharmacy::new("Apollo Pharmacy", None)?;
  repo.save_pharmacy(apollo.clone())?;
  assert!(matches!(repo.save_pharmacy(Pharmacy::new("Apollo Pharmacy", None)?), Err(DomainError::ValidationError(_))));
  // Re-saving the same pharmacy is an update, not a clash
  repo.save_pharmacy(apollo.clone())?;
  let names: Vec<String> = repo.list_pharmacies()?.iter().map(|p| p.name().to_string()).collect();
  assert_eq!(names, vec!["Apollo Pharmacy"]);
  assert_eq!(repo.get_pharmacy(&apollo.id())?.map(|p| p.id()), Some(apollo.id()));
  Ok(())
}

#[test]
fn deletes_cascade_to_prices() -> Result<(), DomainError> {
  let repo = temp_repo();
  let crocin = repo.save_medicine(medicine("Crocin", "Paracetamol 500mg", MedicineType::Branded))?;
  let calpol = repo.save_medicine(medicine("Calpol", "Paracetamol 500mg", MedicineType::Branded))?;
  let apollo = repo.save_pharmacy(Pharmacy::new("Apollo Pharmacy", None)?)?;
  let medplus = repo.save_pharmacy(Pharmacy::new("MedPlus", None)?)?;
  for (m, p) in [(crocin, apollo), (crocin, medplus), (calpol, apollo)] {
    repo.save_price(Price::new(m, p, Decimal::new(20, 0), PriceType::Average)?)?;
  }

  repo.delete_pharmacy(&apollo)?;
  assert_eq!(repo.list_prices_for_medicine(&crocin)?.len(), 1);
  assert!(repo.list_prices_for_medicine(&calpol)?.is_empty());

  repo.delete_medicine(&crocin)?;
  assert!(repo.get_medicine(&crocin)?.is_none());
  assert!(repo.list_prices_for_medicine(&crocin)?.is_empty());
  Ok(())
}

#[test]
fn benefits_are_ordered_and_inactive_hidden() -> Result<(), DomainError> {
  let repo = temp_repo();
  repo.save_generic_benefit(GenericBenefit::new("Lower cost", "Cheaper", "wallet", 2)?)?;
  repo.save_generic_benefit(GenericBenefit::new("Same ingredient", "Same", "pill", 1)?)?;
  repo.save_generic_benefit(GenericBenefit::new("Hidden", "Old", "x", 0)?.deactivated())?;
  let titles: Vec<String> = repo.list_generic_benefits()?.into_iter().map(|b| b.title).collect();
  assert_eq!(titles, vec!["Same ingredient", "Lower cost"]);
  Ok(())
}

#[test]
fn clear_empties_every_table() -> Result<(), DomainError> {
  let repo = temp_repo();
  let m = repo.save_medicine(medicine("Crocin", "Paracetamol 500mg", MedicineType::Branded))?;
  let p = repo.save_pharmacy(Pharmacy::new("MedPlus", None)?)?;
  repo.save_price(Price::new(m, p, Decimal::new(20, 0), PriceType::Average)?)?;
  repo.save_generic_benefit(GenericBenefit::new("Lower cost", "Cheaper", "wallet", 1)?)?;
  repo.clear()?;
  assert!(repo.get_medicine(&m)?.is_none());
  assert!(repo.list_pharmacies()?.is_empty());
  assert!(repo.list_prices_for_medicine(&m)?.is_empty());
  assert!(repo.list_generic_benefits()?.is_empty());
  Ok(())
}

#[test]
fn reopening_the_same_file_keeps_data() -> Result<(), DomainError> {
  let tmp_path = std::env::temp_dir().join(format!("medprice_reopen_{}.db", Uuid::new_v4()));
  let db_url = tmp_path.to_str().unwrap().to_string();
  let id = {
    let repo = DieselCatalogRepository::new(&db_url)?;
    repo.save_medicine(medicine("Crocin", "Paracetamol 500mg", MedicineType::Branded))?
  };
  let repo = DieselCatalogRepository::new(&db_url)?;
  assert_eq!(repo.get_medicine(&id)?.map(|m| m.brand_name().to_string()), Some("Crocin".to_string()));
  Ok(())
}
