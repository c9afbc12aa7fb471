use crate::generic_benefit::sort_generic_benefits;
use crate::price::sort_price_entries;
use crate::{DomainError, GenericBenefit, Medicine, Pharmacy, Price, PriceEntry};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Consultas de sólo lectura sobre el catálogo. Los componentes de búsqueda y
/// comparación dependen únicamente de este trait.
pub trait CatalogReader: Send + Sync {
    /// Obtiene un medicamento por id.
    fn get_medicine(&self, id: &Uuid) -> Result<Option<Medicine>, DomainError>;

    /// Medicamentos cuyo nombre comercial contiene `fragment` sin distinguir
    /// mayúsculas, ordenados por nombre comercial y truncados a `limit`.
    fn find_by_name_contains(&self, fragment: &str, limit: usize) -> Result<Vec<Medicine>, DomainError>;

    /// Medicamentos con exactamente la composición dada (distingue
    /// mayúsculas), ordenados por nombre comercial.
    fn find_by_composition(&self, composition: &str) -> Result<Vec<Medicine>, DomainError>;

    /// Precios de un medicamento con su farmacia, de menor a mayor importe.
    fn list_prices_for_medicine(&self, medicine_id: &Uuid) -> Result<Vec<PriceEntry>, DomainError>;

    fn get_pharmacy(&self, id: &Uuid) -> Result<Option<Pharmacy>, DomainError>;

    /// Farmacias ordenadas por nombre.
    fn list_pharmacies(&self) -> Result<Vec<Pharmacy>, DomainError>;

    /// Beneficios activos ordenados por `display_order` y título.
    fn list_generic_benefits(&self) -> Result<Vec<GenericBenefit>, DomainError>;
}

/// Operaciones de escritura (siembra y administración). Cada `save_*`
/// reemplaza el registro completo tras validarlo.
pub trait CatalogRepository: CatalogReader {
    fn save_medicine(&self, medicine: Medicine) -> Result<Uuid, DomainError>;

    /// Falla con `ValidationError` si otra farmacia ya usa el mismo nombre.
    fn save_pharmacy(&self, pharmacy: Pharmacy) -> Result<Uuid, DomainError>;

    /// Inserta o reemplaza el precio del par (medicamento, farmacia). Si el
    /// par ya tenía precio se conserva el id de esa fila, que es el que se
    /// devuelve. Medicamento y farmacia deben existir.
    fn save_price(&self, price: Price) -> Result<Uuid, DomainError>;

    fn save_generic_benefit(&self, benefit: GenericBenefit) -> Result<Uuid, DomainError>;

    /// Elimina el medicamento y, en cascada, sus precios.
    fn delete_medicine(&self, id: &Uuid) -> Result<(), DomainError>;

    /// Elimina la farmacia y, en cascada, sus precios.
    fn delete_pharmacy(&self, id: &Uuid) -> Result<(), DomainError>;

    /// Vacía el catálogo completo.
    fn clear(&self) -> Result<(), DomainError>;
}

/// Implementación en memoria para tests y desarrollo.
pub struct InMemoryCatalogRepository {
    medicines: Arc<Mutex<HashMap<Uuid, Medicine>>>,
    pharmacies: Arc<Mutex<HashMap<Uuid, Pharmacy>>>,
    prices: Arc<Mutex<HashMap<Uuid, Price>>>,
    benefits: Arc<Mutex<HashMap<Uuid, GenericBenefit>>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self { medicines: Arc::new(Mutex::new(HashMap::new())),
               pharmacies: Arc::new(Mutex::new(HashMap::new())),
               prices: Arc::new(Mutex::new(HashMap::new())),
               benefits: Arc::new(Mutex::new(HashMap::new())) }
    }

    // Helper to map poisoned mutex errors into DomainError.
    // Lock order: medicines, pharmacies, prices, benefits.
    fn lock_map<'a, T>(&'a self, m: &'a Mutex<T>, name: &str) -> Result<std::sync::MutexGuard<'a, T>, DomainError> {
        m.lock()
         .map_err(|e| DomainError::ExternalError(format!("Mutex '{}' poisoned: {}", name, e)))
    }
}

fn by_brand_name(a: &Medicine, b: &Medicine) -> std::cmp::Ordering {
    a.brand_name().cmp(b.brand_name()).then_with(|| a.id().cmp(&b.id()))
}

impl CatalogReader for InMemoryCatalogRepository {
    fn get_medicine(&self, id: &Uuid) -> Result<Option<Medicine>, DomainError> {
        let medicines = self.lock_map(&self.medicines, "medicines")?;
        Ok(medicines.get(id).cloned())
    }

    fn find_by_name_contains(&self, fragment: &str, limit: usize) -> Result<Vec<Medicine>, DomainError> {
        let needle = fragment.to_lowercase();
        let medicines = self.lock_map(&self.medicines, "medicines")?;
        let mut found: Vec<Medicine> =
            medicines.values().filter(|m| m.brand_name().to_lowercase().contains(&needle)).cloned().collect();
        found.sort_by(by_brand_name);
        found.truncate(limit);
        Ok(found)
    }

    fn find_by_composition(&self, composition: &str) -> Result<Vec<Medicine>, DomainError> {
        let medicines = self.lock_map(&self.medicines, "medicines")?;
        let mut found: Vec<Medicine> = medicines.values().filter(|m| m.composition() == composition).cloned().collect();
        found.sort_by(by_brand_name);
        Ok(found)
    }

    fn list_prices_for_medicine(&self, medicine_id: &Uuid) -> Result<Vec<PriceEntry>, DomainError> {
        let pharmacies = self.lock_map(&self.pharmacies, "pharmacies")?;
        let prices = self.lock_map(&self.prices, "prices")?;
        let mut entries = Vec::new();
        for price in prices.values().filter(|p| &p.medicine_id() == medicine_id) {
            let pharmacy = pharmacies.get(&price.pharmacy_id())
                                     .cloned()
                                     .ok_or_else(|| DomainError::ExternalError(format!("Precio {} sin farmacia", price.id())))?;
            entries.push(PriceEntry::new(price.clone(), pharmacy)?);
        }
        sort_price_entries(&mut entries);
        Ok(entries)
    }

    fn get_pharmacy(&self, id: &Uuid) -> Result<Option<Pharmacy>, DomainError> {
        let pharmacies = self.lock_map(&self.pharmacies, "pharmacies")?;
        Ok(pharmacies.get(id).cloned())
    }

    fn list_pharmacies(&self) -> Result<Vec<Pharmacy>, DomainError> {
        let pharmacies = self.lock_map(&self.pharmacies, "pharmacies")?;
        let mut out: Vec<Pharmacy> = pharmacies.values().cloned().collect();
        out.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(out)
    }

    fn list_generic_benefits(&self) -> Result<Vec<GenericBenefit>, DomainError> {
        let benefits = self.lock_map(&self.benefits, "benefits")?;
        let mut out: Vec<GenericBenefit> = benefits.values().filter(|b| b.is_active).cloned().collect();
        sort_generic_benefits(&mut out);
        Ok(out)
    }
}

impl CatalogRepository for InMemoryCatalogRepository {
    fn save_medicine(&self, medicine: Medicine) -> Result<Uuid, DomainError> {
        let id = medicine.id();
        let mut medicines = self.lock_map(&self.medicines, "medicines")?;
        medicines.insert(id, medicine);
        Ok(id)
    }

    fn save_pharmacy(&self, pharmacy: Pharmacy) -> Result<Uuid, DomainError> {
        let id = pharmacy.id();
        let mut pharmacies = self.lock_map(&self.pharmacies, "pharmacies")?;
        if pharmacies.values().any(|p| p.name() == pharmacy.name() && p.id() != id) {
            return Err(DomainError::ValidationError(format!("Ya existe una farmacia llamada {}", pharmacy.name())));
        }
        pharmacies.insert(id, pharmacy);
        Ok(id)
    }

    fn save_price(&self, price: Price) -> Result<Uuid, DomainError> {
        let medicines = self.lock_map(&self.medicines, "medicines")?;
        if !medicines.contains_key(&price.medicine_id()) {
            return Err(DomainError::ValidationError(format!("Medicamento inexistente: {}", price.medicine_id())));
        }
        let pharmacies = self.lock_map(&self.pharmacies, "pharmacies")?;
        if !pharmacies.contains_key(&price.pharmacy_id()) {
            return Err(DomainError::ValidationError(format!("Farmacia inexistente: {}", price.pharmacy_id())));
        }
        let mut prices = self.lock_map(&self.prices, "prices")?;
        let existing = prices.values()
                             .find(|p| p.medicine_id() == price.medicine_id() && p.pharmacy_id() == price.pharmacy_id())
                             .map(|p| p.id());
        let price = match existing {
            Some(existing_id) => {
                log::debug!("replacing price {} for medicine {}", existing_id, price.medicine_id());
                price.with_id(existing_id)
            }
            None => price,
        };
        let id = price.id();
        prices.insert(id, price);
        Ok(id)
    }

    fn save_generic_benefit(&self, benefit: GenericBenefit) -> Result<Uuid, DomainError> {
        let id = benefit.id;
        let mut benefits = self.lock_map(&self.benefits, "benefits")?;
        benefits.insert(id, benefit);
        Ok(id)
    }

    fn delete_medicine(&self, id: &Uuid) -> Result<(), DomainError> {
        let mut medicines = self.lock_map(&self.medicines, "medicines")?;
        let mut prices = self.lock_map(&self.prices, "prices")?;
        prices.retain(|_, p| &p.medicine_id() != id);
        medicines.remove(id);
        Ok(())
    }

    fn delete_pharmacy(&self, id: &Uuid) -> Result<(), DomainError> {
        let mut pharmacies = self.lock_map(&self.pharmacies, "pharmacies")?;
        let mut prices = self.lock_map(&self.prices, "prices")?;
        prices.retain(|_, p| &p.pharmacy_id() != id);
        pharmacies.remove(id);
        Ok(())
    }

    fn clear(&self) -> Result<(), DomainError> {
        self.lock_map(&self.medicines, "medicines")?.clear();
        self.lock_map(&self.pharmacies, "pharmacies")?.clear();
        self.lock_map(&self.prices, "prices")?.clear();
        self.lock_map(&self.benefits, "benefits")?.clear();
        Ok(())
    }
}

impl Default for InMemoryCatalogRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MedicineType, PriceType};
    use rust_decimal::Decimal;

    fn medicine(brand: &str, composition: &str) -> Medicine {
        Medicine::new(brand, composition, "500mg", "Test Manufacturer", MedicineType::Branded).unwrap()
    }

    #[test]
    fn search_is_case_insensitive_sorted_and_limited() -> Result<(), DomainError> {
        let repo = InMemoryCatalogRepository::new();
        for brand in ["Tylenol", "Advil", "tyrex", "Crocin"] {
            repo.save_medicine(medicine(brand, "X"))?;
        }
        let found = repo.find_by_name_contains("TY", 50)?;
        let names: Vec<&str> = found.iter().map(|m| m.brand_name()).collect();
        assert_eq!(names, vec!["Tylenol", "tyrex"]);
        assert_eq!(repo.find_by_name_contains("", 2)?.len(), 2);
        Ok(())
    }

    #[test]
    fn composition_match_is_exact() -> Result<(), DomainError> {
        let repo = InMemoryCatalogRepository::new();
        repo.save_medicine(medicine("Crocin", "Paracetamol 500mg"))?;
        repo.save_medicine(medicine("Calpol", "Paracetamol 500mg"))?;
        repo.save_medicine(medicine("Lower", "paracetamol 500mg"))?;
        let found = repo.find_by_composition("Paracetamol 500mg")?;
        let names: Vec<&str> = found.iter().map(|m| m.brand_name()).collect();
        assert_eq!(names, vec!["Calpol", "Crocin"]);
        Ok(())
    }

    #[test]
    fn save_price_replaces_existing_pair() -> Result<(), DomainError> {
        let repo = InMemoryCatalogRepository::new();
        let m = medicine("Crocin", "Paracetamol 500mg");
        let ph = Pharmacy::new("Apollo Pharmacy", None)?;
        repo.save_medicine(m.clone())?;
        repo.save_pharmacy(ph.clone())?;
        let first = repo.save_price(Price::new(m.id(), ph.id(), Decimal::new(1000, 2), PriceType::Average)?)?;
        let second = repo.save_price(Price::new(m.id(), ph.id(), Decimal::new(900, 2), PriceType::Online)?)?;
        assert_eq!(first, second);
        let entries = repo.list_prices_for_medicine(&m.id())?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount(), Decimal::new(900, 2));
        assert_eq!(entries[0].price.price_type(), PriceType::Online);
        Ok(())
    }

    #[test]
    fn save_price_requires_existing_references() -> Result<(), DomainError> {
        let repo = InMemoryCatalogRepository::new();
        let m = medicine("Crocin", "Paracetamol 500mg");
        repo.save_medicine(m.clone())?;
        let orphan = Price::new(m.id(), Uuid::new_v4(), Decimal::new(1000, 2), PriceType::Average)?;
        assert!(matches!(repo.save_price(orphan), Err(DomainError::ValidationError(_))));
        Ok(())
    }

    #[test]
    fn pharmacy_names_are_unique() -> Result<(), DomainError> {
        let repo = InMemoryCatalogRepository::new();
        let first = Pharmacy::new("MedPlus", None)?;
        repo.save_pharmacy(first.clone())?;
        // Re-saving the same record is a replace, not a duplicate
        repo.save_pharmacy(first)?;
        let dup = Pharmacy::new("MedPlus", Some("https://www.medplusmart.com"))?;
        assert!(matches!(repo.save_pharmacy(dup), Err(DomainError::ValidationError(_))));
        Ok(())
    }

    #[test]
    fn deletes_cascade_to_prices() -> Result<(), DomainError> {
        let repo = InMemoryCatalogRepository::new();
        let m1 = medicine("Crocin", "Paracetamol 500mg");
        let m2 = medicine("Calpol", "Paracetamol 500mg");
        let ph1 = Pharmacy::new("Netmeds", None)?;
        let ph2 = Pharmacy::new("1mg", None)?;
        for m in [&m1, &m2] {
            repo.save_medicine(m.clone())?;
        }
        for ph in [&ph1, &ph2] {
            repo.save_pharmacy(ph.clone())?;
        }
        for (m, ph) in [(&m1, &ph1), (&m1, &ph2), (&m2, &ph1)] {
            repo.save_price(Price::new(m.id(), ph.id(), Decimal::new(1200, 2), PriceType::Average)?)?;
        }
        repo.delete_pharmacy(&ph1.id())?;
        assert_eq!(repo.list_prices_for_medicine(&m1.id())?.len(), 1);
        assert!(repo.list_prices_for_medicine(&m2.id())?.is_empty());
        repo.delete_medicine(&m1.id())?;
        assert!(repo.get_medicine(&m1.id())?.is_none());
        assert!(repo.list_prices_for_medicine(&m1.id())?.is_empty());
        Ok(())
    }

    #[test]
    fn benefits_listed_active_in_display_order() -> Result<(), DomainError> {
        let repo = InMemoryCatalogRepository::new();
        repo.save_generic_benefit(GenericBenefit::new("Same quality", "", "✓", 2)?)?;
        repo.save_generic_benefit(GenericBenefit::new("Lower cost", "", "₹", 1)?)?;
        repo.save_generic_benefit(GenericBenefit::new("Approved", "", "", 1)?)?;
        repo.save_generic_benefit(GenericBenefit::new("Hidden", "", "", 0)?.deactivated())?;
        let titles: Vec<String> = repo.list_generic_benefits()?.into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["Approved", "Lower cost", "Same quality"]);
        Ok(())
    }

    #[test]
    fn mutex_poisoning_returns_error() {
        use std::thread;

        let repo = InMemoryCatalogRepository::new();

        // Poison the medicines mutex by panicking while holding the lock in
        // another thread
        let med_arc = repo.medicines.clone();
        let handle = thread::spawn(move || {
            let _g = med_arc.lock().unwrap();
            panic!("force poison");
        });
        let _ = handle.join();

        match repo.find_by_name_contains("a", 50) {
            Err(DomainError::ExternalError(_)) => (),
            other => panic!("expected ExternalError, got {:?}", other),
        }
    }
}
