use crate::catalog_repository::{CatalogRepository, InMemoryCatalogRepository};
use crate::{DomainError, GenericBenefit, Medicine, MedicineType, Pharmacy, Price, PriceType};
use rust_decimal::Decimal;

pub struct CatalogStubs;

impl CatalogStubs {
    /// Crea un repositorio en memoria pre-poblado con un pequeño catálogo de
    /// ejemplo: paracetamol (dos marcas y un genérico), ibuprofeno y un
    /// medicamento sin precios.
    pub fn sample_repo() -> Result<InMemoryCatalogRepository, DomainError> {
        let repo = InMemoryCatalogRepository::new();

        let apollo = Pharmacy::new("Apollo Pharmacy", Some("https://www.apollopharmacy.in"))?;
        let medplus = Pharmacy::new("MedPlus", Some("https://www.medplusmart.com"))?;
        let netmeds = Pharmacy::new("Netmeds", Some("https://www.netmeds.com"))?;
        for ph in [&apollo, &medplus, &netmeds] {
            repo.save_pharmacy(ph.clone())?;
        }

        let crocin = Medicine::new("Crocin", "Paracetamol 500mg", "500mg", "GSK Pharmaceuticals", MedicineType::Branded)?;
        let calpol = Medicine::new("Calpol", "Paracetamol 500mg", "500mg", "GSK Pharmaceuticals", MedicineType::Branded)?;
        let paracetamol =
            Medicine::new("Paracetamol", "Paracetamol 500mg", "500mg", "Generic Labs", MedicineType::Generic)?;
        let brufen = Medicine::new("Brufen", "Ibuprofen 400mg", "400mg", "Abbott India", MedicineType::Branded)?;
        let metacin = Medicine::new("Metacin", "Paracetamol 500mg", "500mg", "Mankind Pharma", MedicineType::Branded)?;
        for m in [&crocin, &calpol, &paracetamol, &brufen, &metacin] {
            repo.save_medicine(m.clone())?;
        }

        // Metacin se queda sin precios a propósito.
        let rows = [(&crocin, &apollo, 3000),
                    (&crocin, &medplus, 3500),
                    (&crocin, &netmeds, 4000),
                    (&calpol, &apollo, 2200),
                    (&calpol, &netmeds, 2500),
                    (&paracetamol, &medplus, 1200),
                    (&brufen, &apollo, 4500)];
        for (m, ph, cents) in rows {
            repo.save_price(Price::new(m.id(), ph.id(), Decimal::new(cents, 2), PriceType::Average)?)?;
        }

        repo.save_generic_benefit(GenericBenefit::new("Same active ingredient",
                                                      "Generics contain the same composition as the brand.",
                                                      "💊",
                                                      1)?)?;
        repo.save_generic_benefit(GenericBenefit::new("Lower cost", "Generics usually cost a fraction of the brand.", "₹", 2)?)?;

        Ok(repo)
    }
}
