// Carga de datos de ejemplo: farmacias, medicamentos, precios y beneficios.
use med_domain::{CatalogRepository, Decimal, DomainError, GenericBenefit, Medicine, MedicineType, Pharmacy, Price,
                 PriceType};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const PHARMACIES: &[(&str, &str)] = &[("Apollo Pharmacy", "https://www.apollopharmacy.in"),
                                      ("MedPlus", "https://www.medplusmart.com"),
                                      ("Netmeds", "https://www.netmeds.com"),
                                      ("PharmEasy", "https://www.pharmeasy.in"),
                                      ("1mg", "https://www.1mg.com"),
                                      ("Wellness Forever", "https://www.wellnessforever.com"),
                                      ("Fortis Healthcare Pharmacy", "https://www.fortishealthcare.com")];

// (brand_name, composition, strength, manufacturer)
const MEDICINES: &[(&str, &str, &str, &str)] =
  &[("Crocin", "Paracetamol 500mg", "500mg", "GSK Pharmaceuticals"),
    ("Dolo 650", "Paracetamol 500mg", "500mg", "Micro Labs"),
    ("Calpol", "Paracetamol 500mg", "500mg", "GSK Pharmaceuticals"),
    ("Metacin", "Paracetamol 500mg", "500mg", "Mankind Pharma"),
    ("Brufen", "Ibuprofen 400mg", "400mg", "Abbott India"),
    ("Combiflam", "Ibuprofen 400mg", "400mg", "Sanofi India"),
    ("Ibugesic", "Ibuprofen 400mg", "400mg", "Cipla"),
    ("Omez", "Omeprazole 20mg", "20mg", "Dr. Reddy's Laboratories"),
    ("Omeprazole", "Omeprazole 20mg", "20mg", "Sun Pharma"),
    ("Ocid", "Omeprazole 20mg", "20mg", "Ranbaxy"),
    ("Glycomet", "Metformin 500mg", "500mg", "USV Ltd"),
    ("Obimet", "Metformin 500mg", "500mg", "Mankind Pharma"),
    ("Metsmall", "Metformin 500mg", "500mg", "Ajanta Pharma"),
    ("Atorva", "Atorvastatin 10mg", "10mg", "Zydus Cadila"),
    ("Storvas", "Atorvastatin 10mg", "10mg", "Ranbaxy"),
    ("Lipicure", "Atorvastatin 10mg", "10mg", "Intas Pharmaceuticals"),
    ("Novamox", "Amoxicillin 500mg", "500mg", "Cipla"),
    ("Mox", "Amoxicillin 500mg", "500mg", "Ranbaxy"),
    ("Amoxycillin", "Amoxicillin 500mg", "500mg", "Alkem Laboratories"),
    ("Azithral", "Azithromycin 500mg", "500mg", "Alembic Pharmaceuticals"),
    ("Zady", "Azithromycin 500mg", "500mg", "Mankind Pharma"),
    ("Azee", "Azithromycin 500mg", "500mg", "Cipla"),
    ("Cetrizine", "Cetirizine 10mg", "10mg", "Cipla"),
    ("Alerid", "Cetirizine 10mg", "10mg", "Cipla"),
    ("Okacet", "Cetirizine 10mg", "10mg", "Cipla"),
    ("Pantop", "Pantoprazole 40mg", "40mg", "Aristo Pharmaceuticals"),
    ("Pan", "Pantoprazole 40mg", "40mg", "Alkem Laboratories"),
    ("Cheston Cold", "Cetirizine + Paracetamol", "Combo", "Cipla"),
    ("Sinarest", "Paracetamol + Phenylephrine", "Combo", "Centaur Pharmaceuticals"),
    ("Vicks Action 500", "Paracetamol + Caffeine", "500mg", "Procter & Gamble")];

// Marcas que se registran como genéricos
const GENERIC_BRANDS: &[&str] = &["Omeprazole", "Amoxycillin", "Cetrizine"];

// (title, description, icon)
const BENEFITS: &[(&str, &str, &str)] =
  &[("Same active ingredient",
     "Generics contain the same composition and strength as the branded medicine.",
     "pill"),
    ("Lower cost", "Generic medicines usually cost a fraction of the branded price.", "wallet"),
    ("Quality standards", "Generics are approved against the same regulatory standards.", "shield"),
    ("Wide availability", "Most pharmacies stock generic equivalents of common medicines.", "store")];

/// Base price bounds in paise, `[20.00, 500.00)` rupees.
const BASE_PRICE_CENTS: std::ops::Range<i64> = 2000..50000;
/// Per-pharmacy variation in permille, `[0.800, 1.400)`.
const VARIATION_PERMILLE: std::ops::Range<i64> = 800..1400;

/// Resumen de lo insertado por `seed_catalog`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
  pub pharmacies: usize,
  pub medicines: usize,
  pub prices: usize,
  pub benefits: usize,
}

/// Vacía el catálogo y lo rellena con los datos de ejemplo. Los importes
/// dependen sólo del generador recibido, así que una misma semilla produce
/// los mismos precios.
pub fn seed_catalog<R, G>(repo: &R, rng: &mut G) -> Result<SeedReport, DomainError>
  where R: CatalogRepository + ?Sized,
        G: Rng
{
  log::info!("clearing catalog before seeding");
  repo.clear()?;
  let mut report = SeedReport::default();

  let mut pharmacy_ids = Vec::with_capacity(PHARMACIES.len());
  for (name, url) in PHARMACIES {
    pharmacy_ids.push(repo.save_pharmacy(Pharmacy::new(name, Some(*url))?)?);
    report.pharmacies += 1;
  }

  for (brand, composition, strength, manufacturer) in MEDICINES {
    let medicine_type = if GENERIC_BRANDS.contains(brand) { MedicineType::Generic } else { MedicineType::Branded };
    let medicine_id = repo.save_medicine(Medicine::new(brand, composition, strength, manufacturer, medicine_type)?)?;
    report.medicines += 1;

    let count = rng.gen_range(4..=6);
    let base_cents = rng.gen_range(BASE_PRICE_CENTS);
    let selected: Vec<_> = pharmacy_ids.choose_multiple(rng, count).copied().collect();
    for pharmacy_id in selected {
      let permille = rng.gen_range(VARIATION_PERMILLE);
      // cents (2 dp) * permille (3 dp)
      let amount = Decimal::new(base_cents * permille, 5).round_dp(2);
      repo.save_price(Price::new(medicine_id, pharmacy_id, amount, PriceType::default())?)?;
      report.prices += 1;
    }
  }

  for (order, (title, description, icon)) in BENEFITS.iter().enumerate() {
    let display_order = i32::try_from(order).map_err(|e| DomainError::ValidationError(e.to_string()))?;
    repo.save_generic_benefit(GenericBenefit::new(title, description, icon, display_order)?)?;
    report.benefits += 1;
  }

  log::info!("seeded {} pharmacies, {} medicines, {} prices, {} benefits",
             report.pharmacies,
             report.medicines,
             report.prices,
             report.benefits);
  Ok(report)
}

/// Igual que `seed_catalog` con un `StdRng` creado a partir de `seed`.
pub fn seed_with_seed<R>(repo: &R, seed: u64) -> Result<SeedReport, DomainError>
  where R: CatalogRepository + ?Sized
{
  let mut rng = StdRng::seed_from_u64(seed);
  seed_catalog(repo, &mut rng)
}
