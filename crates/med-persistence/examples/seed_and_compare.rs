use med_persistence::{new_from_env, seed_with_seed};
use med_pricing::LookupService;
use std::sync::Arc;

fn main() {
  // Usa MEDPRICE_DB_URL / DATABASE_URL; sin ninguna de las dos, `medprice.db`
  // en el directorio actual (build SQLite por defecto).
  let repo = Arc::new(new_from_env().expect("no se pudo inicializar el repositorio"));
  let report = seed_with_seed(repo.as_ref(), 42).expect("seed");
  println!("seeded {} medicines with {} prices", report.medicines, report.prices);

  let lookup = LookupService::new(repo);
  let crocin = lookup.search("crocin").expect("search").into_iter().next().expect("Crocin seeded");
  let results = lookup.results(&crocin.id()).expect("results");
  for entry in &results.comparison.prices {
    println!("  {}", entry.describe(&crocin));
  }
  println!("savings between pharmacies: {}%", results.comparison.savings_percentage);
  for alt in &results.alternatives {
    println!("  alt {} ({}) from {} saves {} ({}%)",
             alt.medicine.brand_name(),
             if alt.is_generic { "generic" } else { "branded" },
             alt.pharmacy_name,
             alt.savings_amount,
             alt.savings_percentage);
  }
}
