use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;
use uuid::Uuid;
use med_domain::CatalogRepository;
use med_persistence::{new_from_env, seed_with_seed, DieselCatalogRepository};
use med_pricing::{LookupService, MedicineResults, PricingError};

/// Semilla usada por la opción de re-sembrado si `MEDPRICE_SEED` no está
/// definida o no es un número.
const DEFAULT_SEED: u64 = 42;

/// Pequeño menú interactivo para consultar precios de medicamentos usando el
/// repositorio proporcionado por `med-persistence`.
///
/// Opciones soportadas:
/// 1) Buscar medicamentos por nombre comercial
/// 2) Ver precios y alternativas de un medicamento (tabla o JSON)
/// 3) Ver beneficios de los genéricos
/// 4) Re-sembrar el catálogo con datos de ejemplo
/// 5) Salir
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    // Inicializar repo (aplica migraciones embebidas si procede)
    let repo = Arc::new(new_from_env().map_err(|e| Box::new(e) as Box<dyn Error>)?);
    let lookup = LookupService::new(repo.clone());

    loop {
        println!("\n== Comparador de precios ==");
        println!("1) Buscar medicamento");
        println!("2) Ver precios y alternativas (por id)");
        println!("3) Beneficios de los genéricos");
        println!("4) Re-sembrar catálogo de ejemplo");
        println!("5) Salir");
        print!("Elige una opción: ");
        io::stdout().flush().ok();

        let mut choice = String::new();
        if io::stdin().read_line(&mut choice)? == 0 {
            break;
        }
        match choice.trim() {
            "1" => {
                let query = prompt("Nombre (o parte del nombre): ")?;
                match lookup.search(&query) {
                    Ok(found) if found.is_empty() => println!("Sin resultados"),
                    Ok(found) => {
                        println!("\nID                                   | TIPO      | MEDICAMENTO");
                        println!("-----------------------------------------------------------------------------------");
                        for m in found {
                            println!("{} | {:<9} | {}", m.id(), m.medicine_type().label(), m);
                        }
                    }
                    Err(e) => eprintln!("Error buscando: {}", e),
                }
            }
            "2" => {
                let id_s = prompt("Id del medicamento (UUID): ")?;
                let id = match Uuid::parse_str(id_s.trim()) {
                    Ok(u) => u,
                    Err(_) => { eprintln!("UUID inválido"); continue; }
                };
                let format = prompt("Formato (enter para tabla, 'json'): ")?;
                match lookup.results(&id) {
                    Ok(results) if format.trim().eq_ignore_ascii_case("json") => {
                        match serde_json::to_string_pretty(&results) {
                            Ok(s) => println!("{}", s),
                            Err(e) => eprintln!("Error serializando resultados: {}", e),
                        }
                    }
                    Ok(results) => print_results(&results),
                    // Vuelve al menú, como la página de inicio
                    Err(PricingError::NotFound(_)) => println!("Medicamento no encontrado: {}", id),
                    Err(e) => eprintln!("Error consultando precios: {}", e),
                }
            }
            "3" => match lookup.generic_benefits() {
                Ok(benefits) if benefits.is_empty() => println!("No hay beneficios registrados"),
                Ok(benefits) => {
                    for b in benefits {
                        println!("[{}] {}: {}", b.icon, b.title, b.description);
                    }
                }
                Err(e) => eprintln!("Error listando beneficios: {}", e),
            },
            "4" => {
                let confirm = prompt("Se borrará el catálogo actual. Escribir 'yes' para confirmar: ")?;
                if confirm.trim().to_lowercase() == "yes" {
                    reseed(repo.as_ref());
                } else {
                    println!("Re-sembrado cancelado");
                }
            }
            "5" => {
                println!("Saliendo...");
                break;
            }
            other => {
                println!("Opción inválida: {}", other);
            }
        }
    }

    Ok(())
}

fn print_results(results: &MedicineResults) {
    let c = &results.comparison;
    println!("\n{} [{}]", c.medicine, c.medicine.medicine_type().label());
    println!("{} {} · {}", c.medicine.strength(), c.medicine.manufacturer(), c.medicine.id());
    if !c.has_prices() {
        println!("Sin precios disponibles");
    } else {
        println!("\nFARMACIA                       | PRECIO");
        println!("----------------------------------------------");
        for entry in &c.prices {
            println!("{:<30} | ₹{}", entry.pharmacy_name(), entry.amount());
        }
        if let (Some(low), Some(high)) = (c.lowest_price, c.highest_price) {
            println!("Mínimo ₹{} · Máximo ₹{} · Ahorro {}%", low, high, c.savings_percentage);
        }
    }
    if results.alternatives.is_empty() {
        println!("\nSin alternativas con la misma composición");
        return;
    }
    println!("\nALTERNATIVA                    | TIPO      | PRECIO     | FARMACIA                  | AHORRO");
    println!("---------------------------------------------------------------------------------------------------");
    for alt in &results.alternatives {
        println!("{:<30} | {:<9} | ₹{:<9} | {:<25} | ₹{} ({}%)",
                 alt.medicine.brand_name(),
                 alt.medicine.medicine_type().label(),
                 alt.lowest_price,
                 alt.pharmacy_name,
                 alt.savings_amount,
                 alt.savings_percentage);
    }
}

fn reseed(repo: &DieselCatalogRepository) {
    let seed = match std::env::var("MEDPRICE_SEED") {
        Ok(s) => s.trim().parse().unwrap_or_else(|_| {
                                      log::warn!("MEDPRICE_SEED inválido ({}), usando {}", s, DEFAULT_SEED);
                                      DEFAULT_SEED
                                  }),
        Err(_) => DEFAULT_SEED,
    };
    match seed_with_seed(repo, seed) {
        Ok(report) => println!("Catálogo sembrado (semilla {}): {} farmacias, {} medicamentos, {} precios, {} beneficios",
                               seed, report.pharmacies, report.medicines, report.prices, report.benefits),
        Err(e) => {
            eprintln!("Error sembrando catálogo: {}", e);
            // Dejar el catálogo vacío antes que a medias
            if let Err(e) = repo.clear() {
                eprintln!("Error limpiando catálogo: {}", e);
            }
        }
    }
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}
