use crate::schema;
use crate::schema::generic_benefits::dsl as gb_dsl;
use crate::schema::medicines::dsl as med_dsl;
use crate::schema::pharmacies::dsl as ph_dsl;
use crate::schema::prices::dsl as pr_dsl;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::Error as DieselError;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use med_domain::{sort_generic_benefits, sort_price_entries, CatalogReader, CatalogRepository, Decimal, DomainError,
                 GenericBenefit, Medicine, Pharmacy, Price, PriceEntry};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");
/// Default database used by the SQLite build when no URL is configured.
pub const DEFAULT_SQLITE_URL: &str = "medprice.db";
#[cfg(feature = "pg")]
type DbConn = PgConnection;
#[cfg(not(feature = "pg"))]
type DbConn = SqliteConnection;
type DbPool = Pool<ConnectionManager<DbConn>>;
/// Repo Diesel que implementa `CatalogRepository`.
pub struct DieselCatalogRepository {
  pool: Arc<DbPool>,
}
impl DieselCatalogRepository {
  /// Opens the pool and applies pending migrations.
  pub fn new(database_url: &str) -> Result<Self, DomainError> {
    let manager = ConnectionManager::<DbConn>::new(database_url);
    let pool = Pool::builder().max_size(4)
                              .build(manager)
                              .map_err(|e| DomainError::ExternalError(format!("pool: {}", e)))?;
    let repo = DieselCatalogRepository { pool: Arc::new(pool) };
    let mut c = repo.conn()?;
    #[cfg(not(feature = "pg"))]
    {
      let _ = diesel::sql_query("PRAGMA journal_mode = WAL;").execute(&mut c);
      let _ = diesel::sql_query("PRAGMA busy_timeout = 5000;").execute(&mut c);
    }
    let applied =
      c.run_pending_migrations(MIGRATIONS).map_err(|e| DomainError::ExternalError(format!("migrations: {}", e)))?;
    if !applied.is_empty() {
      log::info!("applied {} catalog migration(s)", applied.len());
    }
    drop(c);
    Ok(repo)
  }
  fn conn(&self) -> Result<PooledConnection<ConnectionManager<DbConn>>, DomainError> {
    self.pool.get().map_err(|e| DomainError::ExternalError(format!("pool: {}", e)))
  }
}
// Diesel row structs for the catalog tables
#[derive(Debug, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = schema::medicines)]
#[diesel(treat_none_as_null = true)]
struct MedicineRow {
  pub id: String,
  pub brand_name: String,
  pub composition: String,
  pub strength: String,
  pub manufacturer: String,
  pub medicine_type: String,
  pub description: Option<String>,
  pub uses: Option<String>,
  pub side_effects: Option<String>,
  pub created_at_ts: i64,
}
#[derive(Debug, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = schema::pharmacies)]
#[diesel(treat_none_as_null = true)]
struct PharmacyRow {
  pub id: String,
  pub name: String,
  pub website_url: Option<String>,
  pub created_at_ts: i64,
}
#[derive(Debug, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = schema::prices)]
struct PriceRow {
  pub id: String,
  pub medicine_id: String,
  pub pharmacy_id: String,
  pub price: String,
  pub price_type: String,
  pub last_updated_ts: i64,
}
#[derive(Debug, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = schema::generic_benefits)]
struct GenericBenefitRow {
  pub id: String,
  pub title: String,
  pub description: String,
  pub icon: String,
  pub display_order: i32,
  pub is_active: bool,
  pub created_at_ts: i64,
}
fn map_db_err<T>(res: std::result::Result<T, DieselError>) -> Result<T, DomainError> {
  res.map_err(|e| DomainError::ExternalError(format!("db: {}", e)))
}
fn parse_uuid(s: &str) -> Result<Uuid, DomainError> {
  Uuid::parse_str(s).map_err(|e| DomainError::SerializationError(format!("invalid uuid {}: {}", s, e)))
}
fn from_millis(ts: i64) -> Result<DateTime<Utc>, DomainError> {
  DateTime::<Utc>::from_timestamp_millis(ts).ok_or_else(|| DomainError::SerializationError(format!("invalid timestamp: {}", ts)))
}
impl MedicineRow {
  fn from_domain(m: &Medicine) -> Self {
    MedicineRow { id: m.id().to_string(),
                  brand_name: m.brand_name().to_string(),
                  composition: m.composition().to_string(),
                  strength: m.strength().to_string(),
                  manufacturer: m.manufacturer().to_string(),
                  medicine_type: m.medicine_type().as_str().to_string(),
                  description: m.description().map(|s| s.to_string()),
                  uses: m.uses().map(|s| s.to_string()),
                  side_effects: m.side_effects().map(|s| s.to_string()),
                  created_at_ts: m.created_at().timestamp_millis() }
  }
  fn into_domain(self) -> Result<Medicine, DomainError> {
    let m = Medicine::from_parts(parse_uuid(&self.id)?,
                                 &self.brand_name,
                                 &self.composition,
                                 &self.strength,
                                 &self.manufacturer,
                                 self.medicine_type.parse()?,
                                 from_millis(self.created_at_ts)?)?;
    Ok(m.with_info(self.description, self.uses, self.side_effects))
  }
}
impl PharmacyRow {
  fn from_domain(p: &Pharmacy) -> Self {
    PharmacyRow { id: p.id().to_string(),
                  name: p.name().to_string(),
                  website_url: p.website_url().map(|s| s.to_string()),
                  created_at_ts: p.created_at().timestamp_millis() }
  }
  fn into_domain(self) -> Result<Pharmacy, DomainError> {
    Pharmacy::from_parts(parse_uuid(&self.id)?, &self.name, self.website_url.as_deref(), from_millis(self.created_at_ts)?)
  }
}
impl PriceRow {
  fn from_domain(p: &Price) -> Self {
    PriceRow { id: p.id().to_string(),
               medicine_id: p.medicine_id().to_string(),
               pharmacy_id: p.pharmacy_id().to_string(),
               price: p.amount().to_string(),
               price_type: p.price_type().as_str().to_string(),
               last_updated_ts: p.last_updated().timestamp_millis() }
  }
  fn into_domain(self) -> Result<Price, DomainError> {
    Price::from_parts(parse_uuid(&self.id)?,
                      parse_uuid(&self.medicine_id)?,
                      parse_uuid(&self.pharmacy_id)?,
                      Decimal::from_str(&self.price)?,
                      self.price_type.parse()?,
                      from_millis(self.last_updated_ts)?)
  }
}
impl GenericBenefitRow {
  fn from_domain(b: &GenericBenefit) -> Self {
    GenericBenefitRow { id: b.id.to_string(),
                        title: b.title.clone(),
                        description: b.description.clone(),
                        icon: b.icon.clone(),
                        display_order: b.display_order,
                        is_active: b.is_active,
                        created_at_ts: b.created_at.timestamp_millis() }
  }
  fn into_domain(self) -> Result<GenericBenefit, DomainError> {
    Ok(GenericBenefit { id: parse_uuid(&self.id)?,
                        title: self.title,
                        description: self.description,
                        icon: self.icon,
                        display_order: self.display_order,
                        is_active: self.is_active,
                        created_at: from_millis(self.created_at_ts)? })
  }
}
impl CatalogReader for DieselCatalogRepository {
  fn get_medicine(&self, id: &Uuid) -> Result<Option<Medicine>, DomainError> {
    let mut conn = self.conn()?;
    let opt =
      map_db_err(med_dsl::medicines.filter(med_dsl::id.eq(id.to_string())).first::<MedicineRow>(&mut conn).optional())?;
    opt.map(MedicineRow::into_domain).transpose()
  }
  fn find_by_name_contains(&self, fragment: &str, limit: usize) -> Result<Vec<Medicine>, DomainError> {
    let mut conn = self.conn()?;
    // SQL lower() only folds ASCII; match in Rust like the in-memory store
    let needle = fragment.to_lowercase();
    let rows = map_db_err(med_dsl::medicines.load::<MedicineRow>(&mut conn))?;
    let mut found = rows.into_iter()
                        .filter(|row| row.brand_name.to_lowercase().contains(&needle))
                        .map(MedicineRow::into_domain)
                        .collect::<Result<Vec<_>, _>>()?;
    // Byte order on brand name then id, independent of the backend collation
    found.sort_by(|a, b| a.brand_name().cmp(b.brand_name()).then_with(|| a.id().cmp(&b.id())));
    found.truncate(limit);
    Ok(found)
  }
  fn find_by_composition(&self, composition: &str) -> Result<Vec<Medicine>, DomainError> {
    let mut conn = self.conn()?;
    let rows = map_db_err(med_dsl::medicines.filter(med_dsl::composition.eq(composition))
                                            .order((med_dsl::brand_name.asc(), med_dsl::id.asc()))
                                            .load::<MedicineRow>(&mut conn))?;
    rows.into_iter().map(MedicineRow::into_domain).collect()
  }
  fn list_prices_for_medicine(&self, medicine_id: &Uuid) -> Result<Vec<PriceEntry>, DomainError> {
    let mut conn = self.conn()?;
    // Amounts are stored as text, so ordering happens after parsing
    let rows = map_db_err(schema::prices::table.inner_join(schema::pharmacies::table)
                                               .filter(pr_dsl::medicine_id.eq(medicine_id.to_string()))
                                               .load::<(PriceRow, PharmacyRow)>(&mut conn))?;
    let mut entries = Vec::with_capacity(rows.len());
    for (pr, ph) in rows {
      entries.push(PriceEntry::new(pr.into_domain()?, ph.into_domain()?)?);
    }
    sort_price_entries(&mut entries);
    Ok(entries)
  }
  fn get_pharmacy(&self, id: &Uuid) -> Result<Option<Pharmacy>, DomainError> {
    let mut conn = self.conn()?;
    let opt =
      map_db_err(ph_dsl::pharmacies.filter(ph_dsl::id.eq(id.to_string())).first::<PharmacyRow>(&mut conn).optional())?;
    opt.map(PharmacyRow::into_domain).transpose()
  }
  fn list_pharmacies(&self) -> Result<Vec<Pharmacy>, DomainError> {
    let mut conn = self.conn()?;
    let rows = map_db_err(ph_dsl::pharmacies.order(ph_dsl::name.asc()).load::<PharmacyRow>(&mut conn))?;
    rows.into_iter().map(PharmacyRow::into_domain).collect()
  }
  fn list_generic_benefits(&self) -> Result<Vec<GenericBenefit>, DomainError> {
    let mut conn = self.conn()?;
    let rows = map_db_err(gb_dsl::generic_benefits.filter(gb_dsl::is_active.eq(true)).load::<GenericBenefitRow>(&mut conn))?;
    let mut out = rows.into_iter().map(GenericBenefitRow::into_domain).collect::<Result<Vec<_>, _>>()?;
    sort_generic_benefits(&mut out);
    Ok(out)
  }
}
impl CatalogRepository for DieselCatalogRepository {
  fn save_medicine(&self, medicine: Medicine) -> Result<Uuid, DomainError> {
    let mut conn = self.conn()?;
    let row = MedicineRow::from_domain(&medicine);
    // Replace-on-save: update by id, insert when the row does not exist yet
    let updated =
      map_db_err(diesel::update(med_dsl::medicines.filter(med_dsl::id.eq(&row.id))).set(&row).execute(&mut conn))?;
    if updated == 0 {
      map_db_err(diesel::insert_into(med_dsl::medicines).values(&row).execute(&mut conn))?;
    }
    Ok(medicine.id())
  }
  fn save_pharmacy(&self, pharmacy: Pharmacy) -> Result<Uuid, DomainError> {
    let mut conn = self.conn()?;
    let row = PharmacyRow::from_domain(&pharmacy);
    let clash = map_db_err(ph_dsl::pharmacies.filter(ph_dsl::name.eq(&row.name))
                                             .filter(ph_dsl::id.ne(&row.id))
                                             .select(ph_dsl::id)
                                             .first::<String>(&mut conn)
                                             .optional())?;
    if clash.is_some() {
      return Err(DomainError::ValidationError(format!("Ya existe una farmacia llamada {}", row.name)));
    }
    let updated =
      map_db_err(diesel::update(ph_dsl::pharmacies.filter(ph_dsl::id.eq(&row.id))).set(&row).execute(&mut conn))?;
    if updated == 0 {
      map_db_err(diesel::insert_into(ph_dsl::pharmacies).values(&row).execute(&mut conn))?;
    }
    Ok(pharmacy.id())
  }
  fn save_price(&self, price: Price) -> Result<Uuid, DomainError> {
    let mut conn = self.conn()?;
    let medicine_id = price.medicine_id().to_string();
    let pharmacy_id = price.pharmacy_id().to_string();
    let medicine_exists = map_db_err(med_dsl::medicines.filter(med_dsl::id.eq(&medicine_id))
                                                       .select(med_dsl::id)
                                                       .first::<String>(&mut conn)
                                                       .optional())?;
    if medicine_exists.is_none() {
      return Err(DomainError::ValidationError(format!("Medicamento inexistente: {}", medicine_id)));
    }
    let pharmacy_exists = map_db_err(ph_dsl::pharmacies.filter(ph_dsl::id.eq(&pharmacy_id))
                                                       .select(ph_dsl::id)
                                                       .first::<String>(&mut conn)
                                                       .optional())?;
    if pharmacy_exists.is_none() {
      return Err(DomainError::ValidationError(format!("Farmacia inexistente: {}", pharmacy_id)));
    }
    let existing = map_db_err(pr_dsl::prices.filter(pr_dsl::medicine_id.eq(&medicine_id))
                                            .filter(pr_dsl::pharmacy_id.eq(&pharmacy_id))
                                            .select(pr_dsl::id)
                                            .first::<String>(&mut conn)
                                            .optional())?;
    match existing {
      Some(existing_id) => {
        log::debug!("replacing price {} for medicine {}", existing_id, medicine_id);
        let price = price.with_id(parse_uuid(&existing_id)?);
        let row = PriceRow::from_domain(&price);
        map_db_err(diesel::update(pr_dsl::prices.filter(pr_dsl::id.eq(&existing_id))).set(&row).execute(&mut conn))?;
        Ok(price.id())
      }
      None => {
        let row = PriceRow::from_domain(&price);
        map_db_err(diesel::insert_into(pr_dsl::prices).values(&row).execute(&mut conn))?;
        Ok(price.id())
      }
    }
  }
  fn save_generic_benefit(&self, benefit: GenericBenefit) -> Result<Uuid, DomainError> {
    let mut conn = self.conn()?;
    let row = GenericBenefitRow::from_domain(&benefit);
    let updated =
      map_db_err(diesel::update(gb_dsl::generic_benefits.filter(gb_dsl::id.eq(&row.id))).set(&row).execute(&mut conn))?;
    if updated == 0 {
      map_db_err(diesel::insert_into(gb_dsl::generic_benefits).values(&row).execute(&mut conn))?;
    }
    Ok(benefit.id)
  }
  fn delete_medicine(&self, id: &Uuid) -> Result<(), DomainError> {
    let mut conn = self.conn()?;
    let id_s = id.to_string();
    map_db_err(conn.transaction::<_, DieselError, _>(|conn| {
                     diesel::delete(pr_dsl::prices.filter(pr_dsl::medicine_id.eq(&id_s))).execute(conn)?;
                     diesel::delete(med_dsl::medicines.filter(med_dsl::id.eq(&id_s))).execute(conn)?;
                     Ok(())
                   }))
  }
  fn delete_pharmacy(&self, id: &Uuid) -> Result<(), DomainError> {
    let mut conn = self.conn()?;
    let id_s = id.to_string();
    map_db_err(conn.transaction::<_, DieselError, _>(|conn| {
                     diesel::delete(pr_dsl::prices.filter(pr_dsl::pharmacy_id.eq(&id_s))).execute(conn)?;
                     diesel::delete(ph_dsl::pharmacies.filter(ph_dsl::id.eq(&id_s))).execute(conn)?;
                     Ok(())
                   }))
  }
  fn clear(&self) -> Result<(), DomainError> {
    let mut conn = self.conn()?;
    map_db_err(conn.transaction::<_, DieselError, _>(|conn| {
                     diesel::delete(pr_dsl::prices).execute(conn)?;
                     diesel::delete(med_dsl::medicines).execute(conn)?;
                     diesel::delete(ph_dsl::pharmacies).execute(conn)?;
                     diesel::delete(gb_dsl::generic_benefits).execute(conn)?;
                     Ok(())
                   }))
  }
}
/// Crear repo desde las variables de entorno (`MEDPRICE_DB_URL`, con
/// `DATABASE_URL` como alternativa). Carga `.env` si existe.
pub fn new_from_env() -> Result<DieselCatalogRepository, DomainError> {
  dotenvy::dotenv().ok();
  let url = resolve_database_url(std::env::var("MEDPRICE_DB_URL").ok(), std::env::var("DATABASE_URL").ok())?;
  DieselCatalogRepository::new(&url)
}
#[cfg(feature = "pg")]
fn resolve_database_url(medprice_url: Option<String>, database_url: Option<String>) -> Result<String, DomainError> {
  let url = medprice_url.or(database_url)
                        .ok_or_else(|| DomainError::ExternalError("MEDPRICE_DB_URL / DATABASE_URL not set".into()))?;
  let l = url.to_lowercase();
  if !(l.starts_with("postgres://") || l.starts_with("postgresql://") || url.contains('@')) {
    return Err(DomainError::ExternalError("MEDPRICE_DB_URL / DATABASE_URL does not look like Postgres URL".into()));
  }
  Ok(url)
}
#[cfg(not(feature = "pg"))]
fn resolve_database_url(medprice_url: Option<String>, database_url: Option<String>) -> Result<String, DomainError> {
  let url = medprice_url.or(database_url).unwrap_or_else(|| DEFAULT_SQLITE_URL.to_string());
  if url.to_lowercase().starts_with("postgres") {
    return Err(DomainError::ExternalError("med-persistence was compiled without 'pg' feature; enable the 'pg' feature \
                                           to use Postgres"
                                                           .into()));
  }
  Ok(url)
}
