// price.rs
use crate::{DomainError, Medicine, Pharmacy};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Escala (decimales) con la que se almacenan los importes.
pub const PRICE_SCALE: u32 = 2;
/// Número máximo de dígitos significativos de un importe.
pub const PRICE_MAX_DIGITS: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
  Mrp,
  #[default]
  Average,
  Online,
}

impl PriceType {
  pub fn as_str(&self) -> &'static str {
    match self {
      PriceType::Mrp => "mrp",
      PriceType::Average => "average",
      PriceType::Online => "online",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      PriceType::Mrp => "Maximum Retail Price",
      PriceType::Average => "Average Market Price",
      PriceType::Online => "Online Price",
    }
  }
}

impl FromStr for PriceType {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "mrp" => Ok(PriceType::Mrp),
      "average" => Ok(PriceType::Average),
      "online" => Ok(PriceType::Online),
      other => Err(DomainError::ValidationError(format!("Tipo de precio desconocido: {}", other))),
    }
  }
}

/// Precio de un medicamento en una farmacia. Existe como mucho un precio por
/// par (medicamento, farmacia); guardarlo de nuevo reemplaza el anterior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
  id: Uuid,
  medicine_id: Uuid,
  pharmacy_id: Uuid,
  amount: Decimal,
  price_type: PriceType,
  last_updated: DateTime<Utc>,
}

impl Price {
  pub fn new(medicine_id: Uuid, pharmacy_id: Uuid, amount: Decimal, price_type: PriceType) -> Result<Self, DomainError> {
    Self::from_parts(Uuid::new_v4(), medicine_id, pharmacy_id, amount, price_type, Utc::now())
  }

  pub fn from_parts(id: Uuid,
                    medicine_id: Uuid,
                    pharmacy_id: Uuid,
                    amount: Decimal,
                    price_type: PriceType,
                    last_updated: DateTime<Utc>)
                    -> Result<Self, DomainError> {
    if amount <= Decimal::ZERO {
      return Err(DomainError::ValidationError("El precio debe ser mayor que cero".to_string()));
    }
    if amount.round_dp(PRICE_SCALE) != amount {
      return Err(DomainError::ValidationError(format!("El precio admite como mucho {} decimales: {}", PRICE_SCALE, amount)));
    }
    let mut amount = amount;
    amount.rescale(PRICE_SCALE);
    if amount.mantissa().unsigned_abs().to_string().len() > PRICE_MAX_DIGITS as usize {
      return Err(DomainError::ValidationError(format!("El precio excede {} dígitos: {}", PRICE_MAX_DIGITS, amount)));
    }
    Ok(Self { id, medicine_id, pharmacy_id, amount, price_type, last_updated })
  }

  /// Devuelve una copia con un nuevo id, útil para reemplazar la fila
  /// existente de un par (medicamento, farmacia).
  pub fn with_id(mut self, id: Uuid) -> Self {
    self.id = id;
    self
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn medicine_id(&self) -> Uuid {
    self.medicine_id
  }

  pub fn pharmacy_id(&self) -> Uuid {
    self.pharmacy_id
  }

  pub fn amount(&self) -> Decimal {
    self.amount
  }

  pub fn price_type(&self) -> PriceType {
    self.price_type
  }

  pub fn last_updated(&self) -> DateTime<Utc> {
    self.last_updated
  }
}

/// Precio junto a la farmacia que lo ofrece, tal como lo devuelve
/// `CatalogReader::list_prices_for_medicine`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEntry {
  pub price: Price,
  pub pharmacy: Pharmacy,
}

impl PriceEntry {
  pub fn new(price: Price, pharmacy: Pharmacy) -> Result<Self, DomainError> {
    if price.pharmacy_id() != pharmacy.id() {
      return Err(DomainError::ValidationError(format!("El precio {} no pertenece a la farmacia {}",
                                                      price.id(),
                                                      pharmacy.id())));
    }
    Ok(Self { price, pharmacy })
  }

  pub fn amount(&self) -> Decimal {
    self.price.amount()
  }

  pub fn pharmacy_name(&self) -> &str {
    self.pharmacy.name()
  }

  pub fn describe(&self, medicine: &Medicine) -> String {
    format!("{} at {}: ₹{}", medicine.brand_name(), self.pharmacy.name(), self.price.amount())
  }
}

impl fmt::Display for PriceEntry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: ₹{}", self.pharmacy.name(), self.price.amount())
  }
}

/// Orden canónico de los precios de un medicamento: importe ascendente y,
/// a igual importe, nombre de farmacia.
pub fn sort_price_entries(entries: &mut [PriceEntry]) {
  entries.sort_by(|a, b| a.amount().cmp(&b.amount()).then_with(|| a.pharmacy_name().cmp(b.pharmacy_name())));
}
