// medicine.rs
use crate::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const BRAND_NAME_MAX_LEN: usize = 200;
pub const COMPOSITION_MAX_LEN: usize = 500;
pub const STRENGTH_MAX_LEN: usize = 100;
pub const MANUFACTURER_MAX_LEN: usize = 200;

/// Recorta `value` y exige que no quede vacío ni supere `max_len`
/// caracteres.
pub(crate) fn required_text(value: &str, field: &str, max_len: usize) -> Result<String, DomainError> {
  let value = value.trim();
  if value.is_empty() {
    return Err(DomainError::ValidationError(format!("El campo {} no puede estar vacío", field)));
  }
  check_max_len(value, field, max_len)?;
  Ok(value.to_string())
}

pub(crate) fn check_max_len(value: &str, field: &str, max_len: usize) -> Result<(), DomainError> {
  let len = value.chars().count();
  if len > max_len {
    return Err(DomainError::ValidationError(format!("El campo {} supera {} caracteres ({})", field, max_len, len)));
  }
  Ok(())
}

/// Tipo comercial de un medicamento.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicineType {
  #[default]
  Branded,
  Generic,
}

impl MedicineType {
  pub fn as_str(&self) -> &'static str {
    match self {
      MedicineType::Branded => "branded",
      MedicineType::Generic => "generic",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      MedicineType::Branded => "Branded",
      MedicineType::Generic => "Generic",
    }
  }
}

impl FromStr for MedicineType {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "branded" => Ok(MedicineType::Branded),
      "generic" => Ok(MedicineType::Generic),
      other => Err(DomainError::ValidationError(format!("Tipo de medicamento desconocido: {}", other))),
    }
  }
}

impl fmt::Display for MedicineType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Medicamento del catálogo. La `composition` identifica la clase de
/// equivalencia terapéutica: dos medicamentos con la misma composición son
/// alternativas entre sí.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medicine {
  id: Uuid,
  brand_name: String,
  composition: String,
  strength: String,
  manufacturer: String,
  medicine_type: MedicineType,
  description: Option<String>,
  uses: Option<String>,
  side_effects: Option<String>,
  created_at: DateTime<Utc>,
}

impl Medicine {
  pub fn new(brand_name: &str,
             composition: &str,
             strength: &str,
             manufacturer: &str,
             medicine_type: MedicineType)
             -> Result<Self, DomainError> {
    Self::from_parts(Uuid::new_v4(), brand_name, composition, strength, manufacturer, medicine_type, Utc::now())
  }

  /// Reconstruye un medicamento ya persistido conservando su id y fecha de
  /// creación. Aplica las mismas validaciones que `new`.
  pub fn from_parts(id: Uuid,
                    brand_name: &str,
                    composition: &str,
                    strength: &str,
                    manufacturer: &str,
                    medicine_type: MedicineType,
                    created_at: DateTime<Utc>)
                    -> Result<Self, DomainError> {
    Ok(Self { id,
              brand_name: required_text(brand_name, "nombre comercial", BRAND_NAME_MAX_LEN)?,
              composition: required_text(composition, "composición", COMPOSITION_MAX_LEN)?,
              strength: required_text(strength, "concentración", STRENGTH_MAX_LEN)?,
              manufacturer: required_text(manufacturer, "fabricante", MANUFACTURER_MAX_LEN)?,
              medicine_type,
              description: None,
              uses: None,
              side_effects: None,
              created_at })
  }

  /// Reemplaza los textos informativos (descripción, usos y efectos
  /// secundarios). Los textos en blanco se guardan como `None`.
  pub fn with_info(mut self, description: Option<String>, uses: Option<String>, side_effects: Option<String>) -> Self {
    self.description = non_blank(description);
    self.uses = non_blank(uses);
    self.side_effects = non_blank(side_effects);
    self
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = non_blank(Some(description.into()));
    self
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn brand_name(&self) -> &str {
    &self.brand_name
  }

  pub fn composition(&self) -> &str {
    &self.composition
  }

  pub fn strength(&self) -> &str {
    &self.strength
  }

  pub fn manufacturer(&self) -> &str {
    &self.manufacturer
  }

  pub fn medicine_type(&self) -> MedicineType {
    self.medicine_type
  }

  pub fn is_generic(&self) -> bool {
    self.medicine_type == MedicineType::Generic
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  pub fn uses(&self) -> Option<&str> {
    self.uses.as_deref()
  }

  pub fn side_effects(&self) -> Option<&str> {
    self.side_effects.as_deref()
  }

  pub fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }

  /// Dos medicamentos son alternativas si comparten la composición exacta y
  /// no son el mismo registro.
  pub fn is_alternative_to(&self, other: &Medicine) -> bool {
    self.id != other.id && self.composition == other.composition
  }
}

fn non_blank(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

impl fmt::Display for Medicine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.brand_name, self.composition)
  }
}
