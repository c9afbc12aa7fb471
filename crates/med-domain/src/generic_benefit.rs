// generic_benefit.rs
use crate::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Contenido informativo sobre las ventajas de elegir genéricos. Sólo se
/// muestra; no participa en ningún cálculo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericBenefit {
  pub id: Uuid,
  pub title: String,
  pub description: String,
  pub icon: String,
  pub display_order: i32,
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
}

impl GenericBenefit {
  pub fn new(title: &str, description: &str, icon: &str, display_order: i32) -> Result<Self, DomainError> {
    if title.trim().is_empty() {
      return Err(DomainError::ValidationError("El título no puede estar vacío".to_string()));
    }
    Ok(Self { id: Uuid::new_v4(),
              title: title.trim().to_string(),
              description: description.to_string(),
              icon: icon.to_string(),
              display_order,
              is_active: true,
              created_at: Utc::now() })
  }

  pub fn deactivated(mut self) -> Self {
    self.is_active = false;
    self
  }
}

/// Orden de presentación: `display_order` y después título.
pub fn sort_generic_benefits(benefits: &mut [GenericBenefit]) {
  benefits.sort_by(|a, b| a.display_order.cmp(&b.display_order).then_with(|| a.title.cmp(&b.title)));
}

impl fmt::Display for GenericBenefit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.title)
  }
}
