// pharmacy.rs
use crate::medicine::{check_max_len, required_text};
use crate::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const PHARMACY_NAME_MAX_LEN: usize = 200;
pub const WEBSITE_URL_MAX_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pharmacy {
  id: Uuid,
  name: String,
  website_url: Option<String>,
  created_at: DateTime<Utc>,
}

impl Pharmacy {
  pub fn new(name: &str, website_url: Option<&str>) -> Result<Self, DomainError> {
    Self::from_parts(Uuid::new_v4(), name, website_url, Utc::now())
  }

  pub fn from_parts(id: Uuid,
                    name: &str,
                    website_url: Option<&str>,
                    created_at: DateTime<Utc>)
                    -> Result<Self, DomainError> {
    let name = required_text(name, "nombre de la farmacia", PHARMACY_NAME_MAX_LEN)?;
    let website_url = match website_url.map(str::trim).filter(|u| !u.is_empty()) {
      Some(url) => {
        check_max_len(url, "URL de la farmacia", WEBSITE_URL_MAX_LEN)?;
        let lower = url.to_lowercase();
        let rest = lower.strip_prefix("https://").or_else(|| lower.strip_prefix("http://"));
        if rest.map_or(true, |host| host.is_empty() || host.starts_with('/')) {
          return Err(DomainError::ValidationError(format!("URL de farmacia inválida: {}", url)));
        }
        Some(url.to_string())
      }
      None => None,
    };
    Ok(Self { id, name, website_url, created_at })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn website_url(&self) -> Option<&str> {
    self.website_url.as_deref()
  }

  pub fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }
}

impl fmt::Display for Pharmacy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.name)
  }
}
