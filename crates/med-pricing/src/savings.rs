// Archivo: savings.rs
// Propósito: aritmética decimal de ahorros. Todo el cálculo se hace con
// `Decimal` y se redondea a 2 decimales con redondeo bancario.
use med_domain::Decimal;

/// Decimales de los importes y porcentajes calculados.
pub const SAVINGS_SCALE: u32 = 2;

/// (reference - compared) / reference * 100, redondeado a 2 decimales.
/// Devuelve cero si `reference` es cero.
pub fn savings_percentage(reference: Decimal, compared: Decimal) -> Decimal {
  if reference.is_zero() {
    return Decimal::ZERO;
  }
  ((reference - compared) / reference * Decimal::ONE_HUNDRED).round_dp(SAVINGS_SCALE)
}

/// reference - compared, redondeado a 2 decimales. Puede ser negativo.
pub fn savings_amount(reference: Decimal, compared: Decimal) -> Decimal {
  (reference - compared).round_dp(SAVINGS_SCALE)
}
