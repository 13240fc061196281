//! Client-side checks for list and item forms.
//!
//! Each function takes raw user text and returns the typed value or a
//! [`ShoplistError::Validation`] naming the field.

use super::error::{Result, ShoplistError};
use super::item::{Measure, Weight, WeightUnit};

pub fn list_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ShoplistError::validation("name", "A name is required"));
    }
    Ok(name.to_string())
}

pub fn item_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ShoplistError::validation("name", "An item name is required"));
    }
    Ok(name.to_string())
}

/// Integer count, at least 1.
///
/// # Examples
///
/// ```
/// use shoplist::domain::validation;
///
/// assert_eq!(validation::quantity("3").unwrap(), 3);
/// assert!(validation::quantity("0").is_err());
/// assert!(validation::quantity("abc").is_err());
/// ```
pub fn quantity(raw: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|q| *q >= 1)
        .ok_or_else(|| ShoplistError::validation("quantity", "Quantity must be a positive number"))
}

/// Strictly positive, finite weight with a known unit.
pub fn weight(raw_value: &str, raw_unit: &str) -> Result<Weight> {
    let value = raw_value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| ShoplistError::validation("weight", "Weight must be a positive number"))?;
    let unit: WeightUnit = raw_unit.parse()?;
    Ok(Weight { value, unit })
}

/// Builds a [`Measure`] from optional form inputs.
///
/// Supplying both a quantity and a weight is rejected; supplying neither
/// yields `None`.
pub fn measure(
    raw_quantity: Option<&str>,
    raw_weight: Option<(&str, &str)>,
) -> Result<Option<Measure>> {
    match (raw_quantity, raw_weight) {
        (Some(_), Some(_)) => Err(ShoplistError::validation(
            "quantity",
            "Use either a quantity or a weight, not both",
        )),
        (Some(q), None) => quantity(q).map(|q| Some(Measure::Quantity(q))),
        (None, Some((value, unit))) => weight(value, unit).map(|w| Some(Measure::Weight(w))),
        (None, None) => Ok(None),
    }
}
