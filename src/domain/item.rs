//! Item domain model and request bodies.
//!
//! An item is measured either by a count or by a weight, never both. The pair
//! of nullable wire fields is exposed as [`Measure`], and request bodies built
//! from a `Measure` always send `null` for the other field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ShoplistError;

/// Unit of a [`Weight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    G,
    Kg,
    Ml,
    L,
}

impl WeightUnit {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::G => "g",
            Self::Kg => "kg",
            Self::Ml => "ml",
            Self::L => "l",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightUnit {
    type Err = ShoplistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "g" => Ok(Self::G),
            "kg" => Ok(Self::Kg),
            "ml" => Ok(Self::Ml),
            "l" => Ok(Self::L),
            other => Err(ShoplistError::validation(
                "unit",
                format!("Unknown unit '{other}' (expected g, kg, ml or l)"),
            )),
        }
    }
}

/// A weight or volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    pub value: f64,
    pub unit: WeightUnit,
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// How much of an item to buy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    Quantity(u32),
    Weight(Weight),
}

/// An item of a shopping list, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: String,
    pub list_id: String,
    pub name: String,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub weight: Option<Weight>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub purchased: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// The item's measure. Quantity wins if a server ever sends both.
    #[must_use]
    pub fn measure(&self) -> Option<Measure> {
        self.quantity
            .map(Measure::Quantity)
            .or_else(|| self.weight.map(Measure::Weight))
    }

    /// Short human-readable amount: `"x2"`, `"500 g"` or empty.
    #[must_use]
    pub fn amount_label(&self) -> String {
        match self.measure() {
            Some(Measure::Quantity(q)) => format!("x{q}"),
            Some(Measure::Weight(w)) => w.to_string(),
            None => String::new(),
        }
    }
}

/// Body of `POST /lists/{listId}/items`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateItemRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchased: Option<bool>,
}

impl CreateItemRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            weight: None,
            notes: None,
            purchased: None,
        }
    }

    #[must_use]
    pub fn with_measure(mut self, measure: Measure) -> Self {
        match measure {
            Measure::Quantity(q) => {
                self.quantity = Some(q);
                self.weight = None;
            }
            Measure::Weight(w) => {
                self.quantity = None;
                self.weight = Some(w);
            }
        }
        self
    }

    /// Blank notes are dropped.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() { None } else { Some(notes.trim().to_string()) };
        self
    }
}

/// Body of `PATCH /lists/{listId}/items/{itemId}`.
///
/// Outer `None` leaves a field out of the body, `Some(None)` sends `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UpdateItemRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Option<Weight>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchased: Option<bool>,
}

impl UpdateItemRequest {
    /// Sets the measure and nulls the other field.
    ///
    /// # Examples
    ///
    /// ```
    /// use shoplist::domain::{Measure, UpdateItemRequest, Weight, WeightUnit};
    ///
    /// let body = UpdateItemRequest::measure(Measure::Weight(Weight { value: 500.0, unit: WeightUnit::G }));
    /// let json = serde_json::to_value(&body).unwrap();
    /// assert!(json["quantity"].is_null());
    /// assert_eq!(json["weight"]["unit"], "g");
    /// ```
    #[must_use]
    pub fn measure(measure: Measure) -> Self {
        match measure {
            Measure::Quantity(q) => Self {
                quantity: Some(Some(q)),
                weight: Some(None),
                purchased: None,
            },
            Measure::Weight(w) => Self {
                quantity: Some(None),
                weight: Some(Some(w)),
                purchased: None,
            },
        }
    }

    #[must_use]
    pub fn purchased(purchased: bool) -> Self {
        Self {
            purchased: Some(purchased),
            ..Self::default()
        }
    }
}
