//! Request-level pricing operations for the three registered models.

use crate::encoder::{CategoricalInput, FeatureLayout, FeatureValues, encode, encode_fixed, encode_lenient};
use crate::error::PricingError;
use crate::registry::{ModelAsset, ModelKind, ModelRegistry};
use ndarray::Array1;
use pricecast_types::utils::round_to;
use serde::{Deserialize, Serialize};

pub const LOCATION_PREFIX: &str = "location_";
/// Currency of the car and house models.
pub const LAKHS: &str = "Lakhs";
pub const LAPTOP_CURRENCY: &str = "EUR";
pub const LAPTOP_SECONDARY_CURRENCY: &str = "INR";
/// Fixed EUR to INR rate applied to laptop prices.
pub const EUR_TO_INR: f64 = 90.0;

/// Conventional order of the car model's inputs.
pub const CAR_FEATURES: [&str; 7] = [
    "year",
    "present_price",
    "kms",
    "fuel",
    "seller",
    "transmission",
    "owner",
];

pub const HOUSE_SQFT: &str = "total_sqft";
pub const HOUSE_BATH: &str = "bath";
pub const HOUSE_BHK: &str = "bhk";

pub const LAPTOP_RAM: &str = "Ram";
pub const LAPTOP_WEIGHT: &str = "Weight";
pub const LAPTOP_INCHES: &str = "Inches";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarFeatures {
    pub year: i64,
    pub present_price: f64,
    pub kms: i64,
    /// 0 petrol, 1 diesel, 2 CNG
    pub fuel: i64,
    /// 0 dealer, 1 individual
    pub seller: i64,
    /// 0 manual, 1 automatic
    pub transmission: i64,
    pub owner: i64,
}

impl CarFeatures {
    pub fn validate(&self) -> Result<(), PricingError> {
        require_finite("present_price", self.present_price)?;
        require_one_of("fuel", self.fuel, &[0, 1, 2])?;
        require_one_of("seller", self.seller, &[0, 1])?;
        require_one_of("transmission", self.transmission, &[0, 1])?;
        require_non_negative("kms", self.kms as f64)?;
        require_non_negative("owner", self.owner as f64)?;
        Ok(())
    }

    /// Values in [`CAR_FEATURES`] order.
    pub fn to_values(&self) -> [f64; 7] {
        [
            self.year as f64,
            self.present_price,
            self.kms as f64,
            self.fuel as f64,
            self.seller as f64,
            self.transmission as f64,
            self.owner as f64,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseFeatures {
    pub total_sqft: f64,
    pub bath: i64,
    pub bhk: i64,
    pub location: String,
}

impl HouseFeatures {
    pub fn validate(&self) -> Result<(), PricingError> {
        require_finite("total_sqft", self.total_sqft)?;
        require_non_negative("total_sqft", self.total_sqft)?;
        require_non_negative("bath", self.bath as f64)?;
        require_non_negative("bhk", self.bhk as f64)?;
        Ok(())
    }

    pub fn values(&self) -> FeatureValues {
        FeatureValues::new()
            .with(HOUSE_SQFT, self.total_sqft)
            .with(HOUSE_BATH, self.bath as f64)
            .with(HOUSE_BHK, self.bhk as f64)
    }

    pub fn location(&self) -> CategoricalInput {
        CategoricalInput::new("location", self.location.clone(), LOCATION_PREFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaptopFeatures {
    pub ram: i64,
    pub weight: f64,
    pub inches: f64,
}

impl LaptopFeatures {
    pub fn validate(&self) -> Result<(), PricingError> {
        require_non_negative("ram", self.ram as f64)?;
        require_finite("weight", self.weight)?;
        require_finite("inches", self.inches)?;
        Ok(())
    }

    pub fn values(&self) -> FeatureValues {
        FeatureValues::new()
            .with(LAPTOP_RAM, self.ram as f64)
            .with(LAPTOP_WEIGHT, self.weight)
            .with(LAPTOP_INCHES, self.inches)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaptopQuote {
    pub price: f64,
    pub price_in_secondary_currency: f64,
    pub currency: String,
    pub secondary_currency: String,
}

pub fn to_secondary_currency(primary: f64) -> f64 {
    primary * EUR_TO_INR
}

pub fn round_price(price: f64) -> f64 {
    round_to(price, 2)
}

pub fn predict_car(registry: &ModelRegistry, features: &CarFeatures) -> Result<Quote, PricingError> {
    features.validate()?;
    let asset = registry.get(ModelKind::Car)?;
    let vector = match asset.layout() {
        FeatureLayout::Fixed { .. } => encode_fixed(&features.to_values()),
        // a car model shipped with a schema is placed by name instead
        FeatureLayout::Schema(schema) => encode(
            schema,
            &CAR_FEATURES
                .iter()
                .copied()
                .zip(features.to_values())
                .collect(),
            None,
        )?,
    };
    let price = run(asset, &vector)?;
    Ok(Quote {
        price: round_price(price),
        currency: LAKHS.to_string(),
    })
}

pub fn predict_house(
    registry: &ModelRegistry,
    features: &HouseFeatures,
) -> Result<Quote, PricingError> {
    features.validate()?;
    let asset = registry.get(ModelKind::House)?;
    let schema = asset
        .schema()
        .ok_or(PricingError::MissingSchema(ModelKind::House))?;
    let vector = encode(schema, &features.values(), Some(&features.location()))?;
    let price = run(asset, &vector)?;
    Ok(Quote {
        price: round_price(price),
        currency: LAKHS.to_string(),
    })
}

pub fn predict_laptop(
    registry: &ModelRegistry,
    features: &LaptopFeatures,
) -> Result<LaptopQuote, PricingError> {
    features.validate()?;
    let asset = registry.get(ModelKind::Laptop)?;
    let vector = match asset.layout() {
        FeatureLayout::Schema(schema) => encode_lenient(schema, &features.values(), None),
        FeatureLayout::Fixed { .. } => encode_fixed(&[
            features.ram as f64,
            features.weight,
            features.inches,
        ]),
    };
    let price = round_price(run(asset, &vector)?);
    Ok(LaptopQuote {
        price,
        price_in_secondary_currency: to_secondary_currency(price),
        currency: LAPTOP_CURRENCY.to_string(),
        secondary_currency: LAPTOP_SECONDARY_CURRENCY.to_string(),
    })
}

/// Locations the house model knows, sorted.
pub fn locations(registry: &ModelRegistry) -> Result<Vec<String>, PricingError> {
    let asset = registry.get(ModelKind::House)?;
    Ok(asset
        .schema()
        .map(|schema| schema.categories(LOCATION_PREFIX))
        .unwrap_or_default())
}

fn run(asset: &ModelAsset, vector: &Array1<f64>) -> Result<f64, PricingError> {
    tracing::debug!(model = %asset.kind(), width = vector.len(), "running prediction");
    Ok(asset.predict(vector)?)
}

fn require_finite(field: &str, value: f64) -> Result<(), PricingError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PricingError::validation(format!("`{field}` must be a finite number")))
    }
}

fn require_non_negative(field: &str, value: f64) -> Result<(), PricingError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(PricingError::validation(format!("`{field}` must not be negative")))
    }
}

fn require_one_of(field: &str, value: i64, allowed: &[i64]) -> Result<(), PricingError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        let allowed = allowed
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Err(PricingError::validation(format!(
            "`{field}` must be one of {allowed}, got {value}"
        )))
    }
}
