//! Synthetic training data for the demo models.
//!
//! Targets are linear in the inputs plus a little noise, so the fitted models
//! behave plausibly. Every generator is seeded and therefore reproducible.

use crate::encoder::{CategoricalInput, FeatureValues, encode};
use crate::model::{LinearModel, TrainError};
use crate::pricing::{
    HOUSE_BATH, HOUSE_BHK, HOUSE_SQFT, LAPTOP_INCHES, LAPTOP_RAM, LAPTOP_WEIGHT, LOCATION_PREFIX,
};
use crate::registry::CAR_ARITY;
use crate::schema::{ColumnSchema, SchemaError};
use ahash::AHashSet;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const BANGALORE_LOCATIONS: &[&str] = &[
    "Electronic City", "Sarjapur Road", "Whitefield", "Koramangala", "Indiranagar",
    "Marathahalli", "HSR Layout", "Hebbal", "Yelahanka", "Bellandur",
    "Bannerghatta Road", "Jayanagar", "JP Nagar", "Kanakapura Road", "Thanisandra",
    "Harlur", "Hennur Road", "Raja Rajeshwari Nagar", "Uttarahalli", "Banashankari",
    "Malleshwaram", "Basavanagudi", "BTM Layout", "KR Puram", "Ramamurthy Nagar",
    "Vijayanagar", "Rajaji Nagar", "Frazer Town", "Cooke Town", "Ulsoor",
    "Richmond Town", "Benson Town", "Kalyan Nagar", "Kammanahalli", "Sahakara Nagar",
    "Vidyaranyapura", "Hoodi", "Varthur", "Gunjur", "Panathur",
    "Begur Road", "Bommanahalli", "Hosa Road", "Kasavanahalli", "Kudlu Gate",
    "Singasandra", "Chandapura", "Attibele", "Anekal", "Jigani",
    "Brookefield", "Kundalahalli", "Mahadevapura", "Doddanekundi", "Domlur",
    "Old Airport Road", "New Tippasandra", "CV Raman Nagar", "Kaggadasapura",
    "Nagavarapalya", "GM Palya", "Thubarahalli", "Munnekollal", "Seegehalli",
    "Kadugodi", "Channasandra", "Hegde Nagar", "Jakkur", "Kodigehalli",
    "Yeshwanthpur", "Peenya", "Dasarahalli", "Nagasandra", "Jalahalli",
    "Mathikere", "Sanjay Nagar", "RT Nagar", "Ganganagar", "Sadashivnagar",
    "Vasanth Nagar", "Shivajinagar", "Cunningham Road", "Lavelle Road", "Shanthi Nagar",
    "Wilson Garden", "Adugodi", "Ejipura", "Vivek Nagar", "Austin Town",
    "Cox Town", "Richards Town", "Lingarajapuram", "Banaswadi", "Horamavu",
    "T C Palya", "K R Puram", "Devasandra", "Battarahalli", "Medahalli",
    "Avalahalli", "Bidarahalli", "Hoskote", "Budigere Cross", "Devanahalli",
    "Bagalur", "Yelahanka New Town", "Vidyaranyapura", "Doddaballapur Road",
    "Tumkur Road", "Magadi Road", "Mysore Road", "Kengeri", "Rajarajeshwari Nagar",
];

const CAR_SAMPLES: usize = 200;
const HOUSE_SAMPLES_PER_LOCATION: usize = 3;
const HOUSE_BASELINE_SAMPLES: usize = 40;
const LAPTOP_SAMPLES: usize = 80;

#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub records: Array2<f64>,
    pub targets: Array1<f64>,
}

impl TrainingSet {
    fn from_rows(rows: Vec<Vec<f64>>, targets: Vec<f64>, width: usize) -> Result<Self, TrainError> {
        let n = rows.len();
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let records =
            Array2::from_shape_vec((n, width), flat).map_err(|e| TrainError(e.to_string()))?;
        Ok(Self {
            records,
            targets: Array1::from(targets),
        })
    }

    pub fn fit(self) -> Result<LinearModel, TrainError> {
        LinearModel::fit(self.records, self.targets)
    }
}

/// `[total_sqft, bath, bhk, location_*...]`, one column per distinct location.
pub fn house_columns() -> Result<ColumnSchema, SchemaError> {
    let mut seen = AHashSet::new();
    let columns = [HOUSE_SQFT, HOUSE_BATH, HOUSE_BHK]
        .into_iter()
        .map(ToOwned::to_owned)
        .chain(
            BANGALORE_LOCATIONS
                .iter()
                .filter(|location| seen.insert(**location))
                .map(|location| format!("{LOCATION_PREFIX}{location}")),
        );
    ColumnSchema::new(columns)
}

pub fn laptop_columns() -> Result<ColumnSchema, SchemaError> {
    ColumnSchema::new([LAPTOP_RAM, LAPTOP_WEIGHT, LAPTOP_INCHES])
}

fn noise(rng: &mut StdRng, amplitude: f64) -> f64 {
    rng.random_range(-amplitude..amplitude)
}

/// Rows in the car model's fixed order, price in lakhs.
pub fn car_training_set(rng: &mut StdRng) -> Result<TrainingSet, TrainError> {
    let mut rows = Vec::with_capacity(CAR_SAMPLES);
    let mut targets = Vec::with_capacity(CAR_SAMPLES);
    for _ in 0..CAR_SAMPLES {
        let year = rng.random_range(2005..=2022) as f64;
        let present_price = rng.random_range(2.0..25.0);
        let kms = rng.random_range(5_000..150_000) as f64;
        let fuel = rng.random_range(0..=2) as f64;
        let seller = rng.random_range(0..=1) as f64;
        let transmission = rng.random_range(0..=1) as f64;
        let owner = rng.random_range(0..=3) as f64;

        let price = 0.55 * present_price + 0.3 * (year - 2005.0) - 0.000_01 * kms
            + 0.6 * fuel
            - 0.4 * seller
            + 1.2 * transmission
            - 0.3 * owner
            + noise(rng, 0.2);

        rows.push(vec![year, present_price, kms, fuel, seller, transmission, owner]);
        targets.push(price);
    }
    TrainingSet::from_rows(rows, targets, CAR_ARITY)
}

/// Price in lakhs. A share of rows carries no location so the indicator
/// block is not collinear with the intercept.
pub fn house_training_set(schema: &ColumnSchema, rng: &mut StdRng) -> Result<TrainingSet, TrainError> {
    let locations = schema.categories(LOCATION_PREFIX);
    let mut rows = Vec::new();
    let mut targets = Vec::new();

    let baseline = std::iter::repeat_n(None, HOUSE_BASELINE_SAMPLES);
    let located = locations
        .iter()
        .enumerate()
        .flat_map(|(i, location)| std::iter::repeat_n(Some((i, location)), HOUSE_SAMPLES_PER_LOCATION));

    for sample in baseline.chain(located) {
        let total_sqft = rng.random_range(600.0..3_500.0);
        let bath = rng.random_range(1..=4) as f64;
        let bhk = rng.random_range(1..=5) as f64;
        let values = FeatureValues::new()
            .with(HOUSE_SQFT, total_sqft)
            .with(HOUSE_BATH, bath)
            .with(HOUSE_BHK, bhk);

        let (premium, location) = match sample {
            Some((i, location)) => (
                (i % 17) as f64 * 2.5 - 10.0,
                Some(CategoricalInput::new("location", location.clone(), LOCATION_PREFIX)),
            ),
            None => (0.0, None),
        };
        let vector = encode(schema, &values, location.as_ref())
            .map_err(|e| TrainError(e.to_string()))?;

        rows.push(vector.to_vec());
        targets.push(0.045 * total_sqft + 4.0 * bath + 6.0 * bhk + premium + noise(rng, 1.5));
    }
    TrainingSet::from_rows(rows, targets, schema.len())
}

/// Price in EUR.
pub fn laptop_training_set(schema: &ColumnSchema, rng: &mut StdRng) -> Result<TrainingSet, TrainError> {
    const RAM: [f64; 5] = [4.0, 8.0, 16.0, 32.0, 64.0];
    const INCHES: [f64; 5] = [11.6, 13.3, 14.0, 15.6, 17.3];

    let mut rows = Vec::with_capacity(LAPTOP_SAMPLES);
    let mut targets = Vec::with_capacity(LAPTOP_SAMPLES);
    for _ in 0..LAPTOP_SAMPLES {
        let ram = RAM[rng.random_range(0..RAM.len())];
        let weight = rng.random_range(1.0..3.5);
        let inches = INCHES[rng.random_range(0..INCHES.len())];
        let values = FeatureValues::new()
            .with(LAPTOP_RAM, ram)
            .with(LAPTOP_WEIGHT, weight)
            .with(LAPTOP_INCHES, inches);
        let vector = encode(schema, &values, None).map_err(|e| TrainError(e.to_string()))?;

        rows.push(vector.to_vec());
        targets.push(150.0 + 40.0 * ram + 120.0 * weight + 20.0 * inches + noise(rng, 25.0));
    }
    TrainingSet::from_rows(rows, targets, schema.len())
}

/// The three fitted demo models with their layouts.
pub struct GeneratedModels {
    pub car: LinearModel,
    pub house: LinearModel,
    pub house_columns: ColumnSchema,
    pub laptop: LinearModel,
    pub laptop_columns: ColumnSchema,
}

pub fn generate(seed: u64) -> Result<GeneratedModels, TrainError> {
    let mut rng = StdRng::seed_from_u64(seed);

    let car = car_training_set(&mut rng)?.fit()?;
    tracing::info!(samples = CAR_SAMPLES, "fitted car model");

    let house_columns = house_columns().map_err(|e| TrainError(e.to_string()))?;
    let house = house_training_set(&house_columns, &mut rng)?.fit()?;
    tracing::info!(columns = house_columns.len(), "fitted house model");

    let laptop_columns = laptop_columns().map_err(|e| TrainError(e.to_string()))?;
    let laptop = laptop_training_set(&laptop_columns, &mut rng)?.fit()?;
    tracing::info!(samples = LAPTOP_SAMPLES, "fitted laptop model");

    Ok(GeneratedModels {
        car,
        house,
        house_columns,
        laptop,
        laptop_columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Predictor;
    use ndarray::array;

    #[test]
    fn house_columns_are_unique_despite_repeated_locations() {
        let schema = house_columns().unwrap();
        let distinct: AHashSet<_> = BANGALORE_LOCATIONS.iter().collect();
        assert_eq!(schema.len(), 3 + distinct.len());
        assert_eq!(schema.position("total_sqft"), Some(0));
        assert!(schema.contains("location_Vidyaranyapura"));
    }

    #[test]
    fn car_set_has_fixed_width() {
        let mut rng = StdRng::seed_from_u64(1);
        let set = car_training_set(&mut rng).unwrap();
        assert_eq!(set.records.ncols(), CAR_ARITY);
        assert_eq!(set.records.nrows(), set.targets.len());
    }

    #[test]
    fn house_rows_carry_at_most_one_location() {
        let schema = house_columns().unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let set = house_training_set(&schema, &mut rng).unwrap();
        for row in set.records.rows() {
            let indicators: f64 = row.iter().skip(3).sum();
            assert!(indicators == 0.0 || indicators == 1.0);
        }
    }

    #[test]
    fn generation_is_reproducible() {
        let a = generate(42).unwrap();
        let b = generate(42).unwrap();
        assert_eq!(a.car.coefficients(), b.car.coefficients());
        assert_eq!(a.laptop.coefficients(), b.laptop.coefficients());
    }

    #[test]
    fn generated_laptop_model_tracks_its_formula() {
        let models = generate(7).unwrap();
        let price = models.laptop.predict(&array![16.0, 2.0, 15.6]).unwrap();
        let expected = 150.0 + 40.0 * 16.0 + 120.0 * 2.0 + 20.0 * 15.6;
        assert!((price - expected).abs() < 40.0, "{price} vs {expected}");
        assert_eq!(models.house.n_features(), Some(models.house_columns.len()));
    }
}
