#[cfg(test)]
mod tests {
    use crate::dataset::{self, BANGALORE_LOCATIONS};
    use crate::pricing::{
        self, CarFeatures, EUR_TO_INR, HouseFeatures, LOCATION_PREFIX, LaptopFeatures,
    };
    use crate::{
        CategoricalInput, ColumnSchema, FeatureValues, ModelKind, ModelRegistry, PersistedModel,
        PricingError, encode,
    };
    use std::path::Path;

    fn write_models(dir: &Path, seed: u64) {
        let models = dataset::generate(seed).unwrap();
        let write = |file: &str, bytes: Vec<u8>| std::fs::write(dir.join(file), bytes).unwrap();

        write(
            ModelKind::Car.model_file(),
            PersistedModel::linear(models.car, "price").to_json_vec().unwrap(),
        );
        write(
            ModelKind::House.model_file(),
            PersistedModel::linear(models.house, "price").to_json_vec().unwrap(),
        );
        write(
            ModelKind::Laptop.model_file(),
            PersistedModel::linear(models.laptop, "price").to_json_vec().unwrap(),
        );
        write(
            "house_columns.json",
            serde_json::to_vec(&models.house_columns).unwrap(),
        );
        write(
            "laptop_columns.json",
            serde_json::to_vec(&models.laptop_columns).unwrap(),
        );
    }

    fn schema_with_locations(locations: &[&str]) -> ColumnSchema {
        ColumnSchema::new(
            ["total_sqft", "bath", "bhk"]
                .into_iter()
                .map(ToOwned::to_owned)
                .chain(locations.iter().map(|l| format!("{LOCATION_PREFIX}{l}"))),
        )
        .unwrap()
    }

    #[test]
    fn encoded_width_always_matches_schema() {
        let schema = schema_with_locations(&["Hebbal", "Jakkur", "Peenya"]);
        let values = FeatureValues::new().with("bath", 2.0).with("bhk", 3.0);
        for location in ["Hebbal", "Jakkur", "Peenya", "Elsewhere", ""] {
            let input = CategoricalInput::new("location", location, LOCATION_PREFIX);
            let vector = encode(&schema, &values, Some(&input)).unwrap();
            assert_eq!(vector.len(), schema.len());
        }
    }

    #[test]
    fn unnamed_positions_are_zero_and_one_indicator_at_most() {
        let schema = schema_with_locations(&["Hebbal", "Jakkur", "Peenya"]);
        let values = FeatureValues::new().with("total_sqft", 1200.0);
        let input = CategoricalInput::new("location", "Jakkur", LOCATION_PREFIX);
        let vector = encode(&schema, &values, Some(&input)).unwrap();

        assert_eq!(vector.to_vec(), vec![1200.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        let hot = vector.iter().skip(3).filter(|v| **v == 1.0).count();
        assert_eq!(hot, 1);
    }

    #[test]
    fn encoding_is_deterministic() {
        let schema = schema_with_locations(&["Hebbal", "Jakkur"]);
        let values = FeatureValues::new()
            .with("total_sqft", 900.0)
            .with("bath", 1.0)
            .with("bhk", 2.0);
        let input = CategoricalInput::new("location", "Hebbal", LOCATION_PREFIX);
        let first = encode(&schema, &values, Some(&input)).unwrap();
        let second = encode(&schema, &values, Some(&input)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn generated_models_serve_every_operation() {
        let dir = tempfile::tempdir().unwrap();
        write_models(dir.path(), 42);

        let registry = ModelRegistry::load_dir(dir.path()).unwrap();
        assert_eq!(registry.loaded(), ModelKind::ALL.to_vec());

        let car = pricing::predict_car(
            &registry,
            &CarFeatures {
                year: 2015,
                present_price: 5.0,
                kms: 50_000,
                fuel: 0,
                seller: 0,
                transmission: 0,
                owner: 0,
            },
        )
        .unwrap();
        assert!(car.price.is_finite());
        assert_eq!(car.currency, "Lakhs");

        let house = pricing::predict_house(
            &registry,
            &HouseFeatures {
                total_sqft: 1000.0,
                bath: 2,
                bhk: 2,
                location: "Whitefield".to_string(),
            },
        )
        .unwrap();
        assert!(house.price.is_finite());

        let laptop = pricing::predict_laptop(
            &registry,
            &LaptopFeatures {
                ram: 8,
                weight: 1.5,
                inches: 15.6,
            },
        )
        .unwrap();
        assert_eq!(laptop.price_in_secondary_currency, laptop.price * EUR_TO_INR);
    }

    #[test]
    fn generated_locations_are_sorted_and_unique() {
        let dir = tempfile::tempdir().unwrap();
        write_models(dir.path(), 1);
        let registry = ModelRegistry::load_dir(dir.path()).unwrap();

        let locations = pricing::locations(&registry).unwrap();
        let mut expected: Vec<String> = BANGALORE_LOCATIONS.iter().map(|l| l.to_string()).collect();
        expected.sort();
        expected.dedup();
        assert_eq!(locations, expected);
    }

    #[test]
    fn unknown_location_predicts_the_baseline() {
        let dir = tempfile::tempdir().unwrap();
        write_models(dir.path(), 3);
        let registry = ModelRegistry::load_dir(dir.path()).unwrap();

        let mut house = HouseFeatures {
            total_sqft: 1500.0,
            bath: 2,
            bhk: 3,
            location: "Atlantis".to_string(),
        };
        let unknown = pricing::predict_house(&registry, &house).unwrap();
        house.location = "Other".to_string();
        let other = pricing::predict_house(&registry, &house).unwrap();
        assert_eq!(unknown, other);
    }

    #[test]
    fn partially_loaded_registry_still_serves_what_it_has() {
        let dir = tempfile::tempdir().unwrap();
        write_models(dir.path(), 5);
        std::fs::remove_file(dir.path().join(ModelKind::House.model_file())).unwrap();

        let registry = ModelRegistry::load_dir(dir.path()).unwrap();
        assert_eq!(
            pricing::locations(&registry).unwrap_err(),
            PricingError::ModelUnavailable(ModelKind::House)
        );
        assert!(
            pricing::predict_laptop(
                &registry,
                &LaptopFeatures {
                    ram: 16,
                    weight: 2.0,
                    inches: 14.0
                }
            )
            .is_ok()
        );
    }
}
