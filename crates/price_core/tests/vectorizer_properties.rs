use housepk_core::features::{
    EncodeError, EncoderRegistry, FeatureLayout, FeatureSchema, FeatureSpec, LabelEncoder,
    NumericRange, RawRequest, VectorizeError,
};
use proptest::prelude::*;

// Property-based tests for request vectorization
// Schema order: property_type, city, latitude, baths

const PROPERTY_TYPES: [&str; 3] = ["Flat", "House", "Upper Portion"];
const CITIES: [&str; 3] = ["Islamabad", "Karachi", "Lahore"];
const FIELDS: [&str; 4] = ["property_type", "city", "latitude", "baths"];

fn layout() -> FeatureLayout {
    let schema = FeatureSchema::new(vec![
        FeatureSpec::categorical("property_type"),
        FeatureSpec::categorical("city"),
        FeatureSpec::numeric("latitude", NumericRange::new(24.0, 37.0)),
        FeatureSpec::numeric("baths", NumericRange::new(1.0, 10.0)),
    ])
    .unwrap();
    let registry: EncoderRegistry = [
        LabelEncoder::fit("property_type", PROPERTY_TYPES),
        LabelEncoder::fit("city", CITIES),
    ]
    .into_iter()
    .collect();
    FeatureLayout::bind(&schema, &registry).unwrap()
}

#[derive(Debug, Clone)]
struct Listing {
    property_type: usize,
    city: usize,
    latitude: f64,
    baths: i64,
}

impl Listing {
    fn request(&self) -> RawRequest {
        RawRequest::new()
            .with("property_type", PROPERTY_TYPES[self.property_type])
            .with("city", CITIES[self.city])
            .with("latitude", self.latitude)
            .with("baths", self.baths)
    }
}

fn arbitrary_listing() -> impl Strategy<Value = Listing> {
    (0usize..3, 0usize..3, -90.0f64..90.0, 0i64..=20).prop_map(
        |(property_type, city, latitude, baths)| Listing {
            property_type,
            city,
            latitude,
            baths,
        },
    )
}

proptest! {
    #[test]
    fn valid_requests_follow_schema_order(listing in arbitrary_listing()) {
        let vector = layout().vectorize(&listing.request()).unwrap();

        prop_assert_eq!(vector.len(), 4);
        prop_assert_eq!(vector[0], listing.property_type as f64);
        prop_assert_eq!(vector[1], listing.city as f64);
        prop_assert_eq!(vector[2], listing.latitude);
        prop_assert_eq!(vector[3], listing.baths as f64);
    }

    #[test]
    fn vectorization_is_deterministic(listing in arbitrary_listing()) {
        let layout = layout();
        let request = listing.request();
        prop_assert_eq!(layout.vectorize(&request), layout.vectorize(&request));
    }

    #[test]
    fn unseen_city_always_fails(listing in arbitrary_listing(), city in "[A-Za-z ]{1,16}") {
        prop_assume!(!CITIES.contains(&city.as_str()));
        prop_assume!(!city.trim().is_empty());

        let request = listing.request().with("city", city.clone());
        match layout().vectorize(&request) {
            Err(VectorizeError::InvalidCategoricalValue { feature, value, source }) => {
                prop_assert_eq!(feature, "city");
                prop_assert_eq!(&value, &city);
                prop_assert_eq!(source, EncodeError::UnknownCategory {
                    feature: "city".to_string(),
                    value: city,
                });
            }
            other => prop_assert!(false, "unexpected result: {:?}", other),
        }
    }

    #[test]
    fn omitting_one_field_names_that_field(listing in arbitrary_listing(), idx in 0usize..4) {
        let mut request = listing.request();
        request.remove(FIELDS[idx]);

        prop_assert_eq!(
            layout().vectorize(&request),
            Err(VectorizeError::MissingField { feature: FIELDS[idx].to_string() })
        );
    }

    #[test]
    fn categorical_labels_are_not_numbers(
        listing in arbitrary_listing(),
        label in prop::sample::select(vec!["House", "Flat", "Lahore", "Karachi"]),
    ) {
        let request = listing.request().with("baths", label);

        prop_assert_eq!(
            layout().vectorize(&request),
            Err(VectorizeError::InvalidNumericValue {
                feature: "baths".to_string(),
                value: label.to_string(),
            })
        );
    }

    #[test]
    fn encoder_is_order_independent(mut labels in prop::collection::vec("[a-z]{1,6}", 1..12)) {
        let forward = LabelEncoder::fit("city", labels.clone());
        labels.reverse();
        let reversed = LabelEncoder::fit("city", labels.clone());

        prop_assert_eq!(&forward, &reversed);
        for label in &labels {
            let code = forward.encode(label).unwrap();
            prop_assert_eq!(forward.decode(code), Some(label.as_str()));
        }
    }
}
