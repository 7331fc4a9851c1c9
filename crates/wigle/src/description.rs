//! Parameter schema of the WiGLE node.

use nodes::{CredentialRef, NodeDescription, OptionValue, PropertyDescription};

use crate::credentials::CREDENTIAL_TYPE;

/// Registry key of the node.
pub const NODE_TYPE: &str = "wigle";

/// Name of the connection test registered for the credential.
pub const CONNECTION_TEST: &str = "wigleConnectionTest";

pub fn node_description() -> NodeDescription {
    NodeDescription {
        name: NODE_TYPE.to_owned(),
        display_name: "WiGLE".to_owned(),
        description: "Search network".to_owned(),
        version: 1,
        credentials: vec![CredentialRef {
            name: CREDENTIAL_TYPE.to_owned(),
            display_name: "WiGLE API".to_owned(),
            required: true,
            tested_by: Some(CONNECTION_TEST.to_owned()),
        }],
        properties: vec![
            PropertyDescription::options(
                "operation",
                "Operation",
                vec![OptionValue::new("Search WiFi Network", "search_network")
                    .with_action("Search wifi network")
                    .with_description("Search wifi network (using wigle.net)")],
                "search_network",
            )
            .required(),
            PropertyDescription::string("query_ssid", "Search by SSID", "LIVEBOX")
                .with_description("Add a filter on SSID (% _ supported)"),
            PropertyDescription::string("query_bssid", "Search by BSSID", "")
                .with_description("Add a filter on BSSID (eg 0A:2C:EF)"),
            PropertyDescription::boolean("filter_geo", "Filter By Geo", false)
                .with_description("Add a filter by geolocation"),
            PropertyDescription::number("query_lat", "Latitude", 0.0).shown_when("filter_geo", true),
            PropertyDescription::number("query_lon", "Longitude", 0.0).shown_when("filter_geo", true),
            PropertyDescription::number("query_radius", "Radius (Km)", 0.1)
                .shown_when("filter_geo", true),
            PropertyDescription::boolean("filter_location", "Filter By Location", false)
                .with_description("Add a filter by postal address"),
            location_field("query_road", "Road"),
            location_field("query_city", "City"),
            location_field("query_region", "Region"),
            location_field("query_postalcode", "Postal Code"),
            location_field("query_country", "Country"),
            PropertyDescription::collection(
                "options",
                "Options",
                vec![
                    PropertyDescription::number("results_per_page", "Results per Page", 25.0)
                        .with_description("The number of results per page"),
                    PropertyDescription::string("results_field", "Put Results in Field", "wigle")
                        .with_description("The name of the output field to put the data in"),
                ],
            )
            .with_placeholder("Add option"),
        ],
    }
}

fn location_field(name: &str, display_name: &str) -> PropertyDescription {
    PropertyDescription::string(name, display_name, "").shown_when("filter_location", true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Operation, SearchParameters};
    use serde_json::{json, Value};

    #[test]
    fn defaults_resolve_to_a_livebox_search() {
        let resolved = node_description().resolve_parameters(&Value::Null).unwrap();
        let params = SearchParameters::from_value(&resolved).unwrap();

        assert_eq!(params.operation, Operation::SearchNetwork);
        assert_eq!(params.ssid, "LIVEBOX");
        assert!(params.bssid.is_empty());
        assert!(!params.filter_geo);
        assert!(!params.filter_location);
        assert!((params.radius_km - 0.1).abs() < f64::EPSILON);
        assert_eq!(params.results_per_page(), 25);
        assert_eq!(params.results_field(), "wigle");

        assert_eq!(
            serde_json::to_value(params.build_query()).unwrap(),
            json!({ "ssidlike": "LIVEBOX", "resultsPerPage": 25 })
        );
    }

    #[test]
    fn geo_fields_show_only_with_the_geo_flag() {
        let desc = node_description();
        for name in ["query_lat", "query_lon", "query_radius"] {
            let prop = desc.property(name).unwrap();
            assert!(!prop.is_visible(&json!({ "filter_geo": false })));
            assert!(prop.is_visible(&json!({ "filter_geo": true })));
        }
    }

    #[test]
    fn location_fields_show_only_with_the_location_flag() {
        let desc = node_description();
        for name in ["query_road", "query_city", "query_region", "query_postalcode", "query_country"] {
            let prop = desc.property(name).unwrap();
            assert!(!prop.is_visible(&json!({ "filter_location": false, "filter_geo": true })));
            assert!(prop.is_visible(&json!({ "filter_location": true })));
        }
    }

    #[test]
    fn description_references_the_tested_credential() {
        let desc = node_description();
        assert_eq!(desc.credentials.len(), 1);
        assert_eq!(desc.credentials[0].name, "wigleApi");
        assert!(desc.credentials[0].required);
        assert_eq!(desc.credentials[0].tested_by.as_deref(), Some("wigleConnectionTest"));
        assert!(desc.property("operation").unwrap().required);
    }
}
