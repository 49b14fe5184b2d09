//! Snapshot and conversion tests for the Qdrant store

#[cfg(test)]
mod snapshot_tests {
    use crate::store::{hit_from_point, point_from_record};
    use crate::QdrantConfig;
    use chrono::{TimeZone, Utc};
    use insta::assert_yaml_snapshot;
    use qdrant_client::qdrant::value::Kind;
    use qdrant_client::qdrant::{ScoredPoint, Value};
    use tabrag_core::{RecordPayload, VectorRecord};

    fn sample_record() -> VectorRecord {
        VectorRecord {
            id: "1b4e28ba-2fa1-11d2-883f-0016d3cca427".to_string(),
            vector: vec![0.25, 0.5],
            payload: RecordPayload {
                source_file: "reviews.csv".to_string(),
                row_index: 7,
                text: "Great battery 5 Laptops Lasts all day".to_string(),
                timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            },
        }
    }

    #[test]
    fn test_config_snapshot() {
        let config = QdrantConfig {
            url: "http://localhost:6334".to_string(),
            collection: "test_collection".to_string(),
            dimension: 768,
            timeout_secs: 30,
        };

        assert_yaml_snapshot!(config, @r###"
        ---
        url: "http://localhost:6334"
        collection: test_collection
        dimension: 768
        timeout_secs: 30
        "###);
    }

    #[test]
    fn test_point_carries_flattened_payload() {
        let point = point_from_record(sample_record());

        match point.payload.get("text") {
            Some(Value {
                kind: Some(Kind::StringValue(value)),
            }) => assert_eq!(value, "Great battery 5 Laptops Lasts all day"),
            other => panic!("unexpected text value: {:?}", other),
        }

        match point.payload.get("row_index") {
            Some(Value {
                kind: Some(Kind::IntegerValue(value)),
            }) => assert_eq!(*value, 7),
            other => panic!("unexpected row_index value: {:?}", other),
        }

        match point.payload.get("timestamp") {
            Some(Value {
                kind: Some(Kind::StringValue(value)),
            }) => assert!(value.starts_with("2024-03-01T12:00:00")),
            other => panic!("unexpected timestamp value: {:?}", other),
        }
    }

    #[test]
    fn test_hit_round_trips_through_point() {
        let record = sample_record();
        let point = point_from_record(record.clone());

        let scored = ScoredPoint {
            id: point.id,
            payload: point.payload,
            score: 0.87,
            ..Default::default()
        };

        let hit = hit_from_point(scored).expect("well-formed point");
        assert_eq!(hit.id, record.id);
        assert_eq!(hit.score, 0.87);
        assert_eq!(hit.payload.source_file, "reviews.csv");
        assert_eq!(hit.payload.row_index, 7);
        assert_eq!(hit.payload.text, record.payload.text);
        assert_eq!(hit.payload.timestamp, record.payload.timestamp);
    }

    #[test]
    fn test_malformed_payload_is_dropped() {
        let record = sample_record();
        let mut point = point_from_record(record);
        point.payload.remove("text");

        let scored = ScoredPoint {
            id: point.id,
            payload: point.payload,
            score: 0.5,
            ..Default::default()
        };

        assert!(hit_from_point(scored).is_none());
    }
}
