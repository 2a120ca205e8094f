// Host-side tests for destination content loading.

use voyage_core::*;

fn record(slug: &str) -> String {
    format!(
        r#"{{"slug":"{slug}","city":"C","country":"X","headline":"H","role":"R",
            "timeframe":"T","coordinates":{{"lat":1.0,"lng":2.0}},"overview":"O"}}"#
    )
}

#[test]
fn library_is_sorted_in_tour_order() {
    let json = format!(
        "[{},{},{},{}]",
        record("copenhagen"),
        record("mars"),
        record("new-york"),
        record("tokyo")
    );
    let registry = CityRegistry::default();
    let library = ContentLibrary::from_json(&json, &registry).unwrap();
    let slugs: Vec<_> = library.iter().map(|d| d.slug.as_str()).collect();
    assert_eq!(slugs, vec!["new-york", "tokyo", "copenhagen", "mars"]);
    assert_eq!(library.len(), 4);
    assert!(library.get("mars").is_some());
    assert!(library.get("mars").unwrap().city_slug(&registry).is_none());
}

#[test]
fn duplicate_slug_is_rejected() {
    let json = format!("[{},{}]", record("tokyo"), record("tokyo"));
    let err = ContentLibrary::from_json(&json, &CityRegistry::default()).unwrap_err();
    assert!(matches!(err, ContentError::DuplicateSlug(ref s) if s == "tokyo"));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = ContentLibrary::from_json("[{\"slug\":1}]", &CityRegistry::default()).unwrap_err();
    assert!(matches!(err, ContentError::Parse(_)));
}

#[test]
fn full_record_deserializes() {
    let json = r#"[{
        "slug": "los-angeles",
        "city": "Los Angeles",
        "country": "USA",
        "headline": "Streaming at scale",
        "role": "Staff Engineer",
        "timeframe": "2020 - 2022",
        "soundtrackPlaylistId": "37i9dQZF1DX",
        "coordinates": {"lat": 34.0522, "lng": -118.2437},
        "metrics": [
            {"label": "Revenue", "value": 3.2, "prefix": "$", "suffix": "M"},
            {"label": "Uptime", "value": 99, "suffix": "%"}
        ],
        "stack": ["Rust", "Kafka"],
        "overview": "Overview",
        "impact": ["Shipped"],
        "buildNotes": ["Note"],
        "artifacts": [{"title": "Talk", "url": "https://x", "type": "video"}],
        "links": [{"label": "Code", "url": "https://g", "type": "github"}]
    }]"#;
    let registry = CityRegistry::default();
    let library = ContentLibrary::from_json(json, &registry).unwrap();
    let d = library.get("los-angeles").unwrap();
    assert_eq!(d.city_slug(&registry), Some(CitySlug::LosAngeles));
    assert_eq!(d.url(), "/destinations/los-angeles");
    assert_eq!(d.metrics[0].display(), "$3.2M");
    assert_eq!(d.metrics[1].display(), "99%");
    assert_eq!(d.build_notes, vec!["Note".to_string()]);
    assert_eq!(d.artifacts[0].kind, ArtifactKind::Video);
    assert_eq!(d.primary_link().and_then(|l| l.kind), Some(LinkKind::Github));
    assert_eq!(d.soundtrack_playlist_id.as_deref(), Some("37i9dQZF1DX"));
}

#[test]
fn empty_library() {
    let library = ContentLibrary::from_json("[]", &CityRegistry::default()).unwrap();
    assert!(library.is_empty());
    assert!(destination_anchors(&library, &CityRegistry::default()).is_empty());
}
