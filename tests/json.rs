#![cfg(feature = "json")]

use flatform::{encode, json::to_map, Error, File, Value};
use serde::Serialize;
use serde_json::json;

#[macro_use]
mod common;

use common::pairs;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PortfolioAsset {
    asset: String,
    is_covered: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePortfolio {
    title: String,
    description: Option<String>,
    tag_ids: Vec<u32>,
    assets: Vec<PortfolioAsset>,
}

#[test]
fn request_struct_with_files() {
    common::logging();

    let request = CreatePortfolio {
        title: "Spring".into(),
        description: None,
        tag_ids: vec![4, 9],
        assets: vec![PortfolioAsset {
            asset: "a.png".into(),
            is_covered: true,
        }],
    };

    let mut form = to_map(&request).unwrap();
    form.insert(
        "photos",
        Value::files(vec![File::from_bytes("1").with_name("1.jpg")]),
    );

    assert_eq!(
        pairs(&encode(&form)),
        pairs![
            "title" => "Spring",
            "tagIds[0]" => "4",
            "tagIds[1]" => "9",
            "assets[0].asset" => "a.png",
            "assets[0].isCovered" => "true",
            "photos" => "<file:1.jpg>",
        ]
    );
}

#[test]
fn json_value_converts() {
    let value = Value::from(json!({
        "settings": { "siteName": "Acme", "maintenance": false, "ratio": 1.5 },
    }));

    let form = match value {
        Value::Mapping(map) => map,
        other => panic!("expected a mapping, got {:?}", other),
    };

    assert_eq!(
        pairs(&encode(&form)),
        pairs![
            "settings.siteName" => "Acme",
            "settings.maintenance" => "false",
            "settings.ratio" => "1.5",
        ]
    );
}

#[test]
fn non_object_is_rejected() {
    assert!(matches!(to_map(&vec![1, 2]), Err(Error::NotAMapping)));
}
