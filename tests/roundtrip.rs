use flatform::{decode, decode_text, encode, map, DecodeError, File, Map, Value};

#[macro_use]
mod common;

use common::pairs;

fn portfolio() -> Map {
    map! {
        "title" => "Spring campaign",
        "order" => 3,
        "published" => true,
        "subtitle" => "",
        "client" => Value::Null,
        "tagIds" => vec![1, 2, 3],
        "seo" => map! {
            "title" => "Spring",
            "keywords" => vec!["flowers", "sale"],
            "canonical" => Value::Null,
        },
        "assets" => vec![
            map! { "asset" => "a.png", "isCovered" => true },
            map! { "asset" => "b.png", "isCovered" => false },
        ],
        "cover" => File::from_bytes("cover").with_name("cover.jpg"),
        "photos" => Value::files(vec![
            File::from_bytes("one").with_name("1.jpg"),
            File::from_bytes("two").with_name("2.jpg"),
        ]),
    }
}

/// What the decoder should produce for [`portfolio`]: nulls and empty strings
/// gone, primitives as strings.
fn portfolio_decoded() -> Map {
    map! {
        "title" => "Spring campaign",
        "order" => "3",
        "published" => "true",
        "tagIds" => vec!["1", "2", "3"],
        "seo" => map! {
            "title" => "Spring",
            "keywords" => vec!["flowers", "sale"],
        },
        "assets" => vec![
            map! { "asset" => "a.png", "isCovered" => "true" },
            map! { "asset" => "b.png", "isCovered" => "false" },
        ],
        "cover" => File::from_bytes("cover").with_name("cover.jpg"),
        "photos" => Value::files(vec![
            File::from_bytes("one").with_name("1.jpg"),
            File::from_bytes("two").with_name("2.jpg"),
        ]),
    }
}

#[test]
fn decode_reverses_encode() {
    common::logging();

    let input = portfolio();
    let decoded = decode(encode(&input)).unwrap();

    assert_eq!(decoded, portfolio_decoded());
}

#[test]
fn reencoding_is_idempotent() {
    let input = portfolio();
    let first = encode(&input);
    let decoded = decode(first.clone()).unwrap();
    let second = encode(&decoded);

    assert_eq!(pairs(&first), pairs(&second));
}

#[test]
fn long_sequence_round_trips() {
    let input = map! { "tagIds" => (0..70_000).collect::<Vec<i64>>() };
    let fields = encode(&input);

    assert_eq!(fields.last().map(|field| field.key()), Some("tagIds[69999]"));

    let decoded = decode(fields).unwrap();
    let expected = (0..70_000).map(|i| i.to_string()).collect::<Vec<_>>();

    assert_eq!(decoded, map! { "tagIds" => expected });
}

#[test]
fn decoding_text_pairs() {
    let decoded = decode_text(vec![
        ("assets[0].asset", "a.png"),
        ("assets[0].isCovered", "true"),
        ("assets[1].asset", "b.png"),
    ])
    .unwrap();

    assert_eq!(
        decoded,
        map! {
            "assets" => vec![
                map! { "asset" => "a.png", "isCovered" => "true" },
                map! { "asset" => "b.png" },
            ],
        }
    );
}

#[test]
fn omitted_sequence_elements_leave_gaps() {
    let input = map! { "items" => vec![Value::from("a"), Value::Null, Value::from("c")] };
    let decoded = decode(encode(&input)).unwrap();

    assert_eq!(decoded, input);
}

#[test]
fn malformed_key_is_rejected() {
    let error = decode_text(vec![("assets[0", "a.png")]).unwrap_err();

    assert_eq!(
        error,
        DecodeError::InvalidKey {
            key: "assets[0".into(),
            reason: "unterminated index",
        }
    );
}
