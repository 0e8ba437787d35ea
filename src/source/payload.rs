//! Parsing of quote-list payloads from the supported upstream APIs.
//!
//! Accepted shapes:
//! - a top-level array of records;
//! - an object holding the array under `quotes` or `results`.
//!
//! Records may spell their fields `quote`/`content`/`text`/`q` (text),
//! `author`/`a` (author), and `id`/`_id` (identifier).

use serde_json::{Map, Value};

use crate::constants::source::{
    ARRAY_FIELDS, AUTHOR_FIELDS, ID_FIELDS, TEXT_FIELDS, UNKNOWN_AUTHOR,
};
use crate::data::{Quote, QuoteId};
use crate::errors::QuoteError;

/// Parse a JSON body into quotes. Records without text are skipped.
pub fn parse_quote_payload(body: &str) -> Result<Vec<Quote>, QuoteError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|err| QuoteError::Payload(format!("invalid JSON: {err}")))?;
    quotes_from_json(&json)
}

/// Extract quotes from an already-decoded JSON value.
pub fn quotes_from_json(json: &Value) -> Result<Vec<Quote>, QuoteError> {
    let records = match json {
        Value::Array(records) => records,
        Value::Object(map) => ARRAY_FIELDS
            .iter()
            .find_map(|field| map.get(*field).and_then(Value::as_array))
            .ok_or_else(|| {
                QuoteError::Payload(format!(
                    "object payload has no quote array (expected one of {ARRAY_FIELDS:?})"
                ))
            })?,
        _ => {
            return Err(QuoteError::Payload(
                "payload is neither an array nor an object".into(),
            ));
        }
    };
    Ok(records
        .iter()
        .filter_map(Value::as_object)
        .filter_map(quote_from_record)
        .collect())
}

fn quote_from_record(record: &Map<String, Value>) -> Option<Quote> {
    let text = first_string(record, &TEXT_FIELDS)?;
    let author = first_string(record, &AUTHOR_FIELDS).unwrap_or_else(|| UNKNOWN_AUTHOR.into());
    let id = ID_FIELDS
        .iter()
        .find_map(|field| record.get(*field).and_then(quote_id));
    Some(Quote { id, text, author })
}

fn first_string(record: &Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| {
        record
            .get(*field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}

fn quote_id(value: &Value) -> Option<QuoteId> {
    match value {
        Value::Number(number) => number.as_u64().map(QuoteId::Numeric),
        Value::String(text) if !text.is_empty() => Some(QuoteId::Text(text.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dummyjson_shape() {
        let body = r#"{"quotes":[{"id":1,"quote":"Life is short.","author":"Anon"},
            {"id":2,"quote":"Love wins.","author":"Someone"}],"total":2,"skip":0,"limit":2}"#;
        let quotes = parse_quote_payload(body).unwrap();
        assert_eq!(
            quotes,
            vec![
                Quote::numbered(1, "Life is short.", "Anon"),
                Quote::numbered(2, "Love wins.", "Someone"),
            ]
        );
    }

    #[test]
    fn parses_quotable_shape_with_string_ids() {
        let body = r#"{"results":[{"_id":"abc","content":"Stay calm.","author":"X"}]}"#;
        let quotes = parse_quote_payload(body).unwrap();
        assert_eq!(quotes[0].id, Some(QuoteId::Text("abc".into())));
        assert_eq!(quotes[0].text, "Stay calm.");
    }

    #[test]
    fn parses_bare_array_without_ids() {
        let body = r#"[{"q":"Dream big.","a":"Y"},{"q":"No author here"},{"a":"text missing"}]"#;
        let quotes = parse_quote_payload(body).unwrap();
        assert_eq!(
            quotes,
            vec![
                Quote::anonymous("Dream big.", "Y"),
                Quote::anonymous("No author here", UNKNOWN_AUTHOR),
            ]
        );
    }

    #[test]
    fn round_trips_own_cache_shape() {
        let quotes = vec![
            Quote::numbered(5, "a", "b"),
            Quote::anonymous("c", "d"),
            Quote {
                id: Some(QuoteId::Text("x1".into())),
                text: "e".into(),
                author: "f".into(),
            },
        ];
        let body = serde_json::to_string(&quotes).unwrap();
        assert_eq!(parse_quote_payload(&body).unwrap(), quotes);
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert!(matches!(
            parse_quote_payload("not json"),
            Err(QuoteError::Payload(_))
        ));
        assert!(matches!(
            parse_quote_payload(r#"{"data":[]}"#),
            Err(QuoteError::Payload(msg)) if msg.contains("no quote array")
        ));
        assert!(matches!(
            parse_quote_payload("42"),
            Err(QuoteError::Payload(_))
        ));
    }
}
