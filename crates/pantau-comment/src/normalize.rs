//! Boundary mapping from the four backend comment shapes.
//!
//! The backends disagree on field names (`nama` vs `namaPengguna`,
//! `createdAt` vs `tanggalKomentar`), on whether lists come wrapped in a
//! pagination envelope, and on how numbers and dates are encoded. Every
//! function here is total: malformed input degrades to defaults.

use serde_json::{Map, Value};

use crate::comment::UniversalComment;

/// Display name used when a comment carries none.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Normalizes a single raw comment record.
pub fn normalize(raw: &Value) -> UniversalComment {
    normalize_with_parent(raw, None)
}

/// Normalizes a list payload, unwrapping a `content` envelope if present.
///
/// A payload that is neither an array nor an envelope yields an empty list.
pub fn normalize_list(payload: &Value) -> Vec<UniversalComment> {
    let records = match payload.get("content") {
        Some(Value::Array(records)) => records,
        _ => match payload {
            Value::Array(records) => records,
            _ => return Vec::new(),
        },
    };

    records.iter().map(normalize).collect()
}

/// Reads a comment count from a count endpoint payload.
///
/// Accepts a bare number or an object with `count`, `total` or
/// `totalElements`.
pub fn parse_count(payload: &Value) -> Option<u64> {
    if let Some(count) = as_u64(payload) {
        return Some(count);
    }

    let fields = payload.as_object()?;
    ["count", "total", "totalElements"]
        .iter()
        .find_map(|key| fields.get(*key).and_then(as_u64))
}

fn normalize_with_parent(raw: &Value, inherited_parent: Option<i64>) -> UniversalComment {
    let empty = Map::new();
    let fields = raw.as_object().unwrap_or(&empty);

    let id = fields.get("id").and_then(as_i64).unwrap_or_default();
    let nama = first_text(fields, &["nama", "namaPengguna"])
        .unwrap_or_else(|| ANONYMOUS_NAME.to_owned());
    let konten = fields
        .get("konten")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default();
    let created_at = ["createdAt", "tanggalKomentar"]
        .iter()
        .find_map(|key| fields.get(*key).and_then(as_timestamp_string))
        .unwrap_or_default();

    let replies = match fields.get("replies") {
        Some(Value::Array(replies)) => replies
            .iter()
            .map(|reply| normalize_with_parent(reply, Some(id)))
            .collect(),
        _ => Vec::new(),
    };

    UniversalComment {
        id,
        nama,
        konten,
        foto: first_text(fields, &["foto"]),
        created_at,
        likes: fields.get("likes").and_then(as_u64).unwrap_or_default(),
        dislikes: fields.get("dislikes").and_then(as_u64).unwrap_or_default(),
        replies,
        parent_id: fields.get("parentId").and_then(as_i64).or(inherited_parent),
    }
}

/// First non-blank string among `keys`.
fn first_text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_owned)
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Counters are clamped at zero.
fn as_u64(value: &Value) -> Option<u64> {
    as_i64(value).map(|number| number.max(0) as u64)
}

/// Dates come either as strings or as Jackson-style arrays
/// (`[2024, 5, 1, 10, 30, 0]`).
fn as_timestamp_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Array(parts) => {
            let parts = parts.iter().map(as_i64).collect::<Option<Vec<_>>>()?;
            let part = |index: usize| parts.get(index).copied().unwrap_or_default();
            if parts.len() < 3 {
                return None;
            }

            Some(format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
                part(0),
                part(1),
                part(2),
                part(3),
                part(4),
                part(5)
            ))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults_for_missing_fields() {
        let comment = normalize(&json!({ "id": 4 }));

        assert_eq!(comment.id, 4);
        assert_eq!(comment.nama, ANONYMOUS_NAME);
        assert_eq!(comment.konten, "");
        assert_eq!(comment.likes, 0);
        assert_eq!(comment.dislikes, 0);
        assert!(comment.replies.is_empty());
        assert!(comment.parent_id.is_none());
        assert!(comment.foto.is_none());
    }

    #[test]
    fn test_defaults_hold_for_every_backend_shape() {
        let shapes = [
            json!({ "id": 1, "nama": "A", "konten": "x", "createdAt": "2024-01-01T00:00:00" }),
            json!({ "id": 2, "namaPengguna": "B", "konten": "y", "tanggalKomentar": "2024-01-01T00:00:00" }),
            json!({ "id": 3, "konten": "z", "replies": null }),
            json!({ "id": "4", "likes": null, "dislikes": "oops" }),
        ];

        for shape in &shapes {
            let comment = normalize(shape);
            assert_eq!(comment.likes, 0);
            assert_eq!(comment.dislikes, 0);
            assert!(comment.replies.is_empty());
        }
    }

    #[test]
    fn test_alternate_field_names() {
        let comment = normalize(&json!({
            "id": 11,
            "namaPengguna": "Siti",
            "konten": "Setuju",
            "tanggalKomentar": "2024-03-02T08:15:00",
            "likes": 3,
            "dislikes": 1,
        }));

        assert_eq!(comment.nama, "Siti");
        assert_eq!(comment.created_at, "2024-03-02T08:15:00");
        assert_eq!(comment.likes, 3);
        assert_eq!(comment.dislikes, 1);
    }

    #[test]
    fn test_nama_takes_precedence_and_blank_is_missing() {
        let both = normalize(&json!({ "nama": "Budi", "namaPengguna": "budi01" }));
        assert_eq!(both.nama, "Budi");

        let blank = normalize(&json!({ "nama": "   ", "namaPengguna": "budi01" }));
        assert_eq!(blank.nama, "budi01");

        let none = normalize(&json!({ "nama": "" }));
        assert_eq!(none.nama, ANONYMOUS_NAME);
    }

    #[test]
    fn test_replies_are_normalized_recursively() {
        let comment = normalize(&json!({
            "id": 1,
            "nama": "Root",
            "replies": [
                {
                    "id": 2,
                    "namaPengguna": "Child",
                    "replies": [{ "id": 3, "parentId": 2 }]
                }
            ]
        }));

        let child = &comment.replies[0];
        assert_eq!(child.nama, "Child");
        assert_eq!(child.parent_id, Some(1));
        assert_eq!(child.replies[0].id, 3);
        assert_eq!(child.replies[0].parent_id, Some(2));
        assert_eq!(child.replies[0].nama, ANONYMOUS_NAME);
    }

    #[test]
    fn test_non_object_input_is_total() {
        for raw in [json!(null), json!(17), json!("text"), json!([1, 2])] {
            let comment = normalize(&raw);
            assert_eq!(comment.id, 0);
            assert_eq!(comment.nama, ANONYMOUS_NAME);
        }
    }

    #[test]
    fn test_negative_counters_clamp() {
        let comment = normalize(&json!({ "likes": -3, "dislikes": 2.0 }));
        assert_eq!(comment.likes, 0);
        assert_eq!(comment.dislikes, 2);
    }

    #[test]
    fn test_array_dates() {
        let comment = normalize(&json!({ "createdAt": [2024, 5, 1, 10, 30] }));
        assert_eq!(comment.created_at, "2024-05-01T10:30:00");
    }

    #[test]
    fn test_normalize_list_envelope_and_bare() {
        let envelope = json!({ "content": [{ "id": 1 }, { "id": 2 }], "totalElements": 2 });
        assert_eq!(normalize_list(&envelope).len(), 2);

        let bare = json!([{ "id": 1 }]);
        assert_eq!(normalize_list(&bare)[0].id, 1);

        assert!(normalize_list(&json!({ "content": [] })).is_empty());
        assert!(normalize_list(&json!({ "message": "ok" })).is_empty());
        assert!(normalize_list(&Value::Null).is_empty());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(&json!(5)), Some(5));
        assert_eq!(parse_count(&json!("7")), Some(7));
        assert_eq!(parse_count(&json!({ "count": 3 })), Some(3));
        assert_eq!(parse_count(&json!({ "totalElements": 9 })), Some(9));
        assert_eq!(parse_count(&json!({ "other": 1 })), None);
    }
}
