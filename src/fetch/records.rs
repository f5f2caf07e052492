// src/fetch/records.rs

use indexmap::IndexMap;
use serde::Serialize;
use tracing::trace;

/// Fields every document needs before it is worth indexing.
pub const REQUIRED_FIELDS: [&str; 2] = ["id", "title"];

/// One spreadsheet row keyed by header name, in header order.
///
/// A column that the row is too short to reach is absent rather than empty, so
/// it is omitted from the JSON document instead of being sent as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, String>);

/// The valid records of a single fetch, in sheet order.
pub type Dataset = Vec<Record>;

impl Record {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `id` and `title` are both present and non-empty.
    pub fn is_valid(&self) -> bool {
        REQUIRED_FIELDS
            .iter()
            .all(|f| self.get(f).is_some_and(|v| !v.is_empty()))
    }

    /// Zip one line's cells against the header. Cells past the header are
    /// dropped; headers past the last cell stay absent.
    fn from_cells(headers: &[String], cells: &[&str]) -> Self {
        let mut fields = IndexMap::new();
        for (i, header) in headers.iter().enumerate() {
            // a repeated header takes the value of its last column
            match cells.get(i) {
                Some(cell) => {
                    fields.insert(header.clone(), cell.trim().to_string());
                }
                None => {
                    fields.shift_remove(header);
                }
            }
        }
        Self(fields)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Parse CSV text into the valid records it contains.
///
/// Lines are split on `\n` and cells on `,` with no quote handling: a value
/// containing a comma shifts every later column of its row. Rows without a
/// non-empty `id` and `title` are dropped.
pub fn parse_records(text: &str) -> Dataset {
    let mut lines = text.split('\n');
    let headers: Vec<String> = match lines.next() {
        Some(line) => line.split(',').map(|h| h.trim().to_string()).collect(),
        None => return Vec::new(),
    };

    lines
        .enumerate()
        .filter_map(|(i, line)| {
            let cells: Vec<&str> = line.split(',').collect();
            let record = Record::from_cells(&headers, &cells);
            if record.is_valid() {
                Some(record)
            } else {
                // line numbers are 1-based and the header is line 1
                trace!(line = i + 2, "dropping row without id/title");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(pairs: &[(&str, &str)]) -> Record {
        pairs.iter().copied().collect()
    }

    #[test]
    fn drops_row_missing_id() {
        let data = parse_records("id,title\n1,Alpha\n2,Beta\n,Gamma\n");
        assert_eq!(
            data,
            vec![
                rec(&[("id", "1"), ("title", "Alpha")]),
                rec(&[("id", "2"), ("title", "Beta")]),
            ]
        );
    }

    #[test]
    fn trims_headers_and_cells() {
        let data = parse_records(" id , title ,genre\r\n 7 ,  Solo Leveling , action\r\n");
        assert_eq!(
            data,
            vec![rec(&[
                ("id", "7"),
                ("title", "Solo Leveling"),
                ("genre", "action")
            ])]
        );
    }

    #[test]
    fn short_rows_leave_fields_absent_and_long_rows_are_cut() {
        let data = parse_records("id,title,status,tags\n1,A\n2,B,ongoing,x,extra,more");
        assert_eq!(data.len(), 2);

        assert_eq!(data[0].get("status"), None);
        assert_eq!(data[0].len(), 2);

        assert_eq!(data[1].get("status"), Some("ongoing"));
        assert_eq!(data[1].get("tags"), Some("x"));
        assert_eq!(data[1].len(), 4);
    }

    #[test]
    fn empty_cells_are_present_but_empty() {
        let data = parse_records("id,title,genre\n1,A,\n");
        assert_eq!(data[0].get("genre"), Some(""));
    }

    #[test]
    fn whitespace_only_title_is_invalid() {
        let data = parse_records("id,title\n1,   \n2,B\n3\n");
        assert_eq!(data, vec![rec(&[("id", "2"), ("title", "B")])]);
    }

    #[test]
    fn every_aligned_row_survives() {
        let mut text = String::from("id,title,chapters\n");
        for i in 0..50 {
            text.push_str(&format!("{i},Title {i}, {}\n", i * 3));
        }
        let data = parse_records(&text);
        assert_eq!(data.len(), 50);
        for (i, r) in data.iter().enumerate() {
            assert_eq!(r.get("id"), Some(i.to_string().as_str()));
            assert_eq!(r.get("title"), Some(format!("Title {i}").as_str()));
            assert_eq!(r.get("chapters"), Some((i * 3).to_string().as_str()));
        }
    }

    #[test]
    fn quoted_commas_shift_columns() {
        let data = parse_records("id,title,genre\n1,\"Hello, World\",drama\n");
        assert_eq!(data[0].get("title"), Some("\"Hello"));
        assert_eq!(data[0].get("genre"), Some("World\""));
    }

    #[test]
    fn missing_required_header_yields_nothing() {
        assert!(parse_records("id,name\n1,A\n2,B\n").is_empty());
        assert!(parse_records("").is_empty());
        assert!(parse_records("id,title").is_empty());
    }

    #[test]
    fn repeated_header_keeps_last_column() {
        let data = parse_records("id,title,title\n1,First,Second\n2,Only\n");
        assert_eq!(data[0].get("title"), Some("Second"));
        // row 2 never reaches the second `title` column, so it has no title
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn serializes_as_flat_object_without_absent_fields() {
        let data = parse_records("id,title,status\n1,A\n");
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json, serde_json::json!([{ "id": "1", "title": "A" }]));
    }

    #[test]
    fn serialized_keys_follow_header_order() {
        let data = parse_records("title,status,id,cover_image
Alpha,ongoing,1,a.png
");
        assert_eq!(
            serde_json::to_string(&data[0]).unwrap(),
            r#"{"title":"Alpha","status":"ongoing","id":"1","cover_image":"a.png"}"#
        );
    }
}
