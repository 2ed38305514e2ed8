// src/scrape/entry.rs
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::{Map, Value};

use crate::config::Site;

/// One row of the contest list.
///
/// Unknown keys ride along in `extra` so the list can be written back untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContestEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: String,
    #[serde(default)]
    pub filepath: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standing_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boj_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cf_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qoj_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statements_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editorials_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContestEntry {
    pub fn site_url(&self, site: Site) -> Option<&str> {
        let url = match site {
            Site::Boj => &self.boj_url,
            Site::Codeforces => &self.cf_url,
            Site::Qoj => &self.qoj_url,
        };
        url.as_deref().filter(|u| !u.trim().is_empty())
    }

    pub fn official_doc_url(&self, doc: OfficialDoc) -> Option<&str> {
        let url = match doc {
            OfficialDoc::Statements => &self.statements_url,
            OfficialDoc::Editorials => &self.editorials_url,
        };
        url.as_deref().filter(|u| !u.trim().is_empty())
    }

    /// Missing pieces that keep the entry from being crawled.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.id.as_deref().is_none_or(str::is_empty) {
            missing.push("id");
        }
        if self.category.is_empty() {
            missing.push("category");
        }
        if self.year.is_empty() {
            missing.push("year");
        }
        if self.filepath.is_empty() {
            missing.push("filepath");
        }
        missing
    }
}

/// PDFs published by the contest organisers themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OfficialDoc {
    Statements,
    Editorials,
}

impl OfficialDoc {
    pub const ALL: [OfficialDoc; 2] = [OfficialDoc::Statements, OfficialDoc::Editorials];

    /// Key under `link`.
    pub fn key(self) -> &'static str {
        match self {
            OfficialDoc::Statements => "statements",
            OfficialDoc::Editorials => "editorials",
        }
    }

    pub fn filename(self) -> &'static str {
        match self {
            OfficialDoc::Statements => "statements.pdf",
            OfficialDoc::Editorials => "editorials.pdf",
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!("expected a string or number, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_unknown_keys_and_numeric_years() {
        let entry: ContestEntry = serde_json::from_value(json!({
            "category": ["ICPC", "Korea"],
            "year": 2023,
            "filepath": "problemlists/icpc/korea/2023/",
            "boj_url": "https://www.acmicpc.net/category/detail/4000",
            "cf_url": "  ",
            "note": "mirror only"
        }))
        .unwrap();

        assert_eq!(entry.year, "2023");
        assert_eq!(entry.site_url(Site::Boj), Some("https://www.acmicpc.net/category/detail/4000"));
        assert_eq!(entry.site_url(Site::Codeforces), None);
        assert_eq!(entry.extra.get("note"), Some(&json!("mirror only")));
        assert_eq!(entry.missing_fields(), ["id"]);

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["note"], json!("mirror only"));
        assert!(back.get("qoj_url").is_none());
    }
}
