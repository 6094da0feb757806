use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::render;
use crate::tokenizer::tokenize;

/// Typed front matter. Only the keys the scorer cares about are explicit;
/// everything else round-trips through `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// A document as the store hands it over: stable identifier, parsed front
/// matter, raw body text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub id: String,
    pub front: FrontMatter,
    pub body: String,
}

/// A loaded document with its derived term sequence and parsed date. The body
/// here is the original content only: any previously generated recommendation
/// section is stripped before tokenization so repeated runs score the same
/// text.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub front: FrontMatter,
    pub body: String,
    pub terms: Vec<String>,
    pub date: Option<Date>,
}

impl Document {
    pub fn from_raw(raw: RawDocument) -> Self {
        let body = render::strip_generated(&raw.body).to_string();
        let terms = tokenize(&body);
        let date = raw.front.date.as_deref().and_then(parse_date);
        Document { id: raw.id, front: raw.front, body, terms, date }
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp. Anything else is treated as
/// an absent date, never an error.
fn parse_date(s: &str) -> Option<Date> {
    let s = s.trim();
    let date_only = format_description!("[year]-[month]-[day]");
    if let Ok(d) = Date::parse(s, &date_only) {
        return Some(d);
    }
    OffsetDateTime::parse(s, &Rfc3339).ok().map(|t| t.date())
}

/// The frozen snapshot all statistics are computed over. Membership is fixed
/// for the duration of a run; document identifiers are unique.
pub struct Corpus {
    docs: Vec<Document>,
}

impl Corpus {
    pub fn from_raw(raw: Vec<RawDocument>) -> Result<Self> {
        let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
        let mut docs = Vec::with_capacity(raw.len());
        for r in raw {
            if !seen.insert(r.id.clone()) {
                anyhow::bail!("duplicate document id: {}", r.id);
            }
            docs.push(Document::from_raw(r));
        }
        Ok(Corpus { docs })
    }

    pub fn docs(&self) -> &[Document] {
        &self.docs
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
