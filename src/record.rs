// 🏢 Company Records - Raw input and normalized form
//
// RawRecord is whatever the loader decoded (any attribute may be missing).
// Record is the immutable, normalized value the engine works on.

use serde::{Deserialize, Serialize};

use crate::blocking::block_key;
use crate::error::{ResolveError, ResolveResult};
use crate::normalize::normalize;

/// Stable record identity: position of the record in the input sequence
pub type RecordId = usize;

// ============================================================================
// RAW RECORD
// ============================================================================

/// Company record as decoded from the source dataset
///
/// Field names follow the dataset's column names. Columns outside this
/// fixed attribute set are ignored by the loaders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub company_name: Option<String>,

    #[serde(default)]
    pub company_legal_names: Option<String>,

    #[serde(default)]
    pub company_commercial_names: Option<String>,

    #[serde(default)]
    pub website_domain: Option<String>,

    #[serde(default)]
    pub primary_email: Option<String>,

    #[serde(default)]
    pub main_country: Option<String>,

    #[serde(default)]
    pub main_city: Option<String>,

    #[serde(default)]
    pub main_address_raw_text: Option<String>,
}

impl RawRecord {
    /// Dataset columns consumed by the resolver, in export order
    pub const COLUMNS: [&'static str; 8] = [
        "company_name",
        "company_legal_names",
        "company_commercial_names",
        "website_domain",
        "primary_email",
        "main_country",
        "main_city",
        "main_address_raw_text",
    ];

    /// Record with only a company name and country (handy for fixtures)
    pub fn named(company_name: &str, country: &str) -> Self {
        RawRecord {
            company_name: Some(company_name.to_string()),
            main_country: Some(country.to_string()),
            ..RawRecord::default()
        }
    }

    /// Builder: set website domain
    pub fn with_domain(mut self, domain: &str) -> Self {
        self.website_domain = Some(domain.to_string());
        self
    }
}

// ============================================================================
// NORMALIZED RECORD
// ============================================================================

/// Normalized company record
///
/// Every attribute is the `normalize` output of the raw value, so missing
/// values are empty strings, never `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub company_name: String,
    pub legal_names: String,
    pub commercial_names: String,
    pub website_domain: String,
    pub primary_email: String,
    pub country: String,
    pub city: String,
    pub address_text: String,

    /// Derived from company_name, country and website_domain prefixes
    pub block_key: String,
}

impl Record {
    /// Normalize a raw record and derive its block key
    pub fn from_raw(id: RecordId, raw: &RawRecord, prefix_length: usize) -> Self {
        let company_name = normalize(raw.company_name.as_deref());
        let country = normalize(raw.main_country.as_deref());
        let website_domain = normalize(raw.website_domain.as_deref());
        let block_key = block_key(&company_name, &country, &website_domain, prefix_length);

        Record {
            id,
            company_name,
            legal_names: normalize(raw.company_legal_names.as_deref()),
            commercial_names: normalize(raw.company_commercial_names.as_deref()),
            website_domain,
            primary_email: normalize(raw.primary_email.as_deref()),
            country,
            city: normalize(raw.main_city.as_deref()),
            address_text: normalize(raw.main_address_raw_text.as_deref()),
            block_key,
        }
    }
}

/// Normalize a whole dataset; ids are input positions
pub fn normalize_records(raw: &[RawRecord], prefix_length: usize) -> Vec<Record> {
    raw.iter()
        .enumerate()
        .map(|(id, r)| Record::from_raw(id, r, prefix_length))
        .collect()
}

/// Reject records whose id is not their position in the slice
///
/// Matching and clustering look records up by id, so `records[i].id == i`
/// must hold for every record.
pub fn check_alignment(records: &[Record]) -> ResolveResult<()> {
    match records.iter().enumerate().find(|(i, r)| r.id != *i) {
        Some((position, record)) => Err(ResolveError::MisalignedRecord {
            position,
            id: record.id,
        }),
        None => Ok(()),
    }
}

// ============================================================================
// TESTS
// ============================================================================
