//! Proposition records as delivered by the analytical warehouse.
//!
//! Field names follow the warehouse columns (Câmara dos Deputados open-data
//! naming), so a warehouse row deserializes directly into [`Proposition`].
//! Only the fields the generation pipeline cannot run without are required.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::PropositionId;

/// One legislative proposition row from the warehouse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposition {
    /// Warehouse primary key (`id_proposicao`).
    #[serde(rename = "id_proposicao")]
    pub id: PropositionId,
    /// Proposition kind acronym: PL, PEC, MPV, ... (`sigla`).
    #[serde(rename = "sigla")]
    pub kind: String,
    #[serde(rename = "numero")]
    pub number: i64,
    #[serde(rename = "ano")]
    pub year: i32,
    /// Official one-paragraph summary (`ementa`).
    #[serde(rename = "ementa")]
    pub summary: Option<String>,
    #[serde(rename = "ementa_detalhada")]
    pub detailed_summary: Option<String>,
    #[serde(rename = "palavra_chave")]
    pub keywords: Option<String>,
    /// Presentation timestamp as the warehouse formats it (RFC 3339-ish).
    #[serde(rename = "dataApresentacao")]
    pub presentation_date: Option<String>,
    /// URL of the proposition's full-text PDF (`url_teor_proposicao`).
    #[serde(rename = "url_teor_proposicao")]
    pub content_url: String,
    #[serde(rename = "url_principal")]
    pub main_url: Option<String>,
    #[serde(rename = "url_posterior")]
    pub follow_up_url: Option<String>,
    #[serde(rename = "sigla_uf_autor")]
    pub author_uf: Option<String>,
    #[serde(rename = "nome_autor")]
    pub author_name: Option<String>,
    #[serde(rename = "sigla_partido")]
    pub author_party: Option<String>,
    #[serde(rename = "tipo_autor")]
    pub author_type: Option<String>,
}

impl Proposition {
    /// Human-readable reference, e.g. `"PL 1234/2025"`.
    pub fn reference(&self) -> String {
        format!("{} {}/{}", self.kind, self.number, self.year)
    }

    /// Storage-safe base filename, e.g. `"PL_1234_2025"`.
    pub fn storage_filename(&self) -> String {
        format!("{}_{}_{}", self.kind, self.number, self.year)
    }
}

/// Parse a warehouse presentation date into a calendar date.
///
/// Accepts RFC 3339 timestamps (with or without offset) and bare
/// `YYYY-MM-DD` dates. Missing or unparsable input yields `fallback`.
pub fn parse_presentation_date(raw: Option<&str>, fallback: NaiveDate) -> NaiveDate {
    let Some(raw) = raw else {
        return fallback;
    };

    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
        return ts.date_naive();
    }
    if let Ok(ts) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return ts.date();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date;
    }

    fallback
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn proposition() -> Proposition {
        serde_json::from_value(serde_json::json!({
            "id_proposicao": 2345678,
            "sigla": "PL",
            "numero": 1234,
            "ano": 2025,
            "ementa": "Dispõe sobre energia solar residencial.",
            "url_teor_proposicao": "https://example.org/prop/2345678.pdf",
            "sigla_uf_autor": "SP",
            "nome_autor": "Fulano de Tal",
            "sigla_partido": "XYZ"
        }))
        .unwrap()
    }

    #[test]
    fn deserializes_warehouse_column_names() {
        let prop = proposition();
        assert_eq!(prop.id, 2345678);
        assert_eq!(prop.kind, "PL");
        assert_eq!(prop.author_uf.as_deref(), Some("SP"));
        assert!(prop.presentation_date.is_none());
    }

    #[test]
    fn reference_formats_kind_number_year() {
        assert_eq!(proposition().reference(), "PL 1234/2025");
    }

    #[test]
    fn storage_filename_uses_underscores() {
        assert_eq!(proposition().storage_filename(), "PL_1234_2025");
    }

    #[test]
    fn missing_required_field_fails_deserialization() {
        let result: Result<Proposition, _> = serde_json::from_value(serde_json::json!({
            "id_proposicao": 1,
            "sigla": "PL",
            "numero": 1,
            "ano": 2025
            // url_teor_proposicao missing
        }));
        assert!(result.is_err());
    }

    // -- parse_presentation_date ----------------------------------------------

    #[test]
    fn parses_rfc3339_with_zulu_offset() {
        let fallback = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let date = parse_presentation_date(Some("2025-03-14T12:00:00Z"), fallback);
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }

    #[test]
    fn parses_naive_datetime_without_offset() {
        let fallback = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let date = parse_presentation_date(Some("2025-03-14T12:00:00"), fallback);
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }

    #[test]
    fn parses_bare_date() {
        let fallback = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let date = parse_presentation_date(Some("2025-03-14"), fallback);
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }

    #[test]
    fn falls_back_on_garbage_or_missing() {
        let fallback = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(parse_presentation_date(Some("14/03/2025"), fallback), fallback);
        assert_eq!(parse_presentation_date(None, fallback), fallback);
    }
}
