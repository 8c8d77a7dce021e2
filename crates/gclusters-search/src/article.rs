//! Display records, exports and summary statistics for ADS results.

use std::collections::HashMap;

use serde::Serialize;

use gclusters_i18n::TextLookup;
use gclusters_types::error::Result;
use gclusters_types::lang::Lang;

use crate::ads::{AdsDoc, OneOrMany};

/// Authors kept per article in result lists.
pub const MAX_AUTHORS: usize = 3;

/// Journals listed in [`SearchStats::top_journals`].
pub const TOP_JOURNALS: usize = 5;

/// Landing page of an ADS record.
pub fn ads_abstract_url(bibcode: &str) -> String {
    format!("https://ui.adsabs.harvard.edu/abs/{bibcode}/abstract")
}

// -----------------------------------------------------------------------
// Article
// -----------------------------------------------------------------------

/// An ADS record shaped for display and export.
///
/// Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub bibcode: String,
    pub title: String,
    pub authors: Vec<String>,
    pub year: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub doi: Option<String>,
    pub citations: u64,
    pub reads: u64,
    pub journal: Option<String>,
    pub ads_url: String,
}

/// Turns raw ADS documents into [`Article`]s with localized placeholders.
#[derive(Debug, Clone)]
pub struct ArticleFormatter {
    no_title: String,
    unknown: String,
}

impl ArticleFormatter {
    pub fn new(no_title: impl Into<String>, unknown: impl Into<String>) -> Self {
        Self {
            no_title: no_title.into(),
            unknown: unknown.into(),
        }
    }

    pub fn localized(texts: &dyn TextLookup, lang: &Lang) -> Self {
        Self::new(texts.text("adsNoTitle", lang), texts.text("adsUnknown", lang))
    }

    pub fn format(&self, doc: &AdsDoc) -> Article {
        let title = doc
            .title
            .as_ref()
            .and_then(|t| t.first())
            .cloned()
            .unwrap_or_else(|| self.no_title.clone());

        let authors = match &doc.author {
            Some(list) => list.iter().take(MAX_AUTHORS).cloned().collect(),
            None => vec![self.unknown.clone()],
        };

        Article {
            bibcode: doc.bibcode.clone(),
            title,
            authors,
            year: doc.year.clone(),
            abstract_text: doc
                .abstract_text
                .as_ref()
                .and_then(OneOrMany::first)
                .map(str::to_string),
            doi: doc.doi.as_ref().and_then(|d| d.first()).cloned(),
            citations: doc.citation_count.unwrap_or(0),
            reads: doc.read_count.unwrap_or(0),
            journal: doc.publication.clone(),
            ads_url: ads_abstract_url(&doc.bibcode),
        }
    }

    pub fn format_all(&self, docs: &[AdsDoc]) -> Vec<Article> {
        docs.iter().map(|d| self.format(d)).collect()
    }

    /// Serialize articles in the requested format.
    pub fn export(&self, articles: &[Article], format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => Ok(serde_json::to_string_pretty(articles)?),
            ExportFormat::Csv => Ok(to_csv(articles)),
            ExportFormat::Bibtex => Ok(articles
                .iter()
                .map(|a| self.bibtex(a))
                .collect::<Vec<_>>()
                .join("\n\n")),
        }
    }

    /// A BibTeX `@article` entry keyed by bibcode.
    pub fn bibtex(&self, article: &Article) -> String {
        let title: String = article
            .title
            .chars()
            .filter(|c| *c != '{' && *c != '}')
            .collect();
        format!(
            "@article{{{bibcode},\n  title={{{title}}},\n  author={{{authors}}},\n  year={{{year}}},\n  journal={{{journal}}},\n  doi={{{doi}}},\n  adsurl={{{url}}}\n}}",
            bibcode = article.bibcode,
            authors = article.authors.join(" and "),
            year = article.year.as_deref().unwrap_or_default(),
            journal = article.journal.as_deref().unwrap_or(&self.unknown),
            doi = article.doi.as_deref().unwrap_or_default(),
            url = article.ads_url,
        )
    }
}

// -----------------------------------------------------------------------
// Export
// -----------------------------------------------------------------------

/// Download formats offered for a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Bibtex,
}

impl ExportFormat {
    /// Parse a format name; unrecognised names fall back to JSON.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "csv" => Self::Csv,
            "bibtex" | "bib" => Self::Bibtex,
            _ => Self::Json,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Bibtex => "bib",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
            Self::Bibtex => "application/x-bibtex",
        }
    }
}

const CSV_HEADER: [&str; 10] = [
    "bibcode", "title", "authors", "year", "abstract", "doi", "citations", "reads", "journal",
    "adsUrl",
];

fn push_csv_field(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
}

fn to_csv(articles: &[Article]) -> String {
    if articles.is_empty() {
        return String::new();
    }

    let mut out = CSV_HEADER.join(",");
    for a in articles {
        out.push('\n');
        let citations = a.citations.to_string();
        let reads = a.reads.to_string();
        let authors = a.authors.join("; ");
        let fields = [
            a.bibcode.as_str(),
            a.title.as_str(),
            authors.as_str(),
            a.year.as_deref().unwrap_or_default(),
            a.abstract_text.as_deref().unwrap_or_default(),
            a.doi.as_deref().unwrap_or_default(),
            citations.as_str(),
            reads.as_str(),
            a.journal.as_deref().unwrap_or_default(),
            a.ads_url.as_str(),
        ];
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            push_csv_field(&mut out, field);
        }
    }
    out
}

// -----------------------------------------------------------------------
// Statistics
// -----------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalCount {
    pub name: String,
    pub count: usize,
}

/// Summary of one page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub total_articles: usize,
    /// `None` when no record carries a numeric year.
    pub year_range: Option<YearRange>,
    pub top_journals: Vec<JournalCount>,
    pub total_citations: u64,
    pub avg_citations: u64,
}

impl SearchStats {
    /// Statistics for `docs`, or `None` for an empty page.
    pub fn from_docs(docs: &[AdsDoc]) -> Option<Self> {
        if docs.is_empty() {
            return None;
        }

        let years: Vec<i32> = docs.iter().filter_map(AdsDoc::year_number).collect();
        let year_range = match (years.iter().min(), years.iter().max()) {
            (Some(&min), Some(&max)) => Some(YearRange { min, max }),
            _ => None,
        };

        let total_citations: u64 = docs.iter().map(|d| d.citation_count.unwrap_or(0)).sum();
        let avg_citations = (total_citations as f64 / docs.len() as f64).round() as u64;

        Some(Self {
            total_articles: docs.len(),
            year_range,
            top_journals: top_journals(docs, TOP_JOURNALS),
            total_citations,
            avg_citations,
        })
    }
}

/// Most frequent journals, ties kept in order of first appearance.
fn top_journals(docs: &[AdsDoc], limit: usize) -> Vec<JournalCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in docs
        .iter()
        .filter_map(|d| d.publication.as_deref())
        .filter(|p| !p.is_empty())
    {
        let count = counts.entry(name).or_insert(0);
        if *count == 0 {
            order.push(name);
        }
        *count += 1;
    }

    let mut ranked: Vec<JournalCount> = order
        .into_iter()
        .map(|name| JournalCount {
            name: name.to_string(),
            count: counts[name],
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter() -> ArticleFormatter {
        ArticleFormatter::new("No title", "Unknown")
    }

    fn doc(bibcode: &str, year: &str, journal: &str, citations: u64) -> AdsDoc {
        AdsDoc {
            bibcode: bibcode.into(),
            title: Some(vec![format!("On {bibcode}")]),
            author: Some(vec!["A".into(), "B".into(), "C".into(), "D".into()]),
            year: Some(year.into()),
            publication: Some(journal.into()),
            citation_count: Some(citations),
            ..AdsDoc::default()
        }
    }

    #[test]
    fn format_fills_placeholders() {
        let article = formatter().format(&AdsDoc {
            bibcode: "X".into(),
            ..AdsDoc::default()
        });
        assert_eq!(article.title, "No title");
        assert_eq!(article.authors, vec!["Unknown"]);
        assert_eq!(article.citations, 0);
        assert_eq!(article.reads, 0);
        assert_eq!(article.doi, None);
        assert_eq!(article.ads_url, "https://ui.adsabs.harvard.edu/abs/X/abstract");
    }

    #[test]
    fn format_keeps_first_three_authors() {
        let article = formatter().format(&doc("2001A&A...1", "2001", "A&A", 4));
        assert_eq!(article.authors, vec!["A", "B", "C"]);
        assert_eq!(article.title, "On 2001A&A...1");
        assert_eq!(article.journal.as_deref(), Some("A&A"));
    }

    #[test]
    fn format_takes_first_abstract_and_doi() {
        let article = formatter().format(&AdsDoc {
            abstract_text: Some(OneOrMany::Many(vec!["first".into(), "second".into()])),
            doi: Some(vec!["10.1/abc".into(), "10.1/def".into()]),
            ..AdsDoc::default()
        });
        assert_eq!(article.abstract_text.as_deref(), Some("first"));
        assert_eq!(article.doi.as_deref(), Some("10.1/abc"));
    }

    #[test]
    fn json_export_uses_display_field_names() {
        let f = formatter();
        let articles = f.format_all(&[doc("B1", "1999", "ApJ", 2)]);
        let json = f.export(&articles, ExportFormat::Json).unwrap();
        assert!(json.contains("\"adsUrl\""));
        assert!(json.contains("\"abstract\": null"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn csv_export_quotes_every_field() {
        let f = formatter();
        let mut d = doc("B1", "1999", "ApJ", 2);
        d.title = Some(vec!["The \"Bullet\" cluster".into()]);
        let csv = f.export(&f.format_all(&[d]), ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("bibcode,title,authors,year,abstract,doi,citations,reads,journal,adsUrl")
        );
        assert_eq!(
            lines.next(),
            Some(
                "\"B1\",\"The \"\"Bullet\"\" cluster\",\"A; B; C\",\"1999\",\"\",\"\",\"2\",\"0\",\"ApJ\",\"https://ui.adsabs.harvard.edu/abs/B1/abstract\""
            )
        );
    }

    #[test]
    fn csv_export_of_nothing_is_empty() {
        assert_eq!(formatter().export(&[], ExportFormat::Csv).unwrap(), "");
    }

    #[test]
    fn bibtex_entry() {
        let f = formatter();
        let mut d = doc("1937ApJ....86..217Z", "1937", "ApJ", 0);
        d.title = Some(vec!["On the {Masses} of Nebulae".into()]);
        d.author = Some(vec!["Zwicky, F.".into()]);
        let entry = f.bibtex(&f.format(&d));
        assert_eq!(
            entry,
            "@article{1937ApJ....86..217Z,\n  title={On the Masses of Nebulae},\n  author={Zwicky, F.},\n  year={1937},\n  journal={ApJ},\n  doi={},\n  adsurl={https://ui.adsabs.harvard.edu/abs/1937ApJ....86..217Z/abstract}\n}"
        );
    }

    #[test]
    fn bibtex_entries_are_separated_by_blank_line() {
        let f = formatter();
        let mut d = doc("B2", "2000", "MNRAS", 1);
        d.publication = None;
        let articles = f.format_all(&[doc("B1", "1999", "ApJ", 2), d]);
        let out = f.export(&articles, ExportFormat::Bibtex).unwrap();
        assert_eq!(out.matches("@article{").count(), 2);
        assert!(out.contains("}\n\n@article{B2,"));
        assert!(out.contains("journal={Unknown}"));
    }

    #[test]
    fn export_format_names() {
        assert_eq!(ExportFormat::from_name("CSV"), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_name("bibtex"), ExportFormat::Bibtex);
        assert_eq!(ExportFormat::from_name("xml"), ExportFormat::Json);
        assert_eq!(ExportFormat::Bibtex.extension(), "bib");
    }

    #[test]
    fn stats_for_empty_page_is_none() {
        assert_eq!(SearchStats::from_docs(&[]), None);
    }

    #[test]
    fn stats_summarize_page() {
        let docs = vec![
            doc("1", "2005", "ApJ", 10),
            doc("2", "1998", "MNRAS", 3),
            doc("3", "2012", "ApJ", 0),
            doc("4", "n/a", "A&A", 2),
        ];
        let stats = SearchStats::from_docs(&docs).unwrap();
        assert_eq!(stats.total_articles, 4);
        assert_eq!(stats.year_range, Some(YearRange { min: 1998, max: 2012 }));
        assert_eq!(stats.total_citations, 15);
        assert_eq!(stats.avg_citations, 4);
        assert_eq!(
            stats.top_journals,
            vec![
                JournalCount { name: "ApJ".into(), count: 2 },
                JournalCount { name: "MNRAS".into(), count: 1 },
                JournalCount { name: "A&A".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn top_journals_capped_at_five() {
        let docs: Vec<AdsDoc> = (0..8)
            .map(|i| doc(&i.to_string(), "2000", &format!("J{i}"), 0))
            .collect();
        let stats = SearchStats::from_docs(&docs).unwrap();
        assert_eq!(stats.top_journals.len(), TOP_JOURNALS);
        assert_eq!(stats.top_journals[0].name, "J0");
    }
}
