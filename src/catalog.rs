//! Pharmacogenomic variant catalog
//!
//! The catalog maps a variant identifier (e.g. `CYP2D6*4`) to its genomic
//! coordinates, tissue context and clinical metadata. It is built once at
//! startup and is read-only afterwards. Identifiers are opaque strings and
//! may contain characters such as `*`.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PharmaError;

/// Allowed reference/alternate base strings
static BASES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ACGTN]+$").unwrap());

/// Half-open genomic span of the gene region around a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneRegion {
    pub start: u64,
    pub end: u64,
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantRecord {
    /// Unique identifier, e.g. `CYP2D6*4`
    pub name: String,
    pub chromosome: String,
    pub position: u64,
    pub ref_bases: String,
    pub alt_bases: String,
    pub gene_region: GeneRegion,
    /// Tissue/cell-type context used to scope model predictions
    pub ontology_terms: Vec<String>,
    pub description: String,
    /// e.g. "Poor metabolizer"
    pub clinical_significance: String,
    pub affected_drugs: Vec<String>,
}

impl VariantRecord {
    /// Interval covering the gene region, as sent to the genomic model
    pub fn interval(&self) -> GenomicInterval {
        GenomicInterval {
            chromosome: self.chromosome.clone(),
            start: self.gene_region.start,
            end: self.gene_region.end,
        }
    }

    /// Variant descriptor, as sent to the genomic model
    pub fn variant(&self) -> GenomicVariant {
        GenomicVariant {
            chromosome: self.chromosome.clone(),
            position: self.position,
            reference_bases: self.ref_bases.clone(),
            alternate_bases: self.alt_bases.clone(),
        }
    }
}

/// Genomic interval (`chrom:start-end`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomicInterval {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chromosome, self.start, self.end)
    }
}

/// Single-allele change at a genomic position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomicVariant {
    pub chromosome: String,
    pub position: u64,
    pub reference_bases: String,
    pub alternate_bases: String,
}

impl fmt::Display for GenomicVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}>{}",
            self.chromosome, self.position, self.reference_bases, self.alternate_bases
        )
    }
}

/// Immutable, ordered lookup table of known variants
#[derive(Debug, Clone)]
pub struct VariantCatalog {
    records: Vec<VariantRecord>,
    index: HashMap<String, usize>,
}

impl VariantCatalog {
    /// Build a catalog from records, validating their content
    pub fn new(records: Vec<VariantRecord>) -> Result<Self, PharmaError> {
        validate_records(&records)?;
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), i))
            .collect();
        Ok(Self { records, index })
    }

    /// The built-in pharmacogenomic variant table
    pub fn builtin() -> Self {
        let records = builtin_records();
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), i))
            .collect();
        Self { records, index }
    }

    /// Load a catalog from a JSON array of records
    pub fn from_json_file(path: &Path) -> Result<Self, PharmaError> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<VariantRecord> = serde_json::from_str(&content)?;
        Self::new(records)
    }

    /// All identifiers, in catalog order
    pub fn list(&self) -> Vec<String> {
        self.records.iter().map(|r| r.name.clone()).collect()
    }

    /// Look up a record by identifier
    pub fn lookup(&self, name: &str) -> Result<&VariantRecord, PharmaError> {
        self.index
            .get(name)
            .map(|&i| &self.records[i])
            .ok_or_else(|| PharmaError::UnknownVariant {
                name: name.to_string(),
                available: self.list(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[VariantRecord] {
        &self.records
    }
}

impl Default for VariantCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_records(records: &[VariantRecord]) -> Result<(), PharmaError> {
    if records.is_empty() {
        return Err(PharmaError::invalid_catalog("catalog contains no variants"));
    }

    let mut seen = HashSet::new();
    for record in records {
        if record.name.trim().is_empty() {
            return Err(PharmaError::invalid_catalog("variant name cannot be empty"));
        }
        if !seen.insert(record.name.as_str()) {
            return Err(PharmaError::invalid_catalog(format!(
                "duplicate variant name: {}",
                record.name
            )));
        }
        if record.chromosome.is_empty() {
            return Err(PharmaError::invalid_catalog(format!(
                "{}: chromosome cannot be empty",
                record.name
            )));
        }
        for bases in [&record.ref_bases, &record.alt_bases] {
            if !BASES_PATTERN.is_match(bases) {
                return Err(PharmaError::invalid_catalog(format!(
                    "{}: invalid bases '{}'",
                    record.name, bases
                )));
            }
        }

        let region = record.gene_region;
        if region.start >= region.end {
            return Err(PharmaError::invalid_catalog(format!(
                "{}: gene region start {} must be below end {}",
                record.name, region.start, region.end
            )));
        }
        if record.position < region.start || record.position >= region.end {
            return Err(PharmaError::invalid_catalog(format!(
                "{}: position {} lies outside gene region {}-{}",
                record.name, record.position, region.start, region.end
            )));
        }
    }

    Ok(())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn builtin_records() -> Vec<VariantRecord> {
    vec![
        VariantRecord {
            name: "CYP2D6*4".to_string(),
            chromosome: "chr22".to_string(),
            position: 42522500,
            ref_bases: "G".to_string(),
            alt_bases: "A".to_string(),
            gene_region: GeneRegion {
                start: 42522000,
                end: 42523000,
            },
            ontology_terms: strings(&["liver", "hepatocyte"]),
            description: "Splice site variant causing reduced enzyme activity".to_string(),
            clinical_significance: "Poor metabolizer".to_string(),
            affected_drugs: strings(&["Codeine", "Tramadol", "Dextromethorphan"]),
        },
        VariantRecord {
            name: "TPMT*3A_G460A".to_string(),
            chromosome: "chr6".to_string(),
            position: 18138997,
            ref_bases: "G".to_string(),
            alt_bases: "A".to_string(),
            gene_region: GeneRegion {
                start: 18138500,
                end: 18139500,
            },
            ontology_terms: strings(&["hematopoietic system"]),
            description: "Dual variants causing enzyme instability".to_string(),
            clinical_significance: "Poor metabolizer".to_string(),
            affected_drugs: strings(&["6-Mercaptopurine", "Azathioprine", "6-Thioguanine"]),
        },
        VariantRecord {
            name: "DPYD*2A".to_string(),
            chromosome: "chr1".to_string(),
            position: 97915614,
            ref_bases: "G".to_string(),
            alt_bases: "A".to_string(),
            gene_region: GeneRegion {
                start: 97915000,
                end: 97916000,
            },
            ontology_terms: strings(&["liver", "small intestine"]),
            description: "Splice donor variant causing skipped exon".to_string(),
            clinical_significance: "Poor metabolizer".to_string(),
            affected_drugs: strings(&["5-Fluorouracil", "Capecitabine", "Tegafur"]),
        },
        VariantRecord {
            name: "UGT1A1*28".to_string(),
            chromosome: "chr2".to_string(),
            position: 234668879,
            ref_bases: "A".to_string(),
            alt_bases: "TA".to_string(),
            gene_region: GeneRegion {
                start: 234668000,
                end: 234669000,
            },
            ontology_terms: strings(&["liver"]),
            description: "Promoter variant reducing transcription".to_string(),
            clinical_significance: "Intermediate metabolizer".to_string(),
            affected_drugs: strings(&["Irinotecan", "Bilirubin"]),
        },
    ]
}
