use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::models::MetricLevel;

/// Failure loading the authored case table.
#[derive(Debug, Error)]
pub enum CaseTableError {
    #[error("failed to read case table {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("case table {path} is not valid JSON")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Authored explanatory content, keyed by case identifier. Supplied as a
/// static JSON resource; never computed here.
#[derive(Debug, Clone, Deserialize)]
pub struct CaseTable {
    pub version: String,
    pub channel_analysis_cases: CaseCatalog,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaseCatalog {
    pub cases: Vec<AnalysisCase>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisCase {
    pub case_id: String,
    pub metrics: CaseMetrics,
    pub analysis: Analysis,
    pub recommendations: Recommendations,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaseMetrics {
    pub subscribers_to_views: MetricLevel,
    pub views_to_likes: MetricLevel,
    pub views_to_comments: MetricLevel,
}

impl CaseMetrics {
    /// Identifier these levels spell out, in the fixed metric order.
    pub fn case_id(&self) -> String {
        [
            self.subscribers_to_views,
            self.views_to_likes,
            self.views_to_comments,
        ]
        .iter()
        .map(|level| level.symbol())
        .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Analysis {
    pub interpretation: String,
    #[serde(default)]
    pub causes: Vec<Cause>,
    #[serde(default)]
    pub detailed_analysis: Option<DetailedAnalysis>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cause {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetailedAnalysis {
    pub views_analysis: String,
    pub likes_analysis: String,
    pub comments_analysis: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub strategy: Vec<Strategy>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Strategy {
    pub title: String,
    #[serde(default)]
    pub actions: Vec<String>,
}

/// Outcome of matching a case identifier against the table. An identifier
/// with no authored case is reported as such rather than papered over with
/// an arbitrary default entry.
#[derive(Debug)]
pub enum CaseOutcome<'a> {
    Matched(&'a AnalysisCase),
    Unclassified { case_id: String },
}

impl CaseTable {
    pub fn from_path(path: &Path) -> Result<Self, CaseTableError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CaseTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| CaseTableError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Exact-match lookup; no partial or nearest-match fallback.
    pub fn find(&self, case_id: &str) -> Option<&AnalysisCase> {
        self.channel_analysis_cases
            .cases
            .iter()
            .find(|case| case.case_id == case_id)
    }

    pub fn resolve(&self, case_id: &str) -> CaseOutcome<'_> {
        match self.find(case_id) {
            Some(case) => CaseOutcome::Matched(case),
            None => {
                warn!(case_id, "no authored case for this identifier");
                CaseOutcome::Unclassified {
                    case_id: case_id.to_string(),
                }
            }
        }
    }

    /// Coverage report: the identifiers (out of the 27 possible) with no
    /// authored case, ids appearing more than once, and cases whose
    /// `metrics` levels spell a different identifier than their `case_id`.
    pub fn validate(&self) -> CaseCoverage {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        let mut mismatched = Vec::new();
        for case in &self.channel_analysis_cases.cases {
            if !seen.insert(case.case_id.as_str()) {
                duplicates.push(case.case_id.clone());
            }
            let spelled = case.metrics.case_id();
            if spelled != case.case_id {
                mismatched.push(format!("{} (metrics spell {})", case.case_id, spelled));
            }
        }

        let mut missing = Vec::new();
        for symbols in all_case_ids() {
            if !seen.contains(symbols.as_str()) {
                missing.push(symbols);
            }
        }

        CaseCoverage {
            missing,
            duplicates,
            mismatched,
        }
    }
}

#[derive(Debug)]
pub struct CaseCoverage {
    pub missing: Vec<String>,
    pub duplicates: Vec<String>,
    pub mismatched: Vec<String>,
}

impl CaseCoverage {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.duplicates.is_empty() && self.mismatched.is_empty()
    }
}

fn all_case_ids() -> Vec<String> {
    const LEVELS: [MetricLevel; 3] = [
        MetricLevel::Above,
        MetricLevel::Adequate,
        MetricLevel::Below,
    ];
    let mut ids = Vec::with_capacity(27);
    for views in LEVELS {
        for likes in LEVELS {
            for comments in LEVELS {
                ids.push(
                    [views, likes, comments]
                        .iter()
                        .map(|level| level.symbol())
                        .collect(),
                );
            }
        }
    }
    ids
}
