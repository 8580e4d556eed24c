use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One possible lemma/tag reading of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisCandidate {
    pub lemma: String,
    pub detailed_tag: String,
    pub simple_tag: String,
    /// The annotator's selection marker.
    pub is_correct: bool,
    /// The tags of this candidate were edited by hand.
    pub is_modified: bool,
}

/// One token as produced by one annotator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRecord {
    pub id: String,
    /// Surface text as written in the source.
    pub form: String,
    /// The annotator edited the surface form by hand.
    pub is_modified: bool,
    pub candidate_analyses: Vec<AnalysisCandidate>,
}

impl TokenRecord {
    /// The hand-corrected surface text, present only if the form was edited.
    pub fn modified_text(&self) -> Option<&str> {
        self.is_modified.then_some(self.form.as_str())
    }
}

/// Token records of one annotator keyed by token id.
pub type TokenMap = BTreeMap<String, TokenRecord>;

/// Both annotators' token maps, loaded before the run.
#[derive(Debug, Clone, Default)]
pub struct AgreementInput {
    pub a: TokenMap,
    pub b: TokenMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Annotator {
    A,
    B,
}

impl std::fmt::Display for Annotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// A token present in both sources with no conflicting form edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparableToken {
    pub id: String,
    pub a: TokenRecord,
    pub b: TokenRecord,
}

impl ComparableToken {
    pub fn modified_a(&self) -> Option<&str> {
        self.a.modified_text()
    }

    pub fn modified_b(&self) -> Option<&str> {
        self.b.modified_text()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    OnlyInA,
    OnlyInB,
    /// Both annotators edited the form, to different texts.
    ConflictingEdits,
    /// Exactly one annotator edited the form.
    OneSidedEdit,
}

/// A token left out of the statistics, kept for the difference report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedToken {
    pub id: String,
    pub a: Option<TokenRecord>,
    pub b: Option<TokenRecord>,
    pub reason: ExclusionReason,
}

impl ExcludedToken {
    pub fn modified_a(&self) -> Option<&str> {
        self.a.as_ref().and_then(TokenRecord::modified_text)
    }

    pub fn modified_b(&self) -> Option<&str> {
        self.b.as_ref().and_then(TokenRecord::modified_text)
    }
}

/// Disjoint partition of the union of both annotators' token ids.
#[derive(Debug, Clone, Default)]
pub struct Alignment {
    pub comparable: BTreeMap<String, ComparableToken>,
    pub excluded: BTreeMap<String, ExcludedToken>,
}

// ---------------------------------------------------------------------------
// Categories + extraction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Lemma,
    Detailed,
    Simple,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Lemma, Category::Detailed, Category::Simple];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lemma => "lemma",
            Self::Detailed => "detailed",
            Self::Simple => "simple",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The analysis one annotator marked correct for one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub lemma: String,
    pub detailed_tag: String,
    pub simple_tag: String,
    pub is_modified: bool,
}

impl Selection {
    pub fn value(&self, category: Category) -> &str {
        match category {
            Category::Lemma => &self.lemma,
            Category::Detailed => &self.detailed_tag,
            Category::Simple => &self.simple_tag,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryMatches {
    pub lemma: bool,
    pub detailed: bool,
    pub simple: bool,
}

impl CategoryMatches {
    pub fn get(&self, category: Category) -> bool {
        match category {
            Category::Lemma => self.lemma,
            Category::Detailed => self.detailed,
            Category::Simple => self.simple,
        }
    }

    pub fn all(&self) -> bool {
        self.lemma && self.detailed && self.simple
    }
}

/// Both annotators' selections for one comparable token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenAnswers {
    pub id: String,
    pub a: Selection,
    pub b: Selection,
    pub matches: CategoryMatches,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// How often each annotator selected one value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Marginal {
    pub count_a: usize,
    pub count_b: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueShare {
    pub count_a: usize,
    pub count_b: usize,
    /// (count_a / N) * (count_b / N)
    pub p: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: Category,
    pub po: f64,
    pub pe: f64,
    pub kappa: f64,
    pub agree_count: usize,
    pub disagree_count: usize,
    pub values: BTreeMap<String, ValueShare>,
    pub disagreements: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgreementStats {
    pub total: usize,
    pub lemma: CategoryStats,
    pub detailed: CategoryStats,
    pub simple: CategoryStats,
}

impl AgreementStats {
    pub fn get(&self, category: Category) -> &CategoryStats {
        match category {
            Category::Lemma => &self.lemma,
            Category::Detailed => &self.detailed,
            Category::Simple => &self.simple,
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportEntry {
    DifferingToken {
        id: String,
        reason: ExclusionReason,
        form_a: Option<String>,
        form_b: Option<String>,
    },
    DifferingAnalysis {
        id: String,
        a: Selection,
        b: Selection,
        categories: Vec<Category>,
    },
}

impl ReportEntry {
    pub fn id(&self) -> &str {
        match self {
            Self::DifferingToken { id, .. } | Self::DifferingAnalysis { id, .. } => id,
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenCounts {
    pub tokens_a: usize,
    pub tokens_b: usize,
    pub union: usize,
    pub comparable: usize,
    pub excluded: usize,
    pub disagreeing: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgreementMeta {
    pub label_a: String,
    pub label_b: String,
    pub engine_version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgreementResult {
    pub meta: AgreementMeta,
    pub counts: TokenCounts,
    pub stats: AgreementStats,
    pub exclusions: BTreeMap<String, ExclusionReason>,
    pub entries: Vec<ReportEntry>,
    /// Rendered difference report, one blank-line separated entry per id.
    #[serde(skip)]
    pub report: String,
}
