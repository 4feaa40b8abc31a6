use super::category::{Category, PerCategory};
use super::error::ClassifierError;

const RESUME_KEYWORDS: &[&str] = &[
    "resume", "cv", "curriculum vitae", "work experience",
    "education", "skills", "objective", "references",
    "employment history", "job position", "professional summary",
    "qualifications", "certifications", "career", "internship",
];

const REPORT_KEYWORDS: &[&str] = &[
    "report", "analysis", "findings", "methodology",
    "conclusions", "recommendations", "quarterly", "annual",
    "executive summary", "data", "statistics", "metrics",
    "performance", "assessment", "benchmark", "trends",
];

const LEGAL_KEYWORDS: &[&str] = &[
    "agreement", "contract", "parties", "hereby",
    "terms", "conditions", "legal", "binding", "court",
    "whereas", "jurisdiction", "liability", "indemnity",
    "confidentiality", "plaintiff", "defendant", "witness",
];

const RESUME_DESCRIPTION: &str = "A resume or cv (curriculum vitae) of a job candidate: \
    professional summary and career objective, work experience and employment history, \
    job position titles, education, skills, qualifications, certifications, internship \
    and references.";

const REPORT_DESCRIPTION: &str = "A business or research report with an executive summary, \
    methodology, data analysis, statistics and metrics, performance assessment, benchmark \
    results, trends, findings, conclusions and recommendations for a quarterly or annual review.";

const LEGAL_DESCRIPTION: &str = "A legal document such as a contract or agreement between parties: \
    binding terms and conditions, whereas clauses, the parties hereby agree, liability, \
    indemnity, confidentiality and jurisdiction, court filings naming plaintiff, defendant \
    and witness.";

/// Longest description accepted for a prototype.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// A formal category's hand-authored representative text and its strong keywords.
#[derive(Debug, Clone)]
pub struct CategoryPrototype {
    pub category: Category,
    /// Free text embedded once to produce the category's prototype vector
    pub description: String,
    /// Phrases that are highly diagnostic of the category, matched as substrings
    pub keywords: &'static [&'static str],
}

impl CategoryPrototype {
    fn new(category: Category, description: &str, keywords: &'static [&'static str]) -> Self {
        Self {
            category,
            description: description.to_string(),
            keywords,
        }
    }

    /// The built-in prototype for a formal category.
    pub fn builtin(category: Category) -> Option<Self> {
        let description = match category {
            Category::Resume => RESUME_DESCRIPTION,
            Category::Report => REPORT_DESCRIPTION,
            Category::LegalDocument => LEGAL_DESCRIPTION,
            Category::Other => return None,
        };
        Some(Self::new(category, description, keywords_for(category)))
    }
}

/// Strong keyword phrases for `category`. `Other` has none.
pub fn keywords_for(category: Category) -> &'static [&'static str] {
    match category {
        Category::Resume => RESUME_KEYWORDS,
        Category::Report => REPORT_KEYWORDS,
        Category::LegalDocument => LEGAL_KEYWORDS,
        Category::Other => &[],
    }
}

/// The built-in prototype set, one per formal category.
pub fn builtin_prototypes() -> PerCategory<CategoryPrototype> {
    PerCategory {
        resume: CategoryPrototype::new(Category::Resume, RESUME_DESCRIPTION, RESUME_KEYWORDS),
        report: CategoryPrototype::new(Category::Report, REPORT_DESCRIPTION, REPORT_KEYWORDS),
        legal_document: CategoryPrototype::new(Category::LegalDocument, LEGAL_DESCRIPTION, LEGAL_KEYWORDS),
    }
}

/// Checks a prototype description before it is embedded.
pub(crate) fn validate_description(category: Category, description: &str) -> Result<(), ClassifierError> {
    if !category.is_formal() {
        return Err(ClassifierError::ValidationError(
            "The Other category has no prototype".into(),
        ));
    }
    if description.trim().is_empty() {
        return Err(ClassifierError::ValidationError(format!(
            "Description for '{}' cannot be empty",
            category
        )));
    }
    let length = description.chars().count();
    if length > MAX_DESCRIPTION_LENGTH {
        return Err(ClassifierError::ValidationError(format!(
            "Description for '{}' is too long ({} chars, max is {})",
            category, length, MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(())
}
