use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed document taxonomy.
///
/// `Other` is the catch-all for anything that is not one of the three formal
/// categories; it has no prototype and no keyword table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Resume")]
    Resume,
    #[serde(rename = "Report")]
    Report,
    #[serde(rename = "Legal Document")]
    LegalDocument,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    /// Formal categories in tie-break order: when two categories score the
    /// same, the one listed first wins.
    pub const FORMAL: [Category; 3] = [Category::Resume, Category::Report, Category::LegalDocument];

    /// Every category, `Other` last.
    pub const ALL: [Category; 4] = [
        Category::Resume,
        Category::Report,
        Category::LegalDocument,
        Category::Other,
    ];

    /// User-facing label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Resume => "Resume",
            Category::Report => "Report",
            Category::LegalDocument => "Legal Document",
            Category::Other => "Other",
        }
    }

    pub fn is_formal(&self) -> bool {
        !matches!(self, Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per formal category.
///
/// Each formal category is a named field, so a table can never be missing a
/// category. `Other` has no slot: [`PerCategory::get`] returns `None` for it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PerCategory<T> {
    pub resume: T,
    pub report: T,
    pub legal_document: T,
}

impl<T> PerCategory<T> {
    /// Builds a table by evaluating `f` once per formal category, in tie-break order.
    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        Self {
            resume: f(Category::Resume),
            report: f(Category::Report),
            legal_document: f(Category::LegalDocument),
        }
    }

    pub fn get(&self, category: Category) -> Option<&T> {
        match category {
            Category::Resume => Some(&self.resume),
            Category::Report => Some(&self.report),
            Category::LegalDocument => Some(&self.legal_document),
            Category::Other => None,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> Option<&mut T> {
        match category {
            Category::Resume => Some(&mut self.resume),
            Category::Report => Some(&mut self.report),
            Category::LegalDocument => Some(&mut self.legal_document),
            Category::Other => None,
        }
    }

    /// Iterates `(category, value)` pairs in tie-break order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        [
            (Category::Resume, &self.resume),
            (Category::Report, &self.report),
            (Category::LegalDocument, &self.legal_document),
        ]
        .into_iter()
    }

    pub fn map<U>(&self, mut f: impl FnMut(Category, &T) -> U) -> PerCategory<U> {
        PerCategory {
            resume: f(Category::Resume, &self.resume),
            report: f(Category::Report, &self.report),
            legal_document: f(Category::LegalDocument, &self.legal_document),
        }
    }

    /// Fallible variant of [`PerCategory::map`]; stops at the first error.
    pub fn try_map<U, E>(&self, mut f: impl FnMut(Category, &T) -> Result<U, E>) -> Result<PerCategory<U>, E> {
        Ok(PerCategory {
            resume: f(Category::Resume, &self.resume)?,
            report: f(Category::Report, &self.report)?,
            legal_document: f(Category::LegalDocument, &self.legal_document)?,
        })
    }
}

impl<T: PartialOrd + Copy> PerCategory<T> {
    /// Category holding the largest value. Ties resolve to the earliest
    /// category in [`Category::FORMAL`]; incomparable values (NaN) never win.
    pub fn argmax(&self) -> (Category, T) {
        let mut best = (Category::Resume, self.resume);
        for (category, &value) in self.iter().skip(1) {
            let best_is_nan = best.1.partial_cmp(&best.1).is_none();
            if value > best.1 || (best_is_nan && value.partial_cmp(&value).is_some()) {
                best = (category, value);
            }
        }
        best
    }
}
