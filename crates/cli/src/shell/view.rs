use goscope_core::model::Reference;
use goscope_core::query::WordMatch;
use tabled::Tabled;

/// One row of `search` output.
#[derive(Tabled)]
pub struct WordMatchView {
    #[tabled(rename = "#")]
    pub rank: usize,
    #[tabled(rename = "Word")]
    pub word: String,
    #[tabled(rename = "File")]
    pub file: String,
    #[tabled(rename = "Count")]
    pub count: usize,
}

impl WordMatchView {
    pub fn from_match(rank: usize, unit: &WordMatch) -> Self {
        Self {
            rank,
            word: unit.word.clone(),
            file: unit.file.clone(),
            count: unit.count,
        }
    }
}

/// One row of `list` output.
#[derive(Tabled)]
pub struct LocationView {
    #[tabled(rename = "#")]
    pub rank: usize,
    #[tabled(rename = "File")]
    pub file: String,
    #[tabled(rename = "Line")]
    pub line: usize,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Decl")]
    pub is_decl: String,
    #[tabled(rename = "Within")]
    pub within: String,
}

impl LocationView {
    pub fn from_reference(rank: usize, reference: &Reference) -> Self {
        let location = reference.location();
        Self {
            rank,
            file: location.file.clone(),
            line: location.line,
            kind: reference.kind().to_string(),
            is_decl: if reference.is_decl() { "yes" } else { "no" }.to_string(),
            within: location.within.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}
