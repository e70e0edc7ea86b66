use crate::model::Reference;
use serde::{Deserialize, Serialize};

/// One matched word: how often it occurs and a representative file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordMatch {
    pub word: String,
    pub file: String,
    pub count: usize,
}

impl WordMatch {
    pub fn new(word: impl Into<String>, file: impl Into<String>, count: usize) -> Self {
        Self {
            word: word.into(),
            file: file.into(),
            count,
        }
    }
}

/// Flat, display-ready form of a reference, as served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub word: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub reference: String,
    pub is_decl: String,
    pub within_fn: String,
}

impl From<&Reference> for ResultRecord {
    fn from(reference: &Reference) -> Self {
        let yes_no = |b: bool| String::from(if b { "yes" } else { "no" });
        let location = reference.location();
        let (is_decl, within_fn) = match reference {
            Reference::Function(f) => (yes_no(f.is_decl), location.within.clone()),
            Reference::Variable(v) => (yes_no(v.is_decl), location.within.clone()),
            Reference::Struct(_) => (yes_no(true), None),
        };

        Self {
            word: reference.name().to_string(),
            kind: reference.kind().to_string(),
            reference: location.to_string(),
            is_decl,
            within_fn: within_fn.unwrap_or_else(|| "global".to_string()),
        }
    }
}

pub fn format_results<'a, I>(refs: I) -> Vec<ResultRecord>
where
    I: IntoIterator<Item = &'a Reference>,
{
    refs.into_iter().map(ResultRecord::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Function, Location, Struct, Variable};

    #[test]
    fn formats_each_variant() {
        let mut inside = Location::new("main.go", 4);
        inside.within = Some("main (main.go:3)".to_string());
        let v = Reference::from(Variable::new(inside, "count", true));
        let f = Reference::from(Function::call(Location::new("main.go", 8), "run", ""));
        let mut s_loc = Location::new("types.go", 2);
        s_loc.within = Some("ignored".to_string());
        let s = Reference::from(Struct::new(s_loc, "Config"));

        let records = format_results([&v, &f, &s]);

        assert_eq!(records[0].kind, "variable");
        assert_eq!(records[0].reference, "main.go:4");
        assert_eq!(records[0].is_decl, "yes");
        assert_eq!(records[0].within_fn, "main (main.go:3)");

        assert_eq!(records[1].kind, "function");
        assert_eq!(records[1].is_decl, "no");
        assert_eq!(records[1].within_fn, "global");

        assert_eq!(records[2].kind, "struct");
        assert_eq!(records[2].is_decl, "yes");
        assert_eq!(records[2].within_fn, "global");
    }

    #[test]
    fn serializes_type_key() {
        let v = Reference::from(Variable::new(Location::new("a.go", 1), "x", false));
        let json = serde_json::to_value(ResultRecord::from(&v)).unwrap();
        assert_eq!(json["type"], "variable");
        assert_eq!(json["within_fn"], "global");
    }
}
