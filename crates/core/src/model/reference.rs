use super::Location;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Function,
    Variable,
    Struct,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReferenceKind::Function => "function",
            ReferenceKind::Variable => "variable",
            ReferenceKind::Struct => "struct",
        };
        f.write_str(s)
    }
}

impl FromStr for ReferenceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "function" | "func" | "fn" => Ok(ReferenceKind::Function),
            "variable" | "var" => Ok(ReferenceKind::Variable),
            "struct" | "type" => Ok(ReferenceKind::Struct),
            other => Err(format!("unknown reference kind '{}'", other)),
        }
    }
}

/// A function declaration or a call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub location: Location,
    pub name: String,
    /// Receiver type of a method declaration, or the receiver expression's
    /// base identifier at a selector call site. Empty when there is none.
    pub receiver: String,
    /// Lines spanned by the body after the declaration line.
    pub size: usize,
    pub is_decl: bool,
    /// Callee names, one entry per call site inside the body.
    #[serde(rename = "fn_calls")]
    pub calls: Vec<String>,
}

impl Function {
    pub fn declaration(
        location: Location,
        name: impl Into<String>,
        receiver: impl Into<String>,
        size: usize,
    ) -> Self {
        Self {
            location,
            name: name.into(),
            receiver: receiver.into(),
            size,
            is_decl: true,
            calls: Vec::new(),
        }
    }

    pub fn call(location: Location, name: impl Into<String>, receiver: impl Into<String>) -> Self {
        Self {
            location,
            name: name.into(),
            receiver: receiver.into(),
            size: 0,
            is_decl: false,
            calls: Vec::new(),
        }
    }

    /// Display identity, e.g. `Index.Build (index.go:200)`.
    pub fn info(&self) -> String {
        if self.receiver.is_empty() {
            format!("{} ({})", self.name, self.location)
        } else {
            format!("{}.{} ({})", self.receiver, self.name, self.location)
        }
    }

    /// Whether `loc` lies inside this declaration's body. The last line
    /// (`line + size`) is included.
    pub fn wraps(&self, loc: &Location) -> bool {
        if !self.is_decl || self.location.file != loc.file {
            return false;
        }
        loc.line >= self.location.line && loc.line <= self.location.line + self.size
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub location: Location,
    pub name: String,
    pub is_decl: bool,
}

impl Variable {
    pub fn new(location: Location, name: impl Into<String>, is_decl: bool) -> Self {
        Self {
            location,
            name: name.into(),
            is_decl,
        }
    }
}

/// A named type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Struct {
    pub location: Location,
    pub name: String,
    /// Not filled by the scan.
    #[serde(default)]
    pub fields: Vec<String>,
}

impl Struct {
    pub fn new(location: Location, name: impl Into<String>) -> Self {
        Self {
            location,
            name: name.into(),
            fields: Vec::new(),
        }
    }
}

/// One indexed occurrence of an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Reference {
    Function(Function),
    Variable(Variable),
    Struct(Struct),
}

impl Reference {
    pub fn kind(&self) -> ReferenceKind {
        match self {
            Reference::Function(_) => ReferenceKind::Function,
            Reference::Variable(_) => ReferenceKind::Variable,
            Reference::Struct(_) => ReferenceKind::Struct,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Reference::Function(f) => &f.name,
            Reference::Variable(v) => &v.name,
            Reference::Struct(s) => &s.name,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            Reference::Function(f) => &f.location,
            Reference::Variable(v) => &v.location,
            Reference::Struct(s) => &s.location,
        }
    }

    pub(crate) fn location_mut(&mut self) -> &mut Location {
        match self {
            Reference::Function(f) => &mut f.location,
            Reference::Variable(v) => &mut v.location,
            Reference::Struct(s) => &mut s.location,
        }
    }

    /// Type declarations are always declarations.
    pub fn is_decl(&self) -> bool {
        match self {
            Reference::Function(f) => f.is_decl,
            Reference::Variable(v) => v.is_decl,
            Reference::Struct(_) => true,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Reference::Function(f) => Some(f),
            _ => None,
        }
    }
}

impl From<Function> for Reference {
    fn from(f: Function) -> Self {
        Reference::Function(f)
    }
}

impl From<Variable> for Reference {
    fn from(v: Variable) -> Self {
        Reference::Variable(v)
    }
}

impl From<Struct> for Reference {
    fn from(s: Struct) -> Self {
        Reference::Struct(s)
    }
}
