// Abstract Syntax Tree for PieQL

/// Field name that stands for every column of the source table.
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    pub fields: Vec<Field>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Field { name: name.into() }
    }

    pub fn wildcard() -> Self {
        Field::new(WILDCARD)
    }

    pub fn is_wildcard(&self) -> bool {
        self.name == WILDCARD
    }
}
