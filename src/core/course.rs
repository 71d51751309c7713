use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CourseId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Base,
    Specialized,
    Elective,
    Special,
    #[serde(other)]
    Unknown,
}

impl Category {
    /// The categories a user can toggle, in display order.
    pub const ALL: [Category; 4] = [
        Category::Base,
        Category::Specialized,
        Category::Elective,
        Category::Special,
    ];

    /// Sort rank inside a layout layer.
    pub fn rank(self) -> u8 {
        match self {
            Category::Base => 0,
            Category::Specialized => 1,
            Category::Elective => 2,
            Category::Special => 3,
            Category::Unknown => 9,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Base => "base",
            Category::Specialized => "specialized",
            Category::Elective => "elective",
            Category::Special => "special",
            Category::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "base" => Some(Category::Base),
            "specialized" => Some(Category::Specialized),
            "elective" => Some(Category::Elective),
            "special" => Some(Category::Special),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Prerequisite,
    Corequisite,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::Prerequisite => f.write_str("prerequisite"),
            RelationKind::Corequisite => f.write_str("corequisite"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub credits: u32,
    pub category: Category,
    #[serde(default)]
    pub prerequisites: Vec<CourseId>,
    #[serde(default)]
    pub corequisites: Vec<CourseId>,
}

impl Course {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: CourseId::new(id),
            name: name.into(),
            credits: 3,
            category,
            prerequisites: Vec::new(),
            corequisites: Vec::new(),
        }
    }

    pub fn with_credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    pub fn requires(mut self, ids: &[&str]) -> Self {
        self.prerequisites.extend(ids.iter().map(|id| CourseId::new(*id)));
        self
    }

    pub fn alongside(mut self, ids: &[&str]) -> Self {
        self.corequisites.extend(ids.iter().map(|id| CourseId::new(*id)));
        self
    }
}
