//! Chart data model: the person/family trees that the layout engine consumes.
//!
//! A `DescendantChart` places the earliest ancestor at the top and each
//! successive generation in a horizontal row below the previous one. An
//! `AncestorChart` is the mirror view: the root person at the left and the
//! tree of their forebears doubling per column to the right.
//!
//! Charts are plain owned trees. They are built once (by [`crate::parser`] or
//! directly by the caller) and are read-only afterwards; a chart may be laid
//! out any number of times and every layout call owns its own geometry.

/// A chart of descendants rooted at a single ancestor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescendantChart {
    pub title: String,
    pub notes: Vec<String>,
    pub root: Person,
}

impl DescendantChart {
    pub fn new(root: Person) -> Self {
        Self {
            title: String::new(),
            notes: Vec::new(),
            root,
        }
    }
}

/// An individual in a descendant chart.
///
/// `id` is a unique positive integer assigned in creation order. `headings`
/// override the default rendering of the first detail line as the blurb
/// heading; the parser leaves them empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: i32,
    pub headings: Vec<String>,
    pub details: Vec<String>,
    pub families: Vec<Family>,
}

impl Person {
    pub fn new(id: i32, details: Vec<String>) -> Self {
        Self {
            id,
            headings: Vec::new(),
            details,
            families: Vec::new(),
        }
    }
}

/// A family unit extending a person: an optional partner (absent when the
/// source never stated one) and the children in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Family {
    pub spouse: Option<Person>,
    pub details: Vec<String>,
    pub children: Vec<Person>,
}

/// A chart of ancestors rooted at a single person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorChart {
    pub title: String,
    pub notes: Vec<String>,
    pub root: AncestorPerson,
}

impl AncestorChart {
    pub fn new(root: AncestorPerson) -> Self {
        Self {
            title: String::new(),
            notes: Vec::new(),
            root,
        }
    }
}

/// An individual in an ancestor chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorPerson {
    pub id: i32,
    pub details: Vec<String>,
    pub father: Option<Box<AncestorPerson>>,
    pub mother: Option<Box<AncestorPerson>>,
}

impl AncestorPerson {
    pub fn new(id: i32, details: Vec<String>) -> Self {
        Self {
            id,
            details,
            father: None,
            mother: None,
        }
    }

    /// Number of generations in the chart including this person.
    pub fn generations(&self) -> usize {
        let father = self.father.as_ref().map_or(0, |p| p.generations());
        let mother = self.mother.as_ref().map_or(0, |p| p.generations());
        1 + father.max(mother)
    }
}
