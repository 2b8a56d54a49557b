//! Query model for the document search endpoint

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;

/// A filter on documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    /// `path` equals `value`, e.g. `document.type` = `posts`
    At { path: String, value: String },
}

impl Predicate {
    pub fn at(path: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::At {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Documents of the given type
    pub fn document_type(doc_type: &str) -> Self {
        Self::at("document.type", doc_type)
    }

    /// The document of `doc_type` whose uid is `uid`
    pub fn uid(doc_type: &str, uid: &str) -> Self {
        Self::at(format!("my.{}.uid", doc_type), uid)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::At { path, value } => write!(f, "[at({},{:?})]", path, value),
        }
    }
}

/// Field a query can be ordered by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderField {
    FirstPublicationDate,
    LastPublicationDate,
    /// A custom field, e.g. `my.posts.title`
    Field(String),
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Asc,
    Desc,
}

/// One ordering clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ordering {
    pub field: OrderField,
    pub direction: Direction,
}

impl Ordering {
    pub fn asc(field: OrderField) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: OrderField) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }

    /// Parse a config-style clause such as `first_publication_date desc`
    pub fn parse(clause: &str, doc_type: &str) -> Option<Self> {
        let mut parts = clause.split_whitespace();
        let name = parts.next()?;
        let direction = match parts.next() {
            None | Some("asc") => Direction::Asc,
            Some("desc") => Direction::Desc,
            Some(_) => return None,
        };
        if parts.next().is_some() {
            return None;
        }

        let field = match name.trim_start_matches("document.") {
            "first_publication_date" => OrderField::FirstPublicationDate,
            "last_publication_date" => OrderField::LastPublicationDate,
            other if other.starts_with("my.") => OrderField::Field(other.to_string()),
            other => OrderField::Field(format!("my.{}.{}", doc_type, other)),
        };

        Some(Self { field, direction })
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            OrderField::FirstPublicationDate => f.write_str("document.first_publication_date")?,
            OrderField::LastPublicationDate => f.write_str("document.last_publication_date")?,
            OrderField::Field(path) => f.write_str(path)?,
        }
        if self.direction == Direction::Desc {
            f.write_str(" desc")?;
        }
        Ok(())
    }
}

/// A bounded document query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub predicates: Vec<Predicate>,
    /// Projected data fields, e.g. `posts.title`; empty fetches everything
    pub fetch: Vec<String>,
    pub page_size: NonZeroUsize,
    /// Content reference; `None` targets the published revision
    pub content_ref: Option<String>,
    pub orderings: Vec<Ordering>,
    /// Document id to continue from
    pub after: Option<String>,
}

impl Query {
    /// Query all documents of one type
    pub fn of_type(doc_type: &str) -> Self {
        Self {
            predicates: vec![Predicate::document_type(doc_type)],
            fetch: Vec::new(),
            page_size: NonZeroUsize::MIN,
            content_ref: None,
            orderings: Vec::new(),
            after: None,
        }
    }

    pub fn fetch<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fetch = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn page_size(mut self, page_size: NonZeroUsize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn content_ref(mut self, content_ref: Option<&str>) -> Self {
        self.content_ref = content_ref.map(str::to_string);
        self
    }

    pub fn order_by(mut self, ordering: Ordering) -> Self {
        self.orderings.push(ordering);
        self
    }

    pub fn after(mut self, document_id: &str) -> Self {
        self.after = Some(document_id.to_string());
        self
    }

    /// Predicates in the `q` parameter form: `[[at(document.type,"posts")]]`
    pub fn q_param(&self) -> String {
        let inner: String = self.predicates.iter().map(|p| p.to_string()).collect();
        format!("[{}]", inner)
    }

    /// Orderings in the `orderings` parameter form, `None` when unordered
    pub fn orderings_param(&self) -> Option<String> {
        if self.orderings.is_empty() {
            return None;
        }
        let clauses: Vec<_> = self.orderings.iter().map(|o| o.to_string()).collect();
        Some(format!("[{}]", clauses.join(",")))
    }

    /// Fetch fields in the `fetch` parameter form, `None` when unprojected
    pub fn fetch_param(&self) -> Option<String> {
        if self.fetch.is_empty() {
            None
        } else {
            Some(self.fetch.join(","))
        }
    }
}
