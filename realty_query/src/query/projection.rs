//! # Projection
//!
//! Field selection in the `select` syntax used by list requests: field names
//! separated by spaces or commas, with a leading `-` to exclude a field.
//! `_id` is always returned unless excluded with `-_id`.

use std::fmt::{self, Display, Formatter};

use itertools::Itertools;
use serde_json::{Map, Value as JsonValue};

use crate::store::document::{Document, get_path, remove_path, set_path};

use super::error::{QueryError, QueryResult};

const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub fields: Vec<String>,
    pub mode: ProjectionMode,
    pub exclude_id: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Include,
    Exclude,
}

impl Projection {
    pub fn include<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            mode: ProjectionMode::Include,
            exclude_id: false,
        }
    }

    pub fn exclude<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            mode: ProjectionMode::Exclude,
            exclude_id: false,
        }
    }

    /// Parses a `select` string. Returns `None` for an empty selection.
    ///
    /// ```
    /// use realty_query::query::projection::{Projection, ProjectionMode};
    ///
    /// let projection = Projection::parse("title slug,-_id").unwrap().unwrap();
    /// assert_eq!(projection.mode, ProjectionMode::Include);
    /// assert_eq!(projection.fields, vec!["title", "slug"]);
    /// assert!(projection.exclude_id);
    ///
    /// assert!(Projection::parse(" ").unwrap().is_none());
    /// assert!(Projection::parse("title -slug").is_err());
    /// ```
    pub fn parse(source: &str) -> QueryResult<Option<Self>> {
        let mut included = Vec::new();
        let mut excluded = Vec::new();
        let mut exclude_id = false;
        for token in source
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
        {
            match token.strip_prefix('-') {
                Some(ID_FIELD) => exclude_id = true,
                Some(field) => excluded.push(field.to_string()),
                None => included.push(token.trim_start_matches('+').to_string()),
            }
        }

        if !included.is_empty() && !excluded.is_empty() {
            return Err(QueryError::InvalidProjection(source.into()));
        }
        if included.is_empty() && excluded.is_empty() && !exclude_id {
            return Ok(None);
        }

        let mut projection = if included.is_empty() {
            Self::exclude(excluded)
        } else {
            Self::include(included)
        };
        projection.exclude_id = exclude_id;
        Ok(Some(projection))
    }

    /// Makes sure an included projection keeps `field`.
    pub fn retaining(mut self, field: &str) -> Self {
        match self.mode {
            ProjectionMode::Include => {
                if field == ID_FIELD {
                    self.exclude_id = false;
                } else if !self.fields.iter().any(|existing| existing == field) {
                    self.fields.push(field.into());
                }
            }
            ProjectionMode::Exclude => {
                if field == ID_FIELD {
                    self.exclude_id = false;
                }
                self.fields.retain(|existing| existing != field);
            }
        }
        self
    }

    pub fn apply(&self, mut document: Document) -> Document {
        match self.mode {
            ProjectionMode::Include => {
                let mut projected = Document::new();
                if !self.exclude_id {
                    if let Some(id) = document.remove(ID_FIELD) {
                        projected.insert(ID_FIELD.into(), id);
                    }
                }
                for field in &self.fields {
                    if let Some(value) = get_path(&document, field) {
                        set_path(&mut projected, field, value.clone());
                    }
                }
                projected
            }
            ProjectionMode::Exclude => {
                for field in &self.fields {
                    remove_path(&mut document, field);
                }
                if self.exclude_id {
                    document.remove(ID_FIELD);
                }
                document
            }
        }
    }

    /// Renders a MongoDB projection document.
    pub fn to_document(&self) -> JsonValue {
        let flag = match self.mode {
            ProjectionMode::Include => 1,
            ProjectionMode::Exclude => 0,
        };
        let mut projection: Map<String, JsonValue> = self
            .fields
            .iter()
            .map(|field| (field.clone(), flag.into()))
            .collect();
        if self.exclude_id {
            projection.insert(ID_FIELD.into(), 0.into());
        }
        JsonValue::Object(projection)
    }
}

impl Display for Projection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let prefix = match self.mode {
            ProjectionMode::Include => "",
            ProjectionMode::Exclude => "-",
        };
        let mut terms = self.fields.iter().map(|field| format!("{prefix}{field}")).collect_vec();
        if self.exclude_id {
            terms.push(format!("-{ID_FIELD}"));
        }
        f.write_str(&terms.join(" "))
    }
}
