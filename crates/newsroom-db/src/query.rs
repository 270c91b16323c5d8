//! Query builder for news listings.
//!
//! Listing criteria are folded into a [`Filter`] tree, then compiled into a
//! parameterised `WHERE` clause. Pattern matching runs through a `regexp()`
//! SQL function backed by the `regex` crate, registered on every connection.

use std::sync::Arc;

use regex::Regex;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value;
use rusqlite::Connection;
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Columns in the order [`crate::queries`] decodes them.
pub(crate) const NEWS_COLUMNS: &str =
    "id, title, project, kind, timestamp, content, thumbnail, featured, external_post_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Title,
    Project,
    Kind,
    Timestamp,
    Content,
    Thumbnail,
    Featured,
    ExternalPostId,
}

impl Field {
    pub fn column(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Title => "title",
            Field::Project => "project",
            Field::Kind => "kind",
            Field::Timestamp => "timestamp",
            Field::Content => "content",
            Field::Thumbnail => "thumbnail",
            Field::Featured => "featured",
            Field::ExternalPostId => "external_post_id",
        }
    }
}

/// Fields searched by a free-text query.
pub const TEXT_SEARCH_FIELDS: [Field; 4] = [Field::Id, Field::Title, Field::Kind, Field::Content];

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document.
    All,
    Eq(Field, Value),
    /// Regular-expression match; the pattern carries its own flags.
    Matches(Field, String),
    /// Field exists and is not null.
    Present(Field),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    /// Logical AND that collapses `All` operands.
    pub fn and(self, other: Filter) -> Filter {
        match (self, other) {
            (Filter::All, f) | (f, Filter::All) => f,
            (Filter::And(mut left), Filter::And(right)) => {
                left.extend(right);
                Filter::And(left)
            }
            (Filter::And(mut left), f) => {
                left.push(f);
                Filter::And(left)
            }
            (f, g) => Filter::And(vec![f, g]),
        }
    }

    /// Renders this filter as SQL, appending bound values to `params`.
    /// Placeholders are numbered so the clause can be embedded anywhere.
    pub fn to_sql(&self, params: &mut Vec<Value>) -> String {
        match self {
            Filter::All => "1".to_string(),
            Filter::Eq(field, value) => {
                params.push(value.clone());
                format!("{} = ?{}", field.column(), params.len())
            }
            Filter::Matches(field, pattern) => {
                params.push(Value::Text(pattern.clone()));
                format!("{} REGEXP ?{}", field.column(), params.len())
            }
            Filter::Present(field) => format!("{} IS NOT NULL", field.column()),
            Filter::And(filters) => join(filters, " AND ", "1", params),
            Filter::Or(filters) => join(filters, " OR ", "0", params),
        }
    }
}

fn join(filters: &[Filter], sep: &str, empty: &str, params: &mut Vec<Value>) -> String {
    if filters.is_empty() {
        return empty.to_string();
    }
    let parts: Vec<String> = filters.iter().map(|f| f.to_sql(params)).collect();
    format!("({})", parts.join(sep))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sort {
    #[default]
    TimestampDesc,
}

impl Sort {
    fn to_sql(self) -> &'static str {
        match self {
            Sort::TimestampDesc => "timestamp DESC",
        }
    }
}

/// Pagination bounds. `None` means unbounded / no offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<u32>,
    pub skip: Option<u32>,
}

impl Page {
    /// Parses raw query-string values. Anything that is not a non-negative
    /// decimal integer is ignored, as is a zero limit.
    pub fn parse(limit: Option<&str>, skip: Option<&str>) -> Self {
        Self {
            limit: limit.and_then(|l| l.parse().ok()).filter(|l| *l > 0),
            skip: skip.and_then(|s| s.parse().ok()),
        }
    }
}

/// Listing criteria, all optional.
#[derive(Debug, Clone, Default)]
pub struct NewsQuery {
    pub text: Option<String>,
    /// Already-validated project scope.
    pub project: Option<Uuid>,
    pub featured_only: bool,
    pub page: Page,
}

/// Everything the repository needs to run a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct FindSpec {
    pub filter: Filter,
    pub sort: Sort,
    pub page: Page,
}

impl NewsQuery {
    pub fn build(&self) -> FindSpec {
        let mut filter = Filter::All;

        if let Some(project) = self.project {
            filter = filter.and(Filter::Eq(Field::Project, Value::Text(project.to_string())));
        }

        if self.featured_only {
            filter = filter.and(Filter::Present(Field::Featured));
        }

        if let Some(text) = self.text.as_deref().filter(|t| !t.is_empty()) {
            let pattern = text_pattern(text);
            let any_field = TEXT_SEARCH_FIELDS
                .iter()
                .map(|field| Filter::Matches(*field, pattern.clone()))
                .collect();
            filter = filter.and(Filter::Or(any_field));
        }

        FindSpec {
            filter,
            sort: Sort::default(),
            page: self.page,
        }
    }
}

impl FindSpec {
    /// Full `SELECT` statement plus its bound values.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut params = Vec::new();
        let clause = self.filter.to_sql(&mut params);

        // SQLite treats a negative LIMIT as unbounded.
        params.push(Value::Integer(self.page.limit.map_or(-1, i64::from)));
        let limit_idx = params.len();
        params.push(Value::Integer(self.page.skip.map_or(0, i64::from)));
        let skip_idx = params.len();

        let sql = format!(
            "SELECT {} FROM news WHERE {} ORDER BY {} LIMIT ?{} OFFSET ?{}",
            NEWS_COLUMNS,
            clause,
            self.sort.to_sql(),
            limit_idx,
            skip_idx
        );
        (sql, params)
    }
}

/// Case-insensitive pattern for a free-text query. Input that does not
/// compile as a regular expression is matched literally.
fn text_pattern(text: &str) -> String {
    let pattern = format!("(?i){}", text);
    if Regex::new(&pattern).is_ok() {
        pattern
    } else {
        format!("(?i){}", regex::escape(text))
    }
}

/// Registers `regexp(pattern, text)` so `text REGEXP pattern` works in SQL.
/// Compiled patterns are cached per statement; NULL text never matches.
pub(crate) fn register_regexp(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let re: Arc<Regex> = ctx.get_or_create_aux(0, |pattern| -> Result<Regex, BoxError> {
                Ok(Regex::new(pattern.as_str()?)?)
            })?;
            let text = ctx
                .get_raw(1)
                .as_str_or_null()
                .map_err(|e| rusqlite::Error::UserFunctionError(e.into()))?;
            Ok(text.is_some_and(|t| re.is_match(t)))
        },
    )
}
