//! List-query construction shared by every paginated endpoint.
//!
//! Raw query-string parameters are untrusted. They are resolved against a
//! static [`Collection`] description: only allow-listed columns can be
//! filtered, sorted or projected, and filters are plain typed equalities, so
//! a client can narrow a listing but never widen it past the caller's base
//! filter or inject operators.

use std::collections::BTreeMap;
use std::num::IntErrorKind;

use anyhow::{anyhow, Result};
use serde::Serialize;
use sqlx::{Postgres, Row};
use uuid::Uuid;

use crate::infra::db::Db;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

const SEARCH_TERM: &str = "searchTerm";
const SORT: &str = "sort";
const FIELDS: &str = "fields";
const PAGE: &str = "page";
const LIMIT: &str = "limit";

/// Keys consumed by dedicated stages and never treated as filters.
const RESERVED_PARAMS: [&str; 5] = [SEARCH_TERM, SORT, FIELDS, PAGE, LIMIT];

/// Raw query-string parameters, ordered so generated SQL is deterministic.
pub type ListParams = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    TextArray,
    Integer,
    Boolean,
    Uuid,
    Timestamp,
    Json,
}

/// One field of a listable collection.
///
/// `name` is the wire name used in parameters and result documents, `expr`
/// the SQL expression it reads from. Both are static, so neither is ever
/// built from client input.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub expr: &'static str,
    pub kind: ColumnKind,
    pub filterable: bool,
    pub sortable: bool,
    /// Always projected, even when the client asks for a narrower field list.
    pub required: bool,
}

impl Column {
    pub const fn new(name: &'static str, expr: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            expr,
            kind,
            filterable: false,
            sortable: false,
            required: false,
        }
    }
}

#[derive(Debug)]
pub struct Collection {
    pub name: &'static str,
    /// FROM clause, including any joins.
    pub source: &'static str,
    pub columns: &'static [Column],
    /// Sort specification used when the client supplies none, e.g. `-createdAt`.
    pub default_sort: &'static str,
    /// Unique column appended to every ORDER BY so pages do not overlap.
    pub tiebreak: &'static str,
}

impl Collection {
    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// A typed equality operand.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
    Uuid(Uuid),
}

impl FilterValue {
    /// Coerce a raw parameter to the column's type. `None` means the value can
    /// never equal anything stored in that column.
    pub fn coerce(kind: ColumnKind, raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        match kind {
            ColumnKind::Text | ColumnKind::TextArray => Some(Self::Text(raw.to_string())),
            ColumnKind::Integer => trimmed.parse::<i64>().ok().map(Self::Integer).or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite() && value.fract() == 0.0)
                    .filter(|value| value.abs() < i64::MAX as f64)
                    .map(|value| Self::Integer(value as i64))
            }),
            ColumnKind::Boolean => match trimmed {
                "true" => Some(Self::Boolean(true)),
                "false" => Some(Self::Boolean(false)),
                _ => None,
            },
            ColumnKind::Uuid => Uuid::parse_str(trimmed).ok().map(Self::Uuid),
            ColumnKind::Timestamp | ColumnKind::Json => None,
        }
    }

    fn push_bind(&self, sql: &mut sqlx::QueryBuilder<'_, Postgres>) {
        match self {
            Self::Text(value) => {
                sql.push_bind(value.clone());
            }
            Self::Integer(value) => {
                sql.push_bind(*value);
            }
            Self::Boolean(value) => {
                sql.push_bind(*value);
            }
            Self::Uuid(value) => {
                sql.push_bind(*value);
            }
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Equals(FilterValue),
    /// The client asked for a value the column cannot hold.
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Malformed values fall back to defaults instead of failing the listing.
    pub fn from_params(params: &ListParams) -> Self {
        let page = parse_number(params.get(PAGE)).unwrap_or(DEFAULT_PAGE).max(1);
        let limit = parse_number(params.get(LIMIT))
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Integers too large for `i64` saturate so they still hit the clamp.
fn parse_number(raw: Option<&String>) -> Option<i64> {
    let value = raw?.trim();
    match value.parse::<i64>() {
        Ok(number) => Some(number),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageMeta {
    pub fn new(pagination: Pagination, total: i64) -> Self {
        let total = total.max(0);
        Self {
            page: pagination.page,
            limit: pagination.limit,
            total,
            total_pages: (total + pagination.limit - 1) / pagination.limit,
        }
    }
}

/// Builder turning client parameters into a bounded query over a [`Collection`].
///
/// Stages only record intent, so they can be chained in any order; everything
/// is resolved when [`QueryBuilder::build`] or [`QueryBuilder::get_meta`] runs.
#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    collection: &'static Collection,
    params: &'a ListParams,
    base: Vec<(&'static str, FilterValue)>,
    apply_filter: bool,
    search_fields: Vec<&'static str>,
    apply_sort: bool,
    apply_fields: bool,
    apply_pagination: bool,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(collection: &'static Collection, params: &'a ListParams) -> Self {
        Self {
            collection,
            params,
            base: Vec::new(),
            apply_filter: false,
            search_fields: Vec::new(),
            apply_sort: false,
            apply_fields: false,
            apply_pagination: false,
        }
    }

    /// Fix a predicate the client cannot override.
    pub fn base(mut self, column: &'static str, value: impl Into<FilterValue>) -> Self {
        self.base.push((column, value.into()));
        self
    }

    pub fn filter(mut self) -> Self {
        self.apply_filter = true;
        self
    }

    pub fn search(mut self, fields: &[&'static str]) -> Self {
        self.search_fields = fields.to_vec();
        self
    }

    pub fn sort(mut self) -> Self {
        self.apply_sort = true;
        self
    }

    pub fn fields(mut self) -> Self {
        self.apply_fields = true;
        self
    }

    pub fn paginate(mut self) -> Self {
        self.apply_pagination = true;
        self
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::from_params(self.params)
    }

    pub async fn build(&self, db: &Db) -> Result<Vec<serde_json::Value>> {
        let mut sql = self.select_query()?;
        let rows = sql.build().fetch_all(db.pool()).await?;

        let documents = rows
            .iter()
            .map(|row| row.try_get::<serde_json::Value, _>("doc"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(documents)
    }

    pub async fn get_meta(&self, db: &Db) -> Result<PageMeta> {
        let mut sql = self.count_query()?;
        let row = sql.build().fetch_one(db.pool()).await?;
        let total: i64 = row.try_get(0)?;

        Ok(PageMeta::new(self.pagination(), total))
    }

    fn constraints(&self) -> Result<Vec<(&'static Column, Constraint)>> {
        let mut constraints = Vec::with_capacity(self.base.len());

        for (name, value) in &self.base {
            let column = self.collection.column(name).ok_or_else(|| {
                anyhow!("unknown base filter column {} on {}", name, self.collection.name)
            })?;
            constraints.push((column, Constraint::Equals(value.clone())));
        }

        if !self.apply_filter {
            return Ok(constraints);
        }

        for (key, raw) in self.params {
            if RESERVED_PARAMS.contains(&key.as_str()) {
                continue;
            }
            if self.base.iter().any(|(name, _)| name == key) {
                continue;
            }
            let Some(column) = self.collection.column(key).filter(|column| column.filterable)
            else {
                tracing::debug!(param = %key, collection = self.collection.name, "ignoring filter parameter");
                continue;
            };

            let constraint = match FilterValue::coerce(column.kind, raw) {
                Some(value) => Constraint::Equals(value),
                None => Constraint::Never,
            };
            constraints.push((column, constraint));
        }

        Ok(constraints)
    }

    fn search_clause(&self) -> Result<Option<(Vec<&'static Column>, String)>> {
        if self.search_fields.is_empty() {
            return Ok(None);
        }
        let Some(term) = self
            .params
            .get(SEARCH_TERM)
            .map(|term| term.trim())
            .filter(|term| !term.is_empty())
        else {
            return Ok(None);
        };

        let columns = self
            .search_fields
            .iter()
            .map(|name| {
                self.collection.column(name).ok_or_else(|| {
                    anyhow!("unknown search column {} on {}", name, self.collection.name)
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some((columns, format!("%{}%", escape_like_pattern(term)))))
    }

    fn order(&self) -> Vec<(&'static Column, SortDirection)> {
        let requested = self
            .params
            .get(SORT)
            .filter(|_| self.apply_sort)
            .map(|raw| parse_sort(self.collection, raw))
            .unwrap_or_default();

        let mut order = if requested.is_empty() {
            parse_sort(self.collection, self.collection.default_sort)
        } else {
            requested
        };

        if let Some(tiebreak) = self.collection.column(self.collection.tiebreak) {
            if !order.iter().any(|(column, _)| column.name == tiebreak.name) {
                let direction = order.first().map_or(SortDirection::Desc, |(_, dir)| *dir);
                order.push((tiebreak, direction));
            }
        }

        order
    }

    fn projection(&self) -> Vec<&'static Column> {
        let requested: Vec<&'static Column> = self
            .params
            .get(FIELDS)
            .filter(|_| self.apply_fields)
            .map(|raw| {
                raw.split(',')
                    .filter_map(|name| self.collection.column(name.trim()))
                    .collect()
            })
            .unwrap_or_default();

        if requested.is_empty() {
            return self.collection.columns.iter().collect();
        }

        let mut projection: Vec<&'static Column> = self
            .collection
            .columns
            .iter()
            .filter(|column| column.required)
            .collect();
        for column in requested {
            if !projection.iter().any(|picked| picked.name == column.name) {
                projection.push(column);
            }
        }
        projection
    }

    fn push_where(&self, sql: &mut sqlx::QueryBuilder<'_, Postgres>) -> Result<()> {
        sql.push(" WHERE TRUE");

        for (column, constraint) in self.constraints()? {
            sql.push(" AND ");
            match constraint {
                Constraint::Equals(value) if column.kind == ColumnKind::TextArray => {
                    value.push_bind(sql);
                    sql.push(" = ANY(");
                    sql.push(column.expr);
                    sql.push(")");
                }
                Constraint::Equals(value) => {
                    sql.push(column.expr);
                    sql.push(" = ");
                    value.push_bind(sql);
                }
                Constraint::Never => {
                    sql.push("FALSE");
                }
            }
        }

        if let Some((columns, pattern)) = self.search_clause()? {
            sql.push(" AND (");
            for (index, column) in columns.iter().enumerate() {
                if index > 0 {
                    sql.push(" OR ");
                }
                sql.push(column.expr);
                if column.kind != ColumnKind::Text {
                    sql.push("::text");
                }
                sql.push(" ILIKE ");
                sql.push_bind(pattern.clone());
                sql.push(" ESCAPE '\\'");
            }
            sql.push(")");
        }

        Ok(())
    }

    fn select_query(&self) -> Result<sqlx::QueryBuilder<'static, Postgres>> {
        let mut sql = sqlx::QueryBuilder::new("SELECT jsonb_build_object(");
        for (index, column) in self.projection().iter().enumerate() {
            if index > 0 {
                sql.push(", ");
            }
            sql.push("'");
            sql.push(column.name);
            sql.push("', ");
            sql.push(column.expr);
        }
        sql.push(") AS doc FROM ");
        sql.push(self.collection.source);

        self.push_where(&mut sql)?;

        sql.push(" ORDER BY ");
        for (index, (column, direction)) in self.order().iter().enumerate() {
            if index > 0 {
                sql.push(", ");
            }
            sql.push(column.expr);
            sql.push(" ");
            sql.push(direction.as_sql());
        }

        if self.apply_pagination {
            let pagination = self.pagination();
            sql.push(" LIMIT ");
            sql.push_bind(pagination.limit);
            sql.push(" OFFSET ");
            sql.push_bind(pagination.offset());
        } else {
            sql.push(" LIMIT ");
            sql.push_bind(MAX_LIMIT);
        }

        Ok(sql)
    }

    fn count_query(&self) -> Result<sqlx::QueryBuilder<'static, Postgres>> {
        let mut sql = sqlx::QueryBuilder::new("SELECT COUNT(*) FROM ");
        sql.push(self.collection.source);
        self.push_where(&mut sql)?;
        Ok(sql)
    }
}

/// Parse `a,-b` into sort keys, dropping anything that is not sortable.
fn parse_sort(collection: &'static Collection, raw: &str) -> Vec<(&'static Column, SortDirection)> {
    let mut order: Vec<(&'static Column, SortDirection)> = Vec::new();
    for key in raw.split(',').map(str::trim).filter(|key| !key.is_empty()) {
        let (name, direction) = match key.strip_prefix('-') {
            Some(name) => (name, SortDirection::Desc),
            None => (key, SortDirection::Asc),
        };
        let Some(column) = collection.column(name).filter(|column| column.sortable) else {
            continue;
        };
        if !order.iter().any(|(picked, _)| picked.name == column.name) {
            order.push((column, direction));
        }
    }
    order
}

fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '%' | '_' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    static ARTICLES: Collection = Collection {
        name: "articles",
        source: "articles a",
        columns: &[
            Column {
                required: true,
                ..Column::new("id", "a.id", ColumnKind::Uuid)
            },
            Column {
                filterable: true,
                sortable: true,
                ..Column::new("title", "a.title", ColumnKind::Text)
            },
            Column::new("body", "a.body", ColumnKind::Text),
            Column {
                filterable: true,
                sortable: true,
                ..Column::new("likesCount", "a.likes_count", ColumnKind::Integer)
            },
            Column {
                filterable: true,
                ..Column::new("isDeleted", "a.is_deleted", ColumnKind::Boolean)
            },
            Column {
                filterable: true,
                ..Column::new("tags", "a.tags", ColumnKind::TextArray)
            },
            Column {
                sortable: true,
                ..Column::new("createdAt", "a.created_at", ColumnKind::Timestamp)
            },
        ],
        default_sort: "-createdAt",
        tiebreak: "id",
    };

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn names(columns: &[&'static Column]) -> Vec<&'static str> {
        columns.iter().map(|column| column.name).collect()
    }

    #[test]
    fn reserved_and_unknown_params_are_not_filters() {
        let params = params(&[
            ("searchTerm", "x"),
            ("sort", "title"),
            ("fields", "title"),
            ("page", "2"),
            ("limit", "5"),
            ("password", "hunter2"),
            ("body", "not filterable"),
            ("title", "Hello"),
        ]);
        let constraints = QueryBuilder::new(&ARTICLES, &params).filter().constraints().unwrap();

        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].0.name, "title");
        assert_eq!(constraints[0].1, Constraint::Equals(FilterValue::Text("Hello".into())));
    }

    #[test]
    fn base_filter_wins_over_client_value() {
        let params = params(&[("isDeleted", "true")]);
        let constraints = QueryBuilder::new(&ARTICLES, &params)
            .filter()
            .base("isDeleted", false)
            .constraints()
            .unwrap();

        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].1, Constraint::Equals(FilterValue::Boolean(false)));
    }

    #[test]
    fn client_params_ignored_without_filter_stage() {
        let params = params(&[("title", "Hello")]);
        let constraints = QueryBuilder::new(&ARTICLES, &params).constraints().unwrap();
        assert!(constraints.is_empty());
    }

    #[test]
    fn unknown_base_column_is_an_error() {
        let params = ListParams::new();
        let result = QueryBuilder::new(&ARTICLES, &params).base("owner", "x").constraints();
        assert!(result.is_err());
    }

    #[test]
    fn numeric_values_are_coerced_and_garbage_never_matches() {
        assert_eq!(
            FilterValue::coerce(ColumnKind::Integer, "42"),
            Some(FilterValue::Integer(42))
        );
        assert_eq!(
            FilterValue::coerce(ColumnKind::Integer, "3.0"),
            Some(FilterValue::Integer(3))
        );
        assert_eq!(FilterValue::coerce(ColumnKind::Integer, "3.5"), None);
        assert_eq!(FilterValue::coerce(ColumnKind::Boolean, "yes"), None);
        assert_eq!(FilterValue::coerce(ColumnKind::Json, "{}"), None);
        assert_eq!(
            FilterValue::coerce(ColumnKind::Timestamp, "2024-01-01T00:00:00Z"),
            None
        );

        let params = params(&[("likesCount", "many")]);
        let constraints = QueryBuilder::new(&ARTICLES, &params).filter().constraints().unwrap();
        assert_eq!(constraints[0].1, Constraint::Never);
    }

    #[test]
    fn search_requires_a_term() {
        let empty = params(&[("searchTerm", "   ")]);
        let builder = QueryBuilder::new(&ARTICLES, &empty).search(&["title", "body"]);
        assert!(builder.search_clause().unwrap().is_none());

        let term = params(&[("searchTerm", "50%_off")]);
        let builder = QueryBuilder::new(&ARTICLES, &term).search(&["title", "body"]);
        let (columns, pattern) = builder.search_clause().unwrap().unwrap();
        assert_eq!(names(&columns), vec!["title", "body"]);
        assert_eq!(pattern, "%50\\%\\_off%");
        assert_eq!(escape_like_pattern("a\\b"), "a\\\\b");
    }

    #[test]
    fn sort_parses_directions_and_appends_tiebreak() {
        let params = params(&[("sort", "-likesCount, title,body,nope")]);
        let order = QueryBuilder::new(&ARTICLES, &params).sort().order();
        let rendered: Vec<_> = order.iter().map(|(c, d)| (c.name, *d)).collect();

        assert_eq!(
            rendered,
            vec![
                ("likesCount", SortDirection::Desc),
                ("title", SortDirection::Asc),
                ("id", SortDirection::Desc),
            ]
        );
    }

    #[test]
    fn sort_defaults_to_newest_first() {
        let params = params(&[("sort", "body")]);
        let order = QueryBuilder::new(&ARTICLES, &params).sort().order();
        let rendered: Vec<_> = order.iter().map(|(c, d)| (c.name, *d)).collect();

        assert_eq!(
            rendered,
            vec![("createdAt", SortDirection::Desc), ("id", SortDirection::Desc)]
        );
    }

    #[test]
    fn projection_keeps_required_columns() {
        let params = params(&[("fields", "title,secret, likesCount")]);
        let projection = QueryBuilder::new(&ARTICLES, &params).fields().projection();
        assert_eq!(names(&projection), vec!["id", "title", "likesCount"]);

        let all = QueryBuilder::new(&ARTICLES, &params).projection();
        assert_eq!(all.len(), ARTICLES.columns.len());
    }

    #[test]
    fn pagination_defaults_and_bounds() {
        assert_eq!(
            Pagination::from_params(&ListParams::new()),
            Pagination { page: 1, limit: 10 }
        );
        assert_eq!(
            Pagination::from_params(&params(&[("page", "abc"), ("limit", "ten")])),
            Pagination { page: 1, limit: 10 }
        );
        assert_eq!(
            Pagination::from_params(&params(&[("page", "0"), ("limit", "0")])),
            Pagination { page: 1, limit: 1 }
        );
        assert_eq!(
            Pagination::from_params(&params(&[("page", "3"), ("limit", "5000")])),
            Pagination { page: 3, limit: MAX_LIMIT }
        );

        assert_eq!(
            Pagination::from_params(&params(&[
                ("page", "-99999999999999999999"),
                ("limit", "100000000000000000000"),
            ])),
            Pagination { page: 1, limit: MAX_LIMIT }
        );

        let pagination = Pagination { page: 4, limit: 25 };
        assert_eq!(pagination.offset(), 75);
    }

    #[test]
    fn page_meta_rounds_total_pages_up() {
        let pagination = Pagination { page: 1, limit: 10 };
        assert_eq!(PageMeta::new(pagination, 0).total_pages, 0);
        assert_eq!(PageMeta::new(pagination, 10).total_pages, 1);
        assert_eq!(PageMeta::new(pagination, 11).total_pages, 2);

        let json = serde_json::to_value(PageMeta::new(pagination, 11)).unwrap();
        assert_eq!(json["totalPages"], 2);
    }

    #[test]
    fn select_sql_binds_every_client_value() {
        let params = params(&[
            ("title", "x' OR 1=1 --"),
            ("tags", "rust"),
            ("likesCount", "nan-ish"),
            ("searchTerm", "ann"),
            ("page", "2"),
        ]);
        let sql = QueryBuilder::new(&ARTICLES, &params)
            .base("isDeleted", false)
            .filter()
            .search(&["title"])
            .paginate()
            .select_query()
            .unwrap();
        let sql = sql.sql();

        assert!(!sql.contains("OR 1=1"));
        assert!(sql.contains("= ANY(a.tags)"));
        assert!(sql.contains("AND FALSE"));
        assert!(sql.contains("a.title ILIKE $"));
        assert!(sql.contains("ORDER BY a.created_at DESC, a.id DESC"));
        assert!(sql.contains("LIMIT $"));
        assert!(sql.contains("OFFSET $"));
    }

    #[test]
    fn unpaginated_select_is_still_bounded() {
        let params = ListParams::new();
        let sql = QueryBuilder::new(&ARTICLES, &params).select_query().unwrap();
        assert!(sql.sql().ends_with("LIMIT $1"));
    }

    #[test]
    fn count_sql_ignores_pagination_and_order() {
        let params = params(&[("page", "9"), ("sort", "title")]);
        let sql = QueryBuilder::new(&ARTICLES, &params)
            .sort()
            .paginate()
            .count_query()
            .unwrap();
        let sql = sql.sql();

        assert!(sql.starts_with("SELECT COUNT(*) FROM articles a WHERE TRUE"));
        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("ORDER BY"));
    }
}
