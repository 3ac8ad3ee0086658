//! Pagination and search resolution for list endpoints.
//!
//! Turns caller-supplied `page` / `limit` / `search` into a [`PageRequest`]
//! (skip, take, predicate) and turns a row count back into [`PageMeta`].

use sea_orm::sea_query::{Expr, Func};
use sea_orm::{Condition, EntityTrait, ModelTrait, Value};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
/// Largest row offset a store accepts (Postgres OFFSET is bigint).
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Raw list parameters as received from a caller. Any of them may be absent,
/// zero or negative.
#[derive(Clone, Debug, Default)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn new(page: Option<i64>, limit: Option<i64>, search: Option<String>) -> Self {
        Self { page, limit, search }
    }
}

/// Pagination policy
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// used when `limit` is absent or non-positive
    pub default_limit: u64,
    /// upper bound applied to caller-supplied limits
    pub max_limit: u64,
}

impl Default for Pagination {
    fn default() -> Self { Self { default_limit: DEFAULT_LIMIT, max_limit: MAX_LIMIT } }
}

impl Pagination {
    pub fn new(default_limit: u64, max_limit: u64) -> Self {
        let default_limit = if default_limit == 0 { DEFAULT_LIMIT } else { default_limit };
        Self { default_limit, max_limit: max_limit.max(default_limit) }
    }

    /// Normalize raw parameters: non-positive page becomes 1, non-positive
    /// limit becomes the default, and an empty search term means no filter.
    pub fn resolve(&self, query: &ListQuery) -> PageRequest {
        let page = match query.page {
            Some(p) if p > 0 => p as u64,
            _ => 1,
        };
        let limit = match query.limit {
            Some(l) if l > 0 => (l as u64).min(self.max_limit),
            _ => self.default_limit,
        };
        let search = query.search.clone().filter(|s| !s.is_empty());
        PageRequest { page, limit, search }
    }
}

/// A resolved page window. `page >= 1` and `limit >= 1` always hold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
    pub search: Option<String>,
}

impl PageRequest {
    /// Offset of the first row. Pages too far out to address clamp to
    /// [`MAX_OFFSET`], which is past the end of any table.
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit).min(MAX_OFFSET)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PageMeta {
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        let pages = total.div_ceil(limit.max(1));
        Self { total, page, pages, has_next_page: page < pages, has_prev_page: page > 1 }
    }
}

/// List envelope: `{ data, meta }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: u64, req: &PageRequest) -> Self {
        Self { data, meta: PageMeta::new(total, req.page, req.limit) }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchCase {
    Insensitive,
    Sensitive,
}

/// One text column taking part in a substring search.
#[derive(Clone, Copy, Debug)]
pub struct SearchField<C> {
    pub column: C,
    pub case: MatchCase,
}

impl<C> SearchField<C> {
    pub const fn insensitive(column: C) -> Self { Self { column, case: MatchCase::Insensitive } }
    pub const fn sensitive(column: C) -> Self { Self { column, case: MatchCase::Sensitive } }

    /// In-process equivalent of the SQL predicate built by [`search_condition`].
    pub fn matches_text(&self, haystack: &str, term: &str) -> bool {
        match self.case {
            MatchCase::Sensitive => haystack.contains(term),
            MatchCase::Insensitive => haystack.to_lowercase().contains(&term.to_lowercase()),
        }
    }
}

/// Escape LIKE metacharacters; backslash is Postgres' default LIKE escape.
pub fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// OR of substring matches over `fields`.
pub fn search_condition<E: EntityTrait>(fields: &[SearchField<E::Column>], term: &str) -> Condition {
    fields.iter().fold(Condition::any(), |cond, field| {
        let col = Expr::col((E::default(), field.column));
        let expr = match field.case {
            MatchCase::Sensitive => col.like(like_pattern(term)),
            MatchCase::Insensitive => Expr::expr(Func::lower(col)).like(like_pattern(&term.to_lowercase())),
        };
        cond.add(expr)
    })
}

/// Whether `model` satisfies the same OR predicate as [`search_condition`].
pub fn model_matches<M: ModelTrait>(
    model: &M,
    fields: &[SearchField<<M::Entity as EntityTrait>::Column>],
    term: &str,
) -> bool {
    fields.iter().any(|field| match model.get(field.column) {
        Value::String(Some(s)) => field.matches_text(&s, term),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::farm;
    use sea_orm::{DbBackend, QueryFilter, QueryTrait};

    fn resolve(page: Option<i64>, limit: Option<i64>) -> PageRequest {
        Pagination::default().resolve(&ListQuery::new(page, limit, None))
    }

    #[test]
    fn non_positive_page_and_limit_fall_back_to_defaults() {
        for p in [None, Some(0), Some(-3)] {
            assert_eq!(resolve(p, Some(5)).page, 1);
        }
        for l in [None, Some(0), Some(-1)] {
            assert_eq!(resolve(Some(2), l).limit, 10);
        }
    }

    #[test]
    fn skip_is_offset_of_first_row() {
        assert_eq!(resolve(Some(1), Some(10)).skip(), 0);
        assert_eq!(resolve(Some(3), Some(20)).skip(), 40);
    }

    #[test]
    fn huge_page_clamps_offset_instead_of_overflowing() {
        let req = resolve(Some(i64::MAX), Some(10));
        assert_eq!(req.page, i64::MAX as u64);
        assert_eq!(req.skip(), MAX_OFFSET);

        let meta = PageMeta::new(3, req.page, req.limit);
        assert!(!meta.has_next_page);
        assert!(meta.has_prev_page);
    }

    #[test]
    fn limit_is_capped() {
        assert_eq!(resolve(Some(1), Some(10_000)).limit, MAX_LIMIT);
        assert_eq!(Pagination::new(25, 50).resolve(&ListQuery::default()).limit, 25);
    }

    #[test]
    fn empty_search_is_no_filter() {
        let req = Pagination::default().resolve(&ListQuery::new(None, None, Some(String::new())));
        assert_eq!(req.search, None);
    }

    #[test]
    fn meta_for_second_of_three_pages() {
        let meta = PageMeta::new(25, 2, 10);
        assert_eq!(meta, PageMeta { total: 25, page: 2, pages: 3, has_next_page: true, has_prev_page: true });
    }

    #[test]
    fn meta_edges() {
        let empty = PageMeta::new(0, 1, 10);
        assert_eq!(empty.pages, 0);
        assert!(!empty.has_next_page && !empty.has_prev_page);

        let exact = PageMeta::new(20, 2, 10);
        assert_eq!(exact.pages, 2);
        assert!(!exact.has_next_page);

        let beyond = PageMeta::new(5, 4, 10);
        assert!(!beyond.has_next_page);
        assert!(beyond.has_prev_page);
    }

    #[test]
    fn meta_serializes_camel_case() {
        let v = serde_json::to_value(PageMeta::new(25, 2, 10)).unwrap();
        assert_eq!(v, serde_json::json!({"total": 25, "page": 2, "pages": 3, "hasNextPage": true, "hasPrevPage": true}));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("kia"), "%kia%");
        assert_eq!(like_pattern("50%_a\\b"), "%50\\%\\_a\\\\b%");
    }

    #[test]
    fn text_matching_respects_case_mode() {
        let ins = SearchField::insensitive(farm::Column::Name);
        let sen = SearchField::sensitive(farm::Column::Name);
        assert!(ins.matches_text("Kamau Mixed Farm", "mixed"));
        assert!(!sen.matches_text("Kamau Mixed Farm", "mixed"));
        assert!(sen.matches_text("Kamau Mixed Farm", "Mixed"));
    }

    #[test]
    fn condition_is_disjunction_over_fields() {
        let fields = [
            SearchField::insensitive(farm::Column::Name),
            SearchField::sensitive(farm::Column::County),
        ];
        let sql = farm::Entity::find()
            .filter(search_condition::<farm::Entity>(&fields, "Kia"))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"LOWER("farm"."name") LIKE '%kia%'"#), "{sql}");
        assert!(sql.contains(r#""farm"."county" LIKE '%Kia%'"#), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
    }
}
