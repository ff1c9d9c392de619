//! Translation of a [`PostQuery`] into SeaORM select statements.
//!
//! The username and tag filters are `IN (SELECT ...)` sub-queries rather than
//! joins, so a post matching several requested tags is returned once and the
//! count query needs no `DISTINCT`.

use sea_orm::sea_query::{Expr, Query};
use sea_orm::{ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Select};

use inkwell_core::pagination::PageRequest;
use inkwell_core::query::{PostQuery, SortOrder};

use super::entity::{post, post_tag, tag, user};

/// Filtered, unordered, unpaged select. Used for both the count and the page fetch.
pub(crate) fn filtered(query: &PostQuery) -> Select<post::Entity> {
    let mut select = post::Entity::find().filter(post::Column::DeletedAt.is_null());

    if let Some(username) = &query.username {
        select = select.filter(
            post::Column::UserId.in_subquery(
                Query::select()
                    .column(user::Column::Id)
                    .from(user::Entity)
                    .and_where(user::Column::Username.eq(username.as_str()))
                    .to_owned(),
            ),
        );
    }

    if let Some(slugs) = &query.tag_slugs {
        select = select.filter(
            post::Column::Id.in_subquery(
                Query::select()
                    .column((post_tag::Entity, post_tag::Column::PostId))
                    .from(post_tag::Entity)
                    .inner_join(
                        tag::Entity,
                        Expr::col((tag::Entity, tag::Column::Id))
                            .equals((post_tag::Entity, post_tag::Column::TagId)),
                    )
                    .and_where(tag::Column::Slug.is_in(slugs.iter().map(String::as_str)))
                    .to_owned(),
            ),
        );
    }

    if let Some(title) = &query.title {
        select = select.filter(post::Column::Title.contains(title.as_str()));
    }

    select
}

pub(crate) fn ordered(select: Select<post::Entity>, order: SortOrder) -> Select<post::Entity> {
    let direction = if order.is_descending() {
        Order::Desc
    } else {
        Order::Asc
    };
    select
        .order_by(post::Column::CreatedAt, direction.clone())
        .order_by(post::Column::Id, direction)
}

pub(crate) fn paged(select: Select<post::Entity>, page: PageRequest) -> Select<post::Entity> {
    select.offset(page.offset()).limit(page.limit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_shared::dto::SearchPostRequest;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(request: SearchPostRequest) -> String {
        let query = PostQuery::from_request(&request).unwrap();
        paged(ordered(filtered(&query), query.order), query.page)
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_unfiltered_query_only_excludes_deleted() {
        let sql = sql(SearchPostRequest::default());
        assert!(sql.contains(r#""deleted_at" IS NULL"#), "{sql}");
        assert!(!sql.contains("LIKE"), "{sql}");
        assert!(!sql.contains("IN (SELECT"), "{sql}");
        assert!(sql.contains("LIMIT 10"), "{sql}");
        assert!(sql.contains("OFFSET 0"), "{sql}");
        assert!(sql.contains(r#""created_at" DESC"#), "{sql}");
    }

    #[test]
    fn test_all_filters_are_combined() {
        let sql = sql(SearchPostRequest {
            username: "alice".to_string(),
            tags: vec!["go".to_string(), "web".to_string()],
            title: "Guide".to_string(),
            sort: "oldest".to_string(),
            page: 3,
            size: 10,
        });

        assert!(sql.contains(r#""username" = 'alice'"#), "{sql}");
        assert!(sql.contains(r#""slug" IN ('go', 'web')"#), "{sql}");
        assert!(sql.contains("LIKE '%Guide%'"), "{sql}");
        assert!(sql.contains(r#""created_at" ASC"#), "{sql}");
        assert!(sql.contains("LIMIT 10"), "{sql}");
        assert!(sql.contains("OFFSET 20"), "{sql}");
        assert_eq!(sql.matches("IN (SELECT").count(), 2, "{sql}");
    }

    #[test]
    fn test_unknown_sort_falls_back_to_latest() {
        let sql = sql(SearchPostRequest {
            sort: "popular".to_string(),
            ..Default::default()
        });
        assert!(sql.contains(r#""created_at" DESC"#), "{sql}");
    }
}
