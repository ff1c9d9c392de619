//! Post creation, listing and lookup.

use actix_web::{HttpResponse, web};
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::{CreatePostRequest, SearchPostRequest};
use serde::Deserialize;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Query string of the listing routes. `tags` is a comma separated slug list.
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    pub title: Option<String>,
    pub sort: Option<String>,
    pub tags: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl ListPostsQuery {
    fn into_search(self, username: Option<String>) -> SearchPostRequest {
        let defaults = SearchPostRequest::default();
        SearchPostRequest {
            username: username.unwrap_or_default(),
            tags: self
                .tags
                .map(|tags| tags.split(',').map(|t| t.trim().to_string()).collect())
                .unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            sort: self.sort.unwrap_or_default(),
            page: self.page.unwrap_or(defaults.page),
            size: self.size.unwrap_or(defaults.size),
        }
    }
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state.posts.create(identity.user_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(post)))
}

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    search(&state, query.into_inner().into_search(None)).await
}

/// GET /api/posts/{username}
pub async fn list_by_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    search(&state, query.into_inner().into_search(Some(path.into_inner()))).await
}

/// GET /api/post/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_by_slug(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

async fn search(state: &AppState, request: SearchPostRequest) -> AppResult<HttpResponse> {
    let page = state.posts.list(&request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(page.items, page.paging)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_split_on_commas() {
        let query = ListPostsQuery {
            tags: Some("go, web,".to_string()),
            ..Default::default()
        };
        let search = query.into_search(None);
        assert_eq!(search.tags, vec!["go", "web", ""]);
        assert_eq!(search.page, 1);
        assert_eq!(search.size, 10);
    }

    #[test]
    fn test_path_username_wins() {
        let search = ListPostsQuery::default().into_search(Some("alice01".to_string()));
        assert_eq!(search.username, "alice01");
        assert!(search.tags.is_empty());
    }
}
