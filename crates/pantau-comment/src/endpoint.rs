//! Route table for the four comment backends.
//!
//! `berita` goes through the shared comment API under `/api/comments`;
//! `document` nests everything under `/api/documents/{id}/comments` and
//! replies by posting a `parentId`; `pelaksanaan` and `usulan` use
//! `/api/{resource}/{id}/komentar` for the thread and
//! `/api/{resource}/komentar/{commentId}/...` for per-comment actions.
//!
//! `pelaksanaan` and `usulan` lists are paginated; only the first page of
//! [`PAGE_SIZE`] comments is requested.

use crate::Result;
use crate::payload::{CommentBody, ReactionBody, ReactionKind};
use crate::resource::{ResourceRef, ResourceType};
use crate::transport::ApiRequest;

/// Number of comments requested from paginated list endpoints.
pub const PAGE_SIZE: u32 = 50;

/// Lists the comments of a resource.
pub fn list(resource: ResourceRef) -> ApiRequest {
    let id = resource.resource_id;
    match resource.resource_type {
        ResourceType::Berita => ApiRequest::get(format!("/api/comments/berita/{id}")),
        ResourceType::Document => ApiRequest::get(format!("/api/documents/{id}/comments")),
        ResourceType::Pelaksanaan => ApiRequest::get(format!("/api/pelaksanaan/{id}/komentar"))
            .with_query("page", 0)
            .with_query("size", PAGE_SIZE),
        ResourceType::Usulan => ApiRequest::get(format!("/api/usulan/{id}/komentar"))
            .with_query("page", 0)
            .with_query("size", PAGE_SIZE),
    }
}

/// Counts the comments of a resource, where the backend supports it.
pub fn count(resource: ResourceRef) -> Option<ApiRequest> {
    let id = resource.resource_id;
    match resource.resource_type {
        ResourceType::Berita => Some(ApiRequest::get(format!(
            "/api/comments/berita/{id}/count"
        ))),
        ResourceType::Document | ResourceType::Pelaksanaan | ResourceType::Usulan => None,
    }
}

/// Creates a root comment.
pub fn create(resource: ResourceRef, body: &CommentBody) -> Result<ApiRequest> {
    let id = resource.resource_id;
    let path = match resource.resource_type {
        ResourceType::Berita => "/api/comments".to_owned(),
        ResourceType::Document => format!("/api/documents/{id}/comments"),
        ResourceType::Pelaksanaan => format!("/api/pelaksanaan/{id}/komentar"),
        ResourceType::Usulan => format!("/api/usulan/{id}/komentar"),
    };

    Ok(ApiRequest::post(path, body.to_json(resource)?))
}

/// Replies to `parent_id`.
pub fn reply(resource: ResourceRef, parent_id: i64, body: &CommentBody) -> Result<ApiRequest> {
    let id = resource.resource_id;
    let path = match resource.resource_type {
        ResourceType::Berita => format!("/api/comments/{parent_id}/reply"),
        ResourceType::Document => format!("/api/documents/{id}/comments"),
        ResourceType::Pelaksanaan => format!("/api/pelaksanaan/komentar/{parent_id}/reply"),
        ResourceType::Usulan => format!("/api/usulan/komentar/{parent_id}/reply"),
    };

    let mut json = body.to_json(resource)?;
    if let Some(fields) = json.as_object_mut() {
        fields.insert("parentId".to_owned(), parent_id.into());
    }

    Ok(ApiRequest::post(path, json))
}

/// Likes or dislikes `comment_id`.
pub fn react(
    resource: ResourceRef,
    comment_id: i64,
    kind: ReactionKind,
    body: &ReactionBody,
) -> Result<ApiRequest> {
    let id = resource.resource_id;
    let path = match resource.resource_type {
        ResourceType::Berita => format!("/api/comments/{comment_id}/{kind}"),
        ResourceType::Document => format!("/api/documents/{id}/comments/{comment_id}/{kind}"),
        ResourceType::Pelaksanaan => format!("/api/pelaksanaan/komentar/{comment_id}/{kind}"),
        ResourceType::Usulan => format!("/api/usulan/komentar/{comment_id}/{kind}"),
    };

    Ok(ApiRequest::post(path, serde_json::to_value(body)?))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transport::Method;

    fn body(parent_id: Option<i64>) -> CommentBody {
        CommentBody {
            nama: "Budi".to_owned(),
            konten: "Mantap".to_owned(),
            foto: None,
            biografi_id: Some(7),
            parent_id,
        }
    }

    #[test]
    fn test_list_paths() {
        assert_eq!(
            list(ResourceRef::berita(1)).path_and_query(),
            "/api/comments/berita/1"
        );
        assert_eq!(
            list(ResourceRef::document(10)).path_and_query(),
            "/api/documents/10/comments"
        );
        assert_eq!(
            list(ResourceRef::pelaksanaan(3)).path_and_query(),
            "/api/pelaksanaan/3/komentar?page=0&size=50"
        );
        assert_eq!(
            list(ResourceRef::usulan(42)).path_and_query(),
            "/api/usulan/42/komentar?page=0&size=50"
        );
        assert_eq!(list(ResourceRef::usulan(42)).method, Method::Get);
    }

    #[test]
    fn test_count_only_for_berita() {
        let request = count(ResourceRef::berita(8)).unwrap();
        assert_eq!(request.path, "/api/comments/berita/8/count");
        assert!(count(ResourceRef::document(8)).is_none());
        assert!(count(ResourceRef::pelaksanaan(8)).is_none());
        assert!(count(ResourceRef::usulan(8)).is_none());
    }

    #[test]
    fn test_create_paths() {
        let request = create(ResourceRef::document(10), &body(None)).unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/api/documents/10/comments");
        assert_eq!(request.body.as_ref().unwrap()["documentId"], 10);

        let request = create(ResourceRef::berita(2), &body(None)).unwrap();
        assert_eq!(request.path, "/api/comments");
        assert_eq!(request.body.as_ref().unwrap()["beritaId"], 2);

        let request = create(ResourceRef::usulan(42), &body(None)).unwrap();
        assert_eq!(request.path, "/api/usulan/42/komentar");
    }

    #[test]
    fn test_reply_paths() {
        let request = reply(ResourceRef::document(10), 5, &body(None)).unwrap();
        assert_eq!(request.path, "/api/documents/10/comments");
        assert_eq!(request.body.as_ref().unwrap()["parentId"], 5);

        let request = reply(ResourceRef::pelaksanaan(3), 5, &body(Some(5))).unwrap();
        assert_eq!(request.path, "/api/pelaksanaan/komentar/5/reply");

        let request = reply(ResourceRef::berita(2), 9, &body(Some(9))).unwrap();
        assert_eq!(request.path, "/api/comments/9/reply");
    }

    #[test]
    fn test_react_paths() {
        let reaction = ReactionBody {
            biografi_id: 7,
            user_name: "Budi".to_owned(),
        };

        let request = react(ResourceRef::pelaksanaan(3), 5, ReactionKind::Like, &reaction).unwrap();
        assert_eq!(request.path, "/api/pelaksanaan/komentar/5/like");
        assert_eq!(
            request.body,
            Some(json!({ "biografiId": 7, "userName": "Budi" }))
        );

        let request =
            react(ResourceRef::document(10), 5, ReactionKind::Dislike, &reaction).unwrap();
        assert_eq!(request.path, "/api/documents/10/comments/5/dislike");

        let request = react(ResourceRef::berita(1), 5, ReactionKind::Dislike, &reaction).unwrap();
        assert_eq!(request.path, "/api/comments/5/dislike");
    }
}
