use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{given, page_filter};
use crate::catalog::pages::{Catalogs, PageKind};
use crate::community::{ImageUpload, PostBoard, PostError};
use crate::media;
use crate::models::post::PostForm;

// ── Community posts ────────────────────────────────────

#[get("/posts")]
pub fn posts_list(board: &State<PostBoard>) -> Json<Value> {
    let posts = board.list();
    Json(json!({
        "success": true,
        "count": posts.len(),
        "posts": posts,
    }))
}

#[derive(Debug, Deserialize)]
pub struct NewPost {
    #[serde(alias = "username", default)]
    pub author: String,
    #[serde(default)]
    pub message: String,
    /// `data:` URL or bare base64.
    #[serde(alias = "photo", default)]
    pub image: Option<String>,
}

#[post("/posts", format = "json", data = "<body>")]
pub async fn posts_create(board: &State<PostBoard>, body: Json<NewPost>) -> (Status, Json<Value>) {
    let body = body.into_inner();
    let form = PostForm {
        author: body.author,
        message: body.message,
    };

    let mut decode_error = None;
    let image = match body.image.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match media::decode_base64_payload(raw) {
            Ok(bytes) => Some(ImageUpload {
                bytes,
                content_type: declared_mime(raw),
            }),
            Err(e) => {
                decode_error = Some(e);
                None
            }
        },
        None => None,
    };

    match board.submit(&form, image).await {
        Ok(submission) => {
            let image_error = submission.image_error.or(decode_error);
            (
                Status::Created,
                Json(json!({
                    "success": true,
                    "post": submission.post,
                    "image_error": image_error,
                })),
            )
        }
        Err(PostError::Validation(msg)) => (
            Status::UnprocessableEntity,
            Json(json!({"success": false, "error": msg})),
        ),
        Err(e @ PostError::Storage(_)) => {
            log::error!("API post not saved: {}", e);
            (
                Status::InternalServerError,
                Json(json!({"success": false, "error": e.to_string()})),
            )
        }
    }
}

fn declared_mime(raw: &str) -> Option<String> {
    raw.strip_prefix("data:")
        .and_then(|rest| rest.split_once(';'))
        .map(|(mime, _)| mime.to_string())
        .filter(|m| !m.is_empty())
}

// ── Catalog views ──────────────────────────────────────

#[get("/catalog/<page>?<q>&<category>&<shown>")]
pub fn catalog_view(
    catalogs: &State<Catalogs>,
    page: &str,
    q: Option<&str>,
    category: Option<&str>,
    shown: Option<usize>,
) -> Option<Json<Value>> {
    let kind = PageKind::from_slug(page)?;
    let (mut filter, live) = page_filter(catalogs, kind);
    let mut rng = rand::thread_rng();
    filter.apply_query(given(q), given(category), shown, &mut rng);
    let view = filter.view();
    Some(Json(json!({
        "success": true,
        "page": kind.slug(),
        "view": view,
        "announcement": live.message(),
    })))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![posts_list, posts_create, catalog_view]
}
