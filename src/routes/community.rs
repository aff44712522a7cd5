use rocket::data::Capped;
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::tokio::io::AsyncReadExt;
use rocket::{Request, State};

use crate::community::{ImageUpload, PostBoard, PostError};
use crate::config::SiteConfig;
use crate::models::post::PostForm;
use crate::render;

pub const NOTICE_POSTED: &str = "Thanks for sharing your story!";
pub const NOTICE_NO_PHOTO: &str =
    "Your story was posted, but the photo could not be used. Try a smaller JPEG or PNG.";
pub const TOO_LARGE_MESSAGE: &str =
    "That upload was too large to send. Please choose a smaller photo and try again.";

// ── Community board ────────────────────────────────────

#[get("/community?<notice>")]
pub fn community_page(board: &State<PostBoard>, notice: Option<&str>) -> RawHtml<String> {
    let notice = match notice {
        Some("posted") => Some(NOTICE_POSTED),
        Some("photo") => Some(NOTICE_NO_PHOTO),
        _ => None,
    };
    RawHtml(render::community_page(&board.list(), notice, None, "", ""))
}

#[derive(FromForm)]
pub struct CommunityForm<'f> {
    pub username: Option<String>,
    pub message: Option<String>,
    /// Capped so an over-limit photo arrives truncated instead of
    /// failing the whole form.
    pub photo: Option<Capped<TempFile<'f>>>,
}

#[post("/community", data = "<form>")]
pub async fn community_submit(
    board: &State<PostBoard>,
    config: &State<SiteConfig>,
    form: Form<CommunityForm<'_>>,
) -> Result<Redirect, (Status, RawHtml<String>)> {
    let form = form.into_inner();
    let post_form = PostForm {
        author: form.username.unwrap_or_default(),
        message: form.message.unwrap_or_default(),
    };

    // Reject early so a bad form never waits on the photo
    if let Err(e) = PostBoard::validate(&post_form) {
        return Err(rerender(board, Status::UnprocessableEntity, &e, &post_form));
    }

    let mut read_error = None;
    let image = match form.photo {
        Some(ref file) if !file.is_complete() => {
            log::warn!(
                "Uploaded photo truncated at {} bytes, dropped",
                file.n.written
            );
            read_error = Some(format!(
                "Photo exceeds the {} MB upload limit",
                config.max_upload_mb
            ));
            None
        }
        Some(ref file) if file.value.len() > 0 => match read_upload(&file.value).await {
            Ok(upload) => Some(upload),
            Err(e) => {
                log::warn!("Could not read uploaded photo: {}", e);
                read_error = Some(e.to_string());
                None
            }
        },
        _ => None,
    };

    match board.submit(&post_form, image).await {
        Ok(submission) => {
            if submission.image_error.is_some() || read_error.is_some() {
                Ok(Redirect::to("/community?notice=photo"))
            } else {
                Ok(Redirect::to("/community?notice=posted"))
            }
        }
        Err(e @ PostError::Validation(_)) => {
            Err(rerender(board, Status::UnprocessableEntity, &e, &post_form))
        }
        Err(e @ PostError::Storage(_)) => {
            log::error!("Community post not saved: {}", e);
            Err(rerender(board, Status::InternalServerError, &e, &post_form))
        }
    }
}

async fn read_upload(file: &TempFile<'_>) -> std::io::Result<ImageUpload> {
    let mut reader = Box::pin(file.open().await?);
    let mut bytes = Vec::with_capacity(file.len() as usize);
    reader.read_to_end(&mut bytes).await?;
    Ok(ImageUpload {
        bytes,
        content_type: file.content_type().map(|ct| ct.to_string()),
    })
}

fn rerender(
    board: &PostBoard,
    status: Status,
    error: &PostError,
    form: &PostForm,
) -> (Status, RawHtml<String>) {
    let message = match error {
        PostError::Validation(m) => m.clone(),
        PostError::Storage(_) => "Your story could not be saved. Please try again.".to_string(),
    };
    (
        status,
        RawHtml(render::community_page(
            &board.list(),
            None,
            Some(&message),
            &form.author,
            &form.message,
        )),
    )
}

/// Bodies past the form limit never reach the handler.
#[catch(413)]
pub fn payload_too_large(req: &Request<'_>) -> RawHtml<String> {
    let posts = req
        .rocket()
        .state::<PostBoard>()
        .map(|board| board.list())
        .unwrap_or_default();
    RawHtml(render::community_page(
        &posts,
        None,
        Some(TOO_LARGE_MESSAGE),
        "",
        "",
    ))
}

pub fn catchers() -> Vec<rocket::Catcher> {
    catchers![payload_too_large]
}

pub fn routes() -> Vec<rocket::Route> {
    routes![community_page, community_submit]
}
