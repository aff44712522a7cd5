use std::sync::Arc;

use chrono::Local;
use log::{info, warn};
use thiserror::Error;

use crate::media::{self, ImageLimits};
use crate::models::post::{display_timestamp, Post, PostForm};
use crate::store::Store;

pub const VALIDATION_MESSAGE: &str = "Please fill out your name and story before posting.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostError {
    #[error("{0}")]
    Validation(String),
    #[error("could not save post: {0}")]
    Storage(String),
}

/// Raw photo bytes as they arrived with the form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Trimmed author and message that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub author: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub post: Post,
    /// Set when a photo was attached but could not be encoded. The post
    /// was still saved, without it.
    pub image_error: Option<String>,
}

/// Community post list for one store key.
#[derive(Clone)]
pub struct PostBoard {
    store: Arc<dyn Store>,
    key: String,
    limits: ImageLimits,
}

impl PostBoard {
    pub fn new(store: Arc<dyn Store>, key: &str, limits: ImageLimits) -> Self {
        PostBoard {
            store,
            key: key.to_string(),
            limits,
        }
    }

    /// Newest first.
    pub fn list(&self) -> Vec<Post> {
        self.store.post_list(&self.key)
    }

    pub fn validate(form: &PostForm) -> Result<PostDraft, PostError> {
        let author = form.author.trim();
        let message = form.message.trim();
        if author.is_empty() || message.is_empty() {
            return Err(PostError::Validation(VALIDATION_MESSAGE.to_string()));
        }
        Ok(PostDraft {
            author: author.to_string(),
            message: message.to_string(),
        })
    }

    /// Validate, stamp, encode the photo (if any), then save.
    /// Nothing is written until the photo has been encoded.
    pub async fn submit(
        &self,
        form: &PostForm,
        image: Option<ImageUpload>,
    ) -> Result<Submission, PostError> {
        let draft = Self::validate(form)?;
        let timestamp = display_timestamp(&Local::now());

        let (encoded, image_error) = match image {
            Some(upload) => {
                match media::encode_data_url_async(upload.bytes, upload.content_type, self.limits)
                    .await
                {
                    Ok(url) => (url, None),
                    Err(e) => {
                        warn!("Photo from {} dropped: {}", draft.author, e);
                        (String::new(), Some(e))
                    }
                }
            }
            None => (String::new(), None),
        };

        let post = Post {
            author: draft.author,
            message: draft.message,
            timestamp,
            image: encoded,
        };
        self.save(&post)?;
        info!(
            "Community post saved: author={} photo={}",
            post.author,
            post.has_image()
        );
        Ok(Submission { post, image_error })
    }

    pub fn save(&self, post: &Post) -> Result<(), PostError> {
        self.store
            .post_prepend(&self.key, post)
            .map_err(PostError::Storage)
    }
}
