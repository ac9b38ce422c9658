use sone_ref::SoneId;
use thiserror::Error as ThisError;

use crate::{Album, Image, Post, PostReply};

#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum BuildError {
    #[error("{entity} is missing {field}")]
    Missing {
        entity: &'static str,
        field: &'static str,
    },
}

fn require<T>(
    value: Option<T>,
    entity: &'static str,
    field: &'static str,
) -> Result<T, BuildError> {
    value.ok_or(BuildError::Missing { entity, field })
}

pub trait PostBuilder: Sized {
    fn sender(self, sone_id: &str) -> Self;
    fn with_id(self, id: &str) -> Self;
    fn with_time(self, time: i64) -> Self;
    fn with_text(self, text: &str) -> Self;
    fn to(self, recipient: Option<SoneId>) -> Self;
    fn build(self) -> Result<Post, BuildError>;
}

pub trait PostBuilderFactory {
    type Builder: PostBuilder;

    fn new_post_builder(&self) -> Self::Builder;
}

pub trait PostReplyBuilder: Sized {
    fn sender(self, sone_id: &str) -> Self;
    fn with_id(self, id: &str) -> Self;
    fn to(self, post_id: &str) -> Self;
    fn with_time(self, time: i64) -> Self;
    fn with_text(self, text: &str) -> Self;
    fn build(self) -> Result<PostReply, BuildError>;
}

pub trait PostReplyBuilderFactory {
    type Builder: PostReplyBuilder;

    fn new_post_reply_builder(&self) -> Self::Builder;
}

/// Builds an album without any tree links, those are made by
/// [`AlbumTree`](crate::AlbumTree).
pub trait AlbumBuilder: Sized {
    fn by(self, sone_id: &str) -> Self;
    fn with_id(self, id: &str) -> Self;
    fn with_title(self, title: &str) -> Self;
    fn with_description(self, description: &str) -> Self;
    fn build(self) -> Result<Album, BuildError>;
}

pub trait AlbumBuilderFactory {
    type Builder: AlbumBuilder;

    fn new_album_builder(&self) -> Self::Builder;
}

pub trait ImageBuilder: Sized {
    fn by(self, sone_id: &str) -> Self;
    fn with_id(self, id: &str) -> Self;
    fn created_at(self, creation_time: i64) -> Self;
    fn with_key(self, key: &str) -> Self;
    fn with_title(self, title: &str) -> Self;
    fn with_description(self, description: &str) -> Self;
    fn with_size(self, width: i32, height: i32) -> Self;
    fn build(self) -> Result<Image, BuildError>;
}

pub trait ImageBuilderFactory {
    type Builder: ImageBuilder;

    fn new_image_builder(&self) -> Self::Builder;
}

/// Everything needed to build the full content of one identity.
pub trait BuilderFactory:
    PostBuilderFactory + PostReplyBuilderFactory + AlbumBuilderFactory + ImageBuilderFactory
{
}

impl<T> BuilderFactory for T where
    T: PostBuilderFactory + PostReplyBuilderFactory + AlbumBuilderFactory + ImageBuilderFactory
{
}

/// Hands out the default builders for every entity kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultBuilderFactory;

impl PostBuilderFactory for DefaultBuilderFactory {
    type Builder = DefaultPostBuilder;

    fn new_post_builder(&self) -> DefaultPostBuilder {
        DefaultPostBuilder::default()
    }
}

impl PostReplyBuilderFactory for DefaultBuilderFactory {
    type Builder = DefaultPostReplyBuilder;

    fn new_post_reply_builder(&self) -> DefaultPostReplyBuilder {
        DefaultPostReplyBuilder::default()
    }
}

impl AlbumBuilderFactory for DefaultBuilderFactory {
    type Builder = DefaultAlbumBuilder;

    fn new_album_builder(&self) -> DefaultAlbumBuilder {
        DefaultAlbumBuilder::default()
    }
}

impl ImageBuilderFactory for DefaultBuilderFactory {
    type Builder = DefaultImageBuilder;

    fn new_image_builder(&self) -> DefaultImageBuilder {
        DefaultImageBuilder::default()
    }
}

#[derive(Clone, Debug, Default)]
pub struct DefaultPostBuilder {
    sender: Option<String>,
    id: Option<String>,
    time: Option<i64>,
    text: Option<String>,
    recipient: Option<SoneId>,
}

impl PostBuilder for DefaultPostBuilder {
    fn sender(mut self, sone_id: &str) -> Self {
        self.sender = Some(sone_id.to_string());
        self
    }

    fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    fn with_time(mut self, time: i64) -> Self {
        self.time = Some(time);
        self
    }

    fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    fn to(mut self, recipient: Option<SoneId>) -> Self {
        self.recipient = recipient;
        self
    }

    fn build(self) -> Result<Post, BuildError> {
        Ok(Post {
            id: require(self.id, "post", "id")?,
            sone: require(self.sender, "post", "sender")?,
            time: require(self.time, "post", "time")?,
            text: require(self.text, "post", "text")?,
            recipient: self.recipient,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct DefaultPostReplyBuilder {
    sender: Option<String>,
    id: Option<String>,
    post_id: Option<String>,
    time: Option<i64>,
    text: Option<String>,
}

impl PostReplyBuilder for DefaultPostReplyBuilder {
    fn sender(mut self, sone_id: &str) -> Self {
        self.sender = Some(sone_id.to_string());
        self
    }

    fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    fn to(mut self, post_id: &str) -> Self {
        self.post_id = Some(post_id.to_string());
        self
    }

    fn with_time(mut self, time: i64) -> Self {
        self.time = Some(time);
        self
    }

    fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    fn build(self) -> Result<PostReply, BuildError> {
        Ok(PostReply {
            id: require(self.id, "reply", "id")?,
            sone: require(self.sender, "reply", "sender")?,
            post_id: require(self.post_id, "reply", "post id")?,
            time: require(self.time, "reply", "time")?,
            text: require(self.text, "reply", "text")?,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct DefaultAlbumBuilder {
    sone: Option<String>,
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
}

impl AlbumBuilder for DefaultAlbumBuilder {
    fn by(mut self, sone_id: &str) -> Self {
        self.sone = Some(sone_id.to_string());
        self
    }

    fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    fn build(self) -> Result<Album, BuildError> {
        Ok(Album::new(
            require(self.id, "album", "id")?,
            require(self.sone, "album", "owner")?,
            require(self.title, "album", "title")?,
            require(self.description, "album", "description")?,
        ))
    }
}

#[derive(Clone, Debug, Default)]
pub struct DefaultImageBuilder {
    sone: Option<String>,
    id: Option<String>,
    creation_time: Option<i64>,
    key: Option<String>,
    title: Option<String>,
    description: Option<String>,
    size: Option<(i32, i32)>,
}

impl ImageBuilder for DefaultImageBuilder {
    fn by(mut self, sone_id: &str) -> Self {
        self.sone = Some(sone_id.to_string());
        self
    }

    fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    fn created_at(mut self, creation_time: i64) -> Self {
        self.creation_time = Some(creation_time);
        self
    }

    fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    fn with_size(mut self, width: i32, height: i32) -> Self {
        self.size = Some((width, height));
        self
    }

    fn build(self) -> Result<Image, BuildError> {
        let (width, height) = require(self.size, "image", "size")?;
        Ok(Image {
            id: require(self.id, "image", "id")?,
            sone: require(self.sone, "image", "owner")?,
            // set when the image is added to its album
            album: String::new(),
            creation_time: require(self.creation_time, "image", "creation time")?,
            key: require(self.key, "image", "key")?,
            title: require(self.title, "image", "title")?,
            description: require(self.description, "image", "description")?,
            width,
            height,
        })
    }
}
