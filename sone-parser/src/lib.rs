use log::{debug, info};
use serde::Serialize;
use sone_data::{Album, AlbumTree, BuilderFactory, Post, PostReply, Profile};
use std::collections::BTreeSet;
use thiserror::Error as ThisError;

mod albums;
mod config;
mod ids;
mod images;
mod list;
mod posts;
mod profile;
mod replies;
pub use albums::ParsedAlbums;
pub use config::{ConfigError, Configuration, ConfigurationReader};
pub use list::{parse_ids, parse_list};

/// Root of every identity's subtree in a snapshot.
pub const ROOT: &str = "Sone";

/// Reasons a snapshot is rejected. Any of them aborts the whole parse.
#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum Error {
    #[error("Malformed post at {path}: {reason}")]
    MalformedPost { path: String, reason: String },
    #[error("Malformed reply at {path}: {reason}")]
    MalformedReply { path: String, reason: String },
    #[error("Malformed album at {path}: {reason}")]
    MalformedAlbum { path: String, reason: String },
    #[error("Unknown parent album {parent} referenced at {path}")]
    DanglingParentAlbum { path: String, parent: String },
    #[error("Malformed image at {path}: {reason}")]
    MalformedImage { path: String, reason: String },
}

/// Everything one identity owns, as read from a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SoneContent {
    pub sone_id: String,
    pub profile: Profile,
    pub posts: Vec<Post>,
    pub replies: Vec<PostReply>,
    pub liked_post_ids: BTreeSet<String>,
    pub liked_post_reply_ids: BTreeSet<String>,
    pub friends: BTreeSet<String>,
    pub albums: AlbumTree,
}

impl SoneContent {
    pub fn top_level_albums(&self) -> impl Iterator<Item = &Album> + '_ {
        self.albums.top_level_albums()
    }
}

/// Reads the content of one identity from a configuration snapshot.
pub struct SoneParser<'a, C: ?Sized> {
    configuration: &'a C,
    sone_id: &'a str,
    prefix: String,
}

impl<'a, C> SoneParser<'a, C>
where
    C: ConfigurationReader + ?Sized,
{
    pub fn new(configuration: &'a C, sone_id: &'a str) -> Self {
        Self {
            configuration,
            sone_id,
            prefix: format!("{}/{}", ROOT, sone_id),
        }
    }

    pub fn sone_id(&self) -> &str {
        self.sone_id
    }

    /// Parses the complete content graph. The order of the steps matters:
    /// images need the album structure, album images need the images.
    pub fn parse<F: BuilderFactory>(&self, factory: &F) -> Result<SoneContent, Error> {
        debug!("Parsing Sone {}", self.sone_id);

        let profile = self.parse_profile();
        let posts = self.parse_posts(factory)?;
        let replies = self.parse_post_replies(factory)?;
        let liked_post_ids = self.parse_liked_post_ids();
        let liked_post_reply_ids = self.parse_liked_post_reply_ids();
        let friends = self.parse_friends();
        let mut albums = self.parse_albums(factory)?;
        self.parse_images(&mut albums, factory)?;
        let albums = albums.resolve_album_images();

        info!(
            "Parsed Sone {}: {} posts, {} replies, {} friends, {} albums, {} images",
            self.sone_id,
            posts.len(),
            replies.len(),
            friends.len(),
            albums.len(),
            albums.images().count()
        );

        Ok(SoneContent {
            sone_id: self.sone_id.to_string(),
            profile,
            posts,
            replies,
            liked_post_ids,
            liked_post_reply_ids,
            friends,
            albums,
        })
    }

    fn path(&self, category: &str) -> String {
        field(&self.prefix, category)
    }
}

/// Parses the identity `sone_id` out of `configuration`.
pub fn parse_sone<C, F>(configuration: &C, sone_id: &str, factory: &F) -> Result<SoneContent, Error>
where
    C: ConfigurationReader + ?Sized,
    F: BuilderFactory,
{
    SoneParser::new(configuration, sone_id).parse(factory)
}

fn field(prefix: &str, name: &str) -> String {
    format!("{}/{}", prefix, name)
}

fn missing(name: &str) -> String {
    format!("missing {}", name)
}
