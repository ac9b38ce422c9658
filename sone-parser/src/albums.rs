use itertools::Itertools;
use log::{debug, trace, warn};
use sone_data::{Album, AlbumBuilder, AlbumBuilderFactory, AlbumIndex, AlbumTree};
use std::collections::{HashMap, VecDeque};

use crate::{field, missing, parse_list, ConfigurationReader, Error, SoneParser};

struct AlbumRecord {
    path: String,
    id: String,
    parent: Option<String>,
    title: String,
    description: String,
    album_image: Option<String>,
}

/// Album structure whose album images are not linked yet.
///
/// Images are added with [`SoneParser::parse_images`], after which
/// [`ParsedAlbums::resolve_album_images`] finishes the tree.
#[derive(Debug, Default)]
pub struct ParsedAlbums {
    tree: AlbumTree,
    album_images: Vec<(AlbumIndex, String)>,
}

impl ParsedAlbums {
    pub fn tree(&self) -> &AlbumTree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut AlbumTree {
        &mut self.tree
    }

    /// Links every album to its album image. An image id that is not part of
    /// the tree leaves the album without an album image.
    pub fn resolve_album_images(self) -> AlbumTree {
        let mut tree = self.tree;
        for (album, image_id) in self.album_images {
            if !tree.set_album_image(album, &image_id) {
                let album_id = tree.get(album).map(|album| album.id.as_str()).unwrap_or("?");
                warn!("Album image {} of album {} not found", image_id, album_id);
            }
        }
        tree
    }

    fn insert(
        &mut self,
        parent: Option<AlbumIndex>,
        album: Album,
        record: &AlbumRecord,
    ) -> AlbumIndex {
        let index = match parent {
            Some(parent) => self.tree.insert_child(parent, album),
            None => self.tree.insert_top_level(album),
        };
        if let Some(image_id) = &record.album_image {
            self.album_images.push((index, image_id.clone()));
        }
        index
    }
}

impl<C> SoneParser<'_, C>
where
    C: ConfigurationReader + ?Sized,
{
    /// Builds the album structure.
    ///
    /// Albums may be listed before their parent, so top-level albums are
    /// inserted first and children are linked breadth-first below them.
    /// Albums that can not be reached from a top-level album are dangling.
    pub fn parse_albums<F: AlbumBuilderFactory>(
        &self,
        factory: &F,
    ) -> Result<ParsedAlbums, Error> {
        let configuration = self.configuration;
        let records = parse_list(configuration, &self.path("Albums"), "ID", |prefix, id| {
            let malformed = |name: &str| Error::MalformedAlbum {
                path: prefix.to_string(),
                reason: missing(name),
            };
            Ok::<_, Error>(AlbumRecord {
                path: prefix.to_string(),
                id,
                parent: configuration.get_string(&field(prefix, "Parent")),
                title: configuration
                    .get_string(&field(prefix, "Title"))
                    .ok_or_else(|| malformed("Title"))?,
                description: configuration
                    .get_string(&field(prefix, "Description"))
                    .ok_or_else(|| malformed("Description"))?,
                album_image: configuration.get_string(&field(prefix, "AlbumImage")),
            })
        })?;

        let mut children: HashMap<&str, Vec<usize>> = records
            .iter()
            .enumerate()
            .filter_map(|(position, record)| Some((record.parent.as_deref()?, position)))
            .into_group_map();

        let mut albums = ParsedAlbums::default();
        let mut queue = VecDeque::new();
        for record in records.iter().filter(|record| record.parent.is_none()) {
            let index = albums.insert(None, self.build_album(factory, record)?, record);
            queue.push_back((index, record.id.as_str()));
        }
        while let Some((parent, parent_id)) = queue.pop_front() {
            for position in children.remove(parent_id).unwrap_or_default() {
                let record = &records[position];
                trace!("Linking album {} to {}", record.id, parent_id);
                let index = albums.insert(Some(parent), self.build_album(factory, record)?, record);
                queue.push_back((index, record.id.as_str()));
            }
        }

        // whatever is left has a missing parent or sits in a cycle
        if let Some(position) = children.into_values().flatten().min() {
            let record = &records[position];
            return Err(Error::DanglingParentAlbum {
                path: record.path.clone(),
                parent: record.parent.clone().unwrap_or_default(),
            });
        }

        debug!("Parsed {} albums of {}", albums.tree.len(), self.sone_id);
        Ok(albums)
    }

    fn build_album<F: AlbumBuilderFactory>(
        &self,
        factory: &F,
        record: &AlbumRecord,
    ) -> Result<Album, Error> {
        factory
            .new_album_builder()
            .by(self.sone_id)
            .with_id(&record.id)
            .with_title(&record.title)
            .with_description(&record.description)
            .build()
            .map_err(|error| Error::MalformedAlbum {
                path: record.path.clone(),
                reason: error.to_string(),
            })
    }
}
