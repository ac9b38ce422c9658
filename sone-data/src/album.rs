use serde::{ser::SerializeStruct, Serialize, Serializer};
use std::collections::HashMap;

use crate::Image;

/// Position of an album inside the [`AlbumTree`] that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AlbumIndex(usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Album {
    pub id: String,
    pub sone: String,
    pub title: String,
    pub description: String,
    album_image: Option<String>,
    parent: Option<AlbumIndex>,
    albums: Vec<AlbumIndex>,
    images: Vec<Image>,
}

impl Album {
    pub fn new(id: String, sone: String, title: String, description: String) -> Self {
        Self {
            id,
            sone,
            title,
            description,
            album_image: None,
            parent: None,
            albums: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Id of the representative image, only ever set to an image of the tree.
    pub fn album_image(&self) -> Option<&str> {
        self.album_image.as_deref()
    }

    pub fn parent(&self) -> Option<AlbumIndex> {
        self.parent
    }

    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    pub fn albums(&self) -> &[AlbumIndex] {
        &self.albums
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }
}

/// Arena holding every album of one identity.
///
/// Parents own their children through the ordered index list in
/// [`Album::albums`]; the child's [`Album::parent`] is only a way back up.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlbumTree {
    albums: Vec<Album>,
    top_level: Vec<AlbumIndex>,
    by_id: HashMap<String, AlbumIndex>,
    images_by_id: HashMap<String, (AlbumIndex, usize)>,
}

impl AlbumTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_top_level(&mut self, album: Album) -> AlbumIndex {
        let index = self.push(album, None);
        self.top_level.push(index);
        index
    }

    pub fn insert_child(&mut self, parent: AlbumIndex, album: Album) -> AlbumIndex {
        let index = self.push(album, Some(parent));
        self.albums[parent.0].albums.push(index);
        index
    }

    pub fn add_image(&mut self, album: AlbumIndex, mut image: Image) {
        let owner = &mut self.albums[album.0];
        image.album = owner.id.clone();
        self.images_by_id
            .insert(image.id.clone(), (album, owner.images.len()));
        owner.images.push(image);
    }

    /// Links `image_id` as representative image of `album` if the image is
    /// part of this tree. Returns whether the link was made.
    pub fn set_album_image(&mut self, album: AlbumIndex, image_id: &str) -> bool {
        if !self.images_by_id.contains_key(image_id) {
            return false;
        }
        self.albums[album.0].album_image = Some(image_id.to_string());
        true
    }

    pub fn find(&self, id: &str) -> Option<AlbumIndex> {
        self.by_id.get(id).copied()
    }

    pub fn get(&self, index: AlbumIndex) -> Option<&Album> {
        self.albums.get(index.0)
    }

    pub fn album(&self, id: &str) -> Option<&Album> {
        self.find(id).and_then(|index| self.get(index))
    }

    pub fn image(&self, id: &str) -> Option<&Image> {
        let (album, position) = self.images_by_id.get(id)?;
        self.albums[album.0].images.get(*position)
    }

    pub fn top_level_albums(&self) -> impl Iterator<Item = &Album> + '_ {
        self.top_level.iter().map(move |index| &self.albums[index.0])
    }

    pub fn children<'a>(&'a self, album: &'a Album) -> impl Iterator<Item = &'a Album> + 'a {
        album.albums.iter().map(move |index| &self.albums[index.0])
    }

    pub fn parent_of(&self, album: &Album) -> Option<&Album> {
        album.parent.map(|index| &self.albums[index.0])
    }

    /// Albums from the top level down to the album with the given id, both
    /// ends included.
    pub fn path_to(&self, id: &str) -> Option<Vec<&Album>> {
        let mut album = self.album(id)?;
        let mut path = vec![album];
        while let Some(parent) = self.parent_of(album) {
            path.push(parent);
            album = parent;
        }
        path.reverse();
        Some(path)
    }

    /// All albums in the order they were inserted.
    pub fn iter(&self) -> impl Iterator<Item = &Album> + '_ {
        self.albums.iter()
    }

    pub fn images(&self) -> impl Iterator<Item = &Image> + '_ {
        self.albums.iter().flat_map(|album| album.images.iter())
    }

    pub fn len(&self) -> usize {
        self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }

    fn push(&mut self, mut album: Album, parent: Option<AlbumIndex>) -> AlbumIndex {
        let index = AlbumIndex(self.albums.len());
        album.parent = parent;
        self.by_id.insert(album.id.clone(), index);
        self.albums.push(album);
        index
    }
}

// Serialized as nested albums, starting at the top level.
impl Serialize for AlbumTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        AlbumList {
            tree: self,
            indices: &self.top_level,
        }
        .serialize(serializer)
    }
}

struct AlbumList<'a> {
    tree: &'a AlbumTree,
    indices: &'a [AlbumIndex],
}

impl Serialize for AlbumList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.indices.iter().map(|index| AlbumNode {
            tree: self.tree,
            album: &self.tree.albums[index.0],
        }))
    }
}

struct AlbumNode<'a> {
    tree: &'a AlbumTree,
    album: &'a Album,
}

impl Serialize for AlbumNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let album = self.album;
        let mut state = serializer.serialize_struct("Album", 7)?;
        state.serialize_field("id", &album.id)?;
        state.serialize_field("sone", &album.sone)?;
        state.serialize_field("title", &album.title)?;
        state.serialize_field("description", &album.description)?;
        state.serialize_field("album_image", &album.album_image)?;
        state.serialize_field("images", &album.images)?;
        state.serialize_field(
            "albums",
            &AlbumList {
                tree: self.tree,
                indices: &album.albums,
            },
        )?;
        state.end()
    }
}
