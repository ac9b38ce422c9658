use log::debug;
use sone_data::{ImageBuilder, ImageBuilderFactory};

use crate::{field, missing, parse_list, ConfigurationReader, Error, ParsedAlbums, SoneParser};

impl<C> SoneParser<'_, C>
where
    C: ConfigurationReader + ?Sized,
{
    /// Parses the images and adds each one to the album it names.
    ///
    /// Nothing is added to `albums` unless every image is valid.
    pub fn parse_images<F: ImageBuilderFactory>(
        &self,
        albums: &mut ParsedAlbums,
        factory: &F,
    ) -> Result<(), Error> {
        let configuration = self.configuration;
        let tree = albums.tree();
        let images = parse_list(configuration, &self.path("Images"), "ID", |prefix, id| {
            let malformed = |reason: String| Error::MalformedImage {
                path: prefix.to_string(),
                reason,
            };
            let string = |name: &str| {
                configuration
                    .get_string(&field(prefix, name))
                    .ok_or_else(|| malformed(missing(name)))
            };
            let int = |name: &str| {
                configuration
                    .get_int(&field(prefix, name))
                    .ok_or_else(|| malformed(missing(name)))
            };

            let album_id = string("Album")?;
            // zero is a valid creation time, only absence is not
            let creation_time = configuration
                .get_long(&field(prefix, "CreationTime"))
                .ok_or_else(|| malformed(missing("CreationTime")))?;
            let key = string("Key")?;
            let title = string("Title")?;
            let description = string("Description")?;
            let width = int("Width")?;
            let height = int("Height")?;

            let album = tree.find(&album_id).ok_or_else(|| Error::DanglingParentAlbum {
                path: prefix.to_string(),
                parent: album_id.clone(),
            })?;

            let image = factory
                .new_image_builder()
                .by(self.sone_id)
                .with_id(&id)
                .created_at(creation_time)
                .with_key(&key)
                .with_title(&title)
                .with_description(&description)
                .with_size(width, height)
                .build()
                .map_err(|error| malformed(error.to_string()))?;
            Ok((album, image))
        })?;

        debug!("Parsed {} images of {}", images.len(), self.sone_id);
        let tree = albums.tree_mut();
        for (album, image) in images {
            tree.add_image(album, image);
        }
        Ok(())
    }
}
