use log::{debug, warn};
use sone_data::{Post, PostBuilder, PostBuilderFactory};
use sone_ref::SoneId;

use crate::{field, missing, parse_list, ConfigurationReader, Error, SoneParser};

impl<C> SoneParser<'_, C>
where
    C: ConfigurationReader + ?Sized,
{
    /// Parses the posts in list order.
    ///
    /// A post needs a non-zero time and a non-empty text. A recipient that is
    /// not shaped like an identity id is dropped, the post is kept.
    pub fn parse_posts<F: PostBuilderFactory>(&self, factory: &F) -> Result<Vec<Post>, Error> {
        let configuration = self.configuration;
        let posts = parse_list(configuration, &self.path("Posts"), "ID", |prefix, id| {
            let malformed = |reason: String| Error::MalformedPost {
                path: prefix.to_string(),
                reason,
            };
            let time = configuration
                .get_long(&field(prefix, "Time"))
                .filter(|time| *time != 0)
                .ok_or_else(|| malformed(missing("Time")))?;
            let text = configuration
                .get_string(&field(prefix, "Text"))
                .filter(|text| !text.is_empty())
                .ok_or_else(|| malformed(missing("Text")))?;
            let recipient = configuration
                .get_string(&field(prefix, "Recipient"))
                .and_then(|recipient| match SoneId::from_string(recipient) {
                    Ok(recipient) => Some(recipient),
                    Err(error) => {
                        warn!("Ignoring recipient of post {}: {}", id, error);
                        None
                    }
                });

            factory
                .new_post_builder()
                .sender(self.sone_id)
                .with_id(&id)
                .with_time(time)
                .with_text(&text)
                .to(recipient)
                .build()
                .map_err(|error| malformed(error.to_string()))
        })?;

        debug!("Parsed {} posts of {}", posts.len(), self.sone_id);
        Ok(posts)
    }
}
