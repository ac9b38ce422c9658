use log::debug;
use sone_data::{PostReply, PostReplyBuilder, PostReplyBuilderFactory};

use crate::{field, missing, parse_list, ConfigurationReader, Error, SoneParser};

impl<C> SoneParser<'_, C>
where
    C: ConfigurationReader + ?Sized,
{
    /// Parses the replies in list order. The replied-to post is not looked up.
    pub fn parse_post_replies<F: PostReplyBuilderFactory>(
        &self,
        factory: &F,
    ) -> Result<Vec<PostReply>, Error> {
        let configuration = self.configuration;
        let replies = parse_list(configuration, &self.path("Replies"), "ID", |prefix, id| {
            let malformed = |reason: String| Error::MalformedReply {
                path: prefix.to_string(),
                reason,
            };
            let post_id = configuration
                .get_string(&field(prefix, "Post/ID"))
                .ok_or_else(|| malformed(missing("Post/ID")))?;
            let time = configuration
                .get_long(&field(prefix, "Time"))
                .filter(|time| *time != 0)
                .ok_or_else(|| malformed(missing("Time")))?;
            let text = configuration
                .get_string(&field(prefix, "Text"))
                .ok_or_else(|| malformed(missing("Text")))?;

            factory
                .new_post_reply_builder()
                .sender(self.sone_id)
                .with_id(&id)
                .to(&post_id)
                .with_time(time)
                .with_text(&text)
                .build()
                .map_err(|error| malformed(error.to_string()))
        })?;

        debug!("Parsed {} replies of {}", replies.len(), self.sone_id);
        Ok(replies)
    }
}
