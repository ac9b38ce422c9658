use std::collections::BTreeSet;

use crate::{parse_ids, ConfigurationReader, SoneParser};

impl<C> SoneParser<'_, C>
where
    C: ConfigurationReader + ?Sized,
{
    pub fn parse_liked_post_ids(&self) -> BTreeSet<String> {
        self.parse_id_set("Likes/Post")
    }

    pub fn parse_liked_post_reply_ids(&self) -> BTreeSet<String> {
        self.parse_id_set("Likes/Reply")
    }

    pub fn parse_friends(&self) -> BTreeSet<String> {
        self.parse_id_set("Friends")
    }

    fn parse_id_set(&self, category: &str) -> BTreeSet<String> {
        parse_ids(self.configuration, &self.path(category))
            .into_iter()
            .collect()
    }
}
