//! Twitter v1.1 wire types and their conversion to [`Message`].

use serde::Deserialize;

use crate::feed::model::{Link, LinkKind, Message};

#[derive(Debug, Clone, Deserialize)]
pub struct RawTweet {
    pub created_at: String,
    /// Present with `tweet_mode=extended`.
    #[serde(default)]
    pub full_text: Option<String>,
    /// Legacy (possibly truncated) text.
    #[serde(default)]
    pub text: Option<String>,
    pub user: RawUser,
    #[serde(default)]
    pub entities: RawEntities,
    /// Streamed tweets over 140 chars carry their full body here.
    #[serde(default)]
    pub extended_tweet: Option<RawExtendedTweet>,
    #[serde(default)]
    pub retweeted_status: Option<Box<RawTweet>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub screen_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntities {
    #[serde(default)]
    pub urls: Vec<RawUrlEntity>,
    #[serde(default)]
    pub media: Vec<RawUrlEntity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUrlEntity {
    pub url: String,
    #[serde(default)]
    pub expanded_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawExtendedTweet {
    pub full_text: String,
    #[serde(default)]
    pub entities: RawEntities,
}

impl RawEntities {
    fn into_links(self) -> Vec<Link> {
        let urls = self
            .urls
            .into_iter()
            .map(|entity| (entity, LinkKind::Hyperlink));
        let media = self.media.into_iter().map(|entity| (entity, LinkKind::Media));

        urls.chain(media)
            .filter_map(|(entity, kind)| {
                let expanded = entity.expanded_url?;
                Some(Link::new(entity.url, expanded, kind))
            })
            .collect()
    }
}

impl From<RawTweet> for Message {
    fn from(raw: RawTweet) -> Self {
        let (body, entities) = match (raw.full_text, raw.extended_tweet) {
            (Some(full_text), _) => (full_text, raw.entities),
            (None, Some(extended)) => (extended.full_text, extended.entities),
            (None, None) => (raw.text.unwrap_or_default(), raw.entities),
        };

        Message {
            created_at: raw.created_at,
            body,
            author: raw.user.screen_name,
            links: entities.into_links(),
            original: raw.retweeted_status.map(|original| Box::new((*original).into())),
        }
    }
}
