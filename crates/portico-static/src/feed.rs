//! RSS 2.0 and Atom 1.0 feed generation for blog posts.

use atom_syndication::{
    Entry, EntryBuilder, FeedBuilder, FixedDateTime, GeneratorBuilder, Link, LinkBuilder, Person,
    PersonBuilder, Text,
};
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder};

use portico_config::SiteConfig;
use portico_markdown::Date;

/// One blog post as it appears in a feed.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub title: String,
    /// Absolute URL of the post
    pub url: String,
    pub date: Date,
    pub author: Option<String>,
    pub description: Option<String>,
}

/// Build an RSS 2.0 feed (RFC 2822 dates).
pub fn build_rss(config: &SiteConfig, entries: &[FeedEntry]) -> String {
    let items: Vec<rss::Item> = entries.iter().map(entry_to_rss_item).collect();

    let channel = ChannelBuilder::default()
        .title(&config.site.title)
        .link(config.site.url.trim_end_matches('/'))
        .description(&config.site.tagline)
        .language(Some(config.i18n.default_locale.clone()))
        .generator(Some("portico".to_string()))
        .items(items)
        .build();

    channel.to_string()
}

fn entry_to_rss_item(entry: &FeedEntry) -> rss::Item {
    ItemBuilder::default()
        .title(Some(entry.title.clone()))
        .link(Some(entry.url.clone()))
        .guid(Some(
            GuidBuilder::default()
                .permalink(true)
                .value(entry.url.clone())
                .build(),
        ))
        .description(entry.description.clone())
        .pub_date(Some(entry.date.to_rfc2822()))
        .author(entry.author.clone())
        .build()
}

/// Build an Atom 1.0 feed (RFC 3339 dates).
pub fn build_atom(config: &SiteConfig, entries: &[FeedEntry]) -> String {
    let base_url = config.site.url.trim_end_matches('/');

    // Feed updated time is the newest entry date; RFC 3339 strings sort
    // lexicographically.
    let updated_str = entries
        .iter()
        .map(|e| e.date.to_rfc3339())
        .max()
        .unwrap_or_else(|| "1970-01-01T00:00:00Z".to_string());
    let updated: FixedDateTime = updated_str.parse().unwrap_or_default();

    let atom_entries: Vec<Entry> = entries.iter().map(entry_to_atom_entry).collect();

    let self_link: Link = LinkBuilder::default()
        .href(format!("{}{}blog/atom.xml", base_url, config.site.base_url))
        .rel("self".to_string())
        .mime_type(Some("application/atom+xml".to_string()))
        .build();

    let alternate_link: Link = LinkBuilder::default()
        .href(base_url.to_string())
        .rel("alternate".to_string())
        .build();

    let feed = FeedBuilder::default()
        .title(Text::plain(config.site.title.clone()))
        .id(base_url)
        .updated(updated)
        .links(vec![self_link, alternate_link])
        .subtitle(Some(Text::plain(config.site.tagline.clone())))
        .generator(Some(GeneratorBuilder::default().value("portico").build()))
        .lang(Some(config.i18n.default_locale.clone()))
        .entries(atom_entries)
        .build();

    feed.to_string()
}

fn entry_to_atom_entry(entry: &FeedEntry) -> Entry {
    let updated: FixedDateTime = entry.date.to_rfc3339().parse().unwrap_or_default();

    let link: Link = LinkBuilder::default()
        .href(entry.url.clone())
        .rel("alternate".to_string())
        .build();

    let authors: Vec<Person> = entry
        .author
        .as_ref()
        .map(|name| vec![PersonBuilder::default().name(name.clone()).build()])
        .unwrap_or_default();

    EntryBuilder::default()
        .title(Text::plain(entry.title.clone()))
        .id(entry.url.clone())
        .updated(updated)
        .links(vec![link])
        .summary(entry.description.clone().map(Text::plain))
        .authors(authors)
        .build()
}
