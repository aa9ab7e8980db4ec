use feed_rs::parser;
use reqwest::blocking::Client;

use crate::domain::{FeedDocument, FeedItem};
use crate::errors::{GatorError, GatorResult};
use crate::fetcher::traits::FeedFetcher;
use crate::fetcher::FetchContext;

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    pub fn new() -> GatorResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatorError::Network(format!("could not build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Decode raw bytes into a feed document with HTML entities unescaped
    pub fn parse_document(url: &str, bytes: &[u8]) -> GatorResult<FeedDocument> {
        let parsed =
            parser::parse(bytes).map_err(|e| GatorError::Decode(format!("{}: {}", url, e)))?;

        let mut raw_dates = raw_pub_dates(bytes);
        if raw_dates.len() != parsed.entries.len() {
            raw_dates.clear();
        }

        let items = parsed
            .entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| FeedItem {
                title: entry.title.map(|t| t.content).unwrap_or_default(),
                link: entry
                    .links
                    .into_iter()
                    .next()
                    .map(|l| l.href)
                    .unwrap_or_default(),
                description: entry
                    .summary
                    .map(|s| s.content)
                    .or_else(|| entry.content.and_then(|c| c.body))
                    .unwrap_or_default(),
                pub_date: raw_dates
                    .get(i)
                    .cloned()
                    .flatten()
                    .or_else(|| entry.published.or(entry.updated).map(|dt| dt.to_rfc2822()))
                    .unwrap_or_default(),
            })
            .collect();

        let mut document = FeedDocument {
            title: parsed.title.map(|t| t.content).unwrap_or_default(),
            link: parsed
                .links
                .into_iter()
                .next()
                .map(|l| l.href)
                .unwrap_or_default(),
            description: parsed.description.map(|d| d.content).unwrap_or_default(),
            items,
        };
        document.unescape_html();

        Ok(document)
    }
}

/// `<pubDate>` text of each RSS item exactly as written. Empty for non-RSS documents.
fn raw_pub_dates(bytes: &[u8]) -> Vec<Option<String>> {
    rss::Channel::read_from(bytes)
        .map(|channel| {
            channel
                .items()
                .iter()
                .map(|item| item.pub_date().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

impl FeedFetcher for HttpFeedFetcher {
    fn fetch(&self, ctx: &FetchContext, url: &str) -> GatorResult<FeedDocument> {
        if ctx.is_cancelled() {
            return Err(GatorError::Network(format!("fetch of {} cancelled", url)));
        }

        let mut builder = self.client.get(url);
        if let Some(timeout) = ctx.timeout() {
            builder = builder.timeout(timeout);
        }
        let request = builder
            .build()
            .map_err(|e| GatorError::Network(format!("could not build request for {}: {}", url, e)))?;

        let response = self.client.execute(request)?;
        tracing::debug!(url, status = %response.status(), "received feed response");

        let bytes = response.bytes()?;
        Self::parse_document(url, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::CancelToken;
    use httpmock::prelude::*;
    use std::time::Duration;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Boot.dev Blog</title>
    <link>https://blog.boot.dev/</link>
    <description>Tips &amp;amp; tricks</description>
    <item>
      <title>The Zen of Proverbs</title>
      <link>https://blog.boot.dev/zen</link>
      <description>A &amp; B</description>
      <pubDate>Mon, 21 Oct 2024 07:28:00 GMT</pubDate>
    </item>
    <item>
      <title>Don&amp;#39;t panic</title>
      <link>https://blog.boot.dev/panic</link>
      <description><![CDATA[<p>Errors are values</p>]]></description>
    </item>
  </channel>
</rss>"#;

    fn fetcher() -> HttpFeedFetcher {
        HttpFeedFetcher::new().unwrap()
    }

    #[test]
    fn test_parse_rss_document() {
        let doc = HttpFeedFetcher::parse_document("mem://feed", SAMPLE_RSS.as_bytes()).unwrap();

        assert_eq!(doc.title, "Boot.dev Blog");
        assert_eq!(doc.link, "https://blog.boot.dev/");
        assert_eq!(doc.description, "Tips & tricks");
        assert_eq!(doc.items.len(), 2);

        let first = &doc.items[0];
        assert_eq!(first.title, "The Zen of Proverbs");
        assert_eq!(first.link, "https://blog.boot.dev/zen");
        assert_eq!(first.description, "A & B");
        assert_eq!(first.pub_date, "Mon, 21 Oct 2024 07:28:00 GMT");

        let second = &doc.items[1];
        assert_eq!(second.title, "Don't panic");
        assert_eq!(second.description, "<p>Errors are values</p>");
        assert!(second.pub_date.is_empty());
    }

    #[test]
    fn test_parse_keeps_unparseable_pub_date() {
        let body = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Odd dates</title>
    <link>https://example.com/</link>
    <description>Hand-written dates</description>
    <item>
      <title>Standard</title>
      <pubDate>Mon, 21 Oct 2024 07:28:00 GMT</pubDate>
    </item>
    <item>
      <title>Hand-written</title>
      <pubDate>21st of October, 2024</pubDate>
    </item>
  </channel>
</rss>"#;

        let doc = HttpFeedFetcher::parse_document("mem://feed", body.as_bytes()).unwrap();

        assert_eq!(doc.items[0].pub_date, "Mon, 21 Oct 2024 07:28:00 GMT");
        assert_eq!(doc.items[1].pub_date, "21st of October, 2024");
    }

    #[test]
    fn test_parse_atom_renders_updated_date() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom blog</title>
  <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
  <updated>2024-10-21T07:28:00Z</updated>
  <entry>
    <title>Atom post</title>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <link href="https://example.com/atom-post"/>
    <updated>2024-10-21T07:28:00Z</updated>
  </entry>
</feed>"#;

        let doc = HttpFeedFetcher::parse_document("mem://atom", atom.as_bytes()).unwrap();

        assert_eq!(doc.items.len(), 1);
        assert_eq!(doc.items[0].link, "https://example.com/atom-post");
        assert_eq!(doc.items[0].pub_date, "Mon, 21 Oct 2024 07:28:00 +0000");
    }

    #[test]
    fn test_parse_malformed_body() {
        let result = HttpFeedFetcher::parse_document("mem://feed", b"this is not a feed");
        assert!(matches!(result, Err(GatorError::Decode(_))));
    }

    #[test]
    fn test_fetch_sends_user_agent_and_decodes() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/index.xml")
                .header("user-agent", USER_AGENT);
            then.status(200)
                .header("content-type", "application/rss+xml")
                .body(SAMPLE_RSS);
        });

        let ctx = FetchContext::new().with_timeout(Duration::from_secs(5));
        let doc = fetcher().fetch(&ctx, &server.url("/index.xml")).unwrap();

        mock.assert();
        assert_eq!(doc.item_titles(), vec!["The Zen of Proverbs", "Don't panic"]);
    }

    #[test]
    fn test_fetch_malformed_body_is_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/broken");
            then.status(200).body("<html><body>oops");
        });

        let result = fetcher().fetch(&FetchContext::new(), &server.url("/broken"));
        assert!(matches!(result, Err(GatorError::Decode(_))));
    }

    #[test]
    fn test_fetch_invalid_url_is_network_error() {
        let result = fetcher().fetch(&FetchContext::new(), "not a url");
        assert!(matches!(result, Err(GatorError::Network(_))));
    }

    #[test]
    fn test_fetch_unreachable_host_is_network_error() {
        let ctx = FetchContext::new().with_timeout(Duration::from_secs(2));
        let result = fetcher().fetch(&ctx, "http://127.0.0.1:1/index.xml");
        assert!(matches!(result, Err(GatorError::Network(_))));
    }

    #[test]
    fn test_fetch_cancelled_context() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/index.xml");
            then.status(200).body(SAMPLE_RSS);
        });

        let token = CancelToken::new();
        token.cancel();
        let ctx = FetchContext::new().with_cancel_token(token);

        let result = fetcher().fetch(&ctx, &server.url("/index.xml"));
        assert!(matches!(result, Err(GatorError::Network(_))));
        mock.assert_hits(0);
    }
}
