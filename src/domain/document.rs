use serde::{Deserialize, Serialize};

/// A decoded feed, held only for the duration of one fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedDocument {
    pub title: String,
    pub link: String,
    pub description: String,
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: String,
}

impl FeedDocument {
    /// Decode HTML entities in every human-readable text field, in place
    pub fn unescape_html(&mut self) {
        unescape_in_place(&mut self.title);
        unescape_in_place(&mut self.description);
        for item in &mut self.items {
            unescape_in_place(&mut item.title);
            unescape_in_place(&mut item.description);
        }
    }

    pub fn item_titles(&self) -> Vec<String> {
        self.items.iter().map(|item| item.title.clone()).collect()
    }
}

fn unescape_in_place(text: &mut String) {
    if text.contains('&') {
        *text = html_escape::decode_html_entities(text.as_str()).into_owned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, description: &str) -> FeedItem {
        FeedItem {
            title: title.to_string(),
            link: "https://example.com/post".to_string(),
            description: description.to_string(),
            pub_date: String::new(),
        }
    }

    #[test]
    fn test_unescape_channel_and_items() {
        let mut doc = FeedDocument {
            title: "Tom &amp; Jerry".to_string(),
            link: "https://example.com/?a=1&amp;b=2".to_string(),
            description: "A &lt;b&gt;bold&lt;/b&gt; move".to_string(),
            items: vec![
                item("It&#39;s here", "A &amp; B"),
                item("&quot;Quoted&quot;", "plain"),
            ],
        };

        doc.unescape_html();

        assert_eq!(doc.title, "Tom & Jerry");
        assert_eq!(doc.description, "A <b>bold</b> move");
        assert_eq!(doc.items[0].title, "It's here");
        assert_eq!(doc.items[0].description, "A & B");
        assert_eq!(doc.items[1].title, "\"Quoted\"");
        // Links are left untouched
        assert_eq!(doc.link, "https://example.com/?a=1&amp;b=2");
    }

    #[test]
    fn test_unescape_leaves_plain_text_alone() {
        let mut doc = FeedDocument {
            title: "Plain".to_string(),
            items: vec![item("No entities", "<p>markup stays</p>")],
            ..Default::default()
        };

        doc.unescape_html();

        assert_eq!(doc.title, "Plain");
        assert_eq!(doc.items[0].description, "<p>markup stays</p>");
    }

    #[test]
    fn test_item_titles_keep_order() {
        let doc = FeedDocument {
            items: vec![item("first", ""), item("second", ""), item("third", "")],
            ..Default::default()
        };

        assert_eq!(doc.item_titles(), vec!["first", "second", "third"]);
    }
}
