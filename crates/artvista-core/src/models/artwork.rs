use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::contains_ignore_case;

/// A gallery entry as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ArtworkRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(rename = "yearCreated", deserialize_with = "de_year")]
    pub year_created: i32,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub category: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    pub artist: ArtistRecord,
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
    #[serde(rename = "usersWhoLiked", default)]
    pub users_who_liked: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ArtistRecord {
    pub name: String,
    pub country: String,
    #[serde(rename = "yearBorn")]
    pub year_born: i32,
    /// `None` while the artist is alive. The backend also writes `0` for that.
    #[serde(rename = "yearDead", default, deserialize_with = "de_year_dead")]
    pub year_dead: Option<i32>,
    pub about: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CommentRecord {
    /// Unique within the owning artwork only.
    #[serde(rename = "commentId")]
    pub comment_id: u64,
    pub username: String,
    pub email: String,
    pub text: String,
}

impl ArtworkRecord {
    pub fn like_count(&self) -> usize {
        self.users_who_liked.len()
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.users_who_liked.iter().any(|u| u == user_id)
    }

    /// Add or remove `user_id` from the likes. Returns true if the user now likes it.
    pub fn toggle_like(&mut self, user_id: &str) -> bool {
        if self.is_liked_by(user_id) {
            self.users_who_liked.retain(|u| u != user_id);
            false
        } else {
            self.users_who_liked.push(user_id.to_string());
            true
        }
    }

    pub fn next_comment_id(&self) -> u64 {
        self.comments
            .iter()
            .map(|c| c.comment_id)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Append a comment, assigning the next per-artwork comment id.
    pub fn add_comment(&mut self, username: &str, email: &str, text: &str) -> &CommentRecord {
        let comment = CommentRecord {
            comment_id: self.next_comment_id(),
            username: username.to_string(),
            email: email.to_string(),
            text: text.trim().to_string(),
        };
        self.comments.push(comment);
        &self.comments[self.comments.len() - 1]
    }

    pub fn add_hashtag(&mut self, tag: &str) {
        let tag = normalize_hashtag(tag);
        if !tag.is_empty() && !self.hashtags.contains(&tag) {
            self.hashtags.push(tag);
        }
    }

    /// Search over title, artist name, category and hashtags.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().trim_start_matches('#');
        if query.is_empty() {
            return true;
        }
        contains_ignore_case(&self.title, query)
            || contains_ignore_case(&self.artist.name, query)
            || contains_ignore_case(&self.category, query)
            || self.hashtags.iter().any(|t| contains_ignore_case(t, query))
    }
}

impl ArtistRecord {
    pub fn is_alive(&self) -> bool {
        self.year_dead.is_none()
    }

    pub fn lifespan_display(&self) -> String {
        match self.year_dead {
            Some(dead) => format!("{}–{}", self.year_born, dead),
            None => format!("b. {}", self.year_born),
        }
    }
}

/// An artwork being uploaded. The backend assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArtworkDraft {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(rename = "yearCreated")]
    pub year_created: i32,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub category: String,
    pub hashtags: Vec<String>,
    pub artist: ArtistRecord,
    pub comments: Vec<CommentRecord>,
    #[serde(rename = "usersWhoLiked")]
    pub users_who_liked: Vec<String>,
}

impl ArtworkDraft {
    /// Names of the fields the upload form must fill before submitting.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.image_url.trim().is_empty() {
            missing.push("image URL");
        }
        if self.artist.name.trim().is_empty() {
            missing.push("artist");
        }
        missing
    }
}

fn normalize_hashtag(tag: &str) -> String {
    tag.trim().trim_start_matches('#').trim().to_string()
}

/// Split free text like `#sunset, sea #oil` into distinct tags, keeping order.
pub fn parse_hashtags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for raw in input.split(|c: char| c == ',' || c.is_whitespace()) {
        for piece in raw.split('#') {
            let tag = normalize_hashtag(piece);
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }
    tags
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YearRepr {
    Number(i64),
    Text(String),
}

impl YearRepr {
    fn into_year<E: serde::de::Error>(self) -> Result<i32, E> {
        let value = match self {
            YearRepr::Number(n) => n,
            YearRepr::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| E::custom(format!("invalid year: {:?}", s)))?,
        };
        i32::try_from(value).map_err(|_| E::custom(format!("year out of range: {}", value)))
    }
}

// Older documents store yearCreated as a string.
fn de_year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    YearRepr::deserialize(deserializer)?.into_year()
}

fn de_year_dead<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    match Option::<YearRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(repr) => {
            let year = repr.into_year()?;
            Ok((year != 0).then_some(year))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ArtworkRecord {
        ArtworkRecord {
            id: "a1".to_string(),
            title: "Starry Night".to_string(),
            abstract_text: "Swirling sky".to_string(),
            year_created: 1889,
            image_url: "https://example.com/starry.jpg".to_string(),
            category: "Painting".to_string(),
            hashtags: vec!["night".to_string(), "oil".to_string()],
            artist: ArtistRecord {
                name: "Vincent van Gogh".to_string(),
                country: "Netherlands".to_string(),
                year_born: 1853,
                year_dead: Some(1890),
                about: "Post-impressionist".to_string(),
            },
            comments: vec![],
            users_who_liked: vec![],
        }
    }

    #[test]
    fn test_parse_original_document() {
        let json = r#"{
            "id": "abc",
            "title": "Water Lilies",
            "abstract": "Pond",
            "yearCreated": 1906,
            "imageURL": "https://example.com/lilies.jpg",
            "hashtags": ["pond"],
            "category": "Painting",
            "artist": {"name": "Claude Monet", "country": "France", "yearBorn": 1840, "yearDead": 1926, "about": ""},
            "comments": [{"commentId": 1, "username": "ola", "email": "ola@example.com", "text": "Lovely"}],
            "usersWhoLiked": ["u1"]
        }"#;

        let artwork: ArtworkRecord = serde_json::from_str(json).expect("parse artwork");
        assert_eq!(artwork.year_created, 1906);
        assert_eq!(artwork.artist.year_dead, Some(1926));
        assert_eq!(artwork.comments[0].comment_id, 1);
        assert!(artwork.is_liked_by("u1"));
    }

    #[test]
    fn test_year_created_as_string() {
        let json = r#"{
            "id": "abc", "title": "t", "abstract": "", "yearCreated": " 1999 ",
            "imageURL": "", "category": "",
            "artist": {"name": "n", "country": "", "yearBorn": 1950, "about": ""}
        }"#;

        let artwork: ArtworkRecord = serde_json::from_str(json).expect("parse artwork");
        assert_eq!(artwork.year_created, 1999);
        assert!(artwork.hashtags.is_empty());
        assert!(artwork.artist.is_alive());
    }

    #[test]
    fn test_year_created_rejects_garbage() {
        let json = r#"{
            "id": "abc", "title": "t", "abstract": "", "yearCreated": "soon",
            "imageURL": "", "category": "",
            "artist": {"name": "n", "country": "", "yearBorn": 1950, "about": ""}
        }"#;
        assert!(serde_json::from_str::<ArtworkRecord>(json).is_err());
    }

    #[test]
    fn test_year_dead_zero_means_alive() {
        let json = r#"{"name": "n", "country": "", "yearBorn": 1960, "yearDead": 0, "about": ""}"#;
        let artist: ArtistRecord = serde_json::from_str(json).expect("parse artist");
        assert!(artist.is_alive());
        assert_eq!(artist.lifespan_display(), "b. 1960");
    }

    #[test]
    fn test_toggle_like() {
        let mut artwork = sample();
        assert!(artwork.toggle_like("u1"));
        assert!(artwork.toggle_like("u2"));
        assert_eq!(artwork.like_count(), 2);

        assert!(!artwork.toggle_like("u1"));
        assert_eq!(artwork.users_who_liked, vec!["u2".to_string()]);
    }

    #[test]
    fn test_comment_ids_are_per_artwork() {
        let mut first = sample();
        let mut second = sample();

        assert_eq!(first.add_comment("a", "a@x.io", "one").comment_id, 1);
        assert_eq!(first.add_comment("b", "b@x.io", " two ").comment_id, 2);
        assert_eq!(first.comments[1].text, "two");

        // Independent numbering on another artwork
        assert_eq!(second.add_comment("c", "c@x.io", "hi").comment_id, 1);
    }

    #[test]
    fn test_next_comment_id_after_gap() {
        let mut artwork = sample();
        artwork.comments.push(CommentRecord {
            comment_id: 7,
            username: "x".to_string(),
            email: "x@x.io".to_string(),
            text: "old".to_string(),
        });
        assert_eq!(artwork.next_comment_id(), 8);
    }

    #[test]
    fn test_add_hashtag_is_set_like() {
        let mut artwork = sample();
        artwork.add_hashtag("#oil");
        artwork.add_hashtag("  stars ");
        artwork.add_hashtag("#");
        assert_eq!(artwork.hashtags, vec!["night", "oil", "stars"]);
    }

    #[test]
    fn test_parse_hashtags() {
        assert_eq!(parse_hashtags("#sunset, sea #oil"), vec!["sunset", "sea", "oil"]);
        assert_eq!(parse_hashtags("#a#b #a"), vec!["a", "b"]);
        assert!(parse_hashtags("  , # ").is_empty());
    }

    #[test]
    fn test_matches_search() {
        let artwork = sample();
        assert!(artwork.matches_search(""));
        assert!(artwork.matches_search("starry"));
        assert!(artwork.matches_search("GOGH"));
        assert!(artwork.matches_search("#oil"));
        assert!(artwork.matches_search("paint"));
        assert!(!artwork.matches_search("sculpture"));
    }

    #[test]
    fn test_draft_missing_fields() {
        let mut draft = ArtworkDraft::default();
        assert_eq!(draft.missing_fields(), vec!["title", "image URL", "artist"]);

        draft.title = "Dawn".to_string();
        draft.image_url = "https://example.com/dawn.png".to_string();
        draft.artist.name = "Ada".to_string();
        assert!(draft.missing_fields().is_empty());

        draft.artist.name = "   ".to_string();
        assert_eq!(draft.missing_fields(), vec!["artist"]);
    }
}
