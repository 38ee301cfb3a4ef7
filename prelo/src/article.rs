//! Article and author records handed to the generation pipeline

use serde::{Deserialize, Serialize};

/// An article whose body is markdown text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tag: Option<String>,
    pub author_id: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: u64,
    pub name: String,
}

impl Article {
    /// Byline shown under the title on the first page
    pub fn byline(&self, author: &Author) -> String {
        match &self.created_at {
            Some(date) => format!("Por {} \u{2022} {}", author.name, date),
            None => format!("Por {}", author.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Article, Author) {
        (
            Article {
                id: 1,
                title: "Título".into(),
                content: "Corpo".into(),
                tag: None,
                author_id: 7,
                created_at: Some("2024-03-15".into()),
                updated_at: None,
            },
            Author { id: 7, name: "Ana Silva".into() },
        )
    }

    #[test]
    fn test_byline_with_date() {
        let (article, author) = sample();
        assert_eq!(article.byline(&author), "Por Ana Silva \u{2022} 2024-03-15");
    }

    #[test]
    fn test_byline_without_date() {
        let (mut article, author) = sample();
        article.created_at = None;
        assert_eq!(article.byline(&author), "Por Ana Silva");
    }
}
