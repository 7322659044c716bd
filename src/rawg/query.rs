use std::fmt;

use crate::quiz::{AnswerMap, BUDGET, GENRE, PLATFORM, VIBE};

/// Best rated games first.
pub const ORDERING: &str = "-metacritic";
/// Enough candidates to sample a varied top 3 from.
pub const PAGE_SIZE: u32 = 15;

/// RAWG platform ids for the platform answer.
pub fn platform_ids(option_id: &str) -> Option<&'static str> {
    match option_id {
        "PC" => Some("4"),
        "PlayStation" => Some("187,18"), // PS5, PS4
        "Xbox" => Some("186,1"),         // Series X/S, One
        "Nintendo Switch" => Some("7"),
        "Mobile" => Some("3,21"), // iOS, Android
        _ => None,
    }
}

/// RAWG genre ids for the genre answer.
pub fn genre_ids(option_id: &str) -> Option<&'static str> {
    match option_id {
        "Ação e Aventura" => Some("4,3"),
        "RPG" => Some("5"),
        "Tiro / FPS" => Some("2"),
        "Estratégia" => Some("10"),
        "Esportes e Corrida" => Some("15,1"),
        "Puzzle e Casual" => Some("7,40"),
        _ => None,
    }
}

/// RAWG tag slugs for the budget and vibe answers. An empty slice means the
/// answer does not narrow the search.
pub fn tags(option_id: &str) -> &'static [&'static str] {
    match option_id {
        "Grátis" => &["free-to-play"],
        "Barato" => &["indie"],
        "Preço Cheio" => &[],
        "Relaxar" => &["relaxing", "casual"],
        "Competir" => &["multiplayer", "competitive"],
        "História" => &["story-rich", "singleplayer"],
        "Desafio" => &["difficult", "souls-like"],
        _ => &[],
    }
}

/// Search parameters for the RAWG `/games` endpoint, derived from a complete
/// set of answers. Building one never fails: an answer without a mapping just
/// drops that filter.
#[derive(Clone, PartialEq, Eq)]
pub struct RecommendationQuery {
    api_key: String,
    platforms: Option<String>,
    genres: Option<String>,
    tags: Vec<&'static str>,
}

impl RecommendationQuery {
    pub fn build(answers: &AnswerMap, api_key: &str) -> Self {
        let platforms = answers
            .get(PLATFORM)
            .and_then(platform_ids)
            .filter(|ids| !ids.is_empty())
            .map(str::to_string);
        let genres = answers
            .get(GENRE)
            .and_then(genre_ids)
            .filter(|ids| !ids.is_empty())
            .map(str::to_string);

        // Playtime has no catalog filter, so it is left out on purpose.
        let tags = [BUDGET, VIBE]
            .iter()
            .filter_map(|question_id| answers.get(question_id))
            .flat_map(tags)
            .copied()
            .collect();

        Self {
            api_key: api_key.to_string(),
            platforms,
            genres,
            tags,
        }
    }

    pub fn platforms(&self) -> Option<&str> {
        self.platforms.as_deref()
    }

    pub fn genres(&self) -> Option<&str> {
        self.genres.as_deref()
    }

    pub fn tags(&self) -> &[&'static str] {
        &self.tags
    }

    /// Query string pairs in the order they are sent.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("key", self.api_key.clone()),
            ("ordering", ORDERING.to_string()),
            ("page_size", PAGE_SIZE.to_string()),
        ];
        if let Some(platforms) = &self.platforms {
            params.push(("platforms", platforms.clone()));
        }
        if let Some(genres) = &self.genres {
            params.push(("genres", genres.clone()));
        }
        if !self.tags.is_empty() {
            params.push(("tags", self.tags.join(",")));
        }
        params
    }
}

// Never print the api key, these end up in logs.
impl fmt::Debug for RecommendationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecommendationQuery")
            .field("platforms", &self.platforms)
            .field("genres", &self.genres)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for RecommendationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "platforms={} genres={} tags={}",
            self.platforms.as_deref().unwrap_or("-"),
            self.genres.as_deref().unwrap_or("-"),
            if self.tags.is_empty() {
                "-".to_string()
            } else {
                self.tags.join(",")
            }
        )
    }
}
