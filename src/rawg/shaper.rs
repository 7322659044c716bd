use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;

use super::{GameRecommendation, RawgGame};
use crate::quiz::{AnswerMap, GENRE, PLATFORM, VIBE};

pub const RECOMMENDATION_COUNT: usize = 3;
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1550745165-9bc0b252726f?q=80&w=1000&auto=format&fit=crop";
/// Stand-in score for games RAWG has no metacritic rating for.
pub const FILLER_SCORE: RangeInclusive<u32> = 75..=95;

/// Shuffles the candidates, keeps the first [`RECOMMENDATION_COUNT`] and turns
/// them into recommendations worded after the user's answers.
pub fn shape<R: Rng>(
    mut candidates: Vec<RawgGame>,
    answers: &AnswerMap,
    rng: &mut R,
) -> Vec<GameRecommendation> {
    candidates.shuffle(rng);
    candidates.truncate(RECOMMENDATION_COUNT);

    candidates
        .into_iter()
        .map(|game| to_recommendation(game, answers, rng))
        .collect()
}

fn to_recommendation<R: Rng>(
    game: RawgGame,
    answers: &AnswerMap,
    rng: &mut R,
) -> GameRecommendation {
    let chosen_genre = answers.get(GENRE).unwrap_or_default();

    let description = describe(game.released.as_deref(), answers);
    let metacritic = game
        .metacritic
        .unwrap_or_else(|| rng.gen_range(FILLER_SCORE));
    let image = game
        .background_image
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());
    let genre = game
        .genres
        .into_iter()
        .flatten()
        .map(|g| g.name)
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| chosen_genre.to_string());

    GameRecommendation {
        id: game.id,
        title: game.name,
        description,
        metacritic: Some(metacritic),
        image,
        genre,
        released: game.released,
    }
}

fn describe(released: Option<&str>, answers: &AnswerMap) -> String {
    let genre = answers.get(GENRE).unwrap_or_default();
    let vibe = answers.get(VIBE).unwrap_or_default().to_lowercase();
    let platform = answers.get(PLATFORM).unwrap_or_default();

    let launch = match release_year(released) {
        Some(year) => format!("Lançado em {year}."),
        None => "Data de lançamento a confirmar.".to_string(),
    };
    format!(
        "{launch} Um dos melhores jogos do gênero {genre}, perfeito para quem quer {vibe} no {platform}."
    )
}

/// RAWG dates look like `2015-05-18`.
pub fn release_year(released: Option<&str>) -> Option<u16> {
    released?.get(..4)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{BUDGET, PLAYTIME};
    use crate::rawg::RawgGenre;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn answers() -> AnswerMap {
        [
            (PLATFORM, "PC"),
            (BUDGET, "Preço Cheio"),
            (GENRE, "RPG"),
            (PLAYTIME, "Algumas Horas"),
            (VIBE, "Desafio"),
        ]
        .into_iter()
        .collect()
    }

    fn game(id: u64, metacritic: Option<u32>) -> RawgGame {
        RawgGame {
            id,
            name: format!("Game {id}"),
            released: Some("2015-05-18".to_string()),
            metacritic,
            background_image: Some(format!("https://media.rawg.io/{id}.jpg")),
            genres: Some(vec![RawgGenre {
                name: "Action".to_string(),
            }]),
        }
    }

    #[test]
    fn never_more_than_three() {
        let candidates: Vec<_> = (1..=15).map(|id| game(id, Some(80))).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let shaped = shape(candidates, &answers(), &mut rng);
        assert_eq!(shaped.len(), RECOMMENDATION_COUNT);

        let mut ids: Vec<_> = shaped.iter().map(|r| r.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), RECOMMENDATION_COUNT);
        assert!(ids.iter().all(|id| (1..=15).contains(id)));
    }

    #[test]
    fn fewer_candidates_than_three_are_all_kept() {
        let mut rng = StdRng::seed_from_u64(1);
        let shaped = shape(vec![game(1, Some(90)), game(2, None)], &answers(), &mut rng);
        assert_eq!(shaped.len(), 2);
    }

    #[test]
    fn upstream_score_is_kept_when_present() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let candidates: Vec<_> = (1..=15).map(|id| game(id, Some(id as u32))).collect();
            for rec in shape(candidates, &answers(), &mut rng) {
                assert_eq!(rec.metacritic, Some(rec.id as u32));
            }
        }
    }

    #[test]
    fn missing_score_gets_filler_in_range() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let shaped = shape(vec![game(42, None)], &answers(), &mut rng);
            assert_eq!(shaped.len(), 1);
            let score = shaped[0].metacritic.unwrap();
            assert!(FILLER_SCORE.contains(&score), "score {score} out of range");
        }
    }

    #[test]
    fn description_uses_the_answers() {
        let mut rng = StdRng::seed_from_u64(3);
        let shaped = shape(vec![game(1, Some(91))], &answers(), &mut rng);
        assert_eq!(
            shaped[0].description,
            "Lançado em 2015. Um dos melhores jogos do gênero RPG, perfeito para quem quer desafio no PC."
        );
        assert_eq!(shaped[0].released.as_deref(), Some("2015-05-18"));
        assert_eq!(shaped[0].title, "Game 1");
    }

    #[test]
    fn fallbacks_for_missing_image_genre_and_date() {
        let bare = RawgGame {
            id: 9,
            name: "Bare".to_string(),
            released: None,
            metacritic: Some(70),
            background_image: None,
            genres: None,
        };
        let empty_strings = RawgGame {
            id: 10,
            name: "Empty".to_string(),
            released: Some(String::new()),
            metacritic: Some(71),
            background_image: Some(String::new()),
            genres: Some(vec![]),
        };
        let mut rng = StdRng::seed_from_u64(5);

        for rec in shape(vec![bare, empty_strings], &answers(), &mut rng) {
            assert_eq!(rec.image, PLACEHOLDER_IMAGE);
            assert_eq!(rec.genre, "RPG");
            assert!(rec.description.starts_with("Data de lançamento a confirmar."));
        }
    }

    #[test]
    fn upstream_genre_wins_over_answer() {
        let mut rng = StdRng::seed_from_u64(11);
        let shaped = shape(vec![game(1, Some(88))], &answers(), &mut rng);
        assert_eq!(shaped[0].genre, "Action");
    }

    #[test]
    fn release_year_parsing() {
        assert_eq!(release_year(Some("1998-11-19")), Some(1998));
        assert_eq!(release_year(Some("TBA")), None);
        assert_eq!(release_year(None), None);
    }
}
