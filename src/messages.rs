use teloxide::utils::html;

use crate::quiz::Question;
use crate::rawg::shaper::release_year;
use crate::rawg::{FetchError, GameRecommendation};

pub const START_BUTTON: &str = "Começar agora";
pub const RESTART_BUTTON: &str = "Refazer o teste";
pub const RETRY_BUTTON: &str = "Tentar novamente";

pub const GREETING_TEXT: &str = "🎮 <b>O que jogar agora?</b>\n\nResponda 5 perguntas rápidas e descubra seu próximo jogo favorito com base no seu gosto e orçamento.";
pub const LOADING_TEXT: &str = "Analisando seu perfil...\nBuscando no banco de dados os melhores jogos para você.";
pub const PICK_AN_OPTION_TEXT: &str = "Por favor, escolha uma das opções do teclado.";
pub const BUSY_TEXT: &str = "Ainda estou buscando seus jogos, só um instante!";
pub const FINISHED_TEXT: &str = "Seu resultado já está aí em cima! Quer tentar de novo?";

pub fn question_text(question: &Question, number: usize, total: usize) -> String {
    format!(
        "<i>Pergunta {} de {}</i>\n{}\n{}",
        number,
        total,
        html::bold(&html::escape(question.title)),
        html::escape(question.subtitle)
    )
}

pub fn results_header(count: usize) -> String {
    format!(
        "⭐ <b>Match Perfeito!</b>\nEncontramos esses {} jogos para você.",
        count
    )
}

pub fn recommendation_text(game: &GameRecommendation) -> String {
    let mut details = vec![html::escape(&game.genre)];
    if let Some(year) = release_year(game.released.as_deref()) {
        details.push(year.to_string());
    }

    let mut text = format!(
        "{}\n{} · {} META {}\n\n{}\n\n{}",
        html::bold(&html::escape(&game.title)),
        details.join(" · "),
        score_badge(game.metacritic),
        game.metacritic
            .map(|score| score.to_string())
            .unwrap_or_else(|| "--".to_string()),
        html::escape(&game.description),
        html::link(&game.image, "Imagem"),
    );
    if let Some(url) = search_url(&game.title) {
        text.push_str(" · ");
        text.push_str(&html::link(&url, "Pesquisar sobre o jogo"));
    }
    text
}

pub fn error_text(err: &FetchError) -> String {
    html::escape(err.user_message())
}

fn score_badge(score: Option<u32>) -> &'static str {
    match score.unwrap_or(0) {
        75.. => "🟢",
        50..=74 => "🟡",
        _ => "🔴",
    }
}

fn search_url(title: &str) -> Option<String> {
    reqwest::Url::parse_with_params(
        "https://www.google.com/search",
        &[("q", format!("{} game", title))],
    )
    .ok()
    .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::QUESTIONS;

    fn game() -> GameRecommendation {
        GameRecommendation {
            id: 3328,
            title: "The Witcher 3: Wild Hunt".to_string(),
            description: "Lançado em 2015. Um dos melhores jogos do gênero RPG, perfeito para quem quer história no PC.".to_string(),
            metacritic: Some(92),
            image: "https://media.rawg.io/witcher.jpg".to_string(),
            genre: "Action".to_string(),
            released: Some("2015-05-18".to_string()),
        }
    }

    #[test]
    fn question_shows_progress() {
        let text = question_text(&QUESTIONS[2], 3, 5);
        assert!(text.starts_with("<i>Pergunta 3 de 5</i>"));
        assert!(text.contains("<b>Qual estilo te atrai?</b>"));
    }

    #[test]
    fn recommendation_lists_the_details() {
        let text = recommendation_text(&game());
        assert!(text.contains("<b>The Witcher 3: Wild Hunt</b>"));
        assert!(text.contains("Action · 2015"));
        assert!(text.contains("🟢 META 92"));
        assert!(text.contains("https://www.google.com/search?q=The+Witcher+3%3A+Wild+Hunt+game"));
    }

    #[test]
    fn titles_are_escaped() {
        let mut game = game();
        game.title = "Tom & Jerry <Remastered>".to_string();
        let text = recommendation_text(&game);
        assert!(text.contains("Tom &amp; Jerry &lt;Remastered&gt;"));
    }

    #[test]
    fn badges_follow_the_score() {
        assert_eq!(score_badge(Some(75)), "🟢");
        assert_eq!(score_badge(Some(60)), "🟡");
        assert_eq!(score_badge(Some(49)), "🔴");
        assert_eq!(score_badge(None), "🔴");
    }

    #[test]
    fn missing_score_shows_dashes() {
        let mut game = game();
        game.metacritic = None;
        assert!(recommendation_text(&game).contains("META --"));
    }
}
