pub mod query;
pub mod shaper;

use reqwest::Client;

use crate::config::Config;
use crate::quiz::AnswerMap;
use query::RecommendationQuery;

/// A game picked for the user, ready to be shown in the chat.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GameRecommendation {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub metacritic: Option<u32>,
    pub image: String,
    pub genre: String,
    pub released: Option<String>,
}

/// Body of `GET /games`. Only the fields the bot reads are decoded.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct RawgResponse {
    #[serde(default)]
    pub results: Vec<RawgGame>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawgGame {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub released: Option<String>,
    #[serde(default)]
    pub metacritic: Option<u32>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<RawgGenre>>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawgGenre {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum FetchError {
    #[error("RAWG_API_KEY is not configured")]
    MissingCredential,
    #[error("RAWG request failed: {0}")]
    FetchFailed(String),
    #[error("RAWG returned no games for these answers")]
    NoMatches,
}

impl FetchError {
    /// Only a missing credential needs an operator, everything else can be
    /// retried from the chat.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::MissingCredential)
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::MissingCredential => "A chave da API RAWG não está configurada! Por favor, adicione RAWG_API_KEY nas variáveis de ambiente.",
            FetchError::FetchFailed(_) => "Ops! Tivemos um problema de conexão com o banco de dados de jogos. Tente novamente.",
            FetchError::NoMatches => "Não encontramos jogos exatos para essa combinação tão específica. Tente mudar alguma resposta!",
        }
    }
}

// The request url carries `key=...`, so it is dropped before the error can
// reach a log line.
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::FetchFailed(err.without_url().to_string())
    }
}

pub struct RawgClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RawgClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            http,
            base_url: config.rawg_base_url.trim_end_matches('/').to_string(),
            api_key: config.rawg_api_key.clone(),
        })
    }

    /// Runs the catalog search for a complete set of answers and samples the
    /// recommendations out of it.
    pub async fn recommend(
        &self,
        answers: &AnswerMap,
    ) -> Result<Vec<GameRecommendation>, FetchError> {
        let candidates = self.search(answers).await?;
        log::debug!("RAWG returned {} candidates", candidates.len());

        Ok(shaper::shape(candidates, answers, &mut rand::thread_rng()))
    }

    async fn search(&self, answers: &AnswerMap) -> Result<Vec<RawgGame>, FetchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(FetchError::MissingCredential)?;
        let query = RecommendationQuery::build(answers, api_key);
        log::info!("Searching RAWG games with {}", query);

        let response = self
            .http
            .get(format!("{}/games", self.base_url))
            .query(&query.params())
            .send()
            .await?
            .error_for_status()?;
        let body: RawgResponse = response.json().await?;

        if body.results.is_empty() {
            return Err(FetchError::NoMatches);
        }
        Ok(body.results)
    }
}
