use std::sync::Arc;

use dotenv::dotenv;
use game_finder_bot::config::Config;
use game_finder_bot::messages::{self, RESTART_BUTTON, RETRY_BUTTON, START_BUTTON};
use game_finder_bot::quiz::{
    self,
    session::{FetchOutcome, FetchTicket, QuizSession, Step},
};
use game_finder_bot::rawg::{FetchError, GameRecommendation, RawgClient};
use teloxide::{
    dispatching::dialogue::InMemStorage,
    prelude::*,
    types::{ChatAction, ChatId, KeyboardButton, KeyboardMarkup, KeyboardRemove, ParseMode},
};

type QuizDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default)]
pub enum State {
    #[default]
    Start,
    InQuiz(QuizSession),
}

#[tokio::main]
async fn main() {
    let dotenv_result = dotenv();
    pretty_env_logger::init();
    if let Err(err) = dotenv_result {
        log::warn!("No .env file loaded ({}), using the process environment", err);
    }
    log::info!("Starting game finder bot...");

    let config = Config::from_env();
    let rawg = match RawgClient::new(&config) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            log::error!("Failed to build the RAWG http client: {}", err);
            return;
        }
    };

    let bot = Bot::from_env();

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::InQuiz(session)].endpoint(in_quiz)),
    )
    .dependencies(dptree::deps![
        InMemStorage::<State>::new(),
        rawg,
        Arc::new(config)
    ])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

async fn start(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    if msg.text() == Some(START_BUTTON) {
        return restart(&bot, &dialogue, msg.chat.id, QuizSession::new()).await;
    }

    bot.send_message(msg.chat.id, messages::GREETING_TEXT)
        .parse_mode(ParseMode::Html)
        .reply_markup(single_button(START_BUTTON))
        .await?;
    Ok(())
}

async fn in_quiz(
    bot: Bot,
    dialogue: QuizDialogue,
    mut session: QuizSession,
    msg: Message,
    rawg: Arc<RawgClient>,
    config: Arc<Config>,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let text = match msg.text() {
        Some(text) => text,
        None => {
            bot.send_message(chat_id, messages::PICK_AN_OPTION_TEXT).await?;
            return Ok(());
        }
    };

    // Restart always works, a search still running for the old run is
    // dropped by its generation when it lands.
    if matches!(text, "/start" | START_BUTTON | RESTART_BUTTON) {
        return restart(&bot, &dialogue, chat_id, session).await;
    }
    if session.is_loading() {
        bot.send_message(chat_id, messages::BUSY_TEXT).await?;
        return Ok(());
    }

    if text == RETRY_BUTTON {
        return match session.retry() {
            Ok(ticket) => run_search(&bot, &dialogue, chat_id, session, ticket, &rawg).await,
            Err(err) => {
                log::debug!("Ignoring retry in chat {}: {}", chat_id, err);
                send_current_screen(&bot, chat_id, &session).await
            }
        };
    }

    let Some(question) = session.current_question() else {
        bot.send_message(chat_id, messages::FINISHED_TEXT)
            .reply_markup(single_button(RESTART_BUTTON))
            .await?;
        return Ok(());
    };
    let Some(option) = question.option_by_label(text) else {
        bot.send_message(chat_id, messages::PICK_AN_OPTION_TEXT)
            .reply_markup(question_keyboard(
                question,
                session.error().is_some_and(|err| err.is_retryable()),
            ))
            .await?;
        return Ok(());
    };

    match session.select_option(question.id, option.id) {
        Ok(Step::Next(_)) => {
            dialogue.update(State::InQuiz(session.clone())).await?;
            if !config.selection_delay.is_zero() {
                tokio::time::sleep(config.selection_delay).await;
            }
            send_current_screen(&bot, chat_id, &session).await
        }
        Ok(Step::Fetch(ticket)) => run_search(&bot, &dialogue, chat_id, session, ticket, &rawg).await,
        Err(err) => {
            log::warn!("Rejected answer in chat {}: {}", chat_id, err);
            send_current_screen(&bot, chat_id, &session).await
        }
    }
}

async fn restart(
    bot: &Bot,
    dialogue: &QuizDialogue,
    chat_id: ChatId,
    mut session: QuizSession,
) -> HandlerResult {
    session.start();
    dialogue.update(State::InQuiz(session.clone())).await?;
    send_current_screen(bot, chat_id, &session).await
}

/// The one network round trip of a quiz run. The loading state is stored
/// first and the request runs in its own task, so the chat keeps taking
/// updates (a restart, or "still searching" replies) while it is in flight.
async fn run_search(
    bot: &Bot,
    dialogue: &QuizDialogue,
    chat_id: ChatId,
    session: QuizSession,
    ticket: FetchTicket,
    rawg: &Arc<RawgClient>,
) -> HandlerResult {
    dialogue.update(State::InQuiz(session)).await?;

    bot.send_message(chat_id, messages::LOADING_TEXT)
        .reply_markup(KeyboardRemove::new())
        .await?;
    if let Err(err) = bot.send_chat_action(chat_id, ChatAction::Typing).await {
        log::debug!("Typing action for chat {} failed: {}", chat_id, err);
    }

    let bot = bot.clone();
    let dialogue = dialogue.clone();
    let rawg = Arc::clone(rawg);
    tokio::spawn(async move {
        let result = rawg.recommend(&ticket.answers).await;
        let outcome = match apply_search_result(&dialogue, ticket.generation, result).await {
            Ok(Some(session)) => send_current_screen(&bot, chat_id, &session).await,
            Ok(None) => Ok(()),
            Err(err) => Err(err),
        };
        if let Err(err) = outcome {
            log::error!("Failed to deliver search result to chat {}: {}", chat_id, err);
        }
    });
    Ok(())
}

/// Applies a finished search to the session stored for the chat right now.
/// Returns the updated session, or `None` when the result belongs to a run
/// that was restarted in the meantime.
async fn apply_search_result(
    dialogue: &QuizDialogue,
    generation: u64,
    result: Result<Vec<GameRecommendation>, FetchError>,
) -> Result<Option<QuizSession>, Box<dyn std::error::Error + Send + Sync>> {
    let chat_id = dialogue.chat_id();
    let mut session = match dialogue.get().await? {
        Some(State::InQuiz(session)) => session,
        _ => {
            log::debug!("Dropping search result for chat {}, quiz is gone", chat_id);
            return Ok(None);
        }
    };

    match session.finish_fetch(generation, result) {
        FetchOutcome::Completed => {
            log::info!("Sent recommendations to chat {}", chat_id);
        }
        FetchOutcome::Failed(err) => {
            log::warn!("Search for chat {} failed: {}", chat_id, err);
        }
        FetchOutcome::Stale => {
            log::debug!("Dropping stale search result for chat {}", chat_id);
            return Ok(None);
        }
    }

    dialogue.update(State::InQuiz(session.clone())).await?;
    Ok(Some(session))
}

/// Renders whatever the session is showing right now: the results, or the
/// current question preceded by the last search error.
async fn send_current_screen(bot: &Bot, chat_id: ChatId, session: &QuizSession) -> HandlerResult {
    if let Some(recommendations) = session.recommendations() {
        bot.send_message(chat_id, messages::results_header(recommendations.len()))
            .parse_mode(ParseMode::Html)
            .await?;
        for game in recommendations {
            bot.send_message(chat_id, messages::recommendation_text(game))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        bot.send_message(chat_id, messages::FINISHED_TEXT)
            .reply_markup(single_button(RESTART_BUTTON))
            .await?;
        return Ok(());
    }

    // After a failed search the last question stays up, so the answer can be
    // changed or the same search retried.
    let can_retry = session.error().is_some_and(|err| err.is_retryable());
    if let Some(err) = session.error() {
        bot.send_message(chat_id, messages::error_text(err))
            .parse_mode(ParseMode::Html)
            .await?;
    }

    if let (Some(question), Some((number, total))) = (session.current_question(), session.progress()) {
        bot.send_message(chat_id, messages::question_text(question, number, total))
            .parse_mode(ParseMode::Html)
            .reply_markup(question_keyboard(question, can_retry))
            .await?;
    }
    Ok(())
}

/// One option per row, then the retry button when it applies and the restart.
fn question_keyboard(question: &quiz::Question, with_retry: bool) -> KeyboardMarkup {
    let mut rows: Vec<Vec<KeyboardButton>> = question
        .options
        .iter()
        .map(|o| vec![KeyboardButton::new(o.label)])
        .collect();
    if with_retry {
        rows.push(vec![KeyboardButton::new(RETRY_BUTTON)]);
    }
    rows.push(vec![KeyboardButton::new(RESTART_BUTTON)]);

    KeyboardMarkup::new(rows).resize_keyboard(true)
}

fn single_button(label: &str) -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(label)]]).resize_keyboard(true)
}
