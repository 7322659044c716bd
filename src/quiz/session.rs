use super::{AnswerMap, Question, QuizPosition, QUESTIONS};
use crate::rawg::{FetchError, GameRecommendation};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("expected an answer for '{expected}', got one for '{got}'")]
    InvalidSequence { expected: &'static str, got: String },
    #[error("'{option}' is not an option of '{question}'")]
    UnknownOption {
        question: &'static str,
        option: String,
    },
    #[error("the quiz is not waiting for an answer")]
    NotInProgress,
    #[error("recommendations are still being fetched")]
    FetchInFlight,
    #[error("there is no failed search to retry")]
    NothingToRetry,
}

/// What the caller has to do after an answer was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Show the question at this index.
    Next(usize),
    /// Every question is answered, run the search for the ticket.
    Fetch(FetchTicket),
}

/// A pending catalog search. The generation ties the result back to the
/// session that asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub answers: AnswerMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Completed,
    Failed(FetchError),
    /// The session was restarted (or the result already applied) while the
    /// search was running, the result was dropped.
    Stale,
}

/// State of one quiz run in one chat.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuizSession {
    position: QuizPosition,
    answers: AnswerMap,
    recommendations: Option<Vec<GameRecommendation>>,
    error: Option<FetchError>,
    generation: u64,
    in_flight: Option<u64>,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the first question with nothing answered. Any search still
    /// running for the previous run is ignored when it completes.
    pub fn start(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.position = QuizPosition::InProgress(0);
        self.answers.clear();
        self.recommendations = None;
        self.error = None;
        self.in_flight = None;
    }

    pub fn select_option(&mut self, question_id: &str, option_id: &str) -> Result<Step, QuizError> {
        if self.in_flight.is_some() {
            return Err(QuizError::FetchInFlight);
        }
        let index = match self.position {
            QuizPosition::InProgress(index) => index,
            QuizPosition::NotStarted | QuizPosition::Completed => {
                return Err(QuizError::NotInProgress)
            }
        };

        let question = &QUESTIONS[index];
        if question.id != question_id {
            return Err(QuizError::InvalidSequence {
                expected: question.id,
                got: question_id.to_string(),
            });
        }
        if question.option_by_id(option_id).is_none() {
            return Err(QuizError::UnknownOption {
                question: question.id,
                option: option_id.to_string(),
            });
        }

        self.answers.insert(question.id, option_id);

        if index + 1 < QUESTIONS.len() {
            self.position = QuizPosition::InProgress(index + 1);
            Ok(Step::Next(index + 1))
        } else {
            // Stays on the last question until the search succeeds.
            Ok(Step::Fetch(self.begin_fetch()))
        }
    }

    /// Runs the last search again with the same answers.
    pub fn retry(&mut self) -> Result<FetchTicket, QuizError> {
        if self.in_flight.is_some() {
            return Err(QuizError::FetchInFlight);
        }
        if self.error.is_none() || !self.answers.is_complete() {
            return Err(QuizError::NothingToRetry);
        }
        Ok(self.begin_fetch())
    }

    fn begin_fetch(&mut self) -> FetchTicket {
        self.error = None;
        self.in_flight = Some(self.generation);
        FetchTicket {
            generation: self.generation,
            answers: self.answers.clone(),
        }
    }

    pub fn finish_fetch(
        &mut self,
        generation: u64,
        result: Result<Vec<GameRecommendation>, FetchError>,
    ) -> FetchOutcome {
        if self.in_flight != Some(generation) {
            return FetchOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(recommendations) if !recommendations.is_empty() => {
                self.position = QuizPosition::Completed;
                self.recommendations = Some(recommendations);
                FetchOutcome::Completed
            }
            Ok(_) => self.fail(FetchError::NoMatches),
            Err(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: FetchError) -> FetchOutcome {
        self.position = QuizPosition::InProgress(QUESTIONS.len() - 1);
        self.recommendations = None;
        self.error = Some(err.clone());
        FetchOutcome::Failed(err)
    }

    pub fn position(&self) -> QuizPosition {
        self.position
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn current_question(&self) -> Option<&'static Question> {
        match self.position {
            QuizPosition::InProgress(index) => QUESTIONS.get(index),
            _ => None,
        }
    }

    /// 1-based number of the current question and the question count.
    pub fn progress(&self) -> Option<(usize, usize)> {
        match self.position {
            QuizPosition::InProgress(index) => Some((index + 1, QUESTIONS.len())),
            _ => None,
        }
    }

    pub fn recommendations(&self) -> Option<&[GameRecommendation]> {
        self.recommendations.as_deref()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }
}
