pub mod session;

pub const PLATFORM: &str = "platform";
pub const BUDGET: &str = "budget";
pub const GENRE: &str = "genre";
pub const PLAYTIME: &str = "playtime";
pub const VIBE: &str = "vibe";

/// A single question of the game finder quiz. The catalog is static and
/// never mutated, so everything is borrowed for `'static`.
#[derive(Debug, PartialEq, Eq)]
pub struct Question {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub options: &'static [QuizOption],
}

impl Question {
    pub fn option_by_id(&self, id: &str) -> Option<&'static QuizOption> {
        self.options.iter().find(|o| o.id == id)
    }

    /// The chat keyboard sends back the label of the pressed button, not the id.
    pub fn option_by_label(&self, label: &str) -> Option<&'static QuizOption> {
        self.options.iter().find(|o| o.label == label)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct QuizOption {
    /// Doubles as the semantic value stored in the [`AnswerMap`].
    pub id: &'static str,
    pub label: &'static str,
}

pub static QUESTIONS: [Question; 5] = [
    Question {
        id: PLATFORM,
        title: "Onde você joga?",
        subtitle: "Escolha sua plataforma principal",
        options: &[
            QuizOption { id: "PC", label: "PC" },
            QuizOption { id: "PlayStation", label: "PlayStation" },
            QuizOption { id: "Xbox", label: "Xbox" },
            QuizOption { id: "Nintendo Switch", label: "Switch" },
            QuizOption { id: "Mobile", label: "Celular" },
        ],
    },
    Question {
        id: BUDGET,
        title: "Como tá o bolso?",
        subtitle: "Defina seu orçamento para o próximo jogo",
        options: &[
            QuizOption { id: "Grátis", label: "Tô liso (Grátis)" },
            QuizOption { id: "Barato", label: "Economizando (Indies/Promo)" },
            QuizOption { id: "Preço Cheio", label: "Posso gastar (AAA/Lançamentos)" },
        ],
    },
    Question {
        id: GENRE,
        title: "Qual estilo te atrai?",
        subtitle: "Escolha o gênero que mais combina com seu humor hoje",
        options: &[
            QuizOption { id: "Ação e Aventura", label: "Ação / Aventura" },
            QuizOption { id: "RPG", label: "RPG" },
            QuizOption { id: "Tiro / FPS", label: "Tiro / FPS" },
            QuizOption { id: "Estratégia", label: "Estratégia" },
            QuizOption { id: "Esportes e Corrida", label: "Esportes / Corrida" },
            QuizOption { id: "Puzzle e Casual", label: "Puzzle / Casual" },
        ],
    },
    // Collected but not used by the catalog query yet.
    Question {
        id: PLAYTIME,
        title: "Quanto tempo você tem?",
        subtitle: "Duração ideal das suas sessões de jogo",
        options: &[
            QuizOption { id: "Partidas Rápidas", label: "Partidas rápidas (15-30 min)" },
            QuizOption { id: "Algumas Horas", label: "Algumas horas (Fim de semana)" },
            QuizOption { id: "Infinito", label: "Quero perder a vida social" },
        ],
    },
    Question {
        id: VIBE,
        title: "Qual a vibe de hoje?",
        subtitle: "O que você quer sentir jogando?",
        options: &[
            QuizOption { id: "Relaxar", label: "Só quero relaxar" },
            QuizOption { id: "Competir", label: "Competição acirrada" },
            QuizOption { id: "História", label: "História envolvente" },
            QuizOption { id: "Desafio", label: "Desafio extremo (Soulslike)" },
        ],
    },
];

pub fn question(id: &str) -> Option<&'static Question> {
    QUESTIONS.iter().find(|q| q.id == id)
}

/// Answers collected so far, keyed by question id. Keeps the order in which
/// the questions were answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnswerMap {
    entries: Vec<(String, String)>,
}

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, question_id: &str, option_id: &str) {
        match self.entries.iter_mut().find(|(q, _)| q.as_str() == question_id) {
            Some((_, option)) => *option = option_id.to_string(),
            None => self
                .entries
                .push((question_id.to_string(), option_id.to_string())),
        }
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(q, _)| q.as_str() == question_id)
            .map(|(_, o)| o.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(q, _)| q.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        QUESTIONS.iter().all(|q| self.get(q.id).is_some())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<Q: AsRef<str>, O: AsRef<str>> FromIterator<(Q, O)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (Q, O)>>(iter: I) -> Self {
        let mut answers = AnswerMap::new();
        for (question_id, option_id) in iter {
            answers.insert(question_id.as_ref(), option_id.as_ref());
        }
        answers
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum QuizPosition {
    #[default]
    NotStarted,
    InProgress(usize),
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique_and_ordered() {
        let ids: Vec<_> = QUESTIONS.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![PLATFORM, BUDGET, GENRE, PLAYTIME, VIBE]);
    }

    #[test]
    fn option_lookup_by_label_returns_semantic_id() {
        let platform = question(PLATFORM).unwrap();
        assert_eq!(platform.option_by_label("Celular").unwrap().id, "Mobile");
        assert_eq!(platform.option_by_id("Nintendo Switch").unwrap().label, "Switch");
        assert!(platform.option_by_label("Mobile").is_none());
    }

    #[test]
    fn answer_map_replaces_in_place() {
        let mut answers = AnswerMap::new();
        answers.insert(PLATFORM, "PC");
        answers.insert(BUDGET, "Barato");
        answers.insert(PLATFORM, "Xbox");

        assert_eq!(answers.len(), 2);
        assert_eq!(answers.get(PLATFORM), Some("Xbox"));
        assert_eq!(answers.keys().collect::<Vec<_>>(), vec![PLATFORM, BUDGET]);
        assert!(!answers.is_complete());
    }
}
