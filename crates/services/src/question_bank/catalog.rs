use prep_core::model::{Question, QuestionId};

struct Entry {
    prompt: &'static str,
    options: [&'static str; 4],
    answer: &'static str,
    subject: &'static str,
    hint: &'static str,
    explanation: &'static str,
}

const ENTRIES: &[Entry] = &[
    Entry {
        prompt: "In \"The wind whispered through the trees\", which figure of speech is used?",
        options: ["Metaphor", "Personification", "Hyperbole", "Irony"],
        answer: "Personification",
        subject: "Portuguese",
        hint: "Can wind really whisper?",
        explanation: "Human actions are given to something non-human. Example: \"the sun smiled\".",
    },
    Entry {
        prompt: "Which sentence follows standard verb agreement?",
        options: [
            "There was many people at the fair.",
            "Many people was at the fair.",
            "There were many people at the fair.",
            "Many people is at the fair.",
        ],
        answer: "There were many people at the fair.",
        subject: "Portuguese",
        hint: "Find the real subject of the verb.",
        explanation: "The verb agrees with the plural subject \"many people\". Example: \"the students were late\".",
    },
    Entry {
        prompt: "A shirt costs 80.00 and is on a 15% discount. What is the new price?",
        options: ["65.00", "68.00", "70.00", "72.00"],
        answer: "68.00",
        subject: "Mathematics",
        hint: "Compute 15% of 80 first.",
        explanation: "15% of 80 is 12, and 80 - 12 = 68. Example: 10% off 50 leaves 45.",
    },
    Entry {
        prompt: "A right triangle has legs of 6 cm and 8 cm. How long is the hypotenuse?",
        options: ["10 cm", "12 cm", "14 cm", "48 cm"],
        answer: "10 cm",
        subject: "Mathematics",
        hint: "a² + b² = c².",
        explanation: "36 + 64 = 100 and the square root of 100 is 10. Example: legs 3 and 4 give 5.",
    },
    Entry {
        prompt: "If 3 workers build a wall in 12 days, how long do 6 workers take at the same pace?",
        options: ["24 days", "9 days", "6 days", "4 days"],
        answer: "6 days",
        subject: "Mathematics",
        hint: "More workers, fewer days: the quantities are inversely proportional.",
        explanation: "Doubling the workers halves the time. Example: 2 taps fill a tank twice as fast as 1.",
    },
    Entry {
        prompt: "Which event marked the end of the monarchy in Brazil?",
        options: [
            "Independence in 1822",
            "Proclamation of the Republic in 1889",
            "Abolition of slavery in 1888",
            "The 1930 Revolution",
        ],
        answer: "Proclamation of the Republic in 1889",
        subject: "History",
        hint: "The emperor was sent into exile.",
        explanation: "On 15 November 1889 the republic replaced the empire of Pedro II.",
    },
    Entry {
        prompt: "What was the main economic activity of colonial Brazil in the 16th century?",
        options: ["Coffee", "Rubber", "Sugar cane", "Cotton"],
        answer: "Sugar cane",
        subject: "History",
        hint: "Think of the mills on the northeastern coast.",
        explanation: "Sugar mills in the Northeast dominated the early colonial economy.",
    },
    Entry {
        prompt: "Which Brazilian biome has the largest area?",
        options: ["Cerrado", "Caatinga", "Amazon", "Pampa"],
        answer: "Amazon",
        subject: "Geography",
        hint: "It spans several northern states.",
        explanation: "The Amazon covers almost half of the national territory.",
    },
    Entry {
        prompt: "Which organelle is responsible for cellular respiration?",
        options: ["Ribosome", "Mitochondrion", "Golgi apparatus", "Lysosome"],
        answer: "Mitochondrion",
        subject: "Biology",
        hint: "It is often called the powerhouse of the cell.",
        explanation: "Mitochondria turn glucose and oxygen into usable energy (ATP).",
    },
    Entry {
        prompt: "A car travels 150 km in 2 hours. What is its average speed?",
        options: ["60 km/h", "75 km/h", "80 km/h", "300 km/h"],
        answer: "75 km/h",
        subject: "Physics",
        hint: "Speed is distance over time.",
        explanation: "150 / 2 = 75. Example: 100 km in 4 hours is 25 km/h.",
    },
    Entry {
        prompt: "Which of these is a chemical change?",
        options: ["Melting ice", "Boiling water", "Burning paper", "Breaking glass"],
        answer: "Burning paper",
        subject: "Chemistry",
        hint: "Which one produces a new substance?",
        explanation: "Combustion forms new substances such as ash and carbon dioxide.",
    },
    Entry {
        prompt: "What is the chemical symbol for sodium?",
        options: ["S", "So", "Na", "Sd"],
        answer: "Na",
        subject: "Chemistry",
        hint: "It comes from the Latin name natrium.",
        explanation: "Sodium's symbol Na comes from the Latin natrium.",
    },
];

/// The built-in question set used for daily quizzes.
pub(super) fn builtin_questions() -> Vec<Question> {
    ENTRIES
        .iter()
        .zip(1_u64..)
        .filter_map(|(entry, id)| {
            Question::new(
                QuestionId::new(id),
                entry.prompt,
                entry.options.map(String::from),
                entry.answer,
                entry.subject,
            )
            .map(|q| q.with_hint(entry.hint).with_explanation(entry.explanation))
            .inspect_err(|err| log::warn!("skipping built-in question {id}: {err}"))
            .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_is_valid() {
        assert_eq!(builtin_questions().len(), ENTRIES.len());
    }

    #[test]
    fn ids_are_unique() {
        let questions = builtin_questions();
        let mut ids: Vec<_> = questions.iter().map(Question::id).collect();
        ids.dedup();
        assert_eq!(ids.len(), questions.len());
    }
}
