//! Small built-in question bank used when no question server is configured.

use std::collections::BTreeMap;

use rand::RngCore;

use quiz_core::model::{RawMultipleChoice, RawQuestions, RawTrueFalse};

use crate::quiz::source::StaticQuestionSource;

fn choice(text: &str, options: [&str; 4], correct: &str) -> RawMultipleChoice {
    RawMultipleChoice {
        question_text: text.to_owned(),
        options: ["A", "B", "C", "D"]
            .into_iter()
            .zip(options)
            .map(|(key, label)| (key.to_owned(), label.to_owned()))
            .collect(),
        correct_answer: correct.to_owned(),
    }
}

fn statements(passage: &str, items: &[(&str, &str, bool)]) -> RawTrueFalse {
    let mut texts = BTreeMap::new();
    let mut truth = BTreeMap::new();
    for (key, text, value) in items {
        texts.insert((*key).to_owned(), (*text).to_owned());
        truth.insert((*key).to_owned(), *value);
    }
    RawTrueFalse {
        question: passage.to_owned(),
        statements: texts,
        answer_boolean_map: truth,
        explanation_map: BTreeMap::new(),
    }
}

/// Built-in bank covering every category of the default catalog.
#[must_use]
pub fn builtin_source(rng: impl RngCore + Send + 'static) -> StaticQuestionSource {
    StaticQuestionSource::new(rng)
        .with_category(
            "founding",
            RawQuestions::MultipleChoice(vec![
                choice(
                    "Which legendary dynasty is traditionally credited with founding the first Vietnamese state?",
                    ["Hồng Bàng", "Lý", "Trần", "Nguyễn"],
                    "A",
                ),
                choice(
                    "What was the name of the state ruled by the Hùng kings?",
                    ["Đại Việt", "Văn Lang", "Champa", "Phù Nam"],
                    "B",
                ),
                choice(
                    "Which king founded Âu Lạc?",
                    ["Lý Bí", "Ngô Quyền", "An Dương Vương", "Đinh Bộ Lĩnh"],
                    "C",
                ),
            ]),
        )
        .with_category(
            "dynasties",
            RawQuestions::MultipleChoice(vec![
                choice(
                    "Who won the Battle of Bạch Đằng in 938?",
                    ["Trần Hưng Đạo", "Lê Lợi", "Quang Trung", "Ngô Quyền"],
                    "D",
                ),
                choice(
                    "Which dynasty moved the capital to Thăng Long in 1010?",
                    ["Lý", "Trần", "Hồ", "Lê"],
                    "A",
                ),
                choice(
                    "Which dynasty repelled three Mongol invasions?",
                    ["Lý", "Trần", "Mạc", "Tây Sơn"],
                    "B",
                ),
            ]),
        )
        .with_category(
            "modern",
            RawQuestions::MultipleChoice(vec![
                choice(
                    "In which year was the Declaration of Independence read in Ba Đình Square?",
                    ["1930", "1945", "1954", "1975"],
                    "B",
                ),
                choice(
                    "Which battle ended French rule in Indochina in 1954?",
                    ["Điện Biên Phủ", "Khe Sanh", "Ấp Bắc", "Huế"],
                    "A",
                ),
                choice(
                    "In which year did the Đổi Mới reforms begin?",
                    ["1976", "1979", "1986", "1995"],
                    "C",
                ),
            ]),
        )
        .with_category(
            "truefalse",
            RawQuestions::TrueFalse(vec![
                statements(
                    "Lý Thái Tổ issued the Edict on the Transfer of the Capital and moved the court to Đại La, renamed Thăng Long.",
                    &[
                        ("a", "The capital moved in 1010.", true),
                        ("b", "The previous capital was Huế.", false),
                        ("c", "Thăng Long means 'rising dragon'.", true),
                        ("d", "The edict was issued by the Trần dynasty.", false),
                    ],
                ),
                statements(
                    "The Tây Sơn brothers rose in the late eighteenth century; Nguyễn Huệ later reigned as Emperor Quang Trung.",
                    &[
                        ("a", "Quang Trung defeated a Qing army in 1789.", true),
                        ("b", "The uprising began in the twentieth century.", false),
                        ("c", "There were three Tây Sơn brothers.", true),
                        ("d", "Quang Trung founded the Lý dynasty.", false),
                    ],
                ),
                statements(
                    "In 1428 Lê Lợi ended the Ming occupation after the Lam Sơn uprising and founded the Later Lê dynasty.",
                    &[
                        ("a", "The Lam Sơn uprising lasted about ten years.", true),
                        ("b", "Lê Lợi fought against the Mongols.", false),
                        ("c", "Nguyễn Trãi wrote the Bình Ngô đại cáo.", true),
                        ("d", "The Later Lê dynasty was founded in 1802.", false),
                    ],
                ),
                statements(
                    "Ngô Quyền defeated the Southern Han fleet on the Bạch Đằng River by planting iron-tipped stakes in the riverbed.",
                    &[
                        ("a", "The battle took place in 938.", true),
                        ("b", "The stakes were revealed at high tide.", false),
                        ("c", "The victory ended a long period of Chinese rule.", true),
                        ("d", "Ngô Quyền was a Nguyễn emperor.", false),
                    ],
                ),
                statements(
                    "The Nguyễn dynasty was founded by Gia Long, who made Huế the capital of a unified country.",
                    &[
                        ("a", "Gia Long took the throne in 1802.", true),
                        ("b", "The Nguyễn capital was Thăng Long.", false),
                        ("c", "The Nguyễn was the last imperial dynasty.", true),
                        ("d", "Gia Long ruled before the Lý dynasty.", false),
                    ],
                ),
            ]),
        )
}
