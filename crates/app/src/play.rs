//! Line-based answering of a quiz session on the terminal.

use std::io::{self, BufRead, Write};

use quiz_core::model::{StatementId, TruthAnswer};
use quiz_core::time::format_elapsed;
use services::quiz::QuizSession;

/// Ask every question of `session` on `out`, reading one answer per line from `input`.
///
/// Unrecognised answers leave the question or statement unanswered. Stops early
/// at end of input.
pub fn answer_session(
    session: &mut QuizSession,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<()> {
    for index in 0..session.len() {
        let more = if session.choice_question(index).is_some() {
            ask_choice(session, index, input, out)?
        } else {
            ask_statements(session, index, input, out)?
        };
        if !more {
            break;
        }
    }
    Ok(())
}

/// One-line result shown before the score is submitted.
pub fn summary(session: &QuizSession) -> String {
    format!(
        "{}/{} answered, score {:.0} in {}",
        session.answered_count(),
        session.len(),
        session.score().percent(),
        format_elapsed(session.elapsed())
    )
}

fn read_answer(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

fn ask_choice(
    session: &mut QuizSession,
    index: usize,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<bool> {
    let Some(question) = session.choice_question(index) else {
        return Ok(true);
    };
    writeln!(out, "{}. {}", index + 1, question.text())?;
    for option in question.options() {
        writeln!(out, "   {}) {}", option.id, option.text)?;
    }
    write!(out, "> ")?;
    out.flush()?;

    let Some(raw) = read_answer(input)? else {
        return Ok(false);
    };
    let chosen = question
        .options()
        .iter()
        .find(|o| o.id.to_string().eq_ignore_ascii_case(&raw))
        .map(|o| o.id.clone());
    match chosen {
        Some(option) => session
            .select_option(index, option)
            .map_err(io::Error::other)?,
        None => writeln!(out, "   no option {raw:?}; left unanswered")?,
    }
    Ok(true)
}

fn ask_statements(
    session: &mut QuizSession,
    index: usize,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<bool> {
    let Some(set) = session.true_false_set(index) else {
        return Ok(true);
    };
    writeln!(out, "{}. {}", index + 1, set.passage())?;
    let statements: Vec<(StatementId, String)> = set
        .statements()
        .map(|(id, text)| (id.clone(), text.to_owned()))
        .collect();

    for (id, text) in statements {
        write!(out, "   {id}) {text} [Đúng/Sai] ")?;
        out.flush()?;
        let Some(raw) = read_answer(input)? else {
            return Ok(false);
        };
        match raw.parse::<TruthAnswer>() {
            Ok(answer) => session
                .set_statement(index, id, answer)
                .map_err(io::Error::other)?,
            Err(err) => writeln!(out, "   {err}; left unanswered")?,
        }
    }
    Ok(true)
}
