//! The interactive practice loop: one question per prompt, answers typed on
//! input, feedback written to output.

use std::io::{self, Write};

use practice_engine::audio::autoplay_enabled;
use practice_engine::{
    AudioPlayback, AudioSource, Chooser, Clock, Grade, ItemStore, Level, Prompt, Session,
    SessionStats,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const HELP: &str = "Type your answer, or :listen to hear the item, :skip to move on, :quit to stop.";

/// Drill until the input ends, the learner quits, or nothing is left to ask.
pub async fn run_drill<S, R, C, I, O>(
    session: &mut Session<S, R, C>,
    input: I,
    out: &mut O,
) -> anyhow::Result<SessionStats>
where
    S: ItemStore,
    R: Chooser,
    C: Clock,
    I: AsyncBufRead + Unpin,
    O: Write,
{
    let mut lines = input.lines();
    writeln!(out, "{HELP}")?;

    'questions: loop {
        let Some(config) = session.current_config() else {
            writeln!(out, "Nothing left to practice.")?;
            break;
        };
        let level = config.level;
        let autoplay = autoplay_enabled(config);
        let mut playback = AudioPlayback::new(config);

        let Some(prompt) = session.prompt() else {
            break;
        };
        render_prompt(&prompt, level, out)?;
        if autoplay {
            play(&prompt, &mut playback, out)?;
        }

        let grade = loop {
            write!(out, "> ")?;
            out.flush()?;
            let Some(line) = lines.next_line().await? else {
                break 'questions;
            };
            let Some(prompt) = session.prompt() else {
                break 'questions;
            };
            match line.trim() {
                "" => continue,
                ":quit" => break 'questions,
                ":skip" => {
                    session.skip()?;
                    continue 'questions;
                }
                ":listen" => play(&prompt, &mut playback, out)?,
                answer => {
                    let grade = prompt.grade(answer);
                    report_grade(&prompt, grade, out)?;
                    break grade;
                }
            }
        };

        let report = session.submit_answer(grade.is_correct()).await?;
        for failure in &report.persist_failures {
            writeln!(
                out,
                "  (progress for {} not saved yet: {})",
                failure.key, failure.error
            )?;
        }
    }

    let stats = session.stats();
    writeln!(
        out,
        "Practiced {} items: {} correct, {} incorrect ({}% accuracy)",
        stats.total_practiced,
        stats.correct,
        stats.incorrect,
        stats.accuracy_percent()
    )?;
    Ok(stats)
}

fn render_prompt(prompt: &Prompt<'_>, level: Level, out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "[level {level}] {} -> {}",
        prompt.shown_language, prompt.answer_language
    )?;
    match prompt.visible_text() {
        Some(text) => writeln!(out, "  {text}")?,
        None => writeln!(
            out,
            "  (audio only: type the {} translation)",
            prompt.answer_language
        )?,
    }
    if let Some(plural) = prompt.plural_hint {
        writeln!(out, "  plural: {plural}")?;
    }
    if let Some(example) = prompt.example {
        writeln!(out, "  e.g. {example}")?;
    }
    Ok(())
}

fn play(prompt: &Prompt<'_>, playback: &mut AudioPlayback, out: &mut impl Write) -> io::Result<()> {
    if !playback.try_play() {
        return writeln!(out, "  (no plays left)");
    }
    match AudioSource::for_prompt(prompt) {
        AudioSource::Recording { url } => writeln!(out, "  ♪ {url}"),
        AudioSource::Synthesized { text, locale } => writeln!(out, "  ♪ [{locale}] {text}"),
    }
}

fn report_grade(prompt: &Prompt<'_>, grade: Grade, out: &mut impl Write) -> io::Result<()> {
    match grade {
        Grade::Correct => writeln!(out, "Correct!"),
        Grade::CorrectPlural => writeln!(out, "Correct! (plural form)"),
        Grade::Incorrect => writeln!(out, "Incorrect. The answer was: {}", prompt.expected_answer),
    }
}
