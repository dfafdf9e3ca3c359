use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, email: &str, format: &OutputFormat) -> Result<()> {
    let user = app
        .db
        .find_user_by_email(email)?
        .with_context(|| format!("No user with email '{}'", email))?;
    let stats = app.db.dashboard_stats(user.id)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            let progress = &stats.progress;
            println!("{} <{}>", user.name, user.email);
            println!(
                "Page {}/{}, {} of {} words completed",
                progress.current_page,
                progress.total_pages,
                progress.words_completed,
                progress.total_words
            );
            println!(
                "Answered {} words: {} known, {} unknown ({}% accuracy)",
                stats.word_stats.total_answered,
                stats.word_stats.known_words,
                stats.word_stats.unknown_words,
                stats.accuracy
            );

            if !stats.lesson_stats.is_empty() {
                println!("\nLesson  Known/Answered");
                for lesson in &stats.lesson_stats {
                    println!("{:<7} {}/{}", lesson.lesson_number, lesson.known_words, lesson.total_words);
                }
            }

            if !stats.recent_activity.is_empty() {
                println!("\nLast 7 days");
                for day in &stats.recent_activity {
                    println!("{}  {}", day.date, day.words_learned);
                }
            }
        }
    }

    Ok(())
}
