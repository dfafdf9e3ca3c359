use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, words_per_lesson: Option<i64>, format: &OutputFormat) -> Result<()> {
    let words_per_lesson = words_per_lesson.unwrap_or(app.config.words_per_lesson);
    let list = app.db.get_lessons(words_per_lesson)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
        OutputFormat::Plain => {
            if list.lessons.is_empty() {
                println!("No words imported yet.");
                return Ok(());
            }

            println!("{:<8} {:>6} {:>6} {:>6}", "Lesson", "First", "Last", "Words");
            println!("{}", "\u{2500}".repeat(29));
            for lesson in &list.lessons {
                println!(
                    "{:<8} {:>6} {:>6} {:>6}",
                    lesson.lesson_number, lesson.start_word, lesson.end_word, lesson.word_count
                );
            }
            println!("\n{} words in {} lessons", list.total_words, list.lessons.len());
        }
    }

    Ok(())
}
