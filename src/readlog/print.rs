use chrono::{DateTime, Utc};
use colored::*;
use readlog::api::{CmdMessage, MessageLevel};
use readlog::index::DisplayBook;
use readlog::tags::TagUsage;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const RATING_WIDTH: usize = 7;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

pub fn print_books(books: &[DisplayBook]) {
    if books.is_empty() {
        println!("No books found.");
        return;
    }

    for db in books {
        let idx_str = format!("{:>4}. ", db.index);
        let label = book_label(&db.book.title, &db.book.author);
        let marker = if db.book.did_not_finish { " (dnf)" } else { "" };

        let fixed_width = idx_str.width() + marker.width() + RATING_WIDTH + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let label = truncate_to_width(&label, available);
        let padding = available.saturating_sub(label.width());

        println!(
            "{}{}{}{}{}{}",
            idx_str.yellow(),
            label,
            marker.red(),
            " ".repeat(padding),
            format!("{:>width$}", format_rating(db.book.rating), width = RATING_WIDTH).cyan(),
            format_time_ago(db.book.updated_at).dimmed()
        );
    }
}

pub fn print_book_details(db: &DisplayBook) {
    let book = &db.book;
    println!("{} {}", db.index.to_string().yellow(), book.title.bold());
    println!("--------------------------------");
    field("Author", &book.author);
    field("Genre", &book.genre);
    field("Pages", &book.pages.to_string());
    field("Language", book.language.as_str());
    field("Format", book.format.as_str());
    field("Rating", &format_rating(book.rating));
    field("Vibes", &book.vibes.join(", "));
    if book.did_not_finish {
        let status = match book.pages_read {
            Some(read) => format!("Did not finish ({} of {} pages)", read, book.pages),
            None => "Did not finish".to_string(),
        };
        field("Status", &status);
    }
    field("Added", &book.created_at.format("%Y-%m-%d %H:%M").to_string());
    field("Updated", format_time_ago(book.updated_at).trim());
    field("Id", book.id.as_str());
    if !book.notes.is_empty() {
        println!();
        println!("{}", book.notes);
    }
}

fn field(name: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    println!("{:<10}{}", format!("{}:", name).dimmed(), value);
}

pub fn print_tag_usage(usage: &[TagUsage]) {
    let width = usage.iter().map(|u| u.tag.width()).max().unwrap_or(0);
    for entry in usage {
        let padding = width - entry.tag.width();
        println!(
            "{}{}  {}",
            entry.tag,
            " ".repeat(padding),
            entry.count.to_string().dimmed()
        );
    }
}

pub fn print_suggestions(suggestions: &[String]) {
    for tag in suggestions {
        println!("{}", tag);
    }
}

fn book_label(title: &str, author: &str) -> String {
    if author.is_empty() {
        title.to_string()
    } else {
        format!("{} by {}", title, author)
    }
}

fn format_rating(rating: u8) -> String {
    if rating == 0 {
        "-".to_string()
    } else {
        format!("{}/10", rating)
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_by_display_width() {
        assert_eq!(truncate_to_width("short", 20), "short");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_to_width("日本語の本", 5), "日本…");
    }

    #[test]
    fn unrated_books_show_a_dash() {
        assert_eq!(format_rating(0), "-");
        assert_eq!(format_rating(7), "7/10");
    }

    #[test]
    fn label_skips_missing_author() {
        assert_eq!(book_label("Dune", ""), "Dune");
        assert_eq!(book_label("Dune", "Frank Herbert"), "Dune by Frank Herbert");
    }

    #[test]
    fn time_ago_is_right_aligned() {
        let formatted = format_time_ago(Utc::now());
        assert_eq!(formatted.width(), TIME_WIDTH.max(formatted.trim().width()));
    }
}
