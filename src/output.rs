use crate::models::{EvaluationResult, SubmissionHistoryResult, SubmissionResult};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, Serialize, Deserialize)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Print a submission history in the specified format
pub fn print_history(history: &SubmissionHistoryResult, format: OutputFormat) {
    match format {
        OutputFormat::Plain => print_history_plain(history),
        OutputFormat::Json => print_json(history),
    }
}

/// Print an evaluation result in the specified format
pub fn print_evaluation(result: &EvaluationResult, format: OutputFormat) {
    match format {
        OutputFormat::Plain => print_evaluation_plain(result),
        OutputFormat::Json => print_json(result),
    }
}

/// Print a submit-data result in the specified format
pub fn print_submission(result: &SubmissionResult, format: OutputFormat) {
    match format {
        OutputFormat::Plain => print_status_plain(result.is_valid, &result.error_text),
        OutputFormat::Json => print_json(result),
    }
}

fn print_status_plain(is_valid: bool, error_text: &str) {
    if is_valid {
        println!("Valid: yes");
    } else if error_text.is_empty() {
        println!("Valid: no");
    } else {
        println!("Valid: no ({})", error_text);
    }
}

fn print_history_plain(history: &SubmissionHistoryResult) {
    print_status_plain(history.is_valid, &history.error_text);
    match history.last_submission {
        Some(last) => println!("Last submission: {}", last.to_rfc3339()),
        None => println!("Last submission: none"),
    }
    println!();

    if history.chat_histories.is_empty() {
        println!("No chat history.");
        return;
    }

    for group in &history.chat_histories {
        println!("Source chat {}", group.source_chat_id);
        println!(
            "  {:<13} {:<8} {:<8} {:<26} {:<26}",
            "Participants", "Chats", "Length", "Started", "Ended"
        );
        for chat in &group.chat_list {
            println!(
                "  {:<13} {:<8} {:<8} {:<26} {:<26}",
                chat.participant_count,
                chat.chat_count,
                chat.chat_length,
                chat.chat_start_on.to_rfc3339(),
                chat.chat_ended_on.to_rfc3339()
            );
        }
    }
}

fn print_evaluation_plain(result: &EvaluationResult) {
    print_status_plain(result.is_valid, &result.error_text);
    println!(
        "Quality: {:.3}  Uniqueness: {:.3}  Score: {:.3}",
        result.quality, result.uniqueness, result.score
    );

    let Some(details) = &result.details else {
        return;
    };

    println!();
    println!(
        "Messages: {} total, {} unique",
        details.total_messages, details.unique_messages
    );
    if let Some(reasoning) = &details.llm_reasoning {
        println!("Reasoning: {}", reasoning);
    }
    if details.chat_summaries.is_empty() {
        return;
    }

    println!(
        "{:<20} {:<10} {:<10} {:<10}",
        "Chat", "Messages", "Quality", "Uniqueness"
    );
    println!("{}", "-".repeat(52));
    for summary in &details.chat_summaries {
        println!(
            "{:<20} {:<10} {:<10.3} {:<10.3}",
            summary.source_chat_id,
            summary.message_count,
            summary.chat_quality,
            summary.chat_uniqueness
        );
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing results to JSON: {}", e),
    }
}
