use colored::*;
use std::fmt::Display;

pub fn print_header(text: &str) {
    println!("\n{}", text.bright_cyan().bold());
    println!("{}", "=".repeat(text.len()).bright_cyan());
}

/// Labeled value line, used for startup banners.
pub fn print_kv(label: &str, value: impl Display) {
    println!("{} {}", format!("{}:", label).blue(), value);
}

pub fn print_success(text: &str) {
    println!("{}", text.green());
}

pub fn print_error(text: &str) {
    eprintln!("{}", text.red().bold());
}

pub fn print_info(text: &str) {
    println!("{}", text.blue());
}
