use colored::Colorize;

/// Print a warning message to stderr with a yellow warning prefix.
pub fn warning(msg: &str) {
    eprintln!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message to stderr with a red cross prefix.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a bold section title to stdout.
pub fn header_stdout(msg: &str) {
    println!("{}", msg.bold());
}
