//! CLI command messaging
//!
//! Consistent coloured output for one-shot commands. The dashboard never
//! uses these; it renders into the alternate screen instead.

/// Print CLI command info message
pub fn print_info(title: &str, details: &str) {
    print!("\x1b[1;33m[INFO]\x1b[0m {}", title);
    if !details.is_empty() {
        println!("\t {}", details);
    } else {
        println!();
    }
}

/// Print CLI command warn message
pub fn print_warn(title: &str, details: &str) {
    print!("\x1b[1;91m[WARN]\x1b[0m {}", title);
    if !details.is_empty() {
        println!("\t {}", details);
    } else {
        println!();
    }
}

/// Print CLI command error. Errors go to stderr so piped listings stay clean.
pub fn print_error(title: &str, details: Option<&str>) {
    eprintln!("\x1b[1;31m[ERROR]\x1b[0m {}", title);
    if let Some(details) = details {
        eprintln!("\x1b[1;31m[ERROR]\x1b[0m Details: {}", details);
    }
}

/// Print CLI command success
pub fn print_success(title: &str, details: &str) {
    print!("\x1b[1;32m[SUCCESS]\x1b[0m {}", title);
    if !details.is_empty() {
        println!("\t {}", details);
    } else {
        println!();
    }
}

/// Print an indented `label: value` line under a heading.
pub fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("    \x1b[2m{:<18}\x1b[0m {}", format!("{}:", label), value);
}

#[macro_export]
macro_rules! print_cmd_info {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_info($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_warn {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_warn($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_error {
    ($title:expr) => {
        $crate::cli_messages::print_error($title, None)
    };
    ($title:expr, $($details:tt)+) => {
        $crate::cli_messages::print_error($title, Some(&format!($($details)+)))
    };
}

/// Prints a command error and turns the underlying error into the message
/// returned from `main`.
#[macro_export]
macro_rules! handle_cmd_error {
    ($err:expr, $title:expr) => {{
        let message = format!("{}", $err);
        $crate::print_cmd_error!($title, "{}", message);
        message
    }};
}

#[macro_export]
macro_rules! print_cmd_success {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_success($title, &format!($($details)*))
    };
}
