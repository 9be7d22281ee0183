//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::auth::UserInfo;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Build the table shown by `gatekeep users`
pub fn user_table(users: &[UserInfo]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Username").fg(Color::Cyan),
            Cell::new("Email").fg(Color::Cyan),
        ]);

    for user in users {
        table.add_row(vec![
            Cell::new(user.id),
            Cell::new(&user.username),
            Cell::new(user.email.as_deref().unwrap_or("-")),
        ]);
    }

    table
}

/// Print a table of users
pub fn print_user_table(users: &[UserInfo]) {
    if users.is_empty() {
        info("No users registered yet. POST /register to create one");
        return;
    }
    println!("{}", user_table(users));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_table_contents() {
        let users = vec![
            UserInfo {
                id: 1,
                username: "testuser".to_string(),
                email: Some("test@example.com".to_string()),
            },
            UserInfo {
                id: 2,
                username: "nomail".to_string(),
                email: None,
            },
        ];
        let rendered = user_table(&users).to_string();
        assert!(rendered.contains("testuser"));
        assert!(rendered.contains("test@example.com"));
        assert!(rendered.contains("nomail"));
    }
}
