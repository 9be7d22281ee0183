use rusqlite::{params, OptionalExtension, Row};

use super::{is_constraint_violation, Database};
use crate::auth::{HashedPassword, User};
use crate::error::{Error, Result};

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password: HashedPassword::from_stored(row.get(2)?),
        email: row.get(3)?,
    })
}

impl Database {
    /// Insert a new user. Fails with `UsernameTaken` if the name is in use.
    pub fn create_user(
        &self,
        username: &str,
        password: &HashedPassword,
        email: Option<&str>,
    ) -> Result<User> {
        let conn = self.conn.lock();
        let result = conn.execute(
            "INSERT INTO users (username, password, email) VALUES (?1, ?2, ?3)",
            params![username, password.as_str(), email],
        );

        match result {
            Ok(_) => Ok(User {
                id: conn.last_insert_rowid(),
                username: username.to_string(),
                password: password.clone(),
                email: email.map(str::to_string),
            }),
            Err(e) if is_constraint_violation(&e) => Err(Error::UsernameTaken(username.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn.lock();
        let user = conn
            .query_row(
                "SELECT id, username, password, email FROM users WHERE username = ?1",
                params![username],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn.lock();
        let user = conn
            .query_row(
                "SELECT id, username, password, email FROM users WHERE id = ?1",
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// All users ordered by id
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id, username, password, email FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], user_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(s: &str) -> HashedPassword {
        HashedPassword::from_stored(format!("hashed:{}", s))
    }

    #[test]
    fn test_create_and_find_user() {
        let db = Database::open_in_memory().unwrap();
        let user = db
            .create_user("alice", &hash("pw"), Some("alice@example.com"))
            .unwrap();
        assert!(user.id > 0);

        let found = db.find_user_by_username("alice").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.email.as_deref(), Some("alice@example.com"));
        assert_eq!(found.password.as_str(), "hashed:pw");

        let by_id = db.find_user_by_id(user.id).unwrap().unwrap();
        assert_eq!(by_id.username, "alice");
    }

    #[test]
    fn test_duplicate_username() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("bob", &hash("a"), None).unwrap();
        let result = db.create_user("bob", &hash("b"), None);
        assert!(matches!(result, Err(Error::UsernameTaken(name)) if name == "bob"));
        assert_eq!(db.list_users().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_user() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.find_user_by_username("nobody").unwrap().is_none());
        assert!(db.find_user_by_id(99).unwrap().is_none());
    }
}
