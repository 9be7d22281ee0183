//! Persistence tests against file-backed SQLite databases

use gatekeep::auth::PasswordHasher;
use gatekeep::config::DatabaseConfig;
use gatekeep::{Database, Error};
use tempfile::TempDir;

fn file_config(dir: &TempDir) -> DatabaseConfig {
    DatabaseConfig {
        path: dir.path().join("nested").join("data.db"),
    }
}

#[test]
fn test_users_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    let hasher = PasswordHasher::new(4);

    {
        let db = Database::open(&config).unwrap();
        let hashed = hasher.hash("testpass123").unwrap();
        db.create_user("testuser", &hashed, Some("test@example.com"))
            .unwrap();
    }

    let db = Database::open(&config).unwrap();
    let user = db.find_user_by_username("testuser").unwrap().unwrap();
    assert_eq!(user.email.as_deref(), Some("test@example.com"));
    assert!(hasher.verify("testpass123", &user.password));
}

#[test]
fn test_uniqueness_enforced_across_handles() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    let hasher = PasswordHasher::new(4);
    let hashed = hasher.hash("pw").unwrap();

    Database::open(&config)
        .unwrap()
        .create_user("dup", &hashed, None)
        .unwrap();

    let result = Database::open(&config)
        .unwrap()
        .create_user("dup", &hashed, None);
    assert!(matches!(result, Err(Error::UsernameTaken(_))));
}

#[test]
fn test_ids_are_sequential() {
    let db = Database::open_in_memory().unwrap();
    let hashed = PasswordHasher::new(4).hash("pw").unwrap();

    let first = db.create_user("first", &hashed, None).unwrap();
    let second = db.create_user("second", &hashed, None).unwrap();
    assert!(second.id > first.id);

    let names: Vec<String> = db.list_users().unwrap().into_iter().map(|u| u.username).collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn test_enrollments_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);

    let (student_id, course_id) = {
        let db = Database::open(&config).unwrap();
        let student = db.create_student("Taras").unwrap();
        let course = db.create_course("Poetry").unwrap();
        db.enroll(student.id, course.id).unwrap();
        (student.id, course.id)
    };

    let db = Database::open(&config).unwrap();
    let detail = db.get_student(student_id).unwrap().unwrap();
    assert_eq!(detail.courses.len(), 1);
    assert_eq!(detail.courses[0].id, course_id);
    assert_eq!(db.list_courses().unwrap().len(), 1);
    assert_eq!(db.list_students().unwrap().len(), 1);
}
