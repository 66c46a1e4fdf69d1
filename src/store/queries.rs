//! Per-dialect SQL. Values are always bound as parameters.

pub struct Queries {
    pub create_table: &'static str,
    pub insert: &'static str,
    pub select_by_id: &'static str,
    pub select_all: &'static str,
    pub update: &'static str,
    pub ping: &'static str,
}

pub const SQLITE: Queries = Queries {
    create_table: r#"
        CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            age INTEGER NOT NULL
        )
    "#,
    insert: "INSERT INTO students (name, email, age) VALUES (?, ?, ?)",
    select_by_id: "SELECT id, name, email, age FROM students WHERE id = ? LIMIT 1",
    select_all: "SELECT id, name, email, age FROM students ORDER BY id ASC",
    update: "UPDATE students SET name = ?, email = ?, age = ? WHERE id = ?",
    ping: "SELECT 1",
};

pub const POSTGRES: Queries = Queries {
    create_table: r#"
        CREATE TABLE IF NOT EXISTS students (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            age INTEGER NOT NULL
        )
    "#,
    insert: "INSERT INTO students (name, email, age) VALUES ($1, $2, $3) RETURNING id",
    select_by_id: "SELECT id, name, email, age FROM students WHERE id = $1",
    select_all: "SELECT id, name, email, age FROM students ORDER BY id ASC",
    update: "UPDATE students SET name = $1, email = $2, age = $3 WHERE id = $4",
    ping: "SELECT 1",
};
