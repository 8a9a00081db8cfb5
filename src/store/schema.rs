pub const SCHEMA: &str = r#"
-- Accounts; an empty password marks a public demonstration account
CREATE TABLE IF NOT EXISTS users (
    name TEXT PRIMARY KEY,           -- 320 is the maximum email length
    salt BLOB NOT NULL,
    password BLOB NOT NULL,          -- argon2id output over (password, salt)
    is_manager INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    percentage INTEGER NOT NULL CHECK (percentage >= 0 AND percentage <= 100),
    description TEXT NOT NULL,
    updated TEXT NOT NULL,           -- YYYY-MM-DD
    version INTEGER NOT NULL DEFAULT 0,
    flag INTEGER NOT NULL DEFAULT 0,
    flag_version INTEGER NOT NULL DEFAULT 0
);

-- Deliverable ids are unique within their project only
CREATE TABLE IF NOT EXISTS deliverables (
    id INTEGER NOT NULL,
    pid INTEGER NOT NULL REFERENCES projects(id),
    name TEXT NOT NULL,
    due TEXT NOT NULL,
    percentage INTEGER NOT NULL CHECK (percentage >= 0 AND percentage <= 100),
    submitted INTEGER NOT NULL DEFAULT 0,
    description TEXT NOT NULL,
    PRIMARY KEY (id, pid)
);

-- Cleanup of these relations is done explicitly by the resource layer
CREATE TABLE IF NOT EXISTS owns (
    name TEXT NOT NULL REFERENCES users(name),
    pid INTEGER NOT NULL REFERENCES projects(id),
    PRIMARY KEY (name, pid)
);

CREATE TABLE IF NOT EXISTS views (
    name TEXT NOT NULL REFERENCES users(name),
    pid INTEGER NOT NULL REFERENCES projects(id),
    PRIMARY KEY (name, pid)
);

CREATE INDEX IF NOT EXISTS idx_owns_pid ON owns(pid);
CREATE INDEX IF NOT EXISTS idx_views_pid ON views(pid);
CREATE INDEX IF NOT EXISTS idx_deliverables_pid ON deliverables(pid);
"#;
