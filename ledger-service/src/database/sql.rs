//! SQL statement constants for database operations

pub const CREATE_MIGRATIONS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL,
    description TEXT NOT NULL
)
"#;

pub const CREATE_VOTING_EVENTS_TABLE_SQL: &str = r#"
CREATE TABLE voting_events (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    options TEXT NOT NULL, -- JSON array
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('draft', 'active', 'completed', 'cancelled')),
    created_by TEXT NOT NULL,
    total_votes INTEGER NOT NULL DEFAULT 0,
    blockchain_hash TEXT,
    results_reference TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

pub const CREATE_VOTES_TABLE_SQL: &str = r#"
CREATE TABLE votes (
    id TEXT PRIMARY KEY,
    voting_event_id TEXT NOT NULL REFERENCES voting_events(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL,
    vote_option TEXT NOT NULL,
    option_index INTEGER NOT NULL,
    blockchain_hash TEXT,
    created_at TEXT NOT NULL,
    UNIQUE (voting_event_id, user_id)
)
"#;

pub const CREATE_PETITION_EVENTS_TABLE_SQL: &str = r#"
CREATE TABLE petition_events (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    target_signatures INTEGER NOT NULL CHECK (target_signatures > 0),
    current_signatures INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL CHECK (status IN ('draft', 'active', 'completed', 'cancelled')),
    created_by TEXT NOT NULL,
    blockchain_hash TEXT,
    results_reference TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

pub const CREATE_PETITION_SIGNATURES_TABLE_SQL: &str = r#"
CREATE TABLE petition_signatures (
    id TEXT PRIMARY KEY,
    petition_id TEXT NOT NULL REFERENCES petition_events(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL,
    comment TEXT,
    blockchain_hash TEXT,
    created_at TEXT NOT NULL,
    UNIQUE (petition_id, user_id)
)
"#;

pub const CREATE_LEDGER_TABLE_SQL: &str = r#"
CREATE TABLE blockchain_transactions (
    id TEXT PRIMARY KEY,
    transaction_hash TEXT NOT NULL UNIQUE,
    transaction_type TEXT NOT NULL,
    block_number INTEGER NOT NULL,
    related_id TEXT,
    user_id TEXT,
    data TEXT NOT NULL, -- JSON object
    created_at TEXT NOT NULL
)
"#;

pub const CREATE_USER_ROLES_TABLE_SQL: &str = r#"
CREATE TABLE user_roles (
    user_id TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('admin', 'voter', 'petitioner')),
    granted_at TEXT NOT NULL,
    PRIMARY KEY (user_id, role)
)
"#;

pub const CREATE_EVENT_TEMPLATES_TABLE_SQL: &str = r#"
CREATE TABLE event_templates (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    type TEXT NOT NULL CHECK (type IN ('voting', 'petition', 'survey')),
    description TEXT,
    config TEXT NOT NULL DEFAULT '{}', -- JSON object
    created_by TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

pub const CREATE_CONTRACT_DEPLOYMENTS_TABLE_SQL: &str = r#"
CREATE TABLE contract_deployments (
    id TEXT PRIMARY KEY,
    template_id TEXT NOT NULL REFERENCES event_templates(id),
    contract_address TEXT NOT NULL UNIQUE,
    network_id TEXT NOT NULL,
    deployer_id TEXT NOT NULL,
    deployment_params TEXT NOT NULL DEFAULT '{}', -- JSON
    block_number INTEGER NOT NULL,
    status TEXT NOT NULL DEFAULT 'deployed',
    created_at TEXT NOT NULL
)
"#;

pub const CREATE_TEMPLATE_INDEXES: &[&str] = &[
    "CREATE INDEX idx_event_templates_active ON event_templates(is_active, created_at)",
    "CREATE INDEX idx_contract_deployments_template ON contract_deployments(template_id)",
];

pub const CREATE_DB_INDEXES: &[&str] = &[
    "CREATE INDEX idx_voting_events_status ON voting_events(status, created_at)",
    "CREATE INDEX idx_petition_events_status ON petition_events(status, created_at)",
    "CREATE INDEX idx_votes_event ON votes(voting_event_id, created_at)",
    "CREATE INDEX idx_signatures_petition ON petition_signatures(petition_id, created_at)",
    "CREATE INDEX idx_ledger_related ON blockchain_transactions(related_id)",
];

// Voting events

pub const INSERT_VOTING_EVENT_SQL: &str = r#"
INSERT INTO voting_events
    (id, title, description, options, start_time, end_time, status, created_by,
     total_votes, blockchain_hash, results_reference, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub const SELECT_VOTING_EVENT_SQL: &str = "SELECT * FROM voting_events WHERE id = ?";

pub const SELECT_ACTIVE_VOTING_EVENTS_SQL: &str =
    "SELECT * FROM voting_events WHERE status = 'active' ORDER BY created_at DESC, rowid DESC";

pub const SELECT_ALL_VOTING_EVENTS_SQL: &str =
    "SELECT * FROM voting_events ORDER BY created_at DESC, rowid DESC";

pub const INCREMENT_TOTAL_VOTES_SQL: &str = r#"
UPDATE voting_events SET total_votes = total_votes + 1, updated_at = ?
WHERE id = ? AND status = 'active'
"#;

pub const FINALIZE_VOTING_EVENT_SQL: &str = r#"
UPDATE voting_events SET status = 'completed', results_reference = ?, updated_at = ?
WHERE id = ? AND status = 'active'
"#;

pub const UPDATE_VOTING_EVENT_STATUS_SQL: &str =
    "UPDATE voting_events SET status = ?, updated_at = ? WHERE id = ? AND status = ?";

pub const DELETE_VOTING_EVENT_SQL: &str = "DELETE FROM voting_events WHERE id = ?";

// Votes

pub const INSERT_VOTE_SQL: &str = r#"
INSERT INTO votes
    (id, voting_event_id, user_id, vote_option, option_index, blockchain_hash, created_at)
VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

pub const SELECT_USER_VOTE_SQL: &str =
    "SELECT * FROM votes WHERE voting_event_id = ? AND user_id = ?";

pub const SELECT_EVENT_VOTES_SQL: &str =
    "SELECT * FROM votes WHERE voting_event_id = ? ORDER BY created_at DESC, rowid DESC";

// Petitions

pub const INSERT_PETITION_SQL: &str = r#"
INSERT INTO petition_events
    (id, title, description, start_time, end_time, target_signatures, current_signatures,
     status, created_by, blockchain_hash, results_reference, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub const SELECT_PETITION_SQL: &str = "SELECT * FROM petition_events WHERE id = ?";

pub const SELECT_ACTIVE_PETITIONS_SQL: &str =
    "SELECT * FROM petition_events WHERE status = 'active' ORDER BY created_at DESC, rowid DESC";

pub const SELECT_ALL_PETITIONS_SQL: &str =
    "SELECT * FROM petition_events ORDER BY created_at DESC, rowid DESC";

pub const INCREMENT_SIGNATURES_SQL: &str = r#"
UPDATE petition_events SET current_signatures = current_signatures + 1, updated_at = ?
WHERE id = ? AND status = 'active'
"#;

pub const FINALIZE_PETITION_SQL: &str = r#"
UPDATE petition_events SET status = 'completed', results_reference = ?, updated_at = ?
WHERE id = ? AND status = 'active'
"#;

pub const UPDATE_PETITION_STATUS_SQL: &str =
    "UPDATE petition_events SET status = ?, updated_at = ? WHERE id = ? AND status = ?";

pub const DELETE_PETITION_SQL: &str = "DELETE FROM petition_events WHERE id = ?";

// Signatures

pub const INSERT_SIGNATURE_SQL: &str = r#"
INSERT INTO petition_signatures
    (id, petition_id, user_id, comment, blockchain_hash, created_at)
VALUES (?, ?, ?, ?, ?, ?)
"#;

pub const SELECT_USER_SIGNATURE_SQL: &str =
    "SELECT * FROM petition_signatures WHERE petition_id = ? AND user_id = ?";

pub const SELECT_PETITION_SIGNATURES_SQL: &str =
    "SELECT * FROM petition_signatures WHERE petition_id = ? ORDER BY created_at DESC, rowid DESC";

// Ledger

pub const INSERT_LEDGER_ENTRY_SQL: &str = r#"
INSERT INTO blockchain_transactions
    (id, transaction_hash, transaction_type, block_number, related_id, user_id, data, created_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub const SELECT_RECENT_LEDGER_ENTRIES_SQL: &str =
    "SELECT * FROM blockchain_transactions ORDER BY rowid DESC LIMIT ?";

pub const COUNT_LEDGER_ENTRIES_SQL: &str = "SELECT COUNT(*) FROM blockchain_transactions";

// Roles

pub const SELECT_USER_ROLES_SQL: &str = "SELECT role FROM user_roles WHERE user_id = ? ORDER BY role";

pub const INSERT_USER_ROLE_SQL: &str =
    "INSERT OR IGNORE INTO user_roles (user_id, role, granted_at) VALUES (?, ?, ?)";

pub const DELETE_USER_ROLE_SQL: &str = "DELETE FROM user_roles WHERE user_id = ? AND role = ?";

// Templates

pub const INSERT_TEMPLATE_SQL: &str = r#"
INSERT INTO event_templates
    (id, name, type, description, config, created_by, is_active, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub const SELECT_TEMPLATE_SQL: &str = "SELECT * FROM event_templates WHERE id = ?";

pub const SELECT_ACTIVE_TEMPLATES_SQL: &str =
    "SELECT * FROM event_templates WHERE is_active = 1 ORDER BY created_at DESC, rowid DESC";

pub const UPDATE_TEMPLATE_SQL: &str = r#"
UPDATE event_templates
SET name = ?, type = ?, description = ?, config = ?, is_active = ?, updated_at = ?
WHERE id = ?
"#;

// Deployments

pub const INSERT_DEPLOYMENT_SQL: &str = r#"
INSERT INTO contract_deployments
    (id, template_id, contract_address, network_id, deployer_id, deployment_params,
     block_number, status, created_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub const SELECT_DEPLOYMENTS_SQL: &str = r#"
SELECT d.*, t.name AS template_name, t.type AS template_type,
       t.description AS template_description
FROM contract_deployments d
LEFT JOIN event_templates t ON t.id = d.template_id
ORDER BY d.created_at DESC, d.rowid DESC
"#;
