// ==========================================
// 控制工程文档系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout
// - 建表（幂等）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（幂等）
///
/// 说明：
/// - cause_effect_matrix 的 cause_id/effect_id 不设外键，允许悬空引用
/// - io_points 的 (project_id, tag_name) 唯一
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_scope (
            scope_id TEXT PRIMARY KEY,
            scope_type TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(scope_type, scope_key)
        );

        INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
        VALUES ('global', 'GLOBAL', 'global');

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS project (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            plc_type TEXT NOT NULL DEFAULT '',
            hmi_type TEXT NOT NULL DEFAULT '',
            hmi_details TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS io_points (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL REFERENCES project(id) ON DELETE CASCADE,
            tag_name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            io_type TEXT NOT NULL CHECK (io_type IN ('DI', 'DO', 'AI', 'AO')),
            address TEXT NOT NULL DEFAULT '',
            modbus_register TEXT NOT NULL DEFAULT '',
            normal_state TEXT NOT NULL DEFAULT '',
            engineering_units TEXT NOT NULL DEFAULT '',
            range_min REAL NOT NULL DEFAULT 0,
            range_max REAL NOT NULL DEFAULT 100,
            created_at TEXT NOT NULL,
            UNIQUE(project_id, tag_name)
        );

        CREATE TABLE IF NOT EXISTS cause_effect_matrix (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL REFERENCES project(id) ON DELETE CASCADE,
            cause_id TEXT NOT NULL,
            effect_id TEXT NOT NULL,
            logic_type TEXT NOT NULL DEFAULT 'DIRECT',
            time_delay REAL NOT NULL DEFAULT 0,
            priority INTEGER NOT NULL DEFAULT 1,
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS network_topology (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL REFERENCES project(id) ON DELETE CASCADE,
            device_name TEXT NOT NULL,
            device_type TEXT NOT NULL DEFAULT 'Other',
            ip_address TEXT NOT NULL DEFAULT '',
            subnet_mask TEXT NOT NULL DEFAULT '255.255.255.0',
            gateway TEXT NOT NULL DEFAULT '',
            mac_address TEXT NOT NULL DEFAULT '',
            port TEXT NOT NULL DEFAULT '',
            protocol TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            position_x REAL NOT NULL DEFAULT 0,
            position_y REAL NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_io_points_project ON io_points(project_id);
        CREATE INDEX IF NOT EXISTS idx_cause_effect_project ON cause_effect_matrix(project_id);
        CREATE INDEX IF NOT EXISTS idx_network_topology_project ON network_topology(project_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
