// ==========================================
// 餐厅库存批量导入系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 集中 schema 引导，测试与二进制入口共用同一份建表语句
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

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

/// 初始化数据库 schema（幂等，IF NOT EXISTS）
///
/// 表分两组：
/// - 导入任务侧: import_jobs / import_row_errors
/// - 租户数据侧: tenants / accounting_categories / measure_units /
///   vendors / inventory_items / vendor_inventory_items
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS import_jobs (
            job_id          TEXT PRIMARY KEY,
            tenant_id       TEXT NOT NULL,
            actor_id        TEXT NOT NULL,
            source_content  BLOB NOT NULL,
            content_type    TEXT NOT NULL,
            status          TEXT NOT NULL DEFAULT 'PENDING',
            dry_run         INTEGER NOT NULL DEFAULT 0,
            started_at      TEXT,
            finished_at     TEXT,
            total_row_count INTEGER NOT NULL DEFAULT 0,
            added_count     INTEGER NOT NULL DEFAULT 0,
            skipped_count   INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS import_row_errors (
            error_id     INTEGER PRIMARY KEY AUTOINCREMENT,
            job_id       TEXT NOT NULL REFERENCES import_jobs(job_id) ON DELETE CASCADE,
            row_index    INTEGER NOT NULL,
            column_index INTEGER NOT NULL,
            message      TEXT NOT NULL,
            created_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_import_row_errors_job
            ON import_row_errors(job_id);

        CREATE TABLE IF NOT EXISTS tenants (
            tenant_id          TEXT PRIMARY KEY,
            name               TEXT NOT NULL,
            utc_offset_minutes INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS accounting_categories (
            category_id INTEGER PRIMARY KEY AUTOINCREMENT,
            tenant_id   TEXT NOT NULL REFERENCES tenants(tenant_id),
            name        TEXT NOT NULL,
            UNIQUE (tenant_id, name)
        );

        CREATE TABLE IF NOT EXISTS measure_units (
            unit_id   INTEGER PRIMARY KEY AUTOINCREMENT,
            tenant_id TEXT NOT NULL REFERENCES tenants(tenant_id),
            name      TEXT NOT NULL,
            UNIQUE (tenant_id, name)
        );

        CREATE TABLE IF NOT EXISTS vendors (
            vendor_id              INTEGER PRIMARY KEY AUTOINCREMENT,
            tenant_id              TEXT NOT NULL REFERENCES tenants(tenant_id),
            vendor_key             TEXT NOT NULL,
            name                   TEXT NOT NULL,
            allowed_order_unit_ids TEXT,
            UNIQUE (tenant_id, vendor_key)
        );

        CREATE TABLE IF NOT EXISTS inventory_items (
            item_id                INTEGER PRIMARY KEY AUTOINCREMENT,
            tenant_id              TEXT NOT NULL REFERENCES tenants(tenant_id),
            name                   TEXT NOT NULL,
            description            TEXT NOT NULL DEFAULT '',
            tenant_item_identifier TEXT,
            kind                   TEXT NOT NULL,
            accounting_category_id INTEGER REFERENCES accounting_categories(category_id),
            item_unit_id           INTEGER REFERENCES measure_units(unit_id),
            taxable                INTEGER NOT NULL DEFAULT 0,
            ordering               INTEGER NOT NULL DEFAULT 0,
            inventory              INTEGER NOT NULL DEFAULT 0,
            starting_average_cost  REAL,
            recipe_cost_per_unit   REAL,
            recipe_cost_timestamp  TEXT,
            created_at             TEXT NOT NULL,
            updated_at             TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_inventory_items_tenant_name
            ON inventory_items(tenant_id, name COLLATE NOCASE);

        CREATE TABLE IF NOT EXISTS vendor_inventory_items (
            link_id                    INTEGER PRIMARY KEY AUTOINCREMENT,
            tenant_id                  TEXT NOT NULL REFERENCES tenants(tenant_id),
            vendor_id                  INTEGER NOT NULL REFERENCES vendors(vendor_id),
            inventory_item_id          INTEGER NOT NULL REFERENCES inventory_items(item_id),
            order_unit_id              INTEGER REFERENCES measure_units(unit_id),
            pack_value                 REAL,
            vendor_specific_identifier TEXT,
            is_primary_vendor          INTEGER NOT NULL DEFAULT 0,
            created_at                 TEXT NOT NULL,
            UNIQUE (vendor_id, inventory_item_id, vendor_specific_identifier, order_unit_id)
        );
        "#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        initialize_schema(&conn).unwrap();
        initialize_schema(&conn).unwrap();

        let table_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'import_jobs'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(table_count, 1);
    }
}
