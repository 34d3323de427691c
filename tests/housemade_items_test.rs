// ==========================================
// 自制物品处理器集成测试
// ==========================================
// 测试目标: 端到端 CSV 建档、装载默认值、
//           配方成本日期的本地零点换算、重复名跳过
// ==========================================

mod test_helpers;

use inventory_bulk_load::{
    ContentType, ImportJobRepository, ImportOperation, ItemKind, TenantRepository,
};
use test_helpers::*;

const HOUSEMADE_HEADER: &str =
    "Item name,Item unit,Restaurant identifier,Item description,Accounting category,Recipe cost per unit,Recipe cost date";

fn housemade_csv(rows: &[&str]) -> Vec<u8> {
    let mut text = String::from(HOUSEMADE_HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text.into_bytes()
}

fn run_housemade_import(db_path: &str, bytes: &[u8]) -> inventory_bulk_load::ImportOutcome {
    let (job_repo, _tenant_repo, pipeline) = build_pipeline(db_path);
    let job = submit_job(&job_repo, bytes, ContentType::Csv, false);
    pipeline
        .execute(&request_for(&job, ImportOperation::HousemadeItems))
        .expect("运行失败")
}

// ==========================================
// 端到端: 单行建档与默认值
// ==========================================

#[test]
fn test_end_to_end_single_row_with_defaults() {
    let (_temp_file, db_path) = create_test_db();
    seed_default_scenario(&open_conn(&db_path));

    // 名称含逗号（带引号字段）,成本与日期留空
    let bytes = housemade_csv(&["\"Bread, Ciabatta\",Each,,desc,Bakery,,"]);

    let outcome = run_housemade_import(&db_path, &bytes);
    assert_eq!(outcome.total_row_count, 1);
    assert_eq!(outcome.added_count, 1);
    assert_eq!(outcome.skipped_count, 0);
    assert_eq!(outcome.error_count, 0);

    let conn = open_conn(&db_path);
    let (name, description, kind, recipe_cost, recipe_timestamp): (
        String,
        String,
        String,
        f64,
        Option<String>,
    ) = conn
        .query_row(
            r#"
            SELECT name, description, kind, recipe_cost_per_unit, recipe_cost_timestamp
            FROM inventory_items
            "#,
            [],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            },
        )
        .unwrap();

    assert_eq!(name, "Bread, Ciabatta");
    assert_eq!(description, "desc");
    assert_eq!(kind, ItemKind::Housemade.as_str());
    assert_eq!(recipe_cost, 0.0); // 成本缺省为 0
    assert!(recipe_timestamp.is_none()); // 日期缺失 → 不写时间戳
}

#[test]
fn test_missing_description_defaults_to_empty_string() {
    let (_temp_file, db_path) = create_test_db();
    seed_default_scenario(&open_conn(&db_path));

    let bytes = housemade_csv(&["Focaccia,Each,,,Bakery,,"]);

    let outcome = run_housemade_import(&db_path, &bytes);
    assert_eq!(outcome.added_count, 1);

    let description: String = open_conn(&db_path)
        .query_row(
            "SELECT description FROM inventory_items WHERE name = 'Focaccia'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(description, "");
}

// ==========================================
// 配方成本日期 → 租户本地零点
// ==========================================

#[test]
fn test_recipe_cost_date_becomes_tenant_local_start_of_day() {
    let (_temp_file, db_path) = create_test_db();
    seed_default_scenario(&open_conn(&db_path)); // 租户偏移 -300 分钟(UTC-5)

    let bytes = housemade_csv(&["Stock,Each,,veal stock,Produce,3.5,5/6/19"]);

    let outcome = run_housemade_import(&db_path, &bytes);
    assert_eq!(outcome.error_count, 0);
    assert_eq!(outcome.added_count, 1);

    let conn = open_conn(&db_path);
    let (recipe_cost, recipe_timestamp): (f64, chrono::DateTime<chrono::Utc>) = conn
        .query_row(
            "SELECT recipe_cost_per_unit, recipe_cost_timestamp FROM inventory_items WHERE name = 'Stock'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(recipe_cost, 3.5);
    // 2019-05-06 本地(UTC-5)零点 = 2019-05-06T05:00:00Z
    assert_eq!(recipe_timestamp.to_rfc3339(), "2019-05-06T05:00:00+00:00");
}

// ==========================================
// 校验: 可选列的类型限定
// ==========================================

#[test]
fn test_invalid_recipe_date_is_a_row_error() {
    let (_temp_file, db_path) = create_test_db();
    seed_default_scenario(&open_conn(&db_path));

    let bytes = housemade_csv(&["Stock,Each,,veal stock,Produce,3.5,01-02-19"]);

    let (job_repo, _tenant_repo, pipeline) = build_pipeline(&db_path);
    let job = submit_job(&job_repo, &bytes, ContentType::Csv, false);
    let outcome = pipeline
        .execute(&request_for(&job, ImportOperation::HousemadeItems))
        .expect("运行失败");

    assert_eq!(outcome.error_count, 1);
    let errors = job_repo.list_row_errors(&job.id).unwrap();
    assert_eq!(errors[0].column_index, 7);
    assert_eq!(
        errors[0].message,
        "The value \"01-02-19\" for \"Recipe cost date\" (column 7) must be a date value (mm/dd/yy, mm/dd/yyyy, yyyy-mm-dd)."
    );
}

#[test]
fn test_invalid_recipe_cost_is_a_row_error() {
    let (_temp_file, db_path) = create_test_db();
    seed_default_scenario(&open_conn(&db_path));

    let bytes = housemade_csv(&["Stock,Each,,veal stock,Produce,free,"]);

    let (job_repo, _tenant_repo, pipeline) = build_pipeline(&db_path);
    let job = submit_job(&job_repo, &bytes, ContentType::Csv, false);
    let outcome = pipeline
        .execute(&request_for(&job, ImportOperation::HousemadeItems))
        .expect("运行失败");

    assert_eq!(outcome.error_count, 1);
    let errors = job_repo.list_row_errors(&job.id).unwrap();
    assert_eq!(errors[0].column_index, 6);
    assert!(errors[0].message.contains("must be a number."));
}

// ==========================================
// 装载: 重复名跳过
// ==========================================

#[test]
fn test_duplicate_name_rows_are_skipped() {
    let (_temp_file, db_path) = create_test_db();
    seed_default_scenario(&open_conn(&db_path));

    let bytes = housemade_csv(&[
        "Focaccia,Each,,bread,Bakery,2.0,",
        "Focaccia,Each,,bread again,Bakery,9.0,",
    ]);

    let outcome = run_housemade_import(&db_path, &bytes);
    assert_eq!(outcome.added_count, 1);
    assert_eq!(outcome.skipped_count, 1);

    let conn = open_conn(&db_path);
    assert_eq!(count_items(&conn), 1);
    // 先到者生效
    let recipe_cost: f64 = conn
        .query_row(
            "SELECT recipe_cost_per_unit FROM inventory_items WHERE name = 'Focaccia'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(recipe_cost, 2.0);
}

#[test]
fn test_item_name_match_is_case_insensitive_across_runs() {
    let (_temp_file, db_path) = create_test_db();
    seed_default_scenario(&open_conn(&db_path));

    let first = housemade_csv(&["Focaccia,Each,,bread,Bakery,2.0,"]);
    let outcome = run_housemade_import(&db_path, &first);
    assert_eq!(outcome.added_count, 1);

    let second = housemade_csv(&["FOCACCIA,Each,,bread,Bakery,2.0,"]);
    let outcome = run_housemade_import(&db_path, &second);
    assert_eq!(outcome.added_count, 0);
    assert_eq!(outcome.skipped_count, 1);
    assert_eq!(count_items(&open_conn(&db_path)), 1);
}

// ==========================================
// 引用一致性: 单位与分类解析大小写不敏感
// ==========================================

#[test]
fn test_unit_and_category_lookups_ignore_case() {
    let (_temp_file, db_path) = create_test_db();
    seed_default_scenario(&open_conn(&db_path));

    let bytes = housemade_csv(&["Focaccia,EACH,,bread,bakery,2.0,"]);

    let outcome = run_housemade_import(&db_path, &bytes);
    assert_eq!(outcome.error_count, 0);
    assert_eq!(outcome.added_count, 1);

    let conn = open_conn(&db_path);
    let (unit_id, category_id): (Option<i64>, Option<i64>) = conn
        .query_row(
            "SELECT item_unit_id, accounting_category_id FROM inventory_items WHERE name = 'Focaccia'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert!(unit_id.is_some());
    assert!(category_id.is_some());
}

#[test]
fn test_tenant_is_seeded_with_expected_offset() {
    let (_temp_file, db_path) = create_test_db();
    seed_default_scenario(&open_conn(&db_path));

    let (_job_repo, tenant_repo, _pipeline) = build_pipeline(&db_path);
    let tenant = tenant_repo.find_tenant(TENANT_ID).unwrap().unwrap();
    assert_eq!(tenant.utc_offset_minutes, -300);
}
