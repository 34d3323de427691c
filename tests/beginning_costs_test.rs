// ==========================================
// 期初成本处理器集成测试
// ==========================================
// 测试目标: 整数物品 ID 校验与解析、成本覆写、
//           装载阶段物品缺失时的防御性跳过
// ==========================================

mod test_helpers;

use inventory_bulk_load::{
    build_row_source, handler_for, ContentType, ExecutionContext, ImportOperation,
    ImportJobRepository, LoadDataStep, TenantGateway, TenantRepository,
};
use rusqlite::params;
use test_helpers::*;

const BEGINNING_COSTS_HEADER: &str =
    "Purchase item id,Item name,Item unit,Restaurant identifier,Item description,Beginning cost";

fn beginning_costs_csv(rows: &[&str]) -> Vec<u8> {
    let mut text = String::from(BEGINNING_COSTS_HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text.into_bytes()
}

// ==========================================
// 装载: 成本覆写
// ==========================================

#[test]
fn test_load_overwrites_starting_average_cost() {
    let (_temp_file, db_path) = create_test_db();
    let conn = open_conn(&db_path);
    seed_default_scenario(&conn);
    let item_id = seed_purchase_item(&conn, TENANT_ID, "Kale");

    let row = format!("{item_id},Kale,Pound,,leafy greens,4.25");
    let bytes = beginning_costs_csv(&[&row]);

    let (job_repo, _tenant_repo, pipeline) = build_pipeline(&db_path);
    let job = submit_job(&job_repo, &bytes, ContentType::Csv, false);
    let outcome = pipeline
        .execute(&request_for(&job, ImportOperation::BeginningCosts))
        .expect("运行失败");

    assert_eq!(outcome.error_count, 0);
    assert_eq!(outcome.total_row_count, 1);
    assert_eq!(outcome.added_count, 1);
    assert_eq!(outcome.skipped_count, 0);

    let cost: f64 = conn
        .query_row(
            "SELECT starting_average_cost FROM inventory_items WHERE item_id = ?1",
            params![item_id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(cost, 4.25);
}

#[test]
fn test_ignored_columns_may_hold_anything() {
    let (_temp_file, db_path) = create_test_db();
    let conn = open_conn(&db_path);
    seed_default_scenario(&conn);
    let item_id = seed_purchase_item(&conn, TENANT_ID, "Kale");

    // 名称/餐厅编号/描述列与档案不一致也不报错,仅作人工核对
    let row = format!("{item_id},Totally Different Name,Pound,X-1,whatever,1.0");
    let bytes = beginning_costs_csv(&[&row]);

    let (job_repo, _tenant_repo, pipeline) = build_pipeline(&db_path);
    let job = submit_job(&job_repo, &bytes, ContentType::Csv, false);
    let outcome = pipeline
        .execute(&request_for(&job, ImportOperation::BeginningCosts))
        .expect("运行失败");

    assert_eq!(outcome.error_count, 0);
    assert_eq!(outcome.added_count, 1);
}

// ==========================================
// 校验: 物品 ID
// ==========================================

#[test]
fn test_non_integer_item_id_is_a_type_error() {
    let (_temp_file, db_path) = create_test_db();
    seed_default_scenario(&open_conn(&db_path));

    let bytes = beginning_costs_csv(&["abc,Kale,Pound,,x,1.0"]);

    let (job_repo, _tenant_repo, pipeline) = build_pipeline(&db_path);
    let job = submit_job(&job_repo, &bytes, ContentType::Csv, false);
    let outcome = pipeline
        .execute(&request_for(&job, ImportOperation::BeginningCosts))
        .expect("运行失败");

    assert_eq!(outcome.error_count, 1);
    let errors = job_repo.list_row_errors(&job.id).unwrap();
    assert_eq!(errors[0].column_index, 1);
    assert_eq!(
        errors[0].message,
        "The value \"abc\" for \"Purchase item id\" (column 1) must be an integer."
    );
}

#[test]
fn test_unknown_item_id_is_localized_to_the_id_column() {
    let (_temp_file, db_path) = create_test_db();
    seed_default_scenario(&open_conn(&db_path));

    let bytes = beginning_costs_csv(&["9999,Kale,Pound,,x,1.0"]);

    let (job_repo, _tenant_repo, pipeline) = build_pipeline(&db_path);
    let job = submit_job(&job_repo, &bytes, ContentType::Csv, false);
    let outcome = pipeline
        .execute(&request_for(&job, ImportOperation::BeginningCosts))
        .expect("运行失败");

    assert_eq!(outcome.error_count, 1);
    let errors = job_repo.list_row_errors(&job.id).unwrap();
    assert_eq!(
        errors[0].message,
        "No inventory item with ID #\"9999\" (column 1) was found for this restaurant."
    );
}

#[test]
fn test_negative_cost_is_rejected() {
    let (_temp_file, db_path) = create_test_db();
    let conn = open_conn(&db_path);
    seed_default_scenario(&conn);
    let item_id = seed_purchase_item(&conn, TENANT_ID, "Kale");

    let row = format!("{item_id},Kale,Pound,,x,-0.5");
    let bytes = beginning_costs_csv(&[&row]);

    let (job_repo, _tenant_repo, pipeline) = build_pipeline(&db_path);
    let job = submit_job(&job_repo, &bytes, ContentType::Csv, false);
    let outcome = pipeline
        .execute(&request_for(&job, ImportOperation::BeginningCosts))
        .expect("运行失败");

    assert_eq!(outcome.error_count, 1);
    let errors = job_repo.list_row_errors(&job.id).unwrap();
    assert_eq!(errors[0].column_index, 6);
    assert!(errors[0].message.contains("cannot be negative."));
}

#[test]
fn test_missing_required_cells_each_produce_one_error() {
    let (_temp_file, db_path) = create_test_db();
    seed_default_scenario(&open_conn(&db_path));

    // ID/单位/成本全缺;名称等忽略列缺失不计
    let bytes = beginning_costs_csv(&[",,,,,"]);

    let (job_repo, _tenant_repo, pipeline) = build_pipeline(&db_path);
    let job = submit_job(&job_repo, &bytes, ContentType::Csv, false);
    let outcome = pipeline
        .execute(&request_for(&job, ImportOperation::BeginningCosts))
        .expect("运行失败");

    assert_eq!(outcome.error_count, 3);
    let errors = job_repo.list_row_errors(&job.id).unwrap();
    let columns: Vec<i64> = errors.iter().map(|e| e.column_index).collect();
    assert_eq!(columns, vec![1, 3, 6]);
}

// ==========================================
// 装载: 物品缺失时防御性跳过
// ==========================================

#[test]
fn test_load_counts_skipped_when_the_item_vanished_after_verification() {
    let (_temp_file, db_path) = create_test_db();
    let conn = open_conn(&db_path);
    seed_default_scenario(&conn);

    // 直接驱动装载步骤,模拟校验后物品被并发删除的场景
    let bytes = beginning_costs_csv(&["424242,Kale,Pound,,x,2.0"]);
    let (job_repo, tenant_repo, _pipeline) = build_pipeline(&db_path);
    let job = submit_job(&job_repo, &bytes, ContentType::Csv, false);

    let tenant = tenant_repo.find_tenant(TENANT_ID).unwrap().unwrap();
    let mut ctx = ExecutionContext {
        job: job_repo.find_job(&job.id).unwrap().unwrap(),
        source: build_row_source(ContentType::Csv, &bytes).unwrap(),
        gateway: TenantGateway::new(tenant_repo.clone(), tenant),
        actor_id: ACTOR_ID.to_string(),
        dry_run: false,
    };
    let mut handler = handler_for(ImportOperation::BeginningCosts);

    LoadDataStep {
        job_repo: job_repo.as_ref(),
    }
    .execute(handler.as_mut(), &mut ctx)
    .unwrap();

    let stored = job_repo.find_job(&job.id).unwrap().unwrap();
    assert_eq!(stored.added_count, 0);
    assert_eq!(stored.skipped_count, 1);
}
