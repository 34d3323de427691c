// ==========================================
// Excel 行数据源集成测试
// ==========================================
// 测试目标: 原生类型保留、1 起始行列口径、
//           内容下移工作表的首行口径、Excel 全链路运行
// ==========================================

mod test_helpers;

use inventory_bulk_load::{
    CellValue, ContentType, ExcelRowSource, ImportJobRepository, ImportOperation, RowSource,
};
use test_helpers::*;

fn fixture_bytes(name: &str) -> Vec<u8> {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("读取夹具 {path} 失败: {e}"))
}

// ==========================================
// 适配器: 原生类型与行列口径
// ==========================================

#[test]
fn test_adapter_reports_one_based_inclusive_rows() {
    let source = ExcelRowSource::from_bytes(&fixture_bytes("purchase_items.xlsx")).unwrap();
    assert_eq!(source.first_row_index(), 1);
    assert_eq!(source.last_row_index(), 3);
}

#[test]
fn test_adapter_preserves_native_cell_types() {
    let source = ExcelRowSource::from_bytes(&fixture_bytes("purchase_items.xlsx")).unwrap();

    assert_eq!(source.cell(2, 1), Some(CellValue::Text("Kale".to_string())));
    assert_eq!(source.cell(2, 6), Some(CellValue::Bool(false))); // Taxable
    assert_eq!(source.cell(2, 7), Some(CellValue::Bool(true))); // Ordering
    assert_eq!(source.cell(2, 9), Some(CellValue::Number(1.5))); // Begining inventory cost
    assert_eq!(source.cell(2, 14), Some(CellValue::Number(12.0))); // Pack value
    assert_eq!(source.cell(2, 3), None); // 空单元格
    assert_eq!(source.cell(3, 10), None); // 留空的供应商列
}

#[test]
fn test_offset_sheet_reports_its_native_first_row() {
    let source =
        ExcelRowSource::from_bytes(&fixture_bytes("offset_housemade_items.xlsx")).unwrap();
    assert_eq!(source.first_row_index(), 3);
    assert_eq!(source.last_row_index(), 5);
    assert_eq!(
        source.cell(4, 1),
        Some(CellValue::Text("Focaccia".to_string()))
    );
}

// ==========================================
// 全链路: Excel 采购物品导入
// ==========================================

#[test]
fn test_end_to_end_excel_purchase_items_import() {
    let (_temp_file, db_path) = create_test_db();
    seed_default_scenario(&open_conn(&db_path));

    let bytes = fixture_bytes("purchase_items.xlsx");
    let (job_repo, _tenant_repo, pipeline) = build_pipeline(&db_path);
    let job = submit_job(&job_repo, &bytes, ContentType::Excel, false);
    let outcome = pipeline
        .execute(&request_for(&job, ImportOperation::PurchaseItems))
        .expect("运行失败");

    assert_eq!(outcome.error_count, 0);
    assert_eq!(outcome.total_row_count, 2);
    assert_eq!(outcome.added_count, 2);
    assert_eq!(outcome.skipped_count, 0);

    let conn = open_conn(&db_path);
    assert_eq!(count_items(&conn), 2);
    assert_eq!(count_vendor_links(&conn), 1);

    // 原生布尔/数字单元格直接进入档案
    let (taxable, ordering, cost): (bool, bool, f64) = conn
        .query_row(
            "SELECT taxable, ordering, starting_average_cost FROM inventory_items WHERE name = 'Kale'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert!(!taxable);
    assert!(ordering);
    assert_eq!(cost, 1.5);
}

// ==========================================
// 全链路: 内容下移工作表仍然只跳过首个报告行
// ==========================================

#[test]
fn test_end_to_end_offset_sheet_skips_exactly_the_first_reported_row() {
    let (_temp_file, db_path) = create_test_db();
    seed_default_scenario(&open_conn(&db_path));

    let bytes = fixture_bytes("offset_housemade_items.xlsx");
    let (job_repo, _tenant_repo, pipeline) = build_pipeline(&db_path);
    let job = submit_job(&job_repo, &bytes, ContentType::Excel, false);
    let outcome = pipeline
        .execute(&request_for(&job, ImportOperation::HousemadeItems))
        .expect("运行失败");

    // 首个报告行(第 3 行的表头)被跳过,第 4/5 行为数据行
    assert_eq!(outcome.error_count, 0);
    assert_eq!(outcome.total_row_count, 2);
    assert_eq!(outcome.added_count, 2);
    assert_eq!(count_items(&open_conn(&db_path)), 2);
}

// ==========================================
// 适配器: 损坏载荷
// ==========================================

#[test]
fn test_csv_bytes_under_the_excel_tag_abort_the_run() {
    let (_temp_file, db_path) = create_test_db();
    seed_default_scenario(&open_conn(&db_path));

    let bytes = b"Item name,Item unit\nKale,Each\n".to_vec();
    let (job_repo, _tenant_repo, pipeline) = build_pipeline(&db_path);
    let job = submit_job(&job_repo, &bytes, ContentType::Excel, false);

    let result = pipeline.execute(&request_for(&job, ImportOperation::HousemadeItems));
    assert!(result.is_err());

    // 运行在启动后中止: 任务停留在 PROCESSING 的部分状态
    let stored = job_repo.find_job(&job.id).unwrap().unwrap();
    assert_eq!(
        stored.status,
        inventory_bulk_load::JobStatus::Processing
    );
    assert!(stored.started_at.is_some());
    assert!(stored.finished_at.is_none());
}
