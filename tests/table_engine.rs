use serde_json::json;
use taskdesk::table::{PageSummary, Row, TableModel};

fn rows(values: serde_json::Value) -> Vec<Row> {
    values
        .as_array()
        .expect("array")
        .iter()
        .cloned()
        .map(|v| Row::from_value(v).expect("object row"))
        .collect()
}

fn names(model: &TableModel) -> Vec<String> {
    model
        .processed()
        .iter()
        .map(|row| row.display("nombre").into_owned())
        .collect()
}

#[test]
fn test_search_is_case_insensitive() {
    let mut model = TableModel::new();
    model.set_batch(rows(json!([
        {"id": 1, "nombre": "A", "estado": "Pendiente"},
        {"id": 2, "nombre": "B", "estado": "Completado"}
    ])));

    model.set_search("completado");
    let matched = model.processed();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].get("id"), Some(&json!(2)));

    model.set_search("");
    assert_eq!(model.processed().len(), 2);
}

#[test]
fn test_twelve_rows_paginate_in_two_pages() {
    let batch: Vec<Row> = (1..=12)
        .map(|i| Row::new().with("id", i).with("nombre", format!("Tarea {i:02}")))
        .collect();
    let mut model = TableModel::new().page_size_of(10);
    model.set_batch(batch);

    let first = model.page_view();
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.rows.len(), 10);
    assert!(!first.can_prev());
    assert!(first.can_next());

    model.next_page();
    let second = model.page_view();
    assert_eq!(second.page, 2);
    assert_eq!(second.rows.len(), 2);
    assert_eq!(second.summary, PageSummary { start: 11, end: 12, total: 12 });
    assert_eq!(second.summary.to_string(), "Mostrando 11-12 de 12 registros");

    // Past the last page stays on the last page
    model.next_page();
    assert_eq!(model.page_view().page, 2);
}

#[test]
fn test_pages_reconstruct_the_collection() {
    let batch: Vec<Row> = (1..=23).map(|i| Row::new().with("id", i)).collect();
    let mut model = TableModel::new().page_size_of(5);
    model.set_batch(batch);

    let mut seen = Vec::new();
    for page in 1..=model.total_pages() {
        model.set_page(page);
        seen.extend(
            model
                .page_view()
                .rows
                .iter()
                .filter_map(|row| row.get("id").and_then(|v| v.as_i64())),
        );
    }
    assert_eq!(seen, (1..=23).collect::<Vec<i64>>());
}

#[test]
fn test_header_click_cycles_direction() {
    let mut model = TableModel::new();
    model.set_batch(rows(json!([
        {"nombre": "Beta"},
        {"nombre": "Alfa"},
        {"nombre": "Gamma"}
    ])));

    assert_eq!(names(&model), ["Beta", "Alfa", "Gamma"]);
    assert!(model.toggle_sort("nombre"));
    assert_eq!(names(&model), ["Alfa", "Beta", "Gamma"]);
    model.toggle_sort("nombre");
    assert_eq!(names(&model), ["Gamma", "Beta", "Alfa"]);
    model.toggle_sort("nombre");
    assert_eq!(names(&model), ["Alfa", "Beta", "Gamma"]);
}

#[test]
fn test_sort_is_stable_and_numeric() {
    let mut model = TableModel::new();
    model.set_batch(rows(json!([
        {"id": 10, "grupo": "x", "orden": 1},
        {"id": 9, "grupo": "y", "orden": 2},
        {"id": 100, "grupo": "x", "orden": 3}
    ])));

    model.toggle_sort("id");
    let ids: Vec<i64> = model
        .processed()
        .iter()
        .filter_map(|row| row.get("id").and_then(|v| v.as_i64()))
        .collect();
    assert_eq!(ids, [9, 10, 100]);

    model.toggle_sort("grupo");
    let order: Vec<i64> = model
        .processed()
        .iter()
        .filter_map(|row| row.get("orden").and_then(|v| v.as_i64()))
        .collect();
    assert_eq!(order, [1, 3, 2]);
}

#[test]
fn test_visibility_map_hides_columns() {
    let mut model = TableModel::new().crud(true);
    model.set_batch(rows(json!([
        {
            "id": 1,
            "nombre": "A",
            "secreto": "x",
            "esColumna": {"secreto": false}
        }
    ])));

    let keys: Vec<String> = model.columns().into_iter().map(|c| c.key).collect();
    assert_eq!(keys, ["id", "nombre", "actions"]);
    let labels: Vec<String> = model.data_columns().into_iter().map(|c| c.label).collect();
    assert_eq!(labels, ["Id", "Nombre"]);
}

#[test]
fn test_csv_export_matches_expected_text() {
    let mut model = TableModel::new().crud(true);
    model.set_batch(rows(json!([
        {"nombre": "A", "estado": "Pendiente"},
        {"nombre": "B", "estado": "Completado"}
    ])));

    let csv = model.export_csv().expect("csv");
    assert_eq!(csv, "Nombre,Estado\n\"A\",\"Pendiente\"\n\"B\",\"Completado\"");
}

#[test]
fn test_export_ignores_pagination() {
    let batch: Vec<Row> = (1..=15)
        .map(|i| Row::new().with("nombre", format!("T{i}")))
        .collect();
    let mut model = TableModel::new().page_size_of(5);
    model.set_batch(batch);
    model.set_search("t1");

    // T1, T10..T15
    let csv = model.export_csv().expect("csv");
    assert_eq!(csv.lines().count(), 1 + 7);
}
