//! Table listing, record editor, order form and dashboard.

use std::time::Duration;

use rotten_erp::db::Db;
use rotten_erp::error::Error;
use rotten_erp::model::*;
use rotten_erp::view::dashboard::{UNKNOWN_LABEL, dashboard};
use rotten_erp::view::order_form::{self, OrderForm};
use rotten_erp::view::table::{DELETE_PROMPT, EMPTY_STATE};
use rotten_erp::view::*;

fn test_db() -> Db {
    Db::in_memory().expect("failed to create in-memory db")
}

fn id(s: &str) -> RecordId {
    RecordId::from(s)
}

// ---------------------------------------------------------------------------
// Listing + search
// ---------------------------------------------------------------------------

#[test]
fn listing_renders_configured_columns() {
    let db = test_db();
    let view = TableView::new(Collection::Tasks);

    let listing = view.listing(db.snapshot());

    assert_eq!(listing.title, "Tareas");
    assert_eq!(listing.columns, vec!["Nombre", "Costo por unidad"]);
    assert_eq!(listing.rows.len(), 4);
    assert_eq!(listing.rows[0].cells, vec!["Corte", "$150"]);
    assert!(listing.empty_message().is_none());
}

#[test]
fn production_listing_shows_status_label_and_local_date() {
    let db = test_db();
    let listing = TableView::new(Collection::Production).listing(db.snapshot());

    let cells = &listing.rows[0].cells;
    assert_eq!(cells[0], "o1");
    assert_eq!(cells[1], "En Proceso");
    assert_eq!(cells[2], "50");
    assert_eq!(cells[3].len(), 10);
    assert_eq!(cells[3].matches('/').count(), 2);
}

#[test]
fn missing_optional_fields_render_blank() {
    let mut db = test_db();
    db.add::<Workshop>(NewWorkshop {
        name: "Taller Norte".to_string(),
        ..NewWorkshop::default()
    })
    .unwrap();

    let listing = TableView::new(Collection::Workshops).listing(db.snapshot());
    let last = listing.rows.last().unwrap();
    assert_eq!(last.cells, vec!["Taller Norte", "", ""]);
}

#[test]
fn search_is_case_insensitive_substring_over_record() {
    let db = test_db();
    let mut view = TableView::new(Collection::Articles);

    view.set_search("hoo-hw");
    let rows = view.listing(db.snapshot()).rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id("a2"));

    // Matches on any serialized field, the category included.
    view.set_search("PANTALONES");
    assert_eq!(view.visible(db.snapshot()).len(), 1);
}

#[test]
fn search_matches_ids_too() {
    let db = test_db();
    let mut view = TableView::new(Collection::Workshops);
    view.set_search("w2");

    let rows = view.listing(db.snapshot()).rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cells[0], "Confección Sur");
}

#[test]
fn search_with_no_match_shows_empty_state() {
    let db = test_db();
    let before = db.list();
    let mut view = TableView::new(Collection::Processes);
    view.set_search("zzz-no-such-thing");

    let listing = view.listing(db.snapshot());

    assert!(listing.rows.is_empty());
    assert_eq!(listing.empty_message(), Some(EMPTY_STATE));
    assert_eq!(db.list(), before);
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

#[test]
fn new_record_round_trip_through_editor() {
    let mut db = test_db();
    let mut view = TableView::new(Collection::Articles);

    view.open_new().unwrap();
    let form = view.form_mut().unwrap();
    form.set("name", "Buzo Canguro").unwrap();
    form.set("sku", "BUZ-CA-005").unwrap();
    form.set("category", "Abrigo").unwrap();

    let outcome = view.save(&mut db).unwrap();

    let SaveOutcome::Saved(Record::Article(article)) = outcome else {
        panic!("expected a saved article");
    };
    assert_eq!(article.sku, "BUZ-CA-005");
    assert_eq!(view.mode(), &Mode::Listing);
    assert_eq!(db.list().articles.len(), 4);
}

#[test]
fn save_without_name_is_blocked_and_writes_nothing() {
    let mut db = test_db();
    let before = db.list();
    let mut view = TableView::new(Collection::Workshops);

    view.open_new().unwrap();
    view.form_mut().unwrap().set("location", "Quilmes").unwrap();

    assert_eq!(view.save(&mut db).unwrap(), SaveOutcome::Blocked);
    assert!(matches!(view.mode(), Mode::Editing { .. }));
    assert_eq!(db.list(), before);
}

#[test]
fn unparseable_cost_blocks_save() {
    let mut db = test_db();
    let mut view = TableView::new(Collection::Tasks);

    view.open_new().unwrap();
    let form = view.form_mut().unwrap();
    form.set("name", "Planchado").unwrap();
    form.set("costPerUnit", "barato").unwrap();

    assert_eq!(view.save(&mut db).unwrap(), SaveOutcome::Blocked);

    view.form_mut().unwrap().set("costPerUnit", "$75.5").unwrap();
    let SaveOutcome::Saved(Record::Task(task)) = view.save(&mut db).unwrap() else {
        panic!("expected a saved task");
    };
    assert_eq!(task.cost_per_unit, 75.5);
}

#[test]
fn edit_prefills_form_and_updates_in_place() {
    let mut db = test_db();
    let mut view = TableView::new(Collection::Tasks);

    view.open_edit(db.snapshot(), &id("t3")).unwrap();
    let form = view.form_mut().unwrap();
    assert_eq!(form.get("name"), Some("Estampado"));
    assert_eq!(form.get("costPerUnit").map(str::parse::<f64>), Some(Ok(200.0)));
    form.set("costPerUnit", "250").unwrap();

    view.save(&mut db).unwrap();

    let data = db.list();
    assert_eq!(data.tasks.len(), 4);
    assert_eq!(data.task(&id("t3")).unwrap().cost_per_unit, 250.0);
}

#[test]
fn cancel_discards_form() {
    let mut db = test_db();
    let before = db.list();
    let mut view = TableView::new(Collection::Processes);

    view.open_edit(db.snapshot(), &id("p1")).unwrap();
    view.form_mut().unwrap().set("name", "Otro nombre").unwrap();
    view.cancel();

    assert_eq!(view.mode(), &Mode::Listing);
    assert!(view.form_mut().is_none());
    assert!(view.save(&mut db).is_err());
    assert_eq!(db.list(), before);
}

#[test]
fn edit_of_missing_record_is_not_found() {
    let db = test_db();
    let mut view = TableView::new(Collection::Articles);

    assert!(matches!(
        view.open_edit(db.snapshot(), &id("a99")),
        Err(Error::NotFound { .. })
    ));
    assert_eq!(view.mode(), &Mode::Listing);
}

#[test]
fn orders_cannot_be_created_from_table() {
    let mut view = TableView::new(Collection::Production);
    assert!(matches!(view.open_new(), Err(Error::Invalid(_))));
}

#[test]
fn order_editor_only_changes_status() {
    let mut db = test_db();
    let before = db.snapshot().order(&id("o1")).cloned().unwrap();
    let mut view = TableView::new(Collection::Production);

    view.open_edit(db.snapshot(), &id("o1")).unwrap();
    let form = view.form_mut().unwrap();
    assert_eq!(form.get("status"), Some("En Proceso"));
    assert!(matches!(form.set("quantity", "999"), Err(Error::Invalid(_))));
    assert!(matches!(form.set("workshopId", "w2"), Err(Error::Invalid(_))));
    form.set("status", "Completado").unwrap();

    view.save(&mut db).unwrap();

    let after = db.snapshot().order(&id("o1")).unwrap();
    assert_eq!(after.status, OrderStatus::Completed);
    assert_eq!(after.quantity, before.quantity);
    assert_eq!(after.workshop_id, before.workshop_id);
    assert_eq!(after.date, before.date);
}

#[test]
fn unknown_status_blocks_order_save() {
    let mut db = test_db();
    let mut view = TableView::new(Collection::Production);

    view.open_edit(db.snapshot(), &id("o1")).unwrap();
    view.form_mut().unwrap().set("status", "Enviado").unwrap();

    assert_eq!(view.save(&mut db).unwrap(), SaveOutcome::Blocked);
}

// ---------------------------------------------------------------------------
// Delete with confirmation
// ---------------------------------------------------------------------------

#[test]
fn declined_confirmation_deletes_nothing() {
    let mut db = test_db();
    let before = db.list();
    let mut view = TableView::new(Collection::Workshops);

    let mut asked = None;
    let outcome = view
        .request_delete(&mut db, &id("w1"), &mut |prompt: &str| {
            asked = Some(prompt.to_string());
            false
        })
        .unwrap();

    assert_eq!(outcome, DeleteOutcome::Declined);
    assert_eq!(asked.as_deref(), Some(DELETE_PROMPT));
    assert_eq!(db.list(), before);
}

#[test]
fn confirmed_delete_routes_by_collection() {
    let mut db = test_db();

    let mut orders = TableView::new(Collection::Production);
    let outcome = orders
        .request_delete(&mut db, &id("o1"), &mut |_: &str| true)
        .unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted(1));
    assert!(db.list().production.is_empty());

    let mut articles = TableView::new(Collection::Articles);
    articles
        .request_delete(&mut db, &id("a1"), &mut |_: &str| true)
        .unwrap();
    assert!(db.list().article(&id("a1")).is_none());
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[test]
fn dashboard_on_seed_data() {
    let db = test_db();
    let stats = dashboard(db.snapshot());

    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.active_orders, 1);
    assert_eq!(stats.completed_orders, 0);
    assert_eq!(stats.article_count, 3);
    assert_eq!(stats.workshop_count, 2);

    let counts: Vec<_> = stats.by_status.iter().map(|s| (s.status, s.count)).collect();
    assert_eq!(
        counts,
        vec![
            (OrderStatus::Pending, 0),
            (OrderStatus::InProgress, 1),
            (OrderStatus::Completed, 0),
        ]
    );

    assert_eq!(stats.recent.len(), 1);
    assert_eq!(stats.recent[0].article, "Remera Oversize Basic");
    assert_eq!(stats.recent[0].workshop, "Taller Central");
}

#[test]
fn dashboard_shows_three_newest_and_unknown_references() {
    let mut db = test_db();
    for q in 1..=3 {
        db.add_order(NewOrder::new("w2", "a2", "t1", "p1", q)).unwrap();
    }
    let newest = db
        .add_order(NewOrder::new("w-gone", "a-gone", "t1", "p1", 9))
        .unwrap();
    db.set_order_status(&id("o1"), OrderStatus::Completed).unwrap();

    let stats = dashboard(db.snapshot());

    assert_eq!(stats.total_orders, 5);
    assert_eq!(stats.active_orders, 4);
    assert_eq!(stats.completed_orders, 1);
    assert_eq!(stats.recent.len(), 3);
    assert_eq!(stats.recent[0].id, newest.id);
    assert_eq!(stats.recent[0].article, UNKNOWN_LABEL);
    assert_eq!(stats.recent[0].workshop, UNKNOWN_LABEL);
    assert_eq!(stats.recent[1].article, "Hoodie Heavyweight");
    assert!(stats.recent.iter().all(|o| o.id != id("o1")));
}

#[test]
fn cancelled_orders_count_as_neither_active_nor_completed() {
    let mut db = test_db();
    db.set_order_status(&id("o1"), OrderStatus::Cancelled).unwrap();

    let stats = dashboard(db.snapshot());
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.active_orders, 0);
    assert_eq!(stats.completed_orders, 0);
    assert!(stats.by_status.iter().all(|s| s.count == 0));
}

// ---------------------------------------------------------------------------
// Order form
// ---------------------------------------------------------------------------

#[test]
fn select_options_match_form_labels() {
    let db = test_db();
    let data = db.snapshot();

    assert_eq!(order_form::article_options(data)[0].label, "REM-OV-001 - Remera Oversize Basic");
    assert_eq!(order_form::task_options(data)[1].label, "Confección ($500)");
    assert_eq!(order_form::workshop_options(data)[1].label, "Confección Sur");
    assert_eq!(order_form::process_options(data)[0].value, id("p1"));
}

#[test]
fn order_form_requires_workshop_article_and_positive_quantity() {
    let complete = OrderForm {
        workshop_id: "w1".to_string(),
        article_id: "a1".to_string(),
        task_id: "t1".to_string(),
        process_id: "p1".to_string(),
        quantity: "10".to_string(),
        notes: String::new(),
    };
    let new = complete.validate().unwrap();
    assert_eq!(new.quantity, 10);
    assert!(new.notes.is_none());

    for broken in [
        OrderForm {
            workshop_id: String::new(),
            ..complete.clone()
        },
        OrderForm {
            article_id: " ".to_string(),
            ..complete.clone()
        },
        OrderForm {
            quantity: "0".to_string(),
            ..complete.clone()
        },
        OrderForm {
            quantity: "muchos".to_string(),
            ..complete.clone()
        },
    ] {
        assert!(broken.validate().is_none(), "{broken:?} should be blocked");
    }
}

#[tokio::test]
async fn order_form_submit_creates_pending_order() {
    let mut db = test_db();
    let form = OrderForm {
        workshop_id: "w1".to_string(),
        article_id: "a1".to_string(),
        task_id: "t1".to_string(),
        process_id: "p1".to_string(),
        quantity: "10".to_string(),
        notes: "Talles surtidos".to_string(),
    };

    let order = form
        .submit(&mut db, Duration::from_millis(5))
        .await
        .unwrap()
        .expect("form is complete");

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.notes.as_deref(), Some("Talles surtidos"));
    let data = db.list();
    assert_eq!(data.production.len(), 2);
    assert_eq!(data.production[0].id, order.id);
}

#[tokio::test]
async fn incomplete_order_form_writes_nothing() {
    let mut db = test_db();
    let before = db.list();

    let created = OrderForm::default()
        .submit(&mut db, Duration::ZERO)
        .await
        .unwrap();

    assert!(created.is_none());
    assert_eq!(db.list(), before);
}

// ---------------------------------------------------------------------------
// Field tables
// ---------------------------------------------------------------------------

#[test]
fn only_order_status_is_editable() {
    let editable: Vec<_> = view_of(Collection::Production)
        .editable_fields()
        .map(|f| f.key)
        .collect();
    assert_eq!(editable, vec!["status"]);

    for collection in Collection::ALL.into_iter().filter(|c| c.is_catalog()) {
        let name = view_of(collection).field("name").unwrap();
        assert!(name.required && name.editable);
    }
}
