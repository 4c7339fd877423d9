//! End-to-end list pipeline scenarios over plain records and storefront types.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use storefront_core::domain::{
    MetricContext, Order, OrderStatus, PaymentStatus, Product, Resource, Review, ReviewStatus,
};
use storefront_core::query::DateWindow;
use storefront_core::snapshot;
use storefront_core::{
    apply, evaluate, evaluate_with, reduce, Collection, Diagnostic, FieldAccessorMap, FieldError,
    FieldFilter, FieldKind, FieldRef, FieldValue, MetricSpec, Mutation, QueryDescriptor, Record,
    RecordPredicate, SequentialIds, SortKey, StockLevel,
};

#[derive(Debug, Clone, PartialEq)]
struct Item {
    id: String,
    status: String,
    price: f64,
    is_active: bool,
}

impl Record for Item {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.as_str().into()),
            "status" => Some(self.status.as_str().into()),
            "price" => Some(self.price.into()),
            "isActive" => Some(self.is_active.into()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match (name, value) {
            ("isActive", FieldValue::Bool(active)) => self.is_active = active,
            ("isActive", _) => return Err(FieldError::kind_mismatch(name, FieldKind::Boolean)),
            _ => return Err(FieldError::UnknownField(name.to_string())),
        }
        Ok(())
    }
}

fn item(id: &str, status: &str, price: f64, is_active: bool) -> Item {
    Item {
        id: id.to_string(),
        status: status.to_string(),
        price,
        is_active,
    }
}

fn items() -> Collection<Item> {
    Collection::new(vec![
        item("a", "pending", 10.0, true),
        item("b", "active", 20.0, false),
        item("c", "active", 5.0, true),
    ])
}

fn item_accessors() -> FieldAccessorMap<Item> {
    FieldAccessorMap::new()
        .record_field("id", FieldKind::Text)
        .record_field("status", FieldKind::Enum)
        .record_field("price", FieldKind::Number)
        .record_field("isActive", FieldKind::Boolean)
        .search_in(&["id", "status"])
}

fn ids<R: Record>(records: impl IntoIterator<Item = Arc<R>>) -> Vec<String> {
    records.into_iter().map(|r| r.id().to_string()).collect()
}

#[test]
fn active_items_sorted_by_price() {
    let query = QueryDescriptor::new()
        .filter(FieldFilter::equals("status", "active"))
        .sort(SortKey::asc("price"))
        .page(1)
        .page_size(10);

    let result = evaluate(&items(), &query, &item_accessors());

    assert_eq!(ids(result.visible_items), vec!["c", "b"]);
    assert_eq!(result.total_matched, 2);
    assert_eq!(result.total_pages, 1);
}

#[test]
fn stats_count_and_average_over_full_collection() {
    let price = FieldRef::new("price", FieldKind::Number, |i: &Item| i.price.into());
    let specs = vec![
        MetricSpec::count(
            "active",
            RecordPredicate::new(|i: &Item| i.status == "active"),
        ),
        MetricSpec::average("averagePrice", price),
    ];

    let stats = reduce(&items(), &specs);

    assert_eq!(stats.scalar("active"), Some(2.0));
    let average = stats.scalar("averagePrice").unwrap();
    assert!((average - 35.0 / 3.0).abs() < 1e-9);
}

#[test]
fn toggle_touches_only_target_record() {
    let records = items();
    let next = apply(&records, Mutation::toggle("b", "isActive"));

    assert!(next.find("b").unwrap().is_active);
    assert!(!records.find("b").unwrap().is_active);
    assert!(Arc::ptr_eq(next.find("a").unwrap(), records.find("a").unwrap()));
    assert!(Arc::ptr_eq(next.find("c").unwrap(), records.find("c").unwrap()));
}

#[test]
fn empty_input_yields_single_empty_page() {
    let queries = [
        QueryDescriptor::new(),
        QueryDescriptor::new().search("lamp").page(4),
        QueryDescriptor::new()
            .filter(FieldFilter::range("price", Some(1.0), None))
            .sort(SortKey::desc("price"))
            .page_size(0),
    ];

    for query in &queries {
        let result = evaluate(&Collection::<Item>::empty(), query, &item_accessors());
        assert!(result.visible_items.is_empty());
        assert_eq!(result.total_matched, 0);
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.page, 1);
    }
}

#[test]
fn average_over_empty_is_zero() {
    let price = FieldRef::new("price", FieldKind::Number, |i: &Item| i.price.into());
    let stats = reduce(
        &Collection::<Item>::empty(),
        &[MetricSpec::average("averagePrice", price)],
    );
    assert_eq!(stats.scalar("averagePrice"), Some(0.0));
}

#[test]
fn remove_unknown_id_keeps_same_collection() {
    let records = items();
    let next = apply(&records, Mutation::remove("missing"));
    assert!(next.ptr_eq(&records));
    assert_eq!(next, records);
}

fn catalog() -> Collection<Product> {
    let json = r#"[
        {"id":"p1","name":"Desk Lamp","sku":"LMP-1","category":"Lighting","price":40,"stock":3,"isActive":true,"isFeatured":true,"createdAt":"2024-03-01T09:00:00Z"},
        {"id":"p2","name":"Floor Lamp","sku":"LMP-2","category":"lighting","price":120,"stock":0,"isActive":true,"createdAt":"2024-03-08T09:00:00Z"},
        {"id":"p3","name":"Ceramic Mug","sku":"MUG-1","category":"Kitchen","description":"Stoneware, holds a lamp's worth of coffee","price":12,"stock":40,"createdAt":"2024-02-20T09:00:00Z"},
        {"id":"p4","name":"Notebook","sku":"NTB-1","price":6,"stock":8,"isActive":true,"createdAt":"2024-03-09T09:00:00Z"}
    ]"#;
    Collection::from_json_str(json).unwrap()
}

#[test]
fn product_search_spans_name_and_description() {
    let query = QueryDescriptor::new().search("  LAMP ").sort(SortKey::asc("price"));
    let result = evaluate(&catalog(), &query, &Product::accessors());
    assert_eq!(ids(result.visible_items), vec!["p3", "p1", "p2"]);
}

#[test]
fn product_stock_filters_use_external_threshold() {
    let low =
        QueryDescriptor::new().filter(FieldFilter::stock("stock", StockLevel::LowStock, 10.0));
    let result = evaluate(&catalog(), &low, &Product::accessors());
    assert_eq!(ids(result.visible_items), vec!["p1", "p4"]);

    let tight =
        QueryDescriptor::new().filter(FieldFilter::stock("stock", StockLevel::LowStock, 5.0));
    let result = evaluate(&catalog(), &tight, &Product::accessors());
    assert_eq!(ids(result.visible_items), vec!["p1"]);
}

#[test]
fn product_category_filter_ignores_case_and_skips_absent() {
    let query = QueryDescriptor::new().filter(FieldFilter::one_of("category", ["LIGHTING"]));
    let result = evaluate(&catalog(), &query, &Product::accessors());
    assert_eq!(result.total_matched, 2);
}

#[test]
fn product_date_window_is_inclusive() {
    let now = Utc.with_ymd_and_hms(2024, 3, 9, 9, 0, 0).unwrap();
    let window = DateWindow::last(Duration::days(8), now);
    let query = QueryDescriptor::new()
        .filter(window.filter("createdAt"))
        .sort(SortKey::desc("createdAt"));
    let result = evaluate(&catalog(), &query, &Product::accessors());
    assert_eq!(ids(result.visible_items), vec!["p4", "p2", "p1"]);
}

#[test]
fn product_dashboard_ignores_active_filters() {
    let context = MetricContext::new(Utc::now()).with_low_stock_threshold(10.0);
    let stats = reduce(&catalog(), &Product::dashboard_metrics(&context));

    assert_eq!(stats.scalar("total"), Some(4.0));
    assert_eq!(stats.scalar("active"), Some(3.0));
    assert_eq!(stats.scalar("featured"), Some(1.0));
    assert_eq!(stats.scalar("outOfStock"), Some(1.0));
    assert_eq!(stats.scalar("lowStock"), Some(2.0));
    assert_eq!(stats.scalar("inventoryValue"), Some(120.0 + 480.0 + 48.0));
    assert_eq!(stats.scalar("averagePrice"), Some(178.0 / 4.0));
    assert_eq!(stats.scalar("categories"), Some(2.0));
}

#[test]
fn product_duplicate_appends_hidden_copy() {
    let records = catalog();
    let generator = Arc::new(SequentialIds::new("prod"));
    let next = apply(&records, Mutation::duplicate("p1", generator));

    let copy = next.records().last().unwrap();
    assert_eq!(copy.id, "prod-1");
    assert_eq!(copy.name, "Desk Lamp (Copy)");
    assert!(!copy.is_active);
    assert_eq!(next.len(), records.len() + 1);
}

#[test]
fn unknown_keys_degrade_with_diagnostics() {
    let query = QueryDescriptor::new()
        .filter(FieldFilter::equals("colour", "red"))
        .filter(FieldFilter::range("name", Some(1.0), None))
        .sort(SortKey::asc("popularity"));

    let mut seen = Vec::new();
    let result = evaluate_with(&catalog(), &query, &Product::accessors(), &mut |d: &Diagnostic| {
        seen.push(d.clone())
    });

    assert_eq!(ids(result.visible_items), vec!["p1", "p2", "p3", "p4"]);
    assert_eq!(seen.len(), 3);
    assert!(seen.contains(&Diagnostic::UnknownSortField {
        field: "popularity".into()
    }));
}

#[test]
fn order_status_distribution_and_revenue() {
    let json = r#"[
        {"id":"o1","orderNumber":"ORD-1","customer":{"name":"Ana","email":"ana@example.com"},"status":"delivered","paymentStatus":"paid","total":100,"createdAt":"2024-03-01T00:00:00Z"},
        {"id":"o2","orderNumber":"ORD-2","customer":{"name":"Bo","email":"bo@example.com"},"status":"cancelled","paymentStatus":"refunded","total":50,"createdAt":"2024-03-02T00:00:00Z"},
        {"id":"o3","orderNumber":"ORD-3","customer":{"name":"Cy","email":"cy@example.com"},"status":"pending","paymentStatus":"pending","total":30,"createdAt":"2024-03-03T00:00:00Z"},
        {"id":"o4","orderNumber":"ORD-4","customer":{"name":"Di","email":"di@example.com"},"status":"delivered","paymentStatus":"paid","total":20,"createdAt":"2024-03-04T00:00:00Z"}
    ]"#;
    let orders: Collection<Order> = Collection::from_json_str(json).unwrap();
    let stats = reduce(&orders, &Order::dashboard_metrics(&MetricContext::new(Utc::now())));

    assert_eq!(stats.scalar("totalRevenue"), Some(150.0));
    assert_eq!(stats.scalar("delivered"), Some(2.0));
    assert_eq!(stats.scalar("shipped"), Some(0.0));

    let distribution = stats.distribution("statusDistribution").unwrap();
    assert_eq!(distribution.len(), 6);
    let delivered = distribution.iter().find(|b| b.label == "delivered").unwrap();
    assert_eq!(delivered.percentage, 50.0);

    let by_email = QueryDescriptor::new().search("bo@EXAMPLE");
    let result = evaluate(&orders, &by_email, &Order::accessors());
    assert_eq!(ids(result.visible_items), vec!["o2"]);
}

#[test]
fn review_rating_distribution_lists_all_stars() {
    let json = r#"[
        {"id":"r1","rating":5,"status":"approved","isVerified":true,"user":{"name":"Ana"},"product":{"id":"p1","name":"Lamp"},"createdAt":"2024-03-01T00:00:00Z"},
        {"id":"r2","rating":5,"status":"pending","user":{"name":"Bo"},"product":{"id":"p1","name":"Lamp"},"createdAt":"2024-03-02T00:00:00Z"},
        {"id":"r3","rating":2,"status":"pending","user":{"name":"Cy"},"product":{"id":"p3","name":"Mug"},"createdAt":"2024-03-03T00:00:00Z"}
    ]"#;
    let reviews: Collection<Review> = Collection::from_json_str(json).unwrap();
    let stats = reduce(&reviews, &Review::dashboard_metrics(&MetricContext::new(Utc::now())));

    assert_eq!(stats.scalar("averageRating"), Some(4.0));
    assert_eq!(stats.scalar("pending"), Some(2.0));
    assert_eq!(stats.scalar("verified"), Some(1.0));
    let counts: Vec<usize> = stats
        .distribution("ratingDistribution")
        .unwrap()
        .iter()
        .map(|b| b.count)
        .collect();
    assert_eq!(counts, vec![2, 0, 0, 1, 0]);
}

#[test]
fn partial_product_records_load_and_sort_first_by_date() {
    let dir = tempfile::tempdir().unwrap();
    let path = snapshot::snapshot_path(dir.path(), Product::KIND);
    std::fs::write(
        &path,
        r#"[
            {"id":"p1","name":"Desk Lamp","price":40,"stock":3,"createdAt":"2024-03-01T09:00:00Z"},
            {"id":"p2","name":"Mug","price":5}
        ]"#,
    )
    .unwrap();

    let products: Collection<Product> = snapshot::load(&path).unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products.find("p2").unwrap().created_at, None);

    let query = QueryDescriptor::new().sort(SortKey::asc("createdAt"));
    let result = evaluate(&products, &query, &Product::accessors());
    assert_eq!(ids(result.visible_items), vec!["p2", "p1"]);
}

#[test]
fn unrecognised_statuses_and_missing_customer_degrade() {
    let json = r#"[
        {"id":"o1","orderNumber":"ORD-1","customer":{"name":"Ana","email":"ana@example.com"},"status":"delivered","paymentStatus":"paid","total":100,"createdAt":"2024-03-01T00:00:00Z"},
        {"id":"o2","status":"returned","paymentStatus":"chargeback","total":40}
    ]"#;
    let orders: Collection<Order> = Collection::from_json_str(json).unwrap();
    let odd = orders.find("o2").unwrap();
    assert_eq!(odd.status, OrderStatus::Unknown);
    assert_eq!(odd.payment_status, PaymentStatus::Unknown);
    assert_eq!(odd.customer.name, "");

    let stats = reduce(&orders, &Order::dashboard_metrics(&MetricContext::new(Utc::now())));
    assert_eq!(stats.scalar("total"), Some(2.0));
    assert_eq!(stats.scalar("delivered"), Some(1.0));
    assert_eq!(stats.scalar("totalRevenue"), Some(140.0));

    let delivered = QueryDescriptor::new().filter(FieldFilter::one_of("status", ["delivered"]));
    let result = evaluate(&orders, &delivered, &Order::accessors());
    assert_eq!(ids(result.visible_items), vec!["o1"]);
}

#[test]
fn reviews_without_author_or_status_still_load() {
    let json = r#"[
        {"id":"r1","rating":4,"status":"flagged","product":{"id":"p1","name":"Lamp"}},
        {"id":"r2","rating":5,"status":"approved","user":{"name":"Bo"},"product":{"id":"p1","name":"Lamp"},"createdAt":"2024-03-02T00:00:00Z"}
    ]"#;
    let reviews: Collection<Review> = Collection::from_json_str(json).unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews.find("r1").unwrap().status, ReviewStatus::Unknown);

    let result = evaluate(&reviews, &QueryDescriptor::new().search("bo"), &Review::accessors());
    assert_eq!(ids(result.visible_items), vec!["r2"]);
}
