//! End-to-end ranking flow: import, sign-ups, then the aggregation engine

use chrono::NaiveDate;
use std::sync::Arc;

use schedhub::analytics::{DayType, ReportFilter};
use schedhub::directory::Directory;
use schedhub::hub::EventHub;
use schedhub::import;
use schedhub::storage::MemoryStore;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn import_signups_and_ranking() {
    let mut hub = EventHub::new(Arc::new(MemoryStore::new()), Directory::default());

    // 2025-03-08 is a Saturday, 2025-03-10 a Monday.
    let csv = "\
제품,학회명,장소,시작일
EGL,주말학회,서울,2025-03-08
NOV,평일학회,부산,2025-03-10
";
    let batch = import::parse_csv(csv.as_bytes()).unwrap();
    let summary = hub.import(batch).await.unwrap();
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.skipped, 0);

    let ids: Vec<String> = hub.events().iter().map(|ev| ev.id.clone()).collect();
    hub.add_attendee(&ids[0], "김한수").await.unwrap();
    hub.add_attendee(&ids[1], "김한수").await.unwrap();
    hub.add_attendee(&ids[1], "송학").await.unwrap();

    let today = d("2025-06-01");

    let rows = hub.ranking_as_of(&ReportFilter::default(), today);
    assert_eq!(rows.len(), Directory::default().len());
    assert_eq!(rows[0].name, "김한수");
    assert_eq!(rows[0].count, 2);
    assert_eq!(rows[1].name, "송학");
    assert_eq!(rows[1].count, 1);

    let weekend = ReportFilter {
        day_type: DayType::Weekend,
        ..ReportFilter::default()
    };
    let rows = hub.ranking_as_of(&weekend, today);
    assert_eq!(rows.iter().find(|r| r.name == "김한수").unwrap().count, 1);
    assert_eq!(rows.iter().find(|r| r.name == "송학").unwrap().count, 0);

    let product = ReportFilter {
        product: Some("NOV".into()),
        ..ReportFilter::default()
    };
    let rows = hub.ranking_as_of(&product, today);
    assert_eq!(rows.iter().find(|r| r.name == "김한수").unwrap().count, 1);
    assert_eq!(rows.iter().find(|r| r.name == "송학").unwrap().count, 1);
}

#[tokio::test]
async fn reimporting_the_same_sheet_does_not_duplicate_events() {
    let mut hub = EventHub::new(Arc::new(MemoryStore::new()), Directory::default());

    let csv = "제품,학회명,장소,시작일\nEGL,춘계학술대회,서울,2025-03-01\n";
    hub.import(import::parse_csv(csv.as_bytes()).unwrap())
        .await
        .unwrap();
    hub.import(import::parse_csv(csv.as_bytes()).unwrap())
        .await
        .unwrap();
    assert_eq!(hub.events().len(), 1);
}
