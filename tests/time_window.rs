use chrono::{DateTime, NaiveDate};
use mapp_review_analyzer::{filter_window, NormalizedReview, Platform, TimeWindow};

fn review(platform: Platform, ts: &str) -> NormalizedReview {
    NormalizedReview {
        platform,
        timestamp: DateTime::parse_from_rfc3339(ts).unwrap(),
        rating: 3,
        text: ts.to_string(),
        author: None,
        source_id: None,
        app_version: None,
        intent: None,
    }
}

fn may_first_week() -> TimeWindow {
    let w = TimeWindow::trailing(NaiveDate::from_ymd_opt(2024, 5, 7).unwrap(), 6);
    assert_eq!(w.start(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    w
}

#[test]
fn start_midnight_kept_previous_second_dropped() {
    let out = filter_window(
        vec![
            review(Platform::PlayStore, "2024-05-01T00:00:00Z"),
            review(Platform::PlayStore, "2024-04-30T23:59:59Z"),
        ],
        &may_first_week(),
    );
    assert_eq!(out.kept.len(), 1);
    assert_eq!(out.kept[0].text, "2024-05-01T00:00:00Z");
    assert_eq!(out.dropped, 1);
}

#[test]
fn only_in_window_records_remain_in_order() {
    let w = may_first_week();
    let input = vec![
        review(Platform::PlayStore, "2024-05-06T10:00:00Z"),
        review(Platform::PlayStore, "2024-03-01T10:00:00Z"),
        review(Platform::PlayStore, "2024-05-02T10:00:00Z"),
        review(Platform::AppStore, "2024-05-07T23:59:59-07:00"),
        review(Platform::AppStore, "2024-05-08T00:00:00+09:00"),
        review(Platform::AppStore, "2024-05-03T10:00:00-07:00"),
    ];
    let out = filter_window(input, &w);
    assert!(out.kept.iter().all(|r| w.contains_date(r.local_date())));
    let texts: Vec<&str> = out.kept.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "2024-05-06T10:00:00Z",
            "2024-05-02T10:00:00Z",
            "2024-05-07T23:59:59-07:00",
            "2024-05-03T10:00:00-07:00"
        ]
    );
    assert_eq!(out.dropped, 2);

    let again = filter_window(out.kept.clone(), &w);
    assert_eq!(again.kept, out.kept);
}

#[test]
fn empty_collection_is_fine() {
    let out = filter_window(Vec::new(), &may_first_week());
    assert!(out.kept.is_empty());
    assert_eq!(out.dropped, 0);
}
