mod common;

use axum::http::StatusCode;
use common::{assert_hx_redirect, assert_redirect, assert_status, body_json, body_string, TestApp};

#[tokio::test]
async fn feed_merges_both_collections() {
    let app = TestApp::new().await;
    let diary_a = app.seed_diary("Same time A", "2024-03-10T12:00:00").await;
    let diary_b = app.seed_diary("Same time B", "2024-03-10T12:00:00").await;
    let late = app
        .seed_schedule("Late call", "2024-03-10T23:30:00", "2024-03-11T00:30:00Z")
        .await;

    let resp = app.get("/api/calendar?date=2024-03-10").await;
    assert_status(&resp, StatusCode::OK);
    let feed = body_json(resp).await;

    let events = feed["events"].as_array().unwrap();
    assert_eq!(events.len(), 3);

    assert_eq!(events[0]["category"], "schedule");
    assert_eq!(events[0]["all_day"], false);
    assert_eq!(events[0]["start"], "2024-03-10T23:30:00Z");
    assert_eq!(events[0]["source"]["entry"]["id"], late.as_str());
    assert_eq!(events[0]["style"]["background"], "#3174ad");

    assert_eq!(events[1]["source"]["entry"]["id"], diary_a.as_str());
    assert_eq!(events[2]["source"]["entry"]["id"], diary_b.as_str());
    for diary in &events[1..] {
        assert_eq!(diary["category"], "diary");
        assert_eq!(diary["all_day"], true);
        assert_eq!(diary["start"], diary["end"]);
        assert_eq!(diary["style"]["background"], "#28a745");
    }

    assert_eq!(feed["agenda"]["date"], "2024-03-10");
    assert_eq!(feed["agenda"]["schedule"][0]["id"], late.as_str());
    assert_eq!(feed["agenda"]["diary"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn feed_agenda_respects_utc_day_boundaries() {
    let app = TestApp::new().await;
    app.seed_diary("Midnight", "2024-03-10T00:00:00Z").await;
    app.seed_diary("Last second", "2024-03-10T23:59:59Z").await;
    app.seed_diary("Next day", "2024-03-11T00:00:00Z").await;
    app.seed_schedule("Overnight", "2024-03-09T22:00:00", "2024-03-10T02:00:00")
        .await;

    let feed = body_json(app.get("/api/calendar?date=2024-03-10").await).await;
    let titles: Vec<&str> = feed["agenda"]["diary"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Midnight", "Last second"]);
    assert!(feed["agenda"]["schedule"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn calendar_page_shows_month_and_day_panel() {
    let app = TestApp::new().await;
    app.seed_diary("Beach day", "2024-03-10T12:00:00").await;
    app.seed_schedule("Dentist", "2024-03-10T15:00:00", "2024-03-10T16:00:00")
        .await;

    let resp = app.get("/?date=2024-03-10").await;
    assert_status(&resp, StatusCode::OK);
    let html = body_string(resp).await;

    assert!(html.contains("March 2024"));
    assert!(html.contains("Schedule for 2024/03/10"));
    assert!(html.contains("Dentist"));
    assert!(html.contains("2024/03/10 15:00 - 2024/03/10 16:00"));
    assert!(html.contains("background-color: #3174ad"));
    assert!(html.contains("background-color: #28a745"));
}

#[tokio::test]
async fn diary_tab_lists_entries_for_selected_day_only() {
    let app = TestApp::new().await;
    app.seed_diary("On the day", "2024-03-10T12:00:00").await;
    app.seed_diary("Day after", "2024-03-11T12:00:00").await;

    let html = body_string(app.get("/?date=2024-03-10&tab=diary").await).await;
    assert!(html.contains("Diary for 2024/03/10"));
    assert!(html.contains("Notes about On the day"));
    assert!(!html.contains("Notes about Day after"));
}

#[tokio::test]
async fn edit_link_opens_editor_on_entry_date() {
    let app = TestApp::new().await;
    let id = app
        .seed_schedule("Review", "2024-03-12T09:00:00", "2024-03-12T10:00:00")
        .await;

    let html = body_string(
        app.get(&format!("/?date=2024-03-01&edit=schedule:{id}"))
            .await,
    )
    .await;
    assert!(html.contains("Edit Schedule Entry"));
    assert!(html.contains(&format!("action=\"/agenda/{id}\"")));
    assert!(html.contains("value=\"2024-03-12T09:00\""));
    assert!(html.contains("Schedule for 2024/03/12"));
}

#[tokio::test]
async fn create_diary_from_form_pins_noon_utc() {
    let app = TestApp::new().await;

    let resp = app
        .post_form("/diary", "date=2024-03-10&title=Walk&content=Long+walk")
        .await;
    assert_redirect(&resp, "/?date=2024-03-10&tab=diary");

    let stored: (String,) = sqlx::query_as("SELECT created_at FROM diary_entries")
        .fetch_one(&app.db)
        .await
        .unwrap();
    assert_eq!(stored.0, "2024-03-10T12:00:00");
}

#[tokio::test]
async fn create_diary_with_empty_fields_shows_errors() {
    let app = TestApp::new().await;

    let resp = app
        .post_form("/diary", "date=2024-03-10&title=Kept+title&content=")
        .await;
    assert_status(&resp, StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("Content is required"));
    assert!(html.contains("value=\"Kept title\""));
    assert_eq!(app.count("diary_entries").await, 0);
}

#[tokio::test]
async fn create_schedule_from_form() {
    let app = TestApp::new().await;

    let resp = app
        .post_form(
            "/agenda",
            "date=2024-03-10&title=Lunch&description=&start_time=2024-03-10T12%3A00&end_time=2024-03-10T13%3A00",
        )
        .await;
    assert_redirect(&resp, "/?date=2024-03-10&tab=schedule");

    let stored: (String, String, Option<String>) =
        sqlx::query_as("SELECT start_time, end_time, description FROM schedule_entries")
            .fetch_one(&app.db)
            .await
            .unwrap();
    assert_eq!(stored.0, "2024-03-10T12:00:00");
    assert_eq!(stored.1, "2024-03-10T13:00:00");
    assert_eq!(stored.2, None);
}

#[tokio::test]
async fn update_schedule_with_bad_time_keeps_editor_open() {
    let app = TestApp::new().await;
    let id = app
        .seed_schedule("Review", "2024-03-12T09:00:00", "2024-03-12T10:00:00")
        .await;

    let resp = app
        .post_form(
            &format!("/agenda/{id}"),
            "date=2024-03-12&title=Review&description=&start_time=whenever&end_time=2024-03-12T10%3A00",
        )
        .await;
    assert_status(&resp, StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("Edit Schedule Entry"));
    assert!(html.contains("Start time is not a valid date and time"));
    assert!(html.contains("value=\"whenever\""));
}

#[tokio::test]
async fn update_diary_from_form() {
    let app = TestApp::new().await;
    let id = app.seed_diary("Draft", "2024-03-10T12:00:00").await;

    let resp = app
        .post_form(
            &format!("/diary/{id}"),
            "date=2024-03-10&title=Final&content=Done",
        )
        .await;
    assert_redirect(&resp, "/?date=2024-03-10&tab=diary");

    let stored: (String, String) =
        sqlx::query_as("SELECT title, content FROM diary_entries WHERE id = ?")
            .bind(&id)
            .fetch_one(&app.db)
            .await
            .unwrap();
    assert_eq!(stored, ("Final".to_string(), "Done".to_string()));
}

#[tokio::test]
async fn delete_from_calendar_redirects_to_entry_day() {
    let app = TestApp::new().await;
    let diary = app.seed_diary("Gone", "2024-03-10T12:00:00").await;
    let schedule = app
        .seed_schedule("Gone too", "2024-03-12T09:00:00", "2024-03-12T10:00:00")
        .await;

    let resp = app.delete(&format!("/diary/{diary}")).await;
    assert_hx_redirect(&resp, "/?date=2024-03-10&tab=diary");

    let resp = app.delete(&format!("/agenda/{schedule}")).await;
    assert_hx_redirect(&resp, "/?date=2024-03-12&tab=schedule");

    assert_eq!(app.count("diary_entries").await, 0);
    assert_eq!(app.count("schedule_entries").await, 0);

    let resp = app.delete("/diary/missing").await;
    assert_hx_redirect(&resp, "/");
}

#[tokio::test]
async fn health_is_ok() {
    let app = TestApp::new().await;
    let resp = app.get("/health").await;
    assert_status(&resp, StatusCode::OK);
    assert_eq!(body_string(resp).await, "ok");
}

#[tokio::test]
async fn earliest_representable_date_still_renders() {
    let app = TestApp::new().await;

    let resp = app.get("/?date=-262143-01-01").await;
    assert_status(&resp, StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("January -262143"));

    let resp = app.get("/api/calendar?date=-262143-01-01").await;
    assert_status(&resp, StatusCode::OK);
}
