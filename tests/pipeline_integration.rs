use std::path::Path;

use banner_scraper::{
    IdCounter, RunOutcome, ScrapeError, ScrapeOutcome, ScrapingConfig, ScrapingContext, Term,
    fetch_schedule, fetch_terms, run, scrape_all,
};
use calamine::{Data, Reader, Xlsx, open_workbook};
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path},
};

const START: &str = "/pls/prod/swssschd.P_SelDefSchTerm";
const DISCIPLINES: &str = "/pls/prod/swssschd.P_SelDisc";
const SCHEDULE: &str = "/pls/prod/swssschd.P_ShowSchd";

fn select(name: &str, options: &[(&str, &str)]) -> String {
    let options: String = options
        .iter()
        .map(|(label, value)| format!("<option value=\"{value}\">{label}</option>"))
        .collect();
    format!("<html><body><form><select name=\"{name}\">{options}</select></form></body></html>")
}

fn schedule_page(crns: &[&str]) -> String {
    let rows: String = crns
        .iter()
        .map(|crn| format!("<tr><td>{crn}</td><td>Course {crn}</td><td>TBA</td></tr>"))
        .collect();
    format!(
        "<html><body>
         <table><tr><td>SUNY Polytechnic Institute</td></tr></table>
         <table><tr><td>Class Schedule</td></tr></table>
         <table><tr><th>CRN</th><th>Title</th><th>Room</th></tr>{rows}</table>
         </body></html>"
    )
}

async fn mount_html(server: &MockServer, http_method: &str, at: &str, body: String) {
    Mock::given(method(http_method))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_disciplines(server: &MockServer, term: &str, options: &[(&str, &str)]) {
    Mock::given(method("POST"))
        .and(path(DISCIPLINES))
        .and(body_string_contains(format!("term_in={term}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(select("disc_in", options)))
        .mount(server)
        .await;
}

async fn mount_schedule(server: &MockServer, term: &str, discipline: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(SCHEDULE))
        .and(body_string_contains(format!("term_in={term}")))
        .and(body_string_contains(format!("disc_in={discipline}")))
        .respond_with(response)
        .mount(server)
        .await;
}

fn page_response(crns: &[&str]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(schedule_page(crns))
}

fn context(server: &MockServer, dir: &TempDir, json: bool) -> ScrapingContext {
    let mut vars = vec![
        ("BANNER_BASE_URL".to_string(), server.uri()),
        (
            "BANNER_OUTPUT_FILENAME".to_string(),
            dir.path().join("schedule.xlsx").display().to_string(),
        ),
        ("BANNER_REQUEST_TIMEOUT_SECS".to_string(), "5".to_string()),
    ];
    if json {
        vars.push((
            "BANNER_JSON_OUTPUT".to_string(),
            dir.path().join("schedule.json").display().to_string(),
        ));
    }
    let config = ScrapingConfig::from_vars(vars).unwrap();
    ScrapingContext::with_config(config).unwrap()
}

fn collected(outcome: ScrapeOutcome) -> (Vec<banner_scraper::TermTable>, u64) {
    match outcome {
        ScrapeOutcome::Collected {
            term_tables,
            next_id,
        } => (term_tables, next_id),
        ScrapeOutcome::NoTerms => panic!("expected terms to be found"),
    }
}

/// Reads every sheet of a written workbook back as (name, rows).
fn read_workbook(path: &Path) -> Vec<(String, Vec<Vec<Data>>)> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    workbook
        .sheet_names()
        .into_iter()
        .map(|name| {
            let range = workbook.worksheet_range(&name).unwrap();
            let rows = range.rows().map(<[Data]>::to_vec).collect();
            (name, rows)
        })
        .collect()
}

fn text(value: &str) -> Data {
    Data::String(value.to_string())
}

#[tokio::test]
async fn single_term_single_discipline_end_to_end() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_html(&server, "GET", START, select("term_in", &[("Fall 2024", "202410")])).await;
    mount_disciplines(&server, "202410", &[("Computer Science", "CSCI")]).await;
    mount_schedule(&server, "202410", "CSCI", page_response(&["10234", "10235"])).await;

    let ctx = context(&server, &dir, true);
    let (term_tables, next_id) = collected(scrape_all(&ctx).await);
    assert_eq!(term_tables.len(), 1);
    let table = &term_tables[0].table;
    assert_eq!(table.header(), vec!["CRN", "Title", "Room", "ID", "Term"]);
    assert_eq!(table.rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
    assert!(table.rows.iter().all(|r| r.term == "202410"));
    assert_eq!(next_id, 3);

    let outcome = run(&ctx).await.unwrap();
    let expected_path = dir.path().join("schedule.xlsx");
    assert_eq!(
        outcome,
        RunOutcome::Written {
            path: expected_path.clone(),
            json_path: Some(dir.path().join("schedule.json")),
            sheets: 1,
            rows: 2,
            next_id: 3,
        }
    );
    let sheets = read_workbook(&expected_path);
    assert_eq!(sheets.len(), 1);
    let (name, rows) = &sheets[0];
    assert_eq!(name, "202410");
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[0],
        vec![text("CRN"), text("Title"), text("Room"), text("ID"), text("Term")]
    );
    assert_eq!(
        rows[1],
        vec![
            Data::Float(10234.0),
            text("Course 10234"),
            text("TBA"),
            Data::Float(1.0),
            text("202410"),
        ]
    );
    assert_eq!(rows[2][0], Data::Float(10235.0));
    assert_eq!(rows[2][3], Data::Float(2.0));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("schedule.json")).unwrap())
            .unwrap();
    assert_eq!(json["202410"][1]["ID"], 2);
    assert_eq!(json["202410"][1]["CRN"], "10235");
    assert_eq!(json["202410"][0]["Term"], "202410");
}

#[tokio::test]
async fn session_cookie_is_sent_with_later_requests() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    Mock::given(method("GET"))
        .and(path(START))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "SESSID=abc123; Path=/")
                .set_body_string(select("term_in", &[("Fall 2024", "202410")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(DISCIPLINES))
        .and(header("cookie", "SESSID=abc123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(select("disc_in", &[("Computer Science", "CSCI")])),
        )
        .mount(&server)
        .await;
    mount_schedule(&server, "202410", "CSCI", page_response(&["10234"])).await;

    let ctx = context(&server, &dir, false);
    let (term_tables, _) = collected(scrape_all(&ctx).await);
    assert_eq!(term_tables.len(), 1);
}

#[tokio::test]
async fn ids_are_unique_and_increase_term_major() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_html(
        &server,
        "GET",
        START,
        select("term_in", &[("Fall 2024", "202410"), ("Spring 2025", "202420")]),
    )
    .await;
    for term in ["202410", "202420"] {
        mount_disciplines(&server, term, &[("Computer Science", "CSCI"), ("Math", "MATH")]).await;
    }
    mount_schedule(&server, "202410", "CSCI", page_response(&["1", "2"])).await;
    mount_schedule(&server, "202410", "MATH", page_response(&["3"])).await;
    mount_schedule(&server, "202420", "CSCI", page_response(&[])).await;
    mount_schedule(&server, "202420", "MATH", page_response(&["4", "5", "6"])).await;

    let ctx = context(&server, &dir, false);
    let (term_tables, next_id) = collected(scrape_all(&ctx).await);

    let ids: Vec<u64> = term_tables
        .iter()
        .flat_map(|t| t.table.rows.iter().map(|r| r.id))
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(next_id, 7);
    assert_eq!(term_tables[1].term.value, "202420");
    assert!(term_tables[1].table.rows.iter().all(|r| r.term == "202420"));
}

#[tokio::test]
async fn server_errors_skip_the_item_and_the_run_continues() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_html(
        &server,
        "GET",
        START,
        select("term_in", &[("Broken", "202390"), ("Fall 2024", "202410")]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(DISCIPLINES))
        .and(body_string_contains("term_in=202390"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_disciplines(&server, "202410", &[("Biology", "BIOL"), ("Computer Science", "CSCI")]).await;
    mount_schedule(&server, "202410", "BIOL", ResponseTemplate::new(500)).await;
    mount_schedule(&server, "202410", "CSCI", page_response(&["10234"])).await;

    let ctx = context(&server, &dir, false);
    let outcome = run(&ctx).await.unwrap();
    match outcome {
        RunOutcome::Written {
            sheets,
            rows,
            next_id,
            ..
        } => {
            assert_eq!(sheets, 1);
            assert_eq!(rows, 1);
            assert_eq!(next_id, 2);
        }
        other => panic!("expected a written workbook, got {other:?}"),
    }
}

#[tokio::test]
async fn failing_fetches_surface_as_errors() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    Mock::given(method("GET"))
        .and(path(START))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_schedule(&server, "202410", "CSCI", ResponseTemplate::new(503)).await;

    let ctx = context(&server, &dir, false);
    let err = fetch_terms(&ctx).await.unwrap_err();
    assert!(matches!(err, ScrapeError::HttpStatus { status, .. } if status.as_u16() == 500));

    let term = Term {
        label: "Fall 2024".into(),
        value: "202410".into(),
    };
    let discipline = banner_scraper::Discipline {
        label: "Computer Science".into(),
        value: "CSCI".into(),
    };
    let mut ids = IdCounter::new();
    let err = fetch_schedule(&ctx, &term, &discipline, &mut ids)
        .await
        .unwrap_err();
    assert!(matches!(err, ScrapeError::HttpStatus { status, .. } if status.as_u16() == 503));
    assert_eq!(ids.peek(), 1);
}

#[tokio::test]
async fn no_terms_means_no_output() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_html(&server, "GET", START, select("term_in", &[])).await;

    let ctx = context(&server, &dir, true);
    assert_eq!(run(&ctx).await.unwrap(), RunOutcome::NoTerms);
    assert!(!dir.path().join("schedule.xlsx").exists());
    assert!(!dir.path().join("schedule.json").exists());
}

#[tokio::test]
async fn missing_schedule_tables_mean_no_output() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_html(&server, "GET", START, select("term_in", &[("Fall 2024", "202410")])).await;
    mount_disciplines(&server, "202410", &[("Computer Science", "CSCI")]).await;
    mount_schedule(
        &server,
        "202410",
        "CSCI",
        ResponseTemplate::new(200)
            .set_body_string("<table><tr><th>Only</th></tr><tr><td>one</td></tr></table>"),
    )
    .await;

    let ctx = context(&server, &dir, false);
    assert_eq!(run(&ctx).await.unwrap(), RunOutcome::NoData);
    assert!(!dir.path().join("schedule.xlsx").exists());
}

#[tokio::test]
async fn colliding_sheet_names_still_produce_a_workbook() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let prefix = "T".repeat(31);
    let first = format!("{prefix}A");
    let second = format!("{prefix}B");
    mount_html(
        &server,
        "GET",
        START,
        select("term_in", &[("First", first.as_str()), ("Second", second.as_str())]),
    )
    .await;
    for term in [&first, &second] {
        mount_disciplines(&server, term, &[("Computer Science", "CSCI")]).await;
    }
    mount_schedule(&server, &first, "CSCI", page_response(&["1"])).await;
    mount_schedule(&server, &second, "CSCI", page_response(&["2"])).await;

    let ctx = context(&server, &dir, false);
    match run(&ctx).await.unwrap() {
        RunOutcome::Written { path, sheets, .. } => {
            assert_eq!(sheets, 1);
            let sheets = read_workbook(&path);
            assert_eq!(sheets.len(), 1);
            let (name, rows) = &sheets[0];
            assert_eq!(name, &prefix);
            assert_eq!(rows.len(), 2);
            assert_eq!(
                rows[1],
                vec![
                    Data::Float(2.0),
                    text("Course 2"),
                    text("TBA"),
                    Data::Float(2.0),
                    text(&second),
                ]
            );
        }
        other => panic!("expected a written workbook, got {other:?}"),
    }
}
