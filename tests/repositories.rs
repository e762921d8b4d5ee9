use std::sync::Arc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use coursebook::{
    AssignmentDraft, CourseDraft, GradeCategory, GradeDraft, MemoryStore, RecordStore,
    StoreError,
    constants::{ASSIGNMENT_TABLE, COURSE_TABLE, GRADE_TABLE, STATUS_COMPLETED},
    entities::course::default_grade_categories,
    repo::{AssignmentRepository, CourseRepository, GradeRepository},
    store::Record,
};
use serde_json::{Value, json};

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => panic!("not an object"),
    }
}

fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn assignments_fill_defaults_on_read() {
    let store = store();
    store.insert(
        ASSIGNMENT_TABLE,
        record(json!({
            "Name": "Problem set 4",
            "due_date_c": "2024-03-04T17:00:00.000Z",
            "course_id_c": { "Id": 3, "name_c": "Physics" },
        })),
    );
    let repo = AssignmentRepository::new(store);

    let all = repo.get_all().await.expect("list assignments");
    assert_eq!(all.len(), 1);
    let a = &all[0];
    assert_eq!(a.title, "Problem set 4");
    assert_eq!(a.priority, "medium");
    assert_eq!(a.status, "pending");
    assert_eq!(a.notes, "");
    assert_eq!(a.grade, None);
    assert_eq!(a.course_id, Some(3));
    assert_eq!(a.due_date, Utc.with_ymd_and_hms(2024, 3, 4, 17, 0, 0).unwrap());
}

#[tokio::test]
async fn assignment_create_writes_defaults_and_both_titles() {
    let store = store();
    let repo = AssignmentRepository::new(store.clone());

    let draft = AssignmentDraft::builder()
        .title("Lab report")
        .due_date(now())
        .priority("high")
        .course_id(2)
        .build();
    let created = repo.create(&draft).await.expect("create assignment");

    assert_eq!(created.title, "Lab report");
    assert_eq!(created.status, "pending");
    assert_eq!(created.priority, "high");
    assert_eq!(created.course_id, Some(2));

    let rows = store.rows(ASSIGNMENT_TABLE);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Name"], json!("Lab report"));
    assert_eq!(rows[0]["title_c"], json!("Lab report"));
    assert_eq!(rows[0]["status_c"], json!("pending"));
    assert_eq!(rows[0]["notes_c"], json!(""));
    assert_eq!(rows[0]["due_date_c"], json!("2024-03-02T12:00:00.000Z"));
}

#[tokio::test]
async fn upcoming_skips_completed_and_out_of_window() {
    let store = store();
    let repo = AssignmentRepository::new(store.clone());

    let due = |title: &str, offset: TimeDelta, status: Option<&str>| {
        let mut draft = AssignmentDraft::builder()
            .title(title)
            .due_date(now() + offset)
            .build();
        draft.status = status.map(str::to_owned);
        draft
    };
    for draft in [
        due("tomorrow", TimeDelta::days(1), None),
        due("in a week", TimeDelta::days(7), None),
        due("done", TimeDelta::days(2), Some(STATUS_COMPLETED)),
        due("too late", TimeDelta::days(8), None),
        due("overdue", TimeDelta::hours(-1), None),
    ] {
        repo.create(&draft).await.expect("create assignment");
    }

    let upcoming = repo.get_upcoming_from(now(), 7).await.expect("upcoming");
    let titles: Vec<_> = upcoming.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["tomorrow", "in a week"]);
}

#[tokio::test]
async fn due_between_is_half_open() {
    let store = store();
    let repo = AssignmentRepository::new(store.clone());
    let start = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap();

    for (title, at) in [("midnight", start), ("noon", now()), ("next day", end)] {
        let draft = AssignmentDraft::builder().title(title).due_date(at).build();
        repo.create(&draft).await.expect("create assignment");
    }

    let due = repo.get_due_between(start, end).await.expect("due between");
    let titles: Vec<_> = due.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["midnight", "noon"]);
}

#[tokio::test]
async fn assignment_status_and_partial_updates() {
    let store = store();
    let repo = AssignmentRepository::new(store.clone());
    let created = repo
        .create(
            &AssignmentDraft::builder()
                .title("Essay")
                .due_date(now())
                .notes("outline first")
                .build(),
        )
        .await
        .expect("create assignment");

    let done = repo
        .update_status(created.id, STATUS_COMPLETED)
        .await
        .expect("update status");
    assert_eq!(done.status, STATUS_COMPLETED);
    assert_eq!(done.notes, "outline first");

    let graded = repo
        .update(created.id, &AssignmentDraft::builder().grade(0.0).build())
        .await
        .expect("update grade");
    assert_eq!(graded.grade, Some(0.0));
    assert_eq!(graded.title, "Essay");

    let missing = repo.update_status(999, STATUS_COMPLETED).await;
    assert!(matches!(missing, Err(StoreError::NoResult { .. })));
}

#[tokio::test]
async fn assignments_by_course_and_delete() {
    let store = store();
    let repo = AssignmentRepository::new(store.clone());
    for course in [1, 2, 1] {
        let draft = AssignmentDraft::builder()
            .title(format!("for {course}"))
            .due_date(now())
            .course_id(course)
            .build();
        repo.create(&draft).await.expect("create assignment");
    }

    let first = repo.get_by_course_id(1).await.expect("by course");
    assert_eq!(first.len(), 2);
    assert!(first.iter().all(|a| a.course_id == Some(1)));

    repo.delete(first[0].id).await.expect("delete");
    assert!(repo.get_by_id(first[0].id).await.expect("get").is_none());
    assert_eq!(repo.get_by_course_id(1).await.expect("by course").len(), 1);
}

#[tokio::test]
async fn undecodable_rows_are_skipped() {
    let store = store();
    store.insert(
        ASSIGNMENT_TABLE,
        record(json!({ "title_c": "ok", "due_date_c": "2024-03-04T17:00:00.000Z" })),
    );
    store.insert(
        ASSIGNMENT_TABLE,
        record(json!({ "title_c": 42, "due_date_c": "2024-03-04T17:00:00.000Z" })),
    );
    let repo = AssignmentRepository::new(store);

    let all = repo.get_all().await.expect("list assignments");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "ok");
}

#[tokio::test]
async fn assignment_columns_decode_leniently() {
    let store = store();
    store.insert(
        ASSIGNMENT_TABLE,
        record(json!({ "title_c": "Quiz", "due_date_c": "2024-03-04", "grade_c": "88" })),
    );
    store.insert(
        ASSIGNMENT_TABLE,
        record(json!({ "title_c": "Draft", "due_date_c": "whenever", "grade_c": "" })),
    );
    let repo = AssignmentRepository::new(store);

    let before = Utc::now();
    let all = repo.get_all().await.expect("list assignments");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].grade, Some(88.0));
    assert_eq!(all[0].due_date, Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap());
    assert_eq!(all[1].grade, None);
    assert!(all[1].due_date >= before);
}

#[tokio::test]
async fn grades_with_zoneless_dates_still_count() {
    let store = store();
    for (date, score) in [
        ("2024-03-02T09:00:00.000Z", 100),
        ("2024-03-02", 50),
        ("2024-03-02T09:00:00", 50),
    ] {
        store.insert(
            GRADE_TABLE,
            record(json!({
                "category_c": "Exams",
                "score_c": score,
                "date_c": date,
                "course_id_c": 1,
            })),
        );
    }
    let repo = GradeRepository::new(store);

    let grades = repo.get_by_course_id(1).await.expect("by course");
    assert_eq!(grades.len(), 3);
    assert_eq!(grades[1].date, Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap());
    assert_eq!(grades[2].date, Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap());

    let categories = [GradeCategory::new("Exams", 100.0)];
    assert_eq!(repo.calculate_course_grade(1, &categories).await, 67);
}

#[tokio::test]
async fn courses_fill_defaults_on_read() {
    let store = store();
    store.insert(
        COURSE_TABLE,
        record(json!({
            "Name": "Linear Algebra",
            "code_c": "MATH 221",
            "schedule_c": "Mon 9:00, Wed 9:00,",
            "credits_c": 0,
        })),
    );
    let repo = CourseRepository::new(store);

    let course = repo.get_by_id(1).await.expect("get course").expect("course exists");
    assert_eq!(course.name, "Linear Algebra");
    assert_eq!(course.code, "MATH 221");
    assert_eq!(course.instructor, "");
    assert_eq!(course.credits, 0);
    assert_eq!(course.color, "#4F46E5");
    assert_eq!(course.schedule, ["Mon 9:00", "Wed 9:00"]);
    assert_eq!(course.current_grade, 0.0);
    assert_eq!(course.grade_categories, default_grade_categories());
}

#[tokio::test]
async fn course_categories_read_from_string_or_array() {
    let store = store();
    store.insert(
        COURSE_TABLE,
        record(json!({ "name_c": "A", "grade_categories_c": r#"[{"name":"Labs","weight":100}]"# })),
    );
    store.insert(
        COURSE_TABLE,
        record(json!({
            "name_c": "B",
            "grade_categories_c": [{ "name": "Exams", "weight": "60" }],
        })),
    );
    store.insert(COURSE_TABLE, record(json!({ "name_c": "C", "grade_categories_c": "not json" })));
    let repo = CourseRepository::new(store);

    let courses = repo.get_all().await.expect("list courses");
    assert_eq!(courses.len(), 3);
    assert_eq!(courses[0].grade_categories, [GradeCategory::new("Labs", 100.0)]);
    assert_eq!(courses[1].grade_categories, [GradeCategory::new("Exams", 60.0)]);
    assert!(courses[2].grade_categories.is_empty());
}

#[tokio::test]
async fn course_create_and_update_grade() {
    let store = store();
    let repo = CourseRepository::new(store.clone());

    let draft = CourseDraft::builder()
        .name("Organic Chemistry")
        .code("CHEM 210")
        .credits(4)
        .schedule(vec!["Tue 13:00".to_string(), "Thu 13:00".to_string()])
        .build();
    let created = repo.create(&draft).await.expect("create course");
    assert_eq!(created.current_grade, 0.0);
    assert_eq!(created.credits, 4);
    assert_eq!(created.grade_categories, default_grade_categories());

    let rows = store.rows(COURSE_TABLE);
    assert_eq!(rows[0]["schedule_c"], json!("Tue 13:00, Thu 13:00"));
    assert!(rows[0]["grade_categories_c"].is_string());

    let updated = repo.update_grade(created.id, 88).await.expect("update grade");
    assert_eq!(updated.current_grade, 88.0);
    assert_eq!(updated.code, "CHEM 210");
}

#[tokio::test]
async fn grades_by_course() {
    let store = store();
    let repo = GradeRepository::new(store.clone());
    for (course, score) in [(1, 90.0), (2, 40.0), (1, 70.0)] {
        let draft = GradeDraft::builder()
            .title("Quiz")
            .category("Exams")
            .score(score)
            .course_id(course)
            .build();
        repo.create(&draft).await.expect("create grade");
    }

    let grades = repo.get_by_course_id(1).await.expect("by course");
    let scores: Vec<_> = grades.iter().map(|g| g.score).collect();
    assert_eq!(scores, [90.0, 70.0]);
    assert!(store.rows(GRADE_TABLE).iter().all(|row| row["date_c"].is_string()));

    let categories = [GradeCategory::new("Exams", 100.0)];
    assert_eq!(repo.calculate_course_grade(1, &categories).await, 80);
    assert_eq!(repo.calculate_course_grade(3, &categories).await, 0);
}

#[tokio::test]
async fn grade_calculation_absorbs_store_failures() {
    let store = store();
    let repo = GradeRepository::new(store.clone());
    repo.create(&GradeDraft::builder().category("Exams").score(90.0).course_id(1).build())
        .await
        .expect("create grade");

    store.set_unavailable(true);
    let categories = [GradeCategory::new("Exams", 100.0)];
    assert_eq!(repo.calculate_course_grade(1, &categories).await, 0);
    assert!(matches!(repo.get_all().await, Err(StoreError::Unavailable)));
}

#[tokio::test]
async fn store_trait_objects_share_state() {
    let memory = store();
    let shared: Arc<dyn RecordStore> = memory.clone();
    let repo = GradeRepository::new(shared);

    repo.create(&GradeDraft::builder().title("Final").score(93.5).build())
        .await
        .expect("create grade");
    assert_eq!(memory.rows(GRADE_TABLE).len(), 1);
    assert_eq!(memory.rows(GRADE_TABLE)[0]["Name"], json!("Final"));
}
