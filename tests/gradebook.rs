use std::sync::Arc;

use coursebook::{
    CourseDraft, GradeCategory, GradeDraft, Gradebook, MemoryStore, OrSentinel,
    constants::COURSE_TABLE,
};
use serde_json::json;

async fn seeded() -> (Arc<MemoryStore>, Gradebook) {
    let store = Arc::new(MemoryStore::new());
    let book = Gradebook::new(store.clone());

    let physics = CourseDraft::builder()
        .name("Physics")
        .code("PHYS 101")
        .grade_categories(vec![
            GradeCategory::new("Exams", 60.0),
            GradeCategory::new("Homework", 40.0),
        ])
        .build();
    let history = CourseDraft::builder().name("History").code("HIST 140").build();
    let physics = book.courses().create(&physics).await.expect("create course");
    let history = book.courses().create(&history).await.expect("create course");

    for (course, category, score) in [
        (physics.id, "Exams", 70.0),
        (physics.id, "Exams", 90.0),
        (physics.id, "Quizzes", 10.0),
        (history.id, "Projects", 93.0),
    ] {
        let draft = GradeDraft::builder()
            .category(category)
            .score(score)
            .course_id(course)
            .build();
        book.grades().create(&draft).await.expect("create grade");
    }

    (store, book)
}

#[tokio::test]
async fn refresh_stores_the_computed_grade() {
    let (store, book) = seeded().await;

    let course = book
        .refresh_course_grade(1)
        .await
        .expect("refresh")
        .expect("course exists");
    assert_eq!(course.current_grade, 80.0);
    assert_eq!(store.rows(COURSE_TABLE)[0]["current_grade_c"], json!(80));
}

#[tokio::test]
async fn refresh_of_a_missing_course_is_none() {
    let (_, book) = seeded().await;
    assert!(book.refresh_course_grade(42).await.expect("refresh").is_none());
}

#[tokio::test]
async fn refresh_all_uses_each_course_s_categories() {
    let (_, book) = seeded().await;

    let courses = book.refresh_all_course_grades().await.expect("refresh all");
    let grades: Vec<_> = courses
        .iter()
        .map(|c| (c.code.as_str(), c.current_grade))
        .collect();
    assert_eq!(grades, [("PHYS 101", 80.0), ("HIST 140", 93.0)]);
}

#[tokio::test]
async fn unavailable_store_reads_as_sentinels() {
    let (store, book) = seeded().await;
    store.set_unavailable(true);

    assert!(book.refresh_all_course_grades().await.is_err());
    assert!(
        book.courses()
            .get_all()
            .await
            .or_sentinel("Error fetching courses")
            .is_empty()
    );
    assert!(book.courses().get_by_id(1).await.or_none("Error fetching course").flatten().is_none());
    assert!(!book.assignments().delete(1).await.succeeded("Error deleting assignment"));

    let categories = [GradeCategory::new("Exams", 100.0)];
    assert_eq!(book.grades().calculate_course_grade(1, &categories).await, 0);

    store.set_unavailable(false);
    assert!(book.assignments().delete(1).await.succeeded("Error deleting assignment"));
}
