use std::sync::Arc;

use prep_core::model::{
    Answer, Difficulty, PerformanceRecord, Question, QuestionId, RecordId, SessionKind,
};
use prep_core::time::fixed_now;
use storage::repository::{KeyValueStore, PERFORMANCE_HISTORY_KEY};
use storage::sqlite::SqliteRepository;
use storage::{PerformanceStore, Storage, StudyDaysStore};

fn exam_record() -> PerformanceRecord {
    let questions: Vec<Question> = (1..=3)
        .map(|id| {
            Question::new(
                QuestionId::new(id),
                format!("Q{id}"),
                ["10", "20", "30", "40"].map(String::from),
                "20",
                "Mathematics",
            )
            .unwrap()
            .with_hint("Think in tens")
            .with_explanation("Because")
            .with_illustration("blackboard-with-numbers")
        })
        .collect();
    let answers = vec![
        Answer::grade(&questions[0], "20"),
        Answer::grade(&questions[1], "10"),
        Answer::grade(&questions[2], "20"),
    ];
    PerformanceRecord::from_session(
        RecordId::generate(),
        fixed_now(),
        SessionKind::FullExam {
            difficulty: Difficulty::Hard,
        },
        questions,
        answers,
    )
    .unwrap()
}

#[tokio::test]
async fn sqlite_put_overwrites_whole_value() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("missing").await.unwrap(), None);

    repo.put("key", "first").await.unwrap();
    repo.put("key", "second").await.unwrap();
    assert_eq!(repo.get("key").await.unwrap().as_deref(), Some("second"));
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate_twice?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn performance_log_round_trips_through_sqlite() {
    let storage = Storage::sqlite("sqlite:file:memdb_perf_log?mode=memory&cache=shared")
        .await
        .expect("storage");

    let store = PerformanceStore::load(Arc::clone(&storage.kv)).await;
    let record = exam_record();
    store.append(record.clone()).await.unwrap();

    let reloaded = PerformanceStore::load(Arc::clone(&storage.kv)).await;
    let log = reloaded.load_all().await;
    assert_eq!(log, vec![record]);
    assert_eq!(log[0].score(), 2);
    assert_eq!(log[0].questions()[0].illustration(), Some("blackboard-with-numbers"));
}

#[tokio::test]
async fn unparseable_log_in_sqlite_is_treated_as_empty() {
    let storage = Storage::sqlite("sqlite:file:memdb_corrupt_log?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage
        .kv
        .put(PERFORMANCE_HISTORY_KEY, "definitely not json")
        .await
        .unwrap();

    let store = PerformanceStore::load(Arc::clone(&storage.kv)).await;
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn study_days_persist_next_to_history() {
    let storage = Storage::sqlite("sqlite:file:memdb_study_days?mode=memory&cache=shared")
        .await
        .expect("storage");

    let days = StudyDaysStore::load(Arc::clone(&storage.kv)).await;
    days.toggle(4).await.unwrap();

    let history = PerformanceStore::load(Arc::clone(&storage.kv)).await;
    history.append(exam_record()).await.unwrap();

    let reloaded = StudyDaysStore::load(Arc::clone(&storage.kv)).await;
    assert!(reloaded.days().await.is_completed(4));
}
