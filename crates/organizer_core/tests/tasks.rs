use organizer_core::{Store, TaskInput, TaskRepository};

fn task_at(date: &str, bucket: &str, text: &str, created_at: &str) -> TaskInput {
    TaskInput {
        created_at: Some(created_at.to_string()),
        ..TaskInput::new(date, bucket, text)
    }
}

#[test]
fn upsert_normalizes_and_roundtrips_through_day_listing() {
    let mut store = Store::open_in_memory().unwrap();

    let stored = store
        .tasks()
        .upsert_task(TaskInput {
            text: Some("  buy milk  ".to_string()),
            person_id: Some(String::new()),
            ..TaskInput::new("2024-05-01", " morning ", "")
        })
        .unwrap();

    assert!(!stored.id.is_empty());
    assert_eq!(stored.text, "buy milk");
    assert_eq!(stored.bucket, " morning ");
    assert!(!stored.done);
    assert_eq!(stored.person_id, None);

    let listed = store.tasks().list_tasks_by_date("2024-05-01").unwrap();
    assert_eq!(listed, vec![stored]);
}

#[test]
fn missing_fields_are_accepted() {
    let mut store = Store::open_in_memory().unwrap();

    let stored = store.tasks().upsert_task(TaskInput::default()).unwrap();
    assert_eq!(stored.date, "");
    assert_eq!(stored.bucket, "");
    assert_eq!(stored.text, "");
    assert!(!stored.done);
}

#[test]
fn day_listing_orders_by_bucket_then_creation() {
    let mut store = Store::open_in_memory().unwrap();
    let mut tasks = store.tasks();

    tasks
        .upsert_task(task_at("2024-05-01", "morning", "m2", "2024-05-01T09:00:00.000Z"))
        .unwrap();
    tasks
        .upsert_task(task_at("2024-05-01", "afternoon", "a1", "2024-05-01T10:00:00.000Z"))
        .unwrap();
    tasks
        .upsert_task(task_at("2024-05-01", "morning", "m1", "2024-05-01T08:00:00.000Z"))
        .unwrap();
    tasks
        .upsert_task(task_at("2024-05-02", "morning", "other day", "2024-05-01T07:00:00.000Z"))
        .unwrap();

    let texts: Vec<String> = tasks
        .list_tasks_by_date("2024-05-01")
        .unwrap()
        .into_iter()
        .map(|task| task.text)
        .collect();
    assert_eq!(texts, vec!["a1", "m1", "m2"]);
    assert!(tasks.list_tasks_by_date("2024-05-03").unwrap().is_empty());
}

#[test]
fn set_done_refreshes_updated_at_only() {
    let mut store = Store::open_in_memory().unwrap();
    let created = store
        .tasks()
        .upsert_task(TaskInput::new("2024-05-01", "morning", "stretch"))
        .unwrap();

    let updated = store
        .tasks()
        .set_task_done(&created.id, true)
        .unwrap()
        .expect("task should exist");
    assert!(updated.done);
    assert_eq!(updated.text, created.text);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    assert!(store.tasks().set_task_done("missing", true).unwrap().is_none());
}

#[test]
fn list_by_person_uses_weak_reference() {
    let mut store = Store::open_in_memory().unwrap();
    let mut tasks = store.tasks();
    for (date, person) in [("2024-05-01", "p1"), ("2024-05-03", "p1"), ("2024-05-02", "p2")] {
        tasks
            .upsert_task(TaskInput {
                person_id: Some(person.to_string()),
                ..TaskInput::new(date, "morning", "follow up")
            })
            .unwrap();
    }

    let dates: Vec<String> = tasks
        .list_tasks_by_person("p1")
        .unwrap()
        .into_iter()
        .map(|task| task.date)
        .collect();
    assert_eq!(dates, vec!["2024-05-03", "2024-05-01"]);
}

#[test]
fn delete_is_unconditional() {
    let mut store = Store::open_in_memory().unwrap();
    let task = store
        .tasks()
        .upsert_task(TaskInput::new("2024-05-01", "morning", "temp"))
        .unwrap();

    store.tasks().delete_task(&task.id).unwrap();
    store.tasks().delete_task(&task.id).unwrap();
    assert!(store.tasks().get_task(&task.id).unwrap().is_none());
}
