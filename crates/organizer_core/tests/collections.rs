use organizer_core::{
    AppointmentInput, AppointmentRepository, CashEntryInput, CashRepository, DocumentInput,
    DocumentRepository, RepoError, Store,
};

#[test]
fn appointments_list_by_day_in_time_order() {
    let mut store = Store::open_in_memory().unwrap();
    let mut appointments = store.appointments();

    appointments
        .upsert_appointment(AppointmentInput::new("2024-05-01", "14:30", " dentist "))
        .unwrap();
    appointments
        .upsert_appointment(AppointmentInput::new("2024-05-01", "09:00", "standup"))
        .unwrap();
    appointments
        .upsert_appointment(AppointmentInput::new("2024-05-02", "08:00", "gym"))
        .unwrap();

    let titles: Vec<String> = appointments
        .list_appointments("2024-05-01")
        .unwrap()
        .into_iter()
        .map(|appointment| appointment.title)
        .collect();
    assert_eq!(titles, vec!["standup", "dentist"]);
}

#[test]
fn appointment_reupsert_keeps_identity() {
    let mut store = Store::open_in_memory().unwrap();
    let created = store
        .appointments()
        .upsert_appointment(AppointmentInput::new("2024-05-01", "09:00", "standup"))
        .unwrap();

    let mut edit = AppointmentInput::from(created.clone());
    edit.location = Some("  room 2 ".to_string());
    edit.done = Some(true);
    let updated = store.appointments().upsert_appointment(edit).unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.location, "room 2");
    assert!(updated.done);

    store.appointments().delete_appointment(&created.id).unwrap();
    assert!(store
        .appointments()
        .get_appointment(&created.id)
        .unwrap()
        .is_none());
}

#[test]
fn cash_range_listing_and_balance() {
    let mut store = Store::open_in_memory().unwrap();
    let mut cash = store.cash();

    cash.upsert_cash(CashEntryInput::new("2024-04-30", 99_999, "outside range"))
        .unwrap();
    cash.upsert_cash(CashEntryInput::new("2024-05-01", 150_000, "salary"))
        .unwrap();
    cash.upsert_cash(CashEntryInput {
        category: Some(" food ".to_string()),
        ..CashEntryInput::new("2024-05-02", -3_250, " groceries ")
    })
    .unwrap();
    cash.upsert_cash(CashEntryInput::new("2024-05-31", -50_000, "rent"))
        .unwrap();

    let month = cash.list_cash_between("2024-05-01", "2024-05-31").unwrap();
    let descriptions: Vec<&str> = month.iter().map(|entry| entry.description.as_str()).collect();
    assert_eq!(descriptions, vec!["salary", "groceries", "rent"]);
    assert_eq!(month[1].category, "food");

    let summary = cash.cash_balance_between("2024-05-01", "2024-05-31").unwrap();
    assert_eq!(summary.income_cents, 150_000);
    assert_eq!(summary.expense_cents, 53_250);
    assert_eq!(summary.net_cents, 96_750);
    assert_eq!(summary.entries, 3);

    assert_eq!(cash.list_cash("2024-05-02").unwrap().len(), 1);
}

#[test]
fn cash_balance_reports_overflow_instead_of_panicking() {
    let mut store = Store::open_in_memory().unwrap();
    let mut cash = store.cash();
    cash.upsert_cash(CashEntryInput::new("2024-05-01", i64::MIN, "chargeback"))
        .unwrap();
    cash.upsert_cash(CashEntryInput::new("2024-06-01", i64::MAX, "jackpot"))
        .unwrap();
    cash.upsert_cash(CashEntryInput::new("2024-06-02", 1, "interest"))
        .unwrap();

    let err = cash
        .cash_balance_between("2024-05-01", "2024-05-01")
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
    let err = cash
        .cash_balance_between("2024-06-01", "2024-06-30")
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));

    let summary = cash.cash_balance_between("2024-06-01", "2024-06-01").unwrap();
    assert_eq!(summary.income_cents, i64::MAX);
    assert_eq!(summary.entries, 1);
}

#[test]
fn related_links_are_trimmed_on_write_and_lookup() {
    let mut store = Store::open_in_memory().unwrap();
    let receipt = store
        .documents()
        .upsert_document(DocumentInput::new("2024-05-01", "receipt").related_to(" cash ", " c-7 "))
        .unwrap();
    assert_eq!(receipt.related_type.as_deref(), Some("cash"));
    assert_eq!(receipt.related_id.as_deref(), Some("c-7"));

    for (related_type, related_id) in [("cash", "c-7"), (" cash", "c-7 "), ("cash\t", "\nc-7")] {
        let found = store
            .documents()
            .list_related_documents(related_type, related_id)
            .unwrap();
        assert_eq!(found.len(), 1, "lookup {related_type:?}/{related_id:?}");
        assert_eq!(found[0].id, receipt.id);
    }
}

#[test]
fn documents_store_attachments_and_related_links() {
    let mut store = Store::open_in_memory().unwrap();
    let payload = vec![0_u8, 159, 146, 150, 255];

    let invoice = store
        .documents()
        .upsert_document(DocumentInput {
            mime_type: Some("application/pdf".to_string()),
            attachment: Some(payload.clone()),
            ..DocumentInput::new("2024-05-01", " invoice ").related_to("tasks", "task-1")
        })
        .unwrap();
    store
        .documents()
        .upsert_document(DocumentInput::new("2024-05-01", "photo").related_to("tasks", "task-2"))
        .unwrap();
    store
        .documents()
        .upsert_document(
            DocumentInput::new("2024-05-02", "ticket").related_to("appointments", "task-1"),
        )
        .unwrap();

    let loaded = store.documents().get_document(&invoice.id).unwrap().unwrap();
    assert_eq!(loaded.title, "invoice");
    assert_eq!(loaded.attachment.as_deref(), Some(payload.as_slice()));
    assert_eq!(loaded, invoice);

    let related = store
        .documents()
        .list_related_documents("tasks", "task-1")
        .unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].id, invoice.id);

    assert_eq!(store.documents().list_documents("2024-05-01").unwrap().len(), 2);

    store.documents().delete_document(&invoice.id).unwrap();
    assert!(store
        .documents()
        .list_related_documents("tasks", "task-1")
        .unwrap()
        .is_empty());
}

#[test]
fn by_person_listings_cover_every_dependent_collection() {
    let mut store = Store::open_in_memory().unwrap();
    store
        .appointments()
        .upsert_appointment(AppointmentInput {
            person_id: Some("p1".to_string()),
            ..AppointmentInput::new("2024-05-01", "09:00", "visit")
        })
        .unwrap();
    store
        .cash()
        .upsert_cash(CashEntryInput {
            person_id: Some("p1".to_string()),
            ..CashEntryInput::new("2024-05-01", 2_000, "refund")
        })
        .unwrap();
    store
        .documents()
        .upsert_document(DocumentInput {
            person_id: Some("p1".to_string()),
            ..DocumentInput::new("2024-05-01", "id copy")
        })
        .unwrap();

    assert_eq!(
        store.appointments().list_appointments_by_person("p1").unwrap().len(),
        1
    );
    assert_eq!(store.cash().list_cash_by_person("p1").unwrap().len(), 1);
    assert_eq!(store.documents().list_documents_by_person("p1").unwrap().len(), 1);
    assert!(store.cash().list_cash_by_person("p2").unwrap().is_empty());
}
