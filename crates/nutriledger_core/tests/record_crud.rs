use chrono::{DateTime, NaiveDate, Utc};
use nutriledger_core::db::open_db_in_memory;
use nutriledger_core::{
    ExpenseCategory, ExpenseRecord, ExpenseRepository, LedgerService, MealRecord,
    MealRepository, MealType, RecordOrder, RecordQuery, RecordWindow, RepoError,
    SqliteExpenseRepository, SqliteMealRepository,
};
use rusqlite::params;
use rust_decimal::Decimal;

const OWNER: i64 = 1;
const OTHER_OWNER: i64 = 2;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at_ms(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap()
}

#[test]
fn meal_create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMealRepository::new(&conn);

    let meal = MealRecord::new(OWNER, "Porridge", MealType::Breakfast, date(2026, 2, 17))
        .with_calories(Decimal::new(32050, 2))
        .with_notes("with honey");
    let id = repo.create_meal(&meal).unwrap();

    let loaded = repo.get_meal(OWNER, id).unwrap().unwrap();
    assert_eq!(loaded, meal);
}

#[test]
fn expense_create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteExpenseRepository::new(&conn);

    let expense = ExpenseRecord::new(
        OWNER,
        "Train ticket",
        Decimal::new(1250, 2),
        ExpenseCategory::Transport,
        date(2026, 2, 3),
    );
    let id = repo.create_expense(&expense).unwrap();

    let loaded = repo.get_expense(OWNER, id).unwrap().unwrap();
    assert_eq!(loaded, expense);
    assert_eq!(loaded.category_label(), "Transport");
}

#[test]
fn records_are_invisible_to_other_owners() {
    let conn = open_db_in_memory().unwrap();
    let service = LedgerService::sqlite(&conn);

    let meal = MealRecord::new(OWNER, "Salad", MealType::Lunch, date(2026, 2, 17));
    service.create_meal(&meal).unwrap();

    assert!(service.get_meal(OTHER_OWNER, meal.id).unwrap().is_none());
    assert!(service
        .list_meals(OTHER_OWNER, &RecordQuery::default())
        .unwrap()
        .is_empty());
    assert!(matches!(
        service.delete_meal(OTHER_OWNER, meal.id),
        Err(RepoError::NotFound(id)) if id == meal.id
    ));

    let mut hijacked = meal.clone();
    hijacked.owner_id = OTHER_OWNER;
    assert!(matches!(
        service.update_meal(OTHER_OWNER, &hijacked),
        Err(RepoError::NotFound(_))
    ));
    assert!(service.get_meal(OWNER, meal.id).unwrap().is_some());
}

#[test]
fn update_replaces_fields_and_keeps_owner() {
    let conn = open_db_in_memory().unwrap();
    let service = LedgerService::sqlite(&conn);

    let mut expense = ExpenseRecord::new(
        OWNER,
        "Groceries",
        Decimal::new(4599, 2),
        ExpenseCategory::Groceries,
        date(2026, 2, 10),
    );
    service.create_expense(&expense).unwrap();

    expense.title = "Weekly groceries".to_string();
    expense.amount = Decimal::new(5199, 2);
    expense.spent_at = date(2026, 2, 11);
    service.update_expense(OWNER, &expense).unwrap();

    let loaded = service.get_expense(OWNER, expense.id).unwrap().unwrap();
    assert_eq!(loaded.title, "Weekly groceries");
    assert_eq!(loaded.amount, Decimal::new(5199, 2));
    assert_eq!(loaded.spent_at, date(2026, 2, 11));
    assert_eq!(loaded.owner_id, OWNER);
}

#[test]
fn update_stamps_updated_at_and_keeps_created_at() {
    let conn = open_db_in_memory().unwrap();
    let service = LedgerService::sqlite(&conn);

    let mut meal = MealRecord::new(OWNER, "Rice", MealType::Dinner, date(2026, 2, 12))
        .with_created_at(at_ms(1_000));
    service.create_meal(&meal).unwrap();
    let created = service.get_meal(OWNER, meal.id).unwrap().unwrap();
    assert_eq!(created.updated_at, at_ms(1_000));

    meal.name = "Fried rice".to_string();
    service.update_meal(OWNER, &meal).unwrap();
    let updated = service.get_meal(OWNER, meal.id).unwrap().unwrap();
    assert_eq!(updated.created_at, at_ms(1_000));
    assert!(updated.updated_at > at_ms(1_000));

    let mut expense = ExpenseRecord::new(
        OWNER,
        "Cinema",
        Decimal::new(1200, 2),
        ExpenseCategory::Entertainment,
        date(2026, 2, 12),
    )
    .with_created_at(at_ms(2_000));
    service.create_expense(&expense).unwrap();

    expense.amount = Decimal::new(1350, 2);
    service.update_expense(OWNER, &expense).unwrap();
    let updated = service.get_expense(OWNER, expense.id).unwrap().unwrap();
    assert_eq!(updated.created_at, at_ms(2_000));
    assert!(updated.updated_at > updated.created_at);
}

#[test]
fn delete_is_permanent() {
    let conn = open_db_in_memory().unwrap();
    let service = LedgerService::sqlite(&conn);

    let meal = MealRecord::new(OWNER, "Toast", MealType::Breakfast, date(2026, 2, 1));
    service.create_meal(&meal).unwrap();
    service.delete_meal(OWNER, meal.id).unwrap();

    assert!(service.get_meal(OWNER, meal.id).unwrap().is_none());
    assert!(matches!(
        service.delete_meal(OWNER, meal.id),
        Err(RepoError::NotFound(_))
    ));
}

#[test]
fn validation_failure_blocks_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let service = LedgerService::sqlite(&conn);

    let blank = MealRecord::new(OWNER, "  ", MealType::Snack, date(2026, 2, 1));
    assert!(matches!(
        service.create_meal(&blank),
        Err(RepoError::Validation(_))
    ));

    let mut expense = ExpenseRecord::new(
        OWNER,
        "Cinema",
        Decimal::new(1500, 2),
        ExpenseCategory::Entertainment,
        date(2026, 2, 1),
    );
    service.create_expense(&expense).unwrap();
    expense.amount = Decimal::ZERO;
    assert!(matches!(
        service.update_expense(OWNER, &expense),
        Err(RepoError::Validation(_))
    ));
}

#[test]
fn listing_orders_by_date_then_created_at_descending() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMealRepository::new(&conn);

    let older_day = MealRecord::new(OWNER, "a", MealType::Dinner, date(2026, 2, 1))
        .with_created_at(at_ms(5_000));
    let same_day_early = MealRecord::new(OWNER, "b", MealType::Breakfast, date(2026, 2, 2))
        .with_created_at(at_ms(1_000));
    let same_day_late = MealRecord::new(OWNER, "c", MealType::Lunch, date(2026, 2, 2))
        .with_created_at(at_ms(2_000));
    for meal in [&older_day, &same_day_early, &same_day_late] {
        repo.create_meal(meal).unwrap();
    }

    let listed = repo.list_meals(OWNER, &RecordQuery::default()).unwrap();
    let names: Vec<&str> = listed.iter().map(|meal| meal.name.as_str()).collect();
    assert_eq!(names, vec!["c", "b", "a"]);

    let chronological = repo
        .list_meals(
            OWNER,
            &RecordQuery::window(RecordWindow::All, RecordOrder::Chronological),
        )
        .unwrap();
    let names: Vec<&str> = chronological.iter().map(|meal| meal.name.as_str()).collect();
    assert_eq!(names, vec!["b", "c", "a"]);
}

#[test]
fn listing_filters_by_window_category_and_paginates() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteExpenseRepository::new(&conn);

    let rows = [
        ("lunch", ExpenseCategory::Food, date(2026, 2, 3)),
        ("dinner", ExpenseCategory::Food, date(2026, 2, 14)),
        ("bus", ExpenseCategory::Transport, date(2026, 2, 14)),
        ("snack", ExpenseCategory::Food, date(2026, 3, 1)),
        ("old", ExpenseCategory::Food, date(2025, 2, 14)),
    ];
    for (title, category, spent_at) in rows {
        repo.create_expense(&ExpenseRecord::new(
            OWNER,
            title,
            Decimal::new(1000, 2),
            category,
            spent_at,
        ))
        .unwrap();
    }

    let february = RecordQuery {
        window: RecordWindow::month(2026, 2).unwrap(),
        ..RecordQuery::default()
    };
    assert_eq!(repo.list_expenses(OWNER, &february).unwrap().len(), 3);

    let february_food = RecordQuery {
        category: Some(ExpenseCategory::Food),
        ..february.clone()
    };
    let food = repo.list_expenses(OWNER, &february_food).unwrap();
    let titles: Vec<&str> = food.iter().map(|expense| expense.title.as_str()).collect();
    assert_eq!(titles, vec!["dinner", "lunch"]);

    let valentines = RecordQuery {
        window: RecordWindow::day(date(2026, 2, 14)),
        ..RecordQuery::default()
    };
    assert_eq!(repo.list_expenses(OWNER, &valentines).unwrap().len(), 2);

    let second_page = RecordQuery {
        limit: Some(2),
        offset: 2,
        ..RecordQuery::default()
    };
    assert_eq!(repo.list_expenses(OWNER, &second_page).unwrap().len(), 2);
}

#[test]
fn legacy_category_key_is_preserved_on_read() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteExpenseRepository::new(&conn);

    let expense = ExpenseRecord::new(
        OWNER,
        "Vet",
        Decimal::new(8000, 2),
        ExpenseCategory::Other,
        date(2026, 2, 5),
    );
    repo.create_expense(&expense).unwrap();
    conn.execute(
        "UPDATE expenses SET category = 'pets' WHERE id = ?1;",
        params![expense.id.to_string()],
    )
    .unwrap();

    let loaded = repo.get_expense(OWNER, expense.id).unwrap().unwrap();
    assert_eq!(loaded.category, "pets");
    assert_eq!(loaded.category(), ExpenseCategory::Other);
    assert_eq!(loaded.category_label(), "Other");
}

#[test]
fn corrupted_rows_surface_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteExpenseRepository::new(&conn);

    let expense = ExpenseRecord::new(
        OWNER,
        "Pharmacy",
        Decimal::new(999, 2),
        ExpenseCategory::Health,
        date(2026, 2, 5),
    );
    repo.create_expense(&expense).unwrap();
    conn.execute(
        "UPDATE expenses SET amount = 'lots' WHERE id = ?1;",
        params![expense.id.to_string()],
    )
    .unwrap();

    let err = repo
        .list_expenses(OWNER, &RecordQuery::default())
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("expenses.amount")));
}

#[test]
fn category_and_meal_type_listings_match_fixed_tables() {
    let conn = open_db_in_memory().unwrap();
    let service = LedgerService::sqlite(&conn);

    let categories = service.categories();
    assert_eq!(categories.len(), 8);
    assert_eq!(categories[7].key, "other");
    assert_eq!(categories[7].label, "Other");
    assert_eq!(service.meal_types().len(), 4);
}
