//! Demo organisation for empty databases.
//!
//! One sign-in per role forms a reporting chain from the super admin down to
//! an employee. A handful of extra staff, tasks, leave requests, attendance
//! records and notifications give every page something to show.

use chrono::{Duration, NaiveDate, NaiveTime};
use shared_types::{
    count_weekdays, weekdays_between, AppConfig, AppError, CreateStaffRequest, DemoAccount, Role,
};
use sqlx::SqlitePool;

use crate::auth::password;
use crate::repo;
use crate::service::today;

struct Person {
    name: &'static str,
    email: &'static str,
    role: Role,
    department: &'static str,
    position: &'static str,
    /// Index into `PEOPLE` of the direct manager.
    reports_to: Option<usize>,
}

const PEOPLE: &[Person] = &[
    Person {
        name: "Morgan Reyes",
        email: "superadmin@staffdesk.test",
        role: Role::SuperAdmin,
        department: "Executive",
        position: "Chief Operating Officer",
        reports_to: None,
    },
    Person {
        name: "Alex Chen",
        email: "admin@staffdesk.test",
        role: Role::Admin,
        department: "Human Resources",
        position: "HR Director",
        reports_to: Some(0),
    },
    Person {
        name: "Jordan Patel",
        email: "manager@staffdesk.test",
        role: Role::Manager,
        department: "Operations",
        position: "Operations Manager",
        reports_to: Some(1),
    },
    Person {
        name: "Taylor Brooks",
        email: "supervisor@staffdesk.test",
        role: Role::Supervisor,
        department: "Operations",
        position: "Shift Supervisor",
        reports_to: Some(2),
    },
    Person {
        name: "Sam Carter",
        email: "employee@staffdesk.test",
        role: Role::Employee,
        department: "Operations",
        position: "Warehouse Associate",
        reports_to: Some(3),
    },
    Person {
        name: "Riley Nguyen",
        email: "riley.nguyen@staffdesk.test",
        role: Role::Admin,
        department: "Finance",
        position: "Finance Director",
        reports_to: Some(0),
    },
    Person {
        name: "Casey Morgan",
        email: "casey.morgan@staffdesk.test",
        role: Role::Manager,
        department: "Sales",
        position: "Sales Manager",
        reports_to: Some(1),
    },
    Person {
        name: "Jamie Lopez",
        email: "jamie.lopez@staffdesk.test",
        role: Role::Supervisor,
        department: "Sales",
        position: "Team Lead",
        reports_to: Some(6),
    },
    Person {
        name: "Drew Kim",
        email: "drew.kim@staffdesk.test",
        role: Role::Employee,
        department: "Operations",
        position: "Forklift Operator",
        reports_to: Some(3),
    },
    Person {
        name: "Avery Johnson",
        email: "avery.johnson@staffdesk.test",
        role: Role::Employee,
        department: "Sales",
        position: "Account Executive",
        reports_to: Some(7),
    },
    Person {
        name: "Quinn Foster",
        email: "quinn.foster@staffdesk.test",
        role: Role::Employee,
        department: "Sales",
        position: "Sales Associate",
        reports_to: Some(7),
    },
];

/// The sign-in shown for each role on the login page.
pub fn demo_accounts() -> Vec<DemoAccount> {
    PEOPLE
        .iter()
        .take(5)
        .map(|p| DemoAccount {
            role: p.role,
            name: p.name.to_string(),
            email: p.email.to_string(),
        })
        .collect()
}

/// Fill an empty database with the demo organisation.
///
/// Returns `false` without touching anything when users already exist.
pub async fn seed_if_empty(pool: &SqlitePool, config: &AppConfig) -> Result<bool, AppError> {
    if repo::staff::count(pool).await? > 0 {
        tracing::debug!("Database already populated, skipping seed");
        return Ok(false);
    }

    let hash = password::hash_password(&config.seed.demo_password)?;
    let today = today();

    let mut ids: Vec<i64> = Vec::with_capacity(PEOPLE.len());
    for (n, person) in PEOPLE.iter().enumerate() {
        let req = CreateStaffRequest {
            name: person.name.to_string(),
            email: person.email.to_string(),
            phone: Some(format!("555-01{n:02}")),
            role: person.role,
            department: person.department.to_string(),
            position: person.position.to_string(),
            password: String::new(),
            manager_id: person.reports_to.map(|i| ids[i]),
            joined_on: None,
        };
        let joined_on = today - Duration::days(90 * (PEOPLE.len() - n) as i64);
        let member = repo::staff::create(pool, &req, &hash, joined_on).await?;
        ids.push(member.id);
    }

    seed_tasks(pool, &ids, today).await?;
    seed_leave(pool, &ids, today).await?;
    seed_attendance(pool, &ids, today).await?;
    seed_notifications(pool, &ids).await?;

    tracing::info!(accounts = ids.len(), "Seeded demo organisation");
    Ok(true)
}

async fn seed_tasks(pool: &SqlitePool, ids: &[i64], today: NaiveDate) -> Result<(), AppError> {
    // (title, assignee, assigner, priority, due in days, status)
    let tasks: [(&str, usize, usize, &str, i64, &str); 7] = [
        ("Prepare quarterly hiring plan", 1, 0, "high", 10, "in_progress"),
        ("Review overtime policy", 2, 1, "medium", 5, "pending"),
        ("Publish next week's shift rota", 3, 2, "high", 2, "pending"),
        ("Cycle count aisle 4", 4, 3, "medium", -1, "pending"),
        ("Safety walkthrough", 8, 3, "low", 7, "completed"),
        ("Follow up on renewal leads", 9, 7, "high", 3, "in_progress"),
        ("Update my emergency contact", 4, 4, "low", 14, "pending"),
    ];

    for (title, assignee, assigner, priority, due_in, status) in tasks {
        let task = repo::task::create(
            pool,
            title,
            None,
            ids[assignee],
            ids[assigner],
            priority,
            Some(today + Duration::days(due_in)),
        )
        .await?;
        if status != "pending" {
            repo::task::set_status(pool, task.id, status).await?;
        }
    }
    Ok(())
}

async fn seed_leave(pool: &SqlitePool, ids: &[i64], today: NaiveDate) -> Result<(), AppError> {
    let week_out = today + Duration::days(7);
    let days = count_weekdays(week_out, week_out + Duration::days(2));
    repo::leave::create(
        pool,
        ids[4],
        "annual",
        week_out,
        week_out + Duration::days(2),
        days,
        Some("Family visit"),
    )
    .await?;

    let past = today - Duration::days(20);
    let request = repo::leave::create(
        pool,
        ids[8],
        "sick",
        past,
        past,
        count_weekdays(past, past),
        Some("Flu"),
    )
    .await?;
    repo::leave::review(
        pool,
        request.id,
        "approved",
        ids[3],
        Some("Get well soon"),
        &weekdays_between(past, past),
    )
    .await?;

    let later = today + Duration::days(21);
    repo::leave::create(
        pool,
        ids[3],
        "personal",
        later,
        later,
        count_weekdays(later, later),
        None,
    )
    .await?;
    Ok(())
}

async fn seed_attendance(pool: &SqlitePool, ids: &[i64], today: NaiveDate) -> Result<(), AppError> {
    let at = |h, m| NaiveTime::from_hms_opt(h, m, 0);
    let yesterday = today - Duration::days(1);

    // (person, status, check in, check out, marked by)
    let records = [
        (4, "present", at(8, 55), at(17, 5), 3),
        (8, "late", at(9, 40), at(17, 30), 3),
        (9, "present", at(9, 0), at(17, 0), 7),
        (10, "absent", None, None, 7),
        (3, "half_day", at(9, 0), at(13, 0), 2),
    ];
    for (person, status, check_in, check_out, marker) in records {
        repo::attendance::upsert(
            pool,
            ids[person],
            yesterday,
            status,
            check_in,
            check_out,
            None,
            ids[marker],
        )
        .await?;
    }
    Ok(())
}

async fn seed_notifications(pool: &SqlitePool, ids: &[i64]) -> Result<(), AppError> {
    repo::notification::create_many(
        pool,
        ids,
        "Welcome to StaffDesk",
        "Your workspace is ready. Check the sidebar for what you can manage.",
        "info",
    )
    .await?;
    repo::notification::create(
        pool,
        ids[3],
        "Leave request",
        "Sam Carter requested 3 day(s) of annual leave",
        "info",
    )
    .await?;
    repo::notification::create(
        pool,
        ids[4],
        "Task overdue",
        "\"Cycle count aisle 4\" is past its due date",
        "warning",
    )
    .await?;
    Ok(())
}
