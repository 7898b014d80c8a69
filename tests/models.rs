//! Model round trips against a live PostgreSQL.
//!
//! Set TEST_DATABASE_URL to a disposable database; the tables are emptied first.
//! Without it every test here is skipped.

use jobly::{ensure_tables, AppError, Company, Job, User};
use serde_json::{json, Map, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

async fn setup() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("connect to TEST_DATABASE_URL");
    ensure_tables(&pool).await.expect("create tables");
    sqlx::query("TRUNCATE applications, users, jobs, companies RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .expect("truncate");
    Some(pool)
}

fn map(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => panic!("expected an object"),
    }
}

async fn seed(pool: &PgPool) {
    for (handle, name, n) in [("c1", "C1", 1), ("c2", "C2", 2), ("c3", "C3", 3)] {
        Company::create(
            pool,
            &map(json!({
                "handle": handle,
                "name": name,
                "description": format!("Desc {}", n),
                "numEmployees": n,
                "logoUrl": format!("http://{}.img", handle)
            })),
        )
        .await
        .expect("seed company");
    }
    for (title, salary, equity, handle) in [
        ("dentist", 150000, 0.5, "c1"),
        ("programmer", 100000, 0.2, "c2"),
        ("marketer", 80000, 0.0, "c3"),
    ] {
        Job::create(
            pool,
            &map(json!({"title": title, "salary": salary, "equity": equity, "companyHandle": handle})),
        )
        .await
        .expect("seed job");
    }
    sqlx::query(
        "INSERT INTO users (username, password, first_name, last_name, email) \
         VALUES ('u1', 'x', 'U1F', 'U1L', 'u1@user.com')",
    )
    .execute(pool)
    .await
    .expect("seed user");
}

#[tokio::test]
async fn database_round_trip() {
    let Some(pool) = setup().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    seed(&pool).await;

    // companies
    let dup = Company::create(
        &pool,
        &map(json!({"handle": "c1", "name": "Other", "description": "d"})),
    )
    .await;
    assert!(matches!(dup, Err(AppError::Conflict(_))));

    let all = Company::find_all(&pool, &Map::new()).await.unwrap();
    assert_eq!(all.len(), 3);

    let some = Company::find_all(&pool, &map(json!({"minEmployees": 2, "maxEmployees": 3})))
        .await
        .unwrap();
    let handles: Vec<&str> = some.iter().map(|c| c["handle"].as_str().unwrap()).collect();
    assert_eq!(handles, vec!["c2", "c3"]);

    let by_name = Company::find_all(&pool, &map(json!({"name": "1"}))).await.unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0]["numEmployees"], json!(1));
    assert_eq!(by_name[0]["logoUrl"], json!("http://c1.img"));

    let c1 = Company::get(&pool, "c1").await.unwrap();
    assert_eq!(c1["jobs"].as_array().unwrap().len(), 1);
    assert_eq!(c1["jobs"][0]["title"], json!("dentist"));
    assert_eq!(c1["jobs"][0]["equity"], json!("0.5"));

    let updated = Company::update(&pool, "c1", &map(json!({"name": "New", "numEmployees": 10})))
        .await
        .unwrap();
    assert_eq!(updated["name"], json!("New"));
    assert_eq!(updated["numEmployees"], json!(10));

    let cleared = Company::update(&pool, "c1", &map(json!({"logoUrl": null}))).await.unwrap();
    assert_eq!(cleared["logoUrl"], Value::Null);

    assert!(matches!(
        Company::update(&pool, "nope", &map(json!({"name": "X"}))).await,
        Err(AppError::NotFound(_))
    ));

    // jobs
    let rich = Job::find_all(&pool, &map(json!({"minSalary": 90000, "hasEquity": true})))
        .await
        .unwrap();
    let titles: Vec<&str> = rich.iter().map(|j| j["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["dentist", "programmer"]);
    assert_eq!(rich[0]["companyName"], json!("New"));

    let job = Job::get(&pool, 1).await.unwrap();
    assert_eq!(job["company"]["handle"], json!("c1"));

    let job = Job::update(&pool, 1, &map(json!({"salary": 160000}))).await.unwrap();
    assert_eq!(job["salary"], json!(160000));
    assert_eq!(job["companyHandle"], json!("c1"));

    let orphan = Job::create(&pool, &map(json!({"title": "x", "companyHandle": "missing"}))).await;
    match orphan {
        Err(AppError::NotFound(msg)) => assert_eq!(msg, "no company: missing"),
        other => panic!("expected NotFound, got {:?}", other),
    }

    // users
    let applied = User::apply_to_job(&pool, "u1", 2).await.unwrap();
    assert_eq!(applied, json!({"applied": 2}));
    assert!(matches!(User::apply_to_job(&pool, "u1", 2).await, Err(AppError::Conflict(_))));
    assert!(matches!(User::apply_to_job(&pool, "u1", 99).await, Err(AppError::NotFound(_))));

    let u1 = User::get(&pool, "u1").await.unwrap();
    assert_eq!(u1["jobs"], json!([2]));
    assert!(u1.get("password").is_none());

    let u1 = User::update(&pool, "u1", &map(json!({"firstName": "Aliya", "isAdmin": true})))
        .await
        .unwrap();
    assert_eq!(u1["firstName"], json!("Aliya"));
    assert_eq!(u1["isAdmin"], json!(true));

    // removal
    Job::remove(&pool, 3).await.unwrap();
    assert!(matches!(Job::get(&pool, 3).await, Err(AppError::NotFound(_))));
    Company::remove(&pool, "c2").await.unwrap();
    assert!(matches!(Job::get(&pool, 2).await, Err(AppError::NotFound(_))));
    User::remove(&pool, "u1").await.unwrap();
    assert!(matches!(User::remove(&pool, "u1").await, Err(AppError::NotFound(_))));
}
