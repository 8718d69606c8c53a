use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use finance_tracker::{
    Category, Email, PasswordHash, Transaction, TransactionType, ValidatedPassword,
    create_transaction, create_user, initialize_db,
};

const TEST_EMAIL: &str = "test@example.com";
const TEST_PASSWORD: &str = "test";

/// A utility for creating a test database for the finance tracker API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let mut conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(TEST_PASSWORD),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(
        "Test User",
        Email::new(TEST_EMAIL)?,
        password_hash,
        &conn,
    )?;

    println!("Creating a year of transactions...");

    let today = OffsetDateTime::now_utc().date();
    let sql_transaction = conn.transaction()?;
    let mut count = 0;

    for days_ago in 0..365_i64 {
        let date = today - Duration::days(days_ago);

        // Pay day every two weeks, freelance work on the 1st of each month.
        if days_ago % 14 == 0 {
            let builder = Transaction::build(
                user.id,
                2_400.0,
                TransactionType::Income,
                Category::Salary,
                date,
            )
            .reference("PAYROLL")
            .description("Fortnightly pay");
            create_transaction(builder, &sql_transaction)?;
            count += 1;
        }

        if date.day() == 1 {
            let builder = Transaction::build(
                user.id,
                350.0 + (days_ago % 5) as f64 * 40.0,
                TransactionType::Income,
                Category::Freelance,
                date,
            )
            .description("Consulting invoice");
            create_transaction(builder, &sql_transaction)?;
            count += 1;
        }

        let category = Category::ALL[days_ago as usize % Category::ALL.len()];
        if category != Category::Salary && category != Category::Freelance {
            let amount = 5.0 + (days_ago * 37 % 120) as f64 + 0.99;
            let builder =
                Transaction::build(user.id, amount, TransactionType::Expense, category, date)
                    .description(&format!("{category} purchase"));
            create_transaction(builder, &sql_transaction)?;
            count += 1;
        }
    }

    sql_transaction.commit()?;

    println!("Created {count} transactions for {TEST_EMAIL} (password \"{TEST_PASSWORD}\").");
    println!("Success!");

    Ok(())
}
