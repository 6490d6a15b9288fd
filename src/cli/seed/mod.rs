//! Seed command - fills the users table with generated accounts

use std::collections::HashSet;
use std::sync::Arc;

use clap::Args;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{error, info, warn};

use crate::domain::user::{NewUser, UserRepository};
use crate::infrastructure::user::{Argon2Hasher, PasswordHasher, PostgresUserRepository, UserService};

/// Password shared by every seeded account
pub const SEED_PASSWORD: &str = "password123";

const DEFAULT_NUM_USERS: usize = 50;
const PROGRESS_EVERY: usize = 10;
/// Random draws per identity before falling back to a serial suffix
const MAX_DRAWS: usize = 20;

const FIRST_NAMES: &[&str] = &[
    "james", "mary", "robert", "patricia", "john", "jennifer", "michael", "linda", "david",
    "elizabeth", "william", "barbara", "richard", "susan", "joseph", "jessica", "thomas", "sarah",
    "charles", "karen", "daniel", "nancy", "matthew", "lisa", "anthony", "betty",
];

const LAST_NAMES: &[&str] = &[
    "smith", "johnson", "williams", "brown", "jones", "garcia", "miller", "davis", "rodriguez",
    "martinez", "hernandez", "lopez", "gonzalez", "wilson", "anderson", "taylor", "moore",
    "jackson", "martin", "lee", "thompson", "white", "harris", "clark", "lewis", "walker",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Number of users to create
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_USERS)]
    pub num_users: usize,
}

/// Outcome of a seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub created: usize,
    pub skipped: usize,
}

/// Produces plausible usernames and emails, never repeating one within a run
#[derive(Debug)]
pub struct FakeUserGenerator {
    rng: StdRng,
    first_names: &'static [&'static str],
    last_names: &'static [&'static str],
    usernames: HashSet<String>,
    emails: HashSet<String>,
    serial: u64,
}

impl FakeUserGenerator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            first_names: FIRST_NAMES,
            last_names: LAST_NAMES,
            usernames: HashSet::new(),
            emails: HashSet::new(),
            serial: 0,
        }
    }

    /// Next `(username, email)` pair.
    ///
    /// After `MAX_DRAWS` collisions the name gets a run-wide serial suffix, so
    /// this terminates however many identities are requested.
    pub fn next_identity(&mut self) -> (String, String) {
        let username = self.unique_username();
        let email = self.unique_email();

        (username, email)
    }

    fn unique_username(&mut self) -> String {
        for _ in 0..MAX_DRAWS {
            let candidate = self.username();
            if self.usernames.insert(candidate.clone()) {
                return candidate;
            }
        }

        loop {
            let candidate = format!("{}{}", self.username(), self.next_serial());
            if self.usernames.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    fn unique_email(&mut self) -> String {
        for _ in 0..MAX_DRAWS {
            let candidate = self.email(None);
            if self.emails.insert(candidate.clone()) {
                return candidate;
            }
        }

        loop {
            let serial = self.next_serial();
            let candidate = self.email(Some(serial));
            if self.emails.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    fn username(&mut self) -> String {
        let first = self.pick(self.first_names);
        let last = self.pick(self.last_names);

        match self.rng.gen_range(0..3) {
            0 => format!("{}{}", first, last),
            1 => format!("{}.{}{}", first, last, self.rng.gen_range(1..100)),
            _ => format!("{}_{}", &first[..1], last),
        }
    }

    fn email(&mut self, serial: Option<u64>) -> String {
        let first = self.pick(self.first_names);
        let last = self.pick(self.last_names);
        let domain = self.pick(EMAIL_DOMAINS);
        let number = self.rng.gen_range(1..1000);

        match serial {
            Some(serial) => format!("{}.{}{}.{}@{}", first, last, number, serial, domain),
            None => format!("{}.{}{}@{}", first, last, number, domain),
        }
    }

    fn next_serial(&mut self) -> u64 {
        self.serial += 1;
        self.serial
    }

    fn pick(&mut self, choices: &[&'static str]) -> &'static str {
        choices.choose(&mut self.rng).copied().unwrap_or("user")
    }
}

impl Default for FakeUserGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the seed command against the configured database
pub async fn run(args: SeedArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    info!("--- Starting Database Seeding ---");
    let pool = crate::connect_and_migrate(&config).await?;

    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());
    let repository = Arc::new(PostgresUserRepository::new(pool.clone(), hasher.clone()));
    let service = UserService::new(repository, hasher);

    let mut generator = FakeUserGenerator::new();
    let summary = seed_users(&service, &mut generator, args.num_users).await;

    info!("--- Seeding Complete ---");
    info!(created = summary.created, "Total users created");
    info!(skipped = summary.skipped, "Total users skipped (duplicates or errors)");

    pool.close().await;
    info!("Database connection closed");

    Ok(())
}

/// Create `num_users` generated accounts through the user service.
///
/// Failures never abort the run; each one is logged and counted as skipped.
pub async fn seed_users<R: UserRepository>(
    service: &UserService<R>,
    generator: &mut FakeUserGenerator,
    num_users: usize,
) -> SeedSummary {
    info!(num_users, "Attempting to create fake users");
    let mut summary = SeedSummary::default();

    for i in 1..=num_users {
        let (username, email) = generator.next_identity();
        let new_user = NewUser::new(username.clone(), email.clone(), SEED_PASSWORD);

        match service.create_user(new_user).await {
            Ok(_) => {
                summary.created += 1;
                if i % PROGRESS_EVERY == 0 {
                    info!(progress = %format!("{}/{}", i, num_users), username = %username, "Created user");
                }
            }
            Err(e) if e.is_duplicate() => {
                warn!(
                    progress = %format!("{}/{}", i, num_users),
                    username = %username,
                    email = %email,
                    "Skipping user: username or email already exists"
                );
                summary.skipped += 1;
            }
            Err(e) => {
                error!(
                    progress = %format!("{}/{}", i, num_users),
                    username = %username,
                    error = %e,
                    "Error creating user"
                );
                summary.skipped += 1;
            }
        }
    }

    summary
}
