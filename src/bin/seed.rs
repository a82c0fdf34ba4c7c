use society::{
    auth::AuthService,
    domain::{
        CreateAnnouncementRequest, CreateContactMessageRequest, CreateEventRequest,
        CreateRegistrationRequest, CreateTeamMemberRequest,
    },
    repository::{
        AnnouncementRepository, ContactMessageRepository, EventRepository,
        RegistrationRepository, TeamMemberRepository,
        SqliteAnnouncementRepository, SqliteContactMessageRepository, SqliteEventRepository,
        SqliteRegistrationRepository, SqliteTeamMemberRepository,
    },
};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use fake::{
    faker::{internet::en::SafeEmail, lorem::en::Sentence, name::en::Name},
    Fake,
};
use sqlx::sqlite::SqlitePoolOptions;

#[derive(Parser)]
#[command(name = "seed", about = "Fill a society database with demo content")]
struct Cli {
    /// Defaults to $DATABASE_URL, then sqlite://society.db
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Insert demo events, team, announcements and submissions (default)
    Demo {
        /// Generated contact messages and registrations of each kind
        #[arg(long, default_value_t = 5)]
        submissions: usize,
    },
    /// Print an Argon2 hash for SOCIETY__AUTH__ADMIN_PASSWORD_HASH
    HashPassword { password: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Demo { submissions: 5 }) {
        Command::HashPassword { password } => {
            let hash = AuthService::hash_password(&password).await?;
            println!("{}", hash);
            Ok(())
        }
        Command::Demo { submissions } => {
            let database_url = cli
                .database_url
                .or_else(|| std::env::var("DATABASE_URL").ok())
                .unwrap_or_else(|| "sqlite://society.db?mode=rwc".to_string());
            seed_demo(&database_url, submissions).await
        }
    }
}

async fn seed_demo(database_url: &str, submissions: usize) -> anyhow::Result<()> {
    println!("🌱 Starting database seeding...");

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    // Run migrations first
    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let event_repo = SqliteEventRepository::new(db_pool.clone());
    let team_repo = SqliteTeamMemberRepository::new(db_pool.clone());
    let announcement_repo = SqliteAnnouncementRepository::new(db_pool.clone());
    let contact_repo = SqliteContactMessageRepository::new(db_pool.clone());
    let registration_repo = SqliteRegistrationRepository::new(db_pool.clone());

    let today = Utc::now().date_naive();

    // Events: two ahead, one behind, so both page sections have content
    println!("📅 Creating events...");
    let events = vec![
        CreateEventRequest {
            title: "Code Sprint 2025".to_string(),
            description: "A 24-hour hackathon open to every department. Teams of up to four.".to_string(),
            date: today + Duration::days(14),
            location: "Main Computer Lab".to_string(),
            image: None,
            registration_link: None,
        },
        CreateEventRequest {
            title: "Intro to Rust Workshop".to_string(),
            description: "Hands-on session covering ownership, borrowing and cargo.".to_string(),
            date: today + Duration::days(30),
            location: "Room 204, Science Block".to_string(),
            image: None,
            registration_link: None,
        },
        CreateEventRequest {
            title: "Alumni Tech Talk".to_string(),
            description: "Graduates working in industry share what they wish they had known.".to_string(),
            date: today - Duration::days(21),
            location: "Auditorium".to_string(),
            image: None,
            registration_link: None,
        },
    ];

    let mut upcoming_titles = Vec::new();
    for request in events {
        let event = event_repo.create(request.into_event()).await?;
        if event.date >= today {
            upcoming_titles.push(event.title.clone());
        }
    }
    println!("  ✅ Created 3 events");

    println!("👥 Creating team...");
    let team = [
        ("Sara Ahmed", "President", 1),
        ("Bilal Khan", "Vice President", 2),
        ("Hina Tariq", "General Secretary", 3),
        ("Omar Farooq", "Technical Lead", 4),
        ("Zainab Ali", "Events Coordinator", 5),
    ];
    for (name, role, order) in team {
        team_repo.create(CreateTeamMemberRequest {
            name: name.to_string(),
            role: role.to_string(),
            bio: None,
            image: None,
            social_links: None,
            order,
        }.into_member()).await?;
    }
    println!("  ✅ Created {} team members", team.len());

    println!("📢 Creating announcements...");
    let announcements = [
        ("Internship Drive", "Partner companies are accepting applications this month.", "Opportunity", 2),
        ("Code Sprint registrations open", "Register your team before the deadline.", "Event", 5),
        ("Lab closed for maintenance", "The main lab is closed this Friday.", "Notice", 7),
        ("Programming contest results", "Congratulations to all teams that placed.", "Result", 10),
    ];
    for (title, content, kind, days_ago) in announcements {
        announcement_repo.create(CreateAnnouncementRequest {
            title: title.to_string(),
            content: content.to_string(),
            announcement_type: kind.to_string(),
            date: today - Duration::days(days_ago),
        }.into_announcement()).await?;
    }
    println!("  ✅ Created {} announcements", announcements.len());

    println!("✉️  Generating submissions...");
    for _ in 0..submissions {
        let name: String = Name().fake();
        contact_repo.create(CreateContactMessageRequest {
            name: name.clone(),
            email: SafeEmail().fake(),
            message: Sentence(6..14).fake(),
        }.into_message()).await?;

        if let Some(event_title) = pick(&upcoming_titles) {
            let roll: u32 = (1000..9999).fake();
            let phone: u32 = (1_000_000..9_999_999).fake();
            registration_repo.create(CreateRegistrationRequest {
                name,
                roll_number: format!("CS-{}", roll),
                department: "Computer Science".to_string(),
                phone: format!("+92 300 {}", phone),
                event_title: event_title.clone(),
            }.into_registration()).await?;
        }
    }
    println!("  ✅ Created {} contact messages and registrations", submissions);

    println!("\n✨ Database seeding complete!");
    println!("\n📝 Set an admin secret before starting the server:");
    println!("  SOCIETY__AUTH__ADMIN_PASSWORD_HASH=$(seed hash-password <password>)");

    Ok(())
}

fn pick(titles: &[String]) -> Option<&String> {
    if titles.is_empty() {
        return None;
    }
    let index: usize = (0..titles.len()).fake();
    titles.get(index)
}
