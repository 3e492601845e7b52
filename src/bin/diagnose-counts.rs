/// Compare staff identity statuses with staff profile statuses.
///
/// Usage: diagnose-counts [--mismatches-only]
///   --mismatches-only : list only staff whose profile status disagrees with
///                       their identity status (or who have no profile)

use std::collections::HashMap;

use clap::Parser;
use uuid::Uuid;

use daycare_api::{
    db::{self, Repositories},
    models::{
        staff::{ProfileStatus, StaffProfile},
        user::{AccountStatus, UserRole},
    },
};

#[derive(Parser)]
#[command(name = "diagnose-counts", about = "Compare staff identity and profile statuses")]
struct Args {
    #[arg(long)]
    mismatches_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("Missing required env var: DATABASE_URL"))?;
    let pool = db::create_pool(&database_url).await?;
    let repos = Repositories::postgres(pool);
    tracing::info!("Connected to database");

    let users = repos.users.list_by_role(UserRole::Staff, None).await?;
    let profiles = repos.staff.list(None).await?;
    let by_user: HashMap<Uuid, &StaffProfile> = profiles
        .iter()
        .filter_map(|p| p.user_id.map(|id| (id, p)))
        .collect();

    println!("--- Staff identities ---");
    for user in &users {
        let profile = by_user.get(&user.id);
        let expected = ProfileStatus::from(user.status);
        let consistent = profile.is_some_and(|p| p.status == expected);
        if args.mismatches_only && consistent {
            continue;
        }
        match profile {
            Some(p) => println!("{}: {} (profile: {})", user.email, user.status, p.status),
            None => println!("{}: {} (no profile)", user.email, user.status),
        }
    }

    if !args.mismatches_only {
        println!("--- Staff profiles ---");
        for p in &profiles {
            let link = if p.user_id.is_some() { "linked" } else { "unlinked" };
            println!("{}: {} ({link})", p.email, p.status);
        }
    }

    let active_identities = users.iter().filter(|u| u.status == AccountStatus::Active).count();
    let active_profiles = profiles.iter().filter(|p| p.status == ProfileStatus::Active).count();
    println!();
    println!("Active staff identities: {active_identities}");
    println!("Active staff profiles:   {active_profiles}");

    Ok(())
}
