#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # autograder
//!
//! Command-line front end for the autograder client. Reads `SUPABASE_URL` and
//! `SUPABASE_ANON_KEY` (and optionally `AUTOGRADER_EMAIL` /
//! `AUTOGRADER_PASSWORD` to sign in first) from the environment or a `.env`
//! file.

use anyhow::{Context, Result, bail};
use autograder_client::{
    AutograderClient, ClientConfig, ReqwestTransport, aggregate,
    client::to_json,
    models::{Profile, SubmissionVersion},
};
use bpaf::*;
use colored::Colorize;
use dotenvy::dotenv;
use tabled::{Table, Tabled, settings::Style};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Print a profile with its classes
    Profile(String),
    /// Print a class with its assignments
    Class(String),
    /// List students (or everyone, with `--all`) in a class
    Students(String, bool),
    /// List submitted files and versions
    Submissions(String, String),
    /// Print the latest submitted version
    Latest(String, String, Option<String>),
    /// List students with a complete submission
    Submitted(String, String),
    /// Print a submitted file, or write it with `--out`
    Download(String, String, SubmissionVersion, String, Option<String>),
    /// Invite a teacher
    Invite(String),
}

/// A profile as a table row.
#[derive(Tabled)]
struct ProfileRow {
    /// Profile id
    #[tabled(rename = "ID")]
    id:      String,
    /// Email
    #[tabled(rename = "Email")]
    email:   String,
    /// Auth id
    #[tabled(rename = "Auth ID")]
    auth_id: String,
    /// Number of classes
    #[tabled(rename = "Classes")]
    classes: usize,
}

impl From<&Profile> for ProfileRow {
    fn from(p: &Profile) -> Self {
        Self {
            id:      p.id.clone(),
            email:   p.email.clone(),
            auth_id: p.auth_id.clone(),
            classes: p.classes.as_ref().map_or(0, Vec::len),
        }
    }
}

/// A file's version history as a table row.
#[derive(Tabled)]
struct VersionRow {
    /// File name
    #[tabled(rename = "File")]
    file:     String,
    /// Versions, ascending
    #[tabled(rename = "Versions")]
    versions: String,
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses a profile id
    fn p() -> impl Parser<String> {
        positional("PROFILE_ID").help("Id of the profile")
    }

    /// parses a class id
    fn c() -> impl Parser<String> {
        positional("CLASS_ID").help("Id of the class")
    }

    /// parses an assignment id
    fn a() -> impl Parser<String> {
        positional("ASSIGNMENT_ID").help("Id of the assignment")
    }

    let profile = construct!(Cmd::Profile(p()))
        .to_options()
        .command("profile")
        .help("Print a profile with its classes and assignments");

    let class = construct!(Cmd::Class(c()))
        .to_options()
        .command("class")
        .help("Print a class with its assignments");

    let all = long("all")
        .help("Include teachers")
        .switch();
    let students = construct!(Cmd::Students(c(), all))
        .to_options()
        .command("students")
        .help("List the students of a class");

    let submissions = construct!(Cmd::Submissions(p(), a()))
        .to_options()
        .command("submissions")
        .help("List submitted files and their versions");

    let file = long("file")
        .help("Only consider this file name")
        .argument::<String>("FILE")
        .optional();
    let latest = construct!(Cmd::Latest(p(), a(), file))
        .to_options()
        .command("latest")
        .help("Print the latest submitted version");

    let submitted = construct!(Cmd::Submitted(c(), a()))
        .to_options()
        .command("submitted")
        .help("List students who submitted every required file");

    let version = positional::<String>("VERSION")
        .help("Submission version, e.g. v2")
        .parse(|s| s.parse::<SubmissionVersion>());
    let file_name = positional::<String>("FILENAME").help("Submitted file name");
    let out = long("out")
        .short('o')
        .help("Write the file here instead of printing it")
        .argument::<String>("PATH")
        .optional();
    let download = construct!(Cmd::Download(p(), a(), version, file_name, out))
        .to_options()
        .command("download")
        .help("Download a submitted file");

    let email = positional::<String>("EMAIL").help("Email to invite");
    let invite = construct!(Cmd::Invite(email))
        .to_options()
        .command("invite")
        .help("Invite a teacher (requires signing in)");

    let cmd = construct!([
        profile,
        class,
        students,
        submissions,
        latest,
        submitted,
        download,
        invite
    ]);

    cmd.to_options()
        .descr("Query the autograder backend")
        .run()
}

/// Signs in when `AUTOGRADER_EMAIL` and `AUTOGRADER_PASSWORD` are both set.
async fn sign_in(client: &mut AutograderClient<ReqwestTransport>) -> Result<()> {
    let (Ok(email), Ok(password)) =
        (std::env::var("AUTOGRADER_EMAIL"), std::env::var("AUTOGRADER_PASSWORD"))
    else {
        return Ok(());
    };

    if client.authenticate(&email, &password).await?.is_none() {
        bail!("Could not sign in as {email}");
    }
    Ok(())
}

/// Prints profiles as a table.
fn print_profiles(profiles: &[Profile]) {
    let rows: Vec<ProfileRow> = profiles.iter().map(ProfileRow::from).collect();
    println!("{}", Table::new(rows).with(Style::modern()));
}

/// Runs one command.
async fn run(cmd: Cmd) -> Result<()> {
    let config = ClientConfig::from_env()?;
    let mut client = AutograderClient::from_config(&config)?;
    sign_in(&mut client).await?;

    match cmd {
        Cmd::Profile(id) => match client.get_user_profile(&id).await? {
            Some(profile) => println!("{}", to_json(&profile, true)?),
            None => bail!("No profile with id {id}"),
        },
        Cmd::Class(id) => match client.get_class(&id).await? {
            Some(class) => println!("{}", to_json(&class, true)?),
            None => bail!("No class with id {id}"),
        },
        Cmd::Students(class_id, all) => {
            let profiles = client
                .get_user_profiles_in_class(&class_id, !all)
                .await?;
            print_profiles(&profiles);
        }
        Cmd::Submissions(profile_id, assignment_id) => {
            let submissions = client
                .get_submitted_versions(&profile_id, &assignment_id)
                .await?;
            let rows: Vec<VersionRow> = aggregate::versions_by_file(&submissions)
                .into_iter()
                .map(|(file, versions)| VersionRow {
                    file,
                    versions: versions
                        .iter()
                        .map(|v| SubmissionVersion(*v).to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::modern()));
        }
        Cmd::Latest(profile_id, assignment_id, file) => {
            match client
                .get_latest_submitted_version(&profile_id, &assignment_id, file.as_deref())
                .await?
            {
                Some(version) => println!("{version}"),
                None => eprintln!("Nothing submitted yet."),
            }
        }
        Cmd::Submitted(class_id, assignment_id) => {
            let profiles = client
                .get_submitted_students(&class_id, &assignment_id)
                .await?;
            print_profiles(&profiles);
        }
        Cmd::Download(profile_id, assignment_id, version, file_name, out) => match out {
            Some(path) => {
                let bytes = client
                    .get_file_bytes(&profile_id, &assignment_id, version, &file_name)
                    .await?
                    .with_context(|| format!("Could not download {file_name} ({version})"))?;
                std::fs::write(&path, bytes).with_context(|| format!("Could not write {path}"))?;
            }
            None => {
                let text = client
                    .download_file(&profile_id, &assignment_id, version, &file_name)
                    .await?
                    .with_context(|| format!("Could not download {file_name} ({version})"))?;
                print!("{text}");
            }
        },
        Cmd::Invite(email) => {
            if client.invite_teacher(&email).await? {
                println!("Invited {email}");
            } else {
                bail!("Invitation for {email} was not accepted");
            }
        }
    };

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let cmd = options();
    if let Err(e) = run(cmd).await {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
