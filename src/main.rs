//! campusfeed - A terminal client for the campus social feed
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use campusfeed::auth::{LoginForm, SignupForm};
use campusfeed::models::Post;
use campusfeed::session::Persistence;
use campusfeed::sync::{CreateOutcome, DetailState};
use campusfeed::{App, Route};

const WRAP_WIDTH: usize = 72;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match parse_args()? {
        Command::Run => run(&App::init()?).await,
        Command::Login { username } => login_cli(&App::init()?, &username).await,
        Command::Signup { username, email } => signup_cli(&App::init()?, &username, &email).await,
        Command::Logout => {
            App::init()?.logout();
            println!("✓ Logged out");
            Ok(())
        }
        Command::Feed => feed_cli(&App::init()?).await,
        Command::Post { content } => post_cli(&App::init()?, &content).await,
        Command::Show { id } => show_cli(&App::init()?, id).await,
        Command::Profile => profile_cli(&App::init()?).await,
        Command::User { username } => user_cli(&App::init()?, &username).await,
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Run,
    Login { username: String },
    Signup { username: String, email: String },
    Logout,
    Feed,
    Post { content: String },
    Show { id: i64 },
    Profile,
    User { username: String },
    Help,
    Version,
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() == 1 {
        return Ok(Command::Run);
    }

    let arg = |i: usize, what: &str| {
        args.get(i)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Missing {what}\nRun 'campusfeed --help' for usage"))
    };

    match args[1].as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),
        "login" => Ok(Command::Login {
            username: arg(2, "username")?,
        }),
        "signup" => Ok(Command::Signup {
            username: arg(2, "username")?,
            email: arg(3, "email")?,
        }),
        "logout" => Ok(Command::Logout),
        "feed" | "tl" => Ok(Command::Feed),
        "post" => {
            // Allow unquoted content: campusfeed post hello world
            let content = args[2..].join(" ");
            if content.trim().is_empty() {
                return Err(anyhow::anyhow!("Missing post content"));
            }
            Ok(Command::Post { content })
        }
        "show" => {
            let id = arg(2, "post id")?;
            let id = id
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid post id: {id}"))?;
            Ok(Command::Show { id })
        }
        "profile" | "me" => Ok(Command::Profile),
        "user" => Ok(Command::User {
            username: arg(2, "username")?,
        }),
        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'campusfeed --help' for usage"
        )),
    }
}

fn print_help() {
    let config_path = campusfeed::paths::config_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"campusfeed - A terminal client for the campus social feed

USAGE:
    campusfeed                         Show the feed, or how to log in
    campusfeed [COMMAND]

COMMANDS:
    login <username>                   Log in (password is read from stdin)
      Examples:
        campusfeed login alice
        campusfeed login alice@teknokrat.ac.id

    signup <username> <email>          Create an account
    logout                             Forget the stored session

    feed                               Show the post feed
    post <content>                     Publish a post
      Examples:
        campusfeed post "Hello campus!"

    show <id>                          Show a single post
    profile                            Show your profile
    user <username>                    Look up a user by name

OPTIONS:
    -h, --help                         Show this help message
    -v, --version                      Show version information

ENVIRONMENT:
    CAMPUSFEED_API_URL                 Backend base URL
    RUST_LOG                           Log filter (default: warn)

CONFIG:
    {}
"#,
        config_path
    );
}

fn print_version() {
    println!("campusfeed {}", campusfeed::VERSION);
}

fn read_line(prompt: &str) -> Result<String> {
    println!("{prompt}");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn print_post(post: &Post) {
    println!("\n#{} {} · {}", post.id, post.author_name(), post.relative_time());
    if let Some(title) = post.title.as_deref().filter(|t| !t.is_empty()) {
        println!("{title}");
    }
    for line in textwrap::wrap(&post.content, WRAP_WIDTH) {
        println!("  {line}");
    }
    if post.likes > 0 {
        println!("♥ {}", post.likes);
    }
}

fn require_login(app: &App) -> Result<()> {
    if app.initial_route() == Route::Login {
        return Err(anyhow::anyhow!(
            "Not logged in. Run: campusfeed login <username>"
        ));
    }
    Ok(())
}

async fn run(app: &App) -> Result<()> {
    match app.initial_route() {
        Route::Feed => feed_cli(app).await,
        Route::Login => {
            println!("Not logged in.");
            println!("\nLog in with:");
            println!("  campusfeed login <username>");
            println!("\nOr create an account:");
            println!("  campusfeed signup <username> <email>");
            Ok(())
        }
    }
}

async fn login_cli(app: &App, username: &str) -> Result<()> {
    let password = read_line("Password:")?;

    let mut auth = app.auth();
    let form = LoginForm {
        username: username.to_string(),
        password,
    };

    match auth.login(&form).await {
        Ok(outcome) => {
            println!("✓ Logged in");
            if outcome.persistence == Persistence::MemoryOnly {
                println!("⚠ Session could not be saved; you will need to log in again");
            }
            Ok(())
        }
        Err(e) => match auth.error() {
            Some(message) => Err(anyhow::anyhow!("{message}")),
            None => Err(e.into()),
        },
    }
}

async fn signup_cli(app: &App, username: &str, email: &str) -> Result<()> {
    let password = read_line("Password:")?;
    let confirm_password = read_line("Confirm password:")?;

    let mut auth = app.auth();
    let form = SignupForm {
        username: username.to_string(),
        email: email.to_string(),
        password,
        confirm_password,
    };

    match auth.signup(&form).await {
        Ok(_) => {
            println!("✓ Account created");
            println!("\nLog in with:");
            println!("  campusfeed login {username}");
            Ok(())
        }
        Err(e) => match auth.error() {
            Some(message) => Err(anyhow::anyhow!("{message}")),
            None => Err(e.into()),
        },
    }
}

async fn feed_cli(app: &App) -> Result<()> {
    let feed = app.feed();
    feed.load()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message("Failed to load posts")))?;

    let posts = feed.posts();
    if posts.is_empty() {
        println!("No posts yet.");
        return Ok(());
    }

    println!("Feed ({} posts)", posts.len());
    println!("{}", "─".repeat(60));
    for post in &posts {
        print_post(post);
    }

    Ok(())
}

async fn post_cli(app: &App, content: &str) -> Result<()> {
    require_login(app)?;

    let feed = app.feed();
    let outcome = feed
        .create(content)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message("Failed to create post")))?;

    match outcome {
        CreateOutcome::Prepended(post) => println!("✓ Posted (#{})", post.id),
        CreateOutcome::Refetched { .. } => println!("✓ Posted"),
    }

    Ok(())
}

async fn show_cli(app: &App, id: i64) -> Result<()> {
    let detail = app.post_detail();
    detail.load(id).await?;

    match detail.view() {
        DetailState::Loaded(post) => {
            print_post(&post);
            Ok(())
        }
        DetailState::Unavailable(failure) => Err(anyhow::anyhow!(failure.message())),
        DetailState::Empty => Ok(()),
    }
}

async fn profile_cli(app: &App) -> Result<()> {
    require_login(app)?;

    let profile = app
        .profile()
        .load()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message("Failed to load profile")))?;

    println!("{}", profile.user.name);
    println!("  {}", profile.user.email);
    if let Some(joined) = profile.user.created_at {
        println!("  Joined {}", campusfeed::time::relative_label(joined));
    }
    println!("  {} posts", profile.post_count);

    Ok(())
}

async fn user_cli(app: &App, username: &str) -> Result<()> {
    let user = app
        .api()
        .get_user_by_username(username)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message("Failed to load user")))?;

    println!("{} (#{})", user.name, user.id);
    println!("  {}", user.email);

    Ok(())
}
