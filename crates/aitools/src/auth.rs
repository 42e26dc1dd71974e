use colored::Colorize;

use crate::catalog::Catalog;
use crate::prelude::{println, *};
use crate::render;

#[derive(Debug, clap::Parser)]
#[command(name = "auth")]
#[command(about = "Log in, sign up, and manage the saved session")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Log in with an existing account
    #[clap(name = "login")]
    Login(LoginOptions),

    /// Create an account and log in
    #[clap(name = "signup")]
    Signup(SignupOptions),

    /// Forget the saved session
    #[clap(name = "logout")]
    Logout,

    /// Show the logged in user
    #[clap(name = "whoami")]
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, clap::Args, Clone)]
pub struct LoginOptions {
    #[arg(short, long, env = "AITOOLS_EMAIL")]
    pub email: String,

    #[arg(short, long, env = "AITOOLS_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, clap::Args, Clone)]
pub struct SignupOptions {
    /// Display name
    #[arg(short, long)]
    pub name: String,

    #[arg(short, long, env = "AITOOLS_EMAIL")]
    pub email: String,

    #[arg(short, long, env = "AITOOLS_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let mut catalog = Catalog::from_global(&global)?;

    let result = match app.command {
        Commands::Login(options) => login(&mut catalog, options).await,
        Commands::Signup(options) => signup(&mut catalog, options).await,
        Commands::Logout => logout(&mut catalog),
        Commands::Whoami { json } => whoami(&catalog, json),
    };

    catalog.finish();
    result
}

async fn login(catalog: &mut Catalog, options: LoginOptions) -> Result<()> {
    let user = catalog
        .auth
        .login(&options.email, &options.password)
        .await?;

    println!("{} Logged in as {}", "✓".green(), user.email.bold());
    Ok(())
}

async fn signup(catalog: &mut Catalog, options: SignupOptions) -> Result<()> {
    let user = catalog
        .auth
        .signup(&options.name, &options.email, &options.password)
        .await?;

    println!(
        "{} Account created, logged in as {}",
        "✓".green(),
        user.email.bold()
    );
    Ok(())
}

fn logout(catalog: &mut Catalog) -> Result<()> {
    let was_logged_in = catalog.auth.is_authenticated();
    catalog.logout()?;

    if was_logged_in {
        println!("{} Logged out", "✓".green());
    } else {
        println!("Not logged in");
    }
    Ok(())
}

fn whoami(catalog: &Catalog, json: bool) -> Result<()> {
    let user = catalog.auth.require_user()?;

    if json {
        println!("{}", serde_json::to_string_pretty(user)?);
    } else {
        render::user_table(user).printstd();
    }
    Ok(())
}
