use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clubhub_core::PageQuery;

#[derive(Parser, Debug)]
#[command(name = "clubhub", about = "Club community REST and chat client")]
pub struct Cli {
    /// Config file (TOML/YAML/JSON); `CLUBHUB__SECTION__KEY` variables override it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[arg(long, global = true)]
    pub chat_url: Option<String>,

    /// Bearer token for authenticated endpoints
    #[arg(long, global = true, env = "CLUBHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Print responses as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List communities
    Communities {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one community
    Community { id: i64 },
    /// List clubs, optionally only those of one community
    Clubs {
        #[arg(long)]
        community: Option<i64>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one club
    Club { id: i64 },
    /// Create a club inside a community
    CreateClub {
        #[arg(long)]
        community: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Join a club
    Join { club: i64 },
    /// List rooms, optionally only those of one club
    Rooms {
        #[arg(long)]
        club: Option<i64>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Create a room inside a club
    CreateRoom {
        #[arg(long)]
        club: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Show the communities, clubs, and rooms you belong to
    Tree,
    /// Log in and print the bearer token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CLUBHUB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Join a chat room; stdin lines are sent, incoming messages printed
    Chat(ChatArgs),
    /// Check a live backend end to end; exits non-zero on any failure
    Smoke(SmokeArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub size: Option<u32>,
    #[arg(long)]
    pub sort: Option<String>,
    #[arg(long)]
    pub desc: bool,
}

impl PageArgs {
    pub fn query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            size: self.size,
            desc: self.sort.as_ref().map(|_| self.desc),
            sort: self.sort.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    #[arg(long)]
    pub room: i64,
    #[arg(long)]
    pub username: String,
    #[arg(long, default_value_t = 0)]
    pub user_id: i64,
}

#[derive(Args, Debug)]
pub struct SmokeArgs {
    /// Also join this chat room and wait for the connection to open
    #[arg(long)]
    pub room: Option<i64>,
    #[arg(long, default_value = "smoke")]
    pub username: String,
    /// Seconds to wait for the chat connection
    #[arg(long, default_value_t = 5)]
    pub chat_timeout: u64,
}
