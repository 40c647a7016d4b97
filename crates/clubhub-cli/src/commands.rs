//! Subcommand handlers

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clubhub_client::{
    retry_with_backoff, ChatSession, ChatSessionConfig, ClubApi, MessageCallback, RateLimiter,
    RetryPolicy,
};
use clubhub_common::{ClientConfig, ClientResult};
use clubhub_core::{
    ChatMessage, Club, Community, CreateClubRequest, CreateRoomRequest, LoginRequest,
    MembershipTree, PageQuery, Paged, Room,
};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::args::{ChatArgs, Cli, Command, SmokeArgs};

pub async fn run(cli: Cli, config: ClientConfig) -> anyhow::Result<()> {
    let api = ClubApi::new(&config.api)?;
    let json = cli.json;

    match cli.command {
        Command::Communities { page } => {
            let communities = api.list_communities(&page.query()).await?;
            emit(json, &communities, print_communities)?;
        }
        Command::Community { id } => {
            let community = api.get_community(id).await?;
            emit(json, &community, |c| print_communities_list(std::slice::from_ref(c)))?;
        }
        Command::Clubs { community, page } => {
            let clubs = match community {
                Some(id) => api.list_community_clubs(id, &page.query()).await?,
                None => api.list_clubs(&page.query()).await?,
            };
            emit(json, &clubs, |p| print_clubs(&p.items))?;
        }
        Command::Club { id } => {
            let club = api.get_club(id).await?;
            emit(json, &club, |c| print_clubs(std::slice::from_ref(c)))?;
        }
        Command::CreateClub {
            community,
            name,
            description,
        } => {
            let request = CreateClubRequest::new(&name, description.as_deref());
            let club = api.create_club(community, &request).await?;
            info!(club_id = club.id, community_id = community, "Club created");
            emit(json, &club, |c| print_clubs(std::slice::from_ref(c)))?;
        }
        Command::Join { club } => {
            api.join_club(club).await?;
            println!("joined club {club}");
        }
        Command::Rooms { club, page } => match club {
            Some(id) => {
                let rooms = api.list_club_rooms(id).await?;
                emit(json, &rooms, |r: &Vec<Room>| print_rooms(r))?;
            }
            None => {
                let rooms = api.list_rooms(&page.query()).await?;
                emit(json, &rooms, |p| print_rooms(&p.items))?;
            }
        },
        Command::CreateRoom {
            club,
            name,
            description,
        } => {
            let request = CreateRoomRequest::new(club, &name, description.as_deref());
            let room = api.create_room(&request).await?;
            info!(room_id = room.id, club_id = club, "Room created");
            emit(json, &room, |r| print_rooms(std::slice::from_ref(r)))?;
        }
        Command::Tree => {
            let tree = api.membership_tree().await?;
            emit(json, &tree, print_tree)?;
        }
        Command::Login { email, password } => {
            let response = api.login(&LoginRequest { email, password }).await?;
            println!("{}", response.token);
        }
        Command::Chat(args) => chat(&config, args).await?,
        Command::Smoke(args) => smoke(&api, &config, args).await?,
    }

    Ok(())
}

/// Join a room and bridge stdin/stdout until EOF, Ctrl-C, or a closed link
async fn chat(config: &ClientConfig, args: ChatArgs) -> anyhow::Result<()> {
    let on_message: MessageCallback = Arc::new(|msg: &ChatMessage| {
        println!("[{}] {}: {}", msg.timestamp, msg.username, msg.message);
    });

    let mut session = ChatSession::connect(
        ChatSessionConfig::new(&config.chat.url, args.room, &args.username),
        Some(on_message),
    );

    if !session.wait_connected().await {
        bail!("could not connect to {}", config.chat.url);
    }
    info!(room_id = args.room, username = %args.username, "Joined chat room");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let outcome = loop {
        tokio::select! {
            line = lines.next_line() => match line.context("reading stdin")? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => {
                    if let Err(e) = session.send_message(&line, args.user_id) {
                        break Err(anyhow::Error::new(e).context("connection lost before send"));
                    }
                }
                None => break Ok(()),
            },
            _ = tokio::signal::ctrl_c() => break Ok(()),
            () = session.wait_closed() => break Err(anyhow::anyhow!("connection closed by server")),
        }
    };

    session.close().await;
    outcome
}

/// Hit the main endpoints (and optionally a chat room) with rate limiting
/// and retries; fails if any check fails
async fn smoke(api: &ClubApi, config: &ClientConfig, args: SmokeArgs) -> anyhow::Result<()> {
    let policy = RetryPolicy::from(&config.retry);
    let mut limiter = RateLimiter::new(config.rate_limit.min_interval());
    let query = PageQuery::page(1, 5);

    let mut results = vec![
        check("communities", &mut limiter, policy, || api.list_communities(&query)).await,
        check("clubs", &mut limiter, policy, || api.list_clubs(&query)).await,
        check("rooms", &mut limiter, policy, || api.list_rooms(&query)).await,
    ];

    if api.has_token() {
        let tree = check("membership tree", &mut limiter, policy, || api.membership_tree()).await;
        results.push(tree);
    } else {
        warn!("No token configured, skipping authenticated checks");
    }

    if let Some(room_id) = args.room {
        results.push(smoke_chat(config, room_id, &args.username, args.chat_timeout).await);
    }

    let failed = results.iter().filter(|ok| !**ok).count();
    if failed > 0 {
        bail!("{failed} of {} smoke checks failed", results.len());
    }
    println!("all {} smoke checks passed", results.len());
    Ok(())
}

async fn check<T, F, Fut>(
    name: &str,
    limiter: &mut RateLimiter,
    policy: RetryPolicy,
    op: F,
) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    limiter.acquire().await;
    match retry_with_backoff(op, policy).await {
        Ok(_) => {
            println!("ok    {name}");
            true
        }
        Err(e) => {
            warn!(check = name, error_code = e.error_code(), error = %e, "Smoke check failed");
            println!("FAIL  {name}: {e}");
            false
        }
    }
}

async fn smoke_chat(config: &ClientConfig, room_id: i64, username: &str, timeout_secs: u64) -> bool {
    let mut session = ChatSession::connect(
        ChatSessionConfig::new(&config.chat.url, room_id, username),
        None,
    );

    let connected =
        tokio::time::timeout(Duration::from_secs(timeout_secs), session.wait_connected())
            .await
            .unwrap_or(false);
    session.close().await;

    if connected {
        println!("ok    chat room {room_id}");
    } else {
        println!("FAIL  chat room {room_id}: no connection to {}", config.chat.url);
    }
    connected
}

// ----------------------------------------------------------------------
// Output
// ----------------------------------------------------------------------

fn emit<T: Serialize>(json: bool, value: &T, human: impl FnOnce(&T)) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human(value);
    }
    Ok(())
}

fn print_communities(page: &Paged<Community>) {
    print_communities_list(&page.items);
    print_page_footer(page);
}

fn print_communities_list(communities: &[Community]) {
    for community in communities {
        println!(
            "{:>6}  {}  ({} members)",
            community.id,
            community.name,
            community.members()
        );
    }
}

fn print_clubs(clubs: &[Club]) {
    for club in clubs {
        let marker = if club.is_joined() { "*" } else { " " };
        println!("{:>6} {marker} {}", club.id, club.name);
    }
}

fn print_rooms(rooms: &[Room]) {
    for room in rooms {
        match &room.description {
            Some(description) => println!("{:>6}  {}  - {description}", room.id, room.name),
            None => println!("{:>6}  {}", room.id, room.name),
        }
    }
}

fn print_tree(tree: &MembershipTree) {
    for community in &tree.communities {
        println!("{} (#{})", community.name, community.id);
        for club in &community.clubs {
            println!("  {} (#{})", club.name, club.id);
            for room in &club.rooms {
                println!("    {} (#{})", room.name, room.id);
            }
        }
    }
    println!("{} clubs, {} rooms", tree.club_count(), tree.room_count());
}

fn print_page_footer<T>(page: &Paged<T>) {
    println!(
        "page {}/{} ({} total)",
        page.page, page.total_pages, page.total_count
    );
}
