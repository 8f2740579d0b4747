use soloq_watch::commands::{Command, HELP};
use soloq_watch::config::Settings;
use soloq_watch::logging;
use soloq_watch::services::api::ApiClient;
use soloq_watch::services::monitor::Monitor;
use soloq_watch::services::session::Session;
use soloq_watch::utils::activity_log::ActivityLog;
use std::process;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    logging::init_logging();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Failed to load settings: {}", e);
            process::exit(1);
        }
    };

    let client = match ApiClient::new(&settings.dashboard_url) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            process::exit(1);
        }
    };

    let (mut log, mut entries) = ActivityLog::channel();
    log.info("soloq-watch started");
    let printer = tokio::spawn(async move {
        while let Some(entry) = entries.recv().await {
            println!("{}", entry);
        }
    });

    let mut monitor = Monitor::new(Session::new(client, log), settings.refresh);
    tracing::info!("Using dashboard at {}", settings.dashboard_url);

    if let Some(key) = settings.riot_api_key.as_deref() {
        if let Err(e) = monitor.set_api_key(key).await {
            tracing::debug!("Startup key registration failed: {}", e);
        }
    }

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => break,
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => run(&mut monitor, command).await,
            Err(e) => println!("{}", e),
        }
    }

    monitor.shutdown();
    drop(monitor);
    // the printer ends once the last session handle is gone
    let _ = tokio::time::timeout(Duration::from_secs(1), printer).await;
}

async fn run(monitor: &mut Monitor<ApiClient>, command: Command) {
    let result = match command {
        Command::SetApiKey(key) => monitor.set_api_key(&key).await,
        Command::AddPlayer { id, region } => {
            monitor
                .add_player(&id.game_name, &id.tag_line, &region)
                .await
        }
        Command::AddProPlayers(region) => monitor.add_pro_players(&region).await,
        Command::RemovePlayer(id) => monitor.remove_player(&id.game_name, &id.tag_line).await,
        Command::Clear => monitor.clear_players().await,
        Command::Start => monitor.start_monitoring().await,
        Command::Stop => monitor.stop_monitoring().await,
        Command::List => {
            print_players(monitor).await;
            Ok(())
        }
        Command::Stats => monitor.analytics().await.map(|analytics| {
            let stats = &analytics.basic_stats;
            println!("Total games: {}", stats.total_games);
            println!("Average game length: {:.0} s", stats.avg_duration);
            println!("Players tracked: {}", stats.unique_players);
            for p in &analytics.player_stats {
                println!("  {}#{}: {} game(s)", p.game_name, p.tag_line, p.games_played);
            }
        }),
        Command::RecentGames(id) => monitor
            .recent_games(&id.game_name, &id.tag_line)
            .await
            .map(|games| {
                println!("{}: {} recent game(s)", id, games.len());
                for game in &games {
                    println!("  {}", game);
                }
            }),
        Command::Help => {
            println!("{}", HELP);
            Ok(())
        }
        Command::Quit => Ok(()),
    };

    // the activity log already shows the failure to the user
    if let Err(e) = result {
        tracing::debug!("Command failed: {}", e);
    }
}

async fn print_players(monitor: &Monitor<ApiClient>) {
    let session = monitor.session();
    let session = session.lock().await;
    let state = if session.is_monitoring() {
        "monitoring"
    } else {
        "idle"
    };

    println!("{} player(s), {}", session.players().len(), state);
    if session.players().is_empty() {
        println!("  no players on the watch list");
    }
    for player in session.players() {
        match &player.game_info {
            Some(info) => println!(
                "  {} ({} s in, {} players)",
                player, info.game_length, info.participants
            ),
            None => println!("  {}", player),
        }
    }
}
