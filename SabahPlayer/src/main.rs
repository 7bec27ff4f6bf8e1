use sabcloud::{normalize_child_path, CloudClient};
use sabconfig::get_config;
use sabsession::{NavSession, ProgressStore, SessionConfigExt, TokenKeeper};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ========== PHASE 1 : Infrastructure ==========

    let config = get_config();

    let level = config
        .get_log_min_level()
        .unwrap_or_else(|_| "INFO".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .init();

    // ========== PHASE 2 : Construction du moteur ==========

    info!("🎵 Initializing SabahMusic engine...");

    let client = CloudClient::from_config(&config)?;
    let store = ProgressStore::from_config(&config)?;
    let mut session = NavSession::from_config(&config)?;
    let mut tokens = TokenKeeper::new(config.get_token_refresh_ticks()?);

    info!("✅ Browsing share {}", session.share());
    info!("Progress file: {}", store.path().display());

    // ========== PHASE 3 : Boucle d'interaction ==========

    // Une ligne lue = une interaction = un cycle requête/réponse complet.
    println!("SabahPlayer - type 'help' for commands.");

    let stdin = io::stdin();
    loop {
        if let Err(e) = render(&client, &store, &mut session).await {
            warn!("Interaction failed: {}", e);
            println!("error: {}", e);
        }

        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let mut parts = line.split_whitespace();
        let command = match parts.next() {
            Some(c) => c,
            None => continue,
        };
        let rest: Vec<&str> = parts.collect();

        let tick = session.begin_interaction();

        let outcome = match command {
            "help" => {
                print_help();
                Ok(())
            }
            "ls" => Ok(()),
            "open" => open_folder(&mut session, &rest),
            "up" => {
                if !session.up() {
                    println!("already at the root");
                }
                Ok(())
            }
            "root" => {
                session.reset_to_root();
                Ok(())
            }
            "more" => match session.load_more(&client).await {
                Ok(n) => {
                    println!("loaded {} more entries", n);
                    Ok(())
                }
                Err(e) => Err(e.to_string()),
            },
            "filter" => {
                session.set_filter(&rest.join(" "));
                Ok(())
            }
            "play" => play(&client, &store, &mut session, &mut tokens, tick, &rest).await,
            "next" => {
                session.select_next();
                play(&client, &store, &mut session, &mut tokens, tick, &[]).await
            }
            "refresh" => {
                session.refresh(&client);
                println!("caches cleared, view reset");
                Ok(())
            }
            "token" => {
                // Réémission forcée : état local et mémoïsation du client
                tokens.invalidate();
                client.invalidate_token();
                println!("token invalidated, next play will issue a new one");
                Ok(())
            }
            "share" => {
                match rest.first() {
                    Some(share) => session.set_share(share),
                    None => println!("usage: share <path>"),
                }
                Ok(())
            }
            "quit" | "exit" => break,
            other => {
                println!("unknown command '{}', try 'help'", other);
                Ok(())
            }
        };

        if let Err(e) = outcome {
            warn!("Interaction failed: {}", e);
            println!("error: {}", e);
        }
    }

    info!("👋 Bye");
    Ok(())
}

/// Charge ce qui manque et affiche la vue courante
async fn render(
    client: &CloudClient,
    store: &ProgressStore,
    session: &mut NavSession,
) -> Result<(), sabsession::SessionError> {
    if session.load_first_page(client).await? {
        // Les totaux les plus récents font foi
        let counts = client.fetch_counts(session.current()).await?;
        session.set_counts(counts);
    }

    if session.selected().is_none() {
        if let Some(name) = session.default_selection(store) {
            session.select(&name);
        }
    }

    println!();
    println!("── {} ──", session.current());
    for (i, p) in session.path().iter().enumerate() {
        println!("{}• {}", "  ".repeat(i), p);
    }

    let folders = session.folders();
    if folders.is_empty() && session.counts().folders == 0 {
        println!("no subfolders here");
    } else {
        println!("folders:");
        for (i, f) in folders.iter().enumerate() {
            println!("  [{}] {}/", i + 1, f.name);
        }
    }

    let filtered = session.filtered_files();
    println!(
        "files: {} loaded / {} total | matching: {}{}",
        session.files().len(),
        session.counts().files,
        filtered.len(),
        if session.filter().is_empty() {
            String::new()
        } else {
            format!(" (filter: \"{}\")", session.filter())
        }
    );
    for (i, f) in filtered.iter().enumerate() {
        let marker = if session.selected() == Some(f.name.as_str()) {
            "▶"
        } else {
            " "
        };
        println!("  {}[{}] {}", marker, i + 1, f.name);
    }
    if session.has_more() {
        println!("('more' to load the next page)");
    }

    Ok(())
}

/// Ouvre le n-ième sous-dossier affiché
fn open_folder(session: &mut NavSession, args: &[&str]) -> Result<(), String> {
    let index: usize = args
        .first()
        .and_then(|a| a.parse().ok())
        .ok_or("usage: open <folder number>")?;
    let entry = session
        .folders()
        .get(index.checked_sub(1).ok_or("folder numbers start at 1")?)
        .cloned()
        .ok_or(format!("no folder [{}]", index))?;

    if !session.open_folder(&entry) {
        println!("folder '{}' carries no remote path, cannot open", entry.name);
    }
    Ok(())
}

/// Sélectionne un épisode, construit son URL de streaming et mémorise le choix
async fn play(
    client: &CloudClient,
    store: &ProgressStore,
    session: &mut NavSession,
    tokens: &mut TokenKeeper,
    tick: u64,
    args: &[&str],
) -> Result<(), String> {
    if let Some(arg) = args.first() {
        let index: usize = arg.parse().map_err(|_| "usage: play [file number]")?;
        let name = session
            .filtered_names()
            .get(index.checked_sub(1).ok_or("file numbers start at 1")?)
            .cloned()
            .ok_or(format!("no file [{}]", index))?;
        session.select(&name);
    }

    let entry = match session.selected_entry() {
        Some(e) => e.clone(),
        None => {
            println!("nothing selected, 'play <n>' to pick an episode");
            return Ok(());
        }
    };

    let token = tokens
        .current(client, tick)
        .await
        .map_err(|e| e.to_string())?;
    let path = normalize_child_path(&entry.weblink, &entry.name);
    if path.is_empty() {
        return Err(format!("'{}' carries no remote path", entry.name));
    }
    let url = client
        .stream_url(session.share(), &token, &path)
        .await
        .map_err(|e| e.to_string())?;

    store
        .update(session.current(), &entry.name)
        .map_err(|e| e.to_string())?;

    println!("now playing: {}", entry.name);
    println!("  size:     {}", entry.formatted_size().unwrap_or_else(|| "unknown".into()));
    println!("  modified: {}", entry.mtime.as_deref().unwrap_or("unknown"));
    println!("  folder:   {}", session.current());
    println!("  stream:   {}", url);

    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  ls              redisplay the current folder");
    println!("  open <n>        open the n-th subfolder");
    println!("  up              go up one level");
    println!("  root            back to the share root");
    println!("  more            load the next page of files");
    println!("  filter [text]   filter files by name substring (empty clears)");
    println!("  play [n]        stream the n-th matching file (or the selection)");
    println!("  next            advance to the next episode and stream it");
    println!("  refresh         clear caches and reload the folder");
    println!("  token           force a new download token");
    println!("  share <path>    switch to another public share");
    println!("  quit            leave");
}
